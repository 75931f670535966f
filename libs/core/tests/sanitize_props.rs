use proptest::prelude::*;
use soapbox_core::envelope::{self, Outcome, SOAP_ENV_NS};
use soapbox_core::sanitize::remove_nil_elements;

#[derive(Debug, Clone)]
enum Segment {
    Element { tag: String, text: String },
    Nil { tag: String },
}

impl Segment {
    fn render(&self) -> String {
        match self {
            Segment::Element { tag, text } => format!("<{tag}>{text}</{tag}>"),
            Segment::Nil { tag } => format!(r#"<{tag} xsi:nil="true" />"#),
        }
    }
}

fn tag() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{0,8}".prop_filter("reserved", |t| t != "Fault")
}

fn segment() -> impl Strategy<Value = Segment> {
    prop_oneof![
        (tag(), "[a-z0-9 ]{0,12}").prop_map(|(tag, text)| Segment::Element { tag, text }),
        tag().prop_map(|tag| Segment::Nil { tag }),
    ]
}

proptest! {
    #[test]
    fn sanitize_is_idempotent(input in ".*") {
        let once = remove_nil_elements(&input);
        prop_assert_eq!(remove_nil_elements(&once), once);
    }

    #[test]
    fn sanitize_removes_exactly_nil_markers(segments in prop::collection::vec(segment(), 0..8)) {
        let input: String = segments.iter().map(Segment::render).collect();
        let expected: String = segments
            .iter()
            .filter(|s| matches!(s, Segment::Element { .. }))
            .map(Segment::render)
            .collect();

        prop_assert_eq!(remove_nil_elements(&input), expected);
    }

    #[test]
    fn response_content_round_trips(
        segments in prop::collection::vec(
            (tag(), "[a-z0-9 ]{0,12}").prop_map(|(tag, text)| Segment::Element { tag, text }),
            1..6,
        ),
        padding in "[ \n]{0,3}",
    ) {
        let inner = format!(
            "{padding}{}{padding}",
            segments.iter().map(Segment::render).collect::<String>()
        );
        let raw = format!(
            r#"<soapenv:Envelope xmlns:soapenv="{SOAP_ENV_NS}"><soapenv:Body>{inner}</soapenv:Body></soapenv:Envelope>"#
        );

        prop_assert_eq!(envelope::decode(raw.as_bytes()).unwrap(), Outcome::Payload(inner));
    }
}
