use std::sync::LazyLock;

use regex::Regex;

static NIL_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<\w+ xsi:nil="true" />"#).expect("nil element pattern is valid")
});

/// Strip explicit-null markers from raw response content
///
/// Removes every self-closing element of the exact form
/// `<Name xsi:nil="true" />` so that serde sees the field as missing and
/// falls back to its default. This is a plain textual substitution over the
/// whole document, not a structural transform, and it is lossy:
///
/// - an explicit null and an absent element become indistinguishable;
/// - prefixed tag names (`<a:Name xsi:nil="true" />`), other spacing
///   (`<Name xsi:nil="true"/>`) or `xsi:nil="1"` are left untouched;
/// - matching text that is not markup, e.g. inside a CDATA section, is
///   removed all the same.
///
/// Removal repeats until nothing matches, so applying it twice is the same
/// as applying it once.
pub fn remove_nil_elements(content: &str) -> String {
    let mut out = content.to_owned();
    while NIL_ELEMENT.is_match(&out) {
        out = NIL_ELEMENT.replace_all(&out, "").into_owned();
    }
    out
}
