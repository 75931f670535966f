use std::fmt;

/// A protocol-level error reported by the remote service
///
/// Every field is optional since servers routinely leave some of them out.
/// The human-readable `message` (`faultstring` on the wire) is what the
/// fault displays as.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fault {
    /// `faultcode`, e.g. `soap:Server`
    pub code: Option<String>,
    /// `faultstring`
    pub message: Option<String>,
    /// `faultactor`, the node that raised the fault
    pub actor: Option<String>,
    /// Raw inner content of the `detail` element
    pub detail: Option<String>,
}

impl Fault {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// The fault message, or an empty string when the server sent none
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for Fault {}
