use std::fmt;

/// Plugin error carrying a status-like code and a message.
///
/// Handlers return this for every failure; the dispatcher turns it into a
/// response with the same status. Nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RapPluginError {
    pub code: u16,
    pub message: String,
}

impl RapPluginError {
    pub const BAD_REQUEST: u16 = 400;
    pub const NOT_FOUND: u16 = 404;
    pub const INTERNAL: u16 = 500;
    pub const NOT_IMPLEMENTED: u16 = 501;

    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Self::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(Self::BAD_REQUEST, message)
    }

    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::new(Self::NOT_IMPLEMENTED, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Self::INTERNAL, message)
    }

    /// Internal error with the underlying cause appended to the message.
    pub fn internal_with_cause(message: impl Into<String>, cause: impl fmt::Display) -> Self {
        Self::new(Self::INTERNAL, format!("{}: {}", message.into(), cause))
    }

    pub fn is_not_found(&self) -> bool {
        self.code == Self::NOT_FOUND
    }
}

impl fmt::Display for RapPluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for RapPluginError {}
