use podsync_core::AuthRecovery;

/// Error type for workbook operations.
#[derive(Debug)]
pub enum SheetsError {
    /// No saved credentials configured.
    NotAuthenticated,
    /// Bearer token rejected (401). Consumed by the refresh wrapper.
    AuthExpired(String),
    /// Token still rejected after a refresh. Never retried again.
    AuthFatal(String),
    /// Network / transport error.
    Network(String),
    /// Non-auth HTTP error with status code.
    Http(u16, String),
    /// Response body was not the shape the workbook API promises.
    Parse(String),
}

impl std::fmt::Display for SheetsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "not authenticated — no saved workbook credentials"),
            Self::AuthExpired(msg) => write!(f, "workbook credential expired: {msg}"),
            Self::AuthFatal(msg) => write!(f, "workbook auth failed after refresh: {msg}"),
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Http(code, msg) => write!(f, "workbook HTTP {code}: {msg}"),
            Self::Parse(msg) => write!(f, "workbook response parse error: {msg}"),
        }
    }
}

impl std::error::Error for SheetsError {}

impl AuthRecovery for SheetsError {
    fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired(_))
    }

    fn into_fatal(self) -> Self {
        match self {
            Self::AuthExpired(msg) => Self::AuthFatal(msg),
            other => other,
        }
    }
}
