use podsync_core::AuthRecovery;

/// Error type for admin API operations.
#[derive(Debug)]
pub enum RemoteError {
    /// No saved credentials configured.
    NotAuthenticated,
    /// Access token rejected (401). Consumed by the refresh wrapper.
    AuthExpired(String),
    /// Token still rejected after a refresh. Never retried again.
    AuthFatal(String),
    /// Network / transport error.
    Network(String),
    /// Non-auth HTTP error with status code.
    Http(u16, String),
    /// Response body was not the shape the admin API promises.
    Parse(String),
    /// The caller's cancellation token fired.
    Cancelled,
}

impl RemoteError {
    /// Errors a full fetch degrades on (empty result, logged) rather
    /// than propagates. Auth outcomes and cancellation always surface.
    pub fn is_degradable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Http(..) | Self::Parse(_))
    }
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "not authenticated — no saved admin API credentials"),
            Self::AuthExpired(msg) => write!(f, "admin API credential expired: {msg}"),
            Self::AuthFatal(msg) => write!(f, "admin API auth failed after refresh: {msg}"),
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Http(code, msg) => write!(f, "admin API HTTP {code}: {msg}"),
            Self::Parse(msg) => write!(f, "admin API response parse error: {msg}"),
            Self::Cancelled => write!(f, "fetch cancelled"),
        }
    }
}

impl std::error::Error for RemoteError {}

impl AuthRecovery for RemoteError {
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
