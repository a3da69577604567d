use podsync_remote::RemoteError;
use podsync_sheets::SheetsError;

/// Error type for sync runs, wrapping both client error domains.
#[derive(Debug)]
pub enum SyncError {
    /// Row store failure. Store errors always abort the run — a store
    /// that could not be fully read must never feed an overwrite.
    Sheets(SheetsError),
    /// Remote reader failure that could not be degraded to an empty
    /// fetch (fatal auth, missing credentials).
    Remote(RemoteError),
    /// The caller's cancellation token fired.
    Cancelled,
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sheets(e) => write!(f, "row store: {e}"),
            Self::Remote(e) => write!(f, "remote reader: {e}"),
            Self::Cancelled => write!(f, "sync cancelled"),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sheets(e) => Some(e),
            Self::Remote(e) => Some(e),
            Self::Cancelled => None,
        }
    }
}

impl From<SheetsError> for SyncError {
    fn from(e: SheetsError) -> Self {
        Self::Sheets(e)
    }
}

impl From<RemoteError> for SyncError {
    fn from(e: RemoteError) -> Self {
        match e {
            RemoteError::Cancelled => Self::Cancelled,
            other => Self::Remote(other),
        }
    }
}
