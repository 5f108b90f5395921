use thiserror::Error;

/// BackendError
///
/// Failures talking to the platform API. None of them reaches the routing
/// layer as a fault: the session simply stays in the loading state.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend answered {status} for {endpoint}")]
    Status { endpoint: String, status: u16 },

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}
