use thiserror::Error;

/// Why a property source could not produce listings.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("property source is not configured: {0}")]
    NotConfigured(String),
    #[error("property backend failure: {0}")]
    Backend(String),
}

/// Errors surfaced to HTTP callers of the tool endpoint.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("unknown tool: {tool}")]
    UnknownTool { tool: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::UnknownTool { .. } => "No tool with that name is available.",
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::UnknownTool { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}
