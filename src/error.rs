use std::fmt;
use thiserror::Error;

/// Where a configuration or unknown error came from.
///
/// Rendered after the message as ` (field: .., details: .., source: ..)`,
/// omitting unset parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Config key, e.g. `api_key`.
    pub field_path: Option<String>,
    pub details: Option<String>,
    /// Module that raised it, e.g. `config`, `controller`.
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            ("field", &self.field_path),
            ("details", &self.details),
            ("source", &self.source),
        ]
        .iter()
        .filter_map(|(label, value)| value.as_ref().map(|v| format!("{}: {}", label, v)))
        .collect();
        if parts.is_empty() {
            Ok(())
        } else {
            write!(f, " ({})", parts.join(", "))
        }
    }
}

/// Rejections raised before any network activity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("please select a valid image file (got {mime_type})")]
    NotAnImage { mime_type: String },

    #[error("file size must be under 5MB ({size} bytes)")]
    TooLarge { size: u64 },

    #[error("no image loaded")]
    NoImageLoaded,

    #[error("could not read {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

/// Unified error type for classification attempts.
///
/// Every variant is terminal for the current attempt; nothing is retried
/// automatically.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {message}{context}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("API error: HTTP {status} {status_text}")]
    Api { status: u16, status_text: String },

    #[error("API error: no candidates in response")]
    NoCandidates,

    /// Built through [`Error::transport`], which strips the request URL.
    #[error("Network transport error: {0}")]
    Transport(reqwest::Error),

    #[error("Parse error: {message}")]
    Parse { message: String, raw: String },

    #[error("Unknown error: {message}{context}")]
    Unknown {
        message: String,
        context: ErrorContext,
    },
}

impl Error {
    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Create a new unknown error with structured context
    pub fn unknown_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Unknown {
            message: msg.into(),
            context,
        }
    }

    /// Wrap a reqwest error without its URL; the endpoint URL carries the API key.
    pub fn transport(e: reqwest::Error) -> Self {
        Error::Transport(e.without_url())
    }

    pub fn parse(msg: impl Into<String>, raw: impl Into<String>) -> Self {
        Error::Parse {
            message: msg.into(),
            raw: raw.into(),
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Unknown { context, .. } => Some(context),
            _ => None,
        }
    }

    /// True for failures reported by (or on the way to) the remote API.
    pub fn is_api(&self) -> bool {
        matches!(
            self,
            Error::Api { .. } | Error::NoCandidates | Error::Transport(_)
        )
    }

    /// The single line shown in the error panel.
    ///
    /// API failures and answer-decoding failures produce different wording so
    /// the user can tell them apart.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(v) => match v {
                ValidationError::NotAnImage { .. } => "Please select a valid image file.".into(),
                ValidationError::TooLarge { .. } => "File size must be under 5MB.".into(),
                ValidationError::NoImageLoaded => "Load an image first.".into(),
                ValidationError::Unreadable { path, .. } => {
                    format!("Could not read the selected file: {}", path)
                }
            },
            Error::Configuration { .. } => {
                "API key is not configured. Please contact the developer.".into()
            }
            Error::Api {
                status,
                status_text,
            } => format!("Analysis failed: API error {} {}", status, status_text)
                .trim_end()
                .to_string(),
            Error::NoCandidates => {
                "Analysis failed: no valid response was received from the API.".into()
            }
            Error::Transport(_) => {
                "Connection error. Please check your internet connection.".into()
            }
            Error::Parse { .. } => {
                "Analysis failed: the result could not be processed.".into()
            }
            Error::Unknown { .. } => "An unexpected error occurred. Please try again.".into(),
        }
    }
}
