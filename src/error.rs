use std::fmt;
use std::io;
use std::path::PathBuf;

/// Failure of a single lookup, as seen across the `SearchService` seam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The lookup was superseded or aborted. Never shown to the user.
    Cancelled,
    /// Transport or service failure.
    Failed { reason: String },
}

impl SearchError {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => f.write_str("search cancelled"),
            Self::Failed { reason } => write!(f, "search failed: {reason}"),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<ureq::Error> for SearchError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => Self::failed(format!("HTTP status {code}")),
            ureq::Error::Transport(transport) => Self::failed(transport.to_string()),
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        Self::failed(format!("invalid response body: {err}"))
    }
}

impl From<io::Error> for SearchError {
    fn from(err: io::Error) -> Self {
        Self::failed(format!("read failed: {err}"))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: serde_yaml::Error },
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "cannot read config {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "cannot parse config {}: {source}", path.display())
            }
            Self::Invalid(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

/// Top-level failure of the demo binary.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Logging(String),
    Io(io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => err.fmt(f),
            Self::Logging(reason) => write!(f, "cannot initialise logging: {reason}"),
            Self::Io(err) => write!(f, "terminal error: {err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Logging(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
