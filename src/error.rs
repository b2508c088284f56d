use rusoto_core::RusotoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration failed: {0}")]
    Configuration(String),
    #[error("{op} {resource} failed: {reason}")]
    Provisioning {
        op:       &'static str,
        resource: String,
        reason:   String,
    },
    #[error("interface lookup for {vpc} failed: {reason}")]
    Lookup {
        vpc:    String,
        reason: String,
    },
    #[error("listing bucket {bucket} failed: {reason}")]
    Listing {
        bucket: String,
        reason: String,
    },
    #[error("download of {key} failed: {reason}")]
    Download {
        key:    String,
        reason: String,
    },
    #[error("decoding batch failed: {0}")]
    Decode(String),
}

impl Error {
    /// Fatal errors stop the poller, everything else only abandons
    /// the current cycle.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Configuration(..) => true,
            Self::Provisioning{..}  => true,
            Self::Listing{..}       => true,
            Self::Lookup{..}        => false,
            Self::Download{..}      => false,
            Self::Decode(..)        => false,
        }
    }

    /// Map a collaborator failure, routing credential problems to
    /// `Configuration` regardless of which call surfaced them.
    pub fn aws<E, F>(err: RusotoError<E>, f: F) -> Self
        where E: std::error::Error + 'static,
              F: FnOnce(String) -> Self
    {
        match err {
            RusotoError::Credentials(e) => Self::Configuration(e.to_string()),
            e                           => f(e.to_string()),
        }
    }
}
