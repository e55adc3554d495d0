use std::io;

use thiserror::Error;

pub(crate) mod result;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The Parameter Manager client could not be built (configuration,
    /// credentials or token exchange).
    #[error("failed to create Parameter Manager client: {0}")]
    ClientInitialization(#[source] Box<ClientError>),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("{0}")]
    Default(String),

    /// The remote `GetParameter` call failed.
    #[error("failed to get parameter: {0}")]
    GetParameter(#[source] Box<ClientError>),

    #[error("JWT Error: {0}")]
    JwtError(String),

    /// The service accepted the update but returned no `kms_key`.
    #[error("parameter {0} was updated but the response carries no kms_key")]
    MissingKmsKey(String),

    #[error("Not Supported: {0}")]
    NotSupported(String),

    #[error("REST Request Failed: {0}")]
    RequestFailed(String),

    #[error("REST Response Conversion Failed: {0}")]
    ResponseFailed(String),

    #[error("Token retrieval error: {0}")]
    TokenRetrieval(String),

    /// The remote `UpdateParameter` call failed.
    #[error("failed to update parameter: {0}")]
    UpdateParameter(#[source] Box<ClientError>),

    #[error(transparent)]
    UrlError(#[from] url::ParseError),
}

impl ClientError {
    pub(crate) fn client_initialization(e: Self) -> Self {
        Self::ClientInitialization(Box::new(e))
    }

    pub(crate) fn get_parameter(e: Self) -> Self {
        Self::GetParameter(Box::new(e))
    }

    pub(crate) fn update_parameter(e: Self) -> Self {
        Self::UpdateParameter(Box::new(e))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        Self::Default(format!("{e}: Details: {e:?}"))
    }
}

impl From<io::Error> for ClientError {
    fn from(e: io::Error) -> Self {
        Self::Default(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::ResponseFailed(e.to_string())
    }
}

impl From<jwt_simple::Error> for ClientError {
    fn from(e: jwt_simple::Error) -> Self {
        Self::JwtError(e.to_string())
    }
}

/// Construct a client error from a string.
#[macro_export]
macro_rules! client_error {
    ($msg:literal) => {
        $crate::ClientError::Default(::core::format_args!($msg).to_string())
    };
    ($err:expr $(,)?) => ({
        $crate::ClientError::Default($err.to_string())
    });
    ($fmt:expr, $($arg:tt)*) => {
        $crate::ClientError::Default(::core::format_args!($fmt, $($arg)*).to_string())
    };
}

/// Return early with an error if a condition is not satisfied.
#[macro_export]
macro_rules! client_bail {
    ($msg:literal) => {
        return ::core::result::Result::Err($crate::client_error!($msg))
    };
    ($err:expr $(,)?) => {
        return ::core::result::Result::Err($err)
    };
    ($fmt:expr, $($arg:tt)*) => {
        return ::core::result::Result::Err($crate::client_error!($fmt, $($arg)*))
    };
}

/// Return early with an error if a condition is not satisfied.
///
/// This macro is equivalent to `if !$cond { return Err(From::from($err)); }`.
#[macro_export]
macro_rules! client_ensure {
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err($crate::client_error!($msg));
        }
    };
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return ::core::result::Result::Err($crate::client_error!($fmt, $($arg)*));
        }
    };
}
