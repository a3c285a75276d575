//! Error types and error handling for tatsu.
//!
//! This module defines all error types used throughout the crate,
//! including the error codes reported by the Tatsu API and CLI exit codes.

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Error codes reported in the body of a failed Tatsu API response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorCode {
    /// 10001: The user does not exist
    UnknownUser,

    /// 10002: The guild does not exist
    UnknownGuild,

    /// 10003: The guild member does not exist
    UnknownGuildMember,

    /// 20001: The API key's owner is not in the guild
    NotInGuild,

    /// 20002: The API key's owner lacks MANAGE_GUILD
    MissingPermission,

    /// 30001: The member's score is too low to remove the amount
    InsufficientScore,

    /// 30002: The member's points are too low to remove the amount
    InsufficientPoints,
}

impl ApiErrorCode {
    /// Returns the numeric code used on the wire.
    pub fn as_u32(&self) -> u32 {
        match self {
            ApiErrorCode::UnknownUser => 10001,
            ApiErrorCode::UnknownGuild => 10002,
            ApiErrorCode::UnknownGuildMember => 10003,
            ApiErrorCode::NotInGuild => 20001,
            ApiErrorCode::MissingPermission => 20002,
            ApiErrorCode::InsufficientScore => 30001,
            ApiErrorCode::InsufficientPoints => 30002,
        }
    }

    /// Looks up a code by its numeric value.
    pub fn from_u32(code: u32) -> Option<Self> {
        match code {
            10001 => Some(ApiErrorCode::UnknownUser),
            10002 => Some(ApiErrorCode::UnknownGuild),
            10003 => Some(ApiErrorCode::UnknownGuildMember),
            20001 => Some(ApiErrorCode::NotInGuild),
            20002 => Some(ApiErrorCode::MissingPermission),
            30001 => Some(ApiErrorCode::InsufficientScore),
            30002 => Some(ApiErrorCode::InsufficientPoints),
            _ => None,
        }
    }

    /// Recognises a code from the error message when the body carries no code.
    pub fn from_message(message: &str) -> Option<Self> {
        let message = message.to_lowercase();
        // Longer phrases first: "unknown guild member" contains "unknown guild".
        if message.contains("unknown guild member") || message.contains("unknown member") {
            Some(ApiErrorCode::UnknownGuildMember)
        } else if message.contains("unknown guild") {
            Some(ApiErrorCode::UnknownGuild)
        } else if message.contains("unknown user") {
            Some(ApiErrorCode::UnknownUser)
        } else if message.contains("not in guild") || message.contains("not in this guild") {
            Some(ApiErrorCode::NotInGuild)
        } else if message.contains("manage_guild") || message.contains("missing permission") {
            Some(ApiErrorCode::MissingPermission)
        } else if message.contains("insufficient score") {
            Some(ApiErrorCode::InsufficientScore)
        } else if message.contains("insufficient points") {
            Some(ApiErrorCode::InsufficientPoints)
        } else {
            None
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/// CLI exit codes.
pub mod exit_code {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// General error
    pub const GENERAL_ERROR: i32 = 1;
    /// Configuration error
    pub const CONFIG_ERROR: i32 = 2;
    /// Connection error
    pub const CONNECTION_ERROR: i32 = 3;
    /// Rate limit could not be waited out
    pub const RATE_LIMIT_ERROR: i32 = 4;
    /// Authentication error
    pub const AUTH_ERROR: i32 = 5;
    /// Command line argument error
    pub const CLI_ERROR: i32 = 64;
}

/// The main error type for tatsu.
#[derive(Debug, Error)]
pub enum TatsuError {
    /// Configuration file is invalid or cannot be loaded.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A caller-supplied argument is out of range.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Failed to reach the Tatsu API.
    #[error("Connection error: {target}")]
    Connection {
        target: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The API key was rejected.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Tatsu can't find a user.
    #[error("Unknown user: {message}")]
    UnknownUser { message: String },

    /// Tatsu can't find a guild.
    #[error("Unknown guild: {message}")]
    UnknownGuild { message: String },

    /// Tatsu can't find a guild member.
    #[error("Unknown guild member: {message}")]
    UnknownGuildMember { message: String },

    /// The API key's owner isn't in the guild it asked about.
    #[error("Not in guild: {message}")]
    NotInGuild { message: String },

    /// The API key's owner needs the MANAGE_GUILD permission.
    #[error("Missing permission: {message}")]
    MissingPermission { message: String },

    /// A member's score is too low to remove the requested amount.
    #[error("Insufficient score: {message}")]
    InsufficientScore { message: String },

    /// A member's points are too low to remove the requested amount.
    #[error("Insufficient points: {message}")]
    InsufficientPoints { message: String },

    /// Any other error response from the API.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        code: Option<u32>,
        message: String,
    },

    /// Every attempt of a request was answered with HTTP 429.
    #[error("Rate limited: gave up after {attempts} attempts")]
    RateLimited { attempts: u32 },

    /// Response body did not match the expected model.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Body of a failed API response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    /// Tatsu error code.
    #[serde(default)]
    pub code: Option<u32>,

    /// Human-readable error message.
    #[serde(default)]
    pub message: Option<String>,
}

impl TatsuError {
    /// Returns the CLI exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            TatsuError::Config { .. } | TatsuError::Yaml(_) => exit_code::CONFIG_ERROR,
            TatsuError::Connection { .. } => exit_code::CONNECTION_ERROR,
            TatsuError::RateLimited { .. } => exit_code::RATE_LIMIT_ERROR,
            TatsuError::Unauthorized { .. } => exit_code::AUTH_ERROR,
            TatsuError::InvalidArgument { .. } => exit_code::CLI_ERROR,
            _ => exit_code::GENERAL_ERROR,
        }
    }

    /// Returns the Tatsu error code this error was built from, if any.
    pub fn api_code(&self) -> Option<ApiErrorCode> {
        match self {
            TatsuError::UnknownUser { .. } => Some(ApiErrorCode::UnknownUser),
            TatsuError::UnknownGuild { .. } => Some(ApiErrorCode::UnknownGuild),
            TatsuError::UnknownGuildMember { .. } => Some(ApiErrorCode::UnknownGuildMember),
            TatsuError::NotInGuild { .. } => Some(ApiErrorCode::NotInGuild),
            TatsuError::MissingPermission { .. } => Some(ApiErrorCode::MissingPermission),
            TatsuError::InsufficientScore { .. } => Some(ApiErrorCode::InsufficientScore),
            TatsuError::InsufficientPoints { .. } => Some(ApiErrorCode::InsufficientPoints),
            _ => None,
        }
    }

    /// Creates a configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        TatsuError::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a configuration error with a message and source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        TatsuError::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a connection error with a source.
    pub fn connection_with_source(
        target: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        TatsuError::Connection {
            target: target.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        TatsuError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Builds the error for a non-success API response.
    ///
    /// The body is parsed as `{"code": .., "message": ..}` when possible.
    /// A known Tatsu code wins, then a recognisable message, then the status.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
        let message = parsed.message.clone().unwrap_or_else(|| {
            let text = String::from_utf8_lossy(body).trim().to_string();
            if text.is_empty() {
                format!("HTTP {}", status)
            } else {
                text
            }
        });

        let known = parsed
            .code
            .and_then(ApiErrorCode::from_u32)
            .or_else(|| ApiErrorCode::from_message(&message));

        match known {
            Some(code) => Self::from_api_code(code, message),
            None if status == 401 => TatsuError::Unauthorized { message },
            None => TatsuError::Api {
                status,
                code: parsed.code,
                message,
            },
        }
    }

    fn from_api_code(code: ApiErrorCode, message: String) -> Self {
        match code {
            ApiErrorCode::UnknownUser => TatsuError::UnknownUser { message },
            ApiErrorCode::UnknownGuild => TatsuError::UnknownGuild { message },
            ApiErrorCode::UnknownGuildMember => TatsuError::UnknownGuildMember { message },
            ApiErrorCode::NotInGuild => TatsuError::NotInGuild { message },
            ApiErrorCode::MissingPermission => TatsuError::MissingPermission { message },
            ApiErrorCode::InsufficientScore => TatsuError::InsufficientScore { message },
            ApiErrorCode::InsufficientPoints => TatsuError::InsufficientPoints { message },
        }
    }
}

/// Result type alias for tatsu operations.
pub type Result<T> = std::result::Result<T, TatsuError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_code_values() {
        for code in [
            ApiErrorCode::UnknownUser,
            ApiErrorCode::UnknownGuild,
            ApiErrorCode::UnknownGuildMember,
            ApiErrorCode::NotInGuild,
            ApiErrorCode::MissingPermission,
            ApiErrorCode::InsufficientScore,
            ApiErrorCode::InsufficientPoints,
        ] {
            assert_eq!(ApiErrorCode::from_u32(code.as_u32()), Some(code));
        }
        assert_eq!(ApiErrorCode::from_u32(99999), None);
        assert_eq!(ApiErrorCode::UnknownGuild.to_string(), "10002");
    }

    #[test]
    fn test_api_error_code_from_message() {
        assert_eq!(
            ApiErrorCode::from_message("Unknown Guild Member"),
            Some(ApiErrorCode::UnknownGuildMember)
        );
        assert_eq!(
            ApiErrorCode::from_message("Unknown guild"),
            Some(ApiErrorCode::UnknownGuild)
        );
        assert_eq!(
            ApiErrorCode::from_message("You need the MANAGE_GUILD permission"),
            Some(ApiErrorCode::MissingPermission)
        );
        assert_eq!(ApiErrorCode::from_message("something broke"), None);
    }

    #[test]
    fn test_from_response_uses_code() {
        let err = TatsuError::from_response(404, br#"{"code":10001,"message":"Unknown User"}"#);
        assert!(matches!(err, TatsuError::UnknownUser { ref message } if message == "Unknown User"));
        assert_eq!(err.api_code(), Some(ApiErrorCode::UnknownUser));
    }

    #[test]
    fn test_from_response_uses_message() {
        let err = TatsuError::from_response(400, br#"{"message":"Insufficient points"}"#);
        assert!(matches!(err, TatsuError::InsufficientPoints { .. }));
    }

    #[test]
    fn test_from_response_unauthorized() {
        let err = TatsuError::from_response(401, br#"{"message":"Invalid API key"}"#);
        assert!(matches!(err, TatsuError::Unauthorized { .. }));
        assert_eq!(err.exit_code(), exit_code::AUTH_ERROR);
    }

    #[test]
    fn test_from_response_unrecognised() {
        let err = TatsuError::from_response(500, b"upstream exploded");
        match err {
            TatsuError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 500);
                assert_eq!(code, None);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }

        let err = TatsuError::from_response(502, b"");
        assert_eq!(err.to_string(), "API error (HTTP 502): HTTP 502");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(TatsuError::config("bad").exit_code(), exit_code::CONFIG_ERROR);
        assert_eq!(
            TatsuError::RateLimited { attempts: 5 }.exit_code(),
            exit_code::RATE_LIMIT_ERROR
        );
        assert_eq!(
            TatsuError::invalid_argument("start").exit_code(),
            exit_code::CLI_ERROR
        );
        assert_eq!(
            TatsuError::UnknownGuild {
                message: "x".to_string()
            }
            .exit_code(),
            exit_code::GENERAL_ERROR
        );
    }

    #[test]
    fn test_error_display() {
        let err = TatsuError::RateLimited { attempts: 5 };
        assert_eq!(format!("{}", err), "Rate limited: gave up after 5 attempts");

        let err = TatsuError::invalid_argument("Start parameter must be greater than or equal to 1.");
        assert_eq!(
            format!("{}", err),
            "Invalid argument: Start parameter must be greater than or equal to 1."
        );
    }
}
