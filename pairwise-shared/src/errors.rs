use serde::{Deserialize, Serialize};

/// Application error codes following the pattern E{service}{sequence}
///
/// The matchmaking engine owns the E3xxx range. Failures are always matched
/// by code, never by message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Ledger or collaborator failure not attributable to caller input.
    Internal,
    /// Malformed or missing identifiers.
    InvalidArgument,
    /// No resolvable actor behind the request.
    Unauthenticated,
    /// The actor is not the authorized party for this action.
    PermissionDenied,
    /// The actor (or target) has no matchmaking profile.
    ProfileNotFound,
    LikeNotFound,
    MatchNotFound,
    /// The entity exists but is in the wrong state for the requested
    /// transition. The message names the current status.
    FailedPrecondition,
    /// An Initiated like already exists for this ordered pair.
    AlreadyRequested,
    /// An active match already exists for this canonical pair.
    AlreadyMatched,
    SelfLike,
    SelfInvitation,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Internal => "E3000",
            Self::InvalidArgument => "E3001",
            Self::Unauthenticated => "E3002",
            Self::PermissionDenied => "E3003",
            Self::ProfileNotFound => "E3004",
            Self::LikeNotFound => "E3005",
            Self::MatchNotFound => "E3006",
            Self::FailedPrecondition => "E3007",
            Self::AlreadyRequested => "E3008",
            Self::AlreadyMatched => "E3009",
            Self::SelfLike => "E3010",
            Self::SelfInvitation => "E3011",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthenticated, message)
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    pub fn failed_precondition(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::FailedPrecondition, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    /// The stable code for this failure, for callers that branch on outcome.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Known { code, .. } => *code,
            Self::Internal(_) => ErrorCode::Internal,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ErrorCode::Internal.code(), "E3000");
        assert_eq!(ErrorCode::AlreadyMatched.code(), "E3009");
        assert_eq!(ErrorCode::SelfInvitation.code(), "E3011");
    }

    #[test]
    fn known_error_carries_code_and_message() {
        let err = AppError::new(ErrorCode::AlreadyRequested, "like already sent");
        assert_eq!(err.code(), ErrorCode::AlreadyRequested);
        assert_eq!(err.to_string(), "like already sent");
    }

    #[test]
    fn wrapped_anyhow_maps_to_internal() {
        let err = AppError::from(anyhow::anyhow!("connection reset"));
        assert_eq!(err.code(), ErrorCode::Internal);
    }
}
