//! Error resolution policy.
//!
//! Pure functions that decide how a propagated [`ApiError`] renders. The
//! client stage handles recognized 4xx errors and stops; everything else
//! falls through to the server stage, which renders 500 with detail gated
//! by the deployment mode. Both stages only compute values; logging and
//! response writing live in the HTTP adapter so this module stays trivially
//! testable.
use http::StatusCode;

use crate::{config::RunMode, core::error::ApiError};

/// A fully decided error response: status plus the message to expose.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub status: StatusCode,
    pub message: String,
}

/// Resolve an error into its rendered form.
///
/// Exactly one recovery path: the client stage first, the server stage as
/// the terminal fallback.
pub fn resolve(err: &ApiError, mode: RunMode) -> Rendered {
    client_stage(err).unwrap_or_else(|| server_stage(err, mode))
}

/// Render a recognized client error with its own status and message;
/// forward anything else unchanged.
fn client_stage(err: &ApiError) -> Option<Rendered> {
    match err {
        ApiError::Client { status, message } => Some(Rendered {
            status: *status,
            message: message.clone(),
        }),
        ApiError::Server(_) => None,
    }
}

/// Terminal stage: 500 with either a generic message or the full
/// diagnostic chain, depending on mode. Internals never leak in
/// production.
fn server_stage(err: &ApiError, mode: RunMode) -> Rendered {
    let message = match (mode, err) {
        (RunMode::Production, _) => "Internal Server Error".to_string(),
        (RunMode::Development, ApiError::Server(report)) => format!("{report:?}"),
        (RunMode::Development, other) => other.to_string(),
    };
    Rendered {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_error(text: &str) -> ApiError {
        ApiError::server(std::io::Error::other(text.to_string()))
    }

    #[test]
    fn test_client_errors_render_their_own_status() {
        let err = ApiError::bad_request("Missing q parameter");
        let rendered = resolve(&err, RunMode::Production);
        assert_eq!(rendered.status, StatusCode::BAD_REQUEST);
        assert_eq!(rendered.message, "Missing q parameter");
    }

    #[test]
    fn test_client_rendering_ignores_mode() {
        let err = ApiError::not_found("Method not found.");
        assert_eq!(
            resolve(&err, RunMode::Development),
            resolve(&err, RunMode::Production)
        );
    }

    #[test]
    fn test_production_never_leaks_internals() {
        let rendered = resolve(&server_error("db password is hunter2"), RunMode::Production);
        assert_eq!(rendered.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(rendered.message, "Internal Server Error");
    }

    #[test]
    fn test_development_includes_diagnostic_detail() {
        let rendered = resolve(&server_error("upstream exploded"), RunMode::Development);
        assert_eq!(rendered.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(rendered.message.contains("upstream exploded"));
    }
}
