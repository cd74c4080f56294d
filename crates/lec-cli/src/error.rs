//! Classify command failures into the JSON error envelope.

use lec_core::errors::{CoreError, ErrorKind};
use lec_core::responses::ErrorResponse;
use lec_db::error::DatabaseError;

/// Find the ledger error kind anywhere in the chain, else `Internal`.
#[must_use]
pub fn error_kind(error: &anyhow::Error) -> ErrorKind {
    error
        .chain()
        .find_map(|cause| {
            cause
                .downcast_ref::<DatabaseError>()
                .map(DatabaseError::kind)
                .or_else(|| cause.downcast_ref::<CoreError>().map(CoreError::kind))
        })
        .unwrap_or(ErrorKind::Internal)
}

#[must_use]
pub fn error_response(error: &anyhow::Error) -> ErrorResponse {
    let kind = error_kind(error);
    ErrorResponse {
        error: kind.as_str().to_string(),
        status: kind.status_code(),
        message: format!("{error:#}"),
    }
}

/// 2 when the caller is at fault, 1 when the ledger is.
#[must_use]
pub const fn exit_code(kind: ErrorKind) -> i32 {
    if kind.is_client_error() { 2 } else { 1 }
}

#[cfg(test)]
mod tests {
    use anyhow::Context;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn database_not_found_maps_to_404() {
        let err = anyhow::Error::from(DatabaseError::NotFound {
            entity_type: "topic".into(),
            id: "top-00000001".into(),
        });
        let response = error_response(&err);
        assert_eq!(response.error, "not_found");
        assert_eq!(response.status, 404);
        assert!(response.message.contains("top-00000001"));
        assert_eq!(exit_code(error_kind(&err)), 2);
    }

    #[test]
    fn core_validation_maps_to_422() {
        let err = anyhow::Error::from(CoreError::Validation("bad status".into()));
        assert_eq!(error_response(&err).status, 422);
    }

    #[test]
    fn context_does_not_hide_the_kind() {
        let err = Err::<(), _>(DatabaseError::Conflict("slug taken".into()))
            .context("registering subject")
            .unwrap_err();
        let response = error_response(&err);
        assert_eq!(response.status, 409);
        assert!(response.message.starts_with("registering subject"));
    }

    #[test]
    fn unknown_errors_are_internal() {
        let err = anyhow::anyhow!("disk on fire");
        let kind = error_kind(&err);
        assert_eq!(kind, ErrorKind::Internal);
        assert_eq!(error_response(&err).status, 500);
        assert_eq!(exit_code(kind), 1);
    }
}
