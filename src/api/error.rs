use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;

use crate::workflow::{NotifyError, RuleViolation, WorkflowError};

impl ResponseError for WorkflowError {
    fn status_code(&self) -> StatusCode {
        match self {
            WorkflowError::Validation(_) | WorkflowError::BusinessRule(_) => StatusCode::BAD_REQUEST,
            WorkflowError::PolicyDenied(_) => StatusCode::FORBIDDEN,
            WorkflowError::NotFound { .. } => StatusCode::NOT_FOUND,
            WorkflowError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            WorkflowError::Persistence(e) => {
                tracing::error!(error = %e, "Leave workflow persistence failure");
                json!({ "message": "Internal Server Error" })
            }
            WorkflowError::BusinessRule(RuleViolation::BalanceExceeded { remaining }) => json!({
                "message": self.to_string(),
                "remaining": remaining,
            }),
            _ => json!({ "message": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl ResponseError for NotifyError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        tracing::error!(error = %self, "Notification inbox unavailable");
        HttpResponse::build(self.status_code()).json(json!({ "message": "Internal Server Error" }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{Denial, LeaveDays, StoreError};
    use actix_web::body::to_bytes;

    async fn body_of(err: WorkflowError) -> (StatusCode, serde_json::Value) {
        let resp = err.error_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body()).await.expect("body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[actix_web::test]
    async fn status_codes_follow_the_error_kind() {
        let cases = [
            (WorkflowError::Validation("reason is required".into()), StatusCode::BAD_REQUEST),
            (WorkflowError::employee_not_found("ghost"), StatusCode::NOT_FOUND),
            (Denial::NoPermission.into(), StatusCode::FORBIDDEN),
            (Denial::AlreadyProcessed.into(), StatusCode::FORBIDDEN),
        ];
        for (err, expected) in cases {
            let (status, body) = body_of(err).await;
            assert_eq!(status, expected);
            assert!(body["message"].is_string());
        }
    }

    #[actix_web::test]
    async fn balance_rejection_carries_remaining_days() {
        let err = RuleViolation::BalanceExceeded {
            remaining: LeaveDays::HALF,
        };
        let (status, body) = body_of(err.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["remaining"], 0.5);
    }

    #[actix_web::test]
    async fn persistence_details_stay_out_of_the_body() {
        let err = StoreError::Unavailable("connection refused to 10.0.0.7".into());
        let (status, body) = body_of(err.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "Internal Server Error" }));
    }

    #[actix_web::test]
    async fn inbox_failures_are_generic_500s() {
        let resp = NotifyError::Transport("pool timed out".into()).error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(resp.into_body()).await.expect("body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body, json!({ "message": "Internal Server Error" }));
    }
}
