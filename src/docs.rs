use crate::api::leave_request::{BalanceResponse, SubmitLeaveResponse, TransitionResponse};
use crate::api::notification::{InboxResponse, UnreadResponse};
use crate::model::{LeaveKind, LeaveRequest, LeaveStatus, Notification};
use crate::workflow::LeaveApplication;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Approval API",
        version = "0.1.0",
        description = r#"
## Two-tier leave approval

Employees submit leave requests which pass a **part-leader** of their own
department and then any **team-leader** before they are approved.

### 🔹 Key Features
- **Submission** with tenure, overlap and annual-balance checks
- **Approval / rejection** by role, with an approval queue per caller
- **Cancellation** by the applicant while a request is still pending
- **History and balance** of the caller
- **Inbox** of workflow notifications with an unread count

### 🔐 Security
Every endpoint requires a **JWT Bearer** access token. The token subject is
the username the caller acts as.

### 📍 Paths
Paths below use the default `/api` prefix. Deployments that set
`API_PREFIX` serve the same routes under that prefix instead.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_request::submit_leave,
        crate::api::leave_request::leave_history,
        crate::api::leave_request::leave_balance,
        crate::api::leave_request::pending_approvals,
        crate::api::leave_request::cancel_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::notification::list_notifications,
        crate::api::notification::unread_count,
    ),
    components(
        schemas(
            LeaveApplication,
            LeaveRequest,
            LeaveKind,
            LeaveStatus,
            SubmitLeaveResponse,
            TransitionResponse,
            BalanceResponse,
            Notification,
            InboxResponse,
            UnreadResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Leave", description = "Leave request workflow APIs"),
        (name = "Notification", description = "Workflow notification inbox"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_leave_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        assert_eq!(
            paths,
            vec![
                "/api/leave",
                "/api/leave/approvals",
                "/api/leave/balance",
                "/api/leave/{leave_id}",
                "/api/leave/{leave_id}/approve",
                "/api/leave/{leave_id}/reject",
                "/api/notifications",
                "/api/notifications/unread",
            ]
        );
        let schemes = doc.components.expect("components").security_schemes;
        assert!(schemes.contains_key("bearer_auth"));
    }
}
