use crate::api::{DispatcherData, EngineData, LeaveBackend};
use crate::auth::auth::AuthUser;
use crate::model::{LeaveRequest, LeaveStatus};
use crate::workflow::{LeaveApplication, LeaveBalance};
use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct SubmitLeaveResponse {
    #[schema(example = "Leave request submitted")]
    pub message: String,
    #[schema(example = 1)]
    pub id: u64,
    pub status: LeaveStatus,
}

#[derive(Serialize, ToSchema)]
pub struct TransitionResponse {
    #[schema(example = "Leave approved")]
    pub message: String,
    pub request: LeaveRequest,
}

/// Annual-leave position in days; half days show as `.5`.
#[derive(Serialize, ToSchema)]
pub struct BalanceResponse {
    #[schema(example = 15.0)]
    pub total: f64,
    #[schema(example = 4.5)]
    pub used: f64,
    #[schema(example = 10.5)]
    pub remaining: f64,
}

impl From<LeaveBalance> for BalanceResponse {
    fn from(balance: LeaveBalance) -> Self {
        Self {
            total: balance.total.as_f64(),
            used: balance.used.as_f64(),
            remaining: balance.remaining.as_f64(),
        }
    }
}

/* =========================
Submit leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body(
        content = LeaveApplication,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted", body = SubmitLeaveResponse),
        (status = 400, description = "Invalid input or business rule violation", body = Object, example = json!({
            "message": "annual leave balance exceeded: 0.5 day(s) remaining",
            "remaining": 0.5
        })),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Applicant not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn submit_leave<B: LeaveBackend>(
    auth: AuthUser,
    engine: EngineData<B>,
    dispatcher: DispatcherData<B>,
    payload: web::Json<LeaveApplication>,
) -> actix_web::Result<impl Responder> {
    let outcome = engine.submit(&auth.username, payload.into_inner()).await?;
    dispatcher.dispatch(&outcome.notifications).await;

    Ok(HttpResponse::Created().json(SubmitLeaveResponse {
        message: "Leave request submitted".to_string(),
        id: outcome.request.id,
        status: outcome.request.status,
    }))
}

/* =========================
Cancel (applicant only, while pending)
========================= */
#[utoipa::path(
    delete,
    path = "/api/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to cancel")
    ),
    responses(
        (status = 200, description = "Leave request cancelled", body = Object, example = json!({
            "message": "Leave request cancelled"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the applicant, or already processed"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn cancel_leave<B: LeaveBackend>(
    auth: AuthUser,
    engine: EngineData<B>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    engine.cancel(path.into_inner(), &auth.username).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave request cancelled"
    })))
}

/* =========================
Approve (part-leader, then team-leader)
========================= */
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve")
    ),
    responses(
        (status = 200, description = "Leave approved at the caller's tier", body = TransitionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No permission or already processed", body = Object, example = json!({
            "message": "request has already been processed"
        })),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave<B: LeaveBackend>(
    auth: AuthUser,
    engine: EngineData<B>,
    dispatcher: DispatcherData<B>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let outcome = engine.approve(path.into_inner(), &auth.username).await?;
    dispatcher.dispatch(&outcome.notifications).await;

    Ok(HttpResponse::Ok().json(TransitionResponse {
        message: "Leave approved".to_string(),
        request: outcome.request,
    }))
}

/* =========================
Reject
========================= */
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to reject")
    ),
    responses(
        (status = 200, description = "Leave rejected", body = TransitionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No permission or already processed"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave<B: LeaveBackend>(
    auth: AuthUser,
    engine: EngineData<B>,
    dispatcher: DispatcherData<B>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let outcome = engine.reject(path.into_inner(), &auth.username).await?;
    dispatcher.dispatch(&outcome.notifications).await;

    Ok(HttpResponse::Ok().json(TransitionResponse {
        message: "Leave rejected".to_string(),
        request: outcome.request,
    }))
}

/// the caller's own requests, newest start date first
#[utoipa::path(
    get,
    path = "/api/leave",
    responses(
        (status = 200, description = "Leave history of the caller", body = [LeaveRequest]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Caller has no employee record")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_history<B: LeaveBackend>(
    auth: AuthUser,
    engine: EngineData<B>,
) -> actix_web::Result<impl Responder> {
    let requests = engine.history(&auth.username).await?;
    Ok(HttpResponse::Ok().json(requests))
}

#[utoipa::path(
    get,
    path = "/api/leave/balance",
    responses(
        (status = 200, description = "Annual-leave balance of the caller", body = BalanceResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Caller has no employee record")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_balance<B: LeaveBackend>(
    auth: AuthUser,
    engine: EngineData<B>,
) -> actix_web::Result<impl Responder> {
    let balance = engine.balance(&auth.username).await?;
    Ok(HttpResponse::Ok().json(BalanceResponse::from(balance)))
}

/// requests waiting on the caller's approval tier(s)
#[utoipa::path(
    get,
    path = "/api/leave/approvals",
    responses(
        (status = 200, description = "Pending requests the caller may act on", body = [LeaveRequest]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Caller has no employee record")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn pending_approvals<B: LeaveBackend>(
    auth: AuthUser,
    engine: EngineData<B>,
) -> actix_web::Result<impl Responder> {
    let pending = engine.pending_approvals(&auth.username).await?;
    Ok(HttpResponse::Ok().json(pending))
}
