use crate::api::{DispatcherData, EngineData, LeaveBackend};
use crate::auth::auth::AuthUser;
use crate::model::Notification;
use crate::workflow::Inbox;
use actix_web::{HttpResponse, Responder};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct InboxResponse {
    /// unread before this listing marked them read
    #[schema(example = 1)]
    pub unread: u64,
    pub notifications: Vec<Notification>,
}

#[derive(Serialize, ToSchema)]
pub struct UnreadResponse {
    #[schema(example = 3)]
    pub unread: u64,
}

/* =========================
Inbox (lists, then marks all read)
========================= */
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Caller's notifications, newest first", body = InboxResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Caller has no employee record")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Notification"
)]
pub async fn list_notifications<B: LeaveBackend>(
    auth: AuthUser,
    engine: EngineData<B>,
    dispatcher: DispatcherData<B>,
) -> actix_web::Result<impl Responder> {
    let employee = engine.employee(&auth.username).await?;
    let inbox = dispatcher.notifier();

    let unread = inbox.unread_count(employee.id).await?;
    let notifications = inbox.list(employee.id).await?;
    let marked = inbox.mark_all_read(employee.id).await?;
    tracing::debug!(employee_id = employee.id, marked, "Inbox marked read");

    Ok(HttpResponse::Ok().json(InboxResponse {
        unread,
        notifications,
    }))
}

/// unread badge count; does not mark anything
#[utoipa::path(
    get,
    path = "/api/notifications/unread",
    responses(
        (status = 200, description = "Number of unread notifications", body = UnreadResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Caller has no employee record")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Notification"
)]
pub async fn unread_count<B: LeaveBackend>(
    auth: AuthUser,
    engine: EngineData<B>,
    dispatcher: DispatcherData<B>,
) -> actix_web::Result<impl Responder> {
    let employee = engine.employee(&auth.username).await?;
    let unread = dispatcher.notifier().unread_count(employee.id).await?;
    Ok(HttpResponse::Ok().json(UnreadResponse { unread }))
}
