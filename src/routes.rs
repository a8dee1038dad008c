use crate::{
    api::{LeaveBackend, leave_request, notification},
    auth::middleware::auth_middleware,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

/// Per-peer-IP limiter allowing `requests_per_min` with an equal burst.
fn build_limiter(requests_per_min: u32) -> Option<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
    let requests_per_min = requests_per_min.max(1);
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(60_000 / requests_per_min as u64)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()?;
    Some(Governor::new(&cfg))
}

pub fn configure<B: LeaveBackend>(cfg: &mut web::ServiceConfig, config: &Config) {
    let leave = web::scope("/leave")
        // /leave
        .service(
            web::resource("")
                .route(web::get().to(leave_request::leave_history::<B>))
                .route(web::post().to(leave_request::submit_leave::<B>)),
        )
        // fixed segments before /{id}
        .service(web::resource("/balance").route(web::get().to(leave_request::leave_balance::<B>)))
        .service(
            web::resource("/approvals")
                .route(web::get().to(leave_request::pending_approvals::<B>)),
        )
        // /leave/{id}
        .service(
            web::resource("/{id}").route(web::delete().to(leave_request::cancel_leave::<B>)),
        )
        // /leave/{id}/approve
        .service(
            web::resource("/{id}/approve")
                .route(web::put().to(leave_request::approve_leave::<B>)),
        )
        // /leave/{id}/reject
        .service(
            web::resource("/{id}/reject").route(web::put().to(leave_request::reject_leave::<B>)),
        );

    let notifications = web::scope("/notifications")
        .service(
            web::resource("").route(web::get().to(notification::list_notifications::<B>)),
        )
        .service(
            web::resource("/unread").route(web::get().to(notification::unread_count::<B>)),
        );

    // Protected routes
    let protected = web::scope(&config.api_prefix)
        .wrap(from_fn(auth_middleware)) // authentication
        .service(leave)
        .service(notifications);

    match build_limiter(config.rate_protected_per_min) {
        Some(limiter) => cfg.service(protected.wrap(limiter)), // rate limiting
        None => {
            tracing::warn!(
                rate = config.rate_protected_per_min,
                "Rate limiter rejected its configuration, serving without one"
            );
            cfg.service(protected)
        }
    };
}
