use crate::auth::auth::AuthUser;
use crate::auth::jwt::verify_token;
use crate::config::Config;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::json;

pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;

    let header_value = match req.headers().get("Authorization") {
        Some(h) => h.to_str().map_err(|_| {
            actix_web::error::ErrorUnauthorized(
                json!({"error": "Invalid Authorization header encoding"}),
            )
        })?,
        None => {
            let resp =
                HttpResponse::Unauthorized().json(json!({"error": "Missing Authorization header"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let token = match header_value.strip_prefix("Bearer ") {
        Some(t) => t,
        None => {
            let resp = HttpResponse::Unauthorized()
                .json(json!({"error": "Authorization header must start with Bearer"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            let resp = HttpResponse::Unauthorized()
                .json(json!({"error": "Invalid or expired token", "details": e.to_string()}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    req.extensions_mut().insert(AuthUser {
        username: claims.sub,
    });

    next.call(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::TokenType;
    use crate::auth::jwt::tests::{SECRET, token};
    use actix_web::http::StatusCode;
    use actix_web::middleware::from_fn;
    use actix_web::{App, test, web};
    use chrono::Duration;

    fn config() -> Config {
        Config {
            database_url: String::new(),
            jwt_secret: SECRET.to_string(),
            server_addr: String::new(),
            db_max_connections: 1,
            rate_protected_per_min: 1000,
            api_prefix: "/api".to_string(),
            log_dir: "logs".to_string(),
            log_level: "debug".to_string(),
        }
    }

    async fn whoami(user: AuthUser) -> String {
        user.username
    }

    #[actix_web::test]
    async fn bearer_subject_reaches_the_handler() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(config()))
                .wrap(from_fn(auth_middleware))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let bearer = format!("Bearer {}", token("pkim", TokenType::Access, Duration::minutes(5)));
        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", bearer))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, web::Bytes::from_static(b"pkim"));
    }

    #[actix_web::test]
    async fn missing_or_bad_tokens_are_unauthorized() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(config()))
                .wrap(from_fn(auth_middleware))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let refresh = format!("Bearer {}", token("pkim", TokenType::Refresh, Duration::minutes(5)));
        let cases = [
            None,
            Some("Token abc".to_string()),
            Some("Bearer not-a-jwt".to_string()),
            Some(refresh),
        ];
        for header in cases {
            let mut req = test::TestRequest::get().uri("/whoami");
            if let Some(value) = header {
                req = req.insert_header(("Authorization", value));
            }
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }
    }
}
