//! WebSocket inbound adapter.
//!
//! Responsibilities:
//! - validate upgrade requests (configurable origin allow-list)
//! - spawn the per-connection session loop
//! - keep WebSocket-specific concerns at the edge of the system

use actix_web::http::header::ORIGIN;
use actix_web::{get, web, HttpRequest, HttpResponse};
use tracing::{error, warn};

mod session;

pub mod messages;
pub mod state;

/// Handle WebSocket upgrade for the `/ws` endpoint.
#[get("/ws")]
pub async fn ws_entry(
    state: web::Data<state::WsState>,
    req: HttpRequest,
    body: web::Payload,
) -> actix_web::Result<HttpResponse> {
    validate_origin(&req, &state.allowed_origins)?;

    let (response, session, stream) = actix_ws::handle(&req, body)?;
    let state = state.get_ref().clone();
    actix_web::rt::spawn(session::handle_ws_session(state, session, stream));
    Ok(response)
}

/// Reject upgrades from origins outside the configured allow-list. An
/// empty list disables the check for local development; browsers always
/// send Origin, so production deployments should configure it.
fn validate_origin(req: &HttpRequest, allowed: &[String]) -> actix_web::Result<()> {
    if allowed.is_empty() {
        return Ok(());
    }

    let mut origin_iter = req.headers().get_all(ORIGIN);
    let origin_header = origin_iter.next().ok_or_else(|| {
        error!("missing Origin header on WebSocket upgrade");
        actix_web::error::ErrorForbidden("Origin not allowed")
    })?;
    if origin_iter.next().is_some() {
        error!("multiple Origin headers on WebSocket upgrade");
        return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
    }

    let origin = origin_header.to_str().map_err(|err| {
        error!(error = %err, "failed to parse Origin header as string");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if allowed.iter().any(|candidate| candidate == origin) {
        Ok(())
    } else {
        warn!(origin, "rejected WebSocket upgrade due to disallowed Origin");
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    use super::*;

    fn request_with_origin(origin: Option<&str>) -> HttpRequest {
        let mut request = TestRequest::default();
        if let Some(origin) = origin {
            request = request.insert_header((ORIGIN, origin));
        }
        request.to_http_request()
    }

    fn allow_list() -> Vec<String> {
        vec![
            "https://app.crewlink.example".to_owned(),
            "http://localhost:3000".to_owned(),
        ]
    }

    #[rstest]
    #[case("https://app.crewlink.example")]
    #[case("http://localhost:3000")]
    fn accepts_configured_origins(#[case] origin: &str) {
        let request = request_with_origin(Some(origin));
        assert!(validate_origin(&request, &allow_list()).is_ok());
    }

    #[rstest]
    #[case("https://evil.example")]
    #[case("http://localhost:9999")]
    fn rejects_unlisted_origins(#[case] origin: &str) {
        let request = request_with_origin(Some(origin));
        let error = validate_origin(&request, &allow_list()).expect_err("rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn rejects_missing_origin_when_a_list_is_configured() {
        let request = request_with_origin(None);
        let error = validate_origin(&request, &allow_list()).expect_err("rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn an_empty_list_disables_the_check() {
        let request = request_with_origin(None);
        assert!(validate_origin(&request, &[]).is_ok());
    }
}
