use actix_web::http::{header, Method, StatusCode};
use actix_web::{get, web, HttpRequest, HttpResponse};
use serde_json::json;
use tracing::{error, info};

use crate::meta_client::{MetaClient, RelayError};
use crate::models::{CapiPayload, ConversionEvent, EventBody};

#[get("/")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().body("Meta CAPI relay operational")
}

fn header_string(req: &HttpRequest, name: &str) -> String {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

/// First address in X-Forwarded-For is the original client, the rest are
/// proxy hops.
pub fn client_ip(forwarded_for: &str) -> String {
    forwarded_for
        .split(',')
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Accepts a browser conversion event and proxies it to Meta. Registered for
/// all methods so non-POST requests get the 405 + Allow treatment here rather
/// than a bare router response.
pub async fn relay_event(
    client: web::Data<MetaClient>,
    req: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    if req.method() != Method::POST {
        return HttpResponse::MethodNotAllowed()
            .insert_header((header::ALLOW, "POST"))
            .json(json!({ "ok": false, "error": "Method not allowed" }));
    }

    let parsed = EventBody::parse_lenient(&body);

    // precedence: request body, then environment, then none
    let test_event_code = parsed
        .test_event_code
        .clone()
        .filter(|c| !c.is_empty())
        .or_else(|| client.config().test_event_code.clone());

    let event = ConversionEvent::new(
        &parsed,
        client_ip(&header_string(&req, "x-forwarded-for")),
        header_string(&req, "user-agent"),
        header_string(&req, "referer"),
    );
    let event_name = event.event_name.clone();

    let payload = CapiPayload {
        data: vec![event],
        test_event_code,
    };

    match client.send(&payload).await {
        Ok(response) => {
            info!("forwarded {} event to meta", event_name);
            HttpResponse::Ok().json(json!({ "ok": true, "response": response }))
        }
        Err(err @ RelayError::MissingAccessToken) => {
            error!("cannot relay {} event: no access token configured", event_name);
            HttpResponse::InternalServerError()
                .json(json!({ "ok": false, "error": err.to_string() }))
        }
        Err(RelayError::Upstream { status, body }) => {
            error!("meta rejected {} event with status {}", event_name, status);
            let status =
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            HttpResponse::build(status)
                .json(json!({ "ok": false, "source": "meta", "response": body }))
        }
        Err(RelayError::Transport(err)) => {
            error!("transport error reaching meta: {:?}", err);
            let msg = err.to_string();
            let msg = if msg.is_empty() { "Unknown error".into() } else { msg };
            HttpResponse::InternalServerError().json(json!({ "ok": false, "error": msg }))
        }
    }
}
