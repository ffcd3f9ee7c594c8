//! Management API: traffic query and kick.
//!
//! Every request must carry the configured secret verbatim in the
//! `Authorization` header.
//!
//! - `GET /` returns a short HTML banner.
//! - `GET /traffic?clear=1|true|..` returns `{"<key>": {"tx": .., "rx": ..}}`,
//!   draining the counters when `clear` is set.
//! - `POST /kick` takes a JSON array of keys and marks each for a one-shot kick.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tally_agent::{CounterStore, Snapshot};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::ServerError;

const INDEX_HTML: &str = concat!(
    "<html><head><title>tally</title></head><body>",
    "<h1>tally traffic stats</h1>",
    "<p>GET /traffic to query per-identity counters, POST /kick to disconnect identities.</p>",
    "</body></html>"
);

#[derive(Clone)]
struct ApiState {
    store: CounterStore,
    secret: Option<Arc<str>>,
}

#[derive(Deserialize)]
struct TrafficQuery {
    #[serde(default)]
    clear: Option<String>,
}

/// Lenient boolean: `1`, `t`, `true` in any common casing are true;
/// anything else, including empty or garbage, is false.
fn parse_flag(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "t" | "T" | "true" | "TRUE" | "True"))
}

/// Build the management API router.
///
/// With `secret` unset no `Authorization` check is made.
pub fn api_routes(store: CounterStore, secret: Option<String>) -> Router {
    let state = ApiState {
        store,
        secret: secret.map(Arc::from),
    };
    Router::new()
        .route("/", get(handle_index))
        .route("/traffic", get(handle_traffic))
        .route("/kick", post(handle_kick))
        .fallback(handle_not_found)
        .method_not_allowed_fallback(handle_not_found)
        .layer(middleware::from_fn_with_state(state.clone(), require_secret))
        .with_state(state)
}

/// Serve the management API until `shutdown` is cancelled.
pub async fn serve(
    listen: &str,
    router: Router,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    let listener = TcpListener::bind(listen).await?;
    info!(addr = %listen, "management API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            debug!("management API shutting down");
        })
        .await?;
    Ok(())
}

async fn require_secret(State(state): State<ApiState>, req: Request, next: Next) -> Response {
    if let Some(secret) = &state.secret {
        let presented = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        if presented != Some(secret.as_ref()) {
            return StatusCode::UNAUTHORIZED.into_response();
        }
    }
    next.run(req).await
}

async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn handle_traffic(
    State(state): State<ApiState>,
    Query(q): Query<TrafficQuery>,
) -> Json<Snapshot> {
    Json(state.store.snapshot(parse_flag(q.clear.as_deref())))
}

async fn handle_kick(State(state): State<ApiState>, body: Bytes) -> StatusCode {
    let keys: Vec<String> = match serde_json::from_slice(&body) {
        Ok(keys) => keys,
        Err(e) => {
            debug!(error = %e, "malformed kick request");
            return StatusCode::BAD_REQUEST;
        }
    };
    let count = state.store.mark_kick_batch(keys);
    tally_metrics::record_kicks(count);
    info!(count, "identities marked for kick");
    StatusCode::OK
}

async fn handle_not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tally_agent::CounterEntry;
    use tower::ServiceExt;

    use super::*;

    fn request(method: &str, uri: &str, auth: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header("Authorization", auth);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn wrong_or_missing_secret_is_unauthorized() {
        let router = api_routes(CounterStore::new(), Some("s3cret".into()));

        let resp = router
            .clone()
            .oneshot(request("GET", "/traffic", None, ""))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = router
            .clone()
            .oneshot(request("GET", "/traffic", Some("wrong"), ""))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = router
            .oneshot(request("GET", "/missing", None, ""))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn index_serves_html() {
        let router = api_routes(CounterStore::new(), Some("s".into()));
        let resp = router
            .oneshot(request("GET", "/", Some("s"), ""))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let ctype = resp.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(ctype.starts_with("text/html"));
    }

    #[tokio::test]
    async fn traffic_query_with_and_without_clear() {
        let store = CounterStore::new();
        store.record("1", 100, 50);
        let router = api_routes(store.clone(), Some("s".into()));

        let resp = router
            .clone()
            .oneshot(request("GET", "/traffic", Some("s"), ""))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({"1": {"tx": 100, "rx": 50}})
        );
        assert_eq!(store.len(), 1);

        let resp = router
            .oneshot(request("GET", "/traffic?clear=true", Some("s"), ""))
            .await
            .unwrap();
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({"1": {"tx": 100, "rx": 50}})
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn traffic_clear_flag_is_lenient() {
        for (query, drains) in [
            ("clear=1", true),
            ("clear=TRUE", true),
            ("clear=t", true),
            ("clear=", false),
            ("clear=0", false),
            ("clear=yes", false),
        ] {
            let store = CounterStore::new();
            store.record("1", 3, 4);
            let router = api_routes(store.clone(), None);

            let resp = router
                .oneshot(request("GET", &format!("/traffic?{query}"), None, ""))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK, "{query}");
            assert_eq!(
                body_json(resp).await,
                serde_json::json!({"1": {"tx": 3, "rx": 4}}),
                "{query}"
            );
            assert_eq!(store.is_empty(), drains, "{query}");
        }
    }

    #[test]
    fn parse_flag_accepts_common_spellings() {
        for v in ["1", "t", "T", "true", "TRUE", "True"] {
            assert!(parse_flag(Some(v)), "{v}");
        }
        for v in ["", "0", "f", "false", "yes", "tRuE"] {
            assert!(!parse_flag(Some(v)), "{v}");
        }
        assert!(!parse_flag(None));
    }

    #[tokio::test]
    async fn kick_marks_keys() {
        let store = CounterStore::new();
        let router = api_routes(store.clone(), None);

        let resp = router
            .oneshot(request("POST", "/kick", None, r#"["1","2"]"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(store.is_kicked("1"));
        assert!(store.is_kicked("2"));
        assert!(!store.record("1", 1, 1));
        assert!(store.record("1", 1, 1));
        assert_eq!(store.snapshot(false)["1"], CounterEntry::new(1, 1));
    }

    #[tokio::test]
    async fn malformed_kick_is_bad_request() {
        let store = CounterStore::new();
        let router = api_routes(store.clone(), None);

        let resp = router
            .clone()
            .oneshot(request("POST", "/kick", None, "not json"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = router
            .oneshot(request("POST", "/kick", None, r#"{"id":"1"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(!store.is_kicked("1"));
    }

    #[tokio::test]
    async fn unknown_path_or_method_is_not_found() {
        let router = api_routes(CounterStore::new(), None);
        for (method, uri) in [
            ("GET", "/nope"),
            ("POST", "/traffic"),
            ("GET", "/kick"),
            ("POST", "/"),
            ("DELETE", "/kick"),
        ] {
            let resp = router
                .clone()
                .oneshot(request(method, uri, None, ""))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn wrong_method_still_requires_secret() {
        let router = api_routes(CounterStore::new(), Some("s".into()));
        let resp = router
            .oneshot(request("POST", "/traffic", None, ""))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
