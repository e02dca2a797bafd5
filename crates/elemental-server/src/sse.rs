//! HTTP router, auth middleware and the SSE progress stream

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode},
    middleware::{self, Next},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Router,
};
use elemental_core::{ProgressSink, SearchProgress};
use futures::stream::Stream;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;

use crate::error::ApiError;
use crate::handlers::{health, list_elements, run_search, search};
use crate::payload::{SearchRequest, SearchResponse};
use crate::server::AppState;

/// Maximum request body size (64KB)
const MAX_BODY_SIZE: usize = 64 * 1024;

/// Auth middleware - validates Bearer token if configured
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: Request<Body>,
    next: Next,
) -> Response {
    // Skip auth for health endpoint
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    // No token configured: localhost mode
    let Some(expected) = &state.config().auth_token else {
        return next.run(request).await;
    };

    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match token {
        Some(token) if token == expected => next.run(request).await,
        Some(_) => (StatusCode::UNAUTHORIZED, "Invalid token").into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            "Missing or invalid Authorization header",
        )
            .into_response(),
    }
}

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // Restrictive CORS: only allow localhost origins
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
            HeaderValue::from_static("http://localhost:8080"),
            HeaderValue::from_static("http://127.0.0.1:8080"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(health))
        .route("/elements", get(list_elements))
        .route("/search", post(search))
        .route("/search/stream", get(search_stream))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
}

/// Aborts the search when the client goes away
struct SearchJob(JoinHandle<Result<SearchResponse, ApiError>>);

impl Drop for SearchJob {
    fn drop(&mut self) {
        self.0.abort();
    }
}

enum Update {
    Progress(SearchProgress),
    Done(Result<SearchResponse, String>),
}

/// Stream `progress` events while searching, then one `result` (or
/// `error`) event
async fn search_stream(
    State(state): State<Arc<AppState>>,
    Query(request): Query<SearchRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    // Reject bad parameters before the stream starts
    request.strategy()?;

    let (sink, mut rx) = ProgressSink::channel(state.config().progress_capacity);
    let task_state = state.clone();
    let mut job = SearchJob(tokio::spawn(async move {
        run_search(&task_state, &request, Some(sink)).await
    }));

    let stream = async_stream::stream! {
        loop {
            let update = tokio::select! {
                biased;
                Some(progress) = rx.recv() => Update::Progress(progress),
                joined = &mut job.0 => Update::Done(match joined {
                    Ok(Ok(response)) => Ok(response),
                    Ok(Err(err)) => Err(err.to_string()),
                    Err(err) => Err(format!("search task failed: {}", err)),
                }),
            };

            match update {
                Update::Progress(progress) => {
                    if let Ok(data) = serde_json::to_string(&progress) {
                        yield Ok(Event::default().event("progress").data(data));
                    }
                }
                Update::Done(Ok(response)) => {
                    match serde_json::to_string(&response) {
                        Ok(data) => yield Ok(Event::default().event("result").data(data)),
                        Err(err) => yield Ok(Event::default().event("error").data(err.to_string())),
                    }
                    break;
                }
                Update::Done(Err(message)) => {
                    yield Ok(Event::default().event("error").data(message));
                    break;
                }
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::ServerConfig;
    use axum::body::to_bytes;
    use elemental_core::{Element, ElementsDatabase};
    use elemental_search::SearchConfig;
    use tower::ServiceExt;

    fn db() -> Arc<ElementsDatabase> {
        Arc::new(ElementsDatabase::new(vec![
            Element::new("Air", "Starting elements"),
            Element::new("Water", "Starting elements"),
            Element::new("Fire", "Starting elements"),
            Element::new("Earth", "Starting elements"),
            Element::new("Steam", "Tier 1 elements").with_recipe("Water", "Fire"),
            Element::new("Energy", "Tier 1 elements").with_recipe("Fire", "Air"),
            Element::new("Cloud", "Tier 2 elements")
                .with_recipe("Steam", "Air")
                .with_recipe("Water", "Air"),
        ]))
    }

    fn router_with(config: ServerConfig) -> Router {
        let search = SearchConfig::default().with_workers(2);
        create_router(Arc::new(AppState::new(db(), search, config)))
    }

    fn router() -> Router {
        router_with(ServerConfig::default())
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = router().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["elements"], 7);
    }

    #[tokio::test]
    async fn test_elements_listing() {
        let response = router().oneshot(get("/elements")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["name"].as_str().unwrap())
            .collect();
        assert_eq!(names.len(), 7);
        assert_eq!(names[0], "Air");
        assert!(names.windows(2).all(|w| w[0] <= w[1]));

        let response = router().oneshot(get("/elements?like=stea")).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body[0]["name"], "Steam");
        assert_eq!(body[0]["isBasic"], false);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_single_search() {
        let request = post_json("/search", serde_json::json!({ "target": "Steam" }));
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["recipes"].as_array().unwrap().len(), 1);
        assert_eq!(body["recipes"][0][0]["result"], "Steam");
        assert!(body["visitedNodes"].as_u64().unwrap() >= 2);
        assert!(body.get("elapsedTime").is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_multiple_search() {
        let request = post_json(
            "/search",
            serde_json::json!({ "target": "Steam", "mode": "multiple", "maxRecipes": 3, "deadlineSeconds": 5 }),
        );
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["recipes"].as_array().unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_unknown_target_suggests_names() {
        let request = post_json("/search", serde_json::json!({ "target": "stm" }));
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["visitedNodes"], 0);
        assert!(body["recipes"].as_array().unwrap().is_empty());
        let suggestions = body["suggestions"].as_array().unwrap();
        assert!(suggestions.iter().any(|s| s == "Steam"));
    }

    #[tokio::test]
    async fn test_invalid_requests() {
        let request = post_json(
            "/search",
            serde_json::json!({ "target": "Cloud", "mode": "multiple", "maxRecipes": 0 }),
        );
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("At least one path"));

        let request = post_json(
            "/search",
            serde_json::json!({ "target": "Cloud", "method": "bidir" }),
        );
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_auth_token() {
        let config = ServerConfig {
            auth_token: Some("secret".to_string()),
            ..ServerConfig::default()
        };

        let response = router_with(config.clone()).oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router_with(config.clone()).oneshot(get("/elements")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let request = Request::builder()
            .uri("/elements")
            .header(header::AUTHORIZATION, "Bearer secret")
            .body(Body::empty())
            .unwrap();
        let response = router_with(config).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_search_stream() {
        let response = router()
            .oneshot(get("/search/stream?target=Cloud"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/event-stream"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("event: progress"));
        assert!(text.contains("event: result"));
        assert!(text.contains("\"target\":\"Cloud\""));
    }

    #[tokio::test]
    async fn test_search_stream_rejects_unknown_method() {
        let response = router()
            .oneshot(get("/search/stream?target=Cloud&method=astar"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
