// Router assembly
// Decision: Every request under the API prefix is rate limited, including unmatched paths;
// /health and the docs are not
// Decision: Unmatched paths and methods get the JSON 404 envelope instead of an empty 404/405

use agentry_core::InferenceGateway;
use axum::{
    extract::{DefaultBodyLimit, OriginalUri},
    http::{Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{self, error, ErrorResponse};
use crate::config::ServerConfig;
use crate::openapi::ApiDoc;
use crate::rate_limit::{rate_limit_middleware, FixedWindowLimiter};
use crate::services::{AgentService, MessageService, SessionService, SystemService};
use crate::storage::InMemoryStore;

/// Shared dependencies injected into every route.
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<InMemoryStore>,
    pub gateway: Arc<dyn InferenceGateway>,
    pub limiter: Arc<FixedWindowLimiter>,
}

impl AppContext {
    pub fn new(
        store: Arc<InMemoryStore>,
        gateway: Arc<dyn InferenceGateway>,
        config: &ServerConfig,
    ) -> Self {
        Self {
            store,
            gateway,
            limiter: Arc::new(FixedWindowLimiter::new(&config.rate_limit)),
        }
    }
}

/// Build the complete application router.
pub fn build_router(ctx: &AppContext, config: &ServerConfig) -> Router {
    let sessions = Arc::new(SessionService::new(ctx.store.clone()));

    let agents_state = api::agents::AppState {
        service: Arc::new(AgentService::new(ctx.store.clone(), ctx.gateway.clone())),
        sessions: sessions.clone(),
    };
    let chat_state = api::chat::AppState {
        messages: Arc::new(MessageService::new(ctx.store.clone(), ctx.gateway.clone())),
        sessions,
    };
    let system_state = api::system::AppState {
        service: Arc::new(SystemService::new(ctx.store.clone())),
    };

    let api_routes = Router::new()
        .merge(api::agents::routes(agents_state))
        .merge(api::chat::routes(chat_state))
        .merge(api::llm_models::routes())
        .merge(api::system::routes(system_state))
        .method_not_allowed_fallback(not_found)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            ctx.limiter.clone(),
            rate_limit_middleware,
        ));

    let app = Router::new()
        .route("/health", get(api::system::health))
        .merge(build_router_with_prefix(api_routes, &config.api_prefix))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    with_common_layers(app, config)
}

/// Fallbacks, error detail, panic recovery, body limit and request tracing.
pub(crate) fn with_common_layers(app: Router, config: &ServerConfig) -> Router {
    let mode = config.mode;
    app.fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(middleware::from_fn_with_state(
            mode,
            error::expose_error_detail,
        ))
        .layer(CatchPanicLayer::custom(
            move |err: Box<dyn Any + Send + 'static>| error::panic_response(mode, err),
        ))
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
}

/// Build router with optional API prefix
fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}

async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> Response {
    ErrorResponse::new("Endpoint not found")
        .with_message(format!("Route {} {} does not exist", method, uri.path()))
        .into_response(StatusCode::NOT_FOUND)
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::config::DeploymentMode;
    use agentry_core::Error;
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_routes() -> Router {
        Router::new().route("/agents", get(|| async { "ok" }))
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_api_prefix_empty() {
        let app = build_router_with_prefix(test_routes(), "");

        let response = app.oneshot(get_request("/agents")).await.unwrap();

        assert_eq!(response.status(), 200);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_api_prefix_set() {
        let app = build_router_with_prefix(test_routes(), "/api");

        // Route should work with prefix
        let response = app.clone().oneshot(get_request("/api/agents")).await.unwrap();
        assert_eq!(response.status(), 200);

        // Route should NOT work without prefix
        let response = app.oneshot(get_request("/agents")).await.unwrap();
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn test_fallback_envelope() {
        let app = with_common_layers(test_routes(), &ServerConfig::default());

        let response = app.oneshot(get_request("/nope?x=1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Endpoint not found");
        assert_eq!(json["message"], "Route GET /nope does not exist");
    }

    #[tokio::test]
    async fn test_wrong_method_gets_not_found_envelope() {
        let app = with_common_layers(test_routes(), &ServerConfig::default());

        let request = Request::builder()
            .method(Method::DELETE)
            .uri("/agents")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = json_body(response).await;
        assert_eq!(json["error"], "Endpoint not found");
        assert_eq!(json["message"], "Route DELETE /agents does not exist");
    }

    fn failing_routes() -> Router {
        Router::new()
            .route(
                "/fail",
                get(|| async {
                    Err::<(), ApiError>(Error::Internal(anyhow::anyhow!("store exploded")).into())
                }),
            )
            .route(
                "/panic",
                get(|| async {
                    if true {
                        panic!("handler blew up");
                    }
                    "unreachable"
                }),
            )
    }

    fn config_with_mode(mode: DeploymentMode) -> ServerConfig {
        ServerConfig {
            mode,
            ..ServerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_internal_error_detail_hidden_in_production() {
        let app = with_common_layers(
            failing_routes(),
            &config_with_mode(DeploymentMode::Production),
        );

        let response = app.clone().oneshot(get_request("/fail")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Internal server error");
        assert_eq!(json["message"], "Something went wrong");

        let response = app.oneshot(get_request("/panic")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["message"], "Something went wrong");
    }

    #[tokio::test]
    async fn test_internal_error_detail_shown_in_development() {
        let app = with_common_layers(
            failing_routes(),
            &config_with_mode(DeploymentMode::Development),
        );

        let response = app.clone().oneshot(get_request("/fail")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["message"], "store exploded");

        let response = app.oneshot(get_request("/panic")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["message"], "handler blew up");
    }
}
