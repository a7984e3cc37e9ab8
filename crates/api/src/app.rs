use async_graphql::{ObjectType, Schema, SubscriptionType};
use axum::{
    extract::{Request, State},
    http::{
        header::{HeaderValue, CONTENT_TYPE},
        Method, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::error::AppError;
use crate::state::AppState;

const MAX_GRAPHQL_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Build the Axum router with health endpoint and GraphQL.
/// Generic over the schema roots so tests can mount the same router.
pub fn build_router<Q, M, S>(state: AppState, schema: Schema<Q, M, S>) -> Router
where
    Q: ObjectType + Send + Sync + 'static,
    M: ObjectType + Send + Sync + 'static,
    S: SubscriptionType + Send + Sync + 'static,
{
    let request_timeout = state.config().request_timeout;
    let origins: Vec<HeaderValue> = state
        .config()
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    Router::new()
        // Simple liveness check; also proves DB connectivity.
        .route("/health", get(health))
        .route(
            "/graphql",
            post(move |req| graphql_handler(req, schema)),
        )
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([CONTENT_TYPE]),
        )
}

/// Reads the JSON body and runs it against the schema. Transport errors are
/// plain HTTP errors; everything else is a GraphQL response.
async fn graphql_handler<Q, M, S>(req: Request, schema: Schema<Q, M, S>) -> Result<Response, AppError>
where
    Q: ObjectType + Send + Sync + 'static,
    M: ObjectType + Send + Sync + 'static,
    S: SubscriptionType + Send + Sync + 'static,
{
    let (_parts, body) = req.into_parts();
    let body_bytes = axum::body::to_bytes(body, MAX_GRAPHQL_BODY_BYTES)
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read request body: {}", e)))?;

    let gql_request: async_graphql::Request = serde_json::from_slice(&body_bytes)
        .map_err(|e| AppError::BadRequest(format!("Invalid GraphQL request: {}", e)))?;

    let gql_response = schema.execute(gql_request).await;

    Ok(Json(gql_response).into_response())
}

/// Liveness + quick DB probe.
async fn health(State(state): State<AppState>) -> Result<&'static str, AppError> {
    let _one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&state.db).await?;
    Ok("ok")
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
