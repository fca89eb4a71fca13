use axum::{extract::DefaultBodyLimit, http::Method, routing::get, Json, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};

use crate::{app_state::SharedState, schema::MessageResponse};

pub mod future_plans;
#[cfg(test)]
mod test;
pub mod timeline;
pub mod uploads;

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, body = MessageResponse)),
)]
pub async fn home() -> Json<MessageResponse> {
    Json(MessageResponse::new("Backend running"))
}

/// All routes with state attached, wrapped in request tracing and a permissive
/// CORS policy for browser frontends on other origins.
/// `max_body_size` limits request bodies (image uploads in practice), `None` means no limit.
pub fn app_router(state: SharedState, max_body_size: Option<u64>) -> Router {
    let body_limit = match max_body_size {
        Some(max) => DefaultBodyLimit::max(usize::try_from(max).unwrap_or(usize::MAX)),
        None => DefaultBodyLimit::disable(),
    };
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any)
        .allow_origin(Any);
    Router::new()
        .route("/", get(home))
        .nest("/uploads", uploads::router())
        .nest("/api/timeline", timeline::router())
        .nest("/api/futureplans", future_plans::router())
        .layer(body_limit)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .set_x_request_id(MakeRequestUuid)
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().include_headers(true))
                        .on_response(DefaultOnResponse::new().include_headers(true)),
                ),
        )
        .layer(cors)
}
