use axum::{
    extract::State,
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, Instrument};

use chronicle_core::model::{self, repository};

use crate::{
    app_state::SharedState,
    extractors::RowId,
    http_error::ApiResult,
    schema::{CreatePlanRequest, FuturePlan, MessageResponse},
};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(get_future_plans).post(create_future_plan))
        .route("/:id", delete(delete_future_plan))
}

#[utoipa::path(
    get,
    path = "/api/futureplans",
    responses((status = 200, body = Vec<FuturePlan>, description = "All plans, newest first")),
)]
#[tracing::instrument(skip(app_state))]
pub async fn get_future_plans(
    State(app_state): State<SharedState>,
) -> ApiResult<Json<Vec<FuturePlan>>> {
    let plans: Vec<FuturePlan> = app_state
        .db
        .interact(repository::future_plan::get_future_plans)
        .in_current_span()
        .await?
        .into_iter()
        .map(FuturePlan::from)
        .collect();
    Ok(Json(plans))
}

#[utoipa::path(
    post,
    path = "/api/futureplans",
    request_body = CreatePlanRequest,
    responses((status = 200, body = MessageResponse)),
)]
#[tracing::instrument(skip(app_state))]
pub async fn create_future_plan(
    State(app_state): State<SharedState>,
    Json(request): Json<CreatePlanRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let create_plan: model::CreateFuturePlan = request.into();
    let id = app_state
        .db
        .interact(move |conn| repository::future_plan::insert_future_plan(conn, &create_plan))
        .in_current_span()
        .await?;
    info!(%id, "added future plan");
    Ok(Json(MessageResponse::new("Plan added successfully!")))
}

#[utoipa::path(
    delete,
    path = "/api/futureplans/{id}",
    responses(
        (status = 200, body = MessageResponse, description = "Also returned if there was no such plan"),
        (status = NOT_FOUND, body = String, description = "Id is not a non-negative integer"),
    ),
    params(("id" = i64, Path, description = "FuturePlanId")),
)]
#[tracing::instrument(skip(app_state))]
pub async fn delete_future_plan(
    RowId(id): RowId,
    State(app_state): State<SharedState>,
) -> ApiResult<Json<MessageResponse>> {
    let plan_id = model::FuturePlanId(id);
    let deleted = app_state
        .db
        .interact(move |conn| repository::future_plan::delete_future_plan(conn, plan_id))
        .in_current_span()
        .await?;
    info!(%plan_id, deleted, "deleted future plan");
    Ok(Json(MessageResponse::new(format!(
        "Plan {} deleted successfully!",
        id
    ))))
}
