use axum::{
    extract::{Multipart, State},
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, Instrument};

use chronicle_core::{
    model::{self, repository},
    upload,
};

use crate::{
    app_state::SharedState,
    extractors::RowId,
    http_error::ApiResult,
    schema::{CreateEventForm, MessageResponse, TimelineEvent},
};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(get_timeline_events).post(create_timeline_event))
        .route("/:id", delete(delete_timeline_event))
}

#[utoipa::path(
    get,
    path = "/api/timeline",
    responses((status = 200, body = Vec<TimelineEvent>, description = "All events, latest date first")),
)]
#[tracing::instrument(skip(app_state))]
pub async fn get_timeline_events(
    State(app_state): State<SharedState>,
) -> ApiResult<Json<Vec<TimelineEvent>>> {
    let events: Vec<TimelineEvent> = app_state
        .db
        .interact(repository::timeline_event::get_timeline_events)
        .in_current_span()
        .await?
        .into_iter()
        .map(TimelineEvent::from)
        .collect();
    Ok(Json(events))
}

#[utoipa::path(
    post,
    path = "/api/timeline",
    request_body(content = CreateEventForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, body = String, description = "Missing form field"),
    ),
)]
#[tracing::instrument(skip(app_state, multipart))]
pub async fn create_timeline_event(
    State(app_state): State<SharedState>,
    multipart: Multipart,
) -> ApiResult<Json<MessageResponse>> {
    let form = CreateEventForm::from_multipart(multipart).await?;
    let image_url = match &form.image {
        Some(image) => {
            upload::save_image(&app_state.uploads, image.file_name.as_deref(), &image.data)
                .await?
        }
        None => None,
    };
    let create_event = model::CreateTimelineEvent {
        title: form.title,
        description: form.description,
        date: form.date,
        image_url,
    };
    let id = app_state
        .db
        .interact(move |conn| {
            repository::timeline_event::insert_timeline_event(conn, &create_event)
        })
        .in_current_span()
        .await?;
    info!(%id, "added timeline event");
    Ok(Json(MessageResponse::new("Event added successfully!")))
}

#[utoipa::path(
    delete,
    path = "/api/timeline/{id}",
    responses(
        (status = 200, body = MessageResponse, description = "Also returned if there was no such event"),
        (status = NOT_FOUND, body = String, description = "Id is not a non-negative integer"),
    ),
    params(("id" = i64, Path, description = "TimelineEventId")),
)]
#[tracing::instrument(skip(app_state))]
pub async fn delete_timeline_event(
    RowId(id): RowId,
    State(app_state): State<SharedState>,
) -> ApiResult<Json<MessageResponse>> {
    let event_id = model::TimelineEventId(id);
    let deleted = app_state
        .db
        .interact(move |conn| repository::timeline_event::delete_timeline_event(conn, event_id))
        .in_current_span()
        .await?;
    info!(%event_id, deleted, "deleted timeline event");
    Ok(Json(MessageResponse::new(format!(
        "Event {} deleted successfully!",
        id
    ))))
}
