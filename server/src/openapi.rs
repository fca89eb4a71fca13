use utoipa::OpenApi;

use crate::{routes, schema};

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::home,
        routes::uploads::get_upload,
        routes::timeline::get_timeline_events,
        routes::timeline::create_timeline_event,
        routes::timeline::delete_timeline_event,
        routes::future_plans::get_future_plans,
        routes::future_plans::create_future_plan,
        routes::future_plans::delete_future_plan,
    ),
    components(schemas(
        schema::TimelineEvent,
        schema::CreateEventForm,
        schema::FuturePlan,
        schema::CreatePlanRequest,
        schema::MessageResponse,
    )),
    tags((name = "chronicle"))
)]
pub struct ApiDoc;
