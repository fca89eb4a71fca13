use diesel::prelude::*;
use eyre::{Context, Result};
use tracing::instrument;

use crate::model::{CreateTimelineEvent, TimelineEvent, TimelineEventId};

use super::db::DbConn;
use super::db_entity::DbTimelineEvent;
use super::schema;

/// All events, latest `date` first.
#[instrument(skip(conn), level = "trace")]
pub fn get_timeline_events(conn: &mut DbConn) -> Result<Vec<TimelineEvent>> {
    use schema::timeline;
    let db_events: Vec<DbTimelineEvent> = timeline::table
        .select(DbTimelineEvent::as_select())
        .order_by(timeline::date.desc())
        .load(conn)
        .wrap_err("could not query table timeline")?;
    Ok(db_events.into_iter().map(TimelineEvent::from).collect())
}

#[instrument(skip(conn), level = "debug")]
pub fn insert_timeline_event(
    conn: &mut DbConn,
    event: &CreateTimelineEvent,
) -> Result<TimelineEventId> {
    use schema::timeline;
    let id = diesel::insert_into(timeline::table)
        .values((
            timeline::title.eq(&event.title),
            timeline::description.eq(&event.description),
            timeline::date.eq(&event.date),
            timeline::image_url.eq(event.image_url.as_deref()),
        ))
        .returning(timeline::id)
        .get_result(conn)
        .wrap_err("could not insert into table timeline")?;
    Ok(TimelineEventId(id))
}

/// Returns the number of deleted rows, which is 0 if no event had this id.
#[instrument(skip(conn), level = "debug")]
pub fn delete_timeline_event(conn: &mut DbConn, id: TimelineEventId) -> Result<usize> {
    use schema::timeline;
    diesel::delete(timeline::table.find(id.0))
        .execute(conn)
        .wrap_err("could not delete from table timeline")
}
