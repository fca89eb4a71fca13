use diesel::{Queryable, Selectable};

use crate::model::{TimelineEvent, TimelineEventId};

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = super::super::schema::timeline)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbTimelineEvent {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub date: String,
    pub image_url: Option<String>,
}

impl From<DbTimelineEvent> for TimelineEvent {
    fn from(value: DbTimelineEvent) -> Self {
        TimelineEvent {
            id: TimelineEventId(value.id),
            title: value.title,
            description: value.description,
            date: value.date,
            image_url: value.image_url,
        }
    }
}
