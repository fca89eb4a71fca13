use super::TimelineEventId;

/// A dated entry on the timeline. `date` is stored as the client sent it and
/// only ever compared as a string, so ISO-8601 dates sort chronologically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimelineEvent {
    pub id: TimelineEventId,
    pub title: String,
    pub description: String,
    pub date: String,
    /// Relative URL under `/uploads`
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CreateTimelineEvent {
    pub title: String,
    pub description: String,
    pub date: String,
    pub image_url: Option<String>,
}
