mod future_plan;
mod timeline_event;

pub use future_plan::*;
pub use timeline_event::*;
