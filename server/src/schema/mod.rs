pub mod future_plan;
pub mod message;
pub mod timeline_event;
pub use future_plan::*;
pub use message::*;
pub use timeline_event::*;
