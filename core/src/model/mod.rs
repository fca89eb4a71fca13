pub mod repository;

mod future_plan;
mod id_types;
mod timeline_event;
pub use future_plan::*;
pub use id_types::*;
pub use timeline_event::*;
