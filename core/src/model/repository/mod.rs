pub mod db;
pub mod db_entity;
pub mod future_plan;
mod schema;
#[cfg(test)]
mod test;
pub mod timeline_event;
