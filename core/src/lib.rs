pub mod config;
pub mod model;
pub mod storage;
pub mod upload;
