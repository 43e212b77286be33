pub mod config;
pub mod context;
pub mod errors;
pub mod github;
pub mod logging;
pub mod logs;
pub mod repo;
pub mod tickets;
