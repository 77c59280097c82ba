// Library interface for the komik-crawler API
// This allows tests and external crates to use the extraction pipeline

pub mod app_state;
pub mod config;
pub mod dom;
pub mod error;
pub mod extract;
pub mod http_client;
pub mod metrics;
pub mod models;
pub mod sources;
