pub mod apis;
pub mod config;
pub mod constants;
pub mod error;
pub mod iconic;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod search;
pub mod server;
pub mod stats;
pub mod storage;
pub mod tasks;
