pub mod backend;
pub mod config;
pub mod http_client;
pub mod import;
pub mod resolver;
pub mod row_source;
pub mod teams;
pub mod transform;
