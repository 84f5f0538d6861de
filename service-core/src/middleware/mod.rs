pub mod access_log;
pub mod security_headers;
pub mod tracing;
