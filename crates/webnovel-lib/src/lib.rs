pub mod datetime;
pub mod error;
pub mod models;
pub mod prelude;

/// Version of the shared models, sent as part of the client user agent
pub static LIB_VERSION: &str = env!("CARGO_PKG_VERSION");
