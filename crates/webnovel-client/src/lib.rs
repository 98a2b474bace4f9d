#[macro_use]
extern crate log;

pub mod api;
pub mod chapters;
pub mod config;
pub mod context;
pub mod error;
pub mod services;
pub mod storage;
pub mod store;

pub use api::{ApiClient, ApiResponse, ChapterResponse, EpubFile};
pub use chapters::{ChapterController, ChapterSource};
pub use config::ClientConfig;
pub use context::ClientContext;
pub use error::{ApiError, Error};
