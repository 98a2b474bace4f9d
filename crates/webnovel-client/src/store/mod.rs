//! Explicit state containers shared between services and the presentation
//! layer. Each store is a cheap handle: clones observe the same state.

pub mod auth;
pub use auth::AuthStore;

pub mod novels;
pub use novels::{NovelStore, QueryStatus};

pub mod settings;
pub use settings::SettingsStore;
