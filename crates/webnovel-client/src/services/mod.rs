pub mod auth;
pub use auth::AuthService;

pub mod library;
pub use library::LibraryService;

pub mod settings;
pub use settings::SettingsService;
