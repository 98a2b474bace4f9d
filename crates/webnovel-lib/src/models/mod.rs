pub mod chapter;
pub use chapter::*;

pub mod content;
pub use content::*;

pub mod novel;
pub use novel::*;

pub mod settings;
pub use settings::*;

pub mod user;
pub use user::*;
