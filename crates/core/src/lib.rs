pub mod config;
pub mod error;
pub mod session;
pub mod types;

pub use config::AppConfig;
pub use error::{LaunchError, LaunchResult};
pub use session::SessionContext;
