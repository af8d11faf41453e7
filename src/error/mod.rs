mod app;
mod config;
mod http;
mod session;
mod trace;
mod validation;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use http::HttpError;
pub use session::SessionError;
pub use trace::TraceError;
pub use validation::ValidationError;
