pub mod config;
pub mod error;
pub mod types;

pub use config::PortalConfig;
pub use error::ServiceError;
pub use types::{new_id, now_millis, now_rfc3339};
