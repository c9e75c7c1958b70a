pub mod request;
pub mod security_log;
pub mod session;
pub mod user;

pub use request::{request_id, Request, RequestKind, RequestStatus};
pub use security_log::{event, SecurityLogEntry};
pub use session::{SessionFlags, StudentProfile};
pub use user::{NewUser, Role, User};
