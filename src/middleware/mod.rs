pub mod auth;
pub mod response;

pub use auth::{require_scope, ScopeGuard};
pub use response::{ApiResponse, ApiResult};
