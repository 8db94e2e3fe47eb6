// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every route here is wrapped in `require_scope` with its own permission,
// so handlers only run for authorized requests and can read `Claims`
// from request extensions.
pub mod drinks;

pub use drinks::create as drinks_create;
pub use drinks::delete as drinks_delete;
pub use drinks::detail as drinks_detail;
pub use drinks::update as drinks_update;
