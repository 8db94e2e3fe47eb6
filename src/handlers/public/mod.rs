// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Security Level: None
// Middleware: CORS and request tracing only
pub mod drinks;
pub mod health;

pub use drinks::list as drinks_list;
pub use health::health;
