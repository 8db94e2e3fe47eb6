// handlers/mod.rs - two security tiers
//
// Public (no token) and protected (bearer token with a route-specific scope).
pub mod protected;
pub mod public;
