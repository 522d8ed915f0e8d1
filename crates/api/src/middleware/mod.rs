//! HTTP middleware stack for the API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. CORS (permissive - the API is consumed cross-origin)
//! 4. Request ID (add unique ID to each request)
//!
//! Authentication is not a layer: handlers opt in per-route via the
//! [`auth::RequireAuth`] / [`auth::RequireAdmin`] extractors, leaving the
//! public read paths untouched.

pub mod auth;
pub mod request_id;

pub use auth::{CurrentUser, OptionalAuth, RequireAdmin, RequireAuth};
pub use request_id::request_id_middleware;
