//! Router Module Index
//!
//! Routing logic split by access level so that the authentication layer is
//! applied explicitly at the module boundary rather than per handler.
//! The two modules map directly to the API's access modes.

/// Routes accessible to any client: registration and course reads.
pub mod public;

/// Routes protected by the `AuthUser` extractor middleware.
/// Requires valid basic-auth credentials on every request.
pub mod authenticated;
