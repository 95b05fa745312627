//! Domain services used by page and API routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and the in-memory tables so route
//! handlers can stay focused on cookies, redirects and JSON shaping.

pub mod auth;
pub mod courses;
pub mod http_auth;
pub mod mock_auth;
pub mod users;
