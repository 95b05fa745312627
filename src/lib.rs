//! Edu-LMS: authentication, session handling and role-based access control
//! for a learning management system, served over Axum.

pub mod api_client;
pub mod config;
pub mod guard;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod token_store;
pub mod types;
