//! The `tasknest` library crate.
//!
//! A single-tenant task-tracking REST API: users exchange credentials for an
//! opaque bearer token, then create, read, update, and delete task records
//! scoped to their own account. The crate holds the domain models, the auth
//! stack (tokens, passwords, guard middleware), the task service, the field
//! validation engine, the wire projections, and the route handlers; the
//! `main` binary wires them into an HTTP server and `seed` populates a
//! development database.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod resources;
pub mod routes;
pub mod tasks;
pub mod validation;
