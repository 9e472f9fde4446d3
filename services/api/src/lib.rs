//! Invite-only image host
//!
//! Users register with an invite code, log in with a cookie-carried session
//! token and upload images that are served back under short public codes.
//! The binary in `main.rs` wires configuration, state and router together;
//! everything else lives here so integration tests can drive the router.

pub mod config;
pub mod error;
pub mod messages;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod storage;
pub mod views;
