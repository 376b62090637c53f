//! Techshop storefront library.
//!
//! Catalog browsing, a session-bound shopping cart and checkout, served as
//! server-rendered HTML. The binary in `main.rs` only wires configuration,
//! logging and the listener around [`routes::app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod seed;
pub mod specs;
pub mod state;
