//! pokegrid - paginated PokeAPI catalog browser
//!
//! The library exposes the app's modules for the binary and for testing.

pub mod action;
pub mod api;
pub mod components;
pub mod config;
pub mod coordinator;
pub mod effect;
pub mod logging;
pub mod reducer;
pub mod sprite;
pub mod state;
