//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Device motion → gravity feed
//! - Storage (LocalStorage on web, see `records::LocalStore`)
//! - Exporting board bodies to the JS physics/scene side

#[cfg(target_arch = "wasm32")]
pub mod web;
