//! dogcam library crate.
//!
//! This module exposes the internal components for integration testing.

pub mod camera;
pub mod config;
pub mod library;
pub mod metadata;
pub mod session;
pub mod terminal;
