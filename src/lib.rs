//! Evenue - PostgreSQL party database builder
//!
//! This library crate exposes the configuration, report rendering, and the
//! phased demo run for the binary and for integration testing.

pub mod config;
pub mod demo;
pub mod report;
