//! BREWCAST — Coffee shop sales and commodity price forecasting
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod estimator;
pub mod registry;
pub mod forecast;
pub mod history;
pub mod dashboard;
