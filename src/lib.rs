//! Skycast Library
//!
//! This module exposes the normalization pipeline, estimators, and API
//! client for use in integration tests.

pub mod aggregate;
pub mod cli;
pub mod data;
pub mod estimators;
pub mod fallback;
pub mod normalize;
pub mod units;
