//! Chess Daily Library
//!
//! This module exposes the client, cache, summary and web layers for use by
//! the binary and in integration tests.

pub mod cache;
pub mod cli;
pub mod dashboard;
pub mod data;
pub mod summary;
pub mod web;
