//! Common test utilities and helpers.
//!
//! This module provides shared functionality for all tests, including:
//! - Payslip page text builders
//! - Directory and settings files for CLI tests
//! - Custom assertions over batches and match results

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
