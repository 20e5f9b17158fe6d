//! Test module for call-logging
//!
//! This module contains property-based tests using proptest
//! to validate correctness properties of projection, scoping and
//! call interception.


#[cfg(test)]
pub mod scope_tests;


#[cfg(test)]
pub mod config_tests;
