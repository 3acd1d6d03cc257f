//! Terminal output helpers for the Myco command line
//!
//! - Status messages
//! - Distance and age formatting
//! - Spinners while waiting for a fix

#![warn(missing_docs)]

pub mod output;
pub mod progress;
