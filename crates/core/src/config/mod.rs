//! Configuration loading and schema definitions
//!
//! Settings for location acquisition, local storage and logging.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
