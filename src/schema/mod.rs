//! Schema module - Configuration, parameter and vocabulary types.

mod config;
mod outcome;
mod params;
mod vocabulary;

pub use config::*;
pub use outcome::*;
pub use params::*;
pub use vocabulary::*;
