//! Data model for the console API

mod agent;
mod insurer;

pub use agent::*;
pub use insurer::*;
