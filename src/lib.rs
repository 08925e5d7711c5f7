pub mod config;
pub mod error;
pub mod frontend;
pub mod model;
pub mod registry;
pub mod server;
pub mod telemetry;

pub use error::{Error, Result};
