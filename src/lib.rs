pub mod admin;
pub mod cli;
pub mod error;
pub mod filter;
pub mod form;
pub mod mapping;

pub use error::{AdminResult, ConfigurationError};
