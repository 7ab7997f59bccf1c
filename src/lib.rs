pub mod batch;
pub mod cli;
pub mod config;
pub mod converter;
pub mod diagnostics;
pub mod error;
pub mod fetch;
pub mod parser;
pub mod settings;

pub use converter::{Converter, ConverterOptions, FullConfig};
pub use error::ConvertError;
