//! CLI layer: argument parsing, output and the top-level driver

pub mod args;
pub mod driver;
pub mod error;
pub mod output;
pub mod parser;

pub use args::{Options, VERSION};
pub use driver::{Completion, Driver, Outcome, Phase};
pub use error::{CliError, ParseError};
pub use parser::{parse, Parsed};
