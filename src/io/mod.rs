pub mod output;

pub use output::{create_writer, CoverageWriter, OutputFormat};
