// * Operations: logging infrastructure for the library and the CLI

pub mod telemetry;

// * Re-exports for convenient access
pub use telemetry::{init_tracing, init_tracing_pretty, init_tracing_with_level};
