pub mod cli;
pub mod config;
pub mod display;
pub mod lease;

// Reexport
pub use config::ParseOptions;
pub use lease::{LeaseRecord, LeaseTable};
