pub mod config;
pub mod coords;
pub mod finder;
pub mod ingest;
pub mod rtml;

pub use config::Config;
