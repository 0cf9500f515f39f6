pub mod args;
pub mod commands;
mod config;
pub mod db;
mod error;
pub mod export;
pub mod handoff;
pub mod model;
mod utils;


pub use config::Config;
pub use error::{Error, ExportFault, Result, StorageFault};
