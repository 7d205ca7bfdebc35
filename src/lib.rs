//! Landed cost and customs tax engine for vehicles bought at Japanese
//! auctions and imported into Sri Lanka.

pub mod config;
pub mod error;
pub mod pricing;
pub mod report;

pub use config::Config;
pub use error::{AppError, Result};
