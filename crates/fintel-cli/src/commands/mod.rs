//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (engine loading, input files)
//! - `extract` - Field extraction from recognized text
//! - `scan` - OCR a receipt image and draft an expense
//! - `forecast` - Monthly spending forecast
//! - `budget` - Per-category budget recommendations
//! - `categorize` - Keyword categorization
//! - `status` - Capabilities and resolved config

pub mod budget;
pub mod categorize;
pub mod core;
pub mod extract;
pub mod forecast;
pub mod scan;
pub mod status;

// Re-export command functions for main.rs
pub use budget::*;
pub use categorize::*;
pub use core::*;
pub use extract::*;
pub use forecast::*;
pub use scan::*;
pub use status::*;
