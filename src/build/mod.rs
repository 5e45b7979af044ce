//! Configure-step building blocks
//!
//! ## Modules
//!
//! - `platform` - Host detection (OS family, address width)
//! - `defines` - Ordered, first-write-wins `-D` define collection
//! - `options` - User options and their aggregation into cmake arguments
//! - `workdir` - Build directory creation, cleaning and entering
//! - `invocation` - The resolved cmake command line and how it is run

pub mod defines;
pub mod invocation;
pub mod options;
pub mod platform;
pub mod workdir;
