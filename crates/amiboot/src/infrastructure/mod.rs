//! Infrastructure layer: everything that touches the file system or the
//! terminal.
//!
//! # What does NOT belong here?
//!
//! - Deciding which line to change or what to change it to (that is
//!   `amiboot-core`)
//! - The order of prompts and messages (that is the application layer)

pub mod catalog;
pub mod console;
pub mod storage;
pub mod target_file;

pub use catalog::{CatalogError, ConfigCatalog, DirectoryCatalog};
pub use console::{Console, LineConsole};
pub use target_file::{read_target, write_target, TargetFileError, WriteMode};
