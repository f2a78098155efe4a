//! amiboot library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # Layers
//!
//! ```text
//! main.rs          CLI, logging, exit codes
//!   application/   the one-shot interactive session
//!   infrastructure/
//!     target_file  read / write the unit or script
//!     catalog      list *.uae files
//!     console      menu output and the single line of input
//!     storage/     TOML settings
//! amiboot-core     pure locate / rewrite / menu / i18n logic
//! ```

pub mod application;
pub mod infrastructure;
