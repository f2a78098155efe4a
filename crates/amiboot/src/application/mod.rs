//! Application layer for amiboot.
//!
//! The application layer orchestrates one run of the tool: it knows *what*
//! to show and *when* to write, but delegates file access and terminal I/O to
//! the infrastructure layer and line handling to `amiboot-core`.
//!
//! # Responsibilities
//!
//! - Driving the present → prompt → apply/quit/reject sequence exactly once
//! - Mapping every outcome and failure to its process exit code
//! - Choosing the localized message for each fatal condition

pub mod session;

pub use session::{exit_code, run, Outcome, SessionError, SessionSettings};
