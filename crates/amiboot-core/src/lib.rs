//! # amiboot-core
//!
//! I/O-free building blocks for `amiboot`, the tool that makes Amiberry boot
//! straight into a saved configuration instead of its GUI.
//!
//! The tool edits exactly one line of one text file: the `ExecStart=` line of
//! a systemd unit, or the line of a launcher script that runs the emulator.
//! This crate holds everything about that edit that does not touch the disk:
//!
//! - **`target`** – [`TargetDescriptor`]: which file, which line, which part of
//!   the line is the command that must be kept.
//! - **`lines`** – [`TextLines`], a newline-preserving view of a file, plus the
//!   [`locate`] and [`rewrite`] operations.
//! - **`template`** – [`ParameterTemplate`] for the launch parameters and
//!   [`CurrentConfigPattern`] to read back the active configuration.
//! - **`menu`** – the numbered [`Menu`] and parsing of the user's [`Choice`].
//! - **`i18n`** – the English/Spanish message table.
//!
//! File access, console I/O and settings live in the `amiboot` crate.

pub mod i18n;
pub mod lines;
pub mod menu;
pub mod target;
pub mod template;

pub use i18n::{tr, tr_path, Language, MessageKey, UnknownLanguage};
pub use lines::{locate, rewrite, Line, Rewrite, TextLines};
pub use menu::{Choice, ConfigEntry, CurrentConfig, Menu, Selection};
pub use target::{TargetDescriptor, TargetKind};
pub use template::{CurrentConfigPattern, ParamStyle, ParameterTemplate, TemplateError};
