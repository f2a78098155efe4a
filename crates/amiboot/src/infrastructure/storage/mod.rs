//! Storage infrastructure: the TOML settings file.
//!
//! The `config` sub-module reads the settings file, supplies the original
//! DietPi paths as defaults when no file exists, and turns the raw settings
//! into validated [`SessionSettings`](crate::application::SessionSettings).

pub mod config;
