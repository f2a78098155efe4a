//! The numbered selection menu.
//!
//! ```text
//!
//! -- Set default configuration for Amiberry --
//!
//! Current default config:
//!
//!     beta.uae
//!
//! Please select a configuration to boot into:
//!
//!     0.- None (boot in Amiberry's GUI)
//!     1.- alpha.uae
//!     2.- beta.uae (*)
//!     q.- Exit with no changes.
//! ```
//!
//! Ordinal `0` always means "no configuration, boot into the GUI".  Ordinals
//! `1..=N` follow the order in which the catalog discovered the files; the
//! list is deliberately not sorted.

use std::fmt::Write as _;
use std::path::PathBuf;

use crate::i18n::{tr, Language, MessageKey};

/// Suffix marking the active entry.
const ACTIVE_MARKER: &str = " (*)";

/// Indentation of menu entries.
const INDENT: &str = "    ";

/// A configuration file available for selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    /// Base file name, e.g. `beta.uae`.
    pub filename: String,
    /// Absolute path of the file.
    pub path: PathBuf,
}

impl ConfigEntry {
    pub fn new(filename: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            path: path.into(),
        }
    }
}

/// The configuration the launch line currently boots into.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CurrentConfig {
    /// No configuration parameter: the emulator opens its GUI.
    #[default]
    None,
    /// The launch line references this file name.
    Named(String),
}

impl CurrentConfig {
    pub fn from_filename(filename: Option<String>) -> Self {
        filename.map_or(CurrentConfig::None, CurrentConfig::Named)
    }

    /// Display text: the file name, or the localized "none" label.
    pub fn label(&self, lang: Language) -> &str {
        match self {
            CurrentConfig::None => tr(MessageKey::None, lang),
            CurrentConfig::Named(name) => name,
        }
    }
}

/// What an accepted menu ordinal maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Ordinal `0`: remove all launch parameters.
    None,
    /// Ordinals `1..=N`.
    Config(ConfigEntry),
}

impl Selection {
    /// The file name to substitute into the parameter template, if any.
    pub fn filename(&self) -> Option<&str> {
        match self {
            Selection::None => None,
            Selection::Config(entry) => Some(&entry.filename),
        }
    }
}

/// The user's answer to the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// `q` or `Q`.
    Quit,
    /// A valid ordinal.
    Apply(Selection),
    /// Anything else.
    Invalid,
}

/// Token that quits without changes (case-insensitive).
pub const QUIT_TOKEN: &str = "q";

/// A rendered-once, answered-once menu.
#[derive(Debug, Clone)]
pub struct Menu {
    current: CurrentConfig,
    entries: Vec<ConfigEntry>,
}

impl Menu {
    /// Builds a menu over `entries` in the given order.
    pub fn new(current: CurrentConfig, entries: Vec<ConfigEntry>) -> Self {
        Self { current, entries }
    }

    pub fn current(&self) -> &CurrentConfig {
        &self.current
    }

    pub fn entries(&self) -> &[ConfigEntry] {
        &self.entries
    }

    /// Highest valid ordinal.
    pub fn max_ordinal(&self) -> usize {
        self.entries.len()
    }

    /// Renders the menu text, ending with the quit entry and a newline.
    pub fn render(&self, lang: Language) -> String {
        let mut out = String::new();
        let none_label = tr(MessageKey::None, lang);

        // `writeln!` into a String cannot fail.
        let _ = writeln!(out, "{}", tr(MessageKey::Title, lang));
        let _ = writeln!(out, "{}\n", tr(MessageKey::Current, lang));
        let _ = writeln!(out, "{INDENT}{}\n", self.current.label(lang));
        let _ = writeln!(out, "{}", tr(MessageKey::Select, lang));

        let none_marker = marker(self.current == CurrentConfig::None);
        let _ = writeln!(out, "{INDENT}0.- {none_label}{none_marker}");

        for (ordinal, entry) in self.entries.iter().enumerate() {
            let active =
                matches!(&self.current, CurrentConfig::Named(name) if *name == entry.filename);
            let _ = writeln!(
                out,
                "{INDENT}{}.- {}{}",
                ordinal + 1,
                entry.filename,
                marker(active)
            );
        }

        let _ = writeln!(out, "{INDENT}{QUIT_TOKEN}.- {}", tr(MessageKey::Quit, lang));
        out
    }

    /// The prompt printed before reading the answer.
    pub fn prompt_label(lang: Language) -> String {
        format!("\n{}: ", tr(MessageKey::Choice, lang))
    }

    /// Interprets one line of user input.
    ///
    /// Surrounding whitespace is ignored.  Negative numbers, numbers above
    /// [`Menu::max_ordinal`], and non-numeric text are all [`Choice::Invalid`].
    pub fn parse(&self, input: &str) -> Choice {
        let input = input.trim();
        if input.eq_ignore_ascii_case(QUIT_TOKEN) {
            return Choice::Quit;
        }

        match input.parse::<usize>() {
            Ok(0) => Choice::Apply(Selection::None),
            Ok(n) if n <= self.entries.len() => {
                Choice::Apply(Selection::Config(self.entries[n - 1].clone()))
            }
            _ => Choice::Invalid,
        }
    }
}

fn marker(active: bool) -> &'static str {
    if active {
        ACTIVE_MARKER
    } else {
        ""
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
