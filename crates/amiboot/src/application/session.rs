//! The interactive session: show the menu once, read one answer, act on it.
//!
//! ```text
//! PRESENT_MENU ──► AWAIT_INPUT ──┬─► APPLY   (ordinal 0..=N)   exit 0
//!      │                         ├─► QUIT    ("q" / "Q")       exit 0
//!      │                         └─► REJECT  (anything else)   exit 1
//!      └─► fatal (line not found, file missing/unreadable)     exit 2..4
//! ```
//!
//! There is no retry loop: an invalid answer ends the run without touching
//! the target file.

use std::io;
use std::path::PathBuf;

use amiboot_core::{
    locate, rewrite, tr, tr_path, Choice, CurrentConfig, CurrentConfigPattern, Language, Menu,
    MessageKey, ParameterTemplate, Selection, TargetDescriptor,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::infrastructure::catalog::{CatalogError, ConfigCatalog};
use crate::infrastructure::console::Console;
use crate::infrastructure::target_file::{read_target, write_target, TargetFileError, WriteMode};

/// Process exit codes.
pub mod exit_code {
    /// Change applied, or the user quit.
    pub const SUCCESS: u8 = 0;
    /// The answer was not a valid menu entry.
    pub const INVALID_SELECTION: u8 = 1;
    /// The target file has no launch line.
    pub const LINE_NOT_FOUND: u8 = 2;
    /// The target file does not exist.
    pub const TARGET_MISSING: u8 = 3;
    /// The target file cannot be read.
    pub const TARGET_UNREADABLE: u8 = 4;
    /// The target file cannot be written.
    pub const TARGET_UNWRITABLE: u8 = 5;
    /// Settings, command line or configuration directory are unusable.
    pub const CONFIGURATION: u8 = 6;
}

/// Validated runtime settings for one session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub target: TargetDescriptor,
    pub template: ParameterTemplate,
    pub current_pattern: CurrentConfigPattern,
    pub language: Language,
    pub write_mode: WriteMode,
    /// Show the rewritten line instead of writing it.
    pub dry_run: bool,
}

/// Fatal session failures.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("launch line not found in '{}'", path.display())]
    LineNotFound { path: PathBuf },

    #[error(transparent)]
    TargetFile(#[from] TargetFileError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("console I/O failed: {0}")]
    Console(#[source] io::Error),
}

impl SessionError {
    pub fn exit_code(&self) -> u8 {
        match self {
            SessionError::LineNotFound { .. } => exit_code::LINE_NOT_FOUND,
            SessionError::TargetFile(TargetFileError::Missing { .. }) => exit_code::TARGET_MISSING,
            SessionError::TargetFile(TargetFileError::Unreadable { .. }) => {
                exit_code::TARGET_UNREADABLE
            }
            SessionError::TargetFile(TargetFileError::Unwritable { .. }) => {
                exit_code::TARGET_UNWRITABLE
            }
            SessionError::Catalog(_) => exit_code::CONFIGURATION,
            // Losing the terminal is treated like an unusable answer.
            SessionError::Console(_) => exit_code::INVALID_SELECTION,
        }
    }

    /// The message printed to the user for this failure.
    pub fn localized(&self, lang: Language) -> String {
        match self {
            SessionError::LineNotFound { path } => {
                tr_path(MessageKey::LineNotFound, lang, &path.display().to_string())
            }
            SessionError::TargetFile(e) => {
                let key = match e {
                    TargetFileError::Missing { .. } => MessageKey::FileMissing,
                    TargetFileError::Unreadable { .. } => MessageKey::FileUnreadable,
                    TargetFileError::Unwritable { .. } => MessageKey::FileUnwritable,
                };
                tr_path(key, lang, &e.path().display().to_string())
            }
            SessionError::Catalog(e) => {
                tr_path(MessageKey::ConfDirUnreadable, lang, &e.path().display().to_string())
            }
            SessionError::Console(_) => tr(MessageKey::Invalid, lang).to_string(),
        }
    }
}

/// How a session that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The target file was rewritten.
    Applied { selection: Selection, changed: usize },
    /// Dry run: the rewrite was computed and shown but not written.
    Previewed { selection: Selection, lines: Vec<String> },
    /// The user quit.
    Quit,
    /// The answer was not a valid menu entry; nothing was written.
    Rejected { input: Option<String> },
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Applied { .. } | Outcome::Previewed { .. } | Outcome::Quit => {
                exit_code::SUCCESS
            }
            Outcome::Rejected { .. } => exit_code::INVALID_SELECTION,
        }
    }
}

/// Runs one session.
///
/// # Errors
///
/// Returns [`SessionError`] for the fatal conditions: missing or unreadable
/// target, no launch line, unreadable configuration directory, unwritable
/// target, or a broken console.
pub fn run(
    settings: &SessionSettings,
    catalog: &dyn ConfigCatalog,
    console: &mut dyn Console,
) -> Result<Outcome, SessionError> {
    let lang = settings.language;
    let path = settings.target.path();

    // ── PRESENT_MENU ──────────────────────────────────────────────────────────
    let lines = read_target(path)?;
    let Some(launch_line) = locate(&lines, &settings.target) else {
        return Err(SessionError::LineNotFound {
            path: path.to_path_buf(),
        });
    };

    let current =
        CurrentConfig::from_filename(settings.current_pattern.extract(launch_line.text()));
    info!(path = %path.display(), kind = %settings.target.kind(), ?current, "found launch line");

    let entries = catalog.discover()?;
    let menu = Menu::new(current, entries);
    console
        .show(&menu.render(lang))
        .map_err(SessionError::Console)?;

    // ── AWAIT_INPUT ───────────────────────────────────────────────────────────
    let answer = console
        .prompt(&Menu::prompt_label(lang))
        .map_err(SessionError::Console)?;
    let choice = match answer.as_deref() {
        Some(input) => menu.parse(input),
        None => Choice::Invalid,
    };
    debug!(?answer, ?choice, "read selection");

    let selection = match choice {
        Choice::Quit => {
            say(console, tr(MessageKey::Exit, lang))?;
            info!("quit without changes");
            return Ok(Outcome::Quit);
        }
        Choice::Invalid => {
            say(console, tr(MessageKey::Invalid, lang))?;
            warn!(?answer, max = menu.max_ordinal(), "rejected selection");
            return Ok(Outcome::Rejected { input: answer });
        }
        Choice::Apply(selection) => selection,
    };

    // ── APPLY ─────────────────────────────────────────────────────────────────
    let params = selection.filename().map(|name| settings.template.render(name));
    let result = rewrite(&lines, &settings.target, params.as_deref());

    if settings.dry_run {
        let preview: Vec<String> = result.changed_lines().map(|l| l.text().to_string()).collect();
        let mut text = tr_path(MessageKey::DryRun, lang, &path.display().to_string());
        for line in &preview {
            text.push_str(line);
            text.push('\n');
        }
        say(console, &text)?;
        return Ok(Outcome::Previewed {
            selection,
            lines: preview,
        });
    }

    write_target(path, &result.lines, settings.write_mode)?;
    info!(
        path = %path.display(),
        config = selection.filename().unwrap_or("<none>"),
        changed = result.changed.len(),
        "launch line updated"
    );
    say(console, tr(MessageKey::Done, lang))?;

    Ok(Outcome::Applied {
        selection,
        changed: result.changed.len(),
    })
}

/// Prints `text` followed by a newline.
fn say(console: &mut dyn Console, text: &str) -> Result<(), SessionError> {
    console
        .show(&format!("{text}\n"))
        .map_err(SessionError::Console)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
