//! Target descriptors: which file is edited and how its launch line is found.
//!
//! Two kinds of file can start the emulator:
//!
//! - a systemd **service unit**, whose `ExecStart=` directive holds the command;
//! - a shell **launcher script**, in which one line invokes the emulator binary.
//!
//! Both are handled by the same locate/rewrite code.  The only differences are
//! captured by a [`TargetDescriptor`]: the path, a *locate* pattern selecting
//! the launch line, and a *prefix* pattern whose first capture group is the
//! command part that must survive a rewrite verbatim.
//!
//! ```text
//! ExecStart=/opt/app/amiberry --config "./conf/beta.uae" -G
//! └──────── prefix ─────────┘ └──────── parameters ───────┘
//! ```
//!
//! # What counts as an `ExecStart=` launch line?
//!
//! systemd is more forgiving than a quick `^ExecStart=\S+` suggests:
//!
//! - Whitespace after `=` is allowed: `ExecStart= /opt/app/amiberry` is a
//!   valid line, and the space belongs to the prefix so it survives a rewrite.
//! - An empty `ExecStart=` clears every command set so far.  Drop-in files
//!   under `amiberry.service.d/` use it before defining their own command:
//!
//!   ```ini
//!   [Service]
//!   ExecStart=
//!   ExecStart=/opt/app/amiberry
//!   ```
//!
//!   A reset line carries no command, so it is never treated as a launch line
//!   and is left exactly as written.

use std::fmt;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Default systemd directive holding the launch command.
pub const DEFAULT_DIRECTIVE: &str = "ExecStart";

/// Default path suffix identifying the emulator binary inside a script.
pub const DEFAULT_BINARY: &str = "amiberry/amiberry";

/// The kind of file a [`TargetDescriptor`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// A systemd unit such as `/etc/systemd/system/amiberry.service`.
    #[default]
    #[serde(alias = "service-unit")]
    Service,
    /// A shell script that runs the emulator binary.
    #[serde(alias = "launcher-script")]
    Script,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Service => f.write_str("service"),
            TargetKind::Script => f.write_str("script"),
        }
    }
}

/// Everything the locator and rewriter need to know about one target file.
#[derive(Debug, Clone)]
pub struct TargetDescriptor {
    path: PathBuf,
    kind: TargetKind,
    locate: Regex,
    prefix: Regex,
}

impl TargetDescriptor {
    /// Describes a service unit whose launch line starts with `<directive>=`
    /// followed by a command.
    ///
    /// An empty `<directive>=` is systemd's reset idiom and is not a launch
    /// line.  The command prefix is the directive, any whitespace after `=`
    /// and the command up to the next whitespace, so previously appended
    /// parameters are never captured.
    pub fn service_unit(path: impl Into<PathBuf>, directive: &str) -> Self {
        let directive = regex::escape(directive);
        Self {
            path: path.into(),
            kind: TargetKind::Service,
            locate: compile(&format!(r"^{directive}=\s*\S")),
            prefix: compile(&format!(r"^({directive}=\s*\S+)")),
        }
    }

    /// Describes a launcher script in which the launch line contains `binary`
    /// followed by whitespace or the end of the line.
    pub fn launcher_script(path: impl Into<PathBuf>, binary: &str) -> Self {
        let binary = regex::escape(binary);
        Self {
            path: path.into(),
            kind: TargetKind::Script,
            locate: compile(&format!(r"{binary}(\s|$)")),
            prefix: compile(&format!(r"^(.*?{binary})(\s|$)")),
        }
    }

    /// Path of the file to edit.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Which kind of file this is.
    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    /// Returns `true` if `line` (without its line ending) is a launch line.
    pub fn matches(&self, line: &str) -> bool {
        self.locate.is_match(line)
    }

    /// Returns the command prefix of a launch line, or `None` if the prefix
    /// pattern does not apply.
    pub fn command_prefix<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.prefix
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Compiles a pattern assembled from escaped literals.
///
/// Every caller builds its pattern from `regex::escape` output wrapped in a
/// fixed, valid skeleton, so compilation cannot fail.
fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => unreachable!("pattern built from escaped literals is invalid: {e}"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
