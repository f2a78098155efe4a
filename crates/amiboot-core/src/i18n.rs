//! Bilingual message table.
//!
//! Every user-facing string the tool prints lives here.  Lookup is keyed by a
//! closed pair of enums, [`MessageKey`] and [`Language`], and [`tr`] matches on
//! the pair exhaustively.  Adding a key or a language without filling in every
//! translation is therefore a compile error, not a blank line at runtime.
//!
//! The language is chosen once from settings (`language = "es"`) and never
//! prompted for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder that fatal messages use for the target file path.
pub const PATH_PLACEHOLDER: &str = "{path}";

/// Error returned when a language code is not one of the supported codes.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported language code '{0}' (expected 'en' or 'es')")]
pub struct UnknownLanguage(pub String);

/// Languages the message table is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    /// Two-letter code used in settings files and on the command line.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}

/// Identifies one entry of the message table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// Menu heading.
    Title,
    /// Label above the currently active configuration.
    Current,
    /// Label above the numbered list.
    Select,
    /// The "boot into the GUI" entry, also shown when nothing is configured.
    None,
    /// Printed when the selection is not a valid ordinal.
    Invalid,
    /// Text of the `q` menu entry.
    Quit,
    /// Input prompt.
    Choice,
    /// Printed when the user quits.
    Exit,
    /// Printed after the target file was rewritten.
    Done,
    /// Printed by `--dry-run` instead of [`MessageKey::Done`].
    DryRun,
    /// Fatal: no launch line in the target file.
    LineNotFound,
    /// Fatal: the target file does not exist.
    FileMissing,
    /// Fatal: the target file cannot be read.
    FileUnreadable,
    /// Fatal: the target file cannot be written.
    FileUnwritable,
    /// Fatal: the configuration directory cannot be listed.
    ConfDirUnreadable,
}

/// Returns the text for `key` in `lang`.
pub fn tr(key: MessageKey, lang: Language) -> &'static str {
    use Language::{En, Es};
    use MessageKey as K;

    match (key, lang) {
        (K::Title, En) => "\n-- Set default configuration for Amiberry --\n",
        (K::Title, Es) => "\n-- Establecer configuración por defecto para Amiberry --\n",
        (K::Current, En) => "Current default config:",
        (K::Current, Es) => "Configuración actual:",
        (K::Select, En) => "Please select a configuration to boot into:\n",
        (K::Select, Es) => "Selecciona en qué configuración arrancar:\n",
        (K::None, En) => "None (boot in Amiberry's GUI)",
        (K::None, Es) => "Ninguna (arrancar en el GUI de Amiberry)",
        (K::Invalid, En) => "\nInvalid value. Aborting program...\n",
        (K::Invalid, Es) => "\nValor no válido. Finalizando el programa...\n",
        (K::Quit, En) => "Exit with no changes.",
        (K::Quit, Es) => "Salir sin realizar cambios.",
        (K::Choice, En) => "Select an option",
        (K::Choice, Es) => "Seleccione una opción",
        (K::Exit, En) => "\nEnding program with no changes.\n",
        (K::Exit, Es) => "\nSaliendo del programa sin realizar cambios.\n",
        (K::Done, En) => "\nChange finished. Please restart with 'reboot' to apply changes.\n",
        (K::Done, Es) => "\nCambio realizado. Reinicia con 'reboot' para aplicar los cambios.\n",
        (K::DryRun, En) => "\nDry run: '{path}' was not modified. The launch line would become:\n",
        (K::DryRun, Es) => {
            "\nSimulación: '{path}' no se ha modificado. La línea de arranque quedaría así:\n"
        }
        (K::LineNotFound, En) => "ERROR: launch line not found in '{path}'",
        (K::LineNotFound, Es) => "ERROR: no se encontró la línea de arranque en '{path}'",
        (K::FileMissing, En) => "ERROR: File '{path}' does not exist",
        (K::FileMissing, Es) => "ERROR: El fichero '{path}' no existe",
        (K::FileUnreadable, En) => "ERROR: File '{path}' cannot be read",
        (K::FileUnreadable, Es) => "ERROR: El fichero '{path}' no se puede leer",
        (K::FileUnwritable, En) => "ERROR: File '{path}' cannot be written",
        (K::FileUnwritable, Es) => "ERROR: El fichero '{path}' no se puede escribir",
        (K::ConfDirUnreadable, En) => "ERROR: Configuration directory '{path}' cannot be read",
        (K::ConfDirUnreadable, Es) => {
            "ERROR: No se puede leer el directorio de configuraciones '{path}'"
        }
    }
}

/// Looks up `key` and substitutes `path` for [`PATH_PLACEHOLDER`].
pub fn tr_path(key: MessageKey, lang: Language, path: &str) -> String {
    tr(key, lang).replace(PATH_PLACEHOLDER, path)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
