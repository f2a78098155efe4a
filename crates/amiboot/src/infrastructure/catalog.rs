//! Discovery of selectable configuration files.
//!
//! [`DirectoryCatalog`] lists `*.<extension>` in one directory the way a shell
//! glob would: regular files only, no dotfiles, and in whatever order the
//! directory listing returns them.  The order is not sorted, so menu ordinals
//! are only stable for as long as the directory is.
//!
//! The [`ConfigCatalog`] trait is the seam the session depends on, which keeps
//! the session testable without a real directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use amiboot_core::ConfigEntry;
use thiserror::Error;
use tracing::{debug, warn};

/// Error type for configuration discovery.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The configuration directory exists but could not be listed.
    #[error("cannot list configuration directory '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CatalogError {
    /// The directory the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            CatalogError::Unreadable { path, .. } => path,
        }
    }
}

/// Source of the configuration files offered in the menu.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigCatalog {
    /// Returns the available configurations in discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the source exists but cannot be read.
    fn discover(&self) -> Result<Vec<ConfigEntry>, CatalogError>;
}

/// Lists configuration files in a single directory.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    dir: PathBuf,
    extension: String,
}

impl DirectoryCatalog {
    /// `extension` is given without the leading dot, e.g. `"uae"`.
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn accepts(&self, name: &str, path: &Path) -> bool {
        if name.starts_with('.') {
            return false;
        }
        let has_extension = Path::new(name)
            .extension()
            .is_some_and(|ext| ext == self.extension.as_str());
        has_extension && path.is_file()
    }
}

impl ConfigCatalog for DirectoryCatalog {
    fn discover(&self) -> Result<Vec<ConfigEntry>, CatalogError> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(dir = %self.dir.display(), "configuration directory does not exist");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(CatalogError::Unreadable {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut entries = Vec::new();
        for item in read_dir {
            let item = item.map_err(|source| CatalogError::Unreadable {
                path: self.dir.clone(),
                source,
            })?;
            let path = item.path();
            let Some(name) = item.file_name().to_str().map(str::to_owned) else {
                debug!(path = %path.display(), "skipping non UTF-8 file name");
                continue;
            };
            if self.accepts(&name, &path) {
                entries.push(ConfigEntry::new(name, path));
            }
        }

        debug!(dir = %self.dir.display(), count = entries.len(), "discovered configurations");
        Ok(entries)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
