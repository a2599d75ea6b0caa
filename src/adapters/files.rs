//! Public file area
//!
//! Export files are addressed as `public://<relative path>` and resolve
//! under the configured `files.public_path` directory.

use crate::config::schema::FilesConfig;
use crate::domain::{Result, TermportError};
use std::path::{Component, Path, PathBuf};

/// URI scheme of the public file area
pub const PUBLIC_SCHEME: &str = "public://";

/// Path resolution and directory preparation for `public://` URIs
pub trait PublicFileSystem: Send + Sync {
    /// Map a `public://` URI to a local path
    ///
    /// # Errors
    ///
    /// Returns `TermportError::FileSystem` for other schemes or for paths
    /// that would leave the public area.
    fn resolve(&self, uri: &str) -> Result<PathBuf>;

    /// Make sure the directory exists and is writable, creating it when
    /// `create` is set
    fn prepare_directory(&self, uri: &str, create: bool) -> Result<PathBuf>;

    /// Absolute, symlink-free path of `uri`
    fn realpath(&self, uri: &str) -> Result<PathBuf>;
}

/// [`PublicFileSystem`] rooted at a local directory
#[derive(Debug, Clone)]
pub struct LocalPublicFileSystem {
    root: PathBuf,
}

impl LocalPublicFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &FilesConfig) -> Self {
        Self::new(&config.public_path)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PublicFileSystem for LocalPublicFileSystem {
    fn resolve(&self, uri: &str) -> Result<PathBuf> {
        let relative = uri.strip_prefix(PUBLIC_SCHEME).ok_or_else(|| {
            TermportError::FileSystem(format!("Unsupported URI '{uri}', expected {PUBLIC_SCHEME}"))
        })?;

        let relative = Path::new(relative.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(TermportError::FileSystem(format!(
                "URI '{uri}' points outside the public file area"
            )));
        }

        Ok(self.root.join(relative))
    }

    fn prepare_directory(&self, uri: &str, create: bool) -> Result<PathBuf> {
        let path = self.resolve(uri)?;

        if !path.is_dir() {
            if !create {
                return Err(TermportError::FileSystem(format!(
                    "Directory {} does not exist",
                    path.display()
                )));
            }
            std::fs::create_dir_all(&path).map_err(|e| {
                TermportError::FileSystem(format!(
                    "Failed to create directory {}: {}",
                    path.display(),
                    e
                ))
            })?;
        }

        let metadata = std::fs::metadata(&path)?;
        if metadata.permissions().readonly() {
            return Err(TermportError::FileSystem(format!(
                "Directory {} is not writable",
                path.display()
            )));
        }

        Ok(path)
    }

    fn realpath(&self, uri: &str) -> Result<PathBuf> {
        let path = self.resolve(uri)?;
        if let Ok(canonical) = path.canonicalize() {
            return Ok(canonical);
        }

        // Not written yet: canonicalize the parent and re-attach the name.
        match (path.parent(), path.file_name()) {
            (Some(parent), Some(name)) => Ok(parent.canonicalize()?.join(name)),
            _ => Err(TermportError::FileSystem(format!(
                "Cannot resolve real path of {}",
                path.display()
            ))),
        }
    }
}
