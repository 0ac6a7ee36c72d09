use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Context as _, Result};

use crate::config::Document;
use crate::logging::Log;
use crate::overlay::Manifest;

/// Shared context for task execution.
pub struct Context {
    /// Base document, after any project-level override.
    pub document: Arc<Document>,
    /// Project root: the working directory and overlay destination.
    pub root: PathBuf,
    /// Directory holding the running executable; first place resource
    /// paths are resolved against.
    pub install_dir: PathBuf,
    /// Final component of `root`, substituted for the placeholder.
    pub project_name: String,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// Files written by the overlay copy during this run.
    ///
    /// Populated by `CopyResources`, rewritten by `ResolveProjectDirs`,
    /// read by `SubstitutePlaceholders`. Use [`Context::manifest`] to lock.
    pub manifest: Arc<Mutex<Manifest>>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("document", &"<Document>")
            .field("root", &self.root)
            .field("install_dir", &self.install_dir)
            .field("project_name", &self.project_name)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("manifest", &"<Manifest>")
            .finish()
    }
}

impl Context {
    /// Creates a new context rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` has no final path component to use as the
    /// project name, or if that component is not valid UTF-8.
    pub fn new(
        document: Arc<Document>,
        root: PathBuf,
        install_dir: PathBuf,
        log: Arc<dyn Log>,
        dry_run: bool,
    ) -> Result<Self> {
        let project_name = project_name_of(&root)?;
        Ok(Self {
            document,
            root,
            install_dir,
            project_name,
            log,
            dry_run,
            manifest: Arc::new(Mutex::new(Manifest::new())),
        })
    }

    /// Lock the run manifest.
    ///
    /// Recovers from a poisoned lock (which can only occur if a previous task
    /// panicked) by consuming the poison and returning the inner value.
    pub fn manifest(&self) -> MutexGuard<'_, Manifest> {
        self.manifest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Path of `rel` under the project root.
    #[must_use]
    pub fn project_path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root.join(rel)
    }

    /// Create a copy of this context with a different logger.
    ///
    /// The document and manifest are shared by reference.
    #[must_use]
    pub fn with_log(&self, log: Arc<dyn Log>) -> Self {
        Self {
            document: Arc::clone(&self.document),
            root: self.root.clone(),
            install_dir: self.install_dir.clone(),
            project_name: self.project_name.clone(),
            log,
            dry_run: self.dry_run,
            manifest: Arc::clone(&self.manifest),
        }
    }
}

/// Directory name of `root`, used as the project name.
///
/// # Errors
///
/// Returns an error for a root such as `/` with no name, or a non-UTF-8 name.
pub fn project_name_of(root: &Path) -> Result<String> {
    let name = root
        .file_name()
        .with_context(|| format!("{} has no directory name", root.display()))?;
    name.to_str()
        .map(str::to_string)
        .with_context(|| format!("{} is not valid UTF-8", root.display()))
}

/// Directory containing the running executable.
///
/// Falls back to `fallback` when the executable path is unavailable.
#[must_use]
pub fn install_dir_or(fallback: &Path) -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| fallback.to_path_buf())
}
