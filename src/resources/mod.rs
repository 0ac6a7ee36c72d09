//! Project files as idempotent resources.
//!
//! Every file the engine touches is wrapped in a [`Resource`]: its desired
//! content is computed in memory from what is on disk, compared, and written
//! back only when the two differ. Running the engine on a converged project
//! therefore reads every file and writes none.
pub mod error;
pub mod helpers;
pub mod presets;
pub mod text_file;

use anyhow::Result;

/// How a project file compares with the content the engine wants in it.
///
/// # Examples
///
/// ```
/// use cubepp_cli::resources::ResourceState;
///
/// let stale = ResourceState::Incorrect { current: "2 line(s) differ".into() };
/// assert!(stale.needs_write());
/// assert!(!ResourceState::Correct.needs_write());
/// assert!(!ResourceState::Missing.needs_write());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// An optional file is absent; there is nothing to patch.
    Missing,
    /// The file already holds the desired content.
    Correct,
    /// The file exists and patching it would change it.
    Incorrect {
        /// Short description of the difference.
        current: String,
    },
    /// The file exists but cannot be patched (not text, no target entry).
    Invalid {
        /// Why the file was left alone.
        reason: String,
    },
}

impl ResourceState {
    /// Whether applying the resource would rewrite the file.
    #[must_use]
    pub const fn needs_write(&self) -> bool {
        matches!(self, Self::Incorrect { .. })
    }
}

/// What [`Resource::apply`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// The file was rewritten.
    Applied,
    /// The file already held the desired content and was not touched.
    AlreadyCorrect,
    /// The file vanished or stopped being text between check and apply.
    Skipped {
        /// Why nothing was written.
        reason: String,
    },
}

/// A project file with a desired state.
///
/// Implementations read the whole file, compute the desired content without
/// side effects, and write at most once in [`apply`](Self::apply).
pub trait Resource {
    /// Human-readable name used in log lines.
    fn description(&self) -> String;

    /// Compare the file on disk with its desired content.
    ///
    /// # Errors
    ///
    /// Returns an error if a required file is missing, the file cannot be
    /// read or parsed, or a patch fails.
    fn current_state(&self) -> Result<ResourceState>;

    /// Write the desired content if it differs from the file on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, patched or written.
    fn apply(&self) -> Result<ResourceChange>;
}
