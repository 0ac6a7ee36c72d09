//! Named profile overlays and their merge into the base document.
use super::{Document, Injection, PartialDocument};

/// A selected profile with its fully merged document.
#[derive(Debug, Clone)]
pub struct Profile {
    pub name: String,
    /// The overlay exactly as declared.
    pub overlay: PartialDocument,
    /// Base document with the overlay applied.
    pub document: Document,
}

/// Result of resolving requested profile names against a document.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Selected profiles in declaration order.
    pub profiles: Vec<Profile>,
    /// Requested names that the document does not declare.
    pub unknown: Vec<String>,
}

impl Selection {
    /// Base injections followed by every selected profile's injections.
    #[must_use]
    pub fn merged_injections(&self, base: &Document) -> Vec<Injection> {
        let mut merged = base.injections.clone();
        for profile in &self.profiles {
            if let Some(extra) = &profile.overlay.injections {
                merged.extend(extra.iter().cloned());
            }
        }
        merged
    }

    /// Names of the selected profiles.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }
}

impl Document {
    /// Declared profile names in declaration order.
    #[must_use]
    pub fn profile_names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    /// Apply a profile overlay to a copy of this document.
    ///
    /// Scalars and lists are replaced, maps are merged entry-wise with the
    /// overlay winning, and injections are appended. The result carries no
    /// profiles of its own.
    #[must_use]
    pub fn with_profile(&self, overlay: &PartialDocument) -> Self {
        let mut merged = self.clone();
        merged.profiles.clear();

        if let Some(target) = &overlay.target {
            merged.target.clone_from(target);
        }
        if let Some(binary_dir) = &overlay.binary_dir {
            merged.binary_dir = Some(binary_dir.clone());
        }
        if let Some(variables) = &overlay.variables {
            for (name, value) in variables {
                merged.variables.insert(name.clone(), value.clone());
            }
        }
        if let Some(functions) = &overlay.functions {
            for (name, items) in functions {
                merged.functions.insert(name.clone(), items.clone());
            }
        }
        if let Some(extra) = &overlay.extra {
            merged.extra.clone_from(extra);
        }
        if let Some(patterns) = &overlay.source_patterns {
            merged.source_patterns.clone_from(patterns);
        }
        if let Some(paths) = &overlay.resource_paths {
            merged.resource_paths.clone_from(paths);
        }
        if let Some(injections) = &overlay.injections {
            merged.injections.extend(injections.iter().cloned());
        }
        merged
    }
}

/// Resolve requested profile names against the document's declared set.
///
/// Selected profiles keep the document's declaration order regardless of the
/// order they were requested in. Duplicate requests select a profile once.
#[must_use]
pub fn resolve(base: &Document, requested: &[String]) -> Selection {
    let profiles = base
        .profiles
        .iter()
        .filter(|(name, _)| requested.iter().any(|r| r == *name))
        .map(|(name, overlay)| Profile {
            name: name.clone(),
            overlay: overlay.clone(),
            document: base.with_profile(overlay),
        })
        .collect();

    let mut unknown: Vec<String> = Vec::new();
    for name in requested {
        if !base.profiles.contains_key(name) && !unknown.contains(name) {
            unknown.push(name.clone());
        }
    }

    Selection { profiles, unknown }
}
