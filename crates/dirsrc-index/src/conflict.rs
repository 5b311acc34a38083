//! Canonical URL uniqueness checking.
//!
//! Every conformance resource in the source must have a distinct canonical
//! URL. [`detect_conflicts`] groups the harvested summaries by canonical and
//! reports every group with more than one member.

use std::fmt;

use camino::Utf8PathBuf;
use dirsrc_core::{ArtifactSummary, FxHashMap, fx_hash_map};
use serde::Serialize;

/// One canonical URL claimed by more than one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalConflict {
    /// The shared canonical URL.
    pub canonical: String,
    /// Origin file of every claimant, in harvest order.
    ///
    /// A path repeats when one file (a bundle) contributes several
    /// claimants.
    pub origins: Vec<Utf8PathBuf>,
}

/// All canonical conflicts found in one summary build.
///
/// Conflicts are ordered by canonical URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictReport {
    conflicts: Vec<CanonicalConflict>,
}

impl ConflictReport {
    /// Creates a report from individual conflicts, sorting them by URL.
    #[must_use]
    pub fn new(mut conflicts: Vec<CanonicalConflict>) -> Self {
        conflicts.sort_by(|a, b| a.canonical.cmp(&b.canonical));
        Self { conflicts }
    }

    /// Returns the conflicts.
    #[inline]
    #[must_use]
    pub fn conflicts(&self) -> &[CanonicalConflict] {
        &self.conflicts
    }

    /// Returns `true` if the given canonical URL is part of the report.
    #[must_use]
    pub fn contains(&self, canonical: &str) -> bool {
        self.conflicts.iter().any(|c| c.canonical == canonical)
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "found {} canonical url(s) shared by more than one resource:",
            self.conflicts.len()
        )?;
        for conflict in &self.conflicts {
            write!(f, "\n  {}", conflict.canonical)?;
            for origin in &conflict.origins {
                write!(f, "\n    - {origin}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ConflictReport {}

/// Checks that no two conformance resources share a canonical URL.
///
/// Summaries of non-conformance kinds, and conformance summaries without a
/// canonical, are ignored.
///
/// # Errors
///
/// Returns a [`ConflictReport`] naming every duplicated canonical and all of
/// its origins.
pub fn detect_conflicts(summaries: &[ArtifactSummary]) -> Result<(), ConflictReport> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: FxHashMap<&str, Vec<Utf8PathBuf>> = fx_hash_map();

    for summary in summaries.iter().filter(|s| s.kind().is_conformance()) {
        let Some(canonical) = summary.canonical() else {
            continue;
        };
        let origins = groups.entry(canonical).or_insert_with(|| {
            order.push(canonical);
            Vec::new()
        });
        origins.push(summary.origin().to_owned());
    }

    let conflicts: Vec<CanonicalConflict> = order
        .into_iter()
        .filter_map(|canonical| {
            let origins = groups.remove(canonical)?;
            (origins.len() > 1).then(|| CanonicalConflict {
                canonical: canonical.to_owned(),
                origins,
            })
        })
        .collect();

    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(ConflictReport::new(conflicts))
    }
}
