//! Run-scoped artifact handles.
//!
//! Tasks never hard-code staging paths; they receive a `RunContext`
//! carrying the resolved locations of the raw and clean snapshots.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Artifact handles for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Identifier for this run, used in logs and scoped file names.
    pub run_id: Uuid,
    /// Location of the raw snapshot (extractor output, cleaner input).
    pub raw_snapshot: PathBuf,
    /// Location of the clean snapshot (cleaner output, loader input).
    pub clean_snapshot: PathBuf,
}

impl RunContext {
    /// Context over fixed staging paths shared by every run.
    ///
    /// Assumes at most one in-flight run at a time; a concurrent second
    /// run would overwrite the staging files of the first.
    pub fn fixed(raw_snapshot: PathBuf, clean_snapshot: PathBuf) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            raw_snapshot,
            clean_snapshot,
        }
    }

    /// Context whose staging paths embed the run id.
    ///
    /// Use this when a deployment may start a second run before the first
    /// finishes; each run then stages into its own files.
    pub fn scoped(staging_dir: &Path) -> Self {
        let run_id = Uuid::new_v4();
        Self {
            run_id,
            raw_snapshot: staging_dir.join(format!("raw_data_{}.csv", run_id)),
            clean_snapshot: staging_dir.join(format!("clean_data_{}.csv", run_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_paths_are_kept_verbatim() {
        let ctx = RunContext::fixed(
            PathBuf::from("/staging/raw_data.csv"),
            PathBuf::from("/staging/clean_data.csv"),
        );
        assert_eq!(ctx.raw_snapshot, PathBuf::from("/staging/raw_data.csv"));
        assert_eq!(ctx.clean_snapshot, PathBuf::from("/staging/clean_data.csv"));
    }

    #[test]
    fn test_scoped_paths_embed_run_id() {
        let ctx = RunContext::scoped(Path::new("/staging"));
        let raw = ctx.raw_snapshot.to_string_lossy().to_string();
        let clean = ctx.clean_snapshot.to_string_lossy().to_string();
        assert!(raw.contains(&ctx.run_id.to_string()));
        assert!(clean.contains(&ctx.run_id.to_string()));
        assert_ne!(raw, clean);
    }
}
