//! Centralized path definitions for the Resolume directories this tool
//! reads from. No other module should hard-code these strings.

use std::env;
use std::path::{Path, PathBuf};

// ── Directory names ──────────────────────────────────────────────

/// Resolume's directory inside the user's documents folder.
pub const RESOLUME_DIR: &str = "Resolume Arena";

/// Advanced output presets, relative to the Resolume directory.
pub const PRESETS_DIR: &str = "Presets";
pub const ADVANCED_OUTPUT_DIR: &str = "Advanced Output";

/// Fixture library, relative to the Resolume directory.
pub const FIXTURE_LIBRARY_DIR: &str = "Fixture Library";

// ── Path functions ───────────────────────────────────────────────

/// The user's documents folder, from `USERPROFILE` (Windows) or `HOME`.
/// Returns `None` when neither is set.
pub fn documents_dir() -> Option<PathBuf> {
    let home = env::var_os("USERPROFILE").or_else(|| env::var_os("HOME"))?;
    Some(PathBuf::from(home).join("Documents"))
}

/// The Resolume Arena directory inside the documents folder.
pub fn resolume_dir() -> Option<PathBuf> {
    Some(documents_dir()?.join(RESOLUME_DIR))
}

pub fn advanced_output_presets_dir(resolume_dir: &Path) -> PathBuf {
    resolume_dir.join(PRESETS_DIR).join(ADVANCED_OUTPUT_DIR)
}

pub fn fixture_library_dir(resolume_dir: &Path) -> PathBuf {
    resolume_dir.join(FIXTURE_LIBRARY_DIR)
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_dir_layout() {
        let dir = advanced_output_presets_dir(Path::new("/docs/Resolume Arena"));
        assert_eq!(
            dir,
            Path::new("/docs/Resolume Arena/Presets/Advanced Output")
        );
    }

    #[test]
    fn test_fixture_library_layout() {
        let dir = fixture_library_dir(Path::new("/docs/Resolume Arena"));
        assert_eq!(dir, Path::new("/docs/Resolume Arena/Fixture Library"));
    }
}
