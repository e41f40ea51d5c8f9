use serde::{Deserialize, Serialize};

use super::fixture::{ColorFormat, Fixture, GridSize};
use super::table::{DmxTable, TableError};

/// A parsed Resolume advanced output preset: the composition canvas plus
/// every DMX slice across all screens, flattened into document order.
///
/// Built whole by the importer and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PixelMap {
    pub name: String,
    /// Composition texture size. Informational only; fixture corners are
    /// already in canvas coordinates.
    pub size: GridSize,
    pub fixtures: Vec<Fixture>,
}

impl PixelMap {
    /// Distinct color formats across all fixtures, in first-seen order.
    #[must_use]
    pub fn distinct_color_formats(&self) -> Vec<ColorFormat> {
        let mut formats: Vec<ColorFormat> = Vec::new();
        for fixture in &self.fixtures {
            if !formats.contains(&fixture.color_format) {
                formats.push(fixture.color_format);
            }
        }
        formats
    }

    /// Expand every fixture into the flat DMX table, in document order.
    ///
    /// A mixed-format layout is rejected up front, before any fixture is
    /// expanded; Disguise cannot address a single table with more than one
    /// channel width. Disabled fixtures are expanded like any other —
    /// filtering is the consumer's decision.
    pub fn compute_dmx_table(&self) -> Result<DmxTable, TableError> {
        let formats = self.distinct_color_formats();
        if formats.len() > 1 {
            return Err(TableError::MixedColorFormats(formats));
        }

        let entries = self
            .fixtures
            .iter()
            .flat_map(Fixture::dmx_entries)
            .collect();

        Ok(DmxTable::new(entries))
    }
}

// ── Tests ───────────────────────────────────────────────────────────
