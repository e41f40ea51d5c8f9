use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::fixture::ColorFormat;

// ── Error type ──────────────────────────────────────────────────────

/// Errors raised while computing a DMX table from a pixel map.
#[derive(Debug)]
pub enum TableError {
    /// The layout mixes color formats across fixtures. Disguise expects a
    /// single channel width per table, so this is rejected before any row
    /// is produced. Carries the distinct formats in first-seen order.
    MixedColorFormats(Vec<ColorFormat>),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::MixedColorFormats(formats) => {
                let names: Vec<&str> = formats.iter().map(|f| f.name()).collect();
                write!(
                    f,
                    "pixel map mixes color formats ({}); a DMX table supports only one",
                    names.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for TableError {}

// ── DMX table ───────────────────────────────────────────────────────

/// One row of the output table: a pixel's rounded canvas coordinate and
/// its DMX address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmxTableEntry {
    pub x: i32,
    pub y: i32,
    pub universe: i32,
    pub channel: i32,
}

/// The flat per-pixel addressing table consumed by Disguise.
/// Entry order is fixture order in the source document, then column-major
/// within each fixture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DmxTable {
    pub entries: Vec<DmxTableEntry>,
}

impl DmxTable {
    #[must_use]
    pub fn new(entries: Vec<DmxTableEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the table as CSV: a fixed `x,y,universe,channel` header, then
    /// one row per entry as plain base-10 integers.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "x,y,universe,channel")?;
        for entry in &self.entries {
            writeln!(
                writer,
                "{},{},{},{}",
                entry.x, entry.y, entry.universe, entry.channel
            )?;
        }
        Ok(())
    }

    /// Write the table as CSV to a file, creating or truncating it.
    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_csv(&mut writer)?;
        writer.flush()
    }
}

// ── Tests ───────────────────────────────────────────────────────────
