pub mod import;
pub mod model;
pub mod paths;

// Re-export commonly used types at the crate level.
pub use import::{ImportError, resolume};
pub use model::{
    ColorFormat, DmxTable, DmxTableEntry, Fixture, FixtureProfile, GridSize, PixelDistribution,
    PixelMap, Point2, TableError,
};
