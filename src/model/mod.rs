pub mod fixture;
pub mod pixelmap;
pub mod table;

// Re-export commonly used types at the model level.
pub use fixture::{ColorFormat, Fixture, FixtureProfile, GridSize, PixelDistribution, Point2};
pub use pixelmap::PixelMap;
pub use table::{DmxTable, DmxTableEntry, TableError};
