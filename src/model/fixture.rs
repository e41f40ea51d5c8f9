use serde::{Deserialize, Serialize};

use super::table::DmxTableEntry;

// ── Geometry ────────────────────────────────────────────────────────

/// 2D point in pixel-map canvas space.
///
/// Coordinates are `f32` to match the reference output: the whole
/// expansion pipeline must stay in single precision so that rounded
/// pixel positions are bit-identical across implementations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear blend between `a` and `b` at fraction `t`.
    #[must_use]
    pub fn lerp(a: Point2, b: Point2, t: f32) -> Point2 {
        Point2 {
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
        }
    }
}

/// Integer width/height pair, used both for the pixel-map canvas and for
/// a fixture's pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: i32,
    pub height: i32,
}

impl GridSize {
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

// ── Color format ────────────────────────────────────────────────────

/// Per-pixel channel layout, as named in Resolume fixture definitions.
///
/// Channel *order* is irrelevant to table generation; only the number of
/// DMX channels a pixel consumes matters here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorFormat {
    Rgb,
    Rbg,
    Grb,
    Gbr,
    Brg,
    Bgr,
    L,
    Rgba,
    Rgbw,
    Rgbwa,
    Rgbaw,
    Grbw,
    Wrgb,
    Wargb,
    Cmy,
}

impl ColorFormat {
    /// Number of DMX channels one pixel consumes in this format.
    #[must_use]
    pub const fn channel_width(self) -> i32 {
        match self {
            ColorFormat::L => 1,
            ColorFormat::Rgb
            | ColorFormat::Rbg
            | ColorFormat::Grb
            | ColorFormat::Gbr
            | ColorFormat::Brg
            | ColorFormat::Bgr
            | ColorFormat::Cmy => 3,
            ColorFormat::Rgba | ColorFormat::Rgbw | ColorFormat::Grbw | ColorFormat::Wrgb => 4,
            ColorFormat::Rgbwa | ColorFormat::Rgbaw | ColorFormat::Wargb => 5,
        }
    }

    /// Canonical name as it appears in Resolume XML.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ColorFormat::Rgb => "RGB",
            ColorFormat::Rbg => "RBG",
            ColorFormat::Grb => "GRB",
            ColorFormat::Gbr => "GBR",
            ColorFormat::Brg => "BRG",
            ColorFormat::Bgr => "BGR",
            ColorFormat::L => "L",
            ColorFormat::Rgba => "RGBA",
            ColorFormat::Rgbw => "RGBW",
            ColorFormat::Rgbwa => "RGBWA",
            ColorFormat::Rgbaw => "RGBAW",
            ColorFormat::Grbw => "GRBW",
            ColorFormat::Wrgb => "WRGB",
            ColorFormat::Wargb => "WARGB",
            ColorFormat::Cmy => "CMY",
        }
    }

    /// Look up a format by name, case-insensitively. Returns `None` for
    /// anything outside the closed set — callers turn that into a
    /// construction error rather than defaulting.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        const ALL: [ColorFormat; 15] = [
            ColorFormat::Rgb,
            ColorFormat::Rbg,
            ColorFormat::Grb,
            ColorFormat::Gbr,
            ColorFormat::Brg,
            ColorFormat::Bgr,
            ColorFormat::L,
            ColorFormat::Rgba,
            ColorFormat::Rgbw,
            ColorFormat::Rgbwa,
            ColorFormat::Rgbaw,
            ColorFormat::Grbw,
            ColorFormat::Wrgb,
            ColorFormat::Wargb,
            ColorFormat::Cmy,
        ];
        ALL.into_iter().find(|f| f.name().eq_ignore_ascii_case(name))
    }
}

// ── Pixel distribution ──────────────────────────────────────────────

/// Declared pixel-scan direction, keyed by Resolume's integer codes.
///
/// Parsed and carried for fidelity with the source document, but never
/// consulted by [`Fixture::dmx_entries`] — output tables are always
/// column-major regardless of this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelDistribution {
    LeftToRight,
    RightToLeft,
    BottomToTop,
    TopToBottom,
}

impl PixelDistribution {
    /// Resolume's enumerated value for this distribution.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            PixelDistribution::LeftToRight => 170,
            PixelDistribution::RightToLeft => 102,
            PixelDistribution::BottomToTop => 154,
            PixelDistribution::TopToBottom => 166,
        }
    }

    /// Look up a distribution by Resolume's integer code.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            170 => Some(PixelDistribution::LeftToRight),
            102 => Some(PixelDistribution::RightToLeft),
            154 => Some(PixelDistribution::BottomToTop),
            166 => Some(PixelDistribution::TopToBottom),
            _ => None,
        }
    }
}

// ── Fixture ─────────────────────────────────────────────────────────

/// One DMX slice of a pixel map: a pixel grid mapped onto an arbitrary
/// quadrilateral in canvas space, assigned a contiguous run of DMX
/// channels starting at `start_channel` in `universe`.
///
/// Built whole by the importer and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub name: String,
    /// Carried from the source document; disabled fixtures still expand.
    pub enabled: bool,
    /// Combined universe id: `universe + (subnet << 4)`.
    pub universe: i32,
    /// First DMX channel used by this fixture's first pixel (1-based).
    pub start_channel: i32,
    pub top_left: Point2,
    pub top_right: Point2,
    pub bottom_right: Point2,
    pub bottom_left: Point2,
    /// Number of discrete pixels laid out across the quadrilateral.
    pub grid: GridSize,
    pub color_format: ColorFormat,
    pub distribution: PixelDistribution,
}

impl Fixture {
    /// Expand this fixture into one DMX table entry per pixel.
    ///
    /// Pixels are walked column-major (outer `x`, inner `y`). Each pixel's
    /// canvas position is a bilinear blend across the quadrilateral with
    /// the *grid size* as divisor — the last row/column deliberately never
    /// reaches the far edges. Coordinates round half away from zero.
    /// The channel counter advances by the color format's width per pixel
    /// with no 512-wraparound; splitting over-long runs is the consumer's
    /// concern.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn dmx_entries(&self) -> Vec<DmxTableEntry> {
        let mut entries = Vec::new();
        let mut channel = self.start_channel;

        for x in 0..self.grid.width {
            let norm_x = x as f32 / self.grid.width as f32;

            let top = Point2::lerp(self.top_left, self.top_right, norm_x);
            let bottom = Point2::lerp(self.bottom_left, self.bottom_right, norm_x);

            for y in 0..self.grid.height {
                let norm_y = y as f32 / self.grid.height as f32;
                let point = Point2::lerp(top, bottom, norm_y);

                // f32::round rounds half away from zero, matching the
                // reference tool's midpoint behavior.
                entries.push(DmxTableEntry {
                    x: point.x.round() as i32,
                    y: point.y.round() as i32,
                    universe: self.universe,
                    channel,
                });

                channel += self.color_format.channel_width();
            }
        }

        entries
    }
}

// ── Fixture profiles ────────────────────────────────────────────────

/// A fixture definition from the Resolume fixture library: the reusable
/// template a pixel-map slice instantiates. Not needed for table
/// generation itself (slices embed their own copy of these parameters),
/// but used to inventory the library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureProfile {
    /// Library GUID, normalized to lowercase without braces.
    pub id: String,
    pub name: String,
    pub grid: GridSize,
    pub distribution: PixelDistribution,
    pub color_format: ColorFormat,
}

// ── Tests ───────────────────────────────────────────────────────────
