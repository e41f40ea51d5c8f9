//! Importer for Resolume Arena XML: advanced output presets (pixel maps)
//! and fixture library definitions.
//!
//! Parsing is total-or-error: the first missing element, missing
//! attribute, or malformed value aborts the whole build with a
//! descriptive [`ImportError`]. There is no partial model.
//!
//! Resolume writes numeric parameter values as float strings even for
//! integer-valued fields ("25.000000" for a start channel); those are
//! floored, not rounded. The composition texture size is a plain integer
//! attribute and parsed strictly.

use std::fs;
use std::path::Path;

use crate::import::xml::XmlElement;
use crate::import::ImportError;
use crate::model::fixture::{
    ColorFormat, Fixture, FixtureProfile, GridSize, PixelDistribution, Point2,
};
use crate::model::pixelmap::PixelMap;

// ── File fronts ─────────────────────────────────────────────────────

/// Read and parse an advanced output preset file.
pub fn load_pixel_map(path: &Path) -> Result<PixelMap, ImportError> {
    let data = fs::read(path)?;
    let root = XmlElement::parse(&data)?;
    parse_pixel_map(&root)
}

/// Read and parse a fixture library definition file.
pub fn load_fixture_profile(path: &Path) -> Result<FixtureProfile, ImportError> {
    let data = fs::read(path)?;
    let root = XmlElement::parse(&data)?;
    parse_fixture_profile(&root)
}

// ── Pixel map (advanced output preset) ──────────────────────────────

/// Build a [`PixelMap`] from a preset document's root element.
pub fn parse_pixel_map(root: &XmlElement) -> Result<PixelMap, ImportError> {
    let name = root.required_attribute("name")?.to_string();

    let screen_setup = root.required_element("ScreenSetup")?;
    let texture_size = screen_setup.required_element("CurrentCompositionTextureSize")?;
    let size = GridSize::new(
        int_attr(texture_size, "width")?,
        int_attr(texture_size, "height")?,
    );

    let screens = screen_setup.required_element("screens")?;

    let mut fixtures = Vec::new();
    for screen in screens.elements("DmxScreen") {
        parse_dmx_screen(screen, &mut fixtures)?;
    }

    Ok(PixelMap {
        name,
        size,
        fixtures,
    })
}

/// Parse one `DmxScreen`: its output device determines the combined
/// universe id shared by every slice on the screen.
fn parse_dmx_screen(screen: &XmlElement, fixtures: &mut Vec<Fixture>) -> Result<(), ImportError> {
    let output_params = screen
        .required_element("OutputDevice")?
        .required_element("OutputDeviceDmx")?
        .required_element("DmxOutputParams")?;

    let subnet = output_params
        .find_by_attr("ParamRange", "name", "Subnet")?
        .attr_as_f64("value")?;
    let universe = output_params
        .find_by_attr("ParamRange", "name", "Universe")?
        .attr_as_f64("value")?;

    // Subnet and universe are floored independently before combining.
    let combined_universe = floor_to_i32(universe) + (floor_to_i32(subnet) << 4);

    let layers = screen.required_element("layers")?;
    for slice in layers.elements("DmxSlice") {
        fixtures.push(parse_dmx_slice(slice, combined_universe)?);
    }

    Ok(())
}

/// Parse one `DmxSlice` into a [`Fixture`].
fn parse_dmx_slice(slice: &XmlElement, universe: i32) -> Result<Fixture, ImportError> {
    let common = slice.find_by_attr("Params", "name", "Common")?;
    let name = common
        .find_by_attr("Param", "name", "Name")?
        .required_attribute("value")?
        .to_string();
    let enabled = common
        .find_by_attr("Param", "name", "Enabled")?
        .attr_as_bool("value")?;

    let input = slice.find_by_attr("Params", "name", "Input")?;
    let start_channel = floor_to_i32(
        input
            .find_by_attr("ParamRange", "name", "Start Channel")?
            .attr_as_f64("value")?,
    );

    let rect = slice.required_element("InputRect")?;
    let corners = rect
        .elements("v")
        .map(|v| Ok(Point2::new(v.attr_as_f32("x")?, v.attr_as_f32("y")?)))
        .collect::<Result<Vec<Point2>, ImportError>>()?;
    let [top_left, top_right, bottom_right, bottom_left]: [Point2; 4] =
        corners
            .try_into()
            .map_err(|got: Vec<Point2>| ImportError::InvalidValue {
                attribute: "v".into(),
                value: got.len().to_string(),
                expected: "exactly 4 corner points in InputRect",
            })?;

    let pixels = slice
        .required_element("FixtureInstance")?
        .required_element("Fixture")?
        .required_element("Params")?
        .required_element("ParamFixturePixels")?;

    let (grid, color_format, distribution) = parse_fixture_pixels(pixels)?;

    Ok(Fixture {
        name,
        enabled,
        universe,
        start_channel,
        top_left,
        top_right,
        bottom_right,
        bottom_left,
        grid,
        color_format,
        distribution,
    })
}

/// Parse a `ParamFixturePixels` block, shared between slices and library
/// profiles: grid size, color format (by case-insensitive name) and
/// distribution (by Resolume's integer code).
fn parse_fixture_pixels(
    pixels: &XmlElement,
) -> Result<(GridSize, ColorFormat, PixelDistribution), ImportError> {
    let width = floor_to_i32(
        pixels
            .find_by_attr("ParamRange", "name", "Width")?
            .attr_as_f64("value")?,
    );
    let height = floor_to_i32(
        pixels
            .find_by_attr("ParamRange", "name", "Height")?
            .attr_as_f64("value")?,
    );

    let format_el = pixels.find_by_attr("ParamChoice", "name", "Color Format")?;
    let format_raw = format_el.required_attribute("value")?;
    let color_format =
        ColorFormat::from_name(format_raw).ok_or_else(|| ImportError::InvalidValue {
            attribute: "value".into(),
            value: format_raw.into(),
            expected: "color format name",
        })?;

    let distribution_el = pixels.find_by_attr("ParamChoice", "name", "Distribution")?;
    let code = distribution_el.attr_as_i64("value")?;
    let distribution =
        PixelDistribution::from_code(code).ok_or_else(|| ImportError::InvalidValue {
            attribute: "value".into(),
            value: code.to_string(),
            expected: "pixel distribution code",
        })?;

    Ok((GridSize::new(width, height), color_format, distribution))
}

// ── Fixture profiles (fixture library) ──────────────────────────────

/// Build a [`FixtureProfile`] from a fixture library document's root.
pub fn parse_fixture_profile(root: &XmlElement) -> Result<FixtureProfile, ImportError> {
    let id = root.attr_as_guid("uuid")?;
    let name = root.required_attribute("fixtureName")?.to_string();

    let pixels = root
        .required_element("Params")?
        .required_element("ParamFixturePixels")?;
    let (grid, color_format, distribution) = parse_fixture_pixels(pixels)?;

    Ok(FixtureProfile {
        id,
        name,
        grid,
        distribution,
        color_format,
    })
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Strict integer attribute, truncated to i32 like the canvas fields.
#[allow(clippy::cast_possible_truncation)]
fn int_attr(el: &XmlElement, name: &str) -> Result<i32, ImportError> {
    Ok(el.attr_as_i64(name)? as i32)
}

/// Truncate a float string's value toward negative infinity, the way
/// Resolume's integer-valued ParamRanges are read.
#[allow(clippy::cast_possible_truncation)]
fn floor_to_i32(value: f64) -> i32 {
    value.floor() as i32
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    /// A minimal but structurally faithful advanced output preset.
    const PRESET: &[u8] = br#"<?xml version="1.0" encoding="utf-8"?>
<XmlState name="Club wall">
  <ScreenSetup>
    <CurrentCompositionTextureSize width="1920" height="1080"/>
    <screens>
      <DmxScreen name="Screen 1">
        <OutputDevice>
          <OutputDeviceDmx>
            <DmxOutputParams>
              <ParamRange name="Subnet" value="1.000000"/>
              <ParamRange name="Universe" value="2.000000"/>
            </DmxOutputParams>
          </OutputDeviceDmx>
        </OutputDevice>
        <layers>
          <DmxSlice>
            <Params name="Common">
              <Param name="Name" value="Strip A"/>
              <Param name="Enabled" value="1"/>
            </Params>
            <Params name="Input">
              <ParamRange name="Start Channel" value="25.000000"/>
            </Params>
            <InputRect>
              <v x="0.000000" y="0.000000"/>
              <v x="10.000000" y="0.000000"/>
              <v x="10.000000" y="10.000000"/>
              <v x="0.000000" y="10.000000"/>
            </InputRect>
            <FixtureInstance>
              <Fixture name="Generic strip">
                <Params>
                  <ParamFixturePixels>
                    <ParamRange name="Width" value="2.900000"/>
                    <ParamRange name="Height" value="2.000000"/>
                    <ParamChoice name="Color Format" value="RGB"/>
                    <ParamChoice name="Distribution" value="170"/>
                  </ParamFixturePixels>
                </Params>
              </Fixture>
            </FixtureInstance>
          </DmxSlice>
        </layers>
      </DmxScreen>
    </screens>
  </ScreenSetup>
</XmlState>"#;

    fn preset_with(from: &str, to: &str) -> Vec<u8> {
        let text = String::from_utf8(PRESET.to_vec()).unwrap();
        assert!(text.contains(from), "fixture template must contain {from}");
        text.replace(from, to).into_bytes()
    }

    #[test]
    fn test_parse_full_preset() {
        let root = XmlElement::parse(PRESET).unwrap();
        let map = parse_pixel_map(&root).unwrap();

        assert_eq!(map.name, "Club wall");
        assert_eq!(map.size, GridSize::new(1920, 1080));
        assert_eq!(map.fixtures.len(), 1);

        let fixture = &map.fixtures[0];
        assert_eq!(fixture.name, "Strip A");
        assert!(fixture.enabled);
        // universe 2 + (subnet 1 << 4)
        assert_eq!(fixture.universe, 18);
        assert_eq!(fixture.start_channel, 25);
        assert_eq!(fixture.top_left, Point2::new(0.0, 0.0));
        assert_eq!(fixture.top_right, Point2::new(10.0, 0.0));
        assert_eq!(fixture.bottom_right, Point2::new(10.0, 10.0));
        assert_eq!(fixture.bottom_left, Point2::new(0.0, 10.0));
        // Width "2.900000" floors to 2.
        assert_eq!(fixture.grid, GridSize::new(2, 2));
        assert_eq!(fixture.color_format, ColorFormat::Rgb);
        assert_eq!(fixture.distribution, PixelDistribution::LeftToRight);
    }

    #[test]
    fn test_float_strings_floor_not_round() {
        let xml = preset_with(
            r#"<ParamRange name="Start Channel" value="25.000000"/>"#,
            r#"<ParamRange name="Start Channel" value="25.999999"/>"#,
        );
        let root = XmlElement::parse(&xml).unwrap();
        let map = parse_pixel_map(&root).unwrap();
        assert_eq!(map.fixtures[0].start_channel, 25);
    }

    #[test]
    fn test_enabled_zero_is_false() {
        let xml = preset_with(
            r#"<Param name="Enabled" value="1"/>"#,
            r#"<Param name="Enabled" value="0"/>"#,
        );
        let root = XmlElement::parse(&xml).unwrap();
        let map = parse_pixel_map(&root).unwrap();
        assert!(!map.fixtures[0].enabled);
    }

    #[test]
    fn test_missing_width_param_aborts_build() {
        let xml = preset_with(r#"<ParamRange name="Width" value="2.900000"/>"#, "");
        let root = XmlElement::parse(&xml).unwrap();
        match parse_pixel_map(&root) {
            Err(ImportError::MissingElement { name, parent }) => {
                assert_eq!(name, "ParamRange[name='Width']");
                assert_eq!(parent, "ParamFixturePixels");
            }
            other => panic!("expected MissingElement, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_color_format_is_invalid_value() {
        let xml = preset_with(
            r#"<ParamChoice name="Color Format" value="RGB"/>"#,
            r#"<ParamChoice name="Color Format" value="HSL"/>"#,
        );
        let root = XmlElement::parse(&xml).unwrap();
        match parse_pixel_map(&root) {
            Err(ImportError::InvalidValue { value, expected, .. }) => {
                assert_eq!(value, "HSL");
                assert_eq!(expected, "color format name");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_distribution_code_is_invalid_value() {
        let xml = preset_with(
            r#"<ParamChoice name="Distribution" value="170"/>"#,
            r#"<ParamChoice name="Distribution" value="999"/>"#,
        );
        let root = XmlElement::parse(&xml).unwrap();
        match parse_pixel_map(&root) {
            Err(ImportError::InvalidValue { value, expected, .. }) => {
                assert_eq!(value, "999");
                assert_eq!(expected, "pixel distribution code");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_corner_count_rejected() {
        let xml = preset_with(r#"<v x="0.000000" y="10.000000"/>"#, "");
        let root = XmlElement::parse(&xml).unwrap();
        match parse_pixel_map(&root) {
            Err(ImportError::InvalidValue { value, expected, .. }) => {
                assert_eq!(value, "3");
                assert_eq!(expected, "exactly 4 corner points in InputRect");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_screen_without_slices_contributes_nothing() {
        let text = String::from_utf8(PRESET.to_vec())
            .unwrap()
            .replace("<DmxSlice>", "<OtherSlice>")
            .replace("</DmxSlice>", "</OtherSlice>");
        let root = XmlElement::parse(text.as_bytes()).unwrap();
        let map = parse_pixel_map(&root).unwrap();
        assert!(map.fixtures.is_empty());
    }

    #[test]
    fn test_end_to_end_table_from_preset() {
        let root = XmlElement::parse(PRESET).unwrap();
        let map = parse_pixel_map(&root).unwrap();
        let table = map.compute_dmx_table().unwrap();

        // 2x2 grid on a 10x10 quad, RGB from channel 25, universe 18,
        // column-major.
        let rows: Vec<(i32, i32, i32, i32)> = table
            .entries
            .iter()
            .map(|e| (e.x, e.y, e.universe, e.channel))
            .collect();
        assert_eq!(
            rows,
            vec![
                (0, 0, 18, 25),
                (0, 5, 18, 28),
                (5, 0, 18, 31),
                (5, 5, 18, 34),
            ]
        );
    }

    #[test]
    fn test_load_pixel_map_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("dmxtablegen_does_not_exist.xml");
        assert!(matches!(
            load_pixel_map(&path),
            Err(ImportError::Io(_))
        ));
    }

    const PROFILE: &[u8] = br#"<?xml version="1.0" encoding="utf-8"?>
<FixtureDefinition uuid="8B9BBF77-6075-4f81-A067-7C0BBBEF2A2B" fixtureName="LED Tile 8x8">
  <Params>
    <ParamFixturePixels>
      <ParamRange name="Width" value="8.000000"/>
      <ParamRange name="Height" value="8.000000"/>
      <ParamChoice name="Color Format" value="GRB"/>
      <ParamChoice name="Distribution" value="166"/>
    </ParamFixturePixels>
  </Params>
</FixtureDefinition>"#;

    #[test]
    fn test_parse_fixture_profile() {
        let root = XmlElement::parse(PROFILE).unwrap();
        let profile = parse_fixture_profile(&root).unwrap();

        assert_eq!(profile.id, "8b9bbf77-6075-4f81-a067-7c0bbbef2a2b");
        assert_eq!(profile.name, "LED Tile 8x8");
        assert_eq!(profile.grid, GridSize::new(8, 8));
        assert_eq!(profile.color_format, ColorFormat::Grb);
        assert_eq!(profile.distribution, PixelDistribution::TopToBottom);
    }

    #[test]
    fn test_profile_with_bad_uuid_rejected() {
        let text = String::from_utf8(PROFILE.to_vec())
            .unwrap()
            .replace("8B9BBF77-6075-4f81-A067-7C0BBBEF2A2B", "nope");
        let root = XmlElement::parse(text.as_bytes()).unwrap();
        assert!(matches!(
            parse_fixture_profile(&root),
            Err(ImportError::InvalidValue { .. })
        ));
    }
}
