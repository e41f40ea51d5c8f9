// CLI binary — collaborator layer only: argument parsing, directory
// scanning, file writing, and user-facing reporting live here.

use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use dmxtablegen::import::resolume;
use dmxtablegen::model::FixtureProfile;
use dmxtablegen::paths;

// ── CLI argument parsing ─────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "dmxtablegen",
    about = "Converts Resolume Arena advanced output pixel maps into Disguise DMX tables",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an advanced output preset into a DMX table CSV
    Convert {
        /// Path to the preset XML file
        input: PathBuf,
        /// Output CSV path (defaults to the input path with a .csv extension)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Print the table as JSON to stdout instead of writing a CSV
        #[arg(long)]
        json: bool,
    },
    /// List advanced output presets in the Resolume documents directory
    Scan {
        /// Resolume directory override (default: ~/Documents/Resolume Arena)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// List fixture definitions in the Resolume fixture library
    Fixtures {
        /// Resolume directory override (default: ~/Documents/Resolume Arena)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Print the library as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            json,
        } => convert(&input, output.as_deref(), json),
        Commands::Scan { dir } => scan(dir),
        Commands::Fixtures { dir, json } => fixtures(dir, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

// ── Commands ─────────────────────────────────────────────────────

fn convert(input: &Path, output: Option<&Path>, json: bool) -> Result<(), Box<dyn Error>> {
    let map = resolume::load_pixel_map(input)?;
    println!("Converting advanced output preset '{}'..", map.name);

    let table = map.compute_dmx_table()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    let output = output.map_or_else(|| input.with_extension("csv"), Path::to_path_buf);
    table.write_to_file(&output)?;

    println!("Conversion finished, created DMX table with {} entries", table.len());
    println!("CSV file written to {}", output.display());
    Ok(())
}

fn scan(dir: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let resolume_dir = resolume_dir_or(dir)?;
    let presets_dir = paths::advanced_output_presets_dir(&resolume_dir);
    if !presets_dir.is_dir() {
        return Err(format!(
            "couldn't find advanced output presets directory at {}",
            presets_dir.display()
        )
        .into());
    }

    let files = xml_files(&presets_dir)?;
    if files.is_empty() {
        println!("No advanced output presets found in {}", presets_dir.display());
        return Ok(());
    }

    for path in files {
        match resolume::load_pixel_map(&path) {
            Ok(map) => println!(
                "{}  ({} fixtures)",
                path.display(),
                map.fixtures.len()
            ),
            Err(e) => println!("{}  (unreadable: {e})", path.display()),
        }
    }
    Ok(())
}

fn fixtures(dir: Option<PathBuf>, json: bool) -> Result<(), Box<dyn Error>> {
    let resolume_dir = resolume_dir_or(dir)?;
    let library_dir = paths::fixture_library_dir(&resolume_dir);
    if !library_dir.is_dir() {
        return Err(format!(
            "couldn't find fixture library directory at {}",
            library_dir.display()
        )
        .into());
    }

    let mut profiles: Vec<FixtureProfile> = Vec::new();
    for path in xml_files(&library_dir)? {
        match resolume::load_fixture_profile(&path) {
            Ok(profile) => profiles.push(profile),
            // A listing is a report: skip unreadable definitions with a
            // warning rather than aborting the whole inventory.
            Err(e) => eprintln!("Warning: skipping {}: {e}", path.display()),
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&profiles)?);
        return Ok(());
    }

    if profiles.is_empty() {
        println!("No fixture definitions found in {}", library_dir.display());
        return Ok(());
    }

    for profile in &profiles {
        println!(
            "{}  {}  {}x{}  {} ({} ch/px)",
            profile.id,
            profile.name,
            profile.grid.width,
            profile.grid.height,
            profile.color_format.name(),
            profile.color_format.channel_width()
        );
    }
    Ok(())
}

// ── Helpers ──────────────────────────────────────────────────────

fn resolume_dir_or(dir: Option<PathBuf>) -> Result<PathBuf, Box<dyn Error>> {
    match dir {
        Some(dir) => Ok(dir),
        None => paths::resolume_dir()
            .filter(|dir| dir.is_dir())
            .ok_or_else(|| {
                "couldn't find Resolume directory in documents (pass --dir to override)"
                    .to_string()
                    .into()
            }),
    }
}

/// XML files directly inside `dir`, sorted by path for stable output.
fn xml_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
        })
        .collect();
    files.sort();
    Ok(files)
}
