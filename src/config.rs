//! Configuration for the `germ-frames` command-line tool.
//!
//! This module provides the CLI configuration, which supports:
//! - Command-line arguments via clap
//! - Environment variables with `GERM_` prefix
//! - Defaults for all optional settings
//!
//! # Environment Variables
//!
//! - `GERM_SPEC` - Format tag for `read` (e.g. `AD_HDF5_GERM`)
//! - `GERM_ROOT_MAP` - Root substitutions for `resolve`, as `FROM=TO[,FROM=TO...]`
//! - `GERM_OUTPUT` - Output format, `text` or `json` (default: text)
//!
//! `GERM_ROOT_MAP` applies to `nexus` as well.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::format::DetectorValue;
use crate::frame::RootMap;

// =============================================================================
// Default Values
// =============================================================================

/// Default log filter.
pub const DEFAULT_LOG_FILTER: &str = "germ_frames=info";

/// Log filter with `--verbose`.
pub const VERBOSE_LOG_FILTER: &str = "germ_frames=debug";

/// File extension required for previews.
pub const PREVIEW_EXTENSION: &str = "png";

// =============================================================================
// CLI Arguments
// =============================================================================

/// germ-frames - Read GeRM detector frames from TIFF and HDF5 files.
#[derive(Parser, Debug, Clone)]
#[command(name = "germ-frames")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Read one frame from a file with the handler for a format tag.
    Read(ReadConfig),

    /// Resolve a resource/datum document pair to a frame.
    Resolve(ResolveConfig),

    /// Report which container a file uses.
    Detect(DetectConfig),

    /// Write the NeXus file linking to an HDF5 resource's frames.
    Nexus(NexusConfig),

    /// List registered format tags.
    Specs,
}

/// How reports are printed.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,

    /// A single JSON object
    Json,
}

/// Options shared by commands that read a frame.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output format for the frame report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "GERM_OUTPUT")]
    pub output: OutputFormat,

    /// Also write the frame as a grayscale PNG.
    #[arg(long)]
    pub preview: Option<PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl OutputArgs {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref preview) = self.preview {
            let is_png = preview
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(PREVIEW_EXTENSION));
            if !is_png {
                return Err(format!(
                    "Preview path must end in .{}: {}",
                    PREVIEW_EXTENSION,
                    preview.display()
                ));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Read Command
// =============================================================================

/// Configuration for `read`.
#[derive(Args, Debug, Clone)]
pub struct ReadConfig {
    /// Format specification tag of the handler to use.
    #[arg(long, env = "GERM_SPEC")]
    pub spec: String,

    /// Path of the TIFF or HDF5 file.
    #[arg(long)]
    pub path: PathBuf,

    /// Frame index (required by AD_HDF5_GERM, rejected by AD_TIFF_GERM).
    #[arg(long)]
    pub frame: Option<usize>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl ReadConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.spec.trim().is_empty() {
            return Err("Format spec is required. Set --spec or GERM_SPEC".to_string());
        }
        if self.path.as_os_str().is_empty() {
            return Err("File path must not be empty".to_string());
        }
        self.output.validate()
    }
}

// =============================================================================
// Resolve Command
// =============================================================================

/// Configuration for `resolve`.
#[derive(Args, Debug, Clone)]
pub struct ResolveConfig {
    /// Resource document (JSON file).
    #[arg(long)]
    pub resource: PathBuf,

    /// Datum document (JSON file).
    #[arg(long)]
    pub datum: PathBuf,

    /// Root substitutions, `FROM=TO` (comma-separated).
    #[arg(
        long = "root-map",
        env = "GERM_ROOT_MAP",
        value_delimiter = ',',
        value_parser = parse_root_mapping
    )]
    pub root_map: Vec<(PathBuf, PathBuf)>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl ResolveConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        validate_root_map(&self.root_map)?;
        self.output.validate()
    }

    pub fn root_map(&self) -> RootMap {
        self.root_map.iter().cloned().collect()
    }
}

fn validate_root_map(entries: &[(PathBuf, PathBuf)]) -> Result<(), String> {
    for (i, (from, _)) in entries.iter().enumerate() {
        if entries[..i].iter().any(|(f, _)| f == from) {
            return Err(format!(
                "Root {} is mapped more than once",
                from.display()
            ));
        }
    }
    Ok(())
}

/// Parse a `FROM=TO` root substitution.
pub fn parse_root_mapping(s: &str) -> Result<(PathBuf, PathBuf), String> {
    let (from, to) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected FROM=TO, got {s:?}"))?;
    if from.is_empty() || to.is_empty() {
        return Err(format!("Both sides of a root mapping must be set: {s:?}"));
    }
    Ok((PathBuf::from(from), PathBuf::from(to)))
}

// =============================================================================
// NeXus Command
// =============================================================================

/// Configuration for `nexus`.
#[derive(Args, Debug, Clone)]
pub struct NexusConfig {
    /// Resource document (JSON file) of an AD_HDF5_GERM frame stack.
    #[arg(long)]
    pub resource: PathBuf,

    /// Root substitutions, `FROM=TO` (comma-separated).
    #[arg(
        long = "root-map",
        env = "GERM_ROOT_MAP",
        value_delimiter = ',',
        value_parser = parse_root_mapping
    )]
    pub root_map: Vec<(PathBuf, PathBuf)>,

    /// Detector parameter, `KEY=VALUE` (repeatable).
    #[arg(long = "param", value_parser = parse_detector_parameter)]
    pub params: Vec<(String, DetectorValue)>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl NexusConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        validate_root_map(&self.root_map)?;
        for (i, (key, _)) in self.params.iter().enumerate() {
            if self.params[..i].iter().any(|(k, _)| k == key) {
                return Err(format!("Parameter {key} is set more than once"));
            }
        }
        Ok(())
    }

    pub fn root_map(&self) -> RootMap {
        self.root_map.iter().cloned().collect()
    }
}

/// Parse a `KEY=VALUE` detector parameter.
pub fn parse_detector_parameter(s: &str) -> Result<(String, DetectorValue), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected KEY=VALUE, got {s:?}"))?;
    if key.is_empty() {
        return Err(format!("Parameter name must be set: {s:?}"));
    }
    let value = match value.parse::<DetectorValue>() {
        Ok(v) => v,
        Err(never) => match never {},
    };
    Ok((key.to_string(), value))
}

// =============================================================================
// Detect Command
// =============================================================================

/// Configuration for `detect`.
#[derive(Args, Debug, Clone)]
pub struct DetectConfig {
    /// File to examine.
    pub path: PathBuf,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

// =============================================================================
// Tests
// =============================================================================
