//! germ-frames - Read GeRM detector frames from TIFF and HDF5 files.
//!
//! This binary wires the CLI configuration to the handler registry.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use germ_frames::{
    config::{
        Cli, Command, DetectConfig, NexusConfig, OutputArgs, OutputFormat, ReadConfig,
        ResolveConfig, DEFAULT_LOG_FILTER, VERBOSE_LOG_FILTER,
    },
    detect_container, export_resource, write_preview, DatumDocument, DatumKwargs,
    DetectorParameters, FormatSpec, FrameReport, HandlerRegistry, PixelArray, ResourceDocument,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Read(config) => run_read(config),
        Command::Resolve(config) => run_resolve(config),
        Command::Detect(config) => run_detect(config),
        Command::Nexus(config) => run_nexus(config),
        Command::Specs => run_specs(),
    }
}

// =============================================================================
// Read Command
// =============================================================================

fn run_read(config: ReadConfig) -> ExitCode {
    init_logging(config.output.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let registry = HandlerRegistry::new();
    let reader = match registry.open(&config.spec, &config.path) {
        Ok(r) => r,
        Err(e) => {
            error!("{}", e);
            error!("Registered specs: {}", registry.specs().join(", "));
            return ExitCode::FAILURE;
        }
    };

    let datum = DatumKwargs {
        frame: config.frame,
    };
    match reader.read_frame(&datum) {
        Ok(pixels) => {
            let report = FrameReport::new(&config.spec, reader.path(), config.frame, &pixels);
            emit(&report, &pixels, &config.output)
        }
        Err(e) => {
            error!("Failed to read {}: {}", reader.path().display(), e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Resolve Command
// =============================================================================

fn run_resolve(config: ResolveConfig) -> ExitCode {
    init_logging(config.output.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let resource = match ResourceDocument::from_json_file(&config.resource) {
        Ok(r) => r,
        Err(e) => {
            error!("Failed to load resource {}: {}", config.resource.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let datum = match DatumDocument::from_json_file(&config.datum) {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to load datum {}: {}", config.datum.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let root_map = config.root_map();
    let path = resource.mapped_path(&root_map);
    info!("Resolving datum {} from {}", datum.datum_id, path.display());

    let registry = HandlerRegistry::new();
    match registry.resolve(&resource, &datum, &root_map) {
        Ok(pixels) => {
            let report =
                FrameReport::new(&resource.spec, &path, datum.datum_kwargs.frame, &pixels);
            emit(&report, &pixels, &config.output)
        }
        Err(e) => {
            error!("Failed to resolve datum {}: {}", datum.datum_id, e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Detect Command
// =============================================================================

fn run_detect(config: DetectConfig) -> ExitCode {
    init_logging(config.verbose);

    match detect_container(&config.path) {
        Ok(kind) => {
            println!("{}: {}", config.path.display(), kind.name());
            println!("suggested spec: {}", kind.suggested_spec());
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}: {}", config.path.display(), e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// NeXus Command
// =============================================================================

fn run_nexus(config: NexusConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let resource = match ResourceDocument::from_json_file(&config.resource) {
        Ok(r) => r,
        Err(e) => {
            error!("Failed to load resource {}: {}", config.resource.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let parameters: DetectorParameters = config.params.iter().cloned().collect();
    match export_resource(&resource, &config.root_map(), &parameters) {
        Ok(Some(path)) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Ok(None) => {
            error!(
                "Resource spec {} has no frame stack to export (expected {})",
                resource.spec,
                FormatSpec::AdHdf5Germ
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("Failed to export NeXus file: {}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Specs Command
// =============================================================================

fn run_specs() -> ExitCode {
    for spec in HandlerRegistry::new().specs() {
        match spec.parse::<FormatSpec>() {
            Ok(format) => println!("{spec}\t{}", format.name()),
            Err(_) => println!("{spec}"),
        }
    }
    ExitCode::SUCCESS
}

// =============================================================================
// Helpers
// =============================================================================

/// Print the report and write the preview if one was requested.
fn emit(report: &FrameReport, pixels: &PixelArray, output: &OutputArgs) -> ExitCode {
    match output.output {
        OutputFormat::Text => println!("{}", report.to_text()),
        OutputFormat::Json => match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("Failed to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    if let Some(ref preview) = output.preview {
        if let Err(e) = write_preview(pixels, preview) {
            error!("Failed to write preview {}: {}", preview.display(), e);
            return ExitCode::FAILURE;
        }
        info!("Preview written to {}", preview.display());
    }

    ExitCode::SUCCESS
}

fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
