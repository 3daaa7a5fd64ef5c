use crate::build_runner::BuildRunner;
use crate::config::{DocsConfig, SpliceConfig};
use crate::openapi_builder::{OpenApiBuilder, OpenApiDocument};
use crate::scanner::SourceScanner;
use crate::section::{extract_section, ExtractedSection};
use crate::serializer::write_documents;
use crate::splice::SpliceWriter;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

/// API doc generator for the firmware project - builds OpenAPI files from registration calls
#[derive(Parser, Debug)]
#[command(name = "apidoc-from-source")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan the sources and write openapi.json and openapi.yaml
    Docs(DocsArgs),
    /// Copy the API sections into the doc generator, then build and run it
    Splice(SpliceArgs),
}

#[derive(Args, Debug)]
pub struct DocsArgs {
    /// Path to the firmware project directory
    #[arg(long = "root", value_name = "DIR", default_value = ".")]
    pub project_path: PathBuf,

    /// Entry file with the APIServer declaration [default: <root>/src/main.cpp]
    #[arg(long = "entry", value_name = "FILE")]
    pub entry_file: Option<PathBuf>,

    /// Directory scanned for module headers [default: <root>/lib]
    #[arg(long = "lib", value_name = "DIR")]
    pub library_dir: Option<PathBuf>,

    /// Output directory [default: <root>/data]
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SpliceArgs {
    /// Path to the firmware project directory
    #[arg(long = "root", value_name = "DIR", default_value = ".")]
    pub project_path: PathBuf,

    /// Directory holding gen.cpp and its CMake project [default: <root>/tools]
    #[arg(long = "tools", value_name = "DIR")]
    pub tools_dir: Option<PathBuf>,

    /// Source of the @MAIN_COPY section [default: <root>/src/main.cpp]
    #[arg(long = "main", value_name = "FILE")]
    pub main_file: Option<PathBuf>,

    /// Source of the @APIMODULE_COPY section
    /// [default: <root>/lib/WiFiManager/src/WiFiManagerAPI.h]
    #[arg(long = "module-header", value_name = "FILE")]
    pub module_header: Option<PathBuf>,

    /// Generator file the sections are spliced into [default: <tools>/gen.cpp]
    #[arg(long = "target", value_name = "FILE")]
    pub target: Option<PathBuf>,

    /// Do not update gen.cpp
    #[arg(long = "no-splice")]
    pub no_splice: bool,

    /// Do not configure, build and run the generator
    #[arg(long = "no-build")]
    pub no_build: bool,
}

impl DocsArgs {
    pub fn to_config(&self) -> DocsConfig {
        let mut config = DocsConfig::for_project(&self.project_path);
        if let Some(ref entry) = self.entry_file {
            config.entry_file = entry.clone();
        }
        if let Some(ref lib) = self.library_dir {
            config.library_dir = lib.clone();
        }
        if let Some(ref output) = self.output_dir {
            config.output_dir = output.clone();
        }
        config
    }
}

impl SpliceArgs {
    pub fn to_config(&self) -> SpliceConfig {
        let mut config = SpliceConfig::for_project(&self.project_path, self.tools_dir.as_deref());
        if let Some(ref main) = self.main_file {
            config.sources[0].path = main.clone();
        }
        if let Some(ref header) = self.module_header {
            config.sources[1].path = header.clone();
        }
        if let Some(ref target) = self.target {
            config.target = target.clone();
        }
        config.enable_splice = !self.no_splice;
        config.enable_build = !self.no_build;
        config
    }
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    let project_path = match &args.command {
        Command::Docs(docs) => &docs.project_path,
        Command::Splice(splice) => &splice.project_path,
    };
    validate_project_path(project_path)?;
    info!("Project path: {}", project_path.display());

    Ok(args)
}

fn validate_project_path(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Project path does not exist: {}", path.display());
    }
    if !path.is_dir() {
        anyhow::bail!("Project path is not a directory: {}", path.display());
    }
    Ok(())
}

/// Run the selected pipeline.
///
/// Returns `Ok(false)` when the splice pipeline's build failed.
pub fn run(args: CliArgs) -> Result<bool> {
    match args.command {
        Command::Docs(docs) => {
            run_docs(&docs.to_config())?;
            Ok(true)
        }
        Command::Splice(splice) => Ok(run_splice(&splice.to_config())),
    }
}

/// Scans the firmware sources and writes the OpenAPI files.
///
/// Missing inputs only produce warnings and an emptier document; write failures
/// are returned.
pub fn run_docs(config: &DocsConfig) -> Result<OpenApiDocument> {
    info!("Starting OpenAPI document generation...");

    // Step 1: API info from the entry file
    let api_info = SourceScanner::extract_api_info(&config.entry_file);

    // Step 2: modules from the library headers
    let registry = SourceScanner::scan_modules(&config.library_dir);
    if registry.is_empty() {
        warn!("No API modules found in {}", config.library_dir.display());
    }

    // Step 3: build and write the document
    let document = OpenApiBuilder::build(api_info.as_ref(), &registry);
    let (json_path, yaml_path) = write_documents(&document, &config.output_dir)?;

    info!("Generation complete!");
    info!("Summary:");
    info!("  - API info: {}", if api_info.is_some() { "found" } else { "missing" });
    info!("  - Modules: {}", registry.len());
    info!("  - Paths: {}", document.paths.len());
    info!("  - Written: {}, {}", json_path.display(), yaml_path.display());

    Ok(document)
}

/// Splices the marked sections into the generator, then builds and runs it.
///
/// Each half can be switched off in `config`. Returns `false` only when the
/// build pipeline ran and failed; splice problems are logged and the build
/// still runs.
pub fn run_splice(config: &SpliceConfig) -> bool {
    if config.enable_splice {
        info!("Processing files:");
        for source in &config.sources {
            info!("- {}: {}", source.marker, source.path.display());
        }
        info!("- Generator: {}", config.target.display());

        let sections: Vec<ExtractedSection> = config
            .sources
            .iter()
            .map(|source| ExtractedSection {
                marker: source.marker.clone(),
                text: extract_section(&source.path, &source.start, &source.end),
            })
            .collect();

        for section in &sections {
            match &section.text {
                Some(text) => info!(
                    "Section {} extracted ({} characters)",
                    section.marker,
                    text.chars().count()
                ),
                None => warn!("Section {} could not be extracted", section.marker),
            }
        }

        match SpliceWriter::splice(&config.target, &sections) {
            Ok(report) => debug!("Splice report: {:?}", report),
            Err(e) => error!("Failed to update generator: {:#}", e),
        }
    } else {
        info!("Section splicing disabled");
    }

    if config.enable_build {
        BuildRunner::new(config.build.clone()).run()
    } else {
        info!("Build disabled");
        true
    }
}
