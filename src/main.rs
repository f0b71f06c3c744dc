// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use crate::app_config::Config;
use crate::app_controller::{Controller, LoadedInput, ReportFormat, VoiceRequestOverrides};
use crate::file_utils::{ExportFile, FileManager, InputKind};
use crate::script::Scope;

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod project;
mod script;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for ReportFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliReportFormat {
    Text,
    Csv,
}

impl From<CliReportFormat> for ReportFormat {
    fn from(format: CliReportFormat) -> Self {
        match format {
            CliReportFormat::Text => ReportFormat::Text,
            CliReportFormat::Csv => ReportFormat::Csv,
        }
    }
}

/// Input path shared by every script command
#[derive(Args, Debug)]
struct InputArgs {
    /// Project file (.vwp/.json), scene file (.txt) or directory of scene files
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,
}

/// Where a rendered document goes
#[derive(Args, Debug)]
struct OutputArgs {
    /// Output file (defaults to a generated name in the configured output directory)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the document to stdout instead of writing a file
    #[arg(long, conflicts_with = "output")]
    stdout: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assign NNN sequence numbers to dialogue lines
    Number {
        #[command(flatten)]
        input: InputArgs,

        /// Only renumber this scene (1-based)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        scene: Option<u32>,

        /// Write the result back to the input instead of printing it
        #[arg(short, long)]
        write: bool,
    },

    /// Per-character statistics and billing report
    Stats {
        #[command(flatten)]
        input: InputArgs,

        /// Only count this scene (1-based)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        scene: Option<u32>,

        /// Price per character (defaults to billing.unit_price)
        #[arg(short = 'p', long)]
        unit_price: Option<f64>,

        /// Report format
        #[arg(short, long, value_enum, default_value = "text")]
        format: CliReportFormat,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List sound effect, ambient, adult and BGM cues by scene
    Cues {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List location cues by scene
    Locations {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Replace text using parallel from/to line lists
    Replace {
        #[command(flatten)]
        input: InputArgs,

        /// File with one search string per line
        #[arg(long, value_name = "FILE")]
        from: PathBuf,

        /// File with one replacement per line, aligned with --from
        #[arg(long, value_name = "FILE")]
        to: PathBuf,

        /// Only replace in this scene (1-based)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        scene: Option<u32>,

        /// Write the result back to the input instead of printing it
        #[arg(short, long)]
        write: bool,
    },

    /// Generate the voice-cast request letter
    Request {
        #[command(flatten)]
        input: InputArgs,

        /// Price per character (defaults to voice_request.unit_price)
        #[arg(short = 'p', long)]
        unit_price: Option<f64>,

        /// Delivery deadline (defaults to two weeks from today)
        #[arg(long)]
        deadline: Option<String>,

        /// Payment date (defaults to three weeks from today)
        #[arg(long)]
        payment: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Create a new project file
    New {
        /// Project file to create (.vwp or .json)
        #[arg(value_name = "PROJECT_PATH")]
        path: PathBuf,

        /// Project title (defaults to the file name)
        #[arg(short, long)]
        title: Option<String>,

        /// Number of scenes (defaults to project.default_scene_count)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        scenes: Option<u32>,

        /// Character to register; repeat for several
        #[arg(long = "character", value_name = "NAME")]
        characters: Vec<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Change the scene count of a project, or register characters
    Resize {
        /// Project file (.vwp or .json)
        #[arg(value_name = "PROJECT_PATH")]
        path: PathBuf,

        /// New scene count; scenes past it are dropped
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        scenes: Option<u32>,

        /// Character to register; repeat for several
        #[arg(long = "character", value_name = "NAME")]
        characters: Vec<String>,
    },

    /// Scene sizes with runtime estimates and targets
    Summary {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Export every scene as one plain-text manuscript
    Manuscript {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate shell completions for scenewriter
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// SceneWriter - script annotation and statistics for scenario writers
#[derive(Parser, Debug)]
#[command(name = "scenewriter")]
#[command(version)]
#[command(about = "Dialogue numbering, character statistics and cue lists for scenario scripts")]
#[command(long_about = "SceneWriter reads scenario scripts written with inline markup and produces
numbered scripts, billing reports, voice-cast request letters and cue lists.

EXAMPLES:
    scenewriter number story.vwp --write          # Number dialogue in every scene
    scenewriter number scene.txt --scene 1         # Preview numbering of one scene
    scenewriter stats story.vwp -p 2.5 -f csv      # Billing CSV at 2.5 per character
    scenewriter cues scenes/ --stdout              # Cue list for a directory of scenes
    scenewriter replace story.vwp --from a.txt --to b.txt --write
    scenewriter request story.vwp --deadline 2024-06-30
    scenewriter new story.vwp --scenes 5 --character アリス --character ボブ
    scenewriter summary story.vwp --stdout
    scenewriter completions bash > scenewriter.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Tag and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "1;31"),
            Level::Warn => ("WARN ", "1;33"),
            Level::Info => ("INFO ", "1;32"),
            Level::Debug => ("DEBUG", "1;36"),
            Level::Trace => ("TRACE", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = Local::now().format("%H:%M:%S.%3f");
            let (tag, color) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color,
                now,
                tag,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Accept everything at first; the effective level is set once the config is read
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "scenewriter", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = cli.log_level {
        log::set_max_level(app_config::LogLevel::from(level).to_level_filter());
    }

    let mut config = Config::load_or_create(&cli.config)?;
    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;
    run(&controller, cli.command)
}

fn run(controller: &Controller, command: Commands) -> Result<()> {
    let now = Local::now().naive_local();

    match command {
        Commands::Number { input, scene, write } => {
            let mut loaded = controller.load_input(&input.input_path)?;
            let scope = scope_from_cli(scene);
            controller.number(&mut loaded.project, scope)?;
            finish_edit(controller, &mut loaded, scope, write)
        }
        Commands::Stats { input, scene, unit_price, format, output } => {
            let loaded = controller.load_input(&input.input_path)?;
            let export = controller.character_report(
                &loaded.project,
                scope_from_cli(scene),
                unit_price,
                format.into(),
                &now,
            )?;
            emit(controller, &export, &output)
        }
        Commands::Cues { input, output } => {
            let loaded = controller.load_input(&input.input_path)?;
            emit(controller, &controller.cue_list(&loaded.project, &now), &output)
        }
        Commands::Locations { input, output } => {
            let loaded = controller.load_input(&input.input_path)?;
            emit(controller, &controller.location_list(&loaded.project, &now), &output)
        }
        Commands::Replace { input, from, to, scene, write } => {
            let from_text = FileManager::read_to_string(&from)?;
            let to_text = FileManager::read_to_string(&to)?;
            let mut loaded = controller.load_input(&input.input_path)?;
            let scope = scope_from_cli(scene);

            let outcome = controller
                .replace(
                    &mut loaded.project,
                    trim_final_newline(&from_text),
                    trim_final_newline(&to_text),
                    scope,
                )
                .context("Bulk replace failed")?;
            info!(
                "Replaced {} occurrence(s) in {} scene(s)",
                outcome.total_replaced,
                outcome.affected_scenes()
            );

            if outcome.is_noop() {
                return Ok(());
            }
            finish_edit(controller, &mut loaded, scope, write)
        }
        Commands::Request { input, unit_price, deadline, payment, output } => {
            let loaded = controller.load_input(&input.input_path)?;
            let overrides = VoiceRequestOverrides {
                unit_price,
                deadline,
                payment,
            };
            let export = controller.voice_request(&loaded.project, overrides, &now)?;
            emit(controller, &export, &output)
        }
        Commands::New { path, title, scenes, characters, force } => {
            if path.exists() && !force {
                return Err(anyhow!("{:?} already exists, use --force to overwrite", path));
            }
            let title = title.unwrap_or_else(|| {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().to_string())
                    .unwrap_or_default()
            });
            let mut project = controller.new_project(&title, scenes.map(|n| n as usize), &characters)?;
            project
                .save(&path)
                .with_context(|| format!("Failed to create project: {:?}", path))?;
            info!("Created {:?}", path);
            Ok(())
        }
        Commands::Resize { path, scenes, characters } => {
            let mut loaded = controller.load_input(&path)?;
            if loaded.kind != InputKind::ProjectFile {
                return Err(anyhow!("Only project files can be resized: {:?}", path));
            }
            if scenes.is_none() && characters.is_empty() {
                warn!("Nothing to change, pass --scenes or --character");
                return Ok(());
            }

            if let Some(count) = scenes {
                let removed = controller.resize(&mut loaded.project, count as usize)?;
                if !removed.is_empty() {
                    info!("Dropped {} scene(s)", removed.len());
                }
            }
            let added = controller.add_characters(&mut loaded.project, &characters);
            if !characters.is_empty() {
                info!("Registered {} new character(s)", added);
            }
            controller.save_input(&mut loaded)
        }
        Commands::Summary { input, output } => {
            let loaded = controller.load_input(&input.input_path)?;
            emit(controller, &controller.summary(&loaded.project, &now), &output)
        }
        Commands::Manuscript { input, output } => {
            let loaded = controller.load_input(&input.input_path)?;
            emit(controller, &controller.manuscript(&loaded.project, &now), &output)
        }
        Commands::Completions { .. } => Ok(()),
    }
}

// @converts: 1-based CLI scene number to a scope
fn scope_from_cli(scene: Option<u32>) -> Scope {
    Scope::from_index(scene.map(|n| n.saturating_sub(1) as usize))
}

/// Line lists read from files usually end with a newline that is not a pair
fn trim_final_newline(text: &str) -> &str {
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.strip_suffix('\r').unwrap_or(text)
}

fn finish_edit(controller: &Controller, loaded: &mut LoadedInput, scope: Scope, write: bool) -> Result<()> {
    if write {
        return controller.save_input(loaded);
    }

    warn!("Dry run, use --write to save the changes to {:?}", loaded.source);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for (_, scene) in scope.select(&loaded.project.scenes)? {
        writeln!(out, "【{}】\n{}\n", scene.name, scene.content)?;
    }
    Ok(())
}

fn emit(controller: &Controller, export: &ExportFile, output: &OutputArgs) -> Result<()> {
    if output.stdout {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", export.content)?;
        return Ok(());
    }
    controller.write_export(export, output.output.as_deref())?;
    Ok(())
}
