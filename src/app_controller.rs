use anyhow::{anyhow, Context, Result};
use chrono::{Duration, NaiveDateTime};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::{validate_price, Config};
use crate::file_utils::{ExportFile, FileManager, InputKind};
use crate::project::Project;
use crate::script::{
    self, CueCategory, NumberingResult, ReplaceOutcome, ReplacePairs, Scene, Scope,
    VoiceRequestOptions,
};

// @module: Application controller for script annotation and exports

const DEFAULT_DEADLINE_DAYS: i64 = 14;
const DEFAULT_PAYMENT_DAYS: i64 = 21;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Output format of the billing report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Csv,
}

/// A project opened from a path, remembering where it came from
#[derive(Debug, Clone)]
pub struct LoadedInput {
    pub project: Project,
    pub source: PathBuf,
    pub kind: InputKind,
}

/// Caller overrides for the voice-cast request letter
#[derive(Debug, Clone, Default)]
pub struct VoiceRequestOverrides {
    pub unit_price: Option<f64>,
    pub deadline: Option<String>,
    pub payment: Option<String>,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Open a project file, a scene file or a directory of scene files
    pub fn load_input<P: AsRef<Path>>(&self, path: P) -> Result<LoadedInput> {
        let path = path.as_ref();
        let kind = FileManager::detect_input_kind(path)?;

        let project = match kind {
            InputKind::ProjectFile => Project::load(path)
                .with_context(|| format!("Failed to load project: {:?}", path))?,
            InputKind::SceneFile => {
                let content = FileManager::read_to_string(path)?;
                let name = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().to_string())
                    .unwrap_or_default();
                Project::from_scene_text(name, &content)
            }
            InputKind::SceneDirectory => Project::from_text_dir(path)
                .with_context(|| format!("Failed to read scene directory: {:?}", path))?,
            InputKind::Unknown => {
                return Err(anyhow!(
                    "Unsupported input {:?}: expected a .vwp/.json project, a .txt scene or a directory",
                    path
                ));
            }
        };

        info!(
            "Loaded {} scene(s) from {:?}",
            project.scenes.len(),
            path
        );

        Ok(LoadedInput {
            project,
            source: path.to_path_buf(),
            kind,
        })
    }

    /// Write a loaded input back to where it came from
    pub fn save_input(&self, input: &mut LoadedInput) -> Result<()> {
        match input.kind {
            InputKind::ProjectFile => input
                .project
                .save(&input.source)
                .with_context(|| format!("Failed to save project: {:?}", input.source))?,
            InputKind::SceneFile => {
                let scene = input.project.scene(0)?;
                FileManager::write_to_file(&input.source, &scene.content)?;
            }
            InputKind::SceneDirectory => {
                for scene in &input.project.scenes {
                    let path = input.source.join(format!("{}.txt", scene.name));
                    FileManager::write_to_file(&path, &scene.content)?;
                }
            }
            InputKind::Unknown => return Err(anyhow!("Cannot save unsupported input {:?}", input.source)),
        }

        info!("Saved {:?}", input.source);
        Ok(())
    }

    /// Renumber dialogue in the selected scenes
    pub fn number(&self, project: &mut Project, scope: Scope) -> Result<Vec<NumberingResult>> {
        let indices: Vec<usize> = scope
            .select(&project.scenes)?
            .into_iter()
            .map(|(index, _)| index)
            .collect();

        let mut results = Vec::with_capacity(indices.len());
        for index in indices {
            let result = project.apply_numbering(index)?;
            info!(
                "{}: numbered {} dialogue line(s) from {:03}",
                project.scenes[index].name, result.dialogue_count, result.start_number
            );
            results.push(result);
        }
        Ok(results)
    }

    /// Character statistics report as text or CSV
    pub fn character_report(
        &self,
        project: &Project,
        scope: Scope,
        unit_price: Option<f64>,
        format: ReportFormat,
        generated_at: &NaiveDateTime,
    ) -> Result<ExportFile> {
        let unit_price = resolve_price(unit_price, self.config.billing.unit_price)?;
        let stats = script::aggregate_stats(&project.scenes, scope)?;

        if stats.is_empty() {
            warn!("No dialogue found in the selected scene(s)");
        } else {
            info!(
                "{} character(s), {} chars in total",
                stats.speaker_count(),
                stats.total_chars
            );
        }

        let stamp = export_stamp(generated_at);
        Ok(match format {
            ReportFormat::Text => ExportFile::character_report(
                script::render_character_report(&stats, unit_price, generated_at),
                stamp,
            ),
            ReportFormat::Csv => {
                ExportFile::character_csv(script::render_character_csv(&stats, unit_price), stamp)
            }
        })
    }

    /// Voice-cast request letter over every scene
    pub fn voice_request(
        &self,
        project: &Project,
        overrides: VoiceRequestOverrides,
        generated_at: &NaiveDateTime,
    ) -> Result<ExportFile> {
        let defaults = &self.config.voice_request;
        let today = generated_at.date();

        let options = VoiceRequestOptions {
            unit_price: resolve_price(overrides.unit_price, defaults.unit_price)?,
            deadline: pick_date(overrides.deadline, &defaults.deadline, || {
                (today + Duration::days(DEFAULT_DEADLINE_DAYS)).format(DATE_FORMAT).to_string()
            }),
            payment: pick_date(overrides.payment, &defaults.payment, || {
                (today + Duration::days(DEFAULT_PAYMENT_DAYS)).format(DATE_FORMAT).to_string()
            }),
        };
        debug!("Voice request options: {:?}", options);

        let stats = script::aggregate_stats(&project.scenes, Scope::All)?;
        if stats.is_empty() {
            warn!("No dialogue found, the request letter lists no characters");
        }

        Ok(ExportFile::voice_request(
            script::render_voice_request(&stats, &options),
            export_stamp(generated_at),
        ))
    }

    /// Audio cue list over every scene
    pub fn cue_list(&self, project: &Project, generated_at: &NaiveDateTime) -> ExportFile {
        let cues = script::extract_cues(&project.scenes);
        info!(
            "Found {} audio cue(s): {} effect, {} ambient, {} adult, {} BGM",
            cues.audio_total(),
            cues.count(CueCategory::SoundEffect),
            cues.count(CueCategory::Ambient),
            cues.count(CueCategory::AdultCue),
            cues.count(CueCategory::Bgm)
        );
        ExportFile::cue_list(
            script::render_cue_list(&cues, generated_at),
            export_stamp(generated_at),
        )
    }

    /// Location list over every scene
    pub fn location_list(&self, project: &Project, generated_at: &NaiveDateTime) -> ExportFile {
        let cues = script::extract_cues(&project.scenes);
        info!("Found {} location(s)", cues.count(CueCategory::Location));
        ExportFile::location_list(
            script::render_location_list(&cues, generated_at),
            export_stamp(generated_at),
        )
    }

    /// Apply replacement pairs to the selected scenes
    pub fn replace(
        &self,
        project: &mut Project,
        from_text: &str,
        to_text: &str,
        scope: Scope,
    ) -> Result<ReplaceOutcome> {
        let pairs = match ReplacePairs::parse(from_text, to_text) {
            Ok(pairs) => pairs,
            Err(err) if err.is_notice() => {
                warn!("{}, nothing to replace", err);
                return Ok(ReplaceOutcome::default());
            }
            Err(err) => return Err(err.into()),
        };
        let outcome = script::bulk_replace(&project.scenes, scope, &pairs)?;

        if outcome.is_noop() {
            warn!("No occurrences found");
            return Ok(outcome);
        }

        for (name, count) in outcome.per_scene_counts() {
            info!("{}: {} replacement(s)", name, count);
        }
        project.apply_replacements(&outcome);
        Ok(outcome)
    }

    /// Create a project with the configured scene count unless `scene_count` overrides it
    pub fn new_project(&self, title: &str, scene_count: Option<usize>, characters: &[String]) -> Result<Project> {
        let scene_count = scene_count.unwrap_or(self.config.project.default_scene_count);
        if scene_count == 0 {
            return Err(anyhow!("A project needs at least one scene"));
        }

        let mut project = Project::new(scene_count);
        project.title = title.trim().to_string();
        let added = self.add_characters(&mut project, characters);
        info!(
            "Created project {:?} with {} scene(s) and {} character(s)",
            project.title, scene_count, added
        );
        Ok(project)
    }

    /// Register character names, returning how many were new
    pub fn add_characters(&self, project: &mut Project, names: &[String]) -> usize {
        let mut added = 0;
        for name in names {
            if project.add_character(name) {
                added += 1;
            } else {
                debug!("Skipping blank or known character {:?}", name);
            }
        }
        added
    }

    /// Grow or shrink the scene list, returning the removed scenes
    pub fn resize(&self, project: &mut Project, count: usize) -> Result<Vec<Scene>> {
        if count == 0 {
            return Err(anyhow!("A project needs at least one scene"));
        }

        let before = project.scenes.len();
        let removed = project.resize_scenes(count);
        for scene in removed.iter().filter(|scene| !scene.content.trim().is_empty()) {
            warn!("Removed {} with {} character(s) of text", scene.name, scene.char_count());
        }
        info!("Scene count changed from {} to {}", before, count);
        Ok(removed)
    }

    /// Scene sizes and runtime estimates at the configured reading speed
    pub fn summary(&self, project: &Project, generated_at: &NaiveDateTime) -> ExportFile {
        let chars_per_minute = self.config.project.chars_per_minute;
        info!(
            "{} chars over {} scene(s) at {} chars/min",
            project.total_char_count(),
            project.scenes.len(),
            chars_per_minute
        );
        ExportFile::scene_summary(
            project.render_summary(chars_per_minute, generated_at),
            export_stamp(generated_at),
        )
    }

    /// Full manuscript of every scene
    pub fn manuscript(&self, project: &Project, generated_at: &NaiveDateTime) -> ExportFile {
        ExportFile::manuscript(project.render_manuscript(generated_at), &project.title)
    }

    /// Write an export to `target`, or into the configured output directory
    pub fn write_export(&self, export: &ExportFile, target: Option<&Path>) -> Result<PathBuf> {
        let path = match target {
            Some(path) => {
                FileManager::write_to_file(path, &export.content)?;
                path.to_path_buf()
            }
            None => FileManager::write_export(&self.config.export.output_dir, export)?,
        };
        info!("Wrote {:?}", path);
        Ok(path)
    }
}

/// Millisecond stamp used in export file names
fn export_stamp(at: &NaiveDateTime) -> i64 {
    at.and_utc().timestamp_millis()
}

fn resolve_price(overridden: Option<f64>, configured: f64) -> Result<f64> {
    match overridden {
        Some(price) => {
            validate_price("unit price", price)?;
            Ok(price)
        }
        None => Ok(configured),
    }
}

fn pick_date(overridden: Option<String>, configured: &str, fallback: impl FnOnce() -> String) -> String {
    overridden
        .filter(|value| !value.trim().is_empty())
        .or_else(|| Some(configured.to_string()).filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(fallback)
}
