/*!
 * Project files and scene storage.
 *
 * A project is a JSON document holding the title, deadline, global synopsis,
 * character registry and the list of scenes. Older files store the scene list
 * under `cuts` and name scenes `Cut-NN`; both are accepted on load and
 * normalized to `Scene-NN`.
 *
 * Plain `.txt` scene files and directories of them can be opened as ad-hoc
 * projects so the engine can run without a project file.
 */

use std::fs;
use std::path::Path;

use chrono::{NaiveDateTime, SecondsFormat, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::errors::{ProjectError, ScriptError};
use crate::script::report::format_count;
use crate::script::{renumber_dialogue, NumberingResult, ReplaceOutcome, Scene};

/// Reading speed used for runtime estimates
pub const DEFAULT_CHARS_PER_MINUTE: u32 = 240;

/// Scene count of a freshly created project
pub const DEFAULT_SCENE_COUNT: usize = 10;

const LEGACY_SCENE_PREFIX: &str = "Cut-";
const SCENE_PREFIX: &str = "Scene-";
const SCENE_FILE_EXTENSION: &str = "txt";

/// A scenario project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project title
    #[serde(default)]
    pub title: String,

    /// Free-text delivery deadline
    #[serde(default)]
    pub deadline: String,

    /// Synopsis of the whole project
    #[serde(default)]
    pub global_synopsis: String,

    /// Scenes in display order
    #[serde(rename = "cuts", alias = "scenes", default)]
    pub scenes: Vec<Scene>,

    /// Registered character names
    #[serde(default)]
    pub characters: Vec<String>,

    /// RFC 3339 timestamp of the last save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

/// Size figures of one scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneSummary {
    pub name: String,
    pub char_count: usize,
    pub target_minutes: u32,
    pub target_chars: usize,
    pub estimated_minutes: usize,
}

impl Default for Project {
    fn default() -> Self {
        Self::new(DEFAULT_SCENE_COUNT)
    }
}

impl Project {
    /// Create a project with `scene_count` empty scenes named `Scene-01`...
    pub fn new(scene_count: usize) -> Self {
        Self {
            title: String::new(),
            deadline: String::new(),
            global_synopsis: String::new(),
            scenes: (1..=scene_count).map(Scene::numbered).collect(),
            characters: Vec::new(),
            last_modified: None,
        }
    }

    /// Parse a project from JSON, renaming legacy scene names.
    pub fn from_json(json: &str) -> Result<Self, ProjectError> {
        let mut project: Project = serde_json::from_str(json)?;
        let renamed = project.normalize_scene_names();
        if renamed > 0 {
            debug!("Renamed {} legacy scene name(s)", renamed);
        }
        Ok(project)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a project file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ProjectError> {
        let json = fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Save the project, stamping `last_modified`
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ProjectError> {
        self.last_modified = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        fs::write(path.as_ref(), self.to_json()?)?;
        Ok(())
    }

    /// Wrap a single scene text into a one-scene project
    pub fn from_scene_text(name: impl Into<String>, content: &str) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            scenes: vec![Scene::new(name, normalize_line_endings(content))],
            ..Self::new(0)
        }
    }

    /// Build a project from the `.txt` files of a directory.
    ///
    /// Files are taken in file name order and each becomes a scene named
    /// after its file stem. Subdirectories are not searched.
    pub fn from_text_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ProjectError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(ProjectError::UnsupportedInput(format!(
                "Not a directory: {:?}",
                dir
            )));
        }

        let mut project = Self::new(0);
        project.title = dir
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(std::io::Error::from)?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_scene_file(path) {
                continue;
            }

            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_default();
            let content = fs::read_to_string(path)?;
            project.scenes.push(Scene::new(name, normalize_line_endings(&content)));
        }

        if project.scenes.is_empty() {
            warn!("No .{} scene files found in {:?}", SCENE_FILE_EXTENSION, dir);
        }

        Ok(project)
    }

    /// Rename `Cut-NN` scenes to `Scene-NN`. Returns how many were renamed.
    pub fn normalize_scene_names(&mut self) -> usize {
        let mut renamed = 0;
        for scene in &mut self.scenes {
            if let Some(rest) = scene.name.strip_prefix(LEGACY_SCENE_PREFIX) {
                scene.name = format!("{}{}", SCENE_PREFIX, rest);
                renamed += 1;
            }
        }
        renamed
    }

    /// Grow or shrink the scene list to `count` scenes.
    ///
    /// New scenes are empty and named after their position. Removed scenes
    /// are returned so the caller can report or restore them.
    pub fn resize_scenes(&mut self, count: usize) -> Vec<Scene> {
        if count <= self.scenes.len() {
            return self.scenes.split_off(count);
        }

        let start = self.scenes.len() + 1;
        self.scenes.extend((start..=count).map(Scene::numbered));
        Vec::new()
    }

    /// Register a character name. Blank and duplicate names are ignored.
    pub fn add_character(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.characters.iter().any(|c| c == name) {
            return false;
        }
        self.characters.push(name.to_string());
        true
    }

    /// Scene at a zero-based index
    pub fn scene(&self, index: usize) -> Result<&Scene, ScriptError> {
        self.scenes.get(index).ok_or(ScriptError::SceneOutOfRange {
            index,
            count: self.scenes.len(),
        })
    }

    /// Raw character count over every scene
    pub fn total_char_count(&self) -> usize {
        self.scenes.iter().map(Scene::char_count).sum()
    }

    /// Sum of the scenes' target runtimes
    pub fn total_target_minutes(&self) -> u32 {
        self.scenes.iter().map(|s| s.target_minutes).sum()
    }

    /// Per-scene size figures at the given reading speed
    pub fn summaries(&self, chars_per_minute: u32) -> Vec<SceneSummary> {
        self.scenes
            .iter()
            .map(|scene| {
                let char_count = scene.char_count();
                SceneSummary {
                    name: scene.name.clone(),
                    char_count,
                    target_minutes: scene.target_minutes,
                    target_chars: target_chars(scene.target_minutes, chars_per_minute),
                    estimated_minutes: estimated_minutes(char_count, chars_per_minute),
                }
            })
            .collect()
    }

    /// Renumber the dialogue of one scene in place
    pub fn apply_numbering(&mut self, index: usize) -> Result<NumberingResult, ScriptError> {
        let count = self.scenes.len();
        let scene = self
            .scenes
            .get_mut(index)
            .ok_or(ScriptError::SceneOutOfRange { index, count })?;

        let result = renumber_dialogue(&scene.content);
        scene.content = result.text.clone();
        Ok(result)
    }

    /// Write the scenes of a replace outcome back. Returns the scene count updated.
    pub fn apply_replacements(&mut self, outcome: &ReplaceOutcome) -> usize {
        let mut updated = 0;
        for replacement in &outcome.scenes {
            match self.scenes.get_mut(replacement.index) {
                Some(scene) => {
                    scene.content = replacement.content.clone();
                    updated += 1;
                }
                None => warn!(
                    "Skipping replacement for missing scene {} ({})",
                    replacement.index, replacement.name
                ),
            }
        }
        updated
    }

    /// Plain-text manuscript of every scene
    pub fn render_manuscript(&self, generated_at: &NaiveDateTime) -> String {
        let mut text = format!("プロジェクト: {}\n", self.title);
        text.push_str(&format!(
            "作成日時: {}\n",
            generated_at.format("%Y/%m/%d %H:%M:%S")
        ));
        text.push_str(&"=".repeat(50));
        text.push_str("\n\n");

        for scene in &self.scenes {
            text.push_str(&format!("【{}】\n", scene.name));
            if !scene.synopsis.is_empty() {
                text.push_str(&format!("あらすじ: {}\n", scene.synopsis));
            }
            text.push_str(&scene.content);
            text.push('\n');
            text.push_str(&"-".repeat(50));
            text.push_str("\n\n");
        }
        text
    }

    /// Scene sizes, runtime estimates and targets at the given reading speed
    pub fn render_summary(&self, chars_per_minute: u32, generated_at: &NaiveDateTime) -> String {
        let total_chars = self.total_char_count();
        let total_target = self.total_target_minutes();

        let mut text = format!("プロジェクト: {}\n", self.title);
        text.push_str(&format!(
            "出力日時: {}\n",
            generated_at.format("%Y/%m/%d %H:%M:%S")
        ));
        text.push_str(&"=".repeat(50));
        text.push_str("\n\n");

        text.push_str(&format!(
            "総文字数: {}文字 (推定{}分)\n",
            format_count(total_chars),
            estimated_minutes(total_chars, chars_per_minute)
        ));
        text.push_str(&format!(
            "目標: {}分 ({}文字)\n",
            total_target,
            format_count(target_chars(total_target, chars_per_minute))
        ));
        text.push_str(&format!("読み上げ速度: {}文字/分\n\n", chars_per_minute));

        text.push_str("【シーン別】\n");
        for summary in self.summaries(chars_per_minute) {
            text.push_str(&format!(
                "{} ({}文字/{}分)",
                summary.name,
                format_count(summary.char_count),
                summary.estimated_minutes
            ));
            if summary.target_minutes > 0 {
                text.push_str(&format!(
                    "  目標 {}分 ({}文字)",
                    summary.target_minutes,
                    format_count(summary.target_chars)
                ));
            }
            text.push('\n');
        }
        text
    }
}

/// Target characters for a runtime
pub fn target_chars(minutes: u32, chars_per_minute: u32) -> usize {
    minutes as usize * chars_per_minute as usize
}

/// Whole minutes a text of `chars` characters takes to read
pub fn estimated_minutes(chars: usize, chars_per_minute: u32) -> usize {
    if chars_per_minute == 0 {
        return 0;
    }
    chars / chars_per_minute as usize
}

fn is_scene_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(SCENE_FILE_EXTENSION))
}

fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}
