use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

/// Project file extensions accepted as input
const PROJECT_EXTENSIONS: [&str; 2] = ["vwp", "json"];

/// Scene text extension
const SCENE_EXTENSION: &str = "txt";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir(parent)?;
            }
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Write an export into `output_dir` and return the written path
    pub fn write_export<P: AsRef<Path>>(output_dir: P, export: &ExportFile) -> Result<PathBuf> {
        let path = output_dir.as_ref().join(&export.filename);
        Self::write_to_file(&path, &export.content)?;
        Ok(path)
    }

    /// Detect what kind of script input a path points at
    pub fn detect_input_kind<P: AsRef<Path>>(path: P) -> Result<InputKind> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("Input path does not exist: {:?}", path));
        }

        if path.is_dir() {
            return Ok(InputKind::SceneDirectory);
        }

        if PROJECT_EXTENSIONS.iter().any(|ext| has_extension(path, ext)) {
            return Ok(InputKind::ProjectFile);
        }

        if has_extension(path, SCENE_EXTENSION) {
            return Ok(InputKind::SceneFile);
        }

        Ok(InputKind::Unknown)
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
}

/// Kinds of script input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// JSON project file (`.vwp` or `.json`)
    ProjectFile,
    /// Single scene as plain text
    SceneFile,
    /// Directory of `.txt` scene files
    SceneDirectory,
    /// Anything else
    Unknown,
}

/// A rendered document ready to be written or handed to a save dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub content: String,
    pub filename: String,
    pub mime_type: &'static str,
}

impl ExportFile {
    const TEXT: &'static str = "text/plain";
    const CSV: &'static str = "text/csv";

    // @creates: Export with an explicit name and type
    pub fn new(content: String, filename: impl Into<String>, mime_type: &'static str) -> Self {
        Self {
            content,
            filename: filename.into(),
            mime_type,
        }
    }

    // @creates: 文字数計算_<stamp>.txt
    pub fn character_report(content: String, stamp: i64) -> Self {
        Self::new(content, format!("文字数計算_{}.txt", stamp), Self::TEXT)
    }

    // @creates: 文字数計算_<stamp>.csv
    pub fn character_csv(content: String, stamp: i64) -> Self {
        Self::new(content, format!("文字数計算_{}.csv", stamp), Self::CSV)
    }

    // @creates: 声優依頼文_<stamp>.txt
    pub fn voice_request(content: String, stamp: i64) -> Self {
        Self::new(content, format!("声優依頼文_{}.txt", stamp), Self::TEXT)
    }

    // @creates: 音声効果リスト_<stamp>.txt
    pub fn cue_list(content: String, stamp: i64) -> Self {
        Self::new(content, format!("音声効果リスト_{}.txt", stamp), Self::TEXT)
    }

    // @creates: シーン管理_<stamp>.txt
    pub fn location_list(content: String, stamp: i64) -> Self {
        Self::new(content, format!("シーン管理_{}.txt", stamp), Self::TEXT)
    }

    // @creates: シーン概要_<stamp>.txt
    pub fn scene_summary(content: String, stamp: i64) -> Self {
        Self::new(content, format!("シーン概要_{}.txt", stamp), Self::TEXT)
    }

    // @creates: <title>.txt, falling back to manuscript.txt
    pub fn manuscript(content: String, title: &str) -> Self {
        let title = sanitize_filename(title);
        let stem = if title.is_empty() { "manuscript".to_string() } else { title };
        Self::new(content, format!("{}.txt", stem), Self::TEXT)
    }
}

/// Replace path separators and other characters that cannot appear in a file name
fn sanitize_filename(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
