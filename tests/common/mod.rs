/*!
 * Common test utilities for the scenewriter test suite
 */

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scene used throughout the suite: a location, a colon line, a speaker
/// marker with its continuation and a BGM cue
pub const SAMPLE_SCENE: &str = "〇 教室\nアリス：おはよう\n＃ボブ\nおはよう、アリス\n☆BGM//朝の音楽";

/// Routes library log output through the test harness; `RUST_LOG` picks the level
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a small project file with three scenes
pub fn create_test_project(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = r#"{
  "title": "テスト企画",
  "deadline": "2024-06-30",
  "globalSynopsis": "",
  "cuts": [
    {"name": "Cut-01", "content": "〇 教室\nアリス：おはよう\n＃ボブ\nおはよう、アリス\n☆BGM//朝の音楽", "synopsis": "朝", "targetMinutes": 1},
    {"name": "Cut-02", "content": "☆効果音//チャイム\nボブ「また明日」\n♡くちゅ//", "synopsis": "", "targetMinutes": 0},
    {"name": "Cut-03", "content": "", "synopsis": "", "targetMinutes": 0}
  ],
  "characters": ["アリス", "ボブ"],
  "lastModified": "2024-05-01T00:00:00.000Z"
}"#;
    create_test_file(dir, filename, content)
}

/// Fixed timestamp for rendered documents
pub fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|date| date.and_hms_opt(9, 30, 0))
        .expect("valid fixed timestamp")
}
