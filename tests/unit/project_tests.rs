/*!
 * Tests for project files and scene storage
 */

use anyhow::Result;
use crate::common;
use scenewriter::errors::ProjectError;
use scenewriter::project::{estimated_minutes, target_chars, Project, DEFAULT_CHARS_PER_MINUTE};

/// Legacy project files load with renamed scenes
#[test]
fn test_load_withLegacyProject_shouldRenameCuts() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_project(temp_dir.path(), "story.vwp")?;

    let project = Project::load(&path)?;
    let names: Vec<&str> = project.scenes.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Scene-01", "Scene-02", "Scene-03"]);
    assert_eq!(project.title, "テスト企画");
    assert_eq!(project.deadline, "2024-06-30");
    assert_eq!(project.scenes[0].synopsis, "朝");
    Ok(())
}

/// Saving writes the scene list back under its legacy key and stamps the save time
#[test]
fn test_save_shouldRoundTripAndStampModified() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("new.vwp");

    let mut project = Project::new(2);
    project.title = "新作".to_string();
    project.scenes[1].content = "アリス：やあ".to_string();
    project.save(&path)?;

    let json = std::fs::read_to_string(&path)?;
    assert!(json.contains("\"cuts\""));
    assert!(json.contains("\"lastModified\""));

    let loaded = Project::load(&path)?;
    assert_eq!(loaded.scenes, project.scenes);
    assert_eq!(loaded.title, "新作");
    Ok(())
}

/// The newer `scenes` key is accepted too
#[test]
fn test_fromJson_withScenesKey_shouldLoad() -> Result<()> {
    let project = Project::from_json(r#"{"scenes": [{"name": "A", "content": "x"}]}"#)?;
    assert_eq!(project.scenes.len(), 1);
    assert_eq!(project.scenes[0].target_minutes, 0);
    Ok(())
}

/// Broken JSON surfaces as a parse error
#[test]
fn test_fromJson_withInvalidJson_shouldFail() {
    let result = Project::from_json("{not json");
    assert!(matches!(result, Err(ProjectError::Parse(_))));
}

/// A directory of text files becomes a project sorted by file name
#[test]
fn test_fromTextDir_shouldReadTxtFilesInOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "02_昼.txt", "ボブ：昼だ\r\n")?;
    common::create_test_file(temp_dir.path(), "01_朝.txt", "アリス：朝だ")?;
    common::create_test_file(temp_dir.path(), "notes.md", "ignored")?;
    std::fs::create_dir(temp_dir.path().join("sub"))?;
    common::create_test_file(&temp_dir.path().join("sub"), "03.txt", "ignored")?;

    let project = Project::from_text_dir(temp_dir.path())?;
    let names: Vec<&str> = project.scenes.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["01_朝", "02_昼"]);
    assert_eq!(project.scenes[1].content, "ボブ：昼だ\n");
    Ok(())
}

/// A file path is not a scene directory
#[test]
fn test_fromTextDir_withFile_shouldBeUnsupported() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "a.txt", "")?;
    assert!(matches!(
        Project::from_text_dir(&file),
        Err(ProjectError::UnsupportedInput(_))
    ));
    Ok(())
}

/// Runtime helpers use the reading speed
#[test]
fn test_runtimeHelpers_shouldUseReadingSpeed() {
    assert_eq!(target_chars(5, DEFAULT_CHARS_PER_MINUTE), 1200);
    assert_eq!(estimated_minutes(479, DEFAULT_CHARS_PER_MINUTE), 1);
    assert_eq!(estimated_minutes(480, DEFAULT_CHARS_PER_MINUTE), 2);
}

/// Totals add up over scenes
#[test]
fn test_totals_shouldSumScenes() {
    let mut project = Project::new(3);
    project.scenes[0].content = "あいう".to_string();
    project.scenes[2].content = "えお".to_string();
    project.scenes[0].target_minutes = 2;
    project.scenes[1].target_minutes = 3;
    assert_eq!(project.total_char_count(), 5);
    assert_eq!(project.total_target_minutes(), 5);
    assert!(project.scene(3).is_err());
}
