/*!
 * Tests for application controller functionality
 */

use anyhow::Result;
use crate::common;
use scenewriter::app_config::Config;
use scenewriter::app_controller::{Controller, ReportFormat, VoiceRequestOverrides};
use scenewriter::file_utils::InputKind;
use scenewriter::project::Project;
use scenewriter::script::Scope;

/// Test creating a controller with the default configuration
#[test]
fn test_new_for_test_shouldUseDefaultConfig() -> Result<()> {
    let controller = Controller::new_for_test()?;
    assert_eq!(controller.config(), &Config::default());
    Ok(())
}

/// An invalid configuration is rejected up front
#[test]
fn test_with_config_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.project.chars_per_minute = 0;
    assert!(Controller::with_config(config).is_err());
}

/// Scene files load as one-scene projects named after the file
#[test]
fn test_loadInput_withSceneFile_shouldWrapScene() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "第一話.txt", common::SAMPLE_SCENE)?;

    let loaded = controller.load_input(&path)?;
    assert_eq!(loaded.kind, InputKind::SceneFile);
    assert_eq!(loaded.project.scenes.len(), 1);
    assert_eq!(loaded.project.scenes[0].name, "第一話");
    Ok(())
}

/// Unknown inputs are rejected with a helpful message
#[test]
fn test_loadInput_withUnknownExtension_shouldFail() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "image.png", "")?;
    let error = controller.load_input(&path).unwrap_err();
    assert!(error.to_string().contains("Unsupported input"));
    Ok(())
}

/// The configured unit price is used unless overridden
#[test]
fn test_characterReport_shouldFallBackToConfiguredPrice() -> Result<()> {
    let mut config = Config::default();
    config.billing.unit_price = 3.0;
    let controller = Controller::with_config(config)?;
    let project = Project::from_scene_text("S", "A：一二");
    let at = common::fixed_time();

    let configured = controller.character_report(&project, Scope::All, None, ReportFormat::Csv, &at)?;
    assert!(configured.content.contains("A,2,3,6\n"));
    assert!(configured.filename.ends_with(".csv"));

    let overridden =
        controller.character_report(&project, Scope::All, Some(10.0), ReportFormat::Text, &at)?;
    assert!(overridden.content.contains("A: 2文字 (¥20)"));
    assert!(overridden.filename.ends_with(".txt"));
    Ok(())
}

/// Deadline and payment default to two and three weeks out
#[test]
fn test_voiceRequest_withoutDates_shouldUseDefaultOffsets() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let project = Project::from_scene_text("S", "A：一");
    let export = controller.voice_request(&project, VoiceRequestOverrides::default(), &common::fixed_time())?;

    assert!(export.content.contains("■ 納品期限\n  2024-05-15まで\n"));
    assert!(export.content.contains("■ お支払い期日\n  2024-05-22\n"));
    assert!(export.filename.starts_with("声優依頼文_"));
    Ok(())
}

/// Explicit dates beat configured ones
#[test]
fn test_voiceRequest_withOverrides_shouldUseThem() -> Result<()> {
    let mut config = Config::default();
    config.voice_request.deadline = "2024年6月1日".to_string();
    config.voice_request.payment = "2024年6月30日".to_string();
    let controller = Controller::with_config(config)?;
    let project = Project::from_scene_text("S", "A：一");

    let overrides = VoiceRequestOverrides {
        unit_price: Some(5.0),
        deadline: Some("明日".to_string()),
        payment: None,
    };
    let export = controller.voice_request(&project, overrides, &common::fixed_time())?;
    assert!(export.content.contains("  明日まで"));
    assert!(export.content.contains("  2024年6月30日\n"));
    assert!(export.content.contains("（単価：¥5/文字）"));
    Ok(())
}

/// Replace reports a mismatch and leaves the project as it was
#[test]
fn test_replace_withMismatchedLists_shouldNotMutate() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let mut project = Project::from_scene_text("S", "猫と犬");
    let result = controller.replace(&mut project, "猫\n犬", "狐", Scope::All);
    assert!(result.is_err());
    assert_eq!(project.scenes[0].content, "猫と犬");
    Ok(())
}

/// Exports go to the configured output directory when no target is given
#[test]
fn test_writeExport_withoutTarget_shouldUseOutputDir() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = Config::default();
    config.export.output_dir = temp_dir.path().join("exports").to_string_lossy().to_string();
    let controller = Controller::with_config(config)?;

    let project = Project::from_scene_text("S", "☆効果音//扉");
    let export = controller.cue_list(&project, &common::fixed_time());
    let path = controller.write_export(&export, None)?;

    assert!(path.starts_with(temp_dir.path().join("exports")));
    assert!(std::fs::read_to_string(&path)?.contains("扉"));
    Ok(())
}

/// A blank replacement list is a notice, not a failure
#[test]
fn test_replace_withBlankLists_shouldReturnEmptyOutcome() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let mut project = Project::from_scene_text("S", "猫がいる");

    let outcome = controller.replace(&mut project, "", "", Scope::All)?;
    assert!(outcome.is_noop());
    assert_eq!(outcome.total_replaced, 0);
    assert_eq!(project.scenes[0].content, "猫がいる");
    Ok(())
}

/// Negative or non-finite price overrides are rejected
#[test]
fn test_priceOverrides_withInvalidPrice_shouldFail() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let project = Project::from_scene_text("S", "A：一二");
    let at = common::fixed_time();

    assert!(controller
        .character_report(&project, Scope::All, Some(-5.0), ReportFormat::Text, &at)
        .is_err());
    assert!(controller
        .character_report(&project, Scope::All, Some(f64::NAN), ReportFormat::Csv, &at)
        .is_err());

    let overrides = VoiceRequestOverrides {
        unit_price: Some(-1.0),
        ..Default::default()
    };
    assert!(controller.voice_request(&project, overrides, &at).is_err());

    let report = controller.character_report(&project, Scope::All, Some(0.0), ReportFormat::Csv, &at)?;
    assert!(report.content.contains("A,2,0,0"));
    Ok(())
}

/// New projects take their scene count from the configuration
#[test]
fn test_newProject_shouldUseConfiguredSceneCount() -> Result<()> {
    let mut config = Config::default();
    config.project.default_scene_count = 4;
    let controller = Controller::with_config(config)?;

    let characters = vec!["アリス".to_string(), " ".to_string(), "アリス".to_string(), "ボブ".to_string()];
    let project = controller.new_project(" 物語 ", None, &characters)?;
    assert_eq!(project.title, "物語");
    assert_eq!(project.scenes.len(), 4);
    assert_eq!(project.scenes[3].name, "Scene-04");
    assert_eq!(project.characters, vec!["アリス", "ボブ"]);

    let sized = controller.new_project("短編", Some(2), &[])?;
    assert_eq!(sized.scenes.len(), 2);
    assert!(controller.new_project("空", Some(0), &[]).is_err());
    Ok(())
}

/// Resizing returns the dropped scenes and refuses zero
#[test]
fn test_resize_shouldReturnRemovedScenes() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let mut project = Project::new(3);
    project.scenes[2].content = "台詞".to_string();

    let removed = controller.resize(&mut project, 2)?;
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].content, "台詞");
    assert_eq!(project.scenes.len(), 2);

    assert!(controller.resize(&mut project, 5)?.is_empty());
    assert_eq!(project.scenes[4].name, "Scene-05");
    assert!(controller.resize(&mut project, 0).is_err());
    assert_eq!(project.scenes.len(), 5);
    Ok(())
}

/// The summary uses the configured reading speed
#[test]
fn test_summary_shouldUseConfiguredReadingSpeed() -> Result<()> {
    let mut config = Config::default();
    config.project.chars_per_minute = 100;
    let controller = Controller::with_config(config)?;
    let mut project = Project::from_scene_text("S", &"あ".repeat(250));
    project.scenes[0].target_minutes = 2;

    let export = controller.summary(&project, &common::fixed_time());
    assert!(export.filename.starts_with("シーン概要_"));
    assert!(export.content.contains("総文字数: 250文字 (推定2分)\n"));
    assert!(export.content.contains("S (250文字/2分)  目標 2分 (200文字)\n"));
    assert!(export.content.contains("読み上げ速度: 100文字/分\n"));
    Ok(())
}
