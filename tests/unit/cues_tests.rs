/*!
 * Tests for cue extraction
 */

use scenewriter::script::classifier::SequenceTag;
use scenewriter::script::cues::{extract_cues, CueCategory};
use scenewriter::script::Scene;

/// Each cue kind lands in its own category
#[test]
fn test_extractCues_withAllKinds_shouldSortIntoCategories() {
    let scenes = vec![Scene::new(
        "Scene-01",
        "☆効果音//ノック\n☆BGM//テーマ\n☆環境音//雨\n♡くちゅ//\n〇 教室\n※現在地：屋上\nアリス：やあ",
    )];
    let cues = extract_cues(&scenes);

    assert_eq!(cues.count(CueCategory::SoundEffect), 1);
    assert_eq!(cues.count(CueCategory::Bgm), 1);
    assert_eq!(cues.count(CueCategory::Ambient), 1);
    assert_eq!(cues.count(CueCategory::AdultCue), 1);
    assert_eq!(cues.count(CueCategory::Location), 2);
    assert_eq!(cues.audio_total(), 4);
}

/// Cue text has the marker, separator and trailing slashes removed
#[test]
fn test_extractCues_shouldCleanCueText() {
    let scenes = vec![Scene::new("S", "☆効果音//ガラスが割れる//\n♡ちゅっ/")];
    let cues = extract_cues(&scenes);
    assert_eq!(cues.get(CueCategory::SoundEffect)[0].text, "ガラスが割れる");
    assert_eq!(cues.get(CueCategory::AdultCue)[0].text, "ちゅっ");
}

/// Canonical order is scene order then line order, tags are kept
#[test]
fn test_extractCues_shouldPreserveSceneThenLineOrder() {
    let scenes = vec![
        Scene::new("B", "☆効果音//一\n☆効果音//二"),
        Scene::new("A", "005 ☆効果音//三"),
    ];
    let cues = extract_cues(&scenes);
    let texts: Vec<&str> = cues
        .get(CueCategory::SoundEffect)
        .iter()
        .map(|c| c.text.as_str())
        .collect();
    assert_eq!(texts, vec!["一", "二", "三"]);
    assert_eq!(
        cues.get(CueCategory::SoundEffect)[2].line_number,
        Some(SequenceTag::new(5))
    );
}

/// Scenes sharing a name merge into one group
#[test]
fn test_bySceneGrouping_withDuplicateNames_shouldMerge() {
    let scenes = vec![
        Scene::new("Scene-01", "☆BGM//一"),
        Scene::new("Scene-02", "☆BGM//二"),
        Scene::new("Scene-01", "☆BGM//三"),
    ];
    let cues = extract_cues(&scenes);
    let groups = cues.by_scene();
    assert_eq!(groups.len(), 2);
    let merged: Vec<&str> = groups["Scene-01"]
        .get(CueCategory::Bgm)
        .iter()
        .map(|c| c.text.as_str())
        .collect();
    assert_eq!(merged, vec!["一", "三"]);
}

/// Category labels match the report headings
#[test]
fn test_cueCategory_labels_shouldMatchHeadings() {
    assert_eq!(CueCategory::SoundEffect.label(), "効果音");
    assert_eq!(CueCategory::AdultCue.to_string(), "アダルト効果音");
    assert!(!CueCategory::Location.is_audio());
}
