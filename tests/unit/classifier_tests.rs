/*!
 * Tests for line classification
 */

use scenewriter::script::classifier::{classify, strip_sequence_tag, LineKind, SequenceTag};

/// Every line gets exactly one kind, including odd inputs
#[test]
fn test_classify_withArbitraryLines_shouldAlwaysReturnAKind() {
    let lines = [
        "",
        " ",
        "　",
        "999",
        "999 ",
        "001 ",
        "＃",
        "：",
        "「」",
        "名前「」",
        "☆",
        "〇",
        "※",
        "abc：def：ghi",
        "\t\tアリス：やあ\t",
    ];
    for line in lines {
        let classified = classify(line);
        assert!(LineKind::ALL.contains(&classified.kind), "line {:?}", line);
    }
}

/// Cue markers win over dialogue-looking content
#[test]
fn test_classify_withCueContainingDialogue_shouldStayCue() {
    let cases = [
        ("☆効果音//アリス：ドアを叩く", LineKind::SoundEffect),
        ("☆BGM//ボブ「テーマ」", LineKind::Bgm),
        ("☆環境音//＃雨", LineKind::Ambient),
        ("♡アリス：はぁ//", LineKind::AdultCue),
        ("〇 アリス：の部屋", LineKind::Location),
        ("※現在地：屋上", LineKind::Location),
    ];
    for (line, expected) in cases {
        let classified = classify(line);
        assert_eq!(classified.kind, expected, "line {:?}", line);
        assert!(classified.speaker.is_none());
    }
}

/// Tags are stripped before matching and reported separately
#[test]
fn test_classify_withSequenceTag_shouldExposeTagAndBody() {
    let line = classify("  042 ボブ「こんにちは」");
    assert_eq!(line.kind, LineKind::SpeakerQuote);
    assert_eq!(line.tag, Some(SequenceTag::new(42)));
    assert_eq!(line.body, "ボブ「こんにちは」");
    assert!(line.has_tag());

    let cue = classify("010 ☆効果音//足音");
    assert_eq!(cue.kind, LineKind::SoundEffect);
    assert_eq!(cue.tag, Some(SequenceTag::new(10)));
    assert_eq!(cue.content, "足音");
}

/// Colon dialogue beats quote dialogue when both could match
#[test]
fn test_classify_withColonAndQuote_shouldPreferColon() {
    let line = classify("アリス：「おはよう」");
    assert_eq!(line.kind, LineKind::SpeakerColon);
    assert_eq!(line.dialogue(), Some(("アリス", "「おはよう」")));
}

/// Half-width colons are not speaker separators
#[test]
fn test_classify_withAsciiColon_shouldBePlain() {
    assert_eq!(classify("Alice: hello").kind, LineKind::Plain);
}

/// Plain lines keep their body as content
#[test]
fn test_classify_plainLine_shouldKeepBody() {
    let line = classify("  風が吹く  ");
    assert_eq!(line.kind, LineKind::Plain);
    assert_eq!(line.content, "風が吹く");
    assert!(line.dialogue().is_none());
}

/// Only a three-digit tag followed by whitespace is a tag
#[test]
fn test_stripSequenceTag_withVariousPrefixes_shouldOnlyAcceptThreeDigits() {
    assert_eq!(strip_sequence_tag("123\tテキスト"), (Some(SequenceTag::new(123)), "テキスト"));
    assert_eq!(strip_sequence_tag("000 x"), (Some(SequenceTag::new(0)), "x"));
    assert_eq!(strip_sequence_tag("12a x"), (None, "12a x"));
    assert_eq!(strip_sequence_tag("x 123 y"), (None, "x 123 y"));
}

/// Kind names are stable snake_case identifiers
#[test]
fn test_lineKind_display_shouldBeSnakeCase() {
    assert_eq!(LineKind::SpeakerColon.to_string(), "speaker_colon");
    assert_eq!(LineKind::AdultCue.to_string(), "adult_cue");
    assert_eq!(LineKind::Plain.to_string(), "plain");
}
