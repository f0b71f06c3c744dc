/*!
 * Tests for dialogue sequence numbering
 */

use scenewriter::script::classifier::{classify, strip_sequence_tag, LineKind};
use scenewriter::script::numbering::renumber_dialogue;

fn tags_of(text: &str) -> Vec<u32> {
    text.lines()
        .filter_map(|line| strip_sequence_tag(line).0)
        .map(|tag| tag.number())
        .collect()
}

/// Renumbering numbered text gives the same text back
#[test]
fn test_renumberDialogue_appliedTwice_shouldBeIdempotent() {
    let text = "〇 廊下\n＃アリス\nどうしたの？\nボブ：なんでもない\n☆効果音//足音\nボブ「行こう」";
    let once = renumber_dialogue(text);
    let twice = renumber_dialogue(&once.text);
    assert_eq!(once.text, twice.text);
    assert_eq!(once.dialogue_count, 3);
}

/// The first existing tag sets the start, later tags are rewritten
#[test]
fn test_renumberDialogue_withShuffledTags_shouldBeMonotonicFromFirstTag() {
    let text = "020 アリス：一\n003 ボブ：二\n100 アリス：三";
    let result = renumber_dialogue(text);
    assert_eq!(tags_of(&result.text), vec![20, 21, 22]);
}

/// Only dialogue lines carry tags after numbering
#[test]
fn test_renumberDialogue_everyTaggedLine_shouldBeDialogue() {
    let text = "005 〇 教室\n☆BGM//朝\nアリス：おはよう\n地の文\n＃ボブ\nおはよう";
    let result = renumber_dialogue(text);
    for line in result.text.lines() {
        let classified = classify(line);
        assert_eq!(
            classified.has_tag(),
            classified.kind.is_numberable(),
            "line {:?}",
            line
        );
    }
    // The stale tag on the location line still seeded the start
    assert_eq!(result.start_number, 5);
    assert_eq!(classify("005 〇 教室").kind, LineKind::Location);
}

/// Numbers past 999 keep counting with more digits
#[test]
fn test_renumberDialogue_pastNineNineNine_shouldKeepCounting() {
    let result = renumber_dialogue("998 A：一\nB：二\nC：三");
    assert_eq!(result.text, "998 A：一\n999 B：二\n1000 C：三");
    assert_eq!(result.next_number(), 1001);
}

/// Blank lines survive numbering
#[test]
fn test_renumberDialogue_withBlankLines_shouldPreserveLayout() {
    let result = renumber_dialogue("\nアリス：やあ\n\n\nボブ：よう\n");
    assert_eq!(result.text, "\n001 アリス：やあ\n\n\n002 ボブ：よう\n");
}
