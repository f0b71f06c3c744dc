/*!
 * Dialogue sequence numbering.
 *
 * Rewrites a scene so that every dialogue line (`名前：`, `名前「」`, `＃名前`)
 * starts with a three-digit sequence tag. Existing tags are stripped first;
 * the first tag found in the text becomes the new starting number so that
 * a scene numbered from `005` keeps starting at `005` on the next run.
 */

use log::debug;
use serde::{Deserialize, Serialize};

use super::classifier::{self, SequenceTag};

/// Outcome of a renumbering pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberingResult {
    /// Rewritten scene text
    pub text: String,

    /// Number assigned to the first dialogue line
    pub start_number: u32,

    /// Number of dialogue lines that received a tag
    pub dialogue_count: usize,
}

impl NumberingResult {
    /// Tag of the last dialogue line, if any line was numbered
    pub fn last_tag(&self) -> Option<SequenceTag> {
        if self.dialogue_count == 0 {
            return None;
        }
        Some(SequenceTag::new(
            self.start_number + self.dialogue_count as u32 - 1,
        ))
    }

    /// Number the next scene should start from to continue this one
    pub fn next_number(&self) -> u32 {
        self.start_number + self.dialogue_count as u32
    }
}

/// Strip and reassign dialogue sequence tags.
///
/// Non-dialogue lines lose any stale tag and are otherwise left untouched.
/// Line breaks are preserved exactly, including a trailing newline.
pub fn renumber_dialogue(text: &str) -> NumberingResult {
    let mut first_number: Option<u32> = None;
    let stripped: Vec<&str> = text
        .split('\n')
        .map(|line| {
            let (tag, rest) = classifier::strip_sequence_tag(line);
            if first_number.is_none() {
                first_number = tag.map(|t| t.number());
            }
            rest
        })
        .collect();

    // A recalled 000 is treated like no tag at all
    let start_number = first_number.filter(|n| *n > 0).unwrap_or(1);
    let mut counter = start_number;
    let mut dialogue_count = 0;

    let lines: Vec<String> = stripped
        .into_iter()
        .map(|line| {
            if classifier::classify(line).kind.is_numberable() {
                let numbered = format!("{}{}", SequenceTag::new(counter).prefix(), line);
                counter += 1;
                dialogue_count += 1;
                numbered
            } else {
                line.to_string()
            }
        })
        .collect();

    debug!(
        "Renumbered {} dialogue line(s) starting at {:03}",
        dialogue_count, start_number
    );

    NumberingResult {
        text: lines.join("\n"),
        start_number,
        dialogue_count,
    }
}
