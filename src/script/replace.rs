/*!
 * Scoped multi-pair literal replacement.
 *
 * Replacement pairs come from two parallel line lists ("from" and "to").
 * Pairs are applied in order within each scene, so a later pair can match
 * text produced by an earlier one. Matching is literal, never a pattern.
 */

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{Scene, Scope};
use crate::errors::ScriptError;

/// One literal replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacePair {
    /// Text to search for, never empty
    pub from: String,
    /// Replacement text, may be empty
    pub to: String,
}

/// Validated, ordered list of replacement pairs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReplacePairs {
    pairs: Vec<ReplacePair>,
}

impl ReplacePairs {
    /// Build pairs from two parallel line-delimited lists.
    ///
    /// Fails with [`ScriptError::MismatchedPairCount`] when the line counts
    /// differ and with [`ScriptError::EmptyInput`] when no usable pair
    /// remains. Empty "from" lines are skipped.
    pub fn parse(from_text: &str, to_text: &str) -> Result<Self, ScriptError> {
        if from_text.trim().is_empty() {
            return Err(ScriptError::EmptyInput);
        }

        let from_lines: Vec<&str> = from_text.split('\n').collect();
        let to_lines: Vec<&str> = to_text.split('\n').collect();

        if from_lines.len() != to_lines.len() {
            return Err(ScriptError::MismatchedPairCount {
                from_lines: from_lines.len(),
                to_lines: to_lines.len(),
            });
        }

        let pairs: Vec<ReplacePair> = from_lines
            .into_iter()
            .zip(to_lines)
            .filter(|(from, _)| !from.is_empty())
            .map(|(from, to)| ReplacePair {
                from: from.to_string(),
                to: to.to_string(),
            })
            .collect();

        Self::new(pairs)
    }

    /// Build from explicit pairs, dropping any with an empty `from`.
    pub fn new(pairs: Vec<ReplacePair>) -> Result<Self, ScriptError> {
        let pairs: Vec<ReplacePair> = pairs.into_iter().filter(|p| !p.from.is_empty()).collect();
        if pairs.is_empty() {
            return Err(ScriptError::EmptyInput);
        }
        Ok(Self { pairs })
    }

    /// Pairs in application order
    pub fn pairs(&self) -> &[ReplacePair] {
        &self.pairs
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there are no pairs
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Apply every pair to `text` in order.
    ///
    /// Returns the new text and the number of occurrences replaced.
    pub fn apply(&self, text: &str) -> (String, usize) {
        let mut content = text.to_string();
        let mut replaced = 0;
        for pair in &self.pairs {
            let count = content.matches(pair.from.as_str()).count();
            if count > 0 {
                content = content.replace(pair.from.as_str(), &pair.to);
                replaced += count;
            }
        }
        (content, replaced)
    }
}

/// New text for one affected scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneReplacement {
    /// Zero-based index of the scene in the project
    pub index: usize,
    /// Scene name
    pub name: String,
    /// Occurrences replaced in this scene
    pub replaced: usize,
    /// Full scene text after every pair was applied
    pub content: String,
}

/// Result of a bulk replace. Only affected scenes are listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceOutcome {
    /// Occurrences replaced across all scenes
    pub total_replaced: usize,
    /// Affected scenes in scene order
    pub scenes: Vec<SceneReplacement>,
}

impl ReplaceOutcome {
    /// Number of scenes that changed
    pub fn affected_scenes(&self) -> usize {
        self.scenes.len()
    }

    /// Whether nothing matched
    pub fn is_noop(&self) -> bool {
        self.total_replaced == 0
    }

    /// Replacement count per affected scene, keyed by scene name
    pub fn per_scene_counts(&self) -> Vec<(&str, usize)> {
        self.scenes
            .iter()
            .map(|s| (s.name.as_str(), s.replaced))
            .collect()
    }
}

/// Compute replacements over the scenes selected by `scope`.
///
/// The input scenes are not modified; apply the outcome to commit it.
pub fn bulk_replace(
    scenes: &[Scene],
    scope: Scope,
    pairs: &ReplacePairs,
) -> Result<ReplaceOutcome, ScriptError> {
    let mut outcome = ReplaceOutcome::default();

    for (index, scene) in scope.select(scenes)? {
        if scene.content.is_empty() {
            continue;
        }

        let (content, replaced) = pairs.apply(&scene.content);
        if replaced == 0 {
            continue;
        }

        debug!("Replaced {} occurrence(s) in {}", replaced, scene.name);
        outcome.total_replaced += replaced;
        outcome.scenes.push(SceneReplacement {
            index,
            name: scene.name.clone(),
            replaced,
            content,
        });
    }

    info!(
        "Bulk replace: {} occurrence(s) in {} scene(s) using {} pair(s)",
        outcome.total_replaced,
        outcome.affected_scenes(),
        pairs.len()
    );

    Ok(outcome)
}
