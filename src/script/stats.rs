/*!
 * Per-speaker character statistics.
 *
 * Sums the spoken characters of every speaker across a scope of scenes and
 * records the sequence tags of the lines that were credited. The counts are
 * the basis for voice-cast billing (`char_count * unit_price`).
 *
 * A `＃名前` marker line credits the *next* content line to that speaker.
 * This carry is modelled as a small per-scene state machine
 * ([`SpeakerState`]) that never outlives one scene scan.
 */

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::classifier::{self, ClassifiedLine, LineKind, SequenceTag};
use super::{Scene, Scope};
use crate::errors::ScriptError;

/// Totals for one speaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerStats {
    /// Speaker name exactly as written in the script
    pub name: String,

    /// Spoken characters (code points)
    pub char_count: usize,

    /// Tags of the credited lines, in scan order
    pub line_numbers: Vec<SequenceTag>,
}

impl SpeakerStats {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            char_count: 0,
            line_numbers: Vec::new(),
        }
    }

    /// Billing amount at the given price per character
    pub fn amount(&self, unit_price: f64) -> f64 {
        self.char_count as f64 * unit_price
    }
}

/// Aggregated statistics over a scope of scenes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CharacterStats {
    /// Speakers in order of first appearance
    speakers: Vec<SpeakerStats>,

    #[serde(skip)]
    index: HashMap<String, usize>,

    /// Sum of every speaker's character count
    pub total_chars: usize,
}

impl PartialEq for CharacterStats {
    fn eq(&self, other: &Self) -> bool {
        self.speakers == other.speakers && self.total_chars == other.total_chars
    }
}

impl CharacterStats {
    /// Number of distinct speakers
    pub fn speaker_count(&self) -> usize {
        self.speakers.len()
    }

    /// Whether no dialogue was found
    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }

    /// Statistics of one speaker
    pub fn get(&self, name: &str) -> Option<&SpeakerStats> {
        self.index.get(name).map(|&i| &self.speakers[i])
    }

    /// Speakers in order of first appearance
    pub fn speakers(&self) -> &[SpeakerStats] {
        &self.speakers
    }

    /// Speakers by descending character count; ties keep first appearance.
    pub fn sorted_by_chars(&self) -> Vec<&SpeakerStats> {
        let mut sorted: Vec<&SpeakerStats> = self.speakers.iter().collect();
        sorted.sort_by(|a, b| b.char_count.cmp(&a.char_count));
        sorted
    }

    /// Total billing amount at the given price per character
    pub fn total_amount(&self, unit_price: f64) -> f64 {
        self.total_chars as f64 * unit_price
    }

    fn credit(&mut self, speaker: &str, text: &str, tag: Option<SequenceTag>) {
        if text.is_empty() {
            return;
        }

        let index = match self.index.get(speaker) {
            Some(&i) => i,
            None => {
                self.speakers.push(SpeakerStats::new(speaker));
                self.index.insert(speaker.to_string(), self.speakers.len() - 1);
                self.speakers.len() - 1
            }
        };

        let chars = text.chars().count();
        let entry = &mut self.speakers[index];
        entry.char_count += chars;
        if let Some(tag) = tag {
            entry.line_numbers.push(tag);
        }
        self.total_chars += chars;
    }
}

/// Pending-speaker state of one scene scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakerState<'a> {
    /// No speaker declared
    Idle,
    /// A `＃名前` marker was seen; the next content line belongs to `name`
    Awaiting {
        /// Declared speaker
        name: &'a str,
        /// Tag of the marker line itself
        tag: Option<SequenceTag>,
    },
}

impl<'a> SpeakerState<'a> {
    /// Feed one classified line and return the next state.
    pub fn step(self, line: &ClassifiedLine<'a>, stats: &mut CharacterStats) -> Self {
        // Audio cues are transparent to the carry
        if line.kind.is_audio_cue() {
            return self;
        }

        if let Self::Awaiting { name, tag } = self {
            stats.credit(name, line.body, line.tag.or(tag));
            return Self::Idle;
        }

        match line.kind {
            LineKind::SpeakerMarker => match line.speaker {
                Some(name) => Self::Awaiting {
                    name,
                    tag: line.tag,
                },
                None => Self::Idle,
            },
            LineKind::SpeakerColon | LineKind::SpeakerQuote => {
                if let Some((speaker, dialogue)) = line.dialogue() {
                    stats.credit(speaker, dialogue, line.tag);
                }
                Self::Idle
            }
            _ => Self::Idle,
        }
    }
}

/// Aggregate statistics over the scenes selected by `scope`.
pub fn aggregate_stats(scenes: &[Scene], scope: Scope) -> Result<CharacterStats, ScriptError> {
    let selected = scope.select(scenes)?;
    Ok(aggregate_scenes(selected.into_iter().map(|(_, scene)| scene)))
}

/// Aggregate statistics over an explicit sequence of scenes.
pub fn aggregate_scenes<'s, I>(scenes: I) -> CharacterStats
where
    I: IntoIterator<Item = &'s Scene>,
{
    let mut stats = CharacterStats::default();
    let mut scene_count = 0;

    for scene in scenes {
        scene_count += 1;
        let mut state = SpeakerState::Idle;
        for line in scene.content.lines() {
            let classified = classifier::classify(line);
            state = state.step(&classified, &mut stats);
        }
    }

    debug!(
        "Aggregated {} speaker(s), {} chars over {} scene(s)",
        stats.speaker_count(),
        stats.total_chars,
        scene_count
    );

    stats
}
