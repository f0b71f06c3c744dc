/*!
 * Cue extraction.
 *
 * Collects sound effect, BGM, ambient, adult-content and location cues from
 * scenes. The canonical result keeps scene order then line order per
 * category; [`CueList::by_scene`] regroups it by scene name for reports.
 */

use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use super::classifier::{self, LineKind, SequenceTag};
use super::Scene;

/// Cue categories, in extraction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CueCategory {
    /// `☆効果音`
    SoundEffect,
    /// `☆BGM`
    Bgm,
    /// `☆環境音`
    Ambient,
    /// `♡`
    AdultCue,
    /// `〇 ` / `※現在地`
    Location,
}

impl CueCategory {
    /// All categories in extraction order
    pub const ALL: [CueCategory; 5] = [
        CueCategory::SoundEffect,
        CueCategory::Bgm,
        CueCategory::Ambient,
        CueCategory::AdultCue,
        CueCategory::Location,
    ];

    /// Category of a line kind, `None` for dialogue and plain lines
    pub fn from_kind(kind: LineKind) -> Option<Self> {
        match kind {
            LineKind::SoundEffect => Some(Self::SoundEffect),
            LineKind::Bgm => Some(Self::Bgm),
            LineKind::Ambient => Some(Self::Ambient),
            LineKind::AdultCue => Some(Self::AdultCue),
            LineKind::Location => Some(Self::Location),
            _ => None,
        }
    }

    /// Heading used in cue list reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::SoundEffect => "効果音",
            Self::Bgm => "BGM",
            Self::Ambient => "環境音",
            Self::AdultCue => "アダルト効果音",
            Self::Location => "現在地",
        }
    }

    /// Audio categories (everything except locations)
    pub fn is_audio(&self) -> bool {
        !matches!(self, Self::Location)
    }
}

impl fmt::Display for CueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One extracted cue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cue {
    /// Name of the scene the cue was found in
    pub scene: String,

    /// Sequence tag of the cue line, if it carried one
    pub line_number: Option<SequenceTag>,

    /// Cue label with marker and separators removed
    pub text: String,
}

/// Cues of one scene, split by category, used for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneCues<'a> {
    entries: BTreeMap<CueCategory, Vec<&'a Cue>>,
}

impl<'a> SceneCues<'a> {
    /// Cues of one category in extraction order
    pub fn get(&self, category: CueCategory) -> &[&'a Cue] {
        self.entries.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the scene has any cue of the given categories
    pub fn has_any(&self, categories: &[CueCategory]) -> bool {
        categories.iter().any(|c| !self.get(*c).is_empty())
    }
}

/// Result of a cue extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueList {
    /// Cues per category, in scene order then line order
    pub by_category: BTreeMap<CueCategory, Vec<Cue>>,
}

impl CueList {
    /// Cues of one category
    pub fn get(&self, category: CueCategory) -> &[Cue] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of cues in one category
    pub fn count(&self, category: CueCategory) -> usize {
        self.get(category).len()
    }

    /// Number of audio cues (locations excluded)
    pub fn audio_total(&self) -> usize {
        CueCategory::ALL
            .iter()
            .filter(|c| c.is_audio())
            .map(|c| self.count(*c))
            .sum()
    }

    /// Whether nothing was extracted
    pub fn is_empty(&self) -> bool {
        self.by_category.values().all(Vec::is_empty)
    }

    /// Regroup cues by scene name, sorted lexicographically.
    ///
    /// Scenes sharing a name are merged into one group.
    pub fn by_scene(&self) -> BTreeMap<&str, SceneCues<'_>> {
        let mut groups: BTreeMap<&str, SceneCues<'_>> = BTreeMap::new();
        for (category, cues) in &self.by_category {
            for cue in cues {
                groups
                    .entry(cue.scene.as_str())
                    .or_default()
                    .entries
                    .entry(*category)
                    .or_default()
                    .push(cue);
            }
        }
        groups
    }
}

/// Extract every cue from the given scenes.
pub fn extract_cues<'s, I>(scenes: I) -> CueList
where
    I: IntoIterator<Item = &'s Scene>,
{
    let mut list = CueList::default();
    for category in CueCategory::ALL {
        list.by_category.insert(category, Vec::new());
    }

    for scene in scenes {
        for line in scene.content.lines() {
            let classified = classifier::classify(line);
            let Some(category) = CueCategory::from_kind(classified.kind) else {
                continue;
            };
            list.by_category.entry(category).or_default().push(Cue {
                scene: scene.name.clone(),
                line_number: classified.tag,
                text: classified.content.to_string(),
            });
        }
    }

    debug!(
        "Extracted cues: {} effect, {} BGM, {} ambient, {} adult, {} location",
        list.count(CueCategory::SoundEffect),
        list.count(CueCategory::Bgm),
        list.count(CueCategory::Ambient),
        list.count(CueCategory::AdultCue),
        list.count(CueCategory::Location)
    );

    list
}
