/*!
 * Scene and scope types shared by the engine passes.
 */

use serde::{Deserialize, Serialize};

use crate::errors::ScriptError;

/// One named unit of script text.
///
/// Field names follow the project file layout (`targetMinutes`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Scene label used for grouping in reports
    #[serde(default)]
    pub name: String,

    /// Raw multi-line script text
    #[serde(default)]
    pub content: String,

    /// Short synopsis
    #[serde(default)]
    pub synopsis: String,

    /// Target runtime in minutes
    #[serde(default)]
    pub target_minutes: u32,
}

impl Scene {
    /// Create a scene with the given name and content
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            synopsis: String::new(),
            target_minutes: 0,
        }
    }

    /// Create an empty scene named after its one-based position (`Scene-01`)
    pub fn numbered(position: usize) -> Self {
        Self::new(format!("Scene-{:02}", position), "")
    }

    /// Raw character count of the scene text (code points)
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

/// Caller-selected subset of scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Only the scene at the given zero-based index
    Current(usize),
    /// Every scene in order
    #[default]
    All,
}

impl Scope {
    /// Build a scope from an optional scene index
    pub fn from_index(index: Option<usize>) -> Self {
        index.map_or(Self::All, Self::Current)
    }

    /// Resolve the scope against a scene list, keeping each scene's index.
    pub fn select<'s>(&self, scenes: &'s [Scene]) -> Result<Vec<(usize, &'s Scene)>, ScriptError> {
        match *self {
            Self::All => Ok(scenes.iter().enumerate().collect()),
            Self::Current(index) => scenes
                .get(index)
                .map(|scene| vec![(index, scene)])
                .ok_or(ScriptError::SceneOutOfRange {
                    index,
                    count: scenes.len(),
                }),
        }
    }
}
