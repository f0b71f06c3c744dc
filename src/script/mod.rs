/*!
 * Script annotation and statistics engine.
 *
 * Pure passes over scene text:
 * - `classifier`: line kinds and sequence tags
 * - `numbering`: dialogue sequence numbering
 * - `stats`: per-speaker character statistics
 * - `cues`: sound, BGM, ambient, adult and location cue extraction
 * - `replace`: scoped multi-pair literal replacement
 * - `report`: text, CSV and letter rendering
 *
 * Nothing in this module performs I/O.
 */

pub mod classifier;
pub mod cues;
pub mod numbering;
pub mod replace;
pub mod report;
pub mod scene;
pub mod stats;

pub use classifier::{classify, strip_sequence_tag, ClassifiedLine, LineKind, SequenceTag};
pub use cues::{extract_cues, Cue, CueCategory, CueList};
pub use numbering::{renumber_dialogue, NumberingResult};
pub use replace::{bulk_replace, ReplaceOutcome, ReplacePair, ReplacePairs, SceneReplacement};
pub use report::{
    render_character_csv, render_character_report, render_cue_list, render_location_list,
    render_voice_request, VoiceRequestOptions,
};
pub use scene::{Scene, Scope};
pub use stats::{aggregate_scenes, aggregate_stats, CharacterStats, SpeakerStats};
