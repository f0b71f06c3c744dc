/*!
 * Line classification for scene markup.
 *
 * Every line of a scene is classified into exactly one [`LineKind`]:
 * - Cue lines (`☆効果音`, `☆BGM`, `☆環境音`, `♡`, `〇 ` / `※現在地`)
 * - Dialogue lines (`名前：台詞`, `名前「台詞」`, `＃名前`)
 * - Plain narration for everything else
 *
 * Classification is a pipeline of pure steps: trim, strip the optional
 * `NNN ` sequence tag, then walk an ordered matcher table where the first
 * match wins. Cue matchers sit ahead of dialogue matchers so a cue line is
 * never mistaken for dialogue.
 */

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Leading sequence tag: three ASCII digits followed by whitespace.
static SEQUENCE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([0-9]{3})\s+").expect("Invalid sequence tag regex")
});

/// `名前「台詞」` dialogue; the line must end with the closing bracket.
static SPEAKER_QUOTE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^「]+)「(.+)」$").expect("Invalid speaker quote regex")
});

/// Sound effect cue marker
pub const SOUND_EFFECT_MARKER: &str = "☆効果音";
/// BGM cue marker
pub const BGM_MARKER: &str = "☆BGM";
/// Ambient sound cue marker
pub const AMBIENT_MARKER: &str = "☆環境音";
/// Adult-content effect marker
pub const ADULT_CUE_MARKER: &str = "♡";
/// Location marker (circle followed by a space)
pub const LOCATION_MARKER: &str = "〇 ";
/// Legacy location marker
pub const LEGACY_LOCATION_MARKER: &str = "※現在地";
/// Separator between a cue marker and its label
pub const CUE_SEPARATOR: &str = "//";
/// Separator between a speaker name and the spoken line
pub const SPEAKER_COLON: char = '：';
/// Prefix of a speaker marker line
pub const SPEAKER_MARKER: char = '＃';

/// Three-digit dialogue sequence number written at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SequenceTag(u32);

impl SequenceTag {
    /// Create a tag from its numeric value
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    /// Numeric value of the tag
    pub fn number(&self) -> u32 {
        self.0
    }

    /// Prefix form written in front of a dialogue line (`"005 "`)
    pub fn prefix(&self) -> String {
        format!("{} ", self)
    }
}

impl fmt::Display for SequenceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// Closed set of line kinds, listed in matching priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// `☆効果音//ドアが開く`
    SoundEffect,
    /// `☆BGM//朝の音楽`
    Bgm,
    /// `☆環境音//雨音`
    Ambient,
    /// `♡くちゅ//`
    AdultCue,
    /// `〇 教室` or legacy `※現在地：教室`
    Location,
    /// `アリス：おはよう`
    SpeakerColon,
    /// `アリス「おはよう」`
    SpeakerQuote,
    /// `＃ボブ`, the spoken line follows on the next line
    SpeakerMarker,
    /// Narration and stage directions
    Plain,
}

impl LineKind {
    /// All kinds in priority order.
    pub const ALL: [LineKind; 9] = [
        LineKind::SoundEffect,
        LineKind::Bgm,
        LineKind::Ambient,
        LineKind::AdultCue,
        LineKind::Location,
        LineKind::SpeakerColon,
        LineKind::SpeakerQuote,
        LineKind::SpeakerMarker,
        LineKind::Plain,
    ];

    /// Any of the five cue kinds
    pub fn is_cue(&self) -> bool {
        matches!(
            self,
            Self::SoundEffect | Self::Bgm | Self::Ambient | Self::AdultCue | Self::Location
        )
    }

    /// The three `☆` audio cues that statistics skip entirely
    pub fn is_audio_cue(&self) -> bool {
        matches!(self, Self::SoundEffect | Self::Bgm | Self::Ambient)
    }

    /// Lines that occupy a dialogue sequence slot
    pub fn is_numberable(&self) -> bool {
        matches!(
            self,
            Self::SpeakerColon | Self::SpeakerQuote | Self::SpeakerMarker
        )
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SoundEffect => "sound_effect",
            Self::Bgm => "bgm",
            Self::Ambient => "ambient",
            Self::AdultCue => "adult_cue",
            Self::Location => "location",
            Self::SpeakerColon => "speaker_colon",
            Self::SpeakerQuote => "speaker_quote",
            Self::SpeakerMarker => "speaker_marker",
            Self::Plain => "plain",
        };
        write!(f, "{}", name)
    }
}

/// Result of classifying a single line. Borrows from the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    /// Kind of the line
    pub kind: LineKind,

    /// Leading sequence tag, if the line carried one
    pub tag: Option<SequenceTag>,

    /// Trimmed line with the sequence tag removed
    pub body: &'a str,

    /// Speaker name for the three dialogue kinds
    pub speaker: Option<&'a str>,

    /// Dialogue for `SpeakerColon`/`SpeakerQuote`, label for cues,
    /// empty for markers, the body itself for plain lines
    pub content: &'a str,
}

impl<'a> ClassifiedLine<'a> {
    /// Whether the line carried a sequence tag
    pub fn has_tag(&self) -> bool {
        self.tag.is_some()
    }

    /// Speaker and spoken text for lines that carry dialogue on the same line
    pub fn dialogue(&self) -> Option<(&'a str, &'a str)> {
        match self.kind {
            LineKind::SpeakerColon | LineKind::SpeakerQuote => {
                self.speaker.map(|speaker| (speaker, self.content))
            }
            _ => None,
        }
    }
}

/// Fields pulled out of a body by a matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fields<'a> {
    speaker: Option<&'a str>,
    content: &'a str,
}

impl<'a> Fields<'a> {
    fn cue(content: &'a str) -> Self {
        Self { speaker: None, content }
    }

    fn spoken(speaker: &'a str, content: &'a str) -> Self {
        Self { speaker: Some(speaker), content }
    }
}

type Matcher = fn(&str) -> Option<Fields<'_>>;

/// Matchers in priority order. `Plain` is the fallback and has no entry.
const MATCHERS: [(LineKind, Matcher); 8] = [
    (LineKind::SoundEffect, match_sound_effect as Matcher),
    (LineKind::Bgm, match_bgm as Matcher),
    (LineKind::Ambient, match_ambient as Matcher),
    (LineKind::AdultCue, match_adult_cue as Matcher),
    (LineKind::Location, match_location as Matcher),
    (LineKind::SpeakerColon, match_speaker_colon as Matcher),
    (LineKind::SpeakerQuote, match_speaker_quote as Matcher),
    (LineKind::SpeakerMarker, match_speaker_marker as Matcher),
];

/// Classify one raw line of scene text.
pub fn classify(raw_line: &str) -> ClassifiedLine<'_> {
    let (tag, rest) = strip_sequence_tag(raw_line.trim());
    let body = rest.trim();

    for (kind, matcher) in MATCHERS.iter() {
        if let Some(fields) = matcher(body) {
            return ClassifiedLine {
                kind: *kind,
                tag,
                body,
                speaker: fields.speaker,
                content: fields.content,
            };
        }
    }

    ClassifiedLine {
        kind: LineKind::Plain,
        tag,
        body,
        speaker: None,
        content: body,
    }
}

/// Split a leading `NNN ` tag from a line.
///
/// Returns the parsed tag (if any) and the remainder of the line. Leading
/// whitespace in front of the tag is consumed along with the tag; a line
/// without a tag is returned unchanged.
pub fn strip_sequence_tag(line: &str) -> (Option<SequenceTag>, &str) {
    match SEQUENCE_TAG_REGEX.captures(line) {
        Some(caps) => {
            let whole = caps.get(0).map_or(0, |m| m.end());
            let tag = caps
                .get(1)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .map(SequenceTag::new);
            (tag, &line[whole..])
        }
        None => (None, line),
    }
}

/// Label of a `☆` cue, accepting `TAG//label`, legacy `TAG：label`,
/// `TAG:label` and bare `TAGlabel` forms.
fn audio_cue<'a>(body: &'a str, marker: &str) -> Option<Fields<'a>> {
    let rest = body.strip_prefix(marker)?;
    let rest = rest
        .strip_prefix(CUE_SEPARATOR)
        .or_else(|| rest.strip_prefix(SPEAKER_COLON))
        .or_else(|| rest.strip_prefix(':'))
        .unwrap_or(rest);
    Some(Fields::cue(cue_label(body, rest)))
}

/// Trim a cue label and drop trailing slashes. Falls back to the whole
/// body when nothing is left.
fn cue_label<'a>(body: &'a str, rest: &'a str) -> &'a str {
    let label = rest.trim().trim_end_matches('/').trim();
    if label.is_empty() { body } else { label }
}

fn match_sound_effect(body: &str) -> Option<Fields<'_>> {
    audio_cue(body, SOUND_EFFECT_MARKER)
}

fn match_bgm(body: &str) -> Option<Fields<'_>> {
    audio_cue(body, BGM_MARKER)
}

fn match_ambient(body: &str) -> Option<Fields<'_>> {
    audio_cue(body, AMBIENT_MARKER)
}

fn match_adult_cue(body: &str) -> Option<Fields<'_>> {
    let rest = body.strip_prefix(ADULT_CUE_MARKER)?;
    Some(Fields::cue(cue_label(body, rest)))
}

fn match_location(body: &str) -> Option<Fields<'_>> {
    if let Some(rest) = body.strip_prefix(LOCATION_MARKER) {
        return Some(Fields::cue(cue_label(body, rest)));
    }

    let rest = body.strip_prefix(LEGACY_LOCATION_MARKER)?;
    let rest = rest
        .strip_prefix(SPEAKER_COLON)
        .or_else(|| rest.strip_prefix(':'))
        .unwrap_or(rest);
    Some(Fields::cue(cue_label(body, rest)))
}

fn match_speaker_colon(body: &str) -> Option<Fields<'_>> {
    let (name, dialogue) = body.split_once(SPEAKER_COLON)?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(Fields::spoken(name, dialogue.trim()))
}

fn match_speaker_quote(body: &str) -> Option<Fields<'_>> {
    let caps = SPEAKER_QUOTE_REGEX.captures(body)?;
    let name = caps.get(1)?.as_str().trim();
    let dialogue = caps.get(2)?.as_str();
    if name.is_empty() {
        return None;
    }
    Some(Fields::spoken(name, dialogue))
}

fn match_speaker_marker(body: &str) -> Option<Fields<'_>> {
    let name = body.strip_prefix(SPEAKER_MARKER)?.trim();
    if name.is_empty() {
        return None;
    }
    Some(Fields::spoken(name, ""))
}
