/*!
 * Document rendering for statistics and cue results.
 *
 * Produces the exportable plain-text documents:
 * - character/billing report (text and CSV)
 * - voice-cast request letter
 * - cue list and location list
 *
 * Renderers are pure. The generation timestamp is supplied by the caller
 * and only appears in headers.
 */

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::cues::{Cue, CueCategory, CueList};
use super::stats::CharacterStats;

const REPORT_RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const LETTER_RULE: &str = "━━━━━━━━━━━━━━━━━━━━━";
const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Placeholder for a report over a scope without dialogue
pub const NO_DIALOGUE_PLACEHOLDER: &str = "（台詞が見つかりませんでした）";
/// Placeholder for a cue list without audio cues
pub const NO_AUDIO_CUES_PLACEHOLDER: &str = "（音声効果が見つかりませんでした）";
/// Placeholder for a location list without locations
pub const NO_LOCATIONS_PLACEHOLDER: &str = "（現在地情報が見つかりませんでした）";

/// CSV header row of the billing export
pub const CSV_HEADER: &str = "キャラクター名,文字数,単価,金額";

/// Audio categories in cue list order
const CUE_LIST_ORDER: [CueCategory; 4] = [
    CueCategory::SoundEffect,
    CueCategory::Ambient,
    CueCategory::AdultCue,
    CueCategory::Bgm,
];

/// Caller-supplied fields of the voice-cast request letter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceRequestOptions {
    /// Price per spoken character
    pub unit_price: f64,
    /// Delivery deadline, free text (e.g. `2024年6月30日`)
    pub deadline: String,
    /// Payment date, free text
    pub payment: String,
}

/// Integer with thousands separators (`1234567` -> `1,234,567`).
pub fn format_count(value: usize) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Amount with thousands separators and at most three decimals.
///
/// Trailing zero decimals are dropped: `1500.0` -> `1,500`, `2.25` -> `2.25`.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let scaled = (value.abs() * 1000.0).round() as u64;
    let whole = (scaled / 1000) as usize;
    let fraction = scaled % 1000;

    let mut formatted = String::new();
    if value < 0.0 && scaled > 0 {
        formatted.push('-');
    }
    formatted.push_str(&format_count(whole));
    if fraction > 0 {
        let decimals = format!("{:03}", fraction);
        formatted.push('.');
        formatted.push_str(decimals.trim_end_matches('0'));
    }
    formatted
}

fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

fn report_header(title: &str, separator: &str, at: &NaiveDateTime) -> String {
    format!(
        "{rule}\n■ {title}\n{rule}\n出力日時{separator}{time}\n\n",
        rule = REPORT_RULE,
        title = title,
        separator = separator,
        time = format_timestamp(at)
    )
}

/// Quote a CSV field when it contains a comma, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Plain-text character/billing report.
pub fn render_character_report(
    stats: &CharacterStats,
    unit_price: f64,
    generated_at: &NaiveDateTime,
) -> String {
    let mut report = report_header("文字数計算結果", ": ", generated_at);
    report.push_str(&format!("総文字数: {}文字\n", format_count(stats.total_chars)));
    report.push_str(&format!("キャラクター数: {}人\n", stats.speaker_count()));
    report.push_str(&format!(
        "合計金額: ¥{}\n\n",
        format_amount(stats.total_amount(unit_price))
    ));
    report.push_str("【キャラクター別詳細】\n");

    if stats.is_empty() {
        report.push_str(NO_DIALOGUE_PLACEHOLDER);
        report.push('\n');
        return report;
    }

    for speaker in stats.sorted_by_chars() {
        report.push_str(&format!(
            "{}: {}文字 (¥{})\n",
            speaker.name,
            format_count(speaker.char_count),
            format_amount(speaker.amount(unit_price))
        ));
    }
    report
}

/// CSV billing export with a header row and a trailing totals row.
pub fn render_character_csv(stats: &CharacterStats, unit_price: f64) -> String {
    let mut csv = format!("{}\n", CSV_HEADER);
    for speaker in stats.sorted_by_chars() {
        csv.push_str(&format!(
            "{},{},{},{}\n",
            csv_field(&speaker.name),
            speaker.char_count,
            unit_price,
            speaker.amount(unit_price)
        ));
    }
    csv.push_str(&format!(
        "\n合計,{},,{}\n",
        stats.total_chars,
        stats.total_amount(unit_price)
    ));
    csv
}

/// Voice-cast request letter.
///
/// One section per speaker in billing order, followed by the delivery
/// terms and the fixed audio format.
pub fn render_voice_request(stats: &CharacterStats, options: &VoiceRequestOptions) -> String {
    let mut letter = String::from("お世話になっております。\n\n");
    letter.push_str("この度、音声収録のご案内をさせていただきたく連絡いたしました。\n");
    letter.push_str("下記の内容にて収録の上、ご提出いただけますと幸いです。\n\n");
    letter.push_str("【ご依頼内容】\n");
    letter.push_str(&format!("{}\n\n", LETTER_RULE));

    if stats.is_empty() {
        letter.push_str(&format!("{}\n\n", NO_DIALOGUE_PLACEHOLDER));
    }

    for speaker in stats.sorted_by_chars() {
        letter.push_str(&format!("■ キャラクター名\n  {}\n\n", speaker.name));
        letter.push_str(&format!(
            "■ 収録文字数\n  {}文字\n\n",
            format_count(speaker.char_count)
        ));

        if !speaker.line_numbers.is_empty() {
            letter.push_str("■ 収録対象セリフ番号\n");
            for tag in &speaker.line_numbers {
                letter.push_str(&format!("  {}\n", tag));
            }
            letter.push('\n');
        }

        letter.push_str(&format!(
            "■ お支払い金額\n  ¥{}（単価：¥{}/文字）\n\n",
            format_amount(speaker.amount(options.unit_price)),
            options.unit_price
        ));
    }

    letter.push_str(&format!("■ 納品期限\n  {}まで\n\n", options.deadline));
    letter.push_str(&format!("■ お支払い期日\n  {}\n", options.payment));
    letter.push_str("  ※納品確認後、上記期日までにお支払いいたします\n\n");
    letter.push_str("■ 音声形式\n");
    letter.push_str("  ・サンプリングレート：48000Hz\n");
    letter.push_str("  ・ビット深度：16bit\n");
    letter.push_str("  ・チャンネル：モノラル\n");
    letter.push_str("  ・ファイル形式：wav\n\n");
    letter.push_str("■ 納品方法\n  ギガファイル便での提出をお願いいたします。\n\n");
    letter.push_str("■ 納品フォルダ名\n  音声ファイル\n\n");
    letter.push_str("■ ファイル命名規則\n");
    letter.push_str("  「セリフ番号_キャラクター名.wav」の形式でお願いいたします。\n");
    letter.push_str("  例：001_キャラクター名.wav\n\n");
    letter.push_str(&format!("{}\n\n", LETTER_RULE));
    letter.push_str("【収録にあたってのお願い】\n");
    letter.push_str("・ノイズが入らない静かな環境での収録をお願いいたします。\n");
    letter.push_str("・各ファイルの冒頭と末尾に0.5秒程度の無音部分を入れてください。\n");
    letter.push_str("・リテイクがある場合は別ファイルとして保存してください。\n\n");
    letter.push_str("ご不明な点がございましたら、お気軽にお問い合わせください。\n");
    letter.push_str("お忙しいところ恐れ入りますが、ご確認のほどよろしくお願いいたします。\n\n");
    letter.push_str("何卒よろしくお願いいたします。");
    letter
}

fn cue_item(index: usize, cue: &Cue) -> String {
    match cue.line_number {
        Some(tag) => format!("{}. [連番:{}] {}", index + 1, tag, cue.text),
        None => format!("{}. {}", index + 1, cue.text),
    }
}

/// Audio cue list grouped by scene, then by category.
pub fn render_cue_list(cues: &CueList, generated_at: &NaiveDateTime) -> String {
    let mut list = report_header("トラック別音声効果リスト", "：", generated_at);

    for (scene, group) in cues.by_scene() {
        if !group.has_any(&CUE_LIST_ORDER) {
            continue;
        }

        list.push_str(&format!("【{}】\n\n", scene));
        for category in CUE_LIST_ORDER {
            let entries = group.get(category);
            if entries.is_empty() {
                continue;
            }
            list.push_str(&format!("  ◆{}\n", category.label()));
            for (i, cue) in entries.iter().enumerate() {
                list.push_str(&format!("    {}\n", cue_item(i, cue)));
            }
            list.push('\n');
        }
        list.push('\n');
    }

    if cues.audio_total() == 0 {
        list.push_str(NO_AUDIO_CUES_PLACEHOLDER);
        list.push('\n');
    }
    list
}

/// Location list grouped by scene.
pub fn render_location_list(cues: &CueList, generated_at: &NaiveDateTime) -> String {
    let mut list = report_header("シーン管理リスト", "：", generated_at);

    if cues.count(CueCategory::Location) == 0 {
        list.push_str(NO_LOCATIONS_PLACEHOLDER);
        list.push('\n');
        return list;
    }

    for (scene, group) in cues.by_scene() {
        let locations = group.get(CueCategory::Location);
        if locations.is_empty() {
            continue;
        }
        list.push_str(&format!("【{}】\n\n", scene));
        for (i, cue) in locations.iter().enumerate() {
            list.push_str(&format!("  {}\n", cue_item(i, cue)));
        }
        list.push('\n');
    }
    list
}
