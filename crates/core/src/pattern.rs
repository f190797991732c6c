use crate::metadata::PhotoMetadata;
use chrono::{Datelike, NaiveDateTime, Timelike};

/// 置換後に `unknown` として埋め込む文字列。
pub const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternPart {
    Literal(String),
    /// `d(<書式>)` 形式の日時ディレクティブ。
    DateDirective(String),
    /// `<キー>` 形式のメタデータディレクティブ。
    KeyDirective(String),
}

/// パターン文字列をトークン列に分解する。
///
/// 閉じ括弧を欠くなど形の崩れたディレクティブはエラーにせず
/// リテラルとして素通しする。検証は行わない。
pub fn parse_pattern(input: &str) -> Vec<PatternPart> {
    let chars: Vec<char> = input.chars().collect();
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == 'd' && chars.get(i + 1) == Some(&'(') {
            if let Some(close) = find_from(&chars, i + 2, ')') {
                flush_literal(&mut parts, &mut literal);
                parts.push(PatternPart::DateDirective(
                    chars[i + 2..close].iter().collect(),
                ));
                i = close + 1;
                continue;
            }
        }
        if chars[i] == '<' {
            if let Some(close) = find_from(&chars, i + 1, '>') {
                flush_literal(&mut parts, &mut literal);
                parts.push(PatternPart::KeyDirective(
                    chars[i + 1..close].iter().collect(),
                ));
                i = close + 1;
                continue;
            }
        }
        literal.push(chars[i]);
        i += 1;
    }

    flush_literal(&mut parts, &mut literal);
    parts
}

/// トークン列をメタデータで具体化する。(パターン, メタデータ)の純関数。
pub fn render_pattern(parts: &[PatternPart], metadata: &PhotoMetadata) -> String {
    let mut output = String::new();
    for part in parts {
        match part {
            PatternPart::Literal(s) => output.push_str(s),
            PatternPart::DateDirective(spec) => match metadata.capture_timestamp() {
                Some(timestamp) => output.push_str(&format_timestamp(&timestamp, spec)),
                None => output.push_str(UNKNOWN),
            },
            PatternPart::KeyDirective(key) => match metadata.get(key) {
                Some(value) => output.push_str(&value.as_text()),
                None => output.push_str(UNKNOWN),
            },
        }
    }
    output
}

fn flush_literal(parts: &mut Vec<PatternPart>, literal: &mut String) {
    if !literal.is_empty() {
        parts.push(PatternPart::Literal(std::mem::take(literal)));
    }
}

fn find_from(chars: &[char], start: usize, needle: char) -> Option<usize> {
    chars[start..]
        .iter()
        .position(|&c| c == needle)
        .map(|offset| start + offset)
}

/// 日時書式ミニ言語。同一文字の連続を1トークンとして扱う:
/// `y`=年 `M`=月 `d`=日 `H`=時 `m`=分 `s`=秒。
/// 連続長がゼロ埋め幅になる(長さ1は埋めなし、`yy`は下2桁)。
/// それ以外の文字はそのまま出力する。
fn format_timestamp(timestamp: &NaiveDateTime, spec: &str) -> String {
    let chars: Vec<char> = spec.chars().collect();
    let mut output = String::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let mut run = 1;
        while chars.get(i + run) == Some(&ch) {
            run += 1;
        }

        match ch {
            'y' => {
                if run == 2 {
                    output.push_str(&format!("{:02}", timestamp.year().rem_euclid(100)));
                } else {
                    output.push_str(&pad(timestamp.year() as u32, run));
                }
            }
            'M' => output.push_str(&pad(timestamp.month(), run)),
            'd' => output.push_str(&pad(timestamp.day(), run)),
            'H' => output.push_str(&pad(timestamp.hour(), run)),
            'm' => output.push_str(&pad(timestamp.minute(), run)),
            's' => output.push_str(&pad(timestamp.second(), run)),
            other => {
                for _ in 0..run {
                    output.push(other);
                }
            }
        }
        i += run;
    }

    output
}

fn pad(value: u32, width: usize) -> String {
    format!("{value:0width$}")
}
