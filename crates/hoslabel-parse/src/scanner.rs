//! Bracket-aware scanner separating a normalized line into cleaned name
//! fragments and parenthetical annotations.
//!
//! Scanning happens in two passes. [`scan`] turns the line into a flat
//! stream of [`Span`]s; [`extract`] assembles the stream into parallel name
//! segments plus a de-duplicated annotation list.

use crate::dedup_in_order;
use crate::lexicon::SEPARATOR;

/// Tags that, right after `(`, mark the group as a former name.
/// Ordered longest first.
const ALIAS_TAGS: [&str; 3] = ["原:", "原", ":"];

/// Characters stripped from every output fragment.
const NOISE: [char; 1] = [':'];

/// A piece of a normalized line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    /// Text outside any parenthetical group.
    Plain(String),
    /// A parenthetical note: a remark, a branch notation or a former name
    /// without an alias tag. Nested groups are emitted as their own spans.
    Annotation(String),
    /// A tagged former-name group, e.g. `(原:…)`. Its content is a parallel
    /// name for the same institution.
    Alias(String),
}

/// Result of [`extract`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Parallel name fragments, in line order.
    pub segments: Vec<String>,
    /// De-duplicated annotation strings.
    pub annotations: Vec<String>,
}

/// Outcome of scanning one parenthetical group.
enum Group {
    Closed {
        body: String,
        nested: Vec<String>,
        alias: bool,
        /// Index just past the closing `)`.
        end: usize,
    },
    /// No closing `)` before end of input; the text is kept in place.
    Unterminated(String),
}

/// Split a normalized line into spans.
///
/// Handles:
/// - Top-level `(`…`)` groups as annotations or, when tagged, aliases
/// - One level of nesting inside a group, emitted as extra annotations
/// - Unterminated groups, recovered as plain text
/// - Stray `)`, dropped
pub fn scan(s: &str) -> Vec<Span> {
    let chars: Vec<char> = s.chars().collect();
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '(' => match scan_group(&chars, i) {
                Group::Closed {
                    body,
                    nested,
                    alias,
                    end,
                } => {
                    if !plain.is_empty() {
                        spans.push(Span::Plain(std::mem::take(&mut plain)));
                    }
                    spans.push(if alias {
                        Span::Alias(body)
                    } else {
                        Span::Annotation(body)
                    });
                    spans.extend(nested.into_iter().map(Span::Annotation));
                    i = end;
                }
                Group::Unterminated(text) => {
                    plain.push_str(&text);
                    i = chars.len();
                }
            },
            ')' => i += 1,
            c => {
                plain.push(c);
                i += 1;
            }
        }
    }

    if !plain.is_empty() {
        spans.push(Span::Plain(plain));
    }
    spans
}

/// Scan the group opening at `open`.
fn scan_group(chars: &[char], open: usize) -> Group {
    let tag_len = alias_tag_len(&chars[open + 1..]);
    let content_start = open + 1 + tag_len.unwrap_or(0);
    let mut body = String::new();
    let mut nested = Vec::new();
    let mut j = content_start;

    while j < chars.len() {
        match chars[j] {
            ')' => {
                return Group::Closed {
                    body,
                    nested,
                    alias: tag_len.is_some(),
                    end: j + 1,
                }
            }
            '(' => {
                let start = j + 1 + alias_tag_len(&chars[j + 1..]).unwrap_or(0);
                match chars[start..].iter().position(|&c| c == ')') {
                    Some(len) => {
                        nested.push(chars[start..start + len].iter().collect());
                        j = start + len + 1;
                    }
                    None => break,
                }
            }
            c => {
                body.push(c);
                j += 1;
            }
        }
    }

    Group::Unterminated(
        chars[content_start..]
            .iter()
            .filter(|&&c| c != '(' && c != ')')
            .collect(),
    )
}

/// Length in chars of the alias tag at the start of `rest`, if any.
fn alias_tag_len(rest: &[char]) -> Option<usize> {
    ALIAS_TAGS.iter().find_map(|tag| {
        let len = tag.chars().count();
        (rest.len() >= len && rest.iter().take(len).copied().eq(tag.chars())).then_some(len)
    })
}

/// Assemble spans into parallel name segments and annotations.
///
/// Plain text continues the current segment across annotations; a separator
/// or an alias group closes it. Alias content becomes segments of its own.
pub fn extract(normalized: &str) -> Extraction {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut annotations = Vec::new();

    for span in scan(normalized) {
        match span {
            Span::Plain(text) => {
                let mut pieces = text.split(SEPARATOR);
                if let Some(first) = pieces.next() {
                    current.push_str(first);
                }
                for piece in pieces {
                    close_segment(&mut segments, &mut current);
                    current.push_str(piece);
                }
            }
            Span::Alias(text) => {
                close_segment(&mut segments, &mut current);
                segments.extend(pieces(&text));
            }
            Span::Annotation(text) => annotations.extend(pieces(&text)),
        }
    }
    close_segment(&mut segments, &mut current);

    let extraction = Extraction {
        segments,
        annotations: dedup_in_order(annotations),
    };
    debug_assert!(extraction
        .segments
        .iter()
        .chain(&extraction.annotations)
        .all(|s| !s.contains(['(', ')', ':', SEPARATOR])));
    extraction
}

fn close_segment(segments: &mut Vec<String>, current: &mut String) {
    let cleaned = strip_noise(current);
    if !cleaned.is_empty() {
        segments.push(cleaned);
    }
    current.clear();
}

fn pieces(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(SEPARATOR)
        .map(strip_noise)
        .filter(|p| !p.is_empty())
}

fn strip_noise(s: &str) -> String {
    s.chars().filter(|c| !NOISE.contains(c)).collect()
}
