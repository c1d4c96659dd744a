//! Inline speech markup for the command line.
//!
//! Text is spoken as-is except for `[[tag value]]` directives:
//!
//! | Tag      | Item                  |
//! |----------|-----------------------|
//! | `index`  | [`SpeechItem::Index`] |
//! | `break`  | [`SpeechItem::Break`] (milliseconds) |
//! | `rate`   | [`SpeechItem::Rate`]  |
//! | `pitch`  | [`SpeechItem::Pitch`] |
//! | `volume` | [`SpeechItem::Volume`] |

use std::num::ParseIntError;

use thiserror::Error;
use tripletalk_core::{SpeechItem, SpeechSequence};

const OPEN: &str = "[[";
const CLOSE: &str = "]]";

/// Markup parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    #[error("unclosed directive at byte {0}")]
    Unclosed(usize),

    #[error("unknown directive '{0}'")]
    UnknownTag(String),

    #[error("directive '{tag}' needs a value")]
    MissingValue { tag: String },

    #[error("invalid value '{value}' for '{tag}': {source}")]
    InvalidValue {
        tag: String,
        value: String,
        source: ParseIntError,
    },
}

/// Parse `input` into a speech sequence.
pub fn parse(input: &str) -> Result<SpeechSequence, MarkupError> {
    let mut items = Vec::new();
    let mut rest = input;
    let mut offset = 0;

    while let Some(start) = rest.find(OPEN) {
        push_text(&mut items, &rest[..start]);

        let body_start = start + OPEN.len();
        let end = rest[body_start..]
            .find(CLOSE)
            .ok_or(MarkupError::Unclosed(offset + start))?;
        items.push(directive(rest[body_start..body_start + end].trim())?);

        let consumed = body_start + end + CLOSE.len();
        rest = &rest[consumed..];
        offset += consumed;
    }
    push_text(&mut items, rest);

    Ok(items)
}

fn push_text(items: &mut SpeechSequence, text: &str) {
    if !text.is_empty() {
        items.push(SpeechItem::text(text));
    }
}

fn directive(body: &str) -> Result<SpeechItem, MarkupError> {
    let mut parts = body.split_whitespace();
    let tag = parts.next().unwrap_or_default().to_ascii_lowercase();
    let value = parts.next().ok_or_else(|| match tag.as_str() {
        "index" | "break" | "rate" | "pitch" | "volume" => {
            MarkupError::MissingValue { tag: tag.clone() }
        }
        _ => MarkupError::UnknownTag(tag.clone()),
    })?;

    let item = match tag.as_str() {
        "index" => SpeechItem::index(number(&tag, value)?),
        "break" => SpeechItem::Break(number(&tag, value)?),
        "rate" => SpeechItem::Rate(number(&tag, value)?),
        "pitch" => SpeechItem::Pitch(number(&tag, value)?),
        "volume" => SpeechItem::Volume(number(&tag, value)?),
        _ => return Err(MarkupError::UnknownTag(tag)),
    };
    Ok(item)
}

fn number<T>(tag: &str, value: &str) -> Result<T, MarkupError>
where
    T: std::str::FromStr<Err = ParseIntError>,
{
    value.parse().map_err(|source| MarkupError::InvalidValue {
        tag: tag.to_string(),
        value: value.to_string(),
        source,
    })
}
