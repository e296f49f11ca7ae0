//! Turning free-form model text into a validated [`TurnOutcome`].
//!
//! Three parse tiers run in order, each only when the previous one failed to
//! produce a JSON object:
//!
//! 1. [`strict_parse`]: the text is a JSON object as-is.
//! 2. [`extract_parse`]: a fenced code block, or the outermost `{ ... }` span.
//! 3. [`repair_parse`]: textual normalization, closing unterminated strings,
//!    then pattern extraction of the four required fields.
//!
//! Whatever parses is handed to [`check_schema`]. A schema violation is final:
//! no later tier runs and no value is guessed.

use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::{debug, instrument, warn};
use zyro_grid::{TurnOutcome, Winner};

/// Wire names of the required fields, in prompt order.
pub const REQUIRED_FIELDS: [&str; 4] = ["playerAAction", "playerBAction", "outcome", "winner"];

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(?:json|JSON)?\s*(\{[\s\S]*?\})\s*```").expect("fenced block pattern")
});
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("trailing comma pattern"));
static LOOSE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([{,]\s*)['"]?([A-Za-z_][A-Za-z0-9_]*)['"]?\s*:"#).expect("loose key pattern")
});
static SINGLE_QUOTE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s*'").expect("single quote open pattern"));
static SINGLE_QUOTE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'\s*([,}\]])").expect("single quote close pattern"));
static NEXT_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#",?\s*"(?:playerAAction|playerBAction|outcome|winner)"\s*:"#)
        .expect("next field pattern")
});

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOutcome {
    player_a_action: String,
    player_b_action: String,
    outcome: String,
    winner: Winner,
}

/// Runs all tiers and the schema check.
///
/// `None` means no valid outcome could be produced and the caller must fall back.
#[instrument(skip(text), fields(len = text.len()))]
pub fn validate(text: &str) -> Option<TurnOutcome> {
    let parsed = strict_parse(text)
        .inspect(|_| debug!("Strict parse succeeded"))
        .or_else(|| extract_parse(text).inspect(|_| debug!("Extraction parse succeeded")))
        .or_else(|| repair_parse(text).inspect(|_| debug!("Repair parse succeeded")));

    match parsed {
        Some(value) => check_schema(&value),
        None => {
            warn!("No parse tier produced a JSON object");
            None
        }
    }
}

/// Validates an already structured value. Strings are re-entered through [`validate`].
#[instrument(skip(value))]
pub fn validate_value(value: &Value) -> Option<TurnOutcome> {
    match value {
        Value::String(text) => validate(text),
        other => check_schema(other),
    }
}

/// Tier 1: the whole text is a JSON object.
pub fn strict_parse(text: &str) -> Option<Value> {
    parse_object(text.trim())
}

/// Tier 2: a fenced code block, else the span from the first `{` to the last `}`.
pub fn extract_parse(text: &str) -> Option<Value> {
    if let Some(inner) = FENCED_BLOCK.captures(text).and_then(|c| c.get(1)) {
        if let Some(value) = parse_object(inner.as_str()) {
            return Some(value);
        }
    }
    outermost_braces(text).and_then(parse_object)
}

/// Tier 3: normalize and repair the candidate text, then pull fields by pattern.
pub fn repair_parse(text: &str) -> Option<Value> {
    let candidate = FENCED_BLOCK
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .or_else(|| outermost_braces(text))
        .unwrap_or(text);

    let cleaned = close_unterminated(&normalize(candidate));
    debug!(cleaned = %truncate(&cleaned, 300), "Repaired candidate");

    parse_object(&cleaned).or_else(|| extract_fields(&cleaned))
}

/// Checks the four required fields. Any violation yields `None`.
pub fn check_schema(value: &Value) -> Option<TurnOutcome> {
    let Value::Object(map) = value else {
        warn!("Parsed value is not an object");
        return None;
    };

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !map.contains_key(*field))
        .collect();
    if !missing.is_empty() {
        warn!(?missing, "Missing required fields");
        return None;
    }

    let raw: RawOutcome = match serde_json::from_value(value.clone()) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, winner = %map["winner"], "Field types or winner value invalid");
            return None;
        }
    };

    let blank = [&raw.player_a_action, &raw.player_b_action, &raw.outcome]
        .iter()
        .any(|s| s.trim().is_empty());
    if blank {
        warn!("Narrative field is blank");
        return None;
    }

    Some(TurnOutcome::new(
        raw.player_a_action,
        raw.player_b_action,
        raw.outcome,
        raw.winner,
    ))
}

fn parse_object(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => Some(value),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "JSON parse failed");
            None
        }
    }
}

fn outermost_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn normalize(text: &str) -> String {
    let text = text
        .replace(['\u{201C}', '\u{201D}', '\u{201E}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");
    let text = WHITESPACE_RUN.replace_all(&text, " ");
    let text = TRAILING_COMMA.replace_all(&text, "$1");
    let text = quote_bare_keys(&text);
    let text = SINGLE_QUOTE_OPEN.replace_all(&text, ":\"");
    let text = SINGLE_QUOTE_CLOSE.replace_all(&text, "\"$1");
    text.into_owned()
}

/// Double-quotes bare or single-quoted keys that follow `{` or `,`.
///
/// Only positions outside string literals are rewritten, so a value like
/// `"Chaos, then: silence"` is left alone.
fn quote_bare_keys(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut open_quote: Option<char> = None;
    let mut escaped = false;
    let mut pos = 0;

    while let Some(c) = text[pos..].chars().next() {
        if let Some(quote) = open_quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                open_quote = None;
            }
            out.push(c);
            pos += c.len_utf8();
            continue;
        }

        if c == '{' || c == ',' {
            let key = LOOSE_KEY
                .captures_at(text, pos)
                .filter(|caps| caps.get(0).is_some_and(|m| m.start() == pos));
            if let Some(caps) = key {
                out.push_str(&caps[1]);
                out.push('"');
                out.push_str(&caps[2]);
                out.push_str("\":");
                pos = caps.get(0).map_or(pos + 1, |m| m.end());
                continue;
            }
        }

        if c == '"' || c == '\'' {
            open_quote = Some(c);
        }
        out.push(c);
        pos += c.len_utf8();
    }
    out
}

/// Closes a required string value whose closing quote went missing.
///
/// The value is taken to end at the next known field key, or at the last `}`.
fn close_unterminated(text: &str) -> String {
    let mut fixed = text.to_string();
    for field in REQUIRED_FIELDS {
        let opener = format!(r#""{}"\s*:\s*""#, field);
        let Ok(opener) = Regex::new(&opener) else {
            continue;
        };
        let Some(found) = opener.find(&fixed) else {
            continue;
        };
        let value_start = found.end();
        let rest = &fixed[value_start..];

        let next_field = NEXT_FIELD.find(rest);
        let boundary = next_field
            .map(|m| m.start())
            .or_else(|| rest.rfind('}'))
            .unwrap_or(rest.len());

        let segment = rest[..boundary].trim_end();
        let segment = segment.strip_suffix(',').unwrap_or(segment).trim_end();
        if segment.ends_with('"') && !segment.ends_with("\\\"") {
            continue;
        }

        let needs_comma = next_field.is_some_and(|m| !m.as_str().starts_with(','));
        let insert_at = value_start + segment.len();
        debug!(field, "Closing unterminated string");
        fixed.insert_str(insert_at, if needs_comma { "\"," } else { "\"" });
    }
    fixed
}

fn extract_fields(text: &str) -> Option<Value> {
    let mut map = Map::new();
    for field in REQUIRED_FIELDS {
        let pattern = if field == "winner" {
            format!(r#""{}"\s*:\s*"?([^",}}\s]+)"?"#, field)
        } else {
            format!(r#""{}"\s*:\s*"([^"]*)""#, field)
        };
        let value = Regex::new(&pattern)
            .ok()?
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string());
        match value {
            Some(value) => {
                map.insert(field.to_string(), Value::String(value));
            }
            None => {
                debug!(field, "Field not found by pattern");
                return None;
            }
        }
    }
    Some(Value::Object(map))
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
