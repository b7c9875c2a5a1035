//! Route extraction from free-form oracle replies.
//!
//! Accepted shapes, tried in order:
//!
//! 1. A bare JSON object: `{"chosen_path": ["E1", "E2"]}`
//! 2. The same object inside a markdown code fence
//! 3. The first `{ … }` span anywhere in the text
//! 4. The assignment form `chose_path = ['E1', 'E2']` (either quote style,
//!    `chosen_path` also accepted)

use serde::Deserialize;

use crate::{OracleError, OracleResult};

#[derive(Debug, Deserialize)]
struct JsonReply {
    #[serde(alias = "chose_path")]
    chosen_path: Vec<String>,
}

/// Pull the chosen route out of `raw`.
///
/// # Errors
///
/// [`OracleError::Parse`] if no strategy finds a non-empty route.
pub fn parse_choice(raw: &str) -> OracleResult<Vec<String>> {
    let trimmed = raw.trim();

    let json_candidates = [
        Some(trimmed),
        extract_code_block(trimmed),
        extract_braces(trimmed),
    ];
    for text in json_candidates.into_iter().flatten() {
        if let Ok(reply) = serde_json::from_str::<JsonReply>(text)
            && !reply.chosen_path.is_empty()
        {
            return Ok(reply.chosen_path);
        }
    }

    if let Some(route) = parse_assignment(trimmed)
        && !route.is_empty()
    {
        return Ok(route);
    }

    Err(OracleError::Parse(format!("no route found in reply: {trimmed}")))
}

/// Contents of the first ```` ``` ```` fence, without the language tag line.
fn extract_code_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_tag = &text[open + 3..];
    let body_start = after_tag.find('\n').map_or(0, |nl| nl + 1);
    let body = &after_tag[body_start..];
    let close = body.find("```")?;
    Some(body[..close].trim())
}

fn extract_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// `chose_path = ['a', 'b']` or `chosen_path: ["a", "b"]`.
fn parse_assignment(text: &str) -> Option<Vec<String>> {
    let key_end = ["chosen_path", "chose_path"]
        .iter()
        .filter_map(|key| text.find(key).map(|i| i + key.len()))
        .min()?;

    let rest = &text[key_end..];
    // Tolerate a quoted key, as in half-broken JSON.
    let rest = rest.strip_prefix(['"', '\'']).unwrap_or(rest).trim_start();
    let rest = rest.strip_prefix(['=', ':'])?.trim_start();
    let rest = rest.strip_prefix('[')?;
    let list = &rest[..rest.find(']')?];

    Some(quoted_items(list))
}

/// Every `'…'` or `"…"` item in `list`, in order.
fn quoted_items(list: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut chars = list.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '\'' && c != '"' {
            continue;
        }
        let start = i + c.len_utf8();
        match list[start..].find(c) {
            Some(len) => {
                items.push(list[start..start + len].to_owned());
                // Skip past the closing quote.
                let close = start + len;
                for (j, _) in chars.by_ref() {
                    if j == close {
                        break;
                    }
                }
            }
            None => break,
        }
    }
    items
}
