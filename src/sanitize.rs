use serde_json::Value;

/// Longest text kept in a cell before truncation
pub const MAX_CELL_CHARS: usize = 32_000;
const ELLIPSIS: &str = "...";

/// Sanitize an optional value; absent becomes the empty string
pub fn sanitize_opt(value: Option<&str>) -> String {
    value.map(sanitize).unwrap_or_default()
}

/// Make free text safe to store in a spreadsheet cell.
///
/// NULs are dropped, a `{...}` body that parses as JSON once its escaped and
/// doubled quotes are collapsed is pretty-printed, control characters are
/// removed and the result is capped at `MAX_CELL_CHARS` plus an ellipsis.
pub fn sanitize(text: &str) -> String {
    let text: String = text.chars().filter(|&c| c != '\0').collect();
    let text = pretty_json(&text).unwrap_or(text);

    let cleaned: String = text.chars().filter(|&c| c as u32 >= 32).collect();
    truncate(cleaned)
}

/// Reinterpret a brace-delimited body as JSON. `\"` is collapsed before `""`.
fn pretty_json(text: &str) -> Option<String> {
    if !(text.starts_with('{') && text.ends_with('}')) {
        return None;
    }

    let unescaped = text.replace("\\\"", "\"").replace("\"\"", "\"");
    let value: Value = serde_json::from_str(&unescaped).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

fn truncate(text: String) -> String {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => {
            let mut truncated = text[..cut].to_string();
            truncated.push_str(ELLIPSIS);
            truncated
        }
        None => text,
    }
}
