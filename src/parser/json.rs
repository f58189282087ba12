use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;

/// Marker line that introduces the machine-parsed block in every prompt
pub const JSON_MARKER: &str = "JSON:";

fn fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"```[A-Za-z]*[ \t]*\r?\n?([\s\S]*?)```").expect("fence regex is valid")
    })
}

/// Locate the structured payload in a free-text response.
///
/// `None` means no parseable block exists; `Some(Value::Array(vec![]))` is a
/// block that was present but empty. Callers branch on that difference.
pub fn extract_structured_block(raw: &str) -> Option<Value> {
    // Claude wraps result in {"result": "...", ...} JSON
    #[derive(Deserialize)]
    struct ClaudeOutput {
        result: String,
    }

    if let Ok(claude_out) = serde_json::from_str::<ClaudeOutput>(raw) {
        if let Some(value) = extract_from_text(&claude_out.result) {
            return Some(value);
        }
    }

    extract_from_text(raw)
}

fn extract_from_text(s: &str) -> Option<Value> {
    // First try: fenced block after the last marker
    if let Some(idx) = s.rfind(JSON_MARKER) {
        if let Some(value) = first_fenced_json(&s[idx + JSON_MARKER.len()..]) {
            return Some(value);
        }
    }

    // Second try: any fenced block
    if let Some(value) = first_fenced_json(s) {
        return Some(value);
    }

    // Third try: the whole string is a JSON object or array
    if let Some(value) = parse_structured(s.trim()) {
        return Some(value);
    }

    // Fourth try: first balanced object; bare brackets in prose are not blocks
    balanced_object(s)
}

/// Only objects and arrays count as blocks; scalars are prose
fn parse_structured(body: &str) -> Option<Value> {
    serde_json::from_str::<Value>(body)
        .ok()
        .filter(|value| value.is_object() || value.is_array())
}

fn first_fenced_json(s: &str) -> Option<Value> {
    fence_regex()
        .captures_iter(s)
        .find_map(|cap| parse_structured(cap.get(1)?.as_str().trim()))
}

fn balanced_object(s: &str) -> Option<Value> {
    let start = s.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let candidate = &s[start..start + i + c.len_utf8()];
                    return parse_structured(candidate);
                }
            }
            _ => {}
        }
    }

    None
}
