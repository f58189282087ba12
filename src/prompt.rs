//! `{{NAME}}` placeholder rendering for the prompt templates

/// Substitute every `{{NAME}}` in one pass over the template.
///
/// Inserted values are never rescanned, so document or model text that
/// happens to contain `{{SUMMARY}}` stays literal. Unknown placeholders are
/// left as they are.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after[..end];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_placeholders() {
        let out = render(
            "Request: {{QUERY}}\nFile: {{FILE}}\n{{QUERY}}",
            &[("QUERY", "move core time"), ("FILE", "a.txt")],
        );
        assert_eq!(out, "Request: move core time\nFile: a.txt\nmove core time");
    }

    #[test]
    fn test_inserted_values_are_not_rescanned() {
        let out = render(
            "{{REGULATIONS}}\n---\n{{SUMMARY}}",
            &[
                ("REGULATIONS", "text mentioning {{SUMMARY}}"),
                ("SUMMARY", "data\n└── a.txt"),
            ],
        );
        assert_eq!(out, "text mentioning {{SUMMARY}}\n---\ndata\n└── a.txt");
    }

    #[test]
    fn test_unknown_and_unclosed_placeholders_kept() {
        assert_eq!(render("{{OTHER}} and {{", &[("X", "y")]), "{{OTHER}} and {{");
    }
}
