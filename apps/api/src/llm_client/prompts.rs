// Shared prompt fragments. Each feature module keeps its own prompts.rs;
// this file holds the persona and output-format rules they all reuse, and
// the placeholder filler that renders every template.

/// Persona preamble for every interviewer turn.
pub const INTERVIEWER_PERSONA: &str = "You are Prepmate, an AI interview architect.";

/// Appended to prompts whose reply is parsed as JSON.
pub const JSON_REPLY_INSTRUCTION: &str = "\
    Your response **MUST** be a JSON object inside a markdown code block. \
    **DO NOT** use LaTeX. Use plain text for math (e.g., 'x^2', '3/4').";

/// Header shared by the Markdown coaching reports.
pub const MARKDOWN_REPORT_HEADER: &str = "## Output Format: Markdown";

/// Fills `{name}` placeholders in one left-to-right pass.
///
/// Substituted values are never rescanned, so client text that happens to
/// contain `{answer}` or similar reaches the model unchanged. Braces that do
/// not name a known placeholder are copied through.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let value = tail.find('}').and_then(|close| {
            let name = &tail[1..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_replaces_every_occurrence() {
        let filled = fill_template("{a} and {b}, then {a}", &[("a", "x"), ("b", "y")]);
        assert_eq!(filled, "x and y, then x");
    }

    #[test]
    fn test_fill_template_leaves_unknown_braces() {
        let filled = fill_template(r#"Reply {"topic": "..."} for {topic}"#, &[("topic", "Rust")]);
        assert_eq!(filled, r#"Reply {"topic": "..."} for Rust"#);
        assert_eq!(fill_template("dangling { brace", &[("x", "y")]), "dangling { brace");
    }

    #[test]
    fn test_fill_template_does_not_rescan_values() {
        let filled = fill_template(
            "Q: {question}\nA: {answer}",
            &[("question", "What does {answer} mean?"), ("answer", "SECRET")],
        );
        assert_eq!(filled, "Q: What does {answer} mean?\nA: SECRET");
    }
}
