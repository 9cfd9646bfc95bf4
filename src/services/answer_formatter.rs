//! Post-processing of generated answers
//!
//! Removes phrases that cite "the context" instead of stating the answer and
//! tidies numbered procedures.

use regex::{Captures, Regex};

use crate::domain::errors::{RagError, RagResult};

const CITATION_PHRASE: &str = r"(?:according to|based on|as (?:stated|mentioned|described) in)\s+(?:the\s+)?(?:provided\s+|given\s+|available\s+|above\s+)?(?:context|information|documents?|sources?|text)\b";

/// Rewrites raw model output into the final answer text
#[derive(Debug, Clone)]
pub struct AnswerFormatter {
    leading_citation: Regex,
    inline_citation: Regex,
    step_marker: Regex,
    step_line: Regex,
}

fn compile(pattern: &str) -> RagResult<Regex> {
    Regex::new(pattern).map_err(|e| RagError::Config(format!("invalid answer pattern: {e}")))
}

impl AnswerFormatter {
    pub fn new() -> RagResult<Self> {
        Ok(Self {
            leading_citation: compile(&format!(
                r"(?im)(^[ \t]*|[.!?][ \t]+){CITATION_PHRASE}[ \t]*[,:]?[ \t]*(\p{{Ll}})?"
            ))?,
            inline_citation: compile(&format!(r"(?i)[ \t]*,?[ \t]*{CITATION_PHRASE}"))?,
            step_marker: compile(r"(?m)^([ \t]*)(\d+)\.([^\s\d])")?,
            step_line: compile(r"^[ \t]*\d+\.[ \t]")?,
        })
    }

    /// Strip citation phrases and normalize numbered steps.
    pub fn format(&self, raw: &str) -> String {
        let text = self
            .leading_citation
            .replace_all(raw, |caps: &Captures| {
                let prefix = caps.get(1).map_or("", |m| m.as_str());
                let first = caps.get(2).map(|m| m.as_str().to_uppercase()).unwrap_or_default();
                format!("{prefix}{first}")
            });
        let text = self.inline_citation.replace_all(&text, "");
        let text = self.step_marker.replace_all(&text, "${1}${2}. ${3}");

        self.join_steps(&text).trim().to_string()
    }

    /// Drop blank lines that separate two numbered steps.
    fn join_steps(&self, text: &str) -> String {
        let lines: Vec<&str> = text.lines().collect();
        let mut kept: Vec<&str> = Vec::with_capacity(lines.len());

        for (i, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                let after_step = kept.last().is_some_and(|l| self.step_line.is_match(l));
                let before_step = lines[i + 1..]
                    .iter()
                    .find(|l| !l.trim().is_empty())
                    .is_some_and(|l| self.step_line.is_match(l));
                if after_step && before_step {
                    continue;
                }
            }
            kept.push(line);
        }

        kept.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(raw: &str) -> String {
        AnswerFormatter::new().unwrap().format(raw)
    }

    #[test]
    fn test_plain_answer_is_unchanged() {
        let answer = "The device powers on via the side button.\n\n1. Hold the side button.";
        assert_eq!(format(answer), answer);
    }

    #[test]
    fn test_leading_citation_is_removed() {
        assert_eq!(
            format("According to the context, the device powers on via the side button."),
            "The device powers on via the side button."
        );
        assert_eq!(
            format("Based on the provided information: battery life is 10 hours."),
            "Battery life is 10 hours."
        );
    }

    #[test]
    fn test_citation_after_sentence_is_removed() {
        assert_eq!(
            format("Charge it first. Based on the documents, press the button."),
            "Charge it first. Press the button."
        );
    }

    #[test]
    fn test_inline_citation_is_removed() {
        assert_eq!(
            format("Battery life is 10 hours, according to the context."),
            "Battery life is 10 hours."
        );
        assert_eq!(
            format("The button is on the side as stated in the text."),
            "The button is on the side."
        );
    }

    #[test]
    fn test_step_markers_are_spaced() {
        assert_eq!(
            format("1.Press the button\n2.Wait 1.5 seconds"),
            "1. Press the button\n2. Wait 1.5 seconds"
        );
        assert_eq!(format("1.5 hours of charge"), "1.5 hours of charge");
    }

    #[test]
    fn test_blank_lines_between_steps_are_removed() {
        let raw = "To reset:\n\n1. Hold power\n\n2. Release\n\n\n3. Wait\n\nDone.";
        assert_eq!(
            format(raw),
            "To reset:\n\n1. Hold power\n2. Release\n3. Wait\n\nDone."
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(format("\n\n  Answer.  \n"), "Answer.");
    }
}
