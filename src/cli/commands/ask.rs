//! Implementation of the `docrag ask` command.

use anyhow::{bail, Result};
use clap::Args;
use futures::future::join_all;
use serde::Serialize;

use super::build_engine;
use crate::cli::output::table::TableFormatter;
use crate::cli::output::{output, CommandOutput};
use crate::domain::errors::RagError;
use crate::domain::models::{AnswerResult, AnswerStatus, Config};

#[derive(Args, Debug)]
pub struct AskArgs {
    /// Questions to answer; several run concurrently
    #[arg(required = true)]
    pub questions: Vec<String>,

    /// Show backend errors instead of the fallback response
    #[arg(long)]
    pub diagnostic: bool,

    /// List the chunks each answer was drawn from
    #[arg(long)]
    pub show_sources: bool,
}

#[derive(Debug, Serialize)]
pub struct QuestionAnswer {
    pub question: String,
    #[serde(flatten)]
    pub answer: AnswerResult,
}

#[derive(Debug, Serialize)]
pub struct AskOutput {
    pub answers: Vec<QuestionAnswer>,
    #[serde(skip)]
    pub show_sources: bool,
}

impl CommandOutput for AskOutput {
    fn to_human(&self) -> String {
        let formatter = TableFormatter::new();
        let multiple = self.answers.len() > 1;
        let mut blocks = Vec::with_capacity(self.answers.len());

        for qa in &self.answers {
            let mut lines = Vec::new();
            if multiple {
                lines.push(format!("{}", console::style(format!("Q: {}", qa.question)).bold()));
            }
            lines.push(qa.answer.text.clone());

            if let AnswerStatus::Fallback(reason) = &qa.answer.status {
                lines.push(format!("{}", console::style(format!("({reason})")).dim()));
            }
            if self.show_sources && !qa.answer.sources.is_empty() {
                lines.push(formatter.format_sources(&qa.answer.sources));
            }
            blocks.push(lines.join("\n"));
        }

        blocks.join("\n\n")
    }

    fn to_json(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if !self.show_sources {
            if let Some(answers) = value.get_mut("answers").and_then(|a| a.as_array_mut()) {
                for answer in answers {
                    if let Some(obj) = answer.as_object_mut() {
                        obj.remove("sources");
                    }
                }
            }
        }
        value
    }
}

pub async fn execute(args: AskArgs, mut config: Config, json_mode: bool) -> Result<()> {
    if args.questions.iter().any(|q| q.trim().is_empty()) {
        bail!(RagError::InvalidQuery("questions cannot be empty".to_string()));
    }

    if args.diagnostic {
        config.generation.diagnostic = true;
    }

    let engine = build_engine(config, json_mode).await?;

    let results = join_all(args.questions.iter().map(|q| engine.ask_question(q))).await;

    let mut answers = Vec::with_capacity(results.len());
    for (question, result) in args.questions.into_iter().zip(results) {
        answers.push(QuestionAnswer {
            question,
            answer: result?,
        });
    }

    output(
        &AskOutput {
            answers,
            show_sources: args.show_sources,
        },
        json_mode,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{FallbackReason, SourceReference};

    fn sample_output(show_sources: bool) -> AskOutput {
        let source = SourceReference {
            source: "manual.txt".into(),
            position: 0,
            similarity: 0.82,
            excerpt: "The device powers on via the side button.".into(),
        };
        AskOutput {
            answers: vec![
                QuestionAnswer {
                    question: "How do I turn on the device?".into(),
                    answer: AnswerResult::answered("Press the side button.", vec![source]),
                },
                QuestionAnswer {
                    question: "What is the capital of France?".into(),
                    answer: AnswerResult::fallback(
                        "No relevant information found in the knowledge base.",
                        FallbackReason::NoContext,
                        vec![],
                    ),
                },
            ],
            show_sources,
        }
    }

    #[test]
    fn test_json_output_shape() {
        let json = sample_output(false).to_json();
        let answers = json["answers"].as_array().unwrap();

        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0]["question"], "How do I turn on the device?");
        assert_eq!(answers[0]["text"], "Press the side button.");
        assert_eq!(answers[0]["status"]["status"], "answered");
        assert!(answers[0].get("sources").is_none());
        assert_eq!(answers[1]["status"]["reason"], "no_context");
    }

    #[test]
    fn test_json_output_with_sources() {
        let json = sample_output(true).to_json();
        assert_eq!(json["answers"][0]["sources"][0]["source"], "manual.txt");
    }

    #[test]
    fn test_human_output_lists_questions_and_reasons() {
        console::set_colors_enabled(false);
        let text = sample_output(false).to_human();

        assert!(text.contains("Q: How do I turn on the device?"));
        assert!(text.contains("Press the side button."));
        assert!(text.contains("(no relevant context)"));
        assert!(!text.contains("manual.txt"));
    }

    #[tokio::test]
    async fn test_blank_question_rejected_before_startup() {
        let args = AskArgs {
            questions: vec!["   ".into()],
            diagnostic: false,
            show_sources: false,
        };

        let err = execute(args, Config::default(), true).await.unwrap_err();
        assert!(err.downcast_ref::<RagError>().is_some());
    }
}
