//! Interview variants as data. Every scripted flow shares one control flow in
//! `conversation::advance`; a variant only contributes its step table, its
//! context requirement and its closing-report wording.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::interview::delivery::audio_summary;
use crate::interview::models::InterviewContext;
use crate::interview::prompts::*;
use crate::llm_client::prompts::{fill_template, INTERVIEWER_PERSONA, MARKDOWN_REPORT_HEADER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewVariant {
    General,
    Managerial,
    Hr,
    #[serde(alias = "resume-based", alias = "resume")]
    ResumeBased,
}

/// What a step asks the model to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepInstruction {
    /// A new main question on a not-yet-covered facet.
    Main(&'static str),
    /// A follow-up grounded in the immediately preceding user answer.
    FollowUp(&'static str),
}

impl StepInstruction {
    pub fn template(self) -> &'static str {
        match self {
            StepInstruction::Main(t) | StepInstruction::FollowUp(t) => t,
        }
    }
}

/// Extra per-request input a variant cannot run without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextRequirement {
    None,
    Topic,
    Resume,
}

#[derive(Debug)]
pub struct ReportGuidance {
    pub task: &'static str,
    pub overall: &'static str,
    pub strengths: &'static str,
    pub improvements: &'static str,
}

#[derive(Debug)]
pub struct VariantConfig {
    pub steps: &'static [StepInstruction],
    pub requirement: ContextRequirement,
    pub closing_notice: &'static str,
    pub report: ReportGuidance,
}

static GENERAL: VariantConfig = VariantConfig {
    steps: &[StepInstruction::Main(GENERAL_QUESTION)],
    requirement: ContextRequirement::Topic,
    closing_notice: "Thanks for your answer. Generating your feedback...",
    report: ReportGuidance {
        task: "single-question practice interview",
        overall: "Provide 2-3 sentences on the quality, relevance and structure of their answer.",
        strengths: "List 1-2 key strengths, e.g., \"Directly addressed the question.\"",
        improvements: "List 1-2 specific, actionable areas for improvement, e.g., \"Use the STAR method to structure the story.\"",
    },
};

static MANAGERIAL: VariantConfig = VariantConfig {
    steps: &[
        StepInstruction::Main(MANAGERIAL_FIRST),
        StepInstruction::FollowUp(FOLLOW_UP),
        StepInstruction::Main(MANAGERIAL_SECOND),
        StepInstruction::FollowUp(FOLLOW_UP),
    ],
    requirement: ContextRequirement::None,
    closing_notice: "This concludes the managerial round. Generating your final debrief...",
    report: ReportGuidance {
        task: "4-question managerial interview",
        overall: "Provide 2-3 sentences on their overall performance. Comment on their ability to handle follow-up questions and their use of examples.",
        strengths: "List 1-2 key strengths, e.g., \"Good use of the STAR method,\" \"Clear communication.\"",
        improvements: "List 1-2 specific, actionable areas for improvement, e.g., \"Try to provide more detail on the 'Result' of your stories,\" \"Answers could be more concise.\"",
    },
};

static HR: VariantConfig = VariantConfig {
    steps: &[
        StepInstruction::Main(HR_FIRST),
        StepInstruction::FollowUp(FOLLOW_UP),
        StepInstruction::Main(HR_SECOND),
        StepInstruction::FollowUp(FOLLOW_UP),
    ],
    requirement: ContextRequirement::None,
    closing_notice: "This concludes the HR interview. Generating your final debrief...",
    report: ReportGuidance {
        task: "4-question HR interview",
        overall: "Provide 2-3 sentences on their overall performance. Comment on their personality, clarity, and how well they articulated their motivations.",
        strengths: "List 1-2 key strengths, e.g., \"Appeared positive and enthusiastic,\" \"Clearly explained their motivations.\"",
        improvements: "List 1-2 specific, actionable areas for improvement, e.g., \"Try to provide more specific examples to back up your claims,\" \"Connect your 5-year plan more directly to this role.\"",
    },
};

static RESUME_BASED: VariantConfig = VariantConfig {
    steps: &[
        StepInstruction::Main(RESUME_FIRST),
        StepInstruction::FollowUp(RESUME_FOLLOW_UP),
        StepInstruction::Main(RESUME_SECOND),
        StepInstruction::FollowUp(FOLLOW_UP),
        StepInstruction::Main(RESUME_THIRD),
        StepInstruction::FollowUp(RESUME_FINAL_FOLLOW_UP),
    ],
    requirement: ContextRequirement::Resume,
    closing_notice: "This concludes the Resume-Based interview. Generating your final debrief...",
    report: ReportGuidance {
        task: "6-question resume-based interview",
        overall: "Provide 2-3 sentences on their overall performance. Comment on how well they discussed their resume projects and experiences.",
        strengths: "List 1-2 key strengths, e.g., \"Detailed explanations of resume projects,\" \"Confidently handled follow-up questions.\"",
        improvements: "List 1-2 specific, actionable areas for improvement, e.g., \"Try to quantify the results of your projects more (e.g., 'improved performance by 20%').\"",
    },
};

impl InterviewVariant {
    pub fn config(self) -> &'static VariantConfig {
        match self {
            InterviewVariant::General => &GENERAL,
            InterviewVariant::Managerial => &MANAGERIAL,
            InterviewVariant::Hr => &HR,
            InterviewVariant::ResumeBased => &RESUME_BASED,
        }
    }

    pub fn total_steps(self) -> usize {
        self.config().steps.len()
    }
}

impl VariantConfig {
    /// Rejects requests that lack the context this variant depends on.
    pub fn validate_context(&self, context: &InterviewContext) -> Result<(), AppError> {
        match self.requirement {
            ContextRequirement::None => Ok(()),
            ContextRequirement::Topic if non_blank(context.topic.as_deref()) => Ok(()),
            ContextRequirement::Topic => Err(AppError::Validation("Missing 'topic' field.".into())),
            ContextRequirement::Resume if non_blank(context.resume_text.as_deref()) => Ok(()),
            ContextRequirement::Resume => Err(AppError::Validation("Missing resume text.".into())),
        }
    }

    /// Instruction for a scripted step.
    pub fn render_step(&self, step: StepInstruction, context: &InterviewContext) -> String {
        let topic = context.topic.as_deref().unwrap_or_default().trim();
        let body = fill_template(step.template(), &[("topic", topic)]);
        self.with_context(format!("{INTERVIEWER_PERSONA} {body}"), context)
    }

    /// Instruction for a caller-supplied one-step override.
    pub fn render_override(&self, custom: &str, context: &InterviewContext) -> String {
        match self.requirement {
            ContextRequirement::Resume => self.with_context(
                format!("{INTERVIEWER_PERSONA} The user's resume is below. {custom}"),
                context,
            ),
            _ => format!("{INTERVIEWER_PERSONA} {custom}"),
        }
    }

    /// Closing-report prompt over the full transcript.
    pub fn render_report(&self, transcript: &str, context: &InterviewContext) -> String {
        let delivery = match &context.delivery {
            Some(summary) => format!(
                "\n**Delivery of the final answer:**\n{}\n",
                audio_summary(Some(summary))
            ),
            None => String::new(),
        };
        fill_template(
            REPORT_PROMPT_TEMPLATE,
            &[
                ("task", self.report.task),
                ("output_format", MARKDOWN_REPORT_HEADER),
                ("transcript", transcript),
                ("delivery", &delivery),
                ("overall_hint", self.report.overall),
                ("strengths_hint", self.report.strengths),
                ("improvements_hint", self.report.improvements),
            ],
        )
    }

    fn with_context(&self, instruction: String, context: &InterviewContext) -> String {
        match (self.requirement, context.resume_text.as_deref()) {
            (ContextRequirement::Resume, Some(resume)) => format!(
                "{instruction}\n\n{}",
                fill_template(RESUME_CONTEXT_TEMPLATE, &[("resume_text", resume.trim())])
            ),
            _ => instruction,
        }
    }
}

fn non_blank(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resume_context() -> InterviewContext {
        InterviewContext {
            resume_text: Some("Built a React dashboard at Acme.".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_total_steps_per_variant() {
        assert_eq!(InterviewVariant::General.total_steps(), 1);
        assert_eq!(InterviewVariant::Managerial.total_steps(), 4);
        assert_eq!(InterviewVariant::Hr.total_steps(), 4);
        assert_eq!(InterviewVariant::ResumeBased.total_steps(), 6);
    }

    #[test]
    fn test_follow_ups_sit_at_odd_steps() {
        for variant in [
            InterviewVariant::Managerial,
            InterviewVariant::Hr,
            InterviewVariant::ResumeBased,
        ] {
            for (i, step) in variant.config().steps.iter().enumerate() {
                let is_follow_up = matches!(step, StepInstruction::FollowUp(_));
                assert_eq!(is_follow_up, i % 2 == 1, "{variant:?} step {i}");
            }
        }
    }

    #[test]
    fn test_variant_path_names() {
        let v: InterviewVariant = serde_json::from_str("\"resume_based\"").unwrap();
        assert_eq!(v, InterviewVariant::ResumeBased);
        let v: InterviewVariant = serde_json::from_str("\"resume-based\"").unwrap();
        assert_eq!(v, InterviewVariant::ResumeBased);
        let v: InterviewVariant = serde_json::from_str("\"hr\"").unwrap();
        assert_eq!(v, InterviewVariant::Hr);
    }

    #[test]
    fn test_resume_steps_carry_resume_block() {
        let config = InterviewVariant::ResumeBased.config();
        for step in config.steps {
            let rendered = config.render_step(*step, &resume_context());
            assert!(rendered.starts_with(INTERVIEWER_PERSONA));
            assert!(rendered.ends_with("THE USER'S RESUME:\n---\nBuilt a React dashboard at Acme.\n---"));
        }
    }

    #[test]
    fn test_general_step_substitutes_topic() {
        let context = InterviewContext {
            topic: Some("Data Structures".into()),
            ..Default::default()
        };
        let config = InterviewVariant::General.config();
        let rendered = config.render_step(config.steps[0], &context);
        assert!(rendered.contains("\"Data Structures\""));
        assert!(!rendered.contains("{topic}"));
    }

    #[test]
    fn test_override_rendering() {
        let hr = InterviewVariant::Hr.config();
        assert_eq!(
            hr.render_override("Start with 'Tell me about yourself.'", &InterviewContext::default()),
            format!("{INTERVIEWER_PERSONA} Start with 'Tell me about yourself.'")
        );

        let resume = InterviewVariant::ResumeBased.config();
        let rendered = resume.render_override("Ask about my resume.", &resume_context());
        assert!(rendered.contains("The user's resume is below. Ask about my resume."));
        assert!(rendered.contains("THE USER'S RESUME:"));
    }

    #[test]
    fn test_validate_context() {
        let empty = InterviewContext::default();
        assert!(InterviewVariant::Hr.config().validate_context(&empty).is_ok());
        assert!(matches!(
            InterviewVariant::ResumeBased.config().validate_context(&empty),
            Err(AppError::Validation(_))
        ));
        let blank_topic = InterviewContext {
            topic: Some("   ".into()),
            ..Default::default()
        };
        assert!(InterviewVariant::General
            .config()
            .validate_context(&blank_topic)
            .is_err());
    }

    #[test]
    fn test_report_prompt_has_fixed_sections() {
        let prompt = InterviewVariant::Managerial
            .config()
            .render_report("ai: Q1\nuser: A1", &InterviewContext::default());
        assert!(prompt.contains("4-question managerial interview"));
        assert!(prompt.contains("**1. Overall Performance:**"));
        assert!(prompt.contains("**2. Strengths:**"));
        assert!(prompt.contains("**3. Areas for Improvement:**"));
        assert!(prompt.contains("ai: Q1\nuser: A1"));
        assert!(!prompt.contains("Delivery of the final answer"));
    }

    #[test]
    fn test_report_prompt_keeps_transcript_verbatim() {
        let transcript = "ai: Q1\nuser: I wrote {strengths_hint} in my notes";
        let config = InterviewVariant::Managerial.config();
        let prompt = config.render_report(transcript, &InterviewContext::default());

        assert!(prompt.contains(transcript));
        assert_eq!(prompt.matches(config.report.strengths).count(), 1);
    }
}
