//! Scripted multi-turn interview.
//!
//! The client owns the history and sends it back on every request; the step
//! index is the number of interviewer (`ai`) turns already in it. Each
//! non-terminal call appends the user's answer and exactly one new `ai` turn.
//! Once the step index reaches the variant's step count, the call appends only
//! the answer and returns the closing report instead of a question.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::interview::models::{
    step_index, take_override, to_chat_messages, transcript_text, ConversationTurnResult,
    InterviewContext, Turn,
};
use crate::interview::prompts::{QUESTION_FALLBACK, REPORT_FALLBACK};
use crate::interview::variants::{InterviewVariant, VariantConfig};
use crate::llm_client::{GenerationOptions, LanguageModel};

/// Sampling temperature for interviewer questions.
const QUESTION_TEMPERATURE: f32 = 0.7;

/// Advances an interview by one step.
///
/// `new_answer` may only be absent at step 0 (the opening question). A
/// trailing `system` turn in `history` replaces this step's instruction and is
/// dropped from the returned history. Gateway failures come back as
/// `AppError::Llm`; empty generations are replaced with fixed fallback text.
pub async fn advance(
    llm: &dyn LanguageModel,
    variant: InterviewVariant,
    context: &InterviewContext,
    mut history: Vec<Turn>,
    new_answer: Option<String>,
) -> Result<ConversationTurnResult, AppError> {
    let config = variant.config();
    config.validate_context(context)?;

    let custom_override = take_override(&mut history);
    let step = step_index(&history);

    if new_answer.is_none() && step > 0 {
        return Err(AppError::Validation(format!(
            "An answer is required once the interview has started (step {step})."
        )));
    }

    if let Some(answer) = &new_answer {
        history.push(Turn::user(answer.clone()));
    }

    let instruction = match (custom_override, config.steps.get(step)) {
        (Some(custom), _) => config.render_override(&custom, context),
        (None, Some(&instruction)) => config.render_step(instruction, context),
        (None, None) => return finish(llm, variant, config, context, history, new_answer).await,
    };

    info!(
        "Interview {:?}: generating question for step {}/{}",
        variant,
        step + 1,
        variant.total_steps()
    );

    let generated = llm
        .generate(
            &to_chat_messages(&history),
            &instruction,
            GenerationOptions::with_temperature(QUESTION_TEMPERATURE),
        )
        .await?;

    let ai_response = match generated.trim() {
        "" => {
            warn!("Interview {variant:?}: model returned no question at step {step}, using fallback");
            QUESTION_FALLBACK.to_string()
        }
        text => text.to_string(),
    };

    history.push(Turn::ai(ai_response.clone()));

    Ok(ConversationTurnResult {
        ai_response,
        user_transcript: new_answer,
        updated_history: history,
        session_complete: false,
        final_report: None,
    })
}

/// Terminal branch: produce the closing report; no new `ai` turn is appended.
async fn finish(
    llm: &dyn LanguageModel,
    variant: InterviewVariant,
    config: &VariantConfig,
    context: &InterviewContext,
    history: Vec<Turn>,
    new_answer: Option<String>,
) -> Result<ConversationTurnResult, AppError> {
    info!(
        "Interview {:?} complete after {} turns, generating final report",
        variant,
        history.len()
    );

    let prompt = config.render_report(&transcript_text(&history), context);
    let report = llm
        .generate(&[], &prompt, GenerationOptions::default())
        .await?;

    let final_report = match report.trim() {
        "" => {
            warn!("Interview {variant:?}: model returned an empty final report");
            REPORT_FALLBACK.to_string()
        }
        text => text.to_string(),
    };

    Ok(ConversationTurnResult {
        ai_response: config.closing_notice.to_string(),
        user_transcript: new_answer,
        updated_history: history,
        session_complete: true,
        final_report: Some(final_report),
    })
}
