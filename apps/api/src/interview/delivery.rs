//! Delivery analysis of a transcribed spoken answer: speaking pace and filler
//! words. Deterministic and computed fresh per request; the rendered lines are
//! interpolated into the coaching and report prompts.

use serde::{Deserialize, Serialize};

/// Below this rate the pace is reported as slow.
pub const SLOW_WPM_THRESHOLD: u32 = 120;
/// Above this rate the pace is reported as fast.
pub const FAST_WPM_THRESHOLD: u32 = 160;

/// Single-token fillers. "you know" is matched separately as a token pair.
const FILLER_WORDS: &[&str] = &["um", "uh", "like", "so", "basically", "actually"];

pub const NO_AUDIO_ANALYSIS: &str = "No audio analysis was performed.";
pub const NO_EXPRESSION_DATA: &str = "No facial expression data was provided.";
pub const EXPRESSION_DATA_UNREADABLE: &str =
    "Note: Facial data was received but could not be processed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pace {
    Slow,
    Good,
    Fast,
    Unavailable,
}

impl Pace {
    fn from_wpm(wpm: u32) -> Self {
        if wpm < SLOW_WPM_THRESHOLD {
            Pace::Slow
        } else if wpm > FAST_WPM_THRESHOLD {
            Pace::Fast
        } else {
            Pace::Good
        }
    }

    fn advice(self) -> &'static str {
        match self {
            Pace::Slow => "A bit slow. Try to speak more fluently.",
            Pace::Fast => "A bit fast. Remember to pause for emphasis.",
            Pace::Good => "Good",
            Pace::Unavailable => "Pace analysis is unavailable.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliverySummary {
    pub word_count: usize,
    /// `None` when the spoken duration is unknown.
    pub words_per_minute: Option<u32>,
    pub pace: Pace,
    pub filler_count: usize,
}

impl DeliverySummary {
    /// Pace line and filler line, in the Markdown shape the prompts expect.
    pub fn to_prompt_lines(&self) -> String {
        let pace_line = match self.words_per_minute {
            Some(wpm) => format!(
                "- **Pace:** {wpm} WPM (Words Per Minute). ({})",
                self.pace.advice()
            ),
            None => format!("- **Pace:** {}", Pace::Unavailable.advice()),
        };
        format!(
            "{pace_line}\n- **Filler Words:** Found {} filler words (e.g., 'um', 'like', 'so').",
            self.filler_count
        )
    }
}

/// Analyzes an answer given its spoken duration in seconds.
/// A non-positive or non-finite duration reports the pace as unavailable.
pub fn analyze(answer_text: &str, duration_seconds: f64) -> DeliverySummary {
    let tokens: Vec<String> = answer_text.split_whitespace().map(normalize_token).collect();
    let word_count = tokens.len();

    let words_per_minute = (duration_seconds.is_finite() && duration_seconds > 0.0)
        .then(|| (word_count as f64 * 60.0 / duration_seconds).floor() as u32);
    let pace = words_per_minute.map_or(Pace::Unavailable, Pace::from_wpm);

    DeliverySummary {
        word_count,
        words_per_minute,
        pace,
        filler_count: count_fillers(&tokens),
    }
}

/// Prompt block for an optional answer; absent answers get a fixed note.
pub fn audio_summary(summary: Option<&DeliverySummary>) -> String {
    summary
        .map(DeliverySummary::to_prompt_lines)
        .unwrap_or_else(|| NO_AUDIO_ANALYSIS.to_string())
}

fn normalize_token(token: &str) -> String {
    token.to_lowercase().trim_matches(|c| c == ',' || c == '.').to_string()
}

fn count_fillers(tokens: &[String]) -> usize {
    let singles = tokens
        .iter()
        .filter(|t| FILLER_WORDS.contains(&t.as_str()))
        .count();
    let you_know = tokens
        .windows(2)
        .filter(|pair| pair[0] == "you" && pair[1] == "know")
        .count();
    singles + you_know
}

/// Summarizes the client's per-frame facial expression labels (a JSON list of
/// strings) as percentage lines in first-seen order.
pub fn summarize_expressions(expressions_json: Option<&str>) -> String {
    let raw = match expressions_json.map(str::trim) {
        Some(raw) if !raw.is_empty() && raw != "[]" => raw,
        _ => return NO_EXPRESSION_DATA.to_string(),
    };

    let labels: Vec<String> = match serde_json::from_str(raw) {
        Ok(labels) => labels,
        Err(e) => {
            tracing::warn!("Error processing expressions: {e}");
            return EXPRESSION_DATA_UNREADABLE.to_string();
        }
    };
    if labels.is_empty() {
        return NO_EXPRESSION_DATA.to_string();
    }

    let mut counts: Vec<(&str, usize)> = Vec::new();
    for label in &labels {
        match counts.iter_mut().find(|(l, _)| *l == label.as_str()) {
            Some((_, count)) => *count += 1,
            None => counts.push((label.as_str(), 1)),
        }
    }

    let total = labels.len() as f64;
    counts
        .iter()
        .map(|(label, count)| format!("- {label}: {:.0}%", *count as f64 / total * 100.0))
        .collect::<Vec<_>>()
        .join("\n")
}
