// Prompt text for the scripted interview flows. Step templates are rendered by
// `variants::render_step`; `{topic}` is substituted for the general flow.

pub const FOLLOW_UP: &str =
    "Ask one, smart, relevant follow-up question based *only* on the user's last answer.";

pub const GENERAL_QUESTION: &str = "\
    Ask one challenging, high-quality interview question for the following topic: \"{topic}\". \
    The question should be concise and behavioral or technical, depending on the topic. \
    Do not ask to write code. Ask only one question.";

pub const MANAGERIAL_FIRST: &str = "Ask your first managerial question \
    (e.g., 'Tell me about a time you had to lead a project.').";
pub const MANAGERIAL_SECOND: &str = "Ask your *second* main managerial question \
    (e.g., 'Describe a situation where you had a conflict with a coworker.').";

pub const HR_FIRST: &str = "Ask your first HR personal interview question \
    (e.g., 'Tell me about yourself' or 'What is your greatest strength?').";
pub const HR_SECOND: &str = "Ask your *second* main HR question \
    (e.g., 'Why do you want to work for this company?' or 'Where do you see yourself in 5 years?').";

pub const RESUME_FIRST: &str =
    "Ask your first question based *only* on a specific project, skill, or experience from their resume.";
pub const RESUME_FOLLOW_UP: &str =
    "Ask one, smart, relevant follow-up question based *only* on the user's last answer and their resume.";
pub const RESUME_SECOND: &str =
    "Ask your *second* main question, based on a *different* part of their resume.";
pub const RESUME_THIRD: &str = "Ask your *third* main question, based on yet another part of their resume \
    (e.g., education or skills section).";
pub const RESUME_FINAL_FOLLOW_UP: &str =
    "Ask one final, smart follow-up question based *only* on the user's last answer.";

/// Shown to the candidate when the model returns nothing for a question turn.
pub const QUESTION_FALLBACK: &str =
    "I'm sorry, I seem to have lost my train of thought. Could you please repeat your last answer?";

/// Stands in for the closing report when the model returns nothing.
pub const REPORT_FALLBACK: &str =
    "Sorry, the AI failed to generate your final report. Please try again.";

pub const RESUME_CONTEXT_TEMPLATE: &str = "THE USER'S RESUME:\n---\n{resume_text}\n---";

pub const REPORT_PROMPT_TEMPLATE: &str = "\
## Role: AI Interview Coach
## Task: Provide a final debrief for a {task}.
{output_format}

**Interview Transcript:**
{transcript}
{delivery}
---
### **Final Debrief:**

**1. Overall Performance:**
[{overall_hint}]

**2. Strengths:**
- [{strengths_hint}]

**3. Areas for Improvement:**
- [{improvements_hint}]
";
