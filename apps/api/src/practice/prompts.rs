// Prompt text for the single-shot practice features. Placeholders in braces
// are substituted with `str::replace` by the calling function.

pub const RESUME_QUESTION: &str = "\
You are a senior hiring manager for a top tech company like Google or Microsoft. You are interviewing a candidate. Their resume is provided below.
Ask one insightful, specific question based directly on their resume. The question should probe their experience on a specific project, skill, or role mentioned.
Do not ask a generic question (e.g., \"What was your favorite project?\"). Ask a \"why\" or \"how\" question.

Example: \"I see on your resume you used 'React' for the 'E-commerce Dashboard' project. What was the most difficult challenge you faced with state management on that project, and how did you solve it?\"

THEIR RESUME:
---
{resume_text}
---

Ask one resume-based question:";

pub const TOPIC_QUESTION: &str = "\
You are a hiring manager for a top tech company. Ask one challenging, high-quality interview question for the following topic: \"{topic}\".
The question should be concise and behavioral or technical, depending on the topic.

- If the topic is 'Behavioral', ask a question like \"Tell me about a time you had a conflict with a teammate and how you resolved it.\"
- If the topic is technical (e.g., 'Python', 'Data Structures'), ask a conceptual question like \"How does Python's Global Interpreter Lock (GIL) affect multi-threaded performance?\"

Do not ask to write code. Ask only one question.

Question:";

pub const ANSWER_FEEDBACK: &str = "\
## Role: AI Interview Coach (STAR Method Specialist)
## Task: Provide feedback on a user's answer to an interview question.
{output_format}

**Question:**
{question}

**User's Answer:**
\"{answer}\"

---
### **Analysis:**

#### 1. Content & Structure (STAR Method)
- **Situation:** Did they set the context?
- **Task:** Did they explain their role or task?
- **Action:** Did they detail the steps *they* took?
- **Result:** Did they describe the outcome and what they learned?

#### 2. Communication & Delivery
- **Audio Analysis:**
{audio_summary}
- **Expression Analysis:**
{expression_summary}

---
### **Feedback:**

**1. STAR Feedback (Content & Structure):**
[Provide a 2-3 sentence analysis of how well they used the STAR method. Be specific. If they missed a part, say so.]

**2. Delivery & Confidence:**
[Provide 1-2 sentences on their delivery, using the audio and expression analysis.]

**3. \"Better Answer\" Example:**
[Provide a concise, strong example answer that follows the STAR method for the original question. Make it a general example, not a rewrite of their answer.]";

pub const COMMUNICATION_TOPIC: &str = "\
Generate one, single, simple, general-purpose topic for a 1-minute communication assessment.
{json_instruction}
Return the response as a JSON object with one key: \"topic\".

Example of a valid response:
```json
{\"topic\": \"What is a skill you would like to learn and why?\"}
```";

pub const COMMUNICATION_FEEDBACK: &str = "\
## Role: AI Communication Coach
## Task: Provide feedback on a user's 1-minute speech.
{output_format}

**Topic:**
{topic}

**User's Speech:**
\"{answer}\"

---
### **Analysis:**

#### 1. Content & Structure
- Did they address the topic?
- Was the speech structured (e.g., intro, body, conclusion)?

#### 2. Communication & Delivery
- **Audio Analysis:**
{audio_summary}
- **Expression Analysis:**
{expression_summary}

---
### **Feedback:**

**1. Clarity & Structure:**
[Provide 2-3 sentences on their content.]

**2. Delivery & Engagement:**
[Provide 1-2 sentences on their delivery, using audio/expression analysis.]";

pub const APTITUDE_MIX: &str = "from a mix of Quantitative, Logical, and Verbal topics.";

pub const APTITUDE_QUESTION: &str = "\
Generate one medium-difficulty aptitude question {topic_instruction}

{json_instruction}

The JSON must contain these exact keys: \"question\", \"options\", \"correct_answer\", \"solution\".
- \"options\" must be a list of 4 strings.
- \"solution\" must be a string, using \\n for newlines.

Example of a valid response:
```json
{
  \"question\": \"If a train travels 60 km in 1 hour and 15 minutes, what is its speed in km/hour?\",
  \"options\": [\"A) 45 km/hr\", \"B) 48 km/hr\", \"C) 50 km/hr\", \"D) 52 km/hr\"],
  \"correct_answer\": \"B) 48 km/hr\",
  \"solution\": \"Step 1: Convert time to hours. 1 hour 15 minutes = 1.25 hours.\\nStep 2: Speed = Distance / Time = 60 / 1.25 = 48 km/hr.\"
}
```";

pub const APTITUDE_FEEDBACK: &str = "\
You are an expert aptitude test coach. A user has just completed a practice session.
Their results are provided in this JSON list:
{results_json}

Please provide a concise feedback report in Markdown.
1.  Start with an \"Overall Summary\" (e.g., \"You answered X out of Y questions correctly.\").
2.  Identify their \"Strongest Topic\" (the topic with the most correct answers).
3.  Identify the \"Weakest Topic\" (the topic with the most incorrect answers).
4.  Give one \"Key Takeaway\" or piece of advice.

Keep the feedback encouraging and brief.";

pub const DSA_MIX_TOPIC: &str = "Mix (DSA)";
pub const DSA_MIX: &str =
    "from a mix of DSA topics (Arrays, Strings, Linked Lists, Trees, Graphs, Sorting, or Searching).";

pub const TECHNICAL_QUESTION: &str = "\
Generate one medium-difficulty technical coding problem {topic_instruction} for {language_name}.
{json_instruction}

Your JSON object must contain these exact keys:
- \"question_title\": A short title.
- \"problem_statement\": A 2-3 sentence description of the task. Use \\n for newlines.
- \"starter_code\": An EMPTY boilerplate template for the user to fill in.
- \"test_cases\": A list of 3 simple test cases. **Each test case MUST be an object with two keys: \"stdin\" (the input string) and \"expected_output\" (the expected output string).**
- \"model_solution\": The complete, correct, and optimal code solution.

Example of a valid, multi-line JSON response:
```json
{example}
```";

pub const PYTHON_EXAMPLE: &str = r#"{
  "question_title": "Sum Two Numbers",
  "problem_statement": "Read two numbers from stdin and print their sum.",
  "starter_code": "def solve():\n    pass\n\nsolve()",
  "test_cases": [{"stdin": "5\n10", "expected_output": "15"}, {"stdin": "1\n2", "expected_output": "3"}],
  "model_solution": "def solve():\n    a = int(input())\n    b = int(input())\n    print(a + b)\n\nsolve()"
}"#;

pub const JAVA_EXAMPLE: &str = r#"{
  "question_title": "Sum Two Numbers",
  "problem_statement": "Read two integers from stdin and print their sum.",
  "starter_code": "import java.util.Scanner;\n\nclass Solution {\n    public static void main(String[] args) {\n    }\n}",
  "test_cases": [{"stdin": "5\n10", "expected_output": "15"}, {"stdin": "1\n2", "expected_output": "3"}],
  "model_solution": "import java.util.Scanner;\n\nclass Solution {\n    public static void main(String[] args) {\n        Scanner sc = new Scanner(System.in);\n        int a = sc.nextInt();\n        int b = sc.nextInt();\n        System.out.println(a + b);\n    }\n}"
}"#;

pub const MOCK_TEST_REPORT: &str = "\
You are 'Prepmate', an AI career coach.
A user has just completed a full mock test. Their results from all rounds are provided below in JSON format.

Your task is to generate a comprehensive, professional, and encouraging final report in **Markdown format**.

The report MUST have the following structure:
1.  **Overall Summary:** A brief, high-level overview of their performance.
2.  **Round-by-Round Breakdown:**
    * **Aptitude Test:** Analyze their `aptitude` results. Calculate their score (e.g., \"15/20 Correct\"). Identify strong and weak topics.
    * **Communication Test:** Analyze the feedback from the `communication` section. Summarize the feedback on their pace, clarity, and confidence.
    * **Coding Test:** Analyze their `coding` results. Comment on which questions they passed, failed, or left incomplete.
    * **Live Interview:** Analyze the `interview` conversation history (a list of 'ai' and 'user' messages). Give feedback on their answer quality, structure (like STAR method), and conciseness.
3.  **Key Strengths:** 2-3 bullet points highlighting what they did well across all rounds.
4.  **Top Areas for Improvement:** 2-3 specific, actionable bullet points on what to focus on next.
5.  **Final Encouragement:** A concluding sentence to motivate them.

Here are the user's test results:
```json
{results_json}
```

Generate the report. Start with \"Here is your comprehensive mock test report:\"";
