//! Tutor persona and task-decomposition instructions
//!
//! The system prompt fixes the persona and its education-only scope. The task
//! instruction is appended after the replayed history and asks the model to
//! break the latest request into numbered sub-questions ending with a summary.

/// Fixed system instruction establishing the tutor persona and scope
pub const SYSTEM_PROMPT: &str = "You are an agentic AI tutor. If the user's question is complex or goal-oriented, break it into smaller steps, answer each, and provide a summary at the end. You only answer questions related to education, learning, or knowledge.";

/// Prefix of the summary line the model is asked to finish with
pub const FINAL_SUMMARY_MARKER: &str = "✅ Final Summary:";

/// Generates the task-decomposition instruction for the latest user request
///
/// # Arguments
///
/// * `user_task` - Text of the user's most recent message, quoted verbatim
///
/// # Examples
///
/// ```
/// use tutorchat::prompts::tutor_prompt::generate_task_instruction;
///
/// let prompt = generate_task_instruction("How do vaccines work?");
/// assert!(prompt.contains("\"How do vaccines work?\""));
/// assert!(prompt.contains("Final Summary"));
/// ```
pub fn generate_task_instruction(user_task: &str) -> String {
    format!(
        r#"
Analyze the user's goal or question:
"{user_task}"

If it's complex, break it into logical sub-questions. Answer each sub-question clearly, and end with a final summary.

Use this format:
1. Sub-question 1 - Answer
2. Sub-question 2 - Answer
...
{FINAL_SUMMARY_MARKER} ...

Only proceed if this is an educational topic.
"#
    )
}
