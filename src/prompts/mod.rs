//! Prompt assembly for the tutor
//!
//! Builds the ordered message list sent to the completion gateway: the fixed
//! system instruction, the replayed conversation history, and a closing
//! task-decomposition instruction built from the latest user message.

pub mod tutor_prompt;

use crate::chat::formatter::to_plain;
use crate::chat::{Conversation, Sender};
use crate::error::{Result, TutorError};
use crate::providers::Message;

/// Builds the message list for a conversation, replaying every turn
///
/// User turns are replayed verbatim; assistant turns have their presentation
/// markup stripped first. The final message restates the text of the last
/// turn, which callers guarantee is the user input just appended.
///
/// # Errors
///
/// Returns [`TutorError::EmptyConversation`] if the conversation has no turns
///
/// # Examples
///
/// ```
/// use tutorchat::chat::Conversation;
/// use tutorchat::prompts::{build_messages, tutor_prompt::SYSTEM_PROMPT};
///
/// let mut conversation = Conversation::new();
/// conversation.push_user("What is gravity?");
///
/// let messages = build_messages(&conversation).unwrap();
/// assert_eq!(messages[0].content, SYSTEM_PROMPT);
/// assert!(messages.last().unwrap().content.contains("What is gravity?"));
/// ```
pub fn build_messages(conversation: &Conversation) -> Result<Vec<Message>> {
    build_messages_with_window(conversation, None)
}

/// Builds the message list, replaying at most `max_history_turns` recent turns
///
/// The closing instruction is always built from the final turn, whether or
/// not older turns were left out of the replay.
///
/// # Errors
///
/// Returns [`TutorError::EmptyConversation`] if the conversation has no turns
pub fn build_messages_with_window(
    conversation: &Conversation,
    max_history_turns: Option<usize>,
) -> Result<Vec<Message>> {
    let last_turn = conversation.last().ok_or(TutorError::EmptyConversation)?;

    let history = match max_history_turns {
        Some(n) => conversation.recent(n),
        None => conversation.turns(),
    };

    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(tutor_prompt::SYSTEM_PROMPT));

    for turn in history {
        match turn.sender() {
            Sender::User => messages.push(Message::user(turn.text())),
            Sender::Assistant => messages.push(Message::assistant(to_plain(turn.text()))),
        }
    }

    messages.push(Message::user(tutor_prompt::generate_task_instruction(
        last_turn.text(),
    )));

    tracing::debug!(
        "Assembled prompt: {} messages ({} of {} turns replayed)",
        messages.len(),
        history.len(),
        conversation.len()
    );

    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_question_layout() {
        let mut conversation = Conversation::new();
        conversation.push_user("What is gravity?");

        let messages = build_messages(&conversation).unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], Message::system(tutor_prompt::SYSTEM_PROMPT));
        assert_eq!(messages[1], Message::user("What is gravity?"));

        let last = messages.last().unwrap();
        assert_eq!(last.role, "user");
        assert!(last.content.contains("What is gravity?"));
        assert!(last.content.contains("Final Summary"));
    }

    #[test]
    fn test_assistant_turns_replayed_as_plain_text() {
        let mut conversation = Conversation::new();
        conversation.push_user("Explain osmosis?");
        conversation.push_assistant("<strong>Osmosis</strong> is diffusion of water");
        conversation.push_user("And diffusion?");

        let messages = build_messages(&conversation).unwrap();
        assert_eq!(messages.len(), 5);
        assert_eq!(
            messages[2],
            Message::assistant("Osmosis is diffusion of water")
        );
        assert_eq!(messages[3], Message::user("And diffusion?"));
        assert!(messages[4].content.contains("\"And diffusion?\""));
    }

    #[test]
    fn test_user_turns_are_not_stripped() {
        let mut conversation = Conversation::new();
        conversation.push_user("Is <b> a tag?");

        let messages = build_messages(&conversation).unwrap();
        assert_eq!(messages[1].content, "Is <b> a tag?");
    }

    #[test]
    fn test_empty_conversation_is_error() {
        let err = build_messages(&Conversation::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TutorError>(),
            Some(TutorError::EmptyConversation)
        ));
    }

    #[test]
    fn test_history_window_limits_replay() {
        let mut conversation = Conversation::new();
        conversation.push_user("first?");
        conversation.push_assistant("one");
        conversation.push_user("second?");
        conversation.push_assistant("two");
        conversation.push_user("third?");

        let messages = build_messages_with_window(&conversation, Some(1)).unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1], Message::user("third?"));
        assert!(messages[2].content.contains("third?"));

        let all = build_messages_with_window(&conversation, None).unwrap();
        assert_eq!(all.len(), 7);
    }
}
