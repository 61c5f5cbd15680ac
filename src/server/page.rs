//! HTML rendering of the conversation page

use crate::chat::Conversation;
use crate::error::{Result, TutorError};

use minijinja::{context, Environment};

const INDEX_TEMPLATE_NAME: &str = "index.html";
const INDEX_TEMPLATE: &str = include_str!("templates/index.html");

/// Renders the chat page
///
/// The template environment auto-escapes `.html` templates, so user text is
/// escaped while assistant turns, which already hold display markup, are
/// emitted as-is.
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    /// Load the built-in page template
    ///
    /// # Errors
    ///
    /// Returns error if the template fails to parse
    pub fn new() -> Result<Self> {
        Self::from_source(INDEX_TEMPLATE)
    }

    fn from_source(source: &'static str) -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(INDEX_TEMPLATE_NAME, source)
            .map_err(TutorError::Template)?;
        Ok(Self { env })
    }

    /// Render the page for a conversation
    ///
    /// # Errors
    ///
    /// Returns error if rendering fails
    pub fn render_index(&self, conversation: &Conversation) -> Result<String> {
        let template = self
            .env
            .get_template(INDEX_TEMPLATE_NAME)
            .map_err(TutorError::Template)?;
        let html = template
            .render(context! {
                chat_history => conversation.turns(),
            })
            .map_err(TutorError::Template)?;
        Ok(html)
    }
}
