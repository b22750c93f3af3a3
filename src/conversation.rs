//! # Conversation
//! Chat-style message lists built from a [PromptVariant](crate::variant::PromptVariant).
//!
//! A conversation is always laid out as the system message, then each few-shot exchange as a user message followed
//! by an assistant message, then the rendered user prompt.

use std::fmt;
use std::slice::Iter;
use serde::{Deserialize, Serialize};

use crate::prompt::errors::UnfilledPlaceholders;
use crate::utils::JsonMap;
use crate::variant::PromptVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        f.write_str(role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Ordered, role-tagged messages. Serializes as a plain JSON array of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: Role, content: impl Into<String>) -> &mut Self {
        self.messages.push(Message::new(role, content));
        self
    }

    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, Message> {
        self.messages.iter()
    }

    /// Content of the most recent user message, if any.
    pub fn last_user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|msg| msg.role == Role::User)
            .map(|msg| msg.content.as_str())
    }

    /// All contents joined by a single space, in order.
    pub fn joined_content(&self) -> String {
        self.messages
            .iter()
            .map(|msg| msg.content.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a Message;
    type IntoIter = Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Build the conversation for `variant`, rendering its template with `inputs`.
///
/// Returns an error if `inputs` lacks a value for any placeholder of the template.
///
/// # Example
/// ```
/// use fastprompt::conversation::{build_messages, Role};
/// use fastprompt::variant::{FewShot, PromptVariant};
/// use serde_json::json;
///
/// let variant = PromptVariant::new("demo", "Sos un asistente.", "destino: {destino}")
///     .with_few_shots(vec![FewShot::new("hola", "¡hola!")]);
/// let inputs = json!({"destino": "Salta"});
/// let conversation = build_messages(&variant, inputs.as_object().unwrap()).unwrap();
/// let roles: Vec<Role> = conversation.iter().map(|msg| msg.role).collect();
/// assert_eq!(roles, [Role::System, Role::User, Role::Assistant, Role::User]);
/// assert_eq!(conversation.last_user_content(), Some("destino: Salta"));
/// ```
pub fn build_messages(variant: &PromptVariant, inputs: &JsonMap) -> Result<Conversation, UnfilledPlaceholders> {
    let user_prompt = variant.template.render(inputs)?;
    let mut messages = Vec::with_capacity(2 + 2 * variant.few_shots.len());
    messages.push(Message::new(Role::System, variant.system.as_str()));
    for shot in &variant.few_shots {
        messages.push(Message::new(Role::User, shot.user.as_str()));
        messages.push(Message::new(Role::Assistant, shot.assistant.as_str()));
    }
    messages.push(Message::new(Role::User, user_prompt));
    Ok(messages.into())
}
