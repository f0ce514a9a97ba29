//! Conversational memory assembled per answer-generation call.
//!
//! [`ConversationMemory`] is an append-only log of role-tagged entries. A
//! fresh memory is built for every answer: retrieved context first (in
//! descending relevance order, so the model attends to the best matches
//! when its window is tight), then the user prompt.

use serde::{Deserialize, Serialize};

use crate::document::RetrievalResult;

/// The role of a conversation entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Retrieved document context injected ahead of the prompt.
    Context,
    /// The caller's prompt.
    User,
    /// A model response.
    Assistant,
}

/// One role-tagged entry in a [`ConversationMemory`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// The role this entry speaks as.
    pub role: Role,
    /// The entry text.
    pub content: String,
}

/// An ordered, append-only sequence of conversation entries.
///
/// Entries are only ever appended, never removed or edited, and iteration
/// follows insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationMemory {
    entries: Vec<Message>,
}

impl ConversationMemory {
    /// Create an empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a memory from retrieval results: one [`Role::Context`] entry
    /// per result, in the order received.
    ///
    /// No deduplication and no truncation happen here; an empty result set
    /// yields a memory with no context entries.
    pub fn assemble(results: &[RetrievalResult]) -> Self {
        let mut memory = Self::new();
        for result in results {
            memory.push_context(&result.text);
        }
        memory
    }

    /// Append a context entry.
    pub fn push_context(&mut self, content: impl Into<String>) {
        self.entries.push(Message { role: Role::Context, content: content.into() });
    }

    /// Append a user entry.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.entries.push(Message { role: Role::User, content: content.into() });
    }

    /// Append an assistant entry.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.entries.push(Message { role: Role::Assistant, content: content.into() });
    }

    /// The entries in insertion order.
    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the memory holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a ConversationMemory {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
