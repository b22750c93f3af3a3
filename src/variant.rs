//! # Prompt Variant
//! One way of prompting the itinerary assistant: a system instruction, a user prompt template, optional few-shot
//! exchanges and an optional checklist of patterns the reply is expected to contain.

use serde::{Deserialize, Serialize};
use crate::prompt::PromptTemplate;

/// An example exchange shown to the model before the real prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FewShot {
    pub user: String,
    pub assistant: String,
}

impl FewShot {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }
}

/// A prompt variant. All fields are read-only once constructed.
///
/// # Example
/// ```
/// use fastprompt::variant::{FewShot, PromptVariant};
///
/// let variant = PromptVariant::new("v2_fewshot", "Sos un asistente de viajes.", "destino: {destino}")
///     .with_few_shots(vec![FewShot::new("destino: Lima", "{\"destino\": \"Lima\"}")])
///     .with_checklist(vec!["destino".to_string()]);
/// assert_eq!(variant.name, "v2_fewshot");
/// assert_eq!(variant.few_shots.len(), 1);
/// ```
#[derive(Debug, Clone)]
#[readonly::make]
pub struct PromptVariant {
    /// Name of the variant, readonly
    #[readonly]
    pub name: String,

    /// System instruction, readonly
    #[readonly]
    pub system: String,

    /// Template of the final user message, readonly
    #[readonly]
    pub template: PromptTemplate,

    /// Few-shot exchanges in the order they are sent, readonly
    #[readonly]
    pub few_shots: Vec<FewShot>,

    /// Regex patterns checked against the reply, readonly
    #[readonly]
    pub checklist: Vec<String>,
}

impl PromptVariant {
    /// Create a variant without few-shots or checklist.
    pub fn new(name: impl Into<String>, system: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system: system.into(),
            template: PromptTemplate::new(template),
            few_shots: Vec::new(),
            checklist: Vec::new(),
        }
    }

    pub fn with_few_shots(mut self, few_shots: Vec<FewShot>) -> Self {
        self.few_shots = few_shots;
        self
    }

    pub fn with_checklist(mut self, checklist: Vec<String>) -> Self {
        self.checklist = checklist;
        self
    }
}
