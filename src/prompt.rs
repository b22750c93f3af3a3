//! # Prompt
//! A prompt is simply a string
//! ## PromptTemplate
//! A prompt template is a string with placeholders.
//!
//! ## Placeholder
//! A placeholder is a string that is in the format of `{name}`. It can be filled with a value.
//! It has a name, which is the string inside the braces. Literal braces are written as `{{` and `}}`.
//!
//! ## PartialPrompt
//! A partial prompt is a prompt template with some placeholders filled. A partial prompt can be only constructed from a prompt template via [PromptTemplate::construct_prompt].
//!
//! The placeholders in a partial prompt are filled from an input map via [PartialPrompt::fill_with_inputs].
//! When all placeholders are filled, the partial prompt can be completed via [PartialPrompt::complete], in which the placeholders in a template are **actually** replaced with the filling values.
//! Completing with unfilled placeholders is an error, never a silent default.


use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use crate::prompt::errors::UnfilledPlaceholders;
use crate::utils::prompt_processing::{get_placeholders, render_value, replace_all_placeholders};
use crate::utils::JsonMap;
use log::warn;


/// A prompt template with some placeholders filled. A partial prompt can be only constructed from a prompt template via [PromptTemplate::construct_prompt].
#[derive(Debug, Clone)]
#[readonly::make]
pub struct PartialPrompt {
    /// The template of the partial prompt, readonly
    #[readonly]
    pub template: PromptTemplate,

    /// Mapping from placeholder name to its filling value
    pub(crate) placeholder_to_vals: HashMap<String, Option<String>>,

    /// Record the placeholders that are not filled yet
    pub(crate) unfilled_placeholders: HashSet<String>,
}

impl PartialPrompt {
    /// Fill every placeholder that has an entry in `inputs`. Entries that match no placeholder are ignored.
    pub fn fill_with_inputs(&mut self, inputs: &JsonMap) -> &mut Self {
        for (placeholder, value) in self.placeholder_to_vals.iter_mut() {
            if let Some(input) = inputs.get(placeholder) {
                *value = Some(render_value(input).into_owned());
                self.unfilled_placeholders.remove(placeholder);
            }
        }
        self
    }

    /// Complete the partial prompt and return the completed prompt.
    /// Returns an error if there are still unfilled placeholders.
    pub fn complete(&self) -> Result<String, UnfilledPlaceholders> {
        if self.unfilled_placeholders.is_empty() {
            let template = self.template.str();
            Ok(replace_all_placeholders(template, &self.placeholder_to_vals))
        } else {
            Err(UnfilledPlaceholders::new(&self.template.placeholders, &self.unfilled_placeholders))
        }
    }
}

/// A prompt template with `{name}` placeholders.
#[derive(Debug, Clone)]
#[readonly::make]
pub struct PromptTemplate {
    /// The template of the partial prompt, immutable
    template: Arc<String>,

    /// The placeholders in the template, readonly
    #[readonly]
    pub placeholders: HashSet<String>,
}

impl PromptTemplate {
    /// Create a prompt template from a string. Warns if the template does not have any placeholder.
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let placeholders = get_placeholders(&template);
        if placeholders.is_empty() {
            warn!("Your prompt template does not have a placeholder. If this is intended, ignore this message. \
            Otherwise, check whether you have written placeholders correctly.\n\
            Got prompt template:\n\
            {}", template);
        }
        Self {
            template: Arc::new(template),
            placeholders,
        }
    }

    /// Get the prompt template as a string.
    #[inline]
    pub fn str(&self) -> &str {
        &self.template
    }

    /// Construct a partial prompt from the prompt template.
    pub fn construct_prompt(&self) -> PartialPrompt {
        PartialPrompt {
            template: self.clone(),
            placeholder_to_vals: self.placeholders.iter().map(|p| (p.clone(), None)).collect(),
            unfilled_placeholders: self.placeholders.clone(),
        }
    }

    /// Fill the template from `inputs` in one go.
    ///
    /// # Example
    /// ```
    /// use fastprompt::prompt::PromptTemplate;
    /// use serde_json::json;
    ///
    /// let template = PromptTemplate::new("destino: {destino}\nadultos: {adultos}");
    /// let inputs = json!({"destino": "Cancún", "adultos": 2});
    /// let prompt = template.render(inputs.as_object().unwrap()).unwrap();
    /// assert_eq!(prompt, "destino: Cancún\nadultos: 2");
    ///
    /// let missing = json!({"destino": "Cancún"});
    /// assert!(template.render(missing.as_object().unwrap()).is_err());
    /// ```
    pub fn render(&self, inputs: &JsonMap) -> Result<String, UnfilledPlaceholders> {
        self.construct_prompt()
            .fill_with_inputs(inputs)
            .complete()
    }
}

pub mod errors {
    use std::collections::HashSet;
    use std::error::Error;
    use std::fmt;
    use std::fmt::Formatter;

    /// Error when trying to complete a partial prompt but there are still unfilled placeholders.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct UnfilledPlaceholders {
        pub unfilled_placeholders: Vec<String>,
        pub all_placeholders: Vec<String>,
    }

    impl UnfilledPlaceholders {
        pub(crate) fn new(all_placeholders: &HashSet<String>, unfilled_placeholders: &HashSet<String>) -> Self {
            let mut all_placeholders: Vec<String> = all_placeholders.iter().cloned().collect();
            let mut unfilled_placeholders: Vec<String> = unfilled_placeholders.iter().cloned().collect();
            all_placeholders.sort();
            unfilled_placeholders.sort();
            Self {
                unfilled_placeholders,
                all_placeholders,
            }
        }
    }

    impl fmt::Display for UnfilledPlaceholders {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            write!(f, "UnfilledPlaceholders: to complete the prompt template,\n  Requires Placeholders:{:?}\n  Unfilled Placeholders:{:?}",
                   self.all_placeholders, self.unfilled_placeholders)
        }
    }

    impl Error for UnfilledPlaceholders {}
}
