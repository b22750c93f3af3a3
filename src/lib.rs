//! # fastprompt
//!
//! Quick experiments with prompt variants for a travel-itinerary assistant, without a model API key.
//!
//! **Note: `fastprompt` is a proof of concept. The mocked reply is for demos, not for real evaluation.**
//!
//! ## Usage
//! ```toml
//! fastprompt = { path = "../fastprompt" }
//! ```
//!
//! Build without the `tiktoken` feature (`default-features = false`) to drop the BPE tokenizer; token counts then
//! come from a character heuristic.
//!
//! ## Concepts and Design
//! The pipeline is a straight line of plain functions over plain data, so every step can be called and inspected on
//! its own:
//!
//! ```text
//! PromptVariant + inputs -> Conversation -> MockOutput -> RunResult -> coverage score
//! ```
//!
//! ### Prompt Variant
//!
//! A [`PromptVariant`](crate::variant::PromptVariant) is a system instruction, a user prompt template, optional
//! few-shot exchanges and an optional checklist of regex patterns. Templates use `{name}` placeholders, for example
//!
//! ```text
//! destino: {destino}
//! fechas desde {desde} hasta {hasta}
//! ```
//!
//! Every placeholder must get a value from the inputs, otherwise building the conversation fails with
//! [`UnfilledPlaceholders`](crate::prompt::errors::UnfilledPlaceholders). There is no silent default.
//!
//! ### Conversation
//!
//! [`build_messages`](crate::conversation::build_messages) lays out the system message, the few-shot exchanges and
//! the rendered user prompt, in that order.
//!
//! ### Mock Responder
//!
//! [`mock_model_response`](crate::mock::mock_model_response) scrapes a few fields out of the last user message and
//! fills a fixed-shape reply, then checks the variant's checklist patterns against it (`"OK"` or `"FALTA"`).
//!
//! ### Token Estimation and Cost
//!
//! [`TokenEstimator`](crate::utils::token::TokenEstimator) counts with `cl100k_base` (or `o200k_base`) when the
//! tokenizer can be loaded and falls back to `max(1, chars / 4)` otherwise. Pick one at startup and hand it to a
//! [`VariantRunner`](crate::runner::VariantRunner), or use [`run_variant`](crate::runner::run_variant) with the
//! shared estimator. Costs come from a [`ModelCost`](crate::runner::ModelCost) in USD per 1000 tokens.
//!
//! ### Coverage Score
//!
//! [`coverage_score`](crate::scoring::coverage_score) rates a result from 0 to 5.
//!
//! ## Example
//! ```
//! use fastprompt::runner::{run_variant, ModelCost};
//! use fastprompt::scoring::coverage_score;
//! use fastprompt::variant::PromptVariant;
//! use serde_json::json;
//!
//! let variant = PromptVariant::new(
//!     "v1_base",
//!     "Sos un asistente de viajes.",
//!     "destino: {destino}\nfechas desde {desde} hasta {hasta}",
//! ).with_checklist(vec!["desayuno".to_string()]);
//! let inputs = json!({"destino": "Cancún", "desde": "2025-01-10", "hasta": "2025-01-17"});
//!
//! let result = run_variant(&variant, inputs.as_object().unwrap(), &ModelCost::new(0.15, 0.6)).unwrap();
//! assert_eq!(result.output.filters.destination, "Cancún");
//! assert_eq!(coverage_score(&result), 5.0);
//! ```


pub mod prompt;
pub mod variant;
pub mod conversation;
pub mod mock;
pub mod runner;
pub mod scoring;
pub mod errors;
pub mod utils;
