//! # Variant Runner
//! Runs a [PromptVariant] end to end: builds the conversation, mocks the reply and estimates tokens and cost.
//!
//! A run is all-or-nothing. Any failure aborts it without a partial [RunResult].

use std::collections::HashMap;
use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::conversation::{build_messages, Conversation};
use crate::errors::EvalError;
use crate::mock::{mock_model_response, MockOutput};
use crate::utils::postprocess::json::to_canonical_json;
use crate::utils::token::{CountToken, TokenEstimator};
use crate::utils::JsonMap;
use crate::variant::PromptVariant;

/// Price of a model in USD per 1000 tokens. Missing rates are 0.0 and unknown keys are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ModelCost {
    pub prompt: f64,
    pub completion: f64,
}

impl ModelCost {
    pub fn new(prompt: f64, completion: f64) -> Self {
        Self { prompt, completion }
    }

    /// Read the `prompt` and `completion` rates from a map.
    pub fn from_rates(rates: &HashMap<String, f64>) -> Self {
        Self {
            prompt: rates.get("prompt").copied().unwrap_or(0.0),
            completion: rates.get("completion").copied().unwrap_or(0.0),
        }
    }

    /// Parse rates from a JSON object such as `{"prompt": 0.15, "completion": 0.6}`.
    ///
    /// Anything but an object is an error, and so is a `prompt` or `completion` value that is not a number.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        let object: JsonMap = serde_json::from_str(json)?;
        let mut rates = HashMap::new();
        for key in ["prompt", "completion"] {
            match object.get(key) {
                None => {}
                Some(Value::Number(rate)) => {
                    rates.insert(key.to_string(), rate.as_f64().unwrap_or(0.0));
                }
                Some(other) => {
                    return Err(<serde_json::Error as serde::de::Error>::custom(
                        format!("rate `{}` must be a number, got {}", key, other)
                    ));
                }
            }
        }
        Ok(Self::from_rates(&rates))
    }
}

/// Approximate cost in USD of an exchange.
///
/// # Example
/// ```
/// use fastprompt::runner::{estimate_cost, ModelCost};
/// assert_eq!(estimate_cost(0, 0, &ModelCost::new(5.0, 15.0)), 0.0);
/// assert_eq!(estimate_cost(1000, 1000, &ModelCost::new(1.0, 2.0)), 3.0);
/// ```
pub fn estimate_cost(prompt_tokens: usize, completion_tokens: usize, model_cost: &ModelCost) -> f64 {
    (prompt_tokens as f64 / 1000.0) * model_cost.prompt + (completion_tokens as f64 / 1000.0) * model_cost.completion
}

/// Everything a single run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    pub variant: String,
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    #[serde(rename = "cost_usd_est")]
    pub cost_usd: f64,
    pub output: MockOutput,
    pub messages: Conversation,
}

/// Runs variants with a given token counter.
pub struct VariantRunner<'a, C: CountToken + ?Sized = TokenEstimator> {
    counter: &'a C,
}

impl<'a, C: CountToken + ?Sized> VariantRunner<'a, C> {
    pub fn new(counter: &'a C) -> Self {
        Self { counter }
    }

    /// Run `variant` with `inputs` and price it with `model_cost`.
    pub fn run(&self, variant: &PromptVariant, inputs: &JsonMap, model_cost: &ModelCost) -> Result<RunResult, EvalError> {
        let messages = build_messages(variant, inputs)?;
        let prompt_tokens = self.counter.count_token(&messages.joined_content());

        let output = mock_model_response(&messages, &variant.checklist)?;
        let completion_text = to_canonical_json(&output)?;
        let completion_tokens = self.counter.count_token(&completion_text);

        let cost_usd = estimate_cost(prompt_tokens, completion_tokens, model_cost);
        debug!("variant {}: prompt_tokens={} completion_tokens={} cost_usd={:.6}",
               variant.name, prompt_tokens, completion_tokens, cost_usd);
        Ok(RunResult {
            variant: variant.name.clone(),
            prompt_tokens,
            completion_tokens,
            cost_usd,
            output,
            messages,
        })
    }
}

/// [VariantRunner::run] with the [shared](TokenEstimator::shared) estimator.
pub fn run_variant(variant: &PromptVariant, inputs: &JsonMap, model_cost: &ModelCost) -> Result<RunResult, EvalError> {
    VariantRunner::new(TokenEstimator::shared()).run(variant, inputs, model_cost)
}

#[cfg(test)]
mod test_runner {
    use std::collections::HashMap;
    use serde_json::json;
    use super::{estimate_cost, run_variant, ModelCost, VariantRunner};
    use crate::errors::EvalError;
    use crate::utils::postprocess::json::to_canonical_json;
    use crate::utils::token::{count_tokens_by_chars, TokenEstimator};
    use crate::utils::JsonMap;
    use crate::variant::{FewShot, PromptVariant};

    fn variant() -> PromptVariant {
        PromptVariant::new(
            "v2_fewshot",
            "Sos un asistente de viajes. Respondé en JSON.",
            "destino: {destino}\nfechas desde {desde} hasta {hasta}\nadultos: {adultos}\nmenores: {menores}\npresupuesto: {presupuesto}",
        )
            .with_few_shots(vec![FewShot::new("destino: Lima", "{\"destino\": \"Lima\"}")])
            .with_checklist(vec!["destino".to_string(), "desayuno".to_string()])
    }

    fn inputs() -> JsonMap {
        json!({
            "destino": "Cancún",
            "desde": "2025-01-10",
            "hasta": "2025-01-17",
            "adultos": 2,
            "menores": 1,
            "presupuesto": 1500,
        }).as_object().unwrap().clone()
    }

    #[test]
    fn test_estimate_cost() {
        assert_eq!(0.0, estimate_cost(0, 0, &ModelCost::new(3.0, 7.0)));
        assert_eq!(0.0, estimate_cost(0, 0, &ModelCost::default()));
        assert_eq!(3.0, estimate_cost(1000, 1000, &ModelCost::new(1.0, 2.0)));
        assert_eq!(0.5, estimate_cost(500, 9000, &ModelCost::new(1.0, 0.0)));
    }

    #[test]
    fn test_model_cost_rates() {
        let rates = HashMap::from([("prompt".to_string(), 0.5), ("input".to_string(), 9.0)]);
        assert_eq!(ModelCost::new(0.5, 0.0), ModelCost::from_rates(&rates));
        let parsed = ModelCost::from_json_str(r#"{"completion": 1.5, "cached": 0.1}"#).unwrap();
        assert_eq!(ModelCost::new(0.0, 1.5), parsed);
        assert!(ModelCost::from_json_str("[1, 2]").is_err());
        assert!(ModelCost::from_json_str("0.5").is_err());
        assert!(ModelCost::from_json_str(r#"{"prompt": "0.5"}"#).is_err());
        assert_eq!(ModelCost::default(), ModelCost::from_json_str("{}").unwrap());
        let parsed = ModelCost::from_json_str(r#"{"prompt": 1, "completion": 2.5, "model": "gpt-4o-mini"}"#).unwrap();
        assert_eq!(ModelCost::new(1.0, 2.5), parsed);
    }

    #[test]
    fn test_run_with_heuristic() {
        let estimator = TokenEstimator::Heuristic;
        let runner = VariantRunner::new(&estimator);
        let result = runner.run(&variant(), &inputs(), &ModelCost::new(1.0, 2.0)).unwrap();

        assert_eq!("v2_fewshot", result.variant);
        assert_eq!(4, result.messages.len());
        assert_eq!(count_tokens_by_chars(&result.messages.joined_content()), result.prompt_tokens);
        let completion_text = to_canonical_json(&result.output).unwrap();
        assert_eq!(count_tokens_by_chars(&completion_text), result.completion_tokens);
        // completion tokens are counted on unescaped text
        assert!(completion_text.contains("Cancún"));
        let expected_cost = result.prompt_tokens as f64 / 1000.0 + 2.0 * result.completion_tokens as f64 / 1000.0;
        assert!((result.cost_usd - expected_cost).abs() < 1e-12);

        assert_eq!("Cancún", result.output.filters.destination);
        assert_eq!(1, result.output.filters.minors);
        assert!(result.output.checks.iter().all(|c| c.status.is_ok()));
    }

    #[test]
    fn test_run_with_closure_counter() {
        let words = |s: &str| s.split_whitespace().count();
        let result = VariantRunner::new(&words)
            .run(&variant(), &inputs(), &ModelCost::default())
            .unwrap();
        assert_eq!(result.messages.joined_content().split_whitespace().count(), result.prompt_tokens);
        assert_eq!(0.0, result.cost_usd);
    }

    #[test]
    fn test_run_is_idempotent() {
        let cost = ModelCost::new(0.15, 0.6);
        let first = run_variant(&variant(), &inputs(), &cost).unwrap();
        let second = run_variant(&variant(), &inputs(), &cost).unwrap();
        assert_eq!(first, second);
        assert!(first.prompt_tokens >= 1);
        assert!(first.completion_tokens >= 1);
        assert!(first.cost_usd >= 0.0);
    }

    #[test]
    fn test_run_fails_without_partial_result() {
        let mut missing = inputs();
        missing.remove("hasta");
        let err = run_variant(&variant(), &missing, &ModelCost::default()).unwrap_err();
        assert!(matches!(err, EvalError::Template(_)));

        let broken = PromptVariant::new("roto", "s", "destino: {destino}")
            .with_checklist(vec!["[".to_string()]);
        let err = run_variant(&broken, &inputs(), &ModelCost::default()).unwrap_err();
        assert!(matches!(err, EvalError::Pattern(_)));
    }

    #[test]
    fn test_serialized_result_keys() {
        let result = run_variant(&variant(), &inputs(), &ModelCost::default()).unwrap();
        let value = serde_json::to_value(&result).unwrap();
        for key in ["variant", "prompt_tokens", "completion_tokens", "cost_usd_est", "output", "messages"] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!("system", value["messages"][0]["role"]);
        assert_eq!(json!([{"destino": "OK"}, {"desayuno": "OK"}]), value["output"]["checks"]);
    }
}
