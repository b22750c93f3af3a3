use anyhow::Result;
use fastprompt::runner::{ModelCost, VariantRunner};
use fastprompt::scoring::coverage_score;
use fastprompt::utils::postprocess::json::to_canonical_json;
use fastprompt::utils::token::TokenEstimator;
use fastprompt_examples::{itinerary_variants, sample_inputs};

fn main() -> Result<()> {
    let inputs = sample_inputs();
    let model_cost = ModelCost::from_json_str(r#"{"prompt": 0.15, "completion": 0.6}"#)?;

    let estimator = TokenEstimator::detect();
    let runner = VariantRunner::new(&estimator);
    println!("token estimator: {}", estimator.name());
    println!("{:<14} {:>8} {:>8} {:>12} {:>6}", "variant", "prompt", "compl.", "cost (USD)", "score");
    for variant in itinerary_variants() {
        let result = runner.run(&variant, &inputs, &model_cost)?;
        println!("{:<14} {:>8} {:>8} {:>12.6} {:>6.1}",
                 result.variant,
                 result.prompt_tokens,
                 result.completion_tokens,
                 result.cost_usd,
                 coverage_score(&result));
        if !result.output.checks.is_empty() {
            println!("  checks: {}", to_canonical_json(&result.output.checks)?);
        }
    }
    Ok(())
}
