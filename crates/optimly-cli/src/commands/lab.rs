use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use optimly_application::{OptimlyApp, PromptLabUseCase};
use optimly_core::aggregation::group_by_model;
use optimly_core::config::OptimlyConfig;
use optimly_core::query::FunnelStage;
use optimly_core::scoring::derived_variant_score;
use optimly_core::simulation::SimulationResult;
use optimly_core::variant::ContentVariantDraft;
use optimly_core::wizard::AdvanceOutcome;
use optimly_execution::Clock;

#[derive(Args, Debug, Clone)]
pub struct LabArgs {
    #[arg(long, default_value = "Your brand")]
    pub brand: String,

    #[arg(long)]
    pub query: String,

    #[arg(long, default_value = "General audience")]
    pub persona: String,

    /// awareness, consideration or decision
    #[arg(long, default_value = "awareness")]
    pub stage: FunnelStage,

    /// The content to test, used as the control variant
    #[arg(long)]
    pub content: String,

    /// Extra hand-written variants
    #[arg(long = "variant")]
    pub variants: Vec<String>,

    /// Number of AI variants to generate
    #[arg(long, default_value_t = 1)]
    pub ai_variants: usize,

    /// CMS webhook that receives the winners
    #[arg(long)]
    pub webhook: Option<String>,

    /// Directory the winning variants are written to
    #[arg(long)]
    pub download: Option<PathBuf>,
}

pub async fn run(config: &OptimlyConfig, clock: Arc<dyn Clock>, args: LabArgs) -> Result<()> {
    let app = OptimlyApp::from_config(config, clock)?;
    let (_, lab) = app.start_prompt_lab(args.brand.as_str()).await;

    println!("[1/3] Simulate");
    lab.set_query(args.query.as_str(), args.persona.as_str(), args.stage)
        .await?;
    lab.set_content(args.content.as_str()).await?;

    let intent = lab.detect_intent().await?;
    println!("  intent: {}", intent.intent);
    let report = lab.score_content().await?;
    println!(
        "  content match: {}% ({})",
        report.result.score, report.result.explanation
    );
    let baseline = lab.run_baseline_simulation().await?;
    print_results(&baseline);
    lab.advance().await?;

    println!("[2/3] Generate Variants");
    for (i, content) in args.variants.iter().enumerate() {
        let variant = lab
            .add_variant(ContentVariantDraft {
                name: Some(format!("Variant {}", i + 1)),
                content: Some(content.clone()),
                query: Some(args.query.clone()),
                persona: Some(args.persona.clone()),
                funnel_stage: Some(args.stage),
                ..Default::default()
            })
            .await?;
        println!("  + {}", variant.name());
    }
    for _ in 0..args.ai_variants {
        let variant = lab.generate_ai_variant().await?;
        println!("  + {}", variant.name());
    }
    let results = lab.run_variant_simulation().await?;
    print_results(&results);
    lab.advance().await?;

    println!("[3/3] Compare & Export");
    pick_winners(&lab, &results).await?;

    if let Some(dir) = &args.download {
        for comparison in lab.outcome().await?.comparisons {
            let path = lab.download_winner(comparison.model, dir).await?;
            println!("  saved {}", path.display());
        }
    }
    if let Some(url) = &args.webhook {
        let payload = lab
            .ship_to_cms(url)
            .await
            .with_context(|| format!("failed to ship winners to {url}"))?;
        println!(
            "  shipped {} winners to {url}",
            payload.winning_variants.len()
        );
    }

    let outcome = match lab.advance().await? {
        AdvanceOutcome::Completed(outcome) => outcome,
        AdvanceOutcome::Moved { step_index } => {
            anyhow::bail!("prompt lab stopped at step {step_index}")
        }
    };
    for comparison in &outcome.comparisons {
        let delta = comparison
            .confidence_delta
            .map(|d| format!("{d:+} pts vs control"))
            .unwrap_or_else(|| "no control".to_string());
        println!(
            "  {:<11} {:<16} score {}%  position {}  {}",
            comparison.model.display_name(),
            comparison.variant_name,
            comparison.derived_score,
            comparison.position,
            delta
        );
    }
    if let Some(overall) = &outcome.overall_winner {
        println!("  overall winner: {overall}");
    }
    Ok(())
}

/// Picks, per model, the variant answer with the best derived score.
async fn pick_winners(lab: &PromptLabUseCase, results: &[SimulationResult]) -> Result<()> {
    for (model, group) in group_by_model(results) {
        let best = group.iter().max_by(|a, b| {
            derived_variant_score(a)
                .cmp(&derived_variant_score(b))
                .then(a.confidence_score.total_cmp(&b.confidence_score))
        });
        if let Some(best) = best {
            lab.select_winner(model, &best.id).await?;
        }
    }
    Ok(())
}

fn print_results(results: &[SimulationResult]) {
    for result in results {
        println!(
            "  {:<11} cited={:<5} confidence={:.2} {}",
            result.model.display_name(),
            result.brand_cited,
            result.confidence_score,
            result.sentiment
        );
    }
}
