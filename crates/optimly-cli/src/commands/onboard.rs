use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use optimly_application::OptimlyApp;
use optimly_core::config::OptimlyConfig;
use optimly_core::query::QueryResult;
use optimly_core::scoring::topic_visibility;
use optimly_core::wizard::{AdvanceOutcome, OnboardingStep};
use optimly_execution::Clock;

#[derive(Args, Debug, Clone)]
pub struct OnboardArgs {
    #[arg(long)]
    pub brand: String,

    #[arg(long)]
    pub industry: String,

    #[arg(long = "competitor")]
    pub competitors: Vec<String>,

    /// Personas to add; suggestions are used when none are given
    #[arg(long = "persona")]
    pub personas: Vec<String>,

    /// Topics to add; suggestions are used when none are given
    #[arg(long = "topic")]
    pub topics: Vec<String>,

    /// Print the launched brand as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub async fn run(config: &OptimlyConfig, clock: Arc<dyn Clock>, args: OnboardArgs) -> Result<()> {
    let app = OptimlyApp::from_config(config, clock)?;
    let (_, wizard) = app.start_onboarding().await;

    loop {
        let (index, step) = wizard.position().await;
        println!("[{index}/7] {step}");

        match step {
            OnboardingStep::BrandName => {
                wizard.edit(|f| f.set_brand_name(args.brand.as_str())).await?;
            }
            OnboardingStep::Industry => {
                wizard.edit(|f| f.set_industry(args.industry.as_str())).await?;
            }
            OnboardingStep::Competitors => {
                wizard
                    .edit(|f| {
                        for name in &args.competitors {
                            f.add_competitor(name);
                        }
                    })
                    .await?;
            }
            OnboardingStep::Personas => {
                if args.personas.is_empty() {
                    for persona in wizard.suggest_personas().await? {
                        println!("  + {persona}");
                    }
                } else {
                    wizard
                        .edit(|f| {
                            for persona in &args.personas {
                                f.add_persona(persona);
                            }
                        })
                        .await?;
                }
            }
            OnboardingStep::Topics => {
                if args.topics.is_empty() {
                    for topic in wizard.suggest_topics().await? {
                        println!("  + {topic}");
                    }
                } else {
                    wizard
                        .edit(|f| {
                            for topic in &args.topics {
                                f.add_topic(topic);
                            }
                        })
                        .await?;
                }
            }
            OnboardingStep::Queries => {
                for suggestion in wizard.suggest_queries().await? {
                    println!(
                        "  + [{}] {} (score {})",
                        suggestion.query.funnel_stage,
                        suggestion.query.query,
                        suggestion.strategic_score
                    );
                }
            }
            OnboardingStep::Launch => {}
        }

        match wizard.advance().await? {
            AdvanceOutcome::Moved { .. } => {}
            AdvanceOutcome::Completed(brand) => {
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&brand)?);
                    return Ok(());
                }

                println!(
                    "\nLaunched {} ({}) with {} queries",
                    brand.name,
                    brand.industry,
                    brand.queries.len()
                );

                // No visibility has been observed yet, so every topic starts out absent.
                let observed: Vec<QueryResult> = brand
                    .queries
                    .iter()
                    .map(|q| QueryResult {
                        query_id: q.id.clone(),
                        topic: q.topic.clone(),
                        mentioned: false,
                        confidence_score: 0.0,
                    })
                    .collect();
                for topic in topic_visibility(&observed) {
                    println!(
                        "  {:<32} {} queries, visibility {}",
                        topic.topic, topic.query_count, topic.tier
                    );
                }
                return Ok(());
            }
        }
    }
}
