//! Mock backend: fixed latency, then templated or seeded-random results.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use minijinja::{Environment, Value, context};
use optimly_core::config::MockDelays;
use optimly_core::query::{DiscoveryQuery, FunnelStage, QuerySuggestion};
use optimly_core::scoring::{content_match_range, has_match_keyword};
use optimly_core::simulation::{
    ContentMatchReport, IntentAnalysis, LlmModel, MatchBreakdown, MatchResult, Sentiment,
    SimulationResult,
};
use optimly_core::variant::{ContentVariant, ContentVariantDraft};
use optimly_core::{OptimlyError, Result};
use strum::IntoEnumIterator;
use tracing::debug;
use uuid::Uuid;

use crate::backend::{
    Backend, IntentRequest, Operation, QueryGenerationRequest, SimulationRequest, VariantRequest,
};
use crate::clock::Clock;
use crate::random::SeededRandom;

const INTENT_TEMPLATE: &str = "{{ article }} {{ persona | lower }} in the {{ stage | lower }} \
stage is asking \"{{ query }}\" and wants {{ goal }}.";

const MATCH_STRONG_TEMPLATE: &str = "Strong match: the content answers \"{{ query }}\" with the \
values-led language assistants tend to quote.";

const MATCH_MODERATE_TEMPLATE: &str = "Moderate match: the content is relevant to \"{{ query }}\" \
but lacks the sustainability and ethics signals assistants favour.";

const SNIPPET_CITED_TEMPLATE: &str = "When asked \"{{ query }}\", {{ model }} recommends \
{{ brand }}: \"{{ excerpt }}\"";

const SNIPPET_OMITTED_TEMPLATE: &str = "When asked \"{{ query }}\", {{ model }} lists several \
established options without mentioning {{ brand }}.";

const PERSONA_TEMPLATES: [&str; 4] = [
    "Budget-conscious {{ industry }} shopper",
    "{{ industry }} enthusiast",
    "First-time {{ industry }} buyer",
    "Values-driven {{ industry }} customer",
];

const TOPIC_TEMPLATES: [&str; 4] = [
    "{{ industry }} trends",
    "Sustainable {{ industry }}",
    "Best {{ industry }} brands",
    "{{ brand }} alternatives",
];

const QUERY_AWARENESS_TEMPLATE: &str =
    "What should a {{ persona | lower }} know about {{ topic | lower }}?";
const QUERY_CONSIDERATION_TEMPLATE: &str =
    "Which {{ topic | lower }} options are best for a {{ persona | lower }}?";
const QUERY_DECISION_TEMPLATE: &str = "Is {{ brand }} worth it for {{ topic | lower }}?";

const VARIANT_TEMPLATE: &str = "{{ base }}\n\nFor anyone asking \"{{ query }}\": {{ brand }} \
is built on sustainable materials and ethical sourcing, {{ closing }}";

const EXCERPT_CHARS: usize = 80;
const STRATEGIC_SCORE_RANGE: std::ops::Range<u8> = 60..100;
const BREAKDOWN_SPREAD: i16 = 8;

/// "An" before a vowel, "A" otherwise.
fn indefinite_article(word: &str) -> &'static str {
    match word.trim_start().chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "An",
        _ => "A",
    }
}

fn stage_goal(stage: FunnelStage) -> &'static str {
    match stage {
        FunnelStage::Awareness => "to understand what options exist",
        FunnelStage::Consideration => "to compare trustworthy alternatives",
        FunnelStage::Decision => "a confident recommendation before buying",
    }
}

fn stage_closing(stage: FunnelStage) -> &'static str {
    match stage {
        FunnelStage::Awareness => "a good place to start learning what matters.",
        FunnelStage::Consideration => "which sets it apart from the usual alternatives.",
        FunnelStage::Decision => "and every order ships with a 60-day guarantee.",
    }
}

fn sentiment_for(confidence: f64) -> Sentiment {
    if confidence > 0.75 {
        Sentiment::Positive
    } else if confidence > 0.5 {
        Sentiment::Neutral
    } else {
        Sentiment::Negative
    }
}

fn excerpt(content: &str) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= EXCERPT_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(EXCERPT_CHARS).collect();
        format!("{}...", cut.trim_end())
    }
}

fn template_error(err: minijinja::Error) -> OptimlyError {
    OptimlyError::internal(format!("template rendering failed: {err}"))
}

/// Stand-in backend used by the demo.
///
/// Never fails in practice; the `Result` only reflects the [`Backend`]
/// contract shared with real integrations.
pub struct MockBackend {
    clock: Arc<dyn Clock>,
    random: SeededRandom,
    delays: MockDelays,
    templates: Environment<'static>,
}

impl MockBackend {
    pub fn new(clock: Arc<dyn Clock>, delays: MockDelays, seed: Option<u64>) -> Result<Self> {
        let mut templates = Environment::new();
        let named: [(&'static str, &'static str); 9] = [
            ("intent", INTENT_TEMPLATE),
            ("match_strong", MATCH_STRONG_TEMPLATE),
            ("match_moderate", MATCH_MODERATE_TEMPLATE),
            ("snippet_cited", SNIPPET_CITED_TEMPLATE),
            ("snippet_omitted", SNIPPET_OMITTED_TEMPLATE),
            ("query_awareness", QUERY_AWARENESS_TEMPLATE),
            ("query_consideration", QUERY_CONSIDERATION_TEMPLATE),
            ("query_decision", QUERY_DECISION_TEMPLATE),
            ("variant", VARIANT_TEMPLATE),
        ];
        for (name, source) in named {
            templates.add_template(name, source).map_err(template_error)?;
        }

        Ok(Self {
            clock,
            random: SeededRandom::new(seed),
            delays,
            templates,
        })
    }

    fn delay_for(&self, operation: Operation) -> Duration {
        let millis = match operation {
            Operation::DetectIntent => self.delays.detect_intent,
            Operation::ScoreContentMatch => self.delays.score_content_match,
            Operation::RunSimulation => self.delays.run_simulation,
            Operation::GenerateQueries => self.delays.generate_queries,
            Operation::GeneratePersonas => self.delays.generate_personas,
            Operation::GenerateTopics => self.delays.generate_topics,
            Operation::GenerateAiVariant => self.delays.generate_ai_variant,
        };
        MockDelays::as_duration(millis)
    }

    async fn latency(&self, operation: Operation) {
        let delay = self.delay_for(operation);
        debug!(%operation, delay_ms = delay.as_millis() as u64, "mock call started");
        self.clock.sleep(delay).await;
    }

    fn render(&self, name: &str, ctx: Value) -> Result<String> {
        self.templates
            .get_template(name)
            .and_then(|t| t.render(ctx))
            .map_err(template_error)
    }

    fn render_str(&self, source: &str, ctx: Value) -> Result<String> {
        self.templates.render_str(source, ctx).map_err(template_error)
    }

    fn breakdown_around(&self, score: u8) -> MatchBreakdown {
        let vary = || (score as i16 + self.random.jitter(BREAKDOWN_SPREAD)).clamp(0, 100) as u8;
        MatchBreakdown {
            relevance: vary(),
            authority: vary(),
            specificity: vary(),
        }
    }

    fn simulate_one(
        &self,
        request: &SimulationRequest,
        variant: &ContentVariant,
        model: LlmModel,
    ) -> Result<SimulationResult> {
        let (confidence, brand_cited) = if variant.is_control() {
            (self.random.float_in(0.35..0.75), self.random.chance(0.5))
        } else {
            let boost = if has_match_keyword(variant.content()) {
                0.05
            } else {
                0.0
            };
            (
                (self.random.float_in(0.55..0.95) + boost).min(1.0),
                self.random.chance(0.85),
            )
        };

        let ctx = context! {
            query => request.query,
            model => model.display_name(),
            brand => request.brand_name,
            excerpt => excerpt(variant.content()),
        };
        let snippet = if brand_cited {
            self.render("snippet_cited", ctx)?
        } else {
            self.render("snippet_omitted", ctx)?
        };

        Ok(SimulationResult::new(
            variant.id(),
            model,
            brand_cited,
            snippet,
            confidence,
            sentiment_for(confidence),
            variant.is_control(),
        ))
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn detect_intent(&self, request: &IntentRequest) -> Result<IntentAnalysis> {
        self.latency(Operation::DetectIntent).await;

        let intent = self.render(
            "intent",
            context! {
                article => indefinite_article(&request.persona),
                persona => request.persona,
                stage => request.funnel_stage.to_string(),
                query => request.query,
                goal => stage_goal(request.funnel_stage),
            },
        )?;

        Ok(IntentAnalysis {
            query: request.query.clone(),
            persona: request.persona.clone(),
            funnel_stage: request.funnel_stage,
            intent,
        })
    }

    async fn score_content_match(
        &self,
        content: &str,
        query: &str,
    ) -> Result<ContentMatchReport> {
        self.latency(Operation::ScoreContentMatch).await;

        let range = content_match_range(content);
        let strong = has_match_keyword(content);
        let score = self.random.int_in(range);
        let template = if strong {
            "match_strong"
        } else {
            "match_moderate"
        };
        let explanation = self.render(template, context! { query => query })?;

        Ok(ContentMatchReport {
            breakdown: self.breakdown_around(score),
            result: MatchResult { score, explanation },
        })
    }

    async fn run_simulation(&self, request: &SimulationRequest) -> Result<Vec<SimulationResult>> {
        self.latency(Operation::RunSimulation).await;

        let mut results = Vec::with_capacity(request.variants.len() * request.models.len());
        for variant in &request.variants {
            for model in &request.models {
                results.push(self.simulate_one(request, variant, *model)?);
            }
        }
        debug!(count = results.len(), "mock simulation finished");
        Ok(results)
    }

    async fn generate_queries(
        &self,
        request: &QueryGenerationRequest,
    ) -> Result<Vec<QuerySuggestion>> {
        self.latency(Operation::GenerateQueries).await;

        let fallback = ["General audience".to_string()];
        let personas: &[String] = if request.personas.is_empty() {
            &fallback
        } else {
            &request.personas
        };

        let mut suggestions = Vec::new();
        for (i, topic) in request.topics.iter().enumerate() {
            for (j, stage) in FunnelStage::iter().enumerate() {
                let persona = &personas[(i + j) % personas.len()];
                let template = match stage {
                    FunnelStage::Awareness => "query_awareness",
                    FunnelStage::Consideration => "query_consideration",
                    FunnelStage::Decision => "query_decision",
                };
                let text = self.render(
                    template,
                    context! { persona => persona, topic => topic, brand => request.brand_name },
                )?;
                suggestions.push(QuerySuggestion {
                    query: DiscoveryQuery::new(text, topic.as_str(), persona.as_str(), stage),
                    strategic_score: self.random.int_in(STRATEGIC_SCORE_RANGE),
                });
            }
        }
        Ok(suggestions)
    }

    async fn generate_personas(&self, _brand_name: &str, industry: &str) -> Result<Vec<String>> {
        self.latency(Operation::GeneratePersonas).await;
        PERSONA_TEMPLATES
            .iter()
            .map(|source| self.render_str(source, context! { industry => industry }))
            .collect()
    }

    async fn generate_topics(&self, brand_name: &str, industry: &str) -> Result<Vec<String>> {
        self.latency(Operation::GenerateTopics).await;
        TOPIC_TEMPLATES
            .iter()
            .map(|source| {
                self.render_str(source, context! { industry => industry, brand => brand_name })
            })
            .collect()
    }

    async fn generate_ai_variant(&self, request: &VariantRequest) -> Result<ContentVariant> {
        self.latency(Operation::GenerateAiVariant).await;

        let content = self.render(
            "variant",
            context! {
                base => request.base_content.trim(),
                query => request.query,
                brand => request.brand_name,
                closing => stage_closing(request.funnel_stage),
            },
        )?;

        ContentVariant::from_draft(ContentVariantDraft {
            id: Some(Uuid::new_v4().to_string()),
            name: Some(format!("AI Variant {}", request.ordinal)),
            content: Some(content),
            format: Some("article".to_string()),
            query: Some(request.query.clone()),
            persona: Some(request.persona.clone()),
            funnel_stage: Some(request.funnel_stage),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_flattens_and_truncates() {
        assert_eq!(excerpt("Hello\n  world"), "Hello world");
        let long = "word ".repeat(40);
        let cut = excerpt(&long);
        assert!(cut.ends_with("..."));
        assert!(cut.chars().count() <= EXCERPT_CHARS + 3);
    }

    #[test]
    fn test_article_follows_persona() {
        assert_eq!(indefinite_article("Eco Shopper"), "An");
        assert_eq!(indefinite_article("  urban commuter"), "An");
        assert_eq!(indefinite_article("Budget-conscious buyer"), "A");
        assert_eq!(indefinite_article(""), "A");
    }

    #[test]
    fn test_sentiment_thresholds() {
        assert_eq!(sentiment_for(0.9), Sentiment::Positive);
        assert_eq!(sentiment_for(0.75), Sentiment::Neutral);
        assert_eq!(sentiment_for(0.5), Sentiment::Negative);
    }
}
