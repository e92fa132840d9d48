use optimly_core::OptimlyError;
use optimly_core::query::{DiscoveryQuery, FunnelStage, QueryResult};
use optimly_core::scoring::{VisibilityTier, topic_visibility};
use optimly_core::wizard::{AdvanceOutcome, OnboardingFlow, OnboardingStep, WizardSession};

fn filled_session() -> WizardSession<OnboardingFlow> {
    let mut session = WizardSession::new(OnboardingFlow);
    let fields = session.fields_mut().unwrap();
    fields.set_brand_name("Stride");
    fields.set_industry("Footwear");
    fields.add_persona("Marathon runner");
    fields.add_topic("Running shoes");
    fields
        .queries
        .add(DiscoveryQuery::new(
            "best running shoes for flat feet",
            "Running shoes",
            "Marathon runner",
            FunnelStage::Consideration,
        ))
        .unwrap();
    session
}

#[test]
fn test_brand_name_step_blocks_on_empty_name() {
    let mut session = WizardSession::new(OnboardingFlow);
    assert_eq!(session.current_step(), OnboardingStep::BrandName);

    let err = session.advance().unwrap_err();
    match err {
        OptimlyError::Validation { step, .. } => assert_eq!(step, "Brand Name"),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(session.current_step_index(), 1);

    session.fields_mut().unwrap().set_brand_name("Stride");
    assert_eq!(
        session.advance().unwrap(),
        AdvanceOutcome::Moved { step_index: 2 }
    );
    assert_eq!(session.current_step(), OnboardingStep::Industry);
}

#[test]
fn test_whitespace_name_is_blank() {
    let mut session = WizardSession::new(OnboardingFlow);
    session.fields_mut().unwrap().set_brand_name("   ");
    assert!(session.advance().unwrap_err().is_validation());
    assert_eq!(session.current_step_index(), 1);
}

#[test]
fn test_retreat_on_first_step_is_noop() {
    let mut session = WizardSession::new(OnboardingFlow);
    assert_eq!(session.retreat().unwrap(), 1);
    assert_eq!(session.current_step_index(), 1);
}

#[test]
fn test_advance_on_launch_completes_instead_of_moving_past_end() {
    let mut session = filled_session();
    for expected in 2..=7 {
        assert_eq!(
            session.advance().unwrap(),
            AdvanceOutcome::Moved {
                step_index: expected
            }
        );
    }
    assert_eq!(session.current_step(), OnboardingStep::Launch);

    let brand = match session.advance().unwrap() {
        AdvanceOutcome::Completed(brand) => brand,
        other => panic!("expected completion, got {other:?}"),
    };
    assert_eq!(session.current_step_index(), 7);
    assert_eq!(brand.name, "Stride");
    assert_eq!(brand.industry, "Footwear");
    assert_eq!(brand.queries.len(), 1);
    assert!(brand.competitors.is_empty());

    assert_eq!(session.advance(), Err(OptimlyError::SessionTerminated));
}

#[test]
fn test_retreat_keeps_entered_fields() {
    let mut session = filled_session();
    session.advance().unwrap();
    session.advance().unwrap();
    assert_eq!(session.retreat().unwrap(), 2);
    assert_eq!(session.fields().industry, "Footwear");
}

#[test]
fn test_topic_without_mentions_is_absent() {
    let queries = vec![
        DiscoveryQuery::new("what is a carbon plate", "Tech", "Runner", FunnelStage::Awareness),
        DiscoveryQuery::new("carbon vs foam", "Tech", "Runner", FunnelStage::Consideration),
        DiscoveryQuery::new("buy stride carbon", "Tech", "Runner", FunnelStage::Decision),
        DiscoveryQuery::new("trail running tips", "Trail", "Hiker", FunnelStage::Awareness),
        DiscoveryQuery::new("best trail shoe 2025", "Trail", "Hiker", FunnelStage::Decision),
    ];

    let results: Vec<QueryResult> = queries
        .iter()
        .map(|q| {
            let tech = q.topic == "Tech";
            QueryResult {
                query_id: q.id.clone(),
                topic: q.topic.clone(),
                mentioned: !tech,
                confidence_score: if tech { 0.0 } else { 0.85 },
            }
        })
        .collect();

    let summary = topic_visibility(&results);
    let tech = summary.iter().find(|t| t.topic == "Tech").unwrap();
    let trail = summary.iter().find(|t| t.topic == "Trail").unwrap();
    assert_eq!(tech.tier, VisibilityTier::Absent);
    assert_eq!(tech.query_count, 3);
    assert_eq!(trail.tier, VisibilityTier::High);
}
