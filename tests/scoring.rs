use pulse_boost::scoring::{
    BoostConfig, BoostScoreCalculator, BoostWeights, CompletenessScorer, CompletenessWeights,
    EngagementConfig, EngagementScorer,
};
use pulse_boost::{InteractionCounters, ListingProfile};

fn full_profile() -> ListingProfile {
    ListingProfile {
        listing_id: "listing-1".to_string(),
        name: "Aurora Studio".to_string(),
        description: "Bright downtown studio with flexible hours".to_string(),
        primary_image: "img/primary.jpg".to_string(),
        gallery_count: 6,
        video_count: 1,
        service_count: 4,
        hourly_rate: 80.0,
        availability_days: 5,
        language_count: 2,
        location: "Berlin".to_string(),
        ..ListingProfile::default()
    }
}

#[test]
fn completeness_full_profile_scores_100() {
    let scorer = CompletenessScorer::new(CompletenessWeights::default());
    assert_eq!(scorer.score(&full_profile()), 100);
}

#[test]
fn completeness_empty_profile_scores_0() {
    let scorer = CompletenessScorer::new(CompletenessWeights::default());
    assert_eq!(scorer.score(&ListingProfile::default()), 0);
}

#[test]
fn completeness_whitespace_fields_count_as_missing() {
    let scorer = CompletenessScorer::new(CompletenessWeights::default());
    let mut profile = ListingProfile::default();
    profile.name = "   ".to_string();
    profile.description = "solid description".to_string();
    assert_eq!(scorer.score(&profile), 15);
}

#[test]
fn completeness_partial_sums_field_weights() {
    let scorer = CompletenessScorer::new(CompletenessWeights::default());
    let mut profile = ListingProfile::default();
    profile.name = "Aurora".to_string();
    profile.hourly_rate = 50.0;
    profile.gallery_count = 3;
    // name 10 + rates 15 + gallery 10
    assert_eq!(scorer.score(&profile), 35);
}

#[test]
fn completeness_weights_sum_to_100() {
    assert!((CompletenessWeights::default().total() - 100.0).abs() < 1e-9);
}

#[test]
fn interaction_score_at_ceilings_is_100() {
    let scorer = EngagementScorer::new(EngagementConfig::default());
    let counters = InteractionCounters {
        views: 1000,
        messages: 200,
        bookings: 50,
    };
    assert_eq!(scorer.interaction_score(&counters), 100);
}

#[test]
fn interaction_score_clamps_above_ceilings() {
    let scorer = EngagementScorer::new(EngagementConfig::default());
    let counters = InteractionCounters {
        views: 50_000,
        messages: 10_000,
        bookings: 4_000,
    };
    assert_eq!(scorer.interaction_score(&counters), 100);
}

#[test]
fn interaction_score_weights_bookings_highest() {
    let scorer = EngagementScorer::new(EngagementConfig::default());
    let only_views = InteractionCounters {
        views: 1000,
        messages: 0,
        bookings: 0,
    };
    let only_bookings = InteractionCounters {
        views: 0,
        messages: 0,
        bookings: 50,
    };
    assert_eq!(scorer.interaction_score(&only_views), 20);
    assert_eq!(scorer.interaction_score(&only_bookings), 50);
}

#[test]
fn content_score_description_richness_is_binary() {
    let scorer = EngagementScorer::new(EngagementConfig::default());
    let mut profile = ListingProfile::default();
    profile.description = "a".repeat(100);
    assert_eq!(scorer.content_score(&profile), 0);
    profile.description = "a".repeat(101);
    assert_eq!(scorer.content_score(&profile), 20);
}

#[test]
fn content_score_combines_gallery_video_and_description() {
    let scorer = EngagementScorer::new(EngagementConfig::default());
    let mut profile = ListingProfile::default();
    profile.gallery_count = 20;
    profile.video_count = 5;
    profile.description = "a".repeat(150);
    assert_eq!(scorer.content_score(&profile), 100);
}

#[test]
fn boost_weights_sum_to_one() {
    assert!((BoostWeights::default().total() - 1.0).abs() < 1e-9);
}

#[test]
fn boost_perfect_inputs_score_100() {
    let calculator = BoostScoreCalculator::new(BoostConfig::default());
    let breakdown = calculator.score(true, 100, Some(0.0), 100, 100, 100.0);
    assert_eq!(breakdown.total, 100);
}

#[test]
fn boost_missing_activity_defaults_to_ceiling() {
    let calculator = BoostScoreCalculator::new(BoostConfig::default());
    let breakdown = calculator.score(false, 0, None, 0, 0, 0.0);
    assert!((breakdown.hours_inactive - 72.0).abs() < 1e-6);
    // recency is the only non-zero factor: (100 - 72) * 0.15
    assert!((breakdown.recency - 4.2).abs() < 1e-6);
    assert_eq!(breakdown.total, 4);
}

#[test]
fn boost_clamps_inactivity_and_spend() {
    let calculator = BoostScoreCalculator::new(BoostConfig::default());
    let breakdown = calculator.score(false, 0, Some(500.0), 0, 0, 1_000.0);
    assert!((breakdown.hours_inactive - 72.0).abs() < 1e-6);
    assert!((breakdown.spend - 15.0).abs() < 1e-6);
}

#[test]
fn boost_score_stays_in_bounds() {
    let calculator = BoostScoreCalculator::new(BoostConfig::default());
    let low = calculator.score(false, 0, Some(72.0), 0, 0, 0.0);
    let high = calculator.score(true, 100, Some(0.0), 100, 100, 100.0);
    assert!(low.total <= 100);
    assert!(high.total <= 100);
}
