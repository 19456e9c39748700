use pulse_boost::pricing::{PriceCalculator, PriceContext, PricingConfig};
use pulse_boost::AccountRole;

fn context() -> PriceContext {
    PriceContext {
        base_price: 50.0,
        country: "Spain".to_string(),
        completeness: 100,
        rating: 3.0,
        hour_of_day: 10,
        role: AccountRole::Regular,
    }
}

#[test]
fn base_price_passes_through_without_modifiers() {
    let calculator = PriceCalculator::new(PricingConfig::default());
    let quote = calculator.quote(&context());
    assert!(quote.adjustments.is_empty());
    assert!((quote.total - 50.0).abs() < 1e-6);
}

#[test]
fn regional_premium_applies_to_high_demand_regions() {
    let calculator = PriceCalculator::new(PricingConfig::default());
    let mut ctx = context();
    ctx.country = "US".to_string();
    let quote = calculator.quote(&ctx);
    assert!((quote.total - 70.0).abs() < 1e-6);

    ctx.country = "Germany".to_string();
    let quote = calculator.quote(&ctx);
    assert!((quote.total - 50.0).abs() < 1e-6);
}

#[test]
fn region_match_is_case_insensitive() {
    let calculator = PriceCalculator::new(PricingConfig::default());
    let mut ctx = context();
    ctx.country = "  CANADA ".to_string();
    let quote = calculator.quote(&ctx);
    assert!((quote.total - 70.0).abs() < 1e-6);
}

#[test]
fn incompleteness_penalty_below_threshold() {
    let calculator = PriceCalculator::new(PricingConfig::default());
    let mut ctx = context();
    ctx.completeness = 79;
    let quote = calculator.quote(&ctx);
    assert!((quote.total - 80.0).abs() < 1e-6);

    ctx.completeness = 80;
    let quote = calculator.quote(&ctx);
    assert!((quote.total - 50.0).abs() < 1e-6);
}

#[test]
fn high_rating_discount_above_threshold() {
    let calculator = PriceCalculator::new(PricingConfig::default());
    let mut ctx = context();
    ctx.rating = 4.6;
    let quote = calculator.quote(&ctx);
    assert!((quote.total - 40.0).abs() < 1e-6);

    // exactly at the threshold gets no discount
    ctx.rating = 4.5;
    let quote = calculator.quote(&ctx);
    assert!((quote.total - 50.0).abs() < 1e-6);
}

#[test]
fn peak_hours_add_premium() {
    let calculator = PriceCalculator::new(PricingConfig::default());
    assert!(!calculator.is_peak(17));
    assert!(calculator.is_peak(18));
    assert!(calculator.is_peak(23));
    assert!(!calculator.is_peak(0));

    let mut ctx = context();
    ctx.hour_of_day = 20;
    let quote = calculator.quote(&ctx);
    assert!(quote.peak_slot);
    assert!((quote.total - 75.0).abs() < 1e-6);
}

#[test]
fn peak_band_wraps_midnight() {
    let mut config = PricingConfig::default();
    config.peak_start_hour = 22;
    config.peak_end_hour = 2;
    let calculator = PriceCalculator::new(config);
    assert!(calculator.is_peak(23));
    assert!(calculator.is_peak(1));
    assert!(!calculator.is_peak(12));
}

#[test]
fn role_modifiers_apply() {
    let calculator = PriceCalculator::new(PricingConfig::default());
    let mut ctx = context();
    ctx.role = AccountRole::Verified;
    let quote = calculator.quote(&ctx);
    assert!((quote.total - 45.0).abs() < 1e-6);

    ctx.role = AccountRole::Synthetic;
    let quote = calculator.quote(&ctx);
    assert!((quote.total - 65.0).abs() < 1e-6);
}

#[test]
fn stacked_discounts_never_breach_the_floor() {
    let calculator = PriceCalculator::new(PricingConfig::default());
    let quote = calculator.quote(&PriceContext {
        base_price: 35.0,
        country: "Spain".to_string(),
        completeness: 100,
        rating: 5.0,
        hour_of_day: 10,
        role: AccountRole::Verified,
    });
    assert!((quote.raw_total - 20.0).abs() < 1e-6);
    assert!((quote.total - 30.0).abs() < 1e-6);
}

#[test]
fn germany_verified_peak_scenario() {
    let calculator = PriceCalculator::new(PricingConfig::default());
    let quote = calculator.quote(&PriceContext {
        base_price: 50.0,
        country: "Germany".to_string(),
        completeness: 75,
        rating: 4.2,
        hour_of_day: 20,
        role: AccountRole::Verified,
    });
    // 50 + 0 regional + 30 incomplete + 25 peak - 5 verified
    assert!((quote.total - 100.0).abs() < 1e-6);
}
