use serde::{Deserialize, Serialize};

use crate::AccountRole;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    pub base_price: f64,
    pub minimum_price: f64,
    pub regional_premium: f64,
    pub premium_regions: Vec<String>,
    pub incompleteness_penalty: f64,
    pub completeness_threshold: f64,
    pub high_rating_discount: f64,
    pub high_rating_threshold: f64,
    pub peak_premium: f64,
    pub peak_start_hour: u8,
    pub peak_end_hour: u8,
    pub verified_discount: f64,
    pub synthetic_premium: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_price: 50.0,
            minimum_price: 30.0,
            regional_premium: 20.0,
            premium_regions: vec![
                "united states".to_string(),
                "usa".to_string(),
                "us".to_string(),
                "canada".to_string(),
                "united kingdom".to_string(),
                "uk".to_string(),
                "france".to_string(),
                "switzerland".to_string(),
            ],
            incompleteness_penalty: 30.0,
            completeness_threshold: 80.0,
            high_rating_discount: 10.0,
            high_rating_threshold: 4.5,
            peak_premium: 25.0,
            peak_start_hour: 18,
            peak_end_hour: 23,
            verified_discount: 5.0,
            synthetic_premium: 15.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PriceContext {
    pub base_price: f64,
    pub country: String,
    pub completeness: u8,
    pub rating: f64,
    pub hour_of_day: u8,
    pub role: AccountRole,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceAdjustment {
    pub label: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceQuote {
    pub base: f64,
    pub adjustments: Vec<PriceAdjustment>,
    pub raw_total: f64,
    pub total: f64,
    pub peak_slot: bool,
}

#[derive(Debug, Clone)]
pub struct PriceCalculator {
    config: PricingConfig,
}

impl PriceCalculator {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn is_peak(&self, hour: u8) -> bool {
        let start = self.config.peak_start_hour;
        let end = self.config.peak_end_hour;
        if start <= end {
            hour >= start && hour <= end
        } else {
            hour >= start || hour <= end
        }
    }

    pub fn is_premium_region(&self, country: &str) -> bool {
        let needle = country.trim().to_lowercase();
        self.config
            .premium_regions
            .iter()
            .any(|region| region.to_lowercase() == needle)
    }

    pub fn quote(&self, context: &PriceContext) -> PriceQuote {
        let mut adjustments = Vec::new();

        if self.is_premium_region(&context.country) {
            adjustments.push(PriceAdjustment {
                label: "regional demand premium".to_string(),
                amount: self.config.regional_premium,
            });
        }

        if (context.completeness as f64) < self.config.completeness_threshold {
            adjustments.push(PriceAdjustment {
                label: "incomplete profile penalty".to_string(),
                amount: self.config.incompleteness_penalty,
            });
        }

        if context.rating > self.config.high_rating_threshold {
            adjustments.push(PriceAdjustment {
                label: "high rating discount".to_string(),
                amount: -self.config.high_rating_discount,
            });
        }

        let peak_slot = self.is_peak(context.hour_of_day);
        if peak_slot {
            adjustments.push(PriceAdjustment {
                label: "peak hours premium".to_string(),
                amount: self.config.peak_premium,
            });
        }

        match context.role {
            AccountRole::Verified => adjustments.push(PriceAdjustment {
                label: "verified account discount".to_string(),
                amount: -self.config.verified_discount,
            }),
            AccountRole::Synthetic => adjustments.push(PriceAdjustment {
                label: "synthetic listing premium".to_string(),
                amount: self.config.synthetic_premium,
            }),
            AccountRole::Regular => {}
        }

        let raw_total = context.base_price
            + adjustments
                .iter()
                .map(|adjustment| adjustment.amount)
                .sum::<f64>();
        let total = raw_total.max(self.config.minimum_price);

        PriceQuote {
            base: context.base_price,
            adjustments,
            raw_total,
            total,
            peak_slot,
        }
    }
}
