use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostWeights {
    pub verified: f64,
    pub completeness: f64,
    pub recency: f64,
    pub interaction: f64,
    pub content: f64,
    pub spend: f64,
}

impl Default for BoostWeights {
    fn default() -> Self {
        Self {
            verified: 0.25,
            completeness: 0.20,
            recency: 0.15,
            interaction: 0.10,
            content: 0.15,
            spend: 0.15,
        }
    }
}

impl BoostWeights {
    pub fn total(&self) -> f64 {
        self.verified
            + self.completeness
            + self.recency
            + self.interaction
            + self.content
            + self.spend
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostConfig {
    pub weights: BoostWeights,
    pub inactivity_ceiling_hours: f64,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            weights: BoostWeights::default(),
            inactivity_ceiling_hours: 72.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BoostBreakdown {
    pub verified: f64,
    pub completeness: f64,
    pub recency: f64,
    pub interaction: f64,
    pub content: f64,
    pub spend: f64,
    pub hours_inactive: f64,
    pub total: u8,
}

#[derive(Debug, Clone)]
pub struct BoostScoreCalculator {
    config: BoostConfig,
}

impl BoostScoreCalculator {
    pub fn new(config: BoostConfig) -> Self {
        Self { config }
    }

    pub fn score(
        &self,
        verified: bool,
        completeness: u8,
        hours_inactive: Option<f64>,
        interaction: u8,
        content: u8,
        spend_credits: f64,
    ) -> BoostBreakdown {
        let weights = &self.config.weights;
        let ceiling = self.config.inactivity_ceiling_hours;

        // Missing activity timestamp is treated as maximally stale.
        let hours = hours_inactive
            .unwrap_or(ceiling)
            .max(0.0)
            .min(ceiling);
        let spend = crate::clamp_score(spend_credits);

        let verified_part = if verified { 100.0 } else { 0.0 } * weights.verified;
        let completeness_part = completeness as f64 * weights.completeness;
        let recency_part = (100.0 - hours) * weights.recency;
        let interaction_part = interaction as f64 * weights.interaction;
        let content_part = content as f64 * weights.content;
        let spend_part = spend * weights.spend;

        let total = verified_part
            + completeness_part
            + recency_part
            + interaction_part
            + content_part
            + spend_part;

        BoostBreakdown {
            verified: verified_part,
            completeness: completeness_part,
            recency: recency_part,
            interaction: interaction_part,
            content: content_part,
            spend: spend_part,
            hours_inactive: hours,
            total: crate::clamp_score(total).round() as u8,
        }
    }
}
