use serde::{Deserialize, Serialize};

use crate::ListingProfile;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityConfig {
    pub min_age_days: i64,
    pub min_completeness: f64,
    pub cooldown_hours: i64,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            min_age_days: 7,
            min_completeness: 60.0,
            cooldown_hours: 24,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Eligibility {
    pub eligible: bool,
    pub reason: Option<String>,
}

impl Eligibility {
    pub fn granted() -> Self {
        Self {
            eligible: true,
            reason: None,
        }
    }

    pub fn rejected(reason: String) -> Self {
        Self {
            eligible: false,
            reason: Some(reason),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EligibilityGate {
    config: EligibilityConfig,
}

impl EligibilityGate {
    pub fn new(config: EligibilityConfig) -> Self {
        Self { config }
    }

    // Rules run in order; the first failure wins.
    pub fn check(&self, profile: &ListingProfile, completeness: u8, now: i64) -> Eligibility {
        let age_seconds = now - profile.created_at;
        let min_age_seconds = self.config.min_age_days * 86_400;
        if age_seconds < min_age_seconds {
            let age_days = age_seconds.max(0) / 86_400;
            return Eligibility::rejected(format!(
                "profile must be at least {} days old to boost (currently {} days)",
                self.config.min_age_days, age_days
            ));
        }

        if (completeness as f64) < self.config.min_completeness {
            return Eligibility::rejected(format!(
                "profile completeness {}% is below the required {}%",
                completeness, self.config.min_completeness
            ));
        }

        if let Some(last_boost_at) = profile.last_boost_at {
            let elapsed = now - last_boost_at;
            let cooldown_seconds = self.config.cooldown_hours * 3_600;
            if elapsed < cooldown_seconds {
                let remaining_hours = (cooldown_seconds - elapsed + 3_599) / 3_600;
                return Eligibility::rejected(format!(
                    "boost cooldown active: try again in about {} hour(s)",
                    remaining_hours
                ));
            }
        }

        Eligibility::granted()
    }
}
