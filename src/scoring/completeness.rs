use serde::{Deserialize, Serialize};

use crate::ListingProfile;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletenessWeights {
    pub name: f64,
    pub description: f64,
    pub primary_image: f64,
    pub gallery: f64,
    pub services: f64,
    pub rates: f64,
    pub availability: f64,
    pub languages: f64,
    pub location: f64,
}

impl Default for CompletenessWeights {
    fn default() -> Self {
        Self {
            name: 10.0,
            description: 15.0,
            primary_image: 15.0,
            gallery: 10.0,
            services: 15.0,
            rates: 15.0,
            availability: 10.0,
            languages: 5.0,
            location: 5.0,
        }
    }
}

impl CompletenessWeights {
    pub fn total(&self) -> f64 {
        self.name
            + self.description
            + self.primary_image
            + self.gallery
            + self.services
            + self.rates
            + self.availability
            + self.languages
            + self.location
    }
}

#[derive(Debug, Clone)]
pub struct CompletenessScorer {
    weights: CompletenessWeights,
}

impl CompletenessScorer {
    pub fn new(weights: CompletenessWeights) -> Self {
        Self { weights }
    }

    pub fn score(&self, profile: &ListingProfile) -> u8 {
        let mut total = 0.0;

        if !profile.name.trim().is_empty() {
            total += self.weights.name;
        }
        if !profile.description.trim().is_empty() {
            total += self.weights.description;
        }
        if !profile.primary_image.trim().is_empty() {
            total += self.weights.primary_image;
        }
        if profile.gallery_count >= 1 {
            total += self.weights.gallery;
        }
        if profile.service_count >= 1 {
            total += self.weights.services;
        }
        if profile.hourly_rate > 0.0 {
            total += self.weights.rates;
        }
        if profile.availability_days >= 1 {
            total += self.weights.availability;
        }
        if profile.language_count >= 1 {
            total += self.weights.languages;
        }
        if !profile.location.trim().is_empty() {
            total += self.weights.location;
        }

        crate::clamp_score(total).round() as u8
    }
}
