use serde::{Deserialize, Serialize};

use crate::{normalized, InteractionCounters, ListingProfile};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementConfig {
    pub views_ceiling: f64,
    pub messages_ceiling: f64,
    pub bookings_ceiling: f64,
    pub gallery_ceiling: f64,
    pub video_ceiling: f64,
    pub rich_description_chars: usize,
    pub views_weight: f64,
    pub messages_weight: f64,
    pub bookings_weight: f64,
    pub gallery_weight: f64,
    pub video_weight: f64,
    pub description_weight: f64,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            views_ceiling: 1000.0,
            messages_ceiling: 200.0,
            bookings_ceiling: 50.0,
            gallery_ceiling: 20.0,
            video_ceiling: 5.0,
            rich_description_chars: 100,
            views_weight: 0.2,
            messages_weight: 0.3,
            bookings_weight: 0.5,
            gallery_weight: 0.4,
            video_weight: 0.4,
            description_weight: 0.2,
        }
    }
}

impl EngagementConfig {
    pub fn interaction_total(&self) -> f64 {
        self.views_weight + self.messages_weight + self.bookings_weight
    }

    pub fn content_total(&self) -> f64 {
        self.gallery_weight + self.video_weight + self.description_weight
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct EngagementScores {
    pub interaction: u8,
    pub content: u8,
}

#[derive(Debug, Clone)]
pub struct EngagementScorer {
    config: EngagementConfig,
}

impl EngagementScorer {
    pub fn new(config: EngagementConfig) -> Self {
        Self { config }
    }

    pub fn interaction_score(&self, counters: &InteractionCounters) -> u8 {
        let views = normalized(counters.views as f64, self.config.views_ceiling);
        let messages = normalized(counters.messages as f64, self.config.messages_ceiling);
        let bookings = normalized(counters.bookings as f64, self.config.bookings_ceiling);

        let combined = views * self.config.views_weight
            + messages * self.config.messages_weight
            + bookings * self.config.bookings_weight;

        crate::clamp_score(combined).round() as u8
    }

    pub fn content_score(&self, profile: &ListingProfile) -> u8 {
        let gallery = normalized(profile.gallery_count as f64, self.config.gallery_ceiling);
        let videos = normalized(profile.video_count as f64, self.config.video_ceiling);
        let richness = if profile.description.chars().count() > self.config.rich_description_chars {
            100.0
        } else {
            0.0
        };

        let combined = gallery * self.config.gallery_weight
            + videos * self.config.video_weight
            + richness * self.config.description_weight;

        crate::clamp_score(combined).round() as u8
    }

    pub fn score(&self, profile: &ListingProfile, counters: &InteractionCounters) -> EngagementScores {
        EngagementScores {
            interaction: self.interaction_score(counters),
            content: self.content_score(profile),
        }
    }
}
