pub mod compliance;
pub mod config;
pub mod eligibility;
pub mod engine;
pub mod pricing;
pub mod rotation;
pub mod scoring;
pub mod store;

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::rotation::Cohort;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    Verified,
    Regular,
    Synthetic,
}

impl AccountRole {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "verified" => Some(AccountRole::Verified),
            "regular" | "standard" => Some(AccountRole::Regular),
            "synthetic" | "ai" | "ai-generated" => Some(AccountRole::Synthetic),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AccountRole::Verified => "verified",
            AccountRole::Regular => "regular",
            AccountRole::Synthetic => "synthetic",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingProfile {
    pub listing_id: String,
    pub verified: bool,
    pub role: AccountRole,
    pub country: String,
    pub rating: f64,
    pub created_at: i64,
    pub last_active_at: Option<i64>,
    pub last_boost_at: Option<i64>,
    pub name: String,
    pub description: String,
    pub primary_image: String,
    pub gallery_count: u32,
    pub video_count: u32,
    pub service_count: u32,
    pub hourly_rate: f64,
    pub availability_days: u32,
    pub language_count: u32,
    pub location: String,
}

impl Default for ListingProfile {
    fn default() -> Self {
        Self {
            listing_id: String::new(),
            verified: false,
            role: AccountRole::Regular,
            country: String::new(),
            rating: 0.0,
            created_at: 0,
            last_active_at: None,
            last_boost_at: None,
            name: String::new(),
            description: String::new(),
            primary_image: String::new(),
            gallery_count: 0,
            video_count: 0,
            service_count: 0,
            hourly_rate: 0.0,
            availability_days: 0,
            language_count: 0,
            location: String::new(),
        }
    }
}

impl ListingProfile {
    pub fn validate(&self) -> Result<(), String> {
        if self.listing_id.trim().is_empty() {
            return Err("listing id must not be empty".to_string());
        }
        if !(0.0..=5.0).contains(&self.rating) {
            return Err(format!("rating out of range (0-5): {}", self.rating));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionCounters {
    pub views: u64,
    pub messages: u64,
    pub bookings: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostStatus {
    Active,
    Expired,
    Cancelled,
}

impl BoostStatus {
    pub fn label(self) -> &'static str {
        match self {
            BoostStatus::Active => "active",
            BoostStatus::Expired => "expired",
            BoostStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostPurchase {
    pub purchase_id: String,
    pub listing_id: String,
    pub package_id: String,
    pub purchaser_id: String,
    pub price_charged: f64,
    pub started_at: i64,
    pub ends_at: i64,
    pub status: BoostStatus,
    // Cohort the purchase was admitted under; the rotation slot is released
    // against this value even if the profile's role changes later.
    #[serde(default)]
    pub cohort: Cohort,
}

pub fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs() as i64)
        .unwrap_or(0)
}

pub fn hour_of_day(timestamp: i64) -> u8 {
    (timestamp.div_euclid(3600).rem_euclid(24)) as u8
}

pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.max(0.0).min(100.0)
}

pub fn normalized(value: f64, ceiling: f64) -> f64 {
    if ceiling <= 0.0 {
        return 0.0;
    }
    clamp_score(value / ceiling * 100.0)
}

pub fn stable_hash64(value: &str) -> u64 {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

pub fn format_price(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}
