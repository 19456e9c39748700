use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::{BoostPurchase, BoostStatus, InteractionCounters, ListingProfile};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingRecord {
    pub profile: ListingProfile,
    pub counters: InteractionCounters,
    pub spend_credits: f64,
    pub boosts: Vec<BoostPurchase>,
}

impl ListingRecord {
    pub fn new(profile: ListingProfile) -> Self {
        Self {
            profile,
            counters: InteractionCounters::default(),
            spend_credits: 0.0,
            boosts: Vec::new(),
        }
    }
}

pub struct ListingStore {
    path: PathBuf,
    listings: RwLock<HashMap<String, ListingRecord>>,
}

impl ListingStore {
    pub async fn load(path: PathBuf) -> Result<Self, String> {
        let listings = if path.exists() {
            let data = tokio::fs::read_to_string(&path)
                .await
                .map_err(|err| format!("failed to read listings: {}", err))?;
            if data.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&data)
                    .map_err(|err| format!("failed to parse listings: {}", err))?
            }
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            listings: RwLock::new(listings),
        })
    }

    pub async fn list_profiles(&self) -> Vec<ListingProfile> {
        let guard = self.listings.read().await;
        guard.values().map(|record| record.profile.clone()).collect()
    }

    pub async fn upsert_profile(&self, profile: ListingProfile) -> Result<ListingProfile, String> {
        profile.validate()?;
        let mut guard = self.listings.write().await;
        let entry = guard
            .entry(profile.listing_id.clone())
            .or_insert_with(|| ListingRecord::new(profile.clone()));
        entry.profile = profile.clone();
        self.persist(&guard).await?;
        Ok(profile)
    }

    pub async fn get_profile(&self, listing_id: &str) -> Result<ListingProfile, String> {
        let guard = self.listings.read().await;
        guard
            .get(listing_id)
            .map(|record| record.profile.clone())
            .ok_or_else(|| format!("listing not found: {}", listing_id))
    }

    pub async fn counters(&self, listing_id: &str) -> Result<InteractionCounters, String> {
        let guard = self.listings.read().await;
        guard
            .get(listing_id)
            .map(|record| record.counters.clone())
            .ok_or_else(|| format!("listing not found: {}", listing_id))
    }

    pub async fn set_counters(
        &self,
        listing_id: &str,
        counters: InteractionCounters,
    ) -> Result<(), String> {
        let mut guard = self.listings.write().await;
        let record = guard
            .get_mut(listing_id)
            .ok_or_else(|| format!("listing not found: {}", listing_id))?;
        record.counters = counters;
        self.persist(&guard).await
    }

    pub async fn recent_spend(&self, listing_id: &str) -> Result<f64, String> {
        let guard = self.listings.read().await;
        guard
            .get(listing_id)
            .map(|record| record.spend_credits)
            .ok_or_else(|| format!("listing not found: {}", listing_id))
    }

    pub async fn add_spend(&self, listing_id: &str, credits: f64) -> Result<(), String> {
        let mut guard = self.listings.write().await;
        let record = guard
            .get_mut(listing_id)
            .ok_or_else(|| format!("listing not found: {}", listing_id))?;
        record.spend_credits += credits;
        self.persist(&guard).await
    }

    // Overdue boosts read as inactive here; the sweep flips their stored
    // status and releases their rotation slots.
    pub async fn active_boost(
        &self,
        listing_id: &str,
        now: i64,
    ) -> Result<Option<BoostPurchase>, String> {
        let guard = self.listings.read().await;
        let record = guard
            .get(listing_id)
            .ok_or_else(|| format!("listing not found: {}", listing_id))?;
        Ok(record
            .boosts
            .iter()
            .find(|boost| boost.status == BoostStatus::Active && boost.ends_at > now)
            .cloned())
    }

    pub async fn active_purchases(&self, now: i64) -> Vec<BoostPurchase> {
        let guard = self.listings.read().await;
        guard
            .values()
            .flat_map(|record| record.boosts.iter())
            .filter(|boost| boost.status == BoostStatus::Active && boost.ends_at > now)
            .cloned()
            .collect()
    }

    pub async fn persist_purchase(&self, purchase: BoostPurchase) -> Result<BoostPurchase, String> {
        let mut guard = self.listings.write().await;
        let record = guard
            .get_mut(&purchase.listing_id)
            .ok_or_else(|| format!("listing not found: {}", purchase.listing_id))?;
        record.profile.last_boost_at = Some(purchase.started_at);
        record.boosts.push(purchase.clone());
        self.persist(&guard).await?;
        Ok(purchase)
    }

    pub async fn cancel_active(&self, listing_id: &str) -> Result<BoostPurchase, String> {
        let mut guard = self.listings.write().await;
        let record = guard
            .get_mut(listing_id)
            .ok_or_else(|| format!("listing not found: {}", listing_id))?;
        let boost = record
            .boosts
            .iter_mut()
            .find(|boost| boost.status == BoostStatus::Active)
            .ok_or_else(|| format!("no active boost for listing: {}", listing_id))?;
        boost.status = BoostStatus::Cancelled;
        let cancelled = boost.clone();
        self.persist(&guard).await?;
        Ok(cancelled)
    }

    pub async fn expire_overdue(&self, now: i64) -> Result<Vec<BoostPurchase>, String> {
        let mut guard = self.listings.write().await;
        let mut expired = Vec::new();
        for record in guard.values_mut() {
            for boost in record.boosts.iter_mut() {
                if boost.status == BoostStatus::Active && boost.ends_at <= now {
                    boost.status = BoostStatus::Expired;
                    expired.push(boost.clone());
                }
            }
        }
        if !expired.is_empty() {
            self.persist(&guard).await?;
        }
        Ok(expired)
    }

    pub async fn all_purchases(&self) -> Vec<BoostPurchase> {
        let guard = self.listings.read().await;
        guard
            .values()
            .flat_map(|record| record.boosts.iter().cloned())
            .collect()
    }

    async fn persist(&self, listings: &HashMap<String, ListingRecord>) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent).await?;
        }
        let payload = serde_json::to_string_pretty(listings)
            .map_err(|err| format!("failed to serialize listings: {}", err))?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, payload)
            .await
            .map_err(|err| format!("failed to write listings: {}", err))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|err| format!("failed to finalize listings: {}", err))?;
        Ok(())
    }
}

async fn ensure_dir(path: &Path) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|err| format!("failed to create data dir: {}", err))
}
