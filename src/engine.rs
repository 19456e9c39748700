use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex, RwLock};

use crate::compliance::{ComplianceMode, ComplianceMonitor, ComplianceStatus, Notification};
use crate::config::EngineConfig;
use crate::eligibility::{Eligibility, EligibilityGate};
use crate::pricing::{PriceCalculator, PriceContext, PriceQuote};
use crate::rotation::{Cohort, RotationQueue, RotationSnapshot};
use crate::scoring::{
    BoostBreakdown, BoostScoreCalculator, CompletenessScorer, EngagementScorer, EngagementScores,
};
use crate::store::ListingStore;
use crate::{
    current_timestamp, hour_of_day, stable_hash64, AccountRole, BoostPurchase, BoostStatus,
    ListingProfile,
};

#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub listing_id: String,
    pub completeness: u8,
    pub engagement: EngagementScores,
    pub spend_credits: f64,
    pub breakdown: BoostBreakdown,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PurchaseOutcome {
    Completed { purchase: BoostPurchase, quote: PriceQuote },
    Rejected { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepSummary {
    pub checked: u64,
    pub violations: u64,
    pub expired: u64,
    pub mode: ComplianceMode,
}

pub struct BoostEngine {
    config: EngineConfig,
    store: Arc<ListingStore>,
    monitor: RwLock<ComplianceMonitor>,
    rotation: RwLock<RotationQueue>,
    purchase_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    completeness: CompletenessScorer,
    engagement: EngagementScorer,
    boost: BoostScoreCalculator,
    pricing: PriceCalculator,
    gate: EligibilityGate,
}

impl BoostEngine {
    pub async fn new(config: EngineConfig, store: Arc<ListingStore>) -> Result<Self, String> {
        config.validate()?;
        let mut rotation = RotationQueue::new(config.rotation.clone())?;
        // Rotation occupancy is not persisted; rebuild it from boosts that
        // are still running.
        for purchase in store.active_purchases(current_timestamp()).await {
            if let Err(err) = rotation.admit(purchase.cohort) {
                tracing::warn!(
                    purchase_id = purchase.purchase_id.as_str(),
                    error = err.as_str(),
                    "active boost does not fit the rotation queue"
                );
            }
        }
        let monitor = ComplianceMonitor::new(config.compliance.clone());

        Ok(Self {
            completeness: CompletenessScorer::new(config.completeness.clone()),
            engagement: EngagementScorer::new(config.engagement.clone()),
            boost: BoostScoreCalculator::new(config.boost.clone()),
            pricing: PriceCalculator::new(config.pricing.clone()),
            gate: EligibilityGate::new(config.eligibility.clone()),
            monitor: RwLock::new(monitor),
            rotation: RwLock::new(rotation),
            purchase_locks: Mutex::new(HashMap::new()),
            config,
            store,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn subscribe_notifications(&self) -> broadcast::Receiver<Notification> {
        self.monitor.read().await.subscribe()
    }

    pub async fn calculate_boost_score(
        &self,
        listing_id: &str,
        now: i64,
    ) -> Result<ScoreReport, String> {
        let profile = self
            .bounded("profile", self.store.get_profile(listing_id))
            .await?;
        let counters = self
            .bounded("interaction counters", self.store.counters(listing_id))
            .await?;
        let spend_credits = self
            .bounded("recent spend", self.store.recent_spend(listing_id))
            .await?;

        // Completeness is always recomputed from current field state.
        let completeness = self.completeness.score(&profile);
        let engagement = self.engagement.score(&profile, &counters);
        let hours_inactive = profile
            .last_active_at
            .map(|last| (now - last).max(0) as f64 / 3600.0);

        let breakdown = self.boost.score(
            profile.verified,
            completeness,
            hours_inactive,
            engagement.interaction,
            engagement.content,
            spend_credits,
        );

        Ok(ScoreReport {
            listing_id: listing_id.to_string(),
            completeness,
            engagement,
            spend_credits,
            breakdown,
        })
    }

    pub fn price_quote(&self, context: &PriceContext) -> PriceQuote {
        self.pricing.quote(context)
    }

    pub async fn calculate_price(
        &self,
        listing_id: &str,
        package_id: &str,
        now: i64,
    ) -> Result<PriceQuote, String> {
        let profile = self
            .bounded("profile", self.store.get_profile(listing_id))
            .await?;
        let package = self
            .config
            .package(package_id)
            .ok_or_else(|| format!("unknown boost package: {}", package_id))?;
        let completeness = self.completeness.score(&profile);
        let context = self.price_context(&profile, package.base_price, completeness, now);
        Ok(self.pricing.quote(&context))
    }

    pub async fn check_eligibility(
        &self,
        listing_id: &str,
        now: i64,
    ) -> Result<Eligibility, String> {
        let profile = self
            .bounded("profile", self.store.get_profile(listing_id))
            .await?;
        let completeness = self.completeness.score(&profile);
        Ok(self.gate.check(&profile, completeness, now))
    }

    pub async fn purchase_boost(
        &self,
        listing_id: &str,
        package_id: &str,
        purchaser_id: &str,
        now: i64,
    ) -> Result<PurchaseOutcome, String> {
        // Purchases against the same listing are serialized; concurrent
        // attempts cannot double-charge or double-extend.
        let lock = self.purchase_lock(listing_id).await;
        let _guard = lock.lock().await;

        let profile = self
            .bounded("profile", self.store.get_profile(listing_id))
            .await?;
        let completeness = self.completeness.score(&profile);

        let eligibility = self.gate.check(&profile, completeness, now);
        if !eligibility.eligible {
            let reason = eligibility
                .reason
                .unwrap_or_else(|| "listing is not eligible to boost".to_string());
            return Ok(PurchaseOutcome::Rejected { reason });
        }

        let active = self
            .bounded("active boost", self.store.active_boost(listing_id, now))
            .await?;
        if active.is_some() {
            return Ok(PurchaseOutcome::Rejected {
                reason: format!("listing {} already has an active boost", listing_id),
            });
        }

        {
            let monitor = self.monitor.read().await;
            if monitor.mode() == ComplianceMode::Recovery {
                if monitor.enforce_recovery_gate() {
                    monitor.announce(
                        "purchase_blocked",
                        &format!("purchase for {} blocked by recovery mode", listing_id),
                        now,
                    );
                    return Ok(PurchaseOutcome::Rejected {
                        reason: "boost purchases are paused while system health recovers"
                            .to_string(),
                    });
                }
                tracing::warn!(listing_id, "purchase while in recovery mode (advisory gate)");
            }
        }

        let package = self
            .config
            .package(package_id)
            .ok_or_else(|| format!("unknown boost package: {}", package_id))?;
        let context = self.price_context(&profile, package.base_price, completeness, now);
        let quote = self.pricing.quote(&context);

        let cohort = cohort_for_role(profile.role);
        {
            let mut rotation = self.rotation.write().await;
            if let Err(reason) = rotation.admit(cohort) {
                return Ok(PurchaseOutcome::Rejected { reason });
            }
        }

        let purchase = BoostPurchase {
            purchase_id: derive_purchase_id(listing_id, package_id, now),
            listing_id: listing_id.to_string(),
            package_id: package_id.to_string(),
            purchaser_id: purchaser_id.to_string(),
            price_charged: quote.total,
            started_at: now,
            ends_at: now + package.duration_hours * 3600,
            status: BoostStatus::Active,
            cohort,
        };

        if let Err(err) = self.store.persist_purchase(purchase.clone()).await {
            self.rotation.write().await.remove(cohort);
            return Err(err);
        }
        self.store.add_spend(listing_id, quote.total).await?;

        tracing::info!(
            listing_id,
            package_id,
            price = quote.total,
            "boost purchase committed"
        );
        self.monitor.read().await.announce(
            "boost_purchased",
            &format!(
                "listing {} boosted with {} for {:.2}",
                listing_id, package_id, quote.total
            ),
            now,
        );

        Ok(PurchaseOutcome::Completed { purchase, quote })
    }

    pub async fn cancel_boost(&self, listing_id: &str, now: i64) -> Result<BoostPurchase, String> {
        let lock = self.purchase_lock(listing_id).await;
        let _guard = lock.lock().await;

        let cancelled = self.store.cancel_active(listing_id).await?;
        self.rotation.write().await.remove(cancelled.cohort);

        tracing::info!(listing_id, "boost cancelled");
        self.monitor.read().await.announce(
            "boost_cancelled",
            &format!("boost cancelled for listing {}", listing_id),
            now,
        );
        Ok(cancelled)
    }

    pub async fn compliance_status(&self) -> ComplianceStatus {
        self.monitor.read().await.status()
    }

    pub async fn rotation_snapshot(&self) -> RotationSnapshot {
        self.rotation.read().await.snapshot()
    }

    pub async fn record_violation_cycle(
        &self,
        checked: u64,
        violations: u64,
        detail: &str,
        now: i64,
    ) -> ComplianceMode {
        self.monitor
            .write()
            .await
            .record_cycle(checked, violations, detail, now)
    }

    pub async fn report_critical_failure(&self, message: &str, now: i64) -> ComplianceMode {
        self.monitor.write().await.critical_failure(message, now)
    }

    pub async fn restore_health(&self, now: i64) -> ComplianceMode {
        self.monitor.write().await.health_restored(now)
    }

    // One compliance sweep: expire overdue boosts and release their rotation
    // slots, audit running boosts against the price floor, check rotation
    // balance, feed the monitor.
    pub async fn run_sweep(&self, now: i64) -> Result<SweepSummary, String> {
        let expired = match self.store.expire_overdue(now).await {
            Ok(expired) => expired,
            Err(err) => {
                self.monitor.write().await.critical_failure(&err, now);
                return Err(err);
            }
        };
        if !expired.is_empty() {
            let mut rotation = self.rotation.write().await;
            for purchase in &expired {
                rotation.remove(purchase.cohort);
            }
        }
        let expired = expired.len() as u64;

        // Only running boosts are audited; a finished purchase has already
        // been through a sweep while it was live.
        let purchases = self.store.active_purchases(now).await;
        let minimum = self.config.pricing.minimum_price;
        let checked = purchases.len() as u64;
        let mut violations = 0u64;
        let mut detail = String::new();

        for purchase in &purchases {
            if purchase.price_charged < minimum - 1e-9 {
                violations += 1;
                detail = format!(
                    "purchase {} charged {:.2} below minimum {:.2}",
                    purchase.purchase_id, purchase.price_charged, minimum
                );
            }
        }

        // Rotation balance is advisory; excursions get logged, not counted.
        let rotation = self.rotation.read().await.snapshot();
        if rotation.occupied > 0 && rotation.deviation_pct > self.config.rotation.tolerance_pct {
            tracing::warn!(
                deviation = rotation.deviation_pct,
                tolerance = self.config.rotation.tolerance_pct,
                "rotation queue outside tolerance band"
            );
        }

        if detail.is_empty() {
            detail = "sweep clean".to_string();
        }
        let mode = self
            .monitor
            .write()
            .await
            .record_cycle(checked, violations, &detail, now);

        tracing::debug!(checked, violations, expired, mode = mode.label(), "compliance sweep");
        Ok(SweepSummary {
            checked,
            violations,
            expired,
            mode,
        })
    }

    pub fn spawn_poller(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let engine = Arc::clone(self);
        let interval = Duration::from_secs(self.config.compliance.poll_interval_secs.max(1));
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                let now = current_timestamp();
                if let Err(err) = engine.run_sweep(now).await {
                    tracing::warn!(error = err.as_str(), "compliance sweep failed");
                }
            }
        })
    }

    fn price_context(
        &self,
        profile: &ListingProfile,
        base_price: f64,
        completeness: u8,
        now: i64,
    ) -> PriceContext {
        PriceContext {
            base_price,
            country: profile.country.clone(),
            completeness,
            rating: profile.rating,
            hour_of_day: hour_of_day(now),
            role: profile.role,
        }
    }

    async fn purchase_lock(&self, listing_id: &str) -> Arc<Mutex<()>> {
        let mut guard = self.purchase_locks.lock().await;
        guard
            .entry(listing_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn bounded<T>(
        &self,
        what: &str,
        future: impl Future<Output = Result<T, String>>,
    ) -> Result<T, String> {
        let timeout = Duration::from_millis(self.config.store.read_timeout_ms.max(1));
        tokio::time::timeout(timeout, future)
            .await
            .map_err(|_| format!("timed out reading {}", what))?
    }
}

fn cohort_for_role(role: AccountRole) -> Cohort {
    match role {
        AccountRole::Synthetic => Cohort::Synthetic,
        AccountRole::Verified | AccountRole::Regular => Cohort::Organic,
    }
}

fn derive_purchase_id(listing_id: &str, package_id: &str, now: i64) -> String {
    let payload = format!("{}:{}:{}", listing_id, package_id, now);
    format!("boost_{:x}", stable_hash64(&payload))
}
