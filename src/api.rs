use serde::{Deserialize, Serialize};

use pulse_boost::eligibility::Eligibility;
use pulse_boost::engine::{PurchaseOutcome, ScoreReport};
use pulse_boost::pricing::{PriceContext, PriceQuote};
use pulse_boost::{AccountRole, BoostPurchase};

#[derive(Debug, Deserialize)]
pub struct ApiScoreRequest {
    pub listing_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiPriceRequest {
    pub country: String,
    pub completeness: u8,
    pub rating: f64,
    pub hour_of_day: Option<u8>,
    pub role: Option<String>,
    pub base_price: Option<f64>,
}

impl ApiPriceRequest {
    pub fn into_context(self, default_base: f64, current_hour: u8) -> Result<PriceContext, String> {
        if self.completeness > 100 {
            return Err(format!(
                "completeness out of range (0-100): {}",
                self.completeness
            ));
        }
        if !(0.0..=5.0).contains(&self.rating) {
            return Err(format!("rating out of range (0-5): {}", self.rating));
        }
        let hour = self.hour_of_day.unwrap_or(current_hour);
        if hour > 23 {
            return Err(format!("invalid hour (0-23): {}", hour));
        }
        let role = match self.role {
            Some(raw) => {
                AccountRole::from_str(&raw).ok_or_else(|| format!("invalid role: {}", raw))?
            }
            None => AccountRole::Regular,
        };

        Ok(PriceContext {
            base_price: self.base_price.unwrap_or(default_base),
            country: self.country,
            completeness: self.completeness,
            rating: self.rating,
            hour_of_day: hour,
            role,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiEligibilityRequest {
    pub listing_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiPurchaseRequest {
    pub listing_id: String,
    pub package_id: String,
    pub purchaser_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiCancelRequest {
    pub listing_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiViolationRequest {
    pub checked: u64,
    pub violations: u64,
    pub detail: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiModeResponse {
    pub mode: pulse_boost::compliance::ComplianceMode,
}

#[derive(Debug, Serialize)]
pub struct ApiScoreResponse {
    pub report: ScoreReport,
}

#[derive(Debug, Serialize)]
pub struct ApiPriceResponse {
    pub quote: PriceQuote,
}

#[derive(Debug, Serialize)]
pub struct ApiEligibilityResponse {
    pub eligibility: Eligibility,
}

#[derive(Debug, Serialize)]
pub struct ApiPurchaseResponse {
    pub success: bool,
    pub purchase: Option<BoostPurchase>,
    pub quote: Option<PriceQuote>,
    pub error: Option<String>,
}

impl ApiPurchaseResponse {
    pub fn from_outcome(outcome: PurchaseOutcome) -> Self {
        match outcome {
            PurchaseOutcome::Completed { purchase, quote } => Self {
                success: true,
                purchase: Some(purchase),
                quote: Some(quote),
                error: None,
            },
            PurchaseOutcome::Rejected { reason } => Self {
                success: false,
                purchase: None,
                quote: None,
                error: Some(reason),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiCancelResponse {
    pub success: bool,
    pub purchase: Option<BoostPurchase>,
    pub error: Option<String>,
}
