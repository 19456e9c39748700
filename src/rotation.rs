use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationConfig {
    pub total_slots: usize,
    pub target_synthetic_pct: f64,
    pub tolerance_pct: f64,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            total_slots: 50,
            target_synthetic_pct: 40.0,
            tolerance_pct: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cohort {
    Synthetic,
    Organic,
}

impl Default for Cohort {
    fn default() -> Self {
        Cohort::Organic
    }
}

impl Cohort {
    pub fn label(self) -> &'static str {
        match self {
            Cohort::Synthetic => "synthetic",
            Cohort::Organic => "organic",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RotationSnapshot {
    pub total_slots: usize,
    pub occupied: usize,
    pub synthetic: usize,
    pub organic: usize,
    pub target_synthetic_pct: f64,
    pub actual_synthetic_pct: f64,
    pub deviation_pct: f64,
}

#[derive(Debug, Clone)]
pub struct RotationQueue {
    config: RotationConfig,
    synthetic: usize,
    organic: usize,
}

impl RotationQueue {
    pub fn new(config: RotationConfig) -> Result<Self, String> {
        if !(0.0..=100.0).contains(&config.target_synthetic_pct) {
            return Err(format!(
                "target synthetic percentage out of range (0-100): {}",
                config.target_synthetic_pct
            ));
        }
        if !(0.0..=100.0).contains(&config.tolerance_pct) {
            return Err(format!(
                "tolerance percentage out of range (0-100): {}",
                config.tolerance_pct
            ));
        }
        Ok(Self {
            config,
            synthetic: 0,
            organic: 0,
        })
    }

    pub fn occupied(&self) -> usize {
        self.synthetic + self.organic
    }

    pub fn has_capacity(&self) -> bool {
        self.occupied() < self.config.total_slots
    }

    pub fn actual_synthetic_pct(&self) -> f64 {
        let occupied = self.occupied();
        if occupied == 0 {
            return 0.0;
        }
        self.synthetic as f64 / occupied as f64 * 100.0
    }

    // Advisory metric; transient excursions outside the tolerance band are
    // expected under churn.
    pub fn deviation_pct(&self) -> f64 {
        (self.actual_synthetic_pct() - self.config.target_synthetic_pct).abs()
    }

    pub fn within_tolerance(&self) -> bool {
        self.deviation_pct() <= self.config.tolerance_pct
    }

    // Greedy rebalancing: pick whichever cohort is under-represented relative
    // to the target, ties toward synthetic.
    pub fn next_cohort(&self) -> Cohort {
        if self.actual_synthetic_pct() <= self.config.target_synthetic_pct {
            Cohort::Synthetic
        } else {
            Cohort::Organic
        }
    }

    pub fn admit_next(&mut self) -> Result<Cohort, String> {
        let cohort = self.next_cohort();
        self.admit(cohort)?;
        Ok(cohort)
    }

    pub fn admit(&mut self, cohort: Cohort) -> Result<(), String> {
        if !self.has_capacity() {
            return Err(format!(
                "rotation queue is full ({} slots)",
                self.config.total_slots
            ));
        }
        match cohort {
            Cohort::Synthetic => self.synthetic += 1,
            Cohort::Organic => self.organic += 1,
        }
        Ok(())
    }

    // Removal only decrements; rebalancing happens on admission.
    pub fn remove(&mut self, cohort: Cohort) {
        match cohort {
            Cohort::Synthetic => self.synthetic = self.synthetic.saturating_sub(1),
            Cohort::Organic => self.organic = self.organic.saturating_sub(1),
        }
    }

    pub fn snapshot(&self) -> RotationSnapshot {
        RotationSnapshot {
            total_slots: self.config.total_slots,
            occupied: self.occupied(),
            synthetic: self.synthetic,
            organic: self.organic,
            target_synthetic_pct: self.config.target_synthetic_pct,
            actual_synthetic_pct: self.actual_synthetic_pct(),
            deviation_pct: self.deviation_pct(),
        }
    }
}
