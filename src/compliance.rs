use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceConfig {
    pub rate_threshold: f64,
    pub recent_violation_cap: usize,
    pub ring_capacity: usize,
    pub cycle_window: usize,
    pub poll_interval_secs: u64,
    pub enforce_recovery_gate: bool,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            rate_threshold: 80.0,
            recent_violation_cap: 5,
            ring_capacity: 10,
            cycle_window: 20,
            poll_interval_secs: 30,
            enforce_recovery_gate: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceMode {
    Normal,
    Recovery,
}

impl ComplianceMode {
    pub fn label(self) -> &'static str {
        match self {
            ComplianceMode::Normal => "normal",
            ComplianceMode::Recovery => "recovery",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ViolationReport {
    pub count: u64,
    pub detail: String,
    pub observed_at: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub kind: String,
    pub message: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceStatus {
    pub mode: ComplianceMode,
    pub compliance_rate: f64,
    pub violation_count: u64,
    pub recent_violations: Vec<ViolationReport>,
}

#[derive(Debug, Clone, Copy)]
struct CycleStats {
    checked: u64,
    violations: u64,
}

// Process-wide state; a restart resets the mode to normal.
pub struct ComplianceMonitor {
    config: ComplianceConfig,
    mode: ComplianceMode,
    violation_count: u64,
    cycles: VecDeque<CycleStats>,
    recent: VecDeque<ViolationReport>,
    notifications: broadcast::Sender<Notification>,
}

impl ComplianceMonitor {
    pub fn new(config: ComplianceConfig) -> Self {
        let (notifications, _) = broadcast::channel(64);
        Self {
            config,
            mode: ComplianceMode::Normal,
            violation_count: 0,
            cycles: VecDeque::new(),
            recent: VecDeque::new(),
            notifications,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    pub fn mode(&self) -> ComplianceMode {
        self.mode
    }

    pub fn enforce_recovery_gate(&self) -> bool {
        self.config.enforce_recovery_gate
    }

    pub fn compliance_rate(&self) -> f64 {
        let checked: u64 = self.cycles.iter().map(|cycle| cycle.checked).sum();
        if checked == 0 {
            return 100.0;
        }
        let violations: u64 = self.cycles.iter().map(|cycle| cycle.violations).sum();
        let compliant = checked.saturating_sub(violations);
        compliant as f64 / checked as f64 * 100.0
    }

    pub fn record_cycle(
        &mut self,
        checked: u64,
        violations: u64,
        detail: &str,
        now: i64,
    ) -> ComplianceMode {
        self.violation_count += violations;

        self.cycles.push_back(CycleStats { checked, violations });
        while self.cycles.len() > self.config.cycle_window {
            self.cycles.pop_front();
        }

        if violations > 0 {
            self.push_report(ViolationReport {
                count: violations,
                detail: detail.to_string(),
                observed_at: now,
            });
        }

        if self.mode == ComplianceMode::Normal {
            let rate = self.compliance_rate();
            if rate < self.config.rate_threshold {
                self.enter_recovery(
                    format!("compliance rate {:.1}% dropped below {:.1}%", rate, self.config.rate_threshold),
                    now,
                );
            } else if self.recent.len() >= self.config.recent_violation_cap {
                self.enter_recovery(
                    format!("{} recent violation reports accumulated", self.recent.len()),
                    now,
                );
            }
        }

        self.mode
    }

    // Critical failures force recovery regardless of statistics.
    pub fn critical_failure(&mut self, message: &str, now: i64) -> ComplianceMode {
        self.violation_count += 1;
        self.push_report(ViolationReport {
            count: 1,
            detail: format!("critical: {}", message),
            observed_at: now,
        });
        tracing::error!(detail = message, "critical compliance failure");
        if self.mode == ComplianceMode::Normal {
            self.enter_recovery(format!("critical failure: {}", message), now);
        }
        self.mode
    }

    // Idempotent: restoring health while already normal emits nothing.
    pub fn health_restored(&mut self, now: i64) -> ComplianceMode {
        if self.mode == ComplianceMode::Recovery {
            self.mode = ComplianceMode::Normal;
            self.cycles.clear();
            self.recent.clear();
            tracing::info!("compliance health restored, leaving recovery mode");
            self.announce("recovery_exited", "system health restored", now);
        }
        self.mode
    }

    pub fn status(&self) -> ComplianceStatus {
        ComplianceStatus {
            mode: self.mode,
            compliance_rate: self.compliance_rate(),
            violation_count: self.violation_count,
            recent_violations: self.recent.iter().cloned().collect(),
        }
    }

    // Fire-and-forget; dropped sends (no subscribers) are fine. The mode
    // value, not the notification, is the authoritative output.
    pub fn announce(&self, kind: &str, message: &str, now: i64) {
        let _ = self.notifications.send(Notification {
            kind: kind.to_string(),
            message: message.to_string(),
            timestamp: now,
        });
    }

    fn push_report(&mut self, report: ViolationReport) {
        self.recent.push_back(report);
        while self.recent.len() > self.config.ring_capacity {
            self.recent.pop_front();
        }
    }

    fn enter_recovery(&mut self, reason: String, now: i64) {
        self.mode = ComplianceMode::Recovery;
        tracing::warn!(reason = reason.as_str(), "entering compliance recovery mode");
        self.announce("recovery_entered", &reason, now);
    }
}
