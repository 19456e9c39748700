use pulse_boost::compliance::{ComplianceConfig, ComplianceMode, ComplianceMonitor};

const NOW: i64 = 1_700_000_000;

fn monitor() -> ComplianceMonitor {
    ComplianceMonitor::new(ComplianceConfig::default())
}

fn drain_kinds(receiver: &mut tokio::sync::broadcast::Receiver<pulse_boost::compliance::Notification>) -> Vec<String> {
    let mut kinds = Vec::new();
    while let Ok(notification) = receiver.try_recv() {
        kinds.push(notification.kind);
    }
    kinds
}

#[test]
fn starts_in_normal_mode_with_full_rate() {
    let monitor = monitor();
    assert_eq!(monitor.mode(), ComplianceMode::Normal);
    assert!((monitor.compliance_rate() - 100.0).abs() < 1e-6);
}

#[test]
fn rate_just_below_threshold_enters_recovery() {
    let mut monitor = monitor();
    let mode = monitor.record_cycle(100, 21, "price floor breaches", NOW);
    assert_eq!(mode, ComplianceMode::Recovery);
    assert!((monitor.compliance_rate() - 79.0).abs() < 1e-6);
}

#[test]
fn rate_exactly_at_threshold_stays_normal() {
    let mut monitor = monitor();
    let mode = monitor.record_cycle(100, 20, "price floor breaches", NOW);
    assert_eq!(mode, ComplianceMode::Normal);
    assert!((monitor.compliance_rate() - 80.0).abs() < 1e-6);
}

#[test]
fn five_violation_reports_enter_recovery() {
    let mut monitor = monitor();
    for cycle in 0..4 {
        let mode = monitor.record_cycle(100, 1, "isolated violation", NOW + cycle);
        assert_eq!(mode, ComplianceMode::Normal);
    }
    let mode = monitor.record_cycle(100, 1, "isolated violation", NOW + 4);
    assert_eq!(mode, ComplianceMode::Recovery);
}

#[test]
fn clean_cycles_record_no_reports() {
    let mut monitor = monitor();
    for cycle in 0..10 {
        monitor.record_cycle(50, 0, "sweep clean", NOW + cycle);
    }
    let status = monitor.status();
    assert_eq!(status.mode, ComplianceMode::Normal);
    assert!(status.recent_violations.is_empty());
    assert_eq!(status.violation_count, 0);
}

#[test]
fn critical_failure_always_forces_recovery() {
    let mut monitor = monitor();
    let mode = monitor.critical_failure("store unreachable", NOW);
    assert_eq!(mode, ComplianceMode::Recovery);
    let status = monitor.status();
    assert!(status.recent_violations[0].detail.contains("critical"));
}

#[test]
fn recovery_entry_is_idempotent() {
    let mut monitor = monitor();
    let mut receiver = monitor.subscribe();

    monitor.critical_failure("first failure", NOW);
    monitor.critical_failure("second failure", NOW + 1);
    monitor.record_cycle(10, 9, "still broken", NOW + 2);

    let kinds = drain_kinds(&mut receiver);
    let entries = kinds.iter().filter(|kind| *kind == "recovery_entered").count();
    assert_eq!(entries, 1);
    assert_eq!(monitor.mode(), ComplianceMode::Recovery);
}

#[test]
fn health_restored_leaves_recovery_and_resets_stats() {
    let mut monitor = monitor();
    monitor.record_cycle(100, 30, "bad batch", NOW);
    assert_eq!(monitor.mode(), ComplianceMode::Recovery);

    let mode = monitor.health_restored(NOW + 10);
    assert_eq!(mode, ComplianceMode::Normal);
    assert!((monitor.compliance_rate() - 100.0).abs() < 1e-6);
    assert!(monitor.status().recent_violations.is_empty());
}

#[test]
fn health_restored_is_idempotent() {
    let mut monitor = monitor();
    monitor.critical_failure("failure", NOW);
    let mut receiver = monitor.subscribe();

    monitor.health_restored(NOW + 1);
    monitor.health_restored(NOW + 2);

    let kinds = drain_kinds(&mut receiver);
    let exits = kinds.iter().filter(|kind| *kind == "recovery_exited").count();
    assert_eq!(exits, 1);
    assert_eq!(monitor.mode(), ComplianceMode::Normal);
}

#[test]
fn ring_buffer_is_bounded() {
    let mut monitor = monitor();
    for cycle in 0..25 {
        monitor.record_cycle(100, 1, "recurring violation", NOW + cycle);
    }
    let status = monitor.status();
    assert_eq!(status.recent_violations.len(), 10);
    assert_eq!(status.violation_count, 25);
}

#[test]
fn rolling_window_forgets_old_cycles() {
    let mut monitor = ComplianceMonitor::new(ComplianceConfig {
        cycle_window: 2,
        ..ComplianceConfig::default()
    });
    monitor.record_cycle(100, 20, "early batch", NOW);
    monitor.record_cycle(100, 0, "clean", NOW + 1);
    monitor.record_cycle(100, 0, "clean", NOW + 2);
    assert!((monitor.compliance_rate() - 100.0).abs() < 1e-6);
}
