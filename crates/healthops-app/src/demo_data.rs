//! 데모 대시보드 데이터.
//!
//! 병실 7개 (Ready 2, Cleaning 2, Blocked 2, Unknown 1), 알림 4개,
//! 연동 시스템 4개, KPI 4개.

use chrono::{DateTime, TimeZone, Utc};

use healthops_core::models::dashboard::{
    Alert, AlertSeverity, DashboardState, DataHealthItem, DataHealthStatus, KpiMetric, KpiValue,
    ReadinessStatus, Room, Trend,
};

#[allow(clippy::too_many_arguments)]
fn room(
    room_id: &str,
    unit: &str,
    status: ReadinessStatus,
    readiness_score: u8,
    eta_minutes: Option<u32>,
    blockers: &[&str],
    why_prioritized: &str,
    confidence: f64,
) -> Room {
    Room {
        room_id: room_id.to_string(),
        unit: unit.to_string(),
        status,
        readiness_score,
        eta_minutes,
        blockers: blockers.iter().map(|b| b.to_string()).collect(),
        why_prioritized: why_prioritized.to_string(),
        confidence: Some(confidence),
    }
}

fn alert(id: &str, title: &str, severity: AlertSeverity, step: &str, room_id: &str) -> Alert {
    Alert {
        id: id.to_string(),
        title: title.to_string(),
        severity,
        recommended_step: step.to_string(),
        room_id: Some(room_id.to_string()),
    }
}

fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 2, h, m, s)
        .single()
        .unwrap_or_default()
}

fn healthy(system: &str, last_updated: DateTime<Utc>) -> DataHealthItem {
    DataHealthItem {
        system: system.to_string(),
        status: DataHealthStatus::Ok,
        last_updated,
        degraded_reason: None,
    }
}

fn kpi(label: &str, value: KpiValue, trend: Trend, caption: &str) -> KpiMetric {
    KpiMetric {
        label: label.to_string(),
        value,
        trend,
        caption: caption.to_string(),
    }
}

fn demo_rooms() -> Vec<Room> {
    use ReadinessStatus::*;
    vec![
        room(
            "4W-412B",
            "4 West",
            Blocked,
            35,
            Some(45),
            &["HVAC work order", "Awaiting inspection"],
            "Admission pending; HVAC blocking turnover.",
            0.88,
        ),
        room(
            "4W-408A",
            "4 West",
            Cleaning,
            72,
            Some(18),
            &["EVS backlog"],
            "EVS queue backed up; patient expected in 25 min.",
            0.92,
        ),
        room(
            "3E-215",
            "3 East",
            Blocked,
            20,
            None,
            &["Plumbing work order", "Maintenance hold"],
            "SLA at risk; maintenance not yet dispatched.",
            0.85,
        ),
        room(
            "4W-401",
            "4 West",
            Ready,
            100,
            Some(0),
            &[],
            "Ready for next admission.",
            0.95,
        ),
        room(
            "3E-208",
            "3 East",
            Cleaning,
            65,
            Some(22),
            &["EVS backlog"],
            "High-priority admission slot in 30 min.",
            0.9,
        ),
        room(
            "5N-512",
            "5 North",
            Ready,
            100,
            Some(0),
            &[],
            "Available; low urgency.",
            0.93,
        ),
        room(
            "3E-220",
            "3 East",
            Unknown,
            0,
            None,
            &["Data stale"],
            "Integration stale; manual verification recommended.",
            0.42,
        ),
    ]
}

fn demo_alerts() -> Vec<Alert> {
    vec![
        alert(
            "a1",
            "Assigned-but-not-ready",
            AlertSeverity::High,
            "Review 4W-412B — admission pending",
            "4W-412B",
        ),
        alert(
            "a2",
            "SLA breached (EVS)",
            AlertSeverity::High,
            "Escalate EVS for 4W-408A",
            "4W-408A",
        ),
        alert(
            "a3",
            "SLA breached (Maintenance)",
            AlertSeverity::High,
            "Dispatch maintenance for 3E-215",
            "3E-215",
        ),
        alert(
            "a4",
            "Data stale / Integration down",
            AlertSeverity::Medium,
            "Check 3E-220 manually; verify integration",
            "3E-220",
        ),
    ]
}

/// 초기 연동 상태 (모두 정상)
fn demo_data_health() -> Vec<DataHealthItem> {
    vec![
        healthy("Bed Mgmt", at(10, 2, 0)),
        healthy("EVS Tasks", at(10, 1, 30)),
        healthy("Maintenance CMMS", at(9, 58, 0)),
        healthy("Patient Flow", at(10, 0, 15)),
    ]
}

fn demo_kpis() -> Vec<KpiMetric> {
    vec![
        kpi(
            "False-ready assignments (today)",
            KpiValue::Number(2.0),
            Trend::Down,
            "vs 5 yesterday",
        ),
        kpi(
            "Admission delays due to readiness",
            KpiValue::Number(3.0),
            Trend::Neutral,
            "vs 3 yesterday",
        ),
        kpi(
            "SLA breach detection time",
            KpiValue::Text("4.2 min".to_string()),
            Trend::Down,
            "avg time to flag",
        ),
        kpi(
            "AI recommendation acceptance rate",
            KpiValue::Text("78%".to_string()),
            Trend::Up,
            "last 7 days",
        ),
    ]
}

/// 기본 필터/탭의 데모 대시보드
pub fn demo_dashboard() -> DashboardState {
    DashboardState {
        rooms: demo_rooms(),
        alerts: demo_alerts(),
        data_health: demo_data_health(),
        kpis: demo_kpis(),
        ..DashboardState::default()
    }
}
