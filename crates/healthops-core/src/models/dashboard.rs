//! 대시보드 라이브 상태 모델.
//!
//! 병실, 알림, 데이터 헬스, KPI, 필터, 활성 탭. 호스트 애플리케이션이 소유하며
//! 어시스턴트는 스냅샷([`super::context`])을 통해서만 읽는다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================
// 병동 / 상태 / 탭 라벨
// ============================================================

/// 정규 병동 라벨
pub const UNIT_4_WEST: &str = "4 West";
pub const UNIT_3_EAST: &str = "3 East";
pub const UNIT_5_NORTH: &str = "5 North";
/// 병동 필터 해제 값
pub const ALL_UNITS: &str = "All units";

/// 필터에 쓸 수 있는 병동 라벨 (필터 해제 값 포함)
pub const UNIT_LABELS: [&str; 4] = [UNIT_4_WEST, UNIT_3_EAST, UNIT_5_NORTH, ALL_UNITS];

/// 상태 필터 해제 값
pub const ALL_STATUSES: &str = "All statuses";

/// 자유 형식 병동 표기를 정규 라벨로 변환
///
/// "4 west", "4west", "4w", "4-West" → "4 West". 알 수 없는 병동은 None.
pub fn canonical_unit(raw: &str) -> Option<&'static str> {
    let key: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_lowercase();
    match key.as_str() {
        "4west" | "4w" => Some(UNIT_4_WEST),
        "3east" | "3e" => Some(UNIT_3_EAST),
        "5north" | "5n" => Some(UNIT_5_NORTH),
        "allunits" | "all" => Some(ALL_UNITS),
        _ => None,
    }
}

/// 상태 필터 값 정규화 ("ready" → "Ready", "all" → "All statuses")
pub fn canonical_status_filter(raw: &str) -> Option<&'static str> {
    let key = raw.trim().to_lowercase();
    if key == "all" || key == "all statuses" {
        return Some(ALL_STATUSES);
    }
    ReadinessStatus::from_label(&key).map(ReadinessStatus::label)
}

/// 병실 준비 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessStatus {
    Ready,
    Cleaning,
    Blocked,
    Unknown,
}

impl ReadinessStatus {
    pub const ALL: [ReadinessStatus; 4] = [
        ReadinessStatus::Ready,
        ReadinessStatus::Cleaning,
        ReadinessStatus::Blocked,
        ReadinessStatus::Unknown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ReadinessStatus::Ready => "Ready",
            ReadinessStatus::Cleaning => "Cleaning",
            ReadinessStatus::Blocked => "Blocked",
            ReadinessStatus::Unknown => "Unknown",
        }
    }

    /// 대소문자 무시 라벨 매칭
    pub fn from_label(raw: &str) -> Option<Self> {
        let key = raw.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(key))
    }
}

/// 대시보드 탭
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DashboardTab {
    #[default]
    #[serde(rename = "alerts")]
    Alerts,
    #[serde(rename = "data-health")]
    DataHealth,
}

impl DashboardTab {
    /// 내부 탭 ID
    pub fn id(self) -> &'static str {
        match self {
            DashboardTab::Alerts => "alerts",
            DashboardTab::DataHealth => "data-health",
        }
    }

    /// 표시 이름
    pub fn display_name(self) -> &'static str {
        match self {
            DashboardTab::Alerts => "Alerts",
            DashboardTab::DataHealth => "Data Health",
        }
    }

    /// 탭 ID 해석 ("data health", "Data-Health"도 허용)
    pub fn from_id(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().replace(' ', "-").as_str() {
            "alerts" | "alert" => Some(DashboardTab::Alerts),
            "data-health" => Some(DashboardTab::DataHealth),
            _ => None,
        }
    }
}

// ============================================================
// 라이브 데이터
// ============================================================

/// 병실
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub room_id: String,
    pub unit: String,
    pub status: ReadinessStatus,
    /// 준비도 점수 (0-100)
    pub readiness_score: u8,
    /// 예상 준비 시간 (분, 알 수 없으면 None)
    pub eta_minutes: Option<u32>,
    pub blockers: Vec<String>,
    /// 우선순위 사유
    pub why_prioritized: String,
    /// 데이터 신뢰도 (0.0 ~ 1.0)
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// 이 값 미만이면 자동 조치 전에 수동 확인이 필요하다
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.75;

impl Room {
    /// 신뢰도가 낮은지 (값이 없으면 낮은 것으로 본다)
    pub fn is_low_confidence(&self) -> bool {
        self.confidence.unwrap_or(0.0) < LOW_CONFIDENCE_THRESHOLD
    }
}

/// 알림 심각도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    High,
    Medium,
    Low,
    Info,
}

/// 운영 알림
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub title: String,
    pub severity: AlertSeverity,
    pub recommended_step: String,
    #[serde(default)]
    pub room_id: Option<String>,
}

/// 연동 시스템 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataHealthStatus {
    Ok,
    Degraded,
    Stale,
}

/// 데이터 헬스 항목
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataHealthItem {
    /// 시스템 이름 (예: "Bed Mgmt", "Maintenance CMMS")
    pub system: String,
    pub status: DataHealthStatus,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub degraded_reason: Option<String>,
}

/// KPI 추세
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

/// KPI 값 (숫자 또는 "4.2 min" 같은 텍스트)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KpiValue {
    Number(f64),
    Text(String),
}

/// KPI 지표
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiMetric {
    pub label: String,
    pub value: KpiValue,
    pub trend: Trend,
    pub caption: String,
}

/// 현재 필터 상태
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub unit: String,
    pub status: String,
    pub show_only_blocked: bool,
    pub search_query: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            unit: ALL_UNITS.to_string(),
            status: ALL_STATUSES.to_string(),
            show_only_blocked: false,
            search_query: String::new(),
        }
    }
}

impl FilterState {
    /// 필터 조건에 맞는 병실인지
    ///
    /// 검색어는 병실 ID, 병동, 차단 사유에 대해 대소문자 무시 부분 일치.
    pub fn matches(&self, room: &Room) -> bool {
        if self.unit != ALL_UNITS && room.unit != self.unit {
            return false;
        }
        if self.status != ALL_STATUSES && room.status.label() != self.status {
            return false;
        }
        if self.show_only_blocked && room.status != ReadinessStatus::Blocked {
            return false;
        }
        let query = self.search_query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        room.room_id.to_lowercase().contains(&query)
            || room.unit.to_lowercase().contains(&query)
            || room
                .blockers
                .iter()
                .any(|b| b.to_lowercase().contains(&query))
    }
}

/// 대시보드 전체 라이브 상태
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardState {
    pub rooms: Vec<Room>,
    pub alerts: Vec<Alert>,
    pub data_health: Vec<DataHealthItem>,
    pub kpis: Vec<KpiMetric>,
    pub filters: FilterState,
    pub active_tab: DashboardTab,
}

impl DashboardState {
    /// 현재 필터를 통과한 병실
    pub fn visible_rooms(&self) -> Vec<&Room> {
        self.rooms
            .iter()
            .filter(|r| self.filters.matches(r))
            .collect()
    }

    /// 대소문자 무시 병실 조회
    pub fn find_room(&self, room_id: &str) -> Option<&Room> {
        self.rooms
            .iter()
            .find(|r| r.room_id.eq_ignore_ascii_case(room_id.trim()))
    }
}
