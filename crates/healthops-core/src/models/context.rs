//! 대시보드 컨텍스트 스냅샷.
//!
//! AI 요청마다 시스템 프롬프트에 포함되는 읽기 전용 요약. 라이브 상태에서
//! 필요한 필드만 골라 만들며, 직렬화 순서는 필드 선언 순서를 따른다.

use chrono::SecondsFormat;
use serde::{Serialize, Serializer};

use super::dashboard::{
    AlertSeverity, DashboardState, DashboardTab, DataHealthStatus, FilterState, KpiValue,
    ReadinessStatus, Trend,
};
use crate::error::CoreError;

/// ETA를 알 수 없을 때 표시 값
pub const UNKNOWN_ETA: &str = "unknown";

fn serialize_eta<S: Serializer>(eta: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
    match eta {
        Some(minutes) => serializer.serialize_u32(*minutes),
        None => serializer.serialize_str(UNKNOWN_ETA),
    }
}

/// 병실 요약
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub room_id: String,
    pub unit: String,
    pub status: ReadinessStatus,
    pub readiness_score: u8,
    #[serde(serialize_with = "serialize_eta")]
    pub eta_minutes: Option<u32>,
    pub blockers: Vec<String>,
    pub why_prioritized: String,
}

/// 알림 요약
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub title: String,
    pub severity: AlertSeverity,
    pub recommended_step: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
}

/// 데이터 헬스 요약
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataHealthSummary {
    pub system: String,
    pub status: DataHealthStatus,
    /// RFC 3339 (UTC, `Z` 접미사)
    pub last_updated: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded_reason: Option<String>,
}

/// KPI 요약
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    pub label: String,
    pub value: KpiValue,
    pub trend: Trend,
    pub caption: String,
}

/// AI 프롬프트용 대시보드 스냅샷
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardContextSnapshot {
    pub rooms: Vec<RoomSummary>,
    pub alerts: Vec<AlertSummary>,
    pub data_health: Vec<DataHealthSummary>,
    pub kpis: Vec<KpiSummary>,
    pub current_filters: FilterState,
    pub active_tab: DashboardTab,
}

impl DashboardContextSnapshot {
    /// 라이브 상태에서 스냅샷 생성
    ///
    /// 병실은 필터와 무관하게 전체를 포함한다. 필터 상태는 `current_filters`로 따로 전달.
    pub fn build(state: &DashboardState) -> Self {
        let rooms = state
            .rooms
            .iter()
            .map(|r| RoomSummary {
                room_id: r.room_id.clone(),
                unit: r.unit.clone(),
                status: r.status,
                readiness_score: r.readiness_score,
                eta_minutes: r.eta_minutes,
                blockers: r.blockers.clone(),
                why_prioritized: r.why_prioritized.clone(),
            })
            .collect();

        let alerts = state
            .alerts
            .iter()
            .map(|a| AlertSummary {
                title: a.title.clone(),
                severity: a.severity,
                recommended_step: a.recommended_step.clone(),
                room_id: a.room_id.clone(),
            })
            .collect();

        let data_health = state
            .data_health
            .iter()
            .map(|d| DataHealthSummary {
                system: d.system.clone(),
                status: d.status,
                last_updated: d.last_updated.to_rfc3339_opts(SecondsFormat::Secs, true),
                degraded_reason: d.degraded_reason.clone(),
            })
            .collect();

        let kpis = state
            .kpis
            .iter()
            .map(|k| KpiSummary {
                label: k.label.clone(),
                value: k.value.clone(),
                trend: k.trend,
                caption: k.caption.clone(),
            })
            .collect();

        Self {
            rooms,
            alerts,
            data_health,
            kpis,
            current_filters: state.filters.clone(),
            active_tab: state.active_tab,
        }
    }

    /// 시스템 프롬프트에 삽입할 들여쓰기 JSON
    pub fn to_prompt_text(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 품질이 저하된 연동 시스템 이름
    pub fn degraded_systems(&self) -> Vec<&str> {
        self.data_health
            .iter()
            .filter(|d| d.status != DataHealthStatus::Ok)
            .map(|d| d.system.as_str())
            .collect()
    }
}
