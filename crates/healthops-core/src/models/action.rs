//! 액션 어휘.
//!
//! 호스트 애플리케이션이 이해하는 닫힌 작업 집합. 파서 또는 tool 호출 매핑이
//! 생성하며, 생성 후에는 변경되지 않고 디스패치만 된다.

use serde::{Deserialize, Serialize};

use super::dashboard::DashboardTab;
use crate::error::CoreError;

/// 액션 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    /// 병동(unit) 필터 변경
    SetUnitFilter,
    /// 준비 상태 필터 변경
    SetStatusFilter,
    /// 차단된 병실만 보기
    SetShowOnlyBlocked,
    /// 검색어 설정
    SetSearchQuery,
    /// 모든 필터 초기화
    ResetFilters,
    /// 병실 상세 열기
    OpenRoom,
    /// 탭 전환 (alerts / data-health)
    SwitchTab,
    /// 명령 도움말
    ShowHelp,
    /// EVS 청소 인력 재배치
    ReprioritizeEvs,
    /// 유지보수 에스컬레이션
    EscalateMaintenance,
    /// 직원 공지
    InformStaff,
    /// 토스트 알림 표시
    ShowToast,
}

impl ActionKind {
    /// 전체 종류 (선언 순서)
    pub const ALL: [ActionKind; 12] = [
        ActionKind::SetUnitFilter,
        ActionKind::SetStatusFilter,
        ActionKind::SetShowOnlyBlocked,
        ActionKind::SetSearchQuery,
        ActionKind::ResetFilters,
        ActionKind::OpenRoom,
        ActionKind::SwitchTab,
        ActionKind::ShowHelp,
        ActionKind::ReprioritizeEvs,
        ActionKind::EscalateMaintenance,
        ActionKind::InformStaff,
        ActionKind::ShowToast,
    ];

    /// 직렬화 이름 (camelCase)
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::SetUnitFilter => "setUnitFilter",
            ActionKind::SetStatusFilter => "setStatusFilter",
            ActionKind::SetShowOnlyBlocked => "setShowOnlyBlocked",
            ActionKind::SetSearchQuery => "setSearchQuery",
            ActionKind::ResetFilters => "resetFilters",
            ActionKind::OpenRoom => "openRoom",
            ActionKind::SwitchTab => "switchTab",
            ActionKind::ShowHelp => "showHelp",
            ActionKind::ReprioritizeEvs => "reprioritizeEvs",
            ActionKind::EscalateMaintenance => "escalateMaintenance",
            ActionKind::InformStaff => "informStaff",
            ActionKind::ShowToast => "showToast",
        }
    }

    /// 디스패치 전에 비어 있지 않은 payload가 반드시 필요한 종류인지
    pub fn requires_payload(self) -> bool {
        !matches!(
            self,
            ActionKind::ResetFilters | ActionKind::ShowHelp | ActionKind::SetShowOnlyBlocked
        )
    }

    /// 운영 액션 (EVS/유지보수/직원 공지) 여부
    pub fn is_operational(self) -> bool {
        matches!(
            self,
            ActionKind::ReprioritizeEvs | ActionKind::EscalateMaintenance | ActionKind::InformStaff
        )
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 불변 액션 값 객체
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    kind: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<String>,
}

impl Action {
    /// 검증을 거친 액션 생성
    pub fn new(kind: ActionKind, payload: Option<String>) -> Result<Self, CoreError> {
        let action = Self { kind, payload };
        action.validate()?;
        Ok(action)
    }

    pub fn unit_filter(unit: impl Into<String>) -> Self {
        Self::with_payload(ActionKind::SetUnitFilter, unit)
    }

    pub fn status_filter(status: impl Into<String>) -> Self {
        Self::with_payload(ActionKind::SetStatusFilter, status)
    }

    /// payload는 항상 "true"로 고정
    pub fn show_only_blocked() -> Self {
        Self::with_payload(ActionKind::SetShowOnlyBlocked, "true")
    }

    pub fn search(query: impl Into<String>) -> Self {
        Self::with_payload(ActionKind::SetSearchQuery, query)
    }

    pub fn reset_filters() -> Self {
        Self::bare(ActionKind::ResetFilters)
    }

    pub fn open_room(room_id: impl Into<String>) -> Self {
        Self::with_payload(ActionKind::OpenRoom, room_id)
    }

    pub fn switch_tab(tab: DashboardTab) -> Self {
        Self::with_payload(ActionKind::SwitchTab, tab.id())
    }

    pub fn show_help() -> Self {
        Self::bare(ActionKind::ShowHelp)
    }

    pub fn reprioritize_evs(unit: impl Into<String>) -> Self {
        Self::with_payload(ActionKind::ReprioritizeEvs, unit)
    }

    pub fn escalate_maintenance(unit: impl Into<String>) -> Self {
        Self::with_payload(ActionKind::EscalateMaintenance, unit)
    }

    pub fn inform_staff(unit: impl Into<String>) -> Self {
        Self::with_payload(ActionKind::InformStaff, unit)
    }

    pub fn show_toast(message: impl Into<String>) -> Self {
        Self::with_payload(ActionKind::ShowToast, message)
    }

    fn with_payload(kind: ActionKind, payload: impl Into<String>) -> Self {
        Self {
            kind,
            payload: Some(payload.into()),
        }
    }

    fn bare(kind: ActionKind) -> Self {
        Self {
            kind,
            payload: None,
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// payload 또는 빈 문자열
    pub fn payload_or_empty(&self) -> &str {
        self.payload.as_deref().unwrap_or("")
    }

    /// 디스패치 가능 여부 검증
    ///
    /// 파라미터가 필요한 종류는 비어 있지 않은 payload를 가져야 하고,
    /// SwitchTab은 알려진 탭 ID, SetShowOnlyBlocked는 불리언 문자열만 허용한다.
    pub fn validate(&self) -> Result<(), CoreError> {
        let payload = self.payload.as_deref().map(str::trim);

        if self.kind.requires_payload() && payload.map_or(true, str::is_empty) {
            return Err(CoreError::Validation {
                field: "payload".to_string(),
                message: format!("{} 액션에는 payload가 필요함", self.kind),
            });
        }

        match (self.kind, payload) {
            (ActionKind::SwitchTab, Some(tab)) if DashboardTab::from_id(tab).is_none() => {
                Err(CoreError::Validation {
                    field: "payload".to_string(),
                    message: format!("알 수 없는 탭: {tab}"),
                })
            }
            (ActionKind::SetShowOnlyBlocked, Some(flag)) if flag.parse::<bool>().is_err() => {
                Err(CoreError::Validation {
                    field: "payload".to_string(),
                    message: format!("불리언 문자열이 아님: {flag}"),
                })
            }
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.payload {
            Some(payload) => write!(f, "{}({})", self.kind, payload),
            None => write!(f, "{}", self.kind),
        }
    }
}
