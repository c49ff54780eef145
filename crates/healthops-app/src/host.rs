//! 대시보드 호스트.
//!
//! 어시스턴트가 디스패치한 액션을 라이브 대시보드 상태에 적용하고,
//! AI 요청마다 읽기 전용 스냅샷을 제공한다.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use healthops_assistant::feedback::action_feedback;
use healthops_core::models::action::{Action, ActionKind};
use healthops_core::models::context::DashboardContextSnapshot;
use healthops_core::models::dashboard::{
    DashboardState, DashboardTab, DataHealthStatus, FilterState, Room, LOW_CONFIDENCE_THRESHOLD,
};
use healthops_core::ports::action_handler::ActionHandler;
use healthops_core::ports::context_source::DashboardContextSource;
use healthops_core::ports::notifier::ToastNotifier;

/// 데이터 헬스 저하 기본 사유
pub const DEFAULT_DEGRADED_REASON: &str = "Integration not responding; data may be stale";

/// 운영 액션별 현재 집중 병동
pub type OperationalFocus = HashMap<ActionKind, String>;

#[derive(Debug, Default)]
struct HostState {
    dashboard: DashboardState,
    open_room: Option<String>,
    focus: OperationalFocus,
}

/// 라이브 대시보드 상태 소유자
pub struct DashboardHost {
    state: RwLock<HostState>,
    toast: Arc<dyn ToastNotifier>,
    toast_duration: Duration,
}

impl DashboardHost {
    pub fn new(
        dashboard: DashboardState,
        toast: Arc<dyn ToastNotifier>,
        toast_duration: Duration,
    ) -> Self {
        Self {
            state: RwLock::new(HostState {
                dashboard,
                ..HostState::default()
            }),
            toast,
            toast_duration,
        }
    }

    /// 현재 필터를 통과한 병실 (복사본)
    pub fn visible_rooms(&self) -> Vec<Room> {
        self.state
            .read()
            .dashboard
            .visible_rooms()
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn filters(&self) -> FilterState {
        self.state.read().dashboard.filters.clone()
    }

    pub fn active_tab(&self) -> DashboardTab {
        self.state.read().dashboard.active_tab
    }

    /// 상세 보기로 열린 병실
    pub fn open_room(&self) -> Option<Room> {
        let state = self.state.read();
        state
            .open_room
            .as_deref()
            .and_then(|id| state.dashboard.find_room(id))
            .cloned()
    }

    pub fn focus(&self) -> OperationalFocus {
        self.state.read().focus.clone()
    }

    /// 연동 시스템을 stale로 표시 (이름 대소문자 무시)
    ///
    /// 알 수 없는 시스템이면 false.
    pub fn degrade(&self, system: &str, reason: Option<&str>) -> bool {
        let mut state = self.state.write();
        let Some(item) = state
            .dashboard
            .data_health
            .iter_mut()
            .find(|item| item.system.eq_ignore_ascii_case(system.trim()))
        else {
            warn!(system, "알 수 없는 연동 시스템");
            return false;
        };

        item.status = DataHealthStatus::Stale;
        item.degraded_reason = Some(reason.unwrap_or(DEFAULT_DEGRADED_REASON).to_string());
        item.last_updated = Utc::now();
        info!(system = %item.system, "데이터 헬스 저하 모드 전환");
        true
    }

    fn apply(&self, action: &Action) -> Option<String> {
        let payload = action.payload_or_empty();
        let mut state = self.state.write();

        match action.kind() {
            ActionKind::SetUnitFilter => state.dashboard.filters.unit = payload.to_string(),
            ActionKind::SetStatusFilter => state.dashboard.filters.status = payload.to_string(),
            ActionKind::SetShowOnlyBlocked => {
                state.dashboard.filters.show_only_blocked = payload != "false";
            }
            ActionKind::SetSearchQuery => {
                state.dashboard.filters.search_query = payload.to_string();
            }
            ActionKind::ResetFilters => state.dashboard.filters = FilterState::default(),
            ActionKind::OpenRoom => {
                let Some(room) = state.dashboard.find_room(payload) else {
                    warn!(room_id = payload, "병실을 찾을 수 없음");
                    return Some(format!("Room {payload} not found"));
                };
                let room_id = room.room_id.clone();
                let warning = room.is_low_confidence().then(|| {
                    format!(
                        "Confidence below {LOW_CONFIDENCE_THRESHOLD} for {room_id}. Verify data before acting."
                    )
                });
                state.open_room = Some(room_id);
                return warning;
            }
            ActionKind::SwitchTab => {
                if let Some(tab) = DashboardTab::from_id(payload) {
                    state.dashboard.active_tab = tab;
                }
            }
            ActionKind::ShowHelp => {}
            ActionKind::ReprioritizeEvs
            | ActionKind::EscalateMaintenance
            | ActionKind::InformStaff => {
                state.focus.insert(action.kind(), payload.to_string());
                return Some(action_feedback(action));
            }
            ActionKind::ShowToast => return Some(payload.to_string()),
        }
        None
    }
}

impl ActionHandler for DashboardHost {
    fn on_action(&self, action: &Action) {
        debug!(action = %action, "액션 적용");
        // 토스트 출력은 상태 잠금 밖에서
        if let Some(message) = self.apply(action) {
            self.toast.show(&message, self.toast_duration);
        }
    }
}

impl DashboardContextSource for DashboardHost {
    fn snapshot(&self) -> Option<DashboardContextSnapshot> {
        Some(DashboardContextSnapshot::build(&self.state.read().dashboard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo_data::demo_dashboard;
    use healthops_core::models::dashboard::ReadinessStatus;

    #[derive(Default)]
    struct RecordingToast(parking_lot::Mutex<Vec<String>>);

    impl ToastNotifier for RecordingToast {
        fn show(&self, message: &str, _duration: Duration) {
            self.0.lock().push(message.to_string());
        }
    }

    fn host() -> (DashboardHost, Arc<RecordingToast>) {
        let toast = Arc::new(RecordingToast::default());
        let host = DashboardHost::new(demo_dashboard(), toast.clone(), Duration::from_millis(10));
        (host, toast)
    }

    fn ids(rooms: &[Room]) -> Vec<&str> {
        rooms.iter().map(|r| r.room_id.as_str()).collect()
    }

    #[test]
    fn filters_narrow_visible_rooms() {
        let (host, _) = host();
        assert_eq!(host.visible_rooms().len(), 7);

        host.on_action(&Action::unit_filter("3 East"));
        assert_eq!(ids(&host.visible_rooms()), vec!["3E-215", "3E-208", "3E-220"]);

        host.on_action(&Action::show_only_blocked());
        assert_eq!(ids(&host.visible_rooms()), vec!["3E-215"]);

        host.on_action(&Action::reset_filters());
        assert_eq!(host.filters(), FilterState::default());
        assert_eq!(host.visible_rooms().len(), 7);
    }

    #[test]
    fn status_and_search_filters() {
        let (host, _) = host();
        host.on_action(&Action::status_filter("Ready"));
        assert!(host
            .visible_rooms()
            .iter()
            .all(|r| r.status == ReadinessStatus::Ready));

        host.on_action(&Action::reset_filters());
        host.on_action(&Action::search("hvac"));
        assert_eq!(ids(&host.visible_rooms()), vec!["4W-412B"]);
    }

    #[test]
    fn open_room_and_switch_tab() {
        let (host, toast) = host();
        host.on_action(&Action::open_room("4w-412b"));
        assert_eq!(host.open_room().unwrap().room_id, "4W-412B");

        host.on_action(&Action::open_room("9Z-999"));
        assert_eq!(host.open_room().unwrap().room_id, "4W-412B");
        assert_eq!(toast.0.lock().as_slice(), ["Room 9Z-999 not found"]);

        host.on_action(&Action::switch_tab(DashboardTab::DataHealth));
        assert_eq!(host.active_tab(), DashboardTab::DataHealth);
    }

    #[test]
    fn low_confidence_room_warns_on_open() {
        let (host, toast) = host();
        host.on_action(&Action::open_room("4W-412B"));
        assert!(toast.0.lock().is_empty());

        host.on_action(&Action::open_room("3E-220"));
        assert_eq!(host.open_room().unwrap().room_id, "3E-220");
        assert_eq!(
            toast.0.lock().as_slice(),
            ["Confidence below 0.75 for 3E-220. Verify data before acting."]
        );
    }

    #[test]
    fn operational_actions_record_focus_and_toast() {
        let (host, toast) = host();
        host.on_action(&Action::reprioritize_evs("4 West"));
        host.on_action(&Action::escalate_maintenance("3 East"));

        let focus = host.focus();
        assert_eq!(focus[&ActionKind::ReprioritizeEvs], "4 West");
        assert_eq!(focus[&ActionKind::EscalateMaintenance], "3 East");
        assert_eq!(toast.0.lock().len(), 2);
        assert!(toast.0.lock()[0].contains("4 West"));
    }

    #[test]
    fn show_toast_passes_message_through() {
        let (host, toast) = host();
        host.on_action(&Action::show_toast("EVS paged"));
        assert_eq!(toast.0.lock().as_slice(), ["EVS paged"]);
    }

    #[test]
    fn degrade_marks_system_stale_in_snapshot() {
        let (host, _) = host();
        assert!(host.snapshot().unwrap().degraded_systems().is_empty());

        assert!(host.degrade("maintenance cmms", None));
        let snapshot = host.snapshot().unwrap();
        assert_eq!(snapshot.degraded_systems(), vec!["Maintenance CMMS"]);
        let item = snapshot
            .data_health
            .iter()
            .find(|d| d.system == "Maintenance CMMS")
            .unwrap();
        assert_eq!(item.status, DataHealthStatus::Stale);
        assert_eq!(item.degraded_reason.as_deref(), Some(DEFAULT_DEGRADED_REASON));

        assert!(!host.degrade("Pharmacy", None));
    }

    #[test]
    fn snapshot_reflects_current_filters() {
        let (host, _) = host();
        host.on_action(&Action::unit_filter("5 North"));
        let snapshot = host.snapshot().unwrap();
        assert_eq!(snapshot.current_filters.unit, "5 North");
        assert_eq!(snapshot.rooms.len(), 7);
    }
}
