//! AI에 노출하는 tool 카탈로그.
//!
//! 도움말(ShowHelp)을 제외한 모든 [`ActionKind`]에 정확히 하나의 tool이 대응한다.
//! 파라미터 스키마는 정적 테이블에서 JSON Schema로 생성한다.

use serde_json::{json, Map, Value};

use super::action::ActionKind;
use super::completion::ToolDefinition;
use super::dashboard::{ALL_STATUSES, ALL_UNITS, UNIT_3_EAST, UNIT_4_WEST, UNIT_5_NORTH};

/// tool 파라미터 정의
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// 허용 값 (비어 있으면 자유 문자열)
    pub allowed: &'static [&'static str],
}

/// tool 정의
#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ActionKind,
    /// 모든 파라미터는 필수
    pub params: &'static [ParamSpec],
}

const PATIENT_UNITS: &[&str] = &[UNIT_4_WEST, UNIT_3_EAST, UNIT_5_NORTH];
const FILTER_UNITS: &[&str] = &[UNIT_4_WEST, UNIT_3_EAST, UNIT_5_NORTH, ALL_UNITS];
const STATUSES: &[&str] = &["Ready", "Cleaning", "Blocked", "Unknown", ALL_STATUSES];
const TABS: &[&str] = &["alerts", "data-health"];

const UNIT_PARAM: ParamSpec = ParamSpec {
    name: "unit",
    description: "Hospital unit",
    allowed: PATIENT_UNITS,
};

/// 고정 tool 카탈로그
pub const TOOL_CATALOG: &[ToolSpec] = &[
    ToolSpec {
        name: "filter_unit",
        description: "Filter the room list to a single hospital unit.",
        kind: ActionKind::SetUnitFilter,
        params: &[ParamSpec {
            name: "unit",
            description: "Unit to show",
            allowed: FILTER_UNITS,
        }],
    },
    ToolSpec {
        name: "filter_status",
        description: "Filter the room list by readiness status.",
        kind: ActionKind::SetStatusFilter,
        params: &[ParamSpec {
            name: "status",
            description: "Readiness status to show",
            allowed: STATUSES,
        }],
    },
    ToolSpec {
        name: "show_blocked_only",
        description: "Show only rooms that are blocked.",
        kind: ActionKind::SetShowOnlyBlocked,
        params: &[],
    },
    ToolSpec {
        name: "search_rooms",
        description: "Search rooms by room id, unit, or blocker text.",
        kind: ActionKind::SetSearchQuery,
        params: &[ParamSpec {
            name: "query",
            description: "Search text, e.g. 4W-412 or HVAC",
            allowed: &[],
        }],
    },
    ToolSpec {
        name: "reset_filters",
        description: "Clear all room filters and the search text.",
        kind: ActionKind::ResetFilters,
        params: &[],
    },
    ToolSpec {
        name: "open_room",
        description: "Open the detail drawer for a room.",
        kind: ActionKind::OpenRoom,
        params: &[ParamSpec {
            name: "room_id",
            description: "Room id, e.g. 4W-412B",
            allowed: &[],
        }],
    },
    ToolSpec {
        name: "switch_tab",
        description: "Switch the side panel between alerts and data health.",
        kind: ActionKind::SwitchTab,
        params: &[ParamSpec {
            name: "tab",
            description: "Panel to show",
            allowed: TABS,
        }],
    },
    ToolSpec {
        name: "reprioritize_evs",
        description: "Reprioritize EVS cleaning crews to a unit and notify staff.",
        kind: ActionKind::ReprioritizeEvs,
        params: &[UNIT_PARAM],
    },
    ToolSpec {
        name: "escalate_maintenance",
        description: "Escalate maintenance to prioritize hardware work orders in a unit.",
        kind: ActionKind::EscalateMaintenance,
        params: &[UNIT_PARAM],
    },
    ToolSpec {
        name: "inform_staff",
        description: "Inform staff to focus cleaning on a unit.",
        kind: ActionKind::InformStaff,
        params: &[UNIT_PARAM],
    },
    ToolSpec {
        name: "show_notification",
        description: "Show a short notification banner to the operator.",
        kind: ActionKind::ShowToast,
        params: &[ParamSpec {
            name: "message",
            description: "Notification text",
            allowed: &[],
        }],
    },
];

impl ToolSpec {
    /// 모델에 보낼 tool 정의 (JSON Schema)
    pub fn definition(&self) -> ToolDefinition {
        let mut properties = Map::new();
        for param in self.params {
            let mut schema = json!({
                "type": "string",
                "description": param.description,
            });
            if !param.allowed.is_empty() {
                schema["enum"] = json!(param.allowed);
            }
            properties.insert(param.name.to_string(), schema);
        }
        let required: Vec<&str> = self.params.iter().map(|p| p.name).collect();

        ToolDefinition {
            name: self.name.to_string(),
            description: self.description.to_string(),
            parameters: json!({
                "type": "object",
                "properties": Value::Object(properties),
                "required": required,
            }),
        }
    }
}

/// 이름으로 tool 조회
pub fn find_tool(name: &str) -> Option<&'static ToolSpec> {
    TOOL_CATALOG.iter().find(|t| t.name == name)
}

/// 액션 종류에 대응하는 tool 조회 (ShowHelp는 None)
pub fn tool_for_kind(kind: ActionKind) -> Option<&'static ToolSpec> {
    TOOL_CATALOG.iter().find(|t| t.kind == kind)
}

/// 카탈로그 전체의 tool 정의
pub fn tool_definitions() -> Vec<ToolDefinition> {
    TOOL_CATALOG.iter().map(ToolSpec::definition).collect()
}
