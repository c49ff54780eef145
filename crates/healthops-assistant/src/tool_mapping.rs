//! tool 호출 → 액션 매핑.
//!
//! tool 이름으로 카탈로그를 조회하고, tool별 인자 레코드로 디코딩한 뒤
//! 검증된 [`Action`]과 한 줄 설명을 만든다. 실패는 `None` + 경고 로그.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use healthops_core::models::action::{Action, ActionKind};
use healthops_core::models::dashboard::{
    canonical_status_filter, canonical_unit, DashboardTab, ALL_UNITS,
};
use healthops_core::models::tool::find_tool;

/// 매핑 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedAction {
    pub action: Action,
    /// 승인 요청과 결과 주석에 쓰는 설명
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct UnitArgs {
    unit: String,
}

#[derive(Debug, Deserialize)]
struct StatusArgs {
    status: String,
}

#[derive(Debug, Deserialize)]
struct QueryArgs {
    query: String,
}

#[derive(Debug, Deserialize)]
struct RoomArgs {
    room_id: String,
}

#[derive(Debug, Deserialize)]
struct TabArgs {
    tab: String,
}

#[derive(Debug, Deserialize)]
struct MessageArgs {
    message: String,
}

/// JSON 인자 문자열 디코딩
///
/// 해석할 수 없거나 객체가 아니면 빈 맵으로 대체한다.
pub fn decode_arguments(raw: &str) -> Map<String, Value> {
    if raw.trim().is_empty() {
        return Map::new();
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            warn!(kind = %json_kind(&other), "tool 인자가 객체가 아님, 빈 인자로 대체");
            Map::new()
        }
        Err(e) => {
            warn!(error = %e, "tool 인자 JSON 파싱 실패, 빈 인자로 대체");
            Map::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn decode<T: DeserializeOwned>(tool: &str, args: &Map<String, Value>) -> Option<T> {
    serde_json::from_value(Value::Object(args.clone()))
        .map_err(|e| warn!(tool, error = %e, "tool 인자 디코딩 실패"))
        .ok()
}

fn non_empty(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|v| !v.is_empty())
}

/// 운영 액션 대상 병동 ("All units"는 불가)
fn patient_unit(raw: &str) -> Option<&'static str> {
    canonical_unit(raw).filter(|u| *u != ALL_UNITS)
}

/// tool 호출을 액션으로 변환
///
/// 알 수 없는 tool, 필수 인자 누락, 허용되지 않는 값이면 None.
pub fn map_tool_call(name: &str, args: &Map<String, Value>) -> Option<MappedAction> {
    let Some(tool) = find_tool(name) else {
        warn!(tool = name, "알 수 없는 tool, 제안 없음");
        return None;
    };

    let mapped = match tool.kind {
        ActionKind::SetUnitFilter => decode::<UnitArgs>(name, args)
            .and_then(|a| canonical_unit(&a.unit))
            .map(|unit| (Action::unit_filter(unit), format!("Filter to {unit}"))),
        ActionKind::SetStatusFilter => decode::<StatusArgs>(name, args)
            .and_then(|a| canonical_status_filter(&a.status))
            .map(|status| {
                (
                    Action::status_filter(status),
                    format!("Filter to {status} rooms"),
                )
            }),
        ActionKind::SetShowOnlyBlocked => Some((
            Action::show_only_blocked(),
            "Show only blocked rooms".to_string(),
        )),
        ActionKind::SetSearchQuery => decode::<QueryArgs>(name, args).and_then(|a| {
            non_empty(&a.query).map(|q| (Action::search(q), format!("Search for \"{q}\"")))
        }),
        ActionKind::ResetFilters => {
            Some((Action::reset_filters(), "Clear all filters".to_string()))
        }
        ActionKind::OpenRoom => decode::<RoomArgs>(name, args).and_then(|a| {
            non_empty(&a.room_id).map(|id| (Action::open_room(id), format!("Open room {id}")))
        }),
        ActionKind::SwitchTab => decode::<TabArgs>(name, args)
            .and_then(|a| DashboardTab::from_id(&a.tab))
            .map(|tab| {
                (
                    Action::switch_tab(tab),
                    format!("Switch to {} tab", tab.display_name()),
                )
            }),
        ActionKind::ReprioritizeEvs => decode::<UnitArgs>(name, args)
            .and_then(|a| patient_unit(&a.unit))
            .map(|unit| {
                (
                    Action::reprioritize_evs(unit),
                    format!("Reprioritize EVS crews to {unit}"),
                )
            }),
        ActionKind::EscalateMaintenance => decode::<UnitArgs>(name, args)
            .and_then(|a| patient_unit(&a.unit))
            .map(|unit| {
                (
                    Action::escalate_maintenance(unit),
                    format!("Escalate maintenance for {unit}"),
                )
            }),
        ActionKind::InformStaff => decode::<UnitArgs>(name, args)
            .and_then(|a| patient_unit(&a.unit))
            .map(|unit| {
                (
                    Action::inform_staff(unit),
                    format!("Inform staff to focus on {unit}"),
                )
            }),
        ActionKind::ShowToast => decode::<MessageArgs>(name, args).and_then(|a| {
            non_empty(&a.message).map(|m| {
                (
                    Action::show_toast(m),
                    format!("Show notification \"{m}\""),
                )
            })
        }),
        ActionKind::ShowHelp => None,
    };

    match mapped {
        Some((action, description)) if action.validate().is_ok() => {
            Some(MappedAction { action, description })
        }
        _ => {
            warn!(tool = name, "tool 인자 검증 실패, 제안 없음");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::action_feedback;
    use healthops_core::models::tool::TOOL_CATALOG;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("object expected"),
        }
    }

    /// 카탈로그 tool별 유효 인자
    fn valid_args(tool: &str) -> Map<String, Value> {
        args(match tool {
            "filter_unit" => json!({"unit": "3 East"}),
            "filter_status" => json!({"status": "Ready"}),
            "search_rooms" => json!({"query": "HVAC"}),
            "open_room" => json!({"room_id": "4W-412B"}),
            "switch_tab" => json!({"tab": "data-health"}),
            "reprioritize_evs" | "escalate_maintenance" | "inform_staff" => {
                json!({"unit": "4 West"})
            }
            "show_notification" => json!({"message": "EVS paged"}),
            _ => json!({}),
        })
    }

    #[test]
    fn filter_unit_maps_with_description() {
        let mapped = map_tool_call("filter_unit", &args(json!({"unit": "3 East"}))).unwrap();
        assert_eq!(mapped.action, Action::unit_filter("3 East"));
        assert_eq!(mapped.description, "Filter to 3 East");
    }

    #[test]
    fn unit_is_canonicalized() {
        let mapped = map_tool_call("reprioritize_evs", &args(json!({"unit": "4w"}))).unwrap();
        assert_eq!(mapped.action.payload(), Some("4 West"));
    }

    #[test]
    fn every_catalog_tool_maps_to_its_kind_and_feedback() {
        for tool in TOOL_CATALOG {
            let mapped = map_tool_call(tool.name, &valid_args(tool.name))
                .unwrap_or_else(|| panic!("{} 매핑 실패", tool.name));
            assert_eq!(mapped.action.kind(), tool.kind, "{}", tool.name);
            let feedback = action_feedback(&mapped.action);
            assert!(!feedback.is_empty());
            if let Some(payload) = mapped.action.payload().filter(|_| tool.kind.is_operational()) {
                assert!(feedback.contains(payload));
            }
        }
    }

    #[test]
    fn unknown_tool_is_none() {
        assert!(map_tool_call("delete_database", &Map::new()).is_none());
        assert!(map_tool_call("show_help", &Map::new()).is_none());
    }

    #[test]
    fn missing_or_invalid_arguments_are_none() {
        assert!(map_tool_call("filter_unit", &Map::new()).is_none());
        assert!(map_tool_call("filter_unit", &args(json!({"unit": "7 South"}))).is_none());
        assert!(map_tool_call("reprioritize_evs", &args(json!({"unit": "All units"}))).is_none());
        assert!(map_tool_call("search_rooms", &args(json!({"query": "  "}))).is_none());
        assert!(map_tool_call("switch_tab", &args(json!({"tab": "settings"}))).is_none());
        assert!(map_tool_call("open_room", &args(json!({"room_id": 412}))).is_none());
    }

    #[test]
    fn parameterless_tools_ignore_arguments() {
        let mapped = map_tool_call("reset_filters", &args(json!({"extra": true}))).unwrap();
        assert_eq!(mapped.action, Action::reset_filters());
        let mapped = map_tool_call("show_blocked_only", &Map::new()).unwrap();
        assert_eq!(mapped.action.payload(), Some("true"));
    }

    #[test]
    fn malformed_arguments_decode_to_empty() {
        assert!(decode_arguments("{not json").is_empty());
        assert!(decode_arguments("[1,2]").is_empty());
        assert!(decode_arguments("").is_empty());
        assert_eq!(decode_arguments(r#"{"unit":"3 East"}"#)["unit"], "3 East");
    }

    #[test]
    fn malformed_arguments_then_fail_mapping_gracefully() {
        let decoded = decode_arguments("{\"unit\": ");
        assert!(map_tool_call("filter_unit", &decoded).is_none());
        // 인자가 필요 없는 tool은 그대로 동작
        assert!(map_tool_call("reset_filters", &decoded).is_some());
    }
}
