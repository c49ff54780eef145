//! 사용자에게 보여줄 고정 문구와 액션 피드백.

use healthops_core::models::action::{Action, ActionKind};
use healthops_core::models::dashboard::DashboardTab;

/// 명령 도움말
pub const HELP_MESSAGE: &str = "I can coordinate operational actions. Try saying:

• \"Move cleaning crews to 4 West\" — reprioritize EVS
• \"Escalate maintenance for 4 West\" — prioritize hardware there
• \"Inform staff to focus on 4 West\" — notify cleaners to focus on 4W
• \"Yes\" or \"Go ahead\" — approve the suggested actions
• \"Filter by 4 West\" — view rooms in that unit
• \"Open room 4W-412B\" — view room details

Tell me what you'd like me to do.";

/// 정적 첫 인사
pub const GREETING: &str = "We're seeing elevated demand in 4 West — 3 admissions pending. I can reprioritize cleaning crews there or escalate maintenance to prioritize 4W hardware. May I have permission to act? Reply \"yes\" or tell me which action you'd like.";

/// 파서 미스 응답
pub const CLARIFICATION: &str = "I didn't quite get that. Try 'Move cleaning crews to 4 West' or 'Escalate maintenance for 4 West'. Say 'help' for more options.";

/// 결정적 경로로 디스패치한 메시지의 주석
pub const ACTION_APPLIED: &str = "Action applied";

/// 거절 응답
pub const REFUSAL: &str = "Understood. I won't take that action. Let me know if you'd like something else.";

/// 모델이 아무 텍스트도 주지 않았을 때
pub const FALLBACK_REPLY: &str = "Okay. Let me know what you'd like me to do next.";

/// 도구 실행 확인 메시지 접두사 (모델에게 전달)
pub const TOOL_EXECUTED_PREFIX: &str = "Tool executed: ";

/// 액션 종류별 피드백 문장
pub fn action_feedback(action: &Action) -> String {
    let payload = action.payload_or_empty();
    match action.kind() {
        ActionKind::ReprioritizeEvs => {
            format!("Reprioritized EVS cleaning crews to {payload}. Staff notified.")
        }
        ActionKind::EscalateMaintenance => format!(
            "Escalated maintenance to prioritize {payload} hardware. Work orders reprioritized."
        ),
        ActionKind::InformStaff => format!("Staff informed to focus on cleaning {payload}."),
        ActionKind::SetUnitFilter => format!("Filtered rooms to {payload}."),
        ActionKind::SetStatusFilter => format!("Filtered to {payload} rooms."),
        ActionKind::SetShowOnlyBlocked => "Showing only blocked rooms.".to_string(),
        ActionKind::SetSearchQuery => format!("Searching for \"{payload}\"."),
        ActionKind::ResetFilters => "Cleared all filters.".to_string(),
        ActionKind::OpenRoom => format!("Opening room {payload}..."),
        ActionKind::SwitchTab => {
            let tab = DashboardTab::from_id(payload).unwrap_or_default();
            format!("Switched to {} tab.", tab.display_name())
        }
        ActionKind::ShowHelp => HELP_MESSAGE.to_string(),
        ActionKind::ShowToast => format!("Notification shown: \"{payload}\""),
    }
}

/// 승인 요청 문구 (모델이 설명을 붙이지 않았을 때)
pub fn approval_prompt(description: &str) -> String {
    format!("I suggest: {description}. Approve?")
}

/// 승인 후 결과 메시지
pub fn approved_message(action: &Action) -> String {
    format!("Done. {}", action_feedback(action))
}

/// 원격 AI 실패 사과 문구
pub fn apology(error_message: &str) -> String {
    format!(
        "Sorry, I couldn't reach the AI service ({error_message}). You can still use direct commands like 'Filter by 4 West' or 'Move cleaning crews to 4 West'."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operational_feedback_names_unit() {
        assert_eq!(
            action_feedback(&Action::reprioritize_evs("4 West")),
            "Reprioritized EVS cleaning crews to 4 West. Staff notified."
        );
        assert!(action_feedback(&Action::escalate_maintenance("3 East")).contains("3 East hardware"));
        assert!(action_feedback(&Action::inform_staff("5 North")).ends_with("cleaning 5 North."));
    }

    #[test]
    fn switch_tab_uses_display_name() {
        assert_eq!(
            action_feedback(&Action::switch_tab(DashboardTab::DataHealth)),
            "Switched to Data Health tab."
        );
        assert_eq!(
            action_feedback(&Action::switch_tab(DashboardTab::Alerts)),
            "Switched to Alerts tab."
        );
    }

    #[test]
    fn help_feedback_is_full_reference() {
        assert_eq!(action_feedback(&Action::show_help()), HELP_MESSAGE);
    }

    #[test]
    fn toast_feedback_echoes_message() {
        assert_eq!(
            action_feedback(&Action::show_toast("EVS paged")),
            "Notification shown: \"EVS paged\""
        );
    }

    #[test]
    fn composed_messages() {
        assert_eq!(approval_prompt("Filter to 3 East"), "I suggest: Filter to 3 East. Approve?");
        assert_eq!(
            approved_message(&Action::unit_filter("3 East")),
            "Done. Filtered rooms to 3 East."
        );
        assert!(apology("Incorrect API key provided").contains("Incorrect API key provided"));
    }
}
