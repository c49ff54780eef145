//! AI 요청 프롬프트 구성.
//!
//! 시스템 메시지 = 고정 행동 지침 + 대시보드 스냅샷(있을 때) + 운영 지침.

use tracing::warn;

use healthops_core::models::completion::PromptMessage;
use healthops_core::models::context::DashboardContextSnapshot;

/// 고정 행동 지침
pub const BEHAVIOR_INSTRUCTIONS: &str = "You are Healthops Agent, an operations assistant embedded in a hospital room-readiness dashboard. \
You help bed management and EVS supervisors get rooms ready for admissions. \
Keep replies short: two or three sentences, plain text, no markdown tables. \
You can change dashboard filters, open rooms, switch panels, and coordinate EVS, maintenance, and staff through the provided tools. \
Never claim an action has happened until the operator approves it.";

/// 운영 지침
pub const OPERATING_INSTRUCTIONS: &str = "Analyze the current dashboard state. \
Suggest at most one action per turn by calling exactly one tool, and briefly explain why in your text. \
Every tool call is shown to the operator for approval before it runs. \
If a data source is stale or degraded, say so and lower your confidence.";

/// 능동 첫 턴 사용자 메시지
pub const PROACTIVE_KICKOFF: &str = "Review the dashboard and greet the operator with the most important issue right now. If one action would clearly help, propose it.";

/// 시스템 프롬프트 생성
///
/// 스냅샷 직렬화에 실패하면 스냅샷 없이 진행한다.
pub fn system_prompt(snapshot: Option<&DashboardContextSnapshot>) -> String {
    let mut prompt = String::from(BEHAVIOR_INSTRUCTIONS);

    if let Some(snapshot) = snapshot {
        match snapshot.to_prompt_text() {
            Ok(text) => {
                prompt.push_str("\n\nCurrent dashboard state (JSON):\n");
                prompt.push_str(&text);
            }
            Err(e) => warn!(error = %e, "대시보드 스냅샷 직렬화 실패, 스냅샷 없이 진행"),
        }
    }

    prompt.push_str("\n\n");
    prompt.push_str(OPERATING_INSTRUCTIONS);
    prompt
}

/// 시스템 메시지 + 대화 이력
pub fn build_messages(
    snapshot: Option<&DashboardContextSnapshot>,
    history: Vec<PromptMessage>,
) -> Vec<PromptMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(PromptMessage::system(system_prompt(snapshot)));
    messages.extend(history);
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthops_core::models::completion::PromptRole;
    use healthops_core::models::dashboard::DashboardState;

    #[test]
    fn prompt_without_snapshot_keeps_instructions() {
        let prompt = system_prompt(None);
        assert!(prompt.starts_with(BEHAVIOR_INSTRUCTIONS));
        assert!(prompt.ends_with(OPERATING_INSTRUCTIONS));
        assert!(!prompt.contains("dashboard state (JSON)"));
    }

    #[test]
    fn prompt_embeds_snapshot_between_instructions() {
        let snapshot = DashboardContextSnapshot::build(&DashboardState::default());
        let prompt = system_prompt(Some(&snapshot));
        let state_at = prompt.find("\"currentFilters\"").unwrap();
        let ops_at = prompt.find(OPERATING_INSTRUCTIONS).unwrap();
        assert!(state_at < ops_at);
        assert!(prompt.contains("\"unit\": \"All units\""));
    }

    #[test]
    fn messages_start_with_system() {
        let messages = build_messages(None, vec![PromptMessage::user("hi")]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, PromptRole::System);
        assert_eq!(messages[1].content.as_deref(), Some("hi"));
    }
}
