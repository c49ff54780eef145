//! 승인 게이트 어시스턴트 세션.
//!
//! 상태 전이: `Idle → WaitingForResponse → Idle | AwaitingApproval → Idle`.
//! 제출은 `Idle`에서만 허용되고 세션은 `&mut self`로만 구동되므로
//! 동시에 진행 중인 AI 요청과 대기 액션은 각각 최대 하나다.

use std::sync::Arc;

use tracing::{debug, info, warn};

use healthops_core::config::AssistantConfig;
use healthops_core::error::CoreError;
use healthops_core::models::action::{Action, ActionKind};
use healthops_core::models::chat::PendingAction;
use healthops_core::models::completion::{PromptMessage, ToolDefinition};
use healthops_core::models::tool::tool_definitions;
use healthops_core::ports::action_handler::ActionHandler;
use healthops_core::ports::chat_completion::ChatCompletionClient;
use healthops_core::ports::context_source::DashboardContextSource;

use crate::agent_loop::{AgentLoop, LoopOutcome};
use crate::command_parser::parse_command;
use crate::conversation::Conversation;
use crate::feedback::{
    action_feedback, apology, approval_prompt, approved_message, ACTION_APPLIED, CLARIFICATION,
    FALLBACK_REPLY, GREETING, REFUSAL,
};
use crate::prompt::{build_messages, PROACTIVE_KICKOFF};

/// 세션 상태
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// 입력 대기
    Idle,
    /// AI 응답 대기 (입력 비활성)
    WaitingForResponse,
    /// 제안된 액션의 승인/거절 대기 (입력 비활성)
    AwaitingApproval(PendingAction),
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::WaitingForResponse => "waiting_for_response",
            SessionState::AwaitingApproval(_) => "awaiting_approval",
        }
    }
}

/// 사용자 턴 하나의 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// 결정적 경로에서 즉시 디스패치
    Dispatched(Action),
    /// 승인 대기 액션을 세움 (설명)
    Staged(String),
    /// 텍스트로만 응답
    Replied,
    /// 인식하지 못함 (안내 메시지 추가)
    NotUnderstood,
    /// 원격 AI 실패 (사과 메시지 추가)
    Failed,
}

/// 어시스턴트 세션
pub struct AssistantSession {
    conversation: Conversation,
    state: SessionState,
    handler: Arc<dyn ActionHandler>,
    client: Option<Arc<dyn ChatCompletionClient>>,
    context: Option<Arc<dyn DashboardContextSource>>,
    config: AssistantConfig,
    tools: Vec<ToolDefinition>,
}

impl AssistantSession {
    /// 결정적 파서만 쓰는 세션
    pub fn new(handler: Arc<dyn ActionHandler>) -> Self {
        Self {
            conversation: Conversation::new(),
            state: SessionState::Idle,
            handler,
            client: None,
            context: None,
            config: AssistantConfig::default(),
            tools: tool_definitions(),
        }
    }

    /// AI 클라이언트 연결 (없으면 결정적 파서만 사용)
    pub fn with_client(mut self, client: Arc<dyn ChatCompletionClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_context_source(mut self, context: Arc<dyn DashboardContextSource>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_config(mut self, config: AssistantConfig) -> Self {
        self.config = config;
        self
    }

    /// 실행 중 설정 교체 (다음 턴부터 적용)
    pub fn set_config(&mut self, config: AssistantConfig) {
        debug!(
            max_round_trips = config.max_round_trips,
            prefer_local_commands = config.prefer_local_commands,
            "어시스턴트 설정 교체"
        );
        self.config = config;
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn pending_action(&self) -> Option<&PendingAction> {
        match &self.state {
            SessionState::AwaitingApproval(pending) => Some(pending),
            _ => None,
        }
    }

    /// 입력 가능 여부
    pub fn can_submit(&self) -> bool {
        self.state == SessionState::Idle
    }

    pub fn ai_enabled(&self) -> bool {
        self.client.is_some()
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = self.state.name(), to = next.name(), "세션 상태 전이");
        self.state = next;
    }

    /// 첫 인사
    ///
    /// AI와 대시보드 스냅샷이 모두 있으면 능동 턴 한 번을 돌리고,
    /// 그렇지 않거나 실패/응답 없음이면 고정 인사를 쓴다.
    pub async fn start(&mut self) {
        if !self.conversation.is_empty() {
            return;
        }

        let proactive = self
            .client
            .clone()
            .filter(|_| self.config.proactive_greeting)
            .zip(self.context.as_ref().and_then(|c| c.snapshot()));

        let Some((client, snapshot)) = proactive else {
            self.conversation.push_assistant(GREETING);
            return;
        };

        self.transition(SessionState::WaitingForResponse);
        let messages = build_messages(
            Some(&snapshot),
            vec![PromptMessage::user(PROACTIVE_KICKOFF)],
        );

        match self.run_loop(client.as_ref(), messages).await {
            Ok(outcome) if outcome.staged.is_some() || outcome.text.is_some() => {
                self.settle(outcome);
            }
            Ok(_) => {
                debug!("능동 인사 응답 없음, 고정 인사 사용");
                self.conversation.push_assistant(GREETING);
                self.transition(SessionState::Idle);
            }
            Err(e) => {
                warn!(error = %e, "능동 인사 실패, 고정 인사 사용");
                self.conversation.push_assistant(GREETING);
                self.transition(SessionState::Idle);
            }
        }
    }

    /// 사용자 입력 제출
    ///
    /// `Idle`이 아니면 거부한다. 입력은 어떤 경로든 먼저 사용자 턴으로 기록된다.
    pub async fn submit(&mut self, text: &str) -> Result<TurnOutcome, CoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CoreError::Validation {
                field: "text".to_string(),
                message: "빈 입력".to_string(),
            });
        }
        if !self.can_submit() {
            return Err(CoreError::InvalidState(format!(
                "입력 불가 상태: {}",
                self.state.name()
            )));
        }

        self.conversation.push_user(text);

        let Some(client) = self.client.clone() else {
            return Ok(self.dispatch_local(text));
        };

        if self.config.prefer_local_commands {
            if let Some(action) = parse_command(text) {
                return Ok(self.dispatch_parsed(action));
            }
        }

        self.transition(SessionState::WaitingForResponse);
        let snapshot = self.context.as_ref().and_then(|c| c.snapshot());
        let messages = build_messages(snapshot.as_ref(), self.conversation.history_for_model());

        match self.run_loop(client.as_ref(), messages).await {
            Ok(outcome) => Ok(self.settle(outcome)),
            Err(e) => {
                warn!(error = %e, provider = client.provider_name(), "AI 턴 실패");
                self.conversation.push_assistant(apology(&e.to_string()));
                self.transition(SessionState::Idle);
                Ok(TurnOutcome::Failed)
            }
        }
    }

    /// 대기 액션 승인: 정확히 한 번 디스패치
    pub fn approve(&mut self) -> Result<Action, CoreError> {
        let pending = self.take_pending()?;
        self.handler.on_action(&pending.action);
        self.conversation
            .push_annotated(approved_message(&pending.action), pending.description.clone());
        info!(
            tool = %pending.tool_name,
            action = %pending.action,
            "대기 액션 승인"
        );
        Ok(pending.action)
    }

    /// 대기 액션 거절: 디스패치 없음
    pub fn deny(&mut self) -> Result<(), CoreError> {
        let pending = self.take_pending()?;
        self.conversation.push_assistant(REFUSAL);
        info!(tool = %pending.tool_name, action = %pending.action, "대기 액션 거절");
        Ok(())
    }

    fn take_pending(&mut self) -> Result<PendingAction, CoreError> {
        match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::AwaitingApproval(pending) => {
                debug!(from = "awaiting_approval", to = "idle", "세션 상태 전이");
                Ok(pending)
            }
            other => {
                let name = other.name();
                self.state = other;
                Err(CoreError::InvalidState(format!(
                    "승인 대기 중인 액션 없음: {name}"
                )))
            }
        }
    }

    async fn run_loop(
        &self,
        client: &dyn ChatCompletionClient,
        messages: Vec<PromptMessage>,
    ) -> Result<LoopOutcome, CoreError> {
        AgentLoop::new(client, self.handler.as_ref())
            .with_max_round_trips(self.config.max_round_trips)
            .run(messages, &self.tools)
            .await
    }

    /// 루프 결과를 대화와 상태에 반영
    fn settle(&mut self, outcome: LoopOutcome) -> TurnOutcome {
        if let Some(pending) = outcome.staged {
            let text = outcome
                .text
                .unwrap_or_else(|| approval_prompt(&pending.description));
            self.conversation.push_assistant(text);
            let description = pending.description.clone();
            self.transition(SessionState::AwaitingApproval(pending));
            return TurnOutcome::Staged(description);
        }

        let text = outcome.text.unwrap_or_else(|| FALLBACK_REPLY.to_string());
        self.conversation.push_assistant(text);
        self.transition(SessionState::Idle);
        TurnOutcome::Replied
    }

    fn dispatch_local(&mut self, text: &str) -> TurnOutcome {
        match parse_command(text) {
            Some(action) => self.dispatch_parsed(action),
            None => {
                self.conversation.push_assistant(CLARIFICATION);
                TurnOutcome::NotUnderstood
            }
        }
    }

    fn dispatch_parsed(&mut self, action: Action) -> TurnOutcome {
        self.handler.on_action(&action);
        let feedback = action_feedback(&action);
        if action.kind() == ActionKind::ShowHelp {
            self.conversation.push_assistant(feedback);
        } else {
            self.conversation.push_annotated(feedback, ACTION_APPLIED);
        }
        info!(action = %action, "명령 디스패치");
        TurnOutcome::Dispatched(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingHandler, ScriptedClient, StaticContext};
    use healthops_core::models::chat::ChatRole;
    use healthops_core::models::completion::{CompletionReply, PromptRole};
    use healthops_core::models::dashboard::DashboardState;
    use serde_json::json;

    fn local_session() -> (AssistantSession, Arc<RecordingHandler>) {
        let handler = Arc::new(RecordingHandler::default());
        (AssistantSession::new(handler.clone()), handler)
    }

    fn ai_session(
        replies: Vec<Result<CompletionReply, CoreError>>,
    ) -> (AssistantSession, Arc<RecordingHandler>, Arc<ScriptedClient>) {
        let handler = Arc::new(RecordingHandler::default());
        let client = Arc::new(ScriptedClient::new(replies));
        let session = AssistantSession::new(handler.clone())
            .with_client(client.clone())
            .with_context_source(Arc::new(StaticContext(DashboardState::default())));
        (session, handler, client)
    }

    fn filter_3_east() -> CompletionReply {
        CompletionReply::tool_call("call_1", "filter_unit", json!({"unit": "3 East"}))
    }

    fn last_content(session: &AssistantSession) -> String {
        session.conversation().last().unwrap().content.clone()
    }

    #[tokio::test]
    async fn local_operational_command_dispatches_with_feedback() {
        let (mut session, handler) = local_session();
        let outcome = session.submit("Move cleaning crews to 4 West").await.unwrap();

        assert_eq!(outcome, TurnOutcome::Dispatched(Action::reprioritize_evs("4 West")));
        assert_eq!(handler.actions(), vec![Action::reprioritize_evs("4 West")]);
        let last = session.conversation().last().unwrap();
        assert!(last.content.starts_with("Reprioritized EVS"));
        assert!(last.content.contains("4 West"));
        assert_eq!(last.action.as_deref(), Some(ACTION_APPLIED));
    }

    #[tokio::test]
    async fn local_unit_filter_and_approval_token() {
        let (mut session, handler) = local_session();
        session.submit("filter by 4 west").await.unwrap();
        session.submit("yes").await.unwrap();
        assert_eq!(
            handler.actions(),
            vec![Action::unit_filter("4 West"), Action::reprioritize_evs("4 West")]
        );
    }

    #[tokio::test]
    async fn local_miss_appends_clarification() {
        let (mut session, handler) = local_session();
        let outcome = session.submit("asdkjh").await.unwrap();

        assert_eq!(outcome, TurnOutcome::NotUnderstood);
        assert!(handler.actions().is_empty());
        assert_eq!(last_content(&session), CLARIFICATION);
        assert_eq!(session.conversation().len(), 2);
        assert_eq!(session.conversation().messages()[0].role, ChatRole::User);
    }

    #[tokio::test]
    async fn help_has_no_annotation() {
        let (mut session, _) = local_session();
        session.submit("help").await.unwrap();
        assert!(session.conversation().last().unwrap().action.is_none());
    }

    #[tokio::test]
    async fn blank_input_is_rejected_without_turn() {
        let (mut session, _) = local_session();
        assert!(session.submit("   ").await.is_err());
        assert!(session.conversation().is_empty());
    }

    #[tokio::test]
    async fn ai_tool_call_is_staged_for_approval() {
        let (mut session, handler, _) = ai_session(vec![Ok(filter_3_east())]);
        let outcome = session.submit("focus on 3 east").await.unwrap();

        assert_eq!(outcome, TurnOutcome::Staged("Filter to 3 East".to_string()));
        let pending = session.pending_action().unwrap();
        assert_eq!(pending.description, "Filter to 3 East");
        assert_eq!(pending.tool_name, "filter_unit");
        assert!(!session.can_submit());
        assert!(handler.actions().is_empty());
        assert_eq!(last_content(&session), "I suggest: Filter to 3 East. Approve?");
    }

    #[tokio::test]
    async fn submission_rejected_while_pending() {
        let (mut session, _, client) = ai_session(vec![Ok(filter_3_east()), Ok(filter_3_east())]);
        session.submit("focus on 3 east").await.unwrap();

        let turns = session.conversation().len();
        let err = session.submit("and 5 north").await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
        assert_eq!(session.conversation().len(), turns);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn deny_dispatches_nothing_and_clears_once() {
        let (mut session, handler, _) = ai_session(vec![Ok(filter_3_east())]);
        session.submit("focus on 3 east").await.unwrap();

        session.deny().unwrap();
        assert!(handler.actions().is_empty());
        assert_eq!(last_content(&session), REFUSAL);
        assert_eq!(session.state(), &SessionState::Idle);
        assert!(session.deny().is_err());
        assert!(session.approve().is_err());
        assert!(handler.actions().is_empty());
    }

    #[tokio::test]
    async fn approve_dispatches_exactly_once() {
        let (mut session, handler, _) = ai_session(vec![Ok(filter_3_east())]);
        session.submit("focus on 3 east").await.unwrap();

        let action = session.approve().unwrap();
        assert_eq!(action, Action::unit_filter("3 East"));
        assert_eq!(handler.actions(), vec![Action::unit_filter("3 East")]);

        let last = session.conversation().last().unwrap();
        assert_eq!(last.content, "Done. Filtered rooms to 3 East.");
        assert_eq!(last.action.as_deref(), Some("Filter to 3 East"));

        assert!(session.approve().is_err());
        assert_eq!(handler.actions().len(), 1);
        assert!(session.can_submit());
    }

    #[tokio::test]
    async fn staged_text_from_model_is_kept() {
        let mut reply = filter_3_east();
        reply.content = Some("3 East has the most blocked rooms. Filter to it?".to_string());
        let (mut session, _, _) = ai_session(vec![Ok(reply)]);
        session.submit("what now").await.unwrap();
        assert_eq!(
            last_content(&session),
            "3 East has the most blocked rooms. Filter to it?"
        );
    }

    #[tokio::test]
    async fn text_reply_and_fallback() {
        let (mut session, _, _) = ai_session(vec![
            Ok(CompletionReply::text("4 West is busiest.")),
            Ok(CompletionReply::default()),
        ]);
        assert_eq!(session.submit("status?").await.unwrap(), TurnOutcome::Replied);
        assert_eq!(last_content(&session), "4 West is busiest.");

        session.submit("ok").await.unwrap();
        assert_eq!(last_content(&session), FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn unmappable_tool_falls_back_to_text() {
        let mut reply = CompletionReply::tool_call("c", "page_director", json!({}));
        reply.content = Some("Paging the director.".to_string());
        let (mut session, handler, _) = ai_session(vec![Ok(reply)]);

        assert_eq!(session.submit("escalate").await.unwrap(), TurnOutcome::Replied);
        assert!(session.pending_action().is_none());
        assert_eq!(last_content(&session), "Paging the director.");
        assert!(handler.actions().is_empty());
    }

    #[tokio::test]
    async fn remote_error_becomes_apology_and_returns_to_idle() {
        let (mut session, handler, _) = ai_session(vec![
            Err(CoreError::remote(Some(401), "Incorrect API key provided")),
            Ok(CompletionReply::text("Back online.")),
        ]);

        let outcome = session.submit("filter by 3 east").await.unwrap();
        assert_eq!(outcome, TurnOutcome::Failed);
        assert_eq!(session.state(), &SessionState::Idle);
        let apology_text = last_content(&session);
        assert!(apology_text.contains("Incorrect API key provided"));
        assert!(apology_text.contains("Filter by 4 West"));
        assert!(handler.actions().is_empty());

        session.submit("hello").await.unwrap();
        assert_eq!(last_content(&session), "Back online.");
    }

    #[tokio::test]
    async fn ai_request_carries_snapshot_and_history() {
        let (mut session, _, client) = ai_session(vec![Ok(CompletionReply::text("ok"))]);
        session.submit("show me 4 west").await.unwrap();

        let requests = client.requests();
        let messages = &requests[0];
        assert_eq!(messages[0].role, PromptRole::System);
        assert!(messages[0].content.as_deref().unwrap().contains("\"currentFilters\""));
        assert_eq!(messages.last().unwrap().content.as_deref(), Some("show me 4 west"));
    }

    #[tokio::test]
    async fn prefer_local_commands_skips_model_on_match() {
        let (session, handler, client) = ai_session(vec![Ok(CompletionReply::text("unused"))]);
        let mut session = session.with_config(AssistantConfig {
            prefer_local_commands: true,
            ..AssistantConfig::default()
        });

        session.submit("filter by 5 north").await.unwrap();
        assert_eq!(handler.actions(), vec![Action::unit_filter("5 North")]);
        assert_eq!(client.calls(), 0);

        session.submit("what looks risky").await.unwrap();
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn replaced_config_applies_to_next_turn() {
        let (mut session, handler, client) = ai_session(vec![Ok(CompletionReply::text("ok"))]);
        session.submit("filter by 5 north").await.unwrap();
        assert_eq!(client.calls(), 1);

        session.set_config(AssistantConfig {
            prefer_local_commands: true,
            ..AssistantConfig::default()
        });
        session.submit("filter by 3 east").await.unwrap();
        assert_eq!(client.calls(), 1);
        assert_eq!(handler.actions(), vec![Action::unit_filter("3 East")]);
    }

    #[tokio::test]
    async fn start_without_ai_uses_static_greeting() {
        let (mut session, _) = local_session();
        session.start().await;
        assert_eq!(last_content(&session), GREETING);
        session.start().await;
        assert_eq!(session.conversation().len(), 1);
    }

    #[tokio::test]
    async fn start_without_snapshot_does_not_call_model() {
        let handler = Arc::new(RecordingHandler::default());
        let client = Arc::new(ScriptedClient::new(vec![Ok(CompletionReply::text("hi"))]));
        let mut session = AssistantSession::new(handler).with_client(client.clone());

        session.start().await;
        assert_eq!(last_content(&session), GREETING);
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn proactive_greeting_can_stage_action() {
        let mut reply = CompletionReply::tool_call(
            "call_p",
            "escalate_maintenance",
            json!({"unit": "4 West"}),
        );
        reply.content = Some("HVAC is blocking 4W-412B. Escalate maintenance?".to_string());
        let (mut session, handler, client) = ai_session(vec![Ok(reply)]);

        session.start().await;
        assert_eq!(client.calls(), 1);
        assert_eq!(
            client.requests()[0].last().unwrap().content.as_deref(),
            Some(PROACTIVE_KICKOFF)
        );
        assert_eq!(
            session.pending_action().unwrap().action,
            Action::escalate_maintenance("4 West")
        );
        assert!(handler.actions().is_empty());
    }

    #[tokio::test]
    async fn proactive_failure_falls_back_to_greeting() {
        let (mut session, _, _) = ai_session(vec![Err(CoreError::Network("timeout".into()))]);
        session.start().await;
        assert_eq!(last_content(&session), GREETING);
        assert!(session.can_submit());
    }

    #[tokio::test]
    async fn proactive_empty_reply_falls_back_to_greeting() {
        let (mut session, _, _) = ai_session(vec![Ok(CompletionReply::default())]);
        session.start().await;
        assert_eq!(last_content(&session), GREETING);
    }
}
