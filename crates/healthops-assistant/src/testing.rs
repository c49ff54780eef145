//! 테스트용 포트 구현.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use healthops_core::error::CoreError;
use healthops_core::models::action::Action;
use healthops_core::models::completion::{CompletionReply, PromptMessage, ToolDefinition};
use healthops_core::models::context::DashboardContextSnapshot;
use healthops_core::models::dashboard::DashboardState;
use healthops_core::ports::action_handler::ActionHandler;
use healthops_core::ports::chat_completion::ChatCompletionClient;
use healthops_core::ports::context_source::DashboardContextSource;

/// 순서대로 응답을 돌려주는 클라이언트. 스크립트가 끝나면 `repeat` 응답을 반복하거나 에러.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<CompletionReply, CoreError>>>,
    repeat: Option<CompletionReply>,
    requests: Mutex<Vec<Vec<PromptMessage>>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Result<CompletionReply, CoreError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            repeat: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn always(reply: CompletionReply) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            repeat: Some(reply),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<Vec<PromptMessage>> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ChatCompletionClient for ScriptedClient {
    async fn complete(
        &self,
        messages: &[PromptMessage],
        _tools: &[ToolDefinition],
    ) -> Result<CompletionReply, CoreError> {
        self.requests.lock().push(messages.to_vec());
        let next = self.replies.lock().pop_front();
        match next {
            Some(reply) => reply,
            None => self
                .repeat
                .clone()
                .ok_or_else(|| CoreError::Internal("script exhausted".to_string())),
        }
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

/// 받은 액션을 기록하는 핸들러
#[derive(Default)]
pub struct RecordingHandler {
    actions: Mutex<Vec<Action>>,
}

impl RecordingHandler {
    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().clone()
    }
}

impl ActionHandler for RecordingHandler {
    fn on_action(&self, action: &Action) {
        self.actions.lock().push(action.clone());
    }
}

/// 고정 대시보드 상태
pub struct StaticContext(pub DashboardState);

impl DashboardContextSource for StaticContext {
    fn snapshot(&self) -> Option<DashboardContextSnapshot> {
        Some(DashboardContextSnapshot::build(&self.0))
    }
}
