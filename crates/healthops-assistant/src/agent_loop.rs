//! 유한 에이전트 루프.
//!
//! 모델 호출 → (텍스트 | tool 호출) 을 최대 `max_round_trips`번 반복한다.
//! 승인이 필요한 tool 호출을 만나면 대기 액션으로 세우고 즉시 멈춘다.
//! 전송 실패는 재시도 없이 루프를 중단하고 에러를 돌려준다.

use tracing::{debug, info};

use healthops_core::error::CoreError;
use healthops_core::models::action::Action;
use healthops_core::models::chat::PendingAction;
use healthops_core::models::completion::{PromptMessage, ToolDefinition};
use healthops_core::ports::action_handler::ActionHandler;
use healthops_core::ports::chat_completion::ChatCompletionClient;

use crate::feedback::{action_feedback, TOOL_EXECUTED_PREFIX};
use crate::tool_mapping::{decode_arguments, map_tool_call};

/// 왕복 횟수 기본 상한
pub const DEFAULT_MAX_ROUND_TRIPS: u32 = 5;

/// tool 호출 승인 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApprovalMode {
    /// 모든 tool 호출을 대기 액션으로 세운다 (대화형 세션)
    #[default]
    Required,
    /// 즉시 디스패치하고 실행 확인을 모델에 돌려준다 (무인 실행)
    Unattended,
}

/// 루프 결과
#[derive(Debug, Default)]
pub struct LoopOutcome {
    /// 마지막으로 받은 비어 있지 않은 텍스트
    pub text: Option<String>,
    /// 승인 대기로 세운 액션
    pub staged: Option<PendingAction>,
    /// 루프 안에서 디스패치된 액션
    pub dispatched: Vec<Action>,
    pub round_trips: u32,
}

/// 에이전트 루프
pub struct AgentLoop<'a> {
    client: &'a dyn ChatCompletionClient,
    handler: &'a dyn ActionHandler,
    max_round_trips: u32,
    mode: ApprovalMode,
}

impl<'a> AgentLoop<'a> {
    pub fn new(client: &'a dyn ChatCompletionClient, handler: &'a dyn ActionHandler) -> Self {
        Self {
            client,
            handler,
            max_round_trips: DEFAULT_MAX_ROUND_TRIPS,
            mode: ApprovalMode::Required,
        }
    }

    pub fn with_max_round_trips(mut self, max_round_trips: u32) -> Self {
        self.max_round_trips = max_round_trips.max(1);
        self
    }

    pub fn with_mode(mut self, mode: ApprovalMode) -> Self {
        self.mode = mode;
        self
    }

    /// 루프 실행
    pub async fn run(
        &self,
        mut messages: Vec<PromptMessage>,
        tools: &[ToolDefinition],
    ) -> Result<LoopOutcome, CoreError> {
        let mut outcome = LoopOutcome::default();

        while outcome.round_trips < self.max_round_trips {
            let reply = self.client.complete(&messages, tools).await?;
            outcome.round_trips += 1;

            if let Some(text) = reply.non_empty_text() {
                outcome.text = Some(text.to_string());
            }

            let Some(call) = reply.tool_calls.first().cloned() else {
                debug!(round = outcome.round_trips, "텍스트 응답, 루프 종료");
                break;
            };
            if reply.tool_calls.len() > 1 {
                debug!(
                    ignored = reply.tool_calls.len() - 1,
                    "한 턴에 여러 tool 호출, 첫 번째만 처리"
                );
            }

            let args = decode_arguments(&call.arguments);
            let Some(mapped) = map_tool_call(&call.name, &args) else {
                break;
            };

            if self.mode == ApprovalMode::Required {
                info!(
                    tool = %call.name,
                    action = %mapped.action,
                    "tool 호출을 승인 대기로 설정"
                );
                outcome.staged = Some(PendingAction {
                    tool_call_id: call.id,
                    tool_name: call.name,
                    args,
                    description: mapped.description,
                    action: mapped.action,
                });
                break;
            }

            self.handler.on_action(&mapped.action);
            let executed = format!("{TOOL_EXECUTED_PREFIX}{}", action_feedback(&mapped.action));
            debug!(
                round = outcome.round_trips,
                action = %mapped.action,
                "tool 호출 즉시 디스패치"
            );
            outcome.dispatched.push(mapped.action);

            let call_id = call.id.clone();
            messages.push(PromptMessage::assistant_tool_calls(
                reply.content.clone(),
                vec![call],
            ));
            messages.push(PromptMessage::tool_result(call_id, executed));
        }

        debug!(
            rounds = outcome.round_trips,
            max = self.max_round_trips,
            staged = outcome.staged.is_some(),
            "에이전트 루프 종료"
        );
        Ok(outcome)
    }
}
