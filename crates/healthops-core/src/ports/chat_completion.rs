//! Chat-completion 제공자 포트.
//!
//! 구현: `healthops-network` crate (`RemoteChatClient`)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::completion::{CompletionReply, PromptMessage, ToolDefinition};

/// tool-calling을 지원하는 chat-completion 클라이언트
///
/// 호출마다 정확히 한 번의 요청을 보내며 재시도하지 않는다.
#[async_trait]
pub trait ChatCompletionClient: Send + Sync {
    /// 메시지와 tool 카탈로그를 보내고 모델 응답 한 턴을 받는다
    async fn complete(
        &self,
        messages: &[PromptMessage],
        tools: &[ToolDefinition],
    ) -> Result<CompletionReply, CoreError>;

    /// 제공자 이름 (예: "openai", "scripted")
    fn provider_name(&self) -> &str;
}
