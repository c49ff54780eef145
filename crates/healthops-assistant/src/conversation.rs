//! 대화 상태 (추가 전용 메시지 로그).

use healthops_core::models::chat::{ChatMessage, ChatRole};
use healthops_core::models::completion::PromptMessage;

/// 세션 대화 로그
///
/// 메시지는 추가만 되며 세션 내에서 삭제/수정되지 않는다.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> &ChatMessage {
        self.push(ChatMessage::user(content))
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) -> &ChatMessage {
        self.push(ChatMessage::assistant(content))
    }

    /// 액션 주석이 붙은 어시스턴트 메시지
    pub fn push_annotated(
        &mut self,
        content: impl Into<String>,
        action: impl Into<String>,
    ) -> &ChatMessage {
        self.push(ChatMessage::assistant_with_action(content, action))
    }

    fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// `from` 인덱스 이후 메시지
    pub fn since(&self, from: usize) -> &[ChatMessage] {
        self.messages.get(from..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// 모델에 보낼 대화 이력
    pub fn history_for_model(&self) -> Vec<PromptMessage> {
        self.messages
            .iter()
            .map(|m| match m.role {
                ChatRole::User => PromptMessage::user(m.content.clone()),
                ChatRole::Assistant => PromptMessage::assistant(m.content.clone()),
            })
            .collect()
    }
}
