//! 대화 모델.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::action::Action;

/// 대화 참여자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// 대화 메시지 (생성 후 불변)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
    /// 이 메시지와 함께 적용된 액션 설명 ("✓ Filter to 3 East")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content.into(), None)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content.into(), None)
    }

    /// 적용된 액션 설명이 붙은 어시스턴트 메시지
    pub fn assistant_with_action(content: impl Into<String>, action: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content.into(), Some(action.into()))
    }

    fn new(role: ChatRole, content: String, action: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            action,
            timestamp: Utc::now(),
        }
    }
}

/// 승인 대기 중인 액션
///
/// 세션당 최대 하나. 승인 또는 거절 시 소비된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingAction {
    /// 원본 tool 호출 ID
    pub tool_call_id: String,
    pub tool_name: String,
    /// 해석된 tool 인자
    pub args: Map<String, Value>,
    /// 사용자에게 보여줄 설명 ("Filter to 3 East")
    pub description: String,
    pub action: Action,
}
