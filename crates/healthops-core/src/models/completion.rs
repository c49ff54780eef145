//! Chat-completion 요청/응답 모델.
//!
//! 제공자 중립 형태. 실제 와이어 포맷 변환은 네트워크 어댑터가 담당한다.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 프롬프트 메시지 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
    Tool,
}

/// 모델이 요청한 tool 호출
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// JSON 인코딩된 인자 문자열 (해석 전)
    pub arguments: String,
}

/// 모델에 보내는 메시지
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::text(PromptRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text(PromptRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(PromptRole::Assistant, content)
    }

    /// tool 호출을 담은 어시스턴트 메시지
    pub fn assistant_tool_calls(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: PromptRole::Assistant,
            content,
            tool_calls,
            tool_call_id: None,
        }
    }

    /// tool 실행 결과 메시지
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Tool,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    fn text(role: PromptRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }
}

/// 모델에 노출하는 tool 정의
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema (object)
    pub parameters: Value,
}

/// 모델 응답 한 턴
///
/// 텍스트와 tool 호출이 동시에 올 수 있다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionReply {
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

impl CompletionReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    /// 인자를 JSON으로 인코딩한 단일 tool 호출 응답
    pub fn tool_call(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            content: None,
            tool_calls: vec![ToolCall {
                id: id.into(),
                name: name.into(),
                arguments: arguments.to_string(),
            }],
        }
    }

    /// 공백이 아닌 텍스트
    pub fn non_empty_text(&self) -> Option<&str> {
        self.content
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}
