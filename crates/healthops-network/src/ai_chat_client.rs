//! 외부 AI chat-completions 클라이언트.
//!
//! OpenAI 호환 `POST /v1/chat/completions` 형식으로 대화 이력과 tool 카탈로그를 보내고
//! 텍스트 또는 tool 호출 한 턴을 돌려받는다. 재시도하지 않는다.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use healthops_core::config::AiConfig;
use healthops_core::error::CoreError;
use healthops_core::models::completion::{
    CompletionReply, PromptMessage, PromptRole, ToolCall, ToolDefinition,
};
use healthops_core::ports::chat_completion::ChatCompletionClient;

// ============================================================
// 와이어 포맷
// ============================================================

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunctionSpec<'a>,
}

#[derive(Debug, Serialize)]
struct WireFunctionSpec<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: PromptRole,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    kind: String,
    function: WireFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    /// JSON 문자열 그대로 전달
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireReplyMessage,
}

#[derive(Debug, Deserialize)]
struct WireReplyMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn function_type() -> String {
    "function".to_string()
}

impl From<&PromptMessage> for WireMessage {
    fn from(msg: &PromptMessage) -> Self {
        let tool_calls = (!msg.tool_calls.is_empty()).then(|| {
            msg.tool_calls
                .iter()
                .map(|call| WireToolCall {
                    id: call.id.clone(),
                    kind: function_type(),
                    function: WireFunctionCall {
                        name: call.name.clone(),
                        arguments: call.arguments.clone(),
                    },
                })
                .collect()
        });
        Self {
            role: msg.role,
            content: msg.content.clone(),
            tool_calls,
            tool_call_id: msg.tool_call_id.clone(),
        }
    }
}

impl From<WireToolCall> for ToolCall {
    fn from(call: WireToolCall) -> Self {
        Self {
            id: call.id,
            name: call.function.name,
            arguments: call.function.arguments,
        }
    }
}

// ============================================================
// RemoteChatClient
// ============================================================

/// 외부 chat-completions 클라이언트
///
/// API 키는 메모리에만 유지하며 로그에 남기지 않는다.
#[derive(Debug)]
pub struct RemoteChatClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl RemoteChatClient {
    /// 새 클라이언트 생성. API 키가 비어 있으면 설정 에러.
    pub fn new(config: &AiConfig) -> Result<Self, CoreError> {
        if !config.is_configured() {
            return Err(CoreError::Config("AI API 키 미설정".into()));
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        debug!(
            endpoint = %config.endpoint,
            model = %config.model,
            timeout = config.timeout_secs,
            "RemoteChatClient 초기화"
        );

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.trim().to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn build_request<'a>(
        &'a self,
        messages: &[PromptMessage],
        tools: &'a [ToolDefinition],
    ) -> CompletionRequest<'a> {
        let tools: Vec<WireTool<'a>> = tools
            .iter()
            .map(|t| WireTool {
                kind: "function",
                function: WireFunctionSpec {
                    name: &t.name,
                    description: &t.description,
                    parameters: &t.parameters,
                },
            })
            .collect();
        let tool_choice = (!tools.is_empty()).then_some("auto");

        CompletionRequest {
            model: &self.model,
            messages: messages.iter().map(WireMessage::from).collect(),
            tools,
            tool_choice,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// 비정상 응답에서 사용자에게 보여줄 메시지 추출
    fn error_message(status: reqwest::StatusCode, body: &str) -> String {
        serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .map(|e| e.error.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                format!(
                    "AI service returned status {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("")
                )
                .trim_end()
                .to_string()
            })
    }

    fn parse_reply(body: &str) -> Result<CompletionReply, CoreError> {
        let response: CompletionResponse = serde_json::from_str(body).map_err(|e| {
            CoreError::remote(None, format!("Unreadable response from AI service: {}", e))
        })?;

        let message = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| CoreError::remote(None, "AI service returned no choices"))?;

        Ok(CompletionReply {
            content: message.content,
            tool_calls: message
                .tool_calls
                .unwrap_or_default()
                .into_iter()
                .map(ToolCall::from)
                .collect(),
        })
    }
}

#[async_trait]
impl ChatCompletionClient for RemoteChatClient {
    async fn complete(
        &self,
        messages: &[PromptMessage],
        tools: &[ToolDefinition],
    ) -> Result<CompletionReply, CoreError> {
        let request = self.build_request(messages, tools);

        debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            messages = messages.len(),
            tools = tools.len(),
            "chat-completions 호출"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "AI API 호출 실패");
                CoreError::remote(None, format!("AI service request failed: {e}"))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| {
                warn!(error = %e, "AI API 응답 읽기 실패");
                CoreError::remote(None, format!("AI service response could not be read: {e}"))
            })?;

        if !status.is_success() {
            let message = Self::error_message(status, &body);
            warn!(status = %status, message = %message, "AI API 오류 응답");
            return Err(CoreError::remote(Some(status.as_u16()), message));
        }

        let reply = Self::parse_reply(&body)?;
        debug!(
            has_text = reply.content.is_some(),
            tool_calls = reply.tool_calls.len(),
            "chat-completions 응답 수신"
        );
        Ok(reply)
    }

    fn provider_name(&self) -> &str {
        &self.model
    }
}

// ============================================================
// 테스트
// ============================================================
