//! 애플리케이션 설정 구조체.
//!
//! AI 엔드포인트, 어시스턴트 루프, 알림 설정. JSON 파일에서 로드하며
//! 누락된 필드는 기본값으로 채운다.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;

/// API 키 환경 변수 이름
pub const API_KEY_ENV: &str = "HEALTHOPS_AI_API_KEY";

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 외부 AI 설정
    #[serde(default)]
    pub ai: AiConfig,
    /// 어시스턴트 동작 설정
    #[serde(default)]
    pub assistant: AssistantConfig,
    /// 알림 설정
    #[serde(default)]
    pub notification: NotificationConfig,
}

// ============================================================
// AI 설정
// ============================================================

/// 외부 chat-completions API 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// chat-completions 엔드포인트 URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Bearer 토큰. 비어 있으면 AI 경로 비활성 (결정적 파서만 사용)
    #[serde(default)]
    pub api_key: String,
    /// 모델 이름
    #[serde(default = "default_model")]
    pub model: String,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// 샘플링 온도 (짧고 일관된 답변용으로 낮게)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// 응답 최대 토큰
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: String::new(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl AiConfig {
    /// API 키가 설정되어 AI 경로를 쓸 수 있는지
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============================================================
// 어시스턴트 설정
// ============================================================

/// 어시스턴트 루프 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// 에이전트 루프 최대 왕복 횟수
    #[serde(default = "default_max_round_trips")]
    pub max_round_trips: u32,
    /// AI 설정 시 첫 인사를 모델이 생성
    #[serde(default = "default_true")]
    pub proactive_greeting: bool,
    /// AI 설정 시에도 결정적 파서 매치를 먼저 디스패치
    #[serde(default)]
    pub prefer_local_commands: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            max_round_trips: default_max_round_trips(),
            proactive_greeting: true,
            prefer_local_commands: false,
        }
    }
}

// ============================================================
// 알림 설정
// ============================================================

/// 토스트 알림 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// 토스트 표시 시간 (ms)
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            toast_duration_ms: default_toast_duration_ms(),
        }
    }
}

impl NotificationConfig {
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self::default()
    }

    /// 환경 변수 오버라이드 적용
    pub fn apply_env_overrides(&mut self) {
        self.override_api_key(std::env::var(API_KEY_ENV).ok());
    }

    /// 비어 있지 않은 키만 덮어쓴다
    pub fn override_api_key(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.ai.api_key = key;
        }
    }

    /// 설정값 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.ai.endpoint.trim().is_empty() {
            return Err(invalid("ai.endpoint", "엔드포인트가 비어 있음"));
        }
        if self.ai.timeout_secs == 0 {
            return Err(invalid("ai.timeout_secs", "0보다 커야 함"));
        }
        if !(0.0..=2.0).contains(&self.ai.temperature) {
            return Err(invalid("ai.temperature", "0.0 ~ 2.0 범위여야 함"));
        }
        if self.assistant.max_round_trips == 0 {
            return Err(invalid("assistant.max_round_trips", "0보다 커야 함"));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> CoreError {
    CoreError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn default_true() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_temperature() -> f32 {
    0.2
}
fn default_max_tokens() -> u32 {
    400
}
fn default_max_round_trips() -> u32 {
    5
}
fn default_toast_duration_ms() -> u64 {
    3_000
}
