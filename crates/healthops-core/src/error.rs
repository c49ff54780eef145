//! Healthops 핵심 에러 타입.
//!
//! 파서 미스(`None`)와 tool 매핑 미스(`None`)는 에러가 아니라 정상 결과이므로
//! 여기에 포함하지 않는다. 원격 AI 실패만 `RemoteService`로 전파된다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 네트워크 에러 (연결 실패, 타임아웃)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 원격 AI 서비스 에러 (비정상 상태 코드 또는 해석 불가 응답)
    #[error("{message}")]
    RemoteService {
        /// HTTP 상태 코드 (전송 자체가 실패하면 None)
        status: Option<u16>,
        /// 서버가 준 메시지 또는 상태 설명
        message: String,
    },

    /// 현재 세션 상태에서 허용되지 않는 요청 (예: 승인 대기 중 입력)
    #[error("잘못된 세션 상태: {0}")]
    InvalidState(String),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// 원격 서비스 에러 생성 헬퍼
    pub fn remote(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::RemoteService {
            status,
            message: message.into(),
        }
    }
}
