//! # healthops-assistant
//!
//! 운영자 입력을 대시보드 액션으로 바꾸는 어시스턴트 레이어.
//!
//! ## 구조
//!
//! - [`command_parser`] — 결정적 정규식 명령 파서 (AI 없이 동작)
//! - [`tool_mapping`] — AI tool 호출 → 검증된 액션 + 설명
//! - [`agent_loop`] — 유한 왕복 에이전트 루프 (승인 게이트)
//! - [`session`] — 대화 상태 머신 (입력 → 제안 → 승인/거절)
//! - [`conversation`] — 추가 전용 대화 로그
//! - [`prompt`] — 시스템 프롬프트 + 대시보드 스냅샷
//! - [`feedback`] — 고정 문구와 액션 피드백

pub mod agent_loop;
pub mod command_parser;
pub mod conversation;
pub mod feedback;
pub mod prompt;
pub mod session;
pub mod tool_mapping;

#[cfg(test)]
mod testing;
