//! Healthops 도메인 모델.
//!
//! 액션 어휘, 대화, 대시보드 상태와 스냅샷, tool 카탈로그, completion 메시지.
//! 와이어에 나가는 모델은 `serde` Serialize를 구현한다.

pub mod action;
pub mod chat;
pub mod completion;
pub mod context;
pub mod dashboard;
pub mod tool;
