//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 어댑터 crate가 이 trait들을 구현하며, `healthops-app`에서 `Arc<dyn T>`로 와이어링한다.
//! 네트워크를 타는 포트만 `async_trait`을 쓴다.

pub mod action_handler;
pub mod chat_completion;
pub mod context_source;
pub mod notifier;
