//! # healthops-core
//!
//! Healthops Agent 도메인 모델, 포트(trait) 정의, 에러 타입, 설정.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`] — 액션 어휘, 대화, 대시보드 상태/스냅샷, tool 카탈로그
//! - [`ports`] — Hexagonal Architecture 포트 인터페이스
//! - [`error`] — 핵심 에러 타입 (thiserror)
//! - [`config`] — 애플리케이션 설정 구조체
//! - [`config_manager`] — 설정 파일 관리 (로드/저장)

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;

#[cfg(test)]
mod tests {
    use crate::models::action::Action;
    use crate::models::tool::{find_tool, tool_for_kind};

    #[test]
    fn action_kind_and_tool_stay_in_lock_step() {
        let action = Action::unit_filter("3 East");
        let tool = tool_for_kind(action.kind()).unwrap();
        assert_eq!(tool.name, "filter_unit");
        assert_eq!(find_tool("filter_unit").unwrap().kind, action.kind());
    }
}
