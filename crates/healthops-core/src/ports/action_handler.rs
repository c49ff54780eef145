//! 액션 수신 포트.

use crate::models::action::Action;

/// 호스트 애플리케이션의 액션 핸들러
///
/// 디스패치된 액션마다 정확히 한 번 호출된다. 승인 전에는 호출되지 않는다.
pub trait ActionHandler: Send + Sync {
    fn on_action(&self, action: &Action);
}
