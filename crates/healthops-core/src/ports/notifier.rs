//! 토스트 알림 포트.
//!
//! 구현: `healthops-app` crate (`ConsoleToast`)

use std::time::Duration;

/// 기본 표시 시간
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3_000);

/// 짧은 알림 메시지 출력 싱크
pub trait ToastNotifier: Send + Sync {
    /// 메시지를 `duration` 동안 표시
    fn show(&self, message: &str, duration: Duration);
}
