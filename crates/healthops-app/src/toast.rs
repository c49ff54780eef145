//! 콘솔 토스트 어댑터.
//!
//! `ToastNotifier` 포트 구현. 터미널에 한 줄로 출력한다.

use std::time::Duration;

use healthops_core::ports::notifier::ToastNotifier;
use tracing::debug;

/// 콘솔 토스트 — `ToastNotifier` 포트 구현
pub struct ConsoleToast;

impl ConsoleToast {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleToast {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastNotifier for ConsoleToast {
    fn show(&self, message: &str, duration: Duration) {
        debug!(duration_ms = duration.as_millis() as u64, "토스트: {message}");
        println!("  🔔 {message}");
    }
}
