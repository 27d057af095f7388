// Spacing between consecutive outbound calls

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Sleeps `pause` before every call except the first.
#[derive(Debug)]
pub struct Pacer {
    pause: Duration,
    started: AtomicBool,
}

impl Pacer {
    pub fn new(pause: Duration) -> Self {
        Self {
            pause,
            started: AtomicBool::new(false),
        }
    }

    pub async fn wait(&self) {
        let first = !self.started.swap(true, Ordering::SeqCst);
        if !first && !self.pause.is_zero() {
            tokio::time::sleep(self.pause).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_first_call_does_not_wait() {
        let pacer = Pacer::new(Duration::from_secs(2));
        let start = Instant::now();

        pacer.wait().await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        pacer.wait().await;
        pacer.wait().await;
        assert!(start.elapsed() >= Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_zero_pause_never_sleeps() {
        let pacer = Pacer::new(Duration::ZERO);
        for _ in 0..3 {
            pacer.wait().await;
        }
    }
}
