//! Display timer. It only measures, it never enforces anything.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct GameClock {
    started: Instant,
    frozen: Option<Duration>,
}

impl GameClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            frozen: None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.frozen.unwrap_or_else(|| self.started.elapsed())
    }

    /// Freezes the displayed time, e.g. when the game ends.
    pub fn stop(&mut self) {
        if self.frozen.is_none() {
            self.frozen = Some(self.started.elapsed());
        }
    }

    pub fn resume(&mut self) {
        if let Some(elapsed) = self.frozen.take() {
            self.started = Instant::now()
                .checked_sub(elapsed)
                .unwrap_or_else(Instant::now);
        }
    }

    pub fn is_running(&self) -> bool {
        self.frozen.is_none()
    }

    /// "MM:SS"
    pub fn formatted(&self) -> String {
        format_elapsed(self.elapsed())
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::start()
    }
}

pub(crate) fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "00:00");
        assert_eq!(format_elapsed(Duration::from_secs(75)), "01:15");
        assert_eq!(format_elapsed(Duration::from_secs(3600)), "60:00");
    }

    #[test]
    fn test_stop_freezes() {
        let mut clock = GameClock::start();
        clock.stop();
        let frozen = clock.elapsed();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(clock.elapsed(), frozen);
        assert!(!clock.is_running());
        clock.resume();
        assert!(clock.is_running());
        assert!(clock.elapsed() >= frozen);
    }
}
