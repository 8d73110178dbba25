use serde::{Deserialize, Serialize};

/// Whole-second countdown for time mode rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTimer {
    limit_secs: u32,
    remaining_secs: u32,
}

impl RoundTimer {
    pub fn new(limit_secs: u32) -> Self {
        Self {
            limit_secs,
            remaining_secs: limit_secs,
        }
    }

    pub fn reset(&mut self) {
        self.remaining_secs = self.limit_secs;
    }

    pub fn limit_secs(&self) -> u32 {
        self.limit_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_up(&self) -> bool {
        self.remaining_secs == 0
    }

    /// Count down one second. Returns true when this tick ran the clock out.
    pub fn tick(&mut self) -> bool {
        if self.is_up() {
            return false;
        }
        self.remaining_secs -= 1;
        self.is_up()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_expires_on_last_second() {
        let mut t = RoundTimer::new(3);
        assert!(!t.tick());
        assert!(!t.tick());
        assert_eq!(t.remaining_secs(), 1);
        assert!(t.tick());
        assert!(t.is_up());

        // Once up, further ticks do nothing until reset.
        assert!(!t.tick());
        assert_eq!(t.remaining_secs(), 0);
    }

    #[test]
    fn reset_restores_limit() {
        let mut t = RoundTimer::new(10);
        t.tick();
        t.tick();
        t.reset();
        assert_eq!(t.remaining_secs(), 10);
        assert_eq!(t.limit_secs(), 10);
        assert!(!t.is_up());
    }
}
