//! Polling interval policy.
//!
//! Re-evaluated at the end of every cycle against the current local hour,
//! so a long-running process crosses from peak to off-peak seamlessly.

use std::time::Duration;

use chrono::{Local, Timelike};

use crate::models::ScheduleConfig;

/// Interval policy derived from the schedule configuration.
#[derive(Debug, Clone)]
pub struct Schedule {
    peak_start_hour: u32,
    peak_end_hour: u32,
    peak_interval: Duration,
    off_peak_interval: Duration,
}

impl Schedule {
    pub fn new(config: &ScheduleConfig) -> Self {
        Self {
            peak_start_hour: config.peak_start_hour,
            peak_end_hour: config.peak_end_hour,
            peak_interval: Duration::from_secs(config.peak_interval_secs),
            off_peak_interval: Duration::from_secs(config.off_peak_interval_secs),
        }
    }

    /// Whether an hour falls in the peak window `[start, end)`.
    pub fn is_peak_hour(&self, hour: u32) -> bool {
        self.peak_start_hour <= hour && hour < self.peak_end_hour
    }

    /// The wait interval for a given wall-clock hour.
    pub fn interval_for_hour(&self, hour: u32) -> Duration {
        if self.is_peak_hour(hour) {
            self.peak_interval
        } else {
            self.off_peak_interval
        }
    }

    /// The wait interval for right now.
    pub fn current_interval(&self) -> Duration {
        let hour = Local::now().hour();
        let interval = self.interval_for_hour(hour);
        if self.is_peak_hour(hour) {
            log::info!(
                "Peak window ({}-{}), next check in {} min",
                self.peak_start_hour,
                self.peak_end_hour,
                interval.as_secs() / 60
            );
        } else {
            log::info!("Off-peak, next check in {} min", interval.as_secs() / 60);
        }
        interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> Schedule {
        Schedule::new(&ScheduleConfig::default())
    }

    #[test]
    fn peak_window_is_left_closed() {
        let s = schedule();
        assert!(!s.is_peak_hour(8));
        assert!(s.is_peak_hour(9));
    }

    #[test]
    fn peak_window_is_right_open() {
        let s = schedule();
        assert!(s.is_peak_hour(11));
        assert!(!s.is_peak_hour(12));
    }

    #[test]
    fn intervals_match_window() {
        let s = schedule();
        assert_eq!(s.interval_for_hour(9), Duration::from_secs(1800));
        assert_eq!(s.interval_for_hour(11), Duration::from_secs(1800));
        assert_eq!(s.interval_for_hour(8), Duration::from_secs(10800));
        assert_eq!(s.interval_for_hour(12), Duration::from_secs(10800));
        assert_eq!(s.interval_for_hour(0), Duration::from_secs(10800));
        assert_eq!(s.interval_for_hour(23), Duration::from_secs(10800));
    }

    #[test]
    fn custom_window_boundaries() {
        let config = ScheduleConfig {
            peak_start_hour: 7,
            peak_end_hour: 22,
            peak_interval_secs: 60,
            off_peak_interval_secs: 600,
        };
        let s = Schedule::new(&config);
        assert_eq!(s.interval_for_hour(7), Duration::from_secs(60));
        assert_eq!(s.interval_for_hour(21), Duration::from_secs(60));
        assert_eq!(s.interval_for_hour(22), Duration::from_secs(600));
        assert_eq!(s.interval_for_hour(6), Duration::from_secs(600));
    }
}
