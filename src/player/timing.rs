/// Elapsed time, total length and percentage derived from sink reports.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackProgress {
    pub elapsed: f64,
    pub duration: f64,
    pub percent: f64,
}

fn known_duration(duration: f64) -> Option<f64> {
    (duration.is_finite() && duration > 0.0).then_some(duration)
}

impl PlaybackProgress {
    /// Sinks report NaN or infinity until metadata has loaded.
    pub fn from_sink(elapsed: f64, duration: f64) -> Self {
        let elapsed = if elapsed.is_finite() {
            elapsed.max(0.0)
        } else {
            0.0
        };
        let (duration, percent) = match known_duration(duration) {
            Some(duration) => (duration, (elapsed / duration * 100.0).clamp(0.0, 100.0)),
            None => (0.0, 0.0),
        };
        Self {
            elapsed,
            duration,
            percent,
        }
    }

    pub fn remaining(&self) -> f64 {
        (self.duration - self.elapsed).max(0.0)
    }

    pub fn has_duration(&self) -> bool {
        known_duration(self.duration).is_some()
    }
}

/// Position for a requested percentage, or `None` while the length is
/// unknown.
pub fn seek_target(percent: f64, duration: f64) -> Option<f64> {
    let duration = known_duration(duration)?;
    if !percent.is_finite() {
        return None;
    }
    Some(percent.clamp(0.0, 100.0) / 100.0 * duration)
}

/// `m:ss`, with `0:00` for anything that is not a positive finite number.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_tracks_position() {
        let progress = PlaybackProgress::from_sink(30.0, 120.0);
        assert_eq!(progress.percent, 25.0);
        assert_eq!(progress.remaining(), 90.0);
    }

    #[test]
    fn unknown_duration_yields_zero_percent() {
        for duration in [f64::NAN, f64::INFINITY, 0.0, -3.0] {
            let progress = PlaybackProgress::from_sink(12.0, duration);
            assert_eq!(progress.percent, 0.0);
            assert!(!progress.has_duration());
        }
    }

    #[test]
    fn percent_never_leaves_range() {
        let progress = PlaybackProgress::from_sink(500.0, 120.0);
        assert_eq!(progress.percent, 100.0);
        let progress = PlaybackProgress::from_sink(-1.0, 120.0);
        assert_eq!(progress.percent, 0.0);
        let progress = PlaybackProgress::from_sink(f64::NAN, 120.0);
        assert_eq!(progress.percent, 0.0);
    }

    #[test]
    fn seek_target_scales_duration() {
        assert_eq!(seek_target(50.0, 200.0), Some(100.0));
        assert_eq!(seek_target(150.0, 200.0), Some(200.0));
        assert_eq!(seek_target(50.0, f64::NAN), None);
        assert_eq!(seek_target(f64::NAN, 200.0), None);
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(5.9), "0:05");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(3600.0), "60:00");
    }
}
