//! Segment schedule: the ordered clip lengths a player can unlock

use std::time::Duration;

use crate::error::ScheduleError;

/// Default unlock durations in milliseconds: 0.1s, 0.5s, 1s, 2s, 5s, 10s
const DEFAULT_SEGMENTS_MS: [u64; 6] = [100, 500, 1_000, 2_000, 5_000, 10_000];

/// Ordered, strictly increasing clip durations. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegmentSchedule {
    segments: Vec<Duration>,
}

impl SegmentSchedule {
    pub fn new(segments: Vec<Duration>) -> Result<Self, ScheduleError> {
        if segments.is_empty() {
            return Err(ScheduleError::Empty);
        }

        for (index, current) in segments.iter().enumerate() {
            if current.is_zero() {
                return Err(ScheduleError::NonPositive { index });
            }
            if index > 0 && *current <= segments[index - 1] {
                return Err(ScheduleError::NotIncreasing {
                    index,
                    previous: segments[index - 1],
                    current: *current,
                });
            }
        }

        Ok(Self { segments })
    }

    /// Build from fractional seconds, e.g. `[0.1, 0.5, 1.0]`
    pub fn from_secs_f64(secs: &[f64]) -> Result<Self, ScheduleError> {
        let mut segments = Vec::with_capacity(secs.len());
        for (index, s) in secs.iter().enumerate() {
            if !s.is_finite() || *s <= 0.0 {
                return Err(ScheduleError::NonPositive { index });
            }
            let segment = Duration::try_from_secs_f64(*s).map_err(|_| ScheduleError::OutOfRange { index })?;
            segments.push(segment);
        }
        Self::new(segments)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Duration> {
        self.segments.get(index).copied()
    }

    pub fn last(&self) -> Duration {
        self.segments[self.segments.len() - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = Duration> + '_ {
        self.segments.iter().copied()
    }
}

impl Default for SegmentSchedule {
    fn default() -> Self {
        Self {
            segments: DEFAULT_SEGMENTS_MS
                .iter()
                .map(|ms| Duration::from_millis(*ms))
                .collect(),
        }
    }
}

/// Human label for a segment length: `0.1s`, `2s`
pub fn format_segment(duration: Duration) -> String {
    let ms = duration.as_millis();
    if ms % 1000 == 0 {
        format!("{}s", ms / 1000)
    } else {
        format!("{}s", duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_matches_game_rules() {
        let schedule = SegmentSchedule::default();
        let secs: Vec<f64> = schedule.iter().map(|d| d.as_secs_f64()).collect();
        assert_eq!(secs, vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0]);
        assert_eq!(schedule.last(), Duration::from_secs(10));
    }

    #[test]
    fn rejects_empty_schedule() {
        assert_eq!(SegmentSchedule::new(vec![]), Err(ScheduleError::Empty));
    }

    #[test]
    fn rejects_zero_length_segment() {
        let err = SegmentSchedule::new(vec![Duration::ZERO, Duration::from_secs(1)]).unwrap_err();
        assert_eq!(err, ScheduleError::NonPositive { index: 0 });

        let err = SegmentSchedule::from_secs_f64(&[0.5, -1.0]).unwrap_err();
        assert_eq!(err, ScheduleError::NonPositive { index: 1 });
    }

    #[test]
    fn rejects_non_increasing_segments() {
        let err = SegmentSchedule::from_secs_f64(&[1.0, 2.0, 2.0]).unwrap_err();
        assert!(matches!(err, ScheduleError::NotIncreasing { index: 2, .. }));
    }

    #[test]
    fn rejects_overlong_segment() {
        let err = SegmentSchedule::from_secs_f64(&[1.0, 1e30]).unwrap_err();
        assert_eq!(err, ScheduleError::OutOfRange { index: 1 });
    }

    #[test]
    fn formats_labels() {
        assert_eq!(format_segment(Duration::from_millis(100)), "0.1s");
        assert_eq!(format_segment(Duration::from_secs(5)), "5s");
    }
}
