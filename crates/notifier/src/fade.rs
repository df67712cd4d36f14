//! Overlay visibility timeline

use std::time::{Duration, Instant};

/// Where the label is in its show/fade cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadePhase {
    Hidden,
    Visible,
    Fading,
}

/// Fully visible for `hold`, then a linear fade over `fade`; restarted by every show
#[derive(Debug, Clone)]
pub struct FadeTimeline {
    hold: Duration,
    fade: Duration,
    started: Option<Instant>,
}

impl Default for FadeTimeline {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(1))
    }
}

impl FadeTimeline {
    pub fn new(hold: Duration, fade: Duration) -> Self {
        Self {
            hold,
            fade,
            started: None,
        }
    }

    /// Start (or interrupt and restart) the cycle
    pub fn restart(&mut self, now: Instant) {
        self.started = Some(now);
    }

    pub fn phase(&self, now: Instant) -> FadePhase {
        let Some(started) = self.started else {
            return FadePhase::Hidden;
        };
        let elapsed = now.saturating_duration_since(started);
        if elapsed < self.hold {
            FadePhase::Visible
        } else if elapsed < self.hold + self.fade {
            FadePhase::Fading
        } else {
            FadePhase::Hidden
        }
    }

    /// Label opacity in `[0, 1]`
    pub fn opacity(&self, now: Instant) -> f32 {
        match self.phase(now) {
            FadePhase::Hidden => 0.0,
            FadePhase::Visible => 1.0,
            FadePhase::Fading => {
                let Some(started) = self.started else {
                    return 0.0;
                };
                let into_fade = now.saturating_duration_since(started) - self.hold;
                1.0 - into_fade.as_secs_f32() / self.fade.as_secs_f32()
            }
        }
    }

    /// Total time a label stays on screen
    pub fn lifetime(&self) -> Duration {
        self.hold + self.fade
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle() {
        let mut timeline = FadeTimeline::default();
        let t0 = Instant::now();
        assert_eq!(timeline.phase(t0), FadePhase::Hidden);

        timeline.restart(t0);
        assert_eq!(timeline.opacity(t0 + Duration::from_millis(500)), 1.0);
        assert_eq!(timeline.phase(t0 + Duration::from_millis(1500)), FadePhase::Fading);
        let mid = timeline.opacity(t0 + Duration::from_millis(1500));
        assert!((mid - 0.5).abs() < 0.01);
        assert_eq!(timeline.phase(t0 + Duration::from_secs(2)), FadePhase::Hidden);
        assert_eq!(timeline.lifetime(), Duration::from_secs(2));
    }

    #[test]
    fn test_restart_interrupts_fade() {
        let mut timeline = FadeTimeline::default();
        let t0 = Instant::now();
        timeline.restart(t0);

        let t1 = t0 + Duration::from_millis(1800);
        assert_eq!(timeline.phase(t1), FadePhase::Fading);
        timeline.restart(t1);
        assert_eq!(timeline.opacity(t1), 1.0);
    }
}
