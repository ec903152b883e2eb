use crate::error::SimulatorError;
use std::fmt;
use std::time::Duration;

/// Playback speed of the simulation. Every simulated wait is divided by it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SpeedFactor(f64);

impl SpeedFactor {
    pub const NORMAL: Self = Self(1.0);
    pub const SLIDER_MIN: u8 = 1;
    pub const SLIDER_MAX: u8 = 200;

    /// Maps a slider position in `1..=200` to a factor in `0.1..=10.0`.
    ///
    /// The lower half is linear from 0.1x to 1x, the upper half linear from
    /// 1x to 10x, so 100 is real time. Positions outside the range are clamped.
    pub fn from_slider(position: u8) -> Self {
        let v = f64::from(position.clamp(Self::SLIDER_MIN, Self::SLIDER_MAX));
        if v <= 100.0 {
            Self(0.1 + (v - 1.0) * 0.9 / 99.0)
        } else {
            Self(1.0 + (v - 100.0) * 9.0 / 100.0)
        }
    }

    pub fn new(factor: f64) -> Result<Self, SimulatorError> {
        if factor.is_finite() && factor > 0.0 {
            Ok(Self(factor))
        } else {
            Err(SimulatorError::ValidationError(format!(
                "Speed factor must be positive, got {factor}"
            )))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Wall-clock time a nominal delay takes at this speed.
    pub fn scale(&self, nominal: Duration) -> Duration {
        nominal.div_f64(self.0)
    }

    /// Sleeps for `nominal` scaled by this factor.
    pub async fn wait(&self, nominal: Duration) {
        tokio::time::sleep(self.scale(nominal)).await;
    }
}

impl Default for SpeedFactor {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for SpeedFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 1.0 {
            write!(f, "{:.0}%", self.0 * 100.0)
        } else {
            write!(f, "{:.1}x", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_slider_endpoints() {
        assert!(approx(SpeedFactor::from_slider(1).value(), 0.1));
        assert!(approx(SpeedFactor::from_slider(100).value(), 1.0));
        assert!(approx(SpeedFactor::from_slider(101).value(), 1.09));
        assert!(approx(SpeedFactor::from_slider(200).value(), 10.0));
    }

    #[test]
    fn test_slider_clamps() {
        assert_eq!(SpeedFactor::from_slider(0), SpeedFactor::from_slider(1));
        assert_eq!(SpeedFactor::from_slider(255), SpeedFactor::from_slider(200));
    }

    #[test]
    fn test_display() {
        assert_eq!(SpeedFactor::from_slider(1).to_string(), "10%");
        assert_eq!(SpeedFactor::from_slider(100).to_string(), "1.0x");
        assert_eq!(SpeedFactor::from_slider(200).to_string(), "10.0x");
    }

    #[test]
    fn test_scale() {
        let fast = SpeedFactor::from_slider(200);
        assert_eq!(fast.scale(Duration::from_millis(500)), Duration::from_millis(50));

        let slow = SpeedFactor::new(0.5).unwrap();
        assert_eq!(slow.scale(Duration::from_millis(100)), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_is_scaled() {
        let start = tokio::time::Instant::now();
        SpeedFactor::new(2.0).unwrap().wait(Duration::from_millis(400)).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(200));
        assert!(elapsed < Duration::from_millis(210));
    }

    #[test]
    fn test_new_rejects_non_positive() {
        assert!(matches!(
            SpeedFactor::new(0.0),
            Err(SimulatorError::ValidationError(_))
        ));
        assert!(SpeedFactor::new(f64::NAN).is_err());
    }
}
