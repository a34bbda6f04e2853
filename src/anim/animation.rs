//! Animation values: one-shot transitions and indefinite oscillations.

use super::easing::ease_in_out;
use std::time::Duration;

/// How an animation reaches its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationStyle {
    /// A single eased transition, then hold.
    OneShot {
        /// Transition length.
        duration: Duration,
    },
    /// An eased oscillation with no end.
    Repeating {
        /// Length of one leg (from → to).
        period: Duration,
        /// Whether odd legs run backwards (to → from).
        autoreverse: bool,
    },
}

impl AnimationStyle {
    /// Whether this style never settles on its own.
    #[inline]
    pub const fn is_repeating(&self) -> bool {
        matches!(self, Self::Repeating { .. })
    }

    /// Length of the transition, or of one leg for repeating styles.
    #[inline]
    pub const fn duration(&self) -> Duration {
        match *self {
            Self::OneShot { duration } => duration,
            Self::Repeating { period, .. } => period,
        }
    }
}

/// An animation from one progress value to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    from: f32,
    to: f32,
    style: AnimationStyle,
}

impl Animation {
    /// A one-shot eased transition.
    pub const fn one_shot(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            style: AnimationStyle::OneShot { duration },
        }
    }

    /// An autoreversing oscillation between `from` and `to`.
    pub const fn repeating(from: f32, to: f32, period: Duration) -> Self {
        Self {
            from,
            to,
            style: AnimationStyle::Repeating {
                period,
                autoreverse: true,
            },
        }
    }

    /// An animation that holds `value` forever.
    pub const fn hold(value: f32) -> Self {
        Self::one_shot(value, value, Duration::ZERO)
    }

    /// Start value.
    #[inline]
    pub const fn from(&self) -> f32 {
        self.from
    }

    /// Destination of the first (forward) leg.
    #[inline]
    pub const fn to(&self) -> f32 {
        self.to
    }

    /// Animation style.
    #[inline]
    pub const fn style(&self) -> AnimationStyle {
        self.style
    }

    /// Value at `elapsed` time since the animation was installed.
    pub fn sample(&self, elapsed: Duration) -> f32 {
        let (forward, t) = self.leg(elapsed);
        let position = if forward { t } else { 1.0 - t };
        if position >= 1.0 {
            return self.to;
        }
        if position <= 0.0 {
            return self.from;
        }
        (self.to - self.from).mul_add(ease_in_out(position), self.from)
    }

    /// The value the animation is heading towards at `elapsed`.
    ///
    /// For an autoreversing oscillation this alternates between `to` and
    /// `from` every leg.
    pub fn target_at(&self, elapsed: Duration) -> f32 {
        if self.leg(elapsed).0 {
            self.to
        } else {
            self.from
        }
    }

    /// Whether the animation has reached its final value.
    ///
    /// Repeating animations never settle.
    pub fn is_settled(&self, elapsed: Duration) -> bool {
        match self.style {
            AnimationStyle::OneShot { duration } => elapsed >= duration,
            AnimationStyle::Repeating { .. } => false,
        }
    }

    /// Direction of the current leg and the position within it (`0..=1`).
    fn leg(&self, elapsed: Duration) -> (bool, f32) {
        match self.style {
            AnimationStyle::OneShot { duration } => {
                if duration.is_zero() {
                    return (true, 1.0);
                }
                #[allow(clippy::cast_possible_truncation)]
                let t = (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0) as f32;
                (true, t)
            }
            AnimationStyle::Repeating {
                period,
                autoreverse,
            } => {
                if period.is_zero() {
                    return (true, 1.0);
                }
                let cycles = elapsed.as_secs_f64() / period.as_secs_f64();
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let leg = cycles.floor() as u64;
                let forward = !autoreverse || leg % 2 == 0;
                #[allow(clippy::cast_possible_truncation)]
                let t = cycles.fract() as f32;
                (forward, t)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn test_one_shot_reaches_target_exactly() {
        let anim = Animation::one_shot(0.3, 1.0, SECOND);

        assert!((anim.sample(Duration::ZERO) - 0.3).abs() < 1e-6);
        assert_eq!(anim.sample(SECOND), 1.0);
        assert_eq!(anim.sample(SECOND * 5), 1.0);
        assert!(anim.is_settled(SECOND));
        assert!(!anim.is_settled(SECOND / 2));
    }

    #[test]
    fn test_one_shot_midpoint() {
        let anim = Animation::one_shot(0.0, 1.0, SECOND);
        assert!((anim.sample(SECOND / 2) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_hold_is_constant() {
        let anim = Animation::hold(0.42);
        assert_eq!(anim.sample(Duration::ZERO), 0.42);
        assert_eq!(anim.sample(SECOND), 0.42);
        assert!(anim.is_settled(Duration::ZERO));
    }

    #[test]
    fn test_repeating_oscillates() {
        let anim = Animation::repeating(0.0, 1.0, SECOND);

        assert!(anim.sample(Duration::ZERO).abs() < 1e-6);
        // Half way through the forward leg
        assert!((anim.sample(SECOND / 2) - 0.5).abs() < 1e-5);
        // Quarter into the reverse leg: value falls back towards 0
        let reverse = anim.sample(SECOND + SECOND / 4);
        assert!(reverse > 0.5 && reverse < 1.0);
        // Back at the start after two legs
        assert!(anim.sample(SECOND * 2).abs() < 1e-5);
        assert!(!anim.is_settled(SECOND * 100));
    }

    #[test]
    fn test_repeating_target_toggles_each_leg() {
        let anim = Animation::repeating(0.2, 0.8, SECOND);

        assert_eq!(anim.target_at(Duration::from_millis(500)), 0.8);
        assert_eq!(anim.target_at(Duration::from_millis(1500)), 0.2);
        assert_eq!(anim.target_at(Duration::from_millis(2500)), 0.8);
    }

    #[test]
    fn test_style_accessors() {
        let anim = Animation::repeating(0.0, 1.0, SECOND);
        assert!(anim.style().is_repeating());
        assert_eq!(anim.style().duration(), SECOND);

        let anim = Animation::one_shot(0.0, 1.0, SECOND * 2);
        assert!(!anim.style().is_repeating());
        assert_eq!(anim.style().duration(), SECOND * 2);
    }
}
