//! Time-based value transitions.
//!
//! A [`Tween`] owns one animated slot. Starting a new transition on a slot
//! begins from whatever value the slot shows at that moment, so a running
//! transition is superseded rather than cancelled.

use crate::view::ViewTransform;

/// Milliseconds on the caller's clock.
pub type Millis = f64;

pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(self, to: Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for ViewTransform {
    fn lerp(self, to: Self, t: f64) -> Self {
        ViewTransform {
            x: self.x.lerp(to.x, t),
            y: self.y.lerp(to.y, t),
            k: self.k.lerp(to.k, t),
        }
    }
}

pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T: Lerp> {
    from: T,
    to: T,
    start: Millis,
    duration: Millis,
}

impl<T: Lerp> Tween<T> {
    /// A slot resting at `value`.
    pub fn fixed(value: T) -> Self {
        Self {
            from: value,
            to: value,
            start: 0.0,
            duration: 0.0,
        }
    }

    pub fn target(&self) -> T {
        self.to
    }

    pub fn value_at(&self, now: Millis) -> T {
        if self.duration <= 0.0 || now >= self.start + self.duration {
            return self.to;
        }
        if now <= self.start {
            return self.from;
        }
        let progress = (now - self.start) / self.duration;
        self.from.lerp(self.to, ease_cubic_in_out(progress))
    }

    pub fn is_finished(&self, now: Millis) -> bool {
        now >= self.start + self.duration
    }

    /// Starts a transition toward `to` after `delay`, from the value shown at `now`.
    pub fn retarget(&mut self, to: T, now: Millis, delay: Millis, duration: Millis) {
        self.from = self.value_at(now);
        self.to = to;
        self.start = now + delay.max(0.0);
        self.duration = duration.max(0.0);
    }

    /// Jumps to `value` with no animation.
    pub fn set(&mut self, value: T) {
        *self = Self::fixed(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_hits_endpoints_and_midpoint() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!((ease_cubic_in_out(0.5) - 0.5).abs() < 1e-12);
        assert!(ease_cubic_in_out(0.25) < 0.25);
    }

    #[test]
    fn tween_waits_for_delay_then_reaches_target() {
        let mut opacity = Tween::fixed(0.0);
        opacity.retarget(1.0, 0.0, 200.0, 1000.0);
        assert_eq!(opacity.value_at(100.0), 0.0);
        assert!((opacity.value_at(700.0) - 0.5).abs() < 1e-12);
        assert_eq!(opacity.value_at(1200.0), 1.0);
        assert!(opacity.is_finished(1200.0));
    }

    #[test]
    fn retarget_supersedes_from_current_value() {
        let mut scale = Tween::fixed(1.0);
        scale.retarget(1.2, 0.0, 0.0, 300.0);
        let midway = scale.value_at(150.0);
        scale.retarget(1.0, 150.0, 0.0, 300.0);
        assert_eq!(scale.value_at(150.0), midway);
        assert_eq!(scale.value_at(450.0), 1.0);
    }
}
