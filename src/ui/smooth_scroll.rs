//! Carousel offset animation with exponential ease-out.
//!
//! The animator owns the *target* offset; every tick moves the current
//! offset a fixed fraction of the remaining distance toward it.  Each
//! intermediate offset is fed to the selection synchronizer, so a long
//! swipe produces a stream of scroll updates just like a real fling.

/// Offset animator for the account carousel (units are columns).
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    position: f64,
    target: f64,
    /// Damping: `remaining *= (1 - speed)` each tick.
    /// Higher speed = faster settle.  Good range: 0.25–0.45 at 30 fps.
    speed: f64,
}

/// Below this distance the animation snaps onto its target.
const SETTLE_EPSILON: f64 = 0.25;

impl SmoothScroll {
    pub fn new(position: f64, speed: f64) -> Self {
        Self {
            position,
            target: position,
            speed: speed.clamp(0.05, 0.95),
        }
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.clamp(0.05, 0.95);
    }

    /// Animate toward `target` from wherever the carousel currently is.
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Move the target by `delta`, e.g. for a drag nudge.
    pub fn shift_target(&mut self, delta: f64) {
        self.target += delta;
    }

    /// Jump without animating.
    pub fn jump_to(&mut self, position: f64) {
        self.position = position;
        self.target = position;
    }

    /// Advance one frame.  Returns the new position while moving, `None`
    /// once settled.
    pub fn tick(&mut self) -> Option<f64> {
        if !self.is_animating() {
            return None;
        }
        let remaining = self.target - self.position;
        if remaining.abs() < SETTLE_EPSILON {
            self.position = self.target;
        } else {
            self.position += remaining * self.speed;
        }
        Some(self.position)
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// True until the position has landed exactly on the target.
    pub fn is_animating(&self) -> bool {
        self.position != self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settles_exactly_on_target() {
        let mut anim = SmoothScroll::new(0.0, 0.4);
        anim.set_target(38.0);

        let mut frames = Vec::new();
        while let Some(x) = anim.tick() {
            frames.push(x);
            assert!(frames.len() < 100, "animation never settled");
        }

        assert_eq!(anim.position(), 38.0);
        assert!(frames.windows(2).all(|w| w[1] >= w[0]));
        assert!(frames.len() > 3);
    }

    #[test]
    fn idle_animator_yields_nothing() {
        let mut anim = SmoothScroll::new(5.0, 0.3);
        assert!(anim.tick().is_none());
        anim.jump_to(12.0);
        assert!(anim.tick().is_none());
        assert_eq!(anim.position(), 12.0);
    }

    #[test]
    fn shift_target_accumulates() {
        let mut anim = SmoothScroll::new(0.0, 0.3);
        anim.shift_target(6.0);
        anim.shift_target(-2.0);
        assert_eq!(anim.target(), 4.0);
    }

    #[test]
    fn speed_is_clamped() {
        let mut anim = SmoothScroll::new(0.0, 5.0);
        anim.set_target(10.0);
        assert_eq!(anim.tick(), Some(9.5));
    }
}
