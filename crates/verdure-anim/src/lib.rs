//! Time-driven value transitions and one-shot scheduled tasks.
//!
//! Everything here is polled: owners call `update(dt)` from their frame tick and
//! read the current value back, so no callback outlives its owner.
#![forbid(unsafe_code)]

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolator {
    #[default]
    Linear,
    /// Smooth cubic ease (3t² - 2t³).
    Cubic,
}

impl Interpolator {
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Interpolator::Linear => t,
            Interpolator::Cubic => t * t * (3.0 - 2.0 * t),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RepeatMode {
    #[default]
    Once,
    Loop,
    BackAndForth,
}

#[derive(Clone, Debug)]
pub struct Transition {
    from: f32,
    to: f32,
    duration: f32,
    interpolator: Interpolator,
    repeat: RepeatMode,
    elapsed: f32,
    forward: bool,
    finished: bool,
}

impl Transition {
    pub fn new(
        from: f32,
        to: f32,
        duration: f32,
        interpolator: Interpolator,
        repeat: RepeatMode,
    ) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            interpolator,
            repeat,
            elapsed: 0.0,
            forward: true,
            finished: false,
        }
    }

    pub fn linear(from: f32, to: f32, duration: f32, repeat: RepeatMode) -> Self {
        Self::new(from, to, duration, Interpolator::Linear, repeat)
    }

    /// Advances by `dt` seconds and returns the new value.
    pub fn update(&mut self, dt: f32) -> f32 {
        if self.finished || dt <= 0.0 {
            return self.value();
        }
        if self.duration <= 0.0 {
            self.elapsed = 0.0;
            self.finished = self.repeat == RepeatMode::Once;
            return self.value();
        }
        self.elapsed += dt;
        match self.repeat {
            RepeatMode::Once => {
                if self.elapsed >= self.duration {
                    self.elapsed = self.duration;
                    self.finished = true;
                }
            }
            RepeatMode::Loop => {
                self.elapsed = self.elapsed.rem_euclid(self.duration);
            }
            RepeatMode::BackAndForth => {
                let legs = (self.elapsed / self.duration).floor();
                if legs >= 1.0 {
                    self.elapsed -= legs * self.duration;
                    if (legs as u64) % 2 == 1 {
                        self.forward = !self.forward;
                    }
                }
            }
        }
        self.value()
    }

    pub fn value(&self) -> f32 {
        let t = if self.duration > 0.0 {
            self.elapsed / self.duration
        } else {
            1.0
        };
        let p = if self.forward {
            self.interpolator.apply(t)
        } else {
            self.interpolator.apply(1.0 - t)
        };
        self.from + (self.to - self.from) * p
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }
}

/// One-shot delayed task. `tick` returns true exactly once, on the frame the delay elapses.
#[derive(Clone, Copy, Debug)]
pub struct ScheduledTask {
    remaining: f32,
    fired: bool,
}

impl ScheduledTask {
    pub fn after(delay: f32) -> Self {
        Self {
            remaining: delay.max(0.0),
            fired: false,
        }
    }

    pub fn tick(&mut self, dt: f32) -> bool {
        if self.fired {
            return false;
        }
        self.remaining -= dt.max(0.0);
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.fired = true;
            return true;
        }
        false
    }

    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    #[inline]
    pub fn has_fired(&self) -> bool {
        self.fired
    }
}
