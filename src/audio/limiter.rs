//! Master limiter: a hard clamp on the mixed output.
//!
//! Several overlapping notes can sum past full scale while one rings out
//! under the next, so the mix is clamped before it reaches the device.

#[derive(Debug, Clone, Copy)]
pub struct Limiter {
    ceiling: f32,
}

impl Limiter {
    /// `ceiling` must lie in `(0, 1]`.
    pub fn new(ceiling: f32) -> Self {
        debug_assert!(ceiling > 0.0 && ceiling <= 1.0);
        Self { ceiling }
    }

    #[inline]
    pub fn process(&self, sample: f32) -> f32 {
        sample.clamp(-self.ceiling, self.ceiling)
    }

    #[inline]
    pub fn process_block(&self, block: &mut [f32]) {
        for s in block {
            *s = self.process(*s);
        }
    }

    pub fn ceiling(&self) -> f32 {
        self.ceiling
    }
}

impl Default for Limiter {
    fn default() -> Self {
        Self::new(0.95)
    }
}
