/// Seeded LCG so every run with the same seed produces the same captures.
pub struct Rng {
    state: u64,
}

impl Rng {
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    /// Uniform in `[0, 1)`.
    pub fn unit(&mut self) -> f32 {
        // 24 bits fit an f32 mantissa exactly
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        self.unit().mul_add(max - min, min)
    }

    pub fn range_u32(&mut self, min: u32, max: u32) -> u32 {
        let span = u64::from(max.saturating_sub(min)) + 1;
        min + (u64::from(self.next_u32()) % span) as u32
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        f64::from(self.next_u32()) / 4_294_967_296.0 < probability
    }
}
