/// Small deterministic generator (SplitMix64) used by stochastic effects.
#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    /// Create a generator from a seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next 64 random bits.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform value in `[0, 1)` with 53 bits of precision.
    pub fn next_f64_01(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }

    /// Uniform value in `[-1, 1)`.
    pub fn next_signed(&mut self) -> f64 {
        self.next_f64_01() * 2.0 - 1.0
    }
}

/// Generator keyed by the lattice point `(seed, x, y)`.
pub(crate) fn lattice_rng(seed: u64, x: u64, y: u64) -> Rng64 {
    Rng64::new(
        seed ^ x.wrapping_mul(0xD6E8_FEB8_6659_FD93) ^ y.wrapping_mul(0xA076_1D64_78BD_642F),
    )
}

/// Hash-like lattice noise in `[0, 1)` for `(seed, x, y)`.
pub(crate) fn noise01(seed: u64, x: u64, y: u64) -> f64 {
    lattice_rng(seed, x, y).next_f64_01()
}
