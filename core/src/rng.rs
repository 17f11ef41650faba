//! Deterministic random number generation.
//!
//! RULE: No table generator may call any platform RNG.
//! All randomness flows through TableRng instances derived
//! from the single master seed of the dataset.
//!
//! Each table gets its own RNG stream, seeded deterministically
//! from (master_seed XOR slot_index). This means:
//!   - Adding a new table never changes existing tables' streams.
//!   - Each table's stream is fully reproducible in isolation.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use std::f64::consts::TAU;

/// A named, deterministic RNG for a single generated table.
pub struct TableRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl TableRng {
    /// Create a table RNG from the master seed and a stable
    /// slot index. The index must never change once assigned.
    pub fn new(master_seed: u64, slot_index: u64) -> Self {
        let derived_seed = master_seed ^ (slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Uniform float in [lo, hi).
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Uniform integer in [lo, hi). Returns `lo` when the range is empty.
    pub fn int_in(&mut self, lo: i64, hi: i64) -> i64 {
        if hi <= lo {
            return lo;
        }
        let span = (hi as i128 - lo as i128) as u64;
        (lo as i128 + self.next_u64_below(span) as i128) as i64
    }

    /// Gaussian sample via Box–Muller.
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        // 1 - u keeps the log argument in (0, 1].
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
        mean + std_dev * z
    }
}

/// All table RNGs for a single dataset, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_table(&self, slot: TableSlot) -> TableRng {
        TableRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable table slot assignments.
/// NEVER reorder or remove entries. Only append.
/// Reordering changes every table's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum TableSlot {
    Regional = 0, // static table, reserved
    Municipal = 1,
    IndexSnapshot = 2,
    TimeSeries = 3,
    // Add new tables here. Append only.
}

impl TableSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Regional => "regional",
            Self::Municipal => "municipal",
            Self::IndexSnapshot => "index_snapshot",
            Self::TimeSeries => "time_series",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = RngBank::new(7).for_table(TableSlot::Municipal);
        let mut b = RngBank::new(7).for_table(TableSlot::Municipal);
        for _ in 0..32 {
            assert_eq!(a.next_u64_below(1_000_000), b.next_u64_below(1_000_000));
        }
    }

    #[test]
    fn slots_get_independent_streams() {
        let bank = RngBank::new(7);
        let mut a = bank.for_table(TableSlot::Municipal);
        let mut b = bank.for_table(TableSlot::TimeSeries);
        let xs: Vec<u64> = (0..8).map(|_| a.next_u64_below(u64::MAX)).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.next_u64_below(u64::MAX)).collect();
        assert_ne!(xs, ys);
        assert_eq!(a.name, "municipal");
    }

    #[test]
    fn int_in_is_half_open() {
        let mut rng = RngBank::new(99).for_table(TableSlot::IndexSnapshot);
        for _ in 0..2_000 {
            let v = rng.int_in(90, 120);
            assert!((90..120).contains(&v), "{v} outside [90, 120)");
        }
        assert_eq!(rng.int_in(5, 5), 5);
    }

    #[test]
    fn int_in_spans_full_i64_range() {
        let mut rng = RngBank::new(5).for_table(TableSlot::TimeSeries);
        for _ in 0..1_000 {
            let v = rng.int_in(i64::MIN, i64::MAX);
            assert!(v < i64::MAX);
        }
        assert_eq!(rng.int_in(i64::MAX - 1, i64::MAX), i64::MAX - 1);
    }

    #[test]
    fn uniform_stays_in_range() {
        let mut rng = RngBank::new(3).for_table(TableSlot::Municipal);
        for _ in 0..2_000 {
            let v = rng.uniform(0.7, 1.2);
            assert!((0.7..1.2).contains(&v));
        }
    }

    #[test]
    fn normal_has_expected_moments() {
        let mut rng = RngBank::new(11).for_table(TableSlot::TimeSeries);
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| rng.normal(10.0, 3.0)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert!((mean - 10.0).abs() < 0.15, "mean {mean:.3}");
        assert!((var.sqrt() - 3.0).abs() < 0.15, "std {:.3}", var.sqrt());
    }
}
