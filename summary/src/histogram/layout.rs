use serde::{Deserialize, Serialize};
use std::fmt;

/// Finest scale a histogram can be refined to: `2^-1074` is the smallest positive f64.
pub const MIN_SCALE: i32 = -1074;

/// Upper bound on scales; coarsening stops earlier, as soon as the bin width would overflow.
pub const MAX_SCALE: i32 = 2200;

/// Bin indices stay strictly inside `(-INDEX_LIMIT, INDEX_LIMIT)` so that edge
/// arithmetic never overflows an `i64`.
pub const INDEX_LIMIT: i64 = 1 << 62;

#[allow(clippy::cast_precision_loss)]
const INDEX_LIMIT_F64: f64 = INDEX_LIMIT as f64;

/// `x * 2^exp`, exact unless the result leaves the range of f64.
pub fn ldexp(x: f64, exp: i32) -> f64 {
    let mut x = x;
    let mut exp = exp;
    while exp > 1000 {
        x *= 2f64.powi(1000);
        exp -= 1000;
    }
    while exp < -1000 {
        x *= 2f64.powi(-1000);
        exp += 1000;
    }
    x * 2f64.powi(exp)
}

/// Geometry of a histogram: bin `i` covers `[start + i * bin_size, start + (i + 1) * bin_size)`
/// with `bin_size = base_width * 2^scale`.
///
/// Layouts sharing `start` and `base_width` sit on the same coarsening ladder:
/// every bin at one scale nests in exactly one bin at any coarser scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinLayout {
    pub start: f64,
    pub base_width: f64,
    pub scale: i32,
}

impl BinLayout {
    pub fn new(start: f64, base_width: f64) -> Self {
        Self {
            start,
            base_width,
            scale: 0,
        }
    }

    /// One bin per integer, anchored at zero
    pub fn unit() -> Self {
        Self::new(0.0, 1.0)
    }

    pub fn with_scale(self, scale: i32) -> Self {
        Self {
            scale: scale.clamp(MIN_SCALE, MAX_SCALE),
            ..self
        }
    }

    pub fn bin_size(&self) -> f64 {
        ldexp(self.base_width, self.scale)
    }

    /// Whether the next scale up still has a finite bin width.
    pub fn can_coarsen(&self) -> bool {
        self.scale < MAX_SCALE && ldexp(self.base_width, self.scale + 1).is_finite()
    }

    fn position(&self, value: f64) -> f64 {
        ((value - self.start) / self.bin_size()).floor()
    }

    /// Whether `value` gets an index inside `(-INDEX_LIMIT, INDEX_LIMIT)` at this scale.
    pub fn holds(&self, value: f64) -> bool {
        self.position(value).abs() < INDEX_LIMIT_F64
    }

    /// Index of the bin holding `value`, clamped to the index range when the
    /// value is out of reach of this scale (see [`BinLayout::holds`]).
    #[allow(clippy::cast_possible_truncation)]
    pub fn index_of(&self, value: f64) -> i64 {
        let position = self.position(value);
        if position.is_nan() {
            return 0;
        }
        (position as i64).clamp(-INDEX_LIMIT + 1, INDEX_LIMIT - 1)
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn lower_edge(&self, index: i64) -> f64 {
        self.start + index as f64 * self.bin_size()
    }

    pub fn upper_edge(&self, index: i64) -> f64 {
        self.lower_edge(index.saturating_add(1))
    }

    pub fn is_compatible(&self, other: &Self) -> bool {
        self.start == other.start && self.base_width == other.base_width
    }

    /// Index at `self.scale + steps` of the bin holding bin `index`.
    pub fn coarse_index(index: i64, steps: u32) -> i64 {
        if steps >= 63 {
            return if index < 0 { -1 } else { 0 };
        }
        index.div_euclid(1_i64 << steps)
    }
}

impl fmt::Display for BinLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "start={} base_width={} bin_size={}",
            self.start,
            self.base_width,
            self.bin_size()
        )
    }
}
