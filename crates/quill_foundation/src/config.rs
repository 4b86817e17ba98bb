//! Configuration for printing and record allocation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bit width of the native integer representation.
pub const INT_BITS: u32 = i64::BITS;

/// Bit width of the native float representation.
pub const FLOAT_BITS: u32 = 64;

/// Precision used to round floats before printing them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FloatBits {
    /// Round as a 32-bit float.
    F32,
    /// Round as a 64-bit float (the native width).
    #[default]
    F64,
}

impl FloatBits {
    /// Number of bits in this width.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::F32 => 32,
            Self::F64 => 64,
        }
    }
}

/// Configuration for the text serialization protocol.
///
/// The default value produces the canonical form every printer and debugger
/// relies on. Only hosts that knowingly want a different float rendering
/// should build their own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatConfig {
    /// Significant digits for floats.
    pub float_precision: usize,
    /// Width used when rounding floats.
    pub float_bits: FloatBits,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            float_precision: 5,
            float_bits: FloatBits::F64,
        }
    }
}

impl FormatConfig {
    /// Creates the canonical configuration.
    #[must_use]
    pub fn canonical() -> Self {
        Self::default()
    }

    /// Builder method to set float precision.
    ///
    /// A precision of zero is treated as one significant digit.
    #[must_use]
    pub fn with_float_precision(mut self, precision: usize) -> Self {
        self.float_precision = precision.max(1);
        self
    }

    /// Builder method to set the rounding width.
    #[must_use]
    pub fn with_float_bits(mut self, bits: FloatBits) -> Self {
        self.float_bits = bits;
        self
    }
}

/// Allocation hints for records.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordConfig {
    /// Expected number of keys; used to pre-size buckets and key order.
    pub initial_capacity: usize,
}

impl RecordConfig {
    /// Builder method to set the expected key count.
    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}
