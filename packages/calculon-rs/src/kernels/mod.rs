//! Windowed filter kernels and the registry that names them.
//!
//! Every kernel comes in two forms: copy-to-target (`apply`), which reads a
//! source range and writes a destination range of the same length, and
//! in-place (`apply_in_place`). Parameters are resolved from a
//! [`ParameterTable`] into a [`ResolvedKernel`] before any sample is written.

pub mod exponential;
pub mod median;
pub mod moving_average;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};
use crate::types::{ParameterTable, BLOCK_SIZE, DAMPING_COEFF};

/// Filter algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kernel {
    #[serde(rename = "ma-filter")]
    MovingAverage,
    #[serde(rename = "exp-filter")]
    Exponential,
    #[serde(rename = "med-filter")]
    Median,
}

impl Kernel {
    pub const ALL: [Kernel; 3] = [Kernel::MovingAverage, Kernel::Exponential, Kernel::Median];

    /// Look up a kernel by its command-line name (`ma-filter`, `exp-filter`, `med-filter`)
    pub fn from_name(name: &str) -> Option<Self> {
        KernelMetadata::from_name(name).map(|m| m.kernel)
    }

    pub fn metadata(self) -> &'static KernelMetadata {
        match self {
            Kernel::MovingAverage => &MOVING_AVERAGE,
            Kernel::Exponential => &EXPONENTIAL,
            Kernel::Median => &MEDIAN,
        }
    }

    pub fn name(self) -> &'static str {
        self.metadata().name
    }

    pub fn required_parameter(self) -> &'static str {
        self.metadata().required_parameter
    }

    /// Validate the parameters this kernel needs.
    ///
    /// A missing entry is reported as `MissingParameter` naming the parameter;
    /// a window length that is not a positive number is `InvalidParameter`.
    pub fn resolve(self, params: &ParameterTable) -> Result<ResolvedKernel> {
        let value = params
            .resolve(self.required_parameter())
            .map_err(|_| missing(self.required_parameter()))?;

        Ok(match self {
            Kernel::MovingAverage => ResolvedKernel::MovingAverage {
                window: window_length(value)?,
            },
            Kernel::Exponential => ResolvedKernel::Exponential { alpha: value },
            Kernel::Median => ResolvedKernel::Median {
                window: window_length(value)?,
            },
        })
    }

    /// Filter `src` into `dst`, leaving `src` untouched.
    ///
    /// Nothing is written to `dst` if the parameters do not resolve.
    pub fn apply(self, src: &[f64], dst: &mut [f64], params: &ParameterTable) -> Result<()> {
        if src.len() != dst.len() {
            return Err(FilterError::LengthMismatch {
                input: src.len(),
                output: dst.len(),
            });
        }
        self.resolve(params)?.apply(src, dst);
        Ok(())
    }

    /// Filter `range` in place.
    pub fn apply_in_place(self, range: &mut [f64], params: &ParameterTable) -> Result<()> {
        self.resolve(params)?.apply_in_place(range);
        Ok(())
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn missing(parameter: &str) -> FilterError {
    FilterError::MissingParameter(format!("Missing {} parameter!", parameter))
}

fn window_length(value: f64) -> Result<usize> {
    let window = value.trunc();
    if !window.is_finite() || window < 1.0 {
        return Err(FilterError::InvalidParameter(format!(
            "{} must be a positive integer, got {}",
            BLOCK_SIZE, value
        )));
    }
    Ok(window as usize)
}

/// A kernel with its parameters already validated
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedKernel {
    MovingAverage { window: usize },
    Exponential { alpha: f64 },
    Median { window: usize },
}

impl ResolvedKernel {
    /// # Panics
    /// If `src` and `dst` differ in length
    pub fn apply(&self, src: &[f64], dst: &mut [f64]) {
        assert_eq!(src.len(), dst.len(), "source and destination ranges differ in length");
        match *self {
            ResolvedKernel::MovingAverage { window } => moving_average::apply(src, dst, window),
            ResolvedKernel::Exponential { alpha } => exponential::apply(src, dst, alpha),
            ResolvedKernel::Median { window } => median::apply(src, dst, window),
        }
    }

    pub fn apply_in_place(&self, range: &mut [f64]) {
        match *self {
            ResolvedKernel::MovingAverage { window } => {
                moving_average::apply_in_place(range, window)
            }
            ResolvedKernel::Exponential { alpha } => exponential::apply_in_place(range, alpha),
            ResolvedKernel::Median { window } => median::apply_in_place(range, window),
        }
    }
}

/// Descriptive metadata for a kernel
#[derive(Debug, Clone, Serialize)]
pub struct KernelMetadata {
    pub kernel: Kernel,
    pub name: &'static str,
    pub display_name: &'static str,
    pub required_parameter: &'static str,
    pub parameter_label: &'static str,
    pub documentation: &'static str,
}

impl KernelMetadata {
    pub fn from_name(name: &str) -> Option<&'static KernelMetadata> {
        KERNEL_REGISTRY.iter().find(|m| m.name == name)
    }
}

// =============================================================================
// KERNEL DEFINITIONS
// =============================================================================

pub const MOVING_AVERAGE: KernelMetadata = KernelMetadata {
    kernel: Kernel::MovingAverage,
    name: "ma-filter",
    display_name: "Moving average filter",
    required_parameter: BLOCK_SIZE,
    parameter_label: "Block size",
    documentation: "Mean of the trailing window of block-size samples. The first block-size - 1 samples pass through.",
};

pub const EXPONENTIAL: KernelMetadata = KernelMetadata {
    kernel: Kernel::Exponential,
    name: "exp-filter",
    display_name: "Exponential averaging filter",
    required_parameter: DAMPING_COEFF,
    parameter_label: "Damping coefficient",
    documentation: "a * x[i] + (1 - a) * x[i - 1]. The first sample passes through.",
};

pub const MEDIAN: KernelMetadata = KernelMetadata {
    kernel: Kernel::Median,
    name: "med-filter",
    display_name: "Median filter",
    required_parameter: BLOCK_SIZE,
    parameter_label: "Block size",
    documentation: "Median of the forward window of block-size samples. The last block-size samples pass through.",
};

pub const KERNEL_REGISTRY: &[KernelMetadata] = &[MOVING_AVERAGE, EXPONENTIAL, MEDIAN];
