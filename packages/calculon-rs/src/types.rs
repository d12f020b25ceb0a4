use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};
use crate::kernels::Kernel;

/// Name of the window length parameter used by the moving average and median kernels
pub const BLOCK_SIZE: &str = "block-size";

/// Name of the damping coefficient parameter used by the exponential kernel
pub const DAMPING_COEFF: &str = "damping-coeff";

/// Single named filter parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterParameter {
    pub name: String,
    pub value: f64,
}

impl FilterParameter {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Ordered list of filter parameters.
///
/// Names are not required to be unique; lookups return the first match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterTable {
    entries: Vec<FilterParameter>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: f64) {
        self.entries.push(FilterParameter::new(name, value));
    }

    /// Value of the first entry named `name`
    ///
    /// # Returns
    /// `FilterError::ParameterNotFound` when no entry matches
    pub fn resolve(&self, name: &str) -> Result<f64> {
        self.entries
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value)
            .ok_or_else(|| FilterError::ParameterNotFound(name.to_string()))
    }
}

impl<N: Into<String>> FromIterator<(N, f64)> for ParameterTable {
    fn from_iter<I: IntoIterator<Item = (N, f64)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, value)| FilterParameter::new(name, value))
                .collect(),
        }
    }
}

/// Complete description of one filtering run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRequest {
    pub kernel: Kernel,
    pub thread_count: usize,
    pub parameters: ParameterTable,
}

impl FilterRequest {
    pub fn new(kernel: Kernel, thread_count: usize, parameters: ParameterTable) -> Self {
        Self {
            kernel,
            thread_count,
            parameters,
        }
    }

    /// Run the request against `signal`, returning a new output buffer
    pub fn apply(&self, signal: &[f64]) -> Result<Vec<f64>> {
        crate::dispatch::apply_filter(signal, self.thread_count, self.kernel, &self.parameters)
    }
}
