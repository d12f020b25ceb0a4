use calculon_rs::{Kernel, ParameterTable};
use serde::Serialize;

use crate::filter_params::FilterSettings;

/// Machine-readable summary of one filtering run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub id: String,
    pub input_file: String,
    pub output_file: String,
    pub filter: Kernel,
    pub filter_name: &'static str,
    pub parameters: ParameterTable,
    pub thread_count: u32,
    pub samples: usize,
    pub block_size: usize,
    pub elapsed_seconds: f64,
    pub samples_per_second: Option<f64>,
    pub created_at: String,
}

impl RunReport {
    pub fn new(settings: &FilterSettings, samples: usize, elapsed_seconds: f64) -> Self {
        let thread_count = settings.thread_count.max(1);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            input_file: settings.input_file.clone(),
            output_file: settings.output_file.clone(),
            filter: settings.kernel,
            filter_name: settings.kernel.metadata().display_name,
            parameters: settings.parameters(),
            thread_count,
            samples,
            block_size: samples / thread_count as usize,
            elapsed_seconds,
            samples_per_second: (elapsed_seconds > 0.0).then(|| samples as f64 / elapsed_seconds),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
