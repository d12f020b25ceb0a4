use crate::cli::Cli;
use calculon_rs::{FilterRequest, Kernel, ParameterTable};

/// Fully validated command-line settings
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSettings {
    pub input_file: String,
    pub output_file: String,
    pub thread_count: u32,
    pub kernel: Kernel,
    /// Value for `kernel.required_parameter()`
    pub parameter: f64,
}

impl FilterSettings {
    pub fn parameters(&self) -> ParameterTable {
        ParameterTable::new().with(self.kernel.required_parameter(), self.parameter)
    }

    pub fn request(&self) -> FilterRequest {
        FilterRequest::new(self.kernel, self.thread_count as usize, self.parameters())
    }
}

/// Check that every flag the selected filter needs is present.
///
/// Flags are checked in a fixed order and the first problem is returned.
pub fn validate(cli: &Cli) -> Result<FilterSettings, String> {
    let input_file = cli
        .input_file
        .clone()
        .ok_or("Input file not specified!")?;
    let output_file = cli
        .output_file
        .clone()
        .ok_or("Output file not specified!")?;
    let thread_count = cli.thread_count.ok_or("Thread not specified!")?;
    let filter_type = cli
        .filter_type
        .as_deref()
        .ok_or("Filter type not specified!")?;

    let kernel = Kernel::from_name(filter_type)
        .ok_or("Invalid filter type! (ma-filter, exp-filter, med-filter)")?;

    let parameter = match kernel {
        Kernel::MovingAverage | Kernel::Median => {
            f64::from(cli.block_size.ok_or("Block size not specified!")?)
        }
        Kernel::Exponential => cli.alpha.ok_or("Damping coefficient not specified!")?,
    };

    Ok(FilterSettings {
        input_file,
        output_file,
        thread_count,
        kernel,
        parameter,
    })
}
