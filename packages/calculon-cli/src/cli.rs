use calculon_rs::KERNEL_REGISTRY;
use clap::Parser;

// Every option is optional at the clap level; missing flags are reported by
// filter_params::validate in a fixed order.
#[derive(Parser, Debug, Default)]
#[command(
    name = "calculon",
    version,
    about = "Program for applying filters to a signal.",
    long_about = "Apply a moving average (ma-filter), exponential (exp-filter) or median \
                  (med-filter) filter to a signal, splitting the work across worker threads.\n\
                  Signals are read from and written to .npy, .txt/.ascii/.dat or .csv files."
)]
pub struct Cli {
    /// Thread count
    #[arg(short, long, env = "CALCULON_THREAD_COUNT")]
    pub thread_count: Option<u32>,

    /// Filter type (ma-filter, exp-filter, med-filter)
    #[arg(short, long)]
    pub filter_type: Option<String>,

    /// Input file name
    #[arg(short, long)]
    pub input_file: Option<String>,

    /// Output file name
    #[arg(short, long)]
    pub output_file: Option<String>,

    /// Damping coefficient for the exponential filter
    #[arg(short, long, allow_negative_numbers = true)]
    pub alpha: Option<f64>,

    /// Block size for the moving average and median filters
    #[arg(short = 's', long)]
    pub block_size: Option<u32>,

    /// Print a JSON run report instead of the text summary
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Also write the JSON run report to this file
    #[arg(long)]
    pub report: Option<String>,

    /// Compact JSON output (no indentation)
    #[arg(long, default_value_t = false)]
    pub compact: bool,

    /// Suppress the settings summary and progress messages
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Per-filter help appended to `--help`
pub fn filters_help() -> String {
    let mut help = String::from("Filters:\n");
    for metadata in KERNEL_REGISTRY {
        help.push_str(&format!(
            "  {:<11} {} ({})\n              {}\n",
            metadata.name, metadata.display_name, metadata.required_parameter, metadata.documentation
        ));
    }
    help
}
