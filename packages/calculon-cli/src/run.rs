use calculon_rs::{load_signal, plan, save_signal, Stopwatch};

use crate::cli::Cli;
use crate::exit_codes;
use crate::filter_params::{self, FilterSettings};
use crate::output;
use crate::report::RunReport;

pub fn execute(cli: Cli) -> i32 {
    let settings = match filter_params::validate(&cli) {
        Ok(settings) => settings,
        Err(msg) => {
            println!("ERR: {}", msg);
            return exit_codes::FAILURE;
        }
    };

    let verbose = !cli.quiet && !cli.json;
    if verbose {
        print_summary(&settings);
    }

    let report = match run(&settings, verbose) {
        Ok(report) => report,
        Err(msg) => {
            println!("ERR: {}", msg);
            return exit_codes::FAILURE;
        }
    };

    if cli.json {
        if let Err(msg) = output::write_json(&report, None, cli.compact) {
            println!("ERR: {}", msg);
            return exit_codes::FAILURE;
        }
    }
    if let Some(ref path) = cli.report {
        if let Err(msg) = output::write_json(&report, Some(path.as_str()), cli.compact) {
            println!("ERR: {}", msg);
            return exit_codes::FAILURE;
        }
        log::info!("Run report written to {}", path);
    }

    exit_codes::SUCCESS
}

fn print_summary(settings: &FilterSettings) {
    let metadata = settings.kernel.metadata();
    println!("####### Settings summary #######");
    println!("Input file: {}", settings.input_file);
    println!("Output file: {}", settings.output_file);
    println!("Thread count: {}", settings.thread_count);
    println!("Filter type: {}", metadata.display_name);
    println!("{}: {}", metadata.parameter_label, settings.parameter);
    println!();
}

fn run(settings: &FilterSettings, verbose: bool) -> Result<RunReport, String> {
    if verbose {
        println!("Loading signal...");
    }
    let signal = {
        let _timer = Stopwatch::logged("Loading signal");
        load_signal(&settings.input_file).map_err(|e| e.to_string())?
    };
    if verbose {
        println!("Signal length: {} samples", signal.len());
    }

    let request = settings.request();
    let (resolved, blocks) = plan(
        signal.len(),
        request.thread_count,
        request.kernel,
        &request.parameters,
    )
    .map_err(|e| e.to_string())?;
    log::debug!(
        "{:?} over {} blocks of {} samples",
        resolved,
        blocks.len(),
        blocks.first().map_or(0, |b| b.len())
    );

    if verbose {
        println!("Running filter...");
    }
    let mut watch = Stopwatch::new();
    watch.start();
    let filtered = request.apply(&signal).map_err(|e| e.to_string())?;
    watch.stop();

    let report = RunReport::new(settings, signal.len(), watch.elapsed_secs());
    if verbose {
        println!("Filtering took: {}s", report.elapsed_seconds);
        match report.samples_per_second {
            Some(speed) => println!("Average speed: {} Sa/s", speed),
            None => println!("Average speed: n/a"),
        }
        println!();
        println!("Saving signal...");
    }

    {
        let _timer = Stopwatch::logged("Saving signal");
        save_signal(&filtered, &settings.output_file).map_err(|e| e.to_string())?;
    }
    if verbose {
        println!("Done!");
    }

    Ok(report)
}
