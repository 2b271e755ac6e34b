mod args;

use clap::Parser as _;

fn main() {
    human_panic::setup_panic!();
    let result = run();
    proc_exit::exit(result);
}

fn run() -> proc_exit::ExitResult {
    let cli = args::Cli::parse();

    cli.color.write_global();
    args::init_logging(cli.verbose.log_level_filter());

    log::info!("Generating site ...");
    let report = makesite::build(&cli.build_options())
        .map_err(|err| proc_exit::Code::FAILURE.with_message(format!("{err:#}")))?;

    let warnings = report.warnings().len();
    if warnings == 0 {
        log::info!("Build successful");
    } else {
        log::info!("Build successful with {warnings} warning(s)");
    }

    Ok(())
}
