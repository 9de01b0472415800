use clap::Parser;

use c2js_cli::args::CliArgs;
use c2js_cli::{driver, tracing_config};

fn main() {
    let args = CliArgs::parse();
    tracing_config::init(args.verbose);

    match driver::run(&args) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("c2js: {err:#}");
            std::process::exit(1);
        }
    }
}
