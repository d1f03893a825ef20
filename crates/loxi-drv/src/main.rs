use std::path::Path;
use std::process;

use log::LevelFilter;
use simple_logger::SimpleLogger;

use loxi_drv::{run_file, run_prompt, EXIT_IO_ERROR, EXIT_USAGE};

fn main() {
    // Quiet by default; RUST_LOG=debug shows the pipeline phases.
    SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .env()
        .init()
        .ok();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let result = match args.as_slice() {
        [] => run_prompt(),
        [script] => run_file(Path::new(script)),
        _ => {
            eprintln!("Usage: lox [script]");
            process::exit(EXIT_USAGE);
        }
    };

    match result {
        Ok(code) => process::exit(code),
        Err(error) => {
            eprintln!("error: {:#}", error);
            process::exit(EXIT_IO_ERROR);
        }
    }
}
