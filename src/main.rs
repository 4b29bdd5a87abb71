use bindweave::BindError;
use std::env;
use std::path::Path;

/// A simple CLI to generate language bindings from an annotated C header.
fn main() -> Result<(), BindError> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!("A tool to generate Python, Fortran 2003 or MATLAB wrappers from a C header.");
        eprintln!();
        eprintln!(
            "Usage: {} <path/to/config.json> <path/to/header.h> <path/to/output>",
            args[0]
        );
        eprintln!();
        eprintln!("The output is a single file for the python and fortran backends");
        eprintln!("and a directory for the matlab backend.");
        std::process::exit(1);
    }

    let config_path = &args[1];
    let header_path = &args[2];
    let output_path = &args[3];

    println!("Reading configuration from {}", config_path);
    println!("Parsing header {}", header_path);
    bindweave::run(
        Path::new(config_path),
        Path::new(header_path),
        Path::new(output_path),
    )?;

    println!("Successfully generated {}", output_path);
    Ok(())
}
