//! Wires the parser to the configured backend: one run parses one header,
//! drives one generator and writes the produced files wholesale.

use crate::config::{Backend, Config};
use crate::error::BindError;
use bindweave_fortran::{FortranGenerator, FortranOptions};
use bindweave_generate_core::{EmitterOptions, GeneratedFile, Generator};
use bindweave_matlab::{MatlabGenerator, MatlabOptions};
use bindweave_parser::{HeaderParser, ParserOptions};
use bindweave_python::{PythonGenerator, PythonOptions};
use std::fs;
use std::path::Path;

/// Parses `header` and emits the wrapper sources for the configured backend.
pub fn generate(header: &str, config: &Config) -> Result<Vec<GeneratedFile>, BindError> {
    let parser = HeaderParser::new(ParserOptions {
        export_macro: config.export_macro.clone(),
        handle_type: config.handle_type.clone(),
        error_code_type: config.error_code_type.clone(),
        typedefs: config.typedefs.clone(),
    });
    let model = parser.parse(header)?;
    log::info!(
        "parsed {} function declarations and {} enums",
        model.declarations.len(),
        model.enums.iter().count()
    );

    let common = EmitterOptions {
        prefix: config.prefix.clone(),
        library_name: config.library_name.clone(),
        license: config.license.clone(),
        blacklist: config.blacklist.clone(),
        aliases: config.aliases.clone(),
    };
    let generator: Box<dyn Generator> = match config.backend {
        Backend::Python => Box::new(PythonGenerator::new(PythonOptions {
            common,
            error_enum: config.error_code_type.clone(),
            user_functions: config.user_functions.clone(),
            post_constructor: config.post_constructor.clone(),
            close_function: config.close_function.clone(),
            bool_methods: config.bool_methods.clone(),
        })),
        Backend::Fortran => Box::new(FortranGenerator::new(FortranOptions {
            common,
            module_name: config.module_name(),
        })),
        Backend::Matlab => Box::new(MatlabGenerator::new(MatlabOptions { common })),
    };
    let files = generator.generate(&model)?;
    Ok(files)
}

/// Reads the configuration and header, generates, and writes the output:
/// a single file for the single-file backends, a directory for MATLAB.
pub fn run(config_path: &Path, header_path: &Path, output_path: &Path) -> Result<(), BindError> {
    let config: Config = serde_json::from_str(&fs::read_to_string(config_path)?)?;
    let header = fs::read_to_string(header_path)?;
    let files = generate(&header, &config)?;
    write_output(&files, output_path)?;
    Ok(())
}

fn write_output(files: &[GeneratedFile], output_path: &Path) -> Result<(), std::io::Error> {
    match files {
        [single] => {
            if let Some(parent) = output_path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            log::info!("writing {}", output_path.display());
            fs::write(output_path, &single.contents)
        }
        many => {
            fs::create_dir_all(output_path)?;
            for file in many {
                let path = output_path.join(&file.name);
                log::info!("writing {}", path.display());
                fs::write(path, &file.contents)?;
            }
            Ok(())
        }
    }
}
