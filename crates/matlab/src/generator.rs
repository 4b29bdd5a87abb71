//! The MATLAB emitter. One file per function and per enum; MATLAB requires
//! the function name to match the file name, so wrappers keep the native
//! name and the handle is passed explicitly.

use crate::options::MatlabOptions;
use bindweave_generate_core::{GeneratedFile, Generator, GeneratorError, comment_block};
use bindweave_model::{Argument, EnumDecl, FunctionDeclaration, HeaderInterface, ScalarType};
use itertools::Itertools;

const INDENT: &str = "    ";

pub struct MatlabGenerator {
    options: MatlabOptions,
}

impl Generator for MatlabGenerator {
    fn generate(&self, model: &HeaderInterface) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let mut files = Vec::new();
        for decl in model.enums.iter() {
            files.push(GeneratedFile {
                name: format!("{}.m", decl.name),
                contents: self.create_enum_lookup(decl),
            });
        }
        for decl in &model.declarations {
            if self.options.common.is_blacklisted(&decl.method_name) {
                log::debug!("skipping blacklisted function {}", decl.method_name);
                continue;
            }
            files.push(GeneratedFile {
                name: format!("{}.m", decl.method_name),
                contents: self.create_function_wrapper(decl)?,
            });
        }
        Ok(files)
    }
}

impl MatlabGenerator {
    pub fn new(options: MatlabOptions) -> Self {
        MatlabGenerator { options }
    }

    fn gateway(&self) -> String {
        format!("{}_matlab", self.options.common.prefix)
    }

    fn create_function_wrapper(
        &self,
        decl: &FunctionDeclaration,
    ) -> Result<String, GeneratorError> {
        check_supported(decl)?;
        let inputs: Vec<&Argument> = decl.inputs().collect();
        let mut outputs: Vec<&str> = Vec::new();
        if let Some(ret) = decl.value_return() {
            outputs.push(&ret.name);
        }
        outputs.extend(decl.outputs().map(|a| a.name.as_str()));

        let mut s = String::new();
        let input_list = inputs.iter().map(|a| a.name.as_str()).join(", ");
        match outputs.len() {
            0 => s.push_str(&format!("function {}({})\n", decl.method_name, input_list)),
            1 => s.push_str(&format!(
                "function {} = {}({})\n",
                outputs[0], decl.method_name, input_list
            )),
            _ => s.push_str(&format!(
                "function [{}] = {}({})\n",
                outputs.iter().join(", "),
                decl.method_name,
                input_list
            )),
        }
        if let Some(license) = &self.options.common.license {
            s.push_str(&comment_block(license, "% "));
        }

        for arg in &inputs {
            let check = if arg.is_plain_string() { "ischar" } else { "isnumeric" };
            s.push_str(&format!("{INDENT}if not({check}({}))\n", arg.name));
            s.push_str(&format!(
                "{INDENT}{INDENT}error('Invalid type of argument \"{}\"');\n",
                arg.name
            ));
            s.push_str(&format!("{INDENT}end\n"));
        }

        let call_inputs = inputs.iter().map(|a| a.name.as_str()).join(", ");
        let call_args = if call_inputs.is_empty() {
            format!("'{}'", decl.method_name)
        } else {
            format!("'{}', {}", decl.method_name, call_inputs)
        };
        let call = format!("{}({})", self.gateway(), call_args);
        match outputs.len() {
            0 => s.push_str(&format!("{INDENT}{call};\n")),
            1 => s.push_str(&format!("{INDENT}{} = {call};\n", outputs[0])),
            _ => s.push_str(&format!("{INDENT}[{}] = {call};\n", outputs.iter().join(", "), )),
        }
        s.push_str("end\n");
        Ok(s)
    }

    /// A member-name-to-value lookup function per enum, so the constants stay
    /// ABI-identical to the other backends.
    fn create_enum_lookup(&self, decl: &EnumDecl) -> String {
        let mut s = String::new();
        s.push_str(&format!("function val = {}(name)\n", decl.name));
        s.push_str(&format!("% values of enum {}\n", decl.name));
        s.push_str(&format!("{INDENT}switch name\n"));
        for (value, member) in decl.entries() {
            s.push_str(&format!("{INDENT}{INDENT}case '{member}'\n"));
            s.push_str(&format!("{INDENT}{INDENT}{INDENT}val = {value};\n"));
        }
        s.push_str(&format!("{INDENT}{INDENT}otherwise\n"));
        s.push_str(&format!(
            "{INDENT}{INDENT}{INDENT}error('Invalid member \"%s\" of enum {}', name);\n",
            decl.name
        ));
        s.push_str(&format!("{INDENT}end\n"));
        s.push_str("end\n");
        s
    }
}

/// The gateway marshals scalars, numeric vectors and single strings; other
/// shapes fail generation with the full argument dump.
fn check_supported(decl: &FunctionDeclaration) -> Result<(), GeneratorError> {
    let slots = decl.arguments.iter().chain(decl.return_value.as_ref());
    for arg in slots {
        let bad_type = arg.ty == ScalarType::Void;
        let string_array = arg.is_string && (arg.array.is_array || arg.pointer_depth > 2);
        let deep_string_input = arg.is_string && arg.pointer_depth > 1 && !arg.is_outarg;
        let manual = arg.array.manual_size && arg.is_outarg;
        if bad_type || string_array || deep_string_input || manual {
            return Err(if arg.is_outarg {
                GeneratorError::UnsupportedOutput {
                    function: decl.method_name.clone(),
                    argument: arg.to_string(),
                }
            } else {
                GeneratorError::UnsupportedInput {
                    function: decl.method_name.clone(),
                    argument: arg.to_string(),
                }
            });
        }
    }
    Ok(())
}
