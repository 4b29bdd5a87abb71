//! The Python/ctypes emitter.

use crate::options::PythonOptions;
use bindweave_generate_core::{
    GeneratedFile, Generator, GeneratorError, comment_block, exposed_method_name,
};
use bindweave_model::{Argument, EnumDecl, FunctionDeclaration, HeaderInterface, ScalarType};
use itertools::Itertools;

const INDENT: &str = "    ";

pub struct PythonGenerator {
    options: PythonOptions,
}

impl Generator for PythonGenerator {
    fn generate(&self, model: &HeaderInterface) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let contents = self.create_wrapper(model)?;
        let name = format!("{}wrapper.py", self.options.common.prefix);
        Ok(vec![GeneratedFile { name, contents }])
    }
}

impl PythonGenerator {
    pub fn new(options: PythonOptions) -> Self {
        PythonGenerator { options }
    }

    /// Class name derived from the prefix: `tixi3` -> `Tixi3`.
    fn class_name(&self) -> String {
        let prefix = &self.options.common.prefix;
        let mut chars = prefix.chars();
        match chars.next() {
            Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
            None => "Wrapper".to_string(),
        }
    }

    fn exception_name(&self) -> String {
        format!("{}Exception", self.class_name())
    }

    pub fn create_wrapper(&self, model: &HeaderInterface) -> Result<String, GeneratorError> {
        let error_enum = model
            .enums
            .get(&self.options.error_enum)
            .ok_or_else(|| GeneratorError::MissingEnum(self.options.error_enum.clone()))?;
        let success = error_enum
            .values
            .first()
            .ok_or_else(|| GeneratorError::MissingEnum(self.options.error_enum.clone()))?;

        let mut out = String::new();
        if let Some(license) = &self.options.common.license {
            out.push_str(&comment_block(license, "# "));
            out.push('\n');
        }
        out.push_str("import sys\nimport ctypes\n\n");

        for decl in model.enums.iter() {
            out.push_str(&create_enum_class(decl));
            out.push('\n');
        }

        out.push_str(&self.create_exception_class());
        out.push('\n');
        out.push_str(&self.create_catch_error(success));
        out.push('\n');
        out.push_str(&self.create_class_header());

        if let Some(user) = &self.options.user_functions {
            out.push_str(&indent_lines(user, 1));
            out.push('\n');
        }

        for decl in &model.declarations {
            if self.options.common.is_blacklisted(&decl.method_name) {
                log::debug!("skipping blacklisted function {}", decl.method_name);
                continue;
            }
            let method = match self.options.bool_methods.get(&decl.method_name) {
                Some(failure) => {
                    self.create_bool_method(decl, error_enum, success, failure.as_deref())?
                }
                None => self.create_method_wrapper(decl)?,
            };
            out.push_str(&method);
            out.push('\n');
        }
        Ok(out)
    }

    fn create_exception_class(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("class {}(Exception):\n", self.exception_name()));
        s.push_str(&format!(
            "{INDENT}'''Carries the numeric status code, its symbolic name and the arguments of the failed call.'''\n"
        ));
        s.push_str(&format!("{INDENT}def __init__(self, code, *args, **kwargs):\n"));
        s.push_str(&format!("{INDENT}{INDENT}Exception.__init__(self)\n"));
        s.push_str(&format!("{INDENT}{INDENT}self.code = code\n"));
        s.push_str(&format!(
            "{INDENT}{INDENT}if code in {}._names:\n",
            self.options.error_enum
        ));
        s.push_str(&format!(
            "{INDENT}{INDENT}{INDENT}self.error = {}._names[code]\n",
            self.options.error_enum
        ));
        s.push_str(&format!("{INDENT}{INDENT}else:\n"));
        s.push_str(&format!("{INDENT}{INDENT}{INDENT}self.error = 'UNDEFINED'\n"));
        s.push_str(&format!("{INDENT}{INDENT}self.args = tuple(args)\n"));
        s.push_str(&format!("{INDENT}{INDENT}self.kwargs = dict(kwargs)\n"));
        s.push_str(&format!("{INDENT}def __str__(self):\n"));
        s.push_str(&format!(
            "{INDENT}{INDENT}return self.error + ' (' + str(self.code) + ') ' + str(list(self.args))\n"
        ));
        s
    }

    fn create_catch_error(&self, success: &str) -> String {
        let mut s = String::new();
        s.push_str("def catch_error(returncode, *args, **kwargs):\n");
        s.push_str(&format!(
            "{INDENT}if returncode != {}.{}:\n",
            self.options.error_enum, success
        ));
        s.push_str(&format!(
            "{INDENT}{INDENT}raise {}(returncode, *args, **kwargs)\n",
            self.exception_name()
        ));
        s
    }

    fn create_class_header(&self) -> String {
        let library = &self.options.common.library_name;
        let mut s = String::new();
        s.push_str(&format!("class {}(object):\n", self.class_name()));
        s.push_str(&format!("{INDENT}def __init__(self):\n"));
        s.push_str(&format!(
            "{INDENT}{INDENT}'''Loads the native library and initializes the document handle.'''\n"
        ));
        s.push_str(&format!("{INDENT}{INDENT}if sys.platform == 'win32':\n"));
        s.push_str(&format!(
            "{INDENT}{INDENT}{INDENT}self.lib = ctypes.cdll.LoadLibrary('{library}.dll')\n"
        ));
        s.push_str(&format!("{INDENT}{INDENT}else:\n"));
        s.push_str(&format!(
            "{INDENT}{INDENT}{INDENT}self.lib = ctypes.CDLL('lib{library}.so')\n"
        ));
        s.push_str(&format!("{INDENT}{INDENT}self._handle = ctypes.c_int(-1)\n"));
        if let Some(post) = &self.options.post_constructor {
            s.push_str(&indent_lines(post, 2));
        }
        s.push('\n');
        s.push_str(&format!("{INDENT}def __del__(self):\n"));
        s.push_str(&format!(
            "{INDENT}{INDENT}if hasattr(self, 'lib') and self.lib is not None:\n"
        ));
        if let Some(close) = &self.options.close_function {
            s.push_str(&format!("{INDENT}{INDENT}{INDENT}self.{close}()\n"));
        }
        s.push_str(&format!("{INDENT}{INDENT}{INDENT}self.lib = None\n"));
        s.push('\n');
        s
    }

    /// The standard generated method: convert inputs, prepare outputs, call,
    /// check the status code, unbox, return.
    fn create_method_wrapper(&self, decl: &FunctionDeclaration) -> Result<String, GeneratorError> {
        let handle_index = self.handle_index(decl);
        let name = exposed_method_name(
            &decl.method_name,
            &self.options.common.prefix,
            &self.options.common.aliases,
        );

        let mut s = String::new();
        s.push_str(&format!("{INDENT}def {name}(self"));
        for arg in self.python_inputs(decl, handle_index) {
            s.push_str(&format!(", {}", arg.name));
        }
        s.push_str("):\n");

        s.push_str(&self.create_pre_call(decl, handle_index)?);
        s.push_str(&self.create_call(decl, handle_index)?);
        s.push_str(&self.create_post_call(decl)?);
        Ok(s)
    }

    /// Index of the by-value handle argument elided from the Python
    /// signature, when the function uses the instance handle.
    fn handle_index(&self, decl: &FunctionDeclaration) -> Option<usize> {
        if !decl.uses_handle {
            return None;
        }
        decl.arguments
            .iter()
            .position(|a| a.is_handle && a.pointer_depth == 0)
    }

    /// Input arguments exposed as Python parameters.
    fn python_inputs<'a>(
        &self,
        decl: &'a FunctionDeclaration,
        handle_index: Option<usize>,
    ) -> impl Iterator<Item = &'a Argument> {
        decl.arguments
            .iter()
            .enumerate()
            .filter(move |(i, a)| Some(*i) != handle_index && !a.is_outarg)
            .map(|(_, a)| a)
    }

    fn create_pre_call(
        &self,
        decl: &FunctionDeclaration,
        handle_index: Option<usize>,
    ) -> Result<String, GeneratorError> {
        let mut s = String::new();
        let inputs: Vec<&Argument> = self.python_inputs(decl, handle_index).collect();
        if !inputs.is_empty() {
            s.push_str(&format!("{INDENT}{INDENT}# input arg conversion\n"));
        }
        for arg in inputs {
            let line = if arg.is_plain_string() {
                format!("_c_{0} = ctypes.c_char_p(str.encode({0}))", arg.name)
            } else if !arg.array.is_array && arg.pointer_depth == 0 {
                format!("_c_{0} = ctypes.c_{1}({0})", arg.name, ctypes_name(decl, arg)?)
            } else if arg.array.is_array && arg.pointer_depth > 0 && !arg.is_string {
                let ct = ctypes_name(decl, arg)?;
                format!(
                    "array_t_{0} = ctypes.c_{1} * len({0})\n{INDENT}{INDENT}_c_{0} = array_t_{0}(*{0})",
                    arg.name, ct
                )
            } else {
                return Err(GeneratorError::UnsupportedInput {
                    function: decl.method_name.clone(),
                    argument: arg.to_string(),
                });
            };
            s.push_str(&format!("{INDENT}{INDENT}{line}\n"));
        }

        let outputs: Vec<&Argument> = decl.outputs().filter(|a| !a.is_handle).collect();
        if !outputs.is_empty() {
            s.push_str(&format!("{INDENT}{INDENT}# output arg preparation\n"));
        }
        for arg in outputs {
            if arg.array.manual_size {
                return Err(GeneratorError::UnsupportedOutput {
                    function: decl.method_name.clone(),
                    argument: arg.to_string(),
                });
            }
            let line = if arg.array.is_array && arg.pointer_depth > 0 && !arg.is_string {
                format!(
                    "_c_{0} = ctypes.POINTER(ctypes.c_{1})()",
                    arg.name,
                    ctypes_name(decl, arg)?
                )
            } else if arg.is_string {
                format!("_c_{} = ctypes.c_char_p()", arg.name)
            } else if !arg.array.is_array && arg.pointer_depth == 1 {
                format!("_c_{0} = ctypes.c_{1}()", arg.name, ctypes_name(decl, arg)?)
            } else {
                return Err(GeneratorError::UnsupportedOutput {
                    function: decl.method_name.clone(),
                    argument: arg.to_string(),
                });
            };
            s.push_str(&format!("{INDENT}{INDENT}{line}\n"));
        }
        Ok(s)
    }

    fn create_call(
        &self,
        decl: &FunctionDeclaration,
        handle_index: Option<usize>,
    ) -> Result<String, GeneratorError> {
        let mut s = String::new();
        s.push_str(&format!("{INDENT}{INDENT}# call to native function\n"));

        if let Some(ret) = decl.value_return() {
            let restype = if ret.is_plain_string() {
                "ctypes.c_char_p".to_string()
            } else if ret.pointer_depth == 0 {
                format!("ctypes.c_{}", ctypes_name(decl, ret)?)
            } else {
                return Err(GeneratorError::UnsupportedReturn {
                    function: decl.method_name.clone(),
                    argument: ret.to_string(),
                });
            };
            s.push_str(&format!(
                "{INDENT}{INDENT}self.lib.{}.restype = {restype}\n",
                decl.method_name
            ));
        }

        let call_args = decl
            .arguments
            .iter()
            .enumerate()
            .map(|(i, arg)| {
                if Some(i) == handle_index {
                    "self._handle".to_string()
                } else if arg.is_handle && arg.is_outarg {
                    "ctypes.byref(self._handle)".to_string()
                } else if arg.is_outarg {
                    format!("ctypes.byref(_c_{})", arg.name)
                } else {
                    format!("_c_{}", arg.name)
                }
            })
            .join(", ");
        let call = format!("self.lib.{}({})", decl.method_name, call_args);

        if decl.returns_error_code {
            let context = self
                .python_inputs(decl, handle_index)
                .map(|a| format!(", {}", a.name))
                .collect::<String>();
            s.push_str(&format!("{INDENT}{INDENT}errorCode = {call}\n"));
            s.push_str(&format!(
                "{INDENT}{INDENT}catch_error(errorCode, '{}'{context})\n",
                decl.method_name
            ));
        } else {
            s.push_str(&format!("{INDENT}{INDENT}_c_ret = {call}\n"));
        }
        Ok(s)
    }

    /// Unboxes the collected outputs and builds the return statement:
    /// nothing, a single value, or a tuple with the real return value first.
    fn create_post_call(&self, decl: &FunctionDeclaration) -> Result<String, GeneratorError> {
        let mut s = String::new();
        let mut collected: Vec<&Argument> = Vec::new();
        if let Some(ret) = decl.value_return() {
            collected.push(ret);
        }
        collected.extend(decl.outputs().filter(|a| !a.is_handle));

        if collected.is_empty() {
            return Ok(s);
        }
        s.push('\n');
        for arg in &collected {
            let line = if arg.name == "ret" {
                if arg.is_plain_string() {
                    "_py_ret = _c_ret.decode('utf-8')".to_string()
                } else {
                    "_py_ret = _c_ret".to_string()
                }
            } else if arg.array.is_array && !arg.is_string {
                let size = self.array_size_expr(decl, arg)?;
                format!("_py_{0} = [_c_{0}[i] for i in range({size})]", arg.name)
            } else if arg.is_string {
                format!("_py_{0} = _c_{0}.value.decode('utf-8')", arg.name)
            } else {
                format!("_py_{0} = _c_{0}.value", arg.name)
            };
            s.push_str(&format!("{INDENT}{INDENT}{line}\n"));
        }

        s.push('\n');
        if collected.len() == 1 {
            s.push_str(&format!("{INDENT}{INDENT}return _py_{}\n", collected[0].name));
        } else {
            let names = collected.iter().map(|a| format!("_py_{}", a.name)).join(", ");
            s.push_str(&format!("{INDENT}{INDENT}return ({names})\n"));
        }
        Ok(s)
    }

    /// The Python expression for an output array's length: the paired size
    /// argument's unboxed value when the size is itself an output, the plain
    /// parameter otherwise.
    fn array_size_expr(
        &self,
        decl: &FunctionDeclaration,
        arg: &Argument,
    ) -> Result<String, GeneratorError> {
        let Some(&size_slot) = arg.array.size_indices.first() else {
            return Err(GeneratorError::UnsupportedOutput {
                function: decl.method_name.clone(),
                argument: arg.to_string(),
            });
        };
        let size = &decl.arguments[size_slot];
        if size.is_outarg {
            Ok(format!("_c_{}.value", size.name))
        } else {
            Ok(size.name.clone())
        }
    }

    /// An existence-check carve-out: success returns `True`, the configured
    /// failure code returns `False`, everything else raises.
    fn create_bool_method(
        &self,
        decl: &FunctionDeclaration,
        error_enum: &EnumDecl,
        success: &str,
        failure: Option<&str>,
    ) -> Result<String, GeneratorError> {
        if let Some(member) = failure
            && error_enum.entries().all(|(_, name)| name != member)
        {
            return Err(GeneratorError::UnknownEnumMember {
                function: decl.method_name.clone(),
                member: member.to_string(),
            });
        }
        // The boolean is the whole result; an output argument has nowhere
        // to go.
        if let Some(out) = decl.outputs().next() {
            return Err(GeneratorError::UnsupportedOutput {
                function: decl.method_name.clone(),
                argument: out.to_string(),
            });
        }
        let handle_index = self.handle_index(decl);
        let name = exposed_method_name(
            &decl.method_name,
            &self.options.common.prefix,
            &self.options.common.aliases,
        );

        let mut s = String::new();
        s.push_str(&format!("{INDENT}def {name}(self"));
        for arg in self.python_inputs(decl, handle_index) {
            s.push_str(&format!(", {}", arg.name));
        }
        s.push_str("):\n");
        s.push_str(&self.create_pre_call(decl, handle_index)?);

        let call_args = decl
            .arguments
            .iter()
            .enumerate()
            .map(|(i, arg)| {
                if Some(i) == handle_index {
                    "self._handle".to_string()
                } else {
                    format!("_c_{}", arg.name)
                }
            })
            .join(", ");
        s.push_str(&format!(
            "{INDENT}{INDENT}errorCode = self.lib.{}({})\n",
            decl.method_name, call_args
        ));
        s.push_str(&format!(
            "{INDENT}{INDENT}if errorCode == {}.{}:\n{INDENT}{INDENT}{INDENT}return True\n",
            self.options.error_enum, success
        ));
        match failure {
            Some(member) => {
                s.push_str(&format!(
                    "{INDENT}{INDENT}if errorCode == {}.{}:\n{INDENT}{INDENT}{INDENT}return False\n",
                    self.options.error_enum, member
                ));
                let context = self
                    .python_inputs(decl, handle_index)
                    .map(|a| format!(", {}", a.name))
                    .collect::<String>();
                s.push_str(&format!(
                    "{INDENT}{INDENT}catch_error(errorCode, '{}'{context})\n",
                    decl.method_name
                ));
            }
            None => {
                s.push_str(&format!("{INDENT}{INDENT}return False\n"));
            }
        }
        Ok(s)
    }
}

/// The `ctypes.c_*` suffix for a scalar slot.
fn ctypes_name(decl: &FunctionDeclaration, arg: &Argument) -> Result<&'static str, GeneratorError> {
    match arg.ty {
        ScalarType::Int | ScalarType::Handle => Ok("int"),
        ScalarType::Long => Ok("long"),
        ScalarType::Float => Ok("float"),
        ScalarType::Double => Ok("double"),
        ScalarType::Char => Ok("char"),
        ScalarType::Void => Err(GeneratorError::UnsupportedInput {
            function: decl.method_name.clone(),
            argument: arg.to_string(),
        }),
    }
}

fn create_enum_class(decl: &EnumDecl) -> String {
    let mut s = String::new();
    s.push_str(&format!("class {}(object):\n", decl.name));
    for (value, member) in decl.entries() {
        s.push_str(&format!("{INDENT}{member} = {value}\n"));
    }
    s.push_str(&format!("{INDENT}_names = {{}}\n"));
    for (value, member) in decl.entries() {
        s.push_str(&format!("{INDENT}_names[{value}] = '{member}'\n"));
    }
    s
}

fn indent_lines(text: &str, depth: usize) -> String {
    let prefix = INDENT.repeat(depth);
    let mut out = String::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            out.push('\n');
        } else {
            out.push_str(&prefix);
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindweave_generate_core::EmitterOptions;
    use bindweave_parser::{HeaderParser, ParserOptions};
    use std::collections::BTreeMap;

    const HEADER: &str = r#"
typedef int TixiDocumentHandle;

enum ReturnCode
{
  SUCCESS,
  FAILED,
  ELEMENT_NOT_FOUND
};

DLL_EXPORT ReturnCode tixiGetDoubleElement (const TixiDocumentHandle handle, const char *elementPath, double *number);

DLL_EXPORT ReturnCode tixiCheckElement (const TixiDocumentHandle handle, const char *elementPath);

DLL_EXPORT char* tixiGetVersion();

DLL_EXPORT ReturnCode tixiOpenDocument (const char *xmlFilename, TixiDocumentHandle *handle);

/* #annotate out: 3A(4)# */
DLL_EXPORT ReturnCode tixiGetFloatVector (TixiDocumentHandle handle, const char *vectorPath, double **vectorArray, int eNumber);
"#;

    fn model() -> HeaderInterface {
        let options = ParserOptions {
            export_macro: "DLL_EXPORT".to_string(),
            handle_type: "TixiDocumentHandle".to_string(),
            error_code_type: "ReturnCode".to_string(),
            typedefs: BTreeMap::new(),
        };
        HeaderParser::new(options).parse(HEADER).unwrap()
    }

    fn generator() -> PythonGenerator {
        PythonGenerator::new(PythonOptions {
            common: EmitterOptions {
                prefix: "tixi".to_string(),
                library_name: "tixi3".to_string(),
                ..EmitterOptions::default()
            },
            error_enum: "ReturnCode".to_string(),
            ..PythonOptions::default()
        })
    }

    #[test]
    fn test_simple_getter_method() {
        let wrapper = generator().create_wrapper(&model()).unwrap();
        assert!(wrapper.contains("def getDoubleElement(self, elementPath):"));
        assert!(wrapper.contains("_c_elementPath = ctypes.c_char_p(str.encode(elementPath))"));
        assert!(wrapper.contains("_c_number = ctypes.c_double()"));
        assert!(wrapper.contains(
            "errorCode = self.lib.tixiGetDoubleElement(self._handle, _c_elementPath, ctypes.byref(_c_number))"
        ));
        assert!(wrapper.contains("catch_error(errorCode, 'tixiGetDoubleElement', elementPath)"));
        assert!(wrapper.contains("return _py_number"));
    }

    #[test]
    fn test_value_returning_function() {
        let wrapper = generator().create_wrapper(&model()).unwrap();
        assert!(wrapper.contains("def getVersion(self):"));
        assert!(wrapper.contains("self.lib.tixiGetVersion.restype = ctypes.c_char_p"));
        assert!(wrapper.contains("_py_ret = _c_ret.decode('utf-8')"));
        assert!(wrapper.contains("return _py_ret"));
    }

    #[test]
    fn test_output_handle_binds_to_instance() {
        let wrapper = generator().create_wrapper(&model()).unwrap();
        assert!(wrapper.contains("def openDocument(self, xmlFilename):"));
        assert!(wrapper.contains(
            "self.lib.tixiOpenDocument(_c_xmlFilename, ctypes.byref(self._handle))"
        ));
        assert!(!wrapper.contains("_py_handle"));
    }

    #[test]
    fn test_output_array_sized_by_input_argument() {
        let wrapper = generator().create_wrapper(&model()).unwrap();
        assert!(wrapper.contains("_c_vectorArray = ctypes.POINTER(ctypes.c_double)()"));
        assert!(wrapper.contains("_py_vectorArray = [_c_vectorArray[i] for i in range(eNumber)]"));
    }

    #[test]
    fn test_enum_classes_with_reverse_lookup() {
        let wrapper = generator().create_wrapper(&model()).unwrap();
        assert!(wrapper.contains("class ReturnCode(object):"));
        assert!(wrapper.contains("    ELEMENT_NOT_FOUND = 2"));
        assert!(wrapper.contains("    _names[2] = 'ELEMENT_NOT_FOUND'"));
    }

    #[test]
    fn test_bool_method_carve_out() {
        let mut generator = generator();
        generator.options.bool_methods.insert(
            "tixiCheckElement".to_string(),
            Some("ELEMENT_NOT_FOUND".to_string()),
        );
        let wrapper = generator.create_wrapper(&model()).unwrap();
        assert!(wrapper.contains("def checkElement(self, elementPath):"));
        assert!(wrapper.contains("if errorCode == ReturnCode.SUCCESS:"));
        assert!(wrapper.contains("if errorCode == ReturnCode.ELEMENT_NOT_FOUND:"));
        assert!(wrapper.contains("catch_error(errorCode, 'tixiCheckElement', elementPath)"));
    }

    #[test]
    fn test_bool_method_with_output_argument_fails() {
        let mut generator = generator();
        generator
            .options
            .bool_methods
            .insert("tixiGetDoubleElement".to_string(), None);
        assert!(matches!(
            generator.create_wrapper(&model()),
            Err(GeneratorError::UnsupportedOutput { .. })
        ));
    }

    #[test]
    fn test_blacklist_suppresses_method() {
        let mut generator = generator();
        generator
            .options
            .common
            .blacklist
            .insert("tixiGetVersion".to_string());
        let wrapper = generator.create_wrapper(&model()).unwrap();
        assert!(!wrapper.contains("def getVersion"));
    }

    #[test]
    fn test_missing_error_enum_fails() {
        let mut generator = generator();
        generator.options.error_enum = "StatusCode".to_string();
        assert!(matches!(
            generator.create_wrapper(&model()),
            Err(GeneratorError::MissingEnum(_))
        ));
    }
}
