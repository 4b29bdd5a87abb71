//! The Fortran 2003 emitter.

use crate::options::FortranOptions;
use bindweave_generate_core::{GeneratedFile, Generator, GeneratorError, comment_block};
use bindweave_model::{Argument, EnumDecl, FunctionDeclaration, HeaderInterface, ScalarType};
use itertools::Itertools;

const INDENT: &str = "  ";

/// Null-terminator scan helper emitted once into the `contains` section of
/// any module that wraps string-passing functions.
const STRING_HELPER: &str = "\
  subroutine c_f_stringptr(str_c, str_f)
    use, intrinsic :: iso_c_binding
    type(C_PTR), intent(in) :: str_c
    character(kind=C_CHAR,len=:), pointer, intent(out) :: str_f
    character(kind=C_CHAR), pointer :: str_f_arr(:)
    integer :: i
    nullify(str_f)
    if (.not. c_associated(str_c)) return
    i = 1
    call c_f_pointer(str_c, str_f_arr, (/i/))
    do while (str_f_arr(i) /= C_NULL_CHAR)
      i = i + 1
      call c_f_pointer(str_c, str_f_arr, (/i/))
    end do
    i = i - 1
    block
      character(kind=C_CHAR,len=i), pointer :: str
      call c_f_pointer(str_c, str)
      str_f => str
    end block
  end subroutine
";

pub struct FortranGenerator {
    options: FortranOptions,
}

impl Generator for FortranGenerator {
    fn generate(&self, model: &HeaderInterface) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let contents = self.create_module(model)?;
        let name = format!("{}.f90", self.options.module_name);
        Ok(vec![GeneratedFile { name, contents }])
    }
}

impl FortranGenerator {
    pub fn new(options: FortranOptions) -> Self {
        FortranGenerator { options }
    }

    pub fn create_module(&self, model: &HeaderInterface) -> Result<String, GeneratorError> {
        let declarations: Vec<&FunctionDeclaration> = model
            .declarations
            .iter()
            .filter(|d| {
                let skipped = self.options.common.is_blacklisted(&d.method_name);
                if skipped {
                    log::debug!("skipping blacklisted function {}", d.method_name);
                }
                !skipped
            })
            .collect();
        let wrapped: Vec<&FunctionDeclaration> = declarations
            .iter()
            .copied()
            .filter(|d| requires_method_wrapper(d))
            .collect();

        let mut out = String::new();
        if let Some(license) = &self.options.common.license {
            out.push_str(&comment_block(license, "! "));
            out.push('\n');
        }
        out.push_str(&format!("module {}\n", self.options.module_name));
        out.push_str("use, intrinsic :: iso_c_binding\n");
        out.push_str("implicit none\n");
        out.push_str("public\n\n");

        for decl in model.enums.iter() {
            out.push_str(&create_enum(decl));
            out.push('\n');
        }

        for decl in &wrapped {
            out.push_str(&format!("private :: {}_c\n", decl.method_name));
        }
        if !wrapped.is_empty() {
            out.push_str("private :: c_f_stringptr\n");
        }
        out.push('\n');

        out.push_str("interface\n");
        for decl in &declarations {
            out.push_str(&self.create_interface_entry(decl)?);
            out.push('\n');
        }
        out.push_str("end interface\n");

        if !wrapped.is_empty() {
            out.push_str("\ncontains\n\n");
            out.push_str(STRING_HELPER);
            out.push('\n');
            for decl in &wrapped {
                out.push_str(&self.create_method_wrapper(decl)?);
                out.push('\n');
            }
        }
        out.push_str(&format!("\nend module {}\n", self.options.module_name));
        Ok(out)
    }

    /// One entry of the interface block. Wrapped functions keep the native
    /// `bind(C)` name but are exposed under an internal `_c` suffix.
    fn create_interface_entry(
        &self,
        decl: &FunctionDeclaration,
    ) -> Result<String, GeneratorError> {
        let mut s = String::new();
        for line in decl.raw_signature.lines() {
            s.push_str(&format!("{INDENT}! {line}\n"));
        }
        if let Some(annotation) = &decl.raw_annotation {
            for line in annotation.lines() {
                s.push_str(&format!("{INDENT}! {line}\n"));
            }
        }

        let exposed = if requires_method_wrapper(decl) {
            format!("{}_c", decl.method_name)
        } else {
            decl.method_name.clone()
        };
        let args = decl.arguments.iter().map(|a| a.name.as_str()).join(", ");
        let result = self.result_slot(decl);

        match &result {
            Some(ret) => {
                s.push_str(&format!(
                    "{INDENT}function {exposed}({args}) result({}) bind(C,name='{}')\n",
                    ret.name, decl.method_name
                ));
            }
            None => {
                s.push_str(&format!(
                    "{INDENT}subroutine {exposed}({args}) bind(C,name='{}')\n",
                    decl.method_name
                ));
            }
        }
        s.push_str(&format!("{INDENT}{INDENT}use, intrinsic :: iso_c_binding\n"));
        if let Some(ret) = &result {
            let line = match ret.arg {
                Some(arg) => c_facing_decl(decl, arg, true)?,
                None => format!("integer(kind=C_INT) :: {}", ret.name),
            };
            s.push_str(&format!("{INDENT}{INDENT}{line}\n"));
        }
        for arg in &decl.arguments {
            s.push_str(&format!(
                "{INDENT}{INDENT}{}\n",
                c_facing_decl(decl, arg, false)?
            ));
        }
        if result.is_some() {
            s.push_str(&format!("{INDENT}end function\n"));
        } else {
            s.push_str(&format!("{INDENT}end subroutine\n"));
        }
        Ok(s)
    }

    /// The public wrapper procedure around a `_c` interface: null-terminates
    /// input strings and converts returned pointers to Fortran strings.
    fn create_method_wrapper(
        &self,
        decl: &FunctionDeclaration,
    ) -> Result<String, GeneratorError> {
        let mut s = String::new();
        let args = decl.arguments.iter().map(|a| a.name.as_str()).join(", ");
        let result = self.result_slot(decl);

        match &result {
            Some(ret) => {
                s.push_str(&format!(
                    "{INDENT}function {}({args}) result({})\n",
                    decl.method_name, ret.name
                ));
            }
            None => {
                s.push_str(&format!("{INDENT}subroutine {}({args})\n", decl.method_name));
            }
        }
        s.push_str(&format!("{INDENT}{INDENT}use, intrinsic :: iso_c_binding\n"));
        if let Some(ret) = &result {
            let line = match ret.arg {
                Some(arg) => fortran_facing_decl(decl, arg, true)?,
                None => format!("integer(kind=C_INT) :: {}", ret.name),
            };
            s.push_str(&format!("{INDENT}{INDENT}{line}\n"));
            if ret.is_plain_string() {
                s.push_str(&format!("{INDENT}{INDENT}type(C_PTR) :: {}_c_ptr\n", ret.name));
            }
        }
        for arg in &decl.arguments {
            s.push_str(&format!(
                "{INDENT}{INDENT}{}\n",
                fortran_facing_decl(decl, arg, false)?
            ));
        }
        for arg in decl.arguments.iter().filter(|a| a.is_string && a.is_outarg) {
            s.push_str(&format!("{INDENT}{INDENT}type(C_PTR) :: {}_c_ptr\n", arg.name));
        }

        let call_args = decl
            .arguments
            .iter()
            .map(|arg| {
                if arg.is_string && arg.is_outarg {
                    format!("{}_c_ptr", arg.name)
                } else if arg.is_plain_string() && !arg.is_outarg {
                    format!("{} // C_NULL_CHAR", arg.name)
                } else {
                    arg.name.clone()
                }
            })
            .join(", ");
        let call = format!("{}_c({})", decl.method_name, call_args);
        match &result {
            Some(ret) if ret.is_plain_string() => {
                s.push_str(&format!("{INDENT}{INDENT}{}_c_ptr = {call}\n", ret.name));
            }
            Some(ret) => {
                s.push_str(&format!("{INDENT}{INDENT}{} = {call}\n", ret.name));
            }
            None => {
                s.push_str(&format!("{INDENT}{INDENT}call {call}\n"));
            }
        }

        for arg in decl.arguments.iter().filter(|a| a.is_string && a.is_outarg) {
            s.push_str(&format!(
                "{INDENT}{INDENT}call c_f_stringptr({0}_c_ptr, {0})\n",
                arg.name
            ));
        }
        if let Some(ret) = &result
            && ret.is_plain_string()
        {
            s.push_str(&format!(
                "{INDENT}{INDENT}call c_f_stringptr({0}_c_ptr, {0})\n",
                ret.name
            ));
        }

        if result.is_some() {
            s.push_str(&format!("{INDENT}end function\n"));
        } else {
            s.push_str(&format!("{INDENT}end subroutine\n"));
        }
        Ok(s)
    }

    /// The function result: the status code slot for error-code functions
    /// (declared as a plain `C_INT`), the real return value otherwise.
    fn result_slot<'a>(&self, decl: &'a FunctionDeclaration) -> Option<ErrOrValue<'a>> {
        if decl.returns_error_code {
            Some(ErrOrValue::err())
        } else {
            decl.return_value.as_ref().map(ErrOrValue::value)
        }
    }
}

/// A borrowed return slot, or the synthesized `err` status-code result.
struct ErrOrValue<'a> {
    name: String,
    arg: Option<&'a Argument>,
}

impl<'a> ErrOrValue<'a> {
    fn err() -> Self {
        ErrOrValue { name: "err".to_string(), arg: None }
    }

    fn value(arg: &'a Argument) -> Self {
        ErrOrValue { name: arg.name.clone(), arg: Some(arg) }
    }

    fn is_plain_string(&self) -> bool {
        self.arg.is_some_and(Argument::is_plain_string)
    }
}

/// True when the call needs a hand-generated wrapper: any string or `void*`
/// among the arguments or the return value.
fn requires_method_wrapper(decl: &FunctionDeclaration) -> bool {
    let needs = |a: &Argument| a.is_string || (a.ty == ScalarType::Void && a.pointer_depth > 0);
    decl.arguments.iter().any(needs) || decl.return_value.as_ref().is_some_and(needs)
}

fn kind_spec(decl: &FunctionDeclaration, arg: &Argument) -> Result<String, GeneratorError> {
    let spec = match arg.ty {
        ScalarType::Int | ScalarType::Handle => "integer(kind=C_INT)",
        ScalarType::Long => "integer(kind=C_LONG)",
        ScalarType::Float => "real(kind=C_FLOAT)",
        ScalarType::Double => "real(kind=C_DOUBLE)",
        ScalarType::Char if arg.pointer_depth == 0 => "character(kind=C_CHAR)",
        ScalarType::Void if arg.pointer_depth > 0 => "type(C_PTR)",
        _ => {
            return Err(unsupported(decl, arg));
        }
    };
    Ok(spec.to_string())
}

/// Declaration line inside the `bind(C)` interface entry. Strings cross the
/// boundary as `C_CHAR` arrays (input) or `type(C_PTR)` (output).
fn c_facing_decl(
    decl: &FunctionDeclaration,
    arg: &Argument,
    function_result: bool,
) -> Result<String, GeneratorError> {
    check_string_shape(decl, arg)?;
    if function_result {
        let spec = if arg.is_plain_string() {
            "type(C_PTR)".to_string()
        } else if arg.pointer_depth == 0 {
            kind_spec(decl, arg)?
        } else {
            return Err(unsupported(decl, arg));
        };
        return Ok(format!("{spec} :: {}", arg.name));
    }

    let mut s = if arg.is_string && arg.is_outarg {
        "type(C_PTR)".to_string()
    } else if arg.is_plain_string() {
        "character(kind=C_CHAR)".to_string()
    } else {
        kind_spec(decl, arg)?
    };
    if arg.pointer_depth == 0 || (arg.ty == ScalarType::Void && arg.pointer_depth == 1) {
        s.push_str(", value");
    } else if arg.is_outarg {
        s.push_str(", intent(out)");
    } else {
        s.push_str(", intent(in)");
    }
    s.push_str(&format!(" :: {}", arg.name));
    if (arg.is_plain_string() && !arg.is_outarg) || (arg.array.is_array && !arg.is_string) {
        s.push_str("(*)");
    }
    Ok(s)
}

/// Declaration line inside the wrapper procedure. Strings become Fortran
/// character values: `len=*` inputs, deferred-length pointers for outputs.
fn fortran_facing_decl(
    decl: &FunctionDeclaration,
    arg: &Argument,
    function_result: bool,
) -> Result<String, GeneratorError> {
    check_string_shape(decl, arg)?;
    if function_result {
        if arg.is_plain_string() {
            return Ok(format!(
                "character(kind=C_CHAR,len=:), pointer :: {}",
                arg.name
            ));
        }
        return c_facing_decl(decl, arg, true);
    }
    if arg.is_string && arg.is_outarg {
        return Ok(format!(
            "character(kind=C_CHAR,len=:), pointer, intent(out) :: {}",
            arg.name
        ));
    }
    if arg.is_plain_string() {
        return Ok(format!(
            "character(kind=C_CHAR,len=*), intent(in) :: {}",
            arg.name
        ));
    }
    c_facing_decl(decl, arg, false)
}

/// Arrays of strings have no Fortran-side representation in this matrix.
fn check_string_shape(decl: &FunctionDeclaration, arg: &Argument) -> Result<(), GeneratorError> {
    if arg.is_string && (arg.array.is_array || (arg.pointer_depth > 1 && !arg.is_outarg)) {
        return Err(unsupported(decl, arg));
    }
    if arg.is_string && arg.pointer_depth > 2 {
        return Err(unsupported(decl, arg));
    }
    Ok(())
}

fn unsupported(decl: &FunctionDeclaration, arg: &Argument) -> GeneratorError {
    if arg.is_outarg {
        GeneratorError::UnsupportedOutput {
            function: decl.method_name.clone(),
            argument: arg.to_string(),
        }
    } else {
        GeneratorError::UnsupportedInput {
            function: decl.method_name.clone(),
            argument: arg.to_string(),
        }
    }
}

fn create_enum(decl: &EnumDecl) -> String {
    let mut s = String::new();
    s.push_str(&format!("! enum {}\n", decl.name));
    s.push_str("enum, bind(C)\n");
    for (value, member) in decl.entries() {
        s.push_str(&format!("{INDENT}enumerator :: {member} = {value}\n"));
    }
    s.push_str("end enum\n");
    s
}
