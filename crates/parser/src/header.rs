//! Single-pass scanner over a header file's text.
//!
//! Accumulates enum blocks, typedef aliases, annotation comments, and
//! export-decorated prototypes into local structures, then assembles the
//! frozen [`HeaderInterface`]. Annotations bind strictly in source order to
//! the next function declaration; a second annotation while one is pending,
//! or a pending annotation at end of input, aborts the parse.

use crate::annotation::parse_annotation;
use crate::declaration::{RawArgument, parse_declaration};
use crate::error::ParseError;
use crate::resolve::resolve_type;
use crate::roles::{apply_annotation, infer_default_roles};
use bindweave_model::{
    Annotation, Argument, ArrayInfo, EnumDecl, EnumTable, FunctionDeclaration, HeaderInterface,
    ScalarType,
};
use std::collections::BTreeMap;

/// Names the declaration grammar reserves; they never name an argument.
const RESERVED_NAMES: [&str; 3] = ["const", "while", "for"];

#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// The export decoration in front of every wrapped prototype,
    /// e.g. `DLL_EXPORT`.
    pub export_macro: String,
    /// Type name of the opaque document handle, e.g. `TixiDocumentHandle`.
    pub handle_type: String,
    /// Name of the status-code enum, e.g. `ReturnCode`. A function whose
    /// return slot names this type returns an error code by default.
    pub error_code_type: String,
    /// Alias overrides for types the header itself cannot resolve
    /// (function-pointer typedefs and the like).
    pub typedefs: BTreeMap<String, String>,
}

pub struct HeaderParser {
    options: ParserOptions,
}

/// A pending annotation comment, not yet bound to a declaration.
struct PendingAnnotation {
    line: usize,
    raw: String,
    parsed: Annotation,
}

/// A prototype collected during the scan, with its bound annotation.
struct CollectedDeclaration {
    text: String,
    annotation: Option<PendingAnnotation>,
}

impl HeaderParser {
    pub fn new(options: ParserOptions) -> Self {
        HeaderParser { options }
    }

    /// Parses a whole header into the semantic model.
    pub fn parse(&self, source: &str) -> Result<HeaderInterface, ParseError> {
        let mut enums = EnumTable::default();
        let mut typedefs = self.options.typedefs.clone();
        let mut collected: Vec<CollectedDeclaration> = Vec::new();

        let mut pending: Option<PendingAnnotation> = None;
        let mut enum_block: Option<String> = None;
        let mut decl_block: Option<String> = None;

        for (number, raw_line) in source.lines().enumerate() {
            let line = strip_line_comment(raw_line);
            let trimmed = line.trim();

            if let Some(block) = enum_block.as_mut() {
                block.push('\n');
                block.push_str(line);
                if trimmed.contains("};") {
                    let block = enum_block.take().unwrap_or_default();
                    enums.push(parse_enum_block(&block)?);
                }
                continue;
            }
            if let Some(block) = decl_block.as_mut() {
                block.push(' ');
                block.push_str(trimmed);
                if trimmed.contains(");") {
                    let text = decl_block.take().unwrap_or_default();
                    collected.push(CollectedDeclaration {
                        text,
                        annotation: pending.take(),
                    });
                }
                continue;
            }

            if trimmed.contains("#annotate") {
                if let Some(prev) = &pending {
                    return Err(ParseError::DoubleAnnotation {
                        line: number + 1,
                        pending: prev.line,
                    });
                }
                pending = Some(PendingAnnotation {
                    line: number + 1,
                    raw: trimmed.to_string(),
                    parsed: parse_annotation(trimmed)?,
                });
            } else if let Some(rest) = strip_token(trimmed, "typedef") {
                if let Some((alias, underlying)) = parse_typedef(rest) {
                    log::debug!("typedef {alias} -> {underlying}");
                    typedefs.insert(alias, underlying);
                }
            } else if let Some(rest) = strip_token(trimmed, "enum") {
                if rest.contains("};") {
                    enums.push(parse_enum_block(rest)?);
                } else {
                    enum_block = Some(rest.to_string());
                }
            } else if let Some(rest) = strip_token(trimmed, &self.options.export_macro) {
                if rest.contains(");") {
                    collected.push(CollectedDeclaration {
                        text: rest.to_string(),
                        annotation: pending.take(),
                    });
                } else {
                    decl_block = Some(rest.to_string());
                }
            }
        }

        if let Some(ann) = pending {
            return Err(ParseError::DanglingAnnotation { line: ann.line });
        }
        if let Some(block) = enum_block {
            return Err(ParseError::MalformedEnum(
                block,
                "missing terminating '};'".to_string(),
            ));
        }
        if let Some(block) = decl_block {
            return Err(ParseError::MalformedDeclaration(
                block,
                "missing terminating ');'".to_string(),
            ));
        }

        let mut declarations = Vec::with_capacity(collected.len());
        for decl in collected {
            declarations.push(self.assemble(decl, &typedefs, &enums)?);
        }
        log::debug!(
            "parsed {} function declarations, {} enums",
            declarations.len(),
            enums.iter().count()
        );
        Ok(HeaderInterface {
            declarations,
            enums,
        })
    }

    /// Builds one [`FunctionDeclaration`] from collected prototype text:
    /// structural parse, type resolution, default inference, annotation
    /// application.
    fn assemble(
        &self,
        decl: CollectedDeclaration,
        typedefs: &BTreeMap<String, String>,
        enums: &EnumTable,
    ) -> Result<FunctionDeclaration, ParseError> {
        let raw = parse_declaration(&decl.text)?;
        log::debug!("assembling declaration for {}", raw.method_name);

        let mut arguments = Vec::with_capacity(raw.arguments.len());
        for (index, arg) in raw.arguments.iter().enumerate() {
            arguments.push(self.build_argument(&raw.method_name, arg, index, typedefs, enums)?);
        }
        let arguments = infer_default_roles(arguments);

        let return_value = if raw.return_slot.type_name == "void"
            && raw.return_slot.pointer_depth == 0
        {
            None
        } else {
            let mut slot = raw.return_slot.clone();
            slot.name = Some("ret".to_string());
            Some(self.build_argument(&raw.method_name, &slot, 0, typedefs, enums)?)
        };

        let mut returns_error_code = raw.return_slot.type_name == self.options.error_code_type;
        let mut uses_handle = true;
        let (arguments, raw_annotation) = match decl.annotation {
            Some(ann) => {
                if let Some(flag) = ann.parsed.returns_error_code {
                    returns_error_code = flag;
                }
                if let Some(flag) = ann.parsed.uses_handle {
                    uses_handle = flag;
                }
                (
                    apply_annotation(&raw.method_name, arguments, &ann.parsed)?,
                    Some(ann.raw),
                )
            }
            None => (arguments, None),
        };

        Ok(FunctionDeclaration {
            method_name: raw.method_name,
            arguments,
            return_value: if returns_error_code {
                None
            } else {
                return_value
            },
            returns_error_code,
            uses_handle,
            raw_signature: decl.text.trim().to_string(),
            raw_annotation,
        })
    }

    fn build_argument(
        &self,
        function: &str,
        raw: &RawArgument,
        index: usize,
        typedefs: &BTreeMap<String, String>,
        enums: &EnumTable,
    ) -> Result<Argument, ParseError> {
        let name = match &raw.name {
            Some(name) if RESERVED_NAMES.contains(&name.as_str()) => {
                return Err(ParseError::ReservedName(name.clone()));
            }
            Some(name) => name.clone(),
            None => format!("arg{index}"),
        };
        let mut argument = Argument {
            name,
            raw_type: raw.type_name.clone(),
            ty: ScalarType::Void,
            pointer_depth: raw.pointer_depth,
            is_const: raw.is_const,
            is_handle: raw.type_name == self.options.handle_type,
            is_string: raw.type_name == "char" && raw.pointer_depth > 0,
            is_outarg: false,
            is_sizearg: false,
            array: ArrayInfo::default(),
        };
        match resolve_type(&raw.type_name, &self.options.handle_type, typedefs, enums)? {
            Some(ty) => {
                argument.ty = ty;
                Ok(argument)
            }
            None => Err(ParseError::UnknownType {
                function: function.to_string(),
                argument: argument.to_string(),
            }),
        }
    }
}

// --- Scanning helpers ---

/// Removes a trailing `//` comment from one line.
fn strip_line_comment(line: &str) -> &str {
    match line.find("//") {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// If `line` starts with `token` as a whole word, returns the remainder.
fn strip_token<'a>(line: &'a str, token: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(token)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// Parses the remainder of a `typedef` line. Recognizes
/// `typedef [enum|struct] TYPE NAME;`; self-aliases (`typedef enum X X;`)
/// and anything else (function pointers) are skipped.
fn parse_typedef(rest: &str) -> Option<(String, String)> {
    let body = rest.strip_suffix(';').unwrap_or(rest).trim();
    let mut tokens: Vec<&str> = body.split_whitespace().collect();
    if matches!(tokens.first(), Some(&"enum") | Some(&"struct")) {
        tokens.remove(0);
    }
    if tokens.len() != 2 {
        return None;
    }
    let (underlying, alias) = (tokens[0], tokens[1]);
    if underlying == alias || !is_identifier(alias) || !is_identifier(underlying) {
        return None;
    }
    Some((alias.to_string(), underlying.to_string()))
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parses an accumulated `NAME { a, b, c };` enum body (the leading `enum`
/// keyword is already consumed). Block comments and preprocessor lines
/// inside the body are stripped; member values are positional, an explicit
/// initializer must restate the position.
fn parse_enum_block(block: &str) -> Result<EnumDecl, ParseError> {
    let cleaned = strip_block_comments(block);
    let cleaned: String = cleaned
        .lines()
        .filter(|l| !l.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");

    let open = cleaned.find('{').ok_or_else(|| {
        ParseError::MalformedEnum(block.to_string(), "missing '{'".to_string())
    })?;
    let close = cleaned.find('}').ok_or_else(|| {
        ParseError::MalformedEnum(block.to_string(), "missing '}'".to_string())
    })?;
    let name = cleaned[..open].trim().to_string();
    if !is_identifier(&name) {
        return Err(ParseError::MalformedEnum(
            block.to_string(),
            format!("'{name}' is not a valid enum name"),
        ));
    }

    let mut values = Vec::new();
    for entry in cleaned[open + 1..close].split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (member, initializer) = match entry.split_once('=') {
            Some((member, init)) => (member.trim(), Some(init.trim())),
            None => (entry, None),
        };
        if !is_identifier(member) {
            return Err(ParseError::MalformedEnum(
                block.to_string(),
                format!("'{member}' is not a valid enum member"),
            ));
        }
        if let Some(init) = initializer {
            let given: i64 = init.parse().map_err(|_| {
                ParseError::MalformedEnum(
                    block.to_string(),
                    format!("unsupported initializer '{init}'"),
                )
            })?;
            if given != values.len() as i64 {
                return Err(ParseError::EnumValueMismatch {
                    name,
                    member: member.to_string(),
                    given,
                    expected: values.len(),
                });
            }
        }
        values.push(member.to_string());
    }
    Ok(EnumDecl { name, values })
}

fn strip_block_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start..].find("*/") {
            Some(end) => rest = &rest[start + end + 2..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ParserOptions {
        ParserOptions {
            export_macro: "DLL_EXPORT".to_string(),
            handle_type: "TixiDocumentHandle".to_string(),
            error_code_type: "ReturnCode".to_string(),
            typedefs: BTreeMap::new(),
        }
    }

    const HEADER: &str = r#"
#define DLL_EXPORT

typedef int TixiDocumentHandle;

enum ReturnCode
{
  SUCCESS,                    /*!< 0: No error occurred */
  FAILED,                     /*!< 1: Unspecified error */
  ELEMENT_NOT_FOUND
};

typedef enum ReturnCode ReturnCode;

// a getter with the standard conventions
DLL_EXPORT ReturnCode tixiGetDoubleElement (const TixiDocumentHandle handle,
                                            const char *elementPath, double *number);

DLL_EXPORT char* tixiGetVersion();
"#;

    #[test]
    fn test_parse_full_header() {
        let model = HeaderParser::new(options()).parse(HEADER).unwrap();
        assert_eq!(model.declarations.len(), 2);
        let decl = &model.declarations[0];
        assert_eq!(decl.method_name, "tixiGetDoubleElement");
        assert_eq!(decl.arguments.len(), 3);
        assert!(decl.returns_error_code);
        assert!(decl.arguments[0].is_handle);
        assert!(decl.arguments[1].is_plain_string());
        assert!(decl.arguments[2].is_outarg);

        let version = &model.declarations[1];
        assert!(!version.returns_error_code, "non-status return type");
        let ret = version.return_value.as_ref().unwrap();
        assert_eq!(ret.name, "ret");
        assert!(ret.is_string);
    }

    #[test]
    fn test_enum_table_positions() {
        let model = HeaderParser::new(options()).parse(HEADER).unwrap();
        let decl = model.enums.get("ReturnCode").unwrap();
        let entries: Vec<_> = decl.entries().collect();
        assert_eq!(
            entries,
            vec![(0, "SUCCESS"), (1, "FAILED"), (2, "ELEMENT_NOT_FOUND")]
        );
    }

    #[test]
    fn test_annotation_binds_to_next_function() {
        let header = r#"
enum ReturnCode { SUCCESS, FAILED };
typedef int TixiDocumentHandle;
/* #annotate out: 3A(4)# */
DLL_EXPORT ReturnCode tixiGetFloatVector (TixiDocumentHandle handle, char *path,
                                          double **values, int count);
"#;
        let model = HeaderParser::new(options()).parse(header).unwrap();
        let decl = &model.declarations[0];
        assert!(decl.arguments[2].is_outarg);
        assert!(decl.arguments[2].array.is_array);
        assert_eq!(decl.arguments[2].array.size_indices, vec![3]);
        assert!(decl.arguments[3].is_sizearg);
        assert_eq!(decl.raw_annotation.as_deref(), Some("/* #annotate out: 3A(4)# */"));
    }

    #[test]
    fn test_dangling_annotation_is_an_error() {
        let header = "/* #annotate in: 1# */\n";
        let err = HeaderParser::new(options()).parse(header).unwrap_err();
        assert!(matches!(err, ParseError::DanglingAnnotation { line: 1 }));
    }

    #[test]
    fn test_two_pending_annotations_are_an_error() {
        let header = "/* #annotate in: 1# */\n/* #annotate in: 2# */\n";
        let err = HeaderParser::new(options()).parse(header).unwrap_err();
        assert!(matches!(
            err,
            ParseError::DoubleAnnotation { line: 2, pending: 1 }
        ));
    }

    #[test]
    fn test_unknown_type_names_the_argument() {
        let header = "DLL_EXPORT ReturnCode tixiBroken (FILE *stream);\nenum ReturnCode { SUCCESS };\n";
        let err = HeaderParser::new(options()).parse(header).unwrap_err();
        match err {
            ParseError::UnknownType { function, argument } => {
                assert_eq!(function, "tixiBroken");
                assert!(argument.contains("FILE"));
                assert!(argument.contains("stream"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_typedef_override_resolves() {
        let mut opts = options();
        opts.typedefs
            .insert("TixiPrintMsgFnc".to_string(), "void".to_string());
        let header = "enum ReturnCode { SUCCESS };\nDLL_EXPORT ReturnCode tixiSetPrintMsgFunc (TixiPrintMsgFnc fnc);\n";
        let model = HeaderParser::new(opts).parse(header).unwrap();
        assert_eq!(model.declarations[0].arguments[0].ty, ScalarType::Void);
    }

    #[test]
    fn test_unnamed_argument_gets_synthetic_name() {
        let header = "enum ReturnCode { SUCCESS };\nDLL_EXPORT ReturnCode tixiNoNames (int, double);\n";
        let model = HeaderParser::new(options()).parse(header).unwrap();
        assert_eq!(model.declarations[0].arguments[0].name, "arg0");
        assert_eq!(model.declarations[0].arguments[1].name, "arg1");
    }

    #[test]
    fn test_enum_with_mismatched_initializer_fails() {
        let header = "enum Broken { A = 0, B = 5 };\n";
        let err = HeaderParser::new(options()).parse(header).unwrap_err();
        assert!(matches!(err, ParseError::EnumValueMismatch { given: 5, .. }));
    }
}
