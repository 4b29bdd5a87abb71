//! A `nom`-based parser for the restricted function-declaration grammar.
//!
//! Supported shape: `[const] type ['*'...] name '(' [arg {',' arg}] ')' [';']`
//! where each argument is `[const] type ['*'...] [name] ['[]'...]`. This is
//! deliberately not a C parser; it covers the prototypes the export macro
//! decorates and nothing more.

use crate::error::ParseError;
use nom::{
    IResult, Parser,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{opt, recognize},
    multi::{many0, separated_list0},
    sequence::{delimited, pair},
};

/// A structurally parsed argument, before type resolution and role inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArgument {
    pub is_const: bool,
    pub type_name: String,
    pub pointer_depth: u8,
    pub name: Option<String>,
}

/// A structurally parsed prototype. The return slot reuses [`RawArgument`];
/// its `name` field carried the function name during parsing and is cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDeclaration {
    pub method_name: String,
    pub return_slot: RawArgument,
    pub arguments: Vec<RawArgument>,
}

// --- Main Public Parser ---

pub fn parse_declaration(input: &str) -> Result<RawDeclaration, ParseError> {
    match declaration(input.trim()) {
        Ok((rem, decl)) if rem.trim().is_empty() => {
            let (return_slot, name) = split_return_slot(input, decl.0)?;
            let mut arguments = decl.1;
            // A single unnamed `void` argument means "no arguments".
            if arguments.len() == 1
                && arguments[0].type_name == "void"
                && arguments[0].pointer_depth == 0
                && arguments[0].name.is_none()
            {
                arguments.clear();
            }
            Ok(RawDeclaration {
                method_name: name,
                return_slot,
                arguments,
            })
        }
        Ok((rem, _)) => Err(ParseError::MalformedDeclaration(
            input.to_string(),
            format!("Parser did not consume all input. Remainder: '{}'", rem),
        )),
        Err(e) => Err(ParseError::MalformedDeclaration(
            input.to_string(),
            e.to_string(),
        )),
    }
}

fn split_return_slot(
    input: &str,
    mut slot: RawArgument,
) -> Result<(RawArgument, String), ParseError> {
    match slot.name.take() {
        Some(name) => Ok((slot, name)),
        None => Err(ParseError::MalformedDeclaration(
            input.to_string(),
            "missing function name".to_string(),
        )),
    }
}

// --- Combinators ---

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))
    .parse(input)
}

fn raw_argument(input: &str) -> IResult<&str, RawArgument> {
    let (input, first) = ws(identifier).parse(input)?;
    let (input, is_const, type_name) = if first == "const" {
        let (input, ty) = ws(identifier).parse(input)?;
        (input, true, ty)
    } else {
        (input, false, first)
    };
    let (input, stars) = many0(ws(char('*'))).parse(input)?;
    let (input, name) = opt(ws(identifier)).parse(input)?;
    // `type name[]` counts as one more pointer level
    let (input, brackets) = many0(ws(tag("[]"))).parse(input)?;
    Ok((
        input,
        RawArgument {
            is_const,
            type_name: type_name.to_string(),
            pointer_depth: (stars.len() + brackets.len()) as u8,
            name: name.map(str::to_string),
        },
    ))
}

#[allow(clippy::type_complexity)]
fn declaration(input: &str) -> IResult<&str, (RawArgument, Vec<RawArgument>)> {
    let (input, ret) = raw_argument(input)?;
    let (input, args) = delimited(
        ws(char('(')),
        separated_list0(ws(char(',')), raw_argument),
        ws(char(')')),
    )
    .parse(input)?;
    let (input, _) = opt(ws(char(';'))).parse(input)?;
    Ok((input, (ret, args)))
}
