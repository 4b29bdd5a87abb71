//! A `nom`-based parser for the `#annotate ... #` role-override mini-language.
//!
//! Example: `#annotate ins: 1,2 outs: 3A(4) nohandle noerror#`. The header
//! authors also write the short keyword forms `in:`/`out:`, array entries
//! with a manual-preallocation suffix (`2AM`), and trailing prose after the
//! closing `#`; all of these are accepted.

use crate::error::ParseError;
use bindweave_model::{Annotation, ParamAnnotation};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, multispace0, u64 as nom_u64},
    combinator::{map, opt},
    multi::{many0, separated_list1},
    sequence::{delimited, preceded},
};

// --- Main Public Parser ---

/// Parses the text of one annotation comment into an [`Annotation`].
///
/// The input may be a whole source line; everything before `#annotate` and
/// after the closing `#` is ignored.
pub fn parse_annotation(input: &str) -> Result<Annotation, ParseError> {
    let Some(start) = input.find("#annotate") else {
        return Err(ParseError::MalformedAnnotation(
            input.to_string(),
            "missing '#annotate' marker".to_string(),
        ));
    };
    let rest = &input[start + "#annotate".len()..];
    let body = match rest.find('#') {
        Some(end) => &rest[..end],
        None => rest,
    };

    let clauses = match clause_list(body) {
        Ok((rem, clauses)) if rem.trim().is_empty() => clauses,
        Ok((rem, _)) => {
            return Err(ParseError::MalformedAnnotation(
                input.to_string(),
                format!("Parser did not consume all input. Remainder: '{}'", rem),
            ));
        }
        Err(e) => {
            return Err(ParseError::MalformedAnnotation(
                input.to_string(),
                e.to_string(),
            ));
        }
    };

    build_annotation(clauses)
}

// --- Clause Assembly ---

#[derive(Debug)]
enum Clause {
    Ins(Vec<(usize, ParamAnnotation)>),
    Outs(Vec<(usize, ParamAnnotation)>),
    NoHandle,
    Handle,
    NoError,
}

fn build_annotation(clauses: Vec<Clause>) -> Result<Annotation, ParseError> {
    let mut annotation = Annotation::default();
    for clause in clauses {
        match clause {
            Clause::Ins(entries) => {
                for (index, param) in entries {
                    annotation.in_args.insert(index, param);
                }
            }
            Clause::Outs(entries) => {
                for (index, param) in entries {
                    annotation.out_args.insert(index, param);
                }
            }
            Clause::NoHandle => annotation.uses_handle = Some(false),
            Clause::Handle => annotation.uses_handle = Some(true),
            Clause::NoError => annotation.returns_error_code = Some(false),
        }
    }
    for index in annotation.in_args.keys() {
        if annotation.out_args.contains_key(index) {
            return Err(ParseError::ConflictingRole { index: *index });
        }
    }
    Ok(annotation)
}

// --- Combinators ---

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

fn clause_list(input: &str) -> IResult<&str, Vec<Clause>> {
    many0(clause).parse(input)
}

fn clause(input: &str) -> IResult<&str, Clause> {
    alt((
        map(
            preceded((ws(alt((tag("ins"), tag("in")))), ws(char(':'))), entry_list),
            Clause::Ins,
        ),
        map(
            preceded((ws(alt((tag("outs"), tag("out")))), ws(char(':'))), entry_list),
            Clause::Outs,
        ),
        map(ws(tag("nohandle")), |_| Clause::NoHandle),
        map(ws(tag("handle")), |_| Clause::Handle),
        map(ws(tag("noerror")), |_| Clause::NoError),
    ))
    .parse(input)
}

fn entry_list(input: &str) -> IResult<&str, Vec<(usize, ParamAnnotation)>> {
    separated_list1(ws(char(',')), entry).parse(input)
}

/// `<index>` optionally followed by `A`, which in turn may carry either the
/// manual-size marker `M` or a parenthesized size-argument index list.
fn entry(input: &str) -> IResult<&str, (usize, ParamAnnotation)> {
    let (input, index) = ws(nom_u64).parse(input)?;
    let (input, array) = opt(char('A')).parse(input)?;
    if array.is_none() {
        return Ok((input, (index as usize, ParamAnnotation::default())));
    }
    let (input, manual) = opt(char('M')).parse(input)?;
    let (input, sizes) = if manual.is_some() {
        (input, Vec::new())
    } else {
        let (input, sizes) = opt(delimited(
            ws(char('(')),
            separated_list1(ws(char(',')), ws(nom_u64)),
            ws(char(')')),
        ))
        .parse(input)?;
        (input, sizes.unwrap_or_default())
    };
    let param = ParamAnnotation {
        is_array: true,
        size_indices: sizes.into_iter().map(|v| v as usize).collect(),
        manual_size: manual.is_some(),
    };
    Ok((input, (index as usize, param)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_annotation_round_trip() {
        let ann =
            parse_annotation("#annotate ins: 1,2 outs: 3A(4) nohandle noerror#").unwrap();
        assert_eq!(ann.in_args.len(), 2);
        assert!(ann.in_args.contains_key(&1));
        assert!(ann.in_args.contains_key(&2));
        assert!(!ann.in_args[&1].is_array);
        let out = &ann.out_args[&3];
        assert!(out.is_array);
        assert_eq!(out.size_indices, vec![4]);
        assert_eq!(ann.uses_handle, Some(false));
        assert_eq!(ann.returns_error_code, Some(false));
    }

    #[test]
    fn test_short_keywords_and_trailing_comment() {
        let ann = parse_annotation(
            "  #annotate out: 2A(3) # the size of the output array is eNumber",
        )
        .unwrap();
        assert_eq!(ann.out_args.len(), 1);
        assert_eq!(ann.out_args[&2].size_indices, vec![3]);
        assert_eq!(ann.uses_handle, None);
        assert_eq!(ann.returns_error_code, None);
    }

    #[test]
    fn test_manual_size_suffix() {
        let ann = parse_annotation("#annotate out: 2AM# user preallocated#").unwrap();
        let out = &ann.out_args[&2];
        assert!(out.is_array);
        assert!(out.manual_size);
        assert!(out.size_indices.is_empty());
    }

    #[test]
    fn test_handle_keyword_is_a_confirming_noop() {
        let ann = parse_annotation("#annotate handle in: 1#").unwrap();
        assert_eq!(ann.uses_handle, Some(true));
    }

    #[test]
    fn test_conflicting_role_is_rejected() {
        let err = parse_annotation("#annotate ins: 2 outs: 2#").unwrap_err();
        assert!(matches!(err, ParseError::ConflictingRole { index: 2 }));
    }

    #[test]
    fn test_garbage_clause_is_rejected() {
        assert!(parse_annotation("#annotate frobnicate: 1#").is_err());
    }
}
