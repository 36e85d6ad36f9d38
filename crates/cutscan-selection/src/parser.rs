//! Selection grammar parser using nom
//!
//! Grammar (loosest binding first):
//! ```text
//! or_expr   := and_expr ('||' and_expr)*
//! and_expr  := not_expr ('&&' not_expr)*
//! not_expr  := '!' not_expr | atom
//! atom      := 'all' | 'none' | '(' or_expr ')' | comparison
//! comparison:= value op value
//! op        := '<' | '<=' | '>' | '>=' | '==' | '!='
//! value     := identifier | number
//! ```

use crate::ast::*;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0, satisfy},
    combinator::{map, not, recognize, value},
    multi::many0,
    number::complete::double,
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};
use thiserror::Error;

/// Parse errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unexpected end of input")]
    UnexpectedEnd,

    #[error("Unexpected characters at end: '{0}'")]
    TrailingInput(String),
}

/// Result type for parsing
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse a selection expression from a string
///
/// An empty (or all-whitespace) string selects every row.
pub fn parse_selection(input: &str) -> ParseResult<SelectionExpr> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(SelectionExpr::All);
    }

    match or_expr(input) {
        Ok(("", result)) => Ok(result),
        Ok((remaining, _)) => Err(ParseError::TrailingInput(remaining.to_string())),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ParseError::Parse(format!(
            "unexpected input at '{}' in '{}'",
            e.input, input
        ))),
        Err(nom::Err::Incomplete(_)) => Err(ParseError::UnexpectedEnd),
    }
}

/// Parse whitespace
fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Parse OR expressions
fn or_expr(input: &str) -> IResult<&str, SelectionExpr> {
    let (input, first) = and_expr(input)?;
    let (input, rest) = many0(preceded(ws(tag("||")), and_expr))(input)?;

    let result = rest.into_iter().fold(first, SelectionExpr::or);
    Ok((input, result))
}

/// Parse AND expressions
fn and_expr(input: &str) -> IResult<&str, SelectionExpr> {
    let (input, first) = not_expr(input)?;
    let (input, rest) = many0(preceded(ws(tag("&&")), not_expr))(input)?;

    let result = rest.into_iter().fold(first, SelectionExpr::and);
    Ok((input, result))
}

/// Parse NOT expressions
fn not_expr(input: &str) -> IResult<&str, SelectionExpr> {
    alt((
        map(preceded(ws(char('!')), not_expr), SelectionExpr::not),
        atom,
    ))(input)
}

/// Parse atomic expressions
fn atom(input: &str) -> IResult<&str, SelectionExpr> {
    ws(alt((
        // Keywords
        value(SelectionExpr::All, keyword("all")),
        value(SelectionExpr::None, keyword("none")),
        // Parenthesized expression
        delimited(char('('), or_expr, char(')')),
        // Comparison (value op value)
        map(comparison, SelectionExpr::Comparison),
    )))(input)
}

/// Match a keyword that is not the prefix of a longer identifier
fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag(kw), not(satisfy(is_identifier_char)))
}

/// Parse a comparison
fn comparison(input: &str) -> IResult<&str, Comparison> {
    let (input, lhs) = parse_value(input)?;
    let (input, op) = ws(comparison_op)(input)?;
    let (input, rhs) = parse_value(input)?;
    Ok((input, Comparison::new(lhs, op, rhs)))
}

/// Parse a comparison operator
fn comparison_op(input: &str) -> IResult<&str, ComparisonOp> {
    alt((
        value(ComparisonOp::Le, tag("<=")),
        value(ComparisonOp::Ge, tag(">=")),
        value(ComparisonOp::Eq, tag("==")),
        value(ComparisonOp::Ne, tag("!=")),
        value(ComparisonOp::Lt, tag("<")),
        value(ComparisonOp::Gt, tag(">")),
    ))(input)
}

/// Parse a value
fn parse_value(input: &str) -> IResult<&str, Value> {
    ws(alt((
        // Identifiers first: `double` would otherwise eat names like `inf_pt`
        map(identifier, |s| Value::Field(s.to_string())),
        map(double, Value::Number),
    )))(input)
}

/// Parse an identifier (starts with letter or underscore, followed by alphanumeric or underscore)
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(is_identifier_char),
    ))(input)
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
