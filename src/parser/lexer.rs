// Token-level parsers shared by the command parsers

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{alpha1, alphanumeric1, char, multispace0},
    combinator::{map, not, peek, recognize, value},
    multi::many0_count,
    number::complete::double,
    sequence::{delimited, pair, terminated},
    IResult,
};

/// Wrap a parser so it skips surrounding whitespace
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Column-style identifier: letters, digits, `_` and `.`, not starting with a digit
pub fn identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0_count(alt((alphanumeric1, tag("_"), tag(".")))),
        )),
        str::to_string,
    )(input)
}

/// Double-quoted string without escapes
pub fn string_literal(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
        str::to_string,
    )(input)
}

pub fn number_literal(input: &str) -> IResult<&str, f64> {
    double(input)
}

/// A column name, bare or quoted
pub fn column_name(input: &str) -> IResult<&str, String> {
    alt((string_literal, identifier))(input)
}

/// The `none` keyword (but not an identifier that merely starts with it)
pub fn none_keyword(input: &str) -> IResult<&str, ()> {
    value(
        (),
        terminated(tag("none"), not(peek(alt((alphanumeric1, tag("_")))))),
    )(input)
}

/// A number, or `none` to leave the value unset
pub fn optional_number(input: &str) -> IResult<&str, Option<f64>> {
    alt((value(None, none_keyword), map(number_literal, Some)))(input)
}
