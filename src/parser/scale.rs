use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::{map, value},
    IResult,
};
use crate::parser::ast::{Axis, Command};
use crate::parser::lexer::ws;
use crate::settings::AxisType;

fn axis_type(input: &str) -> IResult<&str, AxisType> {
    alt((
        value(AxisType::Linear, tag("linear")),
        value(AxisType::Log, tag("log")),
    ))(input)
}

pub fn parse_x_scale(input: &str) -> IResult<&str, AxisType> {
    let (input, _) = ws(tag("x_scale"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, scale) = ws(axis_type)(input)?;
    let (input, _) = ws(char(')'))(input)?;
    Ok((input, scale))
}

pub fn parse_y_scale(input: &str) -> IResult<&str, AxisType> {
    let (input, _) = ws(tag("y_scale"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, scale) = ws(axis_type)(input)?;
    let (input, _) = ws(char(')'))(input)?;
    Ok((input, scale))
}

pub fn parse_scale_command(input: &str) -> IResult<&str, Command> {
    alt((
        map(parse_x_scale, |scale| Command::Scale { axis: Axis::X, scale }),
        map(parse_y_scale, |scale| Command::Scale { axis: Axis::Y, scale }),
    ))(input)
}
