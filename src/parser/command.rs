// Command parsers for the settings-update DSL
//
// Every command has the shape `name(args)`. Range commands take two
// comma-separated values; `none` leaves a value unset.

use super::ast::Command;
use super::lexer::{column_name, none_keyword, optional_number, ws};
use super::scale::parse_scale_command;
use crate::settings::PlotType;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, u32 as uint},
    combinator::{map, value},
    sequence::preceded,
    IResult,
};

/// type(histogram) | type(bar)
pub fn parse_type(input: &str) -> IResult<&str, Command> {
    let (input, _) = ws(tag("type"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, plot_type) = ws(alt((
        value(PlotType::Histogram, tag("histogram")),
        value(PlotType::Bar, tag("bar")),
    )))(input)?;
    let (input, _) = ws(char(')'))(input)?;
    Ok((input, Command::Type(plot_type)))
}

/// field(n_counts) or field("total counts")
pub fn parse_field(input: &str) -> IResult<&str, Command> {
    let (input, _) = ws(tag("field"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, name) = ws(column_name)(input)?;
    let (input, _) = ws(char(')'))(input)?;
    Ok((input, Command::Field(name)))
}

/// group_by(plate) or group_by(none)
pub fn parse_group_by(input: &str) -> IResult<&str, Command> {
    let (input, _) = ws(tag("group_by"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, name) = ws(column_name)(input)?;
    let (input, _) = ws(char(')'))(input)?;
    let group_by = if name == "none" { None } else { Some(name) };
    Ok((input, Command::GroupBy(group_by)))
}

/// bins(40) or bins(none)
pub fn parse_bins(input: &str) -> IResult<&str, Command> {
    let (input, _) = ws(tag("bins"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, n) = ws(alt((
        value(None, none_keyword),
        map(uint, Some),
    )))(input)?;
    let (input, _) = ws(char(')'))(input)?;
    Ok((input, Command::Bins(n)))
}

fn range_args(input: &str) -> IResult<&str, (Option<f64>, Option<f64>)> {
    let (input, _) = ws(char('('))(input)?;
    let (input, min) = ws(optional_number)(input)?;
    let (input, _) = ws(char(','))(input)?;
    let (input, max) = ws(optional_number)(input)?;
    let (input, _) = ws(char(')'))(input)?;
    Ok((input, (min, max)))
}

fn single_arg(input: &str) -> IResult<&str, Option<f64>> {
    let (input, _) = ws(char('('))(input)?;
    let (input, v) = ws(optional_number)(input)?;
    let (input, _) = ws(char(')'))(input)?;
    Ok((input, v))
}

/// zoom(min, max) | zoom_min(v) | zoom_max(v)
pub fn parse_zoom(input: &str) -> IResult<&str, Command> {
    alt((
        map(
            preceded(ws(tag("zoom_min")), single_arg),
            Command::ZoomMin,
        ),
        map(
            preceded(ws(tag("zoom_max")), single_arg),
            Command::ZoomMax,
        ),
        map(
            preceded(ws(tag("zoom")), range_args),
            |(min, max)| Command::Zoom { min, max },
        ),
    ))(input)
}

/// cutoff(min, max) | cutoff_min(v) | cutoff_max(v)
pub fn parse_cutoff(input: &str) -> IResult<&str, Command> {
    alt((
        map(
            preceded(ws(tag("cutoff_min")), single_arg),
            Command::CutoffMin,
        ),
        map(
            preceded(ws(tag("cutoff_max")), single_arg),
            Command::CutoffMax,
        ),
        map(
            preceded(ws(tag("cutoff")), range_args),
            |(min, max)| Command::Cutoff { min, max },
        ),
    ))(input)
}

/// Any single command
pub fn parse_command(input: &str) -> IResult<&str, Command> {
    alt((
        parse_type,
        parse_field,
        parse_group_by,
        parse_scale_command,
        parse_bins,
        parse_zoom,
        parse_cutoff,
    ))(input)
}
