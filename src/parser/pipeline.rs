// Pipeline parser for the settings-update DSL

use super::ast::Pipeline;
use super::command::parse_command;
use super::lexer::ws;
use nom::{
    bytes::complete::tag,
    combinator::{eof, opt},
    multi::separated_list0,
    IResult,
};

/// Parse a complete update pipeline
/// Format: command | command | ...  (empty input is an empty pipeline)
pub fn parse_pipeline(input: &str) -> IResult<&str, Pipeline> {
    // If input starts with "|", consume it
    let (input, _) = opt(ws(tag("|")))(input)?;

    let (input, commands) = separated_list0(ws(tag("|")), parse_command)(input)?;

    // Consume trailing whitespace and ensure end of input
    let (input, _) = ws(eof)(input)?;

    Ok((input, Pipeline { commands }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::Command;
    use crate::settings::{PlotType, SettingsUpdate};

    #[test]
    fn test_parse_single_command() {
        let (_, pipeline) = parse_pipeline("cutoff_max(10)").unwrap();
        assert_eq!(pipeline.commands, vec![Command::CutoffMax(Some(10.0))]);
    }

    #[test]
    fn test_parse_multiple_commands() {
        let (_, pipeline) =
            parse_pipeline("type(histogram) | field(n_genes) | bins(30) | cutoff(200, 6000)").unwrap();
        assert_eq!(pipeline.commands.len(), 4);
        assert_eq!(pipeline.commands[0], Command::Type(PlotType::Histogram));
    }

    #[test]
    fn test_range_commands_expand() {
        let (_, pipeline) = parse_pipeline("zoom(0, 100) | cutoff(none, 50)").unwrap();
        assert_eq!(
            pipeline.updates(),
            vec![
                SettingsUpdate::ZoomMin(Some(0.0)),
                SettingsUpdate::ZoomMax(Some(100.0)),
                SettingsUpdate::CutoffMin(None),
                SettingsUpdate::CutoffMax(Some(50.0)),
            ]
        );
    }

    #[test]
    fn test_parse_empty_input() {
        let (_, pipeline) = parse_pipeline("   ").unwrap();
        assert!(pipeline.commands.is_empty());
    }

    #[test]
    fn test_parse_leading_pipe() {
        let (_, pipeline) = parse_pipeline("| bins(10)").unwrap();
        assert_eq!(pipeline.commands, vec![Command::Bins(Some(10))]);
    }

    #[test]
    fn test_parse_trailing_pipe() {
        // Trailing pipe should fail (nothing after last pipe)
        assert!(parse_pipeline("bins(10) |").is_err());
    }

    #[test]
    fn test_parse_garbage_tail() {
        assert!(parse_pipeline("bins(10) nonsense").is_err());
    }
}
