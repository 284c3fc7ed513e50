//! Command line options

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use tl_core::{parse_date, EventId};

/// Lays out a project's events and prints the resulting chart
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "timeline")]
#[command(about = "Lays out a project's events and prints the resulting chart")]
pub struct Args {
    /// Project document; without it the current project under --root is used
    #[arg(value_name = "DATA_JSON")]
    pub project: Option<PathBuf>,

    /// Projects root folder
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Layout configuration (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Zoom factor
    #[arg(long, default_value_t = 1.0)]
    pub zoom: f64,

    /// First visible day (YYYY-MM-DD)
    #[arg(long, value_parser = date_arg)]
    pub from: Option<NaiveDate>,

    /// Last visible day (YYYY-MM-DD)
    #[arg(long, value_parser = date_arg)]
    pub to: Option<NaiveDate>,

    /// Date used when nothing else anchors the view
    #[arg(long, value_parser = date_arg)]
    pub today: Option<NaiveDate>,

    /// Show only this place (repeatable)
    #[arg(long = "place", value_name = "NAME")]
    pub places: Vec<String>,

    /// Highlight this character (repeatable)
    #[arg(long = "character", value_name = "NAME")]
    pub characters: Vec<String>,

    /// Drag event INDEX to start on DATE and save
    #[arg(long, value_name = "INDEX=DATE", value_parser = reschedule_arg)]
    pub reschedule: Option<(EventId, NaiveDate)>,

    /// Print cards as JSON
    #[arg(long)]
    pub json: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            project: None,
            root: PathBuf::from("."),
            config: None,
            zoom: 1.0,
            from: None,
            to: None,
            today: None,
            places: Vec::new(),
            characters: Vec::new(),
            reschedule: None,
            json: false,
        }
    }
}

fn date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw).ok_or_else(|| format!("invalid date '{raw}', expected YYYY-MM-DD"))
}

fn reschedule_arg(raw: &str) -> Result<(EventId, NaiveDate), String> {
    let (index, date) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=DATE, got '{raw}'"))?;
    let index: usize = index
        .trim()
        .parse()
        .map_err(|_| format!("invalid event index '{index}'"))?;
    Ok((EventId(index), date_arg(date)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("timeline").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args, Args::default());
    }

    #[test]
    fn test_full_command_line() {
        let args = parse(&[
            "projects/saga/data.json",
            "--zoom",
            "1.5",
            "--from",
            "2024-01-01",
            "--place",
            "Castle",
            "--place",
            "Forest",
            "--character",
            "Alice",
            "--reschedule",
            "2=2024-03-10",
            "--json",
        ])
        .unwrap();

        assert_eq!(args.project, Some(PathBuf::from("projects/saga/data.json")));
        assert_eq!(args.zoom, 1.5);
        assert_eq!(args.from, parse_date("2024-01-01"));
        assert_eq!(args.to, None);
        assert_eq!(args.places, vec!["Castle", "Forest"]);
        assert_eq!(args.characters, vec!["Alice"]);
        assert_eq!(
            args.reschedule,
            Some((EventId(2), parse_date("2024-03-10").unwrap()))
        );
        assert!(args.json);
    }

    #[test]
    fn test_help_and_errors() {
        assert_eq!(parse(&["--help"]).unwrap_err().kind(), ErrorKind::DisplayHelp);
        assert!(parse(&["--zoom"]).is_err());
        assert!(parse(&["--zoom", "fast"]).is_err());
        assert!(parse(&["--from", "03/01/2024"]).is_err());
        assert!(parse(&["--reschedule", "2024-03-10"]).is_err());
        assert!(parse(&["--reschedule", "x=2024-03-10"]).is_err());
        assert!(parse(&["--verbose"]).is_err());
        assert!(parse(&["a.json", "b.json"]).is_err());
    }
}
