//! Command-line front end for running a date filter against a query
//! document.

use crate::filter::{DateFilter, DateFilterKind, Filter, FilterData, FilterOptions, QueryDocument};
use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use log::info;
use serde_json::{json, Value as JsonValue};
use std::fs;
use std::path::PathBuf;

/// docadmin - apply an admin date filter to a document query
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Filter kind: date, date-range, datetime or datetime-range
    #[arg(short, long, default_value = "date")]
    pub kind: DateFilterKind,

    /// Filter name (and document field unless the options override it)
    #[arg(short, long)]
    pub field: String,

    /// JSON file with filter options
    #[arg(short, long)]
    pub options: Option<PathBuf>,

    /// JSON file with the submitted filter data
    #[arg(short = 'D', long, conflicts_with = "value")]
    pub data: Option<PathBuf>,

    /// Submitted filter data as inline JSON
    pub value: Option<String>,

    /// Pretty-print the resulting query
    #[arg(short, long)]
    pub pretty: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

/// Run the filter described by `args` and render the result as JSON.
pub fn run(args: &Args) -> Result<String> {
    let options = match &args.options {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read options file {}", path.display()))?;
            serde_json::from_str::<FilterOptions>(&text)
                .with_context(|| format!("Invalid filter options in {}", path.display()))?
        }
        None => FilterOptions::default(),
    };

    let submitted: JsonValue = match (&args.data, &args.value) {
        (Some(path), _) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read data file {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid filter data in {}", path.display()))?
        }
        (None, Some(inline)) => {
            serde_json::from_str(inline).context("Invalid inline filter data")?
        }
        (None, None) => JsonValue::Null,
    };

    let filter = DateFilter::new(&args.field, args.kind, options);
    let data = FilterData::from_json(&submitted);

    let mut query = QueryDocument::new();
    let outcome = filter.apply(&mut query, data.as_ref());
    info!(
        "Filter '{}' ({}) appended {} predicate(s)",
        filter.name(),
        filter.kind(),
        outcome.predicate_count()
    );

    let result = json!({
        "active": outcome.is_active(),
        "query": query.to_document(),
    });

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("docadmin").chain(argv.iter().copied()))
    }

    #[test]
    fn test_args_parsing() {
        let args = parse(&["--field", "createdAt", "--kind", "date-range", "--pretty"]);
        assert_eq!(args.field, "createdAt");
        assert_eq!(args.kind, DateFilterKind::DateRange);
        assert!(args.pretty);
        assert!(!args.debug);
        assert!(args.value.is_none());

        let args = parse(&["-f", "createdAt", r#"{"value":"2024-01-01"}"#]);
        assert_eq!(args.kind, DateFilterKind::Date);
        assert_eq!(args.value.as_deref(), Some(r#"{"value":"2024-01-01"}"#));
    }

    #[test]
    fn test_run_inline_value() {
        let args = parse(&["-f", "createdAt", r#"{"value":"2024-03-15"}"#]);
        let output: JsonValue = serde_json::from_str(&run(&args).unwrap()).unwrap();

        assert_eq!(output["active"], true);
        assert_eq!(
            output["query"],
            json!({
                "$and": [
                    { "createdAt": { "$gte": "2024-03-15T00:00:00" } },
                    { "createdAt": { "$lt": "2024-03-16T00:00:00" } }
                ]
            })
        );
    }

    #[test]
    fn test_run_without_data() {
        let args = parse(&["-f", "createdAt"]);
        let output: JsonValue = serde_json::from_str(&run(&args).unwrap()).unwrap();
        assert_eq!(output, json!({ "active": false, "query": {} }));
    }

    #[test]
    fn test_run_rejects_bad_json() {
        let args = parse(&["-f", "createdAt", "{not json"]);
        assert!(run(&args).is_err());
    }
}
