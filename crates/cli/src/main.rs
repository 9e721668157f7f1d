// ABOUTME: CLI for extracting elements from HTML with the peasoup scanner.
// ABOUTME: Loads a document from URL, file or stdin, runs one tag query and prints JSON, HTML or text.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use peasoup::{Document, Element, NestingStrategy, Predicate, Regex};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Extract elements by tag name and attributes and print them.
#[derive(Parser, Debug)]
#[command(name = "peasoup")]
#[command(about = "Extract HTML elements by tag name and attributes", long_about = None)]
struct Args {
    /// Page URL (http/https) or local file path. Use "-" to read from stdin.
    target: String,

    /// Tag name to search for.
    #[arg(short = 't', long = "tag", required_unless_present = "title")]
    tag: Option<String>,

    /// Required attribute value, as name=value. Repeatable.
    #[arg(short = 'a', long = "attr", value_name = "NAME=VALUE")]
    attrs: Vec<String>,

    /// Required attribute pattern, as name=regex. Repeatable; overrides --attr on the same name.
    #[arg(long = "attr-re", value_name = "NAME=REGEX")]
    attr_patterns: Vec<String>,

    /// Maximum number of elements to return.
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Print only the document title.
    #[arg(long, conflicts_with = "tag")]
    title: bool,

    /// How element ends are located: heuristic (forward scan) or balanced (depth counting).
    #[arg(long, default_value_t = NestingStrategy::Heuristic)]
    nesting: NestingStrategy,

    /// Also report elements nested inside an earlier result.
    #[arg(long, default_value_t = false)]
    nested: bool,

    /// Output format: json (default), html, text.
    #[arg(short = 'f', long = "format", default_value = "json")]
    format: String,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// Fail if the scan stops early instead of printing partial results.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    let html = load_text(&args.target)?;
    let doc = Document::builder()
        .nesting(args.nesting)
        .nested(args.nested)
        .build(&html);

    if !doc.is_html() {
        tracing::warn!(input = %args.target, "input does not look like HTML, nothing to extract");
    }

    let elements = if args.title {
        doc.title().into_iter().collect()
    } else {
        let tag = args.tag.as_deref().ok_or_else(|| anyhow!("--tag is required"))?;
        let mut query = doc.query(tag).attrs(parse_literals(&args.attrs)?);
        for (name, re) in parse_patterns(&args.attr_patterns)? {
            query = query.attr(name, re);
        }
        if let Some(limit) = args.limit {
            query = query.limit(limit);
        }

        let outcome = query.scan();
        if let Some(err) = outcome.error {
            if args.strict {
                return Err(anyhow::Error::new(err));
            }
            tracing::warn!(error = %err, "scan stopped early, output is partial");
        }
        outcome.elements
    };

    println!("{}", render(&elements, &args.format, args.compact)?);
    Ok(())
}

fn render(elements: &[Element], format: &str, compact: bool) -> Result<String> {
    match format.to_lowercase().as_str() {
        "json" => {
            let items: Vec<Value> = elements.iter().map(element_json).collect();
            let output = Value::Array(items);
            Ok(if compact {
                serde_json::to_string(&output)?
            } else {
                serde_json::to_string_pretty(&output)?
            })
        }
        "html" => Ok(elements
            .iter()
            .map(|el| el.fragment())
            .collect::<Vec<_>>()
            .join("\n")),
        "text" | "txt" => Ok(elements
            .iter()
            .map(|el| el.text().split_whitespace().collect::<Vec<_>>().join(" "))
            .collect::<Vec<_>>()
            .join("\n")),
        other => bail!("unknown format: {}", other),
    }
}

fn element_json(el: &Element) -> Value {
    json!({
        "tag": el.name(),
        "attrs": el.attrs(),
        "text": el.text(),
        "html": el.fragment(),
    })
}

fn split_pair(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value)),
        _ => bail!("expected NAME=VALUE, got {:?}", raw),
    }
}

fn parse_literals(raw: &[String]) -> Result<Predicate> {
    raw.iter()
        .map(|pair| split_pair(pair).map(|(name, value)| (name.to_string(), value.to_string())))
        .collect::<Result<Vec<_>>>()
        .map(|pairs| pairs.into_iter().collect())
}

fn parse_patterns(raw: &[String]) -> Result<Vec<(String, Regex)>> {
    raw.iter()
        .map(|pair| {
            let (name, pattern) = split_pair(pair)?;
            let re = Regex::new(pattern)
                .with_context(|| format!("invalid pattern for attribute {}", name))?;
            Ok((name.to_string(), re))
        })
        .collect()
}

fn load_text(target: &str) -> Result<String> {
    if target == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }

    if let Ok(url) = Url::parse(target) {
        if url.scheme() == "http" || url.scheme() == "https" {
            let resp = reqwest::blocking::get(url)?.error_for_status()?;
            return Ok(resp.text()?);
        }
    }

    let path = PathBuf::from(target);
    if !path.exists() {
        return Err(anyhow!("file not found: {}", target));
    }
    let bytes = fs::read(&path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
