use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use clap::Parser;

use xmltojson::{json, Converter, Failure, Options};

#[derive(Debug, Parser)]
#[command(
    name = "xmltojson",
    version,
    about = "Convert XML to JSON with dot-path move rules"
)]
struct Args {
    /// Input XML file (defaults to stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
    /// Fetch the XML from a URL instead of a file
    #[cfg(feature = "http")]
    #[arg(short, long, conflicts_with = "input")]
    url: Option<String>,
    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
    /// Include the full namespace table on every element
    #[arg(long)]
    namespaces: bool,
    /// Coerce boolean, null and integer text values
    #[arg(short = 't', long)]
    detect_types: bool,
    /// Store empty values as null instead of ""
    #[arg(long)]
    empty_values_as_null: bool,
    /// Move rule SRC=DST, applied in order (repeatable)
    #[arg(short, long = "move", value_name = "SRC=DST")]
    moves: Vec<String>,
    /// Remove source parents left empty by moves
    #[arg(long)]
    clear_empty_nodes: bool,
    /// Key used for element text content
    #[arg(long, default_value = "$")]
    value_identifier: String,
    /// Prefix for attribute-derived keys
    #[arg(long, default_value = "_")]
    attribute_identifier: String,
    /// Print only the value at this dot-path
    #[arg(short, long, value_name = "PATH")]
    get: Option<String>,
    /// Print the values found at this dot-path, with sequence fan-out
    #[arg(short, long, value_name = "PATH", conflicts_with = "get")]
    find: Option<String>,
    /// Condition applied to --find results, e.g. 'price > 10'
    #[arg(long, value_name = "COND", requires = "find")]
    r#where: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let failure: Arc<Mutex<Option<Failure>>> = Arc::new(Mutex::new(None));
    let options = build_options(&args, &failure)?;

    let converter = convert(&args, options)?;
    if let Ok(guard) = failure.lock() {
        if let Some(failure) = guard.as_ref() {
            bail!("conversion failed ({}): {}", failure.code, failure.message);
        }
    }

    let rendered = match (&args.get, &args.find) {
        (Some(path), _) => match converter.get(path) {
            Some(value) => json::to_string(value),
            None => bail!("path {path} resolves to nothing"),
        },
        (None, Some(path)) => match converter.find(path, args.r#where.as_deref()) {
            Some(value) => json::to_string(&value),
            None => bail!("path {path} resolves to nothing"),
        },
        (None, None) => json::to_string(converter.json()),
    };

    write_output(&args.output, rendered.as_bytes())
}

fn build_options(args: &Args, failure: &Arc<Mutex<Option<Failure>>>) -> Result<Options> {
    let modify = indexmap_from_moves(&args.moves)?;
    let sink = Arc::clone(failure);
    Ok(Options {
        namespaces: args.namespaces,
        value_identifier: args.value_identifier.clone(),
        attribute_identifier: args.attribute_identifier.clone(),
        empty_values_as_null: args.empty_values_as_null,
        modify,
        clear_empty_nodes: args.clear_empty_nodes,
        detect_types: args.detect_types,
        fallback: Some(Arc::new(move |f: &Failure| {
            if let Ok(mut guard) = sink.lock() {
                *guard = Some(f.clone());
            }
        })),
        ..Options::default()
    })
}

fn indexmap_from_moves(moves: &[String]) -> Result<indexmap::IndexMap<String, String>> {
    let mut modify = indexmap::IndexMap::new();
    for rule in moves {
        let Some((src, dst)) = rule.split_once('=') else {
            bail!("invalid move rule {rule:?}; expected SRC=DST");
        };
        if src.is_empty() {
            bail!("invalid move rule {rule:?}; source path is empty");
        }
        modify.insert(src.to_string(), dst.to_string());
    }
    Ok(modify)
}

#[cfg(feature = "http")]
fn convert(args: &Args, options: Options) -> Result<Converter> {
    if let Some(url) = &args.url {
        return Ok(Converter::from_url(url, options, &xmltojson::HttpFetch));
    }
    let input = read_input(&args.input)?;
    Ok(Converter::from_str(&input, options))
}

#[cfg(not(feature = "http"))]
fn convert(args: &Args, options: Options) -> Result<Converter> {
    let input = read_input(&args.input)?;
    Ok(Converter::from_str(&input, options))
}

fn read_input(path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            if buffer.trim().is_empty() {
                bail!("no input provided on stdin");
            }
            Ok(buffer)
        }
    }
}

fn write_output(path: &Option<PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            stdout.write_all(b"\n").context("failed to write stdout")?;
            Ok(())
        }
    }
}
