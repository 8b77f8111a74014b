use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use sbkit::object::{Node, Payload};
use sbkit::{FloatPolicy, ParseOptions, SbArchive};
use serde_json::{Map, Value, json};

#[derive(Parser)]
#[command(name = "sbdump", about = "Dump a Scratch 1.x project as JSON")]
struct Cli {
    /// Path to the `.sb` project.
    file: PathBuf,
    /// Print the project info table instead of the targets.
    #[arg(long)]
    info: bool,
    /// Post-processing applied to decoded doubles.
    #[arg(long, value_enum, default_value = "exact")]
    float_policy: FloatPolicyArg,
    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FloatPolicyArg {
    Exact,
    Nudge,
}

impl From<FloatPolicyArg> for FloatPolicy {
    fn from(arg: FloatPolicyArg) -> Self {
        match arg {
            FloatPolicyArg::Exact => FloatPolicy::Exact,
            FloatPolicyArg::Nudge => FloatPolicy::Nudge,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let data = fs::read(&cli.file).with_context(|| format!("reading {}", cli.file.display()))?;
    let options = ParseOptions::default().with_float_policy(cli.float_policy.into());
    let archive = SbArchive::parse_with(&data, &options)
        .with_context(|| format!("decoding {}", cli.file.display()))?;

    let output = if cli.info {
        let entries: Map<String, Value> = archive
            .info()
            .entries()
            .map(|(key, node)| (key.to_owned(), summarize(node)))
            .collect();
        Value::Object(entries)
    } else {
        let targets = archive.targets().context("translating project")?;
        serde_json::to_value(targets)?
    };

    let text = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{text}");
    Ok(())
}

/// Scalars as themselves, everything else as its class label.
fn summarize(node: &Node) -> Value {
    match &node.payload {
        Payload::Null => Value::Null,
        Payload::Bool(b) => json!(b),
        Payload::Str(s) => json!(s),
        Payload::Bytes(b) => json!(format!("<{} bytes>", b.len())),
        _ => match node.as_f64() {
            Some(v) => json!(v),
            None => json!(format!("<{}>", node.class_name)),
        },
    }
}
