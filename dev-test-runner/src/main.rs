//! Fixture runner: struct definition in, expected schema (or error) out.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use colored::Colorize;
use json_struct_schema::{Config, Struct, make_with, path_de};
use rayon::prelude::*;
use serde::Deserialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// convert every fixture's struct and compare against its expectation
#[derive(Parser, Debug)]
struct CommandLineInterface {
    /// fixture files; literal paths or quoted glob patterns
    #[arg(default_value = "dev-test-runner/fixtures/*.json")]
    fixtures: Vec<String>,

    /// optional JSON config applied to every fixture (e.g. {"maxDepth": 16})
    #[arg(long)]
    config: Option<PathBuf>,

    /// -v for debug, -vv for trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct Fixture {
    #[serde(rename = "struct")]
    struct_: Struct,
    expect: Expect,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
enum Expect {
    Ok(Value),
    Err(String),
}

enum Outcome {
    Pass,
    Fail(String),
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

fn main() -> ExitCode {
    let cli = CommandLineInterface::parse();
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            ExitCode::from(2)
        }
    }
}

fn run(cli: &CommandLineInterface) -> Result<bool> {
    let config = match &cli.config {
        None => Config::default(),
        Some(path) => {
            let source = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            path_de::from_slice_with_path(&source).with_context(|| format!("parsing {}", path.display()))?
        }
    };
    let paths = resolve_file_path_patterns(&cli.fixtures)?;
    if paths.is_empty() {
        bail!("no fixtures given");
    }
    tracing::info!(fixtures = paths.len(), max_depth = config.max_depth, "running fixtures");

    let results = paths
        .par_iter()
        .map(|path| (path, check(path, &config)))
        .collect::<Vec<_>>();

    let mut failed = 0usize;
    for (path, result) in &results {
        let name = path.display();
        match result {
            Ok(Outcome::Pass) => println!("{} {name}", "✅".green()),
            Ok(Outcome::Fail(why)) => {
                failed += 1;
                println!("{} {name}\n{why}", "❌".red());
            }
            Err(error) => {
                failed += 1;
                println!("{} {name}: {error:#}", "⚠️".yellow());
            }
        }
    }
    let summary = format!("{} passed, {} failed", results.len() - failed, failed);
    println!("{}", if failed == 0 { summary.green() } else { summary.red() });
    Ok(failed == 0)
}

fn check(path: &Path, config: &Config) -> Result<Outcome> {
    let source = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let fixture: Fixture = path_de::from_str_with_path(&source)?;
    let actual = make_with(&fixture.struct_, config).map_err(|e| e.to_string());
    let outcome = match (&fixture.expect, &actual) {
        (Expect::Ok(want), Ok(got)) if want == got => Outcome::Pass,
        (Expect::Err(want), Err(got)) if want == got => Outcome::Pass,
        (want, got) => Outcome::Fail(format!("  expected: {}\n  actual:   {}", render_expect(want)?, render_actual(got)?)),
    };
    Ok(outcome)
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn render_expect(expect: &Expect) -> Result<String> {
    Ok(match expect {
        Expect::Ok(v) => serde_json::to_string(v)?,
        Expect::Err(msg) => format!("error {msg:?}"),
    })
}

fn render_actual(actual: &std::result::Result<Value, String>) -> Result<String> {
    Ok(match actual {
        Ok(v) => serde_json::to_string(v)?,
        Err(msg) => format!("error {msg:?}"),
    })
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();
    for raw in patterns {
        let pattern = raw.as_ref();
        if !has_glob_chars(pattern) {
            out.push(PathBuf::from(pattern));
            continue;
        }
        let mut matched_any = false;
        for entry in glob::glob(pattern)? {
            out.push(entry?);
            matched_any = true;
        }
        if !matched_any {
            return Err(anyhow!("glob pattern matched no files: {pattern}"));
        }
    }
    out.sort();
    Ok(out)
}
