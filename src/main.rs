mod output;
mod query;

use anyhow::{Context, Result};
use clap::Parser;
use output::{LineMatch, Printer};
use query::CompiledQuery;
use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Boolean search filter for logs and text streams")]
struct Cli {
    /// Search expression, e.g. 'error -debug' or '(warning|error) "not found"'
    query: String,

    /// Files to filter; reads stdin when none are given (or for "-")
    files: Vec<PathBuf>,

    /// Print only a count of matching lines per input
    #[arg(short, long)]
    count: bool,

    /// Print lines that do not match
    #[arg(short = 'v', long)]
    invert_match: bool,

    /// Prefix each line with its line number
    #[arg(short = 'n', long)]
    line_number: bool,

    /// Emit matches as JSON, one object per line
    #[arg(long)]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let query = query::compile(&cli.query);
    log::debug!("compiled {:?} into {:?}", cli.query, query.root);

    let color = !cli.no_color && io::stdout().is_terminal();
    // Prefix lines with their origin only when filtering several files
    let show_paths = cli.files.len() > 1;
    let mut printer = Printer::new(color, cli.line_number, show_paths);

    if cli.files.is_empty() {
        let stdin = io::stdin();
        filter_input(stdin.lock(), None, &query, &cli, &mut printer)?;
    } else {
        for path in &cli.files {
            if path.as_os_str() == "-" {
                let stdin = io::stdin();
                filter_input(stdin.lock(), None, &query, &cli, &mut printer)?;
                continue;
            }
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            filter_input(BufReader::new(file), Some(path.as_path()), &query, &cli, &mut printer)?;
        }
    }

    Ok(())
}

/// Run the compiled query over every line of one input, printing matches
/// (or a count) as they are found.
fn filter_input<R: BufRead>(
    reader: R,
    path: Option<&Path>,
    query: &CompiledQuery,
    cli: &Cli,
    printer: &mut Printer,
) -> Result<usize> {
    let positive_terms = query.positive_terms();
    let mut matched = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("failed to read input line")?;

        // An unusable query shows nothing, in either direction
        let Some(hit) = query.exec(&line) else {
            continue;
        };
        if hit == cli.invert_match {
            continue;
        }

        matched += 1;
        if cli.count {
            continue;
        }

        let terms: &[&str] = if hit { &positive_terms } else { &[] };
        let m = LineMatch::new(path, index as u64 + 1, &line, terms);
        if cli.json {
            printer.print_json(&m)?;
        } else {
            printer.print_match(&m)?;
        }
    }

    if cli.count {
        printer.print_count(path, matched)?;
    }

    Ok(matched)
}
