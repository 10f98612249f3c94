//! Output formatting for grep-like line filter results

use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// One matching line, ready for printing or JSON emission
#[derive(Debug, Clone, Serialize)]
pub struct LineMatch {
    /// Source file; `None` when the line came from stdin
    pub path: Option<PathBuf>,
    /// 1-based line number within the source
    pub line_number: u64,
    /// The full line, without its trailing newline
    pub line: String,
    /// Byte offset where the highlighted span starts
    pub match_start: usize,
    /// Byte offset where the highlighted span ends; equal to `match_start`
    /// when there is nothing to highlight (purely negative queries)
    pub match_end: usize,
}

impl LineMatch {
    /// Build a match, locating the first positive term for highlighting.
    pub fn new(
        path: Option<&Path>,
        line_number: u64,
        line: &str,
        positive_terms: &[&str],
    ) -> Self {
        let (match_start, match_end) = highlight_span(line, positive_terms);
        Self {
            path: path.map(Path::to_path_buf),
            line_number,
            line: line.to_string(),
            match_start,
            match_end,
        }
    }
}

/// Find the first occurrence of any of the terms in `line`, ASCII
/// case-insensitively. Returns `(0, 0)` when none occurs; full
/// case-insensitive matching already happened during evaluation, this only
/// places the highlight.
fn highlight_span(line: &str, terms: &[&str]) -> (usize, usize) {
    let mut best: Option<(usize, usize)> = None;
    for term in terms {
        if let Some(start) = find_ignore_ascii_case(line, term) {
            let span = (start, start + term.len());
            if best.map(|(s, _)| span.0 < s).unwrap_or(true) {
                best = Some(span);
            }
        }
    }
    best.unwrap_or((0, 0))
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    // A window can only match when its first byte agrees with the needle's
    // first byte, which is never a UTF-8 continuation byte, so the returned
    // offset always lands on a char boundary.
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Streaming printer for filter results
pub struct Printer {
    stdout: StandardStream,
    line_numbers: bool,
    show_paths: bool,
}

impl Printer {
    pub fn new(color: bool, line_numbers: bool, show_paths: bool) -> Self {
        let choice = if color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self {
            stdout: StandardStream::stdout(choice),
            line_numbers,
            show_paths,
        }
    }

    /// Print a match line with the matched span highlighted
    pub fn print_match(&mut self, m: &LineMatch) -> io::Result<()> {
        if let Some(path) = m.path.as_ref().filter(|_| self.show_paths) {
            self.stdout
                .set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
            write!(self.stdout, "{}", path.display())?;
            self.stdout.reset()?;
            write!(self.stdout, ":")?;
        }

        if self.line_numbers {
            self.stdout
                .set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            write!(self.stdout, "{}", m.line_number)?;
            self.stdout.reset()?;
            write!(self.stdout, ":")?;
        }

        let content = &m.line;
        let safe_start = m.match_start.min(content.len());
        let safe_end = m.match_end.min(content.len());

        if safe_start > 0 {
            write!(self.stdout, "{}", &content[..safe_start])?;
        }

        if safe_end > safe_start {
            self.stdout
                .set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            write!(self.stdout, "{}", &content[safe_start..safe_end])?;
            self.stdout.reset()?;
        }

        if safe_end < content.len() {
            write!(self.stdout, "{}", &content[safe_end..])?;
        }

        writeln!(self.stdout)?;

        Ok(())
    }

    /// Emit a match as one JSON object per line
    pub fn print_json(&mut self, m: &LineMatch) -> io::Result<()> {
        let json = serde_json::to_string(m)?;
        writeln!(self.stdout, "{}", json)?;
        Ok(())
    }

    /// Print a per-source match count (for -c)
    pub fn print_count(&mut self, path: Option<&Path>, count: usize) -> io::Result<()> {
        if let Some(path) = path.filter(|_| self.show_paths) {
            self.stdout
                .set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
            write!(self.stdout, "{}", path.display())?;
            self.stdout.reset()?;
            write!(self.stdout, ":")?;
        }
        self.stdout
            .set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        writeln!(self.stdout, "{}", count)?;
        self.stdout.reset()?;
        Ok(())
    }
}
