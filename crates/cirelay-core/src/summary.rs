//! Log summarization.
//!
//! Cleans a raw CI log (terminal escapes, blank lines, known noise) and
//! renders the detailed summary message. The failure signal inferred here is
//! independent of the reported job statuses used by [`crate::outcome`].

use std::sync::LazyLock;

use regex::Regex;

use crate::outcome::status_icon;

/// CSI sequences and the other two-byte ESC-introduced sequences.
static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1B(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])")
        .expect("ansi escape pattern is valid and tested")
});

/// Horizontal rule between the status line and the log body.
pub const SEPARATOR: &str = "──────────────────────────────────────────────────────────────";

/// Remove terminal escape sequences.
pub fn strip_ansi(raw: &str) -> String {
    ANSI_ESCAPE.replace_all(raw, "").into_owned()
}

/// Line boundaries: `\n`, `\r`, vertical tab, form feed, the file/group/record
/// separators, NEL, and the Unicode line and paragraph separators.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c'..='\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Lines that carry no information in a summary.
fn is_noise(trimmed: &str) -> bool {
    trimmed == "Logs" || trimmed.starts_with("Backend:")
}

/// A CI log with escapes, blank lines, and noise lines removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizedLog {
    lines: Vec<String>,
}

impl SanitizedLog {
    /// Clean `raw`; an absent log is treated as empty.
    ///
    /// Surviving lines keep their leading whitespace and lose trailing
    /// whitespace. `\r\n`, lone `\n`/`\r`, and the other separators
    /// accepted by `is_line_break` all end a line.
    pub fn from_raw(raw: Option<&str>) -> Self {
        let cleaned = strip_ansi(raw.unwrap_or_default());
        let lines = cleaned
            .split(is_line_break)
            .filter(|line| {
                let trimmed = line.trim();
                !trimmed.is_empty() && !is_noise(trimmed)
            })
            .map(|line| line.trim_end().to_string())
            .collect();
        SanitizedLog { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Surviving lines joined with `\n`.
    pub fn body(&self) -> String {
        self.lines.join("\n")
    }

    /// True if any line contains `FAIL` (case-sensitive, which also covers
    /// `FAILED`) or `error` in any case.
    pub fn indicates_failure(&self) -> bool {
        self.lines
            .iter()
            .any(|line| line.contains("FAIL") || line.to_lowercase().contains("error"))
    }
}

/// Render the detailed summary message.
///
/// Pure: identical inputs give identical output. The log body section is
/// left out entirely when nothing survives cleaning.
pub fn summarize(
    repo_short_name: &str,
    pr_label: &str,
    raw_log: Option<&str>,
    backend_reported_success: bool,
) -> String {
    let log = SanitizedLog::from_raw(raw_log);
    let backend_ok = backend_reported_success && !log.indicates_failure();

    let mut sections = vec![
        format!("📊 Detailed Summary for **{}**", repo_short_name),
        format!("Backend: {}", status_icon(backend_ok)),
        SEPARATOR.to_string(),
    ];
    if !log.is_empty() {
        sections.push(log.body());
    }
    sections.push(format!("\nPR: #{}", pr_label));

    sections.join("\n")
}
