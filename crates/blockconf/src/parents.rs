//! First-phase scan of top-level configuration lines
//!
//! Child records (a BGP address family, say) need data that only appears on
//! their enclosing block's header. Rather than threading that through the
//! line classifier, every top-level line is indexed up front and kinds look
//! their parent up explicitly.

use regex::Regex;

/// Index of the top-level (unindented) lines of a configuration dump.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentIndex {
    lines: Vec<(usize, String)>,
}

impl ParentIndex {
    /// Scan a configuration dump.
    pub fn scan(text: &str) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .filter(|(_, line)| is_top_level(line))
            .map(|(n, line)| (n + 1, line.trim_end().to_string()))
            .collect();
        Self { lines }
    }

    /// Top-level lines with their 1-indexed line numbers.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines.iter().map(|(n, l)| (*n, l.as_str()))
    }

    /// First top-level line matching `re`.
    pub fn find(&self, re: &Regex) -> Option<&str> {
        self.lines
            .iter()
            .map(|(_, l)| l.as_str())
            .find(|l| re.is_match(l))
    }

    /// Capture group `group` of the first top-level line matching `re`.
    pub fn capture(&self, re: &Regex, group: usize) -> Option<String> {
        self.lines.iter().find_map(|(_, l)| {
            re.captures(l)
                .and_then(|c| c.get(group))
                .map(|m| m.as_str().to_string())
        })
    }

    /// Number of indexed lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing was indexed.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Whether a line opens or closes a top-level block.
///
/// Separators (`!`) and blank lines are not top-level lines.
pub fn is_top_level(line: &str) -> bool {
    let trimmed = line.trim_end();
    !trimmed.is_empty() && trimmed != "!" && !trimmed.starts_with(char::is_whitespace)
}

/// Whether a line is a separator that classification skips.
pub fn is_separator(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed == "!"
}
