//! Newline-preserving line model, locator and rewriter.
//!
//! A target file is held in memory as a [`TextLines`]: an ordered list of
//! [`Line`]s, each remembering its own terminator (`"\n"`, `"\r\n"`, or none
//! for a final unterminated line).  [`TextLines::to_text`] reassembles the
//! file byte-for-byte, so every line the rewriter does not touch is written
//! back exactly as it was read.
//!
//! # Rewriting
//!
//! [`rewrite`] re-applies the descriptor's locate pattern to *every* line, not
//! just the first match shown in the menu.  Each match becomes:
//!
//! ```text
//! <command prefix>                   (no configuration selected)
//! <command prefix> <parameters>      (configuration selected)
//! ```
//!
//! Because the prefix never includes earlier parameters, applying the same
//! selection twice produces the same file.

use tracing::{debug, warn};

use crate::target::TargetDescriptor;

/// One line of a text file together with its original terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    text: String,
    ending: &'static str,
}

impl Line {
    /// Creates a line from its content and terminator.
    ///
    /// `ending` is normalised to one of `"\r\n"`, `"\n"` or `""`.
    pub fn new(text: impl Into<String>, ending: &str) -> Self {
        Self {
            text: text.into(),
            ending: normalise_ending(ending),
        }
    }

    /// Line content without the terminator.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The terminator this line was read with.
    pub fn ending(&self) -> &'static str {
        self.ending
    }

    /// Replaces the content, keeping the terminator.
    fn with_text(&self, text: String) -> Self {
        Self {
            text,
            ending: self.ending,
        }
    }
}

fn normalise_ending(ending: &str) -> &'static str {
    match ending {
        "\r\n" => "\r\n",
        "\n" => "\n",
        _ => "",
    }
}

/// The full contents of a text file as an ordered sequence of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextLines {
    lines: Vec<Line>,
}

impl TextLines {
    /// Splits `content` into lines, keeping each line's terminator.
    pub fn parse(content: &str) -> Self {
        let lines = content
            .split_inclusive('\n')
            .map(|raw| {
                if let Some(text) = raw.strip_suffix("\r\n") {
                    Line::new(text, "\r\n")
                } else if let Some(text) = raw.strip_suffix('\n') {
                    Line::new(text, "\n")
                } else {
                    Line::new(raw, "")
                }
            })
            .collect();
        Self { lines }
    }

    /// Reassembles the file content.
    pub fn to_text(&self) -> String {
        let capacity = self.lines.iter().map(|l| l.text.len() + 2).sum();
        let mut out = String::with_capacity(capacity);
        for line in &self.lines {
            out.push_str(&line.text);
            out.push_str(line.ending);
        }
        out
    }

    /// All lines in file order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` for an empty file.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<Vec<Line>> for TextLines {
    fn from(lines: Vec<Line>) -> Self {
        Self { lines }
    }
}

/// Returns the first launch line in `lines`, if any.
pub fn locate<'a>(lines: &'a TextLines, target: &TargetDescriptor) -> Option<&'a Line> {
    let found = lines.lines.iter().find(|line| target.matches(&line.text));
    debug!(
        path = %target.path().display(),
        found = found.is_some(),
        "scanned for launch line"
    );
    found
}

/// Result of [`rewrite`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// The complete new file content.
    pub lines: TextLines,
    /// Indices of the lines that were replaced.
    pub changed: Vec<usize>,
}

impl Rewrite {
    /// The replaced lines, in file order.
    pub fn changed_lines(&self) -> impl Iterator<Item = &Line> {
        self.changed.iter().map(|&i| &self.lines.lines[i])
    }
}

/// Rewrites every launch line to carry `params`, or no parameters at all
/// when `params` is `None`.
///
/// Non-matching lines are copied unchanged.  A matching line whose command
/// prefix cannot be extracted is left as it is and reported with a warning.
pub fn rewrite(lines: &TextLines, target: &TargetDescriptor, params: Option<&str>) -> Rewrite {
    let mut changed = Vec::new();
    let mut out = Vec::with_capacity(lines.len());

    for (index, line) in lines.lines.iter().enumerate() {
        if !target.matches(&line.text) {
            out.push(line.clone());
            continue;
        }

        let Some(prefix) = target.command_prefix(&line.text) else {
            warn!(
                line = index + 1,
                "launch line has no recognisable command prefix; left unchanged"
            );
            out.push(line.clone());
            continue;
        };

        let text = match params {
            Some(params) => format!("{prefix} {params}"),
            None => prefix.to_string(),
        };
        debug!(line = index + 1, new = %text, "rewrote launch line");
        out.push(line.with_text(text));
        changed.push(index);
    }

    Rewrite {
        lines: TextLines::from(out),
        changed,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{DEFAULT_BINARY, DEFAULT_DIRECTIVE};

    const UNIT: &str =
        "[Unit]\nDescription=Amiberry\r\n\n[Service]\nExecStart=/opt/app/amiberry\nRestart=always";

    fn service() -> TargetDescriptor {
        TargetDescriptor::service_unit("/tmp/amiberry.service", DEFAULT_DIRECTIVE)
    }

    // ── TextLines ─────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_then_to_text_is_byte_identical() {
        for content in [UNIT, "", "\n", "a\r\nb\nc", "only", "trailing\n\n"] {
            assert_eq!(TextLines::parse(content).to_text(), content, "{content:?}");
        }
    }

    #[test]
    fn test_parse_records_each_line_ending() {
        // Arrange / Act
        let lines = TextLines::parse("a\r\nb\nc");

        // Assert
        let endings: Vec<_> = lines.lines().iter().map(Line::ending).collect();
        assert_eq!(endings, vec!["\r\n", "\n", ""]);
        assert_eq!(lines.lines()[0].text(), "a");
    }

    #[test]
    fn test_parse_empty_content_has_no_lines() {
        assert!(TextLines::parse("").is_empty());
    }

    #[test]
    fn test_line_new_normalises_unknown_ending() {
        assert_eq!(Line::new("x", "\r").ending(), "");
    }

    // ── locate ────────────────────────────────────────────────────────────────

    #[test]
    fn test_locate_returns_first_launch_line() {
        // Arrange
        let lines = TextLines::parse("ExecStart=/first\nExecStart=/second\n");

        // Act
        let found = locate(&lines, &service());

        // Assert
        assert_eq!(found.map(Line::text), Some("ExecStart=/first"));
    }

    #[test]
    fn test_locate_skips_reset_line() {
        let lines = TextLines::parse("ExecStart=\nExecStart=/opt/app/amiberry\n");
        let found = locate(&lines, &service());
        assert_eq!(found.map(Line::text), Some("ExecStart=/opt/app/amiberry"));
    }

    #[test]
    fn test_locate_returns_none_without_launch_line() {
        let lines = TextLines::parse("[Service]\nType=simple\n");
        assert!(locate(&lines, &service()).is_none());
    }

    // ── rewrite ───────────────────────────────────────────────────────────────

    #[test]
    fn test_rewrite_appends_parameters_to_prefix() {
        // Arrange
        let lines = TextLines::parse(UNIT);

        // Act
        let result = rewrite(&lines, &service(), Some("--config \"./conf/beta.uae\" -G"));

        // Assert
        assert_eq!(result.changed, vec![4]);
        assert_eq!(
            result.lines.lines()[4].text(),
            "ExecStart=/opt/app/amiberry --config \"./conf/beta.uae\" -G"
        );
    }

    #[test]
    fn test_rewrite_leaves_other_lines_byte_identical() {
        // Arrange
        let lines = TextLines::parse(UNIT);

        // Act
        let result = rewrite(&lines, &service(), Some("-G"));

        // Assert
        for (i, (before, after)) in lines.lines().iter().zip(result.lines.lines()).enumerate() {
            if i != 4 {
                assert_eq!(before, after, "line {i} changed");
            }
        }
        assert_eq!(result.lines.len(), lines.len());
    }

    #[test]
    fn test_rewrite_without_parameters_reduces_line_to_prefix() {
        let lines = TextLines::parse("ExecStart=/opt/app/amiberry --config \"./conf/a.uae\" -G\n");
        let result = rewrite(&lines, &service(), None);
        assert_eq!(result.lines.to_text(), "ExecStart=/opt/app/amiberry\n");
    }

    #[test]
    fn test_rewrite_touches_every_matching_line() {
        let lines = TextLines::parse("ExecStart=/a -x\nUser=root\nExecStart=/b -y\n");
        let result = rewrite(&lines, &service(), None);
        assert_eq!(result.changed, vec![0, 2]);
        assert_eq!(result.lines.to_text(), "ExecStart=/a\nUser=root\nExecStart=/b\n");
    }

    #[test]
    fn test_rewrite_keeps_crlf_and_missing_final_newline() {
        // Arrange
        let lines = TextLines::parse("A=1\r\nExecStart=/opt/app/amiberry -G");

        // Act
        let result = rewrite(&lines, &service(), Some("-X"));

        // Assert
        assert_eq!(result.lines.to_text(), "A=1\r\nExecStart=/opt/app/amiberry -X");
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        // Arrange
        let lines = TextLines::parse(UNIT);
        let params = Some("--config \"./conf/beta.uae\" -G");

        // Act
        let once = rewrite(&lines, &service(), params);
        let twice = rewrite(&once.lines, &service(), params);

        // Assert
        assert_eq!(once.lines, twice.lines);
    }

    #[test]
    fn test_rewrite_script_line() {
        // Arrange
        let target = TargetDescriptor::launcher_script("/tmp/amiberry.sh", DEFAULT_BINARY);
        let lines = TextLines::parse("#!/bin/sh\ncd /mnt/amiberry\n/mnt/amiberry/amiberry\n");

        // Act
        let result = rewrite(&lines, &target, Some("-G"));

        // Assert
        assert_eq!(
            result.lines.to_text(),
            "#!/bin/sh\ncd /mnt/amiberry\n/mnt/amiberry/amiberry -G\n"
        );
        assert_eq!(
            result.changed_lines().map(Line::text).collect::<Vec<_>>(),
            vec!["/mnt/amiberry/amiberry -G"]
        );
    }

    #[test]
    fn test_rewrite_leaves_reset_line_untouched() {
        // Arrange
        let lines = TextLines::parse("[Service]\nExecStart=\nExecStart=/opt/app/amiberry\n");

        // Act
        let result = rewrite(&lines, &service(), Some("--config \"./conf/beta.uae\" -G"));

        // Assert
        assert_eq!(result.changed, vec![2]);
        assert_eq!(
            result.lines.to_text(),
            "[Service]\nExecStart=\nExecStart=/opt/app/amiberry --config \"./conf/beta.uae\" -G\n"
        );
    }

    #[test]
    fn test_rewrite_keeps_command_after_space_following_equals() {
        // Arrange
        let lines = TextLines::parse("[Service]\nExecStart= /opt/app/amiberry\n");
        let params = Some("--config \"./conf/beta.uae\" -G");

        // Act
        let once = rewrite(&lines, &service(), params);
        let reverted = rewrite(&once.lines, &service(), None);

        // Assert
        assert_eq!(
            once.lines.to_text(),
            "[Service]\nExecStart= /opt/app/amiberry --config \"./conf/beta.uae\" -G\n"
        );
        assert_eq!(reverted.lines, lines);
    }

    #[test]
    fn test_rewrite_without_match_changes_nothing() {
        let lines = TextLines::parse("[Service]\n");
        let result = rewrite(&lines, &service(), Some("-G"));
        assert!(result.changed.is_empty());
        assert_eq!(result.lines, lines);
    }
}
