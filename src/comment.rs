use std::path::Path;

use tracing::debug;

use crate::error::{ReformatError, Result};
use crate::utils::{read_source, split_lines, split_newline};

/// Section header that gets a blank line before it.
pub const SECTION_MARKER: &str = "Parameters";

/// A previous line equal to this (terminator aside) counts as already blank.
pub const BLANK_MARKER: &str = "    ";

/// One tag rewrite: every `from` on a matching line becomes `to`, and the
/// token following `to` gets a trailing colon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagRule {
    pub from: &'static str,
    pub to: &'static str,
    /// Separate the first line of a run of these tags from what precedes it.
    pub blank_line_before: bool,
}

/// Doxygen tags to epytext tags. Order matters: the first matching rule wins.
pub const DOXYGEN_TO_EPYTEXT: &[TagRule] = &[
    TagRule {
        from: "@param[in]",
        to: "@param",
        blank_line_before: true,
    },
    TagRule {
        from: "@param[out]",
        to: "@return",
        blank_line_before: false,
    },
    TagRule {
        from: "@throw",
        to: "@raise",
        blank_line_before: false,
    },
];

/// Reads `path` and returns its lines with Doxygen tags rewritten.
pub fn doxygen_to_epytext(path: &Path) -> Result<Vec<String>> {
    let source = read_source(path)?;
    rewrite_lines(path, &source.text)
}

/// Applies [`DOXYGEN_TO_EPYTEXT`] to already-read text.
pub fn rewrite_lines(path: &Path, text: &str) -> Result<Vec<String>> {
    rewrite_with(DOXYGEN_TO_EPYTEXT, path, text)
}

pub fn rewrite_with(rules: &[TagRule], path: &Path, text: &str) -> Result<Vec<String>> {
    let lines = split_lines(text);
    let mut out = Vec::with_capacity(lines.len() + lines.len() / 4);

    for (index, &line) in lines.iter().enumerate() {
        // Only ever look back at the original text, never at inserted blanks.
        let prev = index.checked_sub(1).map(|i| lines[i]);
        let prev_is_blank = prev.is_some_and(|p| split_newline(p).0 == BLANK_MARKER);

        let mut insert_blank = line.contains(SECTION_MARKER) && !prev_is_blank;

        let rule = rules.iter().find(|r| line.contains(r.from));
        let rewritten = match rule {
            Some(rule) => {
                if rule.blank_line_before
                    && !prev_is_blank
                    && !prev.is_some_and(|p| p.contains(rule.from))
                {
                    insert_blank = true;
                }
                let replaced = line.replace(rule.from, rule.to);
                let fixed = rewrite_tag_line(&replaced, rule.to).ok_or_else(|| {
                    ReformatError::MalformedTagLine {
                        path: path.to_path_buf(),
                        line: index + 1,
                    }
                })?;
                debug!(line = index + 1, from = rule.from, to = rule.to, "tag rewritten");
                fixed
            }
            None => line.to_string(),
        };

        if insert_blank {
            // Match the line's own terminator so CRLF files stay CRLF.
            let end = match split_newline(line).1 {
                "" => "\n",
                end => end,
            };
            out.push(end.to_string());
        }
        out.push(rewritten);
    }

    Ok(out)
}

/// Normalizes a line that already carries `keyword`: collapses whitespace
/// between tokens and appends `:` to the token right after the keyword.
/// Leading indentation and the line terminator are preserved.
///
/// Returns `None` when nothing follows the keyword.
pub fn rewrite_tag_line(line: &str, keyword: &str) -> Option<String> {
    let (body, end) = split_newline(line);
    let rest = body.trim_start();
    let indent = &body[..body.len() - rest.len()];

    let mut tokens: Vec<String> = rest.split_whitespace().map(String::from).collect();
    let at = tokens.iter().position(|t| t.contains(keyword))?;
    tokens.get_mut(at + 1)?.push(':');

    Some(format!("{indent}{}{end}", tokens.join(" ")))
}
