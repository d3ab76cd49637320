//! Pure string helpers exposed to templates.
//!
//! The renderer adapter registers these under the names `indent`,
//! `oneLine` / `one_line` and `replace`.

/// Prefix every non-empty line of `text` with `spaces` spaces.
///
/// `\r\n` becomes `\n` first. Blank lines are not padded. Negative widths
/// are treated as zero.
pub fn indent(spaces: i64, text: &str) -> String {
    let pad = " ".repeat(usize::try_from(spaces).unwrap_or(0));
    text.replace("\r\n", "\n")
        .split('\n')
        .map(|line| {
            if line.is_empty() {
                line.to_string()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turn every line break into one space, then trim the ends.
///
/// Runs of newlines become runs of spaces; they are not collapsed.
pub fn one_line(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\n', " ")
        .trim()
        .to_string()
}

/// Literal replacement of every occurrence of `old`.
pub fn replace(old: &str, new: &str, text: &str) -> String {
    text.replace(old, new)
}
