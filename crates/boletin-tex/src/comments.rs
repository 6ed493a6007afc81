//! Evaluator-comment formatting with bullet-list detection.
//!
//! Comments arrive as free text; bullets show up three ways: a line-leading
//! `- `, a line-leading `•`, or inline ` - ` separators left over when a
//! multi-line comment was flattened to one line upstream. Once any bullet is
//! detected the whole comment renders as one itemize list — interleaved
//! prose is coerced into items too. That loses paragraph formatting for
//! mixed comments, but it is what existing reports look like, so it stays.

use crate::escape::latex_escape;

const NO_COMMENTS: &str = "Sin comentarios";

/// Format a raw comment string into a LaTeX fragment. Total: always returns
/// a fragment, worst case the placeholder.
pub fn format_comments(comments: &str) -> String {
    if comments.trim().is_empty() {
        return NO_COMMENTS.to_string();
    }

    // First pass: split physical lines and recover inline bullets.
    let mut lines: Vec<String> = Vec::new();
    for raw in comments.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("- ") || line.starts_with('•') {
            lines.push(line.to_string());
            continue;
        }
        let parts: Vec<&str> = line.split(" - ").collect();
        if parts.len() > 1 {
            // Leading fragment is prose; the rest are bullets.
            if !parts[0].trim().is_empty() {
                lines.push(parts[0].trim().to_string());
            }
            for part in &parts[1..] {
                if !part.trim().is_empty() {
                    lines.push(format!("- {}", part.trim()));
                }
            }
        } else {
            lines.push(line.to_string());
        }
    }

    // Second pass: turn bullet lines into items.
    let mut formatted: Vec<String> = Vec::new();
    let mut has_bullets = false;
    for line in &lines {
        let content = if let Some(rest) = line.strip_prefix("- ") {
            Some(rest.trim())
        } else {
            line.strip_prefix('•').map(str::trim)
        };
        match content {
            Some(content) if !content.is_empty() => {
                formatted.push(format!("\\item {}", latex_escape(content)));
                has_bullets = true;
            }
            Some(_) => {}
            None => formatted.push(latex_escape(line)),
        }
    }

    if has_bullets {
        let mut out = String::from("\\begin{itemize}\n");
        for line in &formatted {
            if line.starts_with("\\item") {
                out.push_str(&format!("  {line}\n"));
            } else {
                // Prose mixed into a bulleted comment becomes an item.
                out.push_str(&format!("  \\item {line}\n"));
            }
        }
        out.push_str("\\end{itemize}");
        out
    } else {
        formatted.join("\\\\\n")
    }
}
