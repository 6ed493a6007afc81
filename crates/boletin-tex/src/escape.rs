//! Escaping for text inserted into LaTeX documents.

/// Unicode symbols that must become macros before pdflatex sees them.
const SYMBOL_MACROS: &[(char, &str)] = &[
    ('≤', "$\\leq$"),
    ('≥', "$\\geq$"),
    ('±', "$\\pm$"),
    ('×', "$\\times$"),
    ('÷', "$\\div$"),
    ('≠', "$\\neq$"),
    ('→', "$\\rightarrow$"),
    ('π', "$\\pi$"),
    ('∞', "$\\infty$"),
    ('°', "$^{\\circ}$"),
    ('•', "\\textbullet{}"),
];

/// Escape a string for safe insertion into a LaTeX document.
///
/// Backslashes and braces are neutralized, and known Unicode symbols are
/// substituted from the fixed macro table. Single pass, so substituted
/// macros are never re-escaped.
pub fn latex_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash "),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            _ => match SYMBOL_MACROS.iter().find(|(sym, _)| *sym == c) {
                Some((_, macro_text)) => out.push_str(macro_text),
                None => out.push(c),
            },
        }
    }
    out
}

/// Escape a string for a single table cell: newlines are flattened to a
/// ` | ` separator so multi-line program output stays in one cell.
pub fn latex_escape_cell(s: &str) -> String {
    let flattened = s.replace('\r', "").replace('\n', " | ");
    latex_escape(&flattened)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_backslash_and_braces() {
        assert_eq!(latex_escape("a\\b"), "a\\textbackslash b");
        assert_eq!(latex_escape("{x}"), "\\{x\\}");
    }

    #[test]
    fn substitutes_symbol_macros() {
        assert_eq!(latex_escape("x ≤ 10"), "x $\\leq$ 10");
        assert_eq!(latex_escape("2×3"), "2$\\times$3");
        assert_eq!(latex_escape("90°"), "90$^{\\circ}$");
        assert_eq!(latex_escape("• punto"), "\\textbullet{} punto");
    }

    #[test]
    fn substituted_macros_are_not_reescaped() {
        // The backslash inside the emitted macro must survive untouched.
        assert_eq!(latex_escape("π"), "$\\pi$");
        assert_eq!(latex_escape("\\π"), "\\textbackslash $\\pi$");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(latex_escape("faltó validar entrada"), "faltó validar entrada");
    }

    #[test]
    fn cell_flattens_newlines() {
        assert_eq!(latex_escape_cell("1\n2\r\n3"), "1 | 2 | 3");
        assert_eq!(latex_escape_cell("{a}\nb"), "\\{a\\} | b");
    }
}
