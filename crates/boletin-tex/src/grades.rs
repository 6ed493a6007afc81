//! Renderer for the per-student grade report (evaluator scores + comments).

use chrono::Utc;

use boletin_core::config::BoletinConfig;
use boletin_core::model::GradeBook;

use crate::comments::format_comments;
use crate::document::{preamble, signature_block, title_block};

const TITLE: &str = "Reporte de Calificaciones";

/// Color band for an evaluator score out of 10.
fn score_color(score: i64) -> &'static str {
    if score >= 8 {
        "commentgreen"
    } else if score >= 6 {
        "scoreorange"
    } else {
        "red"
    }
}

/// Render the complete LaTeX document for one student's grade book.
///
/// Programs render in the configured canonical order; programs absent from
/// the book are skipped.
pub fn render_grade_report(book: &GradeBook, student_id: &str, config: &BoletinConfig) -> String {
    let mut tex = preamble(TITLE, &config.report.logo, "", 15);
    tex.push_str(&title_block(TITLE, student_id, Utc::now()));

    let mut total_score = 0i64;
    let mut program_count = 0i64;

    for program in &config.evaluation.expected_programs {
        let Some(entry) = book.get(program) else {
            continue;
        };
        let score = entry.calificacion;
        let title = config.report.title_for(program);
        let formatted_comments = format_comments(&entry.comentarios);

        tex.push_str(&format!(
            "\\section*{{{title}}}\n\
             \n\\begin{{minipage}}{{\\textwidth}}\n\
             \\textbf{{Calificación:}} \\textcolor{{{color}}}{{\\textbf{{{score}/10}}}}\\\\[0.3cm]\n\
             \n\\textbf{{Comentarios del evaluador:}}\\\\[0.2cm]\n\
             \\begin{{minipage}}{{\\textwidth}}\n\
             \\small\n\
             {formatted_comments}\n\
             \\end{{minipage}}\n\
             \\end{{minipage}}\n\
             \n\\vspace{{0.5cm}}\n\\hrule\n\\vspace{{0.3cm}}\n\n",
            color = score_color(score),
        ));

        total_score += score;
        program_count += 1;
    }

    let average = if program_count > 0 {
        total_score as f64 / program_count as f64
    } else {
        0.0
    };
    tex.push_str(&format!(
        "\\section*{{Resumen General}}\n\
         \n\\begin{{center}}\n\
         \\begin{{tabular}}{{l r}}\n\
         \\toprule\n\
         \\textbf{{Métrica}} & \\textbf{{Valor}} \\\\\n\
         \\midrule\n\
         Calificación Total & {total_score}/{max} \\\\\n\
         Promedio & {average:.2}/10 \\\\\n\
         \\bottomrule\n\
         \\end{{tabular}}\n\
         \\end{{center}}\n\n",
        max = program_count * 10,
    ));

    tex.push_str(&signature_block(
        &config.report.signature,
        Some("Sistema de Evaluación Automática"),
    ));
    tex.push_str("\n\\end{document}\n");
    tex
}

#[cfg(test)]
mod tests {
    use super::*;
    use boletin_core::model::GradeEntry;

    fn book_with(entries: &[(&str, i64, &str)]) -> GradeBook {
        let mut book = GradeBook::default();
        for (program, score, comments) in entries {
            book.entries.insert(
                program.to_string(),
                GradeEntry {
                    calificacion: *score,
                    comentarios: comments.to_string(),
                },
            );
        }
        book
    }

    #[test]
    fn renders_complete_document() {
        let book = book_with(&[("operaciones", 9, "Buen trabajo - bien estructurado")]);
        let tex = render_grade_report(&book, "msc25abc", &BoletinConfig::default());

        assert!(tex.starts_with("\\documentclass"));
        assert!(tex.trim_end().ends_with("\\end{document}"));
        assert!(tex.contains("MSC25ABC"));
        assert!(tex.contains("Operaciones Básicas"));
        assert!(tex.contains("\\begin{itemize}"));
        assert!(tex.contains("Resumen General"));
    }

    #[test]
    fn score_colors_band_correctly() {
        assert_eq!(score_color(10), "commentgreen");
        assert_eq!(score_color(8), "commentgreen");
        assert_eq!(score_color(7), "scoreorange");
        assert_eq!(score_color(6), "scoreorange");
        assert_eq!(score_color(5), "red");
    }

    #[test]
    fn missing_programs_are_skipped_and_average_reflects_present_ones() {
        let book = book_with(&[("operaciones", 10, ""), ("resistencia.c", 5, "")]);
        let tex = render_grade_report(&book, "x", &BoletinConfig::default());

        assert!(!tex.contains("Conversión Centímetros a Metros"));
        assert!(tex.contains("Calificación Total & 15/20"));
        assert!(tex.contains("Promedio & 7.50/10"));
    }

    #[test]
    fn empty_book_still_closes_the_document() {
        let tex = render_grade_report(&GradeBook::default(), "x", &BoletinConfig::default());
        assert!(tex.contains("Calificación Total & 0/0"));
        assert!(tex.trim_end().ends_with("\\end{document}"));
    }

    #[test]
    fn placeholder_for_missing_comments() {
        let book = book_with(&[("operaciones", 10, "")]);
        let tex = render_grade_report(&book, "x", &BoletinConfig::default());
        assert!(tex.contains("Sin comentarios"));
    }
}
