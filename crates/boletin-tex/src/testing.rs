//! Renderer for the per-student testing report (harness results, penalties,
//! letter grade).

use chrono::Utc;

use boletin_core::config::BoletinConfig;
use boletin_core::model::{Grade, TestRecord, TestStatus};
use boletin_core::scoring::ScoreBoard;

use crate::escape::{latex_escape, latex_escape_cell};
use crate::document::{preamble, signature_block, title_block};

const TITLE: &str = "Reporte de Pruebas de Ejecución";

const TABLE_PACKAGES: &str = r"\usepackage{colortbl}
\usepackage{longtable}
\usepackage{adjustbox}
\usepackage{makecell}
";

/// Color band for a percentage.
fn percentage_color(pct: f64) -> &'static str {
    if pct >= 80.0 {
        "commentgreen"
    } else if pct >= 60.0 {
        "scoreorange"
    } else {
        "red"
    }
}

fn grade_color(grade: Grade) -> &'static str {
    match grade {
        Grade::Excelente | Grade::Bien => "commentgreen",
        Grade::Regular | Grade::Suficiente => "scoreorange",
        Grade::Insuficiente => "red",
    }
}

/// Render the complete LaTeX document for one student's testing run.
///
/// Programs render in the configured canonical order, not record order.
pub fn render_testing_report(
    records: &[TestRecord],
    board: &ScoreBoard,
    student_id: &str,
    config: &BoletinConfig,
) -> String {
    let mut tex = preamble(TITLE, &config.report.logo, TABLE_PACKAGES, 35);
    tex.push_str(&title_block(TITLE, student_id, Utc::now()));

    for (i, program) in config.evaluation.expected_programs.iter().enumerate() {
        let Some(scores) = board.programs.get(program) else {
            continue;
        };
        let title = config.report.title_for(program);
        let percentage = scores.percentage();
        let score_cell = format!(
            "\\textcolor{{{color}}}{{\\textbf{{{total}/{max} ({percentage:.1}\\%)}}}}",
            color = percentage_color(percentage),
            total = scores.total_score,
            max = scores.max_score,
        );

        tex.push_str(&format!(
            "\\vspace{{0.5cm}}\n\
             \\section*{{\\textbf{{{n}.}} {title}}}\n\
             \n\\begin{{table}}[h!]\n\
             \\centering\n\
             \\begin{{tabular}}{{l|c|c|c|c}}\n\
             \\hline\n\
             \\rowcolor{{lightgray}}\n\
             \\textbf{{Métrica}} & \\textbf{{Valor}} & \\textbf{{Puntuación}} & \\textbf{{Porcentaje}} & \\textbf{{Estado}} \\\\\n\
             \\hline\n\
             Pruebas Ejecutadas & {tests} & - & - & - \\\\\n\
             Pruebas Exitosas & {passed} & - & - & \\textcolor{{commentgreen}}{{\\textbf{{PASS}}}} \\\\\n\
             Pruebas Fallidas & {failed} & - & - & \\textcolor{{red}}{{\\textbf{{FAIL}}}} \\\\\n\
             Errores Compilación & {cerrors} & - & - & \\textcolor{{red}}{{\\textbf{{ERROR}}}} \\\\\n\
             \\hline\n\
             \\rowcolor{{lightgray}}\n\
             \\textbf{{TOTAL}} & \\textbf{{{tests}}} & \\textbf{{{total}/{max}}} & \\textbf{{{percentage:.1}\\%}} & {score_cell} \\\\\n\
             \\hline\n\
             \\end{{tabular}}\n\
             \\end{{table}}\n\
             \n\\vspace{{0.5cm}}\n\
             \\textbf{{Resultados Detallados de Pruebas:}}\\\\[0.3cm]\n\
             {detail_table}\n\
             \n\\vspace{{0.5cm}}\n\\hrule\n\\vspace{{0.3cm}}\n\n",
            n = i + 1,
            tests = scores.tests,
            passed = scores.passed,
            failed = scores.failed,
            cerrors = scores.compilation_errors,
            total = scores.total_score,
            max = scores.max_score,
            detail_table = test_results_table(records, program),
        ));
    }

    tex.push_str(&general_summary(board, config));
    tex.push_str(&signature_block(&config.report.signature, None));
    tex.push_str("\n\\end{document}\n");
    tex
}

/// Detailed per-test table for one program.
fn test_results_table(records: &[TestRecord], program: &str) -> String {
    let program_tests: Vec<&TestRecord> =
        records.iter().filter(|r| r.program == program).collect();
    if program_tests.is_empty() {
        return "No hay pruebas disponibles para este programa.".to_string();
    }

    let mut rows = vec![
        "\\begin{center}".to_string(),
        "\\resizebox{\\textwidth}{!}{%".to_string(),
        "\\begin{tabular}{|c|p{2.5cm}|p{5cm}|p{5cm}|c|}".to_string(),
        "\\hline".to_string(),
        "\\rowcolor{lightgray}".to_string(),
        "\\textbf{Prueba} & \\textbf{Entrada} & \\textbf{Esperado} & \\textbf{Resultado} & \\textbf{Estado} \\\\".to_string(),
        "\\hline".to_string(),
    ];

    for (i, test) in program_tests.iter().enumerate() {
        let status = match test.status {
            TestStatus::Pass => "\\textcolor{commentgreen}{\\textbf{PASS}}",
            TestStatus::Fail => "\\textcolor{red}{\\textbf{FAIL}}",
        };
        // Alternating row shading.
        if (i + 1) % 2 == 0 {
            rows.push("\\rowcolor{lightgray}".to_string());
        }
        rows.push(format!(
            "{} & {} & {} & {} & {} \\\\",
            i + 1,
            latex_escape(&test.input_values),
            latex_escape(&test.expected),
            latex_escape_cell(&test.actual),
            status,
        ));
        rows.push("\\hline".to_string());
    }

    rows.push("\\end{tabular}".to_string());
    rows.push("}%".to_string());
    rows.push("\\end{center}".to_string());
    rows.join("\n")
}

/// Overall summary table, penalty breakdown, and grade legend.
fn general_summary(board: &ScoreBoard, config: &BoletinConfig) -> String {
    let (total_score, total_max) = board.totals();
    let base_percentage = if total_max > 0 {
        total_score as f64 / total_max as f64 * 100.0
    } else {
        0.0
    };
    let metadata = &board.metadata;
    let overall = base_percentage * metadata.penalty_factor;
    let grade = Grade::from_percentage(overall);

    let missing_info = if metadata.missing_programs.is_empty() {
        String::new()
    } else {
        let missing_list = metadata
            .missing_programs
            .iter()
            .map(|p| p.strip_suffix(".c").unwrap_or(p))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "\\midrule\n\
             Programas Faltantes & {missing_list} \\\\\n\
             Penalización Aplicada & {penalty:.1}\\% \\\\\n",
            penalty = (1.0 - metadata.penalty_factor) * 100.0,
        )
    };

    format!(
        "\\vspace{{1cm}}\n\
         \\section*{{\\textbf{{Resumen General de Ejecución}}}}\n\
         \n\\begin{{center}}\n\
         \\begin{{tabular}}{{l r}}\n\
         \\toprule\n\
         \\textbf{{Métrica}} & \\textbf{{Valor}} \\\\\n\
         \\midrule\n\
         Puntuación Total & {total_score}/{total_max} puntos \\\\\n\
         Porcentaje Base & {base_percentage:.1}\\% \\\\\n\
         Programas Evaluados & {evaluated}/{expected} \\\\\n\
         {missing_info}\
         \\midrule\n\
         \\textbf{{Porcentaje Final}} & \\textbf{{{overall:.1}\\%}} \\\\\n\
         Calificación & \\textcolor{{{gcolor}}}{{\\textbf{{{grade}}}}} \\\\\n\
         \\bottomrule\n\
         \\end{{tabular}}\n\
         \\end{{center}}\n\
         \n\\vspace{{0.5cm}}\n\
         \\begin{{center}}\n\
         \\textbf{{Interpretación de Calificaciones:}}\\\\[0.3cm]\n\
         \\begin{{itemize}}\n\
         \\item \\textcolor{{commentgreen}}{{\\textbf{{90-100\\%: EXCELENTE}}}} - Todos los programas funcionan perfectamente\n\
         \\item \\textcolor{{commentgreen}}{{\\textbf{{80-89\\%: BIEN}}}} - La mayoría de programas funcionan correctamente\n\
         \\item \\textcolor{{scoreorange}}{{\\textbf{{70-79\\%: REGULAR}}}} - Algunos programas necesitan corrección\n\
         \\item \\textcolor{{scoreorange}}{{\\textbf{{60-69\\%: SUFICIENTE}}}} - Varios programas requieren mejoras\n\
         \\item \\textcolor{{red}}{{\\textbf{{0-59\\%: INSUFICIENTE}}}} - Necesita revisar y corregir los programas\n\
         \\end{{itemize}}\n\
         \\end{{center}}\n\n",
        evaluated = board.programs_evaluated(),
        expected = metadata.total_expected,
        gcolor = grade_color(grade),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use boletin_core::model::CompilationStatus;
    use boletin_core::scoring::aggregate;

    fn record(program: &str, score: i64, status: TestStatus) -> TestRecord {
        TestRecord {
            program: program.into(),
            score,
            status,
            compilation: CompilationStatus::Ok,
            input_values: "5 3".into(),
            expected: "8".into(),
            actual: "8".into(),
        }
    }

    fn default_expected() -> Vec<String> {
        BoletinConfig::default().evaluation.expected_programs
    }

    #[test]
    fn renders_complete_document() {
        let records = vec![
            record("operaciones.c", 10, TestStatus::Pass),
            record("operaciones.c", 0, TestStatus::Fail),
        ];
        let board = aggregate(&records, &default_expected(), 10);
        let tex =
            render_testing_report(&records, &board, "msc25abc", &BoletinConfig::default());

        assert!(tex.starts_with("\\documentclass"));
        assert!(tex.trim_end().ends_with("\\end{document}"));
        assert!(tex.contains("\\textbf{1.} Operaciones Básicas"));
        assert!(tex.contains("Resumen General de Ejecución"));
        assert!(tex.contains("Interpretación de Calificaciones"));
    }

    #[test]
    fn missing_programs_listed_with_penalty() {
        let records = vec![record("operaciones.c", 10, TestStatus::Pass)];
        let board = aggregate(&records, &default_expected(), 10);
        let tex = render_testing_report(&records, &board, "x", &BoletinConfig::default());

        // Three of four programs missing → 75% penalty.
        assert!(tex.contains("Programas Faltantes"));
        assert!(tex.contains("Penalización Aplicada & 75.0\\%"));
        assert!(tex.contains("conversionCmsMts, conversionSegsHMS, resistencia"));
    }

    #[test]
    fn full_marks_grade_excelente() {
        let records: Vec<TestRecord> = default_expected()
            .iter()
            .map(|p| record(p, 10, TestStatus::Pass))
            .collect();
        let board = aggregate(&records, &default_expected(), 10);
        let tex = render_testing_report(&records, &board, "x", &BoletinConfig::default());

        assert!(tex.contains("\\textbf{100.0\\%}"));
        assert!(tex.contains("\\textcolor{commentgreen}{\\textbf{EXCELENTE}}"));
        assert!(!tex.contains("Programas Faltantes"));
    }

    #[test]
    fn detail_table_escapes_and_flattens_output() {
        let mut rec = record("operaciones.c", 0, TestStatus::Fail);
        rec.actual = "line1\nline2 {x}".into();
        let records = vec![rec];
        let board = aggregate(&records, &default_expected(), 10);
        let table = test_results_table(&records, "operaciones.c");

        assert!(table.contains("line1 | line2 \\{x\\}"));
        assert!(table.contains("\\textcolor{red}{\\textbf{FAIL}}"));
    }

    #[test]
    fn detail_table_placeholder_when_no_tests() {
        let table = test_results_table(&[], "operaciones.c");
        assert!(table.contains("No hay pruebas disponibles"));
    }

    #[test]
    fn percentage_colors_band_correctly() {
        assert_eq!(percentage_color(90.0), "commentgreen");
        assert_eq!(percentage_color(80.0), "commentgreen");
        assert_eq!(percentage_color(79.9), "scoreorange");
        assert_eq!(percentage_color(60.0), "scoreorange");
        assert_eq!(percentage_color(59.9), "red");
    }
}
