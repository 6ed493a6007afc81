//! Shared document boilerplate: preamble, title block, signature.

use chrono::{DateTime, Datelike, Utc};

const SPANISH_MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// "15 de marzo de 2026".
pub fn spanish_date(date: DateTime<Utc>) -> String {
    let month = SPANISH_MONTHS[date.month0() as usize];
    format!("{} de {} de {}", date.day(), month, date.year())
}

const DOCUMENT_CLASS: &str = r"\documentclass[11pt]{article}
\usepackage[utf8]{inputenc}
\usepackage[T1]{fontenc}
\usepackage[spanish]{babel}
\usepackage{lmodern}
\usepackage{textcomp}
\usepackage[letterpaper,top=3cm,bottom=3cm,left=2cm,right=2cm]{geometry}
\usepackage{xcolor}
\usepackage{graphicx}
\usepackage{fancyhdr}
\usepackage{booktabs}
\usepackage{array}
";

const LAYOUT: &str = r"
% Sin indentación en párrafos
\setlength{\parindent}{0pt}
\setlength{\parskip}{0.5em}

% Sin indentación en títulos
\usepackage{titlesec}
\titleformat{\section}{\Large\bfseries}{}{0pt}{}
\titleformat{\subsection}{\large\bfseries}{}{0pt}{}

% Sin indentación en listas
\usepackage{enumitem}
\setlist{leftmargin=0pt,itemindent=0pt}

\raggedright

% Colores personalizados
\definecolor{codeblue}{RGB}{41, 128, 185}
\definecolor{commentgreen}{RGB}{39, 174, 96}
\definecolor{scoreorange}{RGB}{230, 126, 34}
\definecolor{headerblue}{RGB}{52, 73, 94}
\definecolor{lightgray}{RGB}{245, 245, 245}
";

/// Everything up to and including `\begin{document}`.
pub fn preamble(header_title: &str, logo: &str, extra_packages: &str, head_height_pt: u32) -> String {
    let mut tex = String::from(DOCUMENT_CLASS);
    tex.push_str(extra_packages);
    tex.push_str(LAYOUT);
    tex.push_str(&format!(
        "\n% Headers y footers\n\
         \\pagestyle{{fancy}}\n\
         \\fancyhf{{}}\n\
         \\fancyhead[L]{{\\includegraphics[height=1cm]{{{logo}}}}}\n\
         \\fancyhead[R]{{\\textbf{{{header_title}}}}}\n\
         \\fancyfoot[C]{{\\thepage}}\n\
         \\renewcommand{{\\headrulewidth}}{{0pt}}\n\
         \\renewcommand{{\\footrulewidth}}{{0pt}}\n\
         \\setlength{{\\headheight}}{{{head_height_pt}pt}}\n\
         \n\\begin{{document}}\n\n"
    ));
    tex
}

/// Centered report title, student id, and evaluation date, followed by a
/// rule.
pub fn title_block(title: &str, student_id: &str, date: DateTime<Utc>) -> String {
    format!(
        "\\begin{{center}}\n\
         \\Large\\textbf{{\\color{{headerblue}}{title}}}\\\\[0.5cm]\n\
         \\large\\textbf{{{id}}}\\\\[0.3cm]\n\
         \\normalsize Fecha de evaluación: {date}\n\
         \\end{{center}}\n\
         \n\\vspace{{0.5cm}}\n\\hrule\n\\vspace{{0.5cm}}\n\n",
        id = student_id.to_uppercase(),
        date = spanish_date(date),
    )
}

/// Signature line, optionally with a tagline underneath.
pub fn signature_block(signature: &str, tagline: Option<&str>) -> String {
    let mut block = format!(
        "\\vspace{{1cm}}\n\\begin{{center}}\n\\textbf{{{signature}}}\\\\[0.2cm]\n"
    );
    if let Some(tagline) = tagline {
        block.push_str(&format!("\\small\\textit{{{tagline}}}\n"));
    }
    block.push_str("\\end{center}\n");
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn spanish_date_formatting() {
        let date = Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap();
        assert_eq!(spanish_date(date), "15 de marzo de 2026");
        let date = Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap();
        assert_eq!(spanish_date(date), "1 de diciembre de 2025");
    }

    #[test]
    fn preamble_opens_document() {
        let tex = preamble("Reporte", "public/logo.png", "", 15);
        assert!(tex.starts_with("\\documentclass"));
        assert!(tex.contains("\\includegraphics[height=1cm]{public/logo.png}"));
        assert!(tex.contains("\\setlength{\\headheight}{15pt}"));
        assert!(tex.ends_with("\\begin{document}\n\n"));
    }

    #[test]
    fn title_block_uppercases_student_id() {
        let date = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        let block = title_block("Reporte de Calificaciones", "msc25abc", date);
        assert!(block.contains("MSC25ABC"));
        assert!(block.contains("Fecha de evaluación: 2 de enero de 2026"));
    }

    #[test]
    fn signature_with_and_without_tagline() {
        let with = signature_block("Prof. X", Some("Sistema de Evaluación Automática"));
        assert!(with.contains("\\textit{Sistema de Evaluación Automática}"));
        let without = signature_block("Prof. X", None);
        assert!(!without.contains("\\textit"));
    }
}
