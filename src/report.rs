//! Terminal report

use std::fmt::Write as FmtWrite;

use shoplens_core::{Analysis, CategoryScore, Status};

const DIVIDER: &str = "─────────────────────────────────────────────────────────────";
const LABEL_WIDTH: usize = 16;
/// Factor details longer than this are cut in tables
const DETAILS_WIDTH: usize = 48;

fn push_section_header(buf: &mut String, icon: &str, title: &str) {
    let _ = writeln!(buf, "{DIVIDER}");
    let _ = writeln!(buf, "{icon} {title}");
    let _ = writeln!(buf, "{DIVIDER}");
}

fn push_key_value(buf: &mut String, label: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    let _ = writeln!(buf, "• {:<width$} : {}", label, value, width = LABEL_WIDTH);
}

fn push_table(buf: &mut String, headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String]| -> String {
        let parts: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| format!(" {:<width$} ", cell, width = widths[idx]))
            .collect();
        format!("|{}|", parts.join("|"))
    };

    let header_cells: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    let _ = writeln!(buf, "{}", format_row(&header_cells));

    let separator: Vec<String> = widths
        .iter()
        .map(|width| format!(" {:-<width$} ", "", width = *width))
        .collect();
    let _ = writeln!(buf, "|{}|", separator.join("|"));

    for row in rows {
        let _ = writeln!(buf, "{}", format_row(row));
    }
}

fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Pass => "✅",
        Status::Warning => "⚠️",
        Status::Fail => "❌",
        Status::Unknown => "❔",
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}

/// Render the analysis with at most `top` recommendations
pub fn render(analysis: &Analysis, top: usize) -> String {
    let score = &analysis.score;
    let mut buf = String::new();

    push_section_header(&mut buf, "📊", "AI Discoverability Score");
    push_key_value(&mut buf, "URL", &analysis.extraction.page_info.url);
    if let Some(product) = analysis.extraction.structured_data.schemas.product.as_ref()
        && let Some(name) = product.name.as_deref()
    {
        push_key_value(&mut buf, "Product", name);
    }
    push_key_value(&mut buf, "Context", &score.context.to_string());
    push_key_value(&mut buf, "Score", &format!("{}/100", score.total_score));
    push_key_value(
        &mut buf,
        "Grade",
        &format!("{} ({})", score.grade, score.grade_description),
    );
    if score.js_dependent {
        push_key_value(&mut buf, "Rendering", "Content needs JavaScript; crawlers may see an empty page");
    }
    push_key_value(&mut buf, "Analyzed", &score.timestamp.to_rfc3339());
    let _ = writeln!(buf);

    render_categories(&mut buf, analysis);
    for category in score.categories.iter() {
        render_factors(&mut buf, category);
    }
    render_recommendations(&mut buf, analysis, top);

    buf
}

fn render_categories(buf: &mut String, analysis: &Analysis) {
    push_section_header(buf, "🧮", "Categories");
    let rows: Vec<Vec<String>> = analysis
        .score
        .categories
        .iter()
        .map(|category| {
            vec![
                category.name.clone(),
                format!("{}/100", category.score),
                format!("{:.0}%", category.weight * 100.0),
                if category.has_critical() { "capped".to_string() } else { "–".to_string() },
            ]
        })
        .collect();
    push_table(buf, &["Category", "Score", "Weight", "Critical"], &rows);
    let _ = writeln!(buf);
}

fn render_factors(buf: &mut String, category: &CategoryScore) {
    push_section_header(buf, "🔍", &format!("{} ({}/100)", category.name, category.score));
    let rows: Vec<Vec<String>> = category
        .factors
        .iter()
        .map(|factor| {
            let mut name = factor.name.clone();
            if factor.contextual {
                name.push_str(" *");
            }
            vec![
                format!("{} {}", status_icon(factor.status), factor.status),
                name,
                format!("{}/{}", factor.points, factor.max_points),
                truncate(&factor.details, DETAILS_WIDTH),
            ]
        })
        .collect();
    push_table(buf, &["Status", "Factor", "Points", "Details"], &rows);
    if category.factors.iter().any(|f| f.contextual) {
        let _ = writeln!(buf, "(* weighted by purchase context)");
    }
    let _ = writeln!(buf);
}

fn render_recommendations(buf: &mut String, analysis: &Analysis, top: usize) {
    let recommendations = &analysis.recommendations;
    push_section_header(buf, "🛠️", "Recommendations");
    if recommendations.is_empty() {
        let _ = writeln!(buf, "Nothing to fix.");
        return;
    }

    push_key_value(buf, "Total", &recommendations.len().to_string());
    push_key_value(buf, "High impact", &recommendations.critical().len().to_string());
    push_key_value(buf, "Quick wins", &recommendations.quick_wins().len().to_string());
    let _ = writeln!(buf);

    let shown = recommendations.top(top);
    let rows: Vec<Vec<String>> = shown
        .iter()
        .map(|rec| {
            vec![
                format!("P{}", rec.priority),
                rec.impact.to_string(),
                rec.effort.to_string(),
                rec.category.name().to_string(),
                rec.title.clone(),
            ]
        })
        .collect();
    push_table(buf, &["Priority", "Impact", "Effort", "Category", "Title"], &rows);
    if recommendations.len() > shown.len() {
        let remaining = recommendations.len() - shown.len();
        let _ = writeln!(buf, "({remaining} additional recommendations not shown)");
    }
    let _ = writeln!(buf);

    for (idx, rec) in shown.iter().enumerate() {
        let _ = writeln!(buf, "{}. {} [{}]", idx + 1, rec.title, rec.id);
        let _ = writeln!(buf, "   {}", rec.description);
        if let Some(current) = rec.current_state.as_deref() {
            let _ = writeln!(buf, "   Now: {current}");
        }
        if let Some(target) = rec.target_state.as_deref() {
            let _ = writeln!(buf, "   Target: {target}");
        }
        if let Some(note) = rec.contextual.as_deref() {
            let _ = writeln!(buf, "   {note}");
        }
        let _ = writeln!(buf, "   Fix: {}", rec.implementation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shoplens_core::{AnalysisOptions, NetworkFacts, PurchaseContext, analyze};

    fn sample(html: &str) -> Analysis {
        let options = AnalysisOptions::new("https://shop.example.com/products/kettle")
            .with_context(PurchaseContext::Need)
            .with_timestamp(Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap());
        analyze(html, &options, &NetworkFacts::default())
    }

    #[test]
    fn test_render_summary_and_categories() {
        let analysis = sample(
            r#"<html><head><title>Steel Kettle</title></head><body><h1>Steel Kettle</h1>
            <script type="application/ld+json">{"@type":"Product","name":"Steel Kettle"}</script>
            </body></html>"#,
        );
        let out = render(&analysis, 10);

        assert!(out.contains("📊 AI Discoverability Score"));
        assert!(out.contains("• Product          : Steel Kettle"));
        assert!(out.contains("• Context          : need"));
        assert!(out.contains(&format!("{}/100", analysis.score.total_score)));
        for category in analysis.score.categories.iter() {
            assert!(out.contains(&category.name));
        }
        assert!(out.contains("| Category"));
    }

    #[test]
    fn test_render_limits_recommendations() {
        let analysis = sample("");
        assert!(analysis.recommendations.len() > 3);

        let out = render(&analysis, 3);
        let remaining = analysis.recommendations.len() - 3;
        assert!(out.contains(&format!("({remaining} additional recommendations not shown)")));
        assert!(out.contains("3. "));
        assert!(!out.contains("\n4. "));
    }

    #[test]
    fn test_table_columns_align() {
        let mut buf = String::new();
        push_table(
            &mut buf,
            &["A", "Long header"],
            &[vec!["wide cell".to_string(), "x".to_string()]],
        );
        let lines: Vec<&str> = buf.lines().collect();
        assert_eq!(lines[0], "| A         | Long header |");
        assert_eq!(lines[1], "| --------- | ----------- |");
        assert_eq!(lines[2], "| wide cell | x           |");
    }

    #[test]
    fn test_truncate_details() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
