//! Rendering of an ingredient-analysis report.
//!
//! Shared by the seller upload flow, the seller product detail, the buyer
//! product check, and the buyer product detail. The original pie chart
//! becomes a proportional breakdown bar; ingredient pills keep their
//! verdict color coding.

use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

use dermascan_api::AnalysisReport;
use dermascan_api::AnalysisSummary;
use dermascan_api::Verdict;

use crate::ui_colors::verdict_color;

/// Lines for a full report at the given content width.
pub fn report_lines(report: &AnalysisReport, show_explanation: bool, width: u16) -> Vec<Line<'static>> {
    if is_empty_report(report) {
        return vec![Line::from(
            "No analysis data available for this product.".dim(),
        )];
    }

    let mut lines: Vec<Line<'static>> = Vec::new();

    let verdict = report.overall_verdict;
    lines.push(Line::from(Span::styled(
        format!("  Verdict: {verdict}  "),
        Style::new().bg(verdict_color(verdict)).bold(),
    )));
    lines.push(Line::default());

    if report.summary.total() > 0 {
        lines.push(Line::from("Ingredient breakdown".bold()));
        lines.push(breakdown_bar(&report.summary, width.max(8)));
        lines.push(breakdown_legend(&report.summary));
        lines.push(Line::default());
    }

    if report.all_ingredients().count() > 0 {
        lines.push(Line::from("Recognized ingredients".bold()));
        lines.extend(pill_lines(report, width.max(8)));
        lines.push(Line::default());
    }

    if show_explanation {
        lines.push(Line::from("Detailed explanation".bold()));
        lines.push(Line::from(report.overall_explanation.clone()));
    }

    lines
}

fn is_empty_report(report: &AnalysisReport) -> bool {
    report.summary.total() == 0
        && report.all_ingredients().count() == 0
        && report.overall_explanation.is_empty()
        && report.overall_verdict == Verdict::Unknown
}

/// Proportional one-line bar; segment widths always sum to `width`.
fn breakdown_bar(summary: &AnalysisSummary, width: u16) -> Line<'static> {
    let spans = bar_segments(summary, width)
        .into_iter()
        .map(|(verdict, cells)| {
            Span::styled(
                " ".repeat(cells as usize),
                Style::new().bg(verdict_color(verdict)),
            )
        })
        .collect::<Vec<_>>();
    Line::from(spans)
}

fn bar_segments(summary: &AnalysisSummary, width: u16) -> Vec<(Verdict, u16)> {
    let total = summary.total();
    if total == 0 || width == 0 {
        return Vec::new();
    }
    let counts = [
        (Verdict::Good, summary.good),
        (Verdict::Moderate, summary.moderate),
        (Verdict::Bad, summary.bad),
        (Verdict::Unknown, summary.unknown),
    ];
    let mut segments: Vec<(Verdict, u16)> = Vec::new();
    let mut used = 0u16;
    let nonzero = counts.iter().filter(|(_, count)| *count > 0).count();
    let mut seen = 0usize;
    for (verdict, count) in counts {
        if count == 0 {
            continue;
        }
        seen += 1;
        let cells = if seen == nonzero {
            // Last segment absorbs the rounding remainder.
            width - used
        } else {
            ((u64::from(count) * u64::from(width)) / u64::from(total)).max(1) as u16
        };
        let cells = cells.min(width - used);
        segments.push((verdict, cells));
        used += cells;
    }
    segments
}

fn breakdown_legend(summary: &AnalysisSummary) -> Line<'static> {
    let entries = [
        (Verdict::Good, summary.good),
        (Verdict::Moderate, summary.moderate),
        (Verdict::Bad, summary.bad),
        (Verdict::Unknown, summary.unknown),
    ];
    let mut spans: Vec<Span<'static>> = Vec::new();
    for (verdict, count) in entries {
        if count == 0 {
            continue;
        }
        if !spans.is_empty() {
            spans.push("  ".into());
        }
        spans.push(Span::styled("■ ", Style::new().fg(verdict_color(verdict))));
        spans.push(Span::raw(format!("{verdict} {count}")).dim());
    }
    Line::from(spans)
}

/// Ingredient pills, wrapped to the content width.
fn pill_lines(report: &AnalysisReport, width: u16) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0usize;
    for ingredient in report.all_ingredients() {
        let text = format!(" {} ", ingredient.ingredient_name);
        let pill_width = text.width() + 1;
        if current_width + pill_width > width as usize && !current.is_empty() {
            lines.push(Line::from(std::mem::take(&mut current)));
            current_width = 0;
        }
        let fg = match ingredient.verdict {
            Verdict::Moderate => ratatui::style::Color::Black,
            _ => ratatui::style::Color::White,
        };
        current.push(Span::styled(
            text,
            Style::new().bg(verdict_color(ingredient.verdict)).fg(fg),
        ));
        current.push(" ".into());
        current_width += pill_width;
    }
    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use dermascan_api::IngredientVerdict;
    use pretty_assertions::assert_eq;

    fn summary(good: u32, moderate: u32, bad: u32, unknown: u32) -> AnalysisSummary {
        AnalysisSummary {
            good,
            moderate,
            bad,
            unknown,
        }
    }

    #[test]
    fn bar_segments_cover_the_full_width() {
        for width in [8u16, 20, 33, 80] {
            let segments = bar_segments(&summary(3, 1, 2, 1), width);
            let total: u16 = segments.iter().map(|(_, cells)| *cells).sum();
            assert_eq!(total, width, "width {width}");
        }
    }

    #[test]
    fn bar_segments_skip_zero_counts() {
        let segments = bar_segments(&summary(5, 0, 0, 1), 40);
        let verdicts: Vec<Verdict> = segments.iter().map(|(verdict, _)| *verdict).collect();
        assert_eq!(verdicts, vec![Verdict::Good, Verdict::Unknown]);
    }

    #[test]
    fn empty_report_renders_placeholder() {
        let lines = report_lines(&AnalysisReport::default(), false, 60);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn pills_wrap_at_width() {
        let report = AnalysisReport {
            overall_verdict: Verdict::Good,
            highly_contributing: vec![
                IngredientVerdict {
                    ingredient_name: "niacinamide".to_string(),
                    verdict: Verdict::Good,
                },
                IngredientVerdict {
                    ingredient_name: "salicylic acid".to_string(),
                    verdict: Verdict::Moderate,
                },
                IngredientVerdict {
                    ingredient_name: "alcohol denat".to_string(),
                    verdict: Verdict::Bad,
                },
            ],
            ..Default::default()
        };
        let lines = pill_lines(&report, 20);
        assert!(lines.len() >= 2);
    }
}
