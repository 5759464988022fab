//! PDF adapter: Implementation of ReportRenderer on top of `printpdf`.
//!
//! The report is plain text laid out top to bottom on letter-size pages using
//! the built-in Helvetica fonts, so no font data is embedded.

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::domain::ReportDocument;
use crate::ports::{ExportError, ReportRenderer};

/// US letter in millimetres.
const LETTER: (f32, f32) = (215.9, 279.4);
const PT_TO_MM: f32 = 0.352_778;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextStyle {
    Title,
    Heading,
    Body,
}

impl TextStyle {
    fn bold(self) -> bool {
        matches!(self, Self::Title | Self::Heading)
    }

    /// Font size in points.
    fn size(self) -> f32 {
        match self {
            Self::Title => 18.0,
            Self::Heading => 14.0,
            Self::Body => 11.0,
        }
    }

    fn leading_mm(self) -> f32 {
        self.size() * 1.4 * PT_TO_MM
    }
}

#[derive(Debug, Clone)]
struct TextLine {
    style: TextStyle,
    text: String,
    /// Extra gap above the line, in millimetres.
    space_before: f32,
}

/// A line with its baseline position on the page.
#[derive(Debug, Clone)]
struct PlacedLine {
    style: TextStyle,
    text: String,
    y: f32,
}

/// Renders [`ReportDocument`]s as single-column PDF documents.
#[derive(Debug, Clone)]
pub struct PdfReportRenderer {
    page_width: f32,
    page_height: f32,
    margin: f32,
}

impl Default for PdfReportRenderer {
    fn default() -> Self {
        Self {
            page_width: LETTER.0,
            page_height: LETTER.1,
            margin: 25.4,
        }
    }
}

impl PdfReportRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lines(&self, report: &ReportDocument) -> Vec<TextLine> {
        let mut lines = Vec::new();
        let mut push = |style, text: String, space_before| {
            lines.push(TextLine {
                style,
                text,
                space_before,
            });
        };

        push(TextStyle::Title, report.title.clone(), 0.0);
        push(TextStyle::Body, format!("Date: {}", report.generated_at), 4.0);
        push(TextStyle::Heading, "Input Parameters:".into(), 4.0);
        for (label, value) in &report.inputs {
            push(TextStyle::Body, format!("{label}: {value}"), 0.0);
        }
        push(TextStyle::Heading, "Prediction Results:".into(), 4.0);
        push(TextStyle::Body, format!("Prediction: {}", report.prediction), 0.0);
        push(
            TextStyle::Body,
            format!("Risk Probability: {}", report.probability),
            0.0,
        );
        push(TextStyle::Body, format!("Risk Level: {}", report.risk_level), 0.0);

        let width = self.max_chars(TextStyle::Body);
        for (i, chunk) in wrap(&report.disclaimer, width).into_iter().enumerate() {
            push(TextStyle::Body, chunk, if i == 0 { 4.0 } else { 0.0 });
        }
        lines
    }

    /// Approximate characters per line; Helvetica averages about half an em.
    fn max_chars(&self, style: TextStyle) -> usize {
        let usable = self.page_width - 2.0 * self.margin;
        ((usable / (style.size() * 0.5 * PT_TO_MM)) as usize).max(10)
    }

    /// Assign baselines, starting a new page when the bottom margin is reached.
    fn paginate(&self, lines: Vec<TextLine>) -> Vec<Vec<PlacedLine>> {
        let top = self.page_height - self.margin;
        let mut pages = Vec::new();
        let mut page: Vec<PlacedLine> = Vec::new();
        let mut y = top;

        for line in lines {
            let leading = line.style.leading_mm();
            let mut next_y = y - line.space_before - leading;
            if next_y < self.margin && !page.is_empty() {
                pages.push(std::mem::take(&mut page));
                next_y = top - leading;
            }
            y = next_y;
            page.push(PlacedLine {
                style: line.style,
                text: line.text,
                y,
            });
        }
        if !page.is_empty() || pages.is_empty() {
            pages.push(page);
        }
        pages
    }
}

fn render_error(e: impl std::fmt::Display) -> ExportError {
    ExportError::Render(e.to_string())
}

impl ReportRenderer for PdfReportRenderer {
    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn render(&self, report: &ReportDocument) -> Result<Vec<u8>, ExportError> {
        if report.title.trim().is_empty() {
            return Err(ExportError::Render("report has no title".into()));
        }
        let pages = self.paginate(self.lines(report));
        let (width, height) = (Mm(self.page_width), Mm(self.page_height));

        let (doc, first_page, first_layer) =
            PdfDocument::new(report.title.as_str(), width, height, "Report");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(render_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_error)?;

        let mut layer = doc.get_page(first_page).get_layer(first_layer);
        for (i, page) in pages.iter().enumerate() {
            if i > 0 {
                let (next_page, next_layer) = doc.add_page(width, height, "Report");
                layer = doc.get_page(next_page).get_layer(next_layer);
            }
            for line in page {
                let font = if line.style.bold() { &bold } else { &regular };
                layer.use_text(
                    line.text.as_str(),
                    line.style.size(),
                    Mm(self.margin),
                    Mm(line.y),
                    font,
                );
            }
        }

        let bytes = doc.save_to_bytes().map_err(render_error)?;
        tracing::debug!("Rendered PDF report: {} page(s), {} bytes", pages.len(), bytes.len());
        Ok(bytes)
    }
}

/// Greedy word wrap on character count.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DISCLAIMER;

    fn report(inputs: usize) -> ReportDocument {
        ReportDocument {
            title: "CardioPredict AI Prediction Report".into(),
            generated_at: "2024-01-01 12:00:00".into(),
            inputs: (0..inputs)
                .map(|i| (format!("Field {i}"), i.to_string()))
                .collect(),
            prediction: "Heart Disease Detected".into(),
            probability: "82.00%".into(),
            risk_level: "HIGH".into(),
            disclaimer: DISCLAIMER.into(),
        }
    }

    fn texts(report: &ReportDocument) -> Vec<String> {
        PdfReportRenderer::new()
            .lines(report)
            .into_iter()
            .map(|l| l.text)
            .collect()
    }

    #[test]
    fn test_report_content() {
        let lines = texts(&report(9));
        assert_eq!(lines[0], "CardioPredict AI Prediction Report");
        assert!(lines.contains(&"Date: 2024-01-01 12:00:00".to_string()));
        assert!(lines.contains(&"Field 0: 0".to_string()));
        assert!(lines.contains(&"Field 8: 8".to_string()));
        assert!(lines.contains(&"Prediction: Heart Disease Detected".to_string()));
        assert!(lines.contains(&"Risk Probability: 82.00%".to_string()));
        assert!(lines.contains(&"Risk Level: HIGH".to_string()));

        let tail = lines
            .iter()
            .skip_while(|l| !l.starts_with("Risk Level"))
            .skip(1)
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(tail, DISCLAIMER.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_render_produces_pdf() {
        let bytes = PdfReportRenderer::new()
            .render(&report(9))
            .expect("Should render");
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_long_reports_paginate() {
        let renderer = PdfReportRenderer::new();
        let pages = renderer.paginate(renderer.lines(&report(80)));
        assert!(pages.len() >= 2);
        for line in pages.iter().flatten() {
            assert!(line.y >= renderer.margin);
            assert!(line.y <= renderer.page_height - renderer.margin);
        }

        let bytes = renderer.render(&report(80)).expect("Should render");
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_wrap() {
        let lines = wrap("one two three four", 9);
        assert_eq!(lines, vec!["one two", "three", "four"]);
    }

    #[test]
    fn test_empty_title_fails() {
        let mut r = report(1);
        r.title = " ".into();
        assert!(matches!(
            PdfReportRenderer::new().render(&r),
            Err(ExportError::Render(_))
        ));
    }
}
