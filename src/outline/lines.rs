//! Grouping of filtered spans into visual lines.

use crate::model::Span;

/// One visual text line: spans that share a line top within tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    spans: Vec<Span>,
}

impl Line {
    fn new(first: Span) -> Self {
        Self { spans: vec![first] }
    }

    /// Build a line from spans that are already known to belong together.
    ///
    /// Returns `None` for an empty span list.
    pub fn from_spans(spans: Vec<Span>) -> Option<Self> {
        if spans.is_empty() {
            None
        } else {
            Some(Self { spans })
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Space-joined span texts, trimmed.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|span| span.text.as_str())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }

    /// The most common font size among the spans.
    ///
    /// Ties resolve to the size encountered first.
    pub fn dominant_font_size(&self) -> f32 {
        let mut counts: Vec<(i64, f32, usize)> = Vec::new();
        for span in &self.spans {
            let key = (span.font_size * 100.0).round() as i64;
            match counts.iter_mut().find(|(k, _, _)| *k == key) {
                Some(entry) => entry.2 += 1,
                None => counts.push((key, span.font_size, 1)),
            }
        }

        let mut best: Option<(f32, usize)> = None;
        for (_, size, count) in counts {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((size, count));
            }
        }
        best.map(|(size, _)| size).unwrap_or(0.0)
    }

    pub fn any_bold(&self) -> bool {
        self.spans.iter().any(|span| span.is_bold)
    }

    pub fn all_bold(&self) -> bool {
        self.spans.iter().all(|span| span.is_bold)
    }

    pub fn any_italic(&self) -> bool {
        self.spans.iter().any(|span| span.is_italic)
    }

    /// Page of the line's first span.
    pub fn page(&self) -> u32 {
        self.spans[0].page
    }

    /// Line top, taken from the first span.
    pub fn top(&self) -> f32 {
        self.spans[0].line_y0()
    }

    /// Bottom edge of the last span's own box.
    pub fn last_span_bottom(&self) -> f32 {
        self.spans[self.spans.len() - 1].bbox.y1
    }
}

/// Group one page's spans into lines, preserving reading order.
///
/// A span joins the open line when its line top is within `tolerance` of the
/// line's first span; otherwise it opens a new line.
pub fn assemble_lines(spans: Vec<Span>, tolerance: f32) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::new();
    let mut current: Option<Line> = None;

    for span in spans {
        match current.as_mut() {
            Some(line) if (span.line_y0() - line.top()).abs() <= tolerance => {
                line.spans.push(span);
            }
            _ => {
                if let Some(line) = current.take() {
                    lines.push(line);
                }
                current = Some(Line::new(span));
            }
        }
    }

    if let Some(line) = current {
        lines.push(line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, size: f32, y0: f32) -> Span {
        Span::new(text, size, 1).at(72.0, y0, 200.0, y0 + size)
    }

    #[test]
    fn test_groups_by_line_top() {
        let spans = vec![
            span("1.", 12.0, 100.0),
            span("Introduction", 12.0, 100.05),
            span("Body", 10.0, 130.0),
        ];
        let lines = assemble_lines(spans, 0.1);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "1. Introduction");
        assert_eq!(lines[1].text(), "Body");
    }

    #[test]
    fn test_tolerance_is_against_line_start() {
        // Drift accumulates past the tolerance relative to the first span
        let spans = vec![
            span("a", 10.0, 100.0),
            span("b", 10.0, 100.08),
            span("c", 10.0, 100.16),
        ];
        let lines = assemble_lines(spans, 0.1);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "a b");
        assert_eq!(lines[1].text(), "c");
    }

    #[test]
    fn test_empty_page() {
        assert!(assemble_lines(Vec::new(), 0.1).is_empty());
    }

    #[test]
    fn test_text_skips_empty_spans() {
        let line = Line::from_spans(vec![
            span("", 10.0, 0.0),
            span("Hello", 10.0, 0.0),
            span("world ", 10.0, 0.0),
        ])
        .unwrap();
        assert_eq!(line.text(), "Hello world");
    }

    #[test]
    fn test_dominant_font_size_tie_prefers_first() {
        let line = Line::from_spans(vec![
            span("a", 14.0, 0.0),
            span("b", 10.0, 0.0),
            span("c", 10.0, 0.0),
            span("d", 14.0, 0.0),
        ])
        .unwrap();
        assert_eq!(line.dominant_font_size(), 14.0);

        let line = Line::from_spans(vec![
            span("a", 14.0, 0.0),
            span("b", 10.0, 0.0),
            span("c", 10.0, 0.0),
        ])
        .unwrap();
        assert_eq!(line.dominant_font_size(), 10.0);
    }

    #[test]
    fn test_style_flags() {
        let line = Line::from_spans(vec![
            span("Bold", 10.0, 0.0).bold(),
            span("plain", 10.0, 0.0).italic(),
        ])
        .unwrap();
        assert!(line.any_bold());
        assert!(!line.all_bold());
        assert!(line.any_italic());
        assert!(Line::from_spans(Vec::new()).is_none());
    }
}
