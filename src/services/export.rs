//! Renders a finished digest as a downloadable PDF.

use anyhow::Result;
use printpdf::{BuiltinFont, Mm, PdfDocument};

// Helvetica at 11pt fits roughly this many characters between A4 margins.
const MAX_LINE_CHARS: usize = 90;

/// Render `summary` as an A4 PDF with a bold title line and word-wrapped
/// body paragraphs, paginating as needed. Returns the document bytes.
pub fn render_summary_pdf(title: &str, summary: &str) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(title, Mm(210.0), Mm(297.0), "body");

    let body_font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow::anyhow!("Failed to load body font: {e}"))?;
    let title_font = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow::anyhow!("Failed to load title font: {e}"))?;

    let mut current = doc.get_page(page).get_layer(layer);
    // Start below the top margin; 6mm per body line, 20mm margins.
    let mut y = 297.0 - 20.0;

    current.use_text(title, 16.0, Mm(20.0), Mm(y), &title_font);
    y -= 12.0;

    for paragraph in summary.split('\n').filter(|p| !p.trim().is_empty()) {
        for line in wrap_words(paragraph, MAX_LINE_CHARS) {
            if y < 20.0 {
                let (next_page, next_layer) = doc.add_page(Mm(210.0), Mm(297.0), "body");
                current = doc.get_page(next_page).get_layer(next_layer);
                y = 297.0 - 20.0;
            }
            current.use_text(line, 11.0, Mm(20.0), Mm(y), &body_font);
            y -= 6.0;
        }
        y -= 6.0;
    }

    doc.save_to_bytes()
        .map_err(|e| anyhow::anyhow!("Failed to serialize PDF: {e}"))
}

/// Greedy word wrap: pack whole words onto lines of at most `max_chars`
/// characters. A single word longer than the limit gets its own line
/// rather than being broken.
pub fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
        } else if line.chars().count() + 1 + word.chars().count() <= max_chars {
            line.push(' ');
            line.push_str(word);
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_line_width() {
        let text = (0..40).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
        for line in wrap_words(&text, 30) {
            assert!(line.chars().count() <= 30, "line too long: {line:?}");
        }
    }

    #[test]
    fn test_wrap_preserves_word_sequence() {
        let text = "the quick brown fox jumps over the lazy dog";
        let rejoined = wrap_words(text, 12).join(" ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn test_wrap_empty_input() {
        assert!(wrap_words("", 20).is_empty());
        assert!(wrap_words("   ", 20).is_empty());
    }

    #[test]
    fn test_wrap_oversized_word_gets_own_line() {
        let lines = wrap_words("short superlongunbreakableword end", 10);
        assert!(lines.contains(&"superlongunbreakableword".to_string()));
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let bytes = render_summary_pdf("Digest", "A concise summary of the paper.").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_paginates_long_summaries() {
        let long = (0..3000)
            .map(|i| format!("word{i}"))
            .collect::<Vec<_>>()
            .join(" ");
        let bytes = render_summary_pdf("Digest", &long).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1000);
    }
}
