/// Options for normalizing extracted text
#[derive(Debug, Clone, Copy)]
pub struct TextOptions {
    /// Keep paragraph boundaries as a single blank line
    pub preserve_paragraphs: bool,
    /// Keep single newlines inside a paragraph
    pub preserve_line_breaks: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            preserve_paragraphs: true,
            preserve_line_breaks: false,
        }
    }
}

/// Normalize text with the default options
pub fn normalize(text: &str) -> String {
    normalize_with_options(text, &TextOptions::default())
}

/// Normalize text: trims lines, collapses runs of whitespace and blank lines
pub fn normalize_with_options(text: &str, options: &TextOptions) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let separator = if options.preserve_paragraphs { "\n\n" } else { " " };

    split_into_paragraphs(text)
        .iter()
        .map(|para| process_paragraph(para, options))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Splits text into paragraphs of trimmed, non-empty lines
pub fn split_into_paragraphs(text: &str) -> Vec<Vec<&str>> {
    let mut paragraphs = Vec::new();
    let mut current = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(trimmed);
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
}

fn process_paragraph(lines: &[&str], options: &TextOptions) -> String {
    let lines = lines.iter().map(|line| collapse_whitespace(line));
    if options.preserve_line_breaks {
        lines.collect::<Vec<_>>().join("\n")
    } else {
        lines.collect::<Vec<_>>().join(" ")
    }
}

/// Collapses all whitespace runs in a segment to single spaces
pub fn collapse_whitespace(segment: &str) -> String {
    segment.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_into_paragraphs() {
        assert!(split_into_paragraphs("").is_empty());

        let result = split_into_paragraphs("Line 1\nLine 2\n\n\n\n  Para 2  ");
        assert_eq!(result, vec![vec!["Line 1", "Line 2"], vec!["Para 2"]]);
    }

    #[test]
    fn test_normalize_keeps_one_blank_line_between_paragraphs() {
        let text = "Paragraph   1.\n\n\n\nParagraph 2.\n\n\nParagraph 3.";
        assert_eq!(normalize(text), "Paragraph 1.\n\nParagraph 2.\n\nParagraph 3.");
    }

    #[test]
    fn test_normalize_flat() {
        let options = TextOptions {
            preserve_paragraphs: false,
            preserve_line_breaks: false,
        };
        let text = "Line 1\nLine 2\n\nLine 3";
        assert_eq!(normalize_with_options(text, &options), "Line 1 Line 2 Line 3");
    }

    #[test]
    fn test_normalize_line_breaks() {
        let options = TextOptions {
            preserve_paragraphs: true,
            preserve_line_breaks: true,
        };
        let text = "a  b\nc\n\nd";
        assert_eq!(normalize_with_options(text, &options), "a b\nc\n\nd");
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert_eq!(normalize(" \n\t \n"), "");
    }
}
