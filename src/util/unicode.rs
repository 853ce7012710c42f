use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells. Tabs count as 4 cells.
pub fn display_width(s: &str) -> usize {
    s.split('\t')
        .enumerate()
        .map(|(i, part)| {
            let w = UnicodeWidthStr::width(part);
            if i > 0 { w + 4 } else { w }
        })
        .sum()
}

/// Number of user-perceived characters (extended grapheme clusters).
pub fn grapheme_count(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Right-justify `s` in a column of `width` cells. Wider values are returned
/// unchanged rather than truncated.
pub fn pad_left(s: &str, width: usize) -> String {
    let w = display_width(s);
    if w >= width {
        return s.to_string();
    }
    let mut out = " ".repeat(width - w);
    out.push_str(s);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_of_wide_and_tabbed_text() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("日本"), 4);
        assert_eq!(display_width("a\tb"), 6);
    }

    #[test]
    fn graphemes_count_combining_marks_once() {
        assert_eq!(grapheme_count("cafe\u{301}"), 4);
        assert_eq!(grapheme_count("hello"), 5);
        assert_eq!(grapheme_count(""), 0);
    }

    #[test]
    fn pad_left_right_justifies() {
        assert_eq!(pad_left("7", 2), " 7");
        assert_eq!(pad_left("todo", 11), "       todo");
        assert_eq!(pad_left("日本", 6), "  日本");
    }

    #[test]
    fn pad_left_never_truncates() {
        assert_eq!(pad_left("a long value", 4), "a long value");
    }
}
