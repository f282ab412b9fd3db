//! Sanitizing recorded text before it is drawn.
//!
//! Commands come from arbitrary shell input and can contain escape sequences
//! or embedded newlines (heredocs, multi-line pastes). The selector draws each
//! entry on one table row, so cells go through [`display_line`] first. The
//! text written to stdout on selection is never altered.

/// Strips ANSI CSI sequences and control characters other than tab, newline
/// and carriage return
///
/// # Examples
///
/// ```
/// use dirhist::utils::terminal::strip_ansi_codes;
///
/// let text = "\x1b[31mRed text\x1b[0m";
/// assert_eq!(strip_ansi_codes(text), "Red text");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // CSI ends at the first letter
            while let Some(next_ch) = chars.next() {
                if next_ch.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }

        if ch.is_control() && ch != '\t' && ch != '\n' && ch != '\r' {
            continue;
        }

        result.push(ch);
    }

    result
}

/// Single-line rendering of `text` for a table cell
///
/// Escape sequences are removed, line breaks become `↵` and tabs become a
/// space.
pub fn display_line(text: &str) -> String {
    let stripped = strip_ansi_codes(text);
    let mut result = String::with_capacity(stripped.len());
    let mut chars = stripped.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\r' if chars.peek() == Some(&'\n') => {}
            '\r' | '\n' => result.push('↵'),
            '\t' => result.push(' '),
            _ => result.push(ch),
        }
    }

    result
}
