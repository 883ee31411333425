//! CSS identifier escaping (`CSS.escape`).

use std::fmt::Write;

/// Values accepted by [`escape`]. Only text escapes to something; every
/// other input escapes to the empty string.
pub trait EscapeInput {
    fn as_css_text(&self) -> Option<&str> {
        None
    }
}

impl EscapeInput for str {
    fn as_css_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl EscapeInput for String {
    fn as_css_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl<T: EscapeInput + ?Sized> EscapeInput for &T {
    fn as_css_text(&self) -> Option<&str> {
        (**self).as_css_text()
    }
}

impl<T: EscapeInput> EscapeInput for Option<T> {
    fn as_css_text(&self) -> Option<&str> {
        self.as_ref().and_then(EscapeInput::as_css_text)
    }
}

macro_rules! not_text {
    ($($ty:ty),* $(,)?) => {
        $(impl EscapeInput for $ty {})*
    };
}

not_text!(bool, char, (), i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// Escape `value` for use as a CSS identifier, or `""` when it is not text.
pub fn escape<V: EscapeInput + ?Sized>(value: &V) -> String {
    value.as_css_text().map(css_escape).unwrap_or_default()
}

/// The CSSOM `CSS.escape()` serialization of an identifier.
pub fn css_escape(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    let first = ident.chars().next();
    let lone = ident.chars().nth(1).is_none();

    for (i, c) in ident.chars().enumerate() {
        let leading_digit =
            c.is_ascii_digit() && (i == 0 || (i == 1 && first == Some('-')));
        match c {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => hex_escape(&mut out, c),
            _ if leading_digit => hex_escape(&mut out, c),
            '-' if i == 0 && lone => out.push_str("\\-"),
            c if c >= '\u{80}' || c == '-' || c == '_' || c.is_ascii_alphanumeric() => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

fn hex_escape(out: &mut String, c: char) {
    // Writing to a String cannot fail.
    let _ = write!(out, "\\{:x} ", u32::from(c));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_identifiers_pass_through() {
        assert_eq!(escape("main"), "main");
        assert_eq!(escape("nav-item_2"), "nav-item_2");
        assert_eq!(escape("héllo"), "héllo");
    }

    #[test]
    fn special_characters_are_backslashed() {
        assert_eq!(escape("a b"), "a\\ b");
        assert_eq!(escape("a.b#c"), "a\\.b\\#c");
        assert_eq!(escape("x:y"), "x\\:y");
    }

    #[test]
    fn leading_digits_use_hex_escapes() {
        assert_eq!(escape("1a"), "\\31 a");
        assert_eq!(escape("-1"), "-\\31 ");
        assert_eq!(escape("a1"), "a1");
    }

    #[test]
    fn lone_hyphen_and_control_chars() {
        assert_eq!(escape("-"), "\\-");
        assert_eq!(escape("--"), "--");
        assert_eq!(escape("a\u{1}"), "a\\1 ");
        assert_eq!(escape("\0"), "\u{FFFD}");
    }

    #[test]
    fn non_text_escapes_to_empty() {
        assert_eq!(escape(&42), "");
        assert_eq!(escape(&true), "");
        assert_eq!(escape(&None::<&str>), "");
        assert_eq!(escape(&Some("a b")), "a\\ b");
        assert_eq!(escape(&String::from("x")), "x");
    }
}
