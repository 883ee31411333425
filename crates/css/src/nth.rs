//! `an+b` microsyntax used by `:nth-child()` and `:nth-last-child()`.

use crate::error::SelectorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nth {
    pub a: i32,
    pub b: i32,
}

impl Nth {
    pub const fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Parse `odd`, `even`, `B`, `An`, `An+B`, `-n+B`, ... (whitespace around
    /// the sign is allowed).
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        let invalid = || SelectorError::InvalidNth(text.trim().to_string());
        let compact: String = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();

        match compact.as_str() {
            "" => return Err(invalid()),
            "odd" => return Ok(Self::new(2, 1)),
            "even" => return Ok(Self::new(2, 0)),
            _ => {}
        }

        let Some((a_part, b_part)) = compact.split_once('n') else {
            return parse_signed(&compact).map(|b| Self::new(0, b)).ok_or_else(invalid);
        };

        let a = match a_part {
            "" | "+" => 1,
            "-" => -1,
            digits => parse_signed(digits).ok_or_else(invalid)?,
        };
        let b = match b_part {
            "" => 0,
            rest if rest.starts_with(['+', '-']) => parse_signed(rest).ok_or_else(invalid)?,
            _ => return Err(invalid()),
        };
        Ok(Self::new(a, b))
    }

    /// Does the 1-based `position` satisfy `a*n + b` for some `n >= 0`?
    pub fn matches(self, position: i32) -> bool {
        if self.a == 0 {
            return position == self.b;
        }
        let (a, diff) = (i64::from(self.a), i64::from(position) - i64::from(self.b));
        diff % a == 0 && diff / a >= 0
    }
}

fn parse_signed(text: &str) -> Option<i32> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords() {
        assert_eq!(Nth::parse("odd"), Ok(Nth::new(2, 1)));
        assert_eq!(Nth::parse(" EVEN "), Ok(Nth::new(2, 0)));
    }

    #[test]
    fn plain_integer() {
        assert_eq!(Nth::parse("3"), Ok(Nth::new(0, 3)));
        assert_eq!(Nth::parse("+3"), Ok(Nth::new(0, 3)));
    }

    #[test]
    fn an_plus_b_forms() {
        assert_eq!(Nth::parse("2n+1"), Ok(Nth::new(2, 1)));
        assert_eq!(Nth::parse("2n + 1"), Ok(Nth::new(2, 1)));
        assert_eq!(Nth::parse("-n+3"), Ok(Nth::new(-1, 3)));
        assert_eq!(Nth::parse("n"), Ok(Nth::new(1, 0)));
        assert_eq!(Nth::parse("3n-2"), Ok(Nth::new(3, -2)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(Nth::parse("").is_err());
        assert!(Nth::parse("x").is_err());
        assert!(Nth::parse("2n1").is_err());
        assert!(Nth::parse("2nn").is_err());
        assert!(Nth::parse("n+").is_err());
    }

    #[test]
    fn matching() {
        assert!(Nth::new(0, 2).matches(2));
        assert!(!Nth::new(0, 2).matches(3));

        let odd = Nth::new(2, 1);
        assert!(odd.matches(1) && odd.matches(5));
        assert!(!odd.matches(4));

        let first_three = Nth::new(-1, 3);
        assert!(first_three.matches(1) && first_three.matches(3));
        assert!(!first_three.matches(4));
    }
}
