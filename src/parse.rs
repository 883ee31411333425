//! Text-level parsing of extended selectors.
//!
//! Everything here is a pure function of the input string; [`crate::Engine`]
//! memoizes the results.

/// Characters that may open a context-relative clause.
pub const CONTEXT_PREFIXES: [char; 5] = ['!', '+', '~', '-', '>'];

fn is_prefix(c: char) -> bool {
    CONTEXT_PREFIXES.contains(&c)
}

/// A selector split into its top-level clauses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSelector {
    pub raw: String,
    /// Clauses rejoined with `,`.
    pub normalized: String,
    pub clauses: Vec<String>,
    /// At least one clause starts with one of [`CONTEXT_PREFIXES`].
    pub is_context_selector: bool,
}

impl ParsedSelector {
    pub fn parse(raw: &str) -> Self {
        let clauses = split_clauses(&normalize(raw));
        let is_context_selector = clauses
            .iter()
            .any(|clause| clause.starts_with(is_prefix));
        Self {
            raw: raw.to_string(),
            normalized: clauses.join(","),
            clauses,
            is_context_selector,
        }
    }

    pub fn is_single(&self) -> bool {
        self.clauses.len() == 1
    }
}

/// An `!`- or `-`-prefixed clause: `<prefix><anchor> <filter>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionClause {
    pub anchor: String,
    /// Empty when the clause is only an anchor.
    pub filter: String,
}

impl PositionClause {
    pub fn parse(clause: &str) -> Self {
        let mut chars = clause.chars();
        chars.next();
        let body = chars.as_str().trim();
        match body.split_once(char::is_whitespace) {
            Some((anchor, filter)) => Self {
                anchor: anchor.to_string(),
                filter: filter.trim().to_string(),
            },
            None => Self {
                anchor: body.to_string(),
                filter: String::new(),
            },
        }
    }
}

/// Insert ` *` after every combinator that would otherwise dangle: one
/// followed by optional whitespace and then the end of input or a `,`, or
/// by whitespace and then another combinator.
pub fn normalize(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        out.push(c);
        if is_prefix(c) && dangles(&chars[i + 1..]) {
            out.push_str(" *");
        }
    }
    out
}

fn dangles(rest: &[char]) -> bool {
    let ws = rest.iter().take_while(|c| c.is_whitespace()).count();
    match rest.get(ws) {
        None | Some(',') => true,
        Some(&next) => ws > 0 && is_prefix(next),
    }
}

/// Split at commas outside parentheses, brackets and quoted strings.
///
/// A backslash escapes the following character, so `\,` never splits.
/// Unbalanced closing parentheses are ignored. Each clause is trimmed and
/// empty clauses are dropped.
pub fn split_clauses(text: &str) -> Vec<String> {
    let mut clauses = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (_, '\\') => {
                current.push(c);
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
                continue;
            }
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                push_clause(&mut clauses, &current);
                current.clear();
                continue;
            }
            (None, _) => {}
        }
        current.push(c);
    }
    push_clause(&mut clauses, &current);
    clauses
}

fn push_clause(clauses: &mut Vec<String>, text: &str) {
    let clause = text.trim();
    if !clause.is_empty() {
        clauses.push(clause.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dangling_combinators_get_a_universal() {
        assert_eq!(normalize(">"), "> *");
        assert_eq!(normalize("!"), "! *");
        assert_eq!(normalize("div >"), "div > *");
        assert_eq!(normalize("~ , a"), "~ * , a");
        assert_eq!(normalize("- +"), "- * + *");
    }

    #[test]
    fn bound_combinators_are_left_alone() {
        assert_eq!(normalize("> li"), "> li");
        assert_eq!(normalize("!.item -li"), "!.item -li");
        assert_eq!(normalize(":nth-child(2n-1)"), ":nth-child(2n-1)");
        // `-` directly followed by `+` without whitespace is part of a word.
        assert_eq!(normalize("a-+b"), "a-+b");
    }

    #[test]
    fn splits_top_level_commas_only() {
        assert_eq!(split_clauses("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(split_clauses(":is(a, b), c"), vec![":is(a, b)", "c"]);
        assert_eq!(split_clauses("[title='x,y'], p"), vec!["[title='x,y']", "p"]);
        assert_eq!(split_clauses(r"#a\,b, p"), vec![r"#a\,b", "p"]);
        assert_eq!(split_clauses("a,,b,"), vec!["a", "b"]);
        assert!(split_clauses("  ").is_empty());
    }

    #[test]
    fn classifies_context_selectors() {
        assert!(!ParsedSelector::parse("ul > li, p").is_context_selector);
        assert!(ParsedSelector::parse("p, !ul").is_context_selector);
        for prefix in CONTEXT_PREFIXES {
            assert!(ParsedSelector::parse(&format!("{prefix}li")).is_context_selector);
        }
    }

    #[test]
    fn parsed_selector_fields() {
        let parsed = ParsedSelector::parse(" !ul li ,  >  ");
        assert_eq!(parsed.raw, " !ul li ,  >  ");
        assert_eq!(parsed.clauses, vec!["!ul li", "> *"]);
        assert_eq!(parsed.normalized, "!ul li,> *");
        assert!(!parsed.is_single());
    }

    #[test]
    fn position_clause_splits_at_first_whitespace() {
        assert_eq!(
            PositionClause::parse("!ul.menu  > li a"),
            PositionClause { anchor: "ul.menu".into(), filter: "> li a".into() }
        );
        assert_eq!(
            PositionClause::parse("- li"),
            PositionClause { anchor: "li".into(), filter: String::new() }
        );
        assert_eq!(
            PositionClause::parse("!"),
            PositionClause { anchor: String::new(), filter: String::new() }
        );
    }
}
