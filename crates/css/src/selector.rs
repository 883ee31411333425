use crate::error::SelectorError;
use crate::nth::Nth;
use crate::token::{CssToken, tokenize};

/// Combinator between compound selectors in a complex selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace: ancestor descendant
    Descendant,
    /// `>`: parent > child
    Child,
    /// `+`: prev + next
    NextSibling,
    /// `~`: prev ~ subsequent
    SubsequentSibling,
}

/// Attribute selector operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOp {
    /// `[attr]`
    Exists,
    /// `[attr=val]`
    Eq,
    /// `[attr~=val]`
    Includes,
    /// `[attr|=val]`
    DashMatch,
    /// `[attr^=val]`
    Prefix,
    /// `[attr$=val]`
    Suffix,
    /// `[attr*=val]`
    Substring,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
    /// `:scope`, the element a query is scoped at.
    Scope,
    Root,
    FirstChild,
    LastChild,
    OnlyChild,
    FirstOfType,
    LastOfType,
    OnlyOfType,
    Empty,
    Link,
    AnyLink,
    Visited,
    Hover,
    Active,
    Focus,
    FocusVisible,
    FocusWithin,
    Enabled,
    Disabled,
    Checked,
    NthChild(Nth),
    NthLastChild(Nth),
    Not(Vec<ComplexSelector>),
    Is(Vec<ComplexSelector>),
    Where(Vec<ComplexSelector>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoElement {
    Before,
    After,
    FirstLine,
    FirstLetter,
}

/// A single simple selector component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// Type selector, e.g. `div`, `p` (lower-cased).
    Type(String),
    /// Universal selector `*`.
    Universal,
    Id(String),
    Class(String),
    Attribute {
        name: String,
        op: AttrOp,
        value: Option<String>,
    },
    PseudoClass(PseudoClass),
    PseudoElement(PseudoElement),
}

/// A compound selector is a sequence of simple selectors
/// without any combinator between them (e.g. `div.foo#bar`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    pub simples: Vec<SimpleSelector>,
}

/// A complex selector is a chain of compound selectors separated by combinators.
/// Stored right-to-left for efficient matching: `parts[0]` is the rightmost
/// (subject) compound selector.
///
/// Each element is `(compound_selector, optional_combinator_to_the_left)`.
/// The last element's combinator is always `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    pub parts: Vec<(CompoundSelector, Option<Combinator>)>,
}

/// Comma-separated list of complex selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

/// Parse a selector list, rejecting anything a browser's `querySelector`
/// would throw on.
pub fn parse_selector_list(input: &str) -> Result<SelectorList, SelectorError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens: &tokens, pos: 0 };
    let selectors = parser.parse_list(false)?;
    if let Some(tok) = parser.peek() {
        return Err(SelectorError::unexpected(tok));
    }
    Ok(SelectorList { selectors })
}

struct Parser<'t> {
    tokens: &'t [CssToken],
    pos: usize,
}

impl<'t> Parser<'t> {
    fn peek(&self) -> Option<&'t CssToken> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'t CssToken> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// Skip whitespace, reporting whether any was present.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek() == Some(&CssToken::Whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn at_list_end(&self, nested: bool) -> bool {
        match self.peek() {
            None => true,
            Some(CssToken::RParen) => nested,
            Some(CssToken::Comma) => true,
            _ => false,
        }
    }

    /// `complex (',' complex)*`. When `nested`, stops before a `)`.
    fn parse_list(&mut self, nested: bool) -> Result<Vec<ComplexSelector>, SelectorError> {
        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            selectors.push(self.parse_complex(nested)?);
            self.skip_whitespace();
            match self.peek() {
                Some(CssToken::Comma) => {
                    self.pos += 1;
                }
                Some(CssToken::RParen) if nested => break,
                None => break,
                Some(tok) => return Err(SelectorError::unexpected(tok)),
            }
        }
        Ok(selectors)
    }

    fn parse_complex(&mut self, nested: bool) -> Result<ComplexSelector, SelectorError> {
        let mut parts_ltr: Vec<(CompoundSelector, Option<Combinator>)> = Vec::new();

        let first = match self.parse_compound()? {
            Some(compound) => compound,
            None => {
                return Err(match self.peek() {
                    Some(CssToken::Delim(c @ ('>' | '+' | '~'))) => {
                        SelectorError::DanglingCombinator(*c)
                    }
                    None | Some(CssToken::Comma) | Some(CssToken::RParen) => SelectorError::Empty,
                    Some(tok) => SelectorError::unexpected(tok),
                });
            }
        };
        parts_ltr.push((first, None));

        loop {
            let had_whitespace = self.skip_whitespace();
            if self.at_list_end(nested) {
                break;
            }

            let combinator = match self.peek() {
                Some(CssToken::Delim('>')) => Combinator::Child,
                Some(CssToken::Delim('+')) => Combinator::NextSibling,
                Some(CssToken::Delim('~')) => Combinator::SubsequentSibling,
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(tok) => return Err(SelectorError::unexpected(tok)),
                None => break,
            };
            if combinator != Combinator::Descendant {
                self.pos += 1;
                self.skip_whitespace();
            }

            match self.parse_compound()? {
                Some(compound) => parts_ltr.push((compound, Some(combinator))),
                None => {
                    return Err(match combinator {
                        Combinator::Child => SelectorError::DanglingCombinator('>'),
                        Combinator::NextSibling => SelectorError::DanglingCombinator('+'),
                        Combinator::SubsequentSibling => SelectorError::DanglingCombinator('~'),
                        Combinator::Descendant => match self.peek() {
                            Some(tok) => SelectorError::unexpected(tok),
                            None => SelectorError::Empty,
                        },
                    });
                }
            }
        }

        // Each element's combinator describes how it connects to the element on
        // its left; reversing yields the right-to-left matching order.
        parts_ltr.reverse();
        Ok(ComplexSelector { parts: parts_ltr })
    }

    /// Parse a compound selector; `None` if nothing selector-like is next.
    fn parse_compound(&mut self) -> Result<Option<CompoundSelector>, SelectorError> {
        let mut simples = Vec::new();

        match self.peek() {
            Some(CssToken::Ident(name)) => {
                simples.push(SimpleSelector::Type(name.to_ascii_lowercase()));
                self.pos += 1;
            }
            Some(CssToken::Delim('*')) => {
                simples.push(SimpleSelector::Universal);
                self.pos += 1;
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some(CssToken::Hash { value, is_id }) => {
                    if !is_id {
                        return Err(SelectorError::InvalidId(value.clone()));
                    }
                    simples.push(SimpleSelector::Id(value.clone()));
                    self.pos += 1;
                }
                Some(CssToken::Delim('.')) => {
                    self.pos += 1;
                    match self.next() {
                        Some(CssToken::Ident(name)) => simples.push(SimpleSelector::Class(name.clone())),
                        Some(tok) => return Err(SelectorError::unexpected(tok)),
                        None => return Err(SelectorError::unexpected('.')),
                    }
                }
                Some(CssToken::LBracket) => {
                    self.pos += 1;
                    simples.push(self.parse_attribute()?);
                }
                Some(CssToken::Colon) => {
                    self.pos += 1;
                    simples.push(self.parse_pseudo()?);
                }
                _ => break,
            }
        }

        Ok((!simples.is_empty()).then_some(CompoundSelector { simples }))
    }

    /// Parse the remainder of `[name op? value?]` (the `[` is consumed).
    fn parse_attribute(&mut self) -> Result<SimpleSelector, SelectorError> {
        self.skip_whitespace();
        let name = match self.next() {
            Some(CssToken::Ident(n)) => n.clone(),
            Some(tok) => return Err(SelectorError::unexpected(tok)),
            None => return Err(SelectorError::Unterminated("attribute selector")),
        };
        self.skip_whitespace();

        let op = match self.next() {
            Some(CssToken::RBracket) => {
                return Ok(SimpleSelector::Attribute {
                    name,
                    op: AttrOp::Exists,
                    value: None,
                });
            }
            Some(CssToken::Delim('=')) => AttrOp::Eq,
            Some(CssToken::Delim(c @ ('~' | '|' | '^' | '$' | '*'))) => {
                if self.next() != Some(&CssToken::Delim('=')) {
                    return Err(SelectorError::unexpected(c));
                }
                match *c {
                    '~' => AttrOp::Includes,
                    '|' => AttrOp::DashMatch,
                    '^' => AttrOp::Prefix,
                    '$' => AttrOp::Suffix,
                    _ => AttrOp::Substring,
                }
            }
            Some(tok) => return Err(SelectorError::unexpected(tok)),
            None => return Err(SelectorError::Unterminated("attribute selector")),
        };

        self.skip_whitespace();
        let value = match self.next() {
            Some(CssToken::Ident(v) | CssToken::String(v)) => v.clone(),
            Some(tok) => return Err(SelectorError::unexpected(tok)),
            None => return Err(SelectorError::Unterminated("attribute selector")),
        };
        self.skip_whitespace();

        match self.next() {
            Some(CssToken::RBracket) => Ok(SimpleSelector::Attribute {
                name,
                op,
                value: Some(value),
            }),
            Some(tok) => Err(SelectorError::unexpected(tok)),
            None => Err(SelectorError::Unterminated("attribute selector")),
        }
    }

    /// Parse what follows a `:` (pseudo-class, or pseudo-element after `::`).
    fn parse_pseudo(&mut self) -> Result<SimpleSelector, SelectorError> {
        match self.next() {
            Some(CssToken::Colon) => match self.next() {
                Some(CssToken::Ident(name)) => pseudo_element(name)
                    .map(SimpleSelector::PseudoElement)
                    .ok_or_else(|| SelectorError::UnknownPseudoElement(name.clone())),
                Some(tok) => Err(SelectorError::unexpected(tok)),
                None => Err(SelectorError::unexpected("::")),
            },
            Some(CssToken::Ident(name)) => {
                let lower = name.to_ascii_lowercase();
                // CSS2 single-colon spellings of pseudo-elements.
                if matches!(lower.as_str(), "before" | "after" | "first-line" | "first-letter") {
                    return pseudo_element(&lower)
                        .map(SimpleSelector::PseudoElement)
                        .ok_or(SelectorError::UnknownPseudoElement(lower));
                }
                pseudo_class(&lower)
                    .map(SimpleSelector::PseudoClass)
                    .ok_or(SelectorError::UnknownPseudoClass(lower))
            }
            Some(CssToken::Function(name)) => {
                let lower = name.to_ascii_lowercase();
                let pc = match lower.as_str() {
                    "nth-child" => PseudoClass::NthChild(self.parse_nth_args()?),
                    "nth-last-child" => PseudoClass::NthLastChild(self.parse_nth_args()?),
                    "not" => PseudoClass::Not(self.parse_nested_list()?),
                    "is" | "matches" => PseudoClass::Is(self.parse_nested_list()?),
                    "where" => PseudoClass::Where(self.parse_nested_list()?),
                    _ => return Err(SelectorError::UnknownPseudoClass(lower)),
                };
                Ok(SimpleSelector::PseudoClass(pc))
            }
            Some(tok) => Err(SelectorError::unexpected(tok)),
            None => Err(SelectorError::unexpected(':')),
        }
    }

    /// Collect the raw argument text up to the closing paren and parse it as `an+b`.
    fn parse_nth_args(&mut self) -> Result<Nth, SelectorError> {
        let mut text = String::new();
        loop {
            match self.next() {
                Some(CssToken::RParen) => break,
                Some(
                    tok @ (CssToken::Ident(_)
                    | CssToken::Number(_)
                    | CssToken::Dimension { .. }
                    | CssToken::Delim('+' | '-')
                    | CssToken::Whitespace),
                ) => text.push_str(&tok.to_string()),
                Some(tok) => return Err(SelectorError::unexpected(tok)),
                None => return Err(SelectorError::Unterminated(":nth-child()")),
            }
        }
        Nth::parse(&text)
    }

    fn parse_nested_list(&mut self) -> Result<Vec<ComplexSelector>, SelectorError> {
        let list = self.parse_list(true)?;
        match self.next() {
            Some(CssToken::RParen) => Ok(list),
            _ => Err(SelectorError::Unterminated("functional pseudo-class")),
        }
    }
}

fn pseudo_class(name: &str) -> Option<PseudoClass> {
    Some(match name {
        "scope" => PseudoClass::Scope,
        "root" => PseudoClass::Root,
        "first-child" => PseudoClass::FirstChild,
        "last-child" => PseudoClass::LastChild,
        "only-child" => PseudoClass::OnlyChild,
        "first-of-type" => PseudoClass::FirstOfType,
        "last-of-type" => PseudoClass::LastOfType,
        "only-of-type" => PseudoClass::OnlyOfType,
        "empty" => PseudoClass::Empty,
        "link" => PseudoClass::Link,
        "any-link" => PseudoClass::AnyLink,
        "visited" => PseudoClass::Visited,
        "hover" => PseudoClass::Hover,
        "active" => PseudoClass::Active,
        "focus" => PseudoClass::Focus,
        "focus-visible" => PseudoClass::FocusVisible,
        "focus-within" => PseudoClass::FocusWithin,
        "enabled" => PseudoClass::Enabled,
        "disabled" => PseudoClass::Disabled,
        "checked" => PseudoClass::Checked,
        _ => return None,
    })
}

fn pseudo_element(name: &str) -> Option<PseudoElement> {
    Some(match name.to_ascii_lowercase().as_str() {
        "before" => PseudoElement::Before,
        "after" => PseudoElement::After,
        "first-line" => PseudoElement::FirstLine,
        "first-letter" => PseudoElement::FirstLetter,
        _ => return None,
    })
}
