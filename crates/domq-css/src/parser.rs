//! Selector parser
//!
//! Single pass over the input characters. Whitespace is only significant
//! between compound selectors, where it is the descendant combinator.

use crate::selector::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    NthExpression, PseudoClass, SelectorComponent, SelectorList,
};

/// Selector parsing error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("Empty selector")]
    Empty,
    #[error("Unexpected character {ch:?} at position {pos}")]
    UnexpectedChar { pos: usize, ch: char },
    #[error("Unexpected end of selector")]
    UnexpectedEnd,
    #[error("Unknown pseudo-class :{0}")]
    UnknownPseudoClass(String),
    #[error("Malformed attribute selector [{0}]")]
    MalformedAttribute(String),
    #[error("Invalid An+B expression {0:?}")]
    InvalidNth(String),
    #[error("Combinator without a selector on both sides")]
    DanglingCombinator,
}

/// Parse a comma-separated selector list
pub fn parse_selector(input: &str) -> Result<SelectorList, SelectorError> {
    if input.trim().is_empty() {
        return Err(SelectorError::Empty);
    }
    let mut parser = Parser::new(input);
    let list = parser.parse_list()?;
    tracing::trace!(selector = input, complex = list.0.len(), "parsed selector");
    Ok(list)
}

impl std::str::FromStr for SelectorList {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_selector(s)
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self { chars: input.chars().collect(), pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    /// Skip whitespace, reporting whether any was skipped
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos != start
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(ch) => SelectorError::UnexpectedChar { pos: self.pos, ch },
            None => SelectorError::UnexpectedEnd,
        }
    }

    fn parse_list(&mut self) -> Result<SelectorList, SelectorError> {
        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            selectors.push(self.parse_complex()?);
            self.skip_whitespace();
            match self.bump() {
                None => break,
                Some(',') => continue,
                Some(ch) => return Err(SelectorError::UnexpectedChar { pos: self.pos - 1, ch }),
            }
        }
        Ok(SelectorList(selectors))
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            if combinator != Combinator::Descendant {
                self.pos += 1;
                self.skip_whitespace();
            }
            if matches!(self.peek(), None | Some(',')) {
                return Err(SelectorError::DanglingCombinator);
            }
            compounds.push(self.parse_compound()?);
            combinators.push(combinator);
        }

        Ok(ComplexSelector { compounds, combinators })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut components = Vec::new();

        if self.peek() == Some('*') {
            self.pos += 1;
            components.push(SelectorComponent::Universal);
        } else if self.peek().is_some_and(is_ident_start) {
            let tag = self.read_ident()?;
            components.push(SelectorComponent::Type(tag.to_ascii_lowercase()));
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    components.push(SelectorComponent::Id(self.read_ident()?));
                }
                Some('.') => {
                    self.pos += 1;
                    components.push(SelectorComponent::Class(self.read_ident()?));
                }
                Some('[') => {
                    self.pos += 1;
                    let content = self.read_bracketed()?;
                    components.push(SelectorComponent::Attribute(parse_attribute_selector(&content)?));
                }
                Some(':') => {
                    self.pos += 1;
                    if self.peek() == Some(':') {
                        // Pseudo-elements never match an element
                        self.pos += 1;
                        let name = self.read_ident()?;
                        return Err(SelectorError::UnknownPseudoClass(format!(":{}", name)));
                    }
                    let name = self.read_ident()?;
                    let arg = if self.peek() == Some('(') {
                        self.pos += 1;
                        Some(self.read_parenthesized()?)
                    } else {
                        None
                    };
                    components.push(SelectorComponent::PseudoClass(parse_pseudo_class(
                        &name,
                        arg.as_deref(),
                    )?));
                }
                _ => break,
            }
        }

        if components.is_empty() {
            return Err(match self.peek() {
                Some('>' | '+' | '~') => SelectorError::DanglingCombinator,
                None | Some(',') => SelectorError::Empty,
                Some(_) => self.unexpected(),
            });
        }
        Ok(CompoundSelector { components })
    }

    /// Read a CSS identifier, resolving backslash escapes
    fn read_ident(&mut self) -> Result<String, SelectorError> {
        if !self.peek().is_some_and(is_ident_start) {
            return Err(self.unexpected());
        }
        let mut ident = String::new();
        while let Some(ch) = self.peek() {
            if ch == '\\' {
                self.pos += 1;
                ident.push(self.bump().ok_or(SelectorError::UnexpectedEnd)?);
            } else if is_ident_char(ch) {
                self.pos += 1;
                ident.push(ch);
            } else {
                break;
            }
        }
        Ok(ident)
    }

    /// Content up to the closing `]`, skipping over quoted strings
    fn read_bracketed(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        let mut quote = None;
        while let Some(ch) = self.bump() {
            match (quote, ch) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(ch),
                (None, ']') => return Ok(self.chars[start..self.pos - 1].iter().collect()),
                (None, _) => {}
            }
        }
        let content: String = self.chars[start..].iter().collect();
        Err(SelectorError::MalformedAttribute(content))
    }

    /// Content up to the matching `)`
    fn read_parenthesized(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        let mut depth = 1;
        while let Some(ch) = self.bump() {
            match ch {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(self.chars[start..self.pos - 1].iter().collect());
                    }
                }
                _ => {}
            }
        }
        Err(SelectorError::UnexpectedEnd)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || c == '\\' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}

/// Check if string is a valid CSS identifier
fn is_valid_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_ident_start(c) && c != '\\' => chars.all(is_ident_char),
        _ => false,
    }
}

/// Parse an attribute selector content (without brackets)
fn parse_attribute_selector(content: &str) -> Result<AttributeSelector, SelectorError> {
    let malformed = || SelectorError::MalformedAttribute(content.to_string());
    let content = content.trim();

    let Some(eq) = content.find('=') else {
        // Just attribute presence [attr]
        if !is_valid_ident(content) {
            return Err(malformed());
        }
        return Ok(AttributeSelector {
            name: content.to_ascii_lowercase(),
            matcher: None,
            case_insensitive: false,
        });
    };

    let (name, op) = match content[..eq].chars().last() {
        Some(op @ ('~' | '|' | '^' | '$' | '*')) => (&content[..eq - 1], Some(op)),
        _ => (&content[..eq], None),
    };
    let name = name.trim();
    if !is_valid_ident(name) {
        return Err(malformed());
    }

    let (value, flag) = split_case_flag(content[eq + 1..].trim());
    let case_insensitive = flag == Some('i');
    let value = unquote(value).ok_or_else(malformed)?;

    let matcher = match op {
        None => AttributeMatcher::Exact(value),
        Some('~') => AttributeMatcher::Contains(value),
        Some('|') => AttributeMatcher::DashMatch(value),
        Some('^') => AttributeMatcher::Prefix(value),
        Some('$') => AttributeMatcher::Suffix(value),
        Some(_) => AttributeMatcher::Substring(value),
    };

    Ok(AttributeSelector {
        name: name.to_ascii_lowercase(),
        matcher: Some(matcher),
        case_insensitive,
    })
}

/// Split a trailing `i`/`s` flag off an attribute value. The flag follows
/// whitespace, or directly follows the closing quote of a quoted value.
fn split_case_flag(value: &str) -> (&str, Option<char>) {
    let Some(flag) = value.chars().last().map(|c| c.to_ascii_lowercase()) else {
        return (value, None);
    };
    if flag != 'i' && flag != 's' {
        return (value, None);
    }
    let rest = &value[..value.len() - 1];
    let quoted = match rest.chars().last() {
        Some(q @ ('"' | '\'')) => rest.len() > 1 && rest.starts_with(q),
        _ => false,
    };
    if quoted || rest.ends_with(char::is_whitespace) {
        (rest.trim_end(), Some(flag))
    } else {
        (value, None)
    }
}

/// Strip matching quotes; unquoted values must be a single bare word
fn unquote(value: &str) -> Option<String> {
    for quote in ['"', '\''] {
        if let Some(rest) = value.strip_prefix(quote) {
            return rest.strip_suffix(quote).map(str::to_string);
        }
    }
    if value.is_empty() || value.contains(char::is_whitespace) {
        return None;
    }
    Some(value.to_string())
}

/// Parse a pseudo-class name and optional argument
fn parse_pseudo_class(name: &str, arg: Option<&str>) -> Result<PseudoClass, SelectorError> {
    let nth = |arg: &str| {
        NthExpression::parse(arg).ok_or_else(|| SelectorError::InvalidNth(arg.trim().to_string()))
    };

    let pseudo = match (name.to_ascii_lowercase().as_str(), arg) {
        ("root", None) => PseudoClass::Root,
        ("empty", None) => PseudoClass::Empty,
        ("first-child", None) => PseudoClass::FirstChild,
        ("last-child", None) => PseudoClass::LastChild,
        ("only-child", None) => PseudoClass::OnlyChild,
        ("first-of-type", None) => PseudoClass::FirstOfType,
        ("last-of-type", None) => PseudoClass::LastOfType,
        ("only-of-type", None) => PseudoClass::OnlyOfType,
        ("checked", None) => PseudoClass::Checked,
        ("disabled", None) => PseudoClass::Disabled,
        ("enabled", None) => PseudoClass::Enabled,
        ("nth-child", Some(arg)) => PseudoClass::NthChild(nth(arg)?),
        ("nth-last-child", Some(arg)) => PseudoClass::NthLastChild(nth(arg)?),
        ("nth-of-type", Some(arg)) => PseudoClass::NthOfType(nth(arg)?),
        ("nth-last-of-type", Some(arg)) => PseudoClass::NthLastOfType(nth(arg)?),
        ("not", Some(arg)) => PseudoClass::Not(parse_compound_list(arg)?),
        _ => return Err(SelectorError::UnknownPseudoClass(name.to_string())),
    };
    Ok(pseudo)
}

/// Comma-separated compound selectors, as accepted inside `:not()`
fn parse_compound_list(input: &str) -> Result<Vec<CompoundSelector>, SelectorError> {
    let mut parser = Parser::new(input);
    let mut compounds = Vec::new();
    loop {
        parser.skip_whitespace();
        compounds.push(parser.parse_compound()?);
        parser.skip_whitespace();
        match parser.bump() {
            None => return Ok(compounds),
            Some(',') => continue,
            Some(ch) => return Err(SelectorError::UnexpectedChar { pos: parser.pos - 1, ch }),
        }
    }
}
