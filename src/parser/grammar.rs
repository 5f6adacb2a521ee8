//! Token grammar for ingredient lines.
//!
//! Patterns, tried in order:
//!
//! ```text
//! can goods        amount "(" amount unit ")" container product note*
//! loose can goods  amount [amount] unit container product note*
//! general          amount [unit] product note*
//!
//! amount    quantity [("-" | "to" | "or") quantity]     lower bound of a range
//! quantity  number [fraction]                           "2", "1.5", "1/2", "2 1/2"
//! note      "," word* | "(" word* ")"
//! ```

use log::debug;

use crate::parser::amount::{is_fraction, is_numeric, parse_amount, starts_numeric};
use crate::parser::normalize::{expand_vulgar_fractions, normalize, strip_currency, Strictness};
use crate::parser::units::UnitNicknames;

/// Packaging words that mark a can-goods line.
const CONTAINERS: &[&str] = &[
    "can", "cans", "tin", "tins", "jar", "jars", "package", "packages", "pkg",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(String),
    Word(String),
    Open,
    Close,
    Comma,
    Dash,
}

impl Token {
    /// Text used for unit lookup; punctuation never matches a nickname.
    fn text(&self) -> &str {
        match self {
            Token::Number(text) | Token::Word(text) => text,
            _ => "",
        }
    }

    fn is_word(&self, word: &str) -> bool {
        matches!(self, Token::Word(w) if w == word)
    }
}

/// Split a line into lowercase tokens after removing currency annotations.
///
/// Words keep their punctuation; parentheses, commas and dashes become structure.
pub fn tokenize(line: &str) -> Vec<Token> {
    let text = expand_vulgar_fractions(&strip_currency(line));
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut buf = String::new();

    for (i, &c) in chars.iter().enumerate() {
        match c {
            c if c.is_whitespace() => flush(&mut buf, &mut tokens),
            '(' | '[' => {
                flush(&mut buf, &mut tokens);
                tokens.push(Token::Open);
            }
            ')' | ']' => {
                flush(&mut buf, &mut tokens);
                tokens.push(Token::Close);
            }
            ',' | ';' => {
                flush(&mut buf, &mut tokens);
                tokens.push(Token::Comma);
            }
            '-' | '–' | '—' if buf.is_empty() => tokens.push(Token::Dash),
            '-' | '–' if is_numeric(&buf) => {
                flush(&mut buf, &mut tokens);
                if chars.get(i + 1).is_some_and(|n| n.is_ascii_digit()) {
                    tokens.push(Token::Dash);
                }
            }
            c => buf.push(c),
        }
    }
    flush(&mut buf, &mut tokens);
    tokens
}

fn flush(buf: &mut String, tokens: &mut Vec<Token>) {
    if buf.is_empty() {
        return;
    }
    let raw = std::mem::take(buf);
    let raw = raw.trim_end_matches('.');

    // "8oz" and "500g" carry their unit glued to the number.
    if starts_numeric(raw) {
        if let Some(split) = raw.find(|c: char| c.is_alphabetic()) {
            let (number, rest) = raw.split_at(split);
            if is_numeric(number) {
                tokens.push(Token::Number(number.to_string()));
                push_word(rest, tokens);
                return;
            }
        }
        if is_numeric(raw) {
            tokens.push(Token::Number(raw.to_string()));
            return;
        }
    }
    push_word(raw, tokens);
}

fn push_word(raw: &str, tokens: &mut Vec<Token>) {
    let word = raw.trim_matches('.').to_lowercase();
    if !word.is_empty() {
        tokens.push(Token::Word(word));
    }
}

/// Token texts for nickname matching.
pub fn texts(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(Token::text).collect()
}

/// Parse an amount at `pos`, returning the value and the position after it.
pub fn amount(tokens: &[Token], pos: usize) -> Option<(f64, usize)> {
    let (lower, next) = quantity(tokens, pos)?;
    let Some(separator) = tokens.get(next) else {
        return Some((lower, next));
    };
    let is_dash = *separator == Token::Dash;
    if !(is_dash || separator.is_word("to") || separator.is_word("or")) {
        return Some((lower, next));
    }
    let Some((upper, end)) = quantity(tokens, next + 1) else {
        return Some((lower, next));
    };

    // "1-1/2" is a mixed number, not a range from one to a half.
    let whole =
        matches!(&tokens[pos], Token::Number(t) if !t.contains('/') && !t.contains('.'));
    let fraction =
        end == next + 2 && matches!(&tokens[next + 1], Token::Number(t) if is_fraction(t));
    if is_dash && whole && fraction && next == pos + 1 && upper < 1.0 {
        return Some((lower + upper, end));
    }
    Some((lower, end))
}

/// A single number, or a whole number followed by a fraction.
fn quantity(tokens: &[Token], pos: usize) -> Option<(f64, usize)> {
    let Token::Number(first) = tokens.get(pos)? else {
        return None;
    };
    if !first.contains('/') {
        if let Some(Token::Number(second)) = tokens.get(pos + 1) {
            if is_fraction(second) {
                if let Some(value) = parse_amount(&format!("{} {}", first, second)) {
                    return Some((value, pos + 2));
                }
            }
        }
    }
    parse_amount(first).map(|value| (value, pos + 1))
}

/// Which pattern matched a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    CanGoods,
    LooseCanGoods,
    General,
}

/// Fields captured from a line by one of the patterns.
#[derive(Debug, Clone, PartialEq)]
pub struct LineMatch {
    pub pattern: Pattern,
    pub amount: f64,
    /// Canonical unit name; `None` when the line names no unit.
    pub unit: Option<String>,
    /// Product phrase as written, lowercased.
    pub product: String,
    /// Clauses with strict normalization applied to each word.
    pub notes: Vec<String>,
    /// Outer count of a can-goods line, e.g. `2 cans`.
    pub containers: Option<String>,
}

/// Match a line against the patterns in precedence order.
///
/// The product keeps its punctuation so it can be offered back to the user. Product
/// matching compares it folded.
pub fn match_line(line: &str, units: &UnitNicknames) -> Option<LineMatch> {
    let tokens = tokenize(line);
    let matched = can_goods(&tokens, units)
        .or_else(|| loose_can_goods(&tokens, units))
        .or_else(|| general(&tokens, units));
    match &matched {
        Some(m) => debug!("\"{}\" matched {:?}: {:?}", line, m.pattern, m),
        None => debug!("\"{}\" matched no pattern", line),
    }
    matched
}

fn can_goods(tokens: &[Token], units: &UnitNicknames) -> Option<LineMatch> {
    let (outer, pos) = amount(tokens, 0)?;
    if tokens.get(pos)? != &Token::Open {
        return None;
    }
    let (inner, pos) = amount(tokens, pos + 1)?;
    let unit = units.match_at(&texts(tokens), pos)?;
    if tokens.get(unit.end())? != &Token::Close {
        return None;
    }
    let container = container_at(tokens, unit.end() + 1)?;
    let (product, notes) = tail(tokens, unit.end() + 2)?;

    Some(LineMatch {
        pattern: Pattern::CanGoods,
        amount: inner,
        unit: Some(unit.canonical),
        product,
        notes,
        containers: Some(format!("{} {}", format_amount(outer), container)),
    })
}

fn loose_can_goods(tokens: &[Token], units: &UnitNicknames) -> Option<LineMatch> {
    let (first, pos) = amount(tokens, 0)?;
    let (outer, inner, pos) = match amount(tokens, pos) {
        Some((second, next)) => (Some(first), second, next),
        None => (None, first, pos),
    };
    let unit = units.match_at(&texts(tokens), pos)?;
    let container = container_at(tokens, unit.end())?;
    let (product, notes) = tail(tokens, unit.end() + 1)?;

    Some(LineMatch {
        pattern: Pattern::LooseCanGoods,
        amount: inner,
        unit: Some(unit.canonical),
        product,
        notes,
        containers: outer.map(|count| format!("{} {}", format_amount(count), container)),
    })
}

fn general(tokens: &[Token], units: &UnitNicknames) -> Option<LineMatch> {
    let (value, pos) = amount(tokens, 0)?;
    let unit = units.match_at(&texts(tokens), pos);
    let pos = unit.as_ref().map_or(pos, |u| u.end());
    let (product, notes) = tail(tokens, pos)?;

    Some(LineMatch {
        pattern: Pattern::General,
        amount: value,
        unit: unit.map(|u| u.canonical),
        product,
        notes,
        containers: None,
    })
}

fn container_at(tokens: &[Token], pos: usize) -> Option<&str> {
    match tokens.get(pos)? {
        Token::Word(word) if CONTAINERS.contains(&word.as_str()) => Some(word.as_str()),
        _ => None,
    }
}

/// Product words up to the first delimiter, then comma clauses and parenthesized asides.
fn tail(tokens: &[Token], pos: usize) -> Option<(String, Vec<String>)> {
    let rest = tokens.get(pos..)?;
    let product_len = rest
        .iter()
        .position(|t| !matches!(t, Token::Word(_) | Token::Number(_)))
        .unwrap_or(rest.len());
    let product = join(&rest[..product_len]);
    if rest[..product_len].iter().all(|t| strict(t.text()).is_empty()) {
        return None;
    }

    let mut notes = Vec::new();
    let mut clause: Vec<Token> = Vec::new();
    let mut in_aside = false;
    for token in &rest[product_len..] {
        match token {
            Token::Open | Token::Close | Token::Comma => {
                push_note(&mut notes, &mut clause);
                in_aside = *token == Token::Open;
            }
            Token::Dash if !in_aside => push_note(&mut notes, &mut clause),
            Token::Dash => {}
            word => clause.push(word.clone()),
        }
    }
    push_note(&mut notes, &mut clause);
    Some((product, notes))
}

fn push_note(notes: &mut Vec<String>, clause: &mut Vec<Token>) {
    let note = clause
        .drain(..)
        .map(|t| strict(t.text()))
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if !note.is_empty() {
        notes.push(note);
    }
}

fn strict(word: &str) -> String {
    normalize(word, Strictness::Strict).trim_matches('.').to_string()
}

fn join(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `2.0` prints as `2`, `1.5` as `1.5`.
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units() -> UnitNicknames {
        UnitNicknames::default()
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tokenize_structure() {
        let tokens = tokenize("2 (14.5 oz) cans tomatoes, drained");
        assert_eq!(
            tokens,
            vec![
                Token::Number("2".into()),
                Token::Open,
                Token::Number("14.5".into()),
                Token::Word("oz".into()),
                Token::Close,
                Token::Word("cans".into()),
                Token::Word("tomatoes".into()),
                Token::Comma,
                Token::Word("drained".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_glued_units_and_ranges() {
        assert_eq!(
            tokenize("8oz cream-cheese"),
            vec![
                Token::Number("8".into()),
                Token::Word("oz".into()),
                Token::Word("cream-cheese".into()),
            ]
        );
        assert_eq!(
            tokenize("2-3 Tbsp."),
            vec![
                Token::Number("2".into()),
                Token::Dash,
                Token::Number("3".into()),
                Token::Word("tbsp".into()),
            ]
        );
        assert_eq!(
            tokenize("14.5-ounce can"),
            vec![
                Token::Number("14.5".into()),
                Token::Word("ounce".into()),
                Token::Word("can".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_leading_decimal_point() {
        assert_eq!(
            tokenize(".5 cup milk"),
            vec![
                Token::Number(".5".into()),
                Token::Word("cup".into()),
                Token::Word("milk".into()),
            ]
        );
        assert_eq!(
            tokenize(".75oz saffron"),
            vec![
                Token::Number(".75".into()),
                Token::Word("oz".into()),
                Token::Word("saffron".into()),
            ]
        );
    }

    #[test]
    fn test_amount_forms() {
        let cases = [
            ("2 cups", 2.0),
            ("1.5 cups", 1.5),
            ("1/2 cup", 0.5),
            ("2 1/2 cups", 2.5),
            ("2 to 3 cups", 2.0),
            ("2-3 cups", 2.0),
            ("1 or 2 cups", 1.0),
            ("1-1/2 cups", 1.5),
            ("1½ cups", 1.5),
            (".5 cup", 0.5),
        ];
        for (text, expected) in cases {
            let tokens = tokenize(text);
            let (value, _) = amount(&tokens, 0).unwrap();
            assert!((value - expected).abs() < 1e-9, "{}", text);
        }
        assert!(amount(&tokenize("a pinch"), 0).is_none());
        assert!(amount(&tokenize("1/0 cup"), 0).is_none());
    }

    #[test]
    fn test_general_pattern() {
        let m = match_line("2 1/2 cups all-purpose flour, sifted", &units()).unwrap();
        assert_eq!(m.pattern, Pattern::General);
        assert_eq!(m.amount, 2.5);
        assert_eq!(m.unit.as_deref(), Some("cup"));
        assert_eq!(m.product, "all-purpose flour");
        assert_eq!(m.notes, words(&["sifted"]));
    }

    #[test]
    fn test_notes_are_strictly_normalized() {
        let m = match_line("1 cup pecans (roughly-chopped*), divided!", &units()).unwrap();
        assert_eq!(m.product, "pecans");
        assert_eq!(m.notes, words(&["roughlychopped", "divided"]));

        assert!(match_line("2 cups &", &units()).is_none());
    }

    #[test]
    fn test_general_without_unit() {
        let m = match_line("3 garlic cloves", &units()).unwrap();
        assert_eq!(m.pattern, Pattern::General);
        assert_eq!(m.amount, 3.0);
        assert_eq!(m.unit, None);
        assert_eq!(m.product, "garlic cloves");
    }

    #[test]
    fn test_notes_from_commas_and_asides() {
        let line = "1 cup walnuts (optional), toasted, chopped ($2.49)";
        let m = match_line(line, &units()).unwrap();
        assert_eq!(m.product, "walnuts");
        assert_eq!(m.notes, words(&["optional", "toasted", "chopped"]));
    }

    #[test]
    fn test_can_goods_takes_inner_measure() {
        let m = match_line("2 (14.5 oz) cans diced tomatoes", &units()).unwrap();
        assert_eq!(m.pattern, Pattern::CanGoods);
        assert_eq!(m.amount, 14.5);
        assert_eq!(m.unit.as_deref(), Some("ounce"));
        assert_eq!(m.product, "diced tomatoes");
        assert_eq!(m.containers.as_deref(), Some("2 cans"));
    }

    #[test]
    fn test_loose_can_goods() {
        let m = match_line("2 14.5 oz cans black beans, rinsed", &units()).unwrap();
        assert_eq!(m.pattern, Pattern::LooseCanGoods);
        assert_eq!(m.amount, 14.5);
        assert_eq!(m.product, "black beans");
        assert_eq!(m.containers.as_deref(), Some("2 cans"));
        assert_eq!(m.notes, words(&["rinsed"]));

        let m = match_line("1 8oz package cream cheese", &units()).unwrap();
        assert_eq!(m.pattern, Pattern::LooseCanGoods);
        assert_eq!(m.amount, 8.0);

        let m = match_line("15 oz can chickpeas", &units()).unwrap();
        assert_eq!(m.pattern, Pattern::LooseCanGoods);
        assert_eq!(m.amount, 15.0);
        assert_eq!(m.containers, None);
    }

    #[test]
    fn test_no_match() {
        assert!(match_line("a pinch of magic", &units()).is_none());
        assert!(match_line("salt to taste", &units()).is_none());
        assert!(match_line("2 cups", &units()).is_none());
        assert!(match_line("", &units()).is_none());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(2.0), "2");
        assert_eq!(format_amount(14.5), "14.5");
    }
}
