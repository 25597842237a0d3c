//! Header card parsing and formatting.

use std::fmt::Write as _;

use super::{FitsError, BLOCK_SIZE, CARDS_PER_BLOCK, CARD_SIZE};

/// A header card value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// FITS logical, `T` or `F` at the fixed column.
    Logical(bool),
    /// Integer value.
    Integer(i64),
    /// Floating-point value.
    Float(f64),
    /// Quoted string value.
    Str(String),
}

impl Value {
    /// Coerce integers and floats to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The integer value, if this is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// The string value, trailing blanks removed, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.trim_end()),
            _ => None,
        }
    }
}

/// One 80-byte header record, parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Keyword, uppercase. May exceed 8 characters (HIERARCH convention).
    pub keyword: String,
    /// Value, absent for commentary cards.
    pub value: Option<Value>,
    /// Comment text: the `/`-comment for value cards, the free text for
    /// COMMENT/HISTORY cards.
    pub comment: Option<String>,
}

impl Card {
    /// A value card.
    pub fn new(keyword: &str, value: Value) -> Self {
        Card {
            keyword: keyword.to_ascii_uppercase(),
            value: Some(value),
            comment: None,
        }
    }

    /// A COMMENT card.
    pub fn comment(text: &str) -> Self {
        Card {
            keyword: "COMMENT".into(),
            value: None,
            comment: Some(text.to_string()),
        }
    }

    fn is_commentary(&self) -> bool {
        self.keyword == "COMMENT" || self.keyword == "HISTORY" || self.keyword.is_empty()
    }
}

/// An ordered collection of header cards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    cards: Vec<Card>,
}

impl Header {
    /// An empty header.
    pub fn new() -> Self {
        Header::default()
    }

    /// All cards in order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Append a card as-is.
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Set a keyword's value, replacing an existing card or appending.
    pub fn set(&mut self, keyword: &str, value: Value) {
        let keyword = keyword.to_ascii_uppercase();
        if let Some(card) = self.cards.iter_mut().find(|c| c.keyword == keyword) {
            card.value = Some(value);
        } else {
            self.cards.push(Card {
                keyword,
                value: Some(value),
                comment: None,
            });
        }
    }

    /// Append a COMMENT line, word-wrapping text too long for one card
    /// across several consecutive COMMENT cards.
    pub fn push_comment(&mut self, text: &str) {
        const WIDTH: usize = CARD_SIZE - 8;
        if text.len() <= WIDTH {
            self.cards.push(Card::comment(text));
            return;
        }
        let mut line = String::new();
        for word in text.split_whitespace() {
            if !line.is_empty() && line.len() + 1 + word.len() > WIDTH {
                self.cards.push(Card::comment(&line));
                line.clear();
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        if !line.is_empty() {
            self.cards.push(Card::comment(&line));
        }
    }

    /// Remove every card with the given keyword.
    pub fn remove(&mut self, keyword: &str) {
        let keyword = keyword.to_ascii_uppercase();
        self.cards.retain(|c| c.keyword != keyword);
    }

    /// Look up a keyword's value (case-insensitive).
    pub fn get(&self, keyword: &str) -> Option<&Value> {
        let keyword = keyword.to_ascii_uppercase();
        self.cards
            .iter()
            .find(|c| c.keyword == keyword)
            .and_then(|c| c.value.as_ref())
    }

    /// A numeric keyword coerced to f64.
    pub fn get_f64(&self, keyword: &str) -> Result<f64, FitsError> {
        self.get(keyword)
            .and_then(Value::as_f64)
            .ok_or_else(|| FitsError::MissingKeyword(keyword.to_string()))
    }

    /// An integer keyword.
    pub fn get_i64(&self, keyword: &str) -> Result<i64, FitsError> {
        self.get(keyword)
            .and_then(Value::as_i64)
            .ok_or_else(|| FitsError::MissingKeyword(keyword.to_string()))
    }

    /// A string keyword, trailing blanks trimmed.
    pub fn get_str(&self, keyword: &str) -> Result<&str, FitsError> {
        self.get(keyword)
            .and_then(Value::as_str)
            .ok_or_else(|| FitsError::MissingKeyword(keyword.to_string()))
    }

    /// All COMMENT lines in order.
    pub fn comments(&self) -> Vec<String> {
        self.cards
            .iter()
            .filter(|c| c.keyword == "COMMENT")
            .map(|c| c.comment.clone().unwrap_or_default())
            .collect()
    }
}

// ── Parsing ──

/// Parse header blocks until the END card; returns the cards (END excluded)
/// and the number of bytes consumed (a multiple of BLOCK_SIZE).
pub fn parse_header(data: &[u8]) -> Result<(Header, usize), FitsError> {
    if data.len() < BLOCK_SIZE {
        return Err(FitsError::UnexpectedEof);
    }
    let mut cards = Vec::new();
    let num_blocks = data.len() / BLOCK_SIZE;
    for block_idx in 0..num_blocks {
        for card_idx in 0..CARDS_PER_BLOCK {
            let start = block_idx * BLOCK_SIZE + card_idx * CARD_SIZE;
            let bytes = &data[start..start + CARD_SIZE];
            if &bytes[..8] == b"END     " {
                return Ok((Header { cards }, (block_idx + 1) * BLOCK_SIZE));
            }
            if let Some(card) = parse_card(bytes)? {
                cards.push(card);
            }
        }
    }
    Err(FitsError::UnexpectedEof)
}

/// Parse one card image. Blank cards parse to `None`.
fn parse_card(bytes: &[u8]) -> Result<Option<Card>, FitsError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| FitsError::Malformed("non-ASCII header card".into()))?;
    let keyword_field = text[..8].trim_end();

    if keyword_field.is_empty() {
        return Ok(None);
    }

    if keyword_field == "COMMENT" || keyword_field == "HISTORY" {
        let body = text[8..].trim_end();
        return Ok(Some(Card {
            keyword: keyword_field.to_string(),
            value: None,
            comment: if body.is_empty() {
                Some(String::new())
            } else {
                Some(body.to_string())
            },
        }));
    }

    if keyword_field == "HIERARCH" {
        // Free format: HIERARCH LONG_KEYWORD = value [/ comment]
        let rest = &text[9..];
        let eq = rest
            .find('=')
            .ok_or_else(|| FitsError::Malformed("HIERARCH card without =".into()))?;
        let keyword = rest[..eq].trim().to_ascii_uppercase();
        let (value, comment) = parse_value(&rest[eq + 1..])?;
        return Ok(Some(Card {
            keyword,
            value,
            comment,
        }));
    }

    if &bytes[8..10] == b"= " {
        let (value, comment) = parse_value(&text[10..])?;
        Ok(Some(Card {
            keyword: keyword_field.to_ascii_uppercase(),
            value,
            comment,
        }))
    } else {
        // Keyword without value indicator: treat the rest as commentary.
        let body = text[8..].trim_end();
        Ok(Some(Card {
            keyword: keyword_field.to_ascii_uppercase(),
            value: None,
            comment: if body.is_empty() {
                None
            } else {
                Some(body.to_string())
            },
        }))
    }
}

/// Parse a value field, returning the value and any `/` comment.
fn parse_value(field: &str) -> Result<(Option<Value>, Option<String>), FitsError> {
    let trimmed = field.trim_start();
    if trimmed.is_empty() {
        return Ok((None, None));
    }

    if let Some(rest) = trimmed.strip_prefix('\'') {
        // Quoted string; '' escapes a quote.
        let mut out = String::new();
        let mut chars = rest.char_indices();
        let mut end = None;
        while let Some((i, c)) = chars.next() {
            if c == '\'' {
                if rest[i + 1..].starts_with('\'') {
                    out.push('\'');
                    chars.next();
                } else {
                    end = Some(i + 1);
                    break;
                }
            } else {
                out.push(c);
            }
        }
        let end = end.ok_or_else(|| FitsError::Malformed("unterminated string value".into()))?;
        let comment = extract_comment(&rest[end..]);
        return Ok((Some(Value::Str(out.trim_end().to_string())), comment));
    }

    let (body, comment) = match trimmed.find('/') {
        Some(i) => (
            trimmed[..i].trim(),
            extract_comment(&trimmed[i..]),
        ),
        None => (trimmed.trim(), None),
    };

    if body.is_empty() {
        return Ok((None, comment));
    }
    if body == "T" {
        return Ok((Some(Value::Logical(true)), comment));
    }
    if body == "F" {
        return Ok((Some(Value::Logical(false)), comment));
    }
    if let Ok(n) = body.parse::<i64>() {
        return Ok((Some(Value::Integer(n)), comment));
    }
    // Fortran-style D exponents appear in files written by other tools.
    let normalized = body.replace(['D', 'd'], "E");
    if let Ok(f) = normalized.parse::<f64>() {
        return Ok((Some(Value::Float(f)), comment));
    }
    Err(FitsError::Malformed(format!("unparsable value: {body}")))
}

fn extract_comment(rest: &str) -> Option<String> {
    let rest = rest.trim_start();
    let body = rest.strip_prefix('/')?.trim();
    if body.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}

// ── Formatting ──

/// Format one card as an 80-byte image. Values are truncated to fit.
pub fn format_card(card: &Card) -> [u8; CARD_SIZE] {
    let mut text = String::with_capacity(CARD_SIZE);

    if card.is_commentary() {
        let _ = write!(
            text,
            "{:<8}{}",
            card.keyword,
            card.comment.as_deref().unwrap_or("")
        );
    } else if card.keyword.len() > 8 {
        let _ = write!(text, "HIERARCH {} = ", card.keyword);
        if let Some(v) = &card.value {
            text.push_str(&value_text(v));
        }
        append_comment(&mut text, card.comment.as_deref());
    } else if let Some(v) = &card.value {
        let _ = write!(text, "{:<8}= ", card.keyword);
        match v {
            Value::Str(_) => {
                text.push_str(&value_text(v));
                if text.len() < 30 {
                    text.push_str(&" ".repeat(30 - text.len()));
                }
            }
            _ => {
                // Fixed format: value right-justified in columns 11-30.
                let _ = write!(text, "{:>20}", value_text(v));
            }
        }
        append_comment(&mut text, card.comment.as_deref());
    } else {
        let _ = write!(text, "{:<8}", card.keyword);
    }

    let mut buf = [b' '; CARD_SIZE];
    for (i, b) in text.bytes().take(CARD_SIZE).enumerate() {
        buf[i] = b;
    }
    buf
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Logical(true) => "T".into(),
        Value::Logical(false) => "F".into(),
        Value::Integer(n) => n.to_string(),
        Value::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{f:.1}")
            } else {
                format!("{f:.16E}")
            }
        }
        Value::Str(s) => {
            let mut escaped = s.replace('\'', "''");
            // Keep the closing quote inside the 80-byte card.
            escaped.truncate(66);
            format!("'{escaped:<8}'")
        }
    }
}

fn append_comment(text: &mut String, comment: Option<&str>) {
    if let Some(c) = comment {
        if text.len() + 3 < CARD_SIZE {
            let _ = write!(text, " / {c}");
        }
    }
}

/// Serialize cards plus the END card into whole header blocks.
pub fn serialize_header(cards: &[Card]) -> Vec<u8> {
    let total_cards = cards.len() + 1;
    let blocks = total_cards.div_ceil(CARDS_PER_BLOCK);
    let mut buf = vec![b' '; blocks * BLOCK_SIZE];
    for (i, card) in cards.iter().enumerate() {
        buf[i * CARD_SIZE..(i + 1) * CARD_SIZE].copy_from_slice(&format_card(card));
    }
    let end_offset = cards.len() * CARD_SIZE;
    buf[end_offset..end_offset + 3].copy_from_slice(b"END");
    buf
}
