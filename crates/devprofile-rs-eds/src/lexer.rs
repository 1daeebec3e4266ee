// crates/devprofile-rs-eds/src/lexer.rs

//! Tokenizer for the section-text grammar.
//!
//! A document is a sequence of `[Section]` headers, each followed by
//! `Key = value;` entries. An entry runs until the first `;` outside a
//! quoted string, so it may span several lines. `$` starts a comment that
//! runs to the end of the line. A value is a list of comma-separated fields;
//! adjacent quoted strings inside one field are concatenated, and a doubled
//! quote inside a string stands for a literal quote.

use devprofile_rs::error::ParseError;

/// One comma-separated field of an entry value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Empty,
    /// A quoted string, unescaped and concatenated.
    Quoted(String),
    Bare(String),
}

static EMPTY_FIELD: Field = Field::Empty;

impl Field {
    /// The field content without quotes.
    pub fn text(&self) -> &str {
        match self {
            Field::Empty => "",
            Field::Quoted(s) | Field::Bare(s) => s,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Field::Empty)
    }

    /// The field as it is written back.
    pub fn to_source(&self) -> String {
        match self {
            Field::Empty => String::new(),
            Field::Quoted(s) => quote(s),
            Field::Bare(s) => s.clone(),
        }
    }
}

/// Writes `s` as a quoted string, doubling embedded quotes.
pub fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    /// 1-based line of the key.
    pub line: usize,
    /// Value text without comments; whitespace runs outside strings are
    /// collapsed to one space.
    pub raw: String,
    pub fields: Vec<Field>,
}

impl Entry {
    /// Field `index`, or `Field::Empty` past the end.
    pub fn field(&self, index: usize) -> &Field {
        self.fields.get(index).unwrap_or(&EMPTY_FIELD)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub line: usize,
    pub entries: Vec<Entry>,
    /// Source text between this header and the next one, trimmed.
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub sections: Vec<Section>,
}

/// Tokenizes a decoded document.
///
/// `max_elements` bounds the number of sections plus entries.
pub fn tokenize(input: &str, max_elements: u64) -> Result<Document, ParseError> {
    Lexer::new(input).run(max_elements)
}

fn at_line(line: usize) -> String {
    format!("line {}", line)
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    /// Skips to (not past) the end of the current line.
    fn skip_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '$' {
                self.skip_comment();
            } else if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end]
            .iter()
            .collect::<String>()
            .trim()
            .to_string()
    }

    fn run(mut self, max_elements: u64) -> Result<Document, ParseError> {
        let mut document = Document::default();
        let mut body_start = 0;
        let mut count: u64 = 0;

        loop {
            self.skip_whitespace_and_comments();
            let Some(ch) = self.peek() else {
                break;
            };
            count += 1;
            if count > max_elements {
                return Err(ParseError::ResourceLimitExceeded {
                    limit: "max_elements",
                    max: max_elements,
                    found: count,
                });
            }

            if ch == '[' {
                let header_start = self.pos;
                if let Some(last) = document.sections.last_mut() {
                    last.body = self.slice(body_start, header_start);
                }
                let (name, line) = self.read_header()?;
                body_start = self.pos;
                document.sections.push(Section {
                    name,
                    line,
                    entries: Vec::new(),
                    body: String::new(),
                });
            } else {
                let entry = self.read_entry()?;
                match document.sections.last_mut() {
                    Some(section) => section.entries.push(entry),
                    None => {
                        return Err(ParseError::syntax(
                            at_line(entry.line),
                            format!("entry '{}' appears before the first section", entry.key),
                        ));
                    }
                }
            }
        }

        let end = self.pos;
        if let Some(last) = document.sections.last_mut() {
            last.body = self.slice(body_start, end);
        }
        Ok(document)
    }

    fn read_header(&mut self) -> Result<(String, usize), ParseError> {
        let line = self.line;
        self.advance();
        let mut name = String::new();
        loop {
            match self.advance() {
                Some(']') => break,
                Some('\n') | None => {
                    return Err(ParseError::syntax(at_line(line), "unterminated section header"));
                }
                Some(ch) => name.push(ch),
            }
        }
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ParseError::syntax(at_line(line), "empty section name"));
        }

        // Only whitespace or a comment may follow on the header line.
        while let Some(ch) = self.peek() {
            match ch {
                '\n' => break,
                '$' => {
                    self.skip_comment();
                    break;
                }
                c if c.is_whitespace() => {
                    self.advance();
                }
                c => {
                    return Err(ParseError::syntax(
                        at_line(line),
                        format!("unexpected '{}' after section header", c),
                    ));
                }
            }
        }
        Ok((name, line))
    }

    fn read_entry(&mut self) -> Result<Entry, ParseError> {
        let line = self.line;
        let mut key = String::new();
        loop {
            match self.advance() {
                Some('=') => break,
                Some(ch) if matches!(ch, '\n' | ';' | '"' | '$') => {
                    return Err(ParseError::syntax(
                        at_line(line),
                        format!("expected '=' after key '{}'", key.trim()),
                    ));
                }
                Some(ch) => key.push(ch),
                None => {
                    return Err(ParseError::syntax(
                        at_line(line),
                        format!("unexpected end of input after key '{}'", key.trim()),
                    ));
                }
            }
        }
        let key = key.trim().to_string();
        if key.is_empty() {
            return Err(ParseError::syntax(at_line(line), "entry without a key"));
        }

        let mut raw = String::new();
        let mut pending_space = false;
        loop {
            let Some(ch) = self.advance() else {
                return Err(ParseError::syntax(
                    at_line(line),
                    format!("entry '{}' is not terminated by ';'", key),
                ));
            };
            match ch {
                ';' => break,
                '$' => {
                    self.skip_comment();
                    pending_space = true;
                }
                c if c.is_whitespace() => pending_space = true,
                c => {
                    if pending_space && !raw.is_empty() {
                        raw.push(' ');
                    }
                    pending_space = false;
                    raw.push(c);
                    if c == '"' {
                        self.read_quoted(&mut raw, line)?;
                    }
                }
            }
        }

        let fields = split_fields(&raw).map_err(|message| {
            ParseError::syntax(at_line(line), format!("entry '{}': {}", key, message))
        })?;
        Ok(Entry {
            key,
            line,
            raw,
            fields,
        })
    }

    /// Copies a quoted string (opening quote already consumed) into `raw`.
    fn read_quoted(&mut self, raw: &mut String, line: usize) -> Result<(), ParseError> {
        loop {
            match self.advance() {
                Some('"') => {
                    raw.push('"');
                    if self.peek() == Some('"') {
                        self.advance();
                        raw.push('"');
                        continue;
                    }
                    return Ok(());
                }
                Some('\n') | None => {
                    return Err(ParseError::syntax(at_line(line), "unterminated string"));
                }
                Some(ch) => raw.push(ch),
            }
        }
    }
}

// --- Field Splitting ---

/// Splits an entry value at commas outside strings and braces.
pub fn split_fields(raw: &str) -> Result<Vec<Field>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut braces = 0usize;

    for ch in raw.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            '{' if !in_quotes => {
                braces += 1;
                current.push(ch);
            }
            '}' if !in_quotes => {
                braces = braces.saturating_sub(1);
                current.push(ch);
            }
            ',' if !in_quotes && braces == 0 => {
                fields.push(classify(&current)?);
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if in_quotes {
        return Err("unterminated string".into());
    }
    fields.push(classify(&current)?);
    Ok(fields)
}

fn classify(piece: &str) -> Result<Field, String> {
    let piece = piece.trim();
    if piece.is_empty() {
        return Ok(Field::Empty);
    }
    if !piece.starts_with('"') {
        if quote_outside_braces(piece) {
            return Err(format!("unexpected quote in '{}'", piece));
        }
        return Ok(Field::Bare(piece.to_string()));
    }

    let mut value = String::new();
    let mut chars = piece.chars().peekable();
    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        match chars.next() {
            None => break,
            Some('"') => {}
            Some(c) => return Err(format!("unexpected '{}' after quoted string", c)),
        }
        loop {
            match chars.next() {
                Some('"') if chars.peek() == Some(&'"') => {
                    chars.next();
                    value.push('"');
                }
                Some('"') => break,
                Some(c) => value.push(c),
                None => return Err("unterminated string".into()),
            }
        }
    }
    Ok(Field::Quoted(value))
}

/// Whether a bare field has a quote that is not part of a `{...}` group.
///
/// Braced groups keep their strings verbatim: `{"tx", 8}` is one bare field.
fn quote_outside_braces(piece: &str) -> bool {
    let mut braces = 0usize;
    let mut in_quotes = false;
    for ch in piece.chars() {
        match ch {
            '"' if braces == 0 => return true,
            '"' => in_quotes = !in_quotes,
            '{' if !in_quotes => braces += 1,
            '}' if !in_quotes => braces = braces.saturating_sub(1),
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Document {
        tokenize(input, 1_000).unwrap()
    }

    #[test]
    fn test_sections_and_entries() {
        let doc = lex("[File]\n  Revision = 1.1;\n\n[Device]\nVendCode = 42;\nVendName = \"ACME\";\n");
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].name, "File");
        assert_eq!(doc.sections[1].line, 4);
        let vendor = &doc.sections[1].entries[1];
        assert_eq!(vendor.key, "VendName");
        assert_eq!(vendor.fields, vec![Field::Quoted("ACME".into())]);
        assert_eq!(vendor.raw, "\"ACME\"");
    }

    #[test]
    fn test_multi_line_entry_with_comments() {
        let doc = lex("[Params]\nParam1 =\n  0,   $ link size\n  \"a, b\", $ path\n  ,0x10;\n");
        let entry = &doc.sections[0].entries[0];
        assert_eq!(entry.line, 2);
        assert_eq!(
            entry.fields,
            vec![
                Field::Bare("0".into()),
                Field::Quoted("a, b".into()),
                Field::Empty,
                Field::Bare("0x10".into()),
            ]
        );
        assert_eq!(entry.raw, "0, \"a, b\", ,0x10");
    }

    #[test]
    fn test_quoted_concatenation_and_escapes() {
        let doc = lex("[Device]\nProdName = \"Analog \"\n   \"Module \"\"X\"\"\";\n");
        assert_eq!(
            doc.sections[0].entries[0].fields,
            vec![Field::Quoted("Analog Module \"X\"".into())]
        );
    }

    #[test]
    fn test_semicolon_and_dollar_inside_strings() {
        let doc = lex("[S]\nK = \"a;b $c\";\n");
        assert_eq!(doc.sections[0].entries[0].field(0).text(), "a;b $c");
        assert!(doc.sections[0].entries[0].field(5).is_empty());
    }

    #[test]
    fn test_body_is_trimmed_source_text() {
        let doc = lex("$ header\n[Opaque]   $ note\n  A = 1;\n  $ inner\n  B = {1, 2};\n\n[Next]\n");
        assert_eq!(doc.sections[0].body, "A = 1;\n  $ inner\n  B = {1, 2};");
        assert_eq!(
            doc.sections[0].entries[1].fields,
            vec![Field::Bare("{1, 2}".into())]
        );
        assert_eq!(doc.sections[1].body, "");
    }

    #[test]
    fn test_quoted_strings_inside_braces() {
        let doc = lex("[Capacity]\nTSpec1 = {\"tx, rx\", 8};\nTSpec2 = 1, {\"}\", 2}, \"x\";\n");
        let entries = &doc.sections[0].entries;
        assert_eq!(entries[0].fields, vec![Field::Bare("{\"tx, rx\", 8}".into())]);
        assert_eq!(
            entries[1].fields,
            vec![
                Field::Bare("1".into()),
                Field::Bare("{\"}\", 2}".into()),
                Field::Quoted("x".into()),
            ]
        );
        assert_eq!(doc.sections[0].body, "TSpec1 = {\"tx, rx\", 8};\nTSpec2 = 1, {\"}\", 2}, \"x\";");
    }

    #[test]
    fn test_quote_after_braced_group_rejected() {
        assert!(tokenize("[S]\nK = {1}\"a\";\n", 100).is_err());
        assert!(tokenize("[S]\nK = 1\"a\";\n", 100).is_err());
    }

    #[test]
    fn test_unterminated_entry() {
        let err = tokenize("[File]\nRevision = 1.1\n", 100).unwrap_err();
        match err {
            ParseError::Syntax { location, message } => {
                assert_eq!(location, "line 2");
                assert!(message.contains("Revision"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_entry_before_first_section() {
        assert!(matches!(
            tokenize("Revision = 1;\n[File]\n", 100),
            Err(ParseError::Syntax { .. })
        ));
    }

    #[test]
    fn test_bad_header_and_strings() {
        assert!(tokenize("[File\n", 100).is_err());
        assert!(tokenize("[File] junk\n", 100).is_err());
        assert!(tokenize("[S]\nK = \"open;\n", 100).is_err());
        assert!(tokenize("[S]\nK = \"a\"b;\n", 100).is_err());
    }

    #[test]
    fn test_element_limit() {
        let err = tokenize("[A]\nX = 1;\nY = 2;\n", 2).unwrap_err();
        assert!(matches!(
            err,
            ParseError::ResourceLimitExceeded {
                limit: "max_elements",
                max: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn test_split_fields_round_trips_through_to_source() {
        let fields = split_fields("0,\"x \"\"y\"\"\",,Param1").unwrap();
        let rejoined: Vec<String> = fields.iter().map(Field::to_source).collect();
        assert_eq!(rejoined.join(","), "0,\"x \"\"y\"\"\",,Param1");
    }
}
