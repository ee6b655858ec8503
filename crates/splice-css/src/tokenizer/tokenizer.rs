use super::error::{LexError, LexErrorKind, Position};
use super::token::{Token, TokenKind};

/// [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
///
/// Streaming CSS tokenizer following CSS Syntax Module Level 3.
///
/// Unlike a parser front end, this tokenizer is lossless: comments are
/// returned as tokens and every token records the exact text it covers, so
/// concatenating all literals reproduces the input.
pub struct CSSTokenizer {
    /// The input string being tokenized
    input: Vec<char>,
    /// Current position in the input
    position: usize,
}

impl CSSTokenizer {
    /// Create a new CSS tokenizer with the given input.
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into().chars().collect(),
            position: 0,
        }
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    ///
    /// Consume and return the next token. Once the input is exhausted every
    /// further call returns an EOF token.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] for unterminated comments and strings, and for
    /// newlines inside strings.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let kind = self.consume_token(start)?;
        let literal = self.input[start..self.position].iter().collect();
        Ok(Token {
            kind,
            literal,
            offset: start,
        })
    }

    /// Consume tokens until one that is not whitespace or a comment.
    ///
    /// # Errors
    ///
    /// Propagates the first [`LexError`] encountered.
    pub fn next_significant(&mut self) -> Result<Token, LexError> {
        loop {
            let token = self.next_token()?;
            if !token.kind.is_trivia() {
                return Ok(token);
            }
        }
    }

    /// Translate a char offset into a line/column position.
    #[must_use]
    pub fn position_of(&self, offset: usize) -> Position {
        let end = offset.min(self.input.len());
        let mut line = 1;
        let mut line_start = 0;
        for (i, c) in self.input[..end].iter().enumerate() {
            if *c == '\n' {
                line += 1;
                line_start = i + 1;
            }
        }
        Position {
            line,
            column: end - line_start + 1,
        }
    }

    fn error(&self, kind: LexErrorKind, offset: usize) -> LexError {
        LexError {
            kind,
            position: self.position_of(offset),
        }
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn consume_token(&mut self, start: usize) -> Result<TokenKind, LexError> {
        // Comments are tokens here, not skipped.
        if self.peek() == Some('/') && self.peek_at(1) == Some('*') {
            return self.consume_comment(start);
        }

        // "Consume the next input code point."
        let Some(c) = self.consume() else {
            return Ok(TokenKind::EOF);
        };

        let kind = match c {
            // "whitespace"
            // "Consume as much whitespace as possible. Return a <whitespace-token>."
            c if is_whitespace(c) => {
                self.consume_whitespace();
                TokenKind::Whitespace
            }

            // "U+0022 QUOTATION MARK (")" / "U+0027 APOSTROPHE (')"
            // "Consume a string token and return it."
            '"' | '\'' => return self.consume_string_token(c, start),

            // "U+0023 NUMBER SIGN (#)"
            '#' => {
                // "If the next input code point is an ident code point or the next
                // two input code points are a valid escape..."
                if self.peek().is_some_and(is_ident_code_point)
                    || is_valid_escape(self.peek(), self.peek_at(1))
                {
                    let _ = self.consume_ident_sequence();
                    TokenKind::Hash
                } else {
                    TokenKind::Delim('#')
                }
            }

            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,

            // "U+002B PLUS SIGN (+)" / "U+002E FULL STOP (.)"
            '+' | '.' => {
                // "If the input stream starts with a number..."
                if self.would_start_number_with(Some(c)) {
                    self.reconsume();
                    self.consume_numeric_token()
                } else {
                    TokenKind::Delim(c)
                }
            }

            // "U+002D HYPHEN-MINUS (-)"
            '-' => {
                if self.would_start_number_with(Some('-')) {
                    self.reconsume();
                    self.consume_numeric_token()
                }
                // "Otherwise, if the next 2 input code points are U+002D U+003E (->)..."
                else if self.peek() == Some('-') && self.peek_at(1) == Some('>') {
                    self.advance(2);
                    TokenKind::CDC
                }
                // "Otherwise, if the input stream starts with an ident sequence..."
                else if starts_ident_sequence(Some('-'), self.peek(), self.peek_at(1)) {
                    self.reconsume();
                    self.consume_ident_like_token()
                } else {
                    TokenKind::Delim('-')
                }
            }

            // "U+003C LESS-THAN SIGN (<)"
            '<' => {
                // "If the next 3 input code points are U+0021 U+002D U+002D (!--)..."
                if self.peek() == Some('!')
                    && self.peek_at(1) == Some('-')
                    && self.peek_at(2) == Some('-')
                {
                    self.advance(3);
                    TokenKind::CDO
                } else {
                    TokenKind::Delim('<')
                }
            }

            // "U+0040 COMMERCIAL AT (@)"
            '@' => {
                // "If the next 3 input code points would start an ident sequence..."
                if self.would_start_ident_sequence() {
                    TokenKind::AtKeyword(self.consume_ident_sequence())
                } else {
                    TokenKind::Delim('@')
                }
            }

            // "U+005C REVERSE SOLIDUS (\)"
            '\\' => {
                if is_valid_escape(Some('\\'), self.peek()) {
                    self.reconsume();
                    self.consume_ident_like_token()
                } else {
                    // "This is a parse error." Passed through as a delimiter.
                    TokenKind::Delim('\\')
                }
            }

            // "digit"
            c if c.is_ascii_digit() => {
                self.reconsume();
                self.consume_numeric_token()
            }

            // "ident-start code point"
            c if is_ident_start_code_point(c) => {
                self.reconsume();
                self.consume_ident_like_token()
            }

            // "anything else"
            c => TokenKind::Delim(c),
        };

        Ok(kind)
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    ///
    /// Consumes a single comment, including its `/*` and `*/`.
    fn consume_comment(&mut self, start: usize) -> Result<TokenKind, LexError> {
        self.advance(2); // /*
        loop {
            match self.consume() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance(1);
                    return Ok(TokenKind::Comment);
                }
                Some(_) => {}
                None => return Err(self.error(LexErrorKind::UnterminatedComment, start)),
            }
        }
    }

    /// Consume whitespace characters.
    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.advance(1);
        }
    }

    /// [§ 4.3.4 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string_token(
        &mut self,
        ending_code_point: char,
        start: usize,
    ) -> Result<TokenKind, LexError> {
        loop {
            match self.consume() {
                Some(c) if c == ending_code_point => return Ok(TokenKind::String),
                None => return Err(self.error(LexErrorKind::UnterminatedString, start)),
                Some('\n' | '\r' | '\x0C') => {
                    let offset = self.position - 1;
                    return Err(self.error(LexErrorKind::NewlineInString, offset));
                }
                // "U+005C REVERSE SOLIDUS (\)"
                Some('\\') => match self.peek() {
                    // "If the next input code point is EOF, do nothing."
                    None => {}
                    // "Otherwise, if the next input code point is a newline, consume it."
                    Some('\r') => {
                        self.advance(1);
                        if self.peek() == Some('\n') {
                            self.advance(1);
                        }
                    }
                    Some('\n' | '\x0C') => self.advance(1),
                    Some(_) => {
                        let _ = self.consume_escaped_code_point();
                    }
                },
                Some(_) => {}
            }
        }
    }

    /// [§ 4.3.3 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric_token(&mut self) -> TokenKind {
        self.consume_number();

        // "If the next 3 input code points would start an ident sequence..."
        if self.would_start_ident_sequence() {
            let _ = self.consume_ident_sequence();
            TokenKind::Dimension
        }
        // "Otherwise, if the next input code point is U+0025 PERCENTAGE SIGN (%)..."
        else if self.peek() == Some('%') {
            self.advance(1);
            TokenKind::Percentage
        } else {
            TokenKind::Number
        }
    }

    /// [§ 4.3.4 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like_token(&mut self) -> TokenKind {
        let string = self.consume_ident_sequence();

        if self.peek() != Some('(') {
            return TokenKind::Ident;
        }
        self.advance(1); // (

        if !string.eq_ignore_ascii_case("url") {
            return TokenKind::Function;
        }

        // "While the next two input code points are whitespace, consume the next input code point."
        // Only look past the whitespace here; it belongs to the url token if unquoted.
        let mut lookahead = 0;
        while self.peek_at(lookahead).is_some_and(is_whitespace) {
            lookahead += 1;
        }
        match self.peek_at(lookahead) {
            // Quoted url: `url(` is a function, the string is its own token.
            Some('"' | '\'') => TokenKind::Function,
            _ => self.consume_url_token(),
        }
    }

    /// [§ 4.3.6 Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token)
    ///
    /// A malformed url is returned as [`TokenKind::BadUrl`] rather than an error,
    /// so stylesheets the transformer does not interpret still pass through.
    fn consume_url_token(&mut self) -> TokenKind {
        self.consume_whitespace();

        loop {
            match self.consume() {
                // "EOF: This is a parse error. Return the <url-token>."
                Some(')') | None => return TokenKind::Url,
                Some(c) if is_whitespace(c) => {
                    self.consume_whitespace();
                    return match self.peek() {
                        Some(')') => {
                            self.advance(1);
                            TokenKind::Url
                        }
                        None => TokenKind::Url,
                        Some(_) => self.consume_bad_url_remnants(),
                    };
                }
                Some('"' | '\'' | '(') => return self.consume_bad_url_remnants(),
                Some('\\') => {
                    if is_valid_escape(Some('\\'), self.peek()) {
                        let _ = self.consume_escaped_code_point();
                    } else {
                        return self.consume_bad_url_remnants();
                    }
                }
                Some(_) => {}
            }
        }
    }

    /// [§ 4.3.14 Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    ///
    /// Stops after the first `)`, or before a `{`, `}` or `;` so the block
    /// structure around a bad url is never swallowed.
    fn consume_bad_url_remnants(&mut self) -> TokenKind {
        loop {
            match self.peek() {
                None | Some('{' | '}' | ';') => return TokenKind::BadUrl,
                Some(')') => {
                    self.advance(1);
                    return TokenKind::BadUrl;
                }
                Some('\\') if is_valid_escape(Some('\\'), self.peek_at(1)) => {
                    self.advance(1);
                    let _ = self.consume_escaped_code_point();
                }
                Some(_) => self.advance(1),
            }
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident_sequence(&mut self) -> String {
        let mut result = String::new();

        loop {
            match self.consume() {
                Some(c) if is_ident_code_point(c) => result.push(c),
                Some('\\') if is_valid_escape(Some('\\'), self.peek()) => {
                    if let Some(c) = self.consume_escaped_code_point() {
                        result.push(c);
                    }
                }
                Some(_) => {
                    self.reconsume();
                    return result;
                }
                None => return result,
            }
        }
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    ///
    /// Only the extent matters here; the numeric value is never needed.
    fn consume_number(&mut self) {
        if matches!(self.peek(), Some('+' | '-')) {
            self.advance(1);
        }
        self.consume_digits();

        // "If the next 2 input code points are U+002E FULL STOP (.) followed by a digit..."
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance(2);
            self.consume_digits();
        }

        // "...E or e, optionally followed by U+002D HYPHEN-MINUS (-) or U+002B PLUS SIGN (+),
        // followed by a digit..."
        if matches!(self.peek(), Some('e' | 'E')) {
            let has_sign = matches!(self.peek_at(1), Some('+' | '-'));
            let digit_pos = if has_sign { 2 } else { 1 };
            if self.peek_at(digit_pos).is_some_and(|c| c.is_ascii_digit()) {
                self.advance(digit_pos + 1);
                self.consume_digits();
            }
        }
    }

    fn consume_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance(1);
        }
    }

    /// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    fn consume_escaped_code_point(&mut self) -> Option<char> {
        match self.consume() {
            Some(c) if c.is_ascii_hexdigit() => {
                let mut hex = c.to_string();
                // "Consume as many hex digits as possible, but no more than 5."
                for _ in 0..5 {
                    match self.peek() {
                        Some(h) if h.is_ascii_hexdigit() => {
                            hex.push(h);
                            self.advance(1);
                        }
                        _ => break,
                    }
                }
                // "If the next input code point is whitespace, consume it."
                if self.peek().is_some_and(is_whitespace) {
                    self.advance(1);
                }
                let code_point = u32::from_str_radix(&hex, 16).unwrap_or(0xFFFD);
                if code_point == 0 || (0xD800..=0xDFFF).contains(&code_point) {
                    Some('\u{FFFD}')
                } else {
                    Some(char::from_u32(code_point).unwrap_or('\u{FFFD}'))
                }
            }
            // "EOF" - "This is a parse error. Return U+FFFD REPLACEMENT CHARACTER."
            None => Some('\u{FFFD}'),
            Some(c) => Some(c),
        }
    }

    /// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    ///
    /// Looks at the next three code points of the stream.
    fn would_start_ident_sequence(&self) -> bool {
        starts_ident_sequence(self.peek(), self.peek_at(1), self.peek_at(2))
    }

    /// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
    ///
    /// `first` is the code point just consumed; the rest is still in the stream.
    fn would_start_number_with(&self, first: Option<char>) -> bool {
        match first {
            Some('+' | '-') => {
                let second = self.peek();
                second.is_some_and(|c| c.is_ascii_digit())
                    || (second == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()))
            }
            Some('.') => self.peek().is_some_and(|c| c.is_ascii_digit()),
            Some(c) => c.is_ascii_digit(),
            None => false,
        }
    }

    /// Consume and return the next character.
    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    /// Skip `count` characters that have already been peeked.
    fn advance(&mut self, count: usize) {
        self.position = (self.position + count).min(self.input.len());
    }

    /// Put back the last consumed character.
    fn reconsume(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    /// Peek at the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    /// Peek at a character at an offset from current position.
    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}

/// Tokenize a whole buffer, up to and including the EOF token.
///
/// # Errors
///
/// Returns the first [`LexError`] encountered.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut tokenizer = CSSTokenizer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.next_token()?;
        let is_eof = token.is_eof();
        tokens.push(token);
        if is_eof {
            return Ok(tokens);
        }
    }
}

/// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
fn is_valid_escape(first: Option<char>, second: Option<char>) -> bool {
    first == Some('\\') && !matches!(second, Some('\n' | '\r' | '\x0C'))
}

/// [§ 4.3.9](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier) on three explicit code points.
fn starts_ident_sequence(first: Option<char>, second: Option<char>, third: Option<char>) -> bool {
    match first {
        // "U+002D HYPHEN-MINUS"
        Some('-') => {
            second.is_some_and(is_ident_start_code_point)
                || second == Some('-')
                || is_valid_escape(second, third)
        }
        Some(c) if is_ident_start_code_point(c) => true,
        Some('\\') => is_valid_escape(first, second),
        _ => false,
    }
}

/// [§ 4.2 Definitions - whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ' | '\r' | '\x0C')
}

/// [§ 4.2 Definitions - ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
///
/// "A letter, a non-ASCII code point, or U+005F LOW LINE (_)."
fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.2 Definitions - ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
///
/// "An ident-start code point, a digit, or U+002D HYPHEN-MINUS (-)."
fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}
