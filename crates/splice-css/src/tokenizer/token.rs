//! CSS Token types per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
//!
//! The preprocessor re-emits its input almost verbatim, so every [`Token`]
//! keeps the exact source text it was scanned from. Kinds only carry a decoded
//! payload where the transformer dispatches on it (at-keyword names and
//! delimiters); everything else is read back through [`Token::literal`].

use core::fmt;

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// The kind of a scanned token. Each variant corresponds to a token type in
/// the CSS Syntax railroad diagrams, plus [`TokenKind::Comment`], which CSS Syntax
/// discards but passthrough has to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// "`<ident-token>`"
    Ident,

    /// "`<function-token>`", an ident immediately followed by `(`
    Function,

    /// "`<at-keyword-token>`"
    /// The decoded name, without the leading `@`.
    AtKeyword(String),

    /// "`<hash-token>`"
    Hash,

    /// "`<string-token>`", quotes included in the literal
    String,

    /// "`<url-token>`", an unquoted `url(...)`
    Url,

    /// "`<bad-url-token>`", a malformed unquoted `url(...)` kept verbatim
    BadUrl,

    /// "`<delim-token>`"
    /// "has a value composed of a single code point"
    Delim(char),

    /// "`<number-token>`"
    Number,

    /// "`<percentage-token>`"
    Percentage,

    /// "`<dimension-token>`"
    Dimension,

    /// "`<whitespace-token>`"
    /// "represents one or more whitespace code points"
    Whitespace,

    /// A `/* ... */` comment.
    Comment,

    /// "`<CDO-token>`" (`<!--`)
    CDO,

    /// "`<CDC-token>`" (`-->`)
    CDC,

    /// "`<colon-token>`"
    Colon,

    /// "`<semicolon-token>`"
    Semicolon,

    /// "`<comma-token>`"
    Comma,

    /// `<[-token>`
    LeftBracket,

    /// `<]-token>`
    RightBracket,

    /// `<(-token>`
    LeftParen,

    /// `<)-token>`
    RightParen,

    /// `<{-token>`
    LeftBrace,

    /// `<}-token>`
    RightBrace,

    /// End of file - signals end of input
    EOF,
}

impl TokenKind {
    /// Returns true for tokens that only separate other tokens:
    /// whitespace, comments, and the legacy `<!--` / `-->` markers.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment | Self::CDO | Self::CDC)
    }
}

/// A single token together with the source text it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// The exact source text of the token. Empty for [`TokenKind::EOF`].
    pub literal: String,
    /// Offset of the first code point, counted in chars.
    pub offset: usize,
}

impl Token {
    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::EOF)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident => write!(f, "<ident>"),
            Self::Function => write!(f, "<function>"),
            Self::AtKeyword(v) => write!(f, "<at-keyword:@{v}>"),
            Self::Hash => write!(f, "<hash>"),
            Self::String => write!(f, "<string>"),
            Self::Url => write!(f, "<url>"),
            Self::BadUrl => write!(f, "<bad-url>"),
            Self::Delim(c) => write!(f, "<delim:{c}>"),
            Self::Number => write!(f, "<number>"),
            Self::Percentage => write!(f, "<percentage>"),
            Self::Dimension => write!(f, "<dimension>"),
            Self::Whitespace => write!(f, "<whitespace>"),
            Self::Comment => write!(f, "<comment>"),
            Self::CDO => write!(f, "<CDO>"),
            Self::CDC => write!(f, "<CDC>"),
            Self::Colon => write!(f, "<colon>"),
            Self::Semicolon => write!(f, "<semicolon>"),
            Self::Comma => write!(f, "<comma>"),
            Self::LeftBracket => write!(f, "<[>"),
            Self::RightBracket => write!(f, "<]>"),
            Self::LeftParen => write!(f, "<(>"),
            Self::RightParen => write!(f, "<)>"),
            Self::LeftBrace => write!(f, "<{{>"),
            Self::RightBrace => write!(f, "<}}>"),
            Self::EOF => write!(f, "<EOF>"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.literal.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} {:?}", self.kind, self.literal)
        }
    }
}
