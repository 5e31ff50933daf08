//! Lexer for ca65 source
//!
//! The lexer is a lazy iterator over tokens.  Keyword lookup happens here, so the parser
//! sees canonical keyword ids regardless of case or alias spelling.  The parser can also
//! reposition the lexer and ask it for raw text spans, which is how macro arguments and
//! `.define` bodies are captured without tokenizing them.

use thiserror::Error;
use super::keywords::Keyword;
use super::ast::RawSpan;
use serde::Serialize;

/// Byte offsets into the source buffer
#[derive(Clone,Copy,Debug,Default,PartialEq,Eq,Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
    /// smallest span covering both
    pub fn join(&self, other: &Span) -> Span {
        Span::new(self.start.min(other.start),self.end.max(other.end))
    }
}

/// Zero based row and byte column
#[derive(Clone,Copy,Debug,Default,PartialEq,Eq,Serialize)]
pub struct Position {
    pub row: u32,
    pub col: u32
}

#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize)]
#[serde(rename_all="lowercase")]
pub enum Base {
    Dec,
    Hex,
    Bin
}

#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum Punct {
    Plus, Minus, Star, Slash,
    Amp, AmpAmp, Pipe, PipePipe, Caret, CaretCaret, Tilde, Bang,
    Lt, Gt, Le, Ge, Ne, Shl, Shr, Eq,
    Colon, ColonColon, ColonEq, Comma, Hash,
    LParen, RParen, LBrace, RBrace
}

#[derive(Error,Clone,Copy,Debug,PartialEq,Eq)]
pub enum LexError {
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated character constant")]
    UnterminatedChar,
    #[error("character constant must hold exactly one character")]
    BadChar,
    #[error("expected digits after number prefix")]
    MissingDigits,
    #[error("number exceeds 32 bits")]
    NumberRange,
    #[error("stray `.`")]
    StrayDot,
    #[error("unexpected character")]
    Unexpected,
    #[error("missing `}}`")]
    UnterminatedBrace
}

#[derive(Clone,Debug,PartialEq)]
pub enum TokenKind {
    /// plain identifier, possibly an opcode or register, the parser decides
    Ident,
    /// `@name`
    LocalName,
    Keyword(Keyword),
    /// dot word that is not a known keyword
    UnknownDot,
    Number { base: Base, value: u32 },
    Str,
    Char(char),
    Punct(Punct),
    Comment,
    Newline,
    Eof,
    Error(LexError)
}

#[derive(Clone,Debug,PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
    pub pos: Position
}

impl Token {
    /// newline or end of input
    pub fn is_eol(&self) -> bool {
        matches!(self.kind,TokenKind::Newline | TokenKind::Eof)
    }
    /// newline, end of input, or a comment, which always runs to the newline
    pub fn ends_statement(&self) -> bool {
        matches!(self.kind,TokenKind::Newline | TokenKind::Eof | TokenKind::Comment)
    }
    pub fn is_punct(&self,p: Punct) -> bool {
        self.kind == TokenKind::Punct(p)
    }
    /// case insensitive match of a plain identifier
    pub fn is_word(&self,w: &str) -> bool {
        self.kind == TokenKind::Ident && self.text.eq_ignore_ascii_case(w)
    }
    /// contents of a string token without the quotes
    pub fn str_value(&self) -> &str {
        match self.text.len() {
            n if n >= 2 => &self.text[1..n-1],
            _ => ""
        }
    }
}

/// Maps byte offsets to rows and columns
#[derive(Clone,Debug)]
pub struct LineIndex {
    starts: Vec<usize>
}

impl LineIndex {
    pub fn new(src: &str) -> Self {
        let mut starts = vec![0];
        for (i,b) in src.bytes().enumerate() {
            if b==b'\n' {
                starts.push(i+1);
            }
        }
        Self { starts }
    }
    pub fn position(&self, offset: usize) -> Position {
        let row = match self.starts.binary_search(&offset) {
            Ok(r) => r,
            Err(r) => r - 1
        };
        Position { row: row as u32, col: (offset - self.starts[row]) as u32 }
    }
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }
}

/// Where raw capture stops, see `Lexer::capture`
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum RawMode {
    /// macro instruction argument: `,`, newline, comment, or unmatched `}`
    Argument,
    /// rest of the line up to newline or comment
    Line,
    /// pseudo-function argument: unmatched `)`, or depth zero `,` if `comma` is set
    Function { comma: bool }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b==b'_'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b==b'_'
}

fn is_blank(b: u8) -> bool {
    b==b' ' || b==b'\t' || b==0x0c
}

pub struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    index: LineIndex,
    done: bool
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            index: LineIndex::new(src),
            done: false
        }
    }
    pub fn source(&self) -> &'a str {
        self.src
    }
    pub fn offset(&self) -> usize {
        self.pos
    }
    pub fn position(&self, offset: usize) -> Position {
        self.index.position(offset)
    }
    /// Move the lexer to a byte offset, the offset must be on a character boundary
    pub fn seek(&mut self, offset: usize) {
        self.pos = offset.min(self.bytes.len());
        self.done = false;
    }
    pub fn byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(offset).copied()
    }
    fn peek_byte(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }
    fn at_crlf(&self, i: usize) -> bool {
        self.bytes.get(i)==Some(&b'\r') && self.bytes.get(i+1)==Some(&b'\n')
    }
    fn skip_blanks(&mut self) {
        while let Some(b) = self.peek_byte(0) {
            if is_blank(b) || (b==b'\r' && !self.at_crlf(self.pos)) {
                self.pos += 1;
            } else {
                break;
            }
        }
    }
    /// offset of the next non-blank byte without consuming anything
    pub fn peek_nonblank(&self) -> usize {
        let mut i = self.pos;
        while i < self.bytes.len() && is_blank(self.bytes[i]) {
            i += 1;
        }
        i
    }
    fn make(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            text: self.src[start..self.pos].to_string(),
            span: Span::new(start,self.pos),
            pos: self.index.position(start)
        }
    }
    fn scan_digits(&mut self, radix: u32) {
        while let Some(b) = self.peek_byte(0) {
            if (b as char).is_digit(radix) {
                self.pos += 1;
            } else {
                break;
            }
        }
    }
    fn number(&mut self, start: usize, base: Base) -> Token {
        let (radix,digits_start) = match base {
            Base::Dec => (10,start),
            Base::Hex => (16,start+1),
            Base::Bin => (2,start+1)
        };
        self.scan_digits(radix);
        if self.pos == digits_start {
            return self.make(TokenKind::Error(LexError::MissingDigits),start);
        }
        match u32::from_str_radix(&self.src[digits_start..self.pos],radix) {
            Ok(value) => self.make(TokenKind::Number { base, value },start),
            Err(_) => self.make(TokenKind::Error(LexError::NumberRange),start)
        }
    }
    fn string(&mut self, start: usize) -> Token {
        self.pos += 1;
        while let Some(b) = self.peek_byte(0) {
            if b==b'"' {
                self.pos += 1;
                return self.make(TokenKind::Str,start);
            }
            if b==b'\n' || self.at_crlf(self.pos) {
                break;
            }
            self.pos += 1;
        }
        self.make(TokenKind::Error(LexError::UnterminatedString),start)
    }
    fn character(&mut self, start: usize) -> Token {
        self.pos += 1;
        let c = match self.src[self.pos..].chars().next() {
            None | Some('\n') => return self.make(TokenKind::Error(LexError::UnterminatedChar),start),
            Some('\r') if self.at_crlf(self.pos) => return self.make(TokenKind::Error(LexError::UnterminatedChar),start),
            Some('\'') => {
                self.pos += 1;
                return self.make(TokenKind::Error(LexError::BadChar),start);
            },
            Some(c) => c
        };
        self.pos += c.len_utf8();
        if self.peek_byte(0)==Some(b'\'') {
            self.pos += 1;
            return self.make(TokenKind::Char(c),start);
        }
        // more than one character, swallow through the closing quote if it is on this line
        let mut i = self.pos;
        while i < self.bytes.len() && self.bytes[i]!=b'\n' && !self.at_crlf(i) {
            if self.bytes[i]==b'\'' {
                self.pos = i + 1;
                return self.make(TokenKind::Error(LexError::BadChar),start);
            }
            i += 1;
        }
        self.make(TokenKind::Error(LexError::UnterminatedChar),start)
    }
    fn word(&mut self) {
        self.pos += 1;
        while let Some(b) = self.peek_byte(0) {
            if is_ident_char(b) {
                self.pos += 1;
            } else {
                break;
            }
        }
    }
    fn comment(&mut self, start: usize) -> Token {
        while self.pos < self.bytes.len() && self.bytes[self.pos]!=b'\n' && !self.at_crlf(self.pos) {
            self.pos += 1;
        }
        self.make(TokenKind::Comment,start)
    }
    fn punct(&mut self, start: usize) -> Token {
        let b0 = self.bytes[self.pos];
        let b1 = self.peek_byte(1).unwrap_or(0);
        let (p,len) = match (b0,b1) {
            (b'&',b'&') => (Punct::AmpAmp,2),
            (b'|',b'|') => (Punct::PipePipe,2),
            (b'^',b'^') => (Punct::CaretCaret,2),
            (b'<',b'<') => (Punct::Shl,2),
            (b'>',b'>') => (Punct::Shr,2),
            (b'<',b'=') => (Punct::Le,2),
            (b'>',b'=') => (Punct::Ge,2),
            (b'<',b'>') => (Punct::Ne,2),
            (b':',b':') => (Punct::ColonColon,2),
            (b':',b'=') => (Punct::ColonEq,2),
            (b'+',_) => (Punct::Plus,1),
            (b'-',_) => (Punct::Minus,1),
            (b'*',_) => (Punct::Star,1),
            (b'/',_) => (Punct::Slash,1),
            (b'&',_) => (Punct::Amp,1),
            (b'|',_) => (Punct::Pipe,1),
            (b'^',_) => (Punct::Caret,1),
            (b'~',_) => (Punct::Tilde,1),
            (b'!',_) => (Punct::Bang,1),
            (b'<',_) => (Punct::Lt,1),
            (b'>',_) => (Punct::Gt,1),
            (b'=',_) => (Punct::Eq,1),
            (b':',_) => (Punct::Colon,1),
            (b',',_) => (Punct::Comma,1),
            (b'#',_) => (Punct::Hash,1),
            (b'(',_) => (Punct::LParen,1),
            (b')',_) => (Punct::RParen,1),
            (b'{',_) => (Punct::LBrace,1),
            (b'}',_) => (Punct::RBrace,1),
            _ => {
                let n = self.src[self.pos..].chars().next().map_or(1,|c| c.len_utf8());
                self.pos += n;
                return self.make(TokenKind::Error(LexError::Unexpected),start);
            }
        };
        self.pos += len;
        self.make(TokenKind::Punct(p),start)
    }
    /// Produce the next token, after end of input this keeps returning `Eof`
    pub fn next_token(&mut self) -> Token {
        self.skip_blanks();
        let start = self.pos;
        let b = match self.peek_byte(0) {
            Some(b) => b,
            None => return self.make(TokenKind::Eof,start)
        };
        match b {
            b'\n' => {
                self.pos += 1;
                self.make(TokenKind::Newline,start)
            },
            b'\r' => {
                self.pos += 2;
                self.make(TokenKind::Newline,start)
            },
            b';' => self.comment(start),
            b'"' => self.string(start),
            b'\'' => self.character(start),
            b'$' => {
                self.pos += 1;
                self.number(start,Base::Hex)
            },
            b'%' => {
                self.pos += 1;
                self.number(start,Base::Bin)
            },
            b'0'..=b'9' => self.number(start,Base::Dec),
            b'@' => match self.peek_byte(1) {
                Some(c) if is_ident_start(c) => {
                    self.pos += 1;
                    self.word();
                    self.make(TokenKind::LocalName,start)
                },
                _ => {
                    self.pos += 1;
                    self.make(TokenKind::Error(LexError::Unexpected),start)
                }
            },
            b'.' => match self.peek_byte(1) {
                Some(c) if is_ident_start(c) => {
                    self.pos += 1;
                    self.word();
                    match Keyword::lookup(&self.src[start..self.pos]) {
                        Some(k) => self.make(TokenKind::Keyword(k),start),
                        None => self.make(TokenKind::UnknownDot,start)
                    }
                },
                _ => {
                    self.pos += 1;
                    self.make(TokenKind::Error(LexError::StrayDot),start)
                }
            },
            c if is_ident_start(c) => {
                self.word();
                self.make(TokenKind::Ident,start)
            },
            _ => self.punct(start)
        }
    }
    /// Capture raw text starting at `start`, leaving the lexer on the delimiter.
    /// Quoted text is skipped over as a unit.  Trailing blanks are trimmed from the result.
    pub fn capture(&mut self, start: usize, mode: RawMode) -> RawSpan {
        let mut i = start;
        let mut depth = 0;
        let mut quote: Option<u8> = None;
        while i < self.bytes.len() {
            let b = self.bytes[i];
            if b==b'\n' || self.at_crlf(i) {
                break;
            }
            if let Some(q) = quote {
                if b==q {
                    quote = None;
                }
                i += 1;
                continue;
            }
            let stop = match (b,mode) {
                (b'"',_) | (b'\'',_) => {
                    quote = Some(b);
                    false
                },
                (b';',_) => true,
                (b',',RawMode::Argument) => true,
                (b'}',RawMode::Argument) => true,
                (b',',RawMode::Function { comma: true }) => depth==0,
                (b'(',RawMode::Function { .. }) => {
                    depth += 1;
                    false
                },
                (b')',RawMode::Function { .. }) => {
                    if depth==0 {
                        true
                    } else {
                        depth -= 1;
                        false
                    }
                },
                _ => false
            };
            if stop {
                break;
            }
            i += 1;
        }
        self.pos = i;
        let mut end = i;
        while end > start && is_blank(self.bytes[end-1]) {
            end -= 1;
        }
        RawSpan {
            text: self.src[start..end].to_string(),
            span: Span::new(start,end),
            enclosed: false
        }
    }
    /// Capture the text inside braces, `open` is the offset of `{`.
    /// Braces nest and newlines are kept.  On success the lexer is left after the matching `}`.
    /// If there is no match the lexer is left at the end of the line holding `{`.
    pub fn capture_enclosed(&mut self, open: usize) -> Result<RawSpan,Token> {
        let mut depth = 0;
        let mut i = open + 1;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'{' => depth += 1,
                b'}' if depth==0 => {
                    self.pos = i + 1;
                    return Ok(RawSpan {
                        text: self.src[open+1..i].to_string(),
                        span: Span::new(open+1,i),
                        enclosed: true
                    });
                },
                b'}' => depth -= 1,
                _ => {}
            }
            i += 1;
        }
        let mut eol = open;
        while eol < self.bytes.len() && self.bytes[eol]!=b'\n' && !self.at_crlf(eol) {
            eol += 1;
        }
        self.pos = eol;
        Err(Token {
            kind: TokenKind::Error(LexError::UnterminatedBrace),
            text: self.src[open..eol].to_string(),
            span: Span::new(open,eol),
            pos: self.index.position(open)
        })
    }
    /// Skip to just before the next newline, used for error recovery
    pub fn skip_line(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos]!=b'\n' && !self.at_crlf(self.pos) {
            self.pos += 1;
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;
    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        let tok = self.next_token();
        if tok.kind==TokenKind::Eof {
            self.done = true;
        }
        Some(tok)
    }
}
