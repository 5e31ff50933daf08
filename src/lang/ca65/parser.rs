//! Statement and line assembler
//!
//! The parser pulls tokens from the lexer one line at a time.  Each line yields a `Line`
//! node holding an optional label and statement.  Block directives are tracked on an
//! explicit stack: the header line is held on the stack while its body accumulates, and
//! is emitted into its parent only when the matching terminator arrives.
//!
//! Error policy:
//! * lexical and grammar errors mark the line and parsing resumes on the next line
//! * a terminator that does not match the innermost open block is fatal, the rest of the
//!   input is left unparsed
//! * blocks still open at the end of input are reported at their openers
//!
//! The expression, operand, and directive grammars live in sibling modules as further
//! `impl` blocks on `Parser`.

use log::{trace,debug};
use thiserror::Error;
use serde::Serialize;
use super::lexer::{Lexer,Token,TokenKind,Punct,Span,Position,RawMode};
use super::keywords::{Keyword,KeywordClass,Mnemonic,Shape,BlockKind};
use super::ast::*;

#[derive(Error,Debug,Clone,PartialEq,Serialize)]
#[error("{message}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
    pub pos: Position
}

/// Result of parsing a whole buffer.  The program is always present, even with errors.
#[derive(Clone,Debug,Serialize)]
pub struct Parsed {
    pub program: Program,
    pub errors: Vec<ParseError>
}

/// Which grammar applies to statements at the current nesting
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
enum Context {
    General,
    Fields,
    Members
}

/// What a line does to the block stack
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
enum Role {
    Plain,
    Open(BlockKind),
    Close
}

/// Outcome of one statement, a fatal error abandons the rest of the input
enum Outcome {
    Line(Role),
    Fatal(ParseError)
}

struct Frame {
    kind: BlockKind,
    header: Line,
    lines: Vec<Line>
}

pub struct Parser<'a> {
    pub(super) lexer: Lexer<'a>,
    /// current token, the lexer is positioned at its end
    pub(super) tok: Token,
    /// end of the most recently consumed token or raw span
    pub(super) last_end: usize,
    errors: Vec<ParseError>,
    stack: Vec<Frame>,
    lines: Vec<Line>,
    /// role of the current line once known, kept if the rest of the line fails
    pending: Option<Role>,
    /// nesting of unary operators and groups in the current expression
    pub(super) depth: usize
}

/// Parse a complete source buffer
pub fn parse(src: &str) -> Parsed {
    let mut parser = Parser::new(src);
    parser.parse_program()
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a str) -> Self {
        let mut lexer = Lexer::new(src);
        let tok = lexer.next_token();
        Self {
            lexer,
            tok,
            last_end: 0,
            errors: Vec::new(),
            stack: Vec::new(),
            lines: Vec::new(),
            pending: None,
            depth: 0
        }
    }
    pub(super) fn advance(&mut self) {
        self.last_end = self.tok.span.end;
        self.tok = self.lexer.next_token();
    }
    /// Re-read the current token from the lexer position, used after raw capture
    pub(super) fn resume(&mut self) {
        self.tok = self.lexer.next_token();
    }
    /// Look at the token after the current one without consuming anything
    pub(super) fn peek(&mut self) -> Token {
        let save = self.lexer.offset();
        let ans = self.lexer.next_token();
        self.lexer.seek(save);
        ans
    }
    pub(super) fn error(&self, kind: ErrorKind, message: &str, span: Span) -> ParseError {
        ParseError {
            kind,
            message: message.to_string(),
            span,
            pos: self.lexer.position(span.start)
        }
    }
    /// Error at the current token, lexical error tokens report themselves
    pub(super) fn unexpected(&self, expected: &str) -> ParseError {
        match &self.tok.kind {
            TokenKind::Error(e) => self.error(ErrorKind::Lexical,&e.to_string(),self.tok.span),
            TokenKind::Newline | TokenKind::Eof => self.error(ErrorKind::Grammar,&format!("expected {} before end of line",expected),self.tok.span),
            TokenKind::Comment => self.error(ErrorKind::Grammar,&format!("expected {} before comment",expected),self.tok.span),
            _ => self.error(ErrorKind::Grammar,&format!("expected {}, found `{}`",expected,self.tok.text),self.tok.span)
        }
    }
    pub(super) fn expect_punct(&mut self, p: Punct, spelling: &str) -> Result<Span,ParseError> {
        if self.tok.is_punct(p) {
            let ans = self.tok.span;
            self.advance();
            return Ok(ans);
        }
        Err(self.unexpected(&format!("`{}`",spelling)))
    }
    /// consume a comma if present
    pub(super) fn eat_comma(&mut self) -> bool {
        if self.tok.is_punct(Punct::Comma) {
            self.advance();
            return true;
        }
        false
    }
    pub(super) fn ident(&mut self, what: &str) -> Result<Ident,ParseError> {
        if self.tok.kind==TokenKind::Ident {
            let ans = Ident { name: self.tok.text.clone(), span: self.tok.span };
            self.advance();
            return Ok(ans);
        }
        Err(self.unexpected(what))
    }
    pub(super) fn keyword_tok(&mut self) -> KeywordTok {
        let ans = match self.tok.kind {
            TokenKind::Keyword(id) => KeywordTok { id, text: self.tok.text.clone(), span: self.tok.span },
            _ => unreachable!("keyword_tok called on a non-keyword")
        };
        self.advance();
        ans
    }
    /// Capture raw text after the current token, which is a delimiter such as `(` or `,`.
    /// An argument written in braces is captured up to the matching brace.
    pub(super) fn raw_after(&mut self, mode: RawMode) -> Result<RawSpan,ParseError> {
        let start = self.lexer.peek_nonblank();
        let ans = if self.lexer.byte_at(start)==Some(b'{') {
            match self.lexer.capture_enclosed(start) {
                Ok(raw) => {
                    self.last_end = raw.span.end + 1;
                    raw
                },
                Err(tok) => {
                    self.tok = tok;
                    return Err(self.unexpected("`}`"));
                }
            }
        } else {
            self.lexer.seek(start);
            let raw = self.lexer.capture(start,mode);
            if raw.span.end > start {
                self.last_end = raw.span.end;
            }
            raw
        };
        self.resume();
        Ok(ans)
    }
    fn context(&self) -> Context {
        match self.stack.last() {
            Some(Frame { kind: BlockKind::Struct | BlockKind::Union, .. }) => Context::Fields,
            Some(Frame { kind: BlockKind::Enum, .. }) => Context::Members,
            _ => Context::General
        }
    }
    /// skip the rest of a line after an error
    /// Drop the rest of the line, the current token becomes the newline or end of input
    fn recover(&mut self) {
        if !self.tok.is_eol() {
            self.lexer.skip_line();
            self.resume();
        }
    }
    pub fn parse_program(&mut self) -> Parsed {
        let mut line_start = 0;
        let mut unparsed: Option<Span> = None;
        let len = self.lexer.source().len();
        while !(self.tok.kind==TokenKind::Eof && line_start >= len) {
            let row = self.lexer.position(line_start).row;
            trace!("parse row {}",row);
            let mut line = Line::new(line_start,row);
            self.pending = None;
            let role = match self.statement(&mut line) {
                Ok(Outcome::Line(role)) => role,
                Ok(Outcome::Fatal(e)) => {
                    debug!("fatal error at row {}: {}",row,e.message);
                    self.errors.push(e);
                    unparsed = Some(Span::new(line_start,len));
                    self.force_close();
                    break;
                },
                Err(e) => {
                    self.mark(&mut line,e);
                    self.recover();
                    self.pending.take().unwrap_or(Role::Plain)
                }
            };
            if self.tok.kind==TokenKind::Comment {
                line.comment = Some(Comment { text: self.tok.text.clone(), span: self.tok.span });
                self.advance();
            }
            if !self.tok.is_eol() {
                let e = self.unexpected("end of line");
                self.mark(&mut line,e);
                self.recover();
            }
            let at_end = self.tok.kind==TokenKind::Eof;
            line.span.end = match at_end {
                true => self.tok.span.start,
                false => self.tok.span.end
            };
            line_start = line.span.end;
            self.place(line,role);
            if at_end {
                break;
            }
            self.advance();
        }
        self.close_at_eof();
        Parsed {
            program: Program { lines: std::mem::take(&mut self.lines), unparsed },
            errors: std::mem::take(&mut self.errors)
        }
    }
    fn mark(&mut self, line: &mut Line, e: ParseError) {
        trace!("row {} error: {}",line.row,e.message);
        if line.error.is_none() {
            line.error = Some(ErrorMarker { kind: e.kind, message: e.message.clone(), span: e.span });
        }
        self.errors.push(e);
    }
    /// put a finished line into the tree according to what it does to the block stack
    fn place(&mut self, line: Line, role: Role) {
        match role {
            Role::Open(kind) => {
                debug!("open {:?} block at row {}",kind,line.row);
                self.stack.push(Frame { kind, header: line, lines: Vec::new() });
            },
            Role::Close => match self.stack.pop() {
                Some(frame) => {
                    debug!("close {:?} block at row {}",frame.kind,line.row);
                    for done in Self::finish(frame,Some(line)) {
                        self.append(done);
                    }
                },
                None => self.append(line)
            },
            Role::Plain => self.append(line)
        }
    }
    fn append(&mut self, line: Line) {
        match self.stack.last_mut() {
            Some(frame) => frame.lines.push(line),
            None => self.lines.push(line)
        }
    }
    /// Move the body and terminator into the header line.  If the header failed to parse
    /// there is no block node, so the lines are handed back flat.
    fn finish(frame: Frame, close: Option<Line>) -> Vec<Line> {
        let mut header = frame.header;
        match header.block_mut() {
            Some(block) => {
                block.lines = frame.lines;
                block.close = close.map(Box::new);
                vec![header]
            },
            None => {
                let mut ans = vec![header];
                ans.extend(frame.lines);
                ans.extend(close);
                ans
            }
        }
    }
    fn force_close(&mut self) {
        while let Some(frame) = self.stack.pop() {
            for done in Self::finish(frame,None) {
                self.append(done);
            }
        }
    }
    fn close_at_eof(&mut self) {
        while let Some(frame) = self.stack.pop() {
            let opener = frame.header.stmt.as_ref()
                .and_then(|s| s.pseudo())
                .map(|p| p.keyword.span)
                .unwrap_or(Span::new(frame.header.span.start,frame.header.span.start));
            let mess = format!("unclosed block, missing `{}`",frame.kind.terminator().name());
            let e = self.error(ErrorKind::Structural,&mess,opener);
            self.errors.push(e);
            for done in Self::finish(frame,None) {
                self.append(done);
            }
        }
    }
    /// Parse one statement, stopping at a comment or the end of line
    fn statement(&mut self, line: &mut Line) -> Result<Outcome,ParseError> {
        let ctx = self.context();
        if ctx==Context::General {
            self.label(line)?;
        }
        if self.tok.ends_statement() {
            return Ok(Outcome::Line(Role::Plain));
        }
        // terminators and branches are recognized in every context
        if let TokenKind::Keyword(k) = self.tok.kind {
            match k.shape() {
                Shape::Close(kind) => return self.terminator(line,kind),
                Shape::Branch => {
                    if self.stack.last().map(|f| f.kind)!=Some(BlockKind::If) {
                        let mess = format!("`{}` outside of a conditional block",k.name());
                        return Err(self.error(ErrorKind::Structural,&mess,self.tok.span));
                    }
                },
                _ => {}
            }
        }
        match ctx {
            Context::Fields => return self.field(line).map(Outcome::Line),
            Context::Members => return self.member(line).map(Outcome::Line),
            Context::General => {}
        }
        if line.label.is_none() {
            if let Some(def) = self.symbol_def()? {
                line.stmt = Some(Statement::Symbol(def));
                return Ok(Outcome::Line(Role::Plain));
            }
        }
        match self.tok.kind.clone() {
            TokenKind::Ident => {
                let inst = match Mnemonic::lookup(&self.tok.text) {
                    Some(mnemonic) => Instruction::Cpu(self.cpu_inst(mnemonic)?),
                    None => Instruction::Macro(self.macro_inst()?)
                };
                line.stmt = Some(Statement::Instruction(inst));
                Ok(Outcome::Line(Role::Plain))
            },
            TokenKind::Keyword(k) if k.class()==KeywordClass::Directive && k!=Keyword::Set => {
                let role = match k.shape() {
                    Shape::Block(kind) => Role::Open(kind),
                    _ => Role::Plain
                };
                self.pending = Some(role);
                let inst = self.directive()?;
                if let PseudoArgs::Struct { name: None, .. } = inst.args {
                    let mess = format!("`{}` needs a name outside of a struct",k.name());
                    return Err(self.error(ErrorKind::Grammar,&mess,inst.keyword.span));
                }
                line.stmt = Some(Statement::Instruction(Instruction::Pseudo(inst)));
                Ok(Outcome::Line(role))
            },
            TokenKind::Keyword(Keyword::Set) => Err(self.error(ErrorKind::Grammar,"`.set` needs a symbol name before it",self.tok.span)),
            TokenKind::Keyword(k) => {
                let mess = format!("`{}` cannot start a statement",k.name());
                Err(self.error(ErrorKind::Grammar,&mess,self.tok.span))
            },
            TokenKind::UnknownDot => {
                let mess = format!("unknown directive `{}`",self.tok.text);
                Err(self.error(ErrorKind::Grammar,&mess,self.tok.span))
            },
            _ => Err(self.unexpected("label or instruction"))
        }
    }
    fn label(&mut self, line: &mut Line) -> Result<(),ParseError> {
        let kind = match self.tok.kind {
            TokenKind::Ident => LabelKind::Named,
            TokenKind::LocalName => LabelKind::Local,
            TokenKind::Punct(Punct::Colon) => {
                line.label = Some(Label { kind: LabelKind::Unnamed, name: None, span: self.tok.span });
                self.advance();
                return Ok(());
            },
            _ => return Ok(())
        };
        let next = self.peek();
        // `bne :+` refers to an unnamed label, it does not define `bne`
        let refers = matches!(self.lexer.byte_at(next.span.end),Some(b'+') | Some(b'-'));
        if next.is_punct(Punct::Colon) && !refers {
            let name = Ident { name: self.tok.text.clone(), span: self.tok.span };
            let span = Span::new(self.tok.span.start,next.span.end);
            self.advance();
            self.advance();
            line.label = Some(Label { kind, name: Some(name), span });
        }
        Ok(())
    }
    /// `name = expr`, `name := expr`, `name .set expr`
    fn symbol_def(&mut self) -> Result<Option<SymbolDef>,ParseError> {
        if self.tok.kind!=TokenKind::Ident {
            return Ok(None);
        }
        let next = self.peek();
        let kind = match next.kind {
            TokenKind::Punct(Punct::Eq) => SymbolKind::Eq,
            TokenKind::Punct(Punct::ColonEq) => SymbolKind::Assign,
            TokenKind::Keyword(Keyword::Set) => SymbolKind::Set,
            _ => return Ok(None)
        };
        let name = self.ident("symbol")?;
        let op = self.tok.span;
        self.advance();
        let expr = self.expr()?;
        let span = Span::new(name.span.start,self.last_end);
        Ok(Some(SymbolDef { kind, name, op, expr, span }))
    }
    fn cpu_inst(&mut self, mnemonic: Mnemonic) -> Result<CpuInst,ParseError> {
        let opcode = Opcode { mnemonic, text: self.tok.text.clone(), span: self.tok.span };
        self.advance();
        let operand = self.operand()?;
        if !self.tok.ends_statement() {
            return Err(self.unexpected("end of operand"));
        }
        let span = Span::new(opcode.span.start,self.last_end);
        Ok(CpuInst { opcode, operand, span })
    }
    /// Macro instruction, the arguments are raw text.  The first argument starts at the
    /// first non-blank character after the name, later ones start right after the comma.
    fn macro_inst(&mut self) -> Result<MacroInst,ParseError> {
        let name = Ident { name: self.tok.text.clone(), span: self.tok.span };
        self.last_end = name.span.end;
        let mut args = Vec::new();
        let first = self.lexer.peek_nonblank();
        let mut more = !matches!(self.lexer.byte_at(first),None | Some(b'\n') | Some(b'\r') | Some(b';'));
        while more {
            let start = self.lexer.offset();
            let lead = self.lexer.peek_nonblank();
            let arg = if self.lexer.byte_at(lead)==Some(b'{') {
                match self.lexer.capture_enclosed(lead) {
                    Ok(raw) => {
                        self.last_end = raw.span.end + 1;
                        let after = self.lexer.peek_nonblank();
                        self.lexer.seek(after);
                        raw
                    },
                    Err(tok) => {
                        self.tok = tok;
                        return Err(self.unexpected("`}`"));
                    }
                }
            } else {
                let from = match args.is_empty() { true => lead, false => start };
                let raw = self.lexer.capture(from,RawMode::Argument);
                if raw.span.end > from {
                    self.last_end = raw.span.end;
                }
                raw
            };
            args.push(arg);
            match self.lexer.byte_at(self.lexer.offset()) {
                Some(b',') => {
                    self.last_end = self.lexer.offset() + 1;
                    self.lexer.seek(self.lexer.offset() + 1);
                },
                Some(b'}') => {
                    let at = self.lexer.offset();
                    return Err(self.error(ErrorKind::Grammar,"unmatched `}` in macro argument",Span::new(at,at+1)));
                },
                _ => more = false
            }
        }
        self.resume();
        if !self.tok.ends_statement() {
            return Err(self.unexpected("`,` or end of macro arguments"));
        }
        let span = Span::new(name.span.start,self.last_end);
        Ok(MacroInst { name, args, span })
    }
    /// Block terminator, must match the innermost open block
    fn terminator(&mut self, line: &mut Line, kind: BlockKind) -> Result<Outcome,ParseError> {
        let keyword = self.keyword_tok();
        let found = keyword.id;
        let span = keyword.span;
        let inst = PseudoInst { keyword, args: PseudoArgs::Bare, span };
        line.stmt = Some(Statement::Instruction(Instruction::Pseudo(inst)));
        match self.stack.last() {
            Some(frame) if frame.kind==kind => {},
            Some(frame) => {
                let mess = format!("expected `{}` but found `{}`",frame.kind.terminator().name(),found.name());
                return Ok(Outcome::Fatal(self.error(ErrorKind::Structural,&mess,span)));
            },
            None => {
                let mess = format!("`{}` without an open block",found.name());
                return Ok(Outcome::Fatal(self.error(ErrorKind::Structural,&mess,span)));
            }
        }
        self.pending = Some(Role::Close);
        if !self.tok.ends_statement() {
            return Err(self.unexpected("end of line"));
        }
        Ok(Outcome::Line(Role::Close))
    }
    /// Struct or union field: `[name] alloc`
    fn field(&mut self, line: &mut Line) -> Result<Role,ParseError> {
        let start = self.tok.span.start;
        let name = match self.tok.kind {
            TokenKind::Ident => Some(self.ident("field name")?),
            _ => None
        };
        let (alloc,role) = match self.tok.kind {
            TokenKind::Keyword(k @ (Keyword::Byte | Keyword::Dbyt | Keyword::Word | Keyword::Addr | Keyword::Faraddr | Keyword::Dword)) => {
                let keyword = self.keyword_tok();
                trace!("field storage {}",k.name());
                let size = match self.tok.ends_statement() {
                    true => None,
                    false => Some(self.expr()?)
                };
                (FieldAlloc::Storage { keyword, size },Role::Plain)
            },
            TokenKind::Keyword(Keyword::Res) => {
                let keyword = self.keyword_tok();
                let size = Some(self.expr()?);
                (FieldAlloc::Storage { keyword, size },Role::Plain)
            },
            TokenKind::Keyword(Keyword::Tag) => {
                let keyword = self.keyword_tok();
                let name = match self.tok.ends_statement() {
                    true => None,
                    false => Some(self.ident("struct name")?)
                };
                (FieldAlloc::Tag { keyword, name },Role::Plain)
            },
            TokenKind::Keyword(Keyword::Org) => {
                let keyword = self.keyword_tok();
                let offset = match self.tok.ends_statement() {
                    true => None,
                    false => Some(self.expr()?)
                };
                (FieldAlloc::Org { keyword, offset },Role::Plain)
            },
            TokenKind::Keyword(k @ (Keyword::Struct | Keyword::Union)) => {
                let kind = match k {
                    Keyword::Struct => BlockKind::Struct,
                    _ => BlockKind::Union
                };
                self.pending = Some(Role::Open(kind));
                let inst = self.directive()?;
                (FieldAlloc::Nested(inst),Role::Open(kind))
            },
            _ => return Err(self.unexpected("field allocation"))
        };
        if !self.tok.ends_statement() {
            return Err(self.unexpected("end of field"));
        }
        line.stmt = Some(Statement::Field(StructField { name, alloc, span: Span::new(start,self.last_end) }));
        Ok(role)
    }
    /// Enum member: `name [= expr]`
    fn member(&mut self, line: &mut Line) -> Result<Role,ParseError> {
        let name = self.ident("enum member")?;
        let value = match self.tok.is_punct(Punct::Eq) {
            true => {
                self.advance();
                Some(self.expr()?)
            },
            false => None
        };
        if !self.tok.ends_statement() {
            return Err(self.unexpected("`=` or end of line"));
        }
        let span = Span::new(name.span.start,self.last_end);
        line.stmt = Some(Statement::Member(EnumMember { name, value, span }));
        Ok(Role::Plain)
    }
}
