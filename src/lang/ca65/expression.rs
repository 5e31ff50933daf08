//! Expression grammar
//!
//! Binary operators are parsed by precedence climbing over five levels, all left
//! associative.  The unary operators `+ - ~ < > ^` bind to the nearest primary, while `!`
//! takes everything up to the loosest level as its operand.

use super::parser::{Parser,ParseError};
use super::lexer::{TokenKind,Punct,Span,RawMode};
use super::keywords::{Keyword,KeywordClass,CAPABILITIES};
use super::ast::*;

/// Loosest binary level, a full expression
pub const TOP_LEVEL: u8 = 6;
/// Nesting limit for unary operators and groups, keeps recursion off the end of the stack
pub const MAX_DEPTH: usize = 64;

impl<'a> Parser<'a> {
    /// Parse a complete expression
    pub(super) fn expr(&mut self) -> Result<Expr,ParseError> {
        let lhs = self.unary()?;
        self.expr_from(lhs,TOP_LEVEL)
    }
    /// Binary operator at the current token, if any
    pub(super) fn binop(&self) -> Option<BinaryOp> {
        match &self.tok.kind {
            TokenKind::Punct(p) => match p {
                Punct::Star => Some(BinaryOp::Mul),
                Punct::Slash => Some(BinaryOp::Div),
                Punct::Amp => Some(BinaryOp::BitAnd),
                Punct::Caret => Some(BinaryOp::BitXor),
                Punct::Shl => Some(BinaryOp::Shl),
                Punct::Shr => Some(BinaryOp::Shr),
                Punct::Plus => Some(BinaryOp::Add),
                Punct::Minus => Some(BinaryOp::Sub),
                Punct::Pipe => Some(BinaryOp::BitOr),
                Punct::Eq => Some(BinaryOp::Eq),
                Punct::Ne => Some(BinaryOp::Ne),
                Punct::Lt => Some(BinaryOp::Lt),
                Punct::Gt => Some(BinaryOp::Gt),
                Punct::Le => Some(BinaryOp::Le),
                Punct::Ge => Some(BinaryOp::Ge),
                Punct::AmpAmp => Some(BinaryOp::And),
                Punct::CaretCaret => Some(BinaryOp::Xor),
                Punct::PipePipe => Some(BinaryOp::Or),
                _ => None
            },
            TokenKind::Keyword(k) => match k {
                Keyword::Mod => Some(BinaryOp::Mod),
                Keyword::Bitand => Some(BinaryOp::BitAnd),
                Keyword::Bitxor => Some(BinaryOp::BitXor),
                Keyword::Shl => Some(BinaryOp::Shl),
                Keyword::Shr => Some(BinaryOp::Shr),
                Keyword::Bitor => Some(BinaryOp::BitOr),
                Keyword::And => Some(BinaryOp::And),
                Keyword::Xor => Some(BinaryOp::Xor),
                Keyword::Or => Some(BinaryOp::Or),
                _ => None
            },
            _ => None
        }
    }
    /// Continue an expression whose leftmost operand is already parsed,
    /// consuming operators up to and including level `max`.
    pub(super) fn expr_from(&mut self, lhs: Expr, max: u8) -> Result<Expr,ParseError> {
        let mut lhs = lhs;
        loop {
            let op = match self.binop() {
                Some(op) if op.level() <= max => op,
                _ => break
            };
            self.advance();
            let mut rhs = self.unary()?;
            while let Some(next) = self.binop() {
                if next.level() >= op.level() {
                    break;
                }
                rhs = self.expr_from(rhs,op.level()-1)?;
            }
            let span = lhs.span().join(&rhs.span());
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs), span };
        }
        Ok(lhs)
    }
    fn unary(&mut self) -> Result<Expr,ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(ErrorKind::Grammar,"expression nested too deeply",self.tok.span));
        }
        self.depth += 1;
        let ans = self.nested_unary();
        self.depth -= 1;
        ans
    }
    fn nested_unary(&mut self) -> Result<Expr,ParseError> {
        let op = match self.tok.kind {
            TokenKind::Punct(Punct::Plus) => UnaryOp::Plus,
            TokenKind::Punct(Punct::Minus) => UnaryOp::Minus,
            TokenKind::Punct(Punct::Tilde) => UnaryOp::BitNot,
            TokenKind::Punct(Punct::Lt) => UnaryOp::LoByte,
            TokenKind::Punct(Punct::Gt) => UnaryOp::HiByte,
            TokenKind::Punct(Punct::Caret) => UnaryOp::BankByte,
            TokenKind::Punct(Punct::Bang) => UnaryOp::Not,
            _ => return self.primary()
        };
        let start = self.tok.span.start;
        self.advance();
        let expr = match op {
            UnaryOp::Not => {
                let lhs = self.unary()?;
                self.expr_from(lhs,TOP_LEVEL)?
            },
            _ => self.unary()?
        };
        let span = Span::new(start,expr.span().end);
        Ok(Expr::Unary { op, expr: Box::new(expr), span })
    }
    fn primary(&mut self) -> Result<Expr,ParseError> {
        let span = self.tok.span;
        match self.tok.kind.clone() {
            TokenKind::Number { base, value } => {
                self.advance();
                Ok(Expr::Number(NumberLit { base, value, span }))
            },
            TokenKind::Str => {
                let value = self.tok.str_value().to_string();
                self.advance();
                Ok(Expr::Str(StrLit { value, span }))
            },
            TokenKind::Char(value) => {
                self.advance();
                Ok(Expr::Char(CharLit { value, span }))
            },
            TokenKind::Punct(Punct::Star) => {
                self.advance();
                Ok(Expr::PseudoVar { name: "*".to_string(), span })
            },
            TokenKind::Punct(Punct::LParen) => {
                self.advance();
                let expr = self.expr()?;
                let close = self.expect_punct(Punct::RParen,")")?;
                Ok(Expr::Group { expr: Box::new(expr), span: Span::new(span.start,close.end) })
            },
            TokenKind::Punct(Punct::Colon) => self.unnamed_label(),
            TokenKind::LocalName => {
                let name = self.tok.text.clone();
                self.advance();
                Ok(Expr::LocalLabel(Ident { name, span }))
            },
            TokenKind::Ident => {
                if self.lexer.byte_at(span.end)==Some(b'(') {
                    return self.macro_call();
                }
                self.symbol_or_member()
            },
            TokenKind::Keyword(k) => match k.class() {
                KeywordClass::Variable => {
                    self.advance();
                    Ok(Expr::PseudoVar { name: k.name().to_string(), span })
                },
                KeywordClass::Function => self.pseudo_func(),
                _ => {
                    let mess = format!("`{}` cannot appear in an expression",k.name());
                    Err(self.error(ErrorKind::Grammar,&mess,span))
                }
            },
            TokenKind::UnknownDot => {
                let mess = format!("unknown pseudo-function `{}`",self.tok.text);
                Err(self.error(ErrorKind::Grammar,&mess,span))
            },
            _ => Err(self.unexpected("expression"))
        }
    }
    /// `name` or `name::name...`
    pub(super) fn symbol_or_member(&mut self) -> Result<Expr,ParseError> {
        let first = self.ident("symbol")?;
        let mut ans = Expr::Symbol(first);
        while self.tok.is_punct(Punct::ColonColon) {
            self.advance();
            let dst = self.ident("member name")?;
            let span = Span::new(ans.span().start,dst.span.end);
            ans = Expr::Member { src: Box::new(ans), dst, span };
        }
        Ok(ans)
    }
    /// `:` followed immediately by one or more `+` or one or more `-`
    fn unnamed_label(&mut self) -> Result<Expr,ParseError> {
        let start = self.tok.span.start;
        let mut end = self.tok.span.end;
        self.advance();
        let mut offset: i32 = 0;
        loop {
            let step = match self.tok.kind {
                TokenKind::Punct(Punct::Plus) if offset >= 0 => 1,
                TokenKind::Punct(Punct::Minus) if offset <= 0 => -1,
                _ => break
            };
            if self.tok.span.start!=end {
                break;
            }
            offset += step;
            end = self.tok.span.end;
            self.advance();
        }
        if offset==0 {
            return Err(self.error(ErrorKind::Grammar,"expected `+` or `-` after `:`",Span::new(start,end)));
        }
        Ok(Expr::UnnamedLabel { offset, span: Span::new(start,end) })
    }
    /// `name(arg,...)` with raw arguments, the parenthesis must touch the name
    fn macro_call(&mut self) -> Result<Expr,ParseError> {
        let name = Ident { name: self.tok.text.clone(), span: self.tok.span };
        self.advance();
        let mut args = Vec::new();
        if self.lexer.byte_at(self.lexer.peek_nonblank())==Some(b')') {
            self.advance();
        } else {
            loop {
                args.push(self.raw_after(RawMode::Function { comma: true })?);
                if !self.tok.is_punct(Punct::Comma) {
                    break;
                }
            }
        }
        let close = self.expect_punct(Punct::RParen,")")?;
        let span = Span::new(name.span.start,close.end);
        Ok(Expr::MacroCall { name, args, span })
    }
    fn pseudo_func(&mut self) -> Result<Expr,ParseError> {
        let keyword = self.keyword_tok();
        if !self.tok.is_punct(Punct::LParen) {
            return Err(self.unexpected(&format!("`(` after `{}`",keyword.id.name())));
        }
        let args = match keyword.id {
            // raw arguments start right at the parenthesis
            Keyword::Blank | Keyword::Tcount => {
                let tokens = self.raw_after(RawMode::Function { comma: false })?;
                FuncArgs::Tokens { tokens }
            },
            Keyword::Match | Keyword::Xmatch => {
                let lhs = self.raw_after(RawMode::Function { comma: true })?;
                if !self.tok.is_punct(Punct::Comma) {
                    return Err(self.unexpected("`,`"));
                }
                let rhs = self.raw_after(RawMode::Function { comma: false })?;
                FuncArgs::Match { lhs, rhs }
            },
            id => {
                self.advance();
                self.func_args(id)?
            }
        };
        let close = self.expect_punct(Punct::RParen,")")?;
        let span = Span::new(keyword.span.start,close.end);
        Ok(Expr::Func(Box::new(PseudoFunc { keyword, args, span })))
    }
    /// arguments after the opening parenthesis, for functions that tokenize them
    fn func_args(&mut self, id: Keyword) -> Result<FuncArgs,ParseError> {
        let ans = match id {
            Keyword::Addrsize | Keyword::Bank | Keyword::Defined | Keyword::Definedmacro |
            Keyword::Ismnemonic | Keyword::Referenced => FuncArgs::Symbol { symbol: self.ident("symbol")? },
            Keyword::Max | Keyword::Min => {
                let lhs = self.expr()?;
                self.expect_punct(Punct::Comma,",")?;
                FuncArgs::Pair { lhs, rhs: self.expr()? }
            },
            Keyword::Start => {
                let string = self.expr()?;
                self.expect_punct(Punct::Comma,",")?;
                FuncArgs::Start { string, offset: self.expr()? }
            },
            Keyword::Left | Keyword::Right => {
                let count = self.expr()?;
                if !self.tok.is_punct(Punct::Comma) {
                    return Err(self.unexpected("`,`"));
                }
                FuncArgs::Count { count, tokens: self.raw_after(RawMode::Function { comma: false })? }
            },
            Keyword::Mid => {
                let start = self.expr()?;
                self.expect_punct(Punct::Comma,",")?;
                let end = self.expr()?;
                if !self.tok.is_punct(Punct::Comma) {
                    return Err(self.unexpected("`,`"));
                }
                FuncArgs::Mid { start, end, tokens: self.raw_after(RawMode::Function { comma: false })? }
            },
            Keyword::Concat => {
                let mut values = Vec::new();
                if !self.tok.is_punct(Punct::RParen) {
                    values.push(self.expr()?);
                    while self.eat_comma() {
                        values.push(self.expr()?);
                    }
                }
                FuncArgs::Concat { values }
            },
            Keyword::Capability => {
                let mut names = Vec::new();
                if !self.tok.is_punct(Punct::RParen) {
                    names.push(self.choice(&CAPABILITIES,"capability")?);
                    while self.eat_comma() {
                        names.push(self.choice(&CAPABILITIES,"capability")?);
                    }
                }
                FuncArgs::Capability { names }
            },
            Keyword::Sprintf => {
                let fmt = self.string_lit("format string")?;
                let mut args = Vec::new();
                while self.eat_comma() {
                    args.push(self.expr()?);
                }
                FuncArgs::Sprintf { fmt, args }
            },
            Keyword::Sizeof => {
                let target = match self.tok.kind {
                    TokenKind::LocalName => {
                        let ans = Expr::LocalLabel(Ident { name: self.tok.text.clone(), span: self.tok.span });
                        self.advance();
                        ans
                    },
                    _ => self.symbol_or_member()?
                };
                FuncArgs::Sizeof { target }
            },
            _ => FuncArgs::Expr { expr: self.expr()? }
        };
        Ok(ans)
    }
}
