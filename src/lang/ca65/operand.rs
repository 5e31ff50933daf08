//! Operand matcher for CPU instructions
//!
//! Any addressing shape is accepted for any opcode; whether the opcode supports the
//! shape is a diagnostic concern.  A parenthesized expression is the one place where
//! the grammar has to look past the closing parenthesis: `(e),y` and `(e)` are indirect,
//! while `(e)+1` or `(e),x` are absolute operands that happen to begin with a group.

use super::parser::{Parser,ParseError};
use super::lexer::{TokenKind,Punct,Span};
use super::keywords::Register;
use super::expression::TOP_LEVEL;
use super::ast::*;

impl<'a> Parser<'a> {
    /// Register named by the current token, if it is a plain identifier
    fn register(&self) -> Option<Reg> {
        match self.tok.kind {
            TokenKind::Ident => Register::lookup(&self.tok.text).map(|reg| Reg { reg, span: self.tok.span }),
            _ => None
        }
    }
    /// consume `,x` or `,y`, the comma is the current token
    fn index_register(&mut self) -> Result<Reg,ParseError> {
        self.advance();
        match self.register() {
            Some(reg) if reg.reg!=Register::A => {
                self.advance();
                Ok(reg)
            },
            _ => Err(self.unexpected("index register `x` or `y`"))
        }
    }
    /// operand of an absolute style address, with optional index
    fn indexed(&mut self, addr: Expr) -> Result<Operand,ParseError> {
        if !self.tok.is_punct(Punct::Comma) {
            return Ok(Operand::Absolute { addr });
        }
        let reg = self.index_register()?;
        Ok(match reg.reg {
            Register::Y => Operand::AbsoluteY { addr, reg },
            _ => Operand::AbsoluteX { addr, reg }
        })
    }
    /// Parse the operand after an opcode, `None` means implied
    pub(super) fn operand(&mut self) -> Result<Option<Operand>,ParseError> {
        if self.tok.ends_statement() {
            return Ok(None);
        }
        if self.tok.is_punct(Punct::Hash) {
            self.advance();
            return Ok(Some(Operand::Immediate { expr: self.expr()? }));
        }
        if let Some(reg) = self.register() {
            if self.peek().ends_statement() {
                self.advance();
                return Ok(Some(Operand::Accumulator { reg }));
            }
        }
        if !self.tok.is_punct(Punct::LParen) {
            let addr = self.expr()?;
            return self.indexed(addr).map(Some);
        }
        let open = self.tok.span;
        self.advance();
        let inner = self.expr()?;
        if self.tok.is_punct(Punct::Comma) {
            let reg = self.index_register()?;
            if reg.reg!=Register::X {
                return Err(self.error(ErrorKind::Grammar,"indexed indirect requires `x`",reg.span));
            }
            self.expect_punct(Punct::RParen,")")?;
            return Ok(Some(Operand::XIndirect { addr: inner, reg }));
        }
        let close = self.expect_punct(Punct::RParen,")")?;
        if self.tok.ends_statement() {
            return Ok(Some(Operand::Indirect { addr: inner }));
        }
        if self.tok.is_punct(Punct::Comma) {
            let after_comma = self.peek();
            if after_comma.kind==TokenKind::Ident && Register::lookup(&after_comma.text)==Some(Register::Y) {
                let reg = self.index_register()?;
                return Ok(Some(Operand::IndirectY { addr: inner, reg }));
            }
        }
        let group = Expr::Group { expr: Box::new(inner), span: Span::new(open.start,close.end) };
        let addr = self.expr_from(group,TOP_LEVEL)?;
        self.indexed(addr).map(Some)
    }
}
