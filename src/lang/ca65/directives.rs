//! Directive dispatcher
//!
//! The keyword table assigns each directive an argument shape.  Most shapes are handled
//! generically here; the `Special` shape dispatches on the keyword itself.  Block
//! directives only parse their header, the statement assembler collects the body.

use log::trace;
use super::parser::{Parser,ParseError};
use super::lexer::{TokenKind,Punct,Span,RawMode};
use super::keywords::*;
use super::ast::*;

impl<'a> Parser<'a> {
    /// One of a fixed set of words, matched case insensitively
    pub(super) fn choice(&mut self, options: &[&str], what: &str) -> Result<Choice,ParseError> {
        if self.tok.kind==TokenKind::Ident {
            let name = self.tok.text.to_lowercase();
            if options.contains(&name.as_str()) {
                let ans = Choice { name, span: self.tok.span };
                self.advance();
                return Ok(ans);
            }
            let mess = format!("unknown {} `{}`",what,self.tok.text);
            return Err(self.error(ErrorKind::Grammar,&mess,self.tok.span));
        }
        Err(self.unexpected(what))
    }
    pub(super) fn string_lit(&mut self, what: &str) -> Result<StrLit,ParseError> {
        if self.tok.kind==TokenKind::Str {
            let ans = StrLit { value: self.tok.str_value().to_string(), span: self.tok.span };
            self.advance();
            return Ok(ans);
        }
        Err(self.unexpected(what))
    }
    fn is_on_off(&self) -> bool {
        self.tok.is_punct(Punct::Plus) || self.tok.is_punct(Punct::Minus) || self.tok.is_word("on") || self.tok.is_word("off")
    }
    fn on_off(&mut self) -> Result<OnOff,ParseError> {
        if !self.is_on_off() {
            return Err(self.unexpected("`+`, `-`, `on`, or `off`"));
        }
        let on = self.tok.is_punct(Punct::Plus) || self.tok.is_word("on");
        let ans = OnOff { on, span: self.tok.span };
        self.advance();
        Ok(ans)
    }
    /// `: spec` if the current token is a colon
    fn addr_spec(&mut self) -> Result<Option<Choice>,ParseError> {
        if !self.tok.is_punct(Punct::Colon) {
            return Ok(None);
        }
        self.advance();
        Ok(Some(self.choice(&ADDR_SPECS,"address size")?))
    }
    /// `, expr` if the current token is a comma
    fn comma_expr(&mut self) -> Result<Option<Expr>,ParseError> {
        match self.eat_comma() {
            true => Ok(Some(self.expr()?)),
            false => Ok(None)
        }
    }
    fn expr_list(&mut self) -> Result<Vec<Expr>,ParseError> {
        let mut ans = vec![self.expr()?];
        while self.eat_comma() {
            ans.push(self.expr()?);
        }
        Ok(ans)
    }
    fn symbol_list(&mut self, spec: bool, assign: bool) -> Result<Vec<SymbolArg>,ParseError> {
        let mut ans = Vec::new();
        loop {
            let name = self.ident("symbol")?;
            let spec = match spec {
                true => self.addr_spec()?,
                false => None
            };
            let assign = match (assign,&self.tok.kind) {
                (true,TokenKind::Punct(Punct::Eq)) => {
                    self.advance();
                    Some((SymbolKind::Eq,self.expr()?))
                },
                (true,TokenKind::Punct(Punct::ColonEq)) => {
                    self.advance();
                    Some((SymbolKind::Assign,self.expr()?))
                },
                _ => None
            };
            ans.push(SymbolArg { name, spec, assign });
            if !self.eat_comma() {
                break;
            }
        }
        Ok(ans)
    }
    fn limit(&mut self) -> Result<Limit,ParseError> {
        if self.tok.is_word("unlimited") {
            return Ok(Limit::Unlimited(self.choice(&["unlimited"],"limit")?));
        }
        Ok(Limit::Count(self.expr()?))
    }
    fn feature_list(&mut self) -> Result<Vec<FeatureItem>,ParseError> {
        let mut ans = Vec::new();
        loop {
            let name = self.choice(&FEATURES,"feature")?;
            let option = match self.is_on_off() {
                true => Some(self.on_off()?),
                false => None
            };
            ans.push(FeatureItem { name, option });
            if !self.eat_comma() {
                break;
            }
        }
        Ok(ans)
    }
    fn params(&mut self) -> Result<Vec<Ident>,ParseError> {
        let mut ans = Vec::new();
        if self.tok.kind!=TokenKind::Ident {
            return Ok(ans);
        }
        ans.push(self.ident("parameter")?);
        while self.eat_comma() {
            ans.push(self.ident("parameter")?);
        }
        Ok(ans)
    }
    /// Parse a directive statement, the current token is its keyword
    pub(super) fn directive(&mut self) -> Result<PseudoInst,ParseError> {
        let id = match self.tok.kind {
            TokenKind::Keyword(k) => k,
            _ => return Err(self.unexpected("directive"))
        };
        let keyword = KeywordTok { id, text: self.tok.text.clone(), span: self.tok.span };
        trace!("directive {}",id.name());
        let args = match id {
            // raw line argument begins right after the keyword
            Keyword::Ifblank | Keyword::Ifnblank => {
                self.last_end = keyword.span.end;
                let raw = self.raw_after(RawMode::Line)?;
                let tokens = match raw.text.is_empty() {
                    true => None,
                    false => Some(raw)
                };
                PseudoArgs::Conditional { test: CondTest::Tokens { tokens }, body: Block::default() }
            },
            Keyword::Define => {
                self.advance();
                self.define()?
            },
            _ => {
                self.advance();
                self.directive_args(id)?
            }
        };
        if !self.tok.ends_statement() {
            return Err(self.unexpected(&format!("end of `{}`",id.name())));
        }
        let span = Span::new(keyword.span.start,self.last_end);
        Ok(PseudoInst { keyword, args, span })
    }
    /// `.define name body` or `.define name(a,b) body`, the parameter list must touch the name
    fn define(&mut self) -> Result<PseudoArgs,ParseError> {
        if self.tok.kind!=TokenKind::Ident {
            return Err(self.unexpected("macro name"));
        }
        let name = Ident { name: self.tok.text.clone(), span: self.tok.span };
        let params = match self.lexer.byte_at(name.span.end)==Some(b'(') {
            true => {
                self.advance();
                self.advance();
                let ans = self.params()?;
                if !self.tok.is_punct(Punct::RParen) {
                    return Err(self.unexpected("`)`"));
                }
                self.last_end = self.tok.span.end;
                Some(ans)
            },
            false => {
                self.last_end = name.span.end;
                None
            }
        };
        let raw = self.raw_after(RawMode::Line)?;
        let body = match raw.text.is_empty() {
            true => None,
            false => Some(raw)
        };
        Ok(PseudoArgs::Define { name, params, body })
    }
    fn directive_args(&mut self, id: Keyword) -> Result<PseudoArgs,ParseError> {
        let ans = match id.shape() {
            Shape::Bare | Shape::Close(_) => PseudoArgs::Bare,
            Shape::ExprList => PseudoArgs::Values { values: self.expr_list()? },
            Shape::SymbolList { spec, assign } => PseudoArgs::Symbols { symbols: self.symbol_list(spec,assign)? },
            Shape::Toggle => PseudoArgs::Toggle { option: self.on_off()? },
            Shape::Message => PseudoArgs::Message { message: self.string_lit("message string")? },
            Shape::Branch => match id {
                Keyword::Elseif => PseudoArgs::Branch { cond: Some(self.expr()?) },
                _ => PseudoArgs::Branch { cond: None }
            },
            Shape::Block(kind) => self.block_header(id,kind)?,
            Shape::Special => self.special(id)?,
            Shape::NotDirective => {
                let mess = format!("`{}` is not a directive",id.name());
                return Err(self.error(ErrorKind::Grammar,&mess,Span::new(self.last_end,self.last_end)));
            }
        };
        Ok(ans)
    }
    fn block_header(&mut self, id: Keyword, kind: BlockKind) -> Result<PseudoArgs,ParseError> {
        let body = Block::default();
        let ans = match kind {
            BlockKind::Struct | BlockKind::Union => {
                let name = match self.tok.kind {
                    TokenKind::Ident => Some(self.ident("name")?),
                    _ => None
                };
                PseudoArgs::Struct { name, body }
            },
            BlockKind::Enum => {
                let name = match self.tok.kind {
                    TokenKind::Ident => Some(self.ident("name")?),
                    _ => None
                };
                PseudoArgs::Enum { name, body }
            },
            BlockKind::Macro => {
                let name = self.ident("macro name")?;
                PseudoArgs::Macro { name, params: self.params()?, body }
            },
            BlockKind::Repeat => {
                let count = self.expr()?;
                let variable = match self.eat_comma() {
                    true => Some(self.ident("loop variable")?),
                    false => None
                };
                PseudoArgs::Repeat { count, variable, body }
            },
            BlockKind::Proc => {
                let name = Some(self.ident("procedure name")?);
                PseudoArgs::Scope { name, spec: self.addr_spec()?, body }
            },
            BlockKind::Scope => {
                let name = match self.tok.kind {
                    TokenKind::Ident => Some(self.ident("name")?),
                    _ => None
                };
                PseudoArgs::Scope { name, spec: self.addr_spec()?, body }
            },
            BlockKind::If => {
                let test = match id {
                    Keyword::If | Keyword::Ifconst => CondTest::Expr { cond: self.expr()? },
                    Keyword::Ifdef | Keyword::Ifndef | Keyword::Ifref | Keyword::Ifnref => CondTest::Symbol { symbol: self.ident("symbol")? },
                    _ => CondTest::Cpu
                };
                PseudoArgs::Conditional { test, body }
            }
        };
        Ok(ans)
    }
    fn special(&mut self, id: Keyword) -> Result<PseudoArgs,ParseError> {
        let ans = match id {
            Keyword::Align => {
                let align = self.expr()?;
                PseudoArgs::Align { align, fill: self.comma_expr()? }
            },
            Keyword::Asciiz => PseudoArgs::Asciiz { value: self.string_lit("string")? },
            Keyword::Assert => {
                let cond = self.expr()?;
                let mut action = None;
                let mut message = None;
                if self.eat_comma() {
                    action = Some(self.choice(&ASSERT_ACTIONS,"assert action")?);
                    if self.eat_comma() {
                        message = Some(self.string_lit("message string")?);
                    }
                }
                PseudoArgs::Assert { cond, action, message }
            },
            Keyword::Charmap => {
                let src = self.expr()?;
                self.expect_punct(Punct::Comma,",")?;
                PseudoArgs::Charmap { src, dst: self.expr()? }
            },
            Keyword::Condes => {
                let name = self.ident("symbol")?;
                self.expect_punct(Punct::Comma,",")?;
                let is_named = self.tok.kind==TokenKind::Ident && CONDES_TYPES.contains(&self.tok.text.to_lowercase().as_str());
                let kind = match is_named {
                    true => CondesType::Named(self.choice(&CONDES_TYPES,"condes type")?),
                    false => CondesType::Expr(self.expr()?)
                };
                PseudoArgs::Condes { name, kind, priority: self.comma_expr()? }
            },
            Keyword::Constructor | Keyword::Destructor | Keyword::Interruptor => {
                let name = self.ident("symbol")?;
                PseudoArgs::Handler { name, priority: self.comma_expr()? }
            },
            Keyword::Delmacro | Keyword::Undefine | Keyword::Tag => PseudoArgs::Name { name: self.ident("name")? },
            Keyword::Referto => PseudoArgs::Symbol { symbol: self.ident("symbol")? },
            Keyword::Feature => PseudoArgs::Feature { items: self.feature_list()? },
            Keyword::Fileopt => {
                let name = self.choice(&FILEOPT_NAMES,"file option")?;
                self.expect_punct(Punct::Comma,",")?;
                PseudoArgs::Fileopt { name, content: self.string_lit("string")? }
            },
            Keyword::Include => PseudoArgs::Include { file: self.string_lit("file name")? },
            Keyword::Incbin => {
                let file = self.string_lit("file name")?;
                let offset = self.comma_expr()?;
                let size = match offset.is_some() {
                    true => self.comma_expr()?,
                    false => None
                };
                PseudoArgs::Incbin { file, offset, size }
            },
            Keyword::Listbytes | Keyword::Pagelength => PseudoArgs::Limit { limit: self.limit()? },
            Keyword::Localchar => match self.tok.kind {
                TokenKind::Char(value) => {
                    let span = self.tok.span;
                    self.advance();
                    PseudoArgs::Localchar { value: CharLit { value, span } }
                },
                _ => return Err(self.unexpected("character constant"))
            },
            Keyword::Macpack => PseudoArgs::Macpack { package: self.choice(&MACPACK_NAMES,"macro package")? },
            Keyword::Org => PseudoArgs::Org { pc: self.expr()? },
            Keyword::Res => {
                let bytes = self.expr()?;
                PseudoArgs::Res { bytes, fill: self.comma_expr()? }
            },
            Keyword::Segment => {
                let name = self.string_lit("segment name")?;
                PseudoArgs::Segment { name, spec: self.addr_spec()? }
            },
            Keyword::Setcpu => PseudoArgs::Setcpu { cpu: self.string_lit("cpu name")? },
            _ => {
                let mess = format!("no argument grammar for `{}`",id.name());
                return Err(self.error(ErrorKind::Grammar,&mess,Span::new(self.last_end,self.last_end)));
            }
        };
        Ok(ans)
    }
}
