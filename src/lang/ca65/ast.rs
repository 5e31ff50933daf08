//! Syntax tree for ca65 source
//!
//! The tree is owned and immutable once built.  Every node keeps its span so that
//! diagnostics and the formatter can map back to the source.  Nodes serialize to JSON
//! through serde and render as S-expressions through `ToSexp`, the latter being the
//! compact form used by the CLI and the tests.
//!
//! Blocks are nested: the line holding a block directive owns the lines up to and including
//! its terminator.  The `Visit` trait walks the nested lines in source order.

use serde::Serialize;
use super::lexer::{Span,Base};
use super::keywords::{Keyword,Mnemonic,Register,mode};

/// Opaque text captured without tokenizing, `enclosed` is set if it was written in braces
#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct RawSpan {
    pub text: String,
    pub span: Span,
    pub enclosed: bool
}

#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct Ident {
    pub name: String,
    pub span: Span
}

/// A dot keyword as written, `id` is the canonical keyword
#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct KeywordTok {
    pub id: Keyword,
    pub text: String,
    pub span: Span
}

/// One of a fixed set of plain words, such as an address size; `name` is lower case
#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct Choice {
    pub name: String,
    pub span: Span
}

#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct OnOff {
    pub on: bool,
    pub span: Span
}

#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct NumberLit {
    pub base: Base,
    pub value: u32,
    pub span: Span
}

/// String literal, `value` excludes the quotes while `span` includes them
#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct StrLit {
    pub value: String,
    pub span: Span
}

#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct CharLit {
    pub value: char,
    pub span: Span
}

#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize)]
#[serde(rename_all="snake_case")]
pub enum UnaryOp {
    Plus,
    Minus,
    BitNot,
    LoByte,
    HiByte,
    BankByte,
    Not
}

#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize)]
#[serde(rename_all="snake_case")]
pub enum BinaryOp {
    Mul, Div, Mod, BitAnd, BitXor, Shl, Shr,
    Add, Sub, BitOr,
    Eq, Ne, Lt, Gt, Le, Ge,
    And, Xor,
    Or
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::BitNot => "~",
            Self::LoByte => "<",
            Self::HiByte => ">",
            Self::BankByte => "^",
            Self::Not => "!"
        }
    }
}

impl BinaryOp {
    /// Canonical spelling, the dotted synonyms map to the symbolic form
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => ".mod",
            Self::BitAnd => "&",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::Add => "+",
            Self::Sub => "-",
            Self::BitOr => "|",
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::And => "&&",
            Self::Xor => "^^",
            Self::Or => "||"
        }
    }
    /// Precedence level, lower binds tighter
    pub fn level(&self) -> u8 {
        match self {
            Self::Mul | Self::Div | Self::Mod | Self::BitAnd | Self::BitXor | Self::Shl | Self::Shr => 2,
            Self::Add | Self::Sub | Self::BitOr => 3,
            Self::Eq | Self::Ne | Self::Lt | Self::Gt | Self::Le | Self::Ge => 4,
            Self::And | Self::Xor => 5,
            Self::Or => 6
        }
    }
}

#[derive(Clone,Debug,PartialEq,Serialize)]
#[serde(tag="type",rename_all="snake_case")]
pub enum Expr {
    Number(NumberLit),
    Str(StrLit),
    Char(CharLit),
    Symbol(Ident),
    /// `src::dst`, chains nest to the left
    Member { src: Box<Expr>, dst: Ident, span: Span },
    LocalLabel(Ident),
    /// `:+` counts forward, `:-` counts backward
    UnnamedLabel { offset: i32, span: Span },
    Unary { op: UnaryOp, expr: Box<Expr>, span: Span },
    Binary { op: BinaryOp, lhs: Box<Expr>, rhs: Box<Expr>, span: Span },
    Group { expr: Box<Expr>, span: Span },
    /// `*` or one of the dotted pseudo-variables
    PseudoVar { name: String, span: Span },
    Func(Box<PseudoFunc>),
    MacroCall { name: Ident, args: Vec<RawSpan>, span: Span }
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Self::Number(n) => n.span,
            Self::Str(s) => s.span,
            Self::Char(c) => c.span,
            Self::Symbol(id) | Self::LocalLabel(id) => id.span,
            Self::Member { span, .. } => *span,
            Self::UnnamedLabel { span, .. } => *span,
            Self::Unary { span, .. } => *span,
            Self::Binary { span, .. } => *span,
            Self::Group { span, .. } => *span,
            Self::PseudoVar { span, .. } => *span,
            Self::Func(f) => f.span,
            Self::MacroCall { span, .. } => *span
        }
    }
}

#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct PseudoFunc {
    pub keyword: KeywordTok,
    pub args: FuncArgs,
    pub span: Span
}

#[derive(Clone,Debug,PartialEq,Serialize)]
#[serde(tag="shape",rename_all="snake_case")]
pub enum FuncArgs {
    /// `.addrsize .bank .defined .definedmacro .ismnemonic .referenced`
    Symbol { symbol: Ident },
    /// `.bankbyte .const .hibyte .hiword .ident .lobyte .loword .string .strlen`
    Expr { expr: Expr },
    /// `.max .min`
    Pair { lhs: Expr, rhs: Expr },
    Start { string: Expr, offset: Expr },
    /// `.blank .tcount`
    Tokens { tokens: RawSpan },
    /// `.left .right`
    Count { count: Expr, tokens: RawSpan },
    Mid { start: Expr, end: Expr, tokens: RawSpan },
    /// `.match .xmatch`
    Match { lhs: RawSpan, rhs: RawSpan },
    Concat { values: Vec<Expr> },
    Capability { names: Vec<Choice> },
    Sprintf { fmt: StrLit, args: Vec<Expr> },
    Sizeof { target: Expr }
}

#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct Reg {
    pub reg: Register,
    pub span: Span
}

/// Addressing mode shapes, the parser accepts these for any opcode
#[derive(Clone,Debug,PartialEq,Serialize)]
#[serde(tag="mode",rename_all="snake_case")]
pub enum Operand {
    Immediate { expr: Expr },
    Accumulator { reg: Reg },
    Absolute { addr: Expr },
    AbsoluteX { addr: Expr, reg: Reg },
    AbsoluteY { addr: Expr, reg: Reg },
    Indirect { addr: Expr },
    XIndirect { addr: Expr, reg: Reg },
    IndirectY { addr: Expr, reg: Reg }
}

impl Operand {
    /// the bit from `keywords::mode` matching this shape
    pub fn mode(&self) -> u16 {
        match self {
            Self::Immediate { .. } => mode::IMM,
            Self::Accumulator { .. } => mode::ACC,
            Self::Absolute { .. } => mode::ABS,
            Self::AbsoluteX { .. } => mode::ABX,
            Self::AbsoluteY { .. } => mode::ABY,
            Self::Indirect { .. } => mode::IND,
            Self::XIndirect { .. } => mode::IZX,
            Self::IndirectY { .. } => mode::IZY
        }
    }
    pub fn mode_name(&self) -> &'static str {
        match self {
            Self::Immediate { .. } => "immediate",
            Self::Accumulator { .. } => "accumulator",
            Self::Absolute { .. } => "absolute",
            Self::AbsoluteX { .. } => "absolute,x",
            Self::AbsoluteY { .. } => "absolute,y",
            Self::Indirect { .. } => "indirect",
            Self::XIndirect { .. } => "(indirect,x)",
            Self::IndirectY { .. } => "(indirect),y"
        }
    }
}

#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct Opcode {
    pub mnemonic: Mnemonic,
    pub text: String,
    pub span: Span
}

#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct CpuInst {
    pub opcode: Opcode,
    pub operand: Option<Operand>,
    pub span: Span
}

#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct MacroInst {
    pub name: Ident,
    pub args: Vec<RawSpan>,
    pub span: Span
}

#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct PseudoInst {
    pub keyword: KeywordTok,
    pub args: PseudoArgs,
    pub span: Span
}

#[derive(Clone,Debug,PartialEq,Serialize)]
#[serde(tag="kind",rename_all="snake_case")]
pub enum Instruction {
    Macro(MacroInst),
    Cpu(CpuInst),
    Pseudo(PseudoInst)
}

#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize)]
#[serde(rename_all="snake_case")]
pub enum SymbolKind {
    /// `=`
    Eq,
    /// `:=`
    Assign,
    /// `.set`
    Set
}

impl SymbolKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Assign => ":=",
            Self::Set => ".set"
        }
    }
}

#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct SymbolDef {
    pub kind: SymbolKind,
    pub name: Ident,
    /// span of the `=`, `:=`, or `.set`
    pub op: Span,
    pub expr: Expr,
    pub span: Span
}

/// Symbol in an import/export style list
#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct SymbolArg {
    pub name: Ident,
    pub spec: Option<Choice>,
    pub assign: Option<(SymbolKind,Expr)>
}

#[derive(Clone,Debug,PartialEq,Serialize)]
#[serde(tag="kind",rename_all="snake_case")]
pub enum Limit {
    Count(Expr),
    Unlimited(Choice)
}

#[derive(Clone,Debug,PartialEq,Serialize)]
#[serde(tag="kind",rename_all="snake_case")]
pub enum CondesType {
    Named(Choice),
    Expr(Expr)
}

#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct FeatureItem {
    pub name: Choice,
    pub option: Option<OnOff>
}

/// Header test of a conditional block
#[derive(Clone,Debug,PartialEq,Serialize)]
#[serde(tag="test",rename_all="snake_case")]
pub enum CondTest {
    /// `.if .ifconst`
    Expr { cond: Expr },
    /// `.ifdef .ifndef .ifref .ifnref`
    Symbol { symbol: Ident },
    /// `.ifblank .ifnblank`
    Tokens { tokens: Option<RawSpan> },
    /// the CPU tests such as `.ifp02`
    Cpu
}

#[derive(Clone,Debug,Default,PartialEq,Serialize)]
pub struct Block {
    pub lines: Vec<Line>,
    /// the terminator line, missing only if the block was left open
    pub close: Option<Box<Line>>
}

/// Arguments of a pseudo-instruction, fields are named by role
#[derive(Clone,Debug,PartialEq,Serialize)]
#[serde(tag="shape",rename_all="snake_case")]
pub enum PseudoArgs {
    Bare,
    Values { values: Vec<Expr> },
    Align { align: Expr, fill: Option<Expr> },
    Asciiz { value: StrLit },
    Assert { cond: Expr, action: Option<Choice>, message: Option<StrLit> },
    Toggle { option: OnOff },
    Charmap { src: Expr, dst: Expr },
    Condes { name: Ident, kind: CondesType, priority: Option<Expr> },
    /// `.constructor .destructor .interruptor`
    Handler { name: Ident, priority: Option<Expr> },
    Define { name: Ident, params: Option<Vec<Ident>>, body: Option<RawSpan> },
    /// `.delmacro .undefine .tag`
    Name { name: Ident },
    /// `.referto`
    Symbol { symbol: Ident },
    Message { message: StrLit },
    Feature { items: Vec<FeatureItem> },
    Fileopt { name: Choice, content: StrLit },
    Include { file: StrLit },
    Incbin { file: StrLit, offset: Option<Expr>, size: Option<Expr> },
    /// `.listbytes .pagelength`
    Limit { limit: Limit },
    Localchar { value: CharLit },
    Macpack { package: Choice },
    Org { pc: Expr },
    Res { bytes: Expr, fill: Option<Expr> },
    Segment { name: StrLit, spec: Option<Choice> },
    Setcpu { cpu: StrLit },
    Symbols { symbols: Vec<SymbolArg> },
    /// `.else`, and `.elseif` with its condition
    Branch { cond: Option<Expr> },
    Struct { name: Option<Ident>, body: Block },
    Enum { name: Option<Ident>, body: Block },
    Macro { name: Ident, params: Vec<Ident>, body: Block },
    Repeat { count: Expr, variable: Option<Ident>, body: Block },
    /// `.proc .scope`
    Scope { name: Option<Ident>, spec: Option<Choice>, body: Block },
    Conditional { test: CondTest, body: Block }
}

impl PseudoArgs {
    pub fn block(&self) -> Option<&Block> {
        match self {
            Self::Struct { body, .. } |
            Self::Enum { body, .. } |
            Self::Macro { body, .. } |
            Self::Repeat { body, .. } |
            Self::Scope { body, .. } |
            Self::Conditional { body, .. } => Some(body),
            _ => None
        }
    }
    pub fn block_mut(&mut self) -> Option<&mut Block> {
        match self {
            Self::Struct { body, .. } |
            Self::Enum { body, .. } |
            Self::Macro { body, .. } |
            Self::Repeat { body, .. } |
            Self::Scope { body, .. } |
            Self::Conditional { body, .. } => Some(body),
            _ => None
        }
    }
}

/// Storage of a struct or union field
#[derive(Clone,Debug,PartialEq,Serialize)]
#[serde(tag="type",rename_all="snake_case")]
pub enum FieldAlloc {
    /// `.byte .dbyt .word .addr .faraddr .dword .res`, `.res` always has a size
    Storage { keyword: KeywordTok, size: Option<Expr> },
    Tag { keyword: KeywordTok, name: Option<Ident> },
    Org { keyword: KeywordTok, offset: Option<Expr> },
    /// nested `.struct` or `.union`
    Nested(PseudoInst)
}

#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct StructField {
    pub name: Option<Ident>,
    pub alloc: FieldAlloc,
    pub span: Span
}

impl StructField {
    /// span of the allocating keyword
    pub fn keyword_span(&self) -> Span {
        match &self.alloc {
            FieldAlloc::Storage { keyword, .. } |
            FieldAlloc::Tag { keyword, .. } |
            FieldAlloc::Org { keyword, .. } => keyword.span,
            FieldAlloc::Nested(inst) => inst.keyword.span
        }
    }
}

#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct EnumMember {
    pub name: Ident,
    pub value: Option<Expr>,
    pub span: Span
}

#[derive(Clone,Debug,PartialEq,Serialize)]
#[serde(tag="type",rename_all="snake_case")]
pub enum Statement {
    Symbol(SymbolDef),
    Instruction(Instruction),
    Field(StructField),
    Member(EnumMember)
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Self::Symbol(s) => s.span,
            Self::Instruction(Instruction::Macro(m)) => m.span,
            Self::Instruction(Instruction::Cpu(c)) => c.span,
            Self::Instruction(Instruction::Pseudo(p)) => p.span,
            Self::Field(f) => f.span,
            Self::Member(m) => m.span
        }
    }
    pub fn pseudo(&self) -> Option<&PseudoInst> {
        match self {
            Self::Instruction(Instruction::Pseudo(p)) => Some(p),
            Self::Field(StructField { alloc: FieldAlloc::Nested(p), .. }) => Some(p),
            _ => None
        }
    }
    fn pseudo_mut(&mut self) -> Option<&mut PseudoInst> {
        match self {
            Self::Instruction(Instruction::Pseudo(p)) => Some(p),
            Self::Field(StructField { alloc: FieldAlloc::Nested(p), .. }) => Some(p),
            _ => None
        }
    }
}

#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize)]
#[serde(rename_all="snake_case")]
pub enum LabelKind {
    /// `name:`
    Named,
    /// `@name:`
    Local,
    /// `:`
    Unnamed
}

#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct Label {
    pub kind: LabelKind,
    /// missing for unnamed labels
    pub name: Option<Ident>,
    /// includes the colon
    pub span: Span
}

#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize)]
#[serde(rename_all="snake_case")]
pub enum ErrorKind {
    Lexical,
    Structural,
    Grammar
}

#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct ErrorMarker {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span
}

#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct Comment {
    pub text: String,
    pub span: Span
}

/// One physical line, its span includes the line terminator
#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct Line {
    pub span: Span,
    pub row: u32,
    pub label: Option<Label>,
    pub stmt: Option<Statement>,
    pub comment: Option<Comment>,
    pub error: Option<ErrorMarker>
}

impl Line {
    pub fn new(start: usize, row: u32) -> Self {
        Self {
            span: Span::new(start,start),
            row,
            label: None,
            stmt: None,
            comment: None,
            error: None
        }
    }
    /// The block owned by this line, if it holds a block directive
    pub fn block(&self) -> Option<&Block> {
        self.stmt.as_ref().and_then(|s| s.pseudo()).and_then(|p| p.args.block())
    }
    pub fn block_mut(&mut self) -> Option<&mut Block> {
        self.stmt.as_mut().and_then(|s| s.pseudo_mut()).and_then(|p| p.args.block_mut())
    }
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.stmt.is_none() && self.error.is_none()
    }
}

#[derive(Clone,Debug,Default,PartialEq,Serialize)]
pub struct Program {
    pub lines: Vec<Line>,
    /// text left unparsed after a fatal structural error
    pub unparsed: Option<Span>
}

/// Render a node as a compact S-expression
pub trait ToSexp {
    fn write_sexp(&self, out: &mut String);
    fn to_sexp(&self) -> String {
        let mut ans = String::new();
        self.write_sexp(&mut ans);
        ans
    }
}

/// write `(head item item ...)`
fn list(out: &mut String, head: &str, items: &[&dyn ToSexp]) {
    out.push('(');
    out.push_str(head);
    for item in items {
        out.push(' ');
        item.write_sexp(out);
    }
    out.push(')');
}

impl ToSexp for RawSpan {
    fn write_sexp(&self, out: &mut String) {
        match self.enclosed {
            true => { out.push('{'); out.push_str(&self.text); out.push('}'); },
            false => { out.push('['); out.push_str(&self.text); out.push(']'); }
        }
    }
}

impl ToSexp for Ident {
    fn write_sexp(&self, out: &mut String) {
        out.push_str(&self.name);
    }
}

impl ToSexp for Choice {
    fn write_sexp(&self, out: &mut String) {
        out.push_str(&self.name);
    }
}

impl ToSexp for OnOff {
    fn write_sexp(&self, out: &mut String) {
        out.push_str(match self.on { true => "on", false => "off" });
    }
}

impl ToSexp for StrLit {
    fn write_sexp(&self, out: &mut String) {
        out.push('"');
        out.push_str(&self.value);
        out.push('"');
    }
}

impl ToSexp for CharLit {
    fn write_sexp(&self, out: &mut String) {
        out.push('\'');
        out.push(self.value);
        out.push('\'');
    }
}

impl<T: ToSexp> ToSexp for Box<T> {
    fn write_sexp(&self, out: &mut String) {
        self.as_ref().write_sexp(out);
    }
}

impl ToSexp for Expr {
    fn write_sexp(&self, out: &mut String) {
        match self {
            Self::Number(n) => out.push_str(&n.value.to_string()),
            Self::Str(s) => s.write_sexp(out),
            Self::Char(c) => c.write_sexp(out),
            Self::Symbol(id) => id.write_sexp(out),
            Self::Member { src, dst, .. } => list(out,"::",&[src,dst]),
            Self::LocalLabel(id) => id.write_sexp(out),
            Self::UnnamedLabel { offset, .. } => out.push_str(&format!("(unnamed {})",offset)),
            Self::Unary { op, expr, .. } => list(out,op.symbol(),&[expr]),
            Self::Binary { op, lhs, rhs, .. } => list(out,op.symbol(),&[lhs,rhs]),
            Self::Group { expr, .. } => list(out,"group",&[expr]),
            Self::PseudoVar { name, .. } => out.push_str(name),
            Self::Func(f) => f.write_sexp(out),
            Self::MacroCall { name, args, .. } => {
                out.push_str("(call ");
                out.push_str(&name.name);
                for arg in args {
                    out.push(' ');
                    arg.write_sexp(out);
                }
                out.push(')');
            }
        }
    }
}

impl ToSexp for PseudoFunc {
    fn write_sexp(&self, out: &mut String) {
        let head = self.keyword.id.name();
        match &self.args {
            FuncArgs::Symbol { symbol } => list(out,head,&[symbol]),
            FuncArgs::Expr { expr } => list(out,head,&[expr]),
            FuncArgs::Pair { lhs, rhs } => list(out,head,&[lhs,rhs]),
            FuncArgs::Start { string, offset } => list(out,head,&[string,offset]),
            FuncArgs::Tokens { tokens } => list(out,head,&[tokens]),
            FuncArgs::Count { count, tokens } => list(out,head,&[count,tokens]),
            FuncArgs::Mid { start, end, tokens } => list(out,head,&[start,end,tokens]),
            FuncArgs::Match { lhs, rhs } => list(out,head,&[lhs,rhs]),
            FuncArgs::Concat { values } => list(out,head,&values.iter().map(|v| v as &dyn ToSexp).collect::<Vec<_>>()),
            FuncArgs::Capability { names } => list(out,head,&names.iter().map(|v| v as &dyn ToSexp).collect::<Vec<_>>()),
            FuncArgs::Sprintf { fmt, args } => {
                let mut items: Vec<&dyn ToSexp> = vec![fmt];
                items.extend(args.iter().map(|v| v as &dyn ToSexp));
                list(out,head,&items)
            },
            FuncArgs::Sizeof { target } => list(out,head,&[target])
        }
    }
}

impl ToSexp for Reg {
    fn write_sexp(&self, out: &mut String) {
        out.push_str(self.reg.name());
    }
}

impl ToSexp for Operand {
    fn write_sexp(&self, out: &mut String) {
        match self {
            Self::Immediate { expr } => list(out,"imm",&[expr]),
            Self::Accumulator { reg } => list(out,"acc",&[reg]),
            Self::Absolute { addr } => list(out,"abs",&[addr]),
            Self::AbsoluteX { addr, .. } => list(out,"abs_x",&[addr]),
            Self::AbsoluteY { addr, .. } => list(out,"abs_y",&[addr]),
            Self::Indirect { addr } => list(out,"ind",&[addr]),
            Self::XIndirect { addr, .. } => list(out,"x_ind",&[addr]),
            Self::IndirectY { addr, .. } => list(out,"ind_y",&[addr])
        }
    }
}

/// symbol in a list: `name`, `(name :spec)`, `(name = expr)`, `(name :spec = expr)`
impl ToSexp for SymbolArg {
    fn write_sexp(&self, out: &mut String) {
        if self.spec.is_none() && self.assign.is_none() {
            out.push_str(&self.name.name);
            return;
        }
        out.push('(');
        out.push_str(&self.name.name);
        if let Some(spec) = &self.spec {
            out.push_str(" :");
            out.push_str(&spec.name);
        }
        if let Some((kind,expr)) = &self.assign {
            out.push(' ');
            out.push_str(kind.symbol());
            out.push(' ');
            expr.write_sexp(out);
        }
        out.push(')');
    }
}

impl ToSexp for FeatureItem {
    fn write_sexp(&self, out: &mut String) {
        match &self.option {
            Some(opt) => list(out,&self.name.name,&[opt]),
            None => self.name.write_sexp(out)
        }
    }
}

impl ToSexp for Limit {
    fn write_sexp(&self, out: &mut String) {
        match self {
            Self::Count(expr) => expr.write_sexp(out),
            Self::Unlimited(c) => c.write_sexp(out)
        }
    }
}

impl ToSexp for CondesType {
    fn write_sexp(&self, out: &mut String) {
        match self {
            Self::Named(c) => c.write_sexp(out),
            Self::Expr(expr) => expr.write_sexp(out)
        }
    }
}

impl ToSexp for Block {
    fn write_sexp(&self, out: &mut String) {
        for line in &self.lines {
            out.push(' ');
            line.write_sexp(out);
        }
        if let Some(close) = &self.close {
            out.push(' ');
            close.write_sexp(out);
        }
    }
}

/// optional items are tagged by role so the rendering is unambiguous
struct Role<'a>(&'a str,&'a dyn ToSexp);

impl<'a> ToSexp for Role<'a> {
    fn write_sexp(&self, out: &mut String) {
        if !self.0.is_empty() {
            out.push_str(self.0);
            out.push_str(": ");
        }
        self.1.write_sexp(out);
    }
}

impl ToSexp for PseudoInst {
    fn write_sexp(&self, out: &mut String) {
        let mut items: Vec<Box<dyn ToSexp + '_>> = Vec::new();
        fn opt<'a,T: ToSexp>(items: &mut Vec<Box<dyn ToSexp + 'a>>, role: &'a str, val: &'a Option<T>) {
            if let Some(v) = val {
                items.push(Box::new(Role(role,v)));
            }
        }
        fn one<'a,T: ToSexp>(items: &mut Vec<Box<dyn ToSexp + 'a>>, val: &'a T) {
            items.push(Box::new(Role("",val)));
        }
        let mut body: Option<&Block> = None;
        match &self.args {
            PseudoArgs::Bare => {},
            PseudoArgs::Values { values } => values.iter().for_each(|v| one(&mut items,v)),
            PseudoArgs::Align { align, fill } => { one(&mut items,align); opt(&mut items,"fill",fill); },
            PseudoArgs::Asciiz { value } => one(&mut items,value),
            PseudoArgs::Assert { cond, action, message } => {
                one(&mut items,cond);
                opt(&mut items,"action",action);
                opt(&mut items,"message",message);
            },
            PseudoArgs::Toggle { option } => one(&mut items,option),
            PseudoArgs::Charmap { src, dst } => { one(&mut items,src); one(&mut items,dst); },
            PseudoArgs::Condes { name, kind, priority } => {
                one(&mut items,name);
                one(&mut items,kind);
                opt(&mut items,"priority",priority);
            },
            PseudoArgs::Handler { name, priority } => { one(&mut items,name); opt(&mut items,"priority",priority); },
            PseudoArgs::Define { name, params, body } => {
                one(&mut items,name);
                if let Some(params) = params {
                    items.push(Box::new(ParamList(params)));
                }
                opt(&mut items,"body",body);
            },
            PseudoArgs::Name { name } => one(&mut items,name),
            PseudoArgs::Symbol { symbol } => one(&mut items,symbol),
            PseudoArgs::Message { message } => one(&mut items,message),
            PseudoArgs::Feature { items: features } => features.iter().for_each(|f| one(&mut items,f)),
            PseudoArgs::Fileopt { name, content } => { one(&mut items,name); one(&mut items,content); },
            PseudoArgs::Include { file } => one(&mut items,file),
            PseudoArgs::Incbin { file, offset, size } => {
                one(&mut items,file);
                opt(&mut items,"offset",offset);
                opt(&mut items,"size",size);
            },
            PseudoArgs::Limit { limit } => one(&mut items,limit),
            PseudoArgs::Localchar { value } => one(&mut items,value),
            PseudoArgs::Macpack { package } => one(&mut items,package),
            PseudoArgs::Org { pc } => one(&mut items,pc),
            PseudoArgs::Res { bytes, fill } => { one(&mut items,bytes); opt(&mut items,"fill",fill); },
            PseudoArgs::Segment { name, spec } => { one(&mut items,name); opt(&mut items,"spec",spec); },
            PseudoArgs::Setcpu { cpu } => one(&mut items,cpu),
            PseudoArgs::Symbols { symbols } => symbols.iter().for_each(|s| one(&mut items,s)),
            PseudoArgs::Branch { cond } => opt(&mut items,"cond",cond),
            PseudoArgs::Struct { name, body: b } | PseudoArgs::Enum { name, body: b } => {
                opt(&mut items,"name",name);
                body = Some(b);
            },
            PseudoArgs::Macro { name, params, body: b } => {
                one(&mut items,name);
                items.push(Box::new(ParamList(params)));
                body = Some(b);
            },
            PseudoArgs::Repeat { count, variable, body: b } => {
                one(&mut items,count);
                opt(&mut items,"variable",variable);
                body = Some(b);
            },
            PseudoArgs::Scope { name, spec, body: b } => {
                opt(&mut items,"name",name);
                opt(&mut items,"spec",spec);
                body = Some(b);
            },
            PseudoArgs::Conditional { test, body: b } => {
                match test {
                    CondTest::Expr { cond } => one(&mut items,cond),
                    CondTest::Symbol { symbol } => one(&mut items,symbol),
                    CondTest::Tokens { tokens } => opt(&mut items,"tokens",tokens),
                    CondTest::Cpu => {}
                }
                body = Some(b);
            }
        }
        out.push('(');
        out.push_str(self.keyword.id.name());
        for item in &items {
            out.push(' ');
            item.write_sexp(out);
        }
        if let Some(b) = body {
            b.write_sexp(out);
        }
        out.push(')');
    }
}

struct ParamList<'a>(&'a Vec<Ident>);

impl<'a> ToSexp for ParamList<'a> {
    fn write_sexp(&self, out: &mut String) {
        out.push_str("(params");
        for p in self.0 {
            out.push(' ');
            out.push_str(&p.name);
        }
        out.push(')');
    }
}

impl ToSexp for Statement {
    fn write_sexp(&self, out: &mut String) {
        match self {
            Self::Symbol(def) => list(out,def.kind.symbol(),&[&def.name,&def.expr]),
            Self::Instruction(Instruction::Cpu(inst)) => match &inst.operand {
                Some(operand) => list(out,inst.opcode.mnemonic.name(),&[operand]),
                None => list(out,inst.opcode.mnemonic.name(),&[])
            },
            Self::Instruction(Instruction::Macro(inst)) => {
                let mut items: Vec<&dyn ToSexp> = vec![&inst.name];
                items.extend(inst.args.iter().map(|a| a as &dyn ToSexp));
                list(out,"macro",&items)
            },
            Self::Instruction(Instruction::Pseudo(inst)) => inst.write_sexp(out),
            Self::Field(field) => {
                out.push_str("(field ");
                if let Some(name) = &field.name {
                    out.push_str(&name.name);
                    out.push(' ');
                }
                match &field.alloc {
                    FieldAlloc::Storage { keyword, size } => match size {
                        Some(size) => list(out,keyword.id.name(),&[size]),
                        None => list(out,keyword.id.name(),&[])
                    },
                    FieldAlloc::Tag { keyword, name } => match name {
                        Some(name) => list(out,keyword.id.name(),&[name]),
                        None => list(out,keyword.id.name(),&[])
                    },
                    FieldAlloc::Org { keyword, offset } => match offset {
                        Some(offset) => list(out,keyword.id.name(),&[offset]),
                        None => list(out,keyword.id.name(),&[])
                    },
                    FieldAlloc::Nested(inst) => inst.write_sexp(out)
                }
                out.push(')');
            },
            Self::Member(member) => match &member.value {
                Some(value) => list(out,"member",&[&member.name,value]),
                None => list(out,"member",&[&member.name])
            }
        }
    }
}

impl ToSexp for Label {
    fn write_sexp(&self, out: &mut String) {
        if let Some(id) = &self.name {
            out.push_str(&id.name);
        }
        out.push(':');
    }
}

impl ToSexp for Line {
    fn write_sexp(&self, out: &mut String) {
        out.push_str("(line");
        if let Some(label) = &self.label {
            out.push(' ');
            label.write_sexp(out);
        }
        if let Some(stmt) = &self.stmt {
            out.push(' ');
            stmt.write_sexp(out);
        }
        if self.error.is_some() {
            out.push_str(" (ERROR)");
        }
        out.push(')');
    }
}

impl ToSexp for Program {
    fn write_sexp(&self, out: &mut String) {
        out.push_str("(program");
        for line in &self.lines {
            out.push(' ');
            line.write_sexp(out);
        }
        if self.unparsed.is_some() {
            out.push_str(" (unparsed)");
        }
        out.push(')');
    }
}

pub enum Navigation {
    /// descend into the block owned by this line, if any
    GotoChild,
    /// skip any block owned by this line
    GotoSibling,
    Exit
}

/// Walk the lines of a program in source order, including the lines inside blocks.
/// A block's terminator is visited after its body, at the same depth as the header.
pub trait Visit {
    fn visit(&mut self, line: &Line, depth: usize) -> Navigation;
    fn walk(&mut self, program: &Program) {
        walk_lines(self,&program.lines,0);
    }
}

/// returns false if the visitor asked to exit
fn walk_lines<V: Visit + ?Sized>(visitor: &mut V, lines: &[Line], depth: usize) -> bool {
    for line in lines {
        match visitor.visit(line,depth) {
            Navigation::Exit => return false,
            Navigation::GotoSibling => continue,
            Navigation::GotoChild => {
                if let Some(block) = line.block() {
                    if !walk_lines(visitor,&block.lines,depth+1) {
                        return false;
                    }
                    if let Some(close) = &block.close {
                        if let Navigation::Exit = visitor.visit(close,depth) {
                            return false;
                        }
                    }
                }
            }
        }
    }
    true
}
