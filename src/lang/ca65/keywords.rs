//! Keyword and opcode tables
//!
//! Dot keywords are looked up case insensitively.  Every keyword has one canonical
//! spelling, which is the first entry for that keyword in `DOT_KEYWORDS`; the remaining
//! entries are aliases.  The table also assigns each directive the argument shape
//! that the dispatcher uses to pick a sub-parser.

use serde::{Serialize,Serializer};

/// Canonical identity of a dot keyword.  This covers directives, pseudo-functions,
/// pseudo-variables, and the dotted operator spellings.
#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash)]
pub enum Keyword {
    // directives
    A16, A8, Addr, Align, Asciiz, Assert, Autoimport, Bankbytes, Bss, Byte, Case, Charmap,
    Code, Condes, Constructor, Data, Dbyt, Debuginfo, Define, Delmacro, Destructor, Dword,
    Else, Elseif, End, Endenum, Endif, Endmacro, Endproc, Endrepeat, Endscope, Endstruct,
    Endunion, Enum, Error, Exitmacro, Export, Exportzp, Faraddr, Fatal, Feature, Fileopt,
    Forceimport, Global, Globalzp, Hibytes, I16, I8, If, Ifblank, Ifconst, Ifdef, Ifnblank,
    Ifndef, Ifnref, Ifp02, Ifp02x, Ifp45gs02, Ifp816, Ifp4510, Ifp6280, Ifpc02, Ifpce02,
    Ifpdtv, Ifpm740, Ifpsc02, Ifpsweet16, Ifref, Ifpwc02, Import, Importzp, Incbin, Include,
    Interruptor, List, Listbytes, Literal, Lobytes, Local, Localchar, Macpack, Macro, Org,
    Out, P02, P02x, P4510, P45gs02, P6280, P816, Pagelength, Pc02, Pce02, Pdtv, Pm740,
    Popcharmap, Popcpu, Popseg, Proc, Psc02, Psweet16, Pushcharmap, Pushcpu, Pushseg, Pwc02,
    Referto, Reloc, Repeat, Res, Rodata, Scope, Segment, Set, Setcpu, Smart, Struct, Tag,
    Undefine, Union, Warning, Word, Zeropage,
    // pseudo-functions
    Addrsize, Bank, Bankbyte, Blank, Capability, Concat, Const, Defined, Definedmacro,
    Hibyte, Hiword, Ident, Ismnemonic, Left, Lobyte, Loword, Match, Max, Mid, Min,
    Referenced, Right, Sizeof, Sprintf, Start, String, Strlen, Tcount, Xmatch,
    // pseudo-variables
    Asize, Cpu, Isize, Paramcount, Time, Version,
    // operators
    Mod, Bitand, Bitxor, Shl, Shr, Bitor, And, Or, Xor
}

#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum KeywordClass {
    Directive,
    Function,
    Variable,
    Operator
}

/// Kinds of block directives, each closed by exactly one terminator
#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize)]
#[serde(rename_all="snake_case")]
pub enum BlockKind {
    Struct,
    Union,
    Enum,
    Macro,
    Repeat,
    Proc,
    Scope,
    If
}

/// Argument shape of a directive, used to pick the sub-parser
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum Shape {
    /// keyword alone
    Bare,
    /// one or more comma separated expressions
    ExprList,
    /// comma separated symbols, optionally with address size and/or assignment
    SymbolList { spec: bool, assign: bool },
    /// `+`, `-`, `on`, `off`
    Toggle,
    /// one string literal
    Message,
    /// opens a block
    Block(BlockKind),
    /// closes a block
    Close(BlockKind),
    /// `.else` and `.elseif`, only inside a conditional block
    Branch,
    /// has a grammar of its own
    Special,
    /// not usable at the start of a statement
    NotDirective
}

const DOT_KEYWORDS: &[(&str,Keyword)] = &[
    (".a16",Keyword::A16),
    (".a8",Keyword::A8),
    (".addr",Keyword::Addr),
    (".align",Keyword::Align),
    (".asciiz",Keyword::Asciiz),
    (".assert",Keyword::Assert),
    (".autoimport",Keyword::Autoimport),
    (".bankbytes",Keyword::Bankbytes),
    (".bss",Keyword::Bss),
    (".byte",Keyword::Byte),
    (".byt",Keyword::Byte),
    (".case",Keyword::Case),
    (".charmap",Keyword::Charmap),
    (".code",Keyword::Code),
    (".condes",Keyword::Condes),
    (".constructor",Keyword::Constructor),
    (".data",Keyword::Data),
    (".dbyt",Keyword::Dbyt),
    (".debuginfo",Keyword::Debuginfo),
    (".define",Keyword::Define),
    (".delmacro",Keyword::Delmacro),
    (".delmac",Keyword::Delmacro),
    (".destructor",Keyword::Destructor),
    (".dword",Keyword::Dword),
    (".else",Keyword::Else),
    (".elseif",Keyword::Elseif),
    (".end",Keyword::End),
    (".endenum",Keyword::Endenum),
    (".endif",Keyword::Endif),
    (".endmacro",Keyword::Endmacro),
    (".endmac",Keyword::Endmacro),
    (".endproc",Keyword::Endproc),
    (".endrepeat",Keyword::Endrepeat),
    (".endrep",Keyword::Endrepeat),
    (".endscope",Keyword::Endscope),
    (".endstruct",Keyword::Endstruct),
    (".endunion",Keyword::Endunion),
    (".enum",Keyword::Enum),
    (".error",Keyword::Error),
    (".exitmacro",Keyword::Exitmacro),
    (".exitmac",Keyword::Exitmacro),
    (".export",Keyword::Export),
    (".exportzp",Keyword::Exportzp),
    (".faraddr",Keyword::Faraddr),
    (".fatal",Keyword::Fatal),
    (".feature",Keyword::Feature),
    (".fileopt",Keyword::Fileopt),
    (".fopt",Keyword::Fileopt),
    (".forceimport",Keyword::Forceimport),
    (".global",Keyword::Global),
    (".globalzp",Keyword::Globalzp),
    (".hibytes",Keyword::Hibytes),
    (".i16",Keyword::I16),
    (".i8",Keyword::I8),
    (".if",Keyword::If),
    (".ifblank",Keyword::Ifblank),
    (".ifconst",Keyword::Ifconst),
    (".ifdef",Keyword::Ifdef),
    (".ifnblank",Keyword::Ifnblank),
    (".ifndef",Keyword::Ifndef),
    (".ifnref",Keyword::Ifnref),
    (".ifp02",Keyword::Ifp02),
    (".ifp02x",Keyword::Ifp02x),
    (".ifp45gs02",Keyword::Ifp45gs02),
    (".ifp816",Keyword::Ifp816),
    (".ifp4510",Keyword::Ifp4510),
    (".ifp6280",Keyword::Ifp6280),
    (".ifpc02",Keyword::Ifpc02),
    (".ifpce02",Keyword::Ifpce02),
    (".ifpdtv",Keyword::Ifpdtv),
    (".ifpm740",Keyword::Ifpm740),
    (".ifpsc02",Keyword::Ifpsc02),
    (".ifpsweet16",Keyword::Ifpsweet16),
    (".ifref",Keyword::Ifref),
    (".ifpwc02",Keyword::Ifpwc02),
    (".import",Keyword::Import),
    (".importzp",Keyword::Importzp),
    (".incbin",Keyword::Incbin),
    (".include",Keyword::Include),
    (".interruptor",Keyword::Interruptor),
    (".list",Keyword::List),
    (".listbytes",Keyword::Listbytes),
    (".literal",Keyword::Literal),
    (".lobytes",Keyword::Lobytes),
    (".local",Keyword::Local),
    (".localchar",Keyword::Localchar),
    (".macpack",Keyword::Macpack),
    (".macro",Keyword::Macro),
    (".mac",Keyword::Macro),
    (".org",Keyword::Org),
    (".out",Keyword::Out),
    (".p02",Keyword::P02),
    (".p02x",Keyword::P02x),
    (".p4510",Keyword::P4510),
    (".p45gs02",Keyword::P45gs02),
    (".p6280",Keyword::P6280),
    (".p816",Keyword::P816),
    (".pagelength",Keyword::Pagelength),
    (".pc02",Keyword::Pc02),
    (".pce02",Keyword::Pce02),
    (".pdtv",Keyword::Pdtv),
    (".pm740",Keyword::Pm740),
    (".popcharmap",Keyword::Popcharmap),
    (".popcpu",Keyword::Popcpu),
    (".popseg",Keyword::Popseg),
    (".proc",Keyword::Proc),
    (".psc02",Keyword::Psc02),
    (".psweet16",Keyword::Psweet16),
    (".pushcharmap",Keyword::Pushcharmap),
    (".pushcpu",Keyword::Pushcpu),
    (".pushseg",Keyword::Pushseg),
    (".pwc02",Keyword::Pwc02),
    (".referto",Keyword::Referto),
    (".refto",Keyword::Referto),
    (".reloc",Keyword::Reloc),
    (".repeat",Keyword::Repeat),
    (".res",Keyword::Res),
    (".rodata",Keyword::Rodata),
    (".scope",Keyword::Scope),
    (".segment",Keyword::Segment),
    (".set",Keyword::Set),
    (".setcpu",Keyword::Setcpu),
    (".smart",Keyword::Smart),
    (".struct",Keyword::Struct),
    (".tag",Keyword::Tag),
    (".undefine",Keyword::Undefine),
    (".undef",Keyword::Undefine),
    (".union",Keyword::Union),
    (".warning",Keyword::Warning),
    (".word",Keyword::Word),
    (".zeropage",Keyword::Zeropage),
    (".addrsize",Keyword::Addrsize),
    (".bank",Keyword::Bank),
    (".bankbyte",Keyword::Bankbyte),
    (".blank",Keyword::Blank),
    (".capability",Keyword::Capability),
    (".cap",Keyword::Capability),
    (".concat",Keyword::Concat),
    (".const",Keyword::Const),
    (".defined",Keyword::Defined),
    (".def",Keyword::Defined),
    (".definedmacro",Keyword::Definedmacro),
    (".hibyte",Keyword::Hibyte),
    (".hiword",Keyword::Hiword),
    (".ident",Keyword::Ident),
    (".ismnemonic",Keyword::Ismnemonic),
    (".ismnem",Keyword::Ismnemonic),
    (".left",Keyword::Left),
    (".lobyte",Keyword::Lobyte),
    (".loword",Keyword::Loword),
    (".match",Keyword::Match),
    (".max",Keyword::Max),
    (".mid",Keyword::Mid),
    (".min",Keyword::Min),
    (".referenced",Keyword::Referenced),
    (".ref",Keyword::Referenced),
    (".right",Keyword::Right),
    (".sizeof",Keyword::Sizeof),
    (".sprintf",Keyword::Sprintf),
    (".start",Keyword::Start),
    (".string",Keyword::String),
    (".strlen",Keyword::Strlen),
    (".tcount",Keyword::Tcount),
    (".xmatch",Keyword::Xmatch),
    (".asize",Keyword::Asize),
    (".cpu",Keyword::Cpu),
    (".isize",Keyword::Isize),
    (".paramcount",Keyword::Paramcount),
    (".time",Keyword::Time),
    (".version",Keyword::Version),
    (".mod",Keyword::Mod),
    (".bitand",Keyword::Bitand),
    (".bitxor",Keyword::Bitxor),
    (".shl",Keyword::Shl),
    (".shr",Keyword::Shr),
    (".bitor",Keyword::Bitor),
    (".and",Keyword::And),
    (".or",Keyword::Or),
    (".xor",Keyword::Xor)
];

/// Address size specifiers accepted after `name:` in symbol lists, `.proc`, `.scope`, `.segment`
pub const ADDR_SPECS: [&str;10] = ["abs","absolute","default","direct","dword","far","long","near","zeropage","zp"];
pub const ASSERT_ACTIONS: [&str;4] = ["warning","error","ldwarning","lderror"];
pub const CONDES_TYPES: [&str;3] = ["constructor","destructor","interruptor"];
pub const FILEOPT_NAMES: [&str;3] = ["author","comment","compiler"];
pub const MACPACK_NAMES: [&str;4] = ["atari","cbm","generic","longbranch"];
pub const CAPABILITIES: [&str;6] = ["cpu_has_bitimm","cpu_has_brab","cpu_has_ina","cpu_has_pushxy","cpu_has_zpind","cpu_has_stz"];
pub const FEATURES: [&str;18] = [
    "at_in_identifiers",
    "bracket_as_indirect",
    "c_comment",
    "dollar_in_identifiers",
    "dollar_is_pc",
    "force_range",
    "labels_without_colons",
    "leading_dot_in_identifiers",
    "line_continuations",
    "long_jsr_jmp_rts",
    "loose_char_term",
    "loose_string_term",
    "missing_char_term",
    "org_per_seg",
    "pc_assignment",
    "string_escapes",
    "ubiquitous_idents",
    "underline_in_numbers"
];

impl Keyword {
    /// Find the keyword for a spelling such as `.BYT`, case is ignored
    pub fn lookup(spelling: &str) -> Option<Keyword> {
        DOT_KEYWORDS.iter()
            .find(|(s,_)| s.eq_ignore_ascii_case(spelling))
            .map(|(_,k)| *k)
    }
    /// Canonical lower case spelling, including the dot
    pub fn name(&self) -> &'static str {
        match DOT_KEYWORDS.iter().find(|(_,k)| k==self) {
            Some((s,_)) => s,
            None => unreachable!("keyword missing from table")
        }
    }
    /// True if `spelling` is an alternate spelling rather than the canonical one
    pub fn is_alias(&self,spelling: &str) -> bool {
        !self.name().eq_ignore_ascii_case(spelling)
    }
    pub fn class(&self) -> KeywordClass {
        match self {
            Self::Addrsize | Self::Bank | Self::Bankbyte | Self::Blank | Self::Capability |
            Self::Concat | Self::Const | Self::Defined | Self::Definedmacro | Self::Hibyte |
            Self::Hiword | Self::Ident | Self::Ismnemonic | Self::Left | Self::Lobyte |
            Self::Loword | Self::Match | Self::Max | Self::Mid | Self::Min | Self::Referenced |
            Self::Right | Self::Sizeof | Self::Sprintf | Self::Start | Self::String |
            Self::Strlen | Self::Tcount | Self::Xmatch => KeywordClass::Function,
            Self::Asize | Self::Cpu | Self::Isize | Self::Paramcount | Self::Time |
            Self::Version => KeywordClass::Variable,
            Self::Mod | Self::Bitand | Self::Bitxor | Self::Shl | Self::Shr | Self::Bitor |
            Self::And | Self::Or | Self::Xor => KeywordClass::Operator,
            _ => KeywordClass::Directive
        }
    }
    /// The argument shape of a directive
    pub fn shape(&self) -> Shape {
        match self {
            Self::A16 | Self::A8 | Self::Bss | Self::Code | Self::Data | Self::End |
            Self::Exitmacro | Self::I16 | Self::I8 | Self::P02 | Self::P02x | Self::P4510 |
            Self::P45gs02 | Self::P6280 | Self::P816 | Self::Pc02 | Self::Pce02 | Self::Pdtv |
            Self::Pm740 | Self::Popcharmap | Self::Popcpu | Self::Popseg | Self::Psc02 |
            Self::Psweet16 | Self::Pushcharmap | Self::Pushcpu | Self::Pushseg | Self::Pwc02 |
            Self::Reloc | Self::Rodata | Self::Zeropage => Shape::Bare,
            Self::Addr | Self::Bankbytes | Self::Byte | Self::Dbyt | Self::Dword | Self::Faraddr |
            Self::Hibytes | Self::Literal | Self::Lobytes | Self::Word => Shape::ExprList,
            Self::Export | Self::Exportzp => Shape::SymbolList { spec: true, assign: true },
            Self::Import | Self::Importzp => Shape::SymbolList { spec: true, assign: false },
            Self::Forceimport | Self::Global | Self::Globalzp | Self::Local => Shape::SymbolList { spec: false, assign: false },
            Self::Autoimport | Self::Case | Self::Debuginfo | Self::List | Self::Smart => Shape::Toggle,
            Self::Error | Self::Fatal | Self::Out | Self::Warning => Shape::Message,
            Self::Struct => Shape::Block(BlockKind::Struct),
            Self::Union => Shape::Block(BlockKind::Union),
            Self::Enum => Shape::Block(BlockKind::Enum),
            Self::Macro => Shape::Block(BlockKind::Macro),
            Self::Repeat => Shape::Block(BlockKind::Repeat),
            Self::Proc => Shape::Block(BlockKind::Proc),
            Self::Scope => Shape::Block(BlockKind::Scope),
            Self::If | Self::Ifblank | Self::Ifconst | Self::Ifdef | Self::Ifnblank | Self::Ifndef |
            Self::Ifnref | Self::Ifref | Self::Ifp02 | Self::Ifp02x | Self::Ifp45gs02 | Self::Ifp816 |
            Self::Ifp4510 | Self::Ifp6280 | Self::Ifpc02 | Self::Ifpce02 | Self::Ifpdtv |
            Self::Ifpm740 | Self::Ifpsc02 | Self::Ifpsweet16 | Self::Ifpwc02 => Shape::Block(BlockKind::If),
            Self::Endstruct => Shape::Close(BlockKind::Struct),
            Self::Endunion => Shape::Close(BlockKind::Union),
            Self::Endenum => Shape::Close(BlockKind::Enum),
            Self::Endmacro => Shape::Close(BlockKind::Macro),
            Self::Endrepeat => Shape::Close(BlockKind::Repeat),
            Self::Endproc => Shape::Close(BlockKind::Proc),
            Self::Endscope => Shape::Close(BlockKind::Scope),
            Self::Endif => Shape::Close(BlockKind::If),
            Self::Else | Self::Elseif => Shape::Branch,
            Self::Align | Self::Asciiz | Self::Assert | Self::Charmap | Self::Condes |
            Self::Constructor | Self::Destructor | Self::Interruptor | Self::Define |
            Self::Delmacro | Self::Feature | Self::Fileopt | Self::Incbin | Self::Include |
            Self::Listbytes | Self::Localchar | Self::Macpack | Self::Org | Self::Pagelength |
            Self::Referto | Self::Res | Self::Segment | Self::Setcpu | Self::Tag |
            Self::Undefine => Shape::Special,
            _ => Shape::NotDirective
        }
    }
}

impl BlockKind {
    /// The keyword that must close this block
    pub fn terminator(&self) -> Keyword {
        match self {
            Self::Struct => Keyword::Endstruct,
            Self::Union => Keyword::Endunion,
            Self::Enum => Keyword::Endenum,
            Self::Macro => Keyword::Endmacro,
            Self::Repeat => Keyword::Endrepeat,
            Self::Proc => Keyword::Endproc,
            Self::Scope => Keyword::Endscope,
            Self::If => Keyword::Endif
        }
    }
}

impl Serialize for Keyword {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Addressing mode bits used in the opcode legality table
pub mod mode {
    /// no operand
    pub const IMP: u16 = 0x001;
    /// `#expr`
    pub const IMM: u16 = 0x002;
    /// `a`
    pub const ACC: u16 = 0x004;
    /// `expr`, covers zero page and relative branches
    pub const ABS: u16 = 0x008;
    /// `expr,x`
    pub const ABX: u16 = 0x010;
    /// `expr,y`
    pub const ABY: u16 = 0x020;
    /// `(expr)`
    pub const IND: u16 = 0x040;
    /// `(expr,x)`
    pub const IZX: u16 = 0x080;
    /// `(expr),y`
    pub const IZY: u16 = 0x100;
}

/// The 56 canonical 6502 mnemonics
#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash)]
pub enum Mnemonic {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc,
    Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp,
    Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti,
    Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya
}

const ALU: u16 = mode::IMM | mode::ABS | mode::ABX | mode::ABY | mode::IZX | mode::IZY;
const SHIFT: u16 = mode::IMP | mode::ACC | mode::ABS | mode::ABX;
const BRANCH: u16 = mode::ABS;

const MNEMONICS: [(&str,Mnemonic,u16);56] = [
    ("adc",Mnemonic::Adc,ALU),
    ("and",Mnemonic::And,ALU),
    ("asl",Mnemonic::Asl,SHIFT),
    ("bcc",Mnemonic::Bcc,BRANCH),
    ("bcs",Mnemonic::Bcs,BRANCH),
    ("beq",Mnemonic::Beq,BRANCH),
    ("bit",Mnemonic::Bit,mode::ABS),
    ("bmi",Mnemonic::Bmi,BRANCH),
    ("bne",Mnemonic::Bne,BRANCH),
    ("bpl",Mnemonic::Bpl,BRANCH),
    ("brk",Mnemonic::Brk,mode::IMP),
    ("bvc",Mnemonic::Bvc,BRANCH),
    ("bvs",Mnemonic::Bvs,BRANCH),
    ("clc",Mnemonic::Clc,mode::IMP),
    ("cld",Mnemonic::Cld,mode::IMP),
    ("cli",Mnemonic::Cli,mode::IMP),
    ("clv",Mnemonic::Clv,mode::IMP),
    ("cmp",Mnemonic::Cmp,ALU),
    ("cpx",Mnemonic::Cpx,mode::IMM | mode::ABS),
    ("cpy",Mnemonic::Cpy,mode::IMM | mode::ABS),
    ("dec",Mnemonic::Dec,mode::ABS | mode::ABX),
    ("dex",Mnemonic::Dex,mode::IMP),
    ("dey",Mnemonic::Dey,mode::IMP),
    ("eor",Mnemonic::Eor,ALU),
    ("inc",Mnemonic::Inc,mode::ABS | mode::ABX),
    ("inx",Mnemonic::Inx,mode::IMP),
    ("iny",Mnemonic::Iny,mode::IMP),
    ("jmp",Mnemonic::Jmp,mode::ABS | mode::IND),
    ("jsr",Mnemonic::Jsr,mode::ABS),
    ("lda",Mnemonic::Lda,ALU),
    ("ldx",Mnemonic::Ldx,mode::IMM | mode::ABS | mode::ABY),
    ("ldy",Mnemonic::Ldy,mode::IMM | mode::ABS | mode::ABX),
    ("lsr",Mnemonic::Lsr,SHIFT),
    ("nop",Mnemonic::Nop,mode::IMP),
    ("ora",Mnemonic::Ora,ALU),
    ("pha",Mnemonic::Pha,mode::IMP),
    ("php",Mnemonic::Php,mode::IMP),
    ("pla",Mnemonic::Pla,mode::IMP),
    ("plp",Mnemonic::Plp,mode::IMP),
    ("rol",Mnemonic::Rol,SHIFT),
    ("ror",Mnemonic::Ror,SHIFT),
    ("rti",Mnemonic::Rti,mode::IMP),
    ("rts",Mnemonic::Rts,mode::IMP),
    ("sbc",Mnemonic::Sbc,ALU),
    ("sec",Mnemonic::Sec,mode::IMP),
    ("sed",Mnemonic::Sed,mode::IMP),
    ("sei",Mnemonic::Sei,mode::IMP),
    ("sta",Mnemonic::Sta,ALU & !mode::IMM),
    ("stx",Mnemonic::Stx,mode::ABS | mode::ABY),
    ("sty",Mnemonic::Sty,mode::ABS | mode::ABX),
    ("tax",Mnemonic::Tax,mode::IMP),
    ("tay",Mnemonic::Tay,mode::IMP),
    ("tsx",Mnemonic::Tsx,mode::IMP),
    ("txa",Mnemonic::Txa,mode::IMP),
    ("txs",Mnemonic::Txs,mode::IMP),
    ("tya",Mnemonic::Tya,mode::IMP)
];

impl Mnemonic {
    pub fn lookup(spelling: &str) -> Option<Mnemonic> {
        MNEMONICS.iter()
            .find(|(s,_,_)| s.eq_ignore_ascii_case(spelling))
            .map(|(_,m,_)| *m)
    }
    pub fn name(&self) -> &'static str {
        MNEMONICS[*self as usize].0
    }
    /// Bit set of the addressing modes the real processor accepts, see `mode`
    pub fn legal_modes(&self) -> u16 {
        MNEMONICS[*self as usize].2
    }
}

impl Serialize for Mnemonic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize)]
#[serde(rename_all="lowercase")]
pub enum Register {
    A,
    X,
    Y
}

impl Register {
    pub fn lookup(spelling: &str) -> Option<Register> {
        match spelling.to_lowercase().as_str() {
            "a" => Some(Self::A),
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            _ => None
        }
    }
    pub fn name(&self) -> &'static str {
        match self {
            Self::A => "a",
            Self::X => "x",
            Self::Y => "y"
        }
    }
}
