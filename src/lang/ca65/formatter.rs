//! Module to format lines of ca65 code
//!
//! Lines are split into four columns (label, operation, arguments, comment) using the
//! spans in the syntax tree, then padded to the configured widths.  Lines that failed to
//! parse, and lines holding only a comment, are kept as written.

use log::trace;
use super::ast::*;
use super::lexer::Span;
use super::parser;
use super::settings::Settings;

/// Format the columns of one line.  A comment column is pushed out to the comment
/// position no matter which column it lands in.
pub fn format_tokens(cols: &[&str], widths: [usize;3]) -> String {
    let mut ans = String::new();
    for (col_idx,col) in cols.iter().enumerate() {
        let mut prepadding = 0;
        if col.starts_with(';') {
            for j in col_idx..3 {
                prepadding += widths[j];
            }
        }
        let w = match col_idx {
            i if i<3 => widths[i],
            _ => 1
        };
        let padding = match w as i32 - col.len() as i32 {
            x if x<1 => 1,
            x => x as usize
        };
        ans += &" ".repeat(prepadding);
        ans += col;
        ans += &" ".repeat(padding);
    }
    ans.trim_end().to_string()
}

/// Text of a span with any line terminator removed
fn text<'a>(src: &'a str, span: Span) -> &'a str {
    src.get(span.start..span.end).unwrap_or("").trim_end_matches(['\n','\r'])
}

/// Split a parsed line into its columns, or None if it should be kept verbatim
fn columns<'a>(src: &'a str, line: &Line) -> Option<Vec<&'a str>> {
    if line.error.is_some() || (line.label.is_none() && line.stmt.is_none()) {
        return None;
    }
    let label = line.label.as_ref().map_or("",|l| text(src,l.span));
    let (c1,c2) = match &line.stmt {
        Some(stmt) => {
            let span = stmt.span();
            let (head,c1) = match stmt {
                Statement::Symbol(def) => return Some(symbol_columns(src,def,line)),
                Statement::Instruction(Instruction::Cpu(inst)) => (inst.opcode.span,None),
                Statement::Instruction(Instruction::Macro(inst)) => (inst.name.span,None),
                Statement::Instruction(Instruction::Pseudo(inst)) => (inst.keyword.span,None),
                Statement::Field(field) => (field.keyword_span(),field.name.as_ref().map(|n| text(src,n.span))),
                Statement::Member(member) => (member.name.span,None)
            };
            let args = src.get(head.end..span.end).unwrap_or("").trim();
            match c1 {
                // a named field puts its name in the label column
                Some(name) => return Some(with_comment(src,line,vec![name,text(src,head),args])),
                None => (text(src,head),args)
            }
        },
        None => ("","")
    };
    Some(with_comment(src,line,vec![label,c1,c2]))
}

fn symbol_columns<'a>(src: &'a str, def: &SymbolDef, line: &Line) -> Vec<&'a str> {
    let expr = src.get(def.op.end..def.span.end).unwrap_or("").trim();
    with_comment(src,line,vec![text(src,def.name.span),text(src,def.op),expr])
}

fn with_comment<'a>(src: &'a str, line: &Line, mut cols: Vec<&'a str>) -> Vec<&'a str> {
    if let Some(comment) = &line.comment {
        while cols.len() > 1 && cols[cols.len()-1].is_empty() {
            cols.pop();
        }
        cols.push(text(src,comment.span));
    }
    cols
}

pub struct Formatter {
    widths: [usize;3]
}

struct LineCollector<'a> {
    src: &'a str,
    widths: [usize;3],
    out: Vec<String>
}

impl<'a> Visit for LineCollector<'a> {
    fn visit(&mut self, line: &Line, _depth: usize) -> Navigation {
        let formatted = match columns(self.src,line) {
            Some(cols) => format_tokens(&cols,self.widths),
            None => text(self.src,line.span).trim_end().to_string()
        };
        trace!("row {}: {}",line.row,formatted);
        self.out.push(formatted);
        Navigation::GotoChild
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {
            widths: [9,6,11]
        }
    }
    pub fn set_config(&mut self, settings: &Settings) {
        let c1: usize = settings.columns.c1.try_into().unwrap_or(9);
        let c2: usize = settings.columns.c2.try_into().unwrap_or(6);
        let c3: usize = settings.columns.c3.try_into().unwrap_or(11);
        self.widths = [c1,c2,c3];
    }
    /// Format a whole program.  Text after a fatal error is passed through unchanged.
    pub fn format(&self, src: &str) -> String {
        let parsed = parser::parse(src);
        let mut collector = LineCollector {
            src,
            widths: self.widths,
            out: Vec::new()
        };
        collector.walk(&parsed.program);
        let mut ans = collector.out.join("\n");
        if !ans.is_empty() && (src.ends_with('\n') || parsed.program.unparsed.is_some()) {
            ans.push('\n');
        }
        if let Some(rest) = parsed.program.unparsed {
            ans += src.get(rest.start..rest.end).unwrap_or("");
        }
        ans
    }
}

/// Concatenate the text of every line in source order.  For any parse this reproduces
/// the input exactly, which is how the span bookkeeping is tested.
pub fn reconstruct(src: &str, program: &Program) -> String {
    struct Spans<'a> {
        src: &'a str,
        out: String
    }
    impl<'a> Visit for Spans<'a> {
        fn visit(&mut self, line: &Line, _depth: usize) -> Navigation {
            self.out += self.src.get(line.span.start..line.span.end).unwrap_or("");
            Navigation::GotoChild
        }
    }
    let mut spans = Spans { src, out: String::new() };
    spans.walk(program);
    if let Some(rest) = program.unparsed {
        spans.out += src.get(rest.start..rest.end).unwrap_or("");
    }
    spans.out
}
