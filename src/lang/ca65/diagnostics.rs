//! ca65 diagnostics module.
//!
//! Converts parse errors to LSP diagnostics and runs the checks that need a finished
//! tree: addressing modes, register operands, and alternate keyword spellings.
//! Also produces folding ranges for blocks.  Used by the CLI.

use lsp_types::{Diagnostic,DiagnosticSeverity,FoldingRange,FoldingRangeKind};
use log::{info,trace};
use colored::*;
use crate::lang::{Document,Analysis,basic_diag,read_stdin_or_entry};
use crate::{STDRESULT,DYNERR};
use super::ast::*;
use super::lexer::{LineIndex,Span};
use super::keywords::{mode,Register};
use super::parser::{self,Parsed};
use super::settings::{self,Settings};
use super::lsp_range;

pub struct Analyzer {
    config: Settings,
    parsed: Option<Parsed>,
    diagnostics: Vec<Diagnostic>,
    folding_ranges: Vec<FoldingRange>
}

/// Walks the tree once, gathering the tree based diagnostics and folds
struct Sentry<'a> {
    config: &'a Settings,
    index: &'a LineIndex,
    diagnostics: Vec<Diagnostic>,
    folding_ranges: Vec<FoldingRange>
}

impl<'a> Sentry<'a> {
    fn push(&mut self, span: Span, mess: &str, severity: Option<DiagnosticSeverity>) {
        if let Some(severity) = severity {
            self.diagnostics.push(basic_diag(lsp_range(span,self.index),mess,severity));
        }
    }
    fn check_cpu(&mut self, inst: &CpuInst) {
        if let Some(Operand::Accumulator { reg }) = &inst.operand {
            if reg.reg!=Register::A && self.config.flag.register_operand.is_some() {
                let mess = format!("register `{}` cannot be an operand",reg.reg.name());
                self.push(reg.span,&mess,self.config.flag.register_operand);
                return;
            }
        }
        let (shape,name,span) = match &inst.operand {
            Some(op) => (op.mode(),op.mode_name(),inst.span),
            None => (mode::IMP,"implied",inst.opcode.span)
        };
        if shape & inst.opcode.mnemonic.legal_modes() == 0 {
            let mess = format!("`{}` does not support {} addressing",inst.opcode.mnemonic.name(),name);
            self.push(span,&mess,self.config.flag.address_mode);
        }
    }
    fn check_alias(&mut self, keyword: &KeywordTok) {
        if keyword.id.is_alias(&keyword.text) {
            let mess = format!("`{}` is an alias of `{}`",keyword.text,keyword.id.name());
            self.push(keyword.span,&mess,self.config.flag.keyword_alias);
        }
    }
}

impl<'a> Visit for Sentry<'a> {
    fn visit(&mut self, line: &Line, _depth: usize) -> Navigation {
        trace!("check row {}",line.row);
        match &line.stmt {
            Some(Statement::Instruction(Instruction::Cpu(inst))) => self.check_cpu(inst),
            Some(stmt) => {
                if let Some(pseudo) = stmt.pseudo() {
                    self.check_alias(&pseudo.keyword);
                }
                if let Statement::Field(StructField { alloc: FieldAlloc::Storage { keyword, .. } | FieldAlloc::Tag { keyword, .. } | FieldAlloc::Org { keyword, .. }, .. }) = stmt {
                    self.check_alias(keyword);
                }
            },
            None => {}
        }
        if let Some(block) = line.block() {
            if let Some(close) = &block.close {
                if close.row > line.row {
                    let mut fold = FoldingRange {
                        start_line: line.row,
                        start_character: None,
                        end_line: close.row,
                        end_character: None,
                        kind: Some(FoldingRangeKind::Region),
                        collapsed_text: None
                    };
                    if let Some(Statement::Instruction(Instruction::Pseudo(p))) = &line.stmt {
                        fold.collapsed_text = Some(p.keyword.id.name().to_string());
                    }
                    self.folding_ranges.push(fold);
                }
            }
        }
        Navigation::GotoChild
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            config: Settings::new(),
            parsed: None,
            diagnostics: Vec::new(),
            folding_ranges: Vec::new()
        }
    }
    pub fn set_config(&mut self, config: Settings) {
        self.config = config;
    }
    /// Tree from the most recent analysis
    pub fn program(&self) -> Option<&Program> {
        self.parsed.as_ref().map(|p| &p.program)
    }
}

impl Analysis for Analyzer {
    fn analyze(&mut self, doc: &Document) -> STDRESULT {
        info!("analyzing {}",doc.name);
        let index = LineIndex::new(&doc.text);
        let parsed = parser::parse(&doc.text);
        self.diagnostics = parsed.errors.iter()
            .map(|e| basic_diag(lsp_range(e.span,&index),&e.message,DiagnosticSeverity::ERROR))
            .collect();
        let mut sentry = Sentry {
            config: &self.config,
            index: &index,
            diagnostics: Vec::new(),
            folding_ranges: Vec::new()
        };
        sentry.walk(&parsed.program);
        self.diagnostics.append(&mut sentry.diagnostics);
        self.folding_ranges = sentry.folding_ranges;
        self.diagnostics.sort_by_key(|d| (d.range.start.line,d.range.start.character));
        info!("found {} diagnostics",self.diagnostics.len());
        self.parsed = Some(parsed);
        Ok(())
    }
    fn update_config(&mut self, json_str: &str) -> STDRESULT {
        self.set_config(settings::parse(json_str)?);
        Ok(())
    }
    fn get_diags(&self, _doc: &Document) -> Vec<Diagnostic> {
        self.diagnostics.clone()
    }
    fn get_folds(&self, _doc: &Document) -> Vec<FoldingRange> {
        self.folding_ranges.clone()
    }
    fn err_warn_info_counts(&self) -> [usize;3] {
        let mut err = 0;
        let mut warn = 0;
        let mut info = 0;
        for diag in &self.diagnostics {
            match diag.severity {
                Some(DiagnosticSeverity::ERROR) => err += 1,
                Some(DiagnosticSeverity::WARNING) => warn += 1,
                _ => info += 1
            }
        }
        [err,warn,info]
    }
    fn eprint_lines_sexpr(&self, doc: &str) {
        let parsed = parser::parse(doc);
        for line in &parsed.program.lines {
            let text = doc.get(line.span.start..line.span.end).unwrap_or("???");
            eprintln!("{}",text.trim_end());
            eprintln!("{}",line.to_sexp().dimmed());
        }
        if let Some(rest) = parsed.program.unparsed {
            eprintln!("{} {}","unparsed from byte".red(),rest.start);
        }
    }
    fn read_stdin(&self) -> Result<String,DYNERR> {
        read_stdin_or_entry("\u{2771}")
    }
}
