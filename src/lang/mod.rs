//! # Language Module
//!
//! Generic utilities shared by language analyzers: the document type, settings helpers,
//! diagnostic construction and printing, and the `Analysis` trait used by the CLI.
//! Language specific operations such as parsing are in the submodules.

pub mod ca65;

use colored::*;
use thiserror::Error;
use std::io;
use std::io::Read;
use std::io::Write;
use atty;
use lsp_types as lsp;

use crate::{STDRESULT,DYNERR};

#[derive(Error,Debug)]
pub enum Error {
    #[error("Syntax error")]
    Syntax
}

/// Text of a source document, `name` is used only for display
#[derive(Clone)]
pub struct Document {
    pub name: String,
    pub version: Option<i32>,
    pub text: String
}

impl Document {
    pub fn new(name: &str, text: String) -> Self {
        Self {
            name: name.to_string(),
            version: None,
            text
        }
    }
    pub fn from_string(text: String, version: i32) -> Self {
        Self {
            name: "stdin".to_string(),
            version: Some(version),
            text
        }
    }
}

/// Try to update a severity from a serde `Value` presumed to be an object.
/// A null or `"ignore"` turns the check off.  If there is any error do not change the value.
pub fn update_json_severity(maybe_obj: &serde_json::Value, key: &str, curr: &mut Option<lsp::DiagnosticSeverity>) {
    if let Some(outer) = maybe_obj.as_object() {
        if let Some(x) = outer.get(key) {
            if x.is_null() {
                *curr = None;
                return;
            }
            match x.as_str() {
                Some("error") => *curr = Some(lsp::DiagnosticSeverity::ERROR),
                Some("warn") => *curr = Some(lsp::DiagnosticSeverity::WARNING),
                Some("info") => *curr = Some(lsp::DiagnosticSeverity::INFORMATION),
                Some("hint") => *curr = Some(lsp::DiagnosticSeverity::HINT),
                Some("ignore") => *curr = None,
                _ => {}
            }
        }
    }
}

/// Try to update an integer from a serde `Value` presumed to be an object.
/// If there is any error do not change the value.
pub fn update_json_i64(maybe_obj: &serde_json::Value, key: &str, curr: &mut i64) {
    if let Some(outer) = maybe_obj.as_object() {
        if let Some(x) = outer.get(key) {
            if let Some(val) = x.as_i64() {
                *curr = val;
            }
        }
    }
}

pub fn basic_diag(range: lsp::Range,mess: &str,severity: lsp::DiagnosticSeverity) -> lsp::Diagnostic {
    lsp::Diagnostic {
        range,
        severity: Some(severity),
        code: None,
        code_description: None,
        source: None,
        message: mess.to_string(),
        related_information: None,
        tags: None,
        data: None
    }
}

/// Print a diagnostic to stderr with the offending span highlighted.
/// The range is assumed to lie within one row, otherwise only the start row is shown.
pub fn eprint_diagnostic(diag: &lsp::Diagnostic, program: &str) {
    let range = diag.range;
    let line = match program.lines().nth(range.start.line as usize) {
        Some(l) => l,
        None => ""
    };
    let (label,color) = match diag.severity {
        Some(lsp::DiagnosticSeverity::ERROR) => ("ERROR",Color::Red),
        Some(lsp::DiagnosticSeverity::WARNING) => ("WARNING",Color::BrightYellow),
        Some(lsp::DiagnosticSeverity::INFORMATION) => ("INFO",Color::Blue),
        _ => ("HINT",Color::Cyan)
    };
    eprintln!("{} row {} col {}: {}",label.color(color),range.start.line+1,range.start.character+1,diag.message);
    let c1 = (range.start.character as usize).min(line.len());
    let c2 = match range.end.line==range.start.line {
        true => (range.end.character as usize).clamp(c1,line.len()),
        false => line.len()
    };
    eprintln!("    {}{}{}",
        line.get(0..c1).unwrap_or("???"),
        match line.get(c1..c2) { None => "???".normal(), Some(s) => s.color(color).bold() },
        line.get(c2..).unwrap_or("???"));
}

/// Accumulate lines typed at the console until `bye`
pub fn line_entry(prompt: &str) -> Result<String,DYNERR> {
    let mut code = String::new();
    eprintln!("Line entry interface.");
    eprintln!("This is a blind accumulation of lines.");
    eprintln!("Verify occurs when entry is terminated.");
    eprintln!("Accumulated lines can be piped.");
    eprintln!("`bye` terminates.");
    loop {
        eprint!("{} ",prompt);
        let mut line = String::new();
        io::stderr().flush()?;
        io::stdin().read_line(&mut line)?;
        if line=="bye\n" || line=="bye\r\n" || line.is_empty() {
            break;
        }
        code += &line;
    }
    Ok(code)
}

/// If stdin is the console start line entry, otherwise read the pipe into a string.
/// Input that is not UTF-8 is an error.
pub fn read_stdin_or_entry(prompt: &str) -> Result<String,DYNERR> {
    if atty::is(atty::Stream::Stdin) {
        return line_entry(prompt);
    }
    let mut code = String::new();
    io::stdin().read_to_string(&mut code)?;
    Ok(code)
}

/// This trait object serves the CLI subcommands, whether run from the console
/// or in a subprocess.
pub trait Analysis {
    /// Analyze a document to produce diagnostic and folding information.
    fn analyze(&mut self,doc: &Document) -> STDRESULT;
    /// Parse the JSON to update the configuration.
    /// Unknown keys or unexpected values can be handled as the analyzer chooses.
    fn update_config(&mut self,json_str: &str) -> STDRESULT;
    /// Get a clone of the diagnostics from the most recent analysis.
    fn get_diags(&self,doc: &Document) -> Vec<lsp::Diagnostic>;
    fn get_folds(&self,doc: &Document) -> Vec<lsp::FoldingRange>;
    fn err_warn_info_counts(&self) -> [usize;3];
    fn eprint_lines_sexpr(&self,doc: &str);
    /// If console start interactive entry, otherwise empty input pipe into string.
    fn read_stdin(&self) -> Result<String,DYNERR>;
}
