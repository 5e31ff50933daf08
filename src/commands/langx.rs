//! ## Language Analysis and Transformations

use clap::parser::ValueSource;
use colored::Colorize;
use serde::Serialize;
use super::CommandError;
use crate::lang;
use crate::lang::Analysis;
use crate::lang::ca65;
use crate::{STDRESULT,DYNERR};

/// Serialize with the given indentation, or minified if there is none
fn stringify<T: Serialize>(obj: &T, indent: Option<u16>) -> Result<String,DYNERR> {
    match indent {
        Some(spaces) => {
            let pad = " ".repeat(spaces as usize);
            let fmt = serde_json::ser::PrettyFormatter::with_indent(pad.as_bytes());
            let mut buf = Vec::new();
            let mut ser = serde_json::Serializer::with_formatter(&mut buf,fmt);
            obj.serialize(&mut ser)?;
            Ok(String::from_utf8(buf)?)
        },
        None => Ok(serde_json::to_string(obj)?)
    }
}

fn settings_from_cmd(cmd: &clap::ArgMatches) -> Result<ca65::settings::Settings,DYNERR> {
    match cmd.value_source("config") {
        Some(ValueSource::CommandLine) => ca65::settings::parse(cmd.get_one::<String>("config").unwrap()),
        _ => Ok(ca65::settings::Settings::new())
    }
}

pub fn verify(cmd: &clap::ArgMatches) -> STDRESULT {
    let mut analyzer: Box<dyn Analysis> = Box::new(ca65::diagnostics::Analyzer::new());
    if cmd.value_source("config").unwrap()==ValueSource::CommandLine {
        analyzer.update_config(cmd.get_one::<String>("config").unwrap())?;
    }
    let doc = lang::Document::from_string(analyzer.read_stdin()?,0);
    if doc.text.len()==0 {
        log::error!("verify was handed an empty string");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    if cmd.get_flag("sexpr") {
        analyzer.eprint_lines_sexpr(&doc.text);
    }
    analyzer.analyze(&doc)?;
    for diag in analyzer.get_diags(&doc) {
        lang::eprint_diagnostic(&diag,&doc.text);
    }
    let [err,warn,_info] = analyzer.err_warn_info_counts();
    if warn > 0 {
        eprintln!("! {} {}",warn.to_string().bright_yellow(),"warnings".bright_yellow());
    }
    if err==0 {
        eprintln!("\u{2713} {}","Passing".green());
        if !atty::is(atty::Stream::Stdout) {
            // if not the console, pipe the code to the next node
            print!("{}",doc.text);
        }
        return Ok(());
    } else {
        eprintln!("\u{2717} {} {}",err.to_string().red(),"errors".red());
        return Err(Box::new(lang::Error::Syntax));
    }
}

/// Write the tree and the errors as one JSON object.  Errors do not fail the command,
/// since they are part of the output.
pub fn parse(cmd: &clap::ArgMatches) -> STDRESULT {
    let text = lang::read_stdin_or_entry("\u{2771}")?;
    if text.len()==0 {
        log::error!("parse was handed an empty string");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let parsed = ca65::parse(&text);
    if parsed.errors.len() > 0 {
        log::warn!("source has {} errors",parsed.errors.len());
    }
    println!("{}",stringify(&parsed,cmd.get_one::<u16>("indent").copied())?);
    Ok(())
}

pub fn format(cmd: &clap::ArgMatches) -> STDRESULT {
    if atty::is(atty::Stream::Stdin) {
        log::error!("line entry is not supported for `format`, please pipe something in");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let settings = settings_from_cmd(cmd)?;
    let text = lang::read_stdin_or_entry("\u{2771}")?;
    let mut formatter = ca65::formatter::Formatter::new();
    formatter.set_config(&settings);
    print!("{}",formatter.format(&text));
    Ok(())
}
