//! Parse settings string sent by any client.
//!
//! Unknown keys are ignored and values of the wrong type leave the default in place.

use serde_json;
use crate::DYNERR;
use crate::lang::{update_json_i64,update_json_severity};
use lsp_types::DiagnosticSeverity;

#[derive(Clone)]
pub struct Flag {
    /// opcode used with an addressing mode it does not support
    pub address_mode: Option<DiagnosticSeverity>,
    /// `x` or `y` written where only the accumulator makes sense
    pub register_operand: Option<DiagnosticSeverity>,
    /// keyword written with an alternate spelling
    pub keyword_alias: Option<DiagnosticSeverity>
}
#[derive(Clone)]
pub struct Columns {
    pub c1: i64,
    pub c2: i64,
    pub c3: i64
}
#[derive(Clone)]
pub struct Settings {
    pub flag: Flag,
    pub columns: Columns
}

impl Settings {
    pub fn new() -> Self {
        Self {
            flag: Flag {
                address_mode: Some(DiagnosticSeverity::ERROR),
                register_operand: Some(DiagnosticSeverity::ERROR),
                keyword_alias: None
            },
            columns: Columns {
                c1: 9,
                c2: 6,
                c3: 11
            }
        }
    }
}

pub fn parse(json: &str) -> Result<Settings,DYNERR> {
    let mut ans = Settings::new();
    if let Ok(root) = serde_json::from_str::<serde_json::Value>(json) {
        if let Some(obj) = root.as_object() {
            for (key,val) in obj {
                match key.as_str() {
                    "flag" => {
                        update_json_severity(val,"addressMode",&mut ans.flag.address_mode);
                        update_json_severity(val,"registerOperand",&mut ans.flag.register_operand);
                        update_json_severity(val,"keywordAlias",&mut ans.flag.keyword_alias);
                    },
                    "columns" => {
                        update_json_i64(val,"c1",&mut ans.columns.c1);
                        update_json_i64(val,"c2",&mut ans.columns.c2);
                        update_json_i64(val,"c3",&mut ans.columns.c3);
                    },
                    _ => {}
                }
            }
        }
    }
    Ok(ans)
}
