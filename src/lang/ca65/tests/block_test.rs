//! Test of block structure, error recovery, and whole program properties.

use regex::Regex;
use super::super::parse;
use super::super::ast::*;
use super::super::formatter::reconstruct;

#[cfg(test)]
fn test_program(code: &str, expected: &str) {
    let parsed = parse(code);
    assert!(parsed.errors.is_empty(),"unexpected errors {:?}",parsed.errors);
    assert_eq!(parsed.program.to_sexp(),expected);
}

/// Check the tree and every error, given as (row, col, message pattern)
#[cfg(test)]
fn test_errors(code: &str, expected_tree: &str, expected_errors: &[(u32,u32,&str)]) {
    let parsed = parse(code);
    assert_eq!(parsed.program.to_sexp(),expected_tree);
    assert_eq!(parsed.errors.len(),expected_errors.len(),"errors {:?}",parsed.errors);
    for i in 0..expected_errors.len() {
        let (row,col,mess) = expected_errors[i];
        let patt = Regex::new(mess).expect("bad regex");
        assert!(patt.is_match(&parsed.errors[i].message),"message was `{}`",parsed.errors[i].message);
        assert_eq!(parsed.errors[i].pos.row,row);
        assert_eq!(parsed.errors[i].pos.col,col);
    }
}

mod lines {
    #[test]
    fn label_and_instructions() {
        super::test_program("L: lda #$10\n sta $2000,x\n","(program (line L: (lda (imm 16))) (line (sta (abs_x 8192))))");
    }
    #[test]
    fn blank_and_comment_lines() {
        super::test_program("\n; note\n nop\n","(program (line) (line) (line (nop)))");
    }
    #[test]
    fn no_final_newline() {
        super::test_program(" nop\n rts","(program (line (nop)) (line (rts)))");
    }
    #[test]
    fn crlf() {
        super::test_program(" nop\r\n rts\r\n","(program (line (nop)) (line (rts)))");
    }
    #[test]
    fn empty_source() {
        super::test_program("","(program)");
    }
    #[test]
    fn line_spans() {
        let code = "a: nop\n\n rts";
        let parsed = super::parse(code);
        let spans: Vec<(usize,usize)> = parsed.program.lines.iter().map(|l| (l.span.start,l.span.end)).collect();
        assert_eq!(spans,vec![(0,7),(7,8),(8,12)]);
        let rows: Vec<u32> = parsed.program.lines.iter().map(|l| l.row).collect();
        assert_eq!(rows,vec![0,1,2]);
    }
}

mod blocks {
    #[test]
    fn proc() {
        super::test_program(".proc main\n lda #1\n.endproc\n",
            "(program (line (.proc name: main (line (lda (imm 1))) (line (.endproc)))))");
    }
    #[test]
    fn proc_with_label_and_spec() {
        super::test_program(".proc reset: far\n rts\n.endproc\n",
            "(program (line (.proc name: reset spec: far (line (rts)) (line (.endproc)))))");
    }
    #[test]
    fn anonymous_scope() {
        super::test_program(".scope\n nop\n.endscope\n",
            "(program (line (.scope (line (nop)) (line (.endscope)))))");
    }
    #[test]
    fn conditional_with_else() {
        super::test_program(".if DEBUG\n nop\n.else\n rts\n.endif\n",
            "(program (line (.if DEBUG (line (nop)) (line (.else)) (line (rts)) (line (.endif)))))");
    }
    #[test]
    fn elseif_and_ifdef() {
        super::test_program(".ifdef A\n.elseif B > 1\n.endif\n",
            "(program (line (.ifdef A (line (.elseif cond: (> B 1))) (line (.endif)))))");
    }
    #[test]
    fn ifblank() {
        super::test_program(".ifblank\n.endif\n.ifnblank arg\n.endif\n",
            "(program (line (.ifblank (line (.endif)))) (line (.ifnblank tokens: [arg] (line (.endif)))))");
    }
    #[test]
    fn cpu_conditional() {
        super::test_program(".ifp02\n nop\n.endif\n",
            "(program (line (.ifp02 (line (nop)) (line (.endif)))))");
    }
    #[test]
    fn nested() {
        super::test_program(".proc outer\n.repeat 4, i\n .byte i\n.endrep\n.endproc\n",
            "(program (line (.proc name: outer (line (.repeat 4 variable: i (line (.byte i)) (line (.endrepeat)))) (line (.endproc)))))");
    }
    #[test]
    fn macro_definition() {
        super::test_program(".mac add16 dst, src\n clc\n.endmac\n",
            "(program (line (.macro add16 (params dst src) (line (clc)) (line (.endmacro)))))");
    }
    #[test]
    fn struct_fields() {
        super::test_program(".struct Point\n xcoord .word\n ycoord .res 2\n .tag Other\n.endstruct\n",
            "(program (line (.struct name: Point (line (field xcoord (.word))) (line (field ycoord (.res 2))) (line (field (.tag Other))) (line (.endstruct)))))");
    }
    #[test]
    fn nested_union() {
        super::test_program(".struct S\n .union\n  a .byte\n  b .word\n .endunion\n.endstruct\n",
            "(program (line (.struct name: S (line (field (.union (line (field a (.byte))) (line (field b (.word))) (line (.endunion))))) (line (.endstruct)))))");
    }
    #[test]
    fn enum_members() {
        super::test_program(".enum Color\n red\n green = 5\n.endenum\n",
            "(program (line (.enum name: Color (line (member red)) (line (member green 5)) (line (.endenum)))))");
    }
    #[test]
    fn terminator_is_case_insensitive() {
        super::test_program(".PROC main\n.ENDPROC\n",
            "(program (line (.proc name: main (line (.endproc)))))");
    }
}

mod structure_errors {
    #[test]
    fn mismatched_terminator_is_fatal() {
        super::test_errors(".proc a\n.struct s\n.endproc\n lda #1\n",
            "(program (line (.proc name: a (line (.struct name: s)))) (unparsed))",
            &[(2,0,r"expected `\.endstruct` but found `\.endproc`")]);
    }
    #[test]
    fn union_terminator_closes_struct() {
        super::test_errors(".struct S\n a .byte\n.endunion\n",
            "(program (line (.struct name: S (line (field a (.byte))))) (unparsed))",
            &[(2,0,r"expected `\.endstruct` but found `\.endunion`")]);
    }
    #[test]
    fn terminator_without_block() {
        super::test_errors(" nop\n.endif\n nop\n",
            "(program (line (nop)) (unparsed))",
            &[(1,0,r"`\.endif` without an open block")]);
    }
    #[test]
    fn unclosed_block() {
        super::test_errors("\n.proc a\n nop\n",
            "(program (line) (line (.proc name: a (line (nop)))))",
            &[(1,0,r"unclosed block, missing `\.endproc`")]);
    }
    #[test]
    fn else_outside_conditional() {
        super::test_errors(".else\n nop\n",
            "(program (line (ERROR)) (line (nop)))",
            &[(0,0,r"`\.else` outside of a conditional block")]);
    }
    #[test]
    fn top_level_struct_needs_name() {
        super::test_errors(".struct\n a .byte\n.endstruct\n",
            "(program (line (ERROR)) (line (field a (.byte))) (line (.endstruct)))",
            &[(0,0,r"`\.struct` needs a name outside of a struct")]);
    }
    #[test]
    fn bad_field() {
        super::test_errors(".struct S\n lda #1\n.endstruct\n",
            "(program (line (.struct name: S (line (ERROR)) (line (.endstruct)))))",
            &[(1,5,r"expected field allocation, found `#`")]);
    }
}

mod recovery {
    use super::super::super::ast::ToSexp;
    #[test]
    fn error_spoils_one_line() {
        super::test_errors(" lda #\n nop\n",
            "(program (line (ERROR)) (line (nop)))",
            &[(0,6,"expected expression before end of line")]);
    }
    #[test]
    fn every_bad_line_reported() {
        super::test_errors(" lda #\n .byte\n nop\n",
            "(program (line (ERROR)) (line (ERROR)) (line (nop)))",
            &[(0,6,"expected expression"),(1,6,"expected expression")]);
    }
    #[test]
    fn header_error_keeps_block() {
        super::test_errors(".proc main extra\n nop\n.endproc\n rts\n",
            "(program (line (ERROR)) (line (nop)) (line (.endproc)) (line (rts)))",
            &[(0,11,r"expected end of `\.proc`, found `extra`")]);
    }
    #[test]
    fn terminator_error_still_closes() {
        super::test_errors(".proc main\n.endproc junk\n nop\n",
            "(program (line (.proc name: main (line (.endproc) (ERROR)))) (line (nop)))",
            &[(1,9,"expected end of line, found `junk`")]);
    }
    #[test]
    fn deep_operand_spoils_one_line() {
        let code = format!(" lda {}1\n nop\n","(".repeat(1000));
        let parsed = super::parse(&code);
        assert_eq!(parsed.errors.len(),1,"errors {:?}",parsed.errors);
        assert_eq!(parsed.errors[0].message,"expression nested too deeply");
        assert_eq!(parsed.program.to_sexp(),"(program (line (ERROR)) (line (nop)))");
        assert_eq!(super::reconstruct(&code,&parsed.program),code);
    }
    #[test]
    fn label_kept_on_error() {
        let parsed = super::parse("here: lda (\n");
        let line = &parsed.program.lines[0];
        assert!(line.error.is_some());
        assert_eq!(line.label.as_ref().and_then(|l| l.name.as_ref()).map(|n| n.name.as_str()),Some("here"));
    }
}

mod whole_program {
    use super::super::super::parse;
    use super::super::super::formatter::reconstruct;
    const SAMPLES: [&str;6] = [
        "L: lda #$10\n sta $2000,x\n",
        ".proc main\n  ldx #0\n: lda msg,x ; loop\n  bne :-\n.endproc\nmsg: .asciiz \"hi\"\n",
        " lda #\r\n\r\n rts",
        ".proc a\n.struct s\n.endproc\n lda #1\n",
        ".macro m a\n m2 {a, b}, c\n.endmacro\n.if 1\n",
        ".define ADD(a,b) a+b\n x = ADD(1,2)\n"
    ];
    #[test]
    fn round_trip() {
        for code in SAMPLES {
            let parsed = parse(code);
            assert_eq!(reconstruct(code,&parsed.program),code);
        }
    }
    #[test]
    fn deterministic() {
        for code in SAMPLES {
            assert_eq!(parse(code).program,parse(code).program);
        }
    }
    #[test]
    fn parse_on_threads() {
        let handles: Vec<std::thread::JoinHandle<usize>> = SAMPLES.iter()
            .map(|code| {
                let owned = code.to_string();
                std::thread::spawn(move || parse(&owned).program.lines.len())
            })
            .collect();
        for (code,handle) in SAMPLES.iter().zip(handles) {
            assert_eq!(handle.join().expect("thread panicked"),parse(code).program.lines.len());
        }
    }
    #[test]
    fn walk_in_source_order() {
        use super::super::super::ast::{Visit,Navigation,Line};
        struct Rows(Vec<(u32,usize)>);
        impl Visit for Rows {
            fn visit(&mut self, line: &Line, depth: usize) -> Navigation {
                self.0.push((line.row,depth));
                Navigation::GotoChild
            }
        }
        let parsed = parse(".proc a\n.if 1\n nop\n.endif\n.endproc\n rts\n");
        let mut rows = Rows(Vec::new());
        rows.walk(&parsed.program);
        assert_eq!(rows.0,vec![(0,0),(1,1),(2,2),(3,1),(4,0),(5,0)]);
    }
}

#[test]
fn json_has_role_names() {
    let parsed = parse("L: lda #1\n");
    let json = serde_json::to_value(&parsed.program).expect("serialize failed");
    let stmt = &json["lines"][0]["stmt"];
    assert_eq!(stmt["type"],"instruction");
    assert_eq!(stmt["kind"],"cpu");
    assert_eq!(stmt["opcode"]["mnemonic"],"lda");
    assert_eq!(stmt["operand"]["mode"],"immediate");
    assert_eq!(json["lines"][0]["label"]["name"]["name"],"L");
    let code = "x\n";
    assert_eq!(reconstruct(code,&parse(code).program),code);
}
