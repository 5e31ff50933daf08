//! Test of directive argument grammars, symbol definitions, and labels.

use regex::Regex;
use super::super::parse;
use super::super::ast::*;

#[cfg(test)]
fn test_line(code: &str, expected: &str) {
    let parsed = parse(code);
    assert!(parsed.errors.is_empty(),"unexpected errors {:?}",parsed.errors);
    assert_eq!(parsed.program.lines[0].to_sexp(),expected);
}

#[cfg(test)]
fn test_error(code: &str, col: u32, expected: &str) {
    let parsed = parse(code);
    assert!(parsed.errors.len() > 0,"no errors");
    let patt = Regex::new(expected).expect("bad regex");
    assert!(patt.is_match(&parsed.errors[0].message),"message was `{}`",parsed.errors[0].message);
    assert_eq!(parsed.errors[0].pos.col,col);
}

mod data {
    #[test]
    fn expression_list() {
        super::test_line(" .byte 1, 2, \"a\"\n","(line (.byte 1 2 \"a\"))");
        super::test_line(" .word $1234\n","(line (.word 4660))");
    }
    #[test]
    fn alias_is_canonical() {
        super::test_line(" .BYT 1\n","(line (.byte 1))");
    }
    #[test]
    fn storage() {
        super::test_line(" .res 10, $ff\n","(line (.res 10 fill: 255))");
        super::test_line(" .align 256\n","(line (.align 256))");
        super::test_line(" .asciiz \"hello\"\n","(line (.asciiz \"hello\"))");
    }
    #[test]
    fn charmap() {
        super::test_line(" .charmap $41, $c1\n","(line (.charmap 65 193))");
    }
    #[test]
    fn files() {
        super::test_line(" .include \"zp.inc\"\n","(line (.include \"zp.inc\"))");
        super::test_line(" .incbin \"font.bin\", 2, 10\n","(line (.incbin \"font.bin\" offset: 2 size: 10))");
        super::test_line(" .incbin \"font.bin\"\n","(line (.incbin \"font.bin\"))");
    }
}

mod symbols {
    #[test]
    fn definitions() {
        super::test_line("x = 5\n","(line (= x 5))");
        super::test_line("y := x+1\n","(line (:= y (+ x 1)))");
        super::test_line("z .set 3\n","(line (.set z 3))");
    }
    #[test]
    fn export_list() {
        super::test_line(" .export foo, bar := 3, baz: zp\n","(line (.export foo (bar := 3) (baz :zp)))");
    }
    #[test]
    fn import_list() {
        super::test_line(" .import foo: abs, bar\n","(line (.import (foo :abs) bar))");
        super::test_line(" .global a, b\n","(line (.global a b))");
    }
    #[test]
    fn labels() {
        super::test_line("start: nop\n","(line start: (nop))");
        super::test_line("@loop: dex\n","(line @loop: (dex))");
        super::test_line(": bne :-\n","(line : (bne (abs (unnamed -1))))");
        super::test_line("alone:\n","(line alone:)");
    }
    #[test]
    fn definition_spans() {
        let parsed = super::parse("x = 5 ; five\n");
        let line = &parsed.program.lines[0];
        match &line.stmt {
            Some(super::Statement::Symbol(def)) => {
                assert_eq!(def.span.start,0);
                assert_eq!(def.span.end,5);
                assert_eq!(def.op.start,2);
            },
            _ => panic!("expected symbol definition")
        }
        assert_eq!(line.comment.as_ref().map(|c| c.text.as_str()),Some("; five"));
    }
}

mod options {
    #[test]
    fn toggles() {
        super::test_line(" .case +\n","(line (.case on))");
        super::test_line(" .smart OFF\n","(line (.smart off))");
    }
    #[test]
    fn messages() {
        super::test_line(" .warning \"careful\"\n","(line (.warning \"careful\"))");
        super::test_line(" .out \"hi\"\n","(line (.out \"hi\"))");
    }
    #[test]
    fn features() {
        super::test_line(" .feature labels_without_colons on, c_comment\n","(line (.feature (labels_without_colons on) c_comment))");
    }
    #[test]
    fn named_choices() {
        super::test_line(" .macpack longbranch\n","(line (.macpack longbranch))");
        super::test_line(" .fopt author, \"me\"\n","(line (.fileopt author \"me\"))");
        super::test_line(" .listbytes unlimited\n","(line (.listbytes unlimited))");
        super::test_line(" .pagelength 66\n","(line (.pagelength 66))");
    }
    #[test]
    fn segments() {
        super::test_line(" .segment \"CODE\"\n","(line (.segment \"CODE\"))");
        super::test_line(" .segment \"ZP\": zeropage\n","(line (.segment \"ZP\" spec: zeropage))");
        super::test_line(" .code\n","(line (.code))");
        super::test_line(" .setcpu \"6502\"\n","(line (.setcpu \"6502\"))");
    }
    #[test]
    fn assert() {
        super::test_line(" .assert * < $200, error, \"too big\"\n","(line (.assert (< * 512) action: error message: \"too big\"))");
        super::test_line(" .assert 1\n","(line (.assert 1))");
    }
    #[test]
    fn condes() {
        super::test_line(" .condes init, constructor, 5\n","(line (.condes init constructor priority: 5))");
        super::test_line(" .condes init, 2\n","(line (.condes init 2))");
        super::test_line(" .constructor init\n","(line (.constructor init))");
    }
    #[test]
    fn misc() {
        super::test_line(" .localchar '?'\n","(line (.localchar '?'))");
        super::test_line(" .org $800\n","(line (.org 2048))");
        super::test_line(" .refto foo\n","(line (.referto foo))");
        super::test_line(" .undef VAL\n","(line (.undefine VAL))");
    }
}

mod define {
    #[test]
    fn simple() {
        super::test_line(".define VAL 42\n","(line (.define VAL body: [42]))");
    }
    #[test]
    fn with_params() {
        super::test_line(".define ADD(a,b) a+b ; sum\n","(line (.define ADD (params a b) body: [a+b]))");
    }
    #[test]
    fn space_before_paren_is_body() {
        super::test_line(".define X (1)\n","(line (.define X body: [(1)]))");
    }
    #[test]
    fn empty_body() {
        super::test_line(".define EMPTY\n","(line (.define EMPTY))");
    }
}

mod errors {
    #[test]
    fn missing_argument() {
        super::test_error(" .byte\n",6,"expected expression before end of line");
    }
    #[test]
    fn extra_argument() {
        super::test_error(" .byte 1 2\n",9,r"expected end of `\.byte`, found `2`");
    }
    #[test]
    fn unknown_directive() {
        super::test_error(" .foo\n",1,r"unknown directive `\.foo`");
    }
    #[test]
    fn function_at_statement_start() {
        super::test_error(" .lobyte(1)\n",1,r"`\.lobyte` cannot start a statement");
        super::test_error(" .mod\n",1,r"`\.mod` cannot start a statement");
    }
    #[test]
    fn set_without_name() {
        super::test_error(" .set 1\n",1,r"`\.set` needs a symbol name before it");
    }
    #[test]
    fn wrong_literal() {
        super::test_error(" .include foo\n",10,r"expected file name, found `foo`");
    }
    #[test]
    fn unknown_choice() {
        super::test_error(" .macpack foo\n",10,r"unknown macro package `foo`");
        super::test_error(" .export a: huge\n",12,r"unknown address size `huge`");
    }
    #[test]
    fn bad_toggle() {
        super::test_error(" .case maybe\n",7,r"expected `\+`, `-`, `on`, or `off`, found `maybe`");
    }
}
