//! Test of the expression grammar, expressions are parsed as `.byte` arguments
//! and compared in S-expression form.

use regex::Regex;
use super::super::parse;
use super::super::ast::*;

#[cfg(test)]
fn test_expr(expr: &str, expected: &str) {
    let code = format!(" .byte {}\n",expr);
    let parsed = parse(&code);
    assert!(parsed.errors.is_empty(),"unexpected errors {:?}",parsed.errors);
    let stmt = parsed.program.lines[0].stmt.as_ref().expect("no statement");
    let values = match stmt.pseudo().map(|p| &p.args) {
        Some(PseudoArgs::Values { values }) => values,
        _ => panic!("not a data directive")
    };
    assert_eq!(values[0].to_sexp(),expected);
}

#[cfg(test)]
fn test_error(expr: &str, col: u32, expected: &str) {
    let code = format!(" .byte {}\n",expr);
    let parsed = parse(&code);
    assert_eq!(parsed.errors.len(),1,"errors {:?}",parsed.errors);
    let patt = Regex::new(expected).expect("bad regex");
    assert!(patt.is_match(&parsed.errors[0].message),"message was `{}`",parsed.errors[0].message);
    assert_eq!(parsed.errors[0].pos.col,col);
}

mod precedence {
    #[test]
    fn multiply_before_add() {
        super::test_expr("1+2*3","(+ 1 (* 2 3))");
        super::test_expr("1*2+3","(+ (* 1 2) 3)");
    }
    #[test]
    fn left_associative() {
        super::test_expr("1-2-3","(- (- 1 2) 3)");
        super::test_expr("8/4/2","(/ (/ 8 4) 2)");
    }
    #[test]
    fn comparison_and_logic() {
        super::test_expr("1 = 2 && 3 < 4","(&& (= 1 2) (< 3 4))");
        super::test_expr("a || b && c","(|| a (&& b c))");
    }
    #[test]
    fn dotted_operators() {
        super::test_expr("a .or b .and c","(|| a (&& b c))");
        super::test_expr("7 .MOD 2","(.mod 7 2)");
        super::test_expr("1 .bitand 3 .bitor 4","(| (& 1 3) 4)");
    }
    #[test]
    fn unary_binds_tight() {
        super::test_expr("<label+1","(+ (< label) 1)");
        super::test_expr("-1*2","(* (- 1) 2)");
        super::test_expr("^far","(^ far)");
    }
    #[test]
    fn not_takes_whole_expression() {
        super::test_expr("!a || b","(! (|| a b))");
    }
    #[test]
    fn groups() {
        super::test_expr("(1+2)*3","(* (group (+ 1 2)) 3)");
    }
}

mod primaries {
    #[test]
    fn literals() {
        super::test_expr("$10","16");
        super::test_expr("%1010","10");
        super::test_expr("'A'","'A'");
        super::test_expr("\"hi\"","\"hi\"");
    }
    #[test]
    fn program_counter() {
        super::test_expr("*+2","(+ * 2)");
    }
    #[test]
    fn scoped_member() {
        super::test_expr("outer::inner::name","(:: (:: outer inner) name)");
    }
    #[test]
    fn labels() {
        super::test_expr("@loop","@loop");
        super::test_expr(":+","(unnamed 1)");
        super::test_expr(":---","(unnamed -3)");
    }
    #[test]
    fn pseudo_variables() {
        super::test_expr(".CPU",".cpu");
        super::test_expr(".paramcount",".paramcount");
    }
    #[test]
    fn macro_call() {
        super::test_expr("mymac(1, 2)","(call mymac [1] [2])");
        super::test_expr("mymac()","(call mymac)");
        super::test_expr("1+mymac({a,b})","(+ 1 (call mymac {a,b}))");
    }
}

mod functions {
    #[test]
    fn expression_argument() {
        super::test_expr(".LOBYTE(addr)","(.lobyte addr)");
        super::test_expr(".strlen(\"abc\")","(.strlen \"abc\")");
    }
    #[test]
    fn symbol_argument() {
        super::test_expr(".def(foo)","(.defined foo)");
        super::test_expr(".ref(foo)","(.referenced foo)");
    }
    #[test]
    fn pair_arguments() {
        super::test_expr(".max(1,2)","(.max 1 2)");
        super::test_expr(".min(a, b+1)","(.min a (+ b 1))");
    }
    #[test]
    fn token_arguments() {
        super::test_expr(".blank()","(.blank [])");
        super::test_expr(".tcount(a b (c))","(.tcount [a b (c)])");
        super::test_expr(".match(a, b)","(.match [a] [b])");
        super::test_expr(".left(2, a b c)","(.left 2 [a b c])");
        super::test_expr(".mid(1, 2, {x, y, z})","(.mid 1 2 {x, y, z})");
    }
    #[test]
    fn list_arguments() {
        super::test_expr(".concat()","(.concat)");
        super::test_expr(".concat(\"a\", \"b\")","(.concat \"a\" \"b\")");
        super::test_expr(".cap(CPU_HAS_STZ)","(.capability cpu_has_stz)");
        super::test_expr(".sprintf(\"%d\", 5)","(.sprintf \"%d\" 5)");
    }
    #[test]
    fn sizeof() {
        super::test_expr(".sizeof(Point::xcoord)","(.sizeof (:: Point xcoord))");
        super::test_expr(".sizeof(@local)","(.sizeof @local)");
    }
}

mod errors {
    #[test]
    fn missing_operand() {
        super::test_error("1+",9,"expected expression before end of line");
    }
    #[test]
    fn missing_paren() {
        super::test_error("(1",9,r"expected `\)` before end of line");
    }
    #[test]
    fn unknown_function() {
        super::test_error(".foo(1)",7,r"unknown pseudo-function `\.foo`");
    }
    #[test]
    fn function_needs_paren() {
        super::test_error(".lobyte 1",15,r"expected `\(` after `\.lobyte`, found `1`");
    }
    #[test]
    fn bare_colon() {
        super::test_error(": 1",7,r"expected `\+` or `-` after `:`");
    }
    #[test]
    fn directive_in_expression() {
        super::test_error(".word",7,r"`\.word` cannot appear in an expression");
    }
    #[test]
    fn lexical() {
        super::test_error("$",7,"expected digits after number prefix");
        super::test_error("\"abc",7,"unterminated string");
    }
    #[test]
    fn unknown_capability() {
        super::test_error(".cap(cpu_has_lasers)",12,"unknown capability `cpu_has_lasers`");
    }
    #[test]
    fn nested_too_deeply() {
        let parens = format!("{}1{}","(".repeat(1000),")".repeat(1000));
        super::test_error(&parens,71,"expression nested too deeply");
        let negations = format!("{}1","-".repeat(5000));
        super::test_error(&negations,71,"expression nested too deeply");
    }
    #[test]
    fn nesting_below_limit() {
        let parens = format!("{}1{}","(".repeat(60),")".repeat(60));
        let parsed = super::parse(&format!(" .byte {}\n",parens));
        assert!(parsed.errors.is_empty(),"unexpected errors {:?}",parsed.errors);
    }
}
