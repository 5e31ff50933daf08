//! Test of the ca65 lexer.

use super::super::lexer::*;
use super::super::keywords::Keyword;

#[cfg(test)]
fn test_kinds(code: &str, expected: &[TokenKind]) {
    let actual: Vec<TokenKind> = Lexer::new(code).map(|t| t.kind).collect();
    assert_eq!(actual,expected);
}

#[cfg(test)]
fn test_texts(code: &str, expected: &[&str]) {
    let actual: Vec<String> = Lexer::new(code)
        .filter(|t| !t.is_eol())
        .map(|t| t.text)
        .collect();
    assert_eq!(actual,expected);
}

mod tokens {
    use super::super::super::lexer::{TokenKind,Punct,Base,LexError};
    use super::super::super::keywords::Keyword;
    #[test]
    fn instruction_line() {
        super::test_kinds("lda #$10 ; load\n",&[
            TokenKind::Ident,
            TokenKind::Punct(Punct::Hash),
            TokenKind::Number { base: Base::Hex, value: 16 },
            TokenKind::Comment,
            TokenKind::Newline,
            TokenKind::Eof
        ]);
    }
    #[test]
    fn number_bases() {
        super::test_kinds("10 $ff %101",&[
            TokenKind::Number { base: Base::Dec, value: 10 },
            TokenKind::Number { base: Base::Hex, value: 255 },
            TokenKind::Number { base: Base::Bin, value: 5 },
            TokenKind::Eof
        ]);
    }
    #[test]
    fn keywords_any_case() {
        super::test_kinds(".BYTE .Byt .byte",&[
            TokenKind::Keyword(Keyword::Byte),
            TokenKind::Keyword(Keyword::Byte),
            TokenKind::Keyword(Keyword::Byte),
            TokenKind::Eof
        ]);
    }
    #[test]
    fn unknown_dot_word() {
        super::test_kinds(".frobnicate",&[TokenKind::UnknownDot,TokenKind::Eof]);
    }
    #[test]
    fn local_and_char() {
        super::test_kinds("@loop 'a'",&[TokenKind::LocalName,TokenKind::Char('a'),TokenKind::Eof]);
    }
    #[test]
    fn compound_punctuation() {
        super::test_kinds("<= <> << :: := && ||",&[
            TokenKind::Punct(Punct::Le),
            TokenKind::Punct(Punct::Ne),
            TokenKind::Punct(Punct::Shl),
            TokenKind::Punct(Punct::ColonColon),
            TokenKind::Punct(Punct::ColonEq),
            TokenKind::Punct(Punct::AmpAmp),
            TokenKind::Punct(Punct::PipePipe),
            TokenKind::Eof
        ]);
    }
    #[test]
    fn lexical_errors() {
        super::test_kinds("'ab' $ \"open\n",&[
            TokenKind::Error(LexError::BadChar),
            TokenKind::Error(LexError::MissingDigits),
            TokenKind::Error(LexError::UnterminatedString),
            TokenKind::Newline,
            TokenKind::Eof
        ]);
    }
    #[test]
    fn number_range() {
        super::test_kinds("$100000000",&[TokenKind::Error(LexError::NumberRange),TokenKind::Eof]);
    }
    #[test]
    fn stray_dot() {
        super::test_kinds(". x",&[TokenKind::Error(LexError::StrayDot),TokenKind::Ident,TokenKind::Eof]);
    }
}

mod text {
    #[test]
    fn spans_cover_text() {
        super::test_texts("L: lda (ptr),y",&["L",":","lda","(","ptr",")",",","y"]);
    }
    #[test]
    fn comment_runs_to_newline() {
        super::test_texts("nop ; a \"quoted\" comment\nrts",&["nop","; a \"quoted\" comment","rts"]);
    }
    #[test]
    fn string_value() {
        let tok = super::Lexer::new("\"hello\"").next_token();
        assert_eq!(tok.str_value(),"hello");
    }
}

mod lines {
    use super::*;
    #[test]
    fn crlf_is_one_newline() {
        let toks: Vec<Token> = Lexer::new("a\r\nb").collect();
        assert_eq!(toks[1].kind,TokenKind::Newline);
        assert_eq!(toks[1].span,Span::new(1,3));
        assert_eq!(toks[2].pos,Position { row: 1, col: 0 });
    }
    #[test]
    fn positions() {
        let index = LineIndex::new("ab\ncd\n");
        assert_eq!(index.position(4),Position { row: 1, col: 1 });
        assert_eq!(index.position(6),Position { row: 2, col: 0 });
        assert_eq!(index.line_count(),3);
    }
    #[test]
    fn keyword_lookup() {
        assert_eq!(Keyword::lookup(".MAC"),Some(Keyword::Macro));
        assert_eq!(Keyword::Macro.name(),".macro");
        assert!(Keyword::Macro.is_alias(".mac"));
        assert!(!Keyword::Macro.is_alias(".MACRO"));
    }
}

mod capture {
    use super::*;
    #[test]
    fn argument_stops_at_comma() {
        let mut lexer = Lexer::new("foo a, b ; c");
        let first = lexer.capture(4,RawMode::Argument);
        assert_eq!(first.text,"a");
        assert_eq!(lexer.offset(),5);
        let second = lexer.capture(6,RawMode::Argument);
        assert_eq!(second.text," b");
        assert_eq!(lexer.byte_at(lexer.offset()),Some(b';'));
    }
    #[test]
    fn quotes_hide_delimiters() {
        let mut lexer = Lexer::new("\"a,b\";x");
        let raw = lexer.capture(0,RawMode::Argument);
        assert_eq!(raw.text,"\"a,b\"");
    }
    #[test]
    fn function_nesting() {
        let mut lexer = Lexer::new("f(a,b)),c");
        let raw = lexer.capture(0,RawMode::Function { comma: true });
        assert_eq!(raw.text,"f(a,b)");
        assert_eq!(lexer.offset(),6);
    }
    #[test]
    fn enclosed_spans_lines() {
        let mut lexer = Lexer::new("{a,\n{b}} rest");
        let raw = lexer.capture_enclosed(0).expect("capture failed");
        assert_eq!(raw.text,"a,\n{b}");
        assert!(raw.enclosed);
        assert_eq!(lexer.offset(),8);
    }
    #[test]
    fn enclosed_unterminated() {
        let mut lexer = Lexer::new("{a, b\nnop");
        let err = lexer.capture_enclosed(0).expect_err("should not match");
        assert_eq!(err.kind,TokenKind::Error(LexError::UnterminatedBrace));
        assert_eq!(lexer.offset(),5);
    }
}
