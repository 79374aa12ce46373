#[cfg(test)]
mod scanner_tests {
    use monkey::error::MonkeyError;
    use monkey::scanner::*;
    use monkey::token::*;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source);
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "=+(){},;",
            &[
                (TokenType::EQUAL, "="),
                (TokenType::PLUS, "+"),
                (TokenType::LEFT_PAREN, "("),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::COMMA, ","),
                (TokenType::SEMICOLON, ";"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_operators() {
        assert_token_sequence(
            "!-/*5; 5 < 10 > 5; 10 == 10; 10 != 9; 1 <= 2 >= 0",
            &[
                (TokenType::BANG, "!"),
                (TokenType::MINUS, "-"),
                (TokenType::SLASH, "/"),
                (TokenType::STAR, "*"),
                (TokenType::INTEGER(5), "5"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::INTEGER(5), "5"),
                (TokenType::LESS, "<"),
                (TokenType::INTEGER(10), "10"),
                (TokenType::GREATER, ">"),
                (TokenType::INTEGER(5), "5"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::INTEGER(10), "10"),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::INTEGER(10), "10"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::INTEGER(10), "10"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::INTEGER(9), "9"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::INTEGER(1), "1"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::INTEGER(2), "2"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::INTEGER(0), "0"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_keywords_and_identifiers() {
        assert_token_sequence(
            "let add = fn(x) { if (x) { return true; } else { false } }; macro quote unquote",
            &[
                (TokenType::LET, "let"),
                (TokenType::IDENTIFIER, "add"),
                (TokenType::EQUAL, "="),
                (TokenType::FUNCTION, "fn"),
                (TokenType::LEFT_PAREN, "("),
                (TokenType::IDENTIFIER, "x"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::IF, "if"),
                (TokenType::LEFT_PAREN, "("),
                (TokenType::IDENTIFIER, "x"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::RETURN, "return"),
                (TokenType::TRUE, "true"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::ELSE, "else"),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::FALSE, "false"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::MACRO, "macro"),
                (TokenType::IDENTIFIER, "quote"),
                (TokenType::IDENTIFIER, "unquote"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_integer_payload() {
        let tokens = scan_all("12345").unwrap();

        match tokens[0].token_type {
            TokenType::INTEGER(n) => assert_eq!(n, 12345),
            ref other => panic!("expected INTEGER, got {:?}", other),
        }
        assert_eq!(tokens[0].to_string(), "INTEGER 12345 12345");
        assert_eq!(tokens[1].to_string(), "EOF  null");
    }

    #[test]
    fn test_unexpected_chars_become_illegal_tokens() {
        assert_token_sequence(
            "5 $ 6 é",
            &[
                (TokenType::INTEGER(5), "5"),
                (TokenType::ILLEGAL, "$"),
                (TokenType::INTEGER(6), "6"),
                (TokenType::ILLEGAL, "é"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_integer_overflow_is_a_lex_error() {
        let results: Vec<_> = Scanner::new("99999999999999999999 1").collect();

        assert_eq!(results.len(), 3, "error, INTEGER, EOF");
        match &results[0] {
            Err(MonkeyError::Lex { message, line }) => {
                assert!(message.contains("out of range"), "got: {}", message);
                assert_eq!(*line, 1);
            }
            other => panic!("expected lex error, got {:?}", other),
        }
        assert!(scan_all("99999999999999999999").is_err());
    }

    #[test]
    fn test_comments_and_lines() {
        let tokens = scan_all("1 // one\n// nothing here\n2").unwrap();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].lexeme, "2");
        assert_eq!(tokens[1].line, 3);
        assert_eq!(tokens[2].token_type, TokenType::EOF);
    }

    #[test]
    fn test_single_eof_and_fused() {
        let mut scanner = Scanner::new("");

        assert!(matches!(
            scanner.next(),
            Some(Ok(Token {
                token_type: TokenType::EOF,
                ..
            }))
        ));
        assert!(scanner.next().is_none());
        assert!(scanner.next().is_none());
    }
}
