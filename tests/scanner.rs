#[cfg(test)]
mod scanner_tests {
    use lox_interpreter as lox;

    use lox::scanner::Scanner;
    use lox::token::TokenType;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source.as_bytes());
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    #[test]
    fn symbols() {
        assert_token_sequence(
            "({*.,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn one_and_two_character_operators() {
        assert_token_sequence(
            "! != = == > >= < <= / -",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::SLASH, "/"),
                (TokenType::MINUS, "-"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_token_sequence(
            "class Foo < Bar { fun method() {} } var x_1 = nil;",
            &[
                (TokenType::CLASS, "class"),
                (TokenType::IDENTIFIER, "Foo"),
                (TokenType::LESS, "<"),
                (TokenType::IDENTIFIER, "Bar"),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::FUN, "fun"),
                (TokenType::IDENTIFIER, "method"),
                (TokenType::LEFT_PAREN, "("),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::VAR, "var"),
                (TokenType::IDENTIFIER, "x_1"),
                (TokenType::EQUAL, "="),
                (TokenType::NIL, "nil"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn number_literals() {
        let tokens: Vec<_> = Scanner::new(b"12 3.5 0.25")
            .filter_map(Result::ok)
            .collect();

        let values: Vec<f64> = tokens
            .iter()
            .filter_map(|t| match t.token_type {
                TokenType::NUMBER(n) => Some(n),
                _ => None,
            })
            .collect();

        assert_eq!(values, vec![12.0, 3.5, 0.25]);
    }

    #[test]
    fn string_literal_keeps_raw_text_and_counts_lines() {
        let tokens: Vec<_> = Scanner::new(b"\"one\ntwo\" x")
            .filter_map(Result::ok)
            .collect();

        assert_eq!(tokens[0].token_type, TokenType::STRING(String::new()));

        let TokenType::STRING(literal) = &tokens[0].token_type else {
            panic!("expected a string token");
        };

        assert_eq!(literal, "one\ntwo");

        // The identifier after the multi-line string sits on line 2.
        assert_eq!(tokens[1].token_type, TokenType::IDENTIFIER);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let results: Vec<_> = Scanner::new(b"\"abc").collect();

        let errors: Vec<String> = results
            .iter()
            .filter_map(|r| r.as_ref().err().map(ToString::to_string))
            .collect();

        assert_eq!(errors, vec!["[line 1] Error: Unterminated string."]);
    }

    #[test]
    fn comments_and_whitespace_are_skipped() {
        assert_token_sequence(
            "// a comment\nprint 1; // trailing",
            &[
                (TokenType::PRINT, "print"),
                (TokenType::NUMBER(0.0), "1"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn unexpected_characters_are_reported_in_sequence() {
        let results: Vec<_> = Scanner::new(b",.$(#").collect();

        // , . err ( err EOF
        assert_eq!(results.len(), 6);

        assert!(results[0].is_ok());
        assert!(results[1].is_ok());

        let err = results[2].as_ref().expect_err("expected error for '$'");
        assert_eq!(err.to_string(), "[line 1] Error: Unexpected character: $");

        assert!(results[3].is_ok());
        assert!(results[4].is_err());

        let eof = results[5].as_ref().expect("expected EOF");
        assert_eq!(eof.token_type, TokenType::EOF);
    }

    #[test]
    fn eof_carries_the_final_line() {
        let tokens: Vec<_> = Scanner::new(b"1;\n2;\n").filter_map(Result::ok).collect();

        let eof = tokens.last().expect("scanner always emits EOF");

        assert_eq!(eof.token_type, TokenType::EOF);
        assert_eq!(eof.line, 3);
    }
}
