//! Core lexer implementation.
//!
//! The [`Lexer`] walks the source with a [`Cursor`], dispatching on the
//! current character to a scanning method per token class. Errors are
//! reported through the shared handler and scanning continues, so the
//! output is always a complete token stream ending in `Eof`.

use loxi_util::{Diagnostic, ErrorLocation, Handler, Span};

use crate::cursor::Cursor;
use crate::token::{keyword, Literal, Token, TokenKind};

/// Lexer for Lox source text.
pub struct Lexer<'a> {
    /// Character cursor for source traversal.
    cursor: Cursor<'a>,

    /// Error handler for reporting lexical errors.
    handler: &'a Handler,

    /// Tokens scanned so far.
    tokens: Vec<Token>,

    /// Starting byte position of the token being scanned.
    token_start: usize,

    /// Line where the current token starts (1-based).
    token_start_line: u32,

    /// Column where the current token starts (1-based).
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer over the given source.
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            tokens: Vec::new(),
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Scans the entire source into a token stream.
    ///
    /// The stream always terminates with an `Eof` token carrying the final
    /// line number, even when lexical errors were reported along the way.
    pub fn scan_tokens(mut self) -> Vec<Token> {
        loop {
            self.skip_whitespace_and_comments();

            if self.cursor.is_at_end() {
                break;
            }

            self.token_start = self.cursor.position();
            self.token_start_line = self.cursor.line();
            self.token_start_column = self.cursor.column();
            self.scan_token();
        }

        let end = Span::new(
            self.cursor.position(),
            self.cursor.position(),
            self.cursor.line(),
            self.cursor.column(),
        );
        self.tokens
            .push(Token::new(TokenKind::Eof, "", Literal::None, end));
        self.tokens
    }

    /// Scans a single token starting at the current character.
    fn scan_token(&mut self) {
        let c = self.cursor.current_char();
        self.cursor.advance();

        match c {
            '(' => self.add_token(TokenKind::LeftParen),
            ')' => self.add_token(TokenKind::RightParen),
            '{' => self.add_token(TokenKind::LeftBrace),
            '}' => self.add_token(TokenKind::RightBrace),
            ',' => self.add_token(TokenKind::Comma),
            '.' => self.add_token(TokenKind::Dot),
            '-' => self.add_token(TokenKind::Minus),
            '+' => self.add_token(TokenKind::Plus),
            ';' => self.add_token(TokenKind::Semicolon),
            '*' => self.add_token(TokenKind::Star),
            // A lone slash; `//` comments were consumed before dispatch.
            '/' => self.add_token(TokenKind::Slash),
            '!' => {
                let kind = if self.cursor.match_char('=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                };
                self.add_token(kind);
            }
            '=' => {
                let kind = if self.cursor.match_char('=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                };
                self.add_token(kind);
            }
            '<' => {
                let kind = if self.cursor.match_char('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                };
                self.add_token(kind);
            }
            '>' => {
                let kind = if self.cursor.match_char('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                };
                self.add_token(kind);
            }
            '"' => self.scan_string(),
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_ident_start(c) => self.scan_identifier(),
            _ => self.report_error("Unexpected character."),
        }
    }

    /// Scans a string literal; the opening quote is already consumed.
    ///
    /// Strings may span lines and recognise no escape sequences. The
    /// closing quote is required; at end of input the error is reported
    /// and no token is produced.
    fn scan_string(&mut self) {
        while !self.cursor.is_at_end() && self.cursor.current_char() != '"' {
            self.cursor.advance();
        }

        if self.cursor.is_at_end() {
            self.report_error("Unterminated string.");
            return;
        }

        // Closing quote.
        self.cursor.advance();

        let lexeme = self.cursor.slice_from(self.token_start);
        let contents = lexeme[1..lexeme.len() - 1].to_string();
        self.add_literal_token(TokenKind::String, Literal::Str(contents));
    }

    /// Scans a number literal; the first digit is already consumed.
    ///
    /// Grammar: `digits ('.' digits)?`. A `.` not followed by a digit is
    /// left for the next token, so `123.` lexes as a number and a dot.
    fn scan_number(&mut self) {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        let text = self.cursor.slice_from(self.token_start);
        match text.parse::<f64>() {
            Ok(value) => self.add_literal_token(TokenKind::Number, Literal::Number(value)),
            Err(_) => self.report_error("Invalid number literal."),
        }
    }

    /// Scans an identifier or keyword; the first character is consumed.
    fn scan_identifier(&mut self) {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);
        let kind = keyword(text).unwrap_or(TokenKind::Identifier);
        self.add_token(kind);
    }

    /// Skips whitespace and `//` line comments.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current_char() {
                ' ' | '\r' | '\t' | '\n' => self.cursor.advance(),
                '/' if self.cursor.peek_char(1) == '/' => {
                    while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                        self.cursor.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn add_token(&mut self, kind: TokenKind) {
        self.add_literal_token(kind, Literal::None);
    }

    fn add_literal_token(&mut self, kind: TokenKind, literal: Literal) {
        let lexeme = self.cursor.slice_from(self.token_start).to_string();
        let span = Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        );
        self.tokens.push(Token::new(kind, lexeme, literal, span));
    }

    /// Reports a lexical error at the current line.
    fn report_error(&mut self, message: &str) {
        self.handler.report(Diagnostic::new(
            self.cursor.line(),
            ErrorLocation::Bare,
            message,
        ));
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        let handler = Handler::new_panicking();
        Lexer::new(source, &handler).scan_tokens()
    }

    fn lex_with_errors(source: &str) -> (Vec<Token>, Handler) {
        let handler = Handler::new();
        let tokens = Lexer::new(source, &handler).scan_tokens();
        (tokens, handler)
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_source_is_just_eof() {
        let tokens = lex("");
        assert_eq!(kinds(&tokens), vec![TokenKind::Eof]);
        assert_eq!(tokens[0].line(), 1);
    }

    #[test]
    fn test_punctuation() {
        let tokens = lex("(){},.-+;/*");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Minus,
                TokenKind::Plus,
                TokenKind::Semicolon,
                TokenKind::Slash,
                TokenKind::Star,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_two_char_operators() {
        let tokens = lex("! != = == < <= > >=");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Bang,
                TokenKind::BangEqual,
                TokenKind::Equal,
                TokenKind::EqualEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_maximal_munch() {
        // `===` is `==` then `=`, never three `=`.
        let tokens = lex("===");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::EqualEqual, TokenKind::Equal, TokenKind::Eof]
        );
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let tokens = lex("var language = lox;");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Var,
                TokenKind::Identifier,
                TokenKind::Equal,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[1].lexeme, "language");
        assert_eq!(tokens[3].lexeme, "lox");
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        let tokens = lex("orchid forest classy");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_number_literals() {
        let tokens = lex("0 42 3.5 1234.5678");
        let values: Vec<f64> = tokens[..4]
            .iter()
            .map(|t| match t.literal {
                Literal::Number(n) => n,
                _ => panic!("expected number literal, got {:?}", t),
            })
            .collect();
        assert_eq!(values, vec![0.0, 42.0, 3.5, 1234.5678]);
    }

    #[test]
    fn test_trailing_dot_is_not_part_of_number() {
        let tokens = lex("123.");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Number, TokenKind::Dot, TokenKind::Eof]
        );
        assert_eq!(tokens[0].lexeme, "123");
    }

    #[test]
    fn test_leading_dot_is_not_a_number() {
        let tokens = lex(".5");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Dot, TokenKind::Number, TokenKind::Eof]
        );
    }

    #[test]
    fn test_string_literal() {
        let tokens = lex("\"hello world\"");
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].lexeme, "\"hello world\"");
        assert_eq!(tokens[0].literal, Literal::Str("hello world".to_string()));
    }

    #[test]
    fn test_empty_string_literal() {
        let tokens = lex("\"\"");
        assert_eq!(tokens[0].literal, Literal::Str(String::new()));
    }

    #[test]
    fn test_multiline_string_advances_line() {
        let tokens = lex("\"one\ntwo\" x");
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].literal, Literal::Str("one\ntwo".to_string()));
        // The identifier after the string sits on line 2.
        assert_eq!(tokens[1].line(), 2);
    }

    #[test]
    fn test_no_escape_sequences() {
        // Backslash is just a character inside strings.
        let tokens = lex("\"a\\nb\"");
        assert_eq!(tokens[0].literal, Literal::Str("a\\nb".to_string()));
    }

    #[test]
    fn test_unterminated_string_reports_and_continues() {
        let (tokens, handler) = lex_with_errors("\"oops");
        assert!(handler.has_errors());
        assert_eq!(
            handler.diagnostics()[0].to_string(),
            "[line 1] Error: Unterminated string."
        );
        // No string token, but the stream still ends with Eof.
        assert_eq!(kinds(&tokens), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_unexpected_character_reports_and_continues() {
        let (tokens, handler) = lex_with_errors("var @ x;");
        assert_eq!(handler.error_count(), 1);
        assert_eq!(
            handler.diagnostics()[0].to_string(),
            "[line 1] Error: Unexpected character."
        );
        // Lexing resumed after the bad character.
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Var,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_line_comment_discarded() {
        let tokens = lex("x // the rest of this line vanishes\ny");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
        );
        assert_eq!(tokens[0].line(), 1);
        assert_eq!(tokens[1].line(), 2);
    }

    #[test]
    fn test_comment_at_end_of_input() {
        let tokens = lex("// nothing here");
        assert_eq!(kinds(&tokens), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_slash_is_still_division() {
        let tokens = lex("a / b");
        assert_eq!(tokens[1].kind, TokenKind::Slash);
    }

    #[test]
    fn test_eof_on_final_line() {
        let tokens = lex("a;\nb;\nc;\n");
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
        assert_eq!(tokens.last().unwrap().line(), 4);
    }

    #[test]
    fn test_lexemes_are_exact_source_slices() {
        let source = "if (x <= 10.5) print \"ok\";";
        let tokens = lex(source);
        for token in &tokens[..tokens.len() - 1] {
            assert!(
                source.contains(&token.lexeme),
                "lexeme {:?} not found in source",
                token.lexeme
            );
        }
    }
}
