use crate::{Error, Result};

use std::collections::VecDeque;

/// Lexical tokens of the expression language
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Lexeme {
    LParen,
    RParen,

    /// Quoted string, quotes removed and doubled quotes collapsed
    Str(String),

    /// Any other run of non-blank characters
    Word(String),
}

pub(crate) struct Lexer<'a> {
    src: &'a str,
    next: VecDeque<Lexeme>,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(src: &'a str) -> Lexer<'a> {
        Lexer {
            src,
            next: VecDeque::new(),
        }
    }

    pub(crate) fn next(&mut self) -> Result<Option<Lexeme>> {
        self.lex_n(1)?;
        Ok(self.next.pop_front())
    }

    pub(crate) fn peek_nth(&mut self, n: usize) -> Result<Option<&Lexeme>> {
        self.lex_n(n + 1)?;
        Ok(self.next.get(n))
    }

    fn lex_n(&mut self, n: usize) -> Result<()> {
        while self.next.len() < n {
            self.skip_whitespace();

            let Some(ch) = self.try_next_char() else {
                return Ok(());
            };

            let lexeme = match ch {
                '(' => Lexeme::LParen,
                ')' => Lexeme::RParen,
                '\'' | '"' => Lexeme::Str(self.lex_str(ch)?),
                ch => {
                    let mut word = String::new();
                    word.push(ch);

                    while let Some(ch) = self.take_if(word_ch) {
                        word.push(ch);
                    }

                    Lexeme::Word(word)
                }
            };

            self.next.push_back(lexeme);
        }

        Ok(())
    }

    fn lex_str(&mut self, quote: char) -> Result<String> {
        let mut s = String::new();

        loop {
            match self.try_next_char() {
                Some(ch) if ch == quote => {
                    if self.take_if(|ch| ch == quote).is_none() {
                        return Ok(s);
                    }
                    s.push(quote);
                }
                Some(ch) => s.push(ch),
                None => return Err(Error::parse(format!("unterminated string `{quote}{s}`"))),
            }
        }
    }

    fn try_next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.consume(ch.len_utf8());
        Some(ch)
    }

    fn peek_char(&self) -> Option<char> {
        self.src.chars().next()
    }

    fn take_if<P>(&mut self, predicate: P) -> Option<char>
    where
        P: FnOnce(char) -> bool,
    {
        match self.peek_char() {
            Some(ch) if predicate(ch) => {
                self.consume(ch.len_utf8());
                Some(ch)
            }
            _ => None,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.take_if(char::is_whitespace).is_some() {}
    }

    fn consume(&mut self, amount: usize) {
        let (_, src) = self.src.split_at(amount);
        self.src = src;
    }
}

fn word_ch(ch: char) -> bool {
    !(ch.is_whitespace() || matches!(ch, '(' | ')' | '\'' | '"'))
}
