//! Tokenizer and recursive-descent parser for selection text.

use super::{
    CompareOp, FilterError, Operand, Predicate, Value, MAX_FILTER_DEPTH, MAX_FILTER_TERMS,
};
use crate::domain::record::Column;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    LParen,
    RParen,
    Placeholder,
    Op(CompareOp),
    And,
    Or,
    Not,
    Is,
    Null,
    Column(Column),
    Text(String),
    Integer(i64),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Placeholder => "'?'".to_string(),
            Token::Op(CompareOp::Eq) => "'='".to_string(),
            Token::Op(CompareOp::Ne) => "'!='".to_string(),
            Token::And => "AND".to_string(),
            Token::Or => "OR".to_string(),
            Token::Not => "NOT".to_string(),
            Token::Is => "IS".to_string(),
            Token::Null => "NULL".to_string(),
            Token::Column(column) => format!("column {column}"),
            Token::Text(_) => "string literal".to_string(),
            Token::Integer(n) => format!("integer {n}"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, FilterError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        let token = match ch {
            '(' => {
                chars.next();
                Token::LParen
            }
            ')' => {
                chars.next();
                Token::RParen
            }
            '?' => {
                chars.next();
                Token::Placeholder
            }
            '=' => {
                chars.next();
                chars.next_if(|&(_, c)| c == '=');
                Token::Op(CompareOp::Eq)
            }
            '!' | '<' => {
                chars.next();
                let expected = if ch == '!' { '=' } else { '>' };
                match chars.next() {
                    Some((_, c)) if c == expected => Token::Op(CompareOp::Ne),
                    _ => return Err(FilterError::UnexpectedCharacter { ch, offset }),
                }
            }
            '\'' => {
                chars.next();
                let mut text = String::new();
                loop {
                    match chars.next() {
                        Some((_, '\'')) => {
                            if chars.next_if(|&(_, c)| c == '\'').is_some() {
                                text.push('\'');
                            } else {
                                break;
                            }
                        }
                        Some((_, c)) => text.push(c),
                        None => return Err(FilterError::UnterminatedString { offset }),
                    }
                }
                Token::Text(text)
            }
            '0'..='9' => {
                let mut literal = String::new();
                while let Some((_, c)) = chars.next_if(|&(_, c)| c.is_ascii_digit()) {
                    literal.push(c);
                }
                let value = literal
                    .parse::<i64>()
                    .map_err(|_| FilterError::InvalidInteger(literal.clone()))?;
                Token::Integer(value)
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut word = String::new();
                while let Some((_, c)) =
                    chars.next_if(|&(_, c)| c.is_ascii_alphanumeric() || c == '_')
                {
                    word.push(c);
                }
                keyword_or_column(&word)?
            }
            _ => return Err(FilterError::UnexpectedCharacter { ch, offset }),
        };

        tokens.push((offset, token));
    }

    Ok(tokens)
}

fn keyword_or_column(word: &str) -> Result<Token, FilterError> {
    let token = match word.to_ascii_uppercase().as_str() {
        "AND" => Token::And,
        "OR" => Token::Or,
        "NOT" => Token::Not,
        "IS" => Token::Is,
        "NULL" => Token::Null,
        _ => Column::from_name(word)
            .map(Token::Column)
            .ok_or_else(|| FilterError::UnknownIdentifier(word.to_string()))?,
    };
    Ok(token)
}

struct Parser<'a> {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    depth: usize,
    args: &'a [&'a str],
    placeholders: usize,
    terms: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, token)| token)
    }

    fn next(&mut self) -> Result<(usize, Token), FilterError> {
        let item = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(FilterError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(item)
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn unexpected(offset: usize, token: &Token) -> FilterError {
        FilterError::UnexpectedToken {
            found: token.describe(),
            offset,
        }
    }

    fn descend(&mut self) -> Result<(), FilterError> {
        self.depth += 1;
        if self.depth > MAX_FILTER_DEPTH {
            return Err(FilterError::TooDeep {
                max: MAX_FILTER_DEPTH,
            });
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Predicate, FilterError> {
        let mut left = self.and_expr()?;
        while self.eat(&Token::Or) {
            left = left.or(self.and_expr()?);
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Predicate, FilterError> {
        let mut left = self.not_expr()?;
        while self.eat(&Token::And) {
            left = left.and(self.not_expr()?);
        }
        Ok(left)
    }

    fn not_expr(&mut self) -> Result<Predicate, FilterError> {
        if self.eat(&Token::Not) {
            self.descend()?;
            let inner = self.not_expr()?;
            self.depth -= 1;
            return Ok(inner.not());
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Predicate, FilterError> {
        if self.eat(&Token::LParen) {
            self.descend()?;
            let inner = self.expr()?;
            let (offset, token) = self.next()?;
            if token != Token::RParen {
                return Err(Self::unexpected(offset, &token));
            }
            self.depth -= 1;
            return Ok(inner);
        }

        self.terms += 1;
        if self.terms > MAX_FILTER_TERMS {
            return Err(FilterError::TooManyTerms {
                max: MAX_FILTER_TERMS,
            });
        }

        let left = self.operand()?;
        let (offset, token) = self.next()?;
        match token {
            Token::Op(op) => Ok(Predicate::Compare {
                left,
                op,
                right: self.operand()?,
            }),
            Token::Is => {
                let negated = self.eat(&Token::Not);
                let (offset, token) = self.next()?;
                if token != Token::Null {
                    return Err(Self::unexpected(offset, &token));
                }
                Ok(Predicate::IsNull {
                    operand: left,
                    negated,
                })
            }
            other => Err(Self::unexpected(offset, &other)),
        }
    }

    fn operand(&mut self) -> Result<Operand, FilterError> {
        let (offset, token) = self.next()?;
        let operand = match token {
            Token::Column(column) => Operand::Column(column),
            Token::Text(text) => Operand::Literal(Value::Text(text)),
            Token::Integer(n) => Operand::Literal(Value::Integer(n)),
            Token::Null => Operand::Literal(Value::Null),
            Token::Placeholder => {
                let bound = self
                    .args
                    .get(self.placeholders)
                    .map_or(Value::Null, |arg| Value::Text((*arg).to_string()));
                self.placeholders += 1;
                Operand::Literal(bound)
            }
            other => return Err(Self::unexpected(offset, &other)),
        };
        Ok(operand)
    }
}

pub(super) fn parse(selection: &str, args: &[&str]) -> Result<Predicate, FilterError> {
    let tokens = tokenize(selection)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        args,
        placeholders: 0,
        terms: 0,
    };

    let predicate = parser.expr()?;

    if let Some((offset, token)) = parser.tokens.get(parser.pos) {
        return Err(Parser::unexpected(*offset, token));
    }

    if parser.placeholders != args.len() {
        return Err(FilterError::ArgumentCount {
            placeholders: parser.placeholders,
            supplied: args.len(),
        });
    }

    Ok(predicate)
}
