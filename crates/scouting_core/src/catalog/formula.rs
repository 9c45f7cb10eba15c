//! A minimal arithmetic expression language for Catalogue formulas
//! (spec §4.2): `+ - * /`, parentheses, numeric literals, and
//! identifiers that name a PlayerSeason-derived column. Composite
//! formulas such as `non_penalty_goals / shots_on_target` are ordinary
//! expressions over those identifiers; the Catalogue never hard-codes
//! their computation, only their shape.

use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub enum Formula {
    Column(String),
    Constant(f64),
    Add(Box<Formula>, Box<Formula>),
    Sub(Box<Formula>, Box<Formula>),
    Mul(Box<Formula>, Box<Formula>),
    Div(Box<Formula>, Box<Formula>),
}

impl Formula {
    pub fn parse(expr: &str) -> Result<Self, String> {
        let tokens = tokenize(expr)?;
        let mut parser = Parser { tokens, pos: 0 };
        let formula = parser.parse_expr()?;
        if parser.pos != parser.tokens.len() {
            return Err(format!("unexpected trailing input in formula `{expr}`"));
        }
        Ok(formula)
    }

    /// Column identifiers this formula reads, for the Catalogue's
    /// startup self-check against the Store Gateway's schema.
    pub fn referenced_columns(&self) -> HashSet<String> {
        let mut out = HashSet::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns(&self, out: &mut HashSet<String>) {
        match self {
            Formula::Column(name) => {
                out.insert(name.clone());
            }
            Formula::Constant(_) => {}
            Formula::Add(a, b) | Formula::Sub(a, b) | Formula::Mul(a, b) | Formula::Div(a, b) => {
                a.collect_columns(out);
                b.collect_columns(out);
            }
        }
    }

    /// Evaluate against a resolved field map (column name -> value).
    /// Division by (near-)zero and missing columns both yield `None`,
    /// the Metric Engine's signal to report `insufficient` rather than
    /// NaN or infinity.
    pub fn eval(&self, fields: &std::collections::HashMap<String, f64>) -> Option<f64> {
        match self {
            Formula::Column(name) => fields.get(name).copied(),
            Formula::Constant(v) => Some(*v),
            Formula::Add(a, b) => Some(a.eval(fields)? + b.eval(fields)?),
            Formula::Sub(a, b) => Some(a.eval(fields)? - b.eval(fields)?),
            Formula::Mul(a, b) => Some(a.eval(fields)? * b.eval(fields)?),
            Formula::Div(a, b) => {
                let denom = b.eval(fields)?;
                if denom.abs() < f64::EPSILON {
                    None
                } else {
                    Some(a.eval(fields)? / denom)
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(expr: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = expr.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\n' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let value = text.parse::<f64>().map_err(|_| format!("bad number literal `{text}`"))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                tokens.push(Token::Ident(text));
            }
            other => return Err(format!("unexpected character `{other}` in formula `{expr}`")),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        t
    }

    fn parse_expr(&mut self) -> Result<Formula, String> {
        let mut lhs = self.parse_term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.advance();
                    let rhs = self.parse_term()?;
                    lhs = Formula::Add(Box::new(lhs), Box::new(rhs));
                }
                Some(Token::Minus) => {
                    self.advance();
                    let rhs = self.parse_term()?;
                    lhs = Formula::Sub(Box::new(lhs), Box::new(rhs));
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Formula, String> {
        let mut lhs = self.parse_factor()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.advance();
                    let rhs = self.parse_factor()?;
                    lhs = Formula::Mul(Box::new(lhs), Box::new(rhs));
                }
                Some(Token::Slash) => {
                    self.advance();
                    let rhs = self.parse_factor()?;
                    lhs = Formula::Div(Box::new(lhs), Box::new(rhs));
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    fn parse_factor(&mut self) -> Result<Formula, String> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(Formula::Constant(n)),
            Some(Token::Ident(name)) => Ok(Formula::Column(name)),
            Some(Token::Minus) => Ok(Formula::Sub(Box::new(Formula::Constant(0.0)), Box::new(self.parse_factor()?))),
            Some(Token::LParen) => {
                let inner = self.parse_expr()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err("expected closing parenthesis".to_string()),
                }
            }
            other => Err(format!("unexpected token {other:?} in formula")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parses_simple_ratio() {
        let f = Formula::parse("non_penalty_goals / shots_on_target").unwrap();
        let cols = f.referenced_columns();
        assert!(cols.contains("non_penalty_goals"));
        assert!(cols.contains("shots_on_target"));
    }

    #[test]
    fn evaluates_composite_expression() {
        let f = Formula::parse("(goals - penalty_goals) / shots").unwrap();
        let mut fields = HashMap::new();
        fields.insert("goals".to_string(), 10.0);
        fields.insert("penalty_goals".to_string(), 2.0);
        fields.insert("shots".to_string(), 40.0);
        assert_eq!(f.eval(&fields), Some(0.2));
    }

    #[test]
    fn division_by_zero_is_none() {
        let f = Formula::parse("goals / shots").unwrap();
        let mut fields = HashMap::new();
        fields.insert("goals".to_string(), 1.0);
        fields.insert("shots".to_string(), 0.0);
        assert_eq!(f.eval(&fields), None);
    }

    #[test]
    fn missing_column_is_none() {
        let f = Formula::parse("unknown_column").unwrap();
        assert_eq!(f.eval(&HashMap::new()), None);
    }
}
