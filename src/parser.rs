/*!
Pratt parser for the Monkey language
====================================

Grammar (EBNF — condensed)
--------------------------

```text
program        → statement* EOF ;
statement      → letStmt | returnStmt | exprStmt ;
letStmt        → "let" IDENT "=" expression ";"? ;
returnStmt     → "return" expression ";"? ;
exprStmt       → expression ";"? ;
block          → "{" statement* "}" ;
expression     → prefix ( infix )* ;            (precedence‑driven)
prefix         → IDENT | INTEGER | "true" | "false"
               | ( "!" | "-" ) expression
               | "(" expression ")"
               | "if" "(" expression ")" block ( "else" block )?
               | "fn" "(" parameters? ")" block
               | "macro" "(" parameters? ")" block ;
infix          → ( "==" | "!=" | "<" | "<=" | ">" | ">=" | "+" | "-" | "*" | "/" ) expression
               | "(" arguments? ")" ;
parameters     → IDENT ( "," IDENT )* ;
arguments      → expression ( "," expression )* ;
```

Expression parsing is **Pratt** style: each token kind has a binding power
([`Precedence`]) and [`Parser::expression`] keeps folding infix operators while
the next operator binds tighter than the caller's.  Call is just the
tightest‑binding infix, triggered by `(`.

### Logging Policy

| Location                     | Level  | Purpose                                   |
|------------------------------|--------|-------------------------------------------|
| `Parser::new`, `parse`       | `info` | Lifecycle milestones.                     |
| `statement`, `expression`    | `debug`| High‑level descent into grammar branches. |
*/

use crate::ast::{BlockStatement, Expression, InfixOperator, PrefixOperator, Program, Statement};
use crate::error::{MonkeyError, Result};
use crate::scanner;
use crate::token::{Token, TokenType};

use log::{debug, info};

use std::rc::Rc;

/// Operator binding power, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    /// `==` `!=`
    Equals,
    /// `<` `<=` `>` `>=`
    LessGreater,
    /// `+` `-`
    Sum,
    /// `*` `/`
    Product,
    /// `-x` `!x`
    Prefix,
    /// `f(x)`
    Call,
}

impl Precedence {
    fn of(token_type: &TokenType) -> Self {
        match token_type {
            TokenType::EQUAL_EQUAL | TokenType::BANG_EQUAL => Precedence::Equals,
            TokenType::LESS
            | TokenType::LESS_EQUAL
            | TokenType::GREATER
            | TokenType::GREATER_EQUAL => Precedence::LessGreater,
            TokenType::PLUS | TokenType::MINUS => Precedence::Sum,
            TokenType::STAR | TokenType::SLASH => Precedence::Product,
            TokenType::LEFT_PAREN => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

fn infix_operator(token_type: &TokenType) -> Option<InfixOperator> {
    let op = match token_type {
        TokenType::PLUS => InfixOperator::Plus,
        TokenType::MINUS => InfixOperator::Minus,
        TokenType::STAR => InfixOperator::Star,
        TokenType::SLASH => InfixOperator::Slash,
        TokenType::LESS => InfixOperator::Less,
        TokenType::LESS_EQUAL => InfixOperator::LessEqual,
        TokenType::GREATER => InfixOperator::Greater,
        TokenType::GREATER_EQUAL => InfixOperator::GreaterEqual,
        TokenType::EQUAL_EQUAL => InfixOperator::Equal,
        TokenType::BANG_EQUAL => InfixOperator::NotEqual,
        _ => return None,
    };
    Some(op)
}

/// Top‑level parser over an immutable slice of tokens.  The slice must end
/// with the scanner's `EOF` token.
pub struct Parser<'a> {
    tokens: &'a [Token<'a>],
    current: usize,
}

impl<'a> Parser<'a> {
    /// Construct a new parser.
    pub fn new(tokens: &'a [Token<'a>]) -> Self {
        info!("Parser created with {} tokens", tokens.len());

        Self { tokens, current: 0 }
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse an entire program.  The first syntax error aborts the parse.
    pub fn parse(&mut self) -> Result<Program> {
        info!("Beginning parse phase");

        let mut statements: Vec<Statement> = Vec::new();

        while !self.is_at_end() {
            statements.push(self.statement()?);
        }

        info!("Parsed {} top-level statement(s)", statements.len());

        Ok(Program { statements })
    }

    // ───────────────────────── statement rules ────────────────────

    fn statement(&mut self) -> Result<Statement> {
        debug!("Entering statement at line {}", self.peek().line);

        if self.matches(TokenType::LET) {
            self.let_statement()
        } else if self.matches(TokenType::RETURN) {
            self.return_statement()
        } else {
            self.expression_statement()
        }
    }

    fn let_statement(&mut self) -> Result<Statement> {
        let name: &Token<'_> = self.consume(TokenType::IDENTIFIER, "Expected name after 'let'")?;

        self.consume(TokenType::EQUAL, "Expected '=' after let binding name")?;

        let value: Expression = self.expression(Precedence::Lowest)?;

        self.matches(TokenType::SEMICOLON);

        Ok(Statement::Let {
            name: name.lexeme.to_string(),
            value,
        })
    }

    fn return_statement(&mut self) -> Result<Statement> {
        let value: Expression = self.expression(Precedence::Lowest)?;

        self.matches(TokenType::SEMICOLON);

        Ok(Statement::Return(value))
    }

    fn expression_statement(&mut self) -> Result<Statement> {
        let expr: Expression = self.expression(Precedence::Lowest)?;

        self.matches(TokenType::SEMICOLON);

        Ok(Statement::Expression(expr))
    }

    /// Statements up to the closing `}`.  The opening `{` is already consumed.
    fn block(&mut self) -> Result<BlockStatement> {
        let mut statements: Vec<Statement> = Vec::new();

        while !self.check(TokenType::RIGHT_BRACE) && !self.is_at_end() {
            statements.push(self.statement()?);
        }

        self.consume(TokenType::RIGHT_BRACE, "Expected '}' after block")?;

        Ok(BlockStatement { statements })
    }

    // ─────────────────────── expression rules (Pratt) ─────────────

    fn expression(&mut self, precedence: Precedence) -> Result<Expression> {
        let mut left: Expression = self.prefix()?;

        while !self.check(TokenType::SEMICOLON)
            && !self.is_at_end()
            && precedence < Precedence::of(&self.peek().token_type)
        {
            let operator: &'a Token<'a> = self.advance();
            left = self.infix(left, operator)?;
        }

        Ok(left)
    }

    fn prefix(&mut self) -> Result<Expression> {
        if self.is_at_end() {
            return Err(MonkeyError::parse(
                self.peek().line,
                "Expected expression, found end of input",
            ));
        }

        let token: &Token<'_> = self.advance();
        debug!("Prefix position: {:?}", token.token_type);

        match &token.token_type {
            TokenType::IDENTIFIER => Ok(Expression::Identifier(token.lexeme.to_string())),

            TokenType::INTEGER(n) => Ok(Expression::IntegerLiteral(*n)),

            TokenType::TRUE => Ok(Expression::BooleanLiteral(true)),

            TokenType::FALSE => Ok(Expression::BooleanLiteral(false)),

            TokenType::BANG | TokenType::MINUS => {
                let operator = if token.token_type == TokenType::BANG {
                    PrefixOperator::Bang
                } else {
                    PrefixOperator::Minus
                };
                let right: Expression = self.expression(Precedence::Prefix)?;

                Ok(Expression::Prefix {
                    operator,
                    right: Box::new(right),
                })
            }

            TokenType::LEFT_PAREN => {
                let expr: Expression = self.expression(Precedence::Lowest)?;

                self.consume(TokenType::RIGHT_PAREN, "Expected ')' after expression")?;

                Ok(expr)
            }

            TokenType::IF => self.if_expression(),

            TokenType::FUNCTION => {
                let (parameters, body) = self.parameters_and_body("fn")?;

                Ok(Expression::FunctionLiteral {
                    parameters,
                    body: Rc::new(body),
                })
            }

            TokenType::MACRO => {
                let (parameters, body) = self.parameters_and_body("macro")?;

                Ok(Expression::MacroLiteral {
                    parameters,
                    body: Rc::new(body),
                })
            }

            _ => Err(MonkeyError::parse(
                token.line,
                format!("Expected expression, found '{}'", token.lexeme),
            )),
        }
    }

    fn infix(&mut self, left: Expression, operator: &Token<'a>) -> Result<Expression> {
        if operator.token_type == TokenType::LEFT_PAREN {
            return self.finish_call(left);
        }

        let op: InfixOperator = infix_operator(&operator.token_type).ok_or_else(|| {
            MonkeyError::parse(
                operator.line,
                format!("Unknown infix operator '{}'", operator.lexeme),
            )
        })?;
        let right: Expression = self.expression(Precedence::of(&operator.token_type))?;

        Ok(Expression::Infix {
            left: Box::new(left),
            operator: op,
            right: Box::new(right),
        })
    }

    fn if_expression(&mut self) -> Result<Expression> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'if'")?;
        let condition: Expression = self.expression(Precedence::Lowest)?;
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after condition")?;

        self.consume(TokenType::LEFT_BRACE, "Expected '{' before if body")?;
        let consequence: BlockStatement = self.block()?;

        let alternative: Option<BlockStatement> = if self.matches(TokenType::ELSE) {
            self.consume(TokenType::LEFT_BRACE, "Expected '{' after 'else'")?;
            Some(self.block()?)
        } else {
            None
        };

        Ok(Expression::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    /// `"(" parameters? ")" block`, shared by `fn` and `macro` literals.
    fn parameters_and_body(&mut self, kind: &str) -> Result<(Vec<String>, BlockStatement)> {
        self.consume(
            TokenType::LEFT_PAREN,
            &format!("Expected '(' after '{}'", kind),
        )?;

        let mut parameters: Vec<String> = Vec::new();
        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                let param: &Token<'_> =
                    self.consume(TokenType::IDENTIFIER, "Expected parameter name")?;
                parameters.push(param.lexeme.to_string());

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after parameters")?;
        self.consume(
            TokenType::LEFT_BRACE,
            &format!("Expected '{{' before {} body", kind),
        )?;
        let body: BlockStatement = self.block()?;

        Ok((parameters, body))
    }

    fn finish_call(&mut self, callee: Expression) -> Result<Expression> {
        let mut arguments: Vec<Expression> = Vec::new();
        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                arguments.push(self.expression(Precedence::Lowest)?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after arguments")?;

        Ok(Expression::Call {
            function: Box::new(callee),
            arguments,
        })
    }

    // ────────────────────── utility helpers ───────────────────────

    #[inline(always)]
    fn matches(&mut self, ttype: TokenType) -> bool {
        if self.check(ttype) {
            self.advance();

            return true;
        }

        false
    }

    #[inline(always)]
    fn consume(&mut self, ttype: TokenType, message: &str) -> Result<&'a Token<'a>> {
        if self.check(ttype) {
            return Ok(self.advance());
        }

        debug!(
            "consume failed: wanted {}, found {:?}",
            message,
            self.peek().token_type
        );

        Err(MonkeyError::parse(self.peek().line, message))
    }

    #[inline(always)]
    fn check(&self, ttype: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().token_type == ttype
    }

    #[inline(always)]
    fn advance(&mut self) -> &'a Token<'a> {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        matches!(self.peek().token_type, TokenType::EOF)
    }

    #[inline(always)]
    fn peek(&self) -> &'a Token<'a> {
        &self.tokens[self.current]
    }

    #[inline(always)]
    fn previous(&self) -> &'a Token<'a> {
        &self.tokens[self.current - 1]
    }
}

/// Scan and parse `source` in one go.
pub fn parse_source(source: &str) -> Result<Program> {
    let tokens: Vec<Token<'_>> = scanner::scan_all(source)?;

    let mut parser = Parser::new(&tokens);

    parser.parse()
}
