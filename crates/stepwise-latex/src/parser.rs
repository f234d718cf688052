//! Recursive-descent parser from tokens to arena expressions.
//!
//! Precedence, loosest first: `=`, `+ -`, products (explicit and implicit),
//! unary minus, `^`. Function arguments without parentheses extend over an
//! implicit product of atoms, so `\sin 2x` is `\sin(2x)`.

use stepwise_core::{Constant, ExprArena, ExprHandle, Function, Rational};

use crate::error::ParseError;
use crate::lexer::{tokenize, Token, TokenKind};

/// Greek letters accepted as symbol names.
const GREEK: [&str; 33] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "varepsilon", "zeta", "eta", "theta",
    "vartheta", "iota", "kappa", "lambda", "mu", "nu", "xi", "rho", "sigma", "tau", "upsilon",
    "phi", "varphi", "chi", "psi", "omega", "Gamma", "Delta", "Theta", "Lambda", "Xi", "Sigma",
    "Phi", "Omega",
];

/// Functions reachable through a control sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionName {
    Elementary(Function),
    Sec,
    Csc,
    Cot,
    Log,
}

impl FunctionName {
    fn from_name(name: &str) -> Option<Self> {
        let func = match name {
            "sin" => Function::Sin,
            "cos" => Function::Cos,
            "tan" => Function::Tan,
            "arcsin" | "asin" => Function::Asin,
            "arccos" | "acos" => Function::Acos,
            "arctan" | "atan" => Function::Atan,
            "exp" => Function::Exp,
            "ln" => Function::Ln,
            "sec" => return Some(Self::Sec),
            "csc" => return Some(Self::Csc),
            "cot" => return Some(Self::Cot),
            "log" => return Some(Self::Log),
            _ => return None,
        };
        Some(Self::Elementary(func))
    }
}

/// Parses one expression (optionally an equation) from a token stream.
pub struct Parser<'a> {
    arena: &'a mut ExprArena,
    tokens: Vec<Token>,
    pos: usize,
    end: usize,
    integral_depth: usize,
    abs_depth: usize,
}

impl<'a> Parser<'a> {
    /// Tokenizes `input` and prepares a parser writing into `arena`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be tokenized.
    pub fn new(arena: &'a mut ExprArena, input: &str) -> Result<Self, ParseError> {
        Ok(Self {
            arena,
            tokens: tokenize(input)?,
            pos: 0,
            end: input.len(),
            integral_depth: 0,
            abs_depth: 0,
        })
    }

    /// Parses the whole input.
    ///
    /// # Errors
    ///
    /// Returns an error on empty input, malformed syntax or trailing tokens.
    pub fn parse(mut self) -> Result<ExprHandle, ParseError> {
        if self.tokens.is_empty() {
            return Err(ParseError::new(0, "empty expression"));
        }
        let expr = self.parse_equation()?;
        if self.pos < self.tokens.len() {
            return Err(self.error("unexpected token"));
        }
        Ok(expr)
    }

    // === Token helpers ===

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn peek_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<TokenKind> {
        let token = self.tokens.get(self.pos).map(|t| t.kind.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<(), ParseError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    fn is_command(&self, offset: usize, name: &str) -> bool {
        matches!(self.peek_at(offset), Some(TokenKind::Command(c)) if c == name)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let position = self.tokens.get(self.pos).map_or(self.end, |t| t.pos);
        ParseError::new(position, message)
    }

    // === Grammar ===

    fn parse_equation(&mut self) -> Result<ExprHandle, ParseError> {
        let lhs = self.parse_additive()?;
        if !self.eat(&TokenKind::Equals) {
            return Ok(lhs);
        }
        let rhs = self.parse_additive()?;
        if self.peek() == Some(&TokenKind::Equals) {
            return Err(self.error("chained equations are not supported"));
        }
        Ok(self.arena.equality(lhs, rhs))
    }

    fn parse_additive(&mut self) -> Result<ExprHandle, ParseError> {
        let mut acc = self.parse_term()?;
        loop {
            if self.eat(&TokenKind::Plus) {
                let rhs = self.parse_term()?;
                acc = self.arena.add(acc, rhs);
            } else if self.eat(&TokenKind::Minus) {
                let rhs = self.parse_term()?;
                acc = self.arena.sub(acc, rhs);
            } else {
                return Ok(acc);
            }
        }
    }

    fn parse_term(&mut self) -> Result<ExprHandle, ParseError> {
        let mut acc = self.parse_unary()?;
        loop {
            let multiply = self.eat(&TokenKind::Star)
                || self.eat_command("cdot")
                || self.eat_command("times");
            if multiply {
                let rhs = self.parse_unary()?;
                acc = self.arena.mul(acc, rhs);
                continue;
            }
            if self.eat(&TokenKind::Slash) || self.eat_command("div") {
                let rhs = self.parse_unary()?;
                acc = self.arena.div(acc, rhs);
                continue;
            }
            if self.starts_operand() {
                let rhs = self.parse_power()?;
                acc = self.arena.mul(acc, rhs);
                continue;
            }
            return Ok(acc);
        }
    }

    fn eat_command(&mut self, name: &str) -> bool {
        if self.is_command(0, name) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_unary(&mut self) -> Result<ExprHandle, ParseError> {
        if self.eat(&TokenKind::Minus) {
            let inner = self.parse_unary()?;
            return Ok(self.arena.neg(inner));
        }
        if self.eat(&TokenKind::Plus) {
            return self.parse_unary();
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> Result<ExprHandle, ParseError> {
        let base = self.parse_primary()?;
        if self.eat(&TokenKind::Caret) {
            let exp = self.parse_script()?;
            return Ok(self.arena.pow(base, exp));
        }
        Ok(base)
    }

    /// True if the next token can begin an implicitly multiplied operand.
    fn starts_operand(&self) -> bool {
        if self.at_differential() {
            return false;
        }
        match self.peek() {
            Some(
                TokenKind::Number(_)
                | TokenKind::Letter(_)
                | TokenKind::LParen
                | TokenKind::LBrace
                | TokenKind::LBracket,
            ) => true,
            Some(TokenKind::Pipe) => self.abs_depth == 0,
            Some(TokenKind::Command(name)) => !matches!(
                name.as_str(),
                "cdot" | "times" | "div" | "right" | "infty"
            ),
            _ => false,
        }
    }

    /// True at `dx` or `\mathrm{d} x` while inside an integral.
    fn at_differential(&self) -> bool {
        if self.integral_depth == 0 {
            return false;
        }
        let is_var = |kind: Option<&TokenKind>| match kind {
            Some(TokenKind::Letter(_)) => true,
            Some(TokenKind::Command(name)) => GREEK.contains(&name.as_str()),
            _ => false,
        };
        match self.peek() {
            Some(TokenKind::Letter('d')) => is_var(self.peek_at(1)),
            Some(TokenKind::Command(name)) if name == "mathrm" || name == "operatorname" => {
                self.peek_at(1) == Some(&TokenKind::LBrace)
                    && self.peek_at(2) == Some(&TokenKind::Letter('d'))
                    && self.peek_at(3) == Some(&TokenKind::RBrace)
            }
            _ => false,
        }
    }

    fn parse_primary(&mut self) -> Result<ExprHandle, ParseError> {
        let Some(kind) = self.peek().cloned() else {
            return Err(self.error("unexpected end of input"));
        };
        match kind {
            TokenKind::Number(_) => self.parse_number(false),
            TokenKind::Letter(c) => {
                self.pos += 1;
                if c == 'e' && self.peek() != Some(&TokenKind::Underscore) {
                    return Ok(self.arena.constant(Constant::E));
                }
                self.parse_symbol(c.to_string())
            }
            TokenKind::LParen => self.parse_delimited(&TokenKind::RParen, "')'"),
            TokenKind::LBracket => self.parse_delimited(&TokenKind::RBracket, "']'"),
            TokenKind::LBrace => self.parse_delimited(&TokenKind::RBrace, "'}'"),
            TokenKind::Pipe => {
                self.pos += 1;
                self.abs_depth += 1;
                let inner = self.parse_additive()?;
                self.abs_depth -= 1;
                self.expect(&TokenKind::Pipe, "closing '|'")?;
                Ok(self.arena.apply(Function::Abs, inner))
            }
            TokenKind::Command(name) => {
                self.pos += 1;
                self.parse_command(&name)
            }
            _ => Err(self.error("expected an operand")),
        }
    }

    fn parse_delimited(&mut self, close: &TokenKind, what: &str) -> Result<ExprHandle, ParseError> {
        self.pos += 1;
        let saved_abs = std::mem::replace(&mut self.abs_depth, 0);
        let inner = self.parse_additive()?;
        self.abs_depth = saved_abs;
        self.expect(close, what)?;
        Ok(inner)
    }

    /// A number token; in scripts only its first digit belongs to the script.
    fn parse_number(&mut self, single_digit: bool) -> Result<ExprHandle, ParseError> {
        let Some(Token {
            kind: TokenKind::Number(text),
            pos,
        }) = self.tokens.get(self.pos).cloned()
        else {
            return Err(self.error("expected a number"));
        };

        let is_integer = !text.contains('.');
        if single_digit && is_integer && text.len() > 1 {
            let (first, rest) = text.split_at(1);
            self.tokens[self.pos] = Token {
                kind: TokenKind::Number(rest.to_string()),
                pos: pos + 1,
            };
            let value = parse_decimal(first).ok_or_else(|| self.error("invalid number"))?;
            return Ok(self.arena.number(value));
        }

        self.pos += 1;
        let value =
            parse_decimal(&text).ok_or_else(|| ParseError::new(pos, "invalid number"))?;
        Ok(self.arena.number(value))
    }

    fn parse_symbol(&mut self, mut name: String) -> Result<ExprHandle, ParseError> {
        if self.eat(&TokenKind::Underscore) {
            name.push('_');
            name.push_str(&self.parse_subscript_text()?);
        }
        Ok(self.arena.symbol(&name))
    }

    fn parse_subscript_text(&mut self) -> Result<String, ParseError> {
        let mut text = String::new();
        if self.eat(&TokenKind::LBrace) {
            loop {
                match self.advance() {
                    Some(TokenKind::RBrace) => break,
                    Some(TokenKind::Letter(c)) => text.push(c),
                    Some(TokenKind::Number(n)) => text.push_str(&n),
                    Some(TokenKind::Command(c)) => text.push_str(&c),
                    _ => return Err(self.error("unsupported subscript")),
                }
            }
        } else {
            match self.peek().cloned() {
                Some(TokenKind::Letter(c)) => {
                    self.pos += 1;
                    text.push(c);
                }
                Some(TokenKind::Number(_)) => {
                    let digit = self.parse_number(true)?;
                    text.push_str(&self.arena.to_latex(digit));
                }
                _ => return Err(self.error("expected a subscript")),
            }
        }
        if text.is_empty() {
            return Err(self.error("empty subscript"));
        }
        Ok(text)
    }

    /// The argument of `^`, `_`, `\frac` or `\sqrt`: a braced group or one atom.
    fn parse_script(&mut self) -> Result<ExprHandle, ParseError> {
        match self.peek() {
            Some(TokenKind::LBrace) => self.parse_delimited(&TokenKind::RBrace, "'}'"),
            Some(TokenKind::Minus) => {
                self.pos += 1;
                let inner = self.parse_script()?;
                Ok(self.arena.neg(inner))
            }
            Some(TokenKind::Number(_)) => self.parse_number(true),
            _ => self.parse_primary(),
        }
    }

    fn parse_command(&mut self, name: &str) -> Result<ExprHandle, ParseError> {
        match name {
            "frac" | "dfrac" | "tfrac" => {
                if let Some((order, var)) = self.try_derivative_operator() {
                    let operand = self.parse_term()?;
                    return Ok(self.arena.derivative(operand, var, order));
                }
                let numer = self.parse_script()?;
                let denom = self.parse_script()?;
                Ok(self.arena.div(numer, denom))
            }
            "sqrt" => {
                let index = if self.eat(&TokenKind::LBracket) {
                    let index = self.parse_additive()?;
                    self.expect(&TokenKind::RBracket, "']'")?;
                    Some(index)
                } else {
                    None
                };
                let radicand = self.parse_script()?;
                match index {
                    None => Ok(self.arena.sqrt(radicand)),
                    Some(index) => {
                        let one = self.arena.integer(1);
                        let exp = self.arena.div(one, index);
                        Ok(self.arena.pow(radicand, exp))
                    }
                }
            }
            "pi" => Ok(self.arena.constant(Constant::Pi)),
            "int" => self.parse_integral(),
            "left" => self.parse_left(),
            "mathrm" | "mathit" | "text" | "operatorname" => {
                let text = self.parse_braced_text()?;
                if let Some(func) = FunctionName::from_name(&text) {
                    return self.parse_function(func);
                }
                match text.as_str() {
                    "e" => Ok(self.arena.constant(Constant::E)),
                    "" => Err(self.error("empty text group")),
                    _ => self.parse_symbol(text),
                }
            }
            greek if GREEK.contains(&greek) => self.parse_symbol(format!("\\{greek}")),
            other => match FunctionName::from_name(other) {
                Some(func) => self.parse_function(func),
                None => Err(self.error(format!("unsupported command '\\{other}'"))),
            },
        }
    }

    fn parse_braced_text(&mut self) -> Result<String, ParseError> {
        self.expect(&TokenKind::LBrace, "'{'")?;
        let mut text = String::new();
        loop {
            match self.advance() {
                Some(TokenKind::RBrace) => return Ok(text),
                Some(TokenKind::Letter(c)) => text.push(c),
                Some(TokenKind::Number(n)) => text.push_str(&n),
                _ => return Err(self.error("unsupported text group")),
            }
        }
    }

    /// `\left( ... \right)`, `\left[ ... \right]` and `\left| ... \right|`.
    fn parse_left(&mut self) -> Result<ExprHandle, ParseError> {
        let (close, is_abs) = match self.advance() {
            Some(TokenKind::LParen) => (TokenKind::RParen, false),
            Some(TokenKind::LBracket) => (TokenKind::RBracket, false),
            Some(TokenKind::LBrace) => (TokenKind::RBrace, false),
            Some(TokenKind::Pipe) => (TokenKind::Pipe, true),
            _ => return Err(self.error("unsupported delimiter after \\left")),
        };
        let saved_abs = std::mem::replace(&mut self.abs_depth, 0);
        let inner = self.parse_additive()?;
        self.abs_depth = saved_abs;
        if !self.eat_command("right") {
            return Err(self.error("expected \\right"));
        }
        self.expect(&close, "matching delimiter after \\right")?;
        if is_abs {
            Ok(self.arena.apply(Function::Abs, inner))
        } else {
            Ok(inner)
        }
    }

    fn parse_function(&mut self, func: FunctionName) -> Result<ExprHandle, ParseError> {
        let power = if self.eat(&TokenKind::Caret) {
            Some(self.parse_script()?)
        } else {
            None
        };
        let log_base = if func == FunctionName::Log && self.eat(&TokenKind::Underscore) {
            Some(self.parse_script()?)
        } else {
            None
        };

        let arg = self.parse_function_argument()?;

        let inverse = power
            .and_then(|p| self.arena.as_number(p).cloned())
            .is_some_and(|p| p == Rational::from(-1));
        let (value, power) = match func {
            FunctionName::Elementary(f) if inverse && f.is_trigonometric() => {
                let inverse_func = match f {
                    Function::Sin => Function::Asin,
                    Function::Cos => Function::Acos,
                    _ => Function::Atan,
                };
                (self.arena.apply(inverse_func, arg), None)
            }
            FunctionName::Elementary(f) => (self.arena.apply(f, arg), power),
            FunctionName::Sec | FunctionName::Csc | FunctionName::Cot => {
                let (numer, denom) = match func {
                    FunctionName::Sec => (None, Function::Cos),
                    FunctionName::Csc => (None, Function::Sin),
                    _ => (Some(Function::Cos), Function::Sin),
                };
                let denom = self.arena.apply(denom, arg);
                let numer = match numer {
                    Some(f) => self.arena.apply(f, arg),
                    None => self.arena.integer(1),
                };
                (self.arena.div(numer, denom), power)
            }
            FunctionName::Log => {
                let ln = self.arena.apply(Function::Ln, arg);
                let value = match log_base {
                    Some(base) => {
                        let ln_base = self.arena.apply(Function::Ln, base);
                        self.arena.div(ln, ln_base)
                    }
                    None => ln,
                };
                (value, power)
            }
        };

        Ok(match power {
            Some(p) => self.arena.pow(value, p),
            None => value,
        })
    }

    /// Parenthesized argument, or an implicit product of plain atoms.
    fn parse_function_argument(&mut self) -> Result<ExprHandle, ParseError> {
        let parenthesized = matches!(
            self.peek(),
            Some(TokenKind::LParen | TokenKind::LBrace | TokenKind::LBracket)
        ) || self.is_command(0, "left");
        if parenthesized {
            return self.parse_primary();
        }

        let mut acc = self.parse_unary()?;
        while !self.at_differential()
            && matches!(self.peek(), Some(TokenKind::Number(_) | TokenKind::Letter(_)))
        {
            let rhs = self.parse_power()?;
            acc = self.arena.mul(acc, rhs);
        }
        Ok(acc)
    }

    /// Recognizes `{d}{dx}` or `{d^n}{dx^n}` after `\frac`.
    fn try_derivative_operator(&mut self) -> Option<(u32, ExprHandle)> {
        let start = self.pos;
        if let Some((order, var)) = self.derivative_operator_tokens() {
            return Some((order, self.arena.symbol(&var)));
        }
        self.pos = start;
        None
    }

    fn derivative_operator_tokens(&mut self) -> Option<(u32, String)> {
        if !self.eat(&TokenKind::LBrace) || !self.eat(&TokenKind::Letter('d')) {
            return None;
        }
        let numer_order = self.derivative_order()?;
        if !self.eat(&TokenKind::RBrace) || !self.eat(&TokenKind::LBrace) {
            return None;
        }
        if !self.eat(&TokenKind::Letter('d')) {
            return None;
        }
        let var = match self.advance()? {
            TokenKind::Letter(c) => c.to_string(),
            TokenKind::Command(name) if GREEK.contains(&name.as_str()) => format!("\\{name}"),
            _ => return None,
        };
        let denom_order = self.derivative_order()?;
        if !self.eat(&TokenKind::RBrace) || numer_order != denom_order {
            return None;
        }
        Some((numer_order, var))
    }

    /// Optional `^n` or `^{n}` on a differential; defaults to 1.
    fn derivative_order(&mut self) -> Option<u32> {
        if !self.eat(&TokenKind::Caret) {
            return Some(1);
        }
        let braced = self.eat(&TokenKind::LBrace);
        let order = match self.advance()? {
            TokenKind::Number(n) => n.parse::<u32>().ok()?,
            _ => return None,
        };
        if braced && !self.eat(&TokenKind::RBrace) {
            return None;
        }
        (order >= 1).then_some(order)
    }

    /// `\int f dx` and `\int_a^b f dx`.
    fn parse_integral(&mut self) -> Result<ExprHandle, ParseError> {
        let mut lower = None;
        let mut upper = None;
        for _ in 0..2 {
            if lower.is_none() && self.eat(&TokenKind::Underscore) {
                lower = Some(self.parse_script()?);
            } else if upper.is_none() && self.eat(&TokenKind::Caret) {
                upper = Some(self.parse_script()?);
            }
        }
        let bounds = match (lower, upper) {
            (Some(a), Some(b)) => Some((a, b)),
            (None, None) => None,
            _ => return Err(self.error("a definite integral needs both bounds")),
        };

        self.integral_depth += 1;
        let integrand = if self.at_differential() {
            Ok(self.arena.integer(1))
        } else {
            self.parse_additive()
        };
        let var = integrand.and_then(|integrand| {
            self.parse_differential().map(|var| (integrand, var))
        });
        self.integral_depth -= 1;

        let (integrand, var) = var?;
        Ok(self.arena.integral(integrand, var, bounds))
    }

    fn parse_differential(&mut self) -> Result<ExprHandle, ParseError> {
        if !self.at_differential() {
            return Err(self.error("expected a differential such as 'dx'"));
        }
        if self.eat(&TokenKind::Letter('d')) {
            // plain `d`
        } else {
            // `\mathrm{d}`
            self.pos += 4;
        }
        match self.advance() {
            Some(TokenKind::Letter(c)) => self.parse_symbol(c.to_string()),
            Some(TokenKind::Command(name)) => self.parse_symbol(format!("\\{name}")),
            _ => Err(self.error("expected an integration variable")),
        }
    }
}

/// Parses `12`, `0.25` or `3.` into an exact rational.
fn parse_decimal(text: &str) -> Option<Rational> {
    match text.split_once('.') {
        None => text.parse().ok(),
        Some((whole, frac)) => {
            let whole = if whole.is_empty() { "0" } else { whole };
            let digits = format!("{whole}{frac}");
            let scale = format!("1{}", "0".repeat(frac.len()));
            format!("{digits}/{scale}").parse().ok()
        }
    }
}
