//! LaTeX printer.
//!
//! Output follows the conventions of common computer-algebra systems:
//! `\frac{x^{2}}{2}`, `\sin{\left(x \right)}`, `\left[ 2, \  3\right]`.

use num_traits::One;

use crate::arena::ExprArena;
use crate::expr::{Constant, ExprNode, Function};
use crate::handle::ExprHandle;
use crate::number::Rational;

/// Exponent of a factor being printed.
#[derive(Clone)]
enum Exponent {
    /// A stored exponent expression.
    Expr(ExprHandle),
    /// A number, possibly the negation of a stored one.
    Number(Rational),
}

impl ExprArena {
    /// Renders an expression as LaTeX.
    #[must_use]
    pub fn to_latex(&self, expr: ExprHandle) -> String {
        Printer { arena: self }.print(expr)
    }

    /// Renders a list of expressions as a LaTeX list.
    #[must_use]
    pub fn list_to_latex(&self, items: &[ExprHandle]) -> String {
        if items.is_empty() {
            return r"\left[ \right]".to_string();
        }
        let printer = Printer { arena: self };
        let body: Vec<String> = items.iter().map(|&h| printer.print(h)).collect();
        format!(r"\left[ {}\right]", body.join(r", \  "))
    }
}

struct Printer<'a> {
    arena: &'a ExprArena,
}

impl Printer<'_> {
    fn print(&self, h: ExprHandle) -> String {
        match self.arena.get(h) {
            ExprNode::Number(n) => print_number(n),
            ExprNode::Symbol(id) => print_symbol(self.arena.symbol_name(*id)),
            ExprNode::Constant(c) => print_constant(*c).to_string(),
            ExprNode::Add(args) => self.print_add(args),
            ExprNode::Mul(_) => self.print_term(h, false),
            ExprNode::Pow { base, exp } => match self.arena.as_number(*exp) {
                Some(e) if e.is_negative() => self.print_term(h, false),
                _ => self.print_power(*base, &Exponent::Expr(*exp)),
            },
            ExprNode::Function { func, arg } => self.print_function(*func, *arg, None),
            ExprNode::Derivative { expr, var, order } => {
                let var = self.print(*var);
                let body = self.print_operand(*expr);
                if *order == 1 {
                    format!(r"\frac{{d}}{{d {var}}} {body}")
                } else {
                    format!(r"\frac{{d^{{{order}}}}}{{d {var}^{{{order}}}}} {body}")
                }
            }
            ExprNode::Integral { expr, var, bounds } => {
                let var = self.print(*var);
                let body = self.print_operand(*expr);
                match bounds {
                    None => format!(r"\int {body}\, d{var}"),
                    Some((lower, upper)) => format!(
                        r"\int\limits_{{{}}}^{{{}}} {body}\, d{var}",
                        self.print(*lower),
                        self.print(*upper)
                    ),
                }
            }
            ExprNode::Equality { lhs, rhs } => {
                format!("{} = {}", self.print(*lhs), self.print(*rhs))
            }
        }
    }

    /// Operand of an integral or derivative; sums get parentheses.
    fn print_operand(&self, h: ExprHandle) -> String {
        match self.arena.get(h) {
            ExprNode::Add(_) => format!(r"\left({}\right)", self.print(h)),
            _ => self.print(h),
        }
    }

    // === Sums ===

    fn print_add(&self, args: &[ExprHandle]) -> String {
        let has_symbols = args.iter().any(|&a| !self.arena.free_symbols(a).is_empty());
        let mut terms: Vec<(i64, ExprHandle)> = args
            .iter()
            .map(|&a| (self.print_degree(a, has_symbols), a))
            .collect();
        terms.sort_by(|x, y| y.0.cmp(&x.0));

        let mut out = String::new();
        for (i, &(_, term)) in terms.iter().enumerate() {
            let negative = self.is_negative_term(term);
            match (i, negative) {
                (0, true) => out.push_str("- "),
                (0, false) => {}
                (_, true) => out.push_str(" - "),
                (_, false) => out.push_str(" + "),
            }
            out.push_str(&self.print_term(term, negative));
        }
        out
    }

    /// Sort key placing high powers first and bare numbers at the end.
    fn print_degree(&self, h: ExprHandle, has_symbols: bool) -> i64 {
        match self.arena.get(h) {
            ExprNode::Number(_) => {
                if has_symbols {
                    -1
                } else {
                    i64::MAX
                }
            }
            ExprNode::Symbol(_) => 1,
            ExprNode::Pow { base, exp } => match (self.arena.get(*base), self.arena.as_number(*exp)) {
                (ExprNode::Symbol(_), Some(e)) => e.to_i64().unwrap_or(0),
                _ => 0,
            },
            ExprNode::Mul(args) => args
                .iter()
                .filter(|&&a| self.arena.as_number(a).is_none())
                .map(|&a| self.print_degree(a, has_symbols))
                .sum(),
            _ => 0,
        }
    }

    fn is_negative_term(&self, h: ExprHandle) -> bool {
        match self.arena.get(h) {
            ExprNode::Number(n) => n.is_negative(),
            ExprNode::Mul(args) => self
                .arena
                .as_number(args[0])
                .is_some_and(Rational::is_negative),
            _ => false,
        }
    }

    // === Products ===

    /// Prints a product (or a lone factor), optionally with its sign flipped.
    fn print_term(&self, h: ExprHandle, negate: bool) -> String {
        let (mut coeff, factors): (Rational, Vec<ExprHandle>) = match self.arena.get(h) {
            ExprNode::Number(n) => (n.clone(), Vec::new()),
            ExprNode::Mul(args) => match self.arena.as_number(args[0]) {
                Some(n) => (n.clone(), args[1..].to_vec()),
                None => (Rational::one(), args.to_vec()),
            },
            _ => (Rational::one(), vec![h]),
        };
        if negate {
            coeff = -coeff;
        }
        if factors.is_empty() {
            return print_number(&coeff);
        }
        if factors.len() == 1 && coeff.is_one() {
            if let ExprNode::Pow { exp, .. } = self.arena.get(factors[0]) {
                if !self.arena.as_number(*exp).is_some_and(Rational::is_negative) {
                    return self.print(factors[0]);
                }
            } else {
                return self.print(factors[0]);
            }
        }

        let mut sign = "";
        if coeff.is_negative() {
            sign = "- ";
            coeff = -coeff;
        }

        let mut numer: Vec<(ExprHandle, Exponent)> = Vec::new();
        let mut denom: Vec<(ExprHandle, Exponent)> = Vec::new();
        for &f in &factors {
            match self.arena.get(f) {
                ExprNode::Pow { base, exp } => match self.arena.as_number(*exp) {
                    Some(e) if e.is_negative() => denom.push((*base, Exponent::Number(-e))),
                    _ => numer.push((*base, Exponent::Expr(*exp))),
                },
                _ => numer.push((f, Exponent::Number(Rational::one()))),
            }
        }

        let mut numer_parts: Vec<String> = Vec::new();
        let coeff_num = coeff.numerator();
        if !coeff_num.is_one() {
            numer_parts.push(coeff_num.to_string());
        }
        let lone_numer = numer.len() == 1 && numer_parts.is_empty();
        for (base, exp) in &numer {
            numer_parts.push(self.print_factor(*base, exp, lone_numer && !denom.is_empty()));
        }

        let mut denom_parts: Vec<String> = Vec::new();
        let coeff_den = coeff.denominator();
        if !coeff_den.is_one() {
            denom_parts.push(coeff_den.to_string());
        }
        let lone_denom = denom.len() == 1 && denom_parts.is_empty();
        for (base, exp) in &denom {
            denom_parts.push(self.print_factor(*base, exp, lone_denom));
        }

        let numer_str = if numer_parts.is_empty() {
            "1".to_string()
        } else {
            numer_parts.join(" ")
        };
        if denom_parts.is_empty() {
            format!("{sign}{numer_str}")
        } else {
            format!(r"{sign}\frac{{{numer_str}}}{{{}}}", denom_parts.join(" "))
        }
    }

    /// A factor inside a product; sums are parenthesized unless alone.
    fn print_factor(&self, base: ExprHandle, exp: &Exponent, alone: bool) -> String {
        let is_unit = match exp {
            Exponent::Number(n) => n.is_one(),
            Exponent::Expr(_) => false,
        };
        if is_unit {
            return match self.arena.get(base) {
                ExprNode::Add(_) if !alone => format!(r"\left({}\right)", self.print(base)),
                _ => self.print(base),
            };
        }
        self.print_power(base, exp)
    }

    // === Powers ===

    fn print_power(&self, base: ExprHandle, exp: &Exponent) -> String {
        let exp_value: Option<Rational> = match exp {
            Exponent::Number(n) => Some(n.clone()),
            Exponent::Expr(h) => self.arena.as_number(*h).cloned(),
        };

        if let Some(e) = &exp_value {
            if e.is_one() {
                return self.print(base);
            }
            if e.numerator().is_one() && !e.is_integer() {
                let root = e.denominator();
                let radicand = self.print(base);
                return if root == crate::number::Integer::new(2) {
                    format!(r"\sqrt{{{radicand}}}")
                } else {
                    format!(r"\sqrt[{root}]{{{radicand}}}")
                };
            }
            if e.is_integer() && e.is_positive() {
                if let ExprNode::Function { func, arg } = self.arena.get(base) {
                    if *func != Function::Exp && *func != Function::Abs {
                        return self.print_function(*func, *arg, Some(&e.to_string()));
                    }
                }
            }
            if e.is_negative() {
                let positive = Exponent::Number(-e.clone());
                return format!(r"\frac{{1}}{{{}}}", self.print_factor(base, &positive, true));
            }
        }

        let exp_str = match exp {
            Exponent::Number(n) => print_number(n),
            Exponent::Expr(h) => self.print(*h),
        };
        format!("{}^{{{exp_str}}}", self.print_base(base))
    }

    fn print_base(&self, base: ExprHandle) -> String {
        let plain = match self.arena.get(base) {
            ExprNode::Symbol(_) | ExprNode::Constant(_) => true,
            ExprNode::Number(n) => n.is_integer() && !n.is_negative(),
            ExprNode::Function { func, .. } => *func != Function::Exp,
            _ => false,
        };
        if plain {
            self.print(base)
        } else {
            format!(r"\left({}\right)", self.print(base))
        }
    }

    // === Functions ===

    fn print_function(&self, func: Function, arg: ExprHandle, power: Option<&str>) -> String {
        let arg_str = self.print(arg);
        let name = match func {
            Function::Exp => return format!("e^{{{arg_str}}}"),
            Function::Abs => return format!(r"\left|{{{arg_str}}}\right|"),
            Function::Sin => r"\sin",
            Function::Cos => r"\cos",
            Function::Tan => r"\tan",
            Function::Ln => r"\ln",
            Function::Asin => r"\operatorname{asin}",
            Function::Acos => r"\operatorname{acos}",
            Function::Atan => r"\operatorname{atan}",
        };
        match power {
            Some(p) => format!(r"{name}^{{{p}}}{{\left({arg_str} \right)}}"),
            None => format!(r"{name}{{\left({arg_str} \right)}}"),
        }
    }
}

fn print_number(n: &Rational) -> String {
    if n.is_integer() {
        return n.numerator().to_string();
    }
    let sign = if n.is_negative() { "- " } else { "" };
    let abs = n.abs();
    format!(r"{sign}\frac{{{}}}{{{}}}", abs.numerator(), abs.denominator())
}

fn print_symbol(name: &str) -> String {
    match name.split_once('_') {
        Some((head, sub)) if !sub.is_empty() => format!("{head}_{{{sub}}}"),
        _ => name.to_string(),
    }
}

fn print_constant(c: Constant) -> &'static str {
    match c {
        Constant::E => "e",
        Constant::Pi => r"\pi",
        Constant::I => "i",
    }
}
