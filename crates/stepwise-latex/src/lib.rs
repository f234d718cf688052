//! # stepwise-latex
//!
//! LaTeX front end for the stepwise solver.
//!
//! This crate provides:
//! - Input normalization (spacing escapes, braced `=`)
//! - A tokenizer and recursive-descent parser producing arena expressions
//! - Equation splitting at a single top-level `=`
//!
//! ## Example
//!
//! ```
//! use stepwise_core::ExprArena;
//! use stepwise_latex::parse_latex;
//!
//! let mut arena = ExprArena::new();
//! let expr = parse_latex(&mut arena, r"\frac{x^2}{2}").unwrap();
//! assert_eq!(arena.to_latex(expr), r"\frac{x^{2}}{2}");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod lexer;
pub mod parser;
pub mod preprocess;

pub use error::ParseError;
pub use parser::Parser;
pub use preprocess::{preprocess, split_top_level_equals};

use stepwise_core::{ExprArena, ExprHandle};

/// Parses already preprocessed input, including a possible `=`.
///
/// # Errors
///
/// Returns a [`ParseError`] if the input is not a supported expression.
pub fn parse(arena: &mut ExprArena, input: &str) -> Result<ExprHandle, ParseError> {
    Parser::new(arena, input)?.parse()
}

/// Preprocesses and parses LaTeX input.
///
/// If the input has exactly one top-level `=`, both sides are parsed on
/// their own and combined into an equation; should either side fail, the
/// whole string is parsed instead.
///
/// # Errors
///
/// Returns a [`ParseError`] if the input is not a supported expression.
pub fn parse_latex(arena: &mut ExprArena, input: &str) -> Result<ExprHandle, ParseError> {
    let cleaned = preprocess(input);
    tracing::debug!(input, preprocessed = %cleaned, "preprocessed latex");

    if let Some((lhs, rhs)) = split_top_level_equals(&cleaned) {
        match (parse(arena, lhs), parse(arena, rhs)) {
            (Ok(lhs), Ok(rhs)) => return Ok(arena.equality(lhs, rhs)),
            (Err(e), _) | (_, Err(e)) => {
                tracing::debug!(error = %e, "side-by-side parse failed, parsing whole input");
            }
        }
    }
    parse(arena, &cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use stepwise_core::ExprKind;

    fn render(input: &str) -> String {
        let mut arena = ExprArena::new();
        let expr = parse_latex(&mut arena, input).unwrap();
        arena.to_latex(expr)
    }

    #[rstest]
    #[case("x + 1", "x + 1")]
    #[case("2x + 4 = 0", "2 x + 4 = 0")]
    #[case(r"x^2 - 5x + 6", "x^{2} - 5 x + 6")]
    #[case(r"\frac{1}{2}", r"\frac{1}{2}")]
    #[case(r"\frac12 x", r"\frac{x}{2}")]
    #[case("0.25", r"\frac{1}{4}")]
    #[case(r"\sqrt{8}", r"2 \sqrt{2}")]
    #[case(r"\sqrt[3]{x}", r"\sqrt[3]{x}")]
    #[case(r"\sin x", r"\sin{\left(x \right)}")]
    #[case(r"\sin^2 x", r"\sin^{2}{\left(x \right)}")]
    #[case(r"\sin^{-1} x", r"\operatorname{asin}{\left(x \right)}")]
    #[case(r"\ln(x)", r"\ln{\left(x \right)}")]
    #[case(r"e^{x}", "e^{x}")]
    #[case(r"2\pi r", r"2 \pi r")]
    #[case(r"|x|", r"\left|{x}\right|")]
    #[case(r"\left(x+1\right)^2", r"\left(x + 1\right)^{2}")]
    #[case(r"x_1 + x_{2}", "x_{1} + x_{2}")]
    #[case(r"3 \cdot 4", "12")]
    #[case(r"\alpha + 1", r"\alpha + 1")]
    fn test_parse_and_print(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(render(input), expected);
    }

    #[test]
    fn test_indefinite_integral() {
        let mut arena = ExprArena::new();
        let expr = parse_latex(&mut arena, r"\int x\,dx").unwrap();
        assert_eq!(arena.classify(expr), ExprKind::Integral);
        assert_eq!(arena.to_latex(expr), r"\int x\, dx");
    }

    #[test]
    fn test_definite_integral() {
        let mut arena = ExprArena::new();
        let expr = parse_latex(&mut arena, r"\int_0^1 x^2 \mathrm{d}x").unwrap();
        assert_eq!(arena.to_latex(expr), r"\int\limits_{0}^{1} x^{2}\, dx");
    }

    #[test]
    fn test_integral_of_function() {
        let mut arena = ExprArena::new();
        let expr = parse_latex(&mut arena, r"\int \sin x \cos x dx").unwrap();
        assert_eq!(
            arena.to_latex(expr),
            r"\int \cos{\left(x \right)} \sin{\left(x \right)}\, dx"
        );
    }

    #[test]
    fn test_derivative() {
        let mut arena = ExprArena::new();
        let expr = parse_latex(&mut arena, r"\frac{d}{dx} x^3").unwrap();
        assert_eq!(arena.classify(expr), ExprKind::Derivative);
        assert_eq!(arena.to_latex(expr), r"\frac{d}{d x} x^{3}");

        let second = parse_latex(&mut arena, r"\frac{d^2}{dx^2}\left(x^3\right)").unwrap();
        assert_eq!(arena.to_latex(second), r"\frac{d^{2}}{d x^{2}} x^{3}");
    }

    #[test]
    fn test_equation_split() {
        let mut arena = ExprArena::new();
        let expr = parse_latex(&mut arena, "x^2 {=} 4").unwrap();
        assert_eq!(arena.classify(expr), ExprKind::Equality);
    }

    #[rstest]
    #[case("")]
    #[case("x +")]
    #[case(r"\frac{1}")]
    #[case("(x + 1")]
    #[case(r"\unknown{x}")]
    #[case("x = = 1")]
    #[case(r"\int x")]
    fn test_malformed_input_is_an_error(#[case] input: &str) {
        let mut arena = ExprArena::new();
        assert!(parse_latex(&mut arena, input).is_err());
    }
}
