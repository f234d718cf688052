//! Property-based tests for canonical arithmetic.
