//! Edge case and property tests for loxi-lex.
