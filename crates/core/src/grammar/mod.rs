/// Resolved grammar tree types.
pub mod ast;
mod atomic;
mod combinator;
/// Re-exports from the diagnostics crate.
pub mod diag;
/// JSON serialization helpers for resolved trees.
pub mod dump;
/// Grammar emitter: converts a resolved tree back to normalized text.
pub mod emit;
/// Resolution errors and their diagnostic codes.
pub mod error;
/// Delimiter masking used before combinator scanning.
pub mod mask;
/// The recursive resolver and its entry points.
pub mod resolver;
mod split;
/// Re-exports of syntax table types used by the resolver.
pub mod tables;
/// Indented tree rendering.
pub mod tree;
