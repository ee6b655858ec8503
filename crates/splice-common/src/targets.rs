//! Target names for log filtering.
//!
//! Use these with `RUST_LOG` directives to filter logs by subsystem, e.g.
//! `RUST_LOG=splice::require=debug`.

/// Tokenizer and token-source target.
pub const TOKENIZER: &str = "splice::tokenizer";
/// Rule capture into the rule stores.
pub const CAPTURE: &str = "splice::capture";
/// `@require` harvesting of other stylesheets.
pub const REQUIRE: &str = "splice::require";
/// `@extend` resolution against the required rules.
pub const EXTEND: &str = "splice::extend";
