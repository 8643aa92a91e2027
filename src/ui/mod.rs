//! Operator-facing output
//!
//! Interactive terminals get a spinner and symbols; CI logs get plain
//! `[OK]` / `[MISS]` tags. `--json` silences both so stdout carries only the
//! outcome document.

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{error, report_outcome, step_miss, step_ok};
pub use progress::TaskSpinner;
