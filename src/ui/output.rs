//! Output functions for consistent CLI formatting

use super::context::UiContext;
use crate::pipeline::Outcome;
use crate::request::CacheRequest;
use console::style;

/// Display a success step
pub fn step_ok(ctx: &UiContext, message: &str) {
    if ctx.is_quiet() {
        return;
    }
    if ctx.use_fancy_output() {
        println!("{} {}", style("✓").green(), message);
    } else {
        println!("{} {}", style("[OK]").green(), message);
    }
}

/// Display a cache miss; not a failure
pub fn step_miss(ctx: &UiContext, message: &str) {
    if ctx.is_quiet() {
        return;
    }
    if ctx.use_fancy_output() {
        println!("{} {}", style("○").yellow(), message);
    } else {
        println!("{} {}", style("[MISS]").yellow(), message);
    }
}

/// Display an error and optional hint on stderr
pub fn error(message: &str, hint: Option<&str>) {
    eprintln!("{} {}", style("Error:").red().bold(), message);
    if let Some(hint) = hint {
        eprintln!("{} {}", style("Hint:").yellow(), hint);
    }
}

/// Report a finished request
pub fn report_outcome(ctx: &UiContext, request: &CacheRequest, outcome: &Outcome) {
    let object = format!("s3://{}/{}", request.bucket, request.object_key());
    match outcome {
        Outcome::Stored { bytes, entries } => step_ok(
            ctx,
            &format!(
                "Cache saved to {} ({} entries, {})",
                object,
                entries,
                human_bytes(*bytes)
            ),
        ),
        Outcome::Restored { bytes, entries } => step_ok(
            ctx,
            &format!(
                "Cache restored from {} ({} entries, {})",
                object,
                entries,
                human_bytes(*bytes)
            ),
        ),
        Outcome::Miss => step_miss(
            ctx,
            &format!("No cache found for key {} in {}", request.key, request.bucket),
        ),
        Outcome::Purged => step_ok(ctx, &format!("Cache purged: {}", object)),
    }
}

/// Format a byte count with a binary unit
fn human_bytes(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Action;

    #[test]
    fn output_non_interactive() {
        let ctx = UiContext::non_interactive();
        let request = CacheRequest::new(Action::Restore, "ci", "deps", None, [""]).unwrap();
        // These should not panic
        report_outcome(&ctx, &request, &Outcome::Miss);
        report_outcome(&ctx, &request, &Outcome::Restored { bytes: 2048, entries: 3 });
        step_ok(&ctx, "Step completed");
        error("Something failed", Some("Try again"));
    }

    #[test]
    fn human_bytes_units() {
        assert_eq!(human_bytes(0), "0 B");
        assert_eq!(human_bytes(1023), "1023 B");
        assert_eq!(human_bytes(1536), "1.5 KiB");
        assert_eq!(human_bytes(5 * 1024 * 1024), "5.0 MiB");
    }
}
