//! Plain-text plan rendering.

use crate::encode::PrimitiveKind;
use crate::plan::{Outcome, Plan};

/// Log lines, then the event stream with consecutive repeats collapsed.
pub fn render_text(plan: &Plan) -> String {
    let mut out = String::new();

    out.push_str("Log:\n");
    for line in &plan.log {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }

    out.push_str("Events:\n");
    for (kind, run) in collapse_runs(plan) {
        if run == 1 {
            out.push_str(&format!("  {}\n", kind));
        } else {
            out.push_str(&format!("  {} x{}\n", kind, run));
        }
    }

    let outcome = match plan.outcome {
        Outcome::Completed => "completed",
        Outcome::Stopped => "stopped",
    };
    out.push_str(&format!("{} events, {}\n", plan.events.len(), outcome));
    out
}

fn collapse_runs(plan: &Plan) -> Vec<(PrimitiveKind, usize)> {
    let mut runs: Vec<(PrimitiveKind, usize)> = Vec::new();
    for event in &plan.events {
        match runs.last_mut() {
            Some((kind, count)) if *kind == event.kind => *count += 1,
            _ => runs.push((event.kind, 1)),
        }
    }
    runs
}
