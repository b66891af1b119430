//! JSONL rendering of a plan: one event per line, then a summary record.

use crate::encode::PrimitiveKind;
use crate::plan::Plan;
use anyhow::Result;
use chrono::Utc;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

pub fn render_jsonl(plan: &Plan, include_timestamp: bool) -> Result<String> {
    let mut lines = Vec::with_capacity(plan.events.len() + 1);
    for (index, event) in plan.events.iter().enumerate() {
        // BTreeMap keeps keys sorted so lines diff cleanly between runs.
        let mut entry: BTreeMap<&str, Value> = BTreeMap::new();
        entry.insert("delay_ms", Value::Number(event.delay_ms.into()));
        entry.insert("index", Value::Number(index.into()));
        entry.insert("kind", Value::String(event.kind.as_str().to_string()));
        lines.push(serde_json::to_string(&entry)?);
    }

    lines.push(serde_json::to_string(&Value::Object(summary(plan, include_timestamp)))?);
    Ok(format!("{}\n", lines.join("\n")))
}

fn summary(plan: &Plan, include_timestamp: bool) -> Map<String, Value> {
    let mut counts = Map::new();
    for kind in PrimitiveKind::ALL {
        let n = plan.events.iter().filter(|e| e.kind == kind).count();
        counts.insert(kind.as_str().to_string(), json!(n));
    }

    let total_ms: u64 = plan.events.iter().map(|e| e.delay_ms * 2).sum();

    let mut summary = Map::new();
    summary.insert("counts".to_string(), Value::Object(counts));
    summary.insert("estimated_ms".to_string(), json!(total_ms));
    summary.insert("events".to_string(), json!(plan.events.len()));
    if include_timestamp {
        summary.insert(
            "generated_at".to_string(),
            Value::String(Utc::now().format("%Y-%m-%dT%H:%M:%S+00:00").to_string()),
        );
    }
    summary.insert("log_lines".to_string(), json!(plan.log.len()));
    summary.insert("outcome".to_string(), json!(plan.outcome));
    summary.insert("summary".to_string(), Value::Bool(true));
    summary
}
