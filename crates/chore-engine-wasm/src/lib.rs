//! WASM bindings for chore-engine.
//!
//! Exposes recurrence expansion, rule labels, and agenda building to the web
//! client via `wasm-bindgen`. Rules and databases cross the boundary as JSON
//! strings in the same shape the client keeps in local storage; dates are
//! `YYYY-MM-DD` strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p chore-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir client/src/wasm/ \
//!   target/wasm32-unknown-unknown/release/chore_engine_wasm.wasm
//! ```

use chore_engine::{build_agenda, Database, DateRange, RecurrenceRecord, RecurrenceRule};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Plain-Rust implementations (testable off wasm32)
// ---------------------------------------------------------------------------

fn parse_rule(rule_json: &str) -> Result<RecurrenceRule, String> {
    let record: RecurrenceRecord =
        serde_json::from_str(rule_json).map_err(|e| format!("Invalid rule JSON: {}", e))?;
    RecurrenceRule::try_from(record).map_err(|e| e.to_string())
}

fn expand_json(rule_json: &str, from: &str, to: &str) -> Result<String, String> {
    let rule = parse_rule(rule_json)?;
    let range = DateRange::parse(from, to).map_err(|e| e.to_string())?;
    let dates = chore_engine::expand_range(&rule, &range);
    serde_json::to_string(&dates).map_err(|e| format!("Serialization error: {}", e))
}

fn describe_json(rule_json: &str) -> Result<String, String> {
    parse_rule(rule_json).map(|rule| rule.to_string())
}

fn agenda_json(db_json: &str, from: &str, to: &str) -> Result<String, String> {
    let db: Database =
        serde_json::from_str(db_json).map_err(|e| format!("Invalid database JSON: {}", e))?;
    let range = DateRange::parse(from, to).map_err(|e| e.to_string())?;
    let agenda = build_agenda(&db, &range);
    serde_json::to_string(&agenda).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Expand a stored recurrence rule over `[from, to]`.
///
/// Returns a JSON array of `YYYY-MM-DD` strings in ascending order.
///
/// # Arguments
/// - `rule_json` -- stored rule record (e.g., `{"type":"weekly","daysOfWeek":[1],...}`)
/// - `from` -- first date of the query range, inclusive
/// - `to` -- last date of the query range, inclusive
#[wasm_bindgen(js_name = "expandRule")]
pub fn expand_rule(rule_json: &str, from: &str, to: &str) -> Result<String, JsValue> {
    expand_json(rule_json, from, to).map_err(|e| JsValue::from_str(&e))
}

/// Short human-readable label for a stored rule, e.g. `Monthly (2nd Tue)`.
#[wasm_bindgen(js_name = "describeRule")]
pub fn describe_rule(rule_json: &str) -> Result<String, JsValue> {
    describe_json(rule_json).map_err(|e| JsValue::from_str(&e))
}

/// Build the agenda for a whole chore database (`{members, chores, completions}`).
///
/// Returns a JSON array of agenda entries ordered by date.
#[wasm_bindgen(js_name = "buildAgenda")]
pub fn build_agenda_js(db_json: &str, from: &str, to: &str) -> Result<String, JsValue> {
    agenda_json(db_json, from, to).map_err(|e| JsValue::from_str(&e))
}
