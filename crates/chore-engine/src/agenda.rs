//! Agenda building -- joins expanded occurrences with completion records.
//!
//! The chore database is owned by the caller (a key-value store in the web
//! client, a JSON file for the CLI). This module only reads it: every chore's
//! rule is expanded over the query range and each occurrence is looked up in
//! the completion records by `(chore id, scheduled date)`.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::expander::expand_range;
use crate::range::DateRange;
use crate::rule::RecurrenceRule;

/// A household member chores can be assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A repeating task with its recurrence rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chore {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub assignee_id: Option<String>,
    pub recurrence: RecurrenceRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Record that a chore was done for one scheduled date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    pub id: String,
    pub chore_id: String,
    pub completed_by: String,
    #[serde(default)]
    pub completed_by_name: Option<String>,
    pub scheduled_date: NaiveDate,
    pub completed_at: DateTime<Utc>,
}

/// The full chore store as persisted by the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub chores: Vec<Chore>,
    #[serde(default)]
    pub completions: Vec<Completion>,
}

/// One occurrence of a chore, with assignee and completion details resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaEntry {
    pub chore_id: String,
    pub title: String,
    pub description: String,
    pub assignee_id: Option<String>,
    pub assignee_name: Option<String>,
    pub assignee_color: Option<String>,
    pub date: NaiveDate,
    pub is_completed: bool,
    pub completion_id: Option<String>,
    pub completed_by: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Build the agenda for every chore in `db` over `range`.
///
/// Entries are ordered by date, then by the chore's position in the database.
/// When several completions share a chore and scheduled date, the earliest
/// record in `db.completions` is the one reported.
/// An assignee id with no matching member resolves to no name or color; a
/// completion by an unknown member falls back to the name stored on the
/// completion record.
pub fn build_agenda(db: &Database, range: &DateRange) -> Vec<AgendaEntry> {
    let members: HashMap<&str, &Member> = db.members.iter().map(|m| (m.id.as_str(), m)).collect();
    // The first record wins when one occurrence was marked done more than once.
    let mut completions: HashMap<(&str, NaiveDate), &Completion> = HashMap::new();
    for c in &db.completions {
        completions
            .entry((c.chore_id.as_str(), c.scheduled_date))
            .or_insert(c);
    }

    let mut entries = Vec::new();
    for chore in &db.chores {
        let assignee = chore
            .assignee_id
            .as_deref()
            .and_then(|id| members.get(id).copied());
        if chore.assignee_id.is_some() && assignee.is_none() {
            warn!(chore = %chore.id, "chore is assigned to an unknown member");
        }

        for date in expand_range(&chore.recurrence, range) {
            let completion = completions.get(&(chore.id.as_str(), date)).copied();
            let completed_by = completion.and_then(|c| {
                members
                    .get(c.completed_by.as_str())
                    .map(|m| m.name.clone())
                    .or_else(|| c.completed_by_name.clone())
            });

            entries.push(AgendaEntry {
                chore_id: chore.id.clone(),
                title: chore.title.clone(),
                description: chore.description.clone(),
                assignee_id: chore.assignee_id.clone(),
                assignee_name: assignee.map(|m| m.name.clone()),
                assignee_color: assignee.and_then(|m| m.color.clone()),
                date,
                is_completed: completion.is_some(),
                completion_id: completion.map(|c| c.id.clone()),
                completed_by,
                completed_at: completion.map(|c| c.completed_at),
            });
        }
    }

    // Stable sort keeps database order among chores on the same date.
    entries.sort_by_key(|e| e.date);

    debug!(
        %range,
        chores = db.chores.len(),
        entries = entries.len(),
        "built agenda"
    );
    entries
}
