use crate::constants::DISPATCH_SOFT_DEADLINE_SECS;
use crate::error::CoreResult;
use crate::events::event::{Event, EventKind, EventStatus};
use crate::models::DynastyId;
use crate::store::{DynastyStore, DynastyTables};
use chrono::NaiveDate;
use log::{debug, warn};
use std::time::Instant;

/// What a per-kind handler decided for one event (spec §4.3/§4.5/§7).
pub enum EventOutcome {
    Executed(serde_json::Value),
    Failed(String),
}

pub struct EventDispatchResult {
    pub structured_id: String,
    pub kind: EventKind,
    pub executed: bool,
    pub detail: serde_json::Value,
}

/// For `date`: retrieves due events ordered by `(priority, insertion_order)`,
/// runs each handler inside its own dynasty-scoped transaction, and
/// records the outcome (spec §4.3). A handler that returns
/// `EventOutcome::Failed` rolls back its own mutations and marks the
/// event `failed`; the run continues with the remaining events of the
/// day — failure of one event never corrupts prior events of the same
/// date (spec §4.3).
///
/// `handle` is the closed-set match on `event.kind` to the
/// corresponding per-kind handler (spec §9: "dispatch is a switch on
/// kind", not duck-typed plugin discovery); it runs with exclusive
/// mutable access to this dynasty's tables for the duration of the
/// event's own transaction.
pub fn dispatch_date<S, H>(
    store: &S,
    dynasty: &DynastyId,
    date: NaiveDate,
    mut handle: H,
) -> CoreResult<Vec<EventDispatchResult>>
where
    S: DynastyStore,
    H: FnMut(&mut DynastyTables, &Event) -> EventOutcome,
{
    let started = Instant::now();
    let due_ids: Vec<u64> = store.read(
        dynasty,
        Box::new(move |tables| tables.events_for_date(date).into_iter().map(|e| e.id).collect()),
    )?;

    let mut results = Vec::with_capacity(due_ids.len());

    for event_id in due_ids {
        let outcome = store.with_transaction(
            dynasty,
            Box::new(|tables| {
                let event = tables
                    .events
                    .iter()
                    .find(|e| e.id == event_id)
                    .cloned()
                    .expect("event id came from this dynasty's own table scan");

                let structured_id = event.structured_id.clone();
                let kind = event.kind;
                let outcome = handle(tables, &event);

                match &outcome {
                    EventOutcome::Executed(detail) => {
                        debug!("event executed: {structured_id} ({kind:?})");
                        tables.mark_executed(event_id, EventStatus::Executed, Some(detail.clone()))?;
                    }
                    EventOutcome::Failed(reason) => {
                        warn!("event failed: {structured_id} ({kind:?}): {reason}");
                    }
                }

                Ok((structured_id, kind, outcome))
            }),
        );

        // A handler failure is recorded as a `failed` event, not a
        // transaction rollback of the whole day: the `failed` marker
        // itself must survive, so it is written in its own follow-up
        // transaction when the handler's transaction was rolled back
        // by returning `EventOutcome::Failed` without persisting it.
        match outcome {
            Ok((structured_id, kind, EventOutcome::Executed(detail))) => {
                results.push(EventDispatchResult {
                    structured_id,
                    kind,
                    executed: true,
                    detail,
                });
            }
            Ok((structured_id, kind, EventOutcome::Failed(reason))) => {
                store.with_transaction(
                    dynasty,
                    Box::new(move |tables| {
                        tables.mark_executed(event_id, EventStatus::Failed, Some(serde_json::json!({ "error": reason })))
                    }),
                )?;
                results.push(EventDispatchResult {
                    structured_id,
                    kind,
                    executed: false,
                    detail: serde_json::json!({ "error": "handler error" }),
                });
            }
            Err(err) => return Err(err),
        }
    }

    let elapsed = started.elapsed();
    if elapsed.as_secs() >= DISPATCH_SOFT_DEADLINE_SECS {
        warn!(
            "dispatch for {date} took {elapsed:?} across {} event(s), past the {DISPATCH_SOFT_DEADLINE_SECS}s soft deadline",
            results.len()
        );
    }

    Ok(results)
}
