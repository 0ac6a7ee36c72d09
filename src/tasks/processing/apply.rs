//! One resource: check its state, then write it if it is stale.

use anyhow::Result;

use super::Tally;
use crate::resources::{Resource, ResourceChange, ResourceState};
use crate::tasks::Context;

/// Bring one resource to its desired state and report what happened.
pub(super) fn converge<R: Resource>(ctx: &Context, resource: &R, verb: &str) -> Result<Tally> {
    let desc = resource.description();
    let mut tally = Tally::default();

    let state = resource.current_state()?;
    if !state.needs_write() {
        match state {
            ResourceState::Missing => {
                ctx.log.warn(&format!("{desc} not found, skipping"));
                tally.skipped += 1;
            }
            ResourceState::Invalid { reason } => {
                ctx.log.warn(&format!("skipping {desc}: {reason}"));
                tally.skipped += 1;
            }
            _ => {
                ctx.log.debug(&format!("unchanged: {desc}"));
                tally.unchanged += 1;
            }
        }
        return Ok(tally);
    }

    if ctx.dry_run {
        if let ResourceState::Incorrect { current } = &state {
            ctx.log.preview(&format!("would {verb} {desc} ({current})"));
        }
        tally.written += 1;
        return Ok(tally);
    }

    match resource.apply()? {
        ResourceChange::Applied => {
            ctx.log.info(&format!("\u{2713} {verb}: {desc}"));
            tally.written += 1;
        }
        ResourceChange::AlreadyCorrect => tally.unchanged += 1,
        ResourceChange::Skipped { reason } => {
            ctx.log.warn(&format!("skipping {desc}: {reason}"));
            tally.skipped += 1;
        }
    }
    Ok(tally)
}
