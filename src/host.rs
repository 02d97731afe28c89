//! The headless host: drives a [`Session`] from parsed command-line
//! arguments the way an interactive surface would from user gestures.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::cli::Cli;
use crate::delivery::{Delivery, DirectorySink, SystemPreviewer};
use crate::error::{OnePdfError, Result};
use crate::ingest::IngestSource;
use crate::io::{DiskFile, FileHandle};
use crate::output::{self, OutputFormatter};
use crate::registry::EntryId;
use crate::reorder::{DragEvent, ReorderOutcome};
use crate::session::{MergeOutcome, Session, UserNotice};
use crate::utils::collect_paths_for_patterns;

/// How long the preview file is kept for the viewer before the process exits.
const PREVIEW_HOLD: Duration = Duration::from_secs(10);

/// Run one collect-reorder-merge-deliver pass.
///
/// Failures are shown to the user as a [`UserNotice`] and returned with
/// full detail for logging and the exit code.
pub async fn run(cli: &Cli, formatter: &OutputFormatter) -> Result<MergeOutcome> {
    let result = run_session(cli, formatter).await;
    if let Err(err) = &result {
        match err {
            OnePdfError::InvalidConfig { .. } => formatter.error(&err.to_string()),
            _ => formatter.notice(UserNotice::from(err)),
        }
    }
    result
}

async fn run_session(cli: &Cli, formatter: &OutputFormatter) -> Result<MergeOutcome> {
    cli.validate()?;
    let config = cli.session_config().await?;
    let mut session = Session::new(config)?;

    let paths = collect_paths_for_patterns(&cli.inputs)?;
    debug!(count = paths.len(), "Resolved input paths");
    let handles = paths
        .into_iter()
        .map(|path| Arc::new(DiskFile::new(path)) as Arc<dyn FileHandle>);
    let report = session.ingest(IngestSource::Picker, handles)?;
    output::display_ingest_report(formatter, &report);

    apply_removals(&mut session, &cli.removals)?;
    for gesture in &cli.moves {
        apply_move(&mut session, gesture.from, gesture.to)?;
    }
    output::display_order(formatter, session.registry());

    let delivery = delivery_for(cli, &session);
    let outcome = merge_and_deliver(&session, &delivery).await?;
    output::display_outcome(formatter, &outcome);

    if outcome.delivery.preview_opened {
        hold_preview(&delivery).await;
    }
    Ok(outcome)
}

/// Keep the preview file until the viewer has had time to load it, or the
/// user interrupts.
async fn hold_preview(delivery: &Delivery) {
    debug!(hold = ?PREVIEW_HOLD, "Holding preview file for the viewer");
    tokio::select! {
        _ = tokio::time::sleep(PREVIEW_HOLD) => {}
        _ = tokio::signal::ctrl_c() => {}
    }
    if let Err(e) = delivery.release_preview() {
        warn!(error = %e, "Could not release preview file");
    }
}

fn delivery_for(cli: &Cli, session: &Session) -> Delivery {
    let dest = cli.dest.clone().unwrap_or_else(|| PathBuf::from("."));
    let delivery = Delivery::new(
        Arc::new(DirectorySink::new(dest)),
        session.config().download_name.clone(),
    );

    if cli.preview {
        delivery.with_preview(Arc::new(SystemPreviewer), session.config().preview_delay())
    } else {
        delivery
    }
}

/// Merge with Ctrl-C wired to the job's cancellation token.
async fn merge_and_deliver(session: &Session, delivery: &Delivery) -> Result<MergeOutcome> {
    let job = session.begin_merge()?;
    let cancel = job.cancel_token();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling merge");
            cancel.cancel();
        }
    });

    let result = job.run().await;
    watcher.abort();
    let result = result?;

    let report = delivery.deliver(&result).await?;
    Ok(MergeOutcome {
        statistics: result.statistics().clone(),
        delivery: report,
    })
}

/// Remove entries by 1-based position in the order before any removal.
fn apply_removals(session: &mut Session, positions: &[usize]) -> Result<()> {
    let ids = positions
        .iter()
        .map(|&pos| id_at(session, pos))
        .collect::<Result<Vec<_>>>()?;

    for id in ids {
        session.remove(id)?;
    }
    Ok(())
}

/// Drag the entry at `from` onto the entry at `to`, both 1-based.
fn apply_move(session: &mut Session, from: usize, to: usize) -> Result<()> {
    let active = id_at(session, from)?;
    let over = id_at(session, to)?;

    session.drag(DragEvent::Start(active));
    let outcome = session.drag(DragEvent::End {
        active,
        over: Some(over),
    });
    if let ReorderOutcome::Unchanged(reason) = outcome {
        debug!(from, to, ?reason, "Move left the order unchanged");
    }
    Ok(())
}

fn id_at(session: &Session, position: usize) -> Result<EntryId> {
    position
        .checked_sub(1)
        .and_then(|idx| session.registry().get_index(idx))
        .map(|entry| entry.id())
        .ok_or_else(|| {
            OnePdfError::invalid_config(format!(
                "No file at position {position} ({} file(s) selected)",
                session.registry().len()
            ))
        })
}
