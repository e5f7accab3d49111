use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use tracing::{info, warn};

use crate::{
    config::SweepConfig,
    dispatch::{DispatchController, SendCapability, SendResult},
    error::Result,
    filter::filter_records,
    pairing::group_records,
    payload::extract_payload,
    share::FileLister,
    types::{DispatchOutcome, DocumentPair, FileRecord, Payload, RunSummary, TimeField},
};

/// Listing mode: discover and filter, without pairing or dispatch
pub async fn run_listing(
    lister: Arc<dyn FileLister>,
    folder_path: &str,
    threshold: Option<DateTime<FixedOffset>>,
    time_field: TimeField,
) -> Result<Vec<FileRecord>> {
    let records = lister.list(folder_path).await?;
    info!(
        provider = %lister.identifier(),
        total = records.len(),
        "listed remote folder"
    );
    Ok(filter_records(records, threshold, time_field))
}

/// Post a listing-mode result to a destination URL as JSON
///
/// The listing travels as one serialized array, the same shape the
/// console output uses. Send failures are returned as a `SendResult` for
/// the caller to report; they do not abort anything.
pub async fn post_listing(
    sender: Arc<dyn SendCapability>,
    endpoint: &str,
    records: &[FileRecord],
) -> Result<SendResult> {
    let body = serde_json::to_vec(records)?;
    Ok(sender
        .post(endpoint, "application/json", Bytes::from(body))
        .await)
}

/// Processing mode: the full discover → filter → pair → send cycle
///
/// Fatal errors (`InvalidTimestamp` was already caught at config time,
/// `ShareUnavailable` here) abort the run. Everything scoped to a single
/// document becomes that document's outcome and the sweep continues.
pub async fn run_sweep(
    lister: Arc<dyn FileLister>,
    sender: Arc<dyn SendCapability>,
    config: &SweepConfig,
) -> Result<RunSummary> {
    let records = lister.list(&config.folder_path).await?;
    info!(
        provider = %lister.identifier(),
        total = records.len(),
        "listed remote folder"
    );

    let filtered = filter_records(records, config.threshold, config.time_field);
    info!(eligible = filtered.len(), "records passed the time filter");

    let grouped = group_records(filtered);
    info!(
        pairs = grouped.pairs.len(),
        incomplete = grouped.incomplete.len(),
        unknown = grouped.unknown.len(),
        "grouped records into documents"
    );

    let controller = DispatchController::new(sender, config.endpoint.clone());

    let mut summary = RunSummary {
        unknown: grouped.unknown,
        ..Default::default()
    };

    // Pairs are processed independently: one pair's failure never stops
    // the remaining pairs.
    for pair in &grouped.pairs {
        let outcome = match prepare_pair(lister.as_ref(), pair).await {
            Ok((payload, rendered_content)) => {
                controller.dispatch(pair, &payload, rendered_content).await
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!(key = %pair.key, error = %e, "document preparation failed");
                DispatchOutcome::FailedExtraction {
                    reason: e.to_string(),
                }
            }
        };
        summary.outcomes.push((pair.key.clone(), outcome));
    }

    for (key, missing) in grouped.incomplete {
        info!(key = %key, missing = %missing, "incomplete document, dispatch not attempted");
        summary
            .outcomes
            .push((key, DispatchOutcome::SkippedIncomplete { missing }));
    }

    Ok(summary)
}

/// Read both files of a pair and extract the structured payload
async fn prepare_pair(
    lister: &dyn FileLister,
    pair: &DocumentPair,
) -> Result<(Payload, Bytes)> {
    let structured_content = lister.read(&pair.structured.path).await?;
    let payload = extract_payload(&structured_content)?;
    let rendered_content = lister.read(&pair.rendered.path).await?;
    Ok((payload, rendered_content))
}
