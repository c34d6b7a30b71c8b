//! Refresh pipeline and pagination arithmetic
//!
//! A refresh cycle fetches one listing page, narrows it by search text,
//! resolves every surviving entry's detail, applies the type and generation
//! filters, and hands back the survivors in listing order. Any failure aborts
//! the whole cycle.

use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::api::{CatalogSource, FetchError};
use crate::state::{EntryDetail, EntrySummary, FilterCriteria};

/// Upper bound on detail requests in flight during one cycle.
pub const DETAIL_CONCURRENCY: usize = 8;

/// Everything one cycle needs, captured when the cycle is triggered.
#[derive(Clone, Debug, PartialEq)]
pub struct RefreshRequest {
    pub generation: u64,
    pub page: u32,
    pub page_size: u32,
    pub filters: FilterCriteria,
}

impl RefreshRequest {
    pub fn offset(&self) -> u32 {
        page_offset(self.page, self.page_size)
    }
}

/// Result of a completed cycle, tagged with the generation that started it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RefreshOutcome {
    pub generation: u64,
    pub page: u32,
    /// Unfiltered provider count; pagination is derived from this.
    pub total_count: u32,
    pub entries: Vec<EntryDetail>,
}

pub fn total_pages(total_count: u32, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(page_size)
}

pub fn page_offset(page: u32, page_size: u32) -> u32 {
    page.saturating_sub(1).saturating_mul(page_size)
}

/// Page numbers to show as controls: every page when there are at most
/// `width` of them, otherwise `width` pages centred on `current` and clamped
/// to `[1, total]`. Empty when `total` is zero.
pub fn page_window(current: u32, total: u32, width: u32) -> RangeInclusive<u32> {
    if total == 0 {
        return 1..=0;
    }
    let width = width.clamp(1, total);
    let start = current
        .saturating_sub(width / 2)
        .max(1)
        .min(total - width + 1);
    start..=start + width - 1
}

/// Run one refresh cycle against `source`.
///
/// Failures are logged here, once per cycle, and returned untouched.
pub async fn run_refresh<S>(source: S, request: RefreshRequest) -> Result<RefreshOutcome, FetchError>
where
    S: CatalogSource + Clone + 'static,
{
    tracing::debug!(
        generation = request.generation,
        page = request.page,
        filters = ?request.filters,
        "refresh cycle started"
    );
    match refresh_cycle(source, &request).await {
        Ok(outcome) => {
            tracing::info!(
                generation = outcome.generation,
                page = outcome.page,
                shown = outcome.entries.len(),
                total = outcome.total_count,
                "refresh cycle completed"
            );
            Ok(outcome)
        }
        Err(err) => {
            tracing::error!(
                generation = request.generation,
                page = request.page,
                error = %err,
                "refresh cycle aborted"
            );
            Err(err)
        }
    }
}

async fn refresh_cycle<S>(source: S, request: &RefreshRequest) -> Result<RefreshOutcome, FetchError>
where
    S: CatalogSource + Clone + 'static,
{
    let listing = source
        .fetch_page(request.offset(), request.page_size)
        .await?;
    let summaries: Vec<EntrySummary> = listing
        .results
        .into_iter()
        .filter(|summary| request.filters.matches_search(&summary.name))
        .collect();

    let generation = if summaries.is_empty() {
        None
    } else {
        request.filters.generation_filter.clone()
    };
    let (details, members) = tokio::try_join!(
        fetch_details(source.clone(), summaries),
        fetch_members(source, generation),
    )?;

    Ok(RefreshOutcome {
        generation: request.generation,
        page: request.page,
        total_count: listing.total_count,
        entries: retain_matching(details, &request.filters, members.as_ref()),
    })
}

/// Fetch every summary's detail concurrently, returning them in input order.
async fn fetch_details<S>(source: S, summaries: Vec<EntrySummary>) -> Result<Vec<EntryDetail>, FetchError>
where
    S: CatalogSource + Clone + 'static,
{
    let count = summaries.len();
    let semaphore = Arc::new(Semaphore::new(DETAIL_CONCURRENCY));
    let mut join_set = JoinSet::new();
    for (index, summary) in summaries.into_iter().enumerate() {
        let source = source.clone();
        let semaphore = semaphore.clone();
        join_set.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|_| FetchError::Task("detail semaphore closed".to_string()))?;
            let detail = source.fetch_detail(&summary.url).await?;
            Ok::<_, FetchError>((index, detail))
        });
    }

    let mut slots: Vec<Option<EntryDetail>> = (0..count).map(|_| None).collect();
    while let Some(joined) = join_set.join_next().await {
        let (index, detail) = match joined {
            Ok(result) => result?,
            Err(err) => return Err(FetchError::Task(err.to_string())),
        };
        slots[index] = Some(detail);
    }
    Ok(slots.into_iter().flatten().collect())
}

async fn fetch_members<S>(source: S, generation: Option<String>) -> Result<Option<HashSet<String>>, FetchError>
where
    S: CatalogSource,
{
    let Some(generation) = generation else {
        return Ok(None);
    };
    let members = source.fetch_generation_members(&generation).await?;
    Ok(Some(members.into_iter().collect()))
}

/// Keep details that pass the type filter and, when a membership list is
/// given, belong to it by exact name. Order is preserved.
pub fn retain_matching(
    details: Vec<EntryDetail>,
    filters: &FilterCriteria,
    members: Option<&HashSet<String>>,
) -> Vec<EntryDetail> {
    details
        .into_iter()
        .filter(|detail| filters.matches_type(detail))
        .filter(|detail| members.map_or(true, |names| names.contains(&detail.name)))
        .collect()
}
