use crate::models::{Opportunity, Status, StatusFilter};
use crate::repository::{OpportunityRepository, OpportunitySource};
use crate::Result;

/// View state that decides which opportunities are visible
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FilterQuery {
    pub search: String,
    pub status: StatusFilter,
}

impl FilterQuery {
    pub fn new(search: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            search: search.into(),
            status,
        }
    }
}

/// True when `opp` matches an already lowercased search needle
///
/// Empty needle matches everything. Title, organization and each tag are
/// checked as case-insensitive substrings; description is not searched.
fn matches_search(opp: &Opportunity, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    opp.title.to_lowercase().contains(needle)
        || opp.organization.to_lowercase().contains(needle)
        || opp.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
}

/// Visible subset of `records` for a search term and status selection
///
/// Stable: the output keeps the input order and never reorders.
pub fn filter_opportunities<'a>(
    records: &'a [Opportunity],
    search_term: &str,
    status: StatusFilter,
) -> Vec<&'a Opportunity> {
    let needle = search_term.to_lowercase();
    records
        .iter()
        .filter(|opp| matches_search(opp, &needle) && status.matches(opp.status))
        .collect()
}

fn filter_indices(records: &[Opportunity], query: &FilterQuery) -> Vec<usize> {
    let needle = query.search.to_lowercase();
    records
        .iter()
        .enumerate()
        .filter(|(_, opp)| matches_search(opp, &needle) && query.status.matches(opp.status))
        .map(|(idx, _)| idx)
        .collect()
}

/// Per-status totals for the status selector tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub all: usize,
    pub new: usize,
    pub evaluating: usize,
    pub preparing: usize,
    pub submitted: usize,
}

impl StatusCounts {
    pub fn get(&self, filter: StatusFilter) -> usize {
        match filter {
            StatusFilter::All => self.all,
            StatusFilter::Only(status) => self.for_status(status),
        }
    }

    pub fn for_status(&self, status: Status) -> usize {
        match status {
            Status::New => self.new,
            Status::Evaluating => self.evaluating,
            Status::Preparing => self.preparing,
            Status::Submitted => self.submitted,
        }
    }

    /// Sum over the four statuses; always equals `all`
    pub fn total(&self) -> usize {
        self.new + self.evaluating + self.preparing + self.submitted
    }
}

/// Count records per status over the full set
///
/// Deliberately ignores any search term: the tabs show absolute totals.
pub fn count_by_status(records: &[Opportunity]) -> StatusCounts {
    count_statuses(records)
}

/// Same tally over any iterator of records
pub fn count_statuses<'a, I>(records: I) -> StatusCounts
where
    I: IntoIterator<Item = &'a Opportunity>,
{
    records
        .into_iter()
        .fold(StatusCounts::default(), |mut counts, opp| {
            counts.all += 1;
            match opp.status {
                Status::New => counts.new += 1,
                Status::Evaluating => counts.evaluating += 1,
                Status::Preparing => counts.preparing += 1,
                Status::Submitted => counts.submitted += 1,
            }
            counts
        })
}

#[derive(Debug, Clone)]
struct Memo {
    version: u64,
    query: FilterQuery,
    indices: Vec<usize>,
}

/// Repository plus the last computed view over it
///
/// `apply` recomputes the visible subset only when the query or the
/// repository version changed since the previous call. Counts are computed
/// once per repository version.
#[derive(Debug)]
pub struct FilterEngine {
    repository: OpportunityRepository,
    query: FilterQuery,
    memo: Option<Memo>,
    counts: StatusCounts,
    recomputations: u64,
}

impl FilterEngine {
    pub fn new(repository: OpportunityRepository) -> Self {
        let counts = count_by_status(repository.records());
        let mut engine = Self {
            repository,
            query: FilterQuery::default(),
            memo: None,
            counts,
            recomputations: 0,
        };
        engine.apply(&FilterQuery::default());
        engine
    }

    /// Make `query` the active view state, recomputing only if needed
    pub fn apply(&mut self, query: &FilterQuery) {
        let version = self.repository.version();
        let fresh = self
            .memo
            .as_ref()
            .is_some_and(|memo| memo.version == version && memo.query == *query);

        if fresh {
            tracing::debug!("Filter memo hit for {:?}", query);
        } else {
            let indices = filter_indices(self.repository.records(), query);
            tracing::debug!(
                "Filtered {} -> {} opportunities for {:?}",
                self.repository.len(),
                indices.len(),
                query
            );
            self.memo = Some(Memo {
                version,
                query: query.clone(),
                indices,
            });
            self.recomputations += 1;
        }

        self.query = query.clone();
    }

    /// Opportunities visible under the active query, in repository order
    pub fn visible(&self) -> Vec<&Opportunity> {
        let records = self.repository.records();
        self.visible_indices()
            .iter()
            .filter_map(|&idx| records.get(idx))
            .collect()
    }

    pub fn visible_indices(&self) -> &[usize] {
        self.memo
            .as_ref()
            .map(|memo| memo.indices.as_slice())
            .unwrap_or(&[])
    }

    pub fn visible_len(&self) -> usize {
        self.visible_indices().len()
    }

    /// N-th visible opportunity
    pub fn visible_at(&self, position: usize) -> Option<&Opportunity> {
        self.visible_indices()
            .get(position)
            .and_then(|&idx| self.repository.records().get(idx))
    }

    pub fn counts(&self) -> StatusCounts {
        self.counts
    }

    pub fn query(&self) -> &FilterQuery {
        &self.query
    }

    pub fn repository(&self) -> &OpportunityRepository {
        &self.repository
    }

    /// Reload the repository and re-apply the active query against it
    pub fn reload(&mut self, source: &dyn OpportunitySource) -> Result<()> {
        self.repository.reload(source)?;
        self.counts = count_by_status(self.repository.records());
        let query = self.query.clone();
        self.apply(&query);
        Ok(())
    }

    /// How many times the visible subset was actually recomputed
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
