use crate::models::{Opportunity, OpportunityRecord};
use crate::{Error, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Built-in opportunity list used when no data file is configured
pub const FIXTURE_JSON: &str = include_str!("../data/opportunities.json");

/// Anything that can hand over a list of opportunities
///
/// The built-in fixture and a JSON file both implement this, and a real
/// backend client would too. The repository and filter engine only ever see
/// this trait, so swapping the source changes nothing downstream.
#[cfg_attr(test, mockall::automock)]
pub trait OpportunitySource: Send + Sync {
    /// Short human-readable name, shown in logs and the status bar
    fn name(&self) -> String;

    /// Fetch every opportunity in display order
    fn fetch(&self) -> Result<Vec<Opportunity>>;
}

/// The static fixture shipped with the crate
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureSource;

impl OpportunitySource for FixtureSource {
    fn name(&self) -> String {
        "fixture".to_string()
    }

    fn fetch(&self) -> Result<Vec<Opportunity>> {
        parse_records(FIXTURE_JSON)
    }
}

/// Opportunities read from a JSON array on disk
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OpportunitySource for JsonFileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Vec<Opportunity>> {
        let contents = std::fs::read_to_string(&self.path)?;
        parse_records(&contents)
    }
}

/// Pick the source for an optional data file path, fixture when unset
pub fn source_for(path: Option<&Path>) -> Box<dyn OpportunitySource> {
    match path {
        Some(path) => Box::new(JsonFileSource::new(path)),
        None => Box::new(FixtureSource),
    }
}

/// Parse a JSON array of opportunity records into typed opportunities
pub fn parse_records(json: &str) -> Result<Vec<Opportunity>> {
    let records: Vec<OpportunityRecord> = serde_json::from_str(json)?;
    records.into_iter().map(Opportunity::try_from).collect()
}

/// Read-only, ordered set of opportunities
///
/// Record order is display order. Records are never edited in place; a reload
/// swaps the whole list and bumps `version`, which is what memoized views key
/// on to notice the change.
#[derive(Debug, Clone)]
pub struct OpportunityRepository {
    records: Vec<Opportunity>,
    version: u64,
    source_name: String,
}

impl OpportunityRepository {
    pub fn from_source(source: &dyn OpportunitySource) -> Result<Self> {
        let records = source.fetch()?;
        check_unique_ids(&records)?;

        tracing::info!(
            "Loaded {} opportunities from {}",
            records.len(),
            source.name()
        );

        Ok(Self {
            records,
            version: 0,
            source_name: source.name(),
        })
    }

    pub fn from_records(records: Vec<Opportunity>) -> Result<Self> {
        check_unique_ids(&records)?;
        Ok(Self {
            records,
            version: 0,
            source_name: "memory".to_string(),
        })
    }

    /// Replace the records with a fresh fetch from `source`
    ///
    /// On error the repository keeps its current records and version.
    pub fn reload(&mut self, source: &dyn OpportunitySource) -> Result<()> {
        let records = source.fetch()?;
        check_unique_ids(&records)?;

        self.records = records;
        self.version = self.version.wrapping_add(1);
        self.source_name = source.name();

        tracing::info!(
            "Reloaded {} opportunities from {} (version {})",
            self.records.len(),
            self.source_name,
            self.version
        );
        Ok(())
    }

    pub fn records(&self) -> &[Opportunity] {
        &self.records
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, id: &str) -> Result<&Opportunity> {
        self.records
            .iter()
            .find(|opp| opp.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }
}

fn check_unique_ids(records: &[Opportunity]) -> Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for opp in records {
        if !seen.insert(opp.id.as_str()) {
            return Err(Error::DuplicateId(opp.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, Status};
    use std::io::Write;

    #[test]
    fn test_fixture_has_four_records_in_order() {
        let records = FixtureSource.fetch().unwrap();
        let ids: Vec<&str> = records.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
        assert_eq!(records[0].priority, Priority::Urgent);
        assert_eq!(records[1].status, Status::Evaluating);
        assert_eq!(records[3].tags.len(), 3);
    }

    #[test]
    fn test_repository_from_mock_source() {
        let mut source = MockOpportunitySource::new();
        source.expect_name().return_const("mock".to_string());
        source
            .expect_fetch()
            .times(1)
            .returning(|| FixtureSource.fetch());

        let repo = OpportunityRepository::from_source(&source).unwrap();
        assert_eq!(repo.len(), 4);
        assert_eq!(repo.version(), 0);
        assert_eq!(repo.source_name(), "mock");
    }

    #[test]
    fn test_failing_source_propagates_error() {
        let mut source = MockOpportunitySource::new();
        source.expect_name().return_const("broken".to_string());
        source
            .expect_fetch()
            .returning(|| Err(Error::InvalidStatus("archivada".to_string())));

        let result = OpportunityRepository::from_source(&source);
        assert!(matches!(result, Err(Error::InvalidStatus(_))));
    }

    #[test]
    fn test_reload_bumps_version_and_keeps_state_on_failure() {
        let mut repo = OpportunityRepository::from_source(&FixtureSource).unwrap();

        let mut smaller = MockOpportunitySource::new();
        smaller.expect_name().return_const("smaller".to_string());
        smaller.expect_fetch().returning(|| {
            let mut records = FixtureSource.fetch()?;
            records.truncate(2);
            Ok(records)
        });
        repo.reload(&smaller).unwrap();
        assert_eq!(repo.version(), 1);
        assert_eq!(repo.len(), 2);

        let mut broken = MockOpportunitySource::new();
        broken.expect_name().return_const("broken".to_string());
        broken
            .expect_fetch()
            .returning(|| Err(Error::NotFound("backend".to_string())));
        assert!(repo.reload(&broken).is_err());
        assert_eq!(repo.version(), 1);
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut records = FixtureSource.fetch().unwrap();
        records[2].id = "1".to_string();
        assert!(matches!(
            OpportunityRepository::from_records(records),
            Err(Error::DuplicateId(id)) if id == "1"
        ));
    }

    #[test]
    fn test_find_by_id() {
        let repo = OpportunityRepository::from_source(&FixtureSource).unwrap();
        assert_eq!(repo.find("3").unwrap().organization, "USAID");
        assert!(matches!(repo.find("99"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_json_file_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"a","title":"Beca","organization":"Fundación","amount":"€10K",
                "deadline":"2025-01-31","region":"España","category":"Cultura",
                "priority":"medium","status":"new","tags":["Arte"]}}]"#
        )
        .unwrap();

        let source = JsonFileSource::new(file.path());
        let records = source.fetch().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, Status::New);
        assert!(records[0].description.is_empty());
    }

    #[test]
    fn test_json_file_with_bad_status_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"a","title":"Beca","organization":"Fundación","amount":"€10K",
                "deadline":"2025-01-31","region":"España","category":"Cultura",
                "priority":"medium","status":"ganada","tags":[]}}]"#
        )
        .unwrap();

        let result = JsonFileSource::new(file.path()).fetch();
        assert!(matches!(result, Err(Error::InvalidStatus(s)) if s == "ganada"));
    }

    #[test]
    fn test_source_for_picks_fixture_without_path() {
        assert_eq!(source_for(None).name(), "fixture");
        assert_eq!(
            source_for(Some(Path::new("/tmp/opps.json"))).name(),
            "/tmp/opps.json"
        );
    }
}
