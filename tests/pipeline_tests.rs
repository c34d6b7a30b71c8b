//! Refresh pipeline tests against an in-memory catalog

use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tracing::Level;

use pokegrid::api::{CatalogSource, FetchError};
use pokegrid::coordinator::{run_refresh, total_pages, RefreshRequest};
use pokegrid::state::{CatalogPage, EntryDetail, EntrySummary, FilterCriteria};

const FIRST_PAGE: [(&str, &[&str]); 21] = [
    ("bulbasaur", &["grass", "poison"]),
    ("ivysaur", &["grass", "poison"]),
    ("venusaur", &["grass", "poison"]),
    ("charmander", &["fire"]),
    ("charmeleon", &["fire"]),
    ("charizard", &["fire", "flying"]),
    ("squirtle", &["water"]),
    ("wartortle", &["water"]),
    ("blastoise", &["water"]),
    ("caterpie", &["bug"]),
    ("metapod", &["bug"]),
    ("butterfree", &["bug", "flying"]),
    ("weedle", &["bug", "poison"]),
    ("kakuna", &["bug", "poison"]),
    ("beedrill", &["bug", "poison"]),
    ("pidgey", &["normal", "flying"]),
    ("pidgeotto", &["normal", "flying"]),
    ("pidgeot", &["normal", "flying"]),
    ("rattata", &["normal"]),
    ("raticate", &["normal"]),
    ("spearow", &["normal", "flying"]),
];

const CATALOG_SIZE: usize = 1302;

#[derive(Default)]
struct Calls {
    pages: AtomicUsize,
    details: AtomicUsize,
    generations: AtomicUsize,
}

#[derive(Clone)]
struct FakeCatalog {
    entries: Arc<Vec<EntryDetail>>,
    generations: Arc<HashMap<String, Vec<String>>>,
    failing: Arc<HashSet<String>>,
    calls: Arc<Calls>,
}

impl FakeCatalog {
    fn new() -> Self {
        let entries: Vec<EntryDetail> = (0..CATALOG_SIZE)
            .map(|index| {
                let (name, types) = FIRST_PAGE
                    .get(index)
                    .map(|(name, types)| (name.to_string(), types.iter().map(|t| t.to_string()).collect()))
                    .unwrap_or_else(|| (format!("mon-{}", index + 1), vec!["normal".to_string()]));
                EntryDetail {
                    name,
                    detail_url: detail_url(index),
                    sprite_url: None,
                    types,
                    abilities: vec!["overgrow".into()],
                    stats: Vec::new(),
                }
            })
            .collect();

        let mut generations = HashMap::new();
        generations.insert(
            "generation-i".to_string(),
            entries.iter().take(151).map(|e| e.name.clone()).collect(),
        );
        generations.insert(
            "generation-ii".to_string(),
            entries.iter().skip(151).take(100).map(|e| e.name.clone()).collect(),
        );

        Self {
            entries: Arc::new(entries),
            generations: Arc::new(generations),
            failing: Arc::new(HashSet::new()),
            calls: Arc::new(Calls::default()),
        }
    }

    fn failing_on(mut self, index: usize) -> Self {
        self.failing = Arc::new([detail_url(index)].into_iter().collect());
        self
    }

    fn detail_calls(&self) -> usize {
        self.calls.details.load(Ordering::SeqCst)
    }

    fn generation_calls(&self) -> usize {
        self.calls.generations.load(Ordering::SeqCst)
    }
}

fn detail_url(index: usize) -> String {
    format!("https://fake.test/api/v2/pokemon/{}/", index + 1)
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn fetch_page(&self, offset: u32, limit: u32) -> Result<CatalogPage, FetchError> {
        self.calls.pages.fetch_add(1, Ordering::SeqCst);
        let results = self
            .entries
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|entry| EntrySummary {
                name: entry.name.clone(),
                url: entry.detail_url.clone(),
            })
            .collect();
        Ok(CatalogPage {
            total_count: self.entries.len() as u32,
            results,
        })
    }

    async fn fetch_detail(&self, url: &str) -> Result<EntryDetail, FetchError> {
        self.calls.details.fetch_add(1, Ordering::SeqCst);
        let index = self
            .entries
            .iter()
            .position(|entry| entry.detail_url == url)
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })?;
        // Earlier entries resolve later so completion order differs from listing order.
        tokio::time::sleep(Duration::from_millis((30 - (index % 30)) as u64)).await;
        if self.failing.contains(url) {
            return Err(FetchError::Timeout {
                url: url.to_string(),
            });
        }
        Ok(self.entries[index].clone())
    }

    async fn fetch_generation_members(&self, generation: &str) -> Result<Vec<String>, FetchError> {
        self.calls.generations.fetch_add(1, Ordering::SeqCst);
        Ok(self.generations.get(generation).cloned().unwrap_or_default())
    }

    async fn fetch_type_names(&self) -> Result<Vec<String>, FetchError> {
        Ok(vec!["fire".into(), "grass".into(), "water".into()])
    }

    async fn fetch_generation_names(&self) -> Result<Vec<String>, FetchError> {
        Ok(self.generations.keys().cloned().collect())
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        Err(FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

fn request(page: u32, filters: FilterCriteria) -> RefreshRequest {
    RefreshRequest {
        generation: 7,
        page,
        page_size: 21,
        filters,
    }
}

fn names(entries: &[EntryDetail]) -> Vec<&str> {
    entries.iter().map(|entry| entry.name.as_str()).collect()
}

#[tokio::test]
async fn fresh_load_returns_full_page_in_listing_order() {
    let catalog = FakeCatalog::new();

    let outcome = run_refresh(catalog.clone(), request(1, FilterCriteria::default()))
        .await
        .unwrap();

    assert_eq!(outcome.entries.len(), 21);
    assert_eq!(
        names(&outcome.entries),
        FIRST_PAGE.iter().map(|(name, _)| *name).collect::<Vec<_>>()
    );
    assert_eq!(outcome.total_count, 1302);
    assert_eq!(total_pages(outcome.total_count, 21), 62);
    assert_eq!(outcome.generation, 7);
    assert_eq!(outcome.page, 1);
    assert_eq!(catalog.detail_calls(), 21);
    assert_eq!(catalog.generation_calls(), 0);
}

#[tokio::test]
async fn last_page_uses_offset() {
    let catalog = FakeCatalog::new();

    let outcome = run_refresh(catalog, request(62, FilterCriteria::default()))
        .await
        .unwrap();

    assert_eq!(outcome.entries.len(), 21);
    assert_eq!(outcome.entries[0].name, "mon-1282");
    assert_eq!(outcome.entries[20].name, "mon-1302");
}

#[tokio::test]
async fn search_narrows_before_detail_fetch() {
    let catalog = FakeCatalog::new();
    let filters = FilterCriteria {
        search_text: "saur".into(),
        ..Default::default()
    };

    let outcome = run_refresh(catalog.clone(), request(1, filters)).await.unwrap();

    assert_eq!(names(&outcome.entries), vec!["bulbasaur", "ivysaur", "venusaur"]);
    assert_eq!(catalog.detail_calls(), 3);
}

#[tokio::test]
async fn search_ignores_case() {
    let catalog = FakeCatalog::new();
    let filters = FilterCriteria {
        search_text: "SAUR".into(),
        ..Default::default()
    };

    let outcome = run_refresh(catalog, request(1, filters)).await.unwrap();

    assert_eq!(outcome.entries.len(), 3);
}

#[tokio::test]
async fn type_filter_keeps_only_matching_type() {
    let catalog = FakeCatalog::new();
    let filters = FilterCriteria {
        type_filter: Some("fire".into()),
        ..Default::default()
    };

    let outcome = run_refresh(catalog, request(1, filters)).await.unwrap();

    assert_eq!(
        names(&outcome.entries),
        vec!["charmander", "charmeleon", "charizard"]
    );
    assert!(outcome.entries.iter().all(|entry| entry.has_type("fire")));
}

#[tokio::test]
async fn generation_membership_is_fetched_once_per_cycle() {
    let catalog = FakeCatalog::new();
    let filters = FilterCriteria {
        generation_filter: Some("generation-i".into()),
        ..Default::default()
    };

    let outcome = run_refresh(catalog.clone(), request(1, filters)).await.unwrap();

    assert_eq!(outcome.entries.len(), 21);
    assert_eq!(catalog.generation_calls(), 1);
}

#[tokio::test]
async fn generation_filter_drops_non_members() {
    let catalog = FakeCatalog::new();
    let filters = FilterCriteria {
        generation_filter: Some("generation-ii".into()),
        ..Default::default()
    };

    let outcome = run_refresh(catalog, request(1, filters)).await.unwrap();

    assert!(outcome.entries.is_empty());
    assert_eq!(outcome.total_count, 1302);
}

#[tokio::test]
async fn empty_search_result_skips_membership_fetch() {
    let catalog = FakeCatalog::new();
    let filters = FilterCriteria {
        search_text: "zzz".into(),
        generation_filter: Some("generation-i".into()),
        ..Default::default()
    };

    let outcome = run_refresh(catalog.clone(), request(1, filters)).await.unwrap();

    assert!(outcome.entries.is_empty());
    assert_eq!(catalog.detail_calls(), 0);
    assert_eq!(catalog.generation_calls(), 0);
}

#[tokio::test]
async fn active_filters_are_conjunctive() {
    let catalog = FakeCatalog::new();
    let filters = FilterCriteria {
        search_text: "e".into(),
        type_filter: Some("poison".into()),
        generation_filter: Some("generation-i".into()),
    };

    let outcome = run_refresh(catalog.clone(), request(1, filters.clone()))
        .await
        .unwrap();

    let expected: Vec<&str> = FIRST_PAGE
        .iter()
        .filter(|(name, types)| name.contains('e') && types.contains(&"poison"))
        .map(|(name, _)| *name)
        .collect();
    assert_eq!(names(&outcome.entries), expected);
    assert_eq!(expected, vec!["venusaur", "weedle", "beedrill"]);
    assert!(outcome.entries.iter().all(|entry| {
        filters.matches_search(&entry.name) && filters.matches_type(entry)
    }));
}

#[tokio::test]
async fn one_failed_detail_aborts_the_cycle() {
    let catalog = FakeCatalog::new().failing_on(2);

    let result = run_refresh(catalog, request(1, FilterCriteria::default())).await;

    assert_eq!(
        result,
        Err(FetchError::Timeout {
            url: detail_url(2)
        })
    );
}

#[derive(Clone)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut inner = self.0.lock().expect("log buffer lock");
        inner.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl LogBuffer {
    fn contents(&self) -> String {
        let bytes = self.0.lock().expect("log buffer lock").clone();
        String::from_utf8_lossy(&bytes).to_string()
    }
}

fn capture_subscriber() -> (impl tracing::Subscriber + Send + Sync, LogBuffer) {
    let buffer = LogBuffer(Arc::new(Mutex::new(Vec::new())));
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_target(false)
        .with_max_level(Level::DEBUG)
        .finish();
    (subscriber, buffer)
}

#[tokio::test]
async fn aborted_cycle_logs_one_error() {
    let catalog = FakeCatalog::new().failing_on(2);
    let (subscriber, logs) = capture_subscriber();

    // Current-thread runtime: the detail tasks run on this thread too.
    let result = {
        let _guard = tracing::subscriber::set_default(subscriber);
        run_refresh(catalog, request(1, FilterCriteria::default())).await
    };

    assert!(result.is_err());
    let output = logs.contents();
    assert_eq!(output.matches("refresh cycle aborted").count(), 1, "{output}");
    assert_eq!(output.matches("ERROR").count(), 1, "{output}");
    assert!(!output.contains("refresh cycle completed"), "{output}");
}

#[tokio::test]
async fn failure_outside_search_result_is_never_requested() {
    let catalog = FakeCatalog::new().failing_on(2);
    let filters = FilterCriteria {
        search_text: "char".into(),
        ..Default::default()
    };

    let outcome = run_refresh(catalog, request(1, filters)).await.unwrap();

    assert_eq!(
        names(&outcome.entries),
        vec!["charmander", "charmeleon", "charizard"]
    );
}
