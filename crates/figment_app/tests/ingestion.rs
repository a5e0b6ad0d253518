//! Integration tests for the async ingestion pipeline
//!
//! These tests verify that:
//! - Committed order follows input order whatever order loads finish in
//! - One bad payload fails the whole batch and commits nothing
//! - Dropping an in-flight ingestion aborts its tasks and commits nothing
//! - Layer names come from the drop, the file, or a fresh UUID

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use figment_app::{DropItem, FigmentConfig, IngestError, Ingestion, PayloadError, PayloadLoader, Session, SourceLoader};
use figment_core::{Layer, MemoryStore, Scenario, ScenarioId, Store, StoreError};
use figment_image::{ImageData, ImageError, ImageSource, ParseOptions};

fn svg(width: u32, height: u32) -> Vec<u8> {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}"><rect width="{width}" height="{height}"/></svg>"#
    )
    .into_bytes()
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

/// Loader whose latency and failures are scripted per item name
#[derive(Default)]
struct ScriptedLoader {
    delays_ms: HashMap<String, u64>,
    failing: HashSet<String>,
    finished: Arc<AtomicUsize>,
}

impl ScriptedLoader {
    fn with_delays(delays: &[(&str, u64)]) -> Self {
        Self {
            delays_ms: delays
                .iter()
                .map(|(name, delay)| (name.to_string(), *delay))
                .collect(),
            ..Default::default()
        }
    }

    fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }
}

impl PayloadLoader for ScriptedLoader {
    fn load(&self, item: DropItem) -> impl Future<Output = Result<ImageData, PayloadError>> + Send {
        let name = item.suggested_name.clone().unwrap_or_default();
        let delay = self.delays_ms.get(&name).copied().unwrap_or(0);
        let fail = self.failing.contains(&name);
        let finished = Arc::clone(&self.finished);

        async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            finished.fetch_add(1, Ordering::SeqCst);
            if fail {
                return Err(PayloadError::Image(ImageError::Empty));
            }
            let bytes = match item.source {
                ImageSource::Bytes(bytes) => bytes,
                other => panic!("unexpected source {other:?}"),
            };
            Ok(ImageData {
                bytes,
                suggested_name: None,
            })
        }
    }
}

fn store_with_scenario() -> (MemoryStore, ScenarioId) {
    let mut store = MemoryStore::new();
    let id = store.insert(Scenario::new("Scenario 1", SystemTime::UNIX_EPOCH));
    (store, id)
}

fn named_items(names: &[&str]) -> Vec<DropItem> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            DropItem::new(ImageSource::bytes(svg(10 + index as u32, 10))).with_name(*name)
        })
        .collect()
}

fn display_names(store: &MemoryStore, id: ScenarioId) -> Vec<String> {
    store
        .lookup(id)
        .expect("scenario")
        .ordered_layers()
        .map(|layer| layer.name().to_string())
        .collect()
}

#[tokio::test]
async fn test_commit_order_follows_input_order() {
    let names = ["a", "b", "c", "d"];
    let permutations: [[u64; 4]; 4] = [[60, 40, 20, 0], [0, 60, 20, 40], [30, 0, 60, 10], [0, 0, 0, 0]];

    for delays in permutations {
        let script: Vec<(&str, u64)> = names.iter().copied().zip(delays).collect();
        let ingestion = Ingestion::new(ScriptedLoader::with_delays(&script), ParseOptions::default());
        let (mut store, scenario) = store_with_scenario();

        let committed = ingestion
            .ingest(&mut store, scenario, named_items(&names))
            .await
            .expect("ingest");

        assert_eq!(display_names(&store, scenario), names);
        assert_eq!(store.lookup(scenario).expect("scenario").priorities(), vec![0, 1, 2, 3]);
        assert_eq!(committed.layer_ids.len(), 4);
        // Widths were 10, 11, 12, 13 in input order
        let widths: Vec<f32> = committed
            .drawables
            .iter()
            .map(|drawable| drawable.size().expect("size").width)
            .collect();
        assert_eq!(widths, vec![10.0, 11.0, 12.0, 13.0]);
        assert_eq!(store.generation(), 1);
    }
}

#[tokio::test]
async fn test_undecodable_payload_fails_whole_batch() {
    let loader = ScriptedLoader::with_delays(&[("good", 30), ("bad", 0)]);
    let ingestion = Ingestion::new(loader, ParseOptions::default());
    let (mut store, scenario) = store_with_scenario();

    let items = vec![
        DropItem::new(ImageSource::bytes(png(4, 4))).with_name("good"),
        DropItem::new(ImageSource::bytes(b"plain text".to_vec())).with_name("bad"),
        DropItem::new(ImageSource::bytes(svg(8, 8))).with_name("also good"),
    ];
    let result = ingestion.ingest(&mut store, scenario, items).await;

    match result {
        Err(IngestError::Decode { index, name, .. }) => {
            assert_eq!(index, 1);
            assert_eq!(name, "bad");
        }
        other => panic!("expected decode error, got {other:?}"),
    }
    assert!(store.lookup(scenario).expect("scenario").is_empty());
    assert_eq!(store.generation(), 0);
}

#[tokio::test]
async fn test_load_failure_is_reported_with_its_index() {
    let loader = ScriptedLoader::default().failing("second");
    let ingestion = Ingestion::new(loader, ParseOptions::default());
    let (mut store, scenario) = store_with_scenario();

    let result = ingestion
        .ingest(&mut store, scenario, named_items(&["first", "second"]))
        .await;

    assert!(matches!(
        result,
        Err(IngestError::Load {
            index: 1,
            source: PayloadError::Image(ImageError::Empty),
            ..
        })
    ));
    assert!(store.lookup(scenario).expect("scenario").is_empty());
}

#[tokio::test]
async fn test_dropping_ingestion_aborts_and_commits_nothing() {
    let loader = ScriptedLoader::with_delays(&[("quick", 0), ("slow", 300)]);
    let finished = Arc::clone(&loader.finished);
    let ingestion = Ingestion::new(loader, ParseOptions::default());
    let (mut store, scenario) = store_with_scenario();

    let outcome = tokio::time::timeout(
        Duration::from_millis(50),
        ingestion.ingest(&mut store, scenario, named_items(&["quick", "slow"])),
    )
    .await;
    assert!(outcome.is_err(), "ingestion should still be running");

    // Give an un-aborted task time to finish; it must not
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(finished.load(Ordering::SeqCst), 1);
    assert!(store.lookup(scenario).expect("scenario").is_empty());
    assert_eq!(store.generation(), 0);
}

#[tokio::test]
async fn test_missing_scenario_is_rejected_up_front() {
    let loader = ScriptedLoader::default();
    let finished = Arc::clone(&loader.finished);
    let ingestion = Ingestion::new(loader, ParseOptions::default());
    let mut store = MemoryStore::new();

    let result = ingestion
        .ingest(&mut store, ScenarioId(42), named_items(&["a"]))
        .await;

    assert!(matches!(
        result,
        Err(IngestError::Store(StoreError::ScenarioNotFound(ScenarioId(42))))
    ));
    assert_eq!(finished.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_new_layers_stack_above_existing_ones() {
    let ingestion = Ingestion::new(ScriptedLoader::default(), ParseOptions::default());
    let (mut store, scenario) = store_with_scenario();
    let existing = store.next_layer_id();
    store
        .lookup_mut(scenario)
        .expect("scenario")
        .insert(Layer::new(existing, svg(5, 5), "existing"), 0)
        .expect("insert");

    ingestion
        .ingest(&mut store, scenario, named_items(&["dropped"]))
        .await
        .expect("ingest");

    assert_eq!(display_names(&store, scenario), vec!["existing", "dropped"]);
}

#[tokio::test]
async fn test_dropped_layers_land_on_top_after_reorder() {
    let ingestion = Ingestion::new(ScriptedLoader::default(), ParseOptions::default());
    let (mut store, scenario) = store_with_scenario();

    ingestion
        .ingest(&mut store, scenario, named_items(&["a", "b", "c"]))
        .await
        .expect("ingest");
    store
        .lookup_mut(scenario)
        .expect("scenario")
        .reorder(2, 0)
        .expect("reorder");
    assert_eq!(display_names(&store, scenario), vec!["c", "a", "b"]);

    ingestion
        .ingest(&mut store, scenario, named_items(&["new", "newer"]))
        .await
        .expect("ingest");

    assert_eq!(display_names(&store, scenario), vec!["c", "a", "b", "new", "newer"]);
    assert_eq!(
        store.lookup(scenario).expect("scenario").priorities(),
        vec![0, 1, 2, 3, 4]
    );
}

#[tokio::test]
async fn test_failed_save_rolls_back_the_batch() {
    let path = std::env::temp_dir()
        .join(format!("figment-missing-{}", std::process::id()))
        .join("nested")
        .join("snapshot.json");
    let mut store = MemoryStore::open(&path).expect("open");
    let scenario = store.insert(Scenario::new("Scenario 1", SystemTime::UNIX_EPOCH));

    let ingestion = Ingestion::new(ScriptedLoader::default(), ParseOptions::default());
    let result = ingestion
        .ingest(&mut store, scenario, named_items(&["a", "b"]))
        .await;

    assert!(matches!(
        result,
        Err(IngestError::Store(StoreError::Io { .. }))
    ));
    assert!(store.lookup(scenario).expect("scenario").is_empty());
    assert_eq!(store.generation(), 0);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_source_loader_names_layers() {
    let dir = std::env::temp_dir().join(format!("figment-ingest-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("homepage.png");
    std::fs::write(&path, png(3, 2)).expect("write fixture");

    let mut session = Session::new(MemoryStore::new(), FigmentConfig::default());
    let scenario = session.add_scenario().expect("scenario");
    let ids = session
        .drop_items(
            scenario,
            vec![
                DropItem::new(path.clone()),
                DropItem::new(ImageSource::bytes(svg(4, 4))),
                DropItem::new(ImageSource::bytes(svg(4, 4))).with_name("Logo"),
            ],
        )
        .await
        .expect("ingest");

    let target = session.scenario(scenario).expect("scenario");
    let names: Vec<&str> = ids
        .iter()
        .map(|id| target.layer(*id).expect("layer").name())
        .collect();
    assert_eq!(names[0], "homepage");
    assert!(uuid_like(names[1]), "{} should be a uuid", names[1]);
    assert_eq!(names[2], "Logo");

    // Decoded drawables were handed to the compositor
    assert_eq!(session.compositor().cache().len(), 3);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_source_loader_reports_missing_file() {
    let ingestion = Ingestion::new(SourceLoader, ParseOptions::default());
    let (mut store, scenario) = store_with_scenario();

    let result = ingestion
        .ingest(
            &mut store,
            scenario,
            vec![DropItem::new("/definitely/not/here.png")],
        )
        .await;

    assert!(matches!(
        result,
        Err(IngestError::Load {
            index: 0,
            source: PayloadError::Image(ImageError::Io { .. }),
            ..
        })
    ));
}

fn uuid_like(name: &str) -> bool {
    name.len() == 36 && name.chars().filter(|c| *c == '-').count() == 4
}
