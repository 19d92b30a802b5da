//! End-to-end tests for the export pipeline
//!
//! The row source and hierarchy provider are in-memory doubles; spreadsheets
//! and archives are written to temporary directories.

use async_trait::async_trait;
use fake::faker::address::en::StreetName;
use fake::faker::name::en::Name;
use fake::Fake;
use flate2::read::GzDecoder;
use rekap::adapters::{HierarchyProvider, RowSource};
use rekap::core::export::{build_jobs, plan_batches, Batch, ExportCoordinator};
use rekap::core::spreadsheet::{SheetRecord, SpreadsheetSettings};
use rekap::domain::{
    CustomerRow, DateRange, ExportFilter, ExportKind, ExportScope, OrgNode, RekapError, Result,
    RowSet, TransactionRow,
};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::sync::watch;

/// Serves a fixed number of generated rows and records every filter it sees
struct InMemorySource {
    rows: usize,
    seen: Mutex<Vec<ExportFilter>>,
}

impl InMemorySource {
    fn new(rows: usize) -> Self {
        Self {
            rows,
            seen: Mutex::new(Vec::new()),
        }
    }
}

fn transaction(unit: &str) -> TransactionRow {
    TransactionRow {
        name: Name().fake(),
        consumer_name: Name().fake(),
        payment_type: "PREPAID".to_string(),
        amount: (10_000..500_000).fake::<u32>().to_string(),
        status_code: "00".to_string(),
        meter_number: (10_000_000u64..99_999_999).fake::<u64>().to_string(),
        title: "Token Listrik".to_string(),
        payment_gateway: "BANK".to_string(),
        created_at: "2025-01-15 10:00:00".to_string(),
        token: String::new(),
        unit_upi: "51".to_string(),
        unit_ap: "52000".to_string(),
        unit_up: unit.to_string(),
        unit_upi_name: "Jawa Barat".to_string(),
        unit_ap_name: "Bandung".to_string(),
        unit_up_name: "Kota".to_string(),
    }
}

fn customer() -> CustomerRow {
    CustomerRow {
        customer_id: (100_000_000_000u64..999_999_999_999).fake::<u64>().to_string(),
        name: Name().fake(),
        address: StreetName().fake(),
        energy_type: "R1".to_string(),
        kwh: "1300".to_string(),
        ..CustomerRow::default()
    }
}

#[async_trait]
impl RowSource for InMemorySource {
    async fn fetch_rows(&self, kind: ExportKind, filter: &ExportFilter) -> Result<RowSet> {
        self.seen.lock().unwrap().push(filter.clone());
        let unit = filter.scope.id().unwrap_or("").to_string();
        Ok(match kind {
            ExportKind::Transactions => {
                RowSet::Transactions((0..self.rows).map(|_| transaction(&unit)).collect())
            }
            ExportKind::Customers => {
                RowSet::Customers((0..self.rows).map(|_| customer()).collect())
            }
        })
    }
}

/// One region, two areas, three units
struct ThreeLevelTree;

fn three_level_tree() -> OrgNode {
    OrgNode::region("51", "Jawa Barat").with_children([
        OrgNode::area("52000", "Bandung").with_children([
            OrgNode::unit("52001", "Kota"),
            OrgNode::unit("52002", "Utara"),
        ]),
        OrgNode::area("53000", "Bekasi").with_child(OrgNode::unit("53001", "Bekasi Kota")),
    ])
}

#[async_trait]
impl HierarchyProvider for ThreeLevelTree {
    async fn get_hierarchy(&self) -> Result<OrgNode> {
        Ok(three_level_tree())
    }
}

struct BrokenTree;

#[async_trait]
impl HierarchyProvider for BrokenTree {
    async fn get_hierarchy(&self) -> Result<OrgNode> {
        Err(RekapError::SourceFetch("unit tables unavailable".to_string()))
    }
}

fn january() -> DateRange {
    DateRange::parse("2025/01/01", "2025/01/31").unwrap()
}

fn coordinator(
    root: &Path,
    source: Arc<dyn RowSource>,
    hierarchy: Arc<dyn HierarchyProvider>,
    batch_size: usize,
) -> ExportCoordinator {
    let (_tx, rx) = watch::channel(false);
    ExportCoordinator::with_settings(
        SpreadsheetSettings::with_root(root).with_batch_size(batch_size),
        2,
        source,
        hierarchy,
        rx,
    )
}

fn archive_entries(path: &Path) -> Vec<String> {
    let mut archive = tar::Archive::new(GzDecoder::new(File::open(path).unwrap()));
    archive
        .entries()
        .unwrap()
        .map(|entry| {
            entry
                .unwrap()
                .path()
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}

/// Worksheet XML and shared strings (if any) of a generated part
struct SheetContents {
    sheet: String,
    strings: String,
    styles: String,
}

impl SheetContents {
    fn read(path: &Path) -> Self {
        let mut zip = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut entry = |name: &str| {
            let mut text = String::new();
            if let Ok(mut file) = zip.by_name(name) {
                file.read_to_string(&mut text).unwrap();
            }
            text
        };

        Self {
            sheet: entry("xl/worksheets/sheet1.xml"),
            strings: entry("xl/sharedStrings.xml"),
            styles: entry("xl/styles.xml"),
        }
    }

    fn row_count(&self) -> usize {
        self.sheet.matches("<row ").count()
    }

    fn contains_text(&self, text: &str) -> bool {
        let cell = format!(">{text}<");
        self.sheet.contains(&cell) || self.strings.contains(&cell)
    }
}

#[tokio::test]
async fn test_unit_export_produces_one_part_in_one_archive() {
    let dir = TempDir::new().unwrap();
    let coordinator = coordinator(
        dir.path(),
        Arc::new(InMemorySource::new(3)),
        Arc::new(ThreeLevelTree),
        150_000,
    );
    let filter = ExportFilter::new(ExportScope::Unit("52001".to_string()), january());

    let outcome = coordinator
        .export_single(ExportKind::Transactions, &filter)
        .await
        .unwrap();

    assert_eq!(outcome.rows, 3);
    assert_eq!(outcome.parts.len(), 1);
    assert_eq!(
        outcome.parts[0],
        dir.path()
            .join("UNIT_52001_20250101_20250131")
            .join("REKAP_TRANSAKSI_EXPORT_UNIT_52001_20250101_20250131_PART_1.xlsx")
    );
    assert_eq!(
        outcome.archive_path,
        dir.path().join("UNIT_52001_20250101_20250131.tar.gz")
    );

    let entries = archive_entries(&outcome.archive_path);
    assert_eq!(
        entries,
        vec![
            "UNIT_52001_20250101_20250131/REKAP_TRANSAKSI_EXPORT_UNIT_52001_20250101_20250131_PART_1.xlsx"
                .to_string()
        ]
    );

    // parts remain on disk after archiving
    assert!(outcome.parts[0].exists());

    let contents = SheetContents::read(&outcome.parts[0]);
    assert_eq!(contents.row_count(), 4);
    for caption in TransactionRow::headers() {
        assert!(contents.contains_text(caption), "missing header {caption}");
    }
}

#[tokio::test]
async fn test_part_header_style_and_column_widths() {
    let dir = TempDir::new().unwrap();
    let coordinator = coordinator(
        dir.path(),
        Arc::new(InMemorySource::new(1)),
        Arc::new(ThreeLevelTree),
        150_000,
    );
    let filter = ExportFilter::new(ExportScope::Unit("52001".to_string()), january());

    let outcome = coordinator
        .export_single(ExportKind::Transactions, &filter)
        .await
        .unwrap();
    let contents = SheetContents::read(&outcome.parts[0]);

    assert!(contents.sheet.contains("<col min=\"2\""));
    assert!(contents.sheet.contains("max=\"15\""));
    assert!(contents.sheet.contains("ht=\"30\""));
    assert!(contents.styles.contains("E8F2A1"));
    assert!(contents.styles.contains("<b/>"));
}

#[tokio::test]
async fn test_empty_result_still_writes_header_only_part() {
    let dir = TempDir::new().unwrap();
    let coordinator = coordinator(
        dir.path(),
        Arc::new(InMemorySource::new(0)),
        Arc::new(ThreeLevelTree),
        150_000,
    );
    let filter = ExportFilter::new(ExportScope::Area("52000".to_string()), january());

    let outcome = coordinator
        .export_single(ExportKind::Customers, &filter)
        .await
        .unwrap();

    assert_eq!(outcome.rows, 0);
    assert_eq!(outcome.parts.len(), 1);
    assert!(outcome.parts[0]
        .to_string_lossy()
        .ends_with("REKAP_PELANGGAN_EXPORT_AREA_52000_20250101_20250131_PART_1.xlsx"));
    assert!(outcome.parts[0].exists());
    assert_eq!(archive_entries(&outcome.archive_path).len(), 1);

    let contents = SheetContents::read(&outcome.parts[0]);
    assert_eq!(contents.row_count(), 1);
    for caption in CustomerRow::headers() {
        assert!(contents.contains_text(caption), "missing header {caption}");
    }
}

#[tokio::test]
async fn test_rows_split_across_parts() {
    let dir = TempDir::new().unwrap();
    let coordinator = coordinator(
        dir.path(),
        Arc::new(InMemorySource::new(5)),
        Arc::new(ThreeLevelTree),
        2,
    );
    let filter = ExportFilter::new(ExportScope::National, january());

    let outcome = coordinator
        .export_single(ExportKind::Transactions, &filter)
        .await
        .unwrap();

    assert_eq!(outcome.label, "NASIONAL_20250101_20250131");
    assert_eq!(outcome.parts.len(), 3);
    for (index, part) in outcome.parts.iter().enumerate() {
        assert!(part
            .to_string_lossy()
            .ends_with(&format!("_PART_{}.xlsx", index + 1)));
    }
    assert_eq!(archive_entries(&outcome.archive_path).len(), 3);

    let rows: Vec<usize> = outcome
        .parts
        .iter()
        .map(|part| SheetContents::read(part).row_count())
        .collect();
    assert_eq!(rows, vec![3, 3, 2]);
}

#[test]
fn test_three_level_hierarchy_yields_six_jobs() {
    let base = ExportFilter::new(ExportScope::National, january());
    let jobs = build_jobs(&three_level_tree(), &base);

    assert_eq!(jobs.len(), 1 + 2 + 3);
    let units = jobs
        .iter()
        .filter(|job| matches!(job.filter.scope, ExportScope::Unit(_)))
        .count();
    assert_eq!(units, 3);
}

#[test]
fn test_default_batch_size_splits_200k_rows_in_two() {
    let batches = plan_batches(200_000, 150_000).unwrap();
    assert_eq!(
        batches,
        vec![
            Batch {
                start: 0,
                end: 150_000
            },
            Batch {
                start: 150_000,
                end: 200_000
            },
        ]
    );
}

#[tokio::test]
async fn test_export_all_writes_parts_per_job_without_archives() {
    let dir = TempDir::new().unwrap();
    let source = Arc::new(InMemorySource::new(1));
    let coordinator = coordinator(
        dir.path(),
        Arc::clone(&source) as Arc<dyn RowSource>,
        Arc::new(ThreeLevelTree),
        150_000,
    );
    let base = ExportFilter::new(ExportScope::National, january()).with_secondary(true);

    let report = coordinator
        .export_all(ExportKind::Transactions, &base)
        .await
        .unwrap();

    assert_eq!(report.total_jobs, 6);
    assert_eq!(report.succeeded, 6);
    assert!(report.is_successful());
    assert_eq!(report.rows, 6);

    let seen = source.seen.lock().unwrap();
    assert_eq!(seen.len(), 6);
    assert!(seen.iter().all(|f| f.use_secondary && f.dates == january()));

    let part = dir
        .path()
        .join("52001_KOTA")
        .join("REKAP_TRANSAKSI_EXPORT_52001_KOTA_PART_1.xlsx");
    assert!(part.exists());

    let archives = std::fs::read_dir(dir.path())
        .unwrap()
        .filter(|e| {
            e.as_ref()
                .unwrap()
                .file_name()
                .to_string_lossy()
                .ends_with(".tar.gz")
        })
        .count();
    assert_eq!(archives, 0);
}

#[tokio::test]
async fn test_export_all_fails_only_on_hierarchy_error() {
    let dir = TempDir::new().unwrap();
    let coordinator = coordinator(
        dir.path(),
        Arc::new(InMemorySource::new(1)),
        Arc::new(BrokenTree),
        150_000,
    );
    let base = ExportFilter::new(ExportScope::National, january());

    let err = coordinator
        .export_all(ExportKind::Customers, &base)
        .await
        .unwrap_err();
    assert!(matches!(err, RekapError::SourceFetch(_)));
}
