//! End-to-end export runs against scratch source directories

use cfgs_core::{export, read_bundle, Error, ExportConfig};
use rust_xlsxwriter::Workbook;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write a workbook with one sheet; numeric-looking cells become numbers
fn write_workbook(path: &Path, sheet: &str, rows: &[&[&str]]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet).unwrap();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            match cell.parse::<f64>() {
                Ok(n) => worksheet.write_number(r as u32, c as u16, n).unwrap(),
                Err(_) => worksheet.write_string(r as u32, c as u16, *cell).unwrap(),
            };
        }
    }
    workbook.save(path).unwrap();
}

fn write_manifest(source: &Path, tables: &[(&str, &str)]) {
    let mut rows: Vec<&[&str]> = vec![&["No", "Table", "Desc", "Client", "Server"]];
    let owned: Vec<[&str; 5]> = tables
        .iter()
        .map(|(name, flag)| ["1", *name, "", *flag, "1"])
        .collect();
    rows.extend(owned.iter().map(|r| r.as_slice()));
    write_workbook(&source.join("configlist.xlsx"), "Sheet1", &rows);
}

struct Dirs {
    _root: TempDir,
    source: std::path::PathBuf,
    target: std::path::PathBuf,
    interface: std::path::PathBuf,
}

impl Dirs {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let source = root.path().join("source");
        let target = root.path().join("target");
        let interface = root.path().join("interface");
        for dir in [&source, &target, &interface] {
            fs::create_dir_all(dir).unwrap();
        }
        Self {
            _root: root,
            source,
            target,
            interface,
        }
    }

    fn config(&self) -> ExportConfig {
        ExportConfig::new(&self.source, &self.target, &self.interface)
    }
}

#[test]
fn test_gift_scenario() {
    let dirs = Dirs::new();
    write_manifest(&dirs.source, &[("gift", "1")]);
    fs::write(
        dirs.source.join("gift.txt"),
        "INT\tSTRING\nid\tlabel\n1\t1\ndesc1\tdesc2\n101\tSword\n",
    )
    .unwrap();

    let config = dirs.config();
    let summary = export(&config).unwrap();
    assert_eq!(summary.tables.len(), 1);
    assert_eq!(summary.total_records(), 1);

    let bundle = read_bundle(config.bundle_path(), "allcfg.json").unwrap();
    assert_eq!(bundle, json!({"gift": {"101": {"id": 101, "label": "Sword"}}}));

    let declarations = fs::read_to_string(config.declarations_path()).unwrap();
    assert!(declarations.contains("export interface gift {"));
    assert!(declarations.contains("/** desc1 */"));
    assert!(declarations.contains("id: number;"));
    assert!(declarations.contains("label: string;"));
    assert!(declarations.contains("clz: Types.gift"));
}

#[test]
fn test_only_flagged_tables_are_read() {
    let dirs = Dirs::new();
    // "shop" has no file; it must not be looked up
    write_manifest(&dirs.source, &[("shop", "0"), ("gift", "1"), ("npc", "2")]);
    fs::write(
        dirs.source.join("gift.txt"),
        "INT,STRING\nid,label\n1,1\n,\n101,Sword\n",
    )
    .unwrap();

    let summary = export(&dirs.config()).unwrap();
    let names: Vec<&str> = summary.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["gift"]);
}

#[test]
fn test_workbook_table() {
    let dirs = Dirs::new();
    write_manifest(&dirs.source, &[("hero.xlsx", "1")]);
    write_workbook(
        &dirs.source.join("hero.xlsx"),
        "Heroes",
        &[
            &["INT", "STRING", "FLOAT", "[INT]", "[STRING]", "INT"],
            &["key", "name", "speed", "skills", "tags", "secret"],
            &["0", "1", "1", "1", "1", "0"],
            &["id", "name", "speed", "skills", "tags", "hidden"],
            &["1", "Arthur", "3.14", "10|20", "knight|king", "7"],
            &["#2", "Merlin", "1", "", "", ""],
            &["3", "Lancelot", "fast", "5", "", "9"],
        ],
    );

    let config = dirs.config();
    export(&config).unwrap();
    let bundle = read_bundle(config.bundle_path(), "allcfg.json").unwrap();

    assert_eq!(
        bundle,
        json!({
            "hero": {
                "1": {
                    "id": 1,
                    "name": "Arthur",
                    "speed": 3.14,
                    "skills": [10, 20],
                    "tags": ["knight", "king"]
                },
                "3": {"id": 3, "name": "Lancelot", "speed": null, "skills": [5]}
            }
        })
    );
}

#[test]
fn test_legacy_encoded_text_table() {
    let dirs = Dirs::new();
    write_manifest(&dirs.source, &[("gift", "1")]);
    let (bytes, _, _) =
        encoding_rs::GBK.encode("INT\tSTRING\nid\tlabel\n1\t1\n编号\t名字\n101\t宝剑\n");
    fs::write(dirs.source.join("gift.txt"), &bytes).unwrap();

    let config = dirs.config();
    export(&config).unwrap();

    let bundle = read_bundle(config.bundle_path(), "allcfg.json").unwrap();
    assert_eq!(bundle["gift"]["101"]["label"], "宝剑");
    let declarations = fs::read_to_string(config.declarations_path()).unwrap();
    assert!(declarations.contains("/** 名字 */"));
}

#[test]
fn test_missing_target_aborts_before_tables() {
    let dirs = Dirs::new();
    // No manifest either: the target check must fail first
    let config = ExportConfig::new(&dirs.source, dirs.target.join("missing"), &dirs.interface);

    let err = export(&config).unwrap_err();
    assert!(matches!(err, Error::MissingTargetDir(_)));
}

#[test]
fn test_missing_table_writes_nothing() {
    let dirs = Dirs::new();
    write_manifest(&dirs.source, &[("gift", "1"), ("ghost", "1")]);
    fs::write(
        dirs.source.join("gift.txt"),
        "INT\tSTRING\nid\tlabel\n1\t1\n\t\n101\tSword\n",
    )
    .unwrap();

    let config = dirs.config();
    let err = export(&config).unwrap_err();
    assert!(matches!(err, Error::TableNotFound(ref p) if p.ends_with("ghost.txt")));
    assert!(!config.bundle_path().exists());
    assert!(!config.declarations_path().exists());
}

#[test]
fn test_manifest_sheet_must_exist() {
    let dirs = Dirs::new();
    write_workbook(
        &dirs.source.join("configlist.xlsx"),
        "Other",
        &[&["No", "Table", "Desc", "Client", "Server"]],
    );

    let err = export(&dirs.config()).unwrap_err();
    assert!(matches!(err, Error::SheetNotFound { .. }));
}
