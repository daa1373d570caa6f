//! Type declaration output: one interface and one handle constant per table

use crate::error::{Error, Result};
use crate::table::Table;
use std::fs;
use std::path::Path;

/// Default declarations file name in the interface directory
pub const DEFAULT_DECLARATIONS_NAME: &str = "Cfgs.ts";

/// Default namespace wrapping all declarations
pub const DEFAULT_NAMESPACE: &str = "Cfgs";

/// Render the declarations for all tables.
///
/// Each table gets a handle constant `name` typed as `{ name: string, clz: Types.name }`
/// and an interface `Types.name` with one documented field per exported column.
pub fn render_declarations(tables: &[Table], namespace: &str) -> String {
    let mut handles = String::new();
    let mut types = String::new();

    for table in tables {
        let name = &table.name;
        handles.push_str(&format!(
            "    export const {name}: {{ name: string, clz: Types.{name} }} = \
             {{ name: \"{name}\", clz: null }};\n"
        ));

        types.push_str(&format!("        export interface {name} {{\n"));
        for column in &table.columns {
            types.push_str(&format!(
                "            /** {} */\n            {}: {};\n",
                doc_text(&column.description),
                column.name,
                column.column_type.declared_type()
            ));
        }
        types.push_str("        }\n");
    }

    let mut out = format!("module {namespace} {{\n");
    out.push_str(&handles);
    out.push_str("    export declare namespace Types {\n");
    out.push_str(&types);
    out.push_str("    }\n}\n");
    out
}

/// Keep a description on one line and inside its doc comment
fn doc_text(description: &str) -> String {
    description
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
        .replace("*/", "*\\/")
}

/// Render and write the declarations file
pub fn write_declarations<P: AsRef<Path>>(
    tables: &[Table],
    path: P,
    namespace: &str,
) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, render_declarations(tables, namespace)).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_grid;
    use crate::table::CellValue;

    fn row(cells: &[&str]) -> Vec<CellValue> {
        cells.iter().map(|c| CellValue::parse(c)).collect()
    }

    fn tables() -> Vec<Table> {
        vec![parse_grid(
            "gift.txt",
            &vec![
                row(&["INT", "STRING", "FLOAT", "[INT]", "[STRING]", "INT"]),
                row(&["id", "label", "rate", "costs", "tags", "hidden"]),
                row(&["1", "1", "1", "1", "1", "0"]),
                row(&["desc1", "desc2", "rate */ x", "", "tags", "no"]),
            ],
        )]
    }

    #[test]
    fn test_field_types() {
        let out = render_declarations(&tables(), DEFAULT_NAMESPACE);

        assert!(out.starts_with("module Cfgs {"));
        assert!(out.contains("export interface gift {"));
        assert!(out.contains("id: number;"));
        assert!(out.contains("label: string;"));
        assert!(out.contains("rate: number;"));
        assert!(out.contains("costs: number[];"));
        assert!(out.contains("tags: string[];"));
        assert!(!out.contains("hidden"));
    }

    #[test]
    fn test_handle_constant() {
        let out = render_declarations(&tables(), DEFAULT_NAMESPACE);
        assert!(out.contains(
            "export const gift: { name: string, clz: Types.gift } = { name: \"gift\", clz: null };"
        ));
        assert!(out.contains("export declare namespace Types {"));
    }

    #[test]
    fn test_descriptions_become_doc_comments() {
        let out = render_declarations(&tables(), DEFAULT_NAMESPACE);
        assert!(out.contains("/** desc1 */"));
        assert!(out.contains("/** rate *\\/ x */"));
    }

    #[test]
    fn test_write_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(DEFAULT_DECLARATIONS_NAME);

        let err = write_declarations(&tables(), &path, DEFAULT_NAMESPACE).unwrap_err();
        assert!(matches!(err, Error::FileWrite { path: ref p, .. } if *p == path));
    }

    #[test]
    fn test_no_tables() {
        let out = render_declarations(&[], "Cfgs");
        assert!(out.contains("module Cfgs {"));
        assert!(!out.contains("export const"));
    }
}
