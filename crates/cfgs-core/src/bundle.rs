//! JSON bundle: every table's records in one document, zipped

use crate::error::{Error, Result};
use crate::table::{Record, Table};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Default archive file name in the target directory
pub const DEFAULT_BUNDLE_NAME: &str = "config.zip";

/// Default name of the JSON entry inside the archive
pub const DEFAULT_BUNDLE_ENTRY: &str = "allcfg.json";

/// Aggregate of all tables keyed by table base name
pub struct Bundle<'a> {
    tables: IndexMap<&'a str, &'a Table>,
}

impl<'a> Bundle<'a> {
    /// Collect tables; a later table with the same name replaces an earlier one
    pub fn new(tables: &'a [Table]) -> Self {
        let mut map = IndexMap::new();
        for table in tables {
            map.insert(table.name.as_str(), table);
        }
        Self { tables: map }
    }

    /// Serialize the bundle to JSON text
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for Bundle<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let entries = object_key_order(self.tables.iter().map(|(k, v)| (*k, *v)));
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (name, table) in entries {
            map.serialize_entry(name, &Records(&table.records))?;
        }
        map.end()
    }
}

struct Records<'a>(&'a IndexMap<String, Record>);

impl Serialize for Records<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let entries = object_key_order(self.0.iter().map(|(k, v)| (k.as_str(), v)));
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (id, record) in entries {
            map.serialize_entry(id, record)?;
        }
        map.end()
    }
}

/// Order keys the way the bundle's consumers enumerate object keys:
/// array-index keys first in ascending numeric order, then the rest in
/// insertion order.
fn object_key_order<'a, V>(entries: impl Iterator<Item = (&'a str, V)>) -> Vec<(&'a str, V)> {
    let (mut indexed, named): (Vec<_>, Vec<_>) =
        entries.partition(|(key, _)| array_index(key).is_some());
    indexed.sort_by_key(|(key, _)| array_index(key));
    indexed.extend(named);
    indexed
}

/// Canonical array index: decimal, no leading zeros, below 2^32 - 1
fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse::<u32>().ok().filter(|i| *i != u32::MAX)
}

/// Write the bundle archive and confirm it landed on disk
pub fn write_bundle<P: AsRef<Path>>(tables: &[Table], path: P, entry: &str) -> Result<()> {
    let path = path.as_ref();
    let json = Bundle::new(tables).to_json()?;
    debug!("bundle JSON is {} bytes", json.len());

    let zip_err = |e| Error::Zip {
        path: path.to_path_buf(),
        source: e,
    };

    let write_err = |e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(entry, options).map_err(zip_err)?;
    zip.write_all(json.as_bytes()).map_err(write_err)?;
    zip.finish().map_err(zip_err)?.flush().map_err(write_err)?;

    if !path.exists() {
        return Err(Error::BundleMissing(path.to_path_buf()));
    }

    Ok(())
}

/// Read the JSON entry back out of a bundle archive
pub fn read_bundle<P: AsRef<Path>>(path: P, entry: &str) -> Result<serde_json::Value> {
    let path = path.as_ref();
    let zip_err = |e| Error::Zip {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::open(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut archive = ZipArchive::new(file).map_err(zip_err)?;
    let mut json = String::new();
    archive.by_name(entry).map_err(zip_err)?.read_to_string(&mut json)?;

    Ok(serde_json::from_str(&json)?)
}

/// Size of the written bundle, for reporting
pub fn bundle_size<P: AsRef<Path>>(path: P) -> Result<u64> {
    Ok(fs::metadata(path)?.len())
}
