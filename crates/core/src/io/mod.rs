//! I/O for point files and grids
//!
//! Reading: delimited text tables and GeoJSON point collections.
//! Writing: Float32 GeoTIFF.

mod delimited;
mod geojson_points;
mod native;

pub use native::{write_geotiff, write_geotiff_to_buffer};

use crate::error::{Error, Result};
use crate::points::PointSet;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Field names and layout used when reading point files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointReadOptions {
    /// Column holding the x coordinate (delimited files only)
    pub x_field: String,
    /// Column holding the y coordinate (delimited files only)
    pub y_field: String,
    /// Column or property holding the sample value
    pub z_field: String,
    /// Field delimiter for delimited files
    pub delimiter: u8,
}

impl Default for PointReadOptions {
    fn default() -> Self {
        Self {
            x_field: "x".into(),
            y_field: "y".into(),
            z_field: "Z".into(),
            delimiter: b',',
        }
    }
}

/// Supported point file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointFormat {
    /// `.csv`, `.txt`, `.xyz`
    Delimited,
    /// `.geojson`, `.json`
    GeoJson,
}

impl PointFormat {
    /// Detect the format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" | "xyz" => Some(Self::Delimited),
            "geojson" | "json" => Some(Self::GeoJson),
            _ => None,
        }
    }
}

/// Identifier of an input: its file name without extension
pub fn source_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read a point file, choosing the parser from the extension.
///
/// Every failure to open, recognize or parse the file is reported as
/// [`Error::Parse`] carrying the file's identifier.
pub fn read_points<P: AsRef<Path>>(path: P, options: &PointReadOptions) -> Result<PointSet> {
    let path = path.as_ref();
    let id = source_id(path);

    let format = PointFormat::from_path(path)
        .ok_or_else(|| Error::parse(&id, format!("unsupported file type: {}", path.display())))?;

    match format {
        PointFormat::Delimited => {
            let file = File::open(path)
                .map_err(|e| Error::parse(&id, format!("cannot open: {}", e)))?;
            delimited::parse_delimited(BufReader::new(file), &id, options)
        }
        PointFormat::GeoJson => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| Error::parse(&id, format!("cannot read: {}", e)))?;
            geojson_points::parse_geojson(&content, &id, options)
        }
    }
}

/// List the supported point files directly inside `dir`, sorted by name.
pub fn discover_inputs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.is_file() && PointFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn format_from_extension() {
        assert_eq!(PointFormat::from_path(Path::new("a.CSV")), Some(PointFormat::Delimited));
        assert_eq!(PointFormat::from_path(Path::new("a.xyz")), Some(PointFormat::Delimited));
        assert_eq!(PointFormat::from_path(Path::new("a.geojson")), Some(PointFormat::GeoJson));
        assert_eq!(PointFormat::from_path(Path::new("a.shp")), None);
        assert_eq!(PointFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn source_id_is_file_stem() {
        assert_eq!(source_id(Path::new("/data/full/site_07.csv")), "site_07");
    }

    #[test]
    fn discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.csv"), "x,y,Z\n0,0,1\n").unwrap();
        fs::write(dir.path().join("a.geojson"), "{}").unwrap();
        fs::write(dir.path().join("readme.md"), "notes").unwrap();
        fs::create_dir(dir.path().join("sub.csv")).unwrap();

        let found = discover_inputs(dir.path()).unwrap();
        let names: Vec<_> = found.iter().map(|p| source_id(p)).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn read_points_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.csv");
        fs::write(&path, "x,y,Z\n0,0,1\n1,0,2\n").unwrap();

        let set = read_points(&path, &PointReadOptions::default()).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn unreadable_file_is_parse_error() {
        let err = read_points("/nonexistent/dir/pts.csv", &PointReadOptions::default());
        match err {
            Err(Error::Parse { source_id, .. }) => assert_eq!(source_id, "pts"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn unsupported_extension_is_parse_error() {
        let err = read_points("points.shp", &PointReadOptions::default());
        assert!(matches!(err, Err(Error::Parse { .. })));
    }
}
