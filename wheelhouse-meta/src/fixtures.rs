//! Test fixtures shared across modules

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Write a zip archive named `name` under `dir` with the given entries.
pub fn write_zip(dir: &Path, name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (entry, content) in entries {
        zip.start_file(*entry, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }

    zip.finish().unwrap();
    path
}

/// Write a minimal wheel whose `METADATA` holds `metadata`.
pub fn write_wheel(dir: &Path, name: &str, metadata: &str) -> PathBuf {
    let dist_info = name
        .split('-')
        .take(2)
        .collect::<Vec<_>>()
        .join("-");
    let metadata_entry = format!("{}.dist-info/METADATA", dist_info);
    write_zip(
        dir,
        name,
        &[
            ("pkg/__init__.py", ""),
            (metadata_entry.as_str(), metadata),
            ("WHEEL", "Wheel-Version: 1.0\n"),
        ],
    )
}
