use crate::error::TranscriptError;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Write `output` as a copy of the `template` archive with the given parts
/// replaced. Untouched entries are raw-copied, compressed bytes and entry
/// metadata included, so they stay byte-identical. Replaced parts get a
/// fixed timestamp, keeping repeated conversions byte-identical too.
///
/// The output is staged in a temp file next to the destination and
/// persisted once complete, so a failed run never leaves a truncated
/// workbook behind.
pub fn rewrite_archive(
    template: &Path,
    output: &Path,
    replacements: &HashMap<String, Vec<u8>>,
) -> Result<(), TranscriptError> {
    let file = File::open(template)?;
    let mut zip = ZipArchive::new(file)?;

    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let staging = tempfile::NamedTempFile::new_in(parent)?;
    let mut writer = ZipWriter::new(staging);

    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    let mut replaced = 0usize;
    for i in 0..zip.len() {
        let entry = zip.by_index(i)?;
        let name = entry.name().to_string();
        match replacements.get(&name) {
            Some(bytes) => {
                drop(entry);
                writer.start_file(name, options)?;
                writer.write_all(bytes)?;
                replaced += 1;
            }
            None => {
                writer.raw_copy_file(entry)?;
            }
        }
    }

    if replaced != replacements.len() {
        let missing: Vec<&str> = replacements
            .keys()
            .filter(|name| zip.by_name(name).is_err())
            .map(String::as_str)
            .collect();
        return Err(TranscriptError::Template(format!(
            "template missing part(s): {}",
            missing.join(", ")
        )));
    }

    let staging = writer.finish()?;
    staging
        .persist(output)
        .map_err(|e| TranscriptError::Io(e.error))?;
    Ok(())
}
