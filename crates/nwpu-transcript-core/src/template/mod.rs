pub mod archive;
pub mod sheet;
pub mod strings;

use crate::error::TranscriptError;
use crate::model::CourseRecord;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use strings::SharedStrings;
use zip::result::ZipError;
use zip::ZipArchive;

pub(crate) const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
pub(crate) const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n";

/// The two parts regenerated inside the template workbook. Everything else
/// (styles, metadata, other sheets) is carried over byte-for-byte.
pub const SHEET_PART: &str = "xl/worksheets/sheet1.xml";
pub const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// First worksheet row that receives data; row 1 is the styled header.
pub const ANCHOR_ROW: usize = 2;

/// Render `records` into the Excel template and write the result to
/// `output_path`, one row per record starting at the anchor row.
pub fn write_to_template(
    template_path: &Path,
    records: &[CourseRecord],
    output_path: &Path,
) -> Result<(), TranscriptError> {
    let file = File::open(template_path)?;
    let mut zip = ZipArchive::new(file)?;
    let sheet_xml = read_part(&mut zip, SHEET_PART)?;
    let sst_xml = read_part(&mut zip, SHARED_STRINGS_PART)?;
    drop(zip);

    let mut shared = SharedStrings::from_xml(&sst_xml)?;
    let new_sheet = sheet::render_sheet(&sheet_xml, records, &mut shared)?;
    let new_sst = shared.to_xml()?;

    let mut replacements = HashMap::new();
    replacements.insert(SHEET_PART.to_string(), new_sheet);
    replacements.insert(SHARED_STRINGS_PART.to_string(), new_sst);
    archive::rewrite_archive(template_path, output_path, &replacements)
}

fn read_part(zip: &mut ZipArchive<File>, name: &str) -> Result<Vec<u8>, TranscriptError> {
    match zip.by_name(name) {
        Ok(mut part) => {
            let mut bytes = Vec::with_capacity(part.size() as usize);
            part.read_to_end(&mut bytes)?;
            Ok(bytes)
        }
        Err(ZipError::FileNotFound) => Err(TranscriptError::Template(format!(
            "template missing part {name}"
        ))),
        Err(e) => Err(e.into()),
    }
}
