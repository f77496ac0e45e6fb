use crate::error::TranscriptError;
use crate::model::CourseRecord;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::strings::SharedStrings;
use super::{ANCHOR_ROW, XML_DECL};

/// Output columns of the upload template, with the cell style index each
/// one uses in the distributed 课程分学期模版.xlsx. Column order:
/// 课程名 分数 学分 学时 学时单位 课程类别 学期.
const COLUMNS: [(char, &str); 7] = [
    ('A', "5"),
    ('B', "5"),
    ('C', "5"),
    ('D', "5"),
    ('E', "6"),
    ('F', "5"),
    ('G', "7"),
];

fn template_values(record: &CourseRecord) -> [String; 7] {
    [
        record.course_name.clone(),
        record.score.clone(),
        record
            .credit
            .map(|d| d.to_string())
            .unwrap_or_default(),
        // 学时 — neither transcript layout carries it.
        String::new(),
        record.hours_unit.clone(),
        record.category.clone(),
        record.semester.clone(),
    ]
}

/// Rewrite the template's first worksheet: every event is copied through,
/// except that inside `sheetData` only the first (header) row survives and
/// one generated row per record is injected before `</sheetData>`. The
/// `dimension` extent is updated to the written range.
pub fn render_sheet(
    template_xml: &[u8],
    records: &[CourseRecord],
    strings: &mut SharedStrings,
) -> Result<Vec<u8>, TranscriptError> {
    let mut reader = Reader::from_reader(template_xml);
    let mut out = Vec::from(XML_DECL.as_bytes());
    let mut writer = Writer::new(&mut out);
    let mut buf = Vec::new();

    let mut in_sheet_data = false;
    let mut saw_sheet_data = false;
    let mut rows_seen = 0usize;
    let mut copying_row = false;
    let mut dropping_row = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            // The declaration was already written, with the template's
            // CRLF-terminated form.
            Event::Decl(_) => {}
            Event::Empty(e) if e.local_name().as_ref() == b"dimension" && !dropping_row => {
                writer.write_event(Event::Empty(rewrite_dimension(&e, records.len())?))?;
            }
            Event::Start(e) => {
                let name = e.local_name();
                if name.as_ref() == b"sheetData" {
                    saw_sheet_data = true;
                    in_sheet_data = true;
                    writer.write_event(Event::Start(e))?;
                } else if in_sheet_data && name.as_ref() == b"row" && !copying_row && !dropping_row
                {
                    rows_seen += 1;
                    if rows_seen == 1 {
                        copying_row = true;
                        writer.write_event(Event::Start(e))?;
                    } else {
                        dropping_row = true;
                    }
                } else if dropping_row {
                    // contents of a dropped template row
                } else {
                    writer.write_event(Event::Start(e))?;
                }
            }
            Event::End(e) => {
                let name = e.local_name();
                if in_sheet_data && name.as_ref() == b"row" {
                    if copying_row {
                        copying_row = false;
                        writer.write_event(Event::End(e))?;
                    } else {
                        dropping_row = false;
                    }
                } else if name.as_ref() == b"sheetData" {
                    if rows_seen == 0 {
                        return Err(TranscriptError::Template(
                            "template sheet missing header row".into(),
                        ));
                    }
                    write_record_rows(&mut writer, records, strings)?;
                    in_sheet_data = false;
                    writer.write_event(Event::End(e))?;
                } else if dropping_row {
                } else {
                    writer.write_event(Event::End(e))?;
                }
            }
            Event::Eof => break,
            ev => {
                // Text, CDATA, comments, empties. Whitespace between
                // dropped rows goes with them.
                let drop_it = dropping_row || (in_sheet_data && !copying_row && rows_seen > 0);
                if !drop_it {
                    writer.write_event(ev)?;
                }
            }
        }
        buf.clear();
    }

    if !saw_sheet_data {
        return Err(TranscriptError::Template(
            "template sheet missing sheetData node".into(),
        ));
    }

    Ok(out)
}

/// Update the `ref` extent and enforce the template's declared capacity.
/// A dimension that covers only the header row declares no data capacity
/// (the shipped template ends with an open styled region) and passes any
/// record count through.
fn rewrite_dimension(
    e: &BytesStart<'_>,
    n_records: usize,
) -> Result<BytesStart<'static>, TranscriptError> {
    let mut out = BytesStart::new("dimension");
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"ref" {
            let original = attr.unescape_value()?;
            if let Some(max_row) = dimension_max_row(&original) {
                let available = max_row.saturating_sub(ANCHOR_ROW - 1);
                if available > 0 && n_records > available {
                    return Err(TranscriptError::Template(format!(
                        "template has room for {} data rows, got {}",
                        available, n_records
                    )));
                }
            }
            let last_row = if n_records == 0 {
                1
            } else {
                ANCHOR_ROW - 1 + n_records
            };
            out.push_attribute(("ref", format!("A1:G{}", last_row).as_str()));
        } else {
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|_| TranscriptError::Template("non-utf8 attribute name".into()))?
                .to_string();
            let value = attr.unescape_value()?.into_owned();
            out.push_attribute((key.as_str(), value.as_str()));
        }
    }
    Ok(out)
}

/// Last row of a range like "A1:G40"; None when the ref is a single cell.
fn dimension_max_row(range: &str) -> Option<usize> {
    let (_, last) = range.split_once(':')?;
    let digits: String = last.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn write_record_rows<W: std::io::Write>(
    writer: &mut Writer<W>,
    records: &[CourseRecord],
    strings: &mut SharedStrings,
) -> Result<(), TranscriptError> {
    for (i, record) in records.iter().enumerate() {
        let row_number = ANCHOR_ROW + i;
        let values = template_values(record);

        let mut row = BytesStart::new("row");
        row.push_attribute(("r", row_number.to_string().as_str()));
        row.push_attribute(("spans", "1:7"));
        writer.write_event(Event::Start(row))?;

        for ((letter, style), value) in COLUMNS.iter().zip(values.iter()) {
            let mut cell = BytesStart::new("c");
            cell.push_attribute(("r", format!("{letter}{row_number}").as_str()));
            cell.push_attribute(("s", *style));
            if value.is_empty() {
                writer.write_event(Event::Empty(cell))?;
                continue;
            }
            cell.push_attribute(("t", "s"));
            let idx = strings.intern(value);
            writer.write_event(Event::Start(cell))?;
            writer.write_event(Event::Start(BytesStart::new("v")))?;
            writer.write_event(Event::Text(BytesText::new(&idx.to_string())))?;
            writer.write_event(Event::End(BytesEnd::new("v")))?;
            writer.write_event(Event::End(BytesEnd::new("c")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("row")))?;
    }
    Ok(())
}
