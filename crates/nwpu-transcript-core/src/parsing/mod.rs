pub mod chinese;
pub mod english;
pub mod rows;
pub mod semester;

use crate::error::TranscriptError;
use crate::extraction::PageContent;
use crate::model::{CourseRecord, Variant};
use rows::split_segments;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parser for one transcript layout. The caller picks the variant
/// explicitly; there is no auto-detection.
pub trait TranscriptParser: Send + Sync {
    fn parse(&self, pages: &[PageContent]) -> Result<ParsedTranscript, TranscriptError>;

    /// Name of the layout variant (for diagnostics).
    fn variant_name(&self) -> &str;
}

impl Variant {
    pub fn parser(&self) -> Box<dyn TranscriptParser> {
        match self {
            Variant::Chinese => Box::new(chinese::ChineseParser::new()),
            Variant::English => Box::new(english::EnglishParser::new()),
        }
    }
}

/// A line inside an open table region that matched neither a course row
/// nor any known boilerplate. Surfaced to the caller instead of being
/// dropped silently.
#[derive(Debug, Clone)]
pub struct SkippedRow {
    pub page_number: usize,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ParsedTranscript {
    pub records: Vec<CourseRecord>,
    pub skipped: Vec<SkippedRow>,
}

/// Layout configuration for one transcript variant.
///
/// The boilerplate header/footer patterns are data here, not logic: they
/// are specific to one revision of the transcript templates and the first
/// thing to touch when a new revision breaks parsing.
pub struct TableLayout {
    /// Labels that must all appear on one line for the table region to
    /// open. The region stays open across page breaks.
    pub header_labels: Vec<String>,
    /// Known boilerplate, matched by prefix of a table half's first cell.
    pub skip_prefixes: Vec<String>,
    /// Semester-label normalizer; also the course-row detector (a row is
    /// whatever ends in a cell this accepts).
    pub normalize_semester: fn(&str) -> Option<String>,
    /// Value for the template's 学时单位 column.
    pub hours_unit: &'static str,
    /// Merge a lone, column-aligned segment on the following line into the
    /// course name (wrapped cell text).
    pub merge_wrapped_names: bool,
}

/// Offset tolerance when matching a wrapped name fragment or a lone row to
/// a table half by column position.
const COL_TOLERANCE: usize = 3;

/// Number of cells in a course row: name, credit, score, category, semester.
const ROW_CELLS: usize = 5;

/// Scan extracted pages for course rows according to `layout`.
///
/// Transcripts print two table halves side by side, so one text line holds
/// one or two course rows. Per page, left-half rows are emitted before
/// right-half rows, which is the reading order of the source document.
/// Multi-page tables concatenate in page order; continuation pages parse
/// whether or not they repeat the header line.
///
/// Boilerplate and course rows are resolved per table half: a summary cell
/// printed beside a course row is skipped or flagged on its own and never
/// hides the row.
pub fn scan_pages(
    pages: &[PageContent],
    layout: &TableLayout,
) -> Result<ParsedTranscript, TranscriptError> {
    let mut records = Vec::new();
    let mut skipped = Vec::new();
    let mut table_open = false;

    for page in pages {
        let mut left: Vec<CourseRecord> = Vec::new();
        let mut right: Vec<CourseRecord> = Vec::new();
        // Column where the right half's name cell starts, once known.
        let mut right_col: Option<usize> = None;
        // Rows parsed from the immediately preceding line, as
        // (is_right_half, name_column) pairs, for wrapped-name merging.
        let mut prev_rows: Vec<(bool, usize)> = Vec::new();

        for line in &page.lines {
            let segments = split_segments(line);
            if segments.is_empty() {
                prev_rows.clear();
                continue;
            }

            if layout.header_labels.iter().all(|l| line.contains(l.as_str())) {
                table_open = true;
                prev_rows.clear();
                continue;
            }
            if !table_open {
                continue;
            }

            let matches: Vec<(usize, String)> = segments
                .iter()
                .enumerate()
                .filter_map(|(i, s)| (layout.normalize_semester)(s.text).map(|n| (i, n)))
                .collect();

            if matches.is_empty() {
                if is_boilerplate(layout, segments[0].text) {
                    prev_rows.clear();
                    continue;
                }
                // A lone fragment under a name column is wrapped cell text.
                if layout.merge_wrapped_names && segments.len() == 1 {
                    let seg = &segments[0];
                    let aligned = prev_rows
                        .iter()
                        .find(|(_, col)| seg.col.abs_diff(*col) <= COL_TOLERANCE)
                        .copied();
                    if let Some((is_right, _)) = aligned {
                        let bucket = if is_right { &mut right } else { &mut left };
                        if let Some(rec) = bucket.last_mut() {
                            rec.course_name.push(' ');
                            rec.course_name.push_str(seg.text);
                            continue;
                        }
                    }
                }
                if segments.len() >= 2 {
                    skipped.push(SkippedRow {
                        page_number: page.page_number,
                        text: line.trim().to_string(),
                    });
                }
                prev_rows.clear();
                continue;
            }

            // Each semester cell closes one row candidate of five cells.
            // Whatever sits between candidates belongs to the other table
            // half and is skipped or flagged on its own. A non-boilerplate
            // half ending in a semester cell with too few cells before it
            // means the fixed layout has shifted, and silently guessing
            // would drop or mangle data.
            prev_rows.clear();
            let mut cursor = 0usize;
            for (k, (sem_idx, semester)) in matches.iter().enumerate() {
                let width = *sem_idx + 1 - cursor;
                if width < ROW_CELLS {
                    // A summary half can end in a semester-shaped cell.
                    if is_boilerplate(layout, segments[cursor].text) {
                        cursor = *sem_idx + 1;
                        continue;
                    }
                    return Err(TranscriptError::Parse {
                        page: page.page_number,
                        reason: format!(
                            "row ending in {:?} has {} cells, expected {}: {:?}",
                            segments[*sem_idx].text,
                            width,
                            ROW_CELLS,
                            line.trim()
                        ),
                    });
                }

                let start = *sem_idx + 1 - ROW_CELLS;
                if is_boilerplate(layout, segments[start].text) {
                    cursor = *sem_idx + 1;
                    continue;
                }
                if start > cursor {
                    note_leftover(&segments[cursor..start], page.page_number, layout, &mut skipped);
                }
                let cells = &segments[start..=*sem_idx];
                cursor = *sem_idx + 1;
                let name_col = cells[0].col;

                let credit = match parse_credit(cells[1].text) {
                    Ok(c) => c,
                    Err(reason) => {
                        skipped.push(SkippedRow {
                            page_number: page.page_number,
                            text: format!("{} ({})", line.trim(), reason),
                        });
                        continue;
                    }
                };

                let is_right = if matches.len() == 2 {
                    k == 1
                } else {
                    right_col.is_some_and(|rc| name_col + COL_TOLERANCE >= rc)
                };
                if matches.len() == 2 && k == 1 {
                    right_col = Some(name_col);
                }

                let record = CourseRecord {
                    course_name: cells[0].text.to_string(),
                    score: cells[2].text.to_string(),
                    credit,
                    category: cells[3].text.to_string(),
                    semester: semester.clone(),
                    hours_unit: layout.hours_unit.to_string(),
                };
                if is_right {
                    right.push(record);
                } else {
                    left.push(record);
                }
                prev_rows.push((is_right, name_col));
            }
            if cursor < segments.len() {
                note_leftover(&segments[cursor..], page.page_number, layout, &mut skipped);
            }
        }

        records.extend(left);
        records.extend(right);
    }

    Ok(ParsedTranscript { records, skipped })
}

fn is_boilerplate(layout: &TableLayout, cell: &str) -> bool {
    layout
        .skip_prefixes
        .iter()
        .any(|p| cell.starts_with(p.as_str()))
}

/// Record a group of cells from the non-course half of a line: known
/// boilerplate is dropped, anything else is surfaced.
fn note_leftover(
    segments: &[rows::Segment<'_>],
    page_number: usize,
    layout: &TableLayout,
    skipped: &mut Vec<SkippedRow>,
) {
    if is_boilerplate(layout, segments[0].text) {
        return;
    }
    let text: Vec<&str> = segments.iter().map(|s| s.text).collect();
    skipped.push(SkippedRow {
        page_number,
        text: text.join("  "),
    });
}

fn parse_credit(cell: &str) -> Result<Option<Decimal>, String> {
    let cell = cell.trim();
    if cell.is_empty() || cell == "-" {
        return Ok(None);
    }
    Decimal::from_str(cell)
        .map(Some)
        .map_err(|e| format!("invalid credit '{}': {}", cell, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn page(number: usize, lines: &[&str]) -> PageContent {
        PageContent {
            page_number: number,
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn layout() -> TableLayout {
        TableLayout {
            header_labels: vec!["Course".into(), "Semester".into()],
            skip_prefixes: vec!["Total".into()],
            normalize_semester: semester::normalize_english,
            hours_unit: "",
            merge_wrapped_names: true,
        }
    }

    #[test]
    fn test_single_row_line() {
        let pages = [page(
            1,
            &[
                "Course          Credit  Score  Type      Semester",
                "Calculus I      5       92     Required  1st 2021-2022",
            ],
        )];
        let parsed = scan_pages(&pages, &layout()).unwrap();
        assert_eq!(parsed.records.len(), 1);
        let rec = &parsed.records[0];
        assert_eq!(rec.course_name, "Calculus I");
        assert_eq!(rec.credit, Some(dec!(5)));
        assert_eq!(rec.score, "92");
        assert_eq!(rec.category, "Required");
        assert_eq!(rec.semester, "2021-2022-1");
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_two_halves_left_before_right() {
        let pages = [page(
            1,
            &[
                "Course     Credit  Score  Type  Semester       Course     Credit  Score  Type  Semester",
                "Alpha      2       90     Req   1st 2021-2022  Gamma      3       80     Req   2nd 2021-2022",
                "Beta       2       85     Req   1st 2021-2022  Delta      1       95     Opt   2nd 2021-2022",
            ],
        )];
        let parsed = scan_pages(&pages, &layout()).unwrap();
        let names: Vec<&str> = parsed
            .records
            .iter()
            .map(|r| r.course_name.as_str())
            .collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Gamma", "Delta"]);
    }

    #[test]
    fn test_lone_right_row_assigned_by_column() {
        let pages = [page(
            1,
            &[
                "Course     Credit  Score  Type  Semester       Course     Credit  Score  Type  Semester",
                "Alpha      2       90     Req   1st 2021-2022  Gamma      3       80     Req   2nd 2021-2022",
                "                                               Delta      1       95     Opt   2nd 2021-2022",
            ],
        )];
        let parsed = scan_pages(&pages, &layout()).unwrap();
        let names: Vec<&str> = parsed
            .records
            .iter()
            .map(|r| r.course_name.as_str())
            .collect();
        assert_eq!(names, vec!["Alpha", "Gamma", "Delta"]);
    }

    #[test]
    fn test_table_stays_open_across_pages() {
        let pages = [
            page(
                1,
                &[
                    "Course          Credit  Score  Type      Semester",
                    "Calculus I      5       92     Required  1st 2021-2022",
                ],
            ),
            // Continuation page, no repeated header.
            page(
                2,
                &["Physics I       4       88     Required  2nd 2021-2022"],
            ),
        ];
        let parsed = scan_pages(&pages, &layout()).unwrap();
        let names: Vec<&str> = parsed
            .records
            .iter()
            .map(|r| r.course_name.as_str())
            .collect();
        assert_eq!(names, vec!["Calculus I", "Physics I"]);
    }

    #[test]
    fn test_wrapped_name_merges_into_previous_row() {
        let pages = [page(
            1,
            &[
                "Course          Credit  Score  Type      Semester",
                "Introduction to   3       90     Required  1st 2021-2022",
                "Programming",
            ],
        )];
        let parsed = scan_pages(&pages, &layout()).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].course_name, "Introduction to Programming");
    }

    #[test]
    fn test_rows_before_header_ignored() {
        let pages = [page(
            1,
            &[
                "Student Name    John Doe     ID   2019302100",
                "Course          Credit  Score  Type      Semester",
                "Calculus I      5       92     Required  1st 2021-2022",
            ],
        )];
        let parsed = scan_pages(&pages, &layout()).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_unmatched_row_flagged_not_dropped_silently() {
        let pages = [page(
            1,
            &[
                "Course          Credit  Score  Type      Semester",
                "Calculus I      5       92     Required  1st 2021-2022",
                "Some stray      text in the table",
            ],
        )];
        let parsed = scan_pages(&pages, &layout()).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.skipped.len(), 1);
        assert_eq!(parsed.skipped[0].page_number, 1);
    }

    #[test]
    fn test_wrong_cell_count_is_an_error_with_page() {
        let pages = [
            page(1, &["Course   Credit  Score  Type  Semester"]),
            page(2, &["Calculus I      92     Required  1st 2021-2022"]),
        ];
        let err = scan_pages(&pages, &layout()).unwrap_err();
        match err {
            TranscriptError::Parse { page, .. } => assert_eq!(page, 2),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_skip_prefix_rows_silent() {
        let pages = [page(
            1,
            &[
                "Course          Credit  Score  Type      Semester",
                "Calculus I      5       92     Required  1st 2021-2022",
                "Total Credits   160",
            ],
        )];
        let parsed = scan_pages(&pages, &layout()).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_summary_half_beside_course_row() {
        let pages = [page(
            1,
            &[
                "Course     Credit  Score  Type  Semester",
                "Alpha      2       90     Req   1st 2021-2022  Total Credits   160",
            ],
        )];
        let parsed = scan_pages(&pages, &layout()).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].course_name, "Alpha");
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_leftover_half_flagged_without_dropping_the_row() {
        let pages = [page(
            1,
            &[
                "Course     Credit  Score  Type  Semester",
                "Stray note   here   Alpha      2       90     Req   1st 2021-2022",
            ],
        )];
        let parsed = scan_pages(&pages, &layout()).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].course_name, "Alpha");
        assert_eq!(parsed.skipped.len(), 1);
        assert_eq!(parsed.skipped[0].text, "Stray note  here");
    }

    #[test]
    fn test_skip_prefixed_half_ending_in_semester_cell() {
        let pages = [page(
            1,
            &[
                "Course     Credit  Score  Type  Semester",
                "Alpha      2       90     Req   1st 2021-2022  Total   1st 2021-2022",
            ],
        )];
        let parsed = scan_pages(&pages, &layout()).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_bad_credit_flagged() {
        let pages = [page(
            1,
            &[
                "Course          Credit  Score  Type      Semester",
                "Calculus I      x?      92     Required  1st 2021-2022",
            ],
        )];
        let parsed = scan_pages(&pages, &layout()).unwrap();
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.skipped.len(), 1);
    }
}
