use crate::error::TranscriptError;
use crate::extraction::PageContent;
use crate::parsing::{scan_pages, semester, ParsedTranscript, TableLayout, TranscriptParser};

/// Parser for the English transcript layout.
///
/// Multi-page, two table halves per page, columns Course / Credit / Score /
/// Type / Semester per half. Semester labels look like "1st 2021-2022".
/// Long course names wrap onto the next line within the Course column.
pub struct EnglishParser {
    layout: TableLayout,
}

impl EnglishParser {
    pub fn new() -> Self {
        EnglishParser {
            layout: TableLayout {
                header_labels: vec!["Course".into(), "Semester".into()],
                // Footer and summary rows. The header line is recognized
                // by its labels, not listed here: course names can start
                // with the word "Course".
                skip_prefixes: vec![
                    "Total".into(),
                    "GPA".into(),
                    "Page".into(),
                    "Date".into(),
                ],
                normalize_semester: semester::normalize_english,
                hours_unit: "",
                merge_wrapped_names: true,
            },
        }
    }
}

impl Default for EnglishParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptParser for EnglishParser {
    fn parse(&self, pages: &[PageContent]) -> Result<ParsedTranscript, TranscriptError> {
        scan_pages(pages, &self.layout)
    }

    fn variant_name(&self) -> &str {
        "english"
    }
}
