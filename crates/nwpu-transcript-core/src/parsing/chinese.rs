use crate::error::TranscriptError;
use crate::extraction::PageContent;
use crate::parsing::{scan_pages, semester, ParsedTranscript, TableLayout, TranscriptParser};

/// Parser for the Chinese transcript layout (本科生成绩单).
///
/// One page, two table halves side by side, columns 课程名称 / 学分 / 成绩 /
/// 课程性质 / 学期 per half. Semester labels look like "2021-2022秋".
pub struct ChineseParser {
    layout: TableLayout,
}

impl ChineseParser {
    pub fn new() -> Self {
        ChineseParser {
            layout: TableLayout {
                header_labels: vec!["课程名称".into(), "学期".into()],
                // Student-info block, footers and summary rows of the
                // current transcript revision.
                skip_prefixes: vec![
                    "姓名".into(),
                    "民族".into(),
                    "班级".into(),
                    "课程名称".into(),
                    "毕业设计".into(),
                    "应修总学分".into(),
                    "国家英语".into(),
                    "总学分绩点".into(),
                ],
                normalize_semester: semester::normalize_chinese,
                hours_unit: "学时",
                merge_wrapped_names: false,
            },
        }
    }
}

impl Default for ChineseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptParser for ChineseParser {
    fn parse(&self, pages: &[PageContent]) -> Result<ParsedTranscript, TranscriptError> {
        scan_pages(pages, &self.layout)
    }

    fn variant_name(&self) -> &str {
        "chinese"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn page(lines: &[&str]) -> PageContent {
        PageContent {
            page_number: 1,
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_parse_basic_page() {
        let pages = [page(&[
            "西北工业大学本科生成绩单",
            "姓名  张三      学号  2019302100",
            "课程名称    学分   成绩   课程性质   学期          课程名称    学分   成绩   课程性质   学期",
            "高等数学    5      92     必修       2021-2022秋   大学物理    4      88     必修       2021-2022春",
            "应修总学分  160",
        ])];
        let parser = ChineseParser::new();
        let parsed = parser.parse(&pages).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].course_name, "高等数学");
        assert_eq!(parsed.records[0].credit, Some(dec!(5)));
        assert_eq!(parsed.records[0].semester, "2021-2022-1");
        assert_eq!(parsed.records[0].hours_unit, "学时");
        assert_eq!(parsed.records[1].course_name, "大学物理");
        assert_eq!(parsed.records[1].semester, "2021-2022-2");
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_summary_cell_beside_course_row() {
        let pages = [page(&[
            "课程名称    学分   成绩   课程性质   学期",
            "高等数学    5      92     必修       2021-2022秋   国家英语四级  425",
        ])];
        let parsed = ChineseParser::new().parse(&pages).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].course_name, "高等数学");
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_summary_rows_skipped() {
        let pages = [page(&[
            "课程名称    学分   成绩   课程性质   学期",
            "高等数学    5      92     必修       2021-2022秋",
            "国家英语四级  425",
            "总学分绩点  3.75",
        ])];
        let parsed = ChineseParser::new().parse(&pages).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert!(parsed.skipped.is_empty());
    }
}
