/// One cell of a layout-text table row.
///
/// `col` is the character position where the segment starts on its line,
/// used to tell the left table half from the right one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub col: usize,
}

/// Split a `pdftotext -layout` line into cell segments.
///
/// Cells are separated by runs of two or more spaces (or tabs); single
/// spaces inside a cell value are preserved.
pub fn split_segments(line: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut start_byte: Option<usize> = None;
    let mut start_col = 0usize;
    let mut end_byte = 0usize;
    let mut col = 0usize;
    let mut gap = 0usize;

    for (byte_idx, ch) in line.char_indices() {
        if ch == ' ' || ch == '\t' {
            gap += 1;
            if gap == 2 {
                if let Some(sb) = start_byte.take() {
                    segments.push(Segment {
                        text: &line[sb..end_byte],
                        col: start_col,
                    });
                }
            }
        } else {
            if start_byte.is_none() {
                start_byte = Some(byte_idx);
                start_col = col;
            }
            gap = 0;
            end_byte = byte_idx + ch.len_utf8();
        }
        col += 1;
    }

    if let Some(sb) = start_byte {
        segments.push(Segment {
            text: &line[sb..end_byte],
            col: start_col,
        });
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &str) -> Vec<&str> {
        split_segments(line).into_iter().map(|s| s.text).collect()
    }

    #[test]
    fn test_split_on_wide_gaps() {
        assert_eq!(
            texts("高等数学    5    92    必修    2021-2022秋"),
            vec!["高等数学", "5", "92", "必修", "2021-2022秋"]
        );
    }

    #[test]
    fn test_single_spaces_kept_inside_cells() {
        assert_eq!(
            texts("Data Structures   3.5   85   Required   1st 2021-2022"),
            vec!["Data Structures", "3.5", "85", "Required", "1st 2021-2022"]
        );
    }

    #[test]
    fn test_column_offsets() {
        let segs = split_segments("  abc    def");
        assert_eq!(segs[0].col, 2);
        assert_eq!(segs[1].col, 9);
    }

    #[test]
    fn test_blank_line() {
        assert!(split_segments("    ").is_empty());
        assert!(split_segments("").is_empty());
    }

    #[test]
    fn test_tabs_count_as_gap() {
        assert_eq!(texts("a\t\tb"), vec!["a", "b"]);
    }
}
