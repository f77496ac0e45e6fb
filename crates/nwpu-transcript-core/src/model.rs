use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One course row parsed from a transcript, in the shape the upload
/// template expects.
///
/// Records are immutable once parsed. Their order is the appearance order
/// in the source PDF: per page, the left table half first, then the right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub course_name: String,
    /// Grade as printed (numeric or letter), passed through unchanged.
    pub score: String,
    /// Credit value, `None` when the cell is empty.
    pub credit: Option<Decimal>,
    /// Course category (课程性质 / Type), may be empty.
    pub category: String,
    /// Normalized semester label, e.g. "2021-2022-1".
    pub semester: String,
    /// Unit label for the 学时 column of the template ("学时" for the
    /// Chinese layout, empty for the English one).
    pub hours_unit: String,
}

/// The two known transcript layouts. Selected explicitly by the caller;
/// there is no format sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Chinese,
    English,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Chinese => write!(f, "chinese"),
            Variant::English => write!(f, "english"),
        }
    }
}
