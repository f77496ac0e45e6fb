use once_cell::sync::Lazy;
use regex::Regex;

static CHINESE_TERM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{4})([春夏秋冬])$").expect("valid regex"));

static ENGLISH_TERM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d)(?:st|nd|rd|th)?\s*(\d{4}-\d{4})$").expect("valid regex"));

/// Normalize a Chinese semester label like "2021-2022秋" to "2021-2022-1".
///
/// The template numbers terms 1..3: autumn = 1, spring = 2, winter and the
/// short summer term both map to 3. Returns None for anything that is not
/// a semester label (header cells, GPA footers, ...).
pub fn normalize_chinese(term: &str) -> Option<String> {
    let caps = CHINESE_TERM.captures(term.trim())?;
    let number = match &caps[3] {
        "秋" => "1",
        "春" => "2",
        "冬" | "夏" => "3",
        _ => return None,
    };
    Some(format!("{}-{}-{}", &caps[1], &caps[2], number))
}

/// Normalize an English semester label like "1st 2021-2022" to "2021-2022-1".
pub fn normalize_english(term: &str) -> Option<String> {
    let cleaned = term.replace(['\n', '\r'], " ");
    let caps = ENGLISH_TERM.captures(cleaned.trim())?;
    Some(format!("{}-{}", &caps[2], &caps[1]))
}
