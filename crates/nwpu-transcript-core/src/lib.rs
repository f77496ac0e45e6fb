pub mod error;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod template;

use error::TranscriptError;
use extraction::PdfExtractor;
use parsing::{ParsedTranscript, TranscriptParser};

/// Main API entry point: extract a transcript PDF and parse its course
/// table with the given layout parser.
///
/// The result carries the ordered course records plus any table lines the
/// parser could not place, so callers can surface those instead of losing
/// them. Pair with [`template::write_to_template`] for the full pipeline.
pub fn parse_transcript(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    parser: &dyn TranscriptParser,
) -> Result<ParsedTranscript, TranscriptError> {
    let pages = extractor.extract_pages(pdf_bytes)?;

    if pages.iter().all(|p| p.lines.iter().all(|l| l.trim().is_empty())) {
        return Err(TranscriptError::Extraction(
            "no text content found in PDF".into(),
        ));
    }

    parser.parse(&pages)
}
