use nwpu_transcript_core::error::TranscriptError;
use nwpu_transcript_core::extraction::PdfExtractor;
use nwpu_transcript_core::model::Variant;
use nwpu_transcript_core::template::write_to_template;
use std::path::PathBuf;

/// One conversion: a transcript PDF into a populated copy of the template.
pub struct Job {
    pub variant: Variant,
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Everything a run needs, passed in explicitly so tests can inject paths.
pub struct RunConfig {
    pub template: PathBuf,
    pub jobs: Vec<Job>,
}

/// Run every job, each isolated from the others: a failing conversion is
/// reported and the remaining jobs still run. Returns true when all
/// succeeded.
pub fn run(config: &RunConfig, extractor: &dyn PdfExtractor) -> bool {
    if !config.template.exists() {
        eprintln!(
            "error: template not found: {}",
            config.template.display()
        );
        return false;
    }

    let mut all_ok = true;
    for job in &config.jobs {
        match convert(config, job, extractor) {
            Ok(rows) => {
                println!(
                    "{}: wrote {} rows to {}",
                    job.variant,
                    rows,
                    job.output.display()
                );
            }
            Err(e) => {
                eprintln!("{}: error: {}", job.variant, e);
                all_ok = false;
            }
        }
    }
    all_ok
}

fn convert(
    config: &RunConfig,
    job: &Job,
    extractor: &dyn PdfExtractor,
) -> Result<usize, TranscriptError> {
    let pdf_bytes = std::fs::read(&job.input).map_err(|e| {
        TranscriptError::Extraction(format!("cannot read {}: {}", job.input.display(), e))
    })?;

    let parser = job.variant.parser();
    let parsed = nwpu_transcript_core::parse_transcript(&pdf_bytes, extractor, parser.as_ref())?;

    for row in &parsed.skipped {
        eprintln!(
            "{}: warning: unmatched table row on page {}: {}",
            job.variant, row.page_number, row.text
        );
    }

    write_to_template(&config.template, &parsed.records, &job.output)?;
    Ok(parsed.records.len())
}
