mod run;

use clap::{ArgGroup, Parser};
use nwpu_transcript_core::extraction::pdftotext::PdftotextExtractor;
use nwpu_transcript_core::model::Variant;
use run::{Job, RunConfig};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "nwpu-transcript",
    version,
    about = "Convert NWPU transcript PDFs into the Excel upload template",
    group(ArgGroup::new("transcripts").required(true).multiple(true))
)]
struct Cli {
    /// Path to the Excel template workbook
    #[arg(long, value_name = "PATH", default_value = "课程分学期模版.xlsx")]
    template: PathBuf,

    /// Path to the Chinese transcript PDF
    #[arg(long, value_name = "PDF", group = "transcripts")]
    chinese: Option<PathBuf>,

    /// Path to the English transcript PDF
    #[arg(long, value_name = "PDF", group = "transcripts")]
    english: Option<PathBuf>,

    /// Output path for the Chinese Excel file
    #[arg(long, value_name = "PATH", default_value = "transcript_chinese.xlsx")]
    output_chinese: PathBuf,

    /// Output path for the English Excel file
    #[arg(long, value_name = "PATH", default_value = "transcript_english.xlsx")]
    output_english: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let mut jobs = Vec::new();
    if let Some(input) = cli.chinese {
        jobs.push(Job {
            variant: Variant::Chinese,
            input,
            output: cli.output_chinese,
        });
    }
    if let Some(input) = cli.english {
        jobs.push(Job {
            variant: Variant::English,
            input,
            output: cli.output_english,
        });
    }

    let config = RunConfig {
        template: cli.template,
        jobs,
    };

    let extractor = PdftotextExtractor::new();
    if !run::run(&config, &extractor) {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_least_one_transcript_is_required() {
        let err = Cli::try_parse_from(["nwpu-transcript"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn default_paths() {
        let cli = Cli::try_parse_from(["nwpu-transcript", "--chinese", "a.pdf"]).unwrap();
        assert_eq!(cli.template, PathBuf::from("课程分学期模版.xlsx"));
        assert_eq!(cli.output_chinese, PathBuf::from("transcript_chinese.xlsx"));
        assert_eq!(cli.output_english, PathBuf::from("transcript_english.xlsx"));
        assert!(cli.english.is_none());
    }

    #[test]
    fn both_transcripts_accepted_together() {
        let cli = Cli::try_parse_from([
            "nwpu-transcript",
            "--chinese",
            "a.pdf",
            "--english",
            "b.pdf",
        ])
        .unwrap();
        assert!(cli.chinese.is_some());
        assert!(cli.english.is_some());
    }
}
