// src/output.rs
// =============================================================================
// Writing the results: two link files and a short summary.
//
// Files are named after the target domain and the time the crawl ended:
//   example.com_2026-10-18_14-03-22_internal_links.txt
//   example.com_2026-10-18_14-03-22_external_links.txt
// One URL per line, sorted.
// =============================================================================

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use colored::Colorize;

use crate::crawl::{CrawlReport, LinkEvent};
use crate::error::Result;
use crate::links::CanonicalUrl;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFiles {
    pub internal: PathBuf,
    pub external: PathBuf,
}

impl OutputFiles {
    pub fn for_domain(dir: &Path, domain: &str, at: DateTime<Local>) -> Self {
        let stamp = at.format("%Y-%m-%d_%H-%M-%S");
        Self {
            internal: dir.join(format!("{}_{}_internal_links.txt", domain, stamp)),
            external: dir.join(format!("{}_{}_external_links.txt", domain, stamp)),
        }
    }
}

// Name of the throwaway file used to check the output directory is writable
const WRITE_CHECK_FILE: &str = ".link-extractor-write-check";

/// Creates `dir` if needed and checks that files can be created in it.
///
/// Runs before the crawl, so a bad destination fails fast instead of
/// throwing away a finished crawl.
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    let check = dir.join(WRITE_CHECK_FILE);
    fs::File::create(&check)?;
    fs::remove_file(&check)?;
    Ok(())
}

/// Writes both link lists, creating the output directory if needed.
pub fn write_link_files(report: &CrawlReport, files: &OutputFiles) -> Result<()> {
    for path in [&files.internal, &files.external] {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
    }

    write_lines(&files.internal, &report.internal)?;
    write_lines(&files.external, &report.external)?;
    Ok(())
}

fn write_lines(path: &Path, urls: &[CanonicalUrl]) -> Result<()> {
    let mut out = BufWriter::new(fs::File::create(path)?);
    for url in urls {
        writeln!(out, "{}", url)?;
    }
    out.flush()?;
    Ok(())
}

/// One line per newly found link, green for internal, gray for external.
pub fn print_link_event(event: &LinkEvent) {
    match event {
        LinkEvent::Internal(url) => {
            println!("{}", format!("[*] Internal link: {}", url).green());
        }
        LinkEvent::External(url) => {
            println!("{}", format!("[!] External link: {}", url).bright_black());
        }
    }
}

pub fn print_summary(report: &CrawlReport) {
    println!();
    if report.cancelled {
        println!("{}", "[-] Crawl cancelled, results are partial".yellow());
    }
    println!("{} {}", "[+] Total Internal links:".bold(), report.internal.len());
    println!("{} {}", "[+] Total External links:".bold(), report.external.len());
    println!("{} {}", "[+] Total URLs:".bold(), report.total_links());
    println!(
        "{} {} ({} failed)",
        "[+] Pages visited:".bold(),
        report.pages_visited,
        report.failed_pages
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn url(s: &str) -> CanonicalUrl {
        CanonicalUrl::parse_seed(s).unwrap()
    }

    fn report() -> CrawlReport {
        CrawlReport {
            seed: url("http://example.com/"),
            target_domain: "example.com".into(),
            internal: vec![url("http://example.com/a"), url("http://example.com/b")],
            external: vec![url("http://other.com/")],
            pages_visited: 2,
            failed_pages: 0,
            cancelled: false,
            elapsed_ms: 10,
        }
    }

    #[test]
    fn test_file_names() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let files = OutputFiles::for_domain(Path::new("out"), "example.com", at);
        assert_eq!(
            files.internal,
            PathBuf::from("out/example.com_2024-03-09_07-05-01_internal_links.txt")
        );
        assert_eq!(
            files.external,
            PathBuf::from("out/example.com_2024-03-09_07-05-01_external_links.txt")
        );
    }

    #[test]
    fn test_write_link_files() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested");
        let files = OutputFiles::for_domain(&dir, "example.com", Local::now());

        write_link_files(&report(), &files).unwrap();

        assert_eq!(
            fs::read_to_string(&files.internal).unwrap(),
            "http://example.com/a\nhttp://example.com/b\n"
        );
        assert_eq!(
            fs::read_to_string(&files.external).unwrap(),
            "http://other.com/\n"
        );
    }

    #[test]
    fn test_empty_lists_give_empty_files() {
        let tmp = tempfile::tempdir().unwrap();
        let files = OutputFiles::for_domain(tmp.path(), "example.com", Local::now());
        let mut empty = report();
        empty.internal.clear();
        empty.external.clear();

        write_link_files(&empty, &files).unwrap();

        assert_eq!(fs::read_to_string(&files.internal).unwrap(), "");
        assert_eq!(fs::read_to_string(&files.external).unwrap(), "");
    }

    #[test]
    fn test_unwritable_destination_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        // a file where the output directory should be
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let files = OutputFiles::for_domain(&blocker, "example.com", Local::now());

        assert!(write_link_files(&report(), &files).is_err());
    }

    #[test]
    fn test_prepare_creates_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a").join("b");

        prepare_output_dir(&dir).unwrap();

        assert!(dir.is_dir());
        // the write check leaves nothing behind
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn test_prepare_fails_when_dir_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let result = prepare_output_dir(&blocker.join("out"));
        assert!(matches!(result, Err(crate::error::CrawlError::Io(_))));
        assert!(matches!(
            prepare_output_dir(&blocker),
            Err(crate::error::CrawlError::Io(_))
        ));
    }

    #[test]
    fn test_report_json_shape() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["seed"], "http://example.com/");
        assert_eq!(json["internal"][1], "http://example.com/b");
        assert_eq!(json["external"][0], "http://other.com/");
        assert_eq!(json["pages_visited"], 2);
    }
}
