use lopdf::Document;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{error, info};

use crate::error::ReportError;

/// Turns an input document into plain text.
pub trait TextSource {
    fn extract_text(&self, path: &Path) -> Result<String, ReportError>;
}

impl<F> TextSource for F
where
    F: Fn(&Path) -> Result<String, ReportError>,
{
    fn extract_text(&self, path: &Path) -> Result<String, ReportError> {
        self(path)
    }
}

/// Reads the text layer of every page of a PDF export.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextSource;

impl TextSource for PdfTextSource {
    fn extract_text(&self, path: &Path) -> Result<String, ReportError> {
        let doc = load_pdf(path).map_err(|e| {
            error!("Failed to load PDF {}: {}", path.display(), e);
            ReportError::TextExtraction {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
        info!("Loaded PDF with {} page(s)", pages.len());

        match doc.extract_text(&pages) {
            Ok(text) => {
                info!("Extracted {} chars of text", text.len());
                Ok(text)
            }
            Err(e) => {
                error!("Could not get text from PDF {}: {}", path.display(), e);
                Err(ReportError::TextExtraction {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

fn load_pdf<P: AsRef<Path>>(path: P) -> Result<Document, lopdf::Error> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Document::load_from(reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_a_text_extraction_error() {
        let err = PdfTextSource
            .extract_text(Path::new("/definitely/not/here.pdf"))
            .unwrap_err();
        assert!(matches!(err, ReportError::TextExtraction { .. }));
        assert_eq!(err.path(), Some(Path::new("/definitely/not/here.pdf")));
    }

    #[test]
    fn non_pdf_content_is_a_text_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, "2015-11-01 - 2015-11-30 Total 1 h 0 min").unwrap();

        let err = PdfTextSource.extract_text(&path).unwrap_err();
        assert!(matches!(err, ReportError::TextExtraction { .. }));
    }

    #[test]
    fn closures_are_text_sources() {
        let source = |_: &Path| -> Result<String, ReportError> { Ok("text".to_string()) };
        assert_eq!(source.extract_text(Path::new("a.pdf")).unwrap(), "text");
    }
}
