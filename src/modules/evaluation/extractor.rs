use std::path::Path;

use crate::api::error;

const PDF_MAGIC: &[u8] = b"%PDF-";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const MIN_TEXT_RUN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    LegacyDoc,
}

impl DocumentFormat {
    /// Sniffs the container format; the declared MIME type is not trusted.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(ZIP_MAGIC) {
            return Some(Self::Docx);
        }
        if bytes.starts_with(OLE_MAGIC) {
            return Some(Self::LegacyDoc);
        }
        // PDF readers tolerate junk before the header.
        let head = &bytes[..bytes.len().min(1024)];
        head.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC).then_some(Self::Pdf)
    }
}

pub trait TextExtractor {
    /// Plain text of the document at `path`. Blocking.
    fn extract(&self, path: &Path) -> Result<String, error::SystemError>;
}

#[derive(Debug, Clone, Default)]
pub struct DocumentExtractor;

impl TextExtractor for DocumentExtractor {
    fn extract(&self, path: &Path) -> Result<String, error::SystemError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(error::SystemError::storage("CV file not found on disk"));
            }
            Err(e) => return Err(error::SystemError::Io(e)),
        };

        let text = match DocumentFormat::detect(&bytes) {
            Some(DocumentFormat::Pdf) => extract_pdf(&bytes)?,
            Some(DocumentFormat::Docx) => extract_docx(&bytes)?,
            Some(DocumentFormat::LegacyDoc) => extract_legacy_doc(&bytes),
            None => {
                return Err(error::SystemError::extraction("Unsupported document format"));
            }
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(error::SystemError::extraction("No readable text found in document"));
        }
        Ok(text.to_string())
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, error::SystemError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| error::SystemError::extraction(format!("Could not read PDF content: {e}")))
}

fn extract_docx(bytes: &[u8]) -> Result<String, error::SystemError> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| error::SystemError::extraction(format!("Could not read Word content: {e}")))?;

    let mut text = String::new();
    for child in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(p) = child {
            for run in p.children {
                if let docx_rs::ParagraphChild::Run(run) = run {
                    for run_child in run.children {
                        if let docx_rs::RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}

/// Word 97-2003 binaries keep body text either as 8-bit or UTF-16LE runs.
/// Both are scanned and the richer result wins.
fn extract_legacy_doc(bytes: &[u8]) -> String {
    let narrow = collect_runs(bytes.iter().copied());
    let wide = collect_runs(
        bytes.chunks_exact(2).map(|pair| if pair[1] == 0 { pair[0] } else { 0 }),
    );

    if wide.len() >= narrow.len() { wide } else { narrow }
}

fn collect_runs(bytes: impl Iterator<Item = u8>) -> String {
    let mut runs: Vec<String> = Vec::new();
    let mut current = String::new();

    let mut flush = |current: &mut String| {
        let run = current.trim();
        if run.len() >= MIN_TEXT_RUN {
            runs.push(run.to_string());
        }
        current.clear();
    };

    for b in bytes {
        if b.is_ascii_graphic() || b == b' ' {
            current.push(b as char);
        } else {
            flush(&mut current);
        }
    }
    flush(&mut current);

    runs.join("\n")
}
