use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};
use unicode_normalization::UnicodeNormalization;

use crate::error::IngestError;

/// An uploaded file: raw bytes plus the name it was uploaded under.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, IngestError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }

    /// Lower-cased extension without the dot, empty if there is none.
    pub fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Csv,
    PlainText,
    Markdown,
    Docx,
}

impl DocumentKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "pdf" => Some(Self::Pdf),
            "csv" => Some(Self::Csv),
            "txt" => Some(Self::PlainText),
            "md" => Some(Self::Markdown),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }
}

/// Result of extraction. `text` is empty whenever `error` is set.
#[derive(Debug)]
pub struct Extraction {
    pub text: String,
    pub error: Option<IngestError>,
}

impl Extraction {
    fn failed(error: IngestError) -> Self {
        Self {
            text: String::new(),
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

pub struct Ingestor;

impl Ingestor {
    /// Extracts text from `doc`. Failures are logged and reported through
    /// `Extraction::error`; this never returns an error directly.
    pub fn extract(doc: &Document) -> Extraction {
        let ext = doc.extension();
        let Some(kind) = DocumentKind::from_extension(&ext) else {
            warn!(name = %doc.name, "unsupported document format");
            return Extraction::failed(IngestError::Unsupported(if ext.is_empty() {
                doc.name.clone()
            } else {
                format!(".{ext}")
            }));
        };

        match Self::extract_kind(kind, &doc.bytes) {
            Ok(text) => {
                let text: String = text.nfc().collect();
                debug!(name = %doc.name, chars = text.chars().count(), "extracted document text");
                Extraction { text, error: None }
            }
            Err(e) => {
                warn!(name = %doc.name, error = %e, "error processing document");
                Extraction::failed(e)
            }
        }
    }

    fn extract_kind(kind: DocumentKind, bytes: &[u8]) -> Result<String, IngestError> {
        match kind {
            DocumentKind::Pdf => extract_pdf(bytes),
            DocumentKind::Csv => extract_csv(bytes),
            DocumentKind::PlainText | DocumentKind::Markdown => {
                Ok(String::from_utf8(bytes.to_vec())?)
            }
            DocumentKind::Docx => extract_docx(bytes),
        }
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, IngestError> {
    // pdf-extract panics on some malformed inputs instead of returning Err.
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| IngestError::Pdf("malformed PDF".into()))?
        .map_err(|e| IngestError::Pdf(e.to_string()))?;
    // Image-only pages come back blank.
    Ok(pages
        .iter()
        .map(|page| page.as_str())
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n"))
}

fn extract_csv(bytes: &[u8]) -> Result<String, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(reader.headers()?)?;
    for record in reader.records() {
        writer.write_record(&record?)?;
    }

    let out = writer
        .into_inner()
        .map_err(|e| IngestError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8(out)?)
}

fn extract_docx(bytes: &[u8]) -> Result<String, IngestError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| IngestError::Docx(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| IngestError::Docx(e.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|e| IngestError::Docx(e.to_string()))?;
    paragraphs_from_document_xml(&xml)
}

/// One line per `w:p`, built from its `w:t` runs. `w:tab` and `w:br` only
/// count inside a run (`w:r`); tab stops in `w:pPr` are formatting.
fn paragraphs_from_document_xml(xml: &str) -> Result<String, IngestError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => current.clear(),
                b"w:r" => in_run = true,
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" if in_run => current.push('\t'),
                b"w:br" if in_run => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t.unescape().map_err(|e| IngestError::Docx(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:r" => in_run = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(IngestError::Docx(e.to_string())),
        }
    }

    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;

    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            zip.start_file("word/document.xml", SimpleFileOptions::default())
                .unwrap();
            zip.write_all(document_xml.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        buf.into_inner()
    }

    /// A single-page PDF with one Helvetica text object, with a correct
    /// cross-reference table.
    fn one_page_pdf() -> Vec<u8> {
        let content = "BT /F1 12 Tf 72 720 Td (Paris is the capital of France.) Tj ET";
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
                .to_string(),
            format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }
        let xref = pdf.len();
        let mut trailer = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            trailer.push_str(&format!("{offset:010} 00000 n \n"));
        }
        trailer.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.extend_from_slice(trailer.as_bytes());
        pdf
    }

    #[test]
    fn test_plain_text_and_markdown() {
        let txt = Ingestor::extract(&Document::new("notes.txt", "Paris is the capital of France."));
        assert!(txt.is_ok());
        assert_eq!(txt.text, "Paris is the capital of France.");

        let md = Ingestor::extract(&Document::new("README.MD", "# Title\n\nBody"));
        assert_eq!(md.text, "# Title\n\nBody");
    }

    #[test]
    fn test_invalid_utf8_yields_empty_text() {
        let result = Ingestor::extract(&Document::new("bad.txt", vec![0xffu8, 0xfe, 0x00]));
        assert!(result.text.is_empty());
        assert!(matches!(result.error, Some(IngestError::Utf8(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = Ingestor::extract(&Document::new("slides.pptx", b"whatever".to_vec()));
        assert!(result.text.is_empty());
        match result.error {
            Some(IngestError::Unsupported(ext)) => assert_eq!(ext, ".pptx"),
            other => panic!("expected unsupported, got {other:?}"),
        }

        let no_ext = Ingestor::extract(&Document::new("Makefile", b"all:".to_vec()));
        assert!(matches!(no_ext.error, Some(IngestError::Unsupported(_))));
    }

    #[test]
    fn test_csv_round_trips_headers_and_values() {
        let raw = "city,country\nParis,France\n\"Berlin\",Germany\n";
        let result = Ingestor::extract(&Document::new("capitals.csv", raw));
        assert!(result.is_ok());
        assert_eq!(result.text, "city,country\nParis,France\nBerlin,Germany\n");
    }

    #[test]
    fn test_csv_ragged_rows_fail() {
        let result = Ingestor::extract(&Document::new("bad.csv", "a,b\n1,2,3\n"));
        assert!(result.text.is_empty());
        assert!(matches!(result.error, Some(IngestError::Csv(_))));
    }

    #[test]
    fn test_docx_paragraphs() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Paris is the capital</w:t></w:r><w:r><w:t xml:space="preserve"> of France.</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t>Tom &amp; Jerry</w:t><w:tab/><w:t>end</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
        let result = Ingestor::extract(&Document::new("doc.docx", docx_bytes(xml)));
        assert!(result.is_ok(), "{:?}", result.error);
        assert_eq!(result.text, "Paris is the capital of France.\n\nTom & Jerry\tend");
    }

    #[test]
    fn test_docx_tab_stops_are_not_text() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>Hello</w:t></w:r></w:p>
<w:p><w:r><w:t>line one</w:t><w:br/><w:t>line two</w:t></w:r></w:p>
</w:body></w:document>"#;
        let result = Ingestor::extract(&Document::new("tabs.docx", docx_bytes(xml)));
        assert!(result.is_ok(), "{:?}", result.error);
        assert_eq!(result.text, "Hello\nline one\nline two");
    }

    #[test]
    fn test_pdf_text_is_extracted() {
        let result = Ingestor::extract(&Document::new("capital.pdf", one_page_pdf()));
        assert!(result.is_ok(), "{:?}", result.error);
        assert!(result.text.contains("Paris is the capital of France."));
    }

    #[test]
    fn test_corrupt_docx_and_pdf() {
        let docx = Ingestor::extract(&Document::new("broken.docx", b"not a zip".to_vec()));
        assert!(docx.text.is_empty());
        assert!(matches!(docx.error, Some(IngestError::Docx(_))));

        let pdf = Ingestor::extract(&Document::new("broken.pdf", b"%PDF-garbage".to_vec()));
        assert!(pdf.text.is_empty());
        assert!(matches!(pdf.error, Some(IngestError::Pdf(_))));
    }

    #[test]
    fn test_from_path() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("test.txt");
        let mut file = std::fs::File::create(&file_path)?;
        writeln!(file, "Test content")?;

        let doc = Document::from_path(&file_path)?;
        assert_eq!(doc.name, "test.txt");
        assert_eq!(doc.extension(), "txt");
        assert_eq!(Ingestor::extract(&doc).text.trim(), "Test content");

        let missing = Document::from_path(dir.path().join("missing.txt"));
        assert!(matches!(missing, Err(IngestError::Io { .. })));
        Ok(())
    }
}
