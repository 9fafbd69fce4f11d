use crate::error::{Error, Result};
use lopdf::Document;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Slides,
    Tabular,
    Text,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "pptx" => Ok(DocumentFormat::Slides),
            "csv" => Ok(DocumentFormat::Tabular),
            "txt" | "md" | "markdown" | "html" | "htm" | "json" | "xml" | "py" | "js" | "ts"
            | "rs" => Ok(DocumentFormat::Text),
            "" => Err(Error::UnsupportedFormat(format!(
                "{} has no file extension",
                path.display()
            ))),
            other => Err(Error::UnsupportedFormat(format!(
                ".{} ({})",
                other,
                path.display()
            ))),
        }
    }
}

pub struct ExtractService;

impl ExtractService {
    /// Extracts every file in order and joins them under per-file headers.
    pub fn extract_all<P: AsRef<Path>>(paths: &[P]) -> Result<String> {
        if paths.is_empty() {
            return Err(Error::Extraction(
                "at least one file path must be provided".to_string(),
            ));
        }

        // Classify everything up front so a bad extension fails before any parsing.
        let classified = paths
            .iter()
            .map(|p| DocumentFormat::from_path(p.as_ref()).map(|f| (p.as_ref(), f)))
            .collect::<Result<Vec<_>>>()?;

        let mut sections = Vec::with_capacity(classified.len());
        for (path, format) in classified {
            let text = Self::extract_as(path, format)?;
            if text.trim().is_empty() {
                tracing::warn!(path = %path.display(), "no extractable text, skipping");
                continue;
            }
            tracing::info!(path = %path.display(), chars = text.len(), "extracted document");
            sections.push(format!("=== {} ===\n{}", display_name(path), text.trim_end()));
        }

        if sections.is_empty() {
            return Err(Error::Extraction(
                "none of the provided files contained extractable text".to_string(),
            ));
        }

        Ok(sections.join("\n\n"))
    }

    pub fn extract_file(path: &Path) -> Result<String> {
        let format = DocumentFormat::from_path(path)?;
        Self::extract_as(path, format)
    }

    fn extract_as(path: &Path, format: DocumentFormat) -> Result<String> {
        if !path.is_file() {
            return Err(Error::Extraction(format!("file not found: {}", path.display())));
        }

        match format {
            DocumentFormat::Pdf => extract_pdf(path),
            DocumentFormat::Slides => extract_pptx(path),
            DocumentFormat::Tabular => extract_csv(path),
            DocumentFormat::Text => std::fs::read_to_string(path)
                .map_err(|e| extraction_error(path, e)),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn extraction_error(path: &Path, err: impl std::fmt::Display) -> Error {
    Error::Extraction(format!("{}: {}", path.display(), err))
}

fn extract_pdf(path: &Path) -> Result<String> {
    let doc = Document::load(path).map_err(|e| extraction_error(path, e))?;
    if doc.is_encrypted() {
        return Err(extraction_error(path, "PDF is encrypted"));
    }

    let mut pages = Vec::new();
    for (page_num, _page_id) in doc.get_pages() {
        let text = doc
            .extract_text(&[page_num])
            .map_err(|e| extraction_error(path, format!("page {}: {}", page_num, e)))?;
        let text = text.trim();
        if !text.is_empty() {
            pages.push(text.to_string());
        }
    }

    tracing::debug!(path = %path.display(), pages = pages.len(), "parsed PDF");
    Ok(pages.join("\n\n"))
}

fn extract_pptx(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| extraction_error(path, e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| extraction_error(path, e))?;

    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slides.sort_by_key(|(n, _)| *n);

    let mut parts = Vec::new();
    for (number, name) in slides {
        let mut xml = String::new();
        archive
            .by_name(&name)
            .map_err(|e| extraction_error(path, e))?
            .read_to_string(&mut xml)
            .map_err(|e| extraction_error(path, e))?;

        let paragraphs = slide_paragraphs(&xml).map_err(|e| extraction_error(path, e))?;
        if paragraphs.is_empty() {
            continue;
        }
        parts.push(format!("--- Slide {} ---\n{}", number, paragraphs.join("\n")));
    }

    Ok(parts.join("\n\n"))
}

/// `ppt/slides/slide12.xml` -> 12. Layouts, masters and `_rels` entries are ignored.
fn slide_number(name: &str) -> Option<u32> {
    name.strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Text runs (`a:t`) joined per paragraph (`a:p`). Covers text frames and table cells alike.
fn slide_paragraphs(xml: &str) -> std::result::Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"a:t" => in_text = true,
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            Event::End(e) => match e.name().as_ref() {
                b"a:t" => in_text = false,
                b"a:p" => {
                    let text = current.trim();
                    if !text.is_empty() {
                        paragraphs.push(text.to_string());
                    }
                    current.clear();
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn extract_csv(path: &Path) -> Result<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| extraction_error(path, e))?;

    let mut lines = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| extraction_error(path, e))?;
        let fields: Vec<&str> = record.iter().map(str::trim).collect();
        if fields.iter().all(|f| f.is_empty()) {
            continue;
        }
        lines.push(fields.join(" | "));
    }

    Ok(lines.join("\n"))
}
