//! Text extraction per file type. Blocking; callers run it on the blocking pool.

use crate::error::DocumentError;
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// Text runs and paragraph ends in WordprocessingML.
static DOCX_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|</w:p>|<w:tab/>|<w:br/>").expect("valid regex")
});

/// Text runs and paragraph ends in DrawingML (slides).
static PPTX_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<a:t(?:\s[^>]*)?>([^<]*)</a:t>|</a:p>").expect("valid regex"));

static SLIDE_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ppt/slides/slide(\d+)\.xml$").expect("valid regex"));

/// Supported document formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Text,
    Pdf,
    Docx,
    Pptx,
}

impl DocumentKind {
    /// Maps a file name's extension (case-insensitive) to a kind. Legacy `.doc` is not supported.
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "txt" => Ok(DocumentKind::Text),
            "pdf" => Ok(DocumentKind::Pdf),
            "docx" => Ok(DocumentKind::Docx),
            "pptx" => Ok(DocumentKind::Pptx),
            _ => Err(DocumentError::Unsupported(if ext.is_empty() {
                path.display().to_string()
            } else {
                format!(".{}", ext)
            })),
        }
    }
}

/// Extracts the plain text of a document.
pub fn load_text(path: &Path) -> Result<String, DocumentError> {
    let kind = DocumentKind::from_path(path)?;
    let text = match kind {
        DocumentKind::Text => String::from_utf8_lossy(&std::fs::read(path)?).into_owned(),
        DocumentKind::Pdf => {
            pdf_extract::extract_text(path).map_err(|e| DocumentError::Extract(e.to_string()))?
        }
        DocumentKind::Docx => load_docx(path)?,
        DocumentKind::Pptx => load_pptx(path)?,
    };
    debug!(?kind, chars = text.chars().count(), "document text extracted");
    Ok(text)
}

fn load_docx(path: &Path) -> Result<String, DocumentError> {
    let mut archive = zip::ZipArchive::new(File::open(path)?)?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut xml)?;
    Ok(extract_runs(&DOCX_TEXT, &xml))
}

fn load_pptx(path: &Path) -> Result<String, DocumentError> {
    let mut archive = zip::ZipArchive::new(File::open(path)?)?;
    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let number = SLIDE_ENTRY.captures(name)?.get(1)?.as_str().parse().ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    slides.sort_by_key(|(number, _)| *number);

    let mut texts = Vec::with_capacity(slides.len());
    for (_, name) in slides {
        let mut xml = String::new();
        archive.by_name(&name)?.read_to_string(&mut xml)?;
        let text = extract_runs(&PPTX_TEXT, &xml);
        if !text.trim().is_empty() {
            texts.push(text.trim_end().to_string());
        }
    }
    Ok(texts.join("\n\n"))
}

/// Concatenates captured text runs; paragraph ends become newlines.
fn extract_runs(pattern: &Regex, xml: &str) -> String {
    let mut out = String::new();
    for caps in pattern.captures_iter(xml) {
        match caps.get(1) {
            Some(run) => out.push_str(&unescape_xml(run.as_str())),
            None => match caps.get(0).map(|m| m.as_str()) {
                Some("<w:tab/>") => out.push('\t'),
                _ => out.push('\n'),
            },
        }
    }
    out
}

fn unescape_xml(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
