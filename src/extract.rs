// ABOUTME: Content extraction for the deckgen application
// ABOUTME: Pulls plain text out of txt, csv, docx and pdf source documents

use crate::errors::{DeckError, Result};
use crate::utils;
use log::{debug, info, warn};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Read a source document as plain text.
///
/// Unsupported extensions are not an error: they yield a warning sentinel
/// string so the caller can surface it alongside the generated deck.
pub fn extract(path: &Path) -> Result<String> {
    utils::validate_file_exists(path)?;
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    info!("Extracting text from {:?}", path);

    match ext.as_str() {
        "txt" | "md" => {
            let bytes = fs::read(path).map_err(DeckError::FileReadError)?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        "csv" => extract_csv(path),
        "docx" => extract_docx(path),
        "pdf" => extract_pdf(path),
        _ => {
            let shown = if ext.is_empty() { String::new() } else { format!(".{}", ext) };
            warn!("Unsupported source format {:?} for {:?}", shown, path);
            Ok(unsupported_sentinel(&shown))
        }
    }
}

pub fn unsupported_sentinel(ext: &str) -> String {
    format!("⚠ Unsupported file format: {}", ext)
}

/// Extract every regular file directly inside `dir`, keyed by file name.
pub fn extract_directory(dir: &Path) -> Result<BTreeMap<String, String>> {
    utils::validate_directory_exists(dir)?;
    let pattern = format!("{}/*", dir.to_string_lossy());

    let mut contents = BTreeMap::new();
    for path in glob::glob(&pattern)
        .map_err(|e| DeckError::ValidationError(format!("Invalid glob pattern: {}", e)))?
        .flatten()
        .filter(|p| p.is_file())
    {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match extract(&path) {
            Ok(text) => {
                contents.insert(name, text);
            }
            Err(e) => warn!("Skipping {:?}: {}", path, e),
        }
    }
    Ok(contents)
}

/// Keep at most `max_words` words of `text`.
///
/// Returns the possibly shortened text and, when anything was cut, the
/// warning shown to the user.
pub fn limit_words(text: &str, max_words: usize) -> (String, Option<String>) {
    if utils::word_count(text) <= max_words {
        return (text.to_string(), None);
    }
    warn!("Source text exceeds {} words; trimming", max_words);
    let trimmed = text.split_whitespace().take(max_words).collect::<Vec<_>>().join(" ");
    let warning = format!(
        "⚠ Content exceeded {max_words} words. Only the first {max_words} words were used for PPT generation."
    );
    (trimmed, Some(warning))
}

fn extract_csv(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(DeckError::FileReadError)?;
    let text = String::from_utf8_lossy(&bytes);
    let rows: Vec<Vec<String>> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(split_csv_line)
        .collect();
    Ok(format_table(&rows))
}

/// Split one CSV record, honouring double-quoted fields and `""` escapes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut field).trim().to_string()),
            _ => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}

/// Right-align columns, one row per line.
fn format_table(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            rows.iter()
                .filter_map(|r| r.get(c))
                .map(|f| f.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    rows.iter()
        .map(|row| {
            widths
                .iter()
                .enumerate()
                .map(|(c, width)| {
                    let field = row.get(c).map(String::as_str).unwrap_or("");
                    format!("{:>width$}", field, width = width)
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn extract_docx(path: &Path) -> Result<String> {
    let file = fs::File::open(path).map_err(DeckError::FileReadError)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| DeckError::ValidationError(format!("Not a valid docx archive: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| DeckError::ValidationError(format!("docx has no document part: {}", e)))?
        .read_to_string(&mut xml)
        .map_err(DeckError::FileReadError)?;

    docx_paragraphs(&xml)
}

/// Text of each `w:p` paragraph, one per line.
fn docx_paragraphs(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" => current.push('\n'),
                b"w:p" => paragraphs.push(String::new()),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| DeckError::ValidationError(format!("Bad docx text: {}", e)))?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DeckError::ValidationError(format!(
                    "Error parsing docx XML at {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    debug!("Read {} docx paragraphs", paragraphs.len());
    Ok(paragraphs.join("\n"))
}

/// Text of every page, in reading order as the PDF lays it out.
///
/// The PDF reader panics on some malformed files; that is reported as an
/// invalid document rather than taking the process down.
fn extract_pdf(path: &Path) -> Result<String> {
    let text = std::panic::catch_unwind(|| pdf_extract::extract_text(path))
        .map_err(|_| DeckError::ValidationError(format!("Could not read PDF {:?}", path)))?
        .map_err(|e| DeckError::ValidationError(format!("Not a valid PDF: {}", e)))?;

    if text.trim().is_empty() {
        warn!("No extractable text found in {:?}", path);
    }
    Ok(text.trim().to_string())
}
