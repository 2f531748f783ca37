use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

use crate::error::{MergeError, Result};
use crate::models::Attachment;

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

pub const DOCUMENT_FILENAME: &str = "mail_merge_template.docx";

const DOCUMENT_PART: &str = "word/document.xml";

const CONTENT_TYPES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"</Types>"#,
);

const PACKAGE_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"</Relationships>"#,
);

const DOCUMENT_OPEN: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    r#"<w:body><w:p><w:r>"#,
);

const DOCUMENT_CLOSE: &str = r#"</w:r></w:p></w:body></w:document>"#;

/// Render a template body into a single-paragraph Word document
///
/// The text is carried verbatim; merge fields such as `{First Name}` are
/// left for the office software to fill in.
pub fn render_document(body: &str) -> Result<Vec<u8>> {
    if let Some(c) = body.chars().find(|&c| !is_xml_char(c)) {
        return Err(MergeError::Render(format!(
            "body contains unsupported character U+{:04X}",
            c as u32
        )));
    }

    let document_xml = document_xml(body);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in [
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("_rels/.rels", PACKAGE_RELS_XML),
        (DOCUMENT_PART, document_xml.as_str()),
    ] {
        zip.start_file(name, options).map_err(render_error)?;
        zip.write_all(content.as_bytes())
            .map_err(|e| MergeError::Render(e.to_string()))?;
    }

    let cursor = zip.finish().map_err(render_error)?;
    tracing::debug!("Rendered document ({} chars of body)", body.chars().count());

    Ok(cursor.into_inner())
}

pub fn document_attachment(body: &str) -> Result<Attachment> {
    Ok(Attachment {
        filename: DOCUMENT_FILENAME.to_string(),
        content_type: DOCX_CONTENT_TYPE,
        bytes: render_document(body)?,
    })
}

/// Read the paragraph text back out of a `.docx` package
///
/// Breaks come back as `\n` and tabs as `\t`; paragraphs after the first
/// are separated by `\n`.
///
/// This is a plain tag scan of `word/document.xml`, meant for packages made by
/// [`render_document`] and similarly flat documents. It does not resolve
/// numeric character references, CDATA, fields, tables, headers or footnotes,
/// so text from arbitrary Word files may come back incomplete.
pub fn extract_text(docx: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(docx)).map_err(render_error)?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(render_error)?
        .read_to_string(&mut xml)
        .map_err(|e| MergeError::Render(e.to_string()))?;

    let mut text = String::new();
    let mut paragraphs = 0;
    let mut rest = xml.as_str();

    while let Some(open) = rest.find('<') {
        let close = rest[open..]
            .find('>')
            .map(|i| open + i)
            .ok_or_else(|| MergeError::Render("unterminated tag".into()))?;
        let tag = &rest[open + 1..close];
        rest = &rest[close + 1..];

        match tag {
            "w:br/" => text.push('\n'),
            "w:tab/" => text.push('\t'),
            t if t == "w:p" || t.starts_with("w:p ") => {
                if paragraphs > 0 {
                    text.push('\n');
                }
                paragraphs += 1;
            }
            t if t == "w:t" || t.starts_with("w:t ") => {
                let end = rest
                    .find("</w:t>")
                    .ok_or_else(|| MergeError::Render("unterminated text run".into()))?;
                text.push_str(&unescape(&rest[..end]));
                rest = &rest[end + "</w:t>".len()..];
            }
            _ => {}
        }
    }

    Ok(text)
}

fn document_xml(body: &str) -> String {
    let normalized = body.replace("\r\n", "\n").replace('\r', "\n");
    let mut xml = String::with_capacity(DOCUMENT_OPEN.len() + normalized.len() * 2);
    xml.push_str(DOCUMENT_OPEN);

    for (i, line) in normalized.split('\n').enumerate() {
        if i > 0 {
            xml.push_str("<w:br/>");
        }
        for (j, segment) in line.split('\t').enumerate() {
            if j > 0 {
                xml.push_str("<w:tab/>");
            }
            if !segment.is_empty() {
                xml.push_str(r#"<w:t xml:space="preserve">"#);
                xml.push_str(&escape(segment));
                xml.push_str("</w:t>");
            }
        }
    }

    xml.push_str(DOCUMENT_CLOSE);
    xml
}

fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn render_error(err: zip::result::ZipError) -> MergeError {
    MergeError::Render(err.to_string())
}
