use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use super::ExtractError;

const BODY_PART: &str = "word/document.xml";

/// Unpacks a `.docx` archive and concatenates the text runs of its main body.
/// Paragraph ends become newlines; `<w:tab/>` and `<w:br/>` map to tab and newline.
pub fn read_docx(path: &Path) -> Result<String, ExtractError> {
    let file = File::open(path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name(BODY_PART)
        .map_err(|e| ExtractError::Docx(format!("{BODY_PART}: {e}")))?
        .read_to_string(&mut xml)?;

    body_text(&xml)
}

fn body_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" | b"w:cr" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractError::Docx(e.to_string()))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ExtractError::Docx(format!(
                    "malformed XML at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    /// Writes a minimal `.docx` whose body holds one paragraph per entry.
    pub(crate) fn write_docx(path: &Path, paragraphs: &[&str]) {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
            .collect();
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{body}</w:body></w:document>"
        );

        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file(BODY_PART, zip::write::FileOptions::default())
            .unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn test_reads_paragraph_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.docx");
        write_docx(&path, &["Jane Doe", "Python &amp; SQL engineer"]);

        let text = read_docx(&path).unwrap();
        assert_eq!(text, "Jane Doe\nPython & SQL engineer\n");
    }

    #[test]
    fn test_tabs_and_breaks_are_whitespace() {
        let xml = "<w:body><w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p></w:body>";
        assert_eq!(body_text(xml).unwrap(), "a\tb\nc\n");
    }

    #[test]
    fn test_text_outside_runs_is_ignored() {
        let xml = "<w:body><w:p><w:pPr>ignored</w:pPr><w:r><w:t>kept</w:t></w:r></w:p></w:body>";
        assert_eq!(body_text(xml).unwrap(), "kept\n");
    }

    #[test]
    fn test_non_zip_file_is_docx_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        std::fs::write(&path, b"not a zip").unwrap();

        assert!(matches!(read_docx(&path), Err(ExtractError::Docx(_))));
    }
}
