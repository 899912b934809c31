use lopdf::Document;
use std::panic::{self, AssertUnwindSafe};

use super::AcquireError;

/// Readers accept the header anywhere in the first kilobyte.
const HEADER_WINDOW: usize = 1024;

/// Byte offset of the `%PDF-` header, if it sits in the leading window.
pub fn pdf_header_offset(bytes: &[u8]) -> Option<usize> {
    let window = &bytes[..bytes.len().min(HEADER_WINDOW + 4)];
    window.windows(5).position(|w| w == b"%PDF-")
}

/// Text of every page, concatenated in page order.
///
/// Pages are extracted one at a time. A page without a text layer, or one
/// whose content cannot be decoded, contributes an empty string. Only a
/// document that cannot be parsed at all, or where every page fails, is an
/// error.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, AcquireError> {
    let start = pdf_header_offset(bytes).ok_or(AcquireError::NotPdf)?;
    let bytes = &bytes[start..];

    let document = panic::catch_unwind(|| Document::load_mem(bytes))
        .map_err(|_| AcquireError::Pdf("parser panicked".into()))?
        .map_err(|e| AcquireError::Pdf(e.to_string()))?;

    let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    log::debug!("[PDF] {} pages", page_numbers.len());

    let mut text = String::new();
    let mut failed = 0;
    for &page in &page_numbers {
        match extract_page(&document, &page_numbers, page) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => {
                log::warn!("[PDF] Skipping page {}: {}", page, e);
                failed += 1;
            }
        }
    }

    if !page_numbers.is_empty() && failed == page_numbers.len() {
        return Err(AcquireError::Pdf(format!(
            "none of the {} pages could be read",
            failed
        )));
    }

    Ok(text)
}

/// Extracts one page by saving a copy of the document that holds only that
/// page. Panics inside the extractor are turned into errors.
fn extract_page(document: &Document, all_pages: &[u32], page: u32) -> Result<String, String> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut single = document.clone();
        let others: Vec<u32> = all_pages.iter().copied().filter(|&p| p != page).collect();
        single.delete_pages(&others);

        let mut buffer = Vec::new();
        single.save_to(&mut buffer).map_err(|e| e.to_string())?;
        pdf_extract::extract_text_from_mem(&buffer).map_err(|e| e.to_string())
    }));

    match outcome {
        Ok(result) => result,
        Err(_) => Err("extractor panicked".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Builds a PDF whose pages each show one line of text. Pages flagged
    /// `false` reference font `/F1` without declaring any resources.
    fn build_pdf(pages: &[(&str, bool)]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let mut kids: Vec<Object> = Vec::new();
        for (line, with_font) in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            };
            if *with_font {
                page.set("Resources", dictionary! { "Font" => dictionary! { "F1" => font_id } });
            }
            kids.push(doc.add_object(page).into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_sniffs_pdf_against_html_terms_page() {
        assert_eq!(pdf_header_offset(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n1 0 obj"), Some(0));
        assert!(pdf_header_offset(b"<html><body><h1>Terms of Service</h1></body></html>").is_none());
        assert!(pdf_header_offset(b"").is_none());
    }

    #[test]
    fn test_header_found_after_leading_junk() {
        let mut bytes = b"\xef\xbb\xbf\r\n".to_vec();
        bytes.extend_from_slice(b"%PDF-1.7\n");
        assert_eq!(pdf_header_offset(&bytes), Some(5));

        let mut late = vec![b' '; 2000];
        late.extend_from_slice(b"%PDF-1.7\n");
        assert!(pdf_header_offset(&late).is_none());
    }

    #[test]
    fn test_rejects_non_pdf_upload() {
        assert!(matches!(
            extract_pdf_text(b"plain text, not a pdf"),
            Err(AcquireError::NotPdf)
        ));
    }

    #[test]
    fn test_corrupt_pdf_is_an_error() {
        assert!(matches!(
            extract_pdf_text(b"%PDF-1.4\ngarbage"),
            Err(AcquireError::Pdf(_))
        ));
    }

    #[test]
    fn test_reads_generated_pdf() {
        let bytes = build_pdf(&[("We sell your data.", true)]);
        let text = extract_pdf_text(&bytes).unwrap();
        assert!(text.contains("We sell your data."));
    }

    #[test]
    fn test_broken_page_is_skipped() {
        let bytes = build_pdf(&[
            ("This page has no font resources.", false),
            ("We sell your data.", true),
        ]);
        let text = extract_pdf_text(&bytes).unwrap();
        assert!(text.contains("We sell your data."));
        assert!(!text.contains("no font resources"));
    }

    #[test]
    fn test_only_broken_pages_is_an_error() {
        let bytes = build_pdf(&[("This page has no font resources.", false)]);
        assert!(matches!(extract_pdf_text(&bytes), Err(AcquireError::Pdf(_))));
    }

    #[test]
    fn test_leading_junk_before_header_is_tolerated() {
        let mut bytes = b"\r\n\r\n".to_vec();
        bytes.extend(build_pdf(&[("Arbitration is mandatory.", true)]));
        let text = extract_pdf_text(&bytes).unwrap();
        assert!(text.contains("Arbitration is mandatory."));
    }
}
