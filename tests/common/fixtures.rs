// Test fixtures for integration testing

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Build a PDF with one page per entry, each holding one line of text
#[allow(dead_code)] // Used in integration tests
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let kids: Vec<Object> = pages
        .iter()
        .map(|text| {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 11.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let stream = Stream::new(dictionary! {}, content.encode().expect("encode content"));
            let content_id = doc.add_object(stream);
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            })
            .into()
        })
        .collect();

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
    doc.save_to(&mut bytes).expect("save pdf");
    bytes
}

/// Employee handbook pages, one topic per page
#[allow(dead_code)] // Used in integration tests
pub const HANDBOOK_PAGES: [&str; 4] = [
    "Vacation policy: full time employees receive twenty vacation days per year.",
    "Remote work policy: staff may work remotely two days each week with approval.",
    "Expense policy: travel expenses are reimbursed within thirty days of submission.",
    "Security policy: laptops must use disk encryption and a screen lock.",
];

/// Directory of PDF files on disk for CLI tests
#[allow(dead_code)] // Used in integration tests
pub struct PdfDir {
    pub dir: TempDir,
    pub files: Vec<PathBuf>,
}

impl PdfDir {
    /// One handbook PDF plus one unrelated product sheet
    #[allow(dead_code)] // Used in integration tests
    pub fn handbook() -> Self {
        Self::with_files(&[
            ("handbook.pdf", pdf_with_pages(&HANDBOOK_PAGES)),
            (
                "product.pdf",
                pdf_with_pages(&["The widget ships in blue and green with a two year warranty."]),
            ),
        ])
    }

    /// Create a directory holding the given (name, bytes) files
    #[allow(dead_code)] // Used in integration tests
    pub fn with_files(files: &[(&str, Vec<u8>)]) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut paths = Vec::new();

        for (name, bytes) in files {
            let path = dir.path().join(name);
            std::fs::write(&path, bytes).expect("Failed to write file");
            paths.push(path);
        }

        Self { dir, files: paths }
    }

    #[allow(dead_code)] // Used in integration tests
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
