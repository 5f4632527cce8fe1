//! Integration tests for template reading and personalization.

mod common;

use certgen::pptx::Package;
use certgen::{personalize, personalize_all, BatchOptions, Error, PageSize, Recipient, Template};
use common::{build_pptx, certificate_pptx, certificate_slide, split_slide, NAME_RUN_PROPS};

const SLIDE_PART: &str = "ppt/slides/slide1.xml";

#[test]
fn test_read_template() {
    let template = Template::from_bytes(&certificate_pptx()).unwrap();
    assert_eq!(template.page_count(), 1);
    assert_eq!(template.page_size, PageSize::standard());
    assert_eq!(template.placeholder_count(), 2);
    assert!(template.split_placeholders().is_empty());

    let name_run = template
        .runs()
        .find(|r| r.text == "[NAME]")
        .expect("name run");
    assert_eq!(name_run.style.size, Some(40.0));
    assert_eq!(name_run.style.bold, Some(true));
    assert_eq!(name_run.style.color.as_deref(), Some("1F3864"));
    assert_eq!(name_run.style.font_name.as_deref(), Some("Georgia"));
}

#[test]
fn test_missing_slide_size_uses_default() {
    let data = build_pptx(&[certificate_slide()], None);
    let template = Template::from_bytes(&data).unwrap();
    assert_eq!(template.page_size, PageSize::standard());
}

#[test]
fn test_widescreen_slide_size() {
    let data = build_pptx(&[certificate_slide()], Some((12_192_000, 6_858_000)));
    let template = Template::from_bytes(&data).unwrap();
    assert!((template.page_size.width_pt() - 960.0).abs() < 0.01);
}

#[test]
fn test_corrupt_template_is_template_error() {
    let err = Template::from_bytes(b"PK\x03\x04 truncated").unwrap_err();
    assert!(matches!(err, Error::Template(_)));
    assert_eq!(err.stage().exit_code(), 4);
}

#[test]
fn test_personalized_text() {
    let template = Template::from_bytes(&certificate_pptx()).unwrap();
    let doc = personalize(&template, &Recipient::new(1, "Ana Lima"), "May 1, 2025");

    let text = doc.plain_text();
    assert!(text.contains("Certificate of Attendance"));
    assert!(text.contains("Ana Lima"));
    assert!(text.contains("Held on May 1, 2025"));
    assert!(!text.contains("[NAME]"));
    assert!(!text.contains("[DATE]"));
}

#[test]
fn test_run_properties_survive_byte_for_byte() {
    let template = Template::from_bytes(&certificate_pptx()).unwrap();
    let doc = personalize(&template, &Recipient::new(1, "Ana Lima"), "May 1, 2025");

    let bytes = doc.to_pptx_bytes().unwrap();
    let package = Package::from_bytes(&bytes).unwrap();
    let slide = package.part_text(SLIDE_PART).unwrap();

    assert!(slide.contains(&format!("<a:r>{}<a:t>Ana Lima</a:t></a:r>", NAME_RUN_PROPS)));
    assert!(slide.contains(r#"<a:rPr lang="en-US" i="1"/><a:t>Held on May 1, 2025</a:t>"#));

    // Untouched parts are carried over unchanged
    let original = Package::from_bytes(&certificate_pptx()).unwrap();
    assert_eq!(
        package.part("ppt/presentation.xml"),
        original.part("ppt/presentation.xml")
    );
}

#[test]
fn test_written_document_reads_back_as_template() {
    let template = Template::from_bytes(&certificate_pptx()).unwrap();
    let doc = personalize(&template, &Recipient::new(2, "Bo"), "June 3");
    let reread = Template::from_bytes(&doc.to_pptx_bytes().unwrap()).unwrap();
    assert_eq!(reread.placeholder_count(), 0);
    assert_eq!(reread.pages[0].plain_text(), doc.pages[0].plain_text());
}

#[test]
fn test_markup_in_names_is_escaped() {
    let template = Template::from_bytes(&certificate_pptx()).unwrap();
    let doc = personalize(&template, &Recipient::new(1, "Tom & <Jerry>"), "May 1");
    let package = Package::from_bytes(&doc.to_pptx_bytes().unwrap()).unwrap();
    let slide = package.part_text(SLIDE_PART).unwrap();
    assert!(slide.contains("<a:t>Tom &amp; &lt;Jerry&gt;</a:t>"));

    let reread = Template::from_bytes(&doc.to_pptx_bytes().unwrap()).unwrap();
    assert!(reread.runs().any(|r| r.text == "Tom & <Jerry>"));
}

#[test]
fn test_no_leakage_between_recipients() {
    let template = Template::from_bytes(&certificate_pptx()).unwrap();
    let recipients = Recipient::from_names(["Ana", "Bo", "Cy"]);
    let docs = personalize_all(
        &template,
        &recipients,
        "May 1",
        &BatchOptions::new().with_parallel(true),
    )
    .unwrap();

    for (i, doc) in docs.iter().enumerate() {
        let text = doc.plain_text();
        for (j, other) in recipients.iter().enumerate() {
            assert_eq!(text.contains(&other.name), i == j, "doc {} vs {}", i, other.name);
        }
    }

    // The template still carries its placeholders
    assert_eq!(template.placeholder_count(), 2);
}

#[test]
fn test_split_placeholder_is_reported_and_left_alone() {
    let data = build_pptx(&[split_slide()], Some((9_144_000, 6_858_000)));
    let template = Template::from_bytes(&data).unwrap();

    let split = template.split_placeholders();
    assert_eq!(split, vec![(1, "[NAME]".to_string())]);

    let doc = personalize(&template, &Recipient::new(1, "Ana"), "May 1");
    assert_eq!(doc.plain_text(), "[NAME]");
}

#[test]
fn test_multi_slide_template() {
    let data = build_pptx(&[certificate_slide(), certificate_slide()], None);
    let template = Template::from_bytes(&data).unwrap();
    assert_eq!(template.page_count(), 2);

    let doc = personalize(&template, &Recipient::new(1, "Di"), "July 4");
    assert_eq!(doc.pages.len(), 2);
    assert!(doc.pages.iter().all(|p| p.plain_text().contains("Di")));
}
