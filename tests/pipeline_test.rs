//! Integration tests for the classification pipeline properties.

use outliner::{
    classify, extract_outline_with_config, Config, FactorWeights, FragmentStream, HeadingLevel,
    JsonFormat, TextFragment,
};

/// Builds fragments incrementally with automatic order indices.
struct DocBuilder {
    fragments: Vec<TextFragment>,
    pages: u32,
}

impl DocBuilder {
    fn new(pages: u32) -> Self {
        Self {
            fragments: Vec::new(),
            pages,
        }
    }

    fn add(&mut self, text: &str, page: u32, y: f32, size: f32, family: &str) -> &mut Self {
        let index = self.fragments.len() as u32;
        self.fragments
            .push(TextFragment::new(text, page, 72.0, y, size, family, index));
        self
    }

    fn body(&mut self, page: u32, y: f32) -> &mut Self {
        self.add(
            "ordinary running body text with enough characters to dominate the histogram \
             of the page and keep the baseline size honest",
            page,
            y,
            11.0,
            "Times",
        )
    }

    fn build(&self) -> FragmentStream {
        FragmentStream::new(self.fragments.clone(), self.pages)
    }
}

fn heading_depths(stream: &FragmentStream) -> Vec<(u32, u8)> {
    classify(stream, &Config::default())
        .outline
        .iter()
        .map(|h| (h.page, h.level.depth()))
        .collect()
}

#[test]
fn headings_stay_in_document_order() {
    let mut doc = DocBuilder::new(3);
    // A weak heading early, a strong one late: score order and reading
    // order disagree.
    doc.add("Appendix Notes", 0, 100.0, 14.0, "Times-Italic");
    doc.body(0, 300.0);
    doc.add("MAJOR FINDINGS", 1, 50.0, 24.0, "Helvetica-Bold");
    doc.body(1, 300.0);
    doc.add("Minor Remarks", 2, 200.0, 14.0, "Times-Italic");
    doc.body(2, 300.0);

    let outline = classify(&doc.build(), &Config::default());
    let pages: Vec<u32> = outline.outline.iter().map(|h| h.page).collect();
    let mut sorted = pages.clone();
    sorted.sort();
    assert_eq!(pages, sorted, "headings must follow page order");
}

#[test]
fn level_depth_never_jumps_by_more_than_one() {
    let mut doc = DocBuilder::new(4);
    // The document opens with what scores as a deep heading.
    doc.add("fine detail heading", 0, 400.0, 13.0, "Times");
    doc.body(0, 500.0);
    doc.add("1. Chapter One", 1, 50.0, 24.0, "Helvetica-Bold");
    doc.body(1, 300.0);
    doc.add("1.1 Section", 2, 100.0, 17.0, "Helvetica-Bold");
    doc.add("detail again", 2, 400.0, 13.0, "Times");
    doc.body(2, 500.0);
    doc.add("2. Chapter Two", 3, 50.0, 24.0, "Helvetica-Bold");
    doc.body(3, 300.0);

    let depths = heading_depths(&doc.build());
    let mut prev = 0u8;
    for (page, depth) in depths {
        assert!(
            depth <= prev + 1,
            "page {page}: depth {depth} follows {prev}"
        );
        prev = depth;
    }
}

#[test]
fn classification_is_idempotent() {
    let mut doc = DocBuilder::new(2);
    doc.add("Report Title", 0, 40.0, 28.0, "Helvetica-Bold");
    doc.add("1. Overview", 0, 140.0, 18.0, "Helvetica-Bold");
    doc.body(0, 200.0);
    doc.add("1.1 Details", 1, 100.0, 14.0, "Times-Italic");
    doc.body(1, 200.0);
    let stream = doc.build();
    let config = Config::default();

    let first = outliner::render::to_json(&classify(&stream, &config), JsonFormat::Compact).unwrap();
    let second =
        outliner::render::to_json(&classify(&stream, &config), JsonFormat::Compact).unwrap();
    assert_eq!(first, second);
}

#[test]
fn invalid_weights_rejected_at_load_time() {
    let bad = Config::default().with_weights(FactorWeights {
        size: 0.3,
        typography: 0.3,
        position: 0.3,
        pattern: 0.3,
        context: 0.3,
        length: 0.3,
    });
    assert!(bad.validate().is_err());
    assert!(extract_outline_with_config(&FragmentStream::default(), &bad).is_err());
}

#[test]
fn empty_document_yields_empty_artifact() {
    let outline = classify(&FragmentStream::default(), &Config::default());
    let json = outliner::render::to_json(&outline, JsonFormat::Compact).unwrap();
    assert_eq!(json, r#"{"title":"","outline":[]}"#);
}

#[test]
fn worked_example_matches_expected_artifact() {
    let fragments = vec![
        TextFragment::new("Annual Report 2024", 0, 72.0, 60.0, 28.0, "Helvetica-Bold", 0),
        TextFragment::new("1. Introduction", 0, 72.0, 140.0, 18.0, "Helvetica-Bold", 1),
        TextFragment::new(
            "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor \
             incididunt ut labore et dolore magna aliqua.",
            0,
            72.0,
            170.0,
            11.0,
            "Times",
            2,
        ),
        TextFragment::new("1.1 Background", 0, 72.0, 260.0, 14.0, "Times-Italic", 3),
    ];
    let outline = classify(&FragmentStream::new(fragments, 1), &Config::default());

    assert_eq!(outline.title, "Annual Report 2024");
    let entries: Vec<(HeadingLevel, &str, u32)> = outline
        .outline
        .iter()
        .map(|h| (h.level, h.text.as_str(), h.page))
        .collect();
    assert_eq!(
        entries,
        vec![
            (HeadingLevel::H1, "1. Introduction", 1),
            (HeadingLevel::H2, "1.1 Background", 1),
        ]
    );
}

#[test]
fn truncation_keeps_strongest_candidates_in_document_order() {
    let mut doc = DocBuilder::new(6);
    doc.add("The Big Title", 0, 30.0, 30.0, "Helvetica-Bold");
    doc.body(0, 400.0);
    // Alternate strong (22pt bold) and weak (13pt) headings across pages.
    for page in 1..6 {
        let y = 60.0;
        doc.add(
            &format!("{page}. Strong Chapter {page}"),
            page,
            y,
            22.0,
            "Helvetica-Bold",
        );
        doc.add(&format!("aside note {page}"), page, 300.0, 13.0, "Times");
        doc.body(page, 500.0);
    }

    let config = Config::default().with_max_headings(4);
    let outline = classify(&doc.build(), &config);

    assert_eq!(outline.outline.len(), 4);
    // The strongest candidates survive...
    for heading in &outline.outline {
        assert!(
            heading.text.contains("Strong Chapter"),
            "weak heading survived truncation: {}",
            heading.text
        );
    }
    // ...and come back out in document order.
    let pages: Vec<u32> = outline.outline.iter().map(|h| h.page).collect();
    let mut sorted = pages.clone();
    sorted.sort();
    assert_eq!(pages, sorted);
}

#[test]
fn page_furniture_never_promoted() {
    let mut doc = DocBuilder::new(5);
    // Identical header text at the same band on 4 of 5 pages (80%).
    for page in 0..4 {
        doc.add("CONFIDENTIAL DRAFT", page, 20.0, 14.0, "Helvetica-Bold");
    }
    doc.add("Front Page Banner", 0, 60.0, 24.0, "Helvetica-Bold");
    doc.add("1. Real Heading", 0, 150.0, 18.0, "Helvetica-Bold");
    for page in 0..5 {
        doc.body(page, 400.0);
    }

    let outline = classify(&doc.build(), &Config::default());
    assert!(
        outline
            .outline
            .iter()
            .all(|h| h.text != "CONFIDENTIAL DRAFT"),
        "page furniture leaked into the outline"
    );
    assert!(outline.outline.iter().any(|h| h.text == "1. Real Heading"));
}

#[test]
fn title_fragment_not_repeated_as_heading() {
    let mut doc = DocBuilder::new(1);
    doc.add("Solo Title", 0, 40.0, 26.0, "Helvetica-Bold");
    doc.add("1. Section", 0, 150.0, 16.0, "Helvetica-Bold");
    doc.body(0, 300.0);

    let outline = classify(&doc.build(), &Config::default());
    assert_eq!(outline.title, "Solo Title");
    assert!(outline.outline.iter().all(|h| h.text != "Solo Title"));
}

#[test]
fn single_page_document_with_only_headings() {
    // Degenerate input: no body text at all. The pipeline must still
    // produce output without panicking.
    let mut doc = DocBuilder::new(1);
    doc.add("Everything Is Large", 0, 40.0, 20.0, "Helvetica-Bold");
    doc.add("So Is This", 0, 120.0, 20.0, "Helvetica-Bold");

    let outline = classify(&doc.build(), &Config::default());
    // Both fragments share the modal size, so neither outranks body text;
    // the title still falls back to the largest first-page fragment.
    assert_eq!(outline.title, "Everything Is Large");
}
