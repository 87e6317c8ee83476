//! Export then import preserves flavours and text for representable documents

use blockdoc_babel::{ConvertOptions, Converter, Diagnostics, Registry, TargetFormat};
use blockdoc_model::{keys, Block, Run, Text};
use proptest::prelude::*;

const LINKS: [&str; 2] = ["https://example.com/a", "https://example.com/b"];

/// A word with optional surrounding punctuation, so marks sit next to `(`, `,`, `'` and the like.
fn word() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["", "", "(", "'"]),
        "[a-z]{1,6}",
        prop::sample::select(vec!["", "", ")", ",", ".", "?", ":", "'"]),
    )
        .prop_map(|(prefix, core, suffix)| format!("{}{}{}", prefix, core, suffix))
}

fn word_run() -> impl Strategy<Value = Run> {
    let marks = (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        prop::bool::weighted(0.2),
        prop::option::weighted(0.2, prop::sample::select(LINKS.to_vec())),
    );
    (word(), marks).prop_map(|(word, (bold, italic, strike, code, link))| {
        let mut run = Run::plain(word);
        for (key, on) in [
            (keys::BOLD, bold),
            (keys::ITALIC, italic),
            (keys::STRIKE, strike),
            (keys::CODE, code),
        ] {
            if on {
                run = run.with(key, true);
            }
        }
        if let Some(url) = link {
            run = run.with(keys::LINK, url);
        }
        run
    })
}

/// Runs either separated by a plain space or touching their neighbour.
fn text() -> impl Strategy<Value = Text> {
    prop::collection::vec((word_run(), any::<bool>()), 1..6).prop_map(|runs| {
        let mut text = Text::new();
        for (index, (run, spaced)) in runs.into_iter().enumerate() {
            if index > 0 && spaced {
                text.push(Run::plain(" "));
            }
            text.push(run);
        }
        text
    })
}

fn paragraph() -> impl Strategy<Value = Block> {
    (prop::sample::select(vec!["text", "h1", "h2", "h3", "quote"]), text())
        .prop_map(|(kind, text)| Block::new("paragraph").with_prop("type", kind).with_text(text))
}

fn list_item() -> impl Strategy<Value = Block> {
    (prop::sample::select(vec!["bulleted", "numbered"]), text())
        .prop_map(|(kind, text)| Block::new("list").with_prop("type", kind).with_text(text))
}

fn document() -> impl Strategy<Value = Block> {
    prop::collection::vec(prop_oneof![paragraph(), list_item()], 1..8)
        .prop_map(|children| Block::new("note").with_children(children))
}

fn round_trip(doc: &Block, format: TargetFormat) -> Block {
    let registry = Registry::standard();
    let options = ConvertOptions::default();
    let converter = Converter::new(&registry, &options);
    let mut diagnostics = Diagnostics::new();
    let payload = converter.export(doc, format, &mut diagnostics).unwrap();
    let back = converter
        .import(&payload, format, Some(doc.flavour()), &mut diagnostics)
        .unwrap();
    assert!(diagnostics.is_empty(), "{}: {:?}", payload, diagnostics.warnings());
    back
}

fn summary(doc: &Block) -> Vec<(String, Option<String>, Option<Text>)> {
    doc.children()
        .iter()
        .map(|block| {
            (
                block.flavour().to_string(),
                block.prop_str("type").map(str::to_string),
                block.text().cloned(),
            )
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_html_round_trip(doc in document()) {
        prop_assert_eq!(summary(&round_trip(&doc, TargetFormat::Html)), summary(&doc));
    }

    #[test]
    fn prop_markdown_round_trip(doc in document()) {
        prop_assert_eq!(summary(&round_trip(&doc, TargetFormat::Markdown)), summary(&doc));
    }

    #[test]
    fn prop_notion_html_round_trip(doc in document()) {
        prop_assert_eq!(summary(&round_trip(&doc, TargetFormat::NotionHtml)), summary(&doc));
    }

    #[test]
    fn prop_notion_text_round_trip(doc in document()) {
        let back = round_trip(&doc, TargetFormat::NotionText);
        let flavours: Vec<&str> = back.children().iter().map(Block::flavour).collect();
        let expected: Vec<&str> = doc.children().iter().map(Block::flavour).collect();
        prop_assert_eq!(flavours, expected);
        for (back, original) in back.children().iter().zip(doc.children()) {
            prop_assert_eq!(back.text(), original.text());
        }
    }
}
