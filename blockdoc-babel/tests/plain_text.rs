//! Plain text and mixed text

use blockdoc_babel::{ConvertOptions, Converter, Diagnostics, Registry, TargetFormat, WarningKind};
use blockdoc_model::{keys, Block, Run, Text};

fn export_with(doc: &Block, format: TargetFormat, options: &ConvertOptions) -> (String, Diagnostics) {
    let registry = Registry::standard();
    let mut diagnostics = Diagnostics::new();
    let text = Converter::new(&registry, options)
        .export(doc, format, &mut diagnostics)
        .expect("export");
    (text, diagnostics)
}

fn export(doc: &Block, format: TargetFormat) -> String {
    export_with(doc, format, &ConvertOptions::default()).0
}

fn import(source: &str, format: TargetFormat) -> Block {
    let registry = Registry::standard();
    let options = ConvertOptions::default();
    Converter::new(&registry, &options)
        .import(source, format, None, &mut Diagnostics::new())
        .expect("import")
}

fn item(kind: &str, text: &str) -> Block {
    Block::new("list").with_prop("type", kind).with_text(text)
}

fn linked(text: &str, url: &str) -> Text {
    Text::from(vec![Run::plain(text).with(keys::LINK, url)])
}

fn kitchen_sink() -> Block {
    Block::new("note").with_children(vec![
        Block::new("paragraph").with_prop("type", "h1").with_text("Title"),
        item("bulleted", "a").with_child(item("bulleted", "b")),
        item("numbered", "one"),
        item("numbered", "two"),
        item("todo", "done").with_prop("checked", true),
        Block::new("code").with_text("fn x() {}\nx();"),
        Block::new("divider"),
        Block::new("image").with_prop("url", "cat.png").with_prop("caption", "A cat"),
        Block::new("paragraph").with_text(linked("site", "https://example.com")),
    ])
}

#[test]
fn test_plain_text_export() {
    let (text, diagnostics) = export_with(&kitchen_sink(), TargetFormat::PlainText, &ConvertOptions::default());
    assert!(diagnostics.is_empty());
    insta::assert_snapshot!(text, @r###"
    Title
    - a
      - b
    1. one
    2. two
    [x] done
    fn x() {}
    x();
    ---
    A cat
    site: https://example.com
    "###);
}

#[test]
fn test_plain_text_bare_link_is_not_repeated() {
    let doc = Block::new("note")
        .with_child(Block::new("paragraph").with_text(linked("https://example.com", "https://example.com")));
    assert_eq!(export(&doc, TargetFormat::PlainText), "https://example.com");
}

#[test]
fn test_plain_text_import_one_paragraph_per_line() {
    let doc = import("first line\n\n  second line\nthird", TargetFormat::PlainText);
    let texts: Vec<String> = doc.children().iter().map(Block::plain_text).collect();
    assert_eq!(texts, vec!["first line", "second line", "third"]);
    assert!(doc.children().iter().all(|block| block.flavour() == "paragraph"));
}

#[test]
fn test_plain_text_placeholder_is_configurable() {
    let doc = Block::new("note").with_child(Block::new("kanban"));
    let (text, diagnostics) = export_with(&doc, TargetFormat::PlainText, &ConvertOptions::default());
    assert_eq!(text, "[unsupported block: kanban]");
    assert_eq!(diagnostics.of_kind(WarningKind::UnsupportedBlock).count(), 1);

    let mut options = ConvertOptions::default();
    options.plain_text.placeholder = "<{flavour}>".to_string();
    let (text, _) = export_with(&doc, TargetFormat::PlainText, &options);
    assert_eq!(text, "<kanban>");
}

#[test]
fn test_mix_text_export_keeps_links() {
    let doc = Block::new("note").with_children(vec![
        Block::new("paragraph").with_text(Text::from(vec![
            Run::plain("see "),
            Run::plain("docs").with(keys::LINK, "https://example.com/docs"),
        ])),
        item("bulleted", "item"),
    ]);
    assert_eq!(
        export(&doc, TargetFormat::MixText),
        "see [docs](https://example.com/docs)\n- item"
    );
}

#[test]
fn test_mix_text_import_recognizes_links() {
    let doc = import(
        "read [the docs](https://example.com/docs) or https://example.org now",
        TargetFormat::MixText,
    );
    let expected = Text::from(vec![
        Run::plain("read "),
        Run::plain("the docs").with(keys::LINK, "https://example.com/docs"),
        Run::plain(" or "),
        Run::plain("https://example.org").with(keys::LINK, "https://example.org"),
        Run::plain(" now"),
    ]);
    assert_eq!(doc.children()[0].text(), Some(&expected));
}

#[test]
fn test_mix_text_has_no_divider() {
    let doc = Block::new("note").with_child(Block::new("divider"));
    let (text, diagnostics) = export_with(&doc, TargetFormat::MixText, &ConvertOptions::default());
    assert_eq!(text, "[unsupported block: divider]");
    assert_eq!(diagnostics.len(), 1);
}
