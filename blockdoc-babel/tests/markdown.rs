//! Markdown import and export through the standard registry

use blockdoc_babel::{
    ConvertError, ConvertOptions, Converter, Diagnostics, LinkStyle, Registry, TargetFormat,
    WarningKind,
};
use blockdoc_model::{keys, Block, Run, Text};

fn import(md: &str) -> (Block, Diagnostics) {
    let registry = Registry::standard();
    let options = ConvertOptions::default();
    let mut diagnostics = Diagnostics::new();
    let doc = Converter::new(&registry, &options)
        .import(md, TargetFormat::Markdown, None, &mut diagnostics)
        .expect("markdown import");
    (doc, diagnostics)
}

fn export_with(doc: &Block, options: &ConvertOptions) -> (String, Diagnostics) {
    let registry = Registry::standard();
    let mut diagnostics = Diagnostics::new();
    let md = Converter::new(&registry, options)
        .export(doc, TargetFormat::Markdown, &mut diagnostics)
        .expect("markdown export");
    (md, diagnostics)
}

fn export(doc: &Block) -> String {
    export_with(doc, &ConvertOptions::default()).0
}

fn note(children: Vec<Block>) -> Block {
    Block::new("note").with_children(children)
}

fn paragraph(text: impl Into<Text>) -> Block {
    Block::new("paragraph").with_prop("type", "text").with_text(text)
}

fn item(kind: &str, text: &str) -> Block {
    Block::new("list").with_prop("type", kind).with_text(text)
}

fn hi_bold() -> Text {
    Text::from(vec![Run::plain("Hi "), Run::plain("bold").with(keys::BOLD, true)])
}

#[test]
fn test_import_bold_paragraph() {
    let (doc, diagnostics) = import("Hi **bold**");

    assert!(diagnostics.is_empty());
    assert_eq!(doc.flavour(), "note");
    assert_eq!(doc.children().len(), 1);
    let paragraph = &doc.children()[0];
    assert_eq!(paragraph.flavour(), "paragraph");
    assert_eq!(paragraph.text(), Some(&hi_bold()));
}

#[test]
fn test_export_bold_paragraph() {
    let doc = note(vec![paragraph(hi_bold())]);
    assert_eq!(export(&doc), "Hi **bold**\n");
}

#[test]
fn test_root_flavour_hint() {
    let registry = Registry::standard();
    let options = ConvertOptions::default();
    let doc = Converter::new(&registry, &options)
        .import("x", TargetFormat::Markdown, Some("page"), &mut Diagnostics::new())
        .unwrap();
    assert_eq!(doc.flavour(), "page");
}

#[rstest::rstest]
#[case::empty("")]
#[case::blank("  ")]
fn test_blank_root_flavour_is_rejected(#[case] flavour: &str) {
    let registry = Registry::standard();
    let options = ConvertOptions::default();
    let result = Converter::new(&registry, &options).import(
        "x",
        TargetFormat::Markdown,
        Some(flavour),
        &mut Diagnostics::new(),
    );
    assert!(matches!(result, Err(ConvertError::MalformedTree(_))));
}

#[test]
fn test_import_headings_and_quotes() {
    let (doc, _) = import("# Title\n\n## Sub\n\n> quoted\n");
    let types: Vec<&str> = doc
        .children()
        .iter()
        .map(|block| block.prop_str("type").unwrap())
        .collect();
    assert_eq!(types, vec!["h1", "h2", "quote"]);
    assert_eq!(doc.children()[2].plain_text(), "quoted");
}

#[test]
fn test_export_headings_and_quotes() {
    let doc = note(vec![
        Block::new("paragraph").with_prop("type", "h2").with_text("Title"),
        Block::new("paragraph").with_prop("type", "quote").with_text("said"),
    ]);
    assert_eq!(export(&doc), "## Title\n\n> said\n");
}

#[test]
fn test_import_lists() {
    let (doc, _) = import("- a\n- b\n\n1. x\n2. y\n\n- [x] done\n- [ ] open\n");
    let kinds: Vec<(&str, String)> = doc
        .children()
        .iter()
        .map(|block| (block.prop_str("type").unwrap(), block.plain_text()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("bulleted", "a".to_string()),
            ("bulleted", "b".to_string()),
            ("numbered", "x".to_string()),
            ("numbered", "y".to_string()),
            ("todo", "done".to_string()),
            ("todo", "open".to_string()),
        ]
    );
    assert!(doc.children()[4].prop_bool("checked"));
    assert!(!doc.children()[5].prop_bool("checked"));
}

#[test]
fn test_import_nested_list() {
    let (doc, _) = import("- a\n  - b\n");
    let a = &doc.children()[0];
    assert_eq!(a.plain_text(), "a");
    assert_eq!(a.children().len(), 1);
    assert_eq!(a.children()[0].plain_text(), "b");
}

#[test]
fn test_export_consecutive_items_form_one_list() {
    let doc = note(vec![item("bulleted", "a"), item("bulleted", "b")]);
    assert_eq!(export(&doc), "- a\n- b\n");
}

#[test]
fn test_export_numbered_items_count_up() {
    let doc = note(vec![item("numbered", "one"), item("numbered", "two")]);
    assert_eq!(export(&doc), "1. one\n2. two\n");
}

#[test]
fn test_export_bullet_option() {
    let mut options = ConvertOptions::default();
    options.markdown.bullet = '*';
    let doc = note(vec![item("bulleted", "a")]);
    assert_eq!(export_with(&doc, &options).0, "* a\n");
}

#[test]
fn test_code_block_round_trip() {
    let md = "```rust\nfn main() {}\n```\n";
    let (doc, _) = import(md);
    let code = &doc.children()[0];
    assert_eq!(code.flavour(), "code");
    assert_eq!(code.prop_str("language"), Some("rust"));
    assert_eq!(code.plain_text(), "fn main() {}");
    assert_eq!(export(&doc), md);
}

#[test]
fn test_divider_and_image() {
    let (doc, _) = import("---\n\n![a cat](cat.png)\n");
    assert_eq!(doc.children()[0].flavour(), "divider");
    let image = &doc.children()[1];
    assert_eq!(image.flavour(), "image");
    assert_eq!(image.prop_str("url"), Some("cat.png"));
    assert_eq!(image.prop_str("caption"), Some("a cat"));

    let md = export(&doc);
    assert!(md.contains("![a cat](cat.png)"));
}

#[test]
fn test_inline_link() {
    let text = Text::from(vec![Run::plain("site").with(keys::LINK, "https://example.com")]);
    let doc = note(vec![paragraph(text.clone())]);
    let md = export(&doc);
    assert_eq!(md, "[site](https://example.com)\n");

    let (back, _) = import(&md);
    assert_eq!(back.children()[0].text(), Some(&text));
}

#[test]
fn test_reference_links() {
    let mut options = ConvertOptions::default();
    options.markdown.link_style = LinkStyle::Reference;
    let link = |text: &str, url: &str| Run::plain(text).with(keys::LINK, url);
    let doc = note(vec![
        paragraph(Text::from(vec![link("a", "https://a.example")])),
        paragraph(Text::from(vec![link("b", "https://b.example")])),
        paragraph(Text::from(vec![link("again", "https://a.example")])),
    ]);

    let (md, _) = export_with(&doc, &options);
    insta::assert_snapshot!(md, @r###"
    [a][1]

    [b][2]

    [again][1]

    [1]: https://a.example
    [2]: https://b.example
    "###);
}

#[test]
fn test_underline_is_dropped() {
    let text = Text::from(vec![Run::plain("under").with(keys::UNDERLINE, true)]);
    let (md, diagnostics) = export_with(&note(vec![paragraph(text)]), &ConvertOptions::default());
    assert_eq!(md, "under\n");
    assert!(diagnostics.is_empty());
}

#[test]
fn test_unsupported_block_exports_placeholder_and_children() {
    let doc = note(vec![
        Block::new("kanban").with_child(paragraph("inside")),
        paragraph("after"),
    ]);
    let (md, diagnostics) = export_with(&doc, &ConvertOptions::default());

    assert!(md.contains("<!-- unsupported block: kanban -->"));
    assert!(md.contains("inside"));
    assert!(md.contains("after"));

    let warnings: Vec<_> = diagnostics.of_kind(WarningKind::UnsupportedBlock).collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].subject, "kanban");
    assert_eq!(warnings[0].path.as_ref().map(|path| path.indices().to_vec()), Some(vec![0]));
}

#[test]
fn test_malformed_tree_aborts_export() {
    let doc = note(vec![paragraph("fine"), Block::new("")]);
    let registry = Registry::standard();
    let options = ConvertOptions::default();
    let result = Converter::new(&registry, &options).export(
        &doc,
        TargetFormat::Markdown,
        &mut Diagnostics::new(),
    );
    assert!(matches!(result, Err(ConvertError::MalformedTree(_))));
}

fn round_trip(text: Text) -> (String, Block) {
    let md = export(&note(vec![paragraph(text)]));
    let (doc, diagnostics) = import(&md);
    assert!(diagnostics.is_empty(), "{}: {:?}", md, diagnostics.warnings());
    (md, doc)
}

#[test]
fn test_mark_touching_word_uses_inline_html() {
    let text = Text::from(vec![Run::plain("(x)").with(keys::BOLD, true), Run::plain("y")]);
    let (md, doc) = round_trip(text.clone());

    assert_eq!(md, "<strong>(x)</strong>y\n");
    assert_eq!(doc.children()[0].text(), Some(&text));
}

#[test]
fn test_mark_with_room_keeps_delimiters() {
    let text = Text::from(vec![
        Run::plain("say "),
        Run::plain("(x).").with(keys::BOLD, true),
        Run::plain(" now"),
    ]);
    let (md, doc) = round_trip(text.clone());

    assert_eq!(md, "say **(x).** now\n");
    assert_eq!(doc.children()[0].text(), Some(&text));
}

#[rstest::rstest]
#[case::adjacent_marks(vec![
    Run::plain("a").with(keys::BOLD, true),
    Run::plain("b").with(keys::ITALIC, true),
])]
#[case::intraword_punctuation(vec![
    Run::plain("word"),
    Run::plain("(x)").with(keys::ITALIC, true),
    Run::plain("s"),
])]
#[case::strike_inside_word(vec![
    Run::plain("ab"),
    Run::plain(",c").with(keys::STRIKE, true),
    Run::plain("d"),
])]
#[case::nested_marks_touching(vec![
    Run::plain("x"),
    Run::plain("!y").with(keys::BOLD, true).with(keys::ITALIC, true),
    Run::plain("z").with(keys::ITALIC, true),
])]
#[case::code_in_bold(vec![
    Run::plain("a"),
    Run::plain("f()").with(keys::CODE, true).with(keys::BOLD, true),
    Run::plain("b"),
])]
fn test_marks_survive_any_neighbour(#[case] runs: Vec<Run>) {
    let text = Text::from(runs);
    let (md, doc) = round_trip(text.clone());
    assert_eq!(doc.children()[0].text(), Some(&text), "{}", md);
}
