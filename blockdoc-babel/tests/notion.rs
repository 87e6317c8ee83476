//! Notion HTML and Notion text (clipboard JSON)

use blockdoc_babel::{ConvertOptions, Converter, Diagnostics, Registry, TargetFormat, WarningKind};
use blockdoc_model::{keys, Block, Run, Text};

fn import(source: &str, format: TargetFormat) -> (Block, Diagnostics) {
    let registry = Registry::standard();
    let options = ConvertOptions::default();
    let mut diagnostics = Diagnostics::new();
    let doc = Converter::new(&registry, &options)
        .import(source, format, None, &mut diagnostics)
        .expect("import");
    (doc, diagnostics)
}

fn export(doc: &Block, format: TargetFormat) -> (String, Diagnostics) {
    let registry = Registry::standard();
    let options = ConvertOptions::default();
    let mut diagnostics = Diagnostics::new();
    let payload = Converter::new(&registry, &options)
        .export(doc, format, &mut diagnostics)
        .expect("export");
    (payload, diagnostics)
}

fn note(children: Vec<Block>) -> Block {
    Block::new("note").with_children(children)
}

const NOTION_PAGE: &str = r#"<html><head><title>Plan</title></head><body>
<article id="1" class="page sans"><header><h1 class="page-title">Plan</h1></header>
<div class="page-body">
<p id="2">Ship <mark class="highlight-red">soon</mark> and <span style="border-bottom:0.05em solid">check</span></p>
<ul id="3" class="to-do-list"><li><div class="checkbox checkbox-on"></div> <span class="to-do-children-checked">Done</span></li></ul>
<ul id="4" class="to-do-list"><li><div class="checkbox checkbox-off"></div> <span class="to-do-children-unchecked">Open</span></li></ul>
<ol type="1" id="5" class="numbered-list" start="1"><li>First</li></ol>
<figure id="6"><div class="source"><a href="https://github.com/toeverything/blocksuite/pull/42">Fix paste</a></div></figure>
<figure id="7" class="image"><a href="cat.png"><img src="cat.png"></a><figcaption>Cat</figcaption></figure>
</div></article></body></html>"#;

#[test]
fn test_import_notion_page() {
    let (doc, diagnostics) = import(NOTION_PAGE, TargetFormat::NotionHtml);
    assert!(diagnostics.is_empty(), "{:?}", diagnostics.warnings());

    let flavours: Vec<&str> = doc.children().iter().map(Block::flavour).collect();
    assert_eq!(
        flavours,
        vec!["paragraph", "paragraph", "list", "list", "list", "embed-github", "image"]
    );

    let title = &doc.children()[0];
    assert_eq!(title.prop_str("type"), Some("h1"));
    assert_eq!(title.plain_text(), "Plan");

    let expected = Text::from(vec![
        Run::plain("Ship "),
        Run::plain("soon").with(keys::COLOR, "red"),
        Run::plain(" and "),
        Run::plain("check").with(keys::UNDERLINE, true),
    ]);
    assert_eq!(doc.children()[1].text(), Some(&expected));

    let done = &doc.children()[2];
    assert_eq!(done.prop_str("type"), Some("todo"));
    assert!(done.prop_bool("checked"));
    assert_eq!(done.plain_text(), "Done");
    assert!(!doc.children()[3].prop_bool("checked"));
    assert_eq!(doc.children()[4].prop_str("type"), Some("numbered"));

    let embed = &doc.children()[5];
    assert_eq!(embed.prop_str("owner"), Some("toeverything"));
    assert_eq!(embed.prop_str("repo"), Some("blocksuite"));
    assert_eq!(embed.prop_str("githubType"), Some("pr"));
    assert_eq!(embed.prop_str("githubId"), Some("42"));
    assert_eq!(embed.prop_str("title"), Some("Fix paste"));

    assert_eq!(doc.children()[6].prop_str("caption"), Some("Cat"));
}

#[test]
fn test_export_notion_html() {
    let doc = note(vec![
        Block::new("paragraph").with_prop("type", "h5").with_text("Deep"),
        Block::new("list")
            .with_prop("type", "todo")
            .with_prop("checked", true)
            .with_text("Done"),
        Block::new("list").with_prop("type", "numbered").with_text("one"),
        Block::new("list").with_prop("type", "numbered").with_text("two"),
        Block::new("paragraph").with_text(Text::from(vec![
            Run::plain("hot").with(keys::COLOR, "red").with(keys::BOLD, true)
        ])),
    ]);
    let (html, diagnostics) = export(&doc, TargetFormat::NotionHtml);
    assert!(diagnostics.is_empty());

    insta::assert_snapshot!(html, @r###"
    <h3>Deep</h3>
    <ul class="to-do-list"><li><div class="checkbox checkbox-on"></div><span>Done</span></li></ul>
    <ol class="numbered-list" start="1" type="1"><li>one</li></ol>
    <ol class="numbered-list" start="2" type="1"><li>two</li></ol>
    <p><mark class="highlight-red"><strong>hot</strong></mark></p>
    "###);
}

#[test]
fn test_embed_github_is_not_exported_to_notion_html() {
    let doc = note(vec![Block::new("embed-github").with_prop("url", "https://github.com/a/b/issues/1")]);
    let (html, diagnostics) = export(&doc, TargetFormat::NotionHtml);
    assert!(html.contains("unsupported-block"));
    assert_eq!(diagnostics.of_kind(WarningKind::UnsupportedBlock).count(), 1);
}

#[test]
fn test_import_notion_text() {
    let (doc, diagnostics) = import(
        r#"{"blockType":"text","editing":[["Hi ",[]],["bold",[["b"]]]]}"#,
        TargetFormat::NotionText,
    );
    assert!(diagnostics.is_empty());
    let expected = Text::from(vec![Run::plain("Hi "), Run::plain("bold").with(keys::BOLD, true)]);
    assert_eq!(doc.children()[0].text(), Some(&expected));
}

#[test]
fn test_import_notion_text_array() {
    let (doc, _) = import(
        r#"[
            {"blockType":"header","editing":[["Title",[]]]},
            {"blockType":"to_do","checked":true,"editing":[["Done",[]]]},
            {"blockType":"code","language":"rust","editing":[["let x = 1;",[]]]},
            {"blockType":"divider","editing":[]},
            {"blockType":"text","editing":[["link",[["a","https://example.com"],["h","blue"]]]]}
        ]"#,
        TargetFormat::NotionText,
    );
    let flavours: Vec<&str> = doc.children().iter().map(Block::flavour).collect();
    assert_eq!(flavours, vec!["paragraph", "list", "code", "divider", "paragraph"]);
    assert_eq!(doc.children()[0].prop_str("type"), Some("h1"));
    assert!(doc.children()[1].prop_bool("checked"));
    assert_eq!(doc.children()[2].prop_str("language"), Some("rust"));

    let run = &doc.children()[4].text().unwrap().runs()[0];
    assert_eq!(run.attributes.text(keys::LINK), Some("https://example.com"));
    assert_eq!(run.attributes.text(keys::COLOR), Some("blue"));
}

#[test]
fn test_export_notion_text() {
    let single = note(vec![Block::new("paragraph").with_text(Text::from(vec![
        Run::plain("Hi "),
        Run::plain("bold").with(keys::BOLD, true),
    ]))]);
    let (json, _) = export(&single, TargetFormat::NotionText);
    assert_eq!(
        json,
        r#"{"blockType":"text","editing":[["Hi ",[]],["bold",[["b"]]]]}"#
    );

    let many = note(vec![
        Block::new("code").with_prop("language", "rust").with_text("x()"),
        Block::new("divider"),
    ]);
    let (json, _) = export(&many, TargetFormat::NotionText);
    assert_eq!(
        json,
        r#"[{"blockType":"code","editing":[["x()",[]]],"language":"rust"},{"blockType":"divider","editing":[]}]"#
    );
}

#[test]
fn test_notion_text_marks_round_trip() {
    let text = Text::from(vec![Run::plain("x")
        .with(keys::LINK, "https://example.com")
        .with(keys::COLOR, "red")
        .with(keys::ITALIC, true)]);
    let doc = note(vec![Block::new("paragraph").with_prop("type", "text").with_text(text.clone())]);

    let (json, _) = export(&doc, TargetFormat::NotionText);
    let (back, _) = import(&json, TargetFormat::NotionText);
    assert_eq!(back.children()[0].text(), Some(&text));
}

#[test]
fn test_invalid_notion_text_degrades_to_paragraph() {
    let (doc, diagnostics) = import("{not json", TargetFormat::NotionText);
    assert_eq!(doc.children().len(), 1);
    assert_eq!(doc.children()[0].plain_text(), "{not json");
    assert_eq!(diagnostics.of_kind(WarningKind::UnparseableFragment).count(), 1);
}
