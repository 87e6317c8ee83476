//! Laws of the run sequence and the block tree

use blockdoc_model::{keys, Block, Run, Text};
use proptest::prelude::*;

fn run() -> impl Strategy<Value = Run> {
    ("[a-c ]{0,4}", any::<bool>(), any::<bool>(), prop::option::of("[xy]")).prop_map(
        |(text, bold, italic, link)| {
            let mut run = Run::plain(text).with(keys::BOLD, bold).with(keys::ITALIC, italic);
            if let Some(link) = link {
                run = run.with(keys::LINK, link);
            }
            run
        },
    )
}

fn tree() -> impl Strategy<Value = Block> {
    let leaf = "[a-z]{1,6}".prop_map(|flavour| Block::new(flavour));
    leaf.prop_recursive(4, 48, 5, |inner| {
        ("[a-z]{1,6}", prop::collection::vec(inner, 0..5))
            .prop_map(|(flavour, children)| Block::new(flavour).with_children(children))
    })
}

fn size(block: &Block) -> usize {
    1 + block.children().iter().map(size).sum::<usize>()
}

proptest! {
    #[test]
    fn prop_push_normalizes(runs in prop::collection::vec(run(), 0..12)) {
        let expected: String = runs.iter().map(|run| run.text.as_str()).collect();
        let mut text = Text::new();
        for run in runs {
            text.push(run);
        }

        prop_assert_eq!(text.plain_text(), expected);
        prop_assert!(text.runs().iter().all(|run| !run.text.is_empty()));
        for pair in text.runs().windows(2) {
            prop_assert_ne!(&pair[0].attributes, &pair[1].attributes);
        }
    }

    #[test]
    fn prop_walk_visits_every_block(doc in tree()) {
        prop_assert_eq!(doc.count(), size(&doc));
        let paths: Vec<_> = doc.walk().map(|(path, _)| path).collect();
        for path in &paths {
            prop_assert!(doc.get(path).is_some());
        }
        prop_assert!(doc.validate().is_ok());
    }

    #[test]
    fn prop_json_preserves_tree(doc in tree()) {
        let json = doc.to_json_pretty().unwrap();
        prop_assert_eq!(Block::from_json(&json).unwrap(), doc);
    }
}
