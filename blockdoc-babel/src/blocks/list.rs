//! List block: one list item per block, nested items as children.
//!
//! The `type` prop is `bulleted`, `numbered` or `todo`; todos carry a `checked` prop.
//! Formats with list containers get one container per item here; the codecs merge
//! consecutive containers of the same kind when printing.

use super::{children_without, declarations, per_format, text_and_children};
use crate::adapter::BlockAdapter;
use crate::context::{DeserializeContext, SerializeContext};
use crate::error::ConvertError;
use crate::extension::Extension;
use crate::format::TargetFormat;
use crate::formats::notion_text::{self, BLOCK, BLOCK_TYPE};
use crate::formats::plain_text::{indent, line};
use crate::markup::{Element, Node};
use blockdoc_model::Block;

pub const FLAVOUR: &str = "list";

const COMMANDS: &[&str] = &["indent-list", "dedent-list", "toggle-todo", "convert-list-type"];
const KEYMAP: &[&str] = &["Enter", "Tab", "Shift-Tab", "Mod-Enter", "Backspace"];

pub fn extensions() -> Vec<Extension> {
    vec![
        declarations(FLAVOUR, COMMANDS, KEYMAP),
        Extension::service("list-service"),
        per_format(&TargetFormat::ALL, ListAdapter::new),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    Bulleted,
    Numbered,
    Todo,
}

impl ListType {
    pub fn of(block: &Block) -> Self {
        match block.prop_str("type") {
            Some("numbered") => ListType::Numbered,
            Some("todo") => ListType::Todo,
            _ => ListType::Bulleted,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ListType::Bulleted => "bulleted",
            ListType::Numbered => "numbered",
            ListType::Todo => "todo",
        }
    }

    fn notion_class(self) -> &'static str {
        match self {
            ListType::Bulleted => "bulleted-list",
            ListType::Numbered => "numbered-list",
            ListType::Todo => "to-do-list",
        }
    }

    fn notion_block_type(self) -> &'static str {
        match self {
            ListType::Bulleted => "bulleted_list",
            ListType::Numbered => "numbered_list",
            ListType::Todo => "to_do",
        }
    }

    fn from_notion_block_type(block_type: &str) -> Option<Self> {
        match block_type {
            "bulleted_list" => Some(ListType::Bulleted),
            "numbered_list" => Some(ListType::Numbered),
            "to_do" => Some(ListType::Todo),
            _ => None,
        }
    }
}

fn item(kind: ListType, checked: bool) -> Block {
    let block = Block::new(FLAVOUR).with_prop("type", kind.name());
    if kind == ListType::Todo {
        block.with_prop("checked", checked)
    } else {
        block
    }
}

fn is_checkbox_input(element: &Element) -> bool {
    element.is("input") && element.get_attr("type") == Some("checkbox")
}

fn is_notion_checkbox(element: &Element) -> bool {
    element.has_class("checkbox")
}

pub struct ListAdapter {
    format: TargetFormat,
}

impl ListAdapter {
    pub fn new(format: TargetFormat) -> Self {
        Self { format }
    }

    fn serialize_html(
        &self,
        kind: ListType,
        block: &Block,
        ctx: &mut SerializeContext<'_>,
    ) -> Result<Vec<Node>, ConvertError> {
        let mut li = Element::new("li");
        if kind == ListType::Todo {
            let mut checkbox = Element::new("input").attr("type", "checkbox");
            if block.prop_bool("checked") {
                checkbox = checkbox.attr("checked", "");
            }
            li = li.child(checkbox);
        }
        li = li.children(ctx.block_text(block));
        li = li.children(ctx.serialize_children(block)?);

        let container = match kind {
            ListType::Bulleted => Element::new("ul"),
            ListType::Numbered => Element::new("ol"),
            ListType::Todo => Element::new("ul").attr("class", "todo-list"),
        };
        Ok(vec![container.child(li).into()])
    }

    fn serialize_notion_html(
        &self,
        kind: ListType,
        block: &Block,
        ctx: &mut SerializeContext<'_>,
    ) -> Result<Vec<Node>, ConvertError> {
        let mut container = match kind {
            ListType::Numbered => Element::new("ol")
                .attr("type", "1")
                .attr("start", ctx.next_ordinal().to_string()),
            _ => Element::new("ul"),
        }
        .attr("class", kind.notion_class());

        let text = ctx.block_text(block);
        let mut li = Element::new("li");
        if kind == ListType::Todo {
            let state = if block.prop_bool("checked") {
                "checkbox checkbox-on"
            } else {
                "checkbox checkbox-off"
            };
            li = li
                .child(Element::new("div").attr("class", state))
                .child(Element::new("span").children(text));
        } else {
            li = li.children(text);
        }
        li = li.children(ctx.serialize_children(block)?);
        container = container.child(li);
        Ok(vec![container.into()])
    }

    fn serialize_markdown(
        &self,
        kind: ListType,
        block: &Block,
        ctx: &mut SerializeContext<'_>,
    ) -> Result<Vec<Node>, ConvertError> {
        let mut list = Element::new("list").attr("ordered", (kind == ListType::Numbered).to_string());
        if kind == ListType::Numbered {
            list = list.attr("start", ctx.next_ordinal().to_string());
        }
        let mut list_item = Element::new("listItem");
        if kind == ListType::Todo {
            list_item = list_item.attr("checked", block.prop_bool("checked").to_string());
        }
        list_item = list_item
            .child(Element::new("paragraph").children(ctx.block_text(block)))
            .children(ctx.serialize_children(block)?);
        Ok(vec![list.child(list_item).into()])
    }

    fn serialize_lines(
        &self,
        kind: ListType,
        block: &Block,
        ctx: &mut SerializeContext<'_>,
    ) -> Result<Vec<Node>, ConvertError> {
        let marker = match kind {
            ListType::Bulleted => "- ".to_string(),
            ListType::Numbered => format!("{}. ", ctx.next_ordinal()),
            ListType::Todo if block.prop_bool("checked") => "[x] ".to_string(),
            ListType::Todo => "[ ] ".to_string(),
        };
        let mut inline = vec![Node::text(marker)];
        inline.extend(ctx.block_text(block));
        let mut nodes = vec![line(inline)];
        nodes.extend(indent(ctx.serialize_children(block)?));
        Ok(nodes)
    }

    fn deserialize_items(
        &self,
        kind: ListType,
        element: &Element,
        ctx: &mut DeserializeContext<'_>,
    ) -> Result<Vec<Block>, ConvertError> {
        let mut blocks = Vec::new();
        for li in element.elements().filter(|child| child.is("li")) {
            let checkbox = li
                .elements()
                .find(|e| is_checkbox_input(e) || is_notion_checkbox(e));
            let kind = if checkbox.is_some() { ListType::Todo } else { kind };
            let checked = checkbox.is_some_and(|checkbox| {
                checkbox.has_attr("checked") || checkbox.has_class("checkbox-on")
            });
            let content = children_without(li, |e| is_checkbox_input(e) || is_notion_checkbox(e));
            let (text, children) = text_and_children(&content, ctx)?;
            blocks.push(item(kind, checked).with_text(text).with_children(children));
        }
        Ok(blocks)
    }
}

impl BlockAdapter for ListAdapter {
    fn flavour(&self) -> &str {
        FLAVOUR
    }

    fn format(&self) -> TargetFormat {
        self.format
    }

    /// Plain and mixed text have no list syntax to read back.
    fn supports_import(&self) -> bool {
        !matches!(self.format, TargetFormat::PlainText | TargetFormat::MixText)
    }

    fn matches(&self, element: &Element) -> bool {
        match self.format {
            TargetFormat::Html | TargetFormat::NotionHtml => element.is("ul") || element.is("ol"),
            TargetFormat::Markdown => element.is("list"),
            TargetFormat::NotionText => {
                element.is(BLOCK)
                    && element
                        .get_attr(BLOCK_TYPE)
                        .and_then(ListType::from_notion_block_type)
                        .is_some()
            }
            TargetFormat::PlainText | TargetFormat::MixText => false,
        }
    }

    fn serialize(
        &self,
        block: &Block,
        ctx: &mut SerializeContext<'_>,
    ) -> Result<Vec<Node>, ConvertError> {
        let kind = ListType::of(block);
        match self.format {
            TargetFormat::Html => self.serialize_html(kind, block, ctx),
            TargetFormat::NotionHtml => self.serialize_notion_html(kind, block, ctx),
            TargetFormat::Markdown => self.serialize_markdown(kind, block, ctx),
            TargetFormat::NotionText => {
                let mut own = notion_text::block(kind.notion_block_type(), ctx.block_text(block));
                if kind == ListType::Todo {
                    own = own.attr("checked", block.prop_bool("checked").to_string());
                }
                let mut nodes = vec![own.into()];
                nodes.extend(ctx.serialize_children(block)?);
                Ok(nodes)
            }
            TargetFormat::PlainText | TargetFormat::MixText => {
                self.serialize_lines(kind, block, ctx)
            }
        }
    }

    fn deserialize(
        &self,
        element: &Element,
        ctx: &mut DeserializeContext<'_>,
    ) -> Result<Vec<Block>, ConvertError> {
        match self.format {
            TargetFormat::Html | TargetFormat::NotionHtml => {
                let kind = if element.is("ol") {
                    ListType::Numbered
                } else if element.has_class("todo-list") || element.has_class("to-do-list") {
                    ListType::Todo
                } else {
                    ListType::Bulleted
                };
                self.deserialize_items(kind, element, ctx)
            }
            TargetFormat::Markdown => {
                let ordered = element.get_attr("ordered") == Some("true");
                let mut blocks = Vec::new();
                for list_item in element.elements().filter(|child| child.is("listItem")) {
                    let (kind, checked) = match list_item.get_attr("checked") {
                        Some(checked) => (ListType::Todo, checked == "true"),
                        None if ordered => (ListType::Numbered, false),
                        None => (ListType::Bulleted, false),
                    };
                    let (text, children) = text_and_children(&list_item.children, ctx)?;
                    blocks.push(item(kind, checked).with_text(text).with_children(children));
                }
                Ok(blocks)
            }
            TargetFormat::NotionText => {
                let kind = element
                    .get_attr(BLOCK_TYPE)
                    .and_then(ListType::from_notion_block_type)
                    .unwrap_or(ListType::Bulleted);
                let checked = element.get_attr("checked") == Some("true");
                let text = ctx.text_from(&element.children).trimmed();
                Ok(vec![item(kind, checked).with_text(text)])
            }
            TargetFormat::PlainText | TargetFormat::MixText => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_type_defaults_to_bulleted() {
        assert_eq!(ListType::of(&Block::new(FLAVOUR)), ListType::Bulleted);
        let todo = Block::new(FLAVOUR).with_prop("type", "todo");
        assert_eq!(ListType::of(&todo), ListType::Todo);
    }

    #[test]
    fn test_only_todos_carry_checked() {
        assert!(item(ListType::Bulleted, true).prop("checked").is_none());
        assert!(item(ListType::Todo, true).prop_bool("checked"));
    }

    #[test]
    fn test_text_formats_are_export_only() {
        assert!(!ListAdapter::new(TargetFormat::PlainText).supports_import());
        assert!(ListAdapter::new(TargetFormat::Markdown).supports_import());
    }
}
