use serde_json::{json, Value};

use super::{ChildrenPage, RemoteBlock, RemoteKind};
use crate::render::Block;

/// Notion rejects rich-text objects longer than this many characters.
pub const MAX_TEXT_CHARS: usize = 2000;

pub fn rich_text(text: &str) -> Value {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return json!([]);
    }
    let parts: Vec<Value> = chars
        .chunks(MAX_TEXT_CHARS)
        .map(|part| {
            let content: String = part.iter().collect();
            json!({ "type": "text", "text": { "content": content } })
        })
        .collect();
    Value::Array(parts)
}

fn text_block(kind: &str, text: &str) -> Value {
    let mut block = json!({ "object": "block", "type": kind });
    block[kind] = json!({ "rich_text": rich_text(text) });
    block
}

pub fn encode_block(block: &Block) -> Value {
    match block {
        Block::HeadingMajor(t) => text_block("heading_2", t),
        Block::HeadingMinor(t) => text_block("heading_3", t),
        Block::Paragraph(t) => text_block("paragraph", t),
        Block::Bullet(t) => text_block("bulleted_list_item", t),
        Block::Embed { url } => json!({
            "object": "block",
            "type": "video",
            "video": { "type": "external", "external": { "url": url } },
        }),
    }
}

pub fn encode_blocks(blocks: &[Block]) -> Value {
    Value::Array(blocks.iter().map(encode_block).collect())
}

pub fn create_page_body(parent_id: &str, title: &str, icon: Option<&str>, blocks: &[Block]) -> Value {
    let mut body = json!({
        "parent": { "page_id": parent_id },
        "properties": {
            "title": { "title": rich_text(title) }
        },
        "children": encode_blocks(blocks),
    });
    if let Some(emoji) = icon {
        body["icon"] = json!({ "type": "emoji", "emoji": emoji });
    }
    body
}

fn decode_kind(kind: &str) -> RemoteKind {
    match kind {
        "heading_1" => RemoteKind::Heading1,
        "heading_2" => RemoteKind::Heading2,
        "heading_3" => RemoteKind::Heading3,
        "paragraph" => RemoteKind::Paragraph,
        "bulleted_list_item" => RemoteKind::Bulleted,
        "numbered_list_item" => RemoteKind::Numbered,
        "video" | "embed" => RemoteKind::Embed,
        "child_page" => RemoteKind::ChildPage,
        other => RemoteKind::Other(other.to_string()),
    }
}

fn plain_text(rich: &Value) -> String {
    rich.as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| {
                    p.get("plain_text")
                        .or_else(|| p.pointer("/text/content"))
                        .and_then(Value::as_str)
                })
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Decode one block object. Returns `None` when it has no id or type.
pub fn decode_block(value: &Value) -> Option<RemoteBlock> {
    let id = value.get("id")?.as_str()?.to_string();
    let kind_name = value.get("type")?.as_str()?;
    let payload = value.get(kind_name);
    let text = match kind_name {
        "child_page" => payload
            .and_then(|p| p.get("title"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => payload
            .and_then(|p| p.get("rich_text"))
            .map(plain_text)
            .unwrap_or_default(),
    };
    Some(RemoteBlock {
        id,
        kind: decode_kind(kind_name),
        text,
        has_children: value
            .get("has_children")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    })
}

pub fn decode_children(value: &Value) -> Option<ChildrenPage> {
    let results = value.get("results")?.as_array()?;
    Some(ChildrenPage {
        items: results.iter().filter_map(decode_block).collect(),
        has_more: value.get("has_more").and_then(Value::as_bool).unwrap_or(false),
        next_cursor: value
            .get("next_cursor")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullet_encoding() {
        let v = encode_block(&Block::Bullet("Squats x10".into()));
        assert_eq!(v["type"], "bulleted_list_item");
        assert_eq!(
            v["bulleted_list_item"]["rich_text"][0]["text"]["content"],
            "Squats x10"
        );
    }

    #[test]
    fn headings_map_to_levels_two_and_three() {
        assert_eq!(encode_block(&Block::HeadingMajor("S".into()))["type"], "heading_2");
        assert_eq!(encode_block(&Block::HeadingMinor("U".into()))["type"], "heading_3");
    }

    #[test]
    fn embed_is_external_video() {
        let v = encode_block(&Block::Embed {
            url: "https://www.youtube.com/watch?v=abc12345678".into(),
        });
        assert_eq!(v["type"], "video");
        assert_eq!(
            v["video"]["external"]["url"],
            "https://www.youtube.com/watch?v=abc12345678"
        );
    }

    #[test]
    fn long_text_split_on_char_boundary() {
        let text = "é".repeat(MAX_TEXT_CHARS + 5);
        let rt = rich_text(&text);
        let parts = rt.as_array().unwrap();
        assert_eq!(parts.len(), 2);
        let second = parts[1]["text"]["content"].as_str().unwrap();
        assert_eq!(second.chars().count(), 5);
    }

    #[test]
    fn page_body_has_icon_only_when_given() {
        let with = create_page_body("p", "Week 3", Some("🏋️"), &[]);
        assert_eq!(with["icon"]["emoji"], "🏋️");
        assert_eq!(with["properties"]["title"]["title"][0]["text"]["content"], "Week 3");
        let without = create_page_body("p", "Week 3", None, &[]);
        assert!(without.get("icon").is_none());
    }

    #[test]
    fn decode_listing() {
        let body = json!({
            "results": [
                {
                    "id": "b1", "type": "heading_3", "has_children": false,
                    "heading_3": { "rich_text": [
                        { "plain_text": "Lower ", "text": { "content": "Lower " } },
                        { "plain_text": "Body:" }
                    ]}
                },
                { "id": "b2", "type": "child_page", "has_children": true,
                  "child_page": { "title": "Session 2" } },
                { "id": "b3", "type": "table", "has_children": true, "table": {} },
                { "type": "paragraph" }
            ],
            "has_more": true,
            "next_cursor": "cur-2"
        });
        let page = decode_children(&body).unwrap();
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.items[0].kind, RemoteKind::Heading3);
        assert_eq!(page.items[0].text, "Lower Body:");
        assert_eq!(page.items[1].kind, RemoteKind::ChildPage);
        assert_eq!(page.items[1].text, "Session 2");
        assert_eq!(page.items[2].kind, RemoteKind::Other("table".into()));
        assert!(page.has_more);
        assert_eq!(page.next_cursor.as_deref(), Some("cur-2"));
    }
}
