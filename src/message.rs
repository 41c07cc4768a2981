//! Message view: the header block plus rendered body a pager shows for one
//! story or comment.
//!
//! Messages can be built by hand or from a Hacker News item as returned by
//! the Algolia items API (`/api/v1/items/{id}`), which nests every comment
//! under `children`.

use crate::error::RenderError;
use crate::pipeline::sanitize::clean_decoded;
use crate::render::Renderer;
use serde::{Deserialize, Serialize};

/// One story or comment, ready to be shown in a pager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub content_location: String,
    /// Already formatted for display, e.g. `2024-05-01 13:37`.
    pub date: String,
    pub author: String,
    pub title: String,
    /// HTML body; `None` until the thread has been loaded.
    #[serde(default)]
    pub body: Option<String>,
}

impl Message {
    /// Header lines followed by a blank line and the body lines.
    pub fn lines(&self, renderer: &Renderer) -> Vec<String> {
        let mut lines = vec![
            format!("Content-Location: {}", self.content_location),
            format!("Date: {}", self.date),
            format!("From: {}", self.author),
            format!("Subject: {}", self.title),
            String::new(),
        ];
        lines.extend(renderer.body_lines(self.body.as_deref().unwrap_or("")));
        renderer.sanitized(lines)
    }

    /// Build the message for `item`; replies inherit `parent_title`.
    pub fn from_hn_item(item: &HnItem, parent_title: &str) -> Self {
        let title = item
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(decode_title)
            .unwrap_or_else(|| format!("Re: {parent_title}"));

        let mut body = String::new();
        if let Some(url) = item.url.as_deref().filter(|u| !u.is_empty()) {
            body.push_str(&format!("<p>{url}</p>"));
        }
        if let Some(text) = item.text.as_deref() {
            body.push_str(text);
        }

        Self {
            content_location: format!("https://news.ycombinator.com/item?id={}", item.id),
            date: item.created_at.as_deref().map(format_date).unwrap_or_default(),
            author: item
                .author
                .clone()
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| "unknown".to_string()),
            title,
            body: Some(body),
        }
    }

    /// The story and every comment under it, depth-first in thread order.
    pub fn thread_from_hn_item(root: &HnItem) -> Vec<Message> {
        let mut out = Vec::new();
        collect_thread(root, "", &mut out);
        out
    }

    /// Parse an Algolia item JSON document into the thread's messages.
    pub fn thread_from_json(json: &str) -> Result<Vec<Message>, RenderError> {
        let item: HnItem = serde_json::from_str(json)?;
        Ok(Self::thread_from_hn_item(&item))
    }
}

fn collect_thread(item: &HnItem, parent_title: &str, out: &mut Vec<Message>) {
    let message = Message::from_hn_item(item, parent_title);
    // Replies to replies still read "Re: <story title>".
    let title = item
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(decode_title)
        .unwrap_or_else(|| parent_title.to_string());
    out.push(message);
    for child in &item.children {
        collect_thread(child, &title, out);
    }
}

fn decode_title(title: &str) -> String {
    let decoded = html_escape::decode_html_entities(title);
    clean_decoded(&decoded).into_owned()
}

/// Turn an ISO-8601 timestamp (`2024-05-01T13:37:00.000Z`) into
/// `2024-05-01 13:37`. Anything else is returned unchanged.
pub fn format_date(iso: &str) -> String {
    match (iso.get(..10), iso.get(10..11), iso.get(11..16)) {
        (Some(day), Some("T"), Some(time)) => format!("{day} {time}"),
        _ => iso.to_string(),
    }
}

/// A Hacker News item from the Algolia items API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HnItem {
    pub id: u64,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub children: Vec<HnItem>,
}
