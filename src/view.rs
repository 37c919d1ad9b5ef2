//! View description of a session
//!
//! `render` is pure: the browser page is drawn entirely from its output.

use crate::session::{ApiValidity, Role, Session, Turn};
use chrono::{DateTime, Utc};
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};
use serde::Serialize;

const TITLE: &str = "Local AI Assistant";
const SUBTITLE: &str = "Your personal AI assistant powered by Google Gemini";
const CONFIG_WARNING: &str = "Please configure your Gemini API key to start chatting";
const CONFIG_HINT: &str = "Get your free Gemini API key at: https://aistudio.google.com/app/apikey";
const FOOTER: &str = "Local AI Assistant - Powered by Gemini | Private & Secure";

/// Everything the page needs to draw one session
#[derive(Debug, Clone, Serialize)]
pub struct View {
    pub session_id: String,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub api_status: ApiValidity,
    pub can_chat: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<ConfigWarning>,
    pub turns: Vec<TurnView>,
    pub message_count: usize,
    pub started_at: DateTime<Utc>,
    pub footer: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigWarning {
    pub message: &'static str,
    pub hint: &'static str,
}

/// One turn as displayed, with its markdown rendered to HTML
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnView {
    pub role: Role,
    pub content: String,
    pub html: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Turn> for TurnView {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
            html: markdown_to_html(&turn.content),
            created_at: turn.created_at,
        }
    }
}

/// Render markdown to HTML.
///
/// Raw HTML in the source is emitted as escaped text, and `javascript:`
/// link targets are dropped.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let events = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    let scheme = url.trim_start().to_ascii_lowercase();
    if scheme.starts_with("javascript:") || scheme.starts_with("data:") {
        CowStr::Borrowed("")
    } else {
        url
    }
}

pub fn render(session: &Session) -> View {
    let api_status = session.api_validity();
    let can_chat = api_status == ApiValidity::Valid;

    View {
        session_id: session.id().to_string(),
        title: TITLE,
        subtitle: SUBTITLE,
        api_status,
        can_chat,
        warning: (api_status == ApiValidity::Invalid).then_some(ConfigWarning {
            message: CONFIG_WARNING,
            hint: CONFIG_HINT,
        }),
        turns: session.history().iter().map(TurnView::from).collect(),
        message_count: session.len(),
        started_at: session.started_at(),
        footer: FOOTER,
    }
}
