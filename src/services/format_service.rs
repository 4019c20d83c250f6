use std::sync::LazyLock;

use regex::Regex;

use crate::domain::FeedEntry;

const BANNER_TEXT: &str = "「彭博速递」";
const EMPTY_PLACEHOLDER: &str = "暂无可用的彭博资讯";
const LINK_TEXT: &str = "原文链接";

const TITLE_COLOR: &str = "#2E4057";
const TIME_COLOR: &str = "#FFB400";
const TIME_BG_COLOR: &str = "transparent";
const SERIAL_COLOR: &str = "#1E88E5";
const NEWS_TITLE_COLOR: &str = "#333333";
const LINK_TEXT_COLOR: &str = "#143060";

static TIME_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2}:\d{2})</time>").expect("time marker pattern is valid"));

/// Renders feed entries into the HTML digest body.
pub struct ContentFormatter {
    max_entries: usize,
}

impl ContentFormatter {
    pub fn new(max_entries: usize) -> Self {
        Self { max_entries }
    }

    /// Render at most `max_entries` rows, numbered from 1 in feed order, under a banner.
    pub fn format(&self, entries: &[FeedEntry]) -> String {
        if entries.is_empty() {
            return EMPTY_PLACEHOLDER.to_string();
        }

        let rows: String = entries
            .iter()
            .take(self.max_entries)
            .enumerate()
            .map(|(i, entry)| render_row(i + 1, entry))
            .collect();

        format!("{}{}", banner(), rows)
    }

    /// Wrap a fragment in the full HTML document sent as the mail body.
    pub fn document(fragment: &str) -> String {
        format!(
            r#"
    <!DOCTYPE html>
    <html lang="zh-CN">
    <head>
        <meta charset="utf-8">
        <style>
            body {{ font-family: 微软雅黑, Arial, sans-serif; line-height: 2.2; font-size: 15px; }}
            p {{ margin: 0; padding: 0; }}
        </style>
    </head>
    <body>{}</body>
    </html>
    "#,
            fragment
        )
    }
}

fn banner() -> String {
    format!(
        "<p><strong><span style='color:{};'>{}</span></strong></p>",
        TITLE_COLOR, BANNER_TEXT
    )
}

fn render_row(serial: usize, entry: &FeedEntry) -> String {
    format!(
        r#"
        <p style='margin: 8px 0; padding: 0;'>
            <span style='color:{serial_color}; font-size: 16px;'>{serial}</span>.
            【<span style='color:{time_color}!important; text-decoration: none!important; background:{time_bg}; font-weight: bold; font-size: 16px;'>{time}</span>】
            <span style='color:{title_color}; font-size: 16px;'>{title}</span>
        </p>
        <p style='margin: 0 0 12px 0; padding: 0;'>👉 <a href='{link}' target='_blank' style='color:{link_color}; text-decoration: underline; font-size: 14px;'>{link_text}</a></p>
        "#,
        serial_color = SERIAL_COLOR,
        serial = serial,
        time_color = TIME_COLOR,
        time_bg = TIME_BG_COLOR,
        time = html_escape(&display_time(entry)),
        title_color = NEWS_TITLE_COLOR,
        title = display_title(entry),
        link = html_escape(&entry.link),
        link_color = LINK_TEXT_COLOR,
        link_text = LINK_TEXT,
    )
}

/// Time shown next to an entry.
///
/// `HH:MM` from an embedded `<time>` marker when the content has one,
/// otherwise `MM-DD` from the updated (or published) date. Never fails;
/// an entry with neither yields an empty string.
pub fn display_time(entry: &FeedEntry) -> String {
    if let Some(caps) = entry
        .content
        .as_deref()
        .and_then(|content| TIME_MARKER.captures(content))
    {
        return caps[1].to_string();
    }

    let timestamp = entry.timestamp().unwrap_or_default();
    let date = timestamp.split('T').next().unwrap_or_default();
    date.split('-').skip(1).collect::<Vec<_>>().join("-")
}

/// HTML titles are already markup; only plain-text titles get escaped.
fn display_title(entry: &FeedEntry) -> String {
    if entry.title_is_html {
        entry.title.clone()
    } else {
        html_escape(&entry.title)
    }
}

/// Simple HTML escaping for feed-provided text.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
