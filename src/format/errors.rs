//! Localized rendering of backend error payloads.
//!
//! The backend reports validation problems in English. Known messages are
//! translated through a fixed table; the length/count patterns carry their
//! number through. Anything unknown passes through unchanged.

use crate::api::{ApiError, ErrorPayload, FieldErrors};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

pub const DEFAULT_FALLBACK: &str = "操作失败。";

const FIELD_SEPARATOR: &str = "；";

static EXACT_MESSAGES: &[(&str, &str)] = &[
    ("This field may not be blank.", "不能为空。"),
    ("This field is required.", "为必填项。"),
    ("Invalid pk \"null\" - object does not exist.", "无效的选择。"),
    ("Not allowed.", "无权限。"),
    (
        "You do not have permission to perform this action.",
        "无权限执行此操作。",
    ),
    ("Authentication credentials were not provided.", "请先登录。"),
    ("Invalid token.", "登录已过期，请重新登录。"),
    ("Token is invalid or expired", "登录已过期，请重新登录。"),
];

static FIELD_LABELS: &[(&str, &str)] = &[
    ("title", "标题"),
    ("body", "正文"),
    ("board", "板块"),
    ("cover_image", "头图"),
    ("remove_cover_image", "移除头图"),
    ("resource_links", "资源链接"),
    ("image", "图片"),
    ("username", "用户名"),
    ("password", "密码"),
    ("email", "邮箱"),
];

struct Pattern {
    regex: Regex,
    template: fn(&str) -> String,
}

static PATTERNS: Lazy<Vec<Pattern>> = Lazy::new(|| {
    let specs: [(&str, fn(&str) -> String); 4] = [
        (
            r"Ensure this field has no more than (\d+) characters\.",
            |n| format!("不能超过 {n} 个字符。"),
        ),
        (
            r"Ensure this field has at least (\d+) characters\.",
            |n| format!("不能少于 {n} 个字符。"),
        ),
        (
            r"Ensure this field has no more than (\d+) elements\.",
            |n| format!("数量不能超过 {n}。"),
        ),
        (
            r"Ensure this field has at least (\d+) elements\.",
            |n| format!("数量不能少于 {n}。"),
        ),
    ];
    specs
        .into_iter()
        .filter_map(|(pattern, template)| {
            Regex::new(pattern)
                .ok()
                .map(|regex| Pattern { regex, template })
        })
        .collect()
});

/// Translate one backend message; unknown messages are returned unchanged.
#[must_use]
pub fn translate_message(message: &str) -> String {
    if let Some((_, translated)) = EXACT_MESSAGES.iter().find(|(known, _)| *known == message) {
        return (*translated).to_string();
    }

    for pattern in PATTERNS.iter() {
        if let Some(count) = pattern
            .regex
            .captures(message)
            .and_then(|captures| captures.get(1))
        {
            return (pattern.template)(count.as_str());
        }
    }

    message.to_string()
}

/// Localized label for a request field, or the field name itself.
#[must_use]
pub fn field_label(field: &str) -> &str {
    FIELD_LABELS
        .iter()
        .find(|(name, _)| *name == field)
        .map_or(field, |(_, label)| *label)
}

/// Render a backend payload. `None` and HTML pages render as the fallback.
#[must_use]
pub fn format_error_payload(payload: Option<&ErrorPayload>, fallback: Option<&str>) -> String {
    let fallback = fallback.unwrap_or(DEFAULT_FALLBACK);
    let Some(payload) = payload else {
        return fallback.to_string();
    };

    match payload {
        ErrorPayload::Text(text) => text.clone(),
        ErrorPayload::Html(_) => fallback.to_string(),
        ErrorPayload::Detail(detail) => translate_message(detail),
        ErrorPayload::Fields(fields) => format_fields(fields),
        ErrorPayload::Other(value) => value.to_string(),
    }
}

/// Render any client error for display. HTML error pages keep the HTTP status
/// so users can report it; errors without a payload render as the fallback.
#[must_use]
pub fn format_api_error(err: &ApiError, fallback: Option<&str>) -> String {
    let fallback_text = fallback.unwrap_or(DEFAULT_FALLBACK);

    match err.payload() {
        Some(ErrorPayload::Html(_)) => format!(
            "{fallback_text}（HTTP {}）：后端返回了错误页面。",
            err.status().unwrap_or(500)
        ),
        payload => format_error_payload(payload, fallback),
    }
}

fn format_fields(fields: &[FieldErrors]) -> String {
    let parts: Vec<String> = fields
        .iter()
        .filter_map(|entry| {
            let rendered: String = entry
                .messages
                .iter()
                .map(|message| translate_message(message))
                .filter(|message| !message.trim().is_empty())
                .collect();
            if rendered.is_empty() {
                return None;
            }
            let label = field_label(&entry.field);
            let separator = if rendered.starts_with('：') || rendered.starts_with(':') {
                ""
            } else {
                "："
            };
            Some(format!("{label}{separator}{rendered}"))
        })
        .collect();

    if parts.is_empty() {
        let raw: Map<String, Value> = fields
            .iter()
            .map(|entry| {
                let messages = entry.messages.iter().cloned().map(Value::String).collect();
                (entry.field.clone(), Value::Array(messages))
            })
            .collect();
        Value::Object(raw).to_string()
    } else {
        parts.join(FIELD_SEPARATOR)
    }
}
