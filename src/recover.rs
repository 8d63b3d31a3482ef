use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{API_BASE_URL, API_KEY_ENV, API_MODEL, TITLE_SEGMENT_PATTERN};
use crate::model::TitleSegments;

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct TitlePayload {
    #[serde(default)]
    title: String,
}

/// LLM-backed title reconstruction. Built once per run and reused for
/// every file that needs recovery; no teardown required.
pub struct TitleRecovery {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    model: String,
    segment_pattern: Regex,
}

impl TitleRecovery {
    /// The missing-credential case is not a startup error: an empty key is
    /// rejected by the service per file, which lands in the failure report.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).unwrap_or_default();
        Self::new(api_key, API_BASE_URL.to_string(), API_MODEL.to_string())
    }

    pub fn new(api_key: String, base_url: String, model: String) -> Result<Self> {
        Ok(Self {
            client: reqwest::blocking::Client::new(),
            api_key,
            base_url,
            model,
            segment_pattern: Regex::new(TITLE_SEGMENT_PATTERN)
                .context("failed to compile title segment regex")?,
        })
    }

    /// Ask the completion service for the full title. Exactly one request
    /// per file; a failed or unparseable response is terminal.
    ///
    /// Returns an empty string when the service answered but produced no
    /// `title` field.
    pub fn recover(&self, text_preview: &str, original_stem: &str) -> Result<String> {
        let segments = self.split_segments(original_stem);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: build_system_prompt(&segments),
                },
                ChatMessage {
                    role: "user",
                    content: build_user_prompt(text_preview),
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .context("completion service could not be reached")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            bail!("completion service returned {status}: {body}");
        }

        let chat: ChatResponse = response
            .json()
            .context("failed to decode completion response")?;
        let content = chat
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .unwrap_or_default();

        let payload: TitlePayload = serde_json::from_str(content)
            .context("completion content was not the expected json object")?;

        debug!(stem = original_stem, title = %payload.title, "recovered title");
        Ok(payload.title)
    }

    pub fn split_segments(&self, stem: &str) -> TitleSegments {
        split_segments(&self.segment_pattern, stem)
    }
}

fn split_segments(pattern: &Regex, stem: &str) -> TitleSegments {
    match pattern.captures(stem) {
        Some(caps) => TitleSegments {
            prefix: caps[1].to_string(),
            marker: caps[2].to_string(),
            suffix: caps[3].to_string(),
            trailing_tag: caps[4].to_string(),
        },
        None => TitleSegments {
            prefix: stem.to_string(),
            marker: String::new(),
            suffix: String::new(),
            trailing_tag: String::new(),
        },
    }
}

fn build_system_prompt(segments: &TitleSegments) -> String {
    format!(
        "你是一名文件命名助手。一篇论文的文件名在扫描整理时被截断，其结构为：\
         标题前段「{prefix}」、省略标记「{marker}」、标题后段「{suffix}」。\n\
         请根据用户提供的论文正文片段补全完整标题，规则如下：\n\
         - 只返回最终的论文标题，不得包含其他任何内容。\n\
         - 完整标题与前后段相符，被省略的部分需从正文中定位补全；\
         若语义相近的标题跨越多行，说明可能存在副标题，请一并提取，用冒号分隔主副标题。\n\
         - 不得包含作者名、机构名、期刊名等内容。\n\
         - 标题中不得出现空格字符，也不得出现{marker}符号。\n\
         - 输出的论文标题必须为中文。\n\
         - 以JSON对象输出，仅含一个字段：{{\"title\": \"{prefix}补全内容{suffix}\"}}",
        prefix = segments.prefix,
        marker = segments.marker,
        suffix = segments.suffix,
    )
}

fn build_user_prompt(text_preview: &str) -> String {
    format!("文本内容：\n{text_preview}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TITLE_SEGMENT_PATTERN;

    fn pattern() -> Regex {
        Regex::new(TITLE_SEGMENT_PATTERN).unwrap()
    }

    #[test]
    fn marker_stem_splits_into_four_segments() {
        let segments = split_segments(&pattern(), "FooBar...Baz_AuthorX");
        assert_eq!(
            segments,
            TitleSegments {
                prefix: "FooBar".to_string(),
                marker: "...".to_string(),
                suffix: "Baz".to_string(),
                trailing_tag: "_AuthorX".to_string(),
            }
        );
    }

    #[test]
    fn stem_without_marker_lands_entirely_in_prefix() {
        let segments = split_segments(&pattern(), "纯标题_作者");
        assert_eq!(segments.prefix, "纯标题_作者");
        assert_eq!(segments.marker, "");
        assert_eq!(segments.suffix, "");
        assert_eq!(segments.trailing_tag, "");
    }

    #[test]
    fn marker_without_trailing_tag_does_not_match_the_structural_pattern() {
        let segments = split_segments(&pattern(), "张三...导论");
        assert_eq!(segments.prefix, "张三...导论");
        assert_eq!(segments.trailing_tag, "");
    }

    #[test]
    fn system_prompt_carries_the_segments_by_value() {
        let segments = split_segments(&pattern(), "张三...导论_李四");
        let prompt = build_system_prompt(&segments);
        assert!(prompt.contains("张三"));
        assert!(prompt.contains("导论"));
        assert!(prompt.contains("..."));
        assert!(prompt.contains("\"title\""));
    }

    #[test]
    fn missing_title_field_defaults_to_empty() {
        let payload: TitlePayload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload.title, "");

        let payload: TitlePayload =
            serde_json::from_str(r#"{"title": "深度学习导论"}"#).unwrap();
        assert_eq!(payload.title, "深度学习导论");
    }

    #[test]
    fn unreachable_service_surfaces_as_an_error() {
        let recovery = TitleRecovery::new(
            "test-key".to_string(),
            "http://127.0.0.1:1".to_string(),
            "deepseek-coder".to_string(),
        )
        .unwrap();

        assert!(recovery.recover("正文片段", "张三...导论_李四").is_err());
    }
}
