use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A supported base media type (parameters stripped).
///
/// The set is closed: anything outside it is rejected when a fragment is
/// constructed, so every match over `MediaType` is exhaustive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MediaType {
    #[serde(rename = "text/plain")]
    TextPlain,
    #[serde(rename = "text/markdown")]
    TextMarkdown,
    #[serde(rename = "text/html")]
    TextHtml,
    #[serde(rename = "text/csv")]
    TextCsv,
    #[serde(rename = "application/json")]
    ApplicationJson,
    #[serde(rename = "application/yaml")]
    ApplicationYaml,
    #[serde(rename = "image/png")]
    ImagePng,
    #[serde(rename = "image/jpeg")]
    ImageJpeg,
    #[serde(rename = "image/webp")]
    ImageWebp,
    #[serde(rename = "image/gif")]
    ImageGif,
    #[serde(rename = "image/avif")]
    ImageAvif,
}

impl MediaType {
    /// Every supported media type.
    pub const ALL: [MediaType; 11] = [
        MediaType::TextPlain,
        MediaType::TextMarkdown,
        MediaType::TextHtml,
        MediaType::TextCsv,
        MediaType::ApplicationJson,
        MediaType::ApplicationYaml,
        MediaType::ImagePng,
        MediaType::ImageJpeg,
        MediaType::ImageWebp,
        MediaType::ImageGif,
        MediaType::ImageAvif,
    ];

    /// The image family in canonical order.
    pub const IMAGES: [MediaType; 5] = [
        MediaType::ImagePng,
        MediaType::ImageJpeg,
        MediaType::ImageWebp,
        MediaType::ImageGif,
        MediaType::ImageAvif,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TextPlain => "text/plain",
            Self::TextMarkdown => "text/markdown",
            Self::TextHtml => "text/html",
            Self::TextCsv => "text/csv",
            Self::ApplicationJson => "application/json",
            Self::ApplicationYaml => "application/yaml",
            Self::ImagePng => "image/png",
            Self::ImageJpeg => "image/jpeg",
            Self::ImageWebp => "image/webp",
            Self::ImageGif => "image/gif",
            Self::ImageAvif => "image/avif",
        }
    }

    /// Look up a base type such as `text/plain`. Case-insensitive.
    pub fn from_essence(essence: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|media_type| media_type.as_str().eq_ignore_ascii_case(essence.trim()))
    }

    /// Whether a declared type string (parameters allowed) is supported.
    pub fn is_supported(value: &str) -> bool {
        ContentType::parse(value).is_ok()
    }

    /// True for the `text/*` family.
    pub fn is_textual(self) -> bool {
        self.as_str().starts_with("text/")
    }

    pub fn is_image(self) -> bool {
        Self::IMAGES.contains(&self)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::parse(s).map(|content_type| content_type.media_type())
    }
}

/// A declared media type string, validated against the supported set.
///
/// The original string is preserved verbatim (including parameters such as
/// `charset=utf-8`); only the base type takes part in support checks and
/// conversion dispatch.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentType {
    raw: String,
    media_type: MediaType,
}

impl ContentType {
    /// Parse a declared type such as `text/plain; charset=utf-8`.
    pub fn parse(value: &str) -> Result<Self, TypeError> {
        let mime = parse_mime(value)?;
        let media_type = MediaType::from_essence(mime.essence_str())
            .ok_or_else(|| TypeError::UnsupportedMediaType(mime.essence_str().to_string()))?;
        Ok(Self {
            raw: value.to_string(),
            media_type,
        })
    }

    /// The declared string, exactly as given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The base media type.
    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// The `charset` parameter, if one was declared.
    pub fn charset(&self) -> Option<String> {
        // `raw` already parsed once in `parse`, so this cannot fail.
        parse_mime(&self.raw)
            .ok()
            .and_then(|mime| mime.get_param(mime::CHARSET).map(|c| c.to_string()))
    }
}

fn parse_mime(value: &str) -> Result<mime::Mime, TypeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TypeError::MalformedMediaType {
            value: value.to_string(),
            reason: "empty".into(),
        });
    }
    trimmed
        .parse::<mime::Mime>()
        .map_err(|e| TypeError::MalformedMediaType {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

impl From<MediaType> for ContentType {
    fn from(media_type: MediaType) -> Self {
        Self {
            raw: media_type.as_str().to_string(),
            media_type,
        }
    }
}

impl TryFrom<String> for ContentType {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ContentType> for String {
    fn from(content_type: ContentType) -> Self {
        content_type.raw
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ContentType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
