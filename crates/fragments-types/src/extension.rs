use std::fmt;
use std::str::FromStr;

use crate::error::TypeError;
use crate::media::MediaType;

/// A file-extension token requesting an output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Extension {
    Txt,
    Html,
    Md,
    Csv,
    Json,
    Yaml,
    Yml,
    Png,
    Jpg,
    Jpeg,
    Webp,
    Gif,
    Avif,
}

impl Extension {
    pub const ALL: [Extension; 13] = [
        Extension::Txt,
        Extension::Html,
        Extension::Md,
        Extension::Csv,
        Extension::Json,
        Extension::Yaml,
        Extension::Yml,
        Extension::Png,
        Extension::Jpg,
        Extension::Jpeg,
        Extension::Webp,
        Extension::Gif,
        Extension::Avif,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Html => "html",
            Self::Md => "md",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Yml => "yml",
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
            Self::Gif => "gif",
            Self::Avif => "avif",
        }
    }

    /// The media type this extension resolves to.
    pub fn media_type(self) -> MediaType {
        match self {
            Self::Txt => MediaType::TextPlain,
            Self::Html => MediaType::TextHtml,
            Self::Md => MediaType::TextMarkdown,
            Self::Csv => MediaType::TextCsv,
            Self::Json => MediaType::ApplicationJson,
            Self::Yaml | Self::Yml => MediaType::ApplicationYaml,
            Self::Png => MediaType::ImagePng,
            Self::Jpg | Self::Jpeg => MediaType::ImageJpeg,
            Self::Webp => MediaType::ImageWebp,
            Self::Gif => MediaType::ImageGif,
            Self::Avif => MediaType::ImageAvif,
        }
    }

    /// The canonical extension for a media type.
    pub fn for_media_type(media_type: MediaType) -> Self {
        match media_type {
            MediaType::TextPlain => Self::Txt,
            MediaType::TextMarkdown => Self::Md,
            MediaType::TextHtml => Self::Html,
            MediaType::TextCsv => Self::Csv,
            MediaType::ApplicationJson => Self::Json,
            MediaType::ApplicationYaml => Self::Yaml,
            MediaType::ImagePng => Self::Png,
            MediaType::ImageJpeg => Self::Jpg,
            MediaType::ImageWebp => Self::Webp,
            MediaType::ImageGif => Self::Gif,
            MediaType::ImageAvif => Self::Avif,
        }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Extension {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ext| ext.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TypeError::UnknownExtension(s.to_string()))
    }
}

/// Split a request identifier into `(fragment_id, extension)`.
///
/// The last `.`-delimited segment is the extension; everything before it is
/// the fragment id. An identifier without a `.`, or with nothing after the
/// last `.`, carries no extension.
pub fn split_identifier(identifier: &str) -> (&str, Option<&str>) {
    match identifier.rsplit_once('.') {
        Some((id, "")) => (id, None),
        Some((id, ext)) => (id, Some(ext)),
        None => (identifier, None),
    }
}
