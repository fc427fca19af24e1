use fragments_types::{Extension, MediaType};

use crate::error::ConvertResult;
use crate::{csv, json, markdown, raster, text, yaml};

/// Output of a conversion: the resulting media type and bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Converted {
    pub media_type: MediaType,
    pub data: Vec<u8>,
}

impl Converted {
    pub fn new(media_type: MediaType, data: impl Into<Vec<u8>>) -> Self {
        Self {
            media_type,
            data: data.into(),
        }
    }
}

/// Conversion family of a source media type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Family {
    Markdown,
    Json,
    Yaml,
    /// `text/plain` and `text/html`.
    Text,
    Csv,
    Image,
}

impl Family {
    pub fn of(media_type: MediaType) -> Self {
        match media_type {
            MediaType::TextMarkdown => Self::Markdown,
            MediaType::ApplicationJson => Self::Json,
            MediaType::ApplicationYaml => Self::Yaml,
            MediaType::TextPlain | MediaType::TextHtml => Self::Text,
            MediaType::TextCsv => Self::Csv,
            MediaType::ImagePng
            | MediaType::ImageJpeg
            | MediaType::ImageWebp
            | MediaType::ImageGif
            | MediaType::ImageAvif => Self::Image,
        }
    }

    /// Image transcoding is CPU-bound enough to keep off async workers.
    pub fn is_cpu_heavy(self) -> bool {
        self == Self::Image
    }
}

/// Convert `data`, declared as `source`, into the format named by `target`.
pub fn convert(source: MediaType, target: Extension, data: &[u8]) -> ConvertResult<Converted> {
    tracing::debug!(%source, %target, bytes = data.len(), "converting");
    match Family::of(source) {
        Family::Markdown => markdown::convert(target, data),
        Family::Json => json::convert(target, data),
        Family::Yaml => yaml::convert(target, data),
        Family::Text => text::convert(source, target, data),
        Family::Csv => csv::convert(target, data),
        Family::Image => raster::convert(source, target, data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use fragments_types::compatible_targets;

    fn sample(media_type: MediaType) -> &'static [u8] {
        match media_type {
            MediaType::TextPlain => b"plain text",
            MediaType::TextMarkdown => b"# Title\n\nSome *text*.",
            MediaType::TextHtml => b"<p>hi</p>",
            MediaType::TextCsv => b"a,b\n1,2",
            MediaType::ApplicationJson => br#"[{"a":1,"b":"x"}]"#,
            MediaType::ApplicationYaml => b"a: 1\nb: [x, y]\n",
            _ => b"",
        }
    }

    #[test]
    fn every_textual_family_dispatches() {
        assert_eq!(Family::of(MediaType::TextHtml), Family::Text);
        assert_eq!(Family::of(MediaType::TextCsv), Family::Csv);
        assert_eq!(Family::of(MediaType::ImageGif), Family::Image);
        assert!(Family::Image.is_cpu_heavy());
        assert!(!Family::Json.is_cpu_heavy());
    }

    #[test]
    fn every_non_identity_text_target_has_a_transform() {
        let text_sources = MediaType::ALL.into_iter().filter(|t| !t.is_image());
        for source in text_sources {
            for &target in &compatible_targets(source)[1..] {
                let ext = Extension::for_media_type(target);
                let converted = convert(source, ext, sample(source))
                    .unwrap_or_else(|e| panic!("{source} -> {ext}: {e}"));
                assert_eq!(converted.media_type, target);
            }
        }
    }

    #[test]
    fn plain_text_to_html_is_unsupported() {
        let err = convert(MediaType::TextPlain, Extension::Html, b"hi").unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn text_family_rejects_images() {
        let err = convert(MediaType::TextCsv, Extension::Png, b"a\n1").unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Unsupported {
                from: MediaType::TextCsv,
                to: Extension::Png
            }
        ));
    }
}
