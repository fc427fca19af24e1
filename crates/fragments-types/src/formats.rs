//! Format compatibility matrix.
//!
//! Maps a source base type to the ordered list of media types its bytes can
//! be re-encoded into. The first entry is always the source type itself;
//! the remaining order is a display preference, not a conversion priority.

use crate::media::MediaType;

use MediaType::*;

const PLAIN: &[MediaType] = &[TextPlain];
const MARKDOWN: &[MediaType] = &[TextMarkdown, TextHtml, TextPlain];
const HTML: &[MediaType] = &[TextHtml, TextPlain];
const CSV: &[MediaType] = &[TextCsv, ApplicationJson, TextPlain];
const JSON: &[MediaType] = &[ApplicationJson, ApplicationYaml, TextCsv, TextPlain];
const YAML: &[MediaType] = &[ApplicationYaml, ApplicationJson, TextPlain];
const PNG: &[MediaType] = &[ImagePng, ImageJpeg, ImageWebp, ImageGif, ImageAvif];
const JPEG: &[MediaType] = &[ImageJpeg, ImagePng, ImageWebp, ImageGif, ImageAvif];
const WEBP: &[MediaType] = &[ImageWebp, ImagePng, ImageJpeg, ImageGif, ImageAvif];
const GIF: &[MediaType] = &[ImageGif, ImagePng, ImageJpeg, ImageWebp, ImageAvif];
const AVIF: &[MediaType] = &[ImageAvif, ImagePng, ImageJpeg, ImageWebp, ImageGif];

/// Ordered compatible targets for a supported source type.
pub fn compatible_targets(source: MediaType) -> &'static [MediaType] {
    match source {
        TextPlain => PLAIN,
        TextMarkdown => MARKDOWN,
        TextHtml => HTML,
        TextCsv => CSV,
        ApplicationJson => JSON,
        ApplicationYaml => YAML,
        ImagePng => PNG,
        ImageJpeg => JPEG,
        ImageWebp => WEBP,
        ImageGif => GIF,
        ImageAvif => AVIF,
    }
}

/// Compatible targets for an arbitrary base type string.
///
/// Types outside the supported set map to a singleton list containing only
/// themselves.
pub fn compatible_types(base: &str) -> Vec<String> {
    match MediaType::from_essence(base) {
        Some(source) => compatible_targets(source)
            .iter()
            .map(|target| target.as_str().to_string())
            .collect(),
        None => vec![base.to_string()],
    }
}

pub fn is_compatible(source: MediaType, target: MediaType) -> bool {
    compatible_targets(source).contains(&target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_type_is_always_first() {
        for media_type in MediaType::ALL {
            assert_eq!(compatible_targets(media_type)[0], media_type);
        }
    }

    #[test]
    fn plain_text_only_converts_to_itself() {
        assert_eq!(compatible_targets(TextPlain), &[TextPlain]);
        assert!(!is_compatible(TextPlain, TextHtml));
    }

    #[test]
    fn json_targets_in_order() {
        assert_eq!(
            compatible_types("application/json"),
            vec!["application/json", "application/yaml", "text/csv", "text/plain"]
        );
    }

    #[test]
    fn png_targets_in_order() {
        assert_eq!(
            compatible_types("image/png"),
            vec!["image/png", "image/jpeg", "image/webp", "image/gif", "image/avif"]
        );
    }

    #[test]
    fn every_image_converts_to_every_other_image() {
        for source in MediaType::IMAGES {
            let targets = compatible_targets(source);
            assert_eq!(targets.len(), 5);
            for target in MediaType::IMAGES {
                assert!(targets.contains(&target), "{source} -> {target}");
            }
        }
    }

    #[test]
    fn images_never_convert_to_text() {
        for source in MediaType::IMAGES {
            assert!(compatible_targets(source).iter().all(|t| t.is_image()));
        }
    }

    #[test]
    fn unknown_types_map_to_themselves() {
        assert_eq!(compatible_types("application/msword"), vec!["application/msword"]);
    }
}
