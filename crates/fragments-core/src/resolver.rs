//! Extension resolution for `<id>.<ext>` requests.

use fragments_types::{is_compatible, split_identifier, Extension, FragmentId, MediaType, OwnerId};

use crate::error::{FragmentError, FragmentResult};

/// Split `identifier` into a fragment id and an optional extension token.
///
/// An id that cannot be valid cannot name a stored fragment, so it is
/// reported as not found for `owner`.
pub fn parse_identifier<'a>(
    owner: &OwnerId,
    identifier: &'a str,
) -> FragmentResult<(FragmentId, Option<&'a str>)> {
    let (raw_id, extension) = split_identifier(identifier);
    let id = FragmentId::parse(raw_id).map_err(|_| FragmentError::not_found(owner, raw_id))?;
    Ok((id, extension))
}

/// Resolve an extension token against a fragment's base type.
///
/// Tokens are matched case-insensitively. Unknown tokens and targets
/// outside the compatibility matrix both fail with `UnsupportedFormat`.
pub fn resolve_extension(source: MediaType, token: &str) -> FragmentResult<Extension> {
    let unsupported = || FragmentError::UnsupportedFormat {
        media_type: source,
        extension: token.to_string(),
    };
    let extension: Extension = token.parse().map_err(|_| unsupported())?;
    if !is_compatible(source, extension.media_type()) {
        tracing::warn!(%source, extension = token, "extension not compatible with fragment type");
        return Err(unsupported());
    }
    Ok(extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn owner() -> OwnerId {
        OwnerId::new("user1").unwrap()
    }

    #[test]
    fn identifier_without_extension() {
        let (id, ext) = parse_identifier(&owner(), "abc").unwrap();
        assert_eq!(id.as_str(), "abc");
        assert_eq!(ext, None);
    }

    #[test]
    fn identifier_with_extension() {
        let (id, ext) = parse_identifier(&owner(), "abc.html").unwrap();
        assert_eq!(id.as_str(), "abc");
        assert_eq!(ext, Some("html"));
    }

    #[test]
    fn identifier_with_empty_extension() {
        let (id, ext) = parse_identifier(&owner(), "abc.").unwrap();
        assert_eq!(id.as_str(), "abc");
        assert_eq!(ext, None);
    }

    #[test]
    fn invalid_id_is_not_found() {
        let err = parse_identifier(&owner(), "a.b.html").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = parse_identifier(&owner(), ".html").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn compatible_extensions_resolve() {
        assert_eq!(
            resolve_extension(MediaType::TextMarkdown, "html").unwrap(),
            Extension::Html
        );
        assert_eq!(
            resolve_extension(MediaType::TextMarkdown, "MD").unwrap(),
            Extension::Md
        );
        assert_eq!(
            resolve_extension(MediaType::ApplicationJson, "yml").unwrap(),
            Extension::Yml
        );
        assert_eq!(
            resolve_extension(MediaType::ImagePng, "jpg").unwrap(),
            Extension::Jpg
        );
    }

    #[test]
    fn incompatible_extension_is_unsupported_format() {
        let err = resolve_extension(MediaType::TextPlain, "html").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
        let err = resolve_extension(MediaType::ImagePng, "txt").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn unknown_extension_is_unsupported_format() {
        let err = resolve_extension(MediaType::TextPlain, "exe").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
        assert_eq!(
            err.to_string(),
            "requested format .exe is not supported for text/plain"
        );
    }
}
