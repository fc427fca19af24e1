use fragments_types::{Extension, MediaType};
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

use crate::engine::Converted;
use crate::error::{ConvertError, ConvertResult};

/// Markdown → `html` (rendered) or `txt` (verbatim).
pub fn convert(target: Extension, data: &[u8]) -> ConvertResult<Converted> {
    match target {
        Extension::Html => {
            let source = std::str::from_utf8(data)
                .map_err(|e| ConvertError::malformed(MediaType::TextMarkdown, e))?;
            Ok(Converted::new(MediaType::TextHtml, render_html(source)))
        }
        Extension::Txt => Ok(Converted::new(MediaType::TextPlain, data)),
        _ => Err(ConvertError::Unsupported {
            from: MediaType::TextMarkdown,
            to: target,
        }),
    }
}

/// Render CommonMark (plus tables and strikethrough) to HTML.
///
/// Raw HTML in the source is escaped and shown as text. Link and image
/// targets with a script-capable scheme are emptied.
pub fn render_html(source: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(source, options).map(sanitize);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn sanitize(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::HtmlBlock) => Event::Start(Tag::Paragraph),
        Event::End(TagEnd::HtmlBlock) => Event::End(TagEnd::Paragraph),
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
    }
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    if is_safe_url(&url) {
        url
    } else {
        CowStr::Borrowed("")
    }
}

/// Browsers skip whitespace and control characters inside a scheme, so they
/// are dropped before the comparison.
fn is_safe_url(url: &str) -> bool {
    const BLOCKED: [&str; 4] = ["javascript:", "vbscript:", "file:", "data:"];
    const IMAGE_DATA: [&str; 4] = [
        "data:image/gif;",
        "data:image/png;",
        "data:image/jpeg;",
        "data:image/webp;",
    ];
    let head: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .take(20)
        .collect::<String>()
        .to_ascii_lowercase();
    if IMAGE_DATA.iter().any(|prefix| head.starts_with(prefix)) {
        return true;
    }
    !BLOCKED.iter().any(|scheme| head.starts_with(scheme))
}
