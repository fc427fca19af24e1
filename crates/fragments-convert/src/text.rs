use fragments_types::{Extension, MediaType};

use crate::engine::Converted;
use crate::error::{ConvertError, ConvertResult};

/// `text/plain` and `text/html` → `txt` (verbatim).
pub fn convert(source: MediaType, target: Extension, data: &[u8]) -> ConvertResult<Converted> {
    match target {
        Extension::Txt => Ok(Converted::new(MediaType::TextPlain, data)),
        _ => Err(ConvertError::Unsupported { from: source, to: target }),
    }
}
