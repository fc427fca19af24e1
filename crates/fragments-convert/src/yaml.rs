use fragments_types::{Extension, MediaType};
use serde_json::Value;

use crate::engine::Converted;
use crate::error::{ConvertError, ConvertResult};

/// YAML → `json` (pretty-printed) or `txt` (verbatim).
pub fn convert(target: Extension, data: &[u8]) -> ConvertResult<Converted> {
    match target {
        Extension::Json => {
            let value: Value = serde_yaml::from_slice(data)
                .map_err(|e| ConvertError::malformed(MediaType::ApplicationYaml, e))?;
            let json = serde_json::to_vec_pretty(&value)
                .map_err(|e| ConvertError::malformed(MediaType::ApplicationYaml, e))?;
            Ok(Converted::new(MediaType::ApplicationJson, json))
        }
        Extension::Txt => Ok(Converted::new(MediaType::TextPlain, data)),
        _ => Err(ConvertError::Unsupported {
            from: MediaType::ApplicationYaml,
            to: target,
        }),
    }
}
