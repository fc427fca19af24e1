use fragments_types::{Extension, MediaType};
use serde_json::Value;

use crate::csv;
use crate::engine::Converted;
use crate::error::{ConvertError, ConvertResult};

/// JSON → `yaml`/`yml`, `txt` (pretty-printed JSON) or `csv`.
pub fn convert(target: Extension, data: &[u8]) -> ConvertResult<Converted> {
    let produce: fn(&Value) -> ConvertResult<Converted> = match target {
        Extension::Yaml | Extension::Yml => to_yaml,
        Extension::Txt => to_pretty_text,
        Extension::Csv => to_csv,
        _ => {
            return Err(ConvertError::Unsupported {
                from: MediaType::ApplicationJson,
                to: target,
            })
        }
    };
    produce(&parse(data)?)
}

pub fn parse(data: &[u8]) -> ConvertResult<Value> {
    serde_json::from_slice(data).map_err(|e| ConvertError::malformed(MediaType::ApplicationJson, e))
}

fn to_yaml(value: &Value) -> ConvertResult<Converted> {
    let yaml = serde_yaml::to_string(value)
        .map_err(|e| ConvertError::malformed(MediaType::ApplicationJson, e))?;
    Ok(Converted::new(MediaType::ApplicationYaml, yaml))
}

fn to_pretty_text(value: &Value) -> ConvertResult<Converted> {
    let text = serde_json::to_vec_pretty(value)
        .map_err(|e| ConvertError::malformed(MediaType::ApplicationJson, e))?;
    Ok(Converted::new(MediaType::TextPlain, text))
}

fn to_csv(value: &Value) -> ConvertResult<Converted> {
    Ok(Converted::new(MediaType::TextCsv, csv::write_records(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_to_yaml() {
        let converted = convert(Extension::Yaml, br#"{"hello":"world"}"#).unwrap();
        assert_eq!(converted.media_type, MediaType::ApplicationYaml);
        let text = String::from_utf8(converted.data).unwrap();
        assert!(text.contains("hello: world"));
    }

    #[test]
    fn yml_alias_behaves_like_yaml() {
        let a = convert(Extension::Yaml, br#"{"a":[1,2]}"#).unwrap();
        let b = convert(Extension::Yml, br#"{"a":[1,2]}"#).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn json_to_txt_is_pretty_printed() {
        let converted = convert(Extension::Txt, br#"{"a":1,"b":[true,null]}"#).unwrap();
        assert_eq!(converted.media_type, MediaType::TextPlain);
        let text = String::from_utf8(converted.data).unwrap();
        assert_eq!(text, "{\n  \"a\": 1,\n  \"b\": [\n    true,\n    null\n  ]\n}");
    }

    #[test]
    fn pretty_text_keeps_key_order() {
        let converted = convert(Extension::Txt, br#"{"z":1,"a":2}"#).unwrap();
        let text = String::from_utf8(converted.data).unwrap();
        assert!(text.find("\"z\"").unwrap() < text.find("\"a\"").unwrap());
    }

    #[test]
    fn json_to_csv() {
        let converted = convert(Extension::Csv, br#"[{"a":"1","b":2},{"a":"3","b":4}]"#).unwrap();
        assert_eq!(converted.media_type, MediaType::TextCsv);
        assert_eq!(converted.data, b"a,b\n1,2\n3,4");
    }

    #[test]
    fn yaml_roundtrip_preserves_structure() {
        let original = json!({
            "name": "x",
            "n": 3,
            "f": 1.5,
            "list": [1, "two", null],
            "nested": {"ok": true}
        });
        let yaml = convert(Extension::Yaml, original.to_string().as_bytes()).unwrap();
        let back = crate::yaml::convert(Extension::Json, &yaml.data).unwrap();
        let value: Value = serde_json::from_slice(&back.data).unwrap();
        assert_eq!(value, original);
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = convert(Extension::Yaml, b"{not json").unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Malformed {
                media_type: MediaType::ApplicationJson,
                ..
            }
        ));
    }

    #[test]
    fn unsupported_target_wins_over_bad_payload() {
        let err = convert(Extension::Html, b"{not json").unwrap_err();
        assert!(err.is_unsupported());
    }
}
