//! Minimal CSV interchange.
//!
//! Rows are split on `\n` (a trailing `\r` is dropped) and fields on `,`.
//! There is no quoting or escaping: input containing `"` is rejected, and
//! so are record values that would need quoting on output. Values are
//! always strings on the way in.

use fragments_types::{Extension, MediaType};
use serde_json::{Map, Value};

use crate::engine::Converted;
use crate::error::{ConvertError, ConvertResult};

/// One CSV row keyed by the header's column names, in column order.
pub type Record = Map<String, Value>;

/// CSV → `json` (array of records) or `txt` (verbatim).
pub fn convert(target: Extension, data: &[u8]) -> ConvertResult<Converted> {
    match target {
        Extension::Json => {
            let text = std::str::from_utf8(data)
                .map_err(|e| ConvertError::malformed(MediaType::TextCsv, e))?;
            let records = read_records(text)?;
            let json = serde_json::to_vec_pretty(&records)
                .map_err(|e| ConvertError::malformed(MediaType::TextCsv, e))?;
            Ok(Converted::new(MediaType::ApplicationJson, json))
        }
        Extension::Txt => Ok(Converted::new(MediaType::TextPlain, data)),
        _ => Err(ConvertError::Unsupported {
            from: MediaType::TextCsv,
            to: target,
        }),
    }
}

/// Parse CSV text into records.
///
/// The first line is the header. Blank lines are skipped. A row with fewer
/// fields than the header omits the missing columns; extra fields are
/// dropped.
pub fn read_records(text: &str) -> ConvertResult<Vec<Record>> {
    if text.contains('"') {
        return Err(ConvertError::malformed(
            MediaType::TextCsv,
            "quoted fields are not supported",
        ));
    }

    let mut lines = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line));
    let header: Vec<&str> = match lines.next() {
        Some(line) if !line.is_empty() => line.split(',').collect(),
        _ => return Ok(Vec::new()),
    };

    Ok(lines
        .filter(|line| !line.is_empty())
        .map(|line| {
            header
                .iter()
                .zip(line.split(','))
                .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
                .collect::<Record>()
        })
        .collect())
}

/// Render a JSON array of uniform objects as CSV.
///
/// The header comes from the first record's keys; every record must carry
/// exactly that key set. Rows are joined with `\n`, without a trailing
/// newline.
pub fn write_records(value: &Value) -> ConvertResult<String> {
    let Value::Array(items) = value else {
        return Err(ConvertError::NotTabular("payload is not an array".into()));
    };
    let Some(first) = items.first() else {
        return Err(ConvertError::NotTabular(
            "array is empty, no header to derive".into(),
        ));
    };
    let Value::Object(first) = first else {
        return Err(ConvertError::NotTabular("record 0 is not an object".into()));
    };

    let header: Vec<&str> = first.keys().map(String::as_str).collect();
    for key in &header {
        check_field(key)?;
    }

    let mut lines = Vec::with_capacity(items.len() + 1);
    lines.push(header.join(","));
    for (index, item) in items.iter().enumerate() {
        let Value::Object(record) = item else {
            return Err(ConvertError::NotTabular(format!(
                "record {index} is not an object"
            )));
        };
        if record.len() != header.len() || !header.iter().all(|key| record.contains_key(*key)) {
            return Err(ConvertError::NotTabular(format!(
                "record {index} does not have the same keys as record 0"
            )));
        }
        let fields = header
            .iter()
            .map(|key| {
                let field = literal(&record[*key]);
                check_field(&field)?;
                Ok(field)
            })
            .collect::<ConvertResult<Vec<_>>>()?;
        lines.push(fields.join(","));
    }
    Ok(lines.join("\n"))
}

/// The literal string form of a JSON value.
fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn check_field(field: &str) -> ConvertResult<()> {
    if field.contains([',', '"', '\r', '\n']) {
        return Err(ConvertError::NotTabular(format!(
            "field {field:?} needs quoting, which is not supported"
        )));
    }
    Ok(())
}
