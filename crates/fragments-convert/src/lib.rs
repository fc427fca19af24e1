//! Format conversion engine for fragments.
//!
//! A pure function of `(source media type, target extension, bytes)`. The
//! engine dispatches on the source family first, then on the requested
//! extension:
//!
//! | Source | Targets |
//! |---|---|
//! | `text/markdown` | `html` (rendered), `txt` (verbatim) |
//! | `application/json` | `yaml`/`yml`, `txt` (pretty JSON), `csv` (array of records) |
//! | `application/yaml` | `json` (pretty), `txt` (verbatim) |
//! | `text/plain`, `text/html` | `txt` (verbatim) |
//! | `text/csv` | `json` (array of string records), `txt` (verbatim) |
//! | images | `png`, `jpg`/`jpeg`, `webp`, `gif`, `avif` |
//!
//! Every other combination is [`ConvertError::Unsupported`]. The engine
//! never touches storage; callers decide whether a request is allowed by the
//! compatibility matrix before calling it.

pub mod csv;
pub mod engine;
pub mod error;
pub mod json;
pub mod markdown;
pub mod raster;
pub mod text;
pub mod yaml;

pub use engine::{convert, Converted, Family};
pub use error::{ConvertError, ConvertResult};
