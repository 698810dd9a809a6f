use serde::{Deserialize, Deserializer, Serialize};

/// One file's extraction result as returned by the extraction service.
///
/// The service answers each uploaded report with a JSON payload of this
/// shape. Every field is optional on the wire: a schema deviation (missing
/// month or reading list) deserializes to an empty value rather than failing
/// the whole batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Reporting-period label, e.g. `"January 2025"`. Not guaranteed unique
    /// across uploads: re-uploading a period's report repeats its month.
    /// The service emits `null` when no date was found in the report.
    #[serde(default, deserialize_with = "null_to_default")]
    pub month: String,
    /// String-encoded fasting glucose readings, e.g. `"95 mg/dl"`.
    #[serde(default, deserialize_with = "null_to_default")]
    pub fasting: Vec<String>,
    /// String-encoded post-lunch glucose readings.
    ///
    /// The service has emitted both `post_lunch` and `postLunch` spellings;
    /// accept either.
    #[serde(default, alias = "postLunch", deserialize_with = "null_to_default")]
    pub post_lunch: Vec<String>,
}

/// Treat an explicit JSON `null` the same as an absent field.
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A raw report file queued for extraction.
#[derive(Debug, Clone)]
pub struct ReportFile {
    /// File name as presented to the extraction service.
    pub name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl ReportFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}
