//! Strict decoding of the model's answer text into an [`AnalysisResult`].
//!
//! Accepts raw JSON or JSON wrapped in a ```` ```json ```` / ```` ``` ```` fence.
//! Anything that does not match the expected shape is a [`Error::Parse`];
//! no partially filled result is ever returned.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};
use std::fmt;

use crate::error::Error;
use crate::result::{AnalysisResult, Category, Confidence};
use crate::Result;

static FENCED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```(?i:json)?[ \t]*\r?\n?(.*?)\s*```$").expect("static fence pattern")
});

#[derive(Debug, Deserialize)]
struct RawAnswer {
    kategori: String,
    guven_skoru: Number,
    analiz_detaylari: DetailEntries,
    aciklama: String,
}

/// `analiz_detaylari` entries in the order they appear in the answer.
#[derive(Debug)]
struct DetailEntries(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for DetailEntries {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = DetailEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of observations")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries: Vec<(String, Value)> = Vec::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    // a repeated key keeps its first position, last value wins
                    match entries.iter_mut().find(|(k, _)| *k == key) {
                        Some(slot) => slot.1 = value,
                        None => entries.push((key, value)),
                    }
                }
                Ok(DetailEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Trim whitespace and remove one surrounding code fence, if present.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match FENCED.captures(trimmed).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => trimmed,
    }
}

/// Decode the model's text answer.
pub fn decode_answer(text: &str) -> Result<AnalysisResult> {
    let body = strip_code_fence(text);
    let raw: RawAnswer = serde_json::from_str(body)
        .map_err(|e| Error::parse(format!("answer is not the expected JSON: {}", e), text))?;

    let category = raw
        .kategori
        .parse::<Category>()
        .map_err(|e| Error::parse(e, text))?;
    let confidence = confidence_from(&raw.guven_skoru)
        .ok_or_else(|| Error::parse(format!("guven_skoru {} is not usable", raw.guven_skoru), text))?;

    let mut details = Vec::with_capacity(raw.analiz_detaylari.0.len());
    for (key, value) in raw.analiz_detaylari.0 {
        let rendered = match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => {
                return Err(Error::parse(
                    format!("analiz_detaylari.{} must be text, got {}", key, other),
                    text,
                ))
            }
        };
        details.push((key, rendered));
    }

    Ok(AnalysisResult {
        category,
        confidence,
        details,
        rationale: raw.aciklama,
    })
}

fn confidence_from(n: &Number) -> Option<Confidence> {
    if let Some(i) = n.as_i64() {
        return Some(Confidence::clamped(i));
    }
    let f = n.as_f64().filter(|f| f.is_finite())?;
    Some(Confidence::clamped(f.round() as i64))
}
