use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum MetadataValue {
    Text(String),
    Timestamp(NaiveDateTime),
}

impl MetadataValue {
    pub fn as_text(&self) -> String {
        match self {
            MetadataValue::Text(v) => v.clone(),
            MetadataValue::Timestamp(v) => v.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            MetadataValue::Timestamp(v) => Some(*v),
            MetadataValue::Text(_) => None,
        }
    }
}

/// 画像レベルとEXIFレベルのフィールドを平坦化したキー/値メタデータ。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotoMetadata {
    values: BTreeMap<String, MetadataValue>,
}

impl PhotoMetadata {
    /// キー衝突時はEXIFレベルの値を優先する。
    pub fn from_layers(
        image: BTreeMap<String, MetadataValue>,
        exif: BTreeMap<String, MetadataValue>,
    ) -> Self {
        let mut values = image;
        for (key, value) in exif {
            values.insert(key, value);
        }
        Self { values }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: MetadataValue) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 撮影日時。DateTimeOriginalを優先し、なければDateTimeDigitizedを使う。
    pub fn capture_timestamp(&self) -> Option<NaiveDateTime> {
        ["DateTimeOriginal", "DateTimeDigitized"]
            .iter()
            .find_map(|key| self.values.get(*key).and_then(MetadataValue::as_timestamp))
    }
}
