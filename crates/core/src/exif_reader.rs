use crate::metadata::{MetadataValue, PhotoMetadata};
use anyhow::{Context as _, Result};
use chrono::NaiveDateTime;
use exif::{Context, In, Reader, Tag};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// 画像ファイルからEXIFを読み、平坦なメタデータに変換する。
///
/// 主画像のTIFFフィールドを画像レベル、Exif IFDのフィールドをEXIFレベル
/// として集め、キー衝突時はEXIFレベルを優先する。
pub fn read_photo_metadata(path: &Path) -> Result<PhotoMetadata> {
    let file = File::open(path)
        .with_context(|| format!("EXIF読み込み対象を開けませんでした: {}", path.display()))?;
    let mut buf = BufReader::new(file);
    let exif = Reader::new()
        .read_from_container(&mut buf)
        .with_context(|| format!("EXIFを解析できませんでした: {}", path.display()))?;

    let mut image_layer = BTreeMap::new();
    let mut exif_layer = BTreeMap::new();

    for field in exif.fields() {
        if field.ifd_num != In::PRIMARY {
            continue;
        }

        let layer = match field.tag.context() {
            Context::Tiff => &mut image_layer,
            Context::Exif => &mut exif_layer,
            _ => continue,
        };

        let name = format!("{}", field.tag);
        let value = match field.tag {
            Tag::DateTimeOriginal | Tag::DateTimeDigitized | Tag::DateTime => {
                field_value(field, &exif).map(|raw| match parse_timestamp(&raw) {
                    Some(timestamp) => MetadataValue::Timestamp(timestamp),
                    None => MetadataValue::Text(raw),
                })
            }
            _ => field_value(field, &exif).map(MetadataValue::Text),
        };

        if let Some(value) = value {
            layer.insert(name, value);
        }
    }

    Ok(PhotoMetadata::from_layers(image_layer, exif_layer))
}

fn field_value(field: &exif::Field, exif: &exif::Exif) -> Option<String> {
    // ASCII値はdisplay_valueだと引用符付きで描画されるため生の文字列を使う。
    let rendered = match &field.value {
        exif::Value::Ascii(components) => components
            .iter()
            .map(|component| String::from_utf8_lossy(component).into_owned())
            .collect::<Vec<_>>()
            .join(" "),
        _ => field.display_value().with_unit(exif).to_string(),
    };
    let trimmed = rendered.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let normalized = input.trim();

    let candidates = [
        "%Y:%m:%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    for fmt in candidates {
        if let Ok(naive) = NaiveDateTime::parse_from_str(normalized, fmt) {
            return Some(naive);
        }
    }

    None
}
