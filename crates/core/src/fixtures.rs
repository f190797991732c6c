//! テスト用の最小JPEG/EXIFフィクスチャ生成。

use std::path::Path;

pub const TAG_MAKE: u16 = 0x010f;
pub const TAG_MODEL: u16 = 0x0110;
pub const TAG_DATETIME_ORIGINAL: u16 = 0x9003;
pub const TAG_DATETIME_DIGITIZED: u16 = 0x9004;

/// SOI + Exif APP1 + EOI だけの最小JPEGを組み立てる。
/// `ifd0` はIFD0(画像レベル)、`exif_ifd` はExif IFDのASCIIフィールド。
pub fn jpeg_with_exif(ifd0: &[(u16, &str)], exif_ifd: &[(u16, &str)]) -> Vec<u8> {
    let tiff = build_tiff(ifd0, exif_ifd);

    let mut jpeg = vec![0xff, 0xd8];
    jpeg.extend_from_slice(&[0xff, 0xe1]);
    let segment_len = (2 + 6 + tiff.len()) as u16;
    jpeg.extend_from_slice(&segment_len.to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(&tiff);
    jpeg.extend_from_slice(&[0xff, 0xd9]);
    jpeg
}

pub fn jpeg_with_capture_time(original: Option<&str>, digitized: Option<&str>) -> Vec<u8> {
    let mut exif_ifd = Vec::new();
    if let Some(value) = original {
        exif_ifd.push((TAG_DATETIME_ORIGINAL, value));
    }
    if let Some(value) = digitized {
        exif_ifd.push((TAG_DATETIME_DIGITIZED, value));
    }
    jpeg_with_exif(&[], &exif_ifd)
}

pub fn write_jpeg_with_exif(
    path: &Path,
    ifd0: &[(u16, &str)],
    exif_ifd: &[(u16, &str)],
) -> std::io::Result<()> {
    std::fs::write(path, jpeg_with_exif(ifd0, exif_ifd))
}

pub fn write_jpeg_with_capture_time(
    path: &Path,
    original: Option<&str>,
    digitized: Option<&str>,
) -> std::io::Result<()> {
    std::fs::write(path, jpeg_with_capture_time(original, digitized))
}

const EXIF_IFD_POINTER: u16 = 0x8769;

fn build_tiff(ifd0: &[(u16, &str)], exif_ifd: &[(u16, &str)]) -> Vec<u8> {
    let mut ifd0_entries: Vec<(u16, &str)> = ifd0.to_vec();
    ifd0_entries.sort_by_key(|(tag, _)| *tag);
    let mut exif_entries: Vec<(u16, &str)> = exif_ifd.to_vec();
    exif_entries.sort_by_key(|(tag, _)| *tag);

    // レイアウト: ヘッダ(8) -> IFD0 -> Exif IFD -> 文字列データ領域。
    let ifd0_len = 2 + 12 * (ifd0_entries.len() + 1) + 4;
    let exif_ifd_offset = 8 + ifd0_len;
    let exif_ifd_len = 2 + 12 * exif_entries.len() + 4;
    let data_base = exif_ifd_offset + exif_ifd_len;

    let mut data = Vec::new();

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    push_u16(&mut tiff, 42);
    push_u32(&mut tiff, 8);

    // IFD0: ASCIIフィールド + Exif IFDポインタ。
    push_u16(&mut tiff, (ifd0_entries.len() + 1) as u16);
    for (tag, text) in &ifd0_entries {
        push_ascii_entry(&mut tiff, *tag, text, &mut data, data_base);
    }
    push_u16(&mut tiff, EXIF_IFD_POINTER);
    push_u16(&mut tiff, 4); // LONG
    push_u32(&mut tiff, 1);
    push_u32(&mut tiff, exif_ifd_offset as u32);
    push_u32(&mut tiff, 0); // 次IFDなし

    // Exif IFD。
    push_u16(&mut tiff, exif_entries.len() as u16);
    for (tag, text) in &exif_entries {
        push_ascii_entry(&mut tiff, *tag, text, &mut data, data_base);
    }
    push_u32(&mut tiff, 0);

    tiff.extend_from_slice(&data);
    tiff
}

fn push_ascii_entry(out: &mut Vec<u8>, tag: u16, text: &str, data: &mut Vec<u8>, data_base: usize) {
    let mut bytes = text.as_bytes().to_vec();
    bytes.push(0);

    push_u16(out, tag);
    push_u16(out, 2); // ASCII
    push_u32(out, bytes.len() as u32);
    if bytes.len() <= 4 {
        let mut inline = [0u8; 4];
        inline[..bytes.len()].copy_from_slice(&bytes);
        out.extend_from_slice(&inline);
    } else {
        push_u32(out, (data_base + data.len()) as u32);
        data.extend_from_slice(&bytes);
    }
}

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}
