use crate::domain::model::{OutputFile, Record};
use crate::utils::error::{FwfError, Result};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// CSV with the given header; fields missing from a record are written empty.
pub fn render_csv<'a, I>(header: &[&str], records: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header)?;
    for record in records {
        writer.write_record(header.iter().map(|field| record.get(field).unwrap_or("")))?;
    }
    writer
        .into_inner()
        .map_err(|e| FwfError::processing(format!("Failed to flush CSV buffer: {}", e)))
}

pub fn render_json(records: &[Record]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(records)?)
}

pub fn render_json_lines(records: &[Record]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for record in records {
        serde_json::to_writer(&mut out, record)?;
        out.push(b'\n');
    }
    Ok(out)
}

pub fn zip_outputs(outputs: &[OutputFile]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for output in outputs {
        zip.start_file::<_, ()>(output.name.as_str(), FileOptions::default())?;
        zip.write_all(&output.contents)?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// Makes a record-type key safe to embed in a file name.
///
/// `[A-Za-z0-9-]` pass through; every other byte, `_` included, becomes `_XX`
/// (uppercase hex). Distinct keys always give distinct suffixes.
pub fn sanitize_type_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            out.push(c);
            continue;
        }
        let mut buf = [0u8; 4];
        for byte in c.encode_utf8(&mut buf).bytes() {
            out.push_str(&format!("_{:02X}", byte));
        }
    }
    out
}
