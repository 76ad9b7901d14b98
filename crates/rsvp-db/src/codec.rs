//! Row codec for the flat-file tables.
//!
//! Rows are comma-separated, `\n`-terminated, with standard CSV quoting: a
//! field containing a comma, a double quote or a line break is wrapped in
//! quotes and inner quotes are doubled. Any row therefore round-trips,
//! including free-text messages with commas in them.

use std::io;

use csv::{ByteRecord, ReaderBuilder, Terminator, WriterBuilder};

/// Rows recovered from a table file, plus how many were unusable.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    pub rows: Vec<Vec<String>>,
    /// Rows dropped because they were not valid UTF-8 or had the wrong arity.
    pub skipped: usize,
}

pub fn encode<'a, I>(rows: I) -> Result<Vec<u8>, csv::Error>
where
    I: IntoIterator<Item = &'a Vec<String>>,
{
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record(row)?;
    }

    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| io::Error::new(e.error().kind(), e.to_string()).into())
}

/// Decode every row regardless of field count. Blank lines are ignored.
pub fn decode(bytes: &[u8]) -> Decoded {
    decode_rows(bytes, None)
}

/// Decode only rows with exactly `arity` fields; everything else is skipped.
pub fn decode_table(bytes: &[u8], arity: usize) -> Decoded {
    decode_rows(bytes, Some(arity))
}

fn decode_rows(bytes: &[u8], arity: Option<usize>) -> Decoded {
    let mut decoded = Decoded::default();
    if bytes.is_empty() {
        return decoded;
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut record = ByteRecord::new();
    loop {
        match reader.read_byte_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {}
            // A slice reader cannot fail on I/O, so the only errors here are
            // parse errors; the reader has already moved past the bad row.
            Err(_) => {
                decoded.skipped += 1;
                continue;
            }
        }

        if arity.is_some_and(|n| record.len() != n) {
            decoded.skipped += 1;
            continue;
        }

        match record
            .iter()
            .map(|field| String::from_utf8(field.to_vec()))
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(row) => decoded.rows.push(row),
            Err(_) => decoded.skipped += 1,
        }
    }

    decoded
}
