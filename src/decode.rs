use std::io::Read;
use flate2::read::GzDecoder;
use log::{debug, warn};
use crate::data::{FlowRecord, LabelMap};
use crate::error::Error;
use crate::schema::{self, Field, DELIMITER};

/// How labels are applied to a decoded batch.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Substitution {
    /// Replace only the source and destination address fields.
    Fields,
    /// Replace every occurrence of an address anywhere in the document,
    /// matching the behavior of older flow-log tooling.
    Text,
}

#[derive(Clone, Debug)]
pub struct Decoder {
    substitution: Substitution,
}

impl Decoder {
    pub fn new(substitution: Substitution) -> Self {
        Self { substitution }
    }

    pub fn decode(&self, raw: &[u8], labels: Option<&LabelMap>) -> Result<Vec<FlowRecord>, Error> {
        let text = decompress(raw)?;
        let mut doc = normalize(&text);

        let labels = labels.filter(|map| !map.is_empty());

        if let (Some(labels), Substitution::Text) = (labels, self.substitution) {
            doc = overlay(doc, labels);
        }

        let mut records = parse(&doc);

        if let (Some(labels), Substitution::Fields) = (labels, self.substitution) {
            for record in &mut records {
                relabel(record, labels);
            }
        }

        debug!("decoded {} records", records.len());

        Ok(records)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(Substitution::Fields)
    }
}

pub fn decompress(raw: &[u8]) -> Result<String, Error> {
    let mut text = String::new();
    GzDecoder::new(raw).read_to_string(&mut text).map_err(|e| {
        Error::Decode(e.to_string())
    })?;
    Ok(text)
}

/// Prefix the field header and turn the space delimited batch into a
/// comma delimited document. Values containing spaces would be split.
pub fn normalize(text: &str) -> String {
    let doc = format!("{}\n{}", schema::header(), text);
    doc.replace(' ', &DELIMITER.to_string())
}

fn overlay(mut doc: String, labels: &LabelMap) -> String {
    let mut keys = labels.keys().collect::<Vec<_>>();
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    for key in keys {
        doc = doc.replace(key.as_str(), &labels[key]);
    }

    doc
}

fn relabel(record: &mut FlowRecord, labels: &LabelMap) {
    for addr in [&mut record.src, &mut record.dst] {
        if let Some(label) = labels.get(addr.as_str()) {
            *addr = label.clone();
        }
    }
}

/// Split a normalized document into records using its header line to
/// map columns to fields. Rows with the wrong number of columns are
/// dropped.
pub fn parse(doc: &str) -> Vec<FlowRecord> {
    let mut lines = doc.lines();

    let columns = match lines.next() {
        Some(header) => header.split(DELIMITER).map(schema::field).collect::<Vec<_>>(),
        None         => return Vec::new(),
    };

    let mut records = Vec::new();

    for (n, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let row = line.split(DELIMITER).collect::<Vec<_>>();

        if schema::is_template_row(&row) {
            continue;
        }

        if row.len() != columns.len() {
            warn!("dropping row {}: {} fields, expected {}", n + 1, row.len(), columns.len());
            continue;
        }

        records.push(record(&columns, &row));
    }

    records
}

fn record(columns: &[Option<&Field>], row: &[&str]) -> FlowRecord {
    let mut record = FlowRecord::default();
    for (field, value) in columns.iter().zip(row) {
        if let Some(field) = field {
            (field.set)(&mut record, value.to_string());
        }
    }
    record
}
