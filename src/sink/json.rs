use std::io::{self, Write};
use serde::Serialize;
use crate::data::FlowRecord;
use crate::rank::duration;

/// One JSON document per ranked record.
pub struct Json {
    pretty: bool,
}

#[derive(Serialize)]
struct Entry<'a> {
    duration: i64,
    #[serde(flatten)]
    record:   &'a FlowRecord,
}

impl Json {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn write<W: Write>(&self, w: &mut W, records: &[FlowRecord]) -> io::Result<()> {
        for record in records {
            let entry = Entry { duration: duration(record), record };
            match self.pretty {
                true  => serde_json::to_writer_pretty(&mut *w, &entry)?,
                false => serde_json::to_writer(&mut *w, &entry)?,
            }
            writeln!(w)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use super::*;

    #[test]
    fn record_per_line() {
        let record = FlowRecord {
            src:   "web-1".to_owned(),
            start: "1000".to_owned(),
            end:   "1042".to_owned(),
            ..Default::default()
        };

        let mut buf = Vec::new();
        Json::new(false).write(&mut buf, &[record.clone(), record]).unwrap();
        let out = String::from_utf8(buf).unwrap();

        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);

        let value: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["duration"], 42);
        assert_eq!(value["src"], "web-1");
        assert_eq!(value["end"], "1042");
    }
}
