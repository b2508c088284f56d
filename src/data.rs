use std::collections::HashMap;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Endpoint address to human readable label.
pub type LabelMap = HashMap<String, String>;

/// One decoded flow-log line. Every field is kept as the text found in
/// the batch, timestamps included.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct FlowRecord {
    pub subnet_id:   String,
    pub instance:    String,
    pub interface:   String,
    pub pkt_src:     String,
    pub src:         String,
    pub src_port:    String,
    pub pkt_dst:     String,
    pub dst:         String,
    pub dst_port:    String,
    pub action:      String,
    pub status:      String,
    pub tcp_flags:   String,
    pub bytes:       String,
    pub packets:     String,
    pub start:       String,
    pub end:         String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Batch {
    pub key:           String,
    pub last_modified: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Interface {
    pub address:     String,
    pub description: Option<String>,
    pub tags:        Vec<Tag>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tag {
    pub key:   String,
    pub value: String,
}

impl Batch {
    /// Whether the key looks like a complete flow-log batch rather than
    /// an unrelated or partially written object.
    pub fn is_candidate(&self) -> bool {
        self.key.contains("AWSLogs") && self.key.contains(".gz")
    }
}

impl Tag {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key:   key.to_owned(),
            value: value.to_owned(),
        }
    }
}
