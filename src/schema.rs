use crate::data::FlowRecord;

pub struct Field {
    /// Column name in the normalized document header.
    pub header:   &'static str,
    /// Variable name in the flow-log subscription template.
    pub template: &'static str,
    pub set:      fn(&mut FlowRecord, String),
}

/// Fields in the order the flow-log subscription writes them.
pub static FIELDS: [Field; 16] = [
    Field { header: "subnet_id",        template: "subnet-id",    set: |r, v| r.subnet_id = v },
    Field { header: "instance_name",    template: "instance-id",  set: |r, v| r.instance  = v },
    Field { header: "eni_id",           template: "interface-id", set: |r, v| r.interface = v },
    Field { header: "packet_source_ip", template: "pkt-srcaddr",  set: |r, v| r.pkt_src   = v },
    Field { header: "source_ip",        template: "srcaddr",      set: |r, v| r.src       = v },
    Field { header: "source_port",      template: "srcport",      set: |r, v| r.src_port  = v },
    Field { header: "packet_dest_ip",   template: "pkt-dstaddr",  set: |r, v| r.pkt_dst   = v },
    Field { header: "dest_ip",          template: "dstaddr",      set: |r, v| r.dst       = v },
    Field { header: "dest_port",        template: "dstport",      set: |r, v| r.dst_port  = v },
    Field { header: "action",           template: "action",       set: |r, v| r.action    = v },
    Field { header: "status",           template: "log-status",   set: |r, v| r.status    = v },
    Field { header: "tcp_flags",        template: "tcp-flags",    set: |r, v| r.tcp_flags = v },
    Field { header: "bytes",            template: "bytes",        set: |r, v| r.bytes     = v },
    Field { header: "packets",          template: "packets",      set: |r, v| r.packets   = v },
    Field { header: "start",            template: "start",        set: |r, v| r.start     = v },
    Field { header: "end",              template: "end",          set: |r, v| r.end       = v },
];

pub const DELIMITER: char = ',';

pub fn field(header: &str) -> Option<&'static Field> {
    FIELDS.iter().find(|f| f.header == header)
}

/// Header line prepended to every normalized batch.
pub fn header() -> String {
    let names = FIELDS.iter().map(|f| f.header).collect::<Vec<_>>();
    names.join(&DELIMITER.to_string())
}

/// Record template handed to the flow-log subscription.
pub fn log_format() -> String {
    let vars = FIELDS.iter().map(|f| {
        format!("${{{}}}", f.template)
    }).collect::<Vec<_>>();
    vars.join(" ")
}

/// Batches start with their own line of template names, which carries
/// no flow data.
pub fn is_template_row(row: &[&str]) -> bool {
    row.len() == FIELDS.len() && row.iter().zip(FIELDS.iter()).all(|(v, f)| {
        *v == f.template
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_order() {
        assert_eq!(header(), "subnet_id,instance_name,eni_id,packet_source_ip,source_ip,source_port,packet_dest_ip,dest_ip,dest_port,action,status,tcp_flags,bytes,packets,start,end");
    }

    #[test]
    fn template_order() {
        let format = log_format();
        assert!(format.starts_with("${subnet-id} ${instance-id} ${interface-id} ${pkt-srcaddr}"));
        assert!(format.ends_with("${bytes} ${packets} ${start} ${end}"));
    }

    #[test]
    fn setters_target_their_field() {
        let mut record = FlowRecord::default();
        (field("dest_ip").unwrap().set)(&mut record, "10.0.0.9".to_owned());
        (field("end").unwrap().set)(&mut record, "1010".to_owned());
        assert_eq!(record.dst, "10.0.0.9");
        assert_eq!(record.end, "1010");
        assert!(field("nope").is_none());
    }

    #[test]
    fn template_row() {
        let row = "subnet-id instance-id interface-id pkt-srcaddr srcaddr srcport pkt-dstaddr dstaddr dstport action log-status tcp-flags bytes packets start end";
        let row = row.split(' ').collect::<Vec<_>>();
        assert!(is_template_row(&row));
        assert!(!is_template_row(&row[1..]));
    }
}
