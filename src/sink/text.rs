use std::io::{self, Write};
use crossterm::style::Stylize;
use crossterm::tty::IsTty;
use crate::data::FlowRecord;
use crate::rank::duration;

const HEAD: &str = "Slowest network calls observed in the last aggregation interval...";
const TAIL: &str = "Waiting for the next aggregation interval to collect flow logs...";

/// Console rendering: a banner, one line per record, a banner.
pub struct Text {
    color: bool,
}

impl Text {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Styled only when stdout is a terminal.
    pub fn terminal() -> Self {
        Self::new(io::stdout().is_tty())
    }

    pub fn write<W: Write>(&self, w: &mut W, records: &[FlowRecord]) -> io::Result<()> {
        self.banner(w, HEAD)?;
        for record in records {
            match self.color {
                true  => writeln!(w, "{}", line(record).cyan())?,
                false => writeln!(w, "{}", line(record))?,
            }
        }
        self.banner(w, TAIL)
    }

    fn banner<W: Write>(&self, w: &mut W, text: &str) -> io::Result<()> {
        match self.color {
            true  => writeln!(w, "{}", text.cyan().underlined()),
            false => writeln!(w, "{}", text),
        }
    }
}

pub fn line(r: &FlowRecord) -> String {
    format!(
        "{} seconds from {{{},{}}} to {{{},{}}} {{Action:{}, Status:{}, TCP:{}}} in {{{}}}",
        duration(r), r.pkt_src, r.src, r.pkt_dst, r.dst, r.action, r.status, r.tcp_flags, r.subnet_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> FlowRecord {
        FlowRecord {
            subnet_id: "subnet-1".to_owned(),
            pkt_src:   "10.0.0.5".to_owned(),
            src:       "web-1".to_owned(),
            pkt_dst:   "10.0.0.9".to_owned(),
            dst:       "10.0.0.9".to_owned(),
            action:    "ACCEPT".to_owned(),
            status:    "OK".to_owned(),
            tcp_flags: "19".to_owned(),
            start:     "1000".to_owned(),
            end:       "1010".to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn line_format() {
        assert_eq!(
            line(&record()),
            "10 seconds from {10.0.0.5,web-1} to {10.0.0.9,10.0.0.9} {Action:ACCEPT, Status:OK, TCP:19} in {subnet-1}"
        );
    }

    #[test]
    fn plain_output() {
        let mut buf = Vec::new();
        Text::new(false).write(&mut buf, &[record(), record()]).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], HEAD);
        assert_eq!(lines[1], line(&record()));
        assert_eq!(lines[3], TAIL);
    }

    #[test]
    fn color_follows_terminal() {
        assert_eq!(Text::terminal().color, io::stdout().is_tty());
    }

    #[test]
    fn banners_without_records() {
        let mut buf = Vec::new();
        Text::new(true).write(&mut buf, &[]).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out.lines().count(), 2);
        assert!(out.contains(HEAD));
        assert!(out.contains(TAIL));
    }
}
