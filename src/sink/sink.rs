use std::io::{self, Write};
use std::str::FromStr;
use anyhow::{anyhow, Error, Result};
use crossterm::tty::IsTty;
use crate::data::FlowRecord;
use super::{Args, Json, Text};

pub enum Sink {
    Stdout(Text),
    Json(Json),
}

impl Sink {
    pub fn send(&self, records: &[FlowRecord]) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write(&mut out, records)?;
        out.flush()?;
        Ok(())
    }

    pub fn write<W: Write>(&self, w: &mut W, records: &[FlowRecord]) -> io::Result<()> {
        match self {
            Self::Stdout(t) => t.write(w, records),
            Self::Json(j)   => j.write(w, records),
        }
    }
}

impl Default for Sink {
    fn default() -> Self {
        Self::Stdout(Text::terminal())
    }
}

impl FromStr for Sink {
   type Err = Error;

    fn from_str(arg: &str) -> Result<Self, Self::Err> {
        match Args::parse(arg)? {
            ("stdout", args) => stdout(args),
            ("json",   args) => json(args),
            _                => Err(anyhow!("{}", arg)),
        }
    }
}

fn stdout(args: Args) -> Result<Sink> {
    let color = args.get_or("color", io::stdout().is_tty())?;
    Ok(Sink::Stdout(Text::new(color)))
}

fn json(args: Args) -> Result<Sink> {
    Ok(Sink::Json(Json::new(args.get_or("pretty", false)?)))
}
