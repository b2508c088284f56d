use std::collections::HashMap;
use std::str::FromStr;
use anyhow::{anyhow, Result};

/// Sink argument in the form `name,key=value,key=value`.
#[derive(Debug)]
pub struct Args {
    args: HashMap<String, String>,
}

impl Args {
    pub fn parse(args: &str) -> Result<(&str, Self)> {
        let mut split = args.splitn(2, ',');
        let sink = split.next().unwrap_or("");
        let rest = split.next().unwrap_or("");

        let args = rest.split(',').flat_map(|str| {
            let (k, v) = str.split_once('=')?;
            Some((k.to_owned(), v.to_owned()))
        }).collect::<HashMap<_, _>>();

        Ok((sink, Self { args }))
    }

    pub fn opt(&self, name: &str) -> Option<&str> {
        self.args.get(name).map(String::as_str)
    }

    pub fn get_or<T: FromStr>(&self, name: &str, default: T) -> Result<T> {
        match self.opt(name) {
            Some(value) => value.parse().map_err(|_| {
                anyhow!("invalid value for '{}': {}", name, value)
            }),
            None        => Ok(default),
        }
    }
}
