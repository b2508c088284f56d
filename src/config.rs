use std::time::Duration;
use rusoto_core::Region;
use crate::decode::Substitution;
use crate::error::Error;
use crate::rank::Bound;

#[derive(Clone, Debug)]
pub struct Config {
    pub region:       String,
    pub endpoint:     Option<String>,
    pub vpc:          String,
    pub bucket:       String,
    pub limit:        usize,
    pub bound:        Bound,
    pub substitution: Substitution,
    pub interval:     Duration,
    pub timeout:      Duration,
    pub refresh:      Option<Duration>,
    pub max_age:      Option<Duration>,
    pub provision:    bool,
}

impl Config {
    pub fn new(region: &str, vpc: &str, limit: usize) -> Self {
        Self {
            region:       region.to_owned(),
            endpoint:     None,
            vpc:          vpc.to_owned(),
            bucket:       bucket(vpc),
            limit,
            bound:        Bound::Exclusive,
            substitution: Substitution::Fields,
            interval:     Duration::from_secs(60),
            timeout:      Duration::from_secs(30),
            refresh:      None,
            max_age:      None,
            provision:    true,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.interval < Duration::from_secs(1) {
            let msg = format!("interval {:?} is below one second", self.interval);
            return Err(Error::Configuration(msg));
        }
        Ok(())
    }

    /// AWS region, or a custom endpoint signing as that region.
    pub fn region(&self) -> Result<Region, Error> {
        match &self.endpoint {
            Some(endpoint) => Ok(Region::Custom {
                name:     self.region.clone(),
                endpoint: endpoint.clone(),
            }),
            None => self.region.parse().map_err(|e| {
                Error::Configuration(format!("region '{}': {}", self.region, e))
            }),
        }
    }
}

/// Bucket the flow-log subscription for `vpc` writes into.
pub fn bucket(vpc: &str) -> String {
    format!("{}-vpc-flow-logs", vpc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::new("us-west-2", "vpc-0abc", 5);
        assert_eq!(config.bucket, "vpc-0abc-vpc-flow-logs");
        assert_eq!(config.bound, Bound::Exclusive);
        assert_eq!(config.interval, Duration::from_secs(60));
        assert_eq!(config.region().unwrap(), Region::UsWest2);
    }

    #[test]
    fn invalid_region() {
        let config = Config::new("mars-1", "vpc-0abc", 5);
        let err = config.region().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn zero_interval_rejected() {
        let mut config = Config::new("us-east-1", "vpc-0abc", 5);
        assert!(config.validate().is_ok());

        config.interval = Duration::ZERO;
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn custom_endpoint() {
        let mut config = Config::new("us-east-1", "vpc-0abc", 5);
        config.endpoint = Some("http://localhost:4566".to_owned());
        assert_eq!(config.region().unwrap(), Region::Custom {
            name:     "us-east-1".to_owned(),
            endpoint: "http://localhost:4566".to_owned(),
        });
    }
}
