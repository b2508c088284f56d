use std::sync::Arc;
use std::time::{Duration, Instant};
use log::{debug, warn};
use parking_lot::RwLock;
use crate::data::{Interface, LabelMap};
use crate::error::Error;
use crate::topology::Topology;

/// Label for every interface address: the first tag whose key contains
/// `Name`, then the description, then `unknown`.
pub fn resolve(interfaces: &[Interface]) -> LabelMap {
    interfaces.iter().map(|iface| {
        (iface.address.clone(), label(iface))
    }).collect()
}

fn label(iface: &Interface) -> String {
    let tag = iface.tags.iter().find(|t| t.key.contains("Name"));
    match (tag, &iface.description) {
        (Some(tag), _)   => tag.value.clone(),
        (None, Some(d))  => d.clone(),
        (None, None)     => "unknown".to_owned(),
    }
}

/// Labels for one VPC, resolved on first use and reused until `refresh`
/// elapses. Without a refresh interval the first successful resolve is
/// kept for the life of the process.
pub struct Labels {
    vpc:     String,
    refresh: Option<Duration>,
    current: RwLock<Option<(Instant, Arc<LabelMap>)>>,
}

impl Labels {
    pub fn new(vpc: &str, refresh: Option<Duration>) -> Self {
        Self {
            vpc:     vpc.to_owned(),
            refresh,
            current: RwLock::new(None),
        }
    }

    /// Current labels, or `None` when they cannot be resolved and
    /// records should pass through unlabeled. Only fatal lookup errors
    /// are returned.
    pub async fn get<T: Topology + ?Sized>(&self, topology: &T) -> Result<Option<Arc<LabelMap>>, Error> {
        if let Some(labels) = self.cached() {
            return Ok(Some(labels));
        }

        match topology.interfaces(&self.vpc).await {
            Ok(interfaces) => {
                let labels = Arc::new(resolve(&interfaces));
                debug!("resolved {} labels for {}", labels.len(), self.vpc);
                *self.current.write() = Some((Instant::now(), labels.clone()));
                Ok(Some(labels))
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!("{}, records will be unlabeled", e);
                Ok(None)
            }
        }
    }

    fn cached(&self) -> Option<Arc<LabelMap>> {
        let current = self.current.read();
        let (at, labels) = (*current).as_ref()?;
        match self.refresh {
            Some(refresh) if at.elapsed() >= refresh => None,
            _                                        => Some(labels.clone()),
        }
    }
}
