use log::info;
use crate::error::Error;
use crate::schema;
use crate::storage::{Bucket, Storage};
use crate::topology::{FlowLog, FlowLogSpec, Topology};

/// Longest aggregation interval a flow-log subscription accepts.
pub const AGGREGATION_INTERVAL: i64 = 600;

/// Make sure the bucket exists and the VPC flow logs are delivered to
/// it. Both steps succeed when the resource is already in place.
pub async fn provision<S, T>(storage: &S, topology: &T, region: &str, vpc: &str, bucket: &str) -> Result<(), Error>
    where S: Storage + ?Sized,
          T: Topology + ?Sized
{
    match storage.create_bucket(bucket, region).await? {
        Bucket::Created => info!("created bucket {}", bucket),
        Bucket::Exists  => info!("bucket {} already exists", bucket),
    }

    let spec = FlowLogSpec {
        vpc:         vpc.to_owned(),
        destination: format!("arn:aws:s3:::{}", bucket),
        format:      schema::log_format(),
        interval:    AGGREGATION_INTERVAL,
    };

    match topology.create_flow_log(&spec).await? {
        FlowLog::Created(ids) => info!("created flow log {} for {}", ids.join(","), vpc),
        FlowLog::Exists       => info!("flow log for {} already exists", vpc),
    }

    Ok(())
}
