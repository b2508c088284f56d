use async_trait::async_trait;
use log::debug;
use rusoto_ec2::{
    CreateFlowLogsRequest, DescribeNetworkInterfacesRequest, Ec2, Ec2Client, Filter,
    NetworkInterface,
};
use crate::data::{Interface, Tag};
use crate::error::Error;

/// Flow-log subscription parameters.
#[derive(Clone, Debug)]
pub struct FlowLogSpec {
    pub vpc:         String,
    pub destination: String,
    pub format:      String,
    pub interval:    i64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FlowLog {
    Created(Vec<String>),
    Exists,
}

/// Network topology of the monitored VPC.
#[async_trait]
pub trait Topology: Send + Sync {
    async fn interfaces(&self, vpc: &str) -> Result<Vec<Interface>, Error>;

    async fn create_flow_log(&self, spec: &FlowLogSpec) -> Result<FlowLog, Error>;
}

pub struct Ec2Topology<C: Ec2 + Send + Sync> {
    client: C,
}

impl Ec2Topology<Ec2Client> {
    pub fn new(client: Ec2Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: Ec2 + Send + Sync> Topology for Ec2Topology<C> {
    async fn interfaces(&self, vpc: &str) -> Result<Vec<Interface>, Error> {
        let mut interfaces = Vec::new();
        let mut next_token = None;

        loop {
            let request = DescribeNetworkInterfacesRequest {
                filters: Some(vec![Filter {
                    name:   Some("vpc-id".to_owned()),
                    values: Some(vec![vpc.to_owned()]),
                }]),
                next_token: next_token.take(),
                ..Default::default()
            };

            let result = self.client.describe_network_interfaces(request).await.map_err(|e| {
                Error::aws(e, |reason| Error::Lookup { vpc: vpc.to_owned(), reason })
            })?;

            let page = result.network_interfaces.unwrap_or_default();
            interfaces.extend(page.into_iter().filter_map(interface));

            match result.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _                                => break,
            }
        }

        debug!("found {} interfaces in {}", interfaces.len(), vpc);

        Ok(interfaces)
    }

    async fn create_flow_log(&self, spec: &FlowLogSpec) -> Result<FlowLog, Error> {
        let request = CreateFlowLogsRequest {
            resource_ids:             vec![spec.vpc.clone()],
            resource_type:            "VPC".to_owned(),
            traffic_type:             "ALL".to_owned(),
            log_destination:          Some(spec.destination.clone()),
            log_destination_type:     Some("s3".to_owned()),
            log_format:               Some(spec.format.clone()),
            max_aggregation_interval: Some(spec.interval),
            ..Default::default()
        };

        let failed = |reason: String| Error::Provisioning {
            op:       "create flow log for",
            resource: spec.vpc.clone(),
            reason,
        };

        let result = match self.client.create_flow_logs(request).await {
            Ok(result)                               => result,
            Err(e) if already_exists(&e.to_string()) => return Ok(FlowLog::Exists),
            Err(e)                                   => return Err(Error::aws(e, failed)),
        };

        let errors = result.unsuccessful.unwrap_or_default().into_iter().flat_map(|item| {
            let error = item.error?;
            Some(format!("{}: {}", error.code.unwrap_or_default(), error.message.unwrap_or_default()))
        }).collect::<Vec<_>>();

        created(result.flow_log_ids.unwrap_or_default(), errors).map_err(failed)
    }
}

fn created(ids: Vec<String>, errors: Vec<String>) -> Result<FlowLog, String> {
    match ids {
        ids if !ids.is_empty()                        => Ok(FlowLog::Created(ids)),
        _ if errors.is_empty()                        => Err("no flow log created".to_owned()),
        _ if errors.iter().all(|e| already_exists(e)) => Ok(FlowLog::Exists),
        _                                             => Err(errors.join(", ")),
    }
}

pub fn already_exists(reason: &str) -> bool {
    reason.contains("AlreadyExists") || reason.contains("already exists")
}

fn interface(iface: NetworkInterface) -> Option<Interface> {
    let tags = iface.tag_set.unwrap_or_default().into_iter().flat_map(|tag| {
        Some(Tag {
            key:   tag.key?,
            value: tag.value.unwrap_or_default(),
        })
    }).collect();

    Some(Interface {
        address:     iface.private_ip_address?,
        description: iface.description.filter(|d| !d.is_empty()),
        tags,
    })
}
