use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, trace};
use rusoto_core::RusotoError;
use rusoto_s3::{
    CreateBucketConfiguration, CreateBucketError, CreateBucketRequest, GetObjectRequest,
    ListObjectsV2Request, Object, S3, S3Client,
};
use tokio::io::AsyncReadExt;
use crate::data::Batch;
use crate::error::Error;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Bucket {
    Created,
    Exists,
}

/// Object storage holding flow-log batches.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Every object in the bucket, across all listing pages.
    async fn list(&self, bucket: &str) -> Result<Vec<Batch>, Error>;

    async fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>, Error>;

    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<Bucket, Error>;
}

pub struct S3Storage<S: S3 + Send + Sync> {
    client: S,
}

impl S3Storage<S3Client> {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<S: S3 + Send + Sync> Storage for S3Storage<S> {
    async fn list(&self, bucket: &str) -> Result<Vec<Batch>, Error> {
        let mut batches = Vec::new();
        let mut continuation_token = None;

        loop {
            let request = ListObjectsV2Request {
                bucket:             bucket.to_owned(),
                continuation_token: continuation_token.take(),
                ..Default::default()
            };

            let output = self.client.list_objects_v2(request).await.map_err(|e| {
                Error::aws(e, |reason| Error::Listing { bucket: bucket.to_owned(), reason })
            })?;

            let contents = output.contents.unwrap_or_default();
            batches.extend(contents.into_iter().filter_map(batch));

            match (output.is_truncated, output.next_continuation_token) {
                (Some(true), Some(token)) => continuation_token = Some(token),
                _                         => break,
            }
        }

        trace!("listed {} objects in {}", batches.len(), bucket);

        Ok(batches)
    }

    async fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>, Error> {
        let failed = |reason: String| Error::Download {
            key:    key.to_owned(),
            reason,
        };

        let output = self.client.get_object(GetObjectRequest {
            bucket: bucket.to_owned(),
            key:    key.to_owned(),
            ..Default::default()
        }).await.map_err(|e| Error::aws(e, failed))?;

        let body = output.body.ok_or_else(|| failed("empty body".to_owned()))?;

        let size = output.content_length.unwrap_or_default().max(1024) as usize;
        let mut bytes = Vec::with_capacity(size);
        body.into_async_read().read_to_end(&mut bytes).await.map_err(|e| {
            failed(e.to_string())
        })?;

        debug!("fetched {} bytes from {}", bytes.len(), key);

        Ok(bytes)
    }

    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<Bucket, Error> {
        let configuration = match region {
            "us-east-1" => None,
            region      => Some(CreateBucketConfiguration {
                location_constraint: Some(region.to_owned()),
            }),
        };

        let request = CreateBucketRequest {
            bucket:                      bucket.to_owned(),
            create_bucket_configuration: configuration,
            ..Default::default()
        };

        let exists = |e: &RusotoError<CreateBucketError>| matches!(e,
            RusotoError::Service(CreateBucketError::BucketAlreadyExists(_)) |
            RusotoError::Service(CreateBucketError::BucketAlreadyOwnedByYou(_))
        );

        match self.client.create_bucket(request).await {
            Ok(_)                => Ok(Bucket::Created),
            Err(e) if exists(&e) => Ok(Bucket::Exists),
            Err(e)               => Err(Error::aws(e, |reason| Error::Provisioning {
                op:       "create bucket",
                resource: bucket.to_owned(),
                reason,
            })),
        }
    }
}

fn batch(object: Object) -> Option<Batch> {
    let key  = object.key?;
    let time = object.last_modified?;
    match DateTime::parse_from_rfc3339(&time) {
        Ok(time) => Some(Batch {
            key,
            last_modified: time.with_timezone(&Utc),
        }),
        Err(e) => {
            debug!("ignoring {}: invalid last modified '{}': {}", key, time, e);
            None
        }
    }
}
