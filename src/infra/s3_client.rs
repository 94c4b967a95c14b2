use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Url;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::app::ports::ObjectStorePort;
use crate::config::Config;
use crate::error::{EtlError, Result};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";
const SIGNED_HEADERS: &str = "host;x-amz-content-sha256;x-amz-date";

/// Fetches objects from an S3-compatible bucket with SigV4-signed GET requests.
pub struct S3Client {
    client: reqwest::Client,
    access_key_id: String,
    secret_access_key: String,
    region: String,
    endpoint: String,
}

/// Headers to attach to a signed request.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedRequest {
    pub url: Url,
    pub amz_date: String,
    pub content_sha256: String,
    pub authorization: String,
}

impl S3Client {
    pub fn from_config(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_key_id: config.aws_access_key_id.clone(),
            secret_access_key: config.aws_secret_access_key.clone(),
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        }
    }

    fn object_url(&self, key: &str) -> Result<Url> {
        let raw = format!("{}/{}", self.endpoint, object_path(key));
        Url::parse(&raw).map_err(|e| EtlError::Config(format!("invalid object URL '{}': {}", raw, e)))
    }

    /// Sign a GET for `key` at the given instant.
    pub fn sign_get(&self, key: &str, now: DateTime<Utc>) -> Result<SignedRequest> {
        let url = self.object_url(key)?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(EtlError::Config(format!("object URL '{}' has no host", url))),
        };

        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date_stamp = now.format("%Y%m%d").to_string();
        let content_sha256 = hex::encode(Sha256::digest(b""));

        let canonical_request = format!(
            "GET\n{}\n\nhost:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n\n{}\n{}",
            url.path(),
            host,
            content_sha256,
            amz_date,
            SIGNED_HEADERS,
            content_sha256
        );

        let scope = format!("{}/{}/{}/aws4_request", date_stamp, self.region, SERVICE);
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let key = signing_key(&self.secret_access_key, &date_stamp, &self.region, SERVICE);
        let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()));
        let authorization = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM, self.access_key_id, scope, SIGNED_HEADERS, signature
        );

        Ok(SignedRequest { url, amz_date, content_sha256, authorization })
    }
}

#[async_trait]
impl ObjectStorePort for S3Client {
    async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        let signed = self.sign_get(key, Utc::now())?;
        debug!("GET {}", signed.url);

        let resp = self
            .client
            .get(signed.url.clone())
            .header("x-amz-date", &signed.amz_date)
            .header("x-amz-content-sha256", &signed.content_sha256)
            .header(reqwest::header::AUTHORIZATION, &signed.authorization)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EtlError::Storage {
                key: key.to_string(),
                message: format!("{} - {}", status, body),
            });
        }

        let bytes = resp.bytes().await?.to_vec();
        info!("Downloaded object '{}' ({} bytes)", key, bytes.len());
        Ok(bytes)
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Derive the SigV4 signing key for a day, region and service.
pub fn signing_key(secret: &str, date_stamp: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{}", secret).as_bytes(), date_stamp.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

/// Percent-encode each segment of an object key, keeping `/` separators.
fn object_path(key: &str) -> String {
    key.trim_start_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment))
        .collect::<Vec<_>>()
        .join("/")
}
