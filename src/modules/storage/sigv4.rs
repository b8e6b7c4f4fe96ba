//! AWS Signature v4 for the S3 calls rust-s3 does not expose (bucket policy)

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::core::error::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SIGNED_HEADERS: &str = "host;x-amz-content-sha256;x-amz-date";

/// Signs requests for one access key and region
#[derive(Debug, Clone)]
pub struct Signer {
    access_key: String,
    secret_key: String,
    region: String,
}

/// Header values for a signed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// `x-amz-date`
    pub amz_date: String,
    /// `x-amz-content-sha256`
    pub payload_hash: String,
    /// `Authorization`
    pub authorization: String,
}

impl Signer {
    pub fn new(access_key: &str, secret_key: &str, region: &str) -> Self {
        Self {
            access_key: access_key.to_string(),
            secret_key: secret_key.to_string(),
            region: region.to_string(),
        }
    }

    /// Sign `method path?query` sent to `host` with `payload` as body
    ///
    /// `query` must already be in canonical form (`policy=` for `?policy`).
    pub fn sign(
        &self,
        method: &str,
        host: &str,
        path: &str,
        query: &str,
        payload: &[u8],
        at: DateTime<Utc>,
    ) -> Result<SignedRequest> {
        let date_stamp = at.format("%Y%m%d").to_string();
        let amz_date = at.format("%Y%m%dT%H%M%SZ").to_string();
        let payload_hash = sha256_hex(payload);

        let canonical_headers = format!(
            "host:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n",
            host, payload_hash, amz_date
        );
        let canonical_request = [
            method,
            path,
            query,
            &canonical_headers,
            SIGNED_HEADERS,
            &payload_hash,
        ]
        .join("\n");

        let scope = format!("{}/{}/s3/aws4_request", date_stamp, self.region);
        let string_to_sign = [
            ALGORITHM,
            &amz_date,
            &scope,
            &sha256_hex(canonical_request.as_bytes()),
        ]
        .join("\n");

        let signature = hex::encode(hmac(&self.signing_key(&date_stamp)?, string_to_sign.as_bytes())?);

        Ok(SignedRequest {
            authorization: format!(
                "{} Credential={}/{}, SignedHeaders={}, Signature={}",
                ALGORITHM, self.access_key, scope, SIGNED_HEADERS, signature
            ),
            amz_date,
            payload_hash,
        })
    }

    /// Derive the per-day signing key: date, region, service, terminator
    fn signing_key(&self, date_stamp: &str) -> Result<Vec<u8>> {
        let secret = format!("AWS4{}", self.secret_key);
        let parts: [&[u8]; 4] = [
            date_stamp.as_bytes(),
            self.region.as_bytes(),
            b"s3",
            b"aws4_request",
        ];
        parts
            .iter()
            .try_fold(secret.into_bytes(), |key, part| hmac(&key, part))
    }
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| AppError::Internal(format!("HMAC key error: {}", e)))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
    }

    fn signer() -> Signer {
        Signer::new("minioadmin", "minioadmin", "us-east-1")
    }

    #[test]
    fn test_headers_carry_date_and_payload_hash() {
        let signed = signer()
            .sign("PUT", "minio:9000", "/lipci-images", "policy=", b"", at())
            .unwrap();

        assert_eq!(signed.amz_date, "20260314T092653Z");
        assert_eq!(signed.payload_hash, EMPTY_SHA256);
        assert!(signed.authorization.starts_with(
            "AWS4-HMAC-SHA256 Credential=minioadmin/20260314/us-east-1/s3/aws4_request, \
             SignedHeaders=host;x-amz-content-sha256;x-amz-date, Signature="
        ));
    }

    #[test]
    fn test_signature_is_deterministic_and_payload_bound() {
        let first = signer()
            .sign("PUT", "minio:9000", "/lipci-images", "policy=", b"{}", at())
            .unwrap();
        let again = signer()
            .sign("PUT", "minio:9000", "/lipci-images", "policy=", b"{}", at())
            .unwrap();
        let other = signer()
            .sign("PUT", "minio:9000", "/lipci-images", "policy=", b"{ }", at())
            .unwrap();

        assert_eq!(first, again);
        assert_ne!(first.authorization, other.authorization);

        let signature = first.authorization.rsplit('=').next().unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
