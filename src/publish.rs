//! Publisher — mirror the local markdown output to an R2 bucket.
//!
//! Talks to the S3-compatible R2 API directly with AWS Signature V4
//! authentication over a blocking HTTP client; pure-Rust signing via
//! `hmac` + `sha2`, no AWS SDK. Each run deletes every existing `.md`
//! object under the prefix and re-uploads the local tree. Operations run
//! strictly one at a time; a failed upload aborts the remaining batch and
//! already-uploaded objects stay in place.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

type HmacSha256 = Hmac<Sha256>;

/// R2 credentials and bucket, from the process environment. All four values
/// are required together; validation happens before any network call.
#[derive(Debug)]
pub struct R2Config {
    pub account_id: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
}

impl R2Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            account_id: require("CLOUDFLARE_ACCOUNT_ID")?,
            access_key_id: require("R2_ACCESS_KEY_ID")?,
            secret_access_key: require("R2_SECRET_ACCESS_KEY")?,
            bucket: require("R2_BUCKET_NAME")?,
        })
    }

    fn host(&self) -> String {
        format!("{}.r2.cloudflarestorage.com", self.account_id)
    }
}

fn require(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{} environment variable not set", name))
}

/// Clean the bucket's markdown objects, then upload every local `.md` file,
/// preserving relative paths as object keys.
pub fn publish(config: &R2Config, output_dir: &Path, prefix: Option<&str>) -> Result<()> {
    let client = reqwest::blocking::Client::new();

    let removed = clean_bucket(config, &client, prefix)?;
    println!("Removed {} stale object(s) from r2://{}", removed, config.bucket);

    let mut files = Vec::new();
    collect_markdown(output_dir, &mut files)
        .with_context(|| format!("failed to walk {}", output_dir.display()))?;
    files.sort();

    for path in &files {
        let key = object_key(output_dir, path, prefix);
        let body = std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        if let Err(e) = put_object(config, &client, &key, &body) {
            eprintln!("error: upload failed for {}", key);
            return Err(e);
        }
        println!("Uploaded {}", key);
    }

    Ok(())
}

/// Delete every object under `prefix` whose key ends in `.md`, paginating
/// through continuation tokens. Non-markdown objects are never touched.
fn clean_bucket(
    config: &R2Config,
    client: &reqwest::blocking::Client,
    prefix: Option<&str>,
) -> Result<usize> {
    let mut removed = 0;
    let mut continuation_token: Option<String> = None;

    loop {
        let (keys, next_token) = list_page(config, client, prefix, continuation_token.as_deref())?;

        for key in keys.iter().filter(|k| is_markdown_key(k)) {
            delete_object(config, client, key)?;
            removed += 1;
        }

        match next_token {
            Some(token) => continuation_token = Some(token),
            None => break,
        }
    }

    Ok(removed)
}

/// Whether a bucket-clean pass may delete this key.
fn is_markdown_key(key: &str) -> bool {
    key.ends_with(".md")
}

/// One ListObjectsV2 page: object keys plus the next continuation token.
fn list_page(
    config: &R2Config,
    client: &reqwest::blocking::Client,
    prefix: Option<&str>,
    continuation_token: Option<&str>,
) -> Result<(Vec<String>, Option<String>)> {
    let mut query: Vec<(String, String)> = vec![
        ("list-type".to_string(), "2".to_string()),
        ("max-keys".to_string(), "1000".to_string()),
    ];
    if let Some(prefix) = prefix {
        query.push(("prefix".to_string(), prefix.to_string()));
    }
    if let Some(token) = continuation_token {
        query.push(("continuation-token".to_string(), token.to_string()));
    }
    // Canonical form requires sorted query parameters.
    query.sort();
    let canonical_query: String = query
        .iter()
        .map(|(k, v)| format!("{}={}", uri_encode(k), uri_encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let canonical_uri = format!("/{}", config.bucket);
    let signed = sign(config, "GET", &canonical_uri, &canonical_query, &hex_sha256(b""));

    let url = format!("https://{}{}?{}", config.host(), canonical_uri, canonical_query);
    let resp = apply_headers(client.get(&url), &signed)
        .send()
        .with_context(|| format!("failed to list r2://{}", config.bucket))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        bail!(
            "R2 ListObjectsV2 failed (HTTP {}): {}",
            status,
            body.chars().take(500).collect::<String>()
        );
    }

    let xml = resp.text()?;
    Ok(parse_list_response(&xml))
}

/// Delete one object with a signed DELETE request.
fn delete_object(config: &R2Config, client: &reqwest::blocking::Client, key: &str) -> Result<()> {
    let canonical_uri = format!("/{}/{}", config.bucket, encode_key(key));
    let signed = sign(config, "DELETE", &canonical_uri, "", &hex_sha256(b""));

    let url = format!("https://{}{}", config.host(), canonical_uri);
    let resp = apply_headers(client.delete(&url), &signed)
        .send()
        .with_context(|| format!("failed to delete r2://{}/{}", config.bucket, key))?;

    if !resp.status().is_success() {
        bail!("R2 DeleteObject failed (HTTP {}) for key '{}'", resp.status(), key);
    }
    Ok(())
}

/// Upload one object with a signed PUT request, tagged `text/markdown`.
fn put_object(
    config: &R2Config,
    client: &reqwest::blocking::Client,
    key: &str,
    body: &[u8],
) -> Result<()> {
    let canonical_uri = format!("/{}/{}", config.bucket, encode_key(key));
    let signed = sign(config, "PUT", &canonical_uri, "", &hex_sha256(body));

    let url = format!("https://{}{}", config.host(), canonical_uri);
    let resp = apply_headers(client.put(&url), &signed)
        .header("Content-Type", "text/markdown")
        .body(body.to_vec())
        .send()
        .with_context(|| format!("failed to put r2://{}/{}", config.bucket, key))?;

    if !resp.status().is_success() {
        bail!("R2 PutObject failed (HTTP {}) for key '{}'", resp.status(), key);
    }
    Ok(())
}

// -- AWS SigV4 ----------------------------------------------------------------

struct SignedHeaders {
    authorization: String,
    amz_date: String,
    payload_hash: String,
}

fn apply_headers(
    builder: reqwest::blocking::RequestBuilder,
    signed: &SignedHeaders,
) -> reqwest::blocking::RequestBuilder {
    builder
        .header("Authorization", &signed.authorization)
        .header("x-amz-content-sha256", &signed.payload_hash)
        .header("x-amz-date", &signed.amz_date)
}

/// Build the SigV4 authorization header for one request. R2 uses the
/// `auto` region with the standard `s3` service name.
fn sign(
    config: &R2Config,
    method: &str,
    canonical_uri: &str,
    canonical_query: &str,
    payload_hash: &str,
) -> SignedHeaders {
    let now = Utc::now();
    let date_stamp = now.format("%Y%m%d").to_string();
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let host = config.host();

    let canonical_headers = format!(
        "host:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n",
        host, payload_hash, amz_date
    );
    let signed_headers = "host;x-amz-content-sha256;x-amz-date";

    let canonical_request = format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        method, canonical_uri, canonical_query, canonical_headers, signed_headers, payload_hash
    );

    let credential_scope = format!("{}/auto/s3/aws4_request", date_stamp);
    let string_to_sign = format!(
        "AWS4-HMAC-SHA256\n{}\n{}\n{}",
        amz_date,
        credential_scope,
        hex_sha256(canonical_request.as_bytes())
    );

    let signing_key = derive_signing_key(&config.secret_access_key, &date_stamp);
    let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes()));

    let authorization = format!(
        "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
        config.access_key_id, credential_scope, signed_headers, signature
    );

    SignedHeaders {
        authorization,
        amz_date,
        payload_hash: payload_hash.to_string(),
    }
}

/// kDate = HMAC("AWS4" + secret, date); kRegion = HMAC(kDate, "auto");
/// kService = HMAC(kRegion, "s3"); kSigning = HMAC(kService, "aws4_request").
fn derive_signing_key(secret_key: &str, date_stamp: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{}", secret_key).as_bytes(), date_stamp.as_bytes());
    let k_region = hmac_sha256(&k_date, b"auto");
    let k_service = hmac_sha256(&k_region, b"s3");
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

fn hex_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// RFC 3986 percent-encoding for SigV4 canonical requests: everything but
/// unreserved characters is encoded.
fn uri_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Encode an object key segment-wise, keeping `/` separators literal.
fn encode_key(key: &str) -> String {
    key.split('/').map(uri_encode).collect::<Vec<_>>().join("/")
}

// -- Local tree walking -------------------------------------------------------

/// Recursively collect every `.md` file under `dir`.
fn collect_markdown(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_markdown(&path, files)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("md") {
            files.push(path);
        }
    }
    Ok(())
}

/// Object key for a local file: its path relative to the output root with
/// platform separators normalized to `/`, under the optional prefix.
fn object_key(output_dir: &Path, path: &Path, prefix: Option<&str>) -> String {
    let rel = path
        .strip_prefix(output_dir)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/");
    match prefix {
        Some(p) => format!("{}/{}", p.trim_end_matches('/'), rel),
        None => rel,
    }
}

/// Minimal extraction from a ListObjectsV2 XML response: object keys,
/// plus the continuation token when the listing is truncated.
fn parse_list_response(xml: &str) -> (Vec<String>, Option<String>) {
    let mut keys = Vec::new();
    let mut remaining = xml;
    while let Some(start) = remaining.find("<Contents>") {
        let block_start = start + "<Contents>".len();
        let Some(end) = remaining[block_start..].find("</Contents>") else {
            break;
        };
        let block = &remaining[block_start..block_start + end];
        if let Some(key) = extract_xml_value(block, "Key") {
            if !key.is_empty() {
                keys.push(key);
            }
        }
        remaining = &remaining[block_start + end + "</Contents>".len()..];
    }

    let truncated = extract_xml_value(xml, "IsTruncated").as_deref() == Some("true");
    let next_token = if truncated {
        extract_xml_value(xml, "NextContinuationToken")
    } else {
        None
    };

    (keys, next_token)
}

fn extract_xml_value(xml: &str, tag: &str) -> Option<String> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = xml.find(&open)? + open.len();
    let end = xml[start..].find(&close)?;
    Some(xml[start..start + end].to_string())
}
