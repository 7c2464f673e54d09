//! Deterministic public URL derivation.

/// How public object URLs are formed for a deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicUrlScheme {
    /// Virtual-hosted AWS style: `https://{container}.s3.{region}.amazonaws.com/{key}`.
    AwsVirtualHosted {
        /// AWS region of the containers.
        region: String,
    },
    /// Path style under a base URL: `{base}/{container}/{key}`.
    PathStyle {
        /// Base URL without trailing slash.
        base: String,
    },
}

impl PublicUrlScheme {
    /// Pick the scheme from the storage settings: an explicit public base
    /// wins, then a custom endpoint, then AWS virtual-hosted style.
    pub fn resolve(public_base_url: Option<&str>, endpoint: Option<&str>, region: &str) -> Self {
        let non_empty = |b: &&str| !b.is_empty();
        match public_base_url.filter(non_empty).or(endpoint.filter(non_empty)) {
            Some(base) => Self::PathStyle {
                base: base.trim_end_matches('/').to_string(),
            },
            None => Self::AwsVirtualHosted {
                region: region.to_string(),
            },
        }
    }

    /// URL of `key` inside `container`.
    pub fn url(&self, container: &str, key: &str) -> String {
        let key = key.trim_start_matches('/');
        match self {
            Self::AwsVirtualHosted { region } => {
                format!("https://{container}.s3.{region}.amazonaws.com/{key}")
            }
            Self::PathStyle { base } => format!("{base}/{container}/{key}"),
        }
    }
}
