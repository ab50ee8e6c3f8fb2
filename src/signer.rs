//! Price signing through a detached signer executable
//!
//! The signer is invoked as `<signer> --private-key <key> --price <exact>` and
//! prints `{"address": .., "signature": ..}` on stdout. Any stderr output is
//! treated as a failure.

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;

use crate::config::{OracleConfig, SignerConfig};
use crate::error::{MedianatorError, Result};
use crate::medianator::{normalize_oracle, OraclePrice};

const COLLABORATOR: &str = "signer";

#[async_trait]
pub trait PriceSigner: Send + Sync {
    /// Address the signatures are expected to come from
    fn oracle_address(&self) -> &str;

    async fn sign(&self, price: &OraclePrice) -> Result<String>;
}

pub struct CommandSigner {
    path: String,
    private_key: String,
    oracle_address: String,
}

impl CommandSigner {
    pub fn new(signer: &SignerConfig, oracle: &OracleConfig) -> Self {
        Self {
            path: signer.path.clone(),
            private_key: oracle.private_key.clone(),
            oracle_address: oracle.address.clone(),
        }
    }
}

#[async_trait]
impl PriceSigner for CommandSigner {
    fn oracle_address(&self) -> &str {
        &self.oracle_address
    }

    async fn sign(&self, price: &OraclePrice) -> Result<String> {
        tracing::debug!(signer = %self.path, price = %price, "Invoking signer");

        let output = Command::new(&self.path)
            .arg("--private-key")
            .arg(&self.private_key)
            .arg("--price")
            .arg(price.to_exact())
            .output()
            .await
            .map_err(|e| MedianatorError::collaborator(COLLABORATOR, format!("failed to run {}: {}", self.path, e)))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            return Err(MedianatorError::collaborator(COLLABORATOR, stderr.trim()));
        }
        if !output.status.success() {
            return Err(MedianatorError::collaborator(
                COLLABORATOR,
                format!("{} exited with {}", self.path, output.status),
            ));
        }

        verify_signer_output(&String::from_utf8_lossy(&output.stdout), &self.oracle_address)
    }
}

/// Check the signer's JSON output and extract the signature
pub fn verify_signer_output(stdout: &str, expected_address: &str) -> Result<String> {
    let output: Value = serde_json::from_str(stdout.trim()).map_err(|e| {
        MedianatorError::collaborator(COLLABORATOR, format!("signer output is not JSON: {}", e))
    })?;

    let address = output.get("address").and_then(Value::as_str);
    if address.map(normalize_oracle) != Some(normalize_oracle(expected_address)) {
        return Err(MedianatorError::SignatureMismatch {
            expected: expected_address.to_string(),
            actual: address.unwrap_or("<missing>").to_string(),
        });
    }

    match output.get("signature") {
        Some(Value::String(signature)) => Ok(signature.clone()),
        other => Err(MedianatorError::SignatureFormat {
            found: other.map(Value::to_string).unwrap_or_else(|| "<missing>".to_string()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORACLE: &str = "aleo1oracleaddress";

    #[test]
    fn accepts_matching_address_any_case() {
        let stdout = r#"{"address":"ALEO1ORACLEADDRESS","signature":"sign1abc"}"#;
        assert_eq!(verify_signer_output(stdout, ORACLE).unwrap(), "sign1abc");
    }

    #[test]
    fn rejects_other_address() {
        let stdout = r#"{"address":"aleo1someoneelse","signature":"sign1abc"}"#;
        assert_eq!(
            verify_signer_output(stdout, ORACLE).unwrap_err(),
            MedianatorError::SignatureMismatch {
                expected: ORACLE.to_string(),
                actual: "aleo1someoneelse".to_string(),
            }
        );
    }

    #[test]
    fn missing_address_is_mismatch() {
        let err = verify_signer_output(r#"{"signature":"sign1abc"}"#, ORACLE).unwrap_err();
        assert!(matches!(err, MedianatorError::SignatureMismatch { .. }));
    }

    #[test]
    fn non_string_signature_is_format_error() {
        let stdout = r#"{"address":"aleo1oracleaddress","signature":42}"#;
        assert_eq!(
            verify_signer_output(stdout, ORACLE).unwrap_err(),
            MedianatorError::SignatureFormat {
                found: "42".to_string()
            }
        );
    }

    #[test]
    fn garbage_output_is_collaborator_error() {
        let err = verify_signer_output("segfault", ORACLE).unwrap_err();
        assert!(matches!(err, MedianatorError::Collaborator { collaborator: "signer", .. }));
    }

    #[tokio::test]
    async fn missing_executable_is_collaborator_error() {
        let signer = CommandSigner {
            path: "/nonexistent/medianator-sign".to_string(),
            private_key: "APrivateKey1zkp".to_string(),
            oracle_address: ORACLE.to_string(),
        };
        let err = signer
            .sign(&OraclePrice::from_raw_price(1_000_000i64))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("signer failed: failed to run"));
    }
}
