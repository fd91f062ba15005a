//! Subcommand implementations

use std::path::Path;

use anyhow::{Context, Result};
use pwseal_core::{EnvelopeLayout, KdfParams, SealPool};
use serde::Serialize;
use tracing::info;

use crate::io::{read_input, write_output};

/// Seal the input and write the envelope text followed by a newline
pub async fn encrypt(
    pool: &SealPool,
    password: &str,
    input: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let plaintext = read_input(input)?;
    let size = plaintext.len();

    let mut envelope = pool
        .encrypt(password.as_bytes(), plaintext)
        .await
        .context("Failed to encrypt")?;
    envelope.push('\n');

    write_output(output, envelope.as_bytes())?;
    info!("Sealed {} bytes", size);
    Ok(())
}

/// Open the envelope read from the input and write the plaintext
pub async fn decrypt(
    pool: &SealPool,
    password: &str,
    input: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let envelope = read_input(input)?;

    let plaintext = pool
        .decrypt(password.as_bytes(), envelope.trim_ascii())
        .await
        .context("Failed to decrypt")?;

    write_output(output, &plaintext)?;
    info!("Opened {} bytes", plaintext.len());
    Ok(())
}

/// Structural report on an envelope
#[derive(Debug, Serialize)]
pub struct InspectReport {
    #[serde(flatten)]
    pub layout: EnvelopeLayout,
    pub encoded_len: usize,
    pub kdf: KdfParams,
}

impl InspectReport {
    pub fn new(envelope: &[u8]) -> Result<Self> {
        let layout = EnvelopeLayout::inspect(envelope.trim_ascii()).context("Not a valid envelope")?;
        Ok(Self {
            layout,
            encoded_len: layout.encoded_len(),
            kdf: KdfParams::STANDARD,
        })
    }

    pub fn render_text(&self) -> String {
        let l = &self.layout;
        format!(
            "nonce       {:>6} bytes\n\
             ciphertext  {:>6} bytes\n\
             tag         {:>6} bytes\n\
             salt        {:>6} bytes\n\
             total       {:>6} bytes ({} base64 chars)\n\
             kdf         scrypt N=2^{} r={} p={}\n",
            l.nonce_len,
            l.ciphertext_len,
            l.tag_len,
            l.salt_len,
            l.total_len,
            self.encoded_len,
            self.kdf.log_n,
            self.kdf.r,
            self.kdf.p,
        )
    }
}

/// Print region sizes of the envelope read from the input
pub fn inspect(input: Option<&Path>, json: bool) -> Result<()> {
    let envelope = read_input(input)?;
    let report = InspectReport::new(&envelope)?;

    let rendered = if json {
        let mut out = serde_json::to_string_pretty(&report)?;
        out.push('\n');
        out
    } else {
        report.render_text()
    };

    write_output(None, rendered.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.txt");
        let sealed = dir.path().join("sealed.txt");
        let opened = dir.path().join("opened.txt");
        std::fs::write(&plain, b"test data").unwrap();

        let pool = SealPool::new(1);
        encrypt(&pool, "secret", Some(&plain), Some(&sealed)).await.unwrap();

        let text = std::fs::read_to_string(&sealed).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.trim_end().len(), 92);

        decrypt(&pool, "secret", Some(&sealed), Some(&opened)).await.unwrap();
        assert_eq!(std::fs::read(&opened).unwrap(), b"test data");
    }

    #[tokio::test]
    async fn test_wrong_password_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let sealed = dir.path().join("sealed.txt");
        let opened = dir.path().join("opened.txt");

        let envelope = pwseal_core::encrypt("secret", b"test data").unwrap();
        std::fs::write(&sealed, envelope).unwrap();

        let pool = SealPool::new(1);
        let err = decrypt(&pool, "wrong", Some(&sealed), Some(&opened))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Failed to decrypt"));
        assert!(!opened.exists());
    }

    #[test]
    fn test_inspect_report() {
        let envelope = pwseal_core::encrypt("secret", b"test data").unwrap();
        let report = InspectReport::new(format!("{}\n", envelope).as_bytes()).unwrap();

        assert_eq!(report.layout.ciphertext_len, 9);
        assert_eq!(report.encoded_len, 92);

        let text = report.render_text();
        assert!(text.contains("ciphertext       9 bytes"));
        assert!(text.contains("scrypt N=2^15 r=8 p=1"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total_len"], 69);
        assert_eq!(json["kdf"]["log_n"], 15);
    }

    #[test]
    fn test_inspect_rejects_garbage() {
        let err = InspectReport::new(b"not-base64!!").unwrap_err();
        assert!(err.to_string().contains("Not a valid envelope"));
    }
}
