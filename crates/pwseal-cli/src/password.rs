//! Password resolution for the CLI

use anyhow::{bail, Context, Result};
use tracing::warn;
use zeroize::Zeroizing;

/// Pick the password from the flag/environment, or ask for it
///
/// `confirm` asks twice and rejects a mismatch, for sealing new envelopes.
pub fn resolve_password<P>(
    given: Option<String>,
    confirm: bool,
    mut prompt: P,
) -> Result<Zeroizing<String>>
where
    P: FnMut(&str) -> std::io::Result<String>,
{
    let password = match given {
        Some(password) => Zeroizing::new(password),
        None => {
            let password = Zeroizing::new(prompt("Password: ").context("Failed to read password")?);
            if confirm {
                let again = Zeroizing::new(
                    prompt("Confirm password: ").context("Failed to read password")?,
                );
                if *password != *again {
                    bail!("Passwords do not match");
                }
            }
            password
        }
    };

    if password.is_empty() {
        warn!("Using an empty password");
    }

    Ok(password)
}
