//! Wallet connection state.
//!
//! The actual connect flow lives in an external provider. The core only keeps
//! the address it handed back and derives the button label from it.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::WalletError;

/// Address-like identifier returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    /// First five characters, used in the "Connected: abcde..." label.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(5) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An external wallet implementation present in the host environment.
pub trait WalletProvider {
    /// Identifier used in logs (e.g. "phantom").
    fn name(&self) -> &str;

    /// Ask the user to connect. Either yields an address or fails.
    fn connect(&mut self) -> Result<WalletAddress, WalletError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalletConnection {
    address: Option<WalletAddress>,
}

impl WalletConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    pub fn address(&self) -> Option<&WalletAddress> {
        self.address.as_ref()
    }

    /// Attempt a connection through `provider`.
    ///
    /// A missing provider is reported to the caller for a blocking notice.
    /// A refusal is logged and leaves the connection state untouched, so the
    /// caller may simply retry.
    pub fn connect(
        &mut self,
        provider: Option<&mut dyn WalletProvider>,
    ) -> Result<&WalletAddress, WalletError> {
        let provider = provider.ok_or(WalletError::ProviderMissing)?;
        match provider.connect() {
            Ok(address) => {
                info!(provider = provider.name(), %address, "Connected to wallet");
                Ok(self.address.insert(address))
            }
            Err(err) => {
                warn!(provider = provider.name(), error = %err, "Wallet connection failed");
                Err(err)
            }
        }
    }

    pub fn label(&self) -> String {
        match &self.address {
            Some(address) => format!("Connected: {}...", address.short()),
            None => "Connect Wallet".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedProvider {
        results: Vec<Result<WalletAddress, WalletError>>,
    }

    impl WalletProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn connect(&mut self) -> Result<WalletAddress, WalletError> {
            self.results.remove(0)
        }
    }

    fn rejected() -> WalletError {
        WalletError::Rejected {
            provider: "scripted".into(),
            reason: "User rejected the request".into(),
        }
    }

    #[test]
    fn missing_provider_changes_nothing() {
        let mut wallet = WalletConnection::new();
        assert_eq!(wallet.connect(None), Err(WalletError::ProviderMissing));
        assert!(!wallet.is_connected());
        assert_eq!(wallet.label(), "Connect Wallet");
    }

    #[test]
    fn rejection_is_retryable() {
        let mut wallet = WalletConnection::new();
        let mut provider = ScriptedProvider {
            results: vec![
                Err(rejected()),
                Ok(WalletAddress("7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU".into())),
            ],
        };

        assert_eq!(wallet.connect(Some(&mut provider)), Err(rejected()));
        assert!(!wallet.is_connected());

        assert!(wallet.connect(Some(&mut provider)).is_ok());
        assert!(wallet.is_connected());
        assert_eq!(wallet.label(), "Connected: 7xKXt...");
    }

    #[test]
    fn short_address_handles_tiny_values() {
        assert_eq!(WalletAddress("abc".into()).short(), "abc");
    }
}
