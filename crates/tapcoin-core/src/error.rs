//! Core error types for tapcoin-core.
//!
//! Arithmetic, lookups and formatting in the engine are total, so the error
//! surface is small: configuration loading, table validation, and the wallet
//! boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tapcoin-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tier table errors
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Countdown target errors
    #[error("Countdown error: {0}")]
    Countdown(#[from] CountdownError),

    /// Wallet connection errors
    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Tier table validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Tier table must contain at least one tier")]
    Empty,

    #[error("Tier {index} minimum ({current}) must be greater than the previous tier's ({previous})")]
    NotIncreasing {
        index: usize,
        previous: u64,
        current: u64,
    },
}

/// Countdown target errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CountdownError {
    #[error("Reset hour {0} is outside 0..=23")]
    InvalidHour(u32),
}

/// Wallet boundary errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// No wallet provider is available in the host environment.
    #[error("Wallet provider not found. Please install a wallet.")]
    ProviderMissing,

    /// The provider refused or failed the connection attempt.
    #[error("Connection to {provider} failed: {reason}")]
    Rejected { provider: String, reason: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
