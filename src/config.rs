// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `CHAIN_ID` | Network selector (`testnet` or `mainnet`) | Required |
//! | `DATABASE_DSN` | Path of the transaction database file | Required |
//! | `SERVER_LISTEN_ADDR` | HTTP listen address (`host:port` or `:port`) | Required |
//! | `RPC_URL` | Override for the network's RPC endpoint | Network default |
//! | `IFIL_TOKEN_ADDRESS` | iFIL contract address | Network default (none on testnet) |
//! | `LEDGER_TIMEOUT_SECS` | Deadline for each ledger call | `30` |
//! | `REQUEST_TIMEOUT_SECS` | Deadline for a whole HTTP request | `60` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use alloy::primitives::Address;
use url::Url;

use crate::blockchain::{network_from_selector, NetworkConfig};

/// Environment variable name for the network selector.
///
/// Accepts `testnet` (Filecoin Calibration) or `mainnet`.
pub const CHAIN_ID_ENV: &str = "CHAIN_ID";

/// Environment variable name for the redb database path.
pub const DATABASE_DSN_ENV: &str = "DATABASE_DSN";

/// Environment variable name for the HTTP listen address.
pub const SERVER_LISTEN_ADDR_ENV: &str = "SERVER_LISTEN_ADDR";

/// Environment variable name for the RPC endpoint override.
pub const RPC_URL_ENV: &str = "RPC_URL";

/// Environment variable name for the iFIL contract address.
pub const IFIL_TOKEN_ADDRESS_ENV: &str = "IFIL_TOKEN_ADDRESS";

pub const LEDGER_TIMEOUT_SECS_ENV: &str = "LEDGER_TIMEOUT_SECS";
pub const REQUEST_TIMEOUT_SECS_ENV: &str = "REQUEST_TIMEOUT_SECS";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

pub const DEFAULT_LEDGER_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("unknown network {0:?} in CHAIN_ID (expected \"testnet\" or \"mainnet\")")]
    UnknownNetwork(String),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    /// Read `LOG_FORMAT`; anything other than `json` means pretty output.
    pub fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV) {
            Ok(v) if v.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Validated startup configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub network: NetworkConfig,
    pub rpc_url: Url,
    pub ifil_address: Address,
    pub database_path: PathBuf,
    pub listen_addr: SocketAddr,
    pub ledger_timeout: Duration,
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns the raw value of a
    /// variable if it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let selector = require(CHAIN_ID_ENV)?;
        let network =
            network_from_selector(&selector).ok_or(ConfigError::UnknownNetwork(selector))?;

        let rpc_raw = get(RPC_URL_ENV).unwrap_or_else(|| network.rpc_url.to_string());
        let rpc_url = Url::parse(&rpc_raw).map_err(|e| ConfigError::Invalid {
            name: RPC_URL_ENV,
            reason: e.to_string(),
        })?;

        let ifil_raw = get(IFIL_TOKEN_ADDRESS_ENV)
            .or_else(|| network.ifil_address.map(str::to_string))
            .ok_or(ConfigError::Missing(IFIL_TOKEN_ADDRESS_ENV))?;
        let ifil_address = ifil_raw
            .parse::<Address>()
            .map_err(|e| ConfigError::Invalid {
                name: IFIL_TOKEN_ADDRESS_ENV,
                reason: e.to_string(),
            })?;

        let database_path = PathBuf::from(require(DATABASE_DSN_ENV)?);
        let listen_addr = parse_listen_addr(&require(SERVER_LISTEN_ADDR_ENV)?)?;

        let ledger_timeout = parse_secs(
            LEDGER_TIMEOUT_SECS_ENV,
            get(LEDGER_TIMEOUT_SECS_ENV),
            DEFAULT_LEDGER_TIMEOUT,
        )?;
        let request_timeout = parse_secs(
            REQUEST_TIMEOUT_SECS_ENV,
            get(REQUEST_TIMEOUT_SECS_ENV),
            DEFAULT_REQUEST_TIMEOUT,
        )?;

        Ok(Self {
            network,
            rpc_url,
            ifil_address,
            database_path,
            listen_addr,
            ledger_timeout,
            request_timeout,
        })
    }
}

/// Parse a listen address; a bare `:port` binds all interfaces.
fn parse_listen_addr(raw: &str) -> Result<SocketAddr, ConfigError> {
    let full = if raw.starts_with(':') {
        format!("0.0.0.0{raw}")
    } else {
        raw.to_string()
    };
    full.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
        name: SERVER_LISTEN_ADDR_ENV,
        reason: e.to_string(),
    })
}

fn parse_secs(
    name: &'static str,
    raw: Option<String>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid {
            name,
            reason: format!("expected a positive number of seconds, got {raw:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const IFIL: &str = "0x1234567890123456789012345678901234567890";

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    fn testnet_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            (CHAIN_ID_ENV, "testnet"),
            (DATABASE_DSN_ENV, "/tmp/txs.redb"),
            (SERVER_LISTEN_ADDR_ENV, ":8080"),
            (IFIL_TOKEN_ADDRESS_ENV, IFIL),
        ]
    }

    #[test]
    fn testnet_with_defaults() {
        let config = load(&testnet_vars()).unwrap();
        assert_eq!(config.network.chain_id, 314_159);
        assert_eq!(config.rpc_url.as_str(), "https://api.calibration.node.glif.io/rpc/v1");
        assert_eq!(config.ifil_address, IFIL.parse::<Address>().unwrap());
        assert_eq!(config.listen_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.database_path, PathBuf::from("/tmp/txs.redb"));
        assert_eq!(config.ledger_timeout, DEFAULT_LEDGER_TIMEOUT);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn mainnet_has_builtin_token() {
        let config = load(&[
            (CHAIN_ID_ENV, "mainnet"),
            (DATABASE_DSN_ENV, "txs.redb"),
            (SERVER_LISTEN_ADDR_ENV, "127.0.0.1:3000"),
        ])
        .unwrap();
        assert_eq!(config.network.chain_id, 314);
        assert_eq!(
            config.ifil_address,
            "0x690908f7fa93afC040CFbD9fE1dDd2C2668Aa0e0"
                .parse::<Address>()
                .unwrap()
        );
    }

    #[test]
    fn unknown_network_is_fatal() {
        let mut vars = testnet_vars();
        vars[0] = (CHAIN_ID_ENV, "devnet");
        assert!(matches!(load(&vars), Err(ConfigError::UnknownNetwork(_))));
    }

    #[test]
    fn missing_variables_are_reported() {
        assert!(matches!(
            load(&[]),
            Err(ConfigError::Missing(CHAIN_ID_ENV))
        ));

        let vars: Vec<_> = testnet_vars()
            .into_iter()
            .filter(|(k, _)| *k != IFIL_TOKEN_ADDRESS_ENV)
            .collect();
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Missing(IFIL_TOKEN_ADDRESS_ENV))
        ));
    }

    #[test]
    fn overrides_and_bad_values() {
        let mut vars = testnet_vars();
        vars.push((RPC_URL_ENV, "http://localhost:1234/rpc/v1"));
        vars.push((LEDGER_TIMEOUT_SECS_ENV, "5"));
        let config = load(&vars).unwrap();
        assert_eq!(config.rpc_url.as_str(), "http://localhost:1234/rpc/v1");
        assert_eq!(config.ledger_timeout, Duration::from_secs(5));

        let mut vars = testnet_vars();
        vars.push((REQUEST_TIMEOUT_SECS_ENV, "0"));
        assert!(matches!(load(&vars), Err(ConfigError::Invalid { .. })));

        let mut vars = testnet_vars();
        vars[2] = (SERVER_LISTEN_ADDR_ENV, "not-an-address");
        assert!(matches!(load(&vars), Err(ConfigError::Invalid { .. })));
    }
}
