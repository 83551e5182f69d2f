use ethers::types::Address;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

use crate::constants::{
    CTF_ADDRESS, CTF_EXCHANGE_ADDRESS, DEFAULT_CLOB_HOST, DEFAULT_POLYGON_RPC,
    DEFAULT_SOLANA_RPC, NEG_RISK_ADAPTER_ADDRESS, NEG_RISK_EXCHANGE_ADDRESS, USDC_ADDRESS,
};
use crate::domain::ApiCredentials;

/* =======================
SIGNATURE TYPES
======================= */

/// How the exchange should interpret an order signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureType {
    #[default]
    Eoa,
    PolyProxy,
    PolyGnosisSafe,
}

impl SignatureType {
    pub fn as_u8(self) -> u8 {
        match self {
            SignatureType::Eoa => 0,
            SignatureType::PolyProxy => 1,
            SignatureType::PolyGnosisSafe => 2,
        }
    }
}

impl FromStr for SignatureType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(SignatureType::Eoa),
            "1" => Ok(SignatureType::PolyProxy),
            "2" => Ok(SignatureType::PolyGnosisSafe),
            other => Err(ConfigError::Invalid {
                field: ConfigField::SignatureType,
                reason: format!("expected 0, 1 or 2, got {:?}", other),
            }),
        }
    }
}

/* =======================
FIELDS + ERRORS
======================= */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    PrivateKey,
    PolygonRpc,
    ClobHost,
    CtfExchangeAddress,
    SignatureType,
    ProxyWallet,
    ApiKey,
    ApiSecret,
    ApiPassphrase,
    SolanaPrivateKey,
    SolanaRpc,
}

impl ConfigField {
    pub fn env_var(self) -> &'static str {
        match self {
            ConfigField::PrivateKey => "PRIVATE_KEY",
            ConfigField::PolygonRpc => "POLYGON_RPC",
            ConfigField::ClobHost => "CLOB_HOST",
            ConfigField::CtfExchangeAddress => "CTF_EXCHANGE_ADDRESS",
            ConfigField::SignatureType => "SIGNATURE_TYPE",
            ConfigField::ProxyWallet => "PROXY_WALLET",
            ConfigField::ApiKey => "POLY_API_KEY",
            ConfigField::ApiSecret => "POLY_SECRET",
            ConfigField::ApiPassphrase => "POLY_PASSPHRASE",
            ConfigField::SolanaPrivateKey => "SOLANA_PRIVATE_KEY",
            ConfigField::SolanaRpc => "SOLANA_RPC",
        }
    }

    /// The three variables that make up L2 credentials.
    pub const API_CREDENTIALS: [ConfigField; 3] = [
        ConfigField::ApiKey,
        ConfigField::ApiSecret,
        ConfigField::ApiPassphrase,
    ];

    /// Everything an authenticated trading session needs.
    pub const TRADING: [ConfigField; 4] = [
        ConfigField::PrivateKey,
        ConfigField::ApiKey,
        ConfigField::ApiSecret,
        ConfigField::ApiPassphrase,
    ];
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_var())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required configuration: {}", join_fields(.0))]
    Missing(Vec<ConfigField>),

    #[error("invalid {field}: {reason}")]
    Invalid { field: ConfigField, reason: String },
}

fn join_fields(fields: &[ConfigField]) -> String {
    fields
        .iter()
        .map(|f| f.env_var())
        .collect::<Vec<_>>()
        .join(", ")
}

/* =======================
CONTRACTS
======================= */

/// Polygon contracts the tools talk to or approve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractAddresses {
    pub usdc: Address,
    pub ctf: Address,
    pub exchange: Address,
    pub neg_risk_exchange: Address,
    pub neg_risk_adapter: Address,
}

impl ContractAddresses {
    /// Mainnet addresses, with the regular exchange optionally overridden.
    pub fn polygon(exchange_override: Option<&str>) -> Result<Self, ConfigError> {
        Ok(Self {
            usdc: parse_address(ConfigField::CtfExchangeAddress, USDC_ADDRESS)?,
            ctf: parse_address(ConfigField::CtfExchangeAddress, CTF_ADDRESS)?,
            exchange: parse_address(
                ConfigField::CtfExchangeAddress,
                exchange_override.unwrap_or(CTF_EXCHANGE_ADDRESS),
            )?,
            neg_risk_exchange: parse_address(
                ConfigField::CtfExchangeAddress,
                NEG_RISK_EXCHANGE_ADDRESS,
            )?,
            neg_risk_adapter: parse_address(
                ConfigField::CtfExchangeAddress,
                NEG_RISK_ADAPTER_ADDRESS,
            )?,
        })
    }
}

/* =======================
MAIN CONFIG
======================= */

/// Everything the tools read from the environment, read once.
#[derive(Clone, PartialEq)]
pub struct Config {
    pub private_key: Option<String>,
    pub polygon_rpc: String,
    pub clob_host: String,
    pub contracts: ContractAddresses,
    pub signature_type: SignatureType,
    pub proxy_wallet: Option<Address>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub api_passphrase: Option<String>,
    pub solana_private_key: Option<String>,
    pub solana_rpc: String,
}

impl Config {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |field: ConfigField| {
            lookup(field.env_var())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let polygon_rpc = parse_url(
            ConfigField::PolygonRpc,
            get(ConfigField::PolygonRpc).unwrap_or_else(|| DEFAULT_POLYGON_RPC.to_string()),
        )?;
        let clob_host = parse_url(
            ConfigField::ClobHost,
            get(ConfigField::ClobHost).unwrap_or_else(|| DEFAULT_CLOB_HOST.to_string()),
        )?;
        let solana_rpc = parse_url(
            ConfigField::SolanaRpc,
            get(ConfigField::SolanaRpc).unwrap_or_else(|| DEFAULT_SOLANA_RPC.to_string()),
        )?;

        let contracts = ContractAddresses::polygon(get(ConfigField::CtfExchangeAddress).as_deref())?;

        let signature_type = match get(ConfigField::SignatureType) {
            Some(raw) => raw.parse()?,
            None => SignatureType::default(),
        };

        let proxy_wallet = get(ConfigField::ProxyWallet)
            .map(|raw| parse_address(ConfigField::ProxyWallet, &raw))
            .transpose()?;

        Ok(Self {
            private_key: get(ConfigField::PrivateKey),
            polygon_rpc,
            clob_host,
            contracts,
            signature_type,
            proxy_wallet,
            api_key: get(ConfigField::ApiKey),
            api_secret: get(ConfigField::ApiSecret),
            api_passphrase: get(ConfigField::ApiPassphrase),
            solana_private_key: get(ConfigField::SolanaPrivateKey),
            solana_rpc,
        })
    }

    /// Fails with every absent field at once, not just the first.
    pub fn require(&self, fields: &[ConfigField]) -> Result<(), ConfigError> {
        let mut missing: Vec<ConfigField> = fields
            .iter()
            .copied()
            .filter(|field| !self.is_set(*field))
            .collect();

        // Proxy and Safe signatures need to know who holds the funds.
        if fields.contains(&ConfigField::PrivateKey)
            && self.signature_type != SignatureType::Eoa
            && self.proxy_wallet.is_none()
        {
            missing.push(ConfigField::ProxyWallet);
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Missing(missing))
        }
    }

    fn is_set(&self, field: ConfigField) -> bool {
        match field {
            ConfigField::PrivateKey => self.private_key.is_some(),
            ConfigField::ProxyWallet => self.proxy_wallet.is_some(),
            ConfigField::ApiKey => self.api_key.is_some(),
            ConfigField::ApiSecret => self.api_secret.is_some(),
            ConfigField::ApiPassphrase => self.api_passphrase.is_some(),
            ConfigField::SolanaPrivateKey => self.solana_private_key.is_some(),
            // Defaulted fields are always present.
            ConfigField::PolygonRpc
            | ConfigField::ClobHost
            | ConfigField::CtfExchangeAddress
            | ConfigField::SignatureType
            | ConfigField::SolanaRpc => true,
        }
    }

    pub fn private_key(&self) -> Result<&str, ConfigError> {
        self.private_key
            .as_deref()
            .ok_or_else(|| ConfigError::Missing(vec![ConfigField::PrivateKey]))
    }

    pub fn solana_private_key(&self) -> Result<&str, ConfigError> {
        self.solana_private_key
            .as_deref()
            .ok_or_else(|| ConfigError::Missing(vec![ConfigField::SolanaPrivateKey]))
    }

    pub fn api_credentials(&self) -> Result<ApiCredentials, ConfigError> {
        self.require(&ConfigField::API_CREDENTIALS)?;
        match (&self.api_key, &self.api_secret, &self.api_passphrase) {
            (Some(api_key), Some(secret), Some(passphrase)) => Ok(ApiCredentials {
                api_key: api_key.clone(),
                secret: secret.clone(),
                passphrase: passphrase.clone(),
            }),
            _ => Err(ConfigError::Missing(ConfigField::API_CREDENTIALS.to_vec())),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Config")
            .field("private_key", &shown(&self.private_key))
            .field("polygon_rpc", &self.polygon_rpc)
            .field("clob_host", &self.clob_host)
            .field("contracts", &self.contracts)
            .field("signature_type", &self.signature_type)
            .field("proxy_wallet", &self.proxy_wallet)
            .field("api_key", &self.api_key)
            .field("api_secret", &shown(&self.api_secret))
            .field("api_passphrase", &shown(&self.api_passphrase))
            .field("solana_private_key", &shown(&self.solana_private_key))
            .field("solana_rpc", &self.solana_rpc)
            .finish()
    }
}

fn parse_url(field: ConfigField, raw: String) -> Result<String, ConfigError> {
    Url::parse(&raw).map_err(|e| ConfigError::Invalid {
        field,
        reason: e.to_string(),
    })?;
    Ok(raw.trim_end_matches('/').to_string())
}

fn parse_address(field: ConfigField, raw: &str) -> Result<Address, ConfigError> {
    Address::from_str(raw).map_err(|e| ConfigError::Invalid {
        field,
        reason: e.to_string(),
    })
}
