use anyhow::Result;
use ethers::abi::{encode, Token};
use ethers::prelude::*;
use ethers::types::transaction::eip712::{EIP712Domain, Eip712, Eip712Error};
use ethers::types::U256;
use ethers::utils::keccak256;

use crate::constants::POLYGON_CHAIN_ID;

const ORDER_TYPE: &str = "Order(uint256 salt,address maker,address signer,address taker,uint256 tokenId,uint256 makerAmount,uint256 takerAmount,uint256 expiration,uint256 nonce,uint256 feeRateBps,uint8 side,uint8 signatureType)";
const CLOB_AUTH_TYPE: &str =
    "ClobAuth(address address,string timestamp,uint256 nonce,string message)";
const CLOB_AUTH_MESSAGE: &str = "This message attests that I control the given wallet";
const EXCHANGE_DOMAIN_NAME: &str = "Polymarket CTF Exchange";
const AUTH_DOMAIN_NAME: &str = "ClobAuthDomain";

#[derive(Debug, Clone)]
pub struct WalletSigner {
    wallet: LocalWallet,
}

impl WalletSigner {
    pub fn new(private_key: &str, chain_id: u64) -> Result<Self> {
        let wallet: LocalWallet = private_key.trim().parse()?;
        Ok(Self {
            wallet: wallet.with_chain_id(chain_id),
        })
    }

    pub fn polygon(private_key: &str) -> Result<Self> {
        Self::new(private_key, POLYGON_CHAIN_ID)
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    pub fn wallet(&self) -> &LocalWallet {
        &self.wallet
    }

    pub fn chain_id(&self) -> u64 {
        self.wallet.chain_id()
    }

    /// Signs an order for the exchange contract at `verifying_contract`.
    pub async fn sign_order(&self, order: &ClobOrder, verifying_contract: Address) -> Result<String> {
        let typed = ExchangeOrder {
            order,
            domain: exchange_domain(self.chain_id(), verifying_contract),
        };
        let signature = self.wallet.sign_typed_data(&typed).await?;
        Ok(signature_hex(&signature))
    }

    /// L1 proof of key ownership used to create or derive API credentials.
    pub async fn sign_clob_auth(&self, timestamp: u64, nonce: u64) -> Result<String> {
        let auth = ClobAuth {
            address: self.address(),
            timestamp: timestamp.to_string(),
            nonce: U256::from(nonce),
            chain_id: self.chain_id(),
        };
        let signature = self.wallet.sign_typed_data(&auth).await?;
        Ok(signature_hex(&signature))
    }
}

pub fn signature_hex(signature: &Signature) -> String {
    format!("0x{}", hex::encode(signature.to_vec()))
}

/// =================================================
/// Polymarket CLOB Order (EIP-712)
/// =================================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClobOrder {
    pub salt: U256,
    pub maker: Address,
    pub signer: Address,
    pub taker: Address,
    pub token_id: U256,
    pub maker_amount: U256,
    pub taker_amount: U256,
    pub expiration: U256,
    pub nonce: U256,
    pub fee_rate_bps: U256,
    pub side: u8,
    pub signature_type: u8,
}

fn exchange_domain(chain_id: u64, verifying_contract: Address) -> EIP712Domain {
    EIP712Domain {
        name: Some(EXCHANGE_DOMAIN_NAME.to_string()),
        version: Some("1".to_string()),
        chain_id: Some(U256::from(chain_id)),
        verifying_contract: Some(verifying_contract),
        salt: None,
    }
}

// The verifying contract differs between regular and neg-risk markets, so
// the domain is carried with the order instead of fixed by a derive.
struct ExchangeOrder<'a> {
    order: &'a ClobOrder,
    domain: EIP712Domain,
}

impl Eip712 for ExchangeOrder<'_> {
    type Error = Eip712Error;

    fn domain(&self) -> Result<EIP712Domain, Self::Error> {
        Ok(self.domain.clone())
    }

    fn type_hash() -> Result<[u8; 32], Self::Error> {
        Ok(keccak256(ORDER_TYPE))
    }

    fn struct_hash(&self) -> Result<[u8; 32], Self::Error> {
        let o = self.order;
        Ok(keccak256(encode(&[
            Token::FixedBytes(Self::type_hash()?.to_vec()),
            Token::Uint(o.salt),
            Token::Address(o.maker),
            Token::Address(o.signer),
            Token::Address(o.taker),
            Token::Uint(o.token_id),
            Token::Uint(o.maker_amount),
            Token::Uint(o.taker_amount),
            Token::Uint(o.expiration),
            Token::Uint(o.nonce),
            Token::Uint(o.fee_rate_bps),
            Token::Uint(U256::from(o.side)),
            Token::Uint(U256::from(o.signature_type)),
        ])))
    }
}

struct ClobAuth {
    address: Address,
    timestamp: String,
    nonce: U256,
    chain_id: u64,
}

impl Eip712 for ClobAuth {
    type Error = Eip712Error;

    fn domain(&self) -> Result<EIP712Domain, Self::Error> {
        Ok(EIP712Domain {
            name: Some(AUTH_DOMAIN_NAME.to_string()),
            version: Some("1".to_string()),
            chain_id: Some(U256::from(self.chain_id)),
            verifying_contract: None,
            salt: None,
        })
    }

    fn type_hash() -> Result<[u8; 32], Self::Error> {
        Ok(keccak256(CLOB_AUTH_TYPE))
    }

    fn struct_hash(&self) -> Result<[u8; 32], Self::Error> {
        Ok(keccak256(encode(&[
            Token::FixedBytes(Self::type_hash()?.to_vec()),
            Token::Address(self.address),
            Token::FixedBytes(keccak256(self.timestamp.as_bytes()).to_vec()),
            Token::Uint(self.nonce),
            Token::FixedBytes(keccak256(CLOB_AUTH_MESSAGE).to_vec()),
        ])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CTF_EXCHANGE_ADDRESS, NEG_RISK_EXCHANGE_ADDRESS};

    // Well-known development key; never funded on mainnet.
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn order(maker: Address) -> ClobOrder {
        ClobOrder {
            salt: U256::from(12345u64),
            maker,
            signer: maker,
            taker: Address::zero(),
            token_id: U256::from_dec_str("71321045679252212594626385532706912750332728571942532289631379312455583992563").unwrap(),
            maker_amount: U256::from(50_000_000u64),
            taker_amount: U256::from(100_000_000u64),
            expiration: U256::zero(),
            nonce: U256::zero(),
            fee_rate_bps: U256::zero(),
            side: 0,
            signature_type: 0,
        }
    }

    #[test]
    fn loads_key_with_or_without_prefix() {
        let with = WalletSigner::polygon(TEST_KEY).unwrap();
        let without = WalletSigner::polygon(TEST_KEY.trim_start_matches("0x")).unwrap();
        assert_eq!(with.address(), without.address());
        assert_eq!(with.chain_id(), 137);
        assert_eq!(
            format!("{:?}", with.address()),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[tokio::test]
    async fn order_signature_is_65_bytes_and_recoverable() {
        let signer = WalletSigner::polygon(TEST_KEY).unwrap();
        let exchange: Address = CTF_EXCHANGE_ADDRESS.parse().unwrap();
        let order = order(signer.address());

        let sig = signer.sign_order(&order, exchange).await.unwrap();
        assert!(sig.starts_with("0x"));
        assert_eq!(sig.len(), 2 + 65 * 2);

        let typed = ExchangeOrder {
            order: &order,
            domain: exchange_domain(137, exchange),
        };
        let digest = typed.encode_eip712().unwrap();
        let parsed: Signature = sig.parse().unwrap();
        assert_eq!(parsed.recover(digest).unwrap(), signer.address());
    }

    #[tokio::test]
    async fn domain_changes_with_exchange() {
        let signer = WalletSigner::polygon(TEST_KEY).unwrap();
        let order = order(signer.address());
        let regular = signer
            .sign_order(&order, CTF_EXCHANGE_ADDRESS.parse().unwrap())
            .await
            .unwrap();
        let neg_risk = signer
            .sign_order(&order, NEG_RISK_EXCHANGE_ADDRESS.parse().unwrap())
            .await
            .unwrap();
        assert_ne!(regular, neg_risk);
    }

    #[tokio::test]
    async fn clob_auth_signature_is_deterministic() {
        let signer = WalletSigner::polygon(TEST_KEY).unwrap();
        let a = signer.sign_clob_auth(1_700_000_000, 0).await.unwrap();
        let b = signer.sign_clob_auth(1_700_000_000, 0).await.unwrap();
        let c = signer.sign_clob_auth(1_700_000_001, 0).await.unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
