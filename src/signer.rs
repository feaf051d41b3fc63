//! Transaction signing.
//!
//! A [`Signer`] is bound to one address and signs raw transaction encodings.
//! Key storage is up to the implementor; [`LocalSigner`] keeps a secp256k1
//! key in memory (feature `local-signer`).

use ethereum_types::Address;

use crate::error::PlasmaError;
use crate::types::Signature;

pub trait Signer {
    /// Address whose inputs this signer can sign.
    fn address(&self) -> Address;

    /// Sign a raw transaction encoding. Returns `r || s || v`.
    fn sign(&self, raw: &[u8]) -> Result<Signature, PlasmaError>;
}

#[cfg(feature = "local-signer")]
pub use local::{recover_address, LocalSigner};

#[cfg(feature = "local-signer")]
mod local {
    use ethereum_types::Address;
    use libsecp256k1::{Message, PublicKey, RecoveryId, SecretKey};

    use super::Signer;
    use crate::error::PlasmaError;
    use crate::types::{decode_hex, keccak256, Signature};

    /// Offset added to the recovery id to form `v`.
    const V_OFFSET: u8 = 27;

    /// In-memory secp256k1 key. Signs `keccak256(raw)`.
    pub struct LocalSigner {
        secret: SecretKey,
        address: Address,
    }

    impl LocalSigner {
        pub fn from_bytes(secret: &[u8]) -> Result<Self, PlasmaError> {
            let secret = SecretKey::parse_slice(secret)
                .map_err(|e| PlasmaError::Signer(format!("invalid private key: {e:?}")))?;
            let address = public_key_address(&PublicKey::from_secret_key(&secret));
            Ok(Self { secret, address })
        }

        /// `0x`-prefixed or bare hex private key.
        pub fn from_hex(secret: &str) -> Result<Self, PlasmaError> {
            Self::from_bytes(&decode_hex(secret)?)
        }
    }

    impl std::fmt::Debug for LocalSigner {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("LocalSigner")
                .field("address", &self.address)
                .finish_non_exhaustive()
        }
    }

    impl Signer for LocalSigner {
        fn address(&self) -> Address {
            self.address
        }

        fn sign(&self, raw: &[u8]) -> Result<Signature, PlasmaError> {
            let message = Message::parse(&keccak256(raw));
            let (signature, recovery_id) = libsecp256k1::sign(&message, &self.secret);
            let mut out = [0u8; Signature::LEN];
            out[..64].copy_from_slice(&signature.serialize());
            out[64] = V_OFFSET + recovery_id.serialize();
            Ok(Signature(out))
        }
    }

    /// Address that produced `signature` over `raw`.
    pub fn recover_address(raw: &[u8], signature: &Signature) -> Result<Address, PlasmaError> {
        let message = Message::parse(&keccak256(raw));
        let rs = libsecp256k1::Signature::parse_standard_slice(&signature.0[..64])
            .map_err(|e| PlasmaError::Signer(format!("bad signature: {e:?}")))?;
        let recovery_id = RecoveryId::parse_rpc(signature.0[64])
            .map_err(|e| PlasmaError::Signer(format!("bad recovery id: {e:?}")))?;
        let public = libsecp256k1::recover(&message, &rs, &recovery_id)
            .map_err(|e| PlasmaError::Signer(format!("recovery failed: {e:?}")))?;
        Ok(public_key_address(&public))
    }

    fn public_key_address(public: &PublicKey) -> Address {
        // drop the 0x04 prefix of the uncompressed key
        let hash = keccak256(&public.serialize()[1..]);
        Address::from_slice(&hash[12..])
    }
}
