//! HMAC-SHA256 tags for data the browser carries between requests

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs the serialized lookup result placed in the save form, so a save
/// only accepts what this server produced
#[derive(Clone)]
pub struct PayloadSigner {
    mac: HmacSha256,
}

impl PayloadSigner {
    pub fn new(key: &[u8]) -> anyhow::Result<Self> {
        let mac = HmacSha256::new_from_slice(key)
            .map_err(|e| anyhow::anyhow!("invalid signing key: {e}"))?;
        Ok(Self { mac })
    }

    /// Key from config, or a random one for this process when none is set
    pub fn from_secret(secret: &str) -> anyhow::Result<Self> {
        if secret.trim().is_empty() {
            tracing::warn!(
                "No secret key configured, pending save forms will not survive a restart"
            );
            let mut key = [0u8; 32];
            rand::thread_rng().fill_bytes(&mut key);
            return Self::new(&key);
        }
        Self::new(secret.as_bytes())
    }

    /// Hex-encoded tag
    pub fn sign(&self, payload: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    pub fn verify(&self, payload: &str, signature: &str) -> bool {
        let Ok(tag) = hex::decode(signature.trim()) else {
            return false;
        };
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac.verify_slice(&tag).is_ok()
    }
}
