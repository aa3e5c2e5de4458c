use base64::{STANDARD, URL_SAFE_NO_PAD, decode_config, encode_config};
use jwt_simple::prelude::ES256KeyPair;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::config;
use crate::error::KeyError;
use crate::types::push::VapidConfig;

/// Size of an uncompressed P-256 point: `0x04 || X || Y`.
pub const APPLICATION_SERVER_KEY_LEN: usize = 65;

#[derive(Debug, Clone)]
pub struct VapidCredentials {
    pub private_key: String,
    pub public_key: String,
}

#[derive(Debug, Clone)]
pub enum VapidConfigStatus {
    Missing,
    Incomplete,
    Ready(VapidConfig),
}

/// Only the signing half is optional; the public key always has a value.
pub fn load_vapid_config(config: &config::AppConfig) -> VapidConfigStatus {
    let private_key = config.vapid_private_key.as_ref();
    let subject = config.vapid_subject.as_ref();

    match (private_key, subject) {
        (Some(private_key), Some(subject)) => VapidConfigStatus::Ready(VapidConfig {
            private_key: private_key.clone(),
            public_key: config.vapid_public_key.clone(),
            subject: subject.clone(),
        }),
        (None, None) => VapidConfigStatus::Missing,
        _ => VapidConfigStatus::Incomplete,
    }
}

/// Decodes a base64url VAPID public key into the raw bytes a push manager
/// expects as its application server key.
pub fn decode_application_server_key(encoded: &str) -> Result<Vec<u8>, KeyError> {
    let trimmed = encoded.trim();
    let padding = (4 - trimmed.len() % 4) % 4;
    let standard: String = trimmed
        .chars()
        .chain(std::iter::repeat_n('=', padding))
        .map(|ch| match ch {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    let bytes = decode_config(standard, STANDARD)?;
    if bytes.len() != APPLICATION_SERVER_KEY_LEN {
        return Err(KeyError::InvalidLength(bytes.len()));
    }
    if bytes[0] != 0x04 {
        return Err(KeyError::NotUncompressedPoint(bytes[0]));
    }
    Ok(bytes)
}

pub fn encode_application_server_key(bytes: &[u8]) -> String {
    encode_config(bytes, URL_SAFE_NO_PAD)
}

pub fn generate_vapid_credentials() -> Result<VapidCredentials, web_push::WebPushError> {
    let mut rng = OsRng;
    generate_vapid_credentials_with_rng(&mut rng)
}

pub(crate) fn generate_vapid_credentials_with_rng<R: RngCore + CryptoRng>(
    rng: &mut R,
) -> Result<VapidCredentials, web_push::WebPushError> {
    let key_pair = generate_es256_keypair_with_rng(rng);
    let private_key = encode_config(key_pair.to_bytes(), URL_SAFE_NO_PAD);
    let public_key =
        web_push::VapidSignatureBuilder::from_base64_no_sub(&private_key, URL_SAFE_NO_PAD)?
            .get_public_key();

    Ok(VapidCredentials {
        private_key,
        public_key: encode_application_server_key(&public_key),
    })
}

fn generate_es256_keypair_with_rng<R: RngCore + CryptoRng>(rng: &mut R) -> ES256KeyPair {
    let mut key_bytes = [0u8; 32];
    loop {
        rng.fill_bytes(&mut key_bytes);
        if let Ok(key_pair) = ES256KeyPair::from_bytes(&key_bytes) {
            return key_pair;
        }
    }
}
