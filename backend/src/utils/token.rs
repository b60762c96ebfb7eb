use rand::{rngs::OsRng, RngCore};

/// 32 bytes = 256 bits of entropy.
const QR_TOKEN_BYTES: usize = 32;

/// Opaque, unguessable QR grant token, hex encoded.
pub fn generate_qr_token() -> String {
    let mut bytes = [0u8; QR_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
