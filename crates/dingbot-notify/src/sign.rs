use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Compute the webhook request signature for one timestamp.
///
/// HMAC-SHA256 over `"<timestamp_millis>\n<secret_key>"` keyed with the
/// secret, base64-encoded, then percent-escaped so the result can go into
/// a query string as-is.
pub fn sign(secret_key: &str, timestamp_millis: i64) -> String {
    let string_to_sign = format!("{}\n{}", timestamp_millis, secret_key);
    let mut mac = Hmac::<Sha256>::new_from_slice(secret_key.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(string_to_sign.as_bytes());
    let digest = mac.finalize().into_bytes();

    let encoded = base64::engine::general_purpose::STANDARD.encode(digest);
    urlencoding::encode(&encoded).into_owned()
}
