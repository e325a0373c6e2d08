use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// `appsecret_proof` for a Graph API call: hex HMAC-SHA256 of the access
/// token keyed by the app secret.
pub fn appsecret_proof(access_token: &str, app_secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(app_secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC takes keys of any size"));
    mac.update(access_token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
