//! obs-websocket authentication string.
//!
//! ```text
//! secret = base64(sha256(password + salt))
//! auth   = base64(sha256(secret + challenge))
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Build the `authentication` field of the Identify message.
pub fn auth_response(password: &str, salt: &str, challenge: &str) -> String {
    let secret = STANDARD.encode(Sha256::digest(format!("{}{}", password, salt)));
    STANDARD.encode(Sha256::digest(format!("{}{}", secret, challenge)))
}
