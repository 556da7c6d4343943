//! Signed session cookies
//!
//! The cookie value is `<session-uuid>.<signature>` where the signature is
//! the unpadded base64url HMAC-SHA256 of the UUID's hyphenated form. A value
//! that fails verification is treated exactly like a missing cookie.

use axum::http::{header::COOKIE, HeaderMap};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Issues, reads, and clears the session cookie
#[derive(Clone)]
pub struct SessionCookies {
    name: String,
    secret: Vec<u8>,
    max_age_secs: i64,
    secure: bool,
}

impl std::fmt::Debug for SessionCookies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCookies")
            .field("name", &self.name)
            .field("secret", &"[REDACTED]")
            .field("max_age_secs", &self.max_age_secs)
            .field("secure", &self.secure)
            .finish()
    }
}

impl SessionCookies {
    pub fn new(
        name: impl Into<String>,
        secret: impl AsRef<[u8]>,
        max_age_secs: i64,
        secure: bool,
    ) -> Self {
        Self {
            name: name.into(),
            secret: secret.as_ref().to_vec(),
            max_age_secs,
            secure,
        }
    }

    /// Cookie name
    pub fn name(&self) -> &str {
        &self.name
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length")
    }

    /// Signed cookie value for a session id
    pub fn sign(&self, session_id: Uuid) -> String {
        let id = session_id.hyphenated().to_string();
        let mut mac = self.mac();
        mac.update(id.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        format!("{}.{}", id, signature)
    }

    /// Session id carried by a cookie value, if the signature checks out
    pub fn verify(&self, value: &str) -> Option<Uuid> {
        let (id, signature) = value.trim().split_once('.')?;
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;

        let mut mac = self.mac();
        mac.update(id.as_bytes());
        mac.verify_slice(&signature).ok()?;

        Uuid::parse_str(id).ok()
    }

    /// Raw value of this cookie from the request's `Cookie` headers
    pub fn read<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.name)
            .map(|(_, value)| value)
    }

    /// `Set-Cookie` header value establishing the session
    pub fn issue(&self, session_id: Uuid) -> String {
        self.header_value(&self.sign(session_id), self.max_age_secs)
    }

    /// `Set-Cookie` header value that removes the cookie
    pub fn clear(&self) -> String {
        self.header_value("", 0)
    }

    fn header_value(&self, value: &str, max_age: i64) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.name, value, max_age
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}
