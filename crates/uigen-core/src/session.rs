//! Signed session cookies.
//!
//! A session is an HS256 token carrying `{userId, email, expiresAt}` plus
//! `iat`/`exp` claims, stored in the `auth-token` cookie. The payload's
//! `expiresAt` and the cookie's `Expires` attribute are the same instant.

use crate::config::{AuthConfig, Environment};
use crate::error::{Result, UigenError};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

type HmacSha256 = Hmac<Sha256>;

pub const AUTH_COOKIE_NAME: &str = "auth-token";
pub const SESSION_TTL_DAYS: i64 = 7;

const JWT_ALGORITHM: &str = "HS256";

pub fn session_ttl() -> Duration {
    Duration::days(SESSION_TTL_DAYS)
}

/// What the session asserts about the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    pub user_id: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// Full claim set inside the signed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(flatten)]
    pub payload: SessionPayload,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiration, unix seconds.
    pub exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct JwtHeader {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

// ── Cookies ─────────────────────────────────────────────────────────────

/// SameSite cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCookie {
    pub name: String,
    pub value: String,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub secure: bool,
    pub expires: DateTime<Utc>,
}

impl AuthCookie {
    /// A cookie that tells the browser to drop `name` immediately.
    pub fn expired(name: &str, secure: bool) -> Self {
        Self {
            name: name.to_string(),
            value: String::new(),
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".into(),
            secure,
            expires: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    /// Render as a `Set-Cookie` header value.
    pub fn to_header_value(&self) -> String {
        let mut out = format!(
            "{}={}; Path={}; Expires={}",
            self.name,
            self.value,
            self.path,
            self.expires.format("%a, %d %b %Y %H:%M:%S GMT")
        );
        if self.http_only {
            out.push_str("; HttpOnly");
        }
        out.push_str("; SameSite=");
        out.push_str(self.same_site.as_str());
        if self.secure {
            out.push_str("; Secure");
        }
        out
    }
}

/// Where issued cookies go. Implemented by the server's response jar.
pub trait CookieJar {
    fn get(&self, name: &str) -> Option<&str>;

    /// Store `cookie`, replacing any cookie with the same name.
    fn set(&mut self, cookie: AuthCookie);

    fn delete(&mut self, name: &str);
}

/// In-process cookie jar keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryCookieJar {
    cookies: BTreeMap<String, AuthCookie>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cookie(&self, name: &str) -> Option<&AuthCookie> {
        self.cookies.get(name)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

impl CookieJar for MemoryCookieJar {
    fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(|c| c.value.as_str())
    }

    fn set(&mut self, cookie: AuthCookie) {
        self.cookies.insert(cookie.name.clone(), cookie);
    }

    fn delete(&mut self, name: &str) {
        self.cookies.remove(name);
    }
}

/// Attributes applied to every session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
}

impl CookiePolicy {
    pub fn for_environment(env: Environment) -> Self {
        Self {
            secure: env.is_production(),
        }
    }

    pub fn session_cookie(&self, token: String, expires: DateTime<Utc>) -> AuthCookie {
        AuthCookie {
            name: AUTH_COOKIE_NAME.into(),
            value: token,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".into(),
            secure: self.secure,
            expires,
        }
    }
}

// ── Signing ─────────────────────────────────────────────────────────────

/// Produces and checks session tokens.
#[async_trait]
pub trait TokenSigner: Send + Sync {
    async fn sign(&self, claims: &SessionClaims) -> Result<String>;

    /// Check the token's signature and its own `exp` claim against `now`.
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims>;
}

/// HMAC-SHA256 JWT signer.
#[derive(Clone)]
pub struct Hs256Signer {
    key: Vec<u8>,
}

impl Hs256Signer {
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    fn mac(&self) -> Result<HmacSha256> {
        if self.key.is_empty() {
            return Err(UigenError::MissingSigningKey);
        }
        HmacSha256::new_from_slice(&self.key).map_err(|e| UigenError::Signing(e.to_string()))
    }
}

impl fmt::Debug for Hs256Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hs256Signer").field("key", &"<redacted>").finish()
    }
}

fn decode_segment(segment: &str, what: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| UigenError::MalformedToken(format!("{}: {}", what, e)))
}

#[async_trait]
impl TokenSigner for Hs256Signer {
    async fn sign(&self, claims: &SessionClaims) -> Result<String> {
        let header = JwtHeader {
            alg: JWT_ALGORITHM.into(),
            typ: Some("JWT".into()),
        };
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?)
        );

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", signing_input, signature))
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims> {
        let mut parts = token.split('.');
        let (header, claims, signature) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(h), Some(c), Some(s), None) => (h, c, s),
                _ => return Err(UigenError::MalformedToken("expected three segments".into())),
            };

        let parsed: JwtHeader = serde_json::from_slice(&decode_segment(header, "header")?)
            .map_err(|e| UigenError::MalformedToken(format!("header: {}", e)))?;
        if parsed.alg != JWT_ALGORITHM {
            return Err(UigenError::UnsupportedAlgorithm(parsed.alg));
        }

        let mut mac = self.mac()?;
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(claims.as_bytes());
        mac.verify_slice(&decode_segment(signature, "signature")?)
            .map_err(|_| UigenError::InvalidSignature)?;

        let claims: SessionClaims = serde_json::from_slice(&decode_segment(claims, "claims")?)
            .map_err(|e| UigenError::MalformedToken(format!("claims: {}", e)))?;
        if claims.exp <= now.timestamp() {
            return Err(UigenError::TokenExpired);
        }
        Ok(claims)
    }
}

// ── Issuer ──────────────────────────────────────────────────────────────

/// Mints, reads back, and clears session cookies.
#[derive(Clone)]
pub struct SessionIssuer {
    signer: Arc<dyn TokenSigner>,
    policy: CookiePolicy,
}

impl SessionIssuer {
    pub fn new(signer: Arc<dyn TokenSigner>, policy: CookiePolicy) -> Self {
        Self { signer, policy }
    }

    /// HS256 issuer keyed and scoped by the auth config.
    pub fn from_config(auth: &AuthConfig) -> Self {
        Self::new(
            Arc::new(Hs256Signer::new(auth.signing_secret().as_bytes().to_vec())),
            CookiePolicy::for_environment(auth.environment),
        )
    }

    pub fn policy(&self) -> CookiePolicy {
        self.policy
    }

    /// Sign a fresh session for the user and store it in `jar`.
    pub async fn issue<J>(&self, jar: &mut J, user_id: &str, email: &str) -> Result<SessionPayload>
    where
        J: CookieJar + ?Sized,
    {
        self.issue_at(jar, user_id, email, Utc::now()).await
    }

    /// Like [`issue`](Self::issue) with an explicit issuance time.
    pub async fn issue_at<J>(
        &self,
        jar: &mut J,
        user_id: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionPayload>
    where
        J: CookieJar + ?Sized,
    {
        // Millisecond precision keeps `expiresAt` stable through JSON.
        let now = now.trunc_subsecs(3);
        let expires_at = now + session_ttl();
        let iat = now.timestamp();

        let claims = SessionClaims {
            payload: SessionPayload {
                user_id: user_id.to_string(),
                email: email.to_string(),
                expires_at,
            },
            iat,
            exp: iat + session_ttl().num_seconds(),
        };

        let token = self.signer.sign(&claims).await?;
        jar.set(self.policy.session_cookie(token, expires_at));

        tracing::debug!(user_id = %user_id, expires_at = %expires_at, "Issued session");
        Ok(claims.payload)
    }

    /// Verify a raw token.
    pub fn verify(&self, token: &str) -> Result<SessionPayload> {
        self.signer.verify(token, Utc::now()).map(|c| c.payload)
    }

    /// The current session, if `jar` holds a valid one.
    pub fn session_from_jar<J>(&self, jar: &J) -> Option<SessionPayload>
    where
        J: CookieJar + ?Sized,
    {
        let token = jar.get(AUTH_COOKIE_NAME)?;
        match self.verify(token) {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::debug!("Rejected session cookie: {}", e);
                None
            }
        }
    }

    pub fn clear<J>(&self, jar: &mut J)
    where
        J: CookieJar + ?Sized,
    {
        jar.delete(AUTH_COOKIE_NAME);
    }
}
