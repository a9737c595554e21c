//! Request/response cookie jar for axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponseParts, ResponseParts};
use std::collections::HashMap;
use std::convert::Infallible;
use uigen_core::session::{AuthCookie, CookieJar};

/// Cookies sent with the request, plus the `Set-Cookie` headers queued
/// for the response. Later writes to the same name replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct SessionCookies {
    incoming: HashMap<String, String>,
    outgoing: Vec<AuthCookie>,
}

impl SessionCookies {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let incoming = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|s| s.split(';'))
            .filter_map(|part| part.trim().split_once('='))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Self {
            incoming,
            outgoing: Vec::new(),
        }
    }

    pub fn outgoing(&self) -> &[AuthCookie] {
        &self.outgoing
    }
}

impl CookieJar for SessionCookies {
    fn get(&self, name: &str) -> Option<&str> {
        match self.outgoing.iter().find(|c| c.name == name) {
            Some(c) if c.value.is_empty() => None,
            Some(c) => Some(c.value.as_str()),
            None => self.incoming.get(name).map(String::as_str),
        }
    }

    fn set(&mut self, cookie: AuthCookie) {
        self.outgoing.retain(|c| c.name != cookie.name);
        self.outgoing.push(cookie);
    }

    fn delete(&mut self, name: &str) {
        self.set(AuthCookie::expired(name, false));
    }
}

impl<S> FromRequestParts<S> for SessionCookies
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

impl IntoResponseParts for SessionCookies {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        for cookie in self.outgoing {
            match HeaderValue::from_str(&cookie.to_header_value()) {
                Ok(value) => {
                    res.headers_mut().append(SET_COOKIE, value);
                }
                Err(e) => tracing::warn!("Dropping unencodable cookie {}: {}", cookie.name, e),
            }
        }
        Ok(res)
    }
}
