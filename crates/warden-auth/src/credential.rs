//! Session credential extraction from inbound request metadata.

use std::fmt;

use http::HeaderMap;

/// Custom header carrying a raw session token.
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// Cookie the identity provider sets for browser sessions.
pub const SESSION_COOKIE: &str = "ory_kratos_session";

/// Where a credential was found on the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// `Authorization: Bearer <token>`
    Bearer,
    /// `X-Session-Token: <token>`
    SessionHeader,
    /// `Cookie: ory_kratos_session=<token>`
    Cookie,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Transport::Bearer => "bearer",
            Transport::SessionHeader => "session-header",
            Transport::Cookie => "cookie",
        };
        f.write_str(name)
    }
}

/// An opaque session token plus the transport it arrived on.
///
/// Lives for one request. `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    transport: Transport,
}

impl Credential {
    /// Build a credential.
    pub fn new(token: impl Into<String>, transport: Transport) -> Self {
        Self {
            token: token.into(),
            transport,
        }
    }

    /// The raw session token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Where the token came from.
    pub fn transport(&self) -> Transport {
        self.transport
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("transport", &self.transport)
            .finish()
    }
}

/// Pick the session credential from request headers.
///
/// Checked in order, first hit wins: bearer authorization, the
/// `X-Session-Token` header, then the `ory_kratos_session` cookie.
/// A bearer header with nothing after the prefix ends the search with no
/// credential.
pub fn extract(headers: &HeaderMap) -> Option<Credential> {
    if let Some(token) = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        return non_empty(token, Transport::Bearer);
    }

    if let Some(token) = headers
        .get(SESSION_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
    {
        return Some(Credential::new(token, Transport::SessionHeader));
    }

    session_cookie(headers).and_then(|token| non_empty(token, Transport::Cookie))
}

fn non_empty(token: &str, transport: Transport) -> Option<Credential> {
    (!token.is_empty()).then(|| Credential::new(token, transport))
}

/// Find the session cookie across every `Cookie` header on the request.
fn session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim_matches('"'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use proptest::prelude::*;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_extract_bearer() {
        let h = headers(&[("authorization", "Bearer tok-123")]);
        let c = extract(&h).unwrap();
        assert_eq!(c.token(), "tok-123");
        assert_eq!(c.transport(), Transport::Bearer);
    }

    #[test]
    fn test_extract_bearer_prefix_is_case_sensitive() {
        let h = headers(&[("authorization", "bearer tok-123")]);
        assert!(extract(&h).is_none());
    }

    #[test]
    fn test_extract_wrong_scheme_falls_through() {
        let h = headers(&[
            ("authorization", "Basic dXNlcjpwYXNz"),
            ("x-session-token", "abc"),
        ]);
        let c = extract(&h).unwrap();
        assert_eq!(c.token(), "abc");
        assert_eq!(c.transport(), Transport::SessionHeader);
    }

    #[test]
    fn test_extract_session_header() {
        let h = headers(&[("x-session-token", "abc")]);
        assert_eq!(extract(&h).unwrap().token(), "abc");
    }

    #[test]
    fn test_extract_empty_session_header_falls_through_to_cookie() {
        let h = headers(&[("x-session-token", ""), ("cookie", "ory_kratos_session=ck")]);
        let c = extract(&h).unwrap();
        assert_eq!(c.token(), "ck");
        assert_eq!(c.transport(), Transport::Cookie);
    }

    #[test]
    fn test_extract_cookie_among_others() {
        let h = headers(&[("cookie", "theme=dark; ory_kratos_session=ck-1; lang=en")]);
        assert_eq!(extract(&h).unwrap().token(), "ck-1");
    }

    #[test]
    fn test_extract_cookie_in_second_header() {
        let h = headers(&[
            ("cookie", "theme=dark"),
            ("cookie", "ory_kratos_session=ck-2"),
        ]);
        assert_eq!(extract(&h).unwrap().token(), "ck-2");
    }

    #[test]
    fn test_extract_empty_bearer_is_absent() {
        let h = headers(&[("authorization", "Bearer "), ("x-session-token", "abc")]);
        assert!(extract(&h).is_none());
    }

    #[test]
    fn test_extract_nothing() {
        assert!(extract(&HeaderMap::new()).is_none());
        let h = headers(&[("cookie", "other=1")]);
        assert!(extract(&h).is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let c = Credential::new("secret", Transport::Cookie);
        let printed = format!("{c:?}");
        assert!(!printed.contains("secret"));
        assert!(printed.contains("Cookie"));
    }

    proptest! {
        #[test]
        fn test_bearer_wins_over_everything(
            x in "[A-Za-z0-9._-]{1,32}",
            y in "[A-Za-z0-9._-]{1,32}",
            z in "[A-Za-z0-9._-]{1,32}",
            with_cookie in any::<bool>(),
        ) {
            let bearer = format!("Bearer {x}");
            let cookie = format!("ory_kratos_session={z}");
            let mut pairs = vec![("x-session-token", y.as_str()), ("authorization", bearer.as_str())];
            if with_cookie {
                pairs.push(("cookie", cookie.as_str()));
            }
            let c = extract(&headers(&pairs)).unwrap();
            prop_assert_eq!(c.token(), x.as_str());
            prop_assert_eq!(c.transport(), Transport::Bearer);
        }
    }
}
