//! Client-side cookie storage.
//!
//! Mirrors what a browser keeps for the page: `name=value` pairs with an
//! optional expiry, always scoped to `path=/`.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};

const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Read/write access to the cookies visible to the interface.
pub trait CookieStore: Send {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&mut self, name: &str, value: &str, days: i64);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub expires: Option<DateTime<Utc>>,
}

impl Cookie {
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }

    /// Parse a line produced by [`Cookie`]'s `Display` impl.
    #[must_use]
    pub fn parse_set_cookie(line: &str) -> Option<Self> {
        let mut parts = line.split(';');
        let (name, value) = parts.next()?.trim().split_once('=')?;
        if name.is_empty() || value.is_empty() {
            return None;
        }

        let mut expires = None;
        for attr in parts {
            if let Some((key, raw)) = attr.trim().split_once('=')
                && key.eq_ignore_ascii_case("expires")
            {
                match NaiveDateTime::parse_from_str(raw.trim(), EXPIRES_FORMAT) {
                    Ok(naive) => expires = Some(naive.and_utc()),
                    Err(err) => {
                        tracing::debug!(cookie = name, error = %err, "Ignoring malformed expiry");
                    }
                }
            }
        }

        Some(Self {
            name: name.to_string(),
            value: value.to_string(),
            expires,
        })
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={};path=/", self.name, self.value)?;
        if let Some(expires) = self.expires {
            write!(f, ";expires={}", expires.format(EXPIRES_FORMAT))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: Vec<Cookie>,
}

impl CookieJar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `Cookie:` request header (`a=1; b=2`).
    ///
    /// Entries without a value are skipped, matching how the page reads them.
    #[must_use]
    pub fn from_header(header: &str) -> Self {
        let cookies = header
            .split(';')
            .filter_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (!name.is_empty() && !value.is_empty()).then(|| Cookie {
                    name: name.to_string(),
                    value: value.to_string(),
                    expires: None,
                })
            })
            .collect();
        Self { cookies }
    }

    /// Rebuild a jar from persisted `Set-Cookie`-style lines.
    #[must_use]
    pub fn from_lines(text: &str) -> Self {
        let mut jar = Self::new();
        for cookie in text.lines().filter_map(Cookie::parse_set_cookie) {
            jar.insert(cookie);
        }
        jar
    }

    /// One `Set-Cookie`-style line per live cookie.
    #[must_use]
    pub fn to_lines(&self) -> String {
        let now = Utc::now();
        self.cookies
            .iter()
            .filter(|cookie| !cookie.is_expired_at(now))
            .map(|cookie| format!("{cookie}\n"))
            .collect()
    }

    #[must_use]
    pub fn get_at(&self, name: &str, now: DateTime<Utc>) -> Option<&str> {
        self.cookies
            .iter()
            .find(|cookie| cookie.name == name && !cookie.is_expired_at(now))
            .map(|cookie| cookie.value.as_str())
    }

    /// Store `name=value` expiring `days` from `now`; returns the stored cookie.
    pub fn set_at(&mut self, name: &str, value: &str, days: i64, now: DateTime<Utc>) -> &Cookie {
        let expires = TimeDelta::try_days(days)
            .and_then(|delta| now.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.insert(Cookie {
            name: name.to_string(),
            value: value.to_string(),
            expires: Some(expires),
        })
    }

    fn insert(&mut self, cookie: Cookie) -> &Cookie {
        self.cookies.retain(|existing| existing.name != cookie.name);
        self.cookies.push(cookie);
        &self.cookies[self.cookies.len() - 1]
    }
}

impl CookieStore for CookieJar {
    fn get(&self, name: &str) -> Option<String> {
        self.get_at(name, Utc::now()).map(ToString::to_string)
    }

    fn set(&mut self, name: &str, value: &str, days: i64) {
        let cookie = self.set_at(name, value, days, Utc::now());
        tracing::debug!(cookie = %cookie, "Cookie stored");
    }
}
