// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! In-memory cookie store with an ordered enumeration contract.

use std::collections::HashMap;
use std::sync::RwLock;

use indexmap::IndexMap;

/// Enumeration cursor state delivered alongside each visited cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookiesRemaining {
    /// The source has no entries at all. The visitor runs exactly once
    /// with empty name and value so it can finalize.
    NoCookies,
    /// The entry just delivered was the last one.
    NoMore,
    /// Further entries follow this one.
    More,
}

/// Cookies per origin, in insertion order. Setting an existing name
/// updates the value in place without moving it.
///
/// Safe to share across contexts; enumeration sees a consistent
/// snapshot of one origin.
#[derive(Default)]
pub struct CookieJar {
    origins: RwLock<HashMap<String, IndexMap<String, String>>>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or update) one cookie for `origin`.
    pub fn set(&self, origin: &str, name: &str, value: &str) {
        let mut origins = self.origins.write().unwrap();
        origins
            .entry(origin.to_string())
            .or_default()
            .insert(name.to_string(), value.to_string());
    }

    /// Remove every cookie stored for `origin`.
    pub fn clear(&self, origin: &str) {
        self.origins.write().unwrap().remove(origin);
    }

    /// Snapshot of `origin`'s cookies, in insertion order. Unknown
    /// origins yield an empty map.
    pub fn cookie_map(&self, origin: &str) -> IndexMap<String, String> {
        self.origins
            .read()
            .unwrap()
            .get(origin)
            .cloned()
            .unwrap_or_default()
    }

    /// Visit `origin`'s cookies in insertion order.
    ///
    /// An empty (or unknown) origin still produces exactly one visit,
    /// with empty name/value and [`CookiesRemaining::NoCookies`]; the
    /// last real entry arrives with [`CookiesRemaining::NoMore`].
    pub fn for_each_cookie<F>(&self, origin: &str, mut visit: F)
    where
        F: FnMut(&str, &str, CookiesRemaining),
    {
        let snapshot = self.cookie_map(origin);
        if snapshot.is_empty() {
            visit("", "", CookiesRemaining::NoCookies);
            return;
        }
        let last = snapshot.len() - 1;
        for (i, (name, value)) in snapshot.iter().enumerate() {
            let remaining = if i == last {
                CookiesRemaining::NoMore
            } else {
                CookiesRemaining::More
            };
            visit(name, value, remaining);
        }
    }
}
