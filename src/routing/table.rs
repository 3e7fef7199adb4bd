//! Route table construction and dispatch.

use std::collections::HashMap;

use axum::Router;

use crate::config::DomainSpec;

/// Which surface a host resolves to. Used for logging, metrics and tests;
/// the actual request handling lives in the wrapped service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// Apex domain: permanent redirect to the canonical www host.
    Redirect,
    /// www host: public marketing/registration surface.
    Website,
    /// Static-asset server.
    Assets,
    /// Wildcard tenant backend.
    Backend,
}

impl HandlerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerKind::Redirect => "redirect",
            HandlerKind::Website => "website",
            HandlerKind::Assets => "assets",
            HandlerKind::Backend => "backend",
        }
    }
}

/// A routing target: a surface kind plus the service that handles it.
#[derive(Clone)]
pub struct Handler {
    kind: HandlerKind,
    service: Router,
}

impl Handler {
    pub fn new(kind: HandlerKind, service: Router) -> Self {
        Self { kind, service }
    }

    pub fn kind(&self) -> HandlerKind {
        self.kind
    }

    pub fn service(&self) -> &Router {
        &self.service
    }
}

/// Immutable mapping from normalized host to handler, with a wildcard
/// fallback that guarantees every request resolves somewhere.
///
/// Built once after validation succeeds; consulted per-request, never
/// mutated afterwards.
pub struct RouteTable {
    exact: HashMap<String, Handler>,
    wildcard: Handler,
}

impl RouteTable {
    /// Build the table from a validated domain spec.
    ///
    /// Precedence (highest first), all exact matches except the wildcard:
    /// 1. apex → redirect to `www.<primary>`
    /// 2. `www.<apex>` → website surface
    /// 3. each static domain → asset server
    /// 4. `"*"` → tenant backend (catch-all)
    ///
    /// Calling this with a spec that failed validation is a programming
    /// error; keys are derived deterministically from the spec.
    pub fn build(
        spec: &DomainSpec,
        redirect: Router,
        website: Router,
        assets: Router,
        backend: Router,
    ) -> Self {
        let mut exact = HashMap::new();
        let apex = strip_port(&spec.primary).to_string();

        insert_unique(&mut exact, apex.clone(), Handler::new(HandlerKind::Redirect, redirect));
        insert_unique(
            &mut exact,
            format!("www.{apex}"),
            Handler::new(HandlerKind::Website, website),
        );
        for domain in &spec.static_domains {
            insert_unique(
                &mut exact,
                strip_port(domain).to_string(),
                Handler::new(HandlerKind::Assets, assets.clone()),
            );
        }

        Self {
            exact,
            wildcard: Handler::new(HandlerKind::Backend, backend),
        }
    }

    /// Resolve a host to its handler. Strips any `:port` suffix, then does
    /// an exact lookup with wildcard fallback. Never fails.
    ///
    /// The host must already be lowercased; `normalize_host` does both.
    pub fn route(&self, host: &str) -> &Handler {
        self.resolve(host).0
    }

    /// Like `route`, but also reports whether the match was exact. A
    /// non-exact match means the wildcard caught a host the table has no
    /// entry for, which is the trigger for on-demand certificate requests.
    pub fn resolve(&self, host: &str) -> (&Handler, bool) {
        match self.exact.get(strip_port(host)) {
            Some(handler) => (handler, true),
            None => (&self.wildcard, false),
        }
    }

    /// Exact-match hosts, for startup logging.
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.exact.keys().map(String::as_str)
    }
}

fn insert_unique(exact: &mut HashMap<String, Handler>, key: String, handler: Handler) {
    match exact.entry(key) {
        std::collections::hash_map::Entry::Vacant(slot) => {
            slot.insert(handler);
        }
        std::collections::hash_map::Entry::Occupied(existing) => {
            tracing::warn!(
                host = %existing.key(),
                kept = existing.get().kind().as_str(),
                skipped = handler.kind().as_str(),
                "duplicate route key; keeping higher-precedence entry"
            );
        }
    }
}

/// Strip a `:port` suffix from a host, if present.
pub fn strip_port(host: &str) -> &str {
    host.split(':').next().unwrap_or(host)
}

/// Normalize a host for lookup: lowercase and strip any port suffix.
pub fn normalize_host(host: &str) -> String {
    strip_port(host).to_ascii_lowercase()
}
