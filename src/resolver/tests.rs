use std::cell::RefCell;

use trust_dns_resolver::error::ResolveError;

use super::{
    CandidateSource, LookupMailServers, MxRecord, ResolveFailure, normalize_exchange,
    resolve_candidates,
};

type LookupResult = Result<Vec<MxRecord>, ResolveError>;
type LookupFn = dyn Fn(&str) -> LookupResult;

/// Scripted resolver that records every query it answers.
pub(crate) struct StubResolver {
    pub on_lookup: Box<LookupFn>,
    pub addressable: Vec<String>,
    pub queries: RefCell<Vec<String>>,
}

impl StubResolver {
    pub(crate) fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> LookupResult + 'static,
    {
        Self {
            on_lookup: Box::new(f),
            addressable: Vec::new(),
            queries: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn with_records(records: Vec<MxRecord>) -> Self {
        Self::new(move |_| Ok(records.clone()))
    }

    pub(crate) fn empty() -> Self {
        Self::new(|domain| Err(ResolveError::from(format!("no records found for {domain}"))))
    }

    pub(crate) fn addressable(mut self, domain: &str) -> Self {
        self.addressable.push(domain.to_string());
        self
    }

    pub(crate) fn query_count(&self) -> usize {
        self.queries.borrow().len()
    }
}

impl LookupMailServers for StubResolver {
    fn lookup_mx(&self, domain: &str) -> LookupResult {
        self.queries.borrow_mut().push(format!("MX {domain}"));
        (self.on_lookup)(domain)
    }

    fn has_address(&self, domain: &str) -> bool {
        self.queries.borrow_mut().push(format!("A {domain}"));
        self.addressable.iter().any(|d| d == domain)
    }
}

#[test]
fn candidates_sorted_and_deduped() {
    let stub = StubResolver::new(|domain| {
        assert_eq!(domain, "example.com");
        Ok(vec![
            MxRecord::new(20, "mx2.example.com"),
            MxRecord::new(10, "mx1.example.com"),
            MxRecord::new(10, "mx1.example.com"),
            MxRecord::new(30, "mx3.example.com"),
        ])
    });

    let candidates = resolve_candidates(&stub, "example.com").expect("lookup succeeds");
    let hosts: Vec<_> = candidates.iter().map(|c| c.host.as_str()).collect();
    assert_eq!(
        hosts,
        ["mx1.example.com", "mx2.example.com", "mx3.example.com"]
    );
    assert_eq!(
        candidates[0].source,
        CandidateSource::Mx { preference: 10 }
    );
    assert_eq!(stub.query_count(), 1, "no address fallback when MX exists");
}

#[test]
fn falls_back_to_domain_address() {
    let stub = StubResolver::with_records(Vec::new()).addressable("example.com");
    let candidates = resolve_candidates(&stub, "example.com").expect("implicit mx");
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].host, "example.com");
    assert_eq!(candidates[0].source, CandidateSource::ImplicitMx);
}

#[test]
fn lookup_error_also_falls_back() {
    let stub = StubResolver::empty().addressable("example.com");
    let candidates = resolve_candidates(&stub, "example.com").expect("implicit mx");
    assert_eq!(candidates[0].source, CandidateSource::ImplicitMx);
}

#[test]
fn nothing_resolvable_is_server_not_found() {
    let stub = StubResolver::empty();
    let err = resolve_candidates(&stub, "nowhere.test").expect_err("no servers");
    assert!(matches!(err, ResolveFailure::ServerNotFound { ref domain } if domain == "nowhere.test"));
    assert_eq!(
        *stub.queries.borrow(),
        vec!["MX nowhere.test".to_string(), "A nowhere.test".to_string()]
    );
}

#[test]
fn normalize_exchange_trims_dot_and_lowercases() {
    let out = normalize_exchange("Mail.EXAMPLE.com.".to_string());
    assert_eq!(out, "mail.example.com");
}

#[test]
fn null_mx_is_server_not_found_without_address_fallback() {
    let stub = StubResolver::with_records(vec![MxRecord::new(0, normalize_exchange(".".into()))])
        .addressable("example.com");
    let err = resolve_candidates(&stub, "example.com").expect_err("null MX");
    assert!(matches!(err, ResolveFailure::ServerNotFound { .. }));
    assert_eq!(*stub.queries.borrow(), vec!["MX example.com".to_string()]);
}

#[test]
fn null_mx_mixed_with_real_exchange_is_ignored() {
    let stub = StubResolver::with_records(vec![
        MxRecord::new(0, ""),
        MxRecord::new(10, "mx1.example.com"),
    ]);
    let candidates = resolve_candidates(&stub, "example.com").expect("real exchange");
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].host, "mx1.example.com");
}
