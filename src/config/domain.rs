//! Domain spec parsing and validation.
//!
//! The gateway is configured with a single comma-separated list of domains.
//! The first entry is the canonical primary domain; every following entry
//! serves static assets. When only one domain is given it fills both roles,
//! which guarantees the static-asset path always has a domain to bind to.
//!
//! Parsing never fails fast: every malformed entry lands in the report so a
//! single run surfaces all problems at once.

use crate::config::validation::ValidationReport;

/// Field name used for all domain-spec validation errors.
const FIELD: &str = "domains.spec";

/// The validated domain set the route table is built from.
///
/// Constructed once at startup and immutable thereafter. Entries are
/// normalized to lowercase and may carry a `:port` suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSpec {
    /// Canonical apex domain, optionally with a port suffix.
    pub primary: String,
    /// Static-asset domains, in configuration order. Never empty when the
    /// report is clean.
    pub static_domains: Vec<String>,
}

impl DomainSpec {
    /// Parse a raw comma-separated domain spec.
    ///
    /// Always returns a spec alongside the report; the spec is only
    /// meaningful when the report has no errors.
    pub fn parse(raw: &str) -> (DomainSpec, ValidationReport) {
        let mut report = ValidationReport::new();

        if raw.trim().is_empty() {
            report.append(FIELD, "cannot be blank");
            return (
                DomainSpec {
                    primary: String::new(),
                    static_domains: Vec::new(),
                },
                report,
            );
        }

        let mut entries: Vec<String> = raw
            .split(',')
            .map(|e| e.trim().to_ascii_lowercase())
            .collect();

        // A single domain serves both as primary and as the sole static
        // domain, matching the duplication rule.
        if entries.len() == 1 {
            entries.push(entries[0].clone());
        }

        for (i, entry) in entries.iter().enumerate() {
            let host = match entry.split_once(':') {
                Some((host, port)) => {
                    if port.parse::<u16>().is_err() {
                        report.append(
                            FIELD,
                            format!("entry {}: {:?} is not a valid port", i + 1, port),
                        );
                    }
                    host
                }
                None => entry.as_str(),
            };

            if let Err(reason) = check_domain(host) {
                report.append(
                    FIELD,
                    format!("entry {}: {:?} is not a valid domain: {}", i + 1, host, reason),
                );
            }
        }

        let primary = entries[0].clone();
        let static_domains = entries.split_off(1);

        (
            DomainSpec {
                primary,
                static_domains,
            },
            report,
        )
    }
}

/// Check domain name syntax: at least two dot-separated labels, each 1-63
/// characters of ASCII alphanumerics and interior hyphens, 253 characters
/// total at most.
fn check_domain(domain: &str) -> Result<(), &'static str> {
    if domain.is_empty() {
        return Err("empty");
    }
    if domain.len() > 253 {
        return Err("longer than 253 characters");
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return Err("must have at least two labels");
    }

    for label in labels {
        if label.is_empty() {
            return Err("empty label");
        }
        if label.len() > 63 {
            return Err("label longer than 63 characters");
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err("label contains invalid characters");
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err("label starts or ends with a hyphen");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_domain_fills_both_roles() {
        let (spec, report) = DomainSpec::parse("example.com");
        assert!(!report.has_errors());
        assert_eq!(spec.primary, "example.com");
        assert_eq!(spec.static_domains, vec!["example.com"]);
    }

    #[test]
    fn first_entry_is_primary_rest_static() {
        let (spec, report) = DomainSpec::parse("example.com, cdn.example.com, static.example.com");
        assert!(!report.has_errors());
        assert_eq!(spec.primary, "example.com");
        assert_eq!(
            spec.static_domains,
            vec!["cdn.example.com", "static.example.com"]
        );
    }

    #[test]
    fn port_suffix_is_kept_but_not_validated_as_host() {
        let (spec, report) = DomainSpec::parse("example.com:8081, static.example.com:8081");
        assert!(!report.has_errors());
        assert_eq!(spec.primary, "example.com:8081");
    }

    #[test]
    fn invalid_port_is_reported() {
        let (_, report) = DomainSpec::parse("example.com:notaport");
        assert!(report.has_errors());
        assert!(report.to_string().contains("not a valid port"));
    }

    #[test]
    fn malformed_entries_do_not_short_circuit() {
        let (_, report) = DomainSpec::parse("not a domain, example.com, -also.bad");
        assert_eq!(report.errors().len(), 2);
        assert!(report.errors()[0].message.starts_with("entry 1"));
        assert!(report.errors()[1].message.starts_with("entry 3"));
    }

    #[test]
    fn blank_spec_is_an_error_not_a_panic() {
        let (spec, report) = DomainSpec::parse("   ");
        assert!(report.has_errors());
        assert!(spec.primary.is_empty());
    }

    #[test]
    fn stray_commas_produce_entry_errors() {
        let (_, report) = DomainSpec::parse(",example.com,");
        // Leading and trailing commas each produce an empty entry.
        assert_eq!(report.errors().len(), 2);
    }

    #[test]
    fn entries_are_lowercased() {
        let (spec, report) = DomainSpec::parse("Example.COM, CDN.Example.Com");
        assert!(!report.has_errors());
        assert_eq!(spec.primary, "example.com");
        assert_eq!(spec.static_domains, vec!["cdn.example.com"]);
    }

    #[test]
    fn single_label_hosts_are_rejected() {
        let (_, report) = DomainSpec::parse("localhost");
        assert!(report.has_errors());
    }

    #[test]
    fn hyphen_placement_is_checked() {
        for bad in ["-bad.example.com", "bad-.example.com"] {
            let (_, report) = DomainSpec::parse(bad);
            assert!(report.has_errors(), "{bad} should be rejected");
        }
        let (_, report) = DomainSpec::parse("my-site.example.com");
        assert!(!report.has_errors());
    }
}
