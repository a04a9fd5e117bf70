//! Derived object names
//!
//! Route and service names end up in DNS labels, which cap their length.
//! Names computed here are part of the identity of objects the operator
//! creates, so the same input must always produce the same output.

use std::borrow::Cow;

/// Maximum length of a route object name (DNS label).
pub const MAX_ROUTE_OBJECT_NAME_LENGTH: usize = 63;

pub const SITE_ROUTE_NAME_SUFFIX: &str = "-route-site";
pub const SITE_SERVICE_NAME_SUFFIX: &str = "-site";
pub const EXTERNAL_SERVICE_NAME_SUFFIX: &str = "-external";
pub const ADMIN_SECRET_NAME_SUFFIX: &str = "-generated-operator-secret";
pub const GENERATED_SECRET_SUFFIX: &str = "generated-secret";

/// Filler appended to a truncated external service name.
pub const EXTERNAL_SERVICE_FILLER: char = 'a';

/// Cuts `base` so that it leaves room for `reserved` characters plus one
/// disambiguating character under `ceiling`. Returns `base` untouched when
/// `base` and the reserved characters already fit.
pub fn truncate_base(base: &str, reserved: usize, ceiling: usize) -> Cow<'_, str> {
    if base.chars().count() + reserved <= ceiling {
        return Cow::Borrowed(base);
    }
    let keep = ceiling.saturating_sub(reserved).saturating_sub(1);
    Cow::Owned(base.chars().take(keep).collect())
}

/// `base + suffix`, with `base` cut short when the result would exceed
/// `ceiling`. A truncated result is one character shorter than `ceiling`.
pub fn truncate_with_suffix(base: &str, suffix: &str, ceiling: usize) -> String {
    let base = truncate_base(base, suffix.chars().count(), ceiling);
    format!("{}{}", base, suffix)
}

/// Like [`truncate_with_suffix`], but places `filler` between the cut base
/// and the suffix whenever truncation happened.
pub fn truncate_with_filler(base: &str, suffix: &str, ceiling: usize, filler: char) -> String {
    match truncate_base(base, suffix.chars().count(), ceiling) {
        Cow::Borrowed(base) => format!("{}{}", base, suffix),
        Cow::Owned(cut) => format!("{}{}{}", cut, filler, suffix),
    }
}

/// Route name for cross-site replication of the named cluster.
pub fn site_route_name(cluster_name: &str) -> String {
    truncate_with_suffix(
        cluster_name,
        SITE_ROUTE_NAME_SUFFIX,
        MAX_ROUTE_OBJECT_NAME_LENGTH,
    )
}

pub fn site_service_name(cluster_name: &str) -> String {
    format!("{}{}", cluster_name, SITE_SERVICE_NAME_SUFFIX)
}

/// Fully qualified in-cluster DNS name of a service.
pub fn service_fqn(service: &str, namespace: &str) -> String {
    format!("{}.{}.svc.cluster.local", service, namespace)
}

/// External service name. Routes derive their host from `<service>-<namespace>`,
/// so when exposed through a route the name is shortened to keep that host
/// within the ceiling, and ends with `filler` to mark the truncation.
pub fn external_service_name(
    cluster_name: &str,
    namespace: &str,
    exposed_by_route: bool,
    filler: char,
) -> String {
    let name = format!("{}{}", cluster_name, EXTERNAL_SERVICE_NAME_SUFFIX);
    if !exposed_by_route {
        return name;
    }
    // Route host is "<service>-<namespace>"
    match truncate_base(&name, namespace.chars().count() + 1, MAX_ROUTE_OBJECT_NAME_LENGTH) {
        Cow::Borrowed(_) => name,
        Cow::Owned(cut) => format!("{}{}", cut, filler),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_is_not_truncated() {
        let base = "a".repeat(10);
        let name = truncate_with_suffix(&base, SITE_ROUTE_NAME_SUFFIX, 63);
        assert_eq!(name, format!("{}-route-site", base));
    }

    #[test]
    fn test_long_name_is_truncated() {
        let base = "b".repeat(60);
        let name = truncate_with_suffix(&base, SITE_ROUTE_NAME_SUFFIX, 63);
        assert_eq!(name.len(), 62);
        assert_eq!(name, format!("{}-route-site", "b".repeat(51)));
    }

    #[test]
    fn test_name_that_exactly_fits() {
        let base = "c".repeat(52);
        let name = truncate_with_suffix(&base, SITE_ROUTE_NAME_SUFFIX, 63);
        assert_eq!(name.len(), 63);
        assert!(name.starts_with(&base));

        let base = "c".repeat(53);
        let name = truncate_with_suffix(&base, SITE_ROUTE_NAME_SUFFIX, 63);
        assert_eq!(name.len(), 62);
    }

    #[test]
    fn test_truncation_is_deterministic() {
        let base = "my-very-long-data-grid-cluster-name-that-goes-on-and-on-forever";
        assert_eq!(site_route_name(base), site_route_name(base));
    }

    #[test]
    fn test_truncation_is_total() {
        assert_eq!(truncate_with_suffix("", "", 63), "");
        assert_eq!(truncate_with_suffix("", SITE_ROUTE_NAME_SUFFIX, 63), "-route-site");
        // Ceiling smaller than the suffix keeps only the suffix
        assert_eq!(truncate_with_suffix("grid", SITE_ROUTE_NAME_SUFFIX, 5), "-route-site");
        assert_eq!(truncate_with_suffix("grid", "", 0), "");

        let max = "d".repeat(63);
        assert_eq!(truncate_with_suffix(&max, "", 63), max);
        assert_eq!(truncate_with_suffix(&max, "-x", 63).len(), 62);
    }

    #[test]
    fn test_truncate_with_filler() {
        let base = "e".repeat(60);
        let name = truncate_with_filler(&base, SITE_ROUTE_NAME_SUFFIX, 63, 'z');
        assert_eq!(name, format!("{}z-route-site", "e".repeat(51)));
        assert_eq!(name.len(), 63);

        assert_eq!(truncate_with_filler("grid", "-x", 63, 'z'), "grid-x");
    }

    #[test]
    fn test_truncation_counts_characters() {
        let base = "é".repeat(60);
        let name = truncate_with_suffix(&base, SITE_ROUTE_NAME_SUFFIX, 63);
        assert_eq!(name.chars().count(), 62);
    }

    #[test]
    fn test_external_service_name() {
        assert_eq!(
            external_service_name("grid", "ns", false, EXTERNAL_SERVICE_FILLER),
            "grid-external"
        );
        assert_eq!(
            external_service_name("grid", "ns", true, EXTERNAL_SERVICE_FILLER),
            "grid-external"
        );

        let namespace = "n".repeat(20);
        let cluster = "g".repeat(40);
        let name = external_service_name(&cluster, &namespace, true, EXTERNAL_SERVICE_FILLER);
        // 63 - 20 - 2 characters kept, then the filler
        assert_eq!(name.len(), 42);
        assert!(name.ends_with('a'));
        assert_eq!(format!("{}-{}", name, namespace).len(), 63);

        // Not exposed through a route: never truncated
        let long = external_service_name(&cluster, &namespace, false, EXTERNAL_SERVICE_FILLER);
        assert_eq!(long, format!("{}-external", cluster));
    }

    #[test]
    fn test_site_service_names() {
        assert_eq!(site_service_name("grid"), "grid-site");
        assert_eq!(service_fqn("grid-site", "ns"), "grid-site.ns.svc.cluster.local");
    }
}
