//! Provider registry: display metadata for known review publishers
//!
//! Publisher labels in the snapshot are free text ("Google", "google ",
//! "Door Dash"), so lookups compare a normalized key on both sides.

use serde::Serialize;

/// Display metadata for a known publisher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderMeta {
    pub label: &'static str,
    /// Hex color used for charts and legend dots
    pub color: &'static str,
    /// Whether reviews on this platform come from on-premises guests
    pub on_premises: bool,
}

const PROVIDERS: [ProviderMeta; 9] = [
    ProviderMeta {
        label: "Google",
        color: "#F6BA79",
        on_premises: true,
    },
    ProviderMeta {
        label: "Yelp",
        color: "#6CA2ED",
        on_premises: true,
    },
    ProviderMeta {
        label: "Facebook",
        color: "#91B1D5",
        on_premises: true,
    },
    ProviderMeta {
        label: "Ezcater",
        color: "#96D4A0",
        on_premises: false,
    },
    ProviderMeta {
        label: "OpenTable",
        color: "#F4737E",
        on_premises: true,
    },
    ProviderMeta {
        label: "DoorDash",
        color: "#F799A1",
        on_premises: false,
    },
    ProviderMeta {
        label: "GrubHub",
        color: "#F68261",
        on_premises: false,
    },
    ProviderMeta {
        label: "TripAdvisor",
        color: "#9C75CD",
        on_premises: true,
    },
    ProviderMeta {
        label: "UberEats",
        color: "#4A35A3",
        on_premises: false,
    },
];

/// Normalize a publisher label to its lookup key.
///
/// Lower-cases and removes all whitespace: "Door Dash " → "doordash".
pub fn normalize_label_key(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Find registry metadata for a publisher label (case/space insensitive)
pub fn lookup(label: &str) -> Option<&'static ProviderMeta> {
    let key = normalize_label_key(label);
    PROVIDERS
        .iter()
        .find(|p| normalize_label_key(p.label) == key)
}

/// All known providers in registry order
pub fn all() -> &'static [ProviderMeta] {
    &PROVIDERS
}

/// Icon key a badge renderer uses for this label
pub fn icon_key(label: &str) -> Option<String> {
    let key = normalize_label_key(label);
    (!key.is_empty()).then_some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== normalize_label_key ==========

    #[test]
    fn test_normalize_lowercases() {
        assert_eq!(normalize_label_key("OpenTable"), "opentable");
    }

    #[test]
    fn test_normalize_strips_all_whitespace() {
        assert_eq!(normalize_label_key(" Door \tDash\n"), "doordash");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_label_key(""), "");
    }

    // ========== lookup ==========

    #[test]
    fn test_lookup_case_insensitive() {
        let a = lookup("google").unwrap();
        let b = lookup("Google").unwrap();
        let c = lookup("GOOGLE ").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.color, "#F6BA79");
        assert!(a.on_premises);
    }

    #[test]
    fn test_lookup_with_inner_whitespace() {
        let meta = lookup("Uber Eats").unwrap();
        assert_eq!(meta.label, "UberEats");
        assert!(!meta.on_premises);
    }

    #[test]
    fn test_lookup_unknown() {
        assert!(lookup("Foursquare").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_off_premises_providers() {
        let off: Vec<&str> = all()
            .iter()
            .filter(|p| !p.on_premises)
            .map(|p| p.label)
            .collect();
        assert_eq!(off, vec!["Ezcater", "DoorDash", "GrubHub", "UberEats"]);
    }

    #[test]
    fn test_registry_order_is_fixed() {
        assert_eq!(all().len(), 9);
        assert_eq!(all()[0].label, "Google");
        assert_eq!(all()[8].label, "UberEats");
    }

    #[test]
    fn test_icon_key() {
        assert_eq!(icon_key("Trip Advisor"), Some("tripadvisor".to_string()));
        assert_eq!(icon_key("  "), None);
    }
}
