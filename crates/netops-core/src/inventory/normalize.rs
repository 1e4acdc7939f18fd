//! Vendor / OS / role normalization
//!
//! Maps free-form strings from a source-of-truth API onto the canonical
//! vocabulary used in local inventories. All functions are total: anything
//! the tables do not cover falls through to a generic casing rule.

/// Canonical vendor names keyed by their trimmed, lower-cased spelling
const VENDOR_SYNONYMS: &[(&str, &str)] = &[
    ("edgecore", "EdgeCore"),
    ("cisco", "Cisco"),
    ("arista", "Arista"),
    ("celtica", "Celtica"),
    ("nvidia", "NVIDIA"),
    ("nvidia corporation", "NVIDIA"),
];

pub fn normalize_vendor(raw: &str) -> String {
    let vendor = raw.trim().to_lowercase();
    if vendor.is_empty() {
        return "Unknown".to_string();
    }
    VENDOR_SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == vendor)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| title_case(&vendor))
}

/// Substring sniffing in a fixed order. `nx-os`/`nexus` is tested before
/// `ios`, so a string containing both classifies as NX-OS.
pub fn normalize_os(raw: &str) -> String {
    let os = raw.trim();
    if os.is_empty() {
        return "Unknown".to_string();
    }
    let lower = os.to_lowercase();
    if lower.contains("sonic") {
        "SONiC".to_string()
    } else if lower.contains("nx-os") || lower.contains("nexus") {
        "NX-OS".to_string()
    } else if lower.contains("ios") {
        "IOS".to_string()
    } else if lower.contains("custom") {
        "Custom".to_string()
    } else {
        title_case(os)
    }
}

pub fn normalize_role(raw: &str) -> String {
    let role = raw.trim().to_lowercase();
    if role.is_empty() {
        return "unknown".to_string();
    }
    if role.contains("spine") {
        "spine".to_string()
    } else if role.contains("leaf") {
        "leaf".to_string()
    } else if role.contains("core") {
        "core".to_string()
    } else if role.contains("aggregation") || role.contains("agg") {
        "aggregation".to_string()
    } else {
        role
    }
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest
/// (`"juniper networks"` -> `"Juniper Networks"`, `"hpe-aruba"` -> `"Hpe-Aruba"`).
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_word = false;
    for c in input.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs() {
        assert_eq!(normalize_vendor(""), "Unknown");
        assert_eq!(normalize_os(""), "Unknown");
        assert_eq!(normalize_role(""), "unknown");
        assert_eq!(normalize_vendor("   "), "Unknown");
    }

    #[test]
    fn test_vendor_synonyms() {
        assert_eq!(normalize_vendor("  CISCO "), "Cisco");
        assert_eq!(normalize_vendor("edgecore"), "EdgeCore");
        assert_eq!(normalize_vendor("Nvidia Corporation"), "NVIDIA");
        assert_eq!(normalize_vendor("celtica"), "Celtica");
        assert_eq!(normalize_vendor("juniper networks"), "Juniper Networks");
    }

    #[test]
    fn test_vendor_is_idempotent_on_canonical_forms() {
        for raw in ["EdgeCore", "cisco", "NVIDIA", "juniper", "", "hpe-aruba"] {
            let once = normalize_vendor(raw);
            assert_eq!(normalize_vendor(&once), once, "raw input {:?}", raw);
        }
    }

    #[test]
    fn test_os_sniffing() {
        assert_eq!(normalize_os("cisco NX-OS 9.3"), "NX-OS");
        assert_eq!(normalize_os("Nexus 9000"), "NX-OS");
        assert_eq!(normalize_os("Enterprise SONiC 4.1"), "SONiC");
        assert_eq!(normalize_os("IOS-XE"), "IOS");
        assert_eq!(normalize_os("custom-build"), "Custom");
        assert_eq!(normalize_os("junos"), "Junos");
    }

    #[test]
    fn test_os_precedence_prefers_nxos_over_ios() {
        assert_eq!(normalize_os("cisco-ios-nx-os-compat"), "NX-OS");
    }

    #[test]
    fn test_role_sniffing() {
        assert_eq!(normalize_role("Leaf-Access"), "leaf");
        assert_eq!(normalize_role("DC Spine"), "spine");
        assert_eq!(normalize_role("Core Router"), "core");
        assert_eq!(normalize_role("Agg-Switch"), "aggregation");
        assert_eq!(normalize_role("Border GW"), "border gw");
    }

    #[test]
    fn test_title_case_handles_digits() {
        assert_eq!(title_case("abc123def"), "Abc123Def");
        assert_eq!(title_case("ALL CAPS"), "All Caps");
    }
}
