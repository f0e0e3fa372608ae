//! Build script for generating diagnostic code data structures at compile time.
//!
//! This script reads `spec/diagnostics.jsonc` and generates Rust files:
//! - `generated_codes.rs`: public constants mapping diagnostic constant names to their IDs,
//!   plus an `ALL` slice in catalogue order
//! - `generated_explain.rs`: a match expression mapping diagnostic IDs to their descriptions
//! - `generated_severity.rs`: code → default severity lookup
//! - `generated_templates.rs`: (code, locale) → message template lookup

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::Path;

use gs1_pharma_jsonc_strip::to_strict_json;

/// Locales every catalogue entry must provide a template for.
const LOCALES: &[&str] = &["tr", "en"];

fn main() {
    let spec_path = Path::new("spec/diagnostics.jsonc");
    println!("cargo:rerun-if-changed={}", spec_path.display());

    let raw = fs::read_to_string(spec_path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", spec_path.display()));

    let spec: serde_json::Value = serde_json::from_str(&to_strict_json(&raw))
        .expect("failed to parse diagnostics.jsonc as JSON");

    let diagnostics = spec["diagnostics"]
        .as_array()
        .expect("diagnostics.jsonc: expected `diagnostics` array");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let out_path = Path::new(&out_dir);

    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut seen_names: HashSet<String> = HashSet::new();

    let mut codes =
        String::from("// Auto-generated from spec/diagnostics.jsonc — DO NOT EDIT.\n\n");
    let mut all = String::from("/// Every diagnostic ID, in catalogue order.\npub const ALL: &[&str] = &[\n");
    let mut explain = String::from("match id {\n");
    let mut severity = String::from("match id {\n");
    let mut templates = String::from("match (id, locale) {\n");

    for (i, entry) in diagnostics.iter().enumerate() {
        let id = entry["id"]
            .as_str()
            .unwrap_or_else(|| panic!("diagnostics[{i}] missing `id`"));
        let const_name = entry["constName"]
            .as_str()
            .unwrap_or_else(|| panic!("diagnostics[{i}] (id={id}) missing `constName`"));
        let summary = entry["summary"]
            .as_str()
            .unwrap_or_else(|| panic!("diagnostics[{i}] (id={id}) missing `summary`"));
        let description = entry["description"]
            .as_str()
            .unwrap_or_else(|| panic!("diagnostics[{i}] (id={id}) missing `description`"));
        let sev = entry["severity"]
            .as_str()
            .unwrap_or_else(|| panic!("diagnostics[{i}] (id={id}) missing `severity`"));

        assert!(
            !const_name.is_empty()
                && const_name
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
                && const_name.as_bytes()[0].is_ascii_uppercase(),
            "diagnostics[{i}] (id={id}): constName '{const_name}' is not a valid SCREAMING_SNAKE_CASE identifier"
        );
        assert!(
            seen_ids.insert(id.to_string()),
            "diagnostics[{i}]: duplicate id '{id}'"
        );
        assert!(
            seen_names.insert(const_name.to_string()),
            "diagnostics[{i}] (id={id}): duplicate constName '{const_name}'"
        );

        // ── generated_codes.rs ──────────────────────────────────────────
        codes.push_str(&format!("/// {summary}\n"));
        codes.push_str(&format!("pub const {const_name}: &str = \"{id}\";\n\n"));
        all.push_str(&format!("    {const_name},\n"));

        // ── generated_explain.rs ────────────────────────────────────────
        explain.push_str(&format!(
            "    \"{id}\" => Some(\"{}\"),\n",
            escape_rust_string_literal(description)
        ));

        // ── generated_severity.rs ───────────────────────────────────────
        let sev_rs = match sev {
            "error" => "Severity::Error",
            "warn" => "Severity::Warn",
            "info" => "Severity::Info",
            other => panic!("diagnostics[{i}] (id={id}): invalid severity '{other}'"),
        };
        severity.push_str(&format!("    \"{id}\" => Some({sev_rs}),\n"));

        // ── generated_templates.rs ──────────────────────────────────────
        let context_keys: HashSet<&str> = entry["contextKeys"]
            .as_array()
            .unwrap_or_else(|| panic!("diagnostics[{i}] (id={id}) missing `contextKeys`"))
            .iter()
            .map(|k| {
                k.as_str().unwrap_or_else(|| {
                    panic!("diagnostics[{i}] (id={id}) contextKeys entries must be strings")
                })
            })
            .collect();
        let map = entry["messageTemplates"]
            .as_object()
            .unwrap_or_else(|| panic!("diagnostics[{i}] (id={id}) missing `messageTemplates`"));
        for locale in LOCALES {
            assert!(
                map.contains_key(*locale),
                "diagnostics[{i}] (id={id}) has no `{locale}` message template"
            );
        }
        for (locale, template) in map {
            assert!(
                LOCALES.contains(&locale.as_str()),
                "diagnostics[{i}] (id={id}) messageTemplates has unsupported locale '{locale}'"
            );
            let template = template.as_str().unwrap_or_else(|| {
                panic!("diagnostics[{i}] (id={id}) messageTemplates.{locale} must be a string")
            });
            for placeholder in extract_template_placeholders(template) {
                assert!(
                    context_keys.contains(placeholder.as_str()),
                    "diagnostics[{i}] (id={id}) messageTemplates.{locale} references placeholder '{{{placeholder}}}' not listed in contextKeys"
                );
            }
            templates.push_str(&format!(
                "    (\"{id}\", \"{locale}\") => Some(\"{}\"),\n",
                escape_rust_string_literal(template)
            ));
        }
    }

    all.push_str("];\n");
    codes.push_str(&all);
    explain.push_str("    _ => None,\n}\n");
    severity.push_str("    _ => None,\n}\n");
    templates.push_str("    _ => None,\n}\n");

    fs::write(out_path.join("generated_codes.rs"), &codes)
        .expect("failed to write generated_codes.rs");
    fs::write(out_path.join("generated_explain.rs"), &explain)
        .expect("failed to write generated_explain.rs");
    fs::write(out_path.join("generated_severity.rs"), &severity)
        .expect("failed to write generated_severity.rs");
    fs::write(out_path.join("generated_templates.rs"), &templates)
        .expect("failed to write generated_templates.rs");
}

fn escape_rust_string_literal(value: &str) -> String {
    value.chars().flat_map(char::escape_default).collect()
}

fn extract_template_placeholders(template: &str) -> HashSet<String> {
    let mut placeholders = HashSet::new();
    let mut scan_from = 0usize;
    while let Some(open_rel) = template[scan_from..].find('{') {
        let open = scan_from + open_rel;
        let after_open = open + 1;
        if let Some(close_rel) = template[after_open..].find('}') {
            let close = after_open + close_rel;
            let key = template[after_open..close].trim();
            if !key.is_empty() {
                placeholders.insert(key.to_string());
            }
            scan_from = close + 1;
        } else {
            break;
        }
    }
    placeholders
}
