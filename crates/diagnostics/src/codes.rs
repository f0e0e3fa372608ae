//! Diagnostic ID constants (`GS1Pxxxx`).
//!
//! Generated from `spec/diagnostics.jsonc` by `build.rs`. `11xx`–`14xx`
//! are required-field errors, `21xx` are decoder observations. [`ALL`]
//! lists every code in catalogue order.

include!(concat!(env!("OUT_DIR"), "/generated_codes.rs"));
