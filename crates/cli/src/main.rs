mod render;

use std::fs;
use std::io;
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use gs1_pharma_core::{
    Ai, Locale, Policy, ScanOutcome, decode_with_locale, gtin_check_digit, gtin_checksum_ok,
    validate_scan,
};
use gs1_pharma_diagnostics::{self as diag, Diagnostic, Severity};
use gs1_pharma_policy::load_policy_from_path;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::render::{Format, print_summary, render_diagnostics};

/// Label used for the payload in source-annotated diagnostics.
const SCAN_LABEL: &str = "<scan>";

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "gs1",
    version,
    about = "GS1 pharma scan tools: decode and validate data-matrix payloads"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Validation policy file (JSON or JSONC).
    #[arg(long, global = true, env = "GS1_POLICY")]
    policy: Option<String>,

    /// Enforce the GTIN check digit, whatever the policy says.
    #[arg(long, global = true)]
    strict_gtin: bool,

    /// Language for diagnostic messages (overrides the policy).
    #[arg(long, global = true, value_enum)]
    locale: Option<LocaleArg>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Decode a scan payload and print its fields.
    Decode {
        /// Raw payload; `-` or omitted reads stdin.
        payload: Option<String>,
    },

    /// Validate a scan payload (exit 1 when rejected).
    #[command(alias = "check")]
    Validate {
        /// Raw payload; `-` or omitted reads stdin.
        payload: Option<String>,
    },

    /// Validate one payload per line (exit 1 when any is rejected).
    Batch {
        /// Input file; `-` or omitted reads stdin.
        file: Option<String>,
    },

    /// Verify a 13/14 digit GTIN, or compute the check digit for a body.
    CheckDigit {
        gtin: String,
        /// Treat the input as a 12/13 digit body and print the full GTIN.
        #[arg(long)]
        compute: bool,
    },

    /// Explain a diagnostic ID (e.g. GS1P1301).
    Explain { id: String },
}

/// Message language.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LocaleArg {
    /// Turkish.
    Tr,
    /// English.
    En,
}

impl From<LocaleArg> for Locale {
    fn from(l: LocaleArg) -> Self {
        match l {
            LocaleArg::Tr => Locale::Tr,
            LocaleArg::En => Locale::En,
        }
    }
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    match &cli.cmd {
        Cmd::Decode { payload } => cmd_decode(&cli, payload.as_deref(), format)?,
        Cmd::Validate { payload } => cmd_validate(&cli, payload.as_deref(), format)?,
        Cmd::Batch { file } => cmd_batch(&cli, file.as_deref(), format)?,
        Cmd::CheckDigit { gtin, compute } => cmd_check_digit(gtin, *compute, format)?,
        Cmd::Explain { id } => cmd_explain(id, format)?,
    }

    Ok(())
}

/// Log to stderr, filtered by `GS1_LOG` (falling back to `RUST_LOG`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("GS1_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_decode(cli: &Cli, payload: Option<&str>, format: Format) -> Result<()> {
    let policy = resolve_policy(cli)?;
    let input = read_payload(payload)?;
    let res = decode_with_locale(&input, policy.locale);

    match format {
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(&res)?);
        }
        Format::Pretty => {
            // Fields to stdout, diagnostics to stderr.
            for field in &res.fields {
                println!("{:<4} {:<7} {}", field.ai.code(), field.ai.name(), field.value);
            }
            render_diagnostics(&res.normalized, SCAN_LABEL, &res.diagnostics, format);
            print_summary(&res.diagnostics);
        }
    }

    Ok(())
}

fn cmd_validate(cli: &Cli, payload: Option<&str>, format: Format) -> Result<()> {
    let policy = resolve_policy(cli)?;
    let input = read_payload(payload)?;
    let vr = validate_scan(&input, &policy);
    let outcome = vr.outcome();

    match format {
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Format::Pretty => {
            render_diagnostics(&vr.decoded.normalized, SCAN_LABEL, &vr.issues, format);
            print_summary(&vr.issues);
            println!("{}", outcome_line(&outcome));
        }
    }

    exit_on_errors(&vr.issues);
    Ok(())
}

fn cmd_batch(cli: &Cli, file: Option<&str>, format: Format) -> Result<()> {
    let policy = resolve_policy(cli)?;
    let text = match file {
        Some(path) if path != "-" => fs::read_to_string(path)
            .with_context(|| format!("failed to read batch file '{path}'"))?,
        _ => io::read_to_string(io::stdin()).context("failed to read batch from stdin")?,
    };

    let mut results = Vec::new();
    let mut rejected = 0usize;
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let outcome = validate_scan(line, &policy).outcome();
        if !outcome.is_success() {
            rejected += 1;
        }
        results.push((idx + 1, line, outcome));
    }
    let total = results.len();
    tracing::debug!(total, rejected, "batch validated");

    match format {
        Format::Json => {
            let items: Vec<_> = results
                .iter()
                .map(|(line, input, outcome)| {
                    serde_json::json!({ "line": line, "input": input, "outcome": outcome })
                })
                .collect();
            let out = serde_json::json!({
                "results": items,
                "summary": {
                    "total": total,
                    "accepted": total - rejected,
                    "rejected": rejected,
                },
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            for (line, _, outcome) in &results {
                println!("{line:>5}: {}", outcome_line(outcome));
            }
            eprintln!("{total} scans, {} accepted, {rejected} rejected", total - rejected);
        }
    }

    if rejected > 0 {
        process::exit(1);
    }
    Ok(())
}

fn cmd_check_digit(gtin: &str, compute: bool, format: Format) -> Result<()> {
    let gtin = gtin.trim();
    if !gtin.bytes().all(|b| b.is_ascii_digit()) {
        bail!("'{gtin}' is not all digits");
    }

    let (body, given) = match (compute, gtin.len()) {
        (true, 12 | 13) | (false, 12) => (gtin, None),
        (false, 13 | 14) => {
            let (body, check) = gtin.split_at(gtin.len() - 1);
            (body, Some(check))
        }
        (true, n) => bail!("a GTIN body has 12 or 13 digits, got {n}"),
        (false, n) => bail!("a GTIN has 13 or 14 digits, got {n}"),
    };
    let digit = gtin_check_digit(body).context("check digit is undefined for this body")?;
    let full = format!("{body}{digit}");
    let valid = given.map(|_| gtin_checksum_ok(gtin));

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "input": gtin,
                "check_digit": digit,
                "gtin": full,
                "valid": valid,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => match valid {
            Some(true) => println!("{gtin}: check digit ok"),
            Some(false) => println!(
                "{gtin}: check digit mismatch (expected {digit}, found {})",
                given.unwrap_or_default()
            ),
            None => println!("{full}"),
        },
    }

    if valid == Some(false) {
        process::exit(1);
    }
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let text = diag::explain(id);
            let out = serde_json::json!({
                "id": id,
                "severity": diag::severity_for_code(id),
                "explanation": text,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Explanation is the command output, so stdout.
            if let Some(text) = diag::explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{}: (no explanation available)", id);
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Exit with code 1 if any diagnostic is an error.
/// Warnings and info do not cause a non-zero exit.
fn exit_on_errors(diagnostics: &[Diagnostic]) {
    if diagnostics
        .iter()
        .any(|d| matches!(d.severity, Severity::Error))
    {
        process::exit(1);
    }
}

/// Policy from `--policy` / `GS1_POLICY`, with flag overrides applied.
fn resolve_policy(cli: &Cli) -> Result<Policy> {
    let mut policy = match &cli.policy {
        Some(path) => load_policy_from_path(path)
            .with_context(|| format!("failed to load policy '{path}'"))?,
        None => Policy::default(),
    };
    if cli.strict_gtin {
        policy.strict_gtin_checksum = true;
    }
    if let Some(locale) = cli.locale {
        policy.locale = locale.into();
    }
    tracing::debug!(
        id = %policy.id,
        strict_gtin_checksum = policy.strict_gtin_checksum,
        reject_trailing_data = policy.reject_trailing_data,
        locale = policy.locale.as_str(),
        "policy resolved"
    );
    Ok(policy)
}

/// The payload argument, or all of stdin for `-` / no argument.
fn read_payload(arg: Option<&str>) -> Result<String> {
    match arg {
        Some(p) if p != "-" => Ok(p.to_string()),
        _ => io::read_to_string(io::stdin()).context("failed to read payload from stdin"),
    }
}

/// One-line human summary of an outcome.
fn outcome_line(outcome: &ScanOutcome) -> String {
    match outcome {
        ScanOutcome::Success(scan) => format!(
            "ok {}={} {}={} {}={} {}={}",
            Ai::Gtin.name(),
            scan.gtin,
            Ai::Expiry.name(),
            scan.exp,
            Ai::Lot.name(),
            scan.lot,
            Ai::Serial.name(),
            scan.serial
        ),
        ScanOutcome::Failure { message } => format!("rejected: {message}"),
    }
}
