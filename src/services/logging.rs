// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Log setup and sensitive data anonymization.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install the global `tracing` subscriber.
///
/// The filter comes from `RUST_LOG`, falling back to `info` (or `debug` with
/// `verbose`). Logs go to stderr so command output on stdout stays clean.
/// Calling this twice is harmless.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Anonymize an email address for logging.
/// Shows first character and domain, hides the rest: "a***@example.com"
pub fn anonymize_email(email: &str) -> String {
    match email.trim().split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) => format!("{first}***@{domain}"),
            None => format!("***@{domain}"),
        },
        // Not an email, redact completely
        None => "***@***".to_string(),
    }
}

/// Redact a bearer token down to its length.
pub fn redact_token(token: &str) -> String {
    format!("<{} chars>", token.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymize_email() {
        assert_eq!(anonymize_email("alice@example.com"), "a***@example.com");
        assert_eq!(anonymize_email(" bob@test.org "), "b***@test.org");
    }

    #[test]
    fn test_anonymize_email_edge_cases() {
        assert_eq!(anonymize_email("x@example.com"), "x***@example.com");
        assert_eq!(anonymize_email("@example.com"), "***@example.com");
        assert_eq!(anonymize_email("notanemail"), "***@***");
    }

    #[test]
    fn test_redact_token() {
        assert_eq!(redact_token("abcdef"), "<6 chars>");
    }

    #[test]
    fn test_init_tracing_twice() {
        init_tracing(false);
        init_tracing(true);
    }
}
