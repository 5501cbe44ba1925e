//! Credential redaction for log output.

use axum::http::HeaderMap;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use tracing_subscriber::fmt::MakeWriter;

const REDACTED: &str = "[REDACTED]";

/// Header names whose values never reach a log line.
pub const SENSITIVE_HEADERS: [&str; 4] = [
    "authorization",
    "proxy-authorization",
    "cookie",
    "set-cookie",
];

/// Scrubs credentials out of formatted log output
#[derive(Clone)]
pub struct SecretScrubber {
    scheme_pattern: Regex,
    header_pattern: Regex,
    field_pattern: Regex,
    url_credentials_pattern: Regex,
}

impl SecretScrubber {
    /// Create a new secret scrubber
    pub fn new() -> Self {
        Self {
            // Bearer/Basic credentials anywhere in a line
            scheme_pattern: Regex::new(r"\b(Bearer|Basic)\s+[A-Za-z0-9\-_.~+/]{8,}=*")
                .expect("static regex"),
            // Authorization and cookie headers, as `name: value` or `"name":"value"`
            header_pattern: Regex::new(
                r#"(?i)(\b(?:proxy-authorization|authorization|set-cookie|cookie)\\?"?\s*[:=]\s*)("(?:[^"\\]|\\.)*"|[^",}\n]+)"#,
            )
            .expect("static regex"),
            // Password and token fields
            field_pattern: Regex::new(
                r#"(?i)(\b(?:password|passwd|secret|api_key|apikey|token)\\?"?\s*[:=]\s*)("(?:[^"\\]|\\.)*"|[^\s",}&]+)"#,
            )
            .expect("static regex"),
            // user:password@ in connection URLs
            url_credentials_pattern: Regex::new(r"([a-zA-Z][a-zA-Z0-9+.\-]*://[^:/\s@]*:)[^@\s/]+@")
                .expect("static regex"),
        }
    }

    /// Scrub a message of sensitive data
    pub fn scrub_message(&self, message: &str) -> String {
        let scrubbed = self
            .scheme_pattern
            .replace_all(message, |caps: &Captures| format!("{} {REDACTED}", &caps[1]));
        let scrubbed = self.header_pattern.replace_all(&scrubbed, mask_value);
        let scrubbed = self.field_pattern.replace_all(&scrubbed, mask_value);
        self.url_credentials_pattern
            .replace_all(&scrubbed, "${1}****@")
            .into_owned()
    }
}

/// Keep the key, replace the value, preserve JSON quoting.
fn mask_value(caps: &Captures) -> String {
    let value = &caps[2];
    if value.starts_with('"') {
        format!("{}\"{REDACTED}\"", &caps[1])
    } else {
        format!("{}{REDACTED}", &caps[1])
    }
}

impl Default for SecretScrubber {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SecretScrubber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretScrubber").finish()
    }
}

/// Header map with sensitive values replaced, suitable for a log field.
pub fn redact_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            let name = name.as_str();
            let value = if SENSITIVE_HEADERS.contains(&name) {
                REDACTED.to_string()
            } else {
                value.to_str().unwrap_or("<binary>").to_string()
            };
            (name.to_string(), value)
        })
        .collect()
}

/// `MakeWriter` that scrubs every formatted event before it is written.
///
/// The fmt layer hands each event to the writer as one buffer, so scrubbing
/// per `write` call sees whole lines.
#[derive(Debug)]
pub struct RedactingMakeWriter<M> {
    inner: M,
    scrubber: SecretScrubber,
}

impl<M> RedactingMakeWriter<M> {
    /// Wrap `inner` so everything it writes is scrubbed first.
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            scrubber: SecretScrubber::new(),
        }
    }
}

impl<'a, M> MakeWriter<'a> for RedactingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = RedactingWriter<'a, M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter {
            inner: self.inner.make_writer(),
            scrubber: &self.scrubber,
        }
    }
}

/// Writer handed out by [`RedactingMakeWriter`].
pub struct RedactingWriter<'a, W> {
    inner: W,
    scrubber: &'a SecretScrubber,
}

impl<W: Write> Write for RedactingWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        self.inner
            .write_all(self.scrubber.scrub_message(&text).as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
