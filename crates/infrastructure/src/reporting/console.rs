//! Colored console reporter.
//!
//! Renders one line per item: the bold path, a dimmed request summary, then
//! OK in green or ERROR in red with the indented failure detail below. On a
//! terminal a transient `processing...`/`waiting...` status shows while the
//! item runs and is overwritten by the final line. Colors honor the
//! `NO_COLORS` environment variable.

use std::io::Write;

use async_trait::async_trait;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use volley_application::Reporter;
use volley_domain::{display_value, ItemState, TestSpec};

/// The default reporter for command-line runs.
pub struct ConsoleReporter {
    color: ColorChoice,
    interactive: bool,
}

impl ConsoleReporter {
    /// Creates a reporter bound to stdout, detecting terminal capabilities.
    #[must_use]
    pub fn new() -> Self {
        let interactive = atty::is(atty::Stream::Stdout);
        let color = if interactive && std::env::var_os("NO_COLORS").is_none() {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self { color, interactive }
    }

    fn stdout(&self) -> StandardStream {
        StandardStream::stdout(self.color)
    }

    /// Writes the item prefix: bold path, dimmed summary, dimmed headers.
    fn write_prefix(&self, out: &mut StandardStream, spec: &TestSpec) {
        let _ = out.set_color(ColorSpec::new().set_bold(true));
        let _ = write!(out, "{}", spec.path);
        let _ = out.reset();
        let mut dimmed = Vec::new();
        if let Some(summary) = request_summary(spec) {
            dimmed.push(format!(" ({summary})"));
        }
        if let Some(headers) = header_summary(spec) {
            dimmed.push(format!(" [{headers}]"));
        }
        if !dimmed.is_empty() {
            let _ = out.set_color(ColorSpec::new().set_dimmed(true));
            let _ = write!(out, "{}", dimmed.concat());
            let _ = out.reset();
        }
        let _ = write!(out, ": ");
    }

    /// Overwrites the transient status line; a no-op off-terminal, where no
    /// status was written in the first place.
    fn clear_line(&self, out: &mut StandardStream) {
        if self.interactive {
            let _ = write!(out, "\r\x1b[2K");
        }
    }

    fn write_status(&self, spec: &TestSpec, status: &str) {
        if !self.interactive {
            return;
        }
        let mut out = self.stdout();
        self.clear_line(&mut out);
        self.write_prefix(&mut out, spec);
        let _ = out.set_color(ColorSpec::new().set_dimmed(true));
        let _ = write!(out, "{status}");
        let _ = out.reset();
        let _ = out.flush();
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Reporter for ConsoleReporter {
    async fn start(&self, base: &str) {
        let mut out = self.stdout();
        let _ = write!(out, "Running tests on ");
        let _ = out.set_color(ColorSpec::new().set_dimmed(true));
        let _ = write!(out, "{base}");
        let _ = out.reset();
        let _ = writeln!(out, "\n");
    }

    async fn endpoint_start(&self, spec: &TestSpec) {
        self.write_status(spec, "processing...");
    }

    async fn endpoint_wait(&self, spec: &TestSpec) {
        let ms = spec.wait_ms.unwrap_or(0);
        self.write_status(spec, &format!("waiting {ms}ms..."));
    }

    async fn endpoint_end(&self, state: &ItemState) {
        let mut out = self.stdout();
        self.clear_line(&mut out);
        self.write_prefix(&mut out, &state.spec);
        if let Some(error) = &state.error {
            let _ = out.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
            let _ = writeln!(out, "ERROR");
            let _ = out.reset();
            let _ = writeln!(out, "\n{}\n", indent(&error.to_string(), "    "));
        } else {
            let _ = out.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
            let _ = writeln!(out, "OK");
            let _ = out.reset();
        }
    }

    async fn end(&self, passed: usize, total: usize) {
        let mut out = self.stdout();
        let verdict = if passed == total { "successful" } else { "failed" };
        let _ = writeln!(out, "\nTests {verdict}. ({passed}/{total})");
    }
}

/// The dimmed request summary: method plus body when one is sent, the bare
/// method for non-GET requests, nothing for a plain GET.
fn request_summary(spec: &TestSpec) -> Option<String> {
    match &spec.body {
        Some(body) => Some(format!("{} {}", spec.method, display_value(body))),
        None if spec.method != "GET" => Some(spec.method.clone()),
        None => None,
    }
}

/// Request headers as `name value; name value`, skipping empty values.
fn header_summary(spec: &TestSpec) -> Option<String> {
    let rendered: Vec<String> = spec
        .request_headers
        .iter()
        .filter(|(_, value)| !matches!(value, serde_json::Value::Null))
        .map(|(name, value)| (name, display_value(value)))
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| format!("{name} {value}"))
        .collect();
    if rendered.is_empty() {
        None
    } else {
        Some(rendered.join("; "))
    }
}

fn indent(text: &str, prefix: &str) -> String {
    let body = text.split('\n').collect::<Vec<_>>().join(&format!("\n{prefix}"));
    format!("{prefix}{body}")
}
