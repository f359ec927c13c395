//! # Stack Trace Parsing
//!
//! Turns the raw stack trace text attached to a failure reason into Sentry
//! exception values so that events group by frame rather than by message.
//! Python tracebacks and Java stack traces are understood; anything else is
//! left to the caller.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const PYTHON_TRACEBACK_HEADER: &str = "Traceback (most recent call last):";
const JAVA_CAUSED_BY: &str = "Caused by: ";

// Separators Python prints between chained exceptions
static PYTHON_CHAIN_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\n\s*\n(?:During handling of the above exception, another exception occurred|The above exception was the direct cause of the following exception):\s*\n\s*\n",
    )
    .unwrap()
});

static PYTHON_FRAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?m)^\s*File "(?P<abs_path>[^"]+)", line (?P<lineno>\d+), in (?P<function>[^\n]+)(?:\n {4}(?P<context_line>[^\n]+))?"#,
    )
    .unwrap()
});

static JAVA_FRAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s+at (?:[\w.$@-]*/+)?(?P<module>[\w$.]+)\.(?P<function>[\w<>$]+)\((?:(?P<filename>[^:()]+):(?P<lineno>\d+)|[^)]*)\)",
    )
    .unwrap()
});

/// A single stack frame, oldest call first within its stack trace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentryFrame {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abs_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lineno: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_line: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentryStacktrace {
    pub frames: Vec<SentryFrame>,
}

/// One exception in Sentry's `exception.values` list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentryException {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub exception_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<SentryStacktrace>,
}

impl SentryException {
    /// An exception carrying only a raw value
    pub fn from_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }
}

/// Parses a stack trace into Sentry exceptions, oldest exception first.
///
/// Returns `None` when the format is not recognised or nothing could be
/// extracted.
pub fn build_sentry_exceptions(stacktrace: &str) -> Option<Vec<SentryException>> {
    let trimmed = stacktrace.trim();
    if trimmed.starts_with(PYTHON_TRACEBACK_HEADER) {
        parse_python_traceback(trimmed)
    } else if trimmed.lines().any(|line| JAVA_FRAME.is_match(line)) {
        parse_java_stacktrace(trimmed)
    } else {
        None
    }
}

fn parse_python_traceback(stacktrace: &str) -> Option<Vec<SentryException>> {
    let normalized = stacktrace.replace("\r\n", "\n");
    let mut exceptions = Vec::new();

    // Python prints chained exceptions oldest first, which is the order Sentry wants
    for chunk in PYTHON_CHAIN_SEPARATOR.split(&normalized) {
        let chunk = chunk.trim_end();
        if !chunk.trim_start().starts_with(PYTHON_TRACEBACK_HEADER) {
            return None;
        }

        let frames: Vec<SentryFrame> = PYTHON_FRAME
            .captures_iter(chunk)
            .map(|caps| {
                let abs_path = caps["abs_path"].to_string();
                SentryFrame {
                    filename: Some(file_name(&abs_path).to_string()),
                    abs_path: Some(abs_path),
                    function: Some(caps["function"].trim().to_string()),
                    lineno: caps["lineno"].parse().ok(),
                    context_line: caps
                        .name("context_line")
                        .map(|m| m.as_str().trim().to_string()),
                    ..Default::default()
                }
            })
            .collect();

        // The exception line is the last line printed at column zero
        let last_line = chunk
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty() && !line.starts_with(char::is_whitespace))?;
        if last_line.starts_with(PYTHON_TRACEBACK_HEADER) {
            return None;
        }

        let mut exception = exception_from_header(last_line);
        if !frames.is_empty() {
            exception.stacktrace = Some(SentryStacktrace { frames });
        }
        exceptions.push(exception);
    }

    if exceptions.is_empty() {
        None
    } else {
        Some(exceptions)
    }
}

fn parse_java_stacktrace(stacktrace: &str) -> Option<Vec<SentryException>> {
    let mut exceptions: Vec<SentryException> = Vec::new();
    let mut frames: Vec<SentryFrame> = Vec::new();
    let mut seen_frame = false;

    for line in stacktrace.lines() {
        if let Some(caps) = JAVA_FRAME.captures(line) {
            let filename = caps.name("filename").map(|m| m.as_str().to_string());
            frames.push(SentryFrame {
                abs_path: filename.clone(),
                filename,
                module: Some(caps["module"].to_string()),
                function: Some(caps["function"].to_string()),
                lineno: caps.name("lineno").and_then(|m| m.as_str().parse().ok()),
                ..Default::default()
            });
            seen_frame = true;
            continue;
        }

        if line.starts_with(char::is_whitespace) {
            // "... 3 more", "Suppressed:" blocks and similar
            continue;
        }

        let header = line.strip_prefix(JAVA_CAUSED_BY).unwrap_or(line);
        if exceptions.is_empty() || seen_frame || line.starts_with(JAVA_CAUSED_BY) {
            attach_frames(exceptions.last_mut(), &mut frames);
            exceptions.push(exception_from_header(header));
            seen_frame = false;
        } else if let Some(current) = exceptions.last_mut() {
            // Multi-line exception message before the first frame
            let value = current.value.get_or_insert_with(String::new);
            if !value.is_empty() {
                value.push('\n');
            }
            value.push_str(line);
        }
    }
    attach_frames(exceptions.last_mut(), &mut frames);

    if exceptions.is_empty() {
        return None;
    }

    // Java prints the outermost exception first; causes happened earlier
    exceptions.reverse();
    Some(exceptions)
}

fn attach_frames(exception: Option<&mut SentryException>, frames: &mut Vec<SentryFrame>) {
    let Some(exception) = exception else {
        frames.clear();
        return;
    };
    if frames.is_empty() {
        return;
    }
    // Java prints the innermost frame first
    let mut ordered: Vec<SentryFrame> = frames.drain(..).collect();
    ordered.reverse();
    exception.stacktrace = Some(SentryStacktrace { frames: ordered });
}

/// Splits `pkg.module.Type: message` into module, type and value
fn exception_from_header(header: &str) -> SentryException {
    let (qualified_type, value) = match header.split_once(": ") {
        Some((ty, value)) => (ty.trim(), Some(value.to_string())),
        None => (header.trim().trim_end_matches(':'), None),
    };

    let (module, exception_type) = match qualified_type.rsplit_once('.') {
        Some((module, ty)) if !module.is_empty() && !ty.is_empty() => {
            (Some(module.to_string()), ty.to_string())
        }
        _ => (None, qualified_type.to_string()),
    };

    SentryException {
        exception_type: Some(exception_type),
        value,
        module,
        stacktrace: None,
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(path)
}
