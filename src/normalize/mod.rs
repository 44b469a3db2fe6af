//! Canonicalisation of parameter values.
//!
//! Desired and observed values pass through the same functions so that
//! equality of the canonical forms means semantic equality. Nothing here
//! fails: malformed input is passed through in a stable, lower-cased or
//! trimmed form and simply compares unequal to well-formed input.

use std::collections::{BTreeMap, BTreeSet};
use std::net::IpAddr;

use ipnet::IpNet;
use serde_json::Value;

use crate::state::ParamValue;

/// How a parameter's values are canonicalised before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Plain text rendering; absent becomes `""`.
    Scalar,
    /// Lower-cased text rendering.
    Lowercase,
    /// `"True"` or `"False"`; absent becomes `""`.
    BoolString,
    /// A sorted, de-duplicated list; absent becomes `[]`.
    FlagList {
        /// Lower-case every item first.
        lowercase: bool,
    },
    /// A sorted list of `key=value` strings.
    KeyValue,
    /// A filesystem path with redundant slashes removed.
    Path,
    /// A memory quantity in bytes.
    ByteSize,
}

/// Canonicalise a raw value under `mode`.
#[must_use]
pub fn normalize(raw: Option<&ParamValue>, mode: Mode) -> Value {
    match mode {
        Mode::Scalar => Value::String(raw.map(ParamValue::render).unwrap_or_default()),
        Mode::Lowercase => Value::String(
            raw.map(|value| value.render().to_lowercase())
                .unwrap_or_default(),
        ),
        Mode::BoolString => Value::String(raw.map(bool_text).unwrap_or_default()),
        Mode::FlagList { lowercase } => string_set(
            raw.map(ParamValue::items)
                .unwrap_or_default()
                .into_iter()
                .map(|item| if lowercase { item.to_lowercase() } else { item }),
        ),
        Mode::KeyValue => string_set(key_values(
            &raw.map(ParamValue::entries).unwrap_or_default(),
            '=',
        )),
        Mode::Path => Value::String(
            raw.map(|value| clean_path(&value.render()))
                .unwrap_or_default(),
        ),
        Mode::ByteSize => Value::String(
            raw.map(|value| byte_size(&value.render()))
                .unwrap_or_default(),
        ),
    }
}

fn bool_text(value: &ParamValue) -> String {
    value.as_bool().map_or_else(
        || value.render().to_lowercase(),
        |flag| bool_string(flag).to_owned(),
    )
}

/// Parse boolean-like text: `true/false`, `yes/no`, `on/off`, `1/0`.
#[must_use]
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// The canonical text of a boolean.
#[must_use]
pub const fn bool_string(flag: bool) -> &'static str {
    if flag { "True" } else { "False" }
}

/// A sorted, de-duplicated JSON array of strings.
#[must_use]
pub fn string_set<I>(items: I) -> Value
where
    I: IntoIterator<Item = String>,
{
    Value::Array(
        items
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(Value::String)
            .collect(),
    )
}

/// An order-preserving JSON array of strings.
#[must_use]
pub fn string_list<I>(items: I) -> Value
where
    I: IntoIterator<Item = String>,
{
    Value::Array(items.into_iter().map(Value::String).collect())
}

/// A JSON object from string entries.
#[must_use]
pub fn string_map(entries: &BTreeMap<String, String>) -> Value {
    Value::Object(
        entries
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect(),
    )
}

/// Join each entry as `key{separator}value`, in key order.
#[must_use]
pub fn key_values(entries: &BTreeMap<String, String>, separator: char) -> Vec<String> {
    entries
        .iter()
        .map(|(key, value)| format!("{key}{separator}{value}"))
        .collect()
}

/// Collapse repeated `/` and drop a trailing `/` (the root stays `/`).
#[must_use]
pub fn clean_path(path: &str) -> String {
    let mut cleaned = String::with_capacity(path.len());
    let mut previous_slash = false;
    for ch in path.trim().chars() {
        let slash = ch == '/';
        if !(slash && previous_slash) {
            cleaned.push(ch);
        }
        previous_slash = slash;
    }
    if cleaned.len() > 1 && cleaned.ends_with('/') {
        cleaned.pop();
    }
    cleaned
}

/// Lower-case a capability name and strip its `cap_` prefix.
#[must_use]
pub fn capability(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    lowered
        .strip_prefix("cap_")
        .map_or_else(|| lowered.clone(), str::to_owned)
}

/// Whether a volume name is a generated anonymous volume ID.
#[must_use]
pub fn is_anonymous_volume(name: &str) -> bool {
    name.len() == 64 && name.chars().all(|c| c.is_ascii_hexdigit())
}

/// The canonical key of a mount: `src=SOURCE,dst=DEST`, or `dst=DEST` when
/// there is no meaningful source.
#[must_use]
pub fn mount_target(source: Option<&str>, destination: &str) -> String {
    match source.map(str::trim).filter(|source| !source.is_empty()) {
        Some(source) => format!("src={},dst={}", clean_path(source), clean_path(destination)),
        None => format!("dst={}", clean_path(destination)),
    }
}

/// Canonicalise a `--volume` spec (`SRC:DST[:OPTS]` or `DST`).
#[must_use]
pub fn volume_key(spec: &str) -> Option<String> {
    let mut fields = spec.trim().split(':');
    let first = fields.next().filter(|field| !field.is_empty())?;
    Some(match fields.next().filter(|field| !field.is_empty()) {
        Some(destination) => mount_target(Some(first), destination),
        None => mount_target(None, first),
    })
}

/// Canonicalise a `--mount` spec. `tmpfs` mounts yield `None` because they
/// are compared through the tmpfs parameter.
#[must_use]
pub fn mount_key(spec: &str) -> Option<String> {
    let mut kind = "volume";
    let mut source = None;
    let mut destination = None;
    for part in spec.split(',') {
        match part.trim().split_once('=') {
            Some(("type", value)) => kind = value,
            Some(("source" | "src", value)) => source = Some(value),
            Some(("destination" | "dst" | "target", value)) => destination = Some(value),
            _ => {}
        }
    }
    if kind == "tmpfs" {
        return None;
    }
    destination.map(|target| mount_target(source, target))
}

/// Reduce an image reference to its base name: `:latest` is dropped and only
/// the last path segment is kept.
#[must_use]
pub fn image_base(reference: &str) -> String {
    let untagged = reference.trim().replace(":latest", "");
    untagged
        .rsplit('/')
        .next()
        .map_or_else(|| untagged.clone(), str::to_owned)
}

const SIGNALS: &[(&str, u32)] = &[
    ("HUP", 1),
    ("INT", 2),
    ("QUIT", 3),
    ("ILL", 4),
    ("TRAP", 5),
    ("ABRT", 6),
    ("IOT", 6),
    ("BUS", 7),
    ("FPE", 8),
    ("KILL", 9),
    ("USR1", 10),
    ("SEGV", 11),
    ("USR2", 12),
    ("PIPE", 13),
    ("ALRM", 14),
    ("TERM", 15),
    ("STKFLT", 16),
    ("CHLD", 17),
    ("CONT", 18),
    ("STOP", 19),
    ("TSTP", 20),
    ("TTIN", 21),
    ("TTOU", 22),
    ("URG", 23),
    ("XCPU", 24),
    ("XFSZ", 25),
    ("VTALRM", 26),
    ("PROF", 27),
    ("WINCH", 28),
    ("IO", 29),
    ("POLL", 29),
    ("PWR", 30),
    ("SYS", 31),
];

const RTMIN: u32 = 34;
const RTMAX: u32 = 64;

/// Convert a signal name (`SIGTERM`, `term`, `RTMIN+3`) to its number.
/// Numeric input is returned unchanged; unknown names are lower-cased.
#[must_use]
pub fn signal_number(signal: &str) -> String {
    let upper = signal.trim().to_uppercase();
    if !upper.is_empty() && upper.chars().all(|c| c.is_ascii_digit()) {
        return upper;
    }
    let name = upper.strip_prefix("SIG").unwrap_or(&upper);
    let number = SIGNALS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, number)| *number)
        .or_else(|| realtime_signal(name));
    number.map_or_else(|| signal.trim().to_lowercase(), |value| value.to_string())
}

fn realtime_signal(name: &str) -> Option<u32> {
    match name {
        "RTMIN" => Some(RTMIN),
        "RTMAX" => Some(RTMAX),
        _ => {
            if let Some(offset) = name.strip_prefix("RTMIN+") {
                return offset.parse::<u32>().ok().and_then(|n| RTMIN.checked_add(n));
            }
            name.strip_prefix("RTMAX-")
                .and_then(|offset| offset.parse::<u32>().ok())
                .and_then(|n| RTMAX.checked_sub(n))
        }
    }
}

/// Digits of a fractional quantity kept before truncating to whole bytes.
const SIZE_FRACTION_DIGITS: usize = 9;

/// Convert a memory quantity (`512m`, `1.5g`, `2GiB`, `1024`) to bytes.
/// Fractional bytes are truncated. Unparseable input (including `-1`) is
/// returned lower-cased.
#[must_use]
pub fn byte_size(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let digits_end = lowered
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(lowered.len());
    let (number, unit) = lowered.split_at(digits_end);
    let suffix = unit.trim();
    let base = suffix
        .strip_suffix("ib")
        .or_else(|| suffix.strip_suffix('b'))
        .unwrap_or(suffix);
    let multiplier: u64 = match base {
        "" => 1,
        "k" => 1 << 10,
        "m" => 1 << 20,
        "g" => 1 << 30,
        "t" => 1 << 40,
        _ => return lowered,
    };
    scaled_bytes(number, multiplier).map_or_else(|| lowered.clone(), |bytes| bytes.to_string())
}

/// `number` (`3`, `1.5`, `.25`) times `multiplier`, in whole units.
fn scaled_bytes(number: &str, multiplier: u64) -> Option<u64> {
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    let whole_value: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().ok()?
    };
    let kept: String = fraction.chars().take(SIZE_FRACTION_DIGITS).collect();
    let fraction_bytes = if kept.is_empty() {
        0
    } else {
        let scale = 10_u64.checked_pow(u32::try_from(kept.len()).ok()?)?;
        kept.parse::<u64>()
            .ok()?
            .checked_mul(multiplier)?
            .checked_div(scale)?
    };
    whole_value
        .checked_mul(multiplier)?
        .checked_add(fraction_bytes)
}

const NANOS_PER_CPU: u64 = 1_000_000_000;
const NANO_DIGITS: usize = 9;

/// Convert a decimal CPU count (`1.5`, `.25`, `2`) to nanocpus.
#[must_use]
pub fn nano_cpus(text: &str) -> Option<u64> {
    let trimmed = text.trim();
    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let numeric = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !numeric(whole) || !numeric(fraction) {
        return None;
    }
    let whole_value: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().ok()?
    };
    let mut fraction_digits: String = fraction.chars().take(NANO_DIGITS).collect();
    while fraction_digits.len() < NANO_DIGITS {
        fraction_digits.push('0');
    }
    let fraction_value: u64 = fraction_digits.parse().ok()?;
    whole_value
        .checked_mul(NANOS_PER_CPU)?
        .checked_add(fraction_value)
}

/// Canonical network form of a CIDR (`10.88.0.1/16` becomes `10.88.0.0/16`).
#[must_use]
pub fn canonical_cidr(text: &str) -> String {
    let trimmed = text.trim();
    trimmed
        .parse::<IpNet>()
        .map_or_else(|_| trimmed.to_lowercase(), |net| net.trunc().to_string())
}

/// Canonical text of an IP address (IPv6 compressed, lower-case).
#[must_use]
pub fn canonical_ip(text: &str) -> String {
    let trimmed = text.trim();
    trimmed
        .parse::<IpAddr>()
        .map_or_else(|_| trimmed.to_lowercase(), |address| address.to_string())
}

/// Canonicalise a `--publish` spec: `/tcp` and IPv6 brackets are dropped and
/// stray colons trimmed.
#[must_use]
pub fn port_spec(spec: &str) -> String {
    spec.trim()
        .replace("/tcp", "")
        .replace(['[', ']'], "")
        .trim_matches(':')
        .to_owned()
}

/// Whether a publish or expose spec uses a port range.
#[must_use]
pub fn is_port_range(spec: &str) -> bool {
    spec.contains('-')
}
