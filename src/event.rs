//! The wire event record and its assembly from validated parts.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::TrackerConfig;
use crate::validator::{SENTINEL, Validator};

/// Value of the top-level `event` key of every record.
pub const EVENT_TYPE: &str = "event_data";

/// Number of `link_path_parts.N` keys.
pub const PATH_PART_COUNT: usize = 5;

/// One analytics event, exactly as the receiving dashboards expect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event: String,
    pub event_data: EventData,
}

/// Event payload. Every value is a validated, lower-cased string; absent
/// values are [`SENTINEL`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventData {
    pub event_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub text: String,
    pub section: String,
    pub action: String,
    pub external: String,
    pub link_domain: String,
    #[serde(rename = "link_path_parts.1")]
    pub link_path_part_1: String,
    #[serde(rename = "link_path_parts.2")]
    pub link_path_part_2: String,
    #[serde(rename = "link_path_parts.3")]
    pub link_path_part_3: String,
    #[serde(rename = "link_path_parts.4")]
    pub link_path_part_4: String,
    #[serde(rename = "link_path_parts.5")]
    pub link_path_part_5: String,
}

impl Default for EventData {
    fn default() -> Self {
        let sentinel = || SENTINEL.to_string();
        Self {
            event_name: sentinel(),
            kind: sentinel(),
            url: sentinel(),
            text: sentinel(),
            section: sentinel(),
            action: sentinel(),
            external: "false".to_string(),
            link_domain: sentinel(),
            link_path_part_1: sentinel(),
            link_path_part_2: sentinel(),
            link_path_part_3: sentinel(),
            link_path_part_4: sentinel(),
            link_path_part_5: sentinel(),
        }
    }
}

impl EventData {
    pub fn link_path_parts(&self) -> [&str; PATH_PART_COUNT] {
        [
            self.link_path_part_1.as_str(),
            self.link_path_part_2.as_str(),
            self.link_path_part_3.as_str(),
            self.link_path_part_4.as_str(),
            self.link_path_part_5.as_str(),
        ]
    }

    fn set_link_path_parts(&mut self, parts: [String; PATH_PART_COUNT]) {
        let [p1, p2, p3, p4, p5] = parts;
        self.link_path_part_1 = p1;
        self.link_path_part_2 = p2;
        self.link_path_part_3 = p3;
        self.link_path_part_4 = p4;
        self.link_path_part_5 = p5;
    }
}

/// A destination URL broken into the pieces an event reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkTarget {
    /// The destination, absolute when it could be resolved.
    pub url: Option<String>,
    /// Scheme and host only, e.g. `https://www.example.com`.
    pub domain: Option<String>,
    /// Path plus query string.
    pub path: Option<String>,
}

impl LinkTarget {
    /// Decompose `raw`, resolving it against `base` when it is relative.
    pub fn parse(raw: &str, base: Option<&Url>) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::default();
        }
        let parsed = match base {
            Some(base) => base.join(raw),
            None => Url::parse(raw),
        };
        match parsed {
            Ok(url) => {
                let domain = url
                    .host_str()
                    .map(|host| format!("{}://{}", url.scheme(), host));
                let mut path = url.path().to_string();
                if let Some(query) = url.query() {
                    path.push('?');
                    path.push_str(query);
                }
                Self {
                    url: Some(url.to_string()),
                    domain,
                    path: Some(path),
                }
            }
            Err(_) if raw.starts_with('/') => {
                let path = raw.split('#').next().unwrap_or(raw).to_string();
                Self {
                    url: Some(raw.to_string()),
                    domain: None,
                    path: Some(path),
                }
            }
            Err(e) => {
                tracing::warn!("Unparsable destination URL: {e}");
                Self {
                    url: Some(raw.to_string()),
                    ..Self::default()
                }
            }
        }
    }
}

/// The unvalidated parts of one event.
#[derive(Debug, Clone, Default)]
pub struct EventParts<'a> {
    pub event_name: &'a str,
    pub kind: &'a str,
    pub text: Option<&'a str>,
    pub section: Option<&'a str>,
    pub action: Option<&'a str>,
    pub external: bool,
}

/// Builds [`EventRecord`]s, passing every leaf through the validator.
pub struct EventAssembler<'a> {
    validator: &'a Validator,
    config: &'a TrackerConfig,
}

impl<'a> EventAssembler<'a> {
    pub fn new(validator: &'a Validator, config: &'a TrackerConfig) -> Self {
        Self { validator, config }
    }

    pub fn assemble(&self, parts: &EventParts<'_>, link: &LinkTarget) -> EventRecord {
        let short = |value: Option<&str>| self.validator.validate(value, self.config.max_length);
        let long = |value: Option<&str>| self.validator.validate(value, self.config.url_max_length);

        let mut data = EventData {
            event_name: short(Some(parts.event_name)),
            kind: short(Some(parts.kind)),
            url: long(link.url.as_deref()),
            text: short(parts.text),
            section: short(parts.section),
            action: short(parts.action),
            external: short(Some(if parts.external { "true" } else { "false" })),
            link_domain: long(link.domain.as_deref()),
            ..EventData::default()
        };
        data.set_link_path_parts(self.path_parts(link.path.as_deref()));

        EventRecord {
            event: EVENT_TYPE.to_string(),
            event_data: data,
        }
    }

    /// Validate the whole path, then cut it into fixed-length chunks; slots
    /// past the end of the path are the sentinel.
    fn path_parts(&self, path: Option<&str>) -> [String; PATH_PART_COUNT] {
        let chunk = self.config.path_part_length.max(1);
        let validated = self
            .validator
            .validate(path, chunk.saturating_mul(PATH_PART_COUNT));
        let chars: Vec<char> = validated.chars().collect();
        let mut chunks = chars.chunks(chunk).map(|c| c.iter().collect::<String>());
        std::array::from_fn(|_| chunks.next().unwrap_or_else(|| SENTINEL.to_string()))
    }
}
