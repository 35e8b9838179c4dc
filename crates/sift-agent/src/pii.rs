use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Regex-based PII scanner.
///
/// Scans a text blob against a fixed set of patterns and reports matches
/// per category. Output is advisory: it runs over the request's message
/// text, not over attachment bytes (document content is analyzed by the
/// upstream model's own vision/document understanding), and the passport
/// and driver-license patterns overlap by construction, so a value may be
/// double-classified.
///
/// For identical input the report is identical: categories are evaluated
/// in declaration order and values are deduplicated keeping their first
/// occurrence.

static SSN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").unwrap());

// Contiguous 13-19 digit run with optional single separators: candidate
// card numbers, no checksum applied.
static CREDIT_CARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d(?:[ -]?\d){12,18}\b").unwrap());

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());

// North-American formats, optional +1 country code
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\+?1[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}\b").unwrap());

static IP_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").unwrap());

// MM/DD/YYYY or YYYY-MM-DD
static DATE_OF_BIRTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:\d{2}/\d{2}/\d{4}|\d{4}-\d{2}-\d{2})\b").unwrap());

// Passport and driver-license formats overlap (1-2 letters + digit run);
// both fire on ambiguous values.
static PASSPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]{1,2}\d{6,9}\b").unwrap());

static DRIVER_LICENSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]{1,2}\d{5,8}\b").unwrap());

/// Matches per category. Field order is the scan order; absent categories
/// are omitted from serialized output.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DetectedPii {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssn: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_card: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passport: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_license: Option<Vec<String>>,
}

impl DetectedPii {
    pub fn is_empty(&self) -> bool {
        self.categories().is_empty()
    }

    /// Names of the categories with at least one match, in scan order
    pub fn categories(&self) -> Vec<&'static str> {
        let slots: [(&'static str, &Option<Vec<String>>); 8] = [
            ("ssn", &self.ssn),
            ("creditCard", &self.credit_card),
            ("email", &self.email),
            ("phone", &self.phone),
            ("ipAddress", &self.ip_address),
            ("dateOfBirth", &self.date_of_birth),
            ("passport", &self.passport),
            ("driverLicense", &self.driver_license),
        ];

        slots
            .into_iter()
            .filter(|(_, values)| values.is_some())
            .map(|(name, _)| name)
            .collect()
    }
}

/// Scanner result for one invocation. Derived and read-only; never stored.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PiiReport {
    pub has_pii: bool,
    pub detected: DetectedPii,
}

/// Run every category against `text` and collect deduplicated matches.
pub fn scan_text(text: &str) -> PiiReport {
    let mut detected = DetectedPii::default();

    detected.ssn = collect_matches(&SSN, text);
    detected.credit_card = collect_matches(&CREDIT_CARD, text);
    detected.email = collect_matches(&EMAIL, text);
    detected.phone = collect_matches(&PHONE, text);
    detected.ip_address = collect_matches(&IP_ADDRESS, text);
    detected.date_of_birth = collect_matches(&DATE_OF_BIRTH, text);
    detected.passport = collect_matches(&PASSPORT, text);
    detected.driver_license = collect_matches(&DRIVER_LICENSE, text);

    PiiReport {
        has_pii: !detected.is_empty(),
        detected,
    }
}

fn collect_matches(pattern: &Regex, text: &str) -> Option<Vec<String>> {
    let mut values: Vec<String> = Vec::new();

    for m in pattern.find_iter(text) {
        let value = m.as_str().to_string();
        if !values.contains(&value) {
            values.push(value);
        }
    }

    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}
