//! # Mock Responder
//! A deterministic stand-in for the model, so variants can be compared without an API key.
//!
//! The reply is synthesized from a few fields scraped out of the most recent user message with regular expressions
//! (`destino:`, `fechas desde .. hasta ..`, `adultos: .. menores: ..`, `presupuesto:`). Fields that cannot be found
//! degrade to placeholder values, so the reply always has the same shape.
//!
//! The scraping is intentionally naive: it exists for demos, not as an input contract. Passenger counts are read as
//! `u64`; a count with more digits than that holds is treated as absent, and both counts take their defaults.
//!
//! Checklist patterns are matched against the reply serialized with every non-ASCII character escaped
//! ([to_ascii_json]), so `Cancún` appears there as `Canc\u00fan`.

use lazy_static::lazy_static;
use log::warn;
use regex::{Captures, Regex, RegexBuilder};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::conversation::Conversation;
use crate::errors::EvalError;
use crate::utils::postprocess::json::to_ascii_json;

pub const DEFAULT_DESTINATION: &str = "Destino";
pub const DEFAULT_DATE: &str = "YYYY-MM-DD";
pub const DEFAULT_ADULTS: u64 = 2;
pub const DEFAULT_MINORS: u64 = 0;
pub const DEFAULT_BUDGET: &str = "N/D";
pub const HOTEL_CATEGORY: &str = "3-4*";

lazy_static! {
    static ref DESTINATION_RE: Regex = Regex::new(r"(?i)destino:\s*(.*)").unwrap();
    static ref DATES_RE: Regex = Regex::new(r"(?i)fechas desde (.*) hasta (.*)").unwrap();
    static ref PASSENGERS_RE: Regex = Regex::new(r"(?is)adultos:\s*([0-9]+).*?menores:\s*([0-9]+)").unwrap();
    static ref BUDGET_RE: Regex = Regex::new(r"(?i)presupuesto:\s*([0-9]+)").unwrap();
}

/// Result of one checklist pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "FALTA")]
    Missing,
}

impl CheckStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, CheckStatus::Ok)
    }
}

/// A checklist pattern with its status. Serializes as a single-entry object `{"<pattern>": "OK"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub pattern: String,
    pub status: CheckStatus,
}

impl Serialize for CheckResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.pattern, &self.status)?;
        map.end()
    }
}

/// Search filters for the hotel booking site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelFilters {
    #[serde(rename = "destino")]
    pub destination: String,
    #[serde(rename = "fecha_desde")]
    pub date_from: String,
    #[serde(rename = "fecha_hasta")]
    pub date_to: String,
    #[serde(rename = "adultos")]
    pub adults: u64,
    #[serde(rename = "menores")]
    pub minors: u64,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "desayuno")]
    pub breakfast: bool,
}

/// The mocked structured reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MockOutput {
    #[serde(rename = "itinerario_resumido")]
    pub itinerary: String,
    #[serde(rename = "mensaje_whatsapp")]
    pub message: String,
    #[serde(rename = "hoteldo_filtros")]
    pub filters: HotelFilters,
    pub checks: Vec<CheckResult>,
}

/// Fields scraped from a user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFields {
    pub destination: String,
    pub date_from: String,
    pub date_to: String,
    pub adults: u64,
    pub minors: u64,
    /// Scraped but not part of [MockOutput].
    pub budget: String,
}

impl Default for ExtractedFields {
    fn default() -> Self {
        Self {
            destination: DEFAULT_DESTINATION.to_string(),
            date_from: DEFAULT_DATE.to_string(),
            date_to: DEFAULT_DATE.to_string(),
            adults: DEFAULT_ADULTS,
            minors: DEFAULT_MINORS,
            budget: DEFAULT_BUDGET.to_string(),
        }
    }
}

#[inline]
fn group<'t>(captures: &Captures<'t>, i: usize) -> &'t str {
    captures.get(i).map_or("", |m| m.as_str())
}

impl ExtractedFields {
    /// Scrape fields from `text`. The first match of each pattern wins; matching is case-insensitive.
    pub fn from_text(text: &str) -> Self {
        let destination = DESTINATION_RE
            .captures(text)
            .map_or(DEFAULT_DESTINATION, |c| group(&c, 1));
        let (date_from, date_to) = DATES_RE
            .captures(text)
            .map_or((DEFAULT_DATE, DEFAULT_DATE), |c| (group(&c, 1), group(&c, 2)));
        let (adults, minors) = PASSENGERS_RE
            .captures(text)
            .and_then(|c| match (group(&c, 1).parse::<u64>(), group(&c, 2).parse::<u64>()) {
                (Ok(adults), Ok(minors)) => Some((adults, minors)),
                _ => {
                    warn!("passenger counts out of range in {:?}, using defaults", group(&c, 0));
                    None
                }
            })
            .unwrap_or((DEFAULT_ADULTS, DEFAULT_MINORS));
        let budget = BUDGET_RE
            .captures(text)
            .map_or(DEFAULT_BUDGET, |c| group(&c, 1));
        Self {
            destination: destination.to_string(),
            date_from: date_from.to_string(),
            date_to: date_to.to_string(),
            adults,
            minors,
            budget: budget.to_string(),
        }
    }

    /// Build the reply with an empty checklist.
    pub fn synthesize(&self) -> MockOutput {
        let Self { destination, date_from, date_to, adults, minors, .. } = self;
        MockOutput {
            itinerary: format!(
                "Día 1-7 en {destination}. Actividades balanceadas (city tour, playa, libre). Ventana: {date_from} a {date_to}."
            ),
            message: format!(
                "¡Hola! Te paso una propuesta inicial para {destination} ({date_from}↔{date_to}) para {adults} adultos y {minors} menores. \
                ¿Querés que coticemos con desayuno y cerca de la playa?"
            ),
            filters: HotelFilters {
                destination: destination.clone(),
                date_from: date_from.clone(),
                date_to: date_to.clone(),
                adults: *adults,
                minors: *minors,
                category: HOTEL_CATEGORY.to_string(),
                breakfast: true,
            },
            checks: Vec::new(),
        }
    }
}

/// Test every pattern of `checklist`, case-insensitively and in order, against the ASCII-escaped JSON of `output`.
///
/// The text is taken once, before any result is recorded, so a pattern never matches the results of other patterns.
pub fn evaluate_checklist(output: &MockOutput, checklist: &[String]) -> Result<Vec<CheckResult>, EvalError> {
    if checklist.is_empty() {
        return Ok(Vec::new());
    }
    let text = to_ascii_json(output)?;
    checklist
        .iter()
        .map(|pattern| -> Result<CheckResult, EvalError> {
            let re = RegexBuilder::new(pattern).case_insensitive(true).build()?;
            let status = if re.is_match(&text) { CheckStatus::Ok } else { CheckStatus::Missing };
            Ok(CheckResult {
                pattern: pattern.clone(),
                status,
            })
        })
        .collect()
}

/// Mock a structured reply to the most recent user message of `conversation`.
///
/// A conversation without user messages is treated as an empty message, so every field takes its default.
/// Returns an error if a checklist pattern is not a valid regular expression.
///
/// # Example
/// ```
/// use fastprompt::conversation::{Conversation, Role};
/// use fastprompt::mock::mock_model_response;
///
/// let mut conversation = Conversation::new();
/// conversation.push(Role::User, "destino: Ushuaia\nadultos: 3, menores: 2");
/// let output = mock_model_response(&conversation, &["ushuaia".to_string()]).unwrap();
/// assert_eq!(output.filters.destination, "Ushuaia");
/// assert_eq!((output.filters.adults, output.filters.minors), (3, 2));
/// assert!(output.checks[0].status.is_ok());
///
/// // non-ASCII text is escaped before matching
/// let mut conversation = Conversation::new();
/// conversation.push(Role::User, "destino: Cancún");
/// let checklist = ["cancún".to_string(), r"canc\\u00fan".to_string()];
/// let output = mock_model_response(&conversation, &checklist).unwrap();
/// assert!(!output.checks[0].status.is_ok());
/// assert!(output.checks[1].status.is_ok());
/// ```
pub fn mock_model_response(conversation: &Conversation, checklist: &[String]) -> Result<MockOutput, EvalError> {
    let user = conversation.last_user_content().unwrap_or_default();
    let mut output = ExtractedFields::from_text(user).synthesize();
    output.checks = evaluate_checklist(&output, checklist)?;
    Ok(output)
}
