use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Potential {
    High,
    Medium,
    Emerging,
}

impl FromStr for Potential {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "emerging" => Ok(Self::Emerging),
            other => Err(format!("unknown potential: {other}")),
        }
    }
}

impl TryFrom<String> for Potential {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Potential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Emerging => write!(f, "Emerging"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NicheRecord {
    pub title: String,
    pub description: String,
    pub potential: Potential,
    pub usp: String,
    pub audience: String,
    pub starter_action: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    Valid(Vec<NicheRecord>),
    Invalid(String),
}

// Advisory bounds from the prompt. Overruns are counted, not rejected.
const MAX_TITLE_WORDS: usize = 12;
const MAX_AUDIENCE_WORDS: usize = 12;
const MAX_STARTER_ACTION_WORDS: usize = 12;

impl NicheRecord {
    fn blank_field(&self) -> Option<&'static str> {
        [
            ("title", &self.title),
            ("description", &self.description),
            ("usp", &self.usp),
            ("audience", &self.audience),
            ("starterAction", &self.starter_action),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }

    fn exceeds_word_bounds(&self) -> bool {
        word_count(&self.title) > MAX_TITLE_WORDS
            || word_count(&self.audience) > MAX_AUDIENCE_WORDS
            || word_count(&self.starter_action) > MAX_STARTER_ACTION_WORDS
    }
}

fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

fn parse_record(item: Value) -> Result<NicheRecord, String> {
    let record: NicheRecord = serde_json::from_value(item).map_err(|e| e.to_string())?;
    match record.blank_field() {
        Some(field) => Err(format!("blank field `{field}`")),
        None => Ok(record),
    }
}

/// Keeps well-formed elements and drops the rest.
///
/// An empty array is valid. A non-empty array where nothing survives is `Invalid`.
pub fn validate(items: Vec<Value>) -> Validation {
    let total = items.len();
    let mut records = Vec::with_capacity(total);
    let mut last_reason = None;

    for (index, item) in items.into_iter().enumerate() {
        match parse_record(item) {
            Ok(record) => records.push(record),
            Err(reason) => {
                warn!(index, reason = %reason, "Dropping malformed niche record");
                last_reason = Some(reason);
            }
        }
    }

    let over_length = records.iter().filter(|r| r.exceeds_word_bounds()).count();
    if over_length > 0 {
        debug!(over_length, "Niche records exceed advisory word bounds");
    }

    match last_reason {
        Some(reason) if records.is_empty() => {
            Validation::Invalid(format!("all {total} elements rejected, last: {reason}"))
        }
        _ => Validation::Valid(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(title: &str) -> Value {
        json!({
            "title": title,
            "description": "Hive kits for rooftop gardeners. Margins are high on premium gear.",
            "potential": "High",
            "usp": "The only kit sized for balconies.",
            "audience": "Apartment dwellers who garden on small rooftops",
            "starterAction": "Post a balcony hive poll in local groups"
        })
    }

    #[test]
    fn accepts_complete_records() {
        let Validation::Valid(records) = validate(vec![sample("Balcony hives"), sample("Rooftop honey")]) else {
            panic!("expected valid");
        };
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].potential, Potential::High);
        assert_eq!(records[1].starter_action, "Post a balcony hive poll in local groups");
    }

    #[test]
    fn drops_records_missing_fields_or_bad_potential() {
        let mut missing = sample("Missing usp");
        missing.as_object_mut().unwrap().remove("usp");
        let mut bad_potential = sample("Bad potential");
        bad_potential["potential"] = json!("Stellar");
        let mut blank = sample("Blank audience");
        blank["audience"] = json!("  ");

        let Validation::Valid(records) =
            validate(vec![missing, sample("Keeper"), bad_potential, blank, json!("just a string")])
        else {
            panic!("expected valid");
        };
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Keeper");
    }

    #[test]
    fn all_rejected_is_invalid() {
        let result = validate(vec![json!({"title": "only a title"}), json!(42)]);
        assert!(matches!(result, Validation::Invalid(reason) if reason.contains("all 2 elements")));
    }

    #[test]
    fn empty_array_is_valid() {
        assert_eq!(validate(vec![]), Validation::Valid(vec![]));
    }

    #[test]
    fn potential_is_case_insensitive_and_serializes_canonically() {
        let mut item = sample("Lowercase potential");
        item["potential"] = json!("emerging");
        let Validation::Valid(records) = validate(vec![item]) else {
            panic!("expected valid");
        };
        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json["potential"], "Emerging");
        assert!(json.get("starterAction").is_some());
    }

    #[test]
    fn long_titles_pass_through() {
        let long = "one two three four five six seven eight nine ten eleven twelve thirteen";
        let Validation::Valid(records) = validate(vec![sample(long)]) else {
            panic!("expected valid");
        };
        assert!(records[0].exceeds_word_bounds());
        assert_eq!(records[0].title, long);
    }
}
