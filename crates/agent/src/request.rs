//! Routing of trigger data to agent operations.

use crate::errors::{AgentError, Result};
use rating_types::{Address, Amount, AssetRef, ProjectId, Trigger};
use serde_json::Value;

/// Donation forwarded by the notifier: who gave how much of what to which project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Donation {
    pub project: ProjectId,
    pub donor: Address,
    pub raw_amount: Amount,
    pub asset: AssetRef,
}

/// Operation requested by a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Define,
    Donate(Donation),
}

const DONATION_FIELDS: [&str; 4] = ["repo", "donor", "amount", "asset"];

pub fn parse_request(trigger: &Trigger) -> Result<Request> {
    let data = &trigger.data;
    if data.get("define").map_or(false, is_truthy) {
        return Ok(Request::Define);
    }

    let missing: Vec<&str> = DONATION_FIELDS
        .iter()
        .copied()
        .filter(|field| !data.contains_key(*field))
        .collect();
    if missing.len() == DONATION_FIELDS.len() {
        return Err(AgentError::MalformedTrigger(
            "expected either define or a donation notification".into(),
        ));
    }
    if !missing.is_empty() {
        return Err(AgentError::MalformedTrigger(format!(
            "donation is missing {}",
            missing.join(", ")
        )));
    }

    let project = ProjectId::new(string_field(data, "repo")?)
        .map_err(|e| AgentError::MalformedTrigger(format!("repo: {e}")))?;
    let donor = Address::new(string_field(data, "donor")?)
        .map_err(|e| AgentError::MalformedTrigger(format!("donor: {e}")))?;
    let asset: AssetRef = string_field(data, "asset")?
        .parse()
        .map_err(|e| AgentError::MalformedTrigger(format!("asset: {e}")))?;
    let raw_amount = parse_amount(data.get("amount").unwrap_or(&Value::Null))?;

    Ok(Request::Donate(Donation {
        project,
        donor,
        raw_amount,
        asset,
    }))
}

fn string_field<'a>(data: &'a serde_json::Map<String, Value>, field: &str) -> Result<&'a str> {
    data.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| AgentError::MalformedTrigger(format!("{field} must be a string")))
}

/// `false`, `0`, `""` and `null` are falsy; everything else is truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Positive integer given as a JSON number or a decimal string.
///
/// Numbers are read from their literal text, so the full `u128` range is
/// accepted.
pub fn parse_amount(value: &Value) -> Result<Amount> {
    let amount = match value {
        Value::Number(n) => {
            let literal = n.to_string();
            if literal.starts_with('-') {
                return Err(AgentError::InvalidAmount(format!("{literal} is negative")));
            }
            parse_digits(&literal, || format!("{literal} is not an integer"))?
        }
        Value::String(s) => parse_digits(s, || format!("{s:?} is not a positive integer"))?,
        other => {
            return Err(AgentError::InvalidAmount(format!(
                "{other} is not a number"
            )))
        }
    };
    if amount == 0 {
        return Err(AgentError::InvalidAmount("amount must be positive".into()));
    }
    Ok(amount)
}

fn parse_digits(text: &str, not_integer: impl FnOnce() -> String) -> Result<Amount> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(AgentError::InvalidAmount(not_integer()));
    }
    text.parse::<Amount>()
        .map_err(|_| AgentError::InvalidAmount(format!("{text} is out of range")))
}
