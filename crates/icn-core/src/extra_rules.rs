//! The free-form `{...}` game rules block.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};
use tracing::warn;

use crate::error::{Bracket, IcnError, IcnResult};
use crate::record::{GameRules, RESERVED_RULE_KEYS};

/// Byte length of the brace-delimited value opening `text`, including both
/// braces. Braces inside JSON strings do not count. `None` if it never closes.
pub(crate) fn balanced_span(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Cut the block opening `text` and parse it as a JSON object.
/// Returns the parsed rules and the number of bytes consumed.
pub(crate) fn take_extra_rules(text: &str) -> IcnResult<(Map<String, JsonValue>, usize)> {
    let len = balanced_span(text).ok_or(IcnError::UnterminatedBracket(Bracket::ExtraRules))?;
    let block = &text[..len];
    let rules = serde_json::from_str(block)
        .map_err(|e| IcnError::malformed("extra rules block", format!("{block} ({e})")))?;
    Ok((rules, len))
}

/// Merge a parsed block into the record's rules. Later keys overwrite
/// earlier ones; reserved keys are refused unless `allow_reserved`.
pub(crate) fn merge_extra_rules(
    rules: &mut GameRules,
    block: Map<String, JsonValue>,
    allow_reserved: bool,
) -> IcnResult<()> {
    for (key, value) in block {
        if !RESERVED_RULE_KEYS.contains(&key.as_str()) {
            rules.extra.insert(key, value);
            continue;
        }
        if !allow_reserved {
            return Err(IcnError::ReservedRuleKey(key));
        }

        warn!(key = %key, "Extra rules block overrides a reserved game rule");
        match key.as_str() {
            "promotionRanks" => rules.promotion_ranks = Some(typed(&key, value)?),
            "promotionsAllowed" => rules.promotions_allowed = Some(typed(&key, value)?),
            _ => rules.win_conditions = Some(typed(&key, value)?),
        }
    }
    Ok(())
}

fn typed<T: DeserializeOwned>(key: &str, value: JsonValue) -> IcnResult<T> {
    serde_json::from_value(value)
        .map_err(|e| IcnError::malformed("reserved game rule", format!("{key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_balanced_span_skips_string_braces() {
        let text = r#"{"asdds}sd a": 2332, "{nest}" : { "nes t2": "233 22" } } checkmate"#;
        let len = balanced_span(text).unwrap();
        assert_eq!(&text[len..], " checkmate");
    }

    #[test]
    fn test_balanced_span_escaped_quote() {
        let text = r#"{"a\"}": 1}"#;
        assert_eq!(balanced_span(text), Some(text.len()));
    }

    #[test]
    fn test_unterminated_block() {
        assert_eq!(balanced_span(r#"{"a": {"b": 1}"#), None);
        assert_eq!(
            take_extra_rules(r#"{"a": "}"#),
            Err(IcnError::UnterminatedBracket(Bracket::ExtraRules))
        );
    }

    #[test]
    fn test_balanced_but_not_json() {
        assert!(matches!(
            take_extra_rules("{slideLimit: 3}"),
            Err(IcnError::MalformedToken { .. })
        ));
    }

    #[test]
    fn test_merge_refuses_reserved_by_default() {
        let mut rules = GameRules::default();
        let (block, _) = take_extra_rules(r#"{"slideLimit":"Infinity","winConditions":{}}"#).unwrap();
        assert_eq!(
            merge_extra_rules(&mut rules, block, false),
            Err(IcnError::ReservedRuleKey("winConditions".to_string()))
        );
    }

    #[test]
    fn test_merge_reserved_when_allowed() {
        let mut rules = GameRules::default();
        let block = json!({"promotionRanks": [8, 1], "ovenTemperature": 350});
        let JsonValue::Object(block) = block else { unreachable!() };

        merge_extra_rules(&mut rules, block, true).unwrap();
        assert_eq!(rules.promotion_ranks, Some((Some(8), Some(1))));
        assert_eq!(rules.extra.get("ovenTemperature"), Some(&json!(350)));
        assert!(!rules.extra.contains_key("promotionRanks"));
    }
}
