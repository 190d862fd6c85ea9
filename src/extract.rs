use regex::Regex;
use serde_json::Value;

use crate::errors::PlanError;
use crate::model::MealPlan;

/// ========================================
/// Response Extractor & Validator
/// ========================================
///
/// Turns the raw generator text into a typed `MealPlan` or a typed failure.
/// The only formatting tolerance is fence stripping; broken JSON is terminal
/// for the request.

/// Ratio between a monthly and a weekly grocery total (52 weeks / 12 months).
pub const WEEKS_PER_MONTH: f64 = 4.33;

/// Extract the JSON candidate from raw model output. A ```json fence wins,
/// then any generic ``` fence, then the raw text as-is. A missing closing
/// fence takes everything to the end of the text.
pub fn strip_fences(raw: &str) -> &str {
    if let Some(start) = raw.find("```json") {
        let rest = &raw[start + "```json".len()..];
        let end = rest.find("```").unwrap_or(rest.len());
        return rest[..end].trim();
    }
    if let Some(start) = raw.find("```") {
        let rest = &raw[start + "```".len()..];
        let end = rest.find("```").unwrap_or(rest.len());
        return rest[..end].trim();
    }
    raw.trim()
}

/// Full extraction: fence stripping, JSON parse (`Malformed` on failure),
/// typed decode (`Schema` on failure), then total reconciliation.
pub fn extract_plan(raw: &str) -> Result<MealPlan, PlanError> {
    let candidate = strip_fences(raw);
    let value: Value =
        serde_json::from_str(candidate).map_err(|e| PlanError::Malformed(e.to_string()))?;
    let mut plan: MealPlan =
        serde_json::from_value(value).map_err(|e| PlanError::Schema(e.to_string()))?;
    reconcile_totals(&mut plan);
    Ok(plan)
}

/// Derive `monthlyTotal` from `weeklyTotal` when the generator omitted it,
/// keeping the currency prefix it used for the weekly figure.
pub fn reconcile_totals(plan: &mut MealPlan) {
    let fb = &mut plan.financial_breakdown;
    if fb.monthly_total.is_some() {
        return;
    }
    if let Some((prefix, weekly)) = fb.weekly_total.as_deref().and_then(parse_currency) {
        let monthly = weekly * WEEKS_PER_MONTH;
        fb.monthly_total = Some(format!("{prefix}{monthly:.2}"));
    }
}

/// Split a currency-formatted string like "£50.00" or "$ 12.50" into its
/// symbol prefix and numeric value. Thousands separators are dropped.
pub fn parse_currency(text: &str) -> Option<(String, f64)> {
    let re = Regex::new(r"^\s*([^0-9\-]*?)\s*(-?[0-9][0-9,]*(?:\.[0-9]+)?)\s*$").ok()?;
    let caps = re.captures(text)?;
    let prefix = caps.get(1)?.as_str().trim().to_string();
    let number: f64 = caps.get(2)?.as_str().replace(',', "").parse().ok()?;
    Some((prefix, number))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_PLAN: &str = r#"{
        "weeklySchedule": {
            "monday": {"breakfast": "oats", "lunch": "soup", "dinner": "dal", "snacks": "fruit"},
            "tuesday": {"breakfast": "b", "lunch": "l", "dinner": "d", "snacks": "s"},
            "wednesday": {"breakfast": "b", "lunch": "l", "dinner": "d", "snacks": "s"},
            "thursday": {"breakfast": "b", "lunch": "l", "dinner": "d", "snacks": "s"},
            "friday": {"breakfast": "b", "lunch": "l", "dinner": "d", "snacks": "s"},
            "saturday": {"breakfast": "b", "lunch": "l", "dinner": "d"},
            "sunday": {"breakfast": "b", "lunch": "l", "dinner": "d", "snacks": "s"}
        },
        "recipes": [],
        "shoppingList": {"produce": [{"item": "2 onions", "price": 0.5}]},
        "financialBreakdown": {"weeklyTotal": "£50.00"}
    }"#;

    #[test]
    fn json_fence_is_stripped() {
        let raw = format!("Here is your plan:\n```json\n{MINIMAL_PLAN}\n```\nEnjoy!");
        let stripped = strip_fences(&raw);
        assert!(!stripped.contains("```"));
        assert!(stripped.starts_with('{'));
        assert!(stripped.ends_with('}'));
    }

    #[test]
    fn generic_fence_is_stripped() {
        let raw = format!("```\n{MINIMAL_PLAN}\n```");
        assert!(strip_fences(&raw).starts_with('{'));
    }

    #[test]
    fn unfenced_text_is_used_as_is() {
        let raw = format!("  {MINIMAL_PLAN}  ");
        assert_eq!(strip_fences(&raw), MINIMAL_PLAN.trim());
    }

    #[test]
    fn unterminated_fence_takes_rest_of_text() {
        let raw = format!("```json\n{MINIMAL_PLAN}");
        assert!(strip_fences(&raw).ends_with('}'));
    }

    #[test]
    fn broken_json_is_malformed() {
        let err = extract_plan("I could not produce a plan today.").unwrap_err();
        assert!(matches!(err, PlanError::Malformed(_)));
    }

    #[test]
    fn missing_day_is_a_schema_violation() {
        let json = r#"{
            "weeklySchedule": {"monday": {"breakfast": "b"}},
            "recipes": [],
            "shoppingList": {},
            "financialBreakdown": {}
        }"#;
        let err = extract_plan(json).unwrap_err();
        assert!(matches!(err, PlanError::Schema(_)));
    }

    #[test]
    fn missing_slot_is_tolerated_and_renders_as_dash() {
        let plan = extract_plan(MINIMAL_PLAN).unwrap();
        assert_eq!(plan.weekly_schedule.saturday.slot("snacks"), "-");
        assert_eq!(plan.weekly_schedule.monday.slot("breakfast"), "oats");
    }

    #[test]
    fn monthly_total_is_derived_from_weekly() {
        let plan = extract_plan(MINIMAL_PLAN).unwrap();
        assert_eq!(
            plan.financial_breakdown.monthly_total.as_deref(),
            Some("£216.50")
        );
    }

    #[test]
    fn present_monthly_total_is_left_alone() {
        let json = MINIMAL_PLAN.replace(
            r#""weeklyTotal": "£50.00""#,
            r#""weeklyTotal": "£50.00", "monthlyTotal": "£199.99""#,
        );
        let plan = extract_plan(&json).unwrap();
        assert_eq!(
            plan.financial_breakdown.monthly_total.as_deref(),
            Some("£199.99")
        );
    }

    #[test]
    fn round_trip_is_stable() {
        let plan = extract_plan(MINIMAL_PLAN).unwrap();
        let serialized = serde_json::to_string(&plan).unwrap();
        let again = extract_plan(&serialized).unwrap();
        assert_eq!(
            serde_json::to_value(&plan).unwrap(),
            serde_json::to_value(&again).unwrap()
        );
    }

    #[test]
    fn currency_parsing_handles_symbols_and_separators() {
        assert_eq!(parse_currency("£50.00"), Some(("£".into(), 50.0)));
        assert_eq!(parse_currency("$ 12.5"), Some(("$".into(), 12.5)));
        assert_eq!(parse_currency("€1,250.75"), Some(("€".into(), 1250.75)));
        assert_eq!(parse_currency("Under budget"), None);
    }
}
