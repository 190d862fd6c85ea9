use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::PlanError;

/// ========================================
/// User dietary profile (form wire format)
/// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Goal {
    Healing,
    WeightGain,
    WeightLoss,
    Energy,
}

impl Goal {
    pub fn label(&self) -> &'static str {
        match self {
            Goal::Healing => "Healing & Repair",
            Goal::WeightGain => "Weight Gain",
            Goal::WeightLoss => "Weight Loss",
            Goal::Energy => "Energy & Vitality",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CookingStyle {
    Quick,
    Batch,
    Chef,
}

impl CookingStyle {
    pub fn token(&self) -> &'static str {
        match self {
            CookingStyle::Quick => "quick",
            CookingStyle::Batch => "batch",
            CookingStyle::Chef => "chef",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Week,
    Month,
}

impl BudgetPeriod {
    pub fn label(&self) -> &'static str {
        match self {
            BudgetPeriod::Week => "week",
            BudgetPeriod::Month => "month",
        }
    }
}

/// The profile the multi-step form submits. Field names mirror the client
/// wire format (camelCase). Weight/height stay as strings: they are only
/// ever interpolated into the prompt, never computed with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub weight: String,
    pub weight_unit: String,
    pub height: String,
    pub height_unit: String,
    pub goal: Goal,
    #[serde(deserialize_with = "de_flexible_f64")]
    pub budget: f64,
    pub currency: String,
    pub budget_period: BudgetPeriod,
    pub cooking_style: CookingStyle,
    pub cuisine: String,
    #[serde(default)]
    pub favorites: String,
    #[serde(default)]
    pub dislikes: String,
}

impl Profile {
    /// Mandatory-field check before a generation request is issued.
    /// Goal/style/period presence is already enforced by the enum types.
    pub fn validate(&self) -> Result<(), PlanError> {
        let mut missing = Vec::new();
        if self.weight.trim().is_empty() {
            missing.push("weight");
        }
        if self.height.trim().is_empty() {
            missing.push("height");
        }
        if self.cuisine.trim().is_empty() {
            missing.push("cuisine");
        }
        if !missing.is_empty() {
            return Err(PlanError::InvalidProfile(format!(
                "missing fields: {}",
                missing.join(", ")
            )));
        }
        if !(self.budget > 0.0) {
            return Err(PlanError::InvalidProfile(
                "budget must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn is_any_cuisine(&self) -> bool {
        self.cuisine.trim().is_empty() || self.cuisine.trim().eq_ignore_ascii_case("any")
    }

    /// Comma-split, trimmed, lowercased terms from the dislikes free text.
    pub fn dislike_terms(&self) -> Vec<String> {
        split_terms(&self.dislikes)
    }

    pub fn favorite_terms(&self) -> Vec<String> {
        split_terms(&self.favorites)
    }
}

fn split_terms(text: &str) -> Vec<String> {
    text.split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// The form submits numbers as strings ("50") or numbers (50); accept both.
pub fn de_flexible_f64<'de, D>(de: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(f64),
        Str(String),
    }
    match NumOrStr::deserialize(de)? {
        NumOrStr::Num(n) => Ok(n),
        NumOrStr::Str(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("not a number: {s:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Profile {
        Profile {
            weight: "70".into(),
            weight_unit: "kg".into(),
            height: "175".into(),
            height_unit: "cm".into(),
            goal: Goal::Energy,
            budget: 50.0,
            currency: "GBP".into(),
            budget_period: BudgetPeriod::Week,
            cooking_style: CookingStyle::Quick,
            cuisine: "italian".into(),
            favorites: "chickpeas, lemon".into(),
            dislikes: "Dairy, shellfish".into(),
        }
    }

    #[test]
    fn valid_profile_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn empty_weight_is_rejected() {
        let mut p = sample();
        p.weight = "  ".into();
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("weight"));
    }

    #[test]
    fn zero_budget_is_rejected() {
        let mut p = sample();
        p.budget = 0.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn goal_tokens_match_wire_format() {
        assert_eq!(
            serde_json::to_string(&Goal::WeightGain).unwrap(),
            "\"weight-gain\""
        );
        assert_eq!(serde_json::to_string(&Goal::Healing).unwrap(), "\"healing\"");
    }

    #[test]
    fn dislike_terms_are_split_and_lowercased() {
        assert_eq!(sample().dislike_terms(), vec!["dairy", "shellfish"]);
    }

    #[test]
    fn budget_accepts_string_or_number() {
        let json = r#"{"weight":"70","weightUnit":"kg","height":"175","heightUnit":"cm",
            "goal":"energy","budget":"48.50","currency":"GBP","budgetPeriod":"week",
            "cookingStyle":"quick","cuisine":"any"}"#;
        let p: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(p.budget, 48.50);
    }

    #[test]
    fn any_cuisine_detection() {
        let mut p = sample();
        assert!(!p.is_any_cuisine());
        p.cuisine = "Any".into();
        assert!(p.is_any_cuisine());
    }
}
