use std::collections::BTreeMap;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::profile::de_flexible_f64;

/// ========================================
/// MealPlan wire format (generator output)
/// ========================================
///
/// Field names mirror the JSON contract the prompt demands. Soft fields
/// (`strategy`, `mealPrepGuide`, `encouragement`) are optional; the
/// schedule's day keys are required but individual meal slots are not.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    pub weekly_schedule: WeeklySchedule,
    pub recipes: Vec<Recipe>,
    pub shopping_list: ShoppingList,
    pub financial_breakdown: FinancialBreakdown,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_prep_guide: Option<MealPrepGuide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encouragement: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub key_nutrients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor_profile: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chef_tips: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub monday: DayMeals,
    pub tuesday: DayMeals,
    pub wednesday: DayMeals,
    pub thursday: DayMeals,
    pub friday: DayMeals,
    pub saturday: DayMeals,
    pub sunday: DayMeals,
}

impl WeeklySchedule {
    pub fn days(&self) -> [(&'static str, &DayMeals); 7] {
        [
            ("monday", &self.monday),
            ("tuesday", &self.tuesday),
            ("wednesday", &self.wednesday),
            ("thursday", &self.thursday),
            ("friday", &self.friday),
            ("saturday", &self.saturday),
            ("sunday", &self.sunday),
        ]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayMeals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakfast: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lunch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dinner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snacks: Option<String>,
}

pub const MEAL_SLOTS: [&str; 4] = ["breakfast", "lunch", "dinner", "snacks"];

impl DayMeals {
    /// Slot text for rendering; a missing slot shows as a placeholder dash.
    pub fn slot(&self, name: &str) -> &str {
        let v = match name {
            "breakfast" => &self.breakfast,
            "lunch" => &self.lunch,
            "dinner" => &self.dinner,
            "snacks" => &self.snacks,
            _ => &None,
        };
        v.as_deref().unwrap_or("-")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrients: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor_notes: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chef_secrets: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub item: String,
    #[serde(default, deserialize_with = "de_flexible_f64")]
    pub price: f64,
}

pub type CategoryMap = BTreeMap<String, Vec<ShoppingItem>>;

/// Two recognized shopping-list shapes: the legacy flat category map and
/// the tiered weekly / monthlyBulk / monthlyRegular form. Detection is by
/// key presence, so a flat list whose category happens to be named
/// "weekly" is read as tiered, matching the reference renderer.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ShoppingList {
    Tiered {
        #[serde(skip_serializing_if = "Option::is_none")]
        weekly: Option<CategoryMap>,
        #[serde(rename = "monthlyBulk", skip_serializing_if = "Option::is_none")]
        monthly_bulk: Option<CategoryMap>,
        #[serde(rename = "monthlyRegular", skip_serializing_if = "Option::is_none")]
        monthly_regular: Option<CategoryMap>,
    },
    Flat(CategoryMap),
}

impl<'de> Deserialize<'de> for ShoppingList {
    fn deserialize<D>(de: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(de)?;
        let obj = value
            .as_object()
            .ok_or_else(|| D::Error::custom("shoppingList must be an object"))?;
        let tiered = obj.contains_key("weekly")
            || obj.contains_key("monthlyBulk")
            || obj.contains_key("monthlyRegular");
        if tiered {
            let tier = |key: &str| -> Result<Option<CategoryMap>, D::Error> {
                match obj.get(key) {
                    Some(v) => serde_json::from_value(v.clone())
                        .map(Some)
                        .map_err(|e| D::Error::custom(format!("shoppingList.{key}: {e}"))),
                    None => Ok(None),
                }
            };
            Ok(ShoppingList::Tiered {
                weekly: tier("weekly")?,
                monthly_bulk: tier("monthlyBulk")?,
                monthly_regular: tier("monthlyRegular")?,
            })
        } else {
            serde_json::from_value(value)
                .map(ShoppingList::Flat)
                .map_err(|e| D::Error::custom(format!("shoppingList: {e}")))
        }
    }
}

impl ShoppingList {
    /// All tiers present, labeled; the flat form is a single unlabeled tier.
    pub fn tiers(&self) -> Vec<(&'static str, &CategoryMap)> {
        match self {
            ShoppingList::Tiered {
                weekly,
                monthly_bulk,
                monthly_regular,
            } => {
                let mut out = Vec::new();
                if let Some(t) = weekly {
                    out.push(("weekly", t));
                }
                if let Some(t) = monthly_bulk {
                    out.push(("monthly bulk", t));
                }
                if let Some(t) = monthly_regular {
                    out.push(("monthly regular", t));
                }
                out
            }
            ShoppingList::Flat(map) => vec![("shopping list", map)],
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &ShoppingItem> {
        self.tiers()
            .into_iter()
            .flat_map(|(_, map)| map.values())
            .flatten()
    }

    pub fn total(&self) -> f64 {
        self.items().map(|i| i.price).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialBreakdown {
    #[serde(default, alias = "estimatedTotal", skip_serializing_if = "Option::is_none")]
    pub weekly_total: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_total: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_meal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_status: Option<String>,
    #[serde(default)]
    pub breakdown: BTreeMap<String, String>,
    #[serde(default, alias = "moneySavingHacks")]
    pub savings_tips: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPrepGuide {
    #[serde(default)]
    pub sunday: Vec<String>,
    #[serde(default)]
    pub weeknight: Vec<String>,
}
