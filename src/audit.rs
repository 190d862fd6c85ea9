use crate::model::MealPlan;
use crate::profile::Profile;

/// ========================================
/// Constraint audit
/// ========================================
///
/// Best-effort cross-check of a parsed plan against the profile that
/// requested it. Violations become warnings, never rejections: the
/// generator is the sole source of content, so the caller can only
/// surface the problem, not fix it.

/// Minimum fraction of recipes that must match the requested cuisine.
const CUISINE_COMPLIANCE: f64 = 0.70;

/// Avoided-term expansion: a dislike on the left also excludes the
/// ingredients on the right.
const DERIVATIVES: &[(&str, &[&str])] = &[
    (
        "dairy",
        &["milk", "cheese", "butter", "yogurt", "yoghurt", "cream", "ghee", "whey"],
    ),
    (
        "gluten",
        &["wheat", "flour", "bread", "pasta", "barley", "rye", "couscous", "noodle"],
    ),
    (
        "meat",
        &["beef", "pork", "chicken", "lamb", "bacon", "ham", "sausage", "turkey"],
    ),
    (
        "nuts",
        &["almond", "peanut", "cashew", "walnut", "pecan", "hazelnut", "pistachio"],
    ),
    (
        "shellfish",
        &["shrimp", "prawn", "crab", "lobster", "mussel", "clam", "oyster", "scallop"],
    ),
    ("soy", &["tofu", "tempeh", "edamame", "miso", "soya"]),
    ("egg", &["mayonnaise", "aioli", "meringue"]),
    ("sugar", &["syrup", "honey", "molasses"]),
];

/// Run every audit and collect warnings. An empty vector means the plan
/// honors all declared constraints.
pub fn audit(plan: &MealPlan, profile: &Profile) -> Vec<String> {
    let mut warnings = Vec::new();
    audit_dislikes(plan, profile, &mut warnings);
    audit_cuisine(plan, profile, &mut warnings);
    audit_budget(plan, profile, &mut warnings);
    audit_prices(plan, &mut warnings);
    warnings
}

fn terms_for(dislike: &str) -> Vec<String> {
    let mut terms = vec![dislike.to_string()];
    for (key, derived) in DERIVATIVES {
        if dislike.contains(key) {
            terms.extend(derived.iter().map(|d| d.to_string()));
        }
    }
    terms
}

fn audit_dislikes(plan: &MealPlan, profile: &Profile, warnings: &mut Vec<String>) {
    for dislike in profile.dislike_terms() {
        let terms = terms_for(&dislike);
        for recipe in &plan.recipes {
            for ingredient in &recipe.ingredients {
                let lowered = ingredient.to_lowercase();
                if let Some(hit) = terms.iter().find(|t| lowered.contains(t.as_str())) {
                    warnings.push(format!(
                        "recipe \"{}\": ingredient \"{}\" conflicts with avoided \"{}\" (matched \"{}\")",
                        recipe.name, ingredient, dislike, hit
                    ));
                }
            }
        }
    }
}

fn audit_cuisine(plan: &MealPlan, profile: &Profile, warnings: &mut Vec<String>) {
    if profile.is_any_cuisine() || plan.recipes.is_empty() {
        return;
    }
    let wanted = profile.cuisine.trim().to_lowercase();
    let matching = plan
        .recipes
        .iter()
        .filter(|r| {
            r.cuisine
                .as_deref()
                .map(|c| c.to_lowercase().contains(&wanted))
                .unwrap_or(false)
        })
        .count();
    let fraction = matching as f64 / plan.recipes.len() as f64;
    if fraction < CUISINE_COMPLIANCE {
        warnings.push(format!(
            "only {matching} of {} recipes are {} cuisine ({:.0}%, wanted at least {:.0}%)",
            plan.recipes.len(),
            profile.cuisine.trim(),
            fraction * 100.0,
            CUISINE_COMPLIANCE * 100.0
        ));
    }
}

fn audit_budget(plan: &MealPlan, profile: &Profile, warnings: &mut Vec<String>) {
    let total = plan.shopping_list.total();
    // Half-cent tolerance so currency rounding does not flag exact totals.
    if total > profile.budget + 0.005 {
        warnings.push(format!(
            "shopping list totals {:.2} {} against a budget of {:.2}",
            total, profile.currency, profile.budget
        ));
    }
}

fn audit_prices(plan: &MealPlan, warnings: &mut Vec<String>) {
    for item in plan.shopping_list.items() {
        if item.price < 0.0 {
            warnings.push(format!(
                "item \"{}\" has a negative price {:.2}",
                item.item, item.price
            ));
        }
    }
}
