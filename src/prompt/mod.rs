use chrono::{DateTime, Datelike, Utc};
use rand::Rng;

use crate::profile::{CookingStyle, Goal, Profile};

/// ========================================
/// Prompt Builder
/// ========================================
///
/// Renders the static system block and the per-request user block. The rule
/// set appears in BOTH blocks on purpose: the generator's instruction
/// following is unreliable, so every hard constraint is restated next to the
/// profile values it applies to.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    /// Rules and schema only; drops the culinary knowledge bases.
    Terse,
    /// The full prompt.
    Standard,
    /// Standard plus a bare-JSON demand header; used on the retry after a
    /// malformed response.
    Strict,
}

#[derive(Debug, Clone)]
pub struct PromptBlocks {
    pub system: String,
    pub user: String,
}

/// Light randomization to reduce repetition across calls with identical
/// profiles. Clock and RNG are injected so the builder stays pure.
#[derive(Debug, Clone)]
pub struct VarietyFactors {
    pub season: &'static str,
    pub theme: &'static str,
    pub seed: u32,
}

const SEASONS: [&str; 4] = ["spring", "summer", "autumn", "winter"];

const THEMES: [&str; 10] = [
    "Mediterranean sunshine",
    "Asian fusion adventure",
    "Latin American fiesta",
    "Cozy comfort classics reinvented",
    "Farm-to-table freshness",
    "Global street food inspiration",
    "Plant-forward power",
    "Protein-packed performance",
    "One-pot wonders",
    "Sheet pan simplicity",
];

impl VarietyFactors {
    pub fn sample<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> Self {
        let season = SEASONS[(now.month0() / 3) as usize % 4];
        let theme = THEMES[rng.gen_range(0..THEMES.len())];
        let seed = rng.gen_range(0..1000);
        Self { season, theme, seed }
    }
}

pub fn build(profile: &Profile, factors: &VarietyFactors, style: PromptStyle) -> PromptBlocks {
    PromptBlocks {
        system: system_block(style),
        user: user_block(profile, factors, style),
    }
}

fn culinary_techniques() -> &'static str {
    r#"ESSENTIAL COOKING TECHNIQUES FOR MAXIMUM FLAVOR:

1. **Maillard Reaction Mastery** - dry proteins before searing, high heat,
   don't crowd the pan, deglaze to capture fond.
2. **Aromatics Foundation** - French mirepoix, Italian soffritto, Spanish
   sofrito, Cajun trinity, Asian ginger-garlic-scallion, Indian tadka.
3. **Layering Flavor** - toast spices to bloom oils, garlic after onions
   soften, dried herbs early and fresh herbs late, finish with acid and a
   quality fat.
4. **Umami Bombs** - caramelized tomato paste, soy/fish sauce, miso,
   parmesan rinds, dried mushrooms, anchovy paste.
5. **Texture Contrasts** - crispy with creamy, toasted nuts and seeds,
   quick-pickled vegetables, fresh herbs for pop."#
}

fn recipe_inspirations() -> &'static str {
    r#"GLOBAL RECIPE KNOWLEDGE BASE:

Budget proteins: shakshuka, black bean burrito bowls, lentil dal with tadka,
crispy tofu with peanut sauce, mujadara, Tuscan white bean soup.
Vegetable-forward: roasted cauliflower steaks with chimichurri, ratatouille,
Thai basil eggplant, Moroccan vegetable tagine.
One-pot batch dishes: chicken cacciatore, coconut chickpea curry, jambalaya,
Hungarian goulash, feijoada.
Quick 15-minute meals: aglio e olio, stir-fried noodles, quesadillas with
pico de gallo, tamago gohan, smashed cucumber salad.
Chef-level dishes: duck confit with Puy lentils, osso buco with gremolata,
coq au vin, Thai green curry from scratch.
Breakfasts: Turkish menemen, overnight oats, ful medames, savory oatmeal
with soft egg, banana oat pancakes.
Smart batch components: caramelized onions, roasted garlic, pickled red
onions, herb oil, cooked grains."#
}

fn rule_set() -> &'static str {
    r#"STRICT USER PREFERENCE RULES (ABSOLUTELY CRITICAL - THESE ARE MANDATORY):

1. **COOKING STYLE COMPLIANCE** (NON-NEGOTIABLE):
   - "quick": ALL meals must be 15 minutes or less. No exceptions.
   - "batch": make-ahead meals, one-pot dishes, meal prep. Cook once, eat multiple times.
   - "chef": complex techniques, multiple components, gourmet preparations.

2. **CUISINE PREFERENCE COMPLIANCE** (STRICT ENFORCEMENT):
   - If a specific cuisine is chosen (not "any"), at least 70% of meals MUST be from that cuisine.
   - For "any", provide diverse global cuisines while maintaining variety.

3. **FAVORITE INGREDIENTS** (MANDATORY INCLUSION):
   - Feature at least one favorite ingredient in EVERY DAY's meals.

4. **FOODS TO AVOID** (ABSOLUTE EXCLUSION):
   - NEVER include any avoided ingredient or its derivatives (if "dairy" is
     avoided: no milk, cheese, butter, yogurt, cream).
   - Double-check every ingredient list before finalizing.

5. **BUDGET CONSTRAINT** (HARD LIMIT):
   - Stay within or under the specified budget; revise with cheaper
     alternatives if the total exceeds it.
   - weeklyTotal must equal the sum of all shopping-list item prices.
   - monthlyTotal = weeklyTotal x 4.33. Use realistic prices for the user's currency.

6. **GOAL ALIGNMENT** (OPTIMIZE FOR):
   - Healing & Repair: anti-inflammatory foods, omega-3s, antioxidants, vitamin C, zinc.
   - Weight Gain: calorie-dense, high protein, healthy fats, frequent meals.
   - Weight Loss: high volume/low calorie, high protein for satiety, fiber-rich.
   - Energy & Vitality: complex carbs, B vitamins, iron, steady energy.

VARIETY RULES:
- Never repeat the same protein two days in a row.
- At least 3 different grains/starches and 7 different vegetables across the week.
- Use "Cross-Utilization": reuse prepared ingredients across meals for zero waste."#
}

fn response_schema() -> &'static str {
    r#"RESPONSE FORMAT:
You must respond with ONLY valid JSON (no markdown, no code blocks, no extra
text). Use this exact structure:

{
  "strategy": {
    "title": "Creative theme for this week",
    "description": "Explanation of the approach",
    "keyNutrients": ["nutrient1", "nutrient2", "nutrient3"],
    "flavorProfile": "The flavor journey this week",
    "chefTips": ["tip 1", "tip 2"]
  },
  "weeklySchedule": {
    "monday": { "breakfast": "meal", "lunch": "meal", "dinner": "meal", "snacks": "snack" },
    "tuesday": { "breakfast": "...", "lunch": "...", "dinner": "...", "snacks": "..." },
    "wednesday": { "breakfast": "...", "lunch": "...", "dinner": "...", "snacks": "..." },
    "thursday": { "breakfast": "...", "lunch": "...", "dinner": "...", "snacks": "..." },
    "friday": { "breakfast": "...", "lunch": "...", "dinner": "...", "snacks": "..." },
    "saturday": { "breakfast": "...", "lunch": "...", "dinner": "...", "snacks": "..." },
    "sunday": { "breakfast": "...", "lunch": "...", "dinner": "...", "snacks": "..." }
  },
  "recipes": [
    {
      "name": "Recipe Name",
      "cuisine": "Origin cuisine",
      "prepTime": "XX mins",
      "cookTime": "XX mins",
      "calories": "XXX kcal",
      "protein": "XXg",
      "nutrients": "Key vitamins and minerals",
      "flavorNotes": "What makes this dish special",
      "ingredients": ["quantity ingredient (specific)"],
      "instructions": ["Detailed step with technique tips"],
      "chefSecrets": "Pro tip to elevate this dish"
    }
  ],
  "shoppingList": {
    "weekly": {
      "produce": [{"item": "2 onions", "price": 0.50}],
      "protein": [{"item": "500g chicken breast", "price": 3.50}],
      "dairy": [{"item": "1L milk", "price": 1.15}],
      "grains": [{"item": "1kg rice", "price": 1.80}]
    },
    "monthlyBulk": {
      "pantry": [{"item": "item", "price": 0.00}],
      "spices": [{"item": "item", "price": 0.00}],
      "frozen": [{"item": "item", "price": 0.00}]
    },
    "monthlyRegular": {
      "pantry": [{"item": "cooking oil 1L", "price": 2.50}]
    }
  },
  "financialBreakdown": {
    "weeklyTotal": "£XX.XX",
    "monthlyTotal": "£XX.XX",
    "perMeal": "£X.XX",
    "budgetStatus": "Under budget by £X",
    "breakdown": { "produce": "£XX.XX", "protein": "£XX.XX", "pantry": "£XX.XX" },
    "savingsTips": ["Specific actionable tip"]
  },
  "mealPrepGuide": {
    "sunday": ["What to prep ahead"],
    "weeknight": ["Quick assembly tips"]
  },
  "encouragement": "Personalized, warm message about their journey"
}"#
}

fn system_block(style: PromptStyle) -> String {
    let role = "You are a world-class Chef and Registered Dietitian who specializes in \
        \"High Nutrient Density on a Budget.\" You deeply understand that delicious \
        food and healthy eating are the same thing when done right.\n\n\
        YOUR MISSION: create a Weekly Meal Plan that is delicious first, nutrient \
        dense, budget smart, and zero waste.";

    let mut out = String::new();
    if style == PromptStyle::Strict {
        out.push_str(
            "STRICT MODE - OUTPUT CONTRACT:\nReturn EXACTLY ONE JSON object. No markdown, \
             no code fences, no commentary before or after the JSON.\n\n",
        );
    }
    out.push_str(role);
    out.push_str("\n\n");
    if style != PromptStyle::Terse {
        out.push_str(culinary_techniques());
        out.push_str("\n\n");
        out.push_str(recipe_inspirations());
        out.push_str("\n\n");
    }
    out.push_str(rule_set());
    out.push_str("\n\n");
    out.push_str(response_schema());
    out
}

fn goal_guidance(goal: Goal) -> &'static str {
    match goal {
        Goal::Healing => "anti-inflammatory foods, high in omega-3s, antioxidants, vitamin C, zinc",
        Goal::WeightGain => "calorie-dense, high protein, healthy fats, frequent meals and snacks",
        Goal::WeightLoss => "high volume/low calorie, high protein for satiety, fiber-rich",
        Goal::Energy => "complex carbs, B vitamins, iron, consistent energy throughout the day",
    }
}

fn style_directive(style: CookingStyle) -> &'static str {
    match style {
        CookingStyle::Quick => "CRITICAL: ALL meals must be ready in 15 minutes or less!",
        CookingStyle::Batch => {
            "CRITICAL: Focus on batch cooking, meal prep, one-pot meals. Cook once, eat multiple times!"
        }
        CookingStyle::Chef => {
            "CRITICAL: Include complex techniques, multi-component dishes, gourmet preparations!"
        }
    }
}

fn user_block(profile: &Profile, factors: &VarietyFactors, style: PromptStyle) -> String {
    let favorites = if profile.favorite_terms().is_empty() {
        "- No specific favorites listed".to_string()
    } else {
        format!(
            "- {}\n- MANDATORY: feature these ingredients prominently throughout the week\n\
             - Include at least ONE favorite in EVERY day's meals",
            profile.favorites.trim()
        )
    };
    let dislikes = if profile.dislike_terms().is_empty() {
        "- No specific avoidances listed".to_string()
    } else {
        format!(
            "- {}\n- CRITICAL: NEVER include these or their derivatives\n\
             - Double-check EVERY ingredient before including",
            profile.dislikes.trim()
        )
    };
    let cuisine_rule = if profile.is_any_cuisine() {
        "Provide diverse global cuisines".to_string()
    } else {
        format!(
            "CRITICAL: At least 70% of meals MUST be {} cuisine!",
            profile.cuisine.trim()
        )
    };

    let mut out = format!(
        r#"CREATE A UNIQUE MEAL PLAN (Variety Seed: {seed})

**Season:** {season} - use seasonal produce!
**Suggested Theme Direction:** {theme} (user preferences override this)

**USER PROFILE (STRICT REQUIREMENTS - MUST FOLLOW):**

**Biometrics & Goal:**
- Weight: {weight} {weight_unit}
- Height: {height} {height_unit}
- PRIMARY GOAL: {goal} <- OPTIMIZE ALL MEALS FOR THIS GOAL ({goal_guidance})

**Budget (HARD CONSTRAINT):**
- {budget} {currency} per {period}
- DO NOT EXCEED THIS AMOUNT
- Calculate exact totals and ensure they're within budget

**Cooking Style (MANDATORY COMPLIANCE):**
- User selected: {cooking_style}
- {style_directive}

**Cuisine Preference (STRICT REQUIREMENT):**
- User selected: {cuisine}
- {cuisine_rule}

**FAVORITE INGREDIENTS (MUST INCLUDE):**
{favorites}

**FOODS TO AVOID (ABSOLUTE EXCLUSION):**
{dislikes}

MANDATORY CHECKLIST BEFORE RESPONDING:
- Does the cooking style match the selection (quick/batch/chef)?
- Does the cuisine match the preference (if not "any")?
- Are ALL favorite ingredients featured throughout the week?
- Are ALL avoided foods completely excluded (including derivatives)?
- Is the total cost within the specified budget?
- Does the nutrition optimize for the stated goal?

Generate the complete meal plan now with vivid, appetizing descriptions!"#,
        seed = factors.seed,
        season = factors.season,
        theme = factors.theme,
        weight = profile.weight.trim(),
        weight_unit = profile.weight_unit.trim(),
        height = profile.height.trim(),
        height_unit = profile.height_unit.trim(),
        goal = profile.goal.label(),
        goal_guidance = goal_guidance(profile.goal),
        budget = profile.budget,
        currency = profile.currency.trim(),
        period = profile.budget_period.label(),
        cooking_style = profile.cooking_style.token(),
        style_directive = style_directive(profile.cooking_style),
        cuisine = profile.cuisine.trim(),
        cuisine_rule = cuisine_rule,
        favorites = favorites,
        dislikes = dislikes,
    );

    if style == PromptStyle::Strict {
        out.push_str(
            "\n\nREMINDER: respond with exactly one JSON object and nothing else. \
             No ``` fences, no prose.",
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{BudgetPeriod, CookingStyle, Goal, Profile};
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn profile() -> Profile {
        Profile {
            weight: "70".into(),
            weight_unit: "kg".into(),
            height: "175".into(),
            height_unit: "cm".into(),
            goal: Goal::WeightLoss,
            budget: 50.0,
            currency: "GBP".into(),
            budget_period: BudgetPeriod::Week,
            cooking_style: CookingStyle::Quick,
            cuisine: "italian".into(),
            favorites: "chickpeas".into(),
            dislikes: "dairy".into(),
        }
    }

    fn factors() -> VarietyFactors {
        VarietyFactors {
            season: "winter",
            theme: "One-pot wonders",
            seed: 42,
        }
    }

    #[test]
    fn user_block_restates_mandatory_fields_verbatim() {
        let blocks = build(&profile(), &factors(), PromptStyle::Standard);
        assert!(blocks.user.contains("50 GBP per week"));
        assert!(blocks.user.contains("quick"));
        assert!(blocks.user.contains("italian"));
        assert!(blocks.user.contains("70% of meals MUST be italian"));
        assert!(blocks.user.contains("DO NOT EXCEED THIS AMOUNT"));
    }

    #[test]
    fn any_cuisine_omits_the_70_percent_rule() {
        let mut p = profile();
        p.cuisine = "any".into();
        let blocks = build(&p, &factors(), PromptStyle::Standard);
        assert!(!blocks.user.contains("70%"));
        assert!(blocks.user.contains("diverse global cuisines"));
    }

    #[test]
    fn system_block_embeds_the_json_contract() {
        let blocks = build(&profile(), &factors(), PromptStyle::Standard);
        assert!(blocks.system.contains("\"weeklySchedule\""));
        assert!(blocks.system.contains("\"monthlyBulk\""));
        assert!(blocks.system.contains("\"savingsTips\""));
        assert!(blocks.system.contains("ONLY valid JSON"));
    }

    #[test]
    fn terse_style_drops_knowledge_bases() {
        let terse = build(&profile(), &factors(), PromptStyle::Terse);
        let full = build(&profile(), &factors(), PromptStyle::Standard);
        assert!(!terse.system.contains("Maillard"));
        assert!(full.system.contains("Maillard"));
        assert!(terse.system.contains("STRICT USER PREFERENCE RULES"));
    }

    #[test]
    fn strict_style_demands_bare_json() {
        let blocks = build(&profile(), &factors(), PromptStyle::Strict);
        assert!(blocks.system.starts_with("STRICT MODE"));
        assert!(blocks.user.contains("exactly one JSON object"));
    }

    #[test]
    fn variety_factors_derive_season_from_month() {
        let mut rng = StdRng::seed_from_u64(7);
        let jan = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        let jul = Utc.with_ymd_and_hms(2025, 7, 15, 12, 0, 0).unwrap();
        assert_eq!(VarietyFactors::sample(jan, &mut rng).season, "spring");
        let f = VarietyFactors::sample(jul, &mut rng).season;
        assert_eq!(f, "autumn");
    }

    #[test]
    fn variety_seed_is_bounded() {
        let mut rng = StdRng::seed_from_u64(1);
        let now = Utc::now();
        for _ in 0..50 {
            let f = VarietyFactors::sample(now, &mut rng);
            assert!(f.seed < 1000);
            assert!(THEMES.contains(&f.theme));
        }
    }
}
