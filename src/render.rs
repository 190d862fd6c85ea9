use colored::Colorize;

use crate::model::MEAL_SLOTS;
use crate::pipeline::GeneratedPlan;

/// Terminal renderer for the `generate` subcommand. Pure presentation over
/// an already-validated plan; missing slots show as "-".

pub fn print_plan(generated: &GeneratedPlan) {
    let plan = &generated.plan;

    println!(
        "\nseason: {}   theme: {}   seed: {}",
        generated.factors.season, generated.factors.theme, generated.factors.seed
    );

    if let Some(strategy) = &plan.strategy {
        println!("\n{}", strategy.title.bold());
        if !strategy.description.is_empty() {
            println!("{}", strategy.description);
        }
        if !strategy.key_nutrients.is_empty() {
            println!("key nutrients: {}", strategy.key_nutrients.join(", "));
        }
    }

    println!("\n{}", "=== WEEKLY SCHEDULE ===".bold());
    for (day, meals) in plan.weekly_schedule.days() {
        println!("{}", day.cyan().bold());
        for slot in MEAL_SLOTS {
            println!("  {:<10} {}", slot, meals.slot(slot));
        }
    }

    if !plan.recipes.is_empty() {
        println!("\n{}", "=== RECIPES ===".bold());
        for (i, recipe) in plan.recipes.iter().enumerate() {
            let mut meta = Vec::new();
            if let Some(c) = &recipe.cuisine {
                meta.push(c.clone());
            }
            if let Some(t) = &recipe.prep_time {
                meta.push(format!("prep {t}"));
            }
            if let Some(t) = &recipe.cook_time {
                meta.push(format!("cook {t}"));
            }
            if let Some(c) = &recipe.calories {
                meta.push(c.clone());
            }
            println!("{}. {}  ({})", i + 1, recipe.name.bold(), meta.join(", "));
        }
    }

    println!("\n{}", "=== SHOPPING LIST ===".bold());
    for (tier, categories) in plan.shopping_list.tiers() {
        println!("{}", tier.green().bold());
        for (category, items) in categories {
            println!("  {category}:");
            for item in items {
                println!("    {:<40} {:>8.2}", item.item, item.price);
            }
        }
    }
    println!("  {:<42} {:>8.2}", "total".bold(), plan.shopping_list.total());

    let fb = &plan.financial_breakdown;
    println!("\n{}", "=== BUDGET ===".bold());
    if let Some(v) = &fb.weekly_total {
        println!("  weekly total:  {v}");
    }
    if let Some(v) = &fb.monthly_total {
        println!("  monthly total: {v}");
    }
    if let Some(v) = &fb.per_meal {
        println!("  per meal:      {v}");
    }
    if let Some(v) = &fb.budget_status {
        println!("  status:        {v}");
    }
    for tip in &fb.savings_tips {
        println!("  tip: {tip}");
    }

    if let Some(guide) = &plan.meal_prep_guide {
        println!("\n{}", "=== MEAL PREP ===".bold());
        for tip in &guide.sunday {
            println!("  sunday: {tip}");
        }
        for tip in &guide.weeknight {
            println!("  weeknight: {tip}");
        }
    }

    if let Some(message) = &plan.encouragement {
        println!("\n{}", message.italic());
    }

    if !generated.warnings.is_empty() {
        println!("\n{}", "=== WARNINGS ===".yellow().bold());
        for w in &generated.warnings {
            println!("  {}", w.yellow());
        }
    }
    println!();
}
