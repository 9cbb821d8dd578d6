use rand::seq::SliceRandom;

pub const COOKING_TIPS: &[&str] = &[
    "Use fresh herbs for better flavor",
    "Preheat the pan before cooking",
    "Clean as you go",
    "Taste while cooking",
    "Balance sweet and salty",
];

pub const NEXT_UP_RECIPES: &[&str] = &[
    "Spaghetti Bolognese",
    "Salmon Avocado Salad",
    "Wontons",
    "Beaver Tails",
    "Kumpir",
    "Summer Pudding",
    "Minced Beef Pie",
    "Apple Frangipan Tart",
    "Mince Pies",
    "Jerk Chicken with rice & peas",
    "Ratatouille",
    "Chicken Quinoa Greek Salad",
];

pub fn random_tip() -> &'static str {
    pick(COOKING_TIPS)
}

/// Dish to suggest once the current countdown is done.
pub fn suggest_next_recipe() -> &'static str {
    pick(NEXT_UP_RECIPES)
}

fn pick(from: &[&'static str]) -> &'static str {
    from.choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or_default()
}
