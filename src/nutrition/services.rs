use super::dto::{Gender, Goal, MacroResult, Macros, UserParams};

const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const GOAL_DELTA_KCAL: f64 = 300.0;

/// Calorie share per macro. Each row sums to 1.0.
struct MacroRatio {
    protein: f64,
    fat: f64,
    carbs: f64,
}

/// Mifflin-St Jeor basal metabolic rate, unrounded.
pub fn basal_metabolic_rate(p: &UserParams) -> f64 {
    let base = 10.0 * p.weight + 6.25 * p.height - 5.0 * p.age as f64;
    match p.gender {
        Gender::Male => base + 5.0,
        Gender::Other => base - 161.0,
    }
}

fn goal_plan(goal: Goal, tdee: f64) -> (f64, MacroRatio) {
    match goal {
        Goal::Lose => (
            tdee - GOAL_DELTA_KCAL,
            MacroRatio { protein: 0.35, fat: 0.30, carbs: 0.35 },
        ),
        Goal::Gain => (
            tdee + GOAL_DELTA_KCAL,
            MacroRatio { protein: 0.30, fat: 0.25, carbs: 0.45 },
        ),
        Goal::Maintain => (tdee, MacroRatio { protein: 0.30, fat: 0.30, carbs: 0.40 }),
    }
}

/// Truncates toward zero; non-finite input saturates instead of failing.
fn trunc(v: f64) -> i64 {
    v as i64
}

/// Pure and total: no input is rejected, odd inputs give odd numbers.
pub fn compute(p: &UserParams) -> MacroResult {
    let bmr = basal_metabolic_rate(p);
    let tdee = bmr * p.activity;
    let (target, ratio) = goal_plan(p.goal, tdee);

    MacroResult {
        bmr: trunc(bmr),
        calories: trunc(target),
        macros: Macros {
            protein: trunc((target * ratio.protein) / KCAL_PER_G_PROTEIN),
            fat: trunc((target * ratio.fat) / KCAL_PER_G_FAT),
            carbs: trunc((target * ratio.carbs) / KCAL_PER_G_CARBS),
        },
    }
}
