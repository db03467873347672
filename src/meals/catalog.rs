use async_trait::async_trait;
use rand::seq::SliceRandom;
use tracing::debug;

use super::{
    dto::Meal,
    services::{MealSuggester, MealSuggestion, Slot},
};

struct CatalogEntry {
    name: &'static str,
    desc: &'static str,
    cals: f64,
    p: f64,
    f: f64,
    c: f64,
    icon: &'static str,
    color: &'static str,
}

impl CatalogEntry {
    fn to_meal(&self) -> Meal {
        Meal {
            name: self.name.to_string(),
            description: self.desc.to_string(),
            calories: self.cals,
            protein: self.p,
            fat: self.f,
            carbs: self.c,
            icon: self.icon.to_string(),
            color: self.color.to_string(),
        }
    }
}

const BREAKFAST: &[CatalogEntry] = &[
    CatalogEntry {
        name: "Вівсянка з ягодами",
        desc: "Вівсяні пластівці, молоко, чорниця, мед",
        cals: 350.0, p: 12.0, f: 8.0, c: 55.0,
        icon: "🥣", color: "#FFF3E0",
    },
    CatalogEntry {
        name: "Омлет з овочами",
        desc: "Яйця, шпинат, помідори, сир",
        cals: 320.0, p: 22.0, f: 20.0, c: 8.0,
        icon: "🍳", color: "#FFFDE7",
    },
    CatalogEntry {
        name: "Сирники зі сметаною",
        desc: "Кисломолочний сир, яйце, борошно, сметана",
        cals: 410.0, p: 26.0, f: 16.0, c: 38.0,
        icon: "🥞", color: "#FCE4EC",
    },
    CatalogEntry {
        name: "Тост з авокадо",
        desc: "Цільнозерновий хліб, авокадо, яйце пашот",
        cals: 380.0, p: 14.0, f: 22.0, c: 30.0,
        icon: "🥑", color: "#E8F5E9",
    },
    CatalogEntry {
        name: "Грецький йогурт з гранолою",
        desc: "Йогурт, гранола, банан, горіхи",
        cals: 340.0, p: 18.0, f: 11.0, c: 42.0,
        icon: "🍌", color: "#FFF8E1",
    },
];

const LUNCH: &[CatalogEntry] = &[
    CatalogEntry {
        name: "Борщ з пампушками",
        desc: "Буряк, капуста, картопля, яловичина, часникові пампушки",
        cals: 520.0, p: 24.0, f: 18.0, c: 62.0,
        icon: "🍲", color: "#FFEBEE",
    },
    CatalogEntry {
        name: "Курка з гречкою",
        desc: "Куряче філе, гречка, огірок",
        cals: 480.0, p: 40.0, f: 10.0, c: 52.0,
        icon: "🍗", color: "#FFF3E0",
    },
    CatalogEntry {
        name: "Салат Цезар",
        desc: "Ромен, курка, пармезан, сухарики, соус",
        cals: 430.0, p: 30.0, f: 24.0, c: 20.0,
        icon: "🥗", color: "#F1F8E9",
    },
    CatalogEntry {
        name: "Паста з тунцем",
        desc: "Спагеті, тунець, томати чері, оливкова олія",
        cals: 560.0, p: 32.0, f: 16.0, c: 70.0,
        icon: "🍝", color: "#FFFDE7",
    },
    CatalogEntry {
        name: "Вареники з картоплею",
        desc: "Тісто, картопля, цибуля, сметана",
        cals: 500.0, p: 14.0, f: 15.0, c: 78.0,
        icon: "🥟", color: "#EDE7F6",
    },
];

const DINNER: &[CatalogEntry] = &[
    CatalogEntry {
        name: "Запечений лосось з овочами",
        desc: "Лосось, броколі, морква, лимон",
        cals: 450.0, p: 35.0, f: 26.0, c: 14.0,
        icon: "🐟", color: "#E3F2FD",
    },
    CatalogEntry {
        name: "Індичка з кіноа",
        desc: "Філе індички, кіноа, болгарський перець",
        cals: 420.0, p: 38.0, f: 9.0, c: 44.0,
        icon: "🦃", color: "#FBE9E7",
    },
    CatalogEntry {
        name: "Овочеве рагу",
        desc: "Кабачок, баклажан, нут, томати",
        cals: 330.0, p: 13.0, f: 10.0, c: 46.0,
        icon: "🍆", color: "#F3E5F5",
    },
    CatalogEntry {
        name: "Голубці",
        desc: "Капуста, фарш, рис, томатний соус",
        cals: 470.0, p: 26.0, f: 20.0, c: 42.0,
        icon: "🥬", color: "#E8F5E9",
    },
    CatalogEntry {
        name: "Сир з зеленню",
        desc: "Кисломолочний сир, кріп, огірок, житній хліб",
        cals: 300.0, p: 28.0, f: 9.0, c: 24.0,
        icon: "🧀", color: "#FFFDE7",
    },
];

/// Fixed table of meals per slot with uniform random pick.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalog;

impl StaticCatalog {
    fn entries(slot: Slot) -> &'static [CatalogEntry] {
        match slot {
            Slot::Breakfast => BREAKFAST,
            Slot::Lunch => LUNCH,
            Slot::Dinner => DINNER,
        }
    }

    /// Every meal the catalog may return for `slot`.
    #[cfg(test)]
    pub fn candidates(slot: Slot) -> Vec<Meal> {
        Self::entries(slot).iter().map(CatalogEntry::to_meal).collect()
    }

    pub fn pick(slot: Slot) -> Meal {
        Self::entries(slot)
            .choose(&mut rand::thread_rng())
            .map(CatalogEntry::to_meal)
            .expect("every catalog slot has entries")
    }
}

#[async_trait]
impl MealSuggester for StaticCatalog {
    async fn suggest(&self, slot: &str) -> MealSuggestion {
        let Ok(slot) = slot.parse::<Slot>() else {
            return MealSuggestion::UnknownSlot;
        };
        let meal = Self::pick(slot);
        debug!(%slot, meal = %meal.name, "catalog meal picked");
        MealSuggestion::Meal(meal)
    }
}
