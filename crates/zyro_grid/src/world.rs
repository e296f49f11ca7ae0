//! World settings: the flavor frame a match is narrated in.

use serde::{Deserialize, Serialize};

/// Theme descriptor for a match. Carries no game rules of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSetting {
    /// Display name; also the key the fallback phrase book matches on.
    pub name: String,
    /// Who side A and side B are in this world.
    pub description: String,
    /// Optional flavor rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<String>,
}

const CATALOG: [(&str, &str, &str); 7] = [
    (
        "Cyberpunk Dystopia",
        "A neon-soaked urban hellscape where megacorps rule and hackers are the new rockstars. Player A is a rogue AI, Player B is a human hacker.",
        "Technology rules the world, players compete for digital territories.",
    ),
    (
        "Post-Apocalyptic Wasteland",
        "Nuclear fallout has left the world a barren wasteland. Player A is a mutant warlord, Player B is the leader of the last human settlement.",
        "Resource scarcity drives conflict, survival is the ultimate goal.",
    ),
    (
        "Fantasy Kingdom",
        "A realm of magic and monsters. Player A is a dark sorcerer, Player B is a noble paladin. They battle for the soul of the kingdom.",
        "Magic is real, ancient prophecies guide destiny.",
    ),
    (
        "Space Opera",
        "The far future among the stars. Player A is an alien hive mind, Player B is the galactic federation's finest captain.",
        "Advanced technology, strange new worlds, and the vastness of space.",
    ),
    (
        "Underwater Civilization",
        "Beneath the waves, two factions fight for dominance. Player A leads the deep sea creatures, Player B commands the advanced human submarine fleet.",
        "Water pressure, oxygen limitations, and aquatic terrain affect all actions.",
    ),
    (
        "Microscopic Universe",
        "Inside a human body, a war rages. Player A is a virus, Player B is the immune system.",
        "Tiny scale, massive consequences, complex biological systems.",
    ),
    (
        "Corporate Office",
        "The most mundane and yet cutthroat battlefield: a corporate office. Player A is middle management, Player B is a new startup employee.",
        "Passive-aggressive emails, coffee theft, and the battle for the good chair.",
    ),
];

impl WorldSetting {
    /// Creates a world setting.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        rules: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            rules,
        }
    }

    /// The built-in worlds.
    pub fn catalog() -> Vec<WorldSetting> {
        CATALOG
            .iter()
            .map(|(name, description, rules)| {
                Self::new(*name, *description, Some((*rules).to_string()))
            })
            .collect()
    }

    /// Looks up a built-in world by exact name.
    pub fn named(name: &str) -> Option<WorldSetting> {
        Self::catalog().into_iter().find(|w| w.name == name)
    }

    /// World for a given day of the month.
    ///
    /// Rotates daily and stays stable within a day.
    pub fn for_day(day: u32) -> WorldSetting {
        let (name, description, rules) = CATALOG[day as usize % CATALOG.len()];
        Self::new(name, description, Some(rules.to_string()))
    }

    /// Whether this is one of the built-in worlds.
    pub fn is_builtin(&self) -> bool {
        CATALOG.iter().any(|(name, _, _)| *name == self.name)
    }
}
