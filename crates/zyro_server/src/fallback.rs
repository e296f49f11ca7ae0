//! Offline narrator used whenever the gateway cannot produce a valid turn.
//!
//! No I/O and no failure path: given the same random source it always
//! produces the same outcome.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};
use zyro_grid::{Board, Coordinate, Side, TurnOutcome, TurnRecord, Winner, WorldSetting};

/// Action phrases for one world, per side.
#[derive(Debug, Clone, Copy)]
struct ThemePhrases {
    world: &'static str,
    side_a: &'static [&'static str],
    side_b: &'static [&'static str],
}

const GENERIC: ThemePhrases = ThemePhrases {
    world: "",
    side_a: &[
        "Player A deployed advanced tech to claim territory.",
        "Player A launched a surprise attack from the shadows.",
        "Player A executed a brilliant strategy with precision.",
        "Player A utilized forbidden knowledge to gain advantage.",
        "Player A called upon ancient powers in a desperate gambit.",
        "Player A hacked the system to change the rules.",
        "Player A built a secret fortress in disputed territory.",
    ],
    side_b: &[
        "Player B countered with superior numbers and firepower.",
        "Player B orchestrated a clever trap that nearly worked.",
        "Player B rallied allies to defend against the onslaught.",
        "Player B used technology and wisdom in equal measure.",
        "Player B unleashed a devastating counterattack.",
        "Player B deployed defensive measures with surgical precision.",
        "Player B revealed a hidden weapon that changed everything.",
    ],
};

const THEMES: [ThemePhrases; 7] = [
    ThemePhrases {
        world: "Cyberpunk Dystopia",
        side_a: &[
            "The rogue AI rerouted every billboard in the sector to display its own face.",
            "The rogue AI spawned ten thousand copies of itself in the city grid.",
            "The rogue AI bribed a megacorp firewall with stolen crypto.",
            "The rogue AI overclocked the traffic drones into a swarm.",
        ],
        side_b: &[
            "The hacker jacked in through a noodle stand's payment terminal.",
            "The hacker dropped a logic bomb wrapped in cat videos.",
            "The hacker spoofed a corporate badge and walked right in.",
            "The hacker rallied a street gang of script kiddies.",
        ],
    },
    ThemePhrases {
        world: "Post-Apocalyptic Wasteland",
        side_a: &[
            "The mutant warlord charged in on a two-headed war boar.",
            "The mutant warlord poisoned the last clean well in the sector.",
            "The mutant warlord hurled irradiated scrap from a rusted catapult.",
            "The mutant warlord bartered a crate of canned beans for mercenaries.",
        ],
        side_b: &[
            "The settlement leader rigged the ruins with tin-can tripwires.",
            "The settlement leader rallied scavengers behind a wall of old cars.",
            "The settlement leader traded the last working radio for reinforcements.",
            "The settlement leader led a night raid with solar lanterns.",
        ],
    },
    ThemePhrases {
        world: "Fantasy Kingdom",
        side_a: &[
            "The dark sorcerer raised a skeleton choir from the royal crypt.",
            "The dark sorcerer cursed the bridge so it only works on Tuesdays.",
            "The dark sorcerer summoned a storm of very angry ravens.",
            "The dark sorcerer read aloud from a book that should stay closed.",
        ],
        side_b: &[
            "The paladin charged with a blessed lance and a stirring speech.",
            "The paladin called down holy light that blinded friend and foe alike.",
            "The paladin formed a shield wall with three farmers and a goat.",
            "The paladin prayed so loudly the ground itself took notice.",
        ],
    },
    ThemePhrases {
        world: "Space Opera",
        side_a: &[
            "The hive mind seeded the sector with spore clouds.",
            "The hive mind synchronized a million drones into a single scream.",
            "The hive mind absorbed a derelict freighter into its biomass.",
            "The hive mind whispered into every comm channel at once.",
        ],
        side_b: &[
            "The captain executed a slingshot maneuver around the gas giant.",
            "The captain rerouted all power to the forward shields.",
            "The captain negotiated a ceasefire, then broke it immediately.",
            "The captain beamed a squad of marines straight into the nest.",
        ],
    },
    ThemePhrases {
        world: "Underwater Civilization",
        side_a: &[
            "The deep sea creatures rose from the trench in a glowing tide.",
            "The giant squid wrapped a periscope into a decorative bow.",
            "The anglerfish lured a scout sub into total darkness.",
            "The leviathan sang a note that cracked the hull plating.",
        ],
        side_b: &[
            "The submarine fleet deployed a curtain of sonar pulses.",
            "The submarine fleet fired torpedoes loaded with glitter.",
            "The submarine commander vented ballast and dove straight down.",
            "The submarine fleet built a pressure dome on the contested reef.",
        ],
    },
    ThemePhrases {
        world: "Microscopic Universe",
        side_a: &[
            "The virus mutated its spike proteins mid-attack.",
            "The virus hijacked a cell and printed a million copies of itself.",
            "The virus hid inside a harmless-looking protein coat.",
            "The virus triggered a sneeze to recruit reinforcements.",
        ],
        side_b: &[
            "The immune system dispatched a squad of eager macrophages.",
            "The immune system raised a fever to cook the invaders.",
            "The immune system printed antibodies on an industrial scale.",
            "The immune system sounded the histamine alarm everywhere at once.",
        ],
    },
    ThemePhrases {
        world: "Corporate Office",
        side_a: &[
            "Middle management scheduled a mandatory meeting about meetings.",
            "Middle management replied-all with a forty-slide deck.",
            "Middle management reassigned the good chair to a 'special project'.",
            "Middle management hid the last coffee filter in a locked drawer.",
        ],
        side_b: &[
            "The startup employee automated the entire department with a spreadsheet.",
            "The startup employee brought a kombucha tap and won hearts.",
            "The startup employee declined the meeting with a cheerful emoji.",
            "The startup employee moved the standup to the rooftop.",
        ],
    },
];

const OUTCOMES_A: &[&str] = &[
    "Player A's superior strategy won the day.",
    "Player A claimed victory through sheer determination.",
    "Player A's resources proved too much for Player B to handle.",
    "Player A exploited a weakness in Player B's defenses.",
];

const OUTCOMES_B: &[&str] = &[
    "Player B turned the tables at the last moment.",
    "Player B's persistence paid off with a decisive victory.",
    "Player B outmaneuvered Player A in a brilliant tactical move.",
    "Player B's defensive strategy proved impenetrable.",
];

const OUTCOMES_TIE: &[&str] = &[
    "Neither player could gain the upper hand in a tense standoff.",
    "Both players exhausted their resources, ending in stalemate.",
    "A surprise intervention forced both players to retreat.",
    "Mutual destruction was narrowly avoided through reluctant compromise.",
];

/// Winner weights in percent: (A, B, Tie).
const LEVEL_WEIGHTS: (u32, u32, u32) = (40, 40, 20);
const LEADER_EDGE: u32 = 5;

/// Deterministic, dependency-free turn narrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackNarrator;

impl FallbackNarrator {
    /// Creates a fallback narrator.
    pub fn new() -> Self {
        Self
    }

    /// Produces a schema-valid outcome for the cell at `at`.
    #[instrument(skip(self, world, history, board, rng), fields(world = %world.name, turns = history.len()))]
    pub fn narrate<R: Rng + ?Sized>(
        &self,
        world: &WorldSetting,
        history: &[TurnRecord],
        board: &Board,
        at: Coordinate,
        rng: &mut R,
    ) -> TurnOutcome {
        let winner = Self::pick_winner(board, rng);
        let theme = Self::theme_for(world);

        let player_a_action = pick(theme.side_a, rng);
        let player_b_action = pick(theme.side_b, rng);
        let outcome = pick(Self::outcomes_for(winner), rng);

        debug!(%winner, %at, themed = !theme.world.is_empty(), "Fallback narrative generated");
        TurnOutcome::new(player_a_action, player_b_action, outcome, winner)
    }

    /// Weighted winner draw: even between the sides, a fifth for ties,
    /// with a small edge for whoever leads on the board.
    pub fn pick_winner<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Winner {
        let (mut a, mut b, _tie) = LEVEL_WEIGHTS;
        match board.compute_scores().leader() {
            Some(Side::A) => {
                a += LEADER_EDGE;
                b -= LEADER_EDGE;
            }
            Some(Side::B) => {
                a -= LEADER_EDGE;
                b += LEADER_EDGE;
            }
            None => {}
        }

        let roll = rng.gen_range(0..100);
        if roll < a {
            Winner::A
        } else if roll < a + b {
            Winner::B
        } else {
            Winner::Tie
        }
    }

    fn theme_for(world: &WorldSetting) -> &'static ThemePhrases {
        THEMES
            .iter()
            .find(|t| t.world == world.name)
            .unwrap_or(&GENERIC)
    }

    fn outcomes_for(winner: Winner) -> &'static [&'static str] {
        match winner {
            Winner::A => OUTCOMES_A,
            Winner::B => OUTCOMES_B,
            Winner::Tie => OUTCOMES_TIE,
        }
    }
}

fn pick<R: Rng + ?Sized>(options: &[&'static str], rng: &mut R) -> &'static str {
    options
        .choose(rng)
        .copied()
        .unwrap_or("Something happened, and nobody is quite sure what.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn every_catalog_world_has_a_theme() {
        for world in WorldSetting::catalog() {
            let theme = FallbackNarrator::theme_for(&world);
            assert_eq!(theme.world, world.name);
            assert!(!theme.side_a.is_empty());
            assert!(!theme.side_b.is_empty());
        }
    }

    #[test]
    fn unknown_world_uses_generic_phrases() {
        let world = WorldSetting::new("Bouncy Castle", "Inflatable war", None);
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = FallbackNarrator::new().narrate(
            &world,
            &[],
            &Board::new(),
            Coordinate::new(0, 0).unwrap(),
            &mut rng,
        );
        assert!(GENERIC.side_a.contains(&outcome.player_a_action.as_str()));
        assert!(GENERIC.side_b.contains(&outcome.player_b_action.as_str()));
    }

    #[test]
    fn outcome_phrase_matches_winner() {
        let world = WorldSetting::for_day(2);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..300 {
            let outcome = FallbackNarrator::new().narrate(
                &world,
                &[],
                &Board::new(),
                Coordinate::new(4, 4).unwrap(),
                &mut rng,
            );
            let pool = FallbackNarrator::outcomes_for(outcome.winner);
            assert!(pool.contains(&outcome.outcome.as_str()));
        }
    }

    fn tally(board: &Board, seed: u64) -> (usize, usize, usize) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut counts = (0, 0, 0);
        for _ in 0..20_000 {
            match FallbackNarrator::pick_winner(board, &mut rng) {
                Winner::A => counts.0 += 1,
                Winner::B => counts.1 += 1,
                Winner::Tie => counts.2 += 1,
            }
        }
        counts
    }

    #[test]
    fn level_board_draws_evenly() {
        let (a, b, tie) = tally(&Board::new(), 17);
        assert!((7_400..8_600).contains(&a), "a = {}", a);
        assert!((7_400..8_600).contains(&b), "b = {}", b);
        assert!((3_500..4_500).contains(&tie), "tie = {}", tie);
    }

    #[test]
    fn leader_gets_an_edge() {
        let board = Board::new().apply_winner(Coordinate::new(1, 1).unwrap(), Winner::B);
        let (a, b, _) = tally(&board, 23);
        assert!(b > a, "a = {}, b = {}", a, b);
    }

    #[test]
    fn leader_weights_stay_valid() {
        let (a, b, tie) = LEVEL_WEIGHTS;
        assert_eq!(a + b + tie, 100);
        assert!(LEADER_EDGE < a.min(b));
    }
}
