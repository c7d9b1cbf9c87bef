//! Built-in data set: the ARROW cast, its relationship vocabulary,
//! curated ground-truth relationships, and the default crawl sources.
//!
//! Everything here can be replaced through configuration.

use crate::{CuratedFact, RelationType};

/// Canonical name -> aliases (lowercase surface forms)
pub const DEFAULT_CAST: &[(&str, &[&str])] = &[
    (
        "Oliver Queen",
        &["oliver", "queen", "green arrow", "arrow", "oliver queen", "the arrow"],
    ),
    (
        "Felicity Smoak",
        &["felicity", "smoak", "felicity smoak", "overwatch"],
    ),
    ("John Diggle", &["diggle", "john diggle", "john", "dig"]),
    (
        "Laurel Lance",
        &["laurel", "lance", "laurel lance", "black canary"],
    ),
    ("Thea Queen", &["thea", "speedy", "thea queen"]),
    ("Sara Lance", &["sara", "canary", "white canary", "sara lance"]),
    ("Moira Queen", &["moira", "moira queen"]),
    (
        "Quentin Lance",
        &["quentin", "lance", "quentin lance", "detective lance"],
    ),
    ("Tommy Merlyn", &["tommy", "merlyn", "tommy merlyn"]),
    (
        "Malcolm Merlyn",
        &["malcolm", "merlyn", "dark archer", "malcolm merlyn"],
    ),
    (
        "Roy Harper",
        &["roy", "harper", "arsenal", "red arrow", "roy harper"],
    ),
    ("Slade Wilson", &["slade", "wilson", "deathstroke"]),
    ("Nyssa al Ghul", &["nyssa", "al ghul"]),
    ("Helena Bertinelli", &["helena", "huntress", "bertinelli"]),
    ("Ray Palmer", &["ray", "palmer", "atom", "ray palmer"]),
];

/// Relation type -> indicator phrases
pub const DEFAULT_LEXICON: &[(RelationType, &[&str])] = &[
    (
        RelationType::Romantic,
        &[
            "girlfriend",
            "boyfriend",
            "ex-girlfriend",
            "ex-boyfriend",
            "lover",
            "dating",
            "in love with",
            "relationship",
            "romance",
            "kiss",
            "love interest",
        ],
    ),
    (
        RelationType::Familial,
        &[
            "mother", "father", "sister", "brother", "daughter", "son", "parent", "sibling",
            "family", "mom", "dad",
        ],
    ),
    (
        RelationType::Friendship,
        &[
            "friend",
            "best friend",
            "ally",
            "partner",
            "team",
            "bond",
            "brotherly",
        ],
    ),
    (
        RelationType::Conflict,
        &[
            "enemy", "villain", "fight", "battle", "kill", "death", "betray", "traitor", "combat",
            "rival", "foe",
        ],
    ),
    (
        RelationType::Mentorship,
        &[
            "mentor",
            "protégé",
            "train",
            "taught",
            "student",
            "apprentice",
            "guide",
            "lead",
        ],
    ),
];

const DEFAULT_CURATED: &[(&str, &str, RelationType, &str)] = &[
    (
        "Oliver Queen",
        "Felicity Smoak",
        RelationType::Romantic,
        "Primary love interest, eventual wife",
    ),
    (
        "Oliver Queen",
        "Laurel Lance",
        RelationType::Romantic,
        "Ex-girlfriend, on/off love interest",
    ),
    (
        "Oliver Queen",
        "Sara Lance",
        RelationType::Romantic,
        "Former lover on the island",
    ),
    (
        "Oliver Queen",
        "Helena Bertinelli",
        RelationType::Romantic,
        "Ex-girlfriend, the Huntress",
    ),
    (
        "Thea Queen",
        "Roy Harper",
        RelationType::Romantic,
        "Long-term relationship",
    ),
    (
        "Oliver Queen",
        "Thea Queen",
        RelationType::Familial,
        "Half-siblings",
    ),
    (
        "Moira Queen",
        "Oliver Queen",
        RelationType::Familial,
        "Mother and son",
    ),
    (
        "Quentin Lance",
        "Laurel Lance",
        RelationType::Familial,
        "Father and daughter",
    ),
    (
        "Quentin Lance",
        "Sara Lance",
        RelationType::Familial,
        "Father and daughter",
    ),
    (
        "John Diggle",
        "Oliver Queen",
        RelationType::Friendship,
        "Best friend, partner, brother-in-arms",
    ),
    (
        "Oliver Queen",
        "Tommy Merlyn",
        RelationType::Friendship,
        "Best friend before the island",
    ),
    (
        "John Diggle",
        "Andy Diggle",
        RelationType::Familial,
        "Brothers, with complicated history",
    ),
    (
        "Oliver Queen",
        "Slade Wilson",
        RelationType::Conflict,
        "Former ally turned enemy, vengeance-driven",
    ),
    (
        "Oliver Queen",
        "Malcolm Merlyn",
        RelationType::Conflict,
        "Enemies, though later complicated by Thea",
    ),
    (
        "Nyssa al Ghul",
        "Sara Lance",
        RelationType::Romantic,
        "Former lovers, League of Assassins connection",
    ),
    (
        "Oliver Queen",
        "Roy Harper",
        RelationType::Mentorship,
        "Mentor and protégé",
    ),
];

/// Wiki pages and episode reviews crawled when no sources are given
pub const DEFAULT_SOURCES: &[&str] = &[
    "https://arrow.fandom.com/wiki/Oliver_Queen",
    "https://arrow.fandom.com/wiki/Felicity_Smoak",
    "https://arrow.fandom.com/wiki/Laurel_Lance",
    "https://arrow.fandom.com/wiki/John_Diggle",
    "https://www.starburstmagazine.com/reviews/tv-review-arrow-season-2-episode-17-birds-of-prey/",
    "https://www.starburstmagazine.com/reviews/tv-review-arrow-season-2-episode-2-identity/",
    "https://renownedforsound.com/tv-review-arrow-the-complete-second-season/",
    "https://www.joblo.com/tv-review-arrow-season-4-episode-7-brotherhood-100/",
];

/// The built-in curated fact list
pub fn default_curated_facts() -> Vec<CuratedFact> {
    DEFAULT_CURATED
        .iter()
        .map(|(a, b, relation, description)| CuratedFact::new(*a, *b, *relation, *description))
        .collect()
}
