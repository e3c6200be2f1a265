//! Human-readable game keys.

use rand::Rng;
use tracing::instrument;

/// Words that game keys are drawn from.
pub const KEY_WORDS: &[&str] = &[
    "amber", "anchor", "apple", "arrow", "aspen", "autumn", "badger", "bamboo", "banjo", "barley",
    "beacon", "berry", "birch", "blossom", "breeze", "brook", "cactus", "canyon", "carrot",
    "cedar", "cherry", "cinder", "clover", "cobalt", "comet", "copper", "coral", "cotton",
    "crane", "cricket", "crystal", "daisy", "delta", "desert", "dolphin", "dragon", "drum",
    "eagle", "ember", "falcon", "feather", "fern", "fig", "flint", "forest", "fox", "galaxy",
    "garnet", "ginger", "glacier", "granite", "harbor", "hazel", "heron", "honey", "indigo",
    "island", "ivory", "jade", "jasmine", "juniper", "kettle", "kiwi", "lagoon", "lantern",
    "lemon", "lilac", "lotus", "lunar", "maple", "marble", "meadow", "mango", "meteor", "mint",
    "moss", "nectar", "nutmeg", "oak", "ocean", "olive", "onyx", "orchid", "otter", "panda",
    "pebble", "pepper", "pine", "planet", "plum", "poppy", "prairie", "quartz", "quill",
    "raven", "reef", "river", "robin", "saffron", "sage", "salmon", "sapphire", "shadow",
    "silver", "sparrow", "spruce", "storm", "summit", "sunset", "thistle", "thunder", "tiger",
    "tulip", "tundra", "umber", "valley", "velvet", "violet", "walnut", "willow", "winter",
    "yarrow", "zephyr",
];

/// Generates a key of `words` random words joined by `-`.
#[instrument]
pub fn generate_key(words: usize) -> String {
    let mut rng = rand::rng();
    (0..words)
        .map(|_| KEY_WORDS[rng.random_range(0..KEY_WORDS.len())])
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_counts() {
        for _ in 0..100 {
            assert_eq!(generate_key(1).split('-').count(), 1);
            assert_eq!(generate_key(2).split('-').count(), 2);
            assert_eq!(generate_key(3).split('-').count(), 3);
        }
    }

    #[test]
    fn test_words_come_from_list() {
        let key = generate_key(3);
        assert!(key.split('-').all(|w| KEY_WORDS.contains(&w)));
    }

    #[test]
    fn test_words_are_url_safe() {
        assert!(
            KEY_WORDS
                .iter()
                .all(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_lowercase()))
        );
    }
}
