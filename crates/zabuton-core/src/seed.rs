//! mnemonic seeds and the backup verification quiz

use std::collections::HashMap;

use bip39::{Language, Mnemonic};
use rand::seq::{index, SliceRandom};
use rand::Rng;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{Error, Result};

/// words per generated seed
pub const SEED_WORD_COUNT: usize = 24;

/// candidates offered per seed position (correct word + distractors)
pub const CANDIDATES_PER_WORD: usize = 4;

/// canonical wordlist seeds are drawn from
pub fn wordlist() -> &'static [&'static str] {
    Language::English.word_list()
}

/// fresh 24-word seed
pub fn generate_seed() -> Result<SeedPhrase> {
    SeedPhrase::generate()
}

/// true if `phrase` is a checksummed mnemonic over the wordlist
pub fn validate_seed(phrase: &str) -> bool {
    SeedPhrase::parse(phrase).is_ok()
}

/// secure seed phrase holder (zeroized on drop)
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SeedPhrase {
    words: String,
}

impl SeedPhrase {
    /// generate a new 24-word seed
    pub fn generate() -> Result<Self> {
        let mnemonic = Mnemonic::generate(SEED_WORD_COUNT)
            .map_err(|e| Error::InvalidSeed(e.to_string()))?;
        Ok(Self { words: mnemonic.to_string() })
    }

    /// parse and validate an existing phrase, whitespace is normalised
    pub fn parse(phrase: &str) -> Result<Self> {
        let normalised = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
        Mnemonic::parse_in(Language::English, &normalised)
            .map_err(|e| Error::InvalidSeed(e.to_string()))?;
        Ok(Self { words: normalised })
    }

    pub fn as_str(&self) -> &str {
        &self.words
    }

    pub fn words(&self) -> Vec<&str> {
        self.words.split_whitespace().collect()
    }

    /// 64-byte seed for key derivation
    pub fn to_seed(&self) -> Result<[u8; 64]> {
        let mnemonic = Mnemonic::parse_in(Language::English, &self.words)
            .map_err(|e| Error::InvalidSeed(e.to_string()))?;
        Ok(mnemonic.to_seed(""))
    }
}

impl std::fmt::Debug for SeedPhrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SeedPhrase({} words)", self.words().len())
    }
}

/// candidate words for one seed position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    words: Vec<String>,
    selected: Option<usize>,
}

impl CandidateSet {
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_word(&self) -> Option<&str> {
        self.selected.map(|i| self.words[i].as_str())
    }
}

/// multiple choice quiz over every word of a seed
///
/// each position gets the correct word plus distractors drawn without
/// replacement from the rest of the wordlist, in random order. the random
/// source is supplied by the caller so tests can pin it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedQuiz {
    sets: Vec<CandidateSet>,
}

impl SeedQuiz {
    pub fn generate<R: Rng + ?Sized>(seed_words: &[&str], wordlist: &[&str], rng: &mut R) -> Result<Self> {
        // keep first occurrences
        let mut distinct: Vec<&str> = Vec::with_capacity(wordlist.len());
        let mut positions: HashMap<&str, usize> = HashMap::with_capacity(wordlist.len());
        for word in wordlist {
            positions.entry(*word).or_insert_with(|| {
                distinct.push(*word);
                distinct.len() - 1
            });
        }
        if distinct.len() < CANDIDATES_PER_WORD {
            return Err(Error::WordlistTooSmall {
                have: distinct.len(),
                need: CANDIDATES_PER_WORD,
            });
        }

        let mut sets = Vec::with_capacity(seed_words.len());
        for (position, word) in seed_words.iter().enumerate() {
            let correct = *positions.get(word).ok_or_else(|| Error::WordNotInWordlist {
                position,
                word: word.to_string(),
            })?;
            sets.push(candidates_for(&distinct, correct, rng));
        }

        Ok(Self { sets })
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn sets(&self) -> &[CandidateSet] {
        &self.sets
    }

    /// record the user's pick at `position`, replacing any earlier pick
    pub fn select(&mut self, position: usize, candidate: usize) -> bool {
        match self.sets.get_mut(position) {
            Some(set) if candidate < set.words.len() => {
                set.selected = Some(candidate);
                true
            }
            _ => false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.sets.iter().all(|s| s.selected.is_some())
    }

    /// picked words joined by single spaces, in position order
    pub fn selected_phrase(&self) -> String {
        self.sets
            .iter()
            .filter_map(|s| s.selected_word())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn candidates_for<R: Rng + ?Sized>(distinct: &[&str], correct: usize, rng: &mut R) -> CandidateSet {
    let mut words = Vec::with_capacity(CANDIDATES_PER_WORD);
    words.push(distinct[correct].to_string());

    // sample over every index but `correct`, then shift past it
    for pick in index::sample(rng, distinct.len() - 1, CANDIDATES_PER_WORD - 1).into_iter() {
        let i = if pick >= correct { pick + 1 } else { pick };
        words.push(distinct[i].to_string());
    }

    words.shuffle(rng);
    CandidateSet { words, selected: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SMALL: [&str; 5] = ["alpha", "bravo", "charlie", "delta", "echo"];

    #[test]
    fn test_small_wordlist_example() {
        let mut rng = StdRng::seed_from_u64(1);
        let quiz = SeedQuiz::generate(&["alpha", "bravo", "charlie"], &SMALL, &mut rng).unwrap();

        assert_eq!(quiz.len(), 3);
        for (set, expected) in quiz.sets().iter().zip(["alpha", "bravo", "charlie"]) {
            assert_eq!(set.words().len(), CANDIDATES_PER_WORD);
            assert_eq!(set.words().iter().filter(|w| *w == expected).count(), 1);
            assert!(set.selected().is_none());
        }
    }

    #[test]
    fn test_wordlist_too_small() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = SeedQuiz::generate(&["a"], &["a", "b", "c"], &mut rng).unwrap_err();
        assert!(matches!(err, Error::WordlistTooSmall { have: 3, need: 4 }));

        // duplicates do not count towards the pool
        let err = SeedQuiz::generate(&["a"], &["a", "b", "c", "c"], &mut rng).unwrap_err();
        assert!(matches!(err, Error::WordlistTooSmall { have: 3, .. }));
    }

    #[test]
    fn test_duplicate_words_never_repeat_in_a_set() {
        let list = ["a", "b", "a", "c", "b", "d", "d"];
        for rng_seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(rng_seed);
            let quiz = SeedQuiz::generate(&["a", "d"], &list, &mut rng).unwrap();
            for (set, expected) in quiz.sets().iter().zip(["a", "d"]) {
                let mut words = set.words().to_vec();
                words.sort();
                assert_eq!(words, ["a", "b", "c", "d"]);
                assert_eq!(set.words().iter().filter(|w| *w == expected).count(), 1);
            }
        }
    }

    #[test]
    fn test_unknown_word_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = SeedQuiz::generate(&["alpha", "zulu"], &SMALL, &mut rng).unwrap_err();
        match err {
            Error::WordNotInWordlist { position, word } => {
                assert_eq!(position, 1);
                assert_eq!(word, "zulu");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_completion_and_reselect() {
        let mut rng = StdRng::seed_from_u64(9);
        let seed = ["charlie", "alpha"];
        let mut quiz = SeedQuiz::generate(&seed, &SMALL, &mut rng).unwrap();
        assert!(!quiz.is_complete());

        let wrong = quiz.sets()[0].words().iter().position(|w| w != "charlie").unwrap();
        assert!(quiz.select(0, wrong));
        assert!(!quiz.is_complete());

        let right = quiz.sets()[0].words().iter().position(|w| w == "charlie").unwrap();
        assert!(quiz.select(0, right));
        assert_eq!(quiz.sets()[0].selected(), Some(right));

        let right = quiz.sets()[1].words().iter().position(|w| w == "alpha").unwrap();
        quiz.select(1, right);
        assert!(quiz.is_complete());
        assert_eq!(quiz.selected_phrase(), "charlie alpha");
    }

    #[test]
    fn test_select_out_of_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut quiz = SeedQuiz::generate(&["alpha"], &SMALL, &mut rng).unwrap();
        assert!(!quiz.select(1, 0));
        assert!(!quiz.select(0, CANDIDATES_PER_WORD));
        assert!(!quiz.is_complete());
    }

    #[test]
    fn test_generated_seed_parses() {
        let seed = SeedPhrase::generate().unwrap();
        assert_eq!(seed.words().len(), SEED_WORD_COUNT);
        let parsed = SeedPhrase::parse(&format!("  {}  ", seed.as_str())).unwrap();
        assert_eq!(parsed.as_str(), seed.as_str());
        assert_eq!(parsed.to_seed().unwrap(), seed.to_seed().unwrap());
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let words = vec!["abandon"; 24].join(" ");
        assert!(matches!(SeedPhrase::parse(&words), Err(Error::InvalidSeed(_))));
        assert!(!validate_seed(&words));
        assert!(validate_seed(generate_seed().unwrap().as_str()));
    }

    proptest! {
        #[test]
        fn prop_candidate_sets_are_well_formed(rng_seed in any::<u64>(), picks in prop::collection::vec(0usize..2048, 1..33)) {
            let list = wordlist();
            let seed_words: Vec<&str> = picks.iter().map(|i| list[*i]).collect();
            let mut rng = StdRng::seed_from_u64(rng_seed);
            let quiz = SeedQuiz::generate(&seed_words, list, &mut rng).unwrap();

            prop_assert_eq!(quiz.len(), seed_words.len());
            for (set, word) in quiz.sets().iter().zip(&seed_words) {
                prop_assert_eq!(set.words().len(), CANDIDATES_PER_WORD);
                prop_assert_eq!(set.words().iter().filter(|w| w == word).count(), 1);
                let mut dedup = set.words().to_vec();
                dedup.sort();
                dedup.dedup();
                prop_assert_eq!(dedup.len(), CANDIDATES_PER_WORD);
                for w in set.words() {
                    prop_assert!(list.contains(&w.as_str()));
                }
            }
        }

        #[test]
        fn prop_correct_picks_rebuild_phrase(rng_seed in any::<u64>(), picks in prop::collection::vec(0usize..2048, 1..25)) {
            let list = wordlist();
            let seed_words: Vec<&str> = picks.iter().map(|i| list[*i]).collect();
            let mut rng = StdRng::seed_from_u64(rng_seed);
            let mut quiz = SeedQuiz::generate(&seed_words, list, &mut rng).unwrap();

            for (pos, word) in seed_words.iter().enumerate() {
                let idx = quiz.sets()[pos].words().iter().position(|w| w == word).unwrap();
                quiz.select(pos, idx);
            }
            prop_assert!(quiz.is_complete());
            prop_assert_eq!(quiz.selected_phrase(), seed_words.join(" "));
        }
    }
}
