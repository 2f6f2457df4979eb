//! Wordlist mnemonics over arbitrary 2048-word dictionaries.
//!
//! The encoding is the BIP-39 one: entropy followed by the first
//! `entropy_bits / 32` bits of its SHA-256, split into 11-bit word indices.
//! Dictionaries live in a [`DictionaryRegistry`] that callers share
//! explicitly; readers never block each other.

use bip39::Language;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use zeroize::Zeroizing;

use duet_core::hash::sha256;

use crate::error::KeyError;

/// Words in every dictionary.
pub const DICTIONARY_SIZE: usize = 2048;

/// Registry name of the English list.
pub const EN_US: &str = "en_US";

/// Registry name of the simplified Chinese list.
pub const ZH_CN: &str = "zh_CN";

const ENTROPY_LENGTHS: [usize; 5] = [16, 20, 24, 28, 32];
const WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// A bijective mapping between 2048 words and their 11-bit indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    words: Vec<String>,
    index: HashMap<String, u16>,
}

impl Dictionary {
    /// Build from exactly 2048 distinct words.
    pub fn from_words<I, S>(words: I) -> Result<Self, KeyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        if words.len() != DICTIONARY_SIZE {
            return Err(KeyError::InvalidDictionary(format!(
                "expected {DICTIONARY_SIZE} words, got {}",
                words.len()
            )));
        }
        let mut index = HashMap::with_capacity(DICTIONARY_SIZE);
        for (i, word) in words.iter().enumerate() {
            if word.is_empty() {
                return Err(KeyError::InvalidDictionary(format!("empty word at {i}")));
            }
            if index.insert(word.clone(), i as u16).is_some() {
                return Err(KeyError::InvalidDictionary(format!("duplicate word {word:?}")));
            }
        }
        Ok(Self { words, index })
    }

    /// Parse a word list separated by `separator`. Blank entries are skipped.
    pub fn parse(text: &str, separator: &str) -> Result<Self, KeyError> {
        Self::from_words(
            text.split(separator)
                .map(str::trim)
                .filter(|w| !w.is_empty()),
        )
    }

    /// One of the lists bundled with the `bip39` crate.
    pub fn builtin(language: Language) -> Self {
        let words = language.word_list();
        let index = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.to_string(), i as u16))
            .collect();
        Self {
            words: words.iter().map(|w| w.to_string()).collect(),
            index,
        }
    }

    pub fn word(&self, index: u16) -> Option<&str> {
        self.words.get(index as usize).map(String::as_str)
    }

    pub fn index_of(&self, word: &str) -> Option<u16> {
        self.index.get(word).copied()
    }
}

/// Named dictionaries shared between wallets.
#[derive(Debug, Default)]
pub struct DictionaryRegistry {
    dictionaries: RwLock<HashMap<String, Arc<Dictionary>>>,
}

impl DictionaryRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding [`EN_US`] and [`ZH_CN`].
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register(EN_US, Dictionary::builtin(Language::English));
        registry.register(ZH_CN, Dictionary::builtin(Language::SimplifiedChinese));
        registry
    }

    /// Insert or replace a dictionary, returning the one it displaced.
    pub fn register(&self, name: &str, dictionary: Dictionary) -> Option<Arc<Dictionary>> {
        let previous = self
            .dictionaries
            .write()
            .insert(name.to_string(), Arc::new(dictionary));
        debug!(name, replaced = previous.is_some(), "dictionary registered");
        previous
    }

    pub fn get(&self, name: &str) -> Result<Arc<Dictionary>, KeyError> {
        self.dictionaries
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| KeyError::UnknownDictionary(name.to_string()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.dictionaries.read().keys().cloned().collect();
        names.sort();
        names
    }
}

/// Encode entropy of 16, 20, 24, 28 or 32 bytes as a space-joined phrase.
pub fn to_mnemonic(entropy: &[u8], dictionary: &Dictionary) -> Result<String, KeyError> {
    if !ENTROPY_LENGTHS.contains(&entropy.len()) {
        return Err(KeyError::InvalidMnemonic(format!(
            "entropy must be 16-32 bytes in steps of 4, got {}",
            entropy.len()
        )));
    }
    let checksum_bits = entropy.len() / 4;
    let word_count = (entropy.len() * 8 + checksum_bits) / 11;

    let mut bits = Zeroizing::new(Vec::with_capacity(entropy.len() + 1));
    bits.extend_from_slice(entropy);
    bits.push(sha256(entropy)[0]);

    let words: Vec<&str> = (0..word_count)
        .map(|i| {
            let index = read_bits(&bits, i * 11, 11);
            dictionary.words[index as usize].as_str()
        })
        .collect();
    Ok(words.join(" "))
}

/// Decode a phrase back to its entropy, verifying the checksum.
///
/// Words may be separated by any run of whitespace.
pub fn from_mnemonic(phrase: &str, dictionary: &Dictionary) -> Result<Zeroizing<Vec<u8>>, KeyError> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    if !WORD_COUNTS.contains(&words.len()) {
        return Err(KeyError::InvalidMnemonic(format!(
            "word count {} not in {WORD_COUNTS:?}",
            words.len()
        )));
    }

    let total_bits = words.len() * 11;
    let mut bits = Zeroizing::new(vec![0u8; total_bits.div_ceil(8)]);
    for (i, word) in words.iter().enumerate() {
        let index = dictionary
            .index_of(word)
            .or_else(|| dictionary.index_of(&word.to_lowercase()))
            .ok_or_else(|| KeyError::InvalidMnemonic(format!("unknown word {word:?}")))?;
        write_bits(&mut bits, i * 11, 11, index);
    }

    let checksum_bits = total_bits / 33;
    let entropy_len = (total_bits - checksum_bits) / 8;
    let entropy = Zeroizing::new(bits[..entropy_len].to_vec());
    let expected = sha256(&entropy)[0] >> (8 - checksum_bits);
    let actual = read_bits(&bits, entropy_len * 8, checksum_bits) as u8;
    if expected != actual {
        return Err(KeyError::InvalidMnemonic("checksum mismatch".into()));
    }
    Ok(entropy)
}

fn read_bits(bytes: &[u8], offset: usize, count: usize) -> u16 {
    (offset..offset + count).fold(0u16, |acc, bit| {
        let set = bytes[bit / 8] >> (7 - bit % 8) & 1;
        (acc << 1) | set as u16
    })
}

fn write_bits(bytes: &mut [u8], offset: usize, count: usize, value: u16) {
    for i in 0..count {
        if value >> (count - 1 - i) & 1 == 1 {
            let bit = offset + i;
            bytes[bit / 8] |= 1 << (7 - bit % 8);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english() -> Dictionary {
        Dictionary::builtin(Language::English)
    }

    #[test]
    fn bip39_vectors() {
        let dict = english();
        let cases: [(&[u8], String); 4] = [
            (&[0u8; 16], format!("{}about", "abandon ".repeat(11))),
            (
                &[0x7f; 16],
                "legal winner thank year wave sausage worth useful legal winner thank yellow".into(),
            ),
            (&[0xff; 16], format!("{}wrong", "zoo ".repeat(11))),
            (&[0u8; 32], format!("{}art", "abandon ".repeat(23))),
        ];
        for (entropy, phrase) in cases {
            assert_eq!(to_mnemonic(entropy, &dict).unwrap(), phrase);
            assert_eq!(&from_mnemonic(&phrase, &dict).unwrap()[..], entropy);
        }
    }

    #[test]
    fn agrees_with_bip39_crate() {
        let dict = english();
        let entropy = [0xA5u8; 24];
        let ours = to_mnemonic(&entropy, &dict).unwrap();
        let theirs = bip39::Mnemonic::from_entropy_in(Language::English, &entropy).unwrap();
        assert_eq!(ours, theirs.to_string());
    }

    #[test]
    fn chinese_roundtrip() {
        let registry = DictionaryRegistry::with_defaults();
        let dict = registry.get(ZH_CN).unwrap();
        let entropy = [0x3Cu8; 32];
        let phrase = to_mnemonic(&entropy, &dict).unwrap();
        assert_eq!(phrase.split(' ').count(), 24);
        assert_eq!(&from_mnemonic(&phrase, &dict).unwrap()[..], &entropy);
    }

    #[test]
    fn whitespace_is_normalized() {
        let dict = english();
        let phrase = format!("  {}\n\tabout ", "abandon  ".repeat(11));
        assert_eq!(&from_mnemonic(&phrase, &dict).unwrap()[..], &[0u8; 16]);
    }

    #[test]
    fn unknown_word_rejected() {
        let dict = english();
        let phrase = format!("{}notaword", "abandon ".repeat(11));
        let err = from_mnemonic(&phrase, &dict).unwrap_err();
        assert!(err.to_string().contains("notaword"), "{err}");
    }

    #[test]
    fn bad_checksum_rejected() {
        let dict = english();
        let phrase = format!("{}abandon", "abandon ".repeat(11));
        assert_eq!(
            from_mnemonic(&phrase, &dict).unwrap_err(),
            KeyError::InvalidMnemonic("checksum mismatch".into())
        );
    }

    #[test]
    fn wrong_word_count_rejected() {
        let dict = english();
        let phrase = "abandon ".repeat(11);
        assert!(matches!(from_mnemonic(&phrase, &dict), Err(KeyError::InvalidMnemonic(_))));
    }

    #[test]
    fn bad_entropy_length_rejected() {
        assert!(to_mnemonic(&[0u8; 17], &english()).is_err());
        assert!(to_mnemonic(&[0u8; 36], &english()).is_err());
    }

    #[test]
    fn custom_dictionary() {
        let text: String = (0..DICTIONARY_SIZE).map(|i| format!("w{i}\n")).collect();
        let dict = Dictionary::parse(&text, "\n").unwrap();
        assert_eq!(dict.word(5), Some("w5"));
        assert_eq!(dict.index_of("w2047"), Some(2047));
        let phrase = to_mnemonic(&[0u8; 16], &dict).unwrap();
        assert!(phrase.starts_with("w0 w0"));
        assert_eq!(&from_mnemonic(&phrase, &dict).unwrap()[..], &[0u8; 16]);
    }

    #[test]
    fn short_dictionary_rejected() {
        let words: Vec<String> = (0..2047).map(|i| format!("w{i}")).collect();
        assert!(matches!(Dictionary::from_words(words), Err(KeyError::InvalidDictionary(_))));
    }

    #[test]
    fn duplicate_words_rejected() {
        let mut words: Vec<String> = (0..DICTIONARY_SIZE).map(|i| format!("w{i}")).collect();
        words[10] = "w3".into();
        let err = Dictionary::from_words(words).unwrap_err();
        assert!(err.to_string().contains("duplicate"), "{err}");
    }

    #[test]
    fn registry_register_replaces() {
        let registry = DictionaryRegistry::new();
        assert!(matches!(registry.get(EN_US), Err(KeyError::UnknownDictionary(_))));
        assert!(registry.register(EN_US, english()).is_none());
        assert!(registry.register(EN_US, english()).is_some());
        assert_eq!(registry.names(), vec![EN_US.to_string()]);
    }

    #[test]
    fn registry_defaults() {
        let registry = DictionaryRegistry::with_defaults();
        assert_eq!(registry.names(), vec![EN_US.to_string(), ZH_CN.to_string()]);
    }

    #[test]
    fn registry_concurrent_readers_and_writer() {
        let registry = DictionaryRegistry::with_defaults();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..50 {
                        let dict = registry.get(EN_US).unwrap();
                        let phrase = to_mnemonic(&[0u8; 16], &dict).unwrap();
                        assert!(phrase.ends_with("about"));
                    }
                });
            }
            s.spawn(|| {
                for _ in 0..10 {
                    registry.register(EN_US, english());
                }
            });
        });
        assert!(registry.get(EN_US).is_ok());
    }

    // --- proptest ---

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn roundtrip_any_entropy(
            len_idx in 0usize..5,
            seed in proptest::collection::vec(any::<u8>(), 32),
        ) {
            let dict = english();
            let entropy = &seed[..ENTROPY_LENGTHS[len_idx]];
            let phrase = to_mnemonic(entropy, &dict).unwrap();
            prop_assert_eq!(phrase.split(' ').count(), WORD_COUNTS[len_idx]);
            let back = from_mnemonic(&phrase, &dict).unwrap();
            prop_assert_eq!(&back[..], entropy);
        }
    }
}
