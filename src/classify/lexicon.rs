//! Lexicon and suffix-rule tagger.
//!
//! Lookup order:
//! 1. Caller-supplied overrides (from the config file)
//! 2. Built-in lexicon of common programming vocabulary
//! 3. Number and suffix rules
//! 4. `NN` for everything else

use lazy_static::lazy_static;
use phf::phf_map;
use regex::Regex;
use std::collections::HashMap;

use super::{ClassifierError, Tag, WordClassifier};

/// Words whose tag suffix rules get wrong, or that programmers use constantly.
static LEXICON: phf::Map<&'static str, Tag> = phf_map! {
    // Verbs, base form
    "add" => Tag::VB,
    "apply" => Tag::VB,
    "build" => Tag::VB,
    "call" => Tag::VB,
    "check" => Tag::VB,
    "clean" => Tag::VB,
    "clear" => Tag::VB,
    "close" => Tag::VB,
    "compute" => Tag::VB,
    "convert" => Tag::VB,
    "copy" => Tag::VB,
    "create" => Tag::VB,
    "decode" => Tag::VB,
    "delete" => Tag::VB,
    "do" => Tag::VB,
    "dump" => Tag::VB,
    "encode" => Tag::VB,
    "ensure" => Tag::VB,
    "execute" => Tag::VB,
    "extract" => Tag::VB,
    "fetch" => Tag::VB,
    "filter" => Tag::VB,
    "find" => Tag::VB,
    "flush" => Tag::VB,
    "format" => Tag::VB,
    "generate" => Tag::VB,
    "get" => Tag::VB,
    "handle" => Tag::VB,
    "init" => Tag::VB,
    "insert" => Tag::VB,
    "load" => Tag::VB,
    "make" => Tag::VB,
    "merge" => Tag::VB,
    "open" => Tag::VB,
    "parse" => Tag::VB,
    "process" => Tag::VB,
    "put" => Tag::VB,
    "read" => Tag::VB,
    "register" => Tag::VB,
    "remove" => Tag::VB,
    "render" => Tag::VB,
    "reset" => Tag::VB,
    "resolve" => Tag::VB,
    "run" => Tag::VB,
    "save" => Tag::VB,
    "search" => Tag::VB,
    "send" => Tag::VB,
    "set" => Tag::VB,
    "setup" => Tag::VB,
    "show" => Tag::VB,
    "sort" => Tag::VB,
    "split" => Tag::VB,
    "start" => Tag::VB,
    "stop" => Tag::VB,
    "test" => Tag::VB,
    "update" => Tag::VB,
    "validate" => Tag::VB,
    "write" => Tag::VB,
    // Verbs, inflected
    "does" => Tag::VBZ,
    "has" => Tag::VBZ,
    "is" => Tag::VBZ,
    "was" => Tag::VBD,
    "were" => Tag::VBD,
    "had" => Tag::VBD,
    "did" => Tag::VBD,
    "found" => Tag::VBN,
    "made" => Tag::VBN,
    "built" => Tag::VBN,
    "done" => Tag::VBN,
    "are" => Tag::VBP,
    "have" => Tag::VBP,
    "can" => Tag::MD,
    "should" => Tag::MD,
    "will" => Tag::MD,
    "must" => Tag::MD,
    // Nouns that look like inflected verbs or adjectives
    "address" => Tag::NN,
    "class" => Tag::NN,
    "status" => Tag::NN,
    "string" => Tag::NN,
    "thing" => Tag::NN,
    "config" => Tag::NN,
    "data" => Tag::NNS,
    "args" => Tag::NNS,
    "kwargs" => Tag::NNS,
    "params" => Tag::NNS,
    "self" => Tag::PRP,
    "cls" => Tag::NN,
    "id" => Tag::NN,
    "name" => Tag::NN,
    "user" => Tag::NN,
    "file" => Tag::NN,
    "path" => Tag::NN,
    "value" => Tag::NN,
    "key" => Tag::NN,
    "item" => Tag::NN,
    "list" => Tag::NN,
    "node" => Tag::NN,
    "request" => Tag::NN,
    "response" => Tag::NN,
    "result" => Tag::NN,
    "error" => Tag::NN,
    "type" => Tag::NN,
    "url" => Tag::NN,
    // Function words
    "a" => Tag::DT,
    "an" => Tag::DT,
    "the" => Tag::DT,
    "all" => Tag::DT,
    "and" => Tag::CC,
    "or" => Tag::CC,
    "not" => Tag::RB,
    "as" => Tag::IN,
    "at" => Tag::IN,
    "by" => Tag::IN,
    "for" => Tag::IN,
    "from" => Tag::IN,
    "if" => Tag::IN,
    "in" => Tag::IN,
    "of" => Tag::IN,
    "on" => Tag::IN,
    "with" => Tag::IN,
    "to" => Tag::TO,
    "no" => Tag::DT,
    "new" => Tag::JJ,
    "old" => Tag::JJ,
    "max" => Tag::JJ,
    "min" => Tag::JJ,
    "default" => Tag::NN,
    "it" => Tag::PRP,
};

lazy_static! {
    /// Ordered suffix rules; the first match wins.
    static ref SUFFIX_RULES: Vec<(Regex, Tag)> = vec![
        (Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").unwrap(), Tag::CD),
        (Regex::new(r"^[0-9]").unwrap(), Tag::CD),
        (Regex::new(r"^\w{2,}ing$").unwrap(), Tag::VBG),
        (Regex::new(r"^\w{2,}ed$").unwrap(), Tag::VBD),
        (Regex::new(r"^\w{2,}ly$").unwrap(), Tag::RB),
        (Regex::new(r"^\w{2,}(able|ible|al|ous|ful|ive|less)$").unwrap(), Tag::JJ),
        (Regex::new(r"^\w{2,}(ize|ise|ify)$").unwrap(), Tag::VB),
        (Regex::new(r"^\w{2,}(ness|ment|tion|sion|ity|ance|ence)$").unwrap(), Tag::NN),
        (Regex::new(r"^\w+ss$").unwrap(), Tag::NN),
        (Regex::new(r"^\w{2,}s$").unwrap(), Tag::NNS),
    ];
}

/// Tags words from a static lexicon, suffix rules and optional overrides.
#[derive(Debug, Clone, Default)]
pub struct LexiconClassifier {
    overrides: HashMap<String, Tag>,
}

impl LexiconClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier whose overrides take precedence over the built-ins.
    pub fn with_overrides(overrides: HashMap<String, Tag>) -> Self {
        Self { overrides }
    }

    /// Tag a word. Never fails.
    pub fn tag(&self, word: &str) -> Tag {
        if let Some(tag) = self.overrides.get(word) {
            return *tag;
        }
        if let Some(tag) = LEXICON.get(word) {
            return *tag;
        }
        SUFFIX_RULES
            .iter()
            .find(|(re, _)| re.is_match(word))
            .map(|(_, tag)| *tag)
            .unwrap_or(Tag::NN)
    }
}

impl WordClassifier for LexiconClassifier {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn classify(&self, word: &str) -> Result<Tag, ClassifierError> {
        Ok(self.tag(word))
    }
}
