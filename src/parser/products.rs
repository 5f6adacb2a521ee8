use log::debug;
use std::collections::BTreeMap;

use crate::catalog::{fold, ProductCatalog};
use crate::model::MatchCandidate;
use crate::parser::similarity;

/// Built-in product synonyms: phrase, canonical product, note.
const DEFAULT_PRODUCT_NICKNAMES: &[(&str, &str, Option<&str>)] = &[
    ("kosher salt", "salt", Some("kosher")),
    ("sea salt", "salt", Some("sea")),
    ("table salt", "salt", None),
    ("all-purpose flour", "flour", None),
    ("all purpose flour", "flour", None),
    ("granulated sugar", "sugar", None),
    ("white sugar", "sugar", None),
    ("unsalted butter", "butter", Some("unsalted")),
    ("salted butter", "butter", Some("salted")),
    ("extra virgin olive oil", "olive oil", Some("extra virgin")),
    ("extra-virgin olive oil", "olive oil", Some("extra virgin")),
    ("large eggs", "eggs", Some("large")),
    ("large egg", "eggs", Some("large")),
    ("garlic clove", "garlic", None),
    ("garlic cloves", "garlic", None),
    ("clove garlic", "garlic", None),
    ("cloves garlic", "garlic", None),
    ("cloves of garlic", "garlic", None),
    ("black pepper", "pepper", Some("black")),
];

/// Preparation phrases that may precede a product name.
const DEFAULT_PREP_VERBS: &[&str] = &[
    "beaten",
    "chopped",
    "coarsely chopped",
    "crushed",
    "cubed",
    "diced",
    "drained",
    "finely chopped",
    "finely diced",
    "firmly packed",
    "freshly grated",
    "freshly ground",
    "freshly squeezed",
    "grated",
    "halved",
    "julienned",
    "lightly packed",
    "melted",
    "minced",
    "packed",
    "peeled",
    "quartered",
    "rinsed",
    "roughly chopped",
    "shredded",
    "sifted",
    "sliced",
    "softened",
    "thinly sliced",
    "toasted",
];

/// Canonical product and optional note for a nickname.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductNickname {
    pub name: String,
    pub note: Option<String>,
}

/// Alternate ingredient phrasings mapped to catalog product names.
#[derive(Debug, Clone)]
pub struct ProductNicknames {
    entries: BTreeMap<String, ProductNickname>,
}

impl Default for ProductNicknames {
    fn default() -> Self {
        let mut nicknames = ProductNicknames::empty();
        for (phrase, name, note) in DEFAULT_PRODUCT_NICKNAMES {
            nicknames.insert(phrase, name, note.map(str::to_string));
        }
        nicknames
    }
}

impl ProductNicknames {
    pub fn empty() -> Self {
        ProductNicknames {
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, phrase: &str, name: &str, note: Option<String>) {
        let key = fold(phrase);
        if key.is_empty() {
            return;
        }
        self.entries.insert(
            key,
            ProductNickname {
                name: name.trim().to_string(),
                note: note.filter(|n| !n.trim().is_empty()),
            },
        );
    }

    pub fn get(&self, phrase: &str) -> Option<&ProductNickname> {
        self.entries.get(&fold(phrase))
    }
}

/// Leading preparation phrases, matched word by word.
#[derive(Debug, Clone)]
pub struct PrepVerbs {
    phrases: Vec<Vec<String>>,
}

impl Default for PrepVerbs {
    fn default() -> Self {
        let mut verbs = PrepVerbs::empty();
        for phrase in DEFAULT_PREP_VERBS {
            verbs.insert(phrase);
        }
        verbs
    }
}

impl PrepVerbs {
    pub fn empty() -> Self {
        PrepVerbs {
            phrases: Vec::new(),
        }
    }

    pub fn insert(&mut self, phrase: &str) {
        let words: Vec<String> = fold(phrase).split(' ').map(str::to_string).collect();
        if words.iter().any(|w| !w.is_empty()) && !self.phrases.contains(&words) {
            self.phrases.push(words);
        }
    }

    /// Number of leading words of `words` forming the longest known prep phrase.
    fn leading(&self, words: &[&str]) -> usize {
        self.phrases
            .iter()
            .filter(|phrase| {
                phrase.len() <= words.len() && phrase.iter().zip(words).all(|(p, w)| p == w)
            })
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }
}

/// Product phrase with leading preparation phrases split off.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedPhrase {
    pub product: String,
    pub preparation: Vec<String>,
}

/// Strip `fresh`, `of` and known preparation phrases from the front of a product phrase.
///
/// Words are compared folded; the product keeps the spelling it was written with.
pub fn strip_preparation(phrase: &str, verbs: &PrepVerbs) -> PreparedPhrase {
    let words: Vec<&str> = phrase
        .split_whitespace()
        .filter(|w| !fold(w).is_empty())
        .collect();
    let folded: Vec<String> = words.iter().map(|w| fold(w)).collect();
    let folded: Vec<&str> = folded.iter().map(String::as_str).collect();
    let mut start = 0;
    let mut preparation = Vec::new();

    loop {
        let rest = &folded[start..];
        match rest.first() {
            Some(word) if is_filler(word) && rest.len() > 1 => start += 1,
            _ => {
                let taken = verbs.leading(rest);
                if taken == 0 || taken == rest.len() {
                    break;
                }
                preparation.push(rest[..taken].join(" "));
                start += taken;
            }
        }
    }

    PreparedPhrase {
        product: words[start..].join(" "),
        preparation,
    }
}

/// Drop leading `fresh` and `of`, always keeping the last word.
pub fn skip_fillers<'a, 'w>(words: &'a [&'w str]) -> &'a [&'w str] {
    let start = words
        .iter()
        .take(words.len().saturating_sub(1))
        .take_while(|w| is_filler(&fold(w)))
        .count();
    &words[start..]
}

fn is_filler(word: &str) -> bool {
    matches!(word, "fresh" | "of")
}

/// How a product phrase was matched to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Nickname,
    Fuzzy,
}

/// A product phrase resolved against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductMatch {
    pub id: u64,
    /// Catalog name of the product.
    pub name: String,
    /// Note carried by a nickname, e.g. `kosher` for `kosher salt`.
    pub note: Option<String>,
    pub kind: MatchKind,
}

/// Resolve a product phrase: exact name, then nickname, then the best fuzzy candidate.
///
/// `fuzzy_threshold` of `None` disables the fuzzy step.
pub fn resolve_product(
    phrase: &str,
    catalog: &ProductCatalog,
    nicknames: &ProductNicknames,
    fuzzy_threshold: Option<f64>,
) -> Option<ProductMatch> {
    if let Some(product) = catalog.find_exact(phrase) {
        return Some(ProductMatch {
            id: product.id,
            name: product.name.clone(),
            note: None,
            kind: MatchKind::Exact,
        });
    }

    if let Some(nickname) = nicknames.get(phrase) {
        match catalog.find_exact(&nickname.name) {
            Some(product) => {
                return Some(ProductMatch {
                    id: product.id,
                    name: product.name.clone(),
                    note: nickname.note.clone(),
                    kind: MatchKind::Nickname,
                })
            }
            None => debug!(
                "Nickname \"{}\" points at \"{}\", which is not in the catalog",
                phrase, nickname.name
            ),
        }
    }

    let threshold = fuzzy_threshold?;
    let best = find_similar(phrase, catalog, threshold).into_iter().next()?;
    debug!(
        "Fuzzy matched \"{}\" to \"{}\" ({:.2})",
        phrase, best.name, best.score
    );
    Some(ProductMatch {
        id: best.id,
        name: best.name,
        note: None,
        kind: MatchKind::Fuzzy,
    })
}

/// Catalog products whose similarity to `phrase` exceeds `threshold`, best first.
///
/// Both sides are compared folded, so punctuation and case do not count against a match.
pub fn find_similar(
    phrase: &str,
    catalog: &ProductCatalog,
    threshold: f64,
) -> Vec<MatchCandidate> {
    let wanted = fold(phrase);
    let mut candidates: Vec<MatchCandidate> = catalog
        .products()
        .iter()
        .filter_map(|product| {
            let score = similarity::ratio(&wanted, &fold(&product.name));
            (score > threshold).then(|| MatchCandidate {
                name: product.name.clone(),
                id: product.id,
                score,
            })
        })
        .collect();
    // Stable sort keeps catalog order among equal scores.
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates
}
