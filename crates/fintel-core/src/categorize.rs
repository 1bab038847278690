//! Keyword categorization of transaction text
//!
//! The taxonomy is an ordered, immutable table built once and shared by
//! reference. Scoring counts keyword substrings; the first category (in table
//! order) with the strictly highest score wins.

use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};

use crate::models::Categorization;
use crate::stats::round_to;

/// Category returned when no keyword matches
pub const DEFAULT_CATEGORY: &str = "Shopping";

const NO_MATCH_CONFIDENCE: f64 = 0.1;
const PER_KEYWORD_CONFIDENCE: f64 = 0.25;
const MAX_CONFIDENCE: f64 = 0.95;

const BUILTIN_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Food & Dining",
        &[
            "swiggy", "zomato", "restaurant", "cafe", "pizza", "burger", "dominos",
            "mcdonalds", "kfc", "subway", "starbucks", "chai", "biryani", "food", "dining",
            "lunch", "dinner", "breakfast", "snacks", "bakery", "haldirams", "barbeque",
        ],
    ),
    (
        "Groceries",
        &[
            "bigbasket", "zepto", "dmart", "grocery", "vegetables", "fruits", "milk",
            "supermarket", "reliance fresh", "more", "nature basket", "provisions", "ration",
        ],
    ),
    (
        "Transport",
        &[
            "uber", "ola", "rapido", "metro", "bus", "train", "cab", "petrol", "diesel",
            "fuel", "parking", "toll", "irctc", "railways", "auto", "rickshaw",
        ],
    ),
    (
        "Shopping",
        &[
            "amazon", "flipkart", "myntra", "ajio", "croma", "shopping", "mall", "clothes",
            "electronics", "shoes", "decathlon", "reliance digital",
        ],
    ),
    (
        "Utilities",
        &[
            "electricity", "water", "gas", "internet", "wifi", "jio", "airtel", "vodafone",
            "recharge", "dth", "broadband", "mobile bill", "bescom", "bwssb",
        ],
    ),
    (
        "Rent",
        &["rent", "lease", "house rent", "flat rent", "pg rent", "hostel"],
    ),
    (
        "Entertainment",
        &[
            "netflix", "spotify", "hotstar", "movie", "cinema", "pvr", "inox", "gaming",
            "concert", "bookmyshow", "sony liv", "prime video",
        ],
    ),
    (
        "Healthcare",
        &[
            "hospital", "doctor", "pharmacy", "medicine", "medical", "apollo", "practo",
            "pharmeasy", "1mg", "diagnostic", "lab test", "health",
        ],
    ),
    (
        "Education",
        &[
            "course", "udemy", "coursera", "books", "tuition", "coaching", "school",
            "college", "certification", "exam", "unacademy",
        ],
    ),
    (
        "Travel",
        &[
            "flight", "hotel", "trip", "booking", "makemytrip", "oyo", "cleartrip", "airbnb",
            "resort", "vacation", "yatra",
        ],
    ),
    (
        "Personal Care",
        &["salon", "spa", "gym", "nykaa", "cosmetics", "haircut", "skincare", "cultfit"],
    ),
    (
        "EMI / Loans",
        &["emi", "loan", "credit card bill", "installment", "mortgage"],
    ),
    (
        "Investments",
        &[
            "mutual fund", "sip", "stocks", "shares", "fd", "fixed deposit", "investment",
            "zerodha", "groww",
        ],
    ),
    (
        "Gifts & Donations",
        &["gift", "donation", "charity", "contribution", "birthday", "wedding"],
    ),
    (
        "Salary",
        &["salary", "payroll", "wages", "income", "stipend"],
    ),
    (
        "Freelance",
        &["freelance", "consulting", "contract", "project payment", "upwork", "fiverr"],
    ),
];

static BUILTIN: LazyLock<Arc<CategoryTaxonomy>> = LazyLock::new(|| {
    Arc::new(CategoryTaxonomy {
        categories: BUILTIN_CATEGORIES
            .iter()
            .map(|(name, keywords)| CategoryKeywords {
                name: name.to_string(),
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            })
            .collect(),
        default_category: DEFAULT_CATEGORY.to_string(),
    })
});

/// One taxonomy entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryKeywords {
    pub name: String,
    /// Lowercase substrings that indicate this category
    pub keywords: Vec<String>,
}

/// Ordered mapping from category name to keywords. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTaxonomy {
    categories: Vec<CategoryKeywords>,
    default_category: String,
}

impl CategoryTaxonomy {
    /// The built-in table, shared process-wide
    pub fn builtin() -> Arc<CategoryTaxonomy> {
        Arc::clone(&BUILTIN)
    }

    /// Build a custom taxonomy. Keywords are lowercased; order is preserved.
    pub fn new(categories: Vec<CategoryKeywords>, default_category: impl Into<String>) -> Self {
        let categories = categories
            .into_iter()
            .map(|c| CategoryKeywords {
                name: c.name,
                keywords: c.keywords.iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();
        Self {
            categories,
            default_category: default_category.into(),
        }
    }

    pub fn categories(&self) -> &[CategoryKeywords] {
        &self.categories
    }

    pub fn default_category(&self) -> &str {
        &self.default_category
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Scores text against a shared taxonomy
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    taxonomy: Arc<CategoryTaxonomy>,
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::new(CategoryTaxonomy::builtin())
    }
}

impl CategoryClassifier {
    pub fn new(taxonomy: Arc<CategoryTaxonomy>) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &CategoryTaxonomy {
        &self.taxonomy
    }

    /// Categorize a description with an optional merchant name
    pub fn categorize(&self, description: &str, merchant: Option<&str>) -> Categorization {
        let text = format!("{} {}", description, merchant.unwrap_or("")).to_lowercase();

        let mut best: Option<&CategoryKeywords> = None;
        let mut best_score = 0;

        for entry in &self.taxonomy.categories {
            let score = entry
                .keywords
                .iter()
                .filter(|kw| text.contains(kw.as_str()))
                .count();
            // Strictly greater: earlier categories win ties
            if score > best_score {
                best_score = score;
                best = Some(entry);
            }
        }

        match best {
            Some(entry) => Categorization {
                category: entry.name.clone(),
                confidence: round_to(
                    (best_score as f64 * PER_KEYWORD_CONFIDENCE).min(MAX_CONFIDENCE),
                    2,
                ),
                matched_keyword_count: best_score,
            },
            None => Categorization {
                category: self.taxonomy.default_category.clone(),
                confidence: NO_MATCH_CONFIDENCE,
                matched_keyword_count: 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swiggy_dinner() {
        let classifier = CategoryClassifier::default();
        let result = classifier.categorize("swiggy order for dinner", None);

        assert_eq!(result.category, "Food & Dining");
        assert!(result.matched_keyword_count >= 2);
        assert_eq!(
            result.confidence,
            (result.matched_keyword_count as f64 * 0.25).min(0.95)
        );
    }

    #[test]
    fn test_merchant_contributes() {
        let classifier = CategoryClassifier::default();
        let result = classifier.categorize("monthly payment", Some("NETFLIX"));
        assert_eq!(result.category, "Entertainment");
        assert_eq!(result.matched_keyword_count, 1);
        assert_eq!(result.confidence, 0.25);
    }

    #[test]
    fn test_no_match_defaults() {
        let classifier = CategoryClassifier::default();
        let result = classifier.categorize("xyz", None);
        assert_eq!(result.category, "Shopping");
        assert_eq!(result.confidence, 0.1);
        assert_eq!(result.matched_keyword_count, 0);
    }

    #[test]
    fn test_confidence_capped() {
        let classifier = CategoryClassifier::default();
        let result = classifier.categorize(
            "pizza burger biryani lunch dinner breakfast at the cafe",
            None,
        );
        assert_eq!(result.category, "Food & Dining");
        assert_eq!(result.confidence, 0.95);
    }

    #[test]
    fn test_ties_prefer_earlier_category() {
        let taxonomy = CategoryTaxonomy::new(
            vec![
                CategoryKeywords {
                    name: "First".into(),
                    keywords: vec!["alpha".into()],
                },
                CategoryKeywords {
                    name: "Second".into(),
                    keywords: vec!["beta".into()],
                },
            ],
            "Other",
        );
        let classifier = CategoryClassifier::new(Arc::new(taxonomy));

        assert_eq!(classifier.categorize("beta alpha", None).category, "First");
        assert_eq!(classifier.categorize("nothing", None).category, "Other");
    }

    #[test]
    fn test_custom_keywords_lowercased() {
        let taxonomy = CategoryTaxonomy::new(
            vec![CategoryKeywords {
                name: "Pets".into(),
                keywords: vec!["PetSmart".into()],
            }],
            "Other",
        );
        let classifier = CategoryClassifier::new(Arc::new(taxonomy));
        assert_eq!(classifier.categorize("PETSMART #123", None).category, "Pets");
    }

    #[test]
    fn test_deterministic_across_threads() {
        let classifier = CategoryClassifier::default();
        let expected = classifier.categorize("uber ride to metro station", None);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let c = classifier.clone();
                std::thread::spawn(move || c.categorize("uber ride to metro station", None))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }

    #[test]
    fn test_builtin_is_shared() {
        let a = CategoryTaxonomy::builtin();
        let b = CategoryTaxonomy::builtin();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), 16);
        assert_eq!(a.categories()[0].name, "Food & Dining");
    }
}
