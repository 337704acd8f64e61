//! # Product URL Classification
//!
//! Derives a (gender, category) pair from a product page URL by scanning
//! for path keywords.
//!
//! ## Features
//!
//! - **Ordered rule tables**: the first matching keyword wins, so rule
//!   order is part of the contract
//! - **Plain substring matching**: keywords match anywhere in the URL,
//!   case-insensitively, with no URL parsing involved
//! - **Combined errors**: a URL missing both signals reports both at once
//!   instead of stopping at the first failure

use crate::catalog::{Category, Gender};
use std::fmt;

/// Gender keywords in match priority order
const GENDER_RULES: &[(&str, Gender)] = &[
    ("/men/", Gender::Men),
    ("/mens/", Gender::Men),
    ("/women/", Gender::Women),
    ("/womens/", Gender::Women),
];

/// Category keywords in match priority order
///
/// Several shop spellings map onto one catalog category; "pants" and
/// "jeans" both land on trousers.
const CATEGORY_RULES: &[(&str, Category)] = &[
    ("/tops/", Category::Tops),
    ("/shirts/", Category::Tops),
    ("/blouses/", Category::Tops),
    ("/jeans/", Category::Trousers),
    ("/trousers/", Category::Trousers),
    ("/pants/", Category::Trousers),
    ("/dresses/", Category::Dresses),
    ("/jumpsuits/", Category::Dresses),
];

/// Successful classification of a product URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub gender: Gender,
    pub category: Category,
}

/// Why a URL could not be classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationError {
    /// No gender keyword found
    GenderNotDetected,
    /// No category keyword found
    CategoryNotDetected,
    /// Neither keyword found
    GenderAndCategoryNotDetected,
}

impl ClassificationError {
    /// True when the gender signal was missing
    pub fn gender_missing(&self) -> bool {
        matches!(
            self,
            ClassificationError::GenderNotDetected
                | ClassificationError::GenderAndCategoryNotDetected
        )
    }

    /// True when the category signal was missing
    pub fn category_missing(&self) -> bool {
        matches!(
            self,
            ClassificationError::CategoryNotDetected
                | ClassificationError::GenderAndCategoryNotDetected
        )
    }
}

const GENDER_HINT: &str = "Could not detect gender. URL should contain '/men/' or '/women/'.";
const CATEGORY_HINT: &str =
    "Could not detect category. URL should contain '/tops/', '/dresses/', or '/pants/'.";

impl fmt::Display for ClassificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassificationError::GenderNotDetected => write!(f, "{GENDER_HINT}"),
            ClassificationError::CategoryNotDetected => write!(f, "{CATEGORY_HINT}"),
            ClassificationError::GenderAndCategoryNotDetected => {
                write!(f, "{GENDER_HINT} {CATEGORY_HINT}")
            }
        }
    }
}

impl std::error::Error for ClassificationError {}

/// Detect the gender segment of a product URL
///
/// # Arguments
///
/// * `url` - The product page URL as entered by the shopper
///
/// # Returns
///
/// The first gender whose keyword occurs in the URL, or `None`
///
/// # Examples
///
/// ```rust
/// use size_finder::catalog::Gender;
/// use size_finder::url_classifier::detect_gender;
///
/// assert_eq!(detect_gender("https://shop.example.com/men/tops/tee-1"), Some(Gender::Men));
/// assert_eq!(detect_gender("https://shop.example.com/womens/shirts/s-2"), Some(Gender::Women));
/// assert_eq!(detect_gender("https://shop.example.com/kids/tops/tee-1"), None);
/// ```
pub fn detect_gender(url: &str) -> Option<Gender> {
    let url = url.to_lowercase();
    GENDER_RULES
        .iter()
        .find(|(keyword, _)| url.contains(keyword))
        .map(|(_, gender)| *gender)
}

/// Detect the category segment of a product URL
///
/// # Arguments
///
/// * `url` - The product page URL as entered by the shopper
///
/// # Returns
///
/// The first category whose keyword occurs in the URL, or `None`
///
/// # Examples
///
/// ```rust
/// use size_finder::catalog::Category;
/// use size_finder::url_classifier::detect_category;
///
/// assert_eq!(
///     detect_category("https://shop.example.com/men/pants/chino-123"),
///     Some(Category::Trousers)
/// );
/// assert_eq!(detect_category("https://shop.example.com/men/shoes/runner-9"), None);
/// ```
pub fn detect_category(url: &str) -> Option<Category> {
    let url = url.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(keyword, _)| url.contains(keyword))
        .map(|(_, category)| *category)
}

/// Classify a product URL into a (gender, category) pair
///
/// Both detectors always run, so a URL missing both signals reports
/// [`ClassificationError::GenderAndCategoryNotDetected`] rather than only
/// the first failure.
///
/// # Examples
///
/// ```rust
/// use size_finder::catalog::{Category, Gender};
/// use size_finder::url_classifier::{classify_product_url, ClassificationError};
///
/// let c = classify_product_url("https://shop.example.com/women/dresses/floral-42").unwrap();
/// assert_eq!(c.gender, Gender::Women);
/// assert_eq!(c.category, Category::Dresses);
///
/// let err = classify_product_url("https://shop.example.com/kids/shoes/sneaker-7").unwrap_err();
/// assert_eq!(err, ClassificationError::GenderAndCategoryNotDetected);
/// ```
pub fn classify_product_url(url: &str) -> Result<Classification, ClassificationError> {
    let gender = detect_gender(url);
    let category = detect_category(url);

    match (gender, category) {
        (Some(gender), Some(category)) => Ok(Classification { gender, category }),
        (None, Some(_)) => Err(ClassificationError::GenderNotDetected),
        (Some(_), None) => Err(ClassificationError::CategoryNotDetected),
        (None, None) => Err(ClassificationError::GenderAndCategoryNotDetected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_men_trousers() {
        let c = classify_product_url("https://site/men/trousers/blue-jeans").unwrap();
        assert_eq!(c.gender, Gender::Men);
        assert_eq!(c.category, Category::Trousers);
    }

    #[test]
    fn test_classify_women_tops() {
        let c = classify_product_url("https://shop.example.com/women/tops/blouse-5").unwrap();
        assert_eq!(c.gender, Gender::Women);
        assert_eq!(c.category, Category::Tops);
    }

    #[test]
    fn test_keyword_synonyms() {
        assert_eq!(detect_gender("https://shop.example.com/mens/shirts/s-1"), Some(Gender::Men));
        assert_eq!(
            detect_gender("https://shop.example.com/womens/jeans/j-1"),
            Some(Gender::Women)
        );
        assert_eq!(
            detect_category("https://shop.example.com/mens/shirts/s-1"),
            Some(Category::Tops)
        );
        assert_eq!(
            detect_category("https://shop.example.com/women/blouses/b-2"),
            Some(Category::Tops)
        );
        assert_eq!(
            detect_category("https://shop.example.com/womens/jeans/j-1"),
            Some(Category::Trousers)
        );
        assert_eq!(
            detect_category("https://shop.example.com/women/jumpsuits/js-3"),
            Some(Category::Dresses)
        );
    }

    #[test]
    fn test_women_url_never_matches_men_keyword() {
        // "/women/" does not contain "/men/" and "/womens/" does not
        // contain "/mens/" thanks to the leading slash in every keyword.
        assert_eq!(detect_gender("https://shop.example.com/women/tops/tee"), Some(Gender::Women));
        assert_eq!(
            detect_gender("https://shop.example.com/womens/tops/tee"),
            Some(Gender::Women)
        );
    }

    #[test]
    fn test_earlier_category_rule_wins() {
        // Both a tops and a trousers keyword present: the tops group is
        // checked first, so it wins.
        let url = "https://shop.example.com/women/tops/jeans/combo-1";
        assert_eq!(detect_category(url), Some(Category::Tops));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let c = classify_product_url("https://shop.example.com/MEN/Tops/TEE-1").unwrap();
        assert_eq!(c.gender, Gender::Men);
        assert_eq!(c.category, Category::Tops);
    }

    #[test]
    fn test_missing_gender_only() {
        let err = classify_product_url("https://shop.example.com/kids/tops/tee-2").unwrap_err();
        assert_eq!(err, ClassificationError::GenderNotDetected);
        assert!(err.gender_missing());
        assert!(!err.category_missing());
    }

    #[test]
    fn test_missing_category_only() {
        let err = classify_product_url("https://shop.example.com/men/shoes/runner-9").unwrap_err();
        assert_eq!(err, ClassificationError::CategoryNotDetected);
        assert!(!err.gender_missing());
        assert!(err.category_missing());
    }

    #[test]
    fn test_missing_both_reports_combined_error() {
        let err = classify_product_url("https://site/kids/shoes/red").unwrap_err();
        assert_eq!(err, ClassificationError::GenderAndCategoryNotDetected);
        assert!(err.gender_missing());
        assert!(err.category_missing());
    }

    #[test]
    fn test_empty_url() {
        let err = classify_product_url("").unwrap_err();
        assert_eq!(err, ClassificationError::GenderAndCategoryNotDetected);
    }

    #[test]
    fn test_keyword_anywhere_in_url_counts() {
        // Plain containment, not path parsing: a keyword inside the query
        // string classifies too.
        let c = classify_product_url("https://shop.example.com/item?from=/women/&cat=/dresses/")
            .unwrap();
        assert_eq!(c.gender, Gender::Women);
        assert_eq!(c.category, Category::Dresses);
    }

    #[test]
    fn test_error_hints_name_the_expected_keywords() {
        let msg = ClassificationError::GenderNotDetected.to_string();
        assert!(msg.contains("'/men/'"));
        assert!(msg.contains("'/women/'"));

        let msg = ClassificationError::CategoryNotDetected.to_string();
        assert!(msg.contains("'/pants/'"));

        let both = ClassificationError::GenderAndCategoryNotDetected.to_string();
        assert!(both.contains("gender"));
        assert!(both.contains("category"));
    }
}
