//! Pattern extraction for receipt text
//!
//! Each extractor is independent and total: a field that cannot be found (or
//! parsed) comes back as `None`/empty instead of an error.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::LineItem;
use crate::stats::round_to;

/// Total/currency marker patterns, tried in order; first match wins
static AMOUNT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(?:total|grand\s*total|net\s*amount|amount\s*due|bill\s*amount|payable)[:\s]*[₹Rs.INR\s]*(\d[\d,]*\.?\d*)",
        r"(?i)₹\s*(\d[\d,]*\.?\d*)",
        r"(?i)(?:Rs\.?|INR)\s*(\d[\d,]*\.?\d*)",
        r"(?i)TOTAL[:\s]+(\d[\d,]*\.?\d*)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Any number printed with exactly two decimals
static DECIMAL_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d[\d,]*\.\d{2})").expect("valid regex"));

static DATE_DMY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})[/-](\d{1,2})[/-](\d{4})").expect("valid regex"));

static DATE_YMD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})[/-](\d{1,2})[/-](\d{1,2})").expect("valid regex"));

static DATE_D_MONTH_Y: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,2})\s+(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\w*\s+(\d{4})")
        .expect("valid regex")
});

static MERCHANT_STRIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z\s&'\-]").expect("valid regex"));

/// Name (3-31 chars, starts with a letter, stays on one line) then a number
static LINE_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z][\w \t]{2,30})[ \t]+(\d[\d,]*\.?\d*)").expect("valid regex")
});

const MAX_ITEM_MATCHES: usize = 20;
const MERCHANT_SCAN_LINES: usize = 5;
const ITEM_PRICE_MIN: f64 = 1.0;
const ITEM_PRICE_MAX: f64 = 100_000.0;

const MONTH_ABBREVIATIONS: [(&str, &str); 12] = [
    ("jan", "01"),
    ("feb", "02"),
    ("mar", "03"),
    ("apr", "04"),
    ("may", "05"),
    ("jun", "06"),
    ("jul", "07"),
    ("aug", "08"),
    ("sep", "09"),
    ("oct", "10"),
    ("nov", "11"),
    ("dec", "12"),
];

/// Parse a numeric token, dropping thousands separators
fn parse_number(token: &str) -> Option<f64> {
    token.replace(',', "").parse::<f64>().ok()
}

/// Extract the receipt total
///
/// Marker patterns ("total", "amount due", "₹", "Rs", ...) are tried first.
/// Without a marker, the largest two-decimal number in the text is taken,
/// since the total is usually the largest printed amount.
pub fn extract_amount(text: &str) -> Option<f64> {
    for pattern in AMOUNT_PATTERNS.iter() {
        let Some(caps) = pattern.captures(text) else {
            continue;
        };
        if let Some(value) = caps.get(1).and_then(|m| parse_number(m.as_str())) {
            return Some(round_to(value, 2));
        }
    }

    DECIMAL_NUMBER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).and_then(|m| parse_number(m.as_str())))
        .reduce(f64::max)
        .map(|max| round_to(max, 2))
}

fn zero_pad(component: &str) -> String {
    format!("{:0>2}", component)
}

/// Extract a date as `YYYY-MM-DD`
///
/// Tries `D/M/Y`, then `Y/M/D`, then `D <Month> Y`. Components are
/// zero-padded but not validated against the calendar.
pub fn extract_date(text: &str) -> Option<String> {
    if let Some(caps) = DATE_DMY.captures(text) {
        return Some(format!(
            "{}-{}-{}",
            zero_pad(&caps[3]),
            zero_pad(&caps[2]),
            zero_pad(&caps[1])
        ));
    }

    if let Some(caps) = DATE_YMD.captures(text) {
        return Some(format!(
            "{}-{}-{}",
            zero_pad(&caps[1]),
            zero_pad(&caps[2]),
            zero_pad(&caps[3])
        ));
    }

    if let Some(caps) = DATE_D_MONTH_Y.captures(text) {
        let abbrev = caps[2].to_lowercase();
        let month = MONTH_ABBREVIATIONS
            .iter()
            .find(|(name, _)| abbrev.starts_with(name))
            .map(|(_, num)| *num)
            .unwrap_or("01");
        return Some(format!("{}-{}-{}", &caps[3], month, zero_pad(&caps[1])));
    }

    None
}

/// Title-case a cleaned merchant line
///
/// A letter is capitalized when it follows a non-letter other than an
/// apostrophe, so "mcdonald's" becomes "Mcdonald's" and "coca-cola"
/// becomes "Coca-Cola". Not capitalizing after an apostrophe is deliberate
/// ("Mcdonald's", never "Mcdonald'S").
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev: Option<char> = None;
    for c in s.chars() {
        let starts_word = match prev {
            None => true,
            Some(p) => !p.is_alphabetic() && p != '\'',
        };
        if starts_word {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        prev = Some(c);
    }
    out
}

/// Extract the merchant name from the top of the receipt
///
/// Looks at the first 5 non-blank lines and accepts the first whose
/// letters-only form is 3-60 characters long.
pub fn extract_merchant(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(MERCHANT_SCAN_LINES)
        .find_map(|line| {
            let cleaned = MERCHANT_STRIP.replace_all(line, "");
            let cleaned = cleaned.trim();
            let len = cleaned.chars().count();
            (3..=60).contains(&len).then(|| title_case(cleaned))
        })
}

/// Extract "name  price" line items
///
/// At most 20 candidate matches are considered. Prices outside
/// `[1, 100000]` are dropped as noise (barcodes, phone numbers).
pub fn extract_line_items(text: &str) -> Vec<LineItem> {
    LINE_ITEM
        .captures_iter(text)
        .take(MAX_ITEM_MATCHES)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().trim().to_string();
            let price = parse_number(caps.get(2)?.as_str())?;
            (ITEM_PRICE_MIN..=ITEM_PRICE_MAX)
                .contains(&price)
                .then_some(LineItem { name, price })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STARBUCKS: &str = "STARBUCKS\nLatte 250\nMuffin 150\nTOTAL: 400.00\n12/01/2025";

    #[test]
    fn test_amount_total_marker() {
        assert_eq!(extract_amount(STARBUCKS), Some(400.0));
        assert_eq!(extract_amount("Grand Total: 1,234.50"), Some(1234.5));
        assert_eq!(extract_amount("amount due 99.999"), Some(100.0));
    }

    #[test]
    fn test_amount_currency_markers() {
        assert_eq!(extract_amount("Paid ₹ 2,500"), Some(2500.0));
        assert_eq!(extract_amount("Paid Rs. 780.25 cash"), Some(780.25));
        assert_eq!(extract_amount("INR 45"), Some(45.0));
    }

    #[test]
    fn test_amount_first_pattern_wins() {
        // Both a "total" marker and a currency marker: the marker list order decides
        assert_eq!(extract_amount("₹ 10\nTotal 55.00"), Some(55.0));
    }

    #[test]
    fn test_amount_fallback_largest_decimal() {
        let text = "Coffee 3.50\nBagel 12.25\nTip 2.00";
        assert_eq!(extract_amount(text), Some(12.25));
    }

    #[test]
    fn test_amount_absent_without_numbers() {
        assert_eq!(extract_amount("THANK YOU FOR VISITING"), None);
        assert_eq!(extract_amount("qty 3 of 4"), None);
    }

    #[test]
    fn test_date_dmy_reordered() {
        assert_eq!(extract_date(STARBUCKS).as_deref(), Some("2025-01-12"));
        assert_eq!(extract_date("Date: 5-3-2024").as_deref(), Some("2024-03-05"));
    }

    #[test]
    fn test_date_ymd_passthrough() {
        assert_eq!(extract_date("2024/7/9 10:32").as_deref(), Some("2024-07-09"));
    }

    #[test]
    fn test_date_month_name() {
        assert_eq!(extract_date("7 SEPTEMBER 2023").as_deref(), Some("2023-09-07"));
        assert_eq!(extract_date("on 21 mar 2022").as_deref(), Some("2022-03-21"));
    }

    #[test]
    fn test_date_absent() {
        assert_eq!(extract_date("no date here 12:30"), None);
    }

    #[test]
    fn test_merchant_first_line() {
        assert_eq!(extract_merchant(STARBUCKS).as_deref(), Some("Starbucks"));
    }

    #[test]
    fn test_merchant_skips_short_and_numeric_lines() {
        let text = "\n  #12  \n0044 5512\nBIG BAZAAR & CO.\nItem 10";
        assert_eq!(extract_merchant(text).as_deref(), Some("Big Bazaar & Co"));
    }

    #[test]
    fn test_merchant_only_first_five_lines() {
        let text = "1\n2\n3\n4\n5\nReal Store";
        assert_eq!(extract_merchant(text), None);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("coca-cola store"), "Coca-Cola Store");
        assert_eq!(title_case("MCDONALD'S"), "Mcdonald's");
    }

    #[test]
    fn test_line_items() {
        let items = extract_line_items(STARBUCKS);
        assert_eq!(
            items,
            vec![
                LineItem {
                    name: "Latte".into(),
                    price: 250.0
                },
                LineItem {
                    name: "Muffin".into(),
                    price: 150.0
                },
            ]
        );
    }

    #[test]
    fn test_line_items_price_band() {
        let items = extract_line_items("Phone 9876543210\nGum 0.50\nBread loaf 45.00");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Bread loaf");
        assert_eq!(items[0].price, 45.0);
    }

    #[test]
    fn test_line_items_capped() {
        let text: String = (0..40).map(|i| format!("Item{} {}\n", i, i + 10)).collect();
        assert_eq!(extract_line_items(&text).len(), 20);
    }
}
