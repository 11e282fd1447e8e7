//! Numeral recognition, glyph normalization and English number words.

use crate::kana::is_circled_number;

const ONES: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const SCALES: [(u64, &str); 4] = [
    (1_000_000_000_000, "trillion"),
    (1_000_000_000, "billion"),
    (1_000_000, "million"),
    (1_000, "thousand"),
];

/// Plain-decimal replacement for a numeral glyph, if `c` is one.
fn glyph_value(c: char) -> Option<&'static str> {
    let value = match c {
        // Full-width digits.
        '０' => "0",
        '１' => "1",
        '２' => "2",
        '３' => "3",
        '４' => "4",
        '５' => "5",
        '６' => "6",
        '７' => "7",
        '８' => "8",
        '９' => "9",
        // Vulgar fractions.
        '½' => "0.5",
        '⅓' => "0.333",
        '⅔' => "0.666",
        '¼' => "0.25",
        '¾' => "0.75",
        '⅕' => "0.2",
        '⅖' => "0.4",
        '⅗' => "0.6",
        '⅘' => "0.8",
        '⅙' => "0.166",
        '⅚' => "0.833",
        '⅛' => "0.125",
        '⅜' => "0.375",
        '⅝' => "0.625",
        '⅞' => "0.875",
        // Roman numerals.
        'Ⅰ' => "1",
        'Ⅱ' => "2",
        'Ⅲ' => "3",
        'Ⅳ' => "4",
        'Ⅴ' => "5",
        'Ⅵ' => "6",
        'Ⅶ' => "7",
        'Ⅷ' => "8",
        'Ⅸ' => "9",
        'Ⅹ' => "10",
        'Ⅺ' => "11",
        'Ⅻ' => "12",
        'Ⅼ' => "50",
        'Ⅽ' => "100",
        'Ⅾ' => "500",
        'Ⅿ' => "1000",
        // CJK numerals, substituted digit by digit.
        '零' => "0",
        '一' => "1",
        '二' => "2",
        '三' => "3",
        '四' => "4",
        '五' => "5",
        '六' => "6",
        '七' => "7",
        '八' => "8",
        '九' => "9",
        '十' => "10",
        '百' => "100",
        '千' => "1000",
        '万' => "10000",
        '亿' => "100000000",
        // Superscripts and subscripts.
        '⁰' | '₀' => "0",
        '¹' | '₁' => "1",
        '²' | '₂' => "2",
        '³' | '₃' => "3",
        '⁴' | '₄' => "4",
        '⁵' | '₅' => "5",
        '⁶' | '₆' => "6",
        '⁷' | '₇' => "7",
        '⁸' | '₈' => "8",
        '⁹' | '₉' => "9",
        _ => return None,
    };
    Some(value)
}

/// True for characters the classifier groups into `Numeral` segments.
pub fn is_numeral_char(c: char) -> bool {
    !is_circled_number(c) && (c.is_ascii_digit() || glyph_value(c).is_some())
}

pub fn is_numeral(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_numeral_char)
}

/// Replace every numeral glyph with its plain decimal text.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match glyph_value(c) {
            Some(value) => out.push_str(value),
            None => out.push(c),
        }
    }
    out
}

/// Spell out a plain decimal number in English, or `None` when the text does not parse.
///
/// Integers use "and" after hundreds (`123` is "one hundred and twenty three"); decimals read
/// the integer part, then "point", then up to three fractional digits one by one, never
/// repeating "zero" twice in a row.
pub fn number_to_english(text: &str) -> Option<String> {
    if text.contains('.') {
        let value: f64 = text.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        return Some(decimal_to_english(value));
    }

    let value: i64 = text.parse().ok()?;
    Some(integer_to_english(value))
}

fn integer_to_english(value: i64) -> String {
    if value < 0 {
        return format!("minus {}", unsigned_to_english(value.unsigned_abs()));
    }
    unsigned_to_english(value.unsigned_abs())
}

fn unsigned_to_english(n: u64) -> String {
    if n < 20 {
        return ONES[n as usize].to_string();
    }

    if n < 100 {
        let tens = TENS[(n / 10) as usize];
        return match n % 10 {
            0 => tens.to_string(),
            ones => format!("{tens} {}", ONES[ones as usize]),
        };
    }

    if n < 1000 {
        let hundreds = format!("{} hundred", ONES[(n / 100) as usize]);
        return match n % 100 {
            0 => hundreds,
            rest => format!("{hundreds} and {}", unsigned_to_english(rest)),
        };
    }

    for (scale, name) in SCALES {
        if n >= scale {
            let head = format!("{} {name}", unsigned_to_english(n / scale));
            return match n % scale {
                0 => head,
                rest => format!("{head} {}", unsigned_to_english(rest)),
            };
        }
    }

    unreachable!("every n >= 1000 is covered by the thousand scale")
}

fn decimal_to_english(value: f64) -> String {
    if value < 0.0 {
        return format!("minus {}", decimal_to_english(-value));
    }

    let integer = value.trunc();
    let fraction = format!("{:.3}", value - integer);
    // `{:.3}` of a value in [0, 1) is "0.ddd" (or "1.000" after rounding up).
    let digits = fraction.get(2..).unwrap_or("").trim_end_matches('0');

    let mut words = unsigned_to_english(integer as u64);
    words.push_str(" point");
    if digits.is_empty() {
        words.push_str(" zero");
    }
    for d in digits.chars() {
        match d.to_digit(10) {
            Some(0) if words.ends_with(" zero") => {}
            Some(n) => {
                words.push(' ');
                words.push_str(ONES[n as usize]);
            }
            None => {}
        }
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spells_canonical_integers() {
        assert_eq!(
            number_to_english("123").as_deref(),
            Some("one hundred and twenty three")
        );
        assert_eq!(number_to_english("-7").as_deref(), Some("minus seven"));
        assert_eq!(number_to_english("40").as_deref(), Some("forty"));
        assert_eq!(number_to_english("0").as_deref(), Some("zero"));
    }

    #[test]
    fn spells_scales_recursively() {
        assert_eq!(
            number_to_english("2024").as_deref(),
            Some("two thousand twenty four")
        );
        assert_eq!(
            number_to_english("1000000").as_deref(),
            Some("one million")
        );
        assert_eq!(
            number_to_english("3000000105").as_deref(),
            Some("three billion one hundred and five")
        );
    }

    #[test]
    fn spells_decimals_digit_by_digit() {
        assert_eq!(number_to_english("0.5").as_deref(), Some("zero point five"));
        assert_eq!(
            number_to_english("3.14").as_deref(),
            Some("three point one four")
        );
        assert_eq!(
            number_to_english("0.005").as_deref(),
            Some("zero point zero five")
        );
        assert_eq!(number_to_english("1.0").as_deref(), Some("one point zero"));
    }

    #[test]
    fn unparsable_text_yields_none() {
        assert_eq!(number_to_english("12a"), None);
        assert_eq!(number_to_english("1.2.3"), None);
        assert_eq!(number_to_english(""), None);
    }

    #[test]
    fn glyphs_normalize_to_plain_decimal() {
        assert_eq!(normalize("１２"), "12");
        assert_eq!(normalize("½"), "0.5");
        assert_eq!(normalize("Ⅻ"), "12");
        assert_eq!(normalize("²"), "2");
    }

    #[test]
    fn circled_numbers_are_not_numerals() {
        assert!(is_numeral("42"));
        assert!(is_numeral("３"));
        assert!(!is_numeral("①"));
        assert!(!is_numeral("a1"));
    }
}
