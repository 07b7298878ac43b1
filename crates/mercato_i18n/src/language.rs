//! Supported display languages and the currency each one implies.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::locale::normalize_locale;
use crate::I18nError;

/// A supported UI display language.
///
/// Declaration order is picker order; the first variant is the default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Language {
    En,
    Fr,
    Es,
}

/// Display currency. Never stored on its own, always derived from a [`Language`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Currency {
    /// Ghana cedi.
    Ghs,
    Eur,
    Usd,
}

/// Static picker entry for a language.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LanguageDescriptor {
    pub code: Language,
    pub display_name: &'static str,
    pub flag: &'static str,
    pub currency: Currency,
}

static DESCRIPTORS: [LanguageDescriptor; 3] = [
    LanguageDescriptor {
        code: Language::En,
        display_name: "English",
        flag: "🇬🇭",
        currency: Currency::Ghs,
    },
    LanguageDescriptor {
        code: Language::Fr,
        display_name: "Français",
        flag: "🇫🇷",
        currency: Currency::Eur,
    },
    LanguageDescriptor {
        code: Language::Es,
        display_name: "Español",
        flag: "🇪🇸",
        currency: Currency::Usd,
    },
];

/// All language descriptors in declaration order.
pub fn descriptors() -> &'static [LanguageDescriptor] {
    &DESCRIPTORS
}

impl Language {
    /// Every supported language, in declaration order.
    pub const ALL: &'static [Language] = &[Language::En, Language::Fr, Language::Es];

    /// The first-declared language.
    pub const DEFAULT: Language = Language::En;

    /// Stable code used for persistence and the document `lang` attribute.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
            Self::Es => "es",
        }
    }

    pub fn descriptor(self) -> &'static LanguageDescriptor {
        &DESCRIPTORS[self.index()]
    }

    pub fn display_name(self) -> &'static str {
        self.descriptor().display_name
    }

    pub fn flag(self) -> &'static str {
        self.descriptor().flag
    }

    pub fn currency(self) -> Currency {
        self.descriptor().currency
    }

    /// Parse a stored or user-supplied code.
    ///
    /// Surrounding whitespace and case are ignored (` FR ` is `Fr`); any
    /// other value, region-tagged ones like `fr-FR` included, yields `None`.
    pub fn from_code(code: &str) -> Option<Language> {
        let normalized = normalize_locale(code);
        Self::ALL.iter().copied().find(|l| l.code() == normalized)
    }

    fn index(self) -> usize {
        match self {
            Self::En => 0,
            Self::Fr => 1,
            Self::Es => 2,
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| I18nError::UnsupportedLanguage(s.trim().to_string()))
    }
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Self::Ghs => "GHS",
            Self::Eur => "EUR",
            Self::Usd => "USD",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Ghs => "GH₵",
            Self::Eur => "€",
            Self::Usd => "$",
        }
    }

    /// Format an amount with two decimals in this currency's local style.
    ///
    /// - GHS: `GH₵ 1,250.00`
    /// - EUR: `1 250,00 €`
    /// - USD: `$1,250.00`
    pub fn format_amount(self, amount: f64) -> String {
        let negative = amount < 0.0;
        let cents = (amount.abs() * 100.0).round() as u64;
        let (whole, frac) = (cents / 100, cents % 100);

        let (group_sep, decimal_sep) = match self {
            Self::Eur => ('\u{202f}', ','),
            Self::Ghs | Self::Usd => (',', '.'),
        };
        let number = format!("{}{decimal_sep}{frac:02}", group_thousands(whole, group_sep));
        let sign = if negative && cents > 0 { "-" } else { "" };

        match self {
            Self::Ghs => format!("{sign}{} {number}", self.symbol()),
            Self::Eur => format!("{sign}{number} {}", self.symbol()),
            Self::Usd => format!("{sign}{}{number}", self.symbol()),
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

fn group_thousands(mut n: u64, sep: char) -> String {
    let mut groups = Vec::new();
    loop {
        if n < 1000 {
            groups.push(n.to_string());
            break;
        }
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    groups.reverse();
    groups.join(&sep.to_string())
}

/// Whole percentage saved going from `original` to `price`.
///
/// Returns 0 when there is no discount (or the original is not positive).
pub fn discount_percent(original: f64, price: f64) -> u32 {
    if original <= 0.0 || price >= original {
        return 0;
    }
    let saved = (original - price.max(0.0)) / original * 100.0;
    saved.round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn descriptors_follow_declaration_order() {
        let codes: Vec<Language> = descriptors().iter().map(|d| d.code).collect();
        assert_eq!(codes, Language::ALL.to_vec());
        for lang in Language::ALL {
            assert_eq!(lang.descriptor().code, *lang);
        }
    }

    #[test]
    fn every_language_has_one_currency() {
        assert_eq!(Language::En.currency(), Currency::Ghs);
        assert_eq!(Language::Fr.currency(), Currency::Eur);
        assert_eq!(Language::Es.currency(), Currency::Usd);
    }

    #[test]
    fn parse_codes() {
        assert_eq!(Language::from_code("fr"), Some(Language::Fr));
        assert_eq!(Language::from_code(" ES "), Some(Language::Es));
        assert_eq!(Language::from_code("fr_FR"), None);
        assert_eq!(Language::from_code("en-zz"), None);
        assert_eq!(Language::from_code("fr-anything"), None);
        assert_eq!(Language::from_code("zz"), None);
        assert_eq!(Language::from_code(""), None);
        assert!(matches!(
            "zz".parse::<Language>(),
            Err(I18nError::UnsupportedLanguage(code)) if code == "zz"
        ));
    }

    #[test]
    fn amounts_use_local_style() {
        assert_eq!(Currency::Ghs.format_amount(1250.0), "GH₵ 1,250.00");
        assert_eq!(Currency::Usd.format_amount(12.5), "$12.50");
        assert_eq!(Currency::Eur.format_amount(1250.5), "1\u{202f}250,50 €");
        assert_eq!(Currency::Usd.format_amount(-3.456), "-$3.46");
        assert_eq!(Currency::Ghs.format_amount(1_000_000.0), "GH₵ 1,000,000.00");
    }

    #[test]
    fn discount_rounds_to_whole_percent() {
        assert_eq!(discount_percent(200.0, 150.0), 25);
        assert_eq!(discount_percent(30.0, 20.0), 33);
        assert_eq!(discount_percent(10.0, 10.0), 0);
        assert_eq!(discount_percent(10.0, 12.0), 0);
        assert_eq!(discount_percent(0.0, 0.0), 0);
    }
}
