//! Merchant name cleaning: rule tables as data plus one lookup function.
//!
//! A raw export name is split on runs of digits, `*`, `#`, `.` and `-`. The
//! first segment is looked up in the adapter's merchant table; the first rule
//! whose pattern matches wins. Unmatched names take the default branch:
//! upper-case the first segment and collapse known brand substrings.
//!
//! Precondition: patterns within one table must be mutually exclusive. The
//! shipped tables satisfy this, so their order does not affect results. A new
//! pattern that overlaps an existing one makes the outcome depend on order.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

static NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[*#\d.\-]+").expect("noise pattern is a valid regex"));

/// What a matching merchant rule does to the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    /// Replace wholesale with a fixed label.
    Literal(&'static str),
    /// Use the second segment, rewriting known shorthand aliases.
    SecondSegment {
        aliases: &'static [(&'static str, &'static str)],
    },
    /// Replace with the upper-cased pattern itself.
    Canonical,
    /// Choose a label by comparing the amount with the insurance threshold.
    ByAmount {
        below: &'static str,
        otherwise: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MerchantRule {
    /// Compared case-insensitively with the right-trimmed first segment.
    pub pattern: &'static str,
    pub action: RuleAction,
}

/// Default-branch substring collapse: any needle found ⇒ `canonical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collapse {
    pub needles: &'static [&'static str],
    pub canonical: &'static str,
}

/// One adapter's pattern tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameRules {
    pub merchants: &'static [MerchantRule],
    pub collapses: &'static [Collapse],
}

const PAYMENT_PROCESSORS: [MerchantRule; 5] = [
    MerchantRule {
        pattern: "PAYPAL",
        action: RuleAction::SecondSegment {
            aliases: &[("STARBUCKSSE", "STARBUCKS")],
        },
    },
    MerchantRule {
        pattern: "CPI",
        action: RuleAction::Literal("VENDING MACHINE"),
    },
    MerchantRule {
        pattern: "VC",
        action: RuleAction::Literal("VET"),
    },
    MerchantRule {
        pattern: "SQ",
        action: RuleAction::SecondSegment {
            aliases: &[("A CLIP ABOVE", "GROOMER")],
        },
    },
    MerchantRule {
        pattern: "Amazon Prime",
        action: RuleAction::Canonical,
    },
];

const AMAZON: Collapse = Collapse {
    needles: &["AMAZON", "AMZN"],
    canonical: "AMAZON",
};

/// Brokerage cash-management export.
pub static BROKERAGE_RULES: NameRules = NameRules {
    merchants: &PAYMENT_PROCESSORS,
    collapses: &[
        AMAZON,
        Collapse {
            needles: &["COSTCO"],
            canonical: "COSTCO",
        },
    ],
};

/// Membership credit card export. Warehouse names are kept as-is here so
/// that e.g. `COSTCO GAS` stays distinct from `COSTCO`.
pub static CARD_RULES: NameRules = NameRules {
    merchants: &PAYMENT_PROCESSORS,
    collapses: &[
        AMAZON,
        Collapse {
            needles: &["EUROPEAN WAX CENTER"],
            canonical: "EUROPEAN WAX CENTER",
        },
    ],
};

/// Digital bank export.
pub static BANK_RULES: NameRules = NameRules {
    merchants: &[
        MerchantRule {
            pattern: "LIBERTY MUTUAL",
            action: RuleAction::ByAmount {
                below: "RENTERS INSURANCE",
                otherwise: "CAR INSURANCE",
            },
        },
        MerchantRule {
            pattern: "ENT CU",
            action: RuleAction::Literal("CAR PAYMENT"),
        },
        MerchantRule {
            pattern: "PL",
            action: RuleAction::Literal("RENT"),
        },
        MerchantRule {
            pattern: "DHHA",
            action: RuleAction::Literal("DENVER HEALTH"),
        },
        MerchantRule {
            pattern: "AH",
            action: RuleAction::Literal("ADVENTHEALTH"),
        },
        MerchantRule {
            pattern: "INTEREST EARNED",
            action: RuleAction::Literal("INTEREST"),
        },
        MerchantRule {
            pattern: "HEALTHONE",
            action: RuleAction::Literal("SWEDISH"),
        },
    ],
    collapses: &[AMAZON],
};

/// Default boundary between renters and car insurance premiums.
pub const DEFAULT_INSURANCE_THRESHOLD: Decimal = Decimal::from_parts(2500, 0, 0, false, 2);

/// Per-record inputs to rules that look beyond the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleaningContext {
    pub amount: Decimal,
    pub insurance_threshold: Decimal,
}

impl NameRules {
    /// First rule whose pattern matches the segment.
    pub fn lookup(&self, first_segment: &str) -> Option<&MerchantRule> {
        let key = first_segment.trim_end();
        self.merchants
            .iter()
            .find(|rule| rule.pattern.eq_ignore_ascii_case(key))
    }

    /// Clean a raw export name into its canonical merchant token.
    ///
    /// Returns `None` only when the name holds no text at all.
    pub fn clean(&self, raw: &str, ctx: &CleaningContext) -> Option<String> {
        let segments: Vec<&str> = NOISE.split(raw).collect();
        let first = segments.first().copied().unwrap_or("");

        let cleaned = match self.lookup(first).map(|rule| rule.action) {
            Some(RuleAction::Literal(label)) => label.to_string(),
            Some(RuleAction::Canonical) => first.trim().to_uppercase(),
            Some(RuleAction::ByAmount { below, otherwise }) => {
                if ctx.amount < ctx.insurance_threshold {
                    below.to_string()
                } else {
                    otherwise.to_string()
                }
            }
            Some(RuleAction::SecondSegment { aliases }) => {
                match segments.get(1).map(|s| s.trim()).filter(|s| !s.is_empty()) {
                    Some(second) => {
                        let second = second.to_uppercase();
                        match aliases.iter().find(|(alias, _)| *alias == second) {
                            Some((_, canonical)) => canonical.to_string(),
                            None => self.collapse(second),
                        }
                    }
                    // A bare processor prefix has nothing to resolve to.
                    None => self.default_name(&segments)?,
                }
            }
            None => self.default_name(&segments)?,
        };

        Some(cleaned)
    }

    fn default_name(&self, segments: &[&str]) -> Option<String> {
        let first = segments
            .iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())?;
        Some(self.collapse(first.to_uppercase()))
    }

    fn collapse(&self, name: String) -> String {
        self.collapses
            .iter()
            .find(|c| c.needles.iter().any(|needle| name.contains(needle)))
            .map(|c| c.canonical.to_string())
            .unwrap_or(name)
    }
}
