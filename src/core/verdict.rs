//! Per-tile feedback verdicts

use serde::{Deserialize, Serialize};

/// Feedback for a single tile or keyboard key
///
/// On the wire a verdict is a plain string: `""`, `"correct"`, `"present"` or `"absent"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Not evaluated yet
    #[default]
    #[serde(rename = "")]
    Unset,
    /// Right letter, right position
    Correct,
    /// Letter is in the answer at another position
    Present,
    /// Letter is not in the (remaining) answer
    Absent,
}

impl Verdict {
    /// Ordering used for keyboard coloring: correct > present > absent > unset
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Unset => 0,
            Self::Absent => 1,
            Self::Present => 2,
            Self::Correct => 3,
        }
    }

    #[must_use]
    pub const fn is_set(self) -> bool {
        !matches!(self, Self::Unset)
    }

    /// True for verdicts that consume an answer letter
    #[must_use]
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Correct | Self::Present)
    }

    /// Wire spelling
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Correct => "correct",
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }

    #[must_use]
    pub const fn to_emoji(self) -> char {
        match self {
            Self::Correct => '🟩',
            Self::Present => '🟨',
            Self::Absent => '⬜',
            Self::Unset => '·',
        }
    }

    /// Parse a single feedback character (`G`/`Y`/`-` or the emoji squares)
    #[must_use]
    pub const fn from_char(ch: char) -> Option<Self> {
        match ch {
            'G' | 'g' | '🟩' => Some(Self::Correct),
            'Y' | 'y' | '🟨' => Some(Self::Present),
            '-' | '_' | '⬜' => Some(Self::Absent),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_wire_strings() {
        assert_eq!(serde_json::to_string(&Verdict::Unset).unwrap(), "\"\"");
        assert_eq!(
            serde_json::to_string(&Verdict::Correct).unwrap(),
            "\"correct\""
        );
        assert_eq!(
            serde_json::from_str::<Verdict>("\"absent\"").unwrap(),
            Verdict::Absent
        );
        assert!(serde_json::from_str::<Verdict>("\"green\"").is_err());
    }

    #[test]
    fn as_str_matches_serde() {
        for v in [Verdict::Unset, Verdict::Correct, Verdict::Present, Verdict::Absent] {
            assert_eq!(serde_json::to_value(v).unwrap(), v.as_str());
        }
    }

    #[test]
    fn verdict_rank_orders_priority() {
        assert!(Verdict::Correct.rank() > Verdict::Present.rank());
        assert!(Verdict::Present.rank() > Verdict::Absent.rank());
        assert!(Verdict::Absent.rank() > Verdict::Unset.rank());
    }

    #[test]
    fn verdict_from_char() {
        assert_eq!(Verdict::from_char('g'), Some(Verdict::Correct));
        assert_eq!(Verdict::from_char('🟨'), Some(Verdict::Present));
        assert_eq!(Verdict::from_char('_'), Some(Verdict::Absent));
        assert_eq!(Verdict::from_char('x'), None);
    }
}
