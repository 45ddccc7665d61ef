use std::fmt::{self, Display};
use std::str::FromStr;

/// Strand of a gene model or of a crosslink signal.
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, PartialOrd, Ord)]
pub enum Strand {
    Plus,
    Minus,
}

impl Strand {
    /// Parse a strand from a GTF/BED strand column. Anything other than
    /// `+` or `-` is treated as unstranded and returns `None`.
    pub fn from_char(c: char) -> Option<Strand> {
        match c {
            '+' => Some(Strand::Plus),
            '-' => Some(Strand::Minus),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
        }
    }
}

impl FromStr for Strand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next().and_then(Strand::from_char), chars.next()) {
            (Some(strand), None) => Ok(strand),
            _ => Err(format!("Invalid strand: {}", s)),
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("+", Strand::Plus)]
    #[case("-", Strand::Minus)]
    #[case(" - ", Strand::Minus)]
    fn test_strand_from_str(#[case] input: &str, #[case] expected: Strand) {
        assert_eq!(Strand::from_str(input).unwrap(), expected);
    }

    #[rstest]
    #[case(".")]
    #[case("")]
    #[case("+-")]
    fn test_strand_from_str_rejects_unstranded(#[case] input: &str) {
        assert!(Strand::from_str(input).is_err());
    }

    #[rstest]
    fn test_strand_display_round_trip() {
        assert_eq!(Strand::Plus.to_string(), "+");
        assert_eq!(Strand::Minus.to_string(), "-");
    }
}
