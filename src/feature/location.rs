use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// Error raised when a location string does not follow the INSDC grammar.
///
/// Parsing is atomic: on error, no partially-built location is returned. The
/// offending token is carried in every variant for diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("the location '{0}' contains invalid characters")]
    InvalidCharacter(String),
    #[error("the location '{0}' has an unsupported format")]
    UnsupportedFormat(String),
    #[error("the location '{0}' has an unterminated complement wrapper")]
    UnmatchedComplement(String),
    #[error("the location '{0}' has a start greater than its end, while coordinates must be relative to the direct strand")]
    StartAfterEnd(String),
    #[error("the location '{0}' holds a coordinate too large to represent")]
    CoordinateOverflow(String),
}

lazy_static! {
    static ref VALID_RE: Regex = Regex::new(r"^[<>\d.^]+$").unwrap();
    static ref PAIR_RE: Regex = Regex::new(r"^(<?)(\d+)\.\.(>?)(\d+)$").unwrap();
    static ref SINGLE_RE: Regex = Regex::new(r"^\d+$").unwrap();
    static ref FUZZY_RE: Regex = Regex::new(r"^(\d+)([.^])(\d+)$").unwrap();
}

fn parse_coord(digits: &str, token: &str) -> Result<i64, FormatError> {
    digits
        .parse()
        .map_err(|_| FormatError::CoordinateOverflow(token.to_string()))
}

/// One primitive coordinate range of a feature location, with its boundary
/// flags. Coordinates are 1-based and inclusive, on the direct strand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubLocation {
    pub start: i64,
    pub end: i64,
    /// The token was a lone integer; `start == end`.
    pub single_base: bool,
    /// `<` prefix: the range extends below `start`.
    pub unknown_start: bool,
    /// `>` suffix: the range extends beyond `end`.
    pub unknown_end: bool,
    /// The token was wrapped in `complement(...)`.
    pub reverse_complement: bool,
    /// `^` separator: a zero-width point between two adjacent bases.
    pub between_bases: bool,
    /// `.` separator: a single base somewhere within the range.
    pub inexact: bool,
}

impl SubLocation {
    /// A plain coordinate pair with no boundary flags.
    pub fn new(start: i64, end: i64) -> SubLocation {
        SubLocation {
            start,
            end,
            ..SubLocation::default()
        }
    }

    /// Parse one primitive location token
    /// (see the INSDC rules: https://www.insdc.org/documents/feature-table#3.4).
    ///
    /// Supported forms:
    /// ```text
    /// 122        single base
    /// 122..330   regular coordinate pair
    /// <122..330  start boundary unknown (lower)
    /// 122..>330  end boundary unknown (higher)
    /// 122.330    exact position unknown but within the range
    /// 122^123    point between two bases
    /// ```
    /// Any of these may be wrapped in `complement(...)`.
    pub fn parse(token: &str) -> Result<SubLocation, FormatError> {
        let mut sub = SubLocation::default();
        let mut inner = token;

        if let Some(rest) = inner.strip_prefix("complement(") {
            sub.reverse_complement = true;
            inner = rest
                .strip_suffix(')')
                .ok_or_else(|| FormatError::UnmatchedComplement(token.to_string()))?;
        }

        if !VALID_RE.is_match(inner) {
            return Err(FormatError::InvalidCharacter(token.to_string()));
        }

        if let Some(cap) = PAIR_RE.captures(inner) {
            sub.start = parse_coord(&cap[2], token)?;
            sub.end = parse_coord(&cap[4], token)?;
            sub.unknown_start = &cap[1] == "<";
            sub.unknown_end = &cap[3] == ">";
        } else if SINGLE_RE.is_match(inner) {
            sub.start = parse_coord(inner, token)?;
            sub.end = sub.start;
            sub.single_base = true;
        } else if let Some(cap) = FUZZY_RE.captures(inner) {
            sub.start = parse_coord(&cap[1], token)?;
            sub.end = parse_coord(&cap[3], token)?;
            if &cap[2] == "." {
                sub.inexact = true;
            } else {
                sub.between_bases = true;
            }
        } else {
            return Err(FormatError::UnsupportedFormat(token.to_string()));
        }

        if sub.start > sub.end {
            return Err(FormatError::StartAfterEnd(token.to_string()));
        }

        Ok(sub)
    }

    /// Move both coordinates by `offset`. No bounds checking is done here;
    /// keeping the result above the coordinate origin is the caller's duty.
    pub fn shift(&mut self, offset: i64) {
        self.start += offset;
        self.end += offset;
    }
}

impl fmt::Display for SubLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reverse_complement {
            f.write_str("complement(")?;
        }
        if self.single_base {
            write!(f, "{}", self.start)?;
        } else {
            let sep = if self.between_bases {
                "^"
            } else if self.inexact {
                "."
            } else {
                ".."
            };
            if self.unknown_start {
                f.write_str("<")?;
            }
            write!(f, "{}{}", self.start, sep)?;
            if self.unknown_end {
                f.write_str(">")?;
            }
            write!(f, "{}", self.end)?;
        }
        if self.reverse_complement {
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl FromStr for SubLocation {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<SubLocation, FormatError> {
        SubLocation::parse(s)
    }
}

/// A feature position: one or several sub-locations in join order, with the
/// aggregate bounds and strand derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Smallest sub-location start.
    pub start: i64,
    /// Largest sub-location end.
    pub end: i64,
    /// `+1` for the direct strand, `-1` for the reverse strand.
    pub strand: i8,
    /// Whether the whole location was wrapped in `complement(...)`.
    pub reverse_complement: bool,
    /// The ordered sub-locations; the order is the join order, never sorted.
    pub sub_locations: Vec<SubLocation>,
}

/// Split a `join(...)` group on commas, leaving commas nested inside
/// parentheses alone.
fn split_group(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0u32;
    let mut rest = 0;
    for (i, b) in s.bytes().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(&s[rest..i]);
                rest = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[rest..]);
    parts
}

impl Location {
    /// A simple location: one plain sub-location covering `start..end`.
    pub fn new(start: i64, end: i64, reverse_complement: bool) -> Result<Location, FormatError> {
        if start > end {
            return Err(FormatError::StartAfterEnd(format!("{start}..{end}")));
        }
        Ok(Location {
            start,
            end,
            strand: if reverse_complement { -1 } else { 1 },
            reverse_complement,
            sub_locations: vec![SubLocation::new(start, end)],
        })
    }

    /// Parse a full location expression
    /// (see the INSDC rules: https://www.insdc.org/documents/feature-table#3.4).
    ///
    /// The outermost `complement(...)` wrapper belongs to the location; a
    /// `join(...)` group below it holds the sub-locations, each of which may
    /// carry its own `complement(...)`.
    pub fn parse(s: &str) -> Result<Location, FormatError> {
        let mut loc = Location {
            start: 0,
            end: 0,
            strand: 1,
            reverse_complement: false,
            sub_locations: Vec::new(),
        };

        let mut inner = s;
        if inner.starts_with("complement(") {
            inner = inner
                .strip_prefix("complement(")
                .and_then(|rest| rest.strip_suffix(')'))
                .ok_or_else(|| FormatError::UnmatchedComplement(s.to_string()))?;
            loc.reverse_complement = true;
            loc.strand = -1;
        }

        if let Some(group) = inner
            .strip_prefix("join(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            for token in split_group(group) {
                loc.sub_locations.push(SubLocation::parse(token)?);
            }
            loc.update_extents();
        } else {
            let sub = SubLocation::parse(inner)?;
            loc.start = sub.start;
            loc.end = sub.end;
            if sub.reverse_complement {
                loc.strand *= -1;
            }
            loc.sub_locations.push(sub);
        }

        Ok(loc)
    }

    /// Recompute the aggregate start, end and strand from the sub-locations.
    ///
    /// The strand is derived from the location-level wrapper and the FIRST
    /// sub-location only; a complemented first sub-location inside a
    /// complemented location cancels back to the direct strand. Further
    /// sub-location flags only matter for serialization.
    fn update_extents(&mut self) {
        let mut start = self.sub_locations[0].start;
        let mut end = self.sub_locations[0].end;
        for sub in &self.sub_locations[1..] {
            start = start.min(sub.start);
            end = end.max(sub.end);
        }
        self.start = start;
        self.end = end;

        let first_rc = self.sub_locations[0].reverse_complement;
        self.strand = if self.reverse_complement != first_rc {
            -1
        } else {
            1
        };
    }

    pub fn sub_count(&self) -> usize {
        self.sub_locations.len()
    }

    /// Span of the whole location, gaps between sub-locations included.
    pub fn length(&self) -> i64 {
        self.end - self.start + 1
    }

    /// Sum of the sub-location spans, gaps excluded. Equals `length()` for a
    /// single sub-location.
    pub fn spliced_length(&self) -> i64 {
        self.sub_locations
            .iter()
            .map(|sub| sub.end - sub.start + 1)
            .sum()
    }

    /// Move every coordinate by `offset`, as after an insertion or deletion
    /// upstream of the feature. Boundary flags and join order are untouched.
    pub fn add_bases(&mut self, offset: i64) {
        for sub in &mut self.sub_locations {
            sub.shift(offset);
        }
        self.update_extents();
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reverse_complement {
            f.write_str("complement(")?;
        }
        if self.sub_locations.len() > 1 {
            f.write_str("join(")?;
        }
        for (i, sub) in self.sub_locations.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{sub}")?;
        }
        if self.sub_locations.len() > 1 {
            f.write_str(")")?;
        }
        if self.reverse_complement {
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl FromStr for Location {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Location, FormatError> {
        Location::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUND_TRIP: &[&str] = &[
        "500..1000",
        "complement(23..45)",
        "<10..34",
        "56..>1025",
        "1.2",
        "4875^5000",
        "complement(<1..>38)",
        "1",
        "58467542316548",
        "join(2..100,300..433)",
        "complement(join(13..234,400..1000))",
        "join(complement(400..1000),complement(13..234))",
        "complement(join(complement(400..1000),complement(13..234)))",
        "join(<1..200,300..400,500)",
        "complement(complement(23..45))",
    ];

    #[test]
    fn sub_location_round_trip() {
        for s in [
            "500..1000",
            "complement(23..45)",
            "<10..34",
            "56..>1025",
            "1.2",
            "4875^5000",
            "complement(<1..>38)",
            "1",
            "58467542316548",
        ] {
            let sub = SubLocation::parse(s).unwrap();
            assert_eq!(sub.to_string(), s);
        }
    }

    #[test]
    fn sub_location_fields() {
        let sub = SubLocation::parse("<10..>34").unwrap();
        assert_eq!(sub.start, 10);
        assert_eq!(sub.end, 34);
        assert!(sub.unknown_start);
        assert!(sub.unknown_end);
        assert!(!sub.single_base);

        let sub = SubLocation::parse("122^123").unwrap();
        assert!(sub.between_bases);
        assert!(!sub.inexact);

        let sub = SubLocation::parse("122.330").unwrap();
        assert!(sub.inexact);
        assert!(!sub.between_bases);

        let sub = SubLocation::parse("122").unwrap();
        assert_eq!((sub.start, sub.end), (122, 122));
        assert!(sub.single_base);
    }

    #[test]
    fn location_round_trip() {
        for s in ROUND_TRIP {
            let loc = Location::parse(s).unwrap();
            assert_eq!(loc.to_string(), *s, "failed to reproduce '{s}'");
        }
    }

    #[test]
    fn reparse_is_structurally_identical() {
        for s in ROUND_TRIP {
            let first = Location::parse(s).unwrap();
            let second = Location::parse(&first.to_string()).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn rejects_bad_characters() {
        assert!(matches!(
            SubLocation::parse("234..2O0"),
            Err(FormatError::InvalidCharacter(_))
        ));
        assert!(matches!(
            Location::parse("234..2O0"),
            Err(FormatError::InvalidCharacter(_))
        ));
        assert!(matches!(
            SubLocation::parse(""),
            Err(FormatError::InvalidCharacter(_))
        ));
    }

    #[test]
    fn rejects_start_after_end() {
        for s in ["300..200", "5.2", "9^3", "complement(45..23)"] {
            assert!(
                matches!(Location::parse(s), Err(FormatError::StartAfterEnd(_))),
                "'{s}' should be rejected"
            );
        }
    }

    #[test]
    fn rejects_unsupported_forms() {
        for s in ["1..2..3", "<5", "1..", "..5", "1.2.3"] {
            assert!(
                matches!(SubLocation::parse(s), Err(FormatError::UnsupportedFormat(_))),
                "'{s}' should be rejected"
            );
        }
    }

    #[test]
    fn rejects_unterminated_complement() {
        assert!(matches!(
            SubLocation::parse("complement(23..45"),
            Err(FormatError::UnmatchedComplement(_))
        ));
        assert!(matches!(
            Location::parse("complement(1..5"),
            Err(FormatError::UnmatchedComplement(_))
        ));
        // the dangling wrapper leaks into the join body and is caught there
        assert!(Location::parse("complement(join(1..2,4..5)").is_err());
    }

    #[test]
    fn rejects_coordinate_overflow() {
        assert!(matches!(
            SubLocation::parse("99999999999999999999"),
            Err(FormatError::CoordinateOverflow(_))
        ));
    }

    #[test]
    fn error_carries_the_offending_token() {
        let err = Location::parse("234..2O0").unwrap_err();
        assert!(err.to_string().contains("234..2O0"));
    }

    #[test]
    fn aggregate_bounds() {
        let loc = Location::parse("complement(join(13..234,400..1000))").unwrap();
        assert_eq!(loc.start, 13);
        assert_eq!(loc.end, 1000);
        assert_eq!(loc.strand, -1);
        assert_eq!(loc.sub_count(), 2);
        assert!(loc.reverse_complement);
    }

    #[test]
    fn strand_composition() {
        assert_eq!(Location::parse("23..45").unwrap().strand, 1);
        assert_eq!(Location::parse("complement(23..45)").unwrap().strand, -1);
        // complement of a complemented sub-location lands back on the
        // direct strand
        assert_eq!(
            Location::parse("complement(complement(23..45))").unwrap().strand,
            1
        );
        assert_eq!(
            Location::parse("join(complement(400..1000),complement(13..234))")
                .unwrap()
                .strand,
            -1
        );
        assert_eq!(
            Location::parse("complement(join(complement(400..1000),complement(13..234)))")
                .unwrap()
                .strand,
            1
        );
        assert_eq!(
            Location::parse("complement(join(13..234,400..1000))")
                .unwrap()
                .strand,
            -1
        );
    }

    #[test]
    fn length_and_spliced_length() {
        let loc = Location::parse("100..200").unwrap();
        assert_eq!(loc.length(), 101);
        assert_eq!(loc.spliced_length(), 101);

        let loc = Location::parse("join(2..100,300..433)").unwrap();
        assert_eq!(loc.length(), 432);
        assert_eq!(loc.spliced_length(), 300);

        let loc = Location::parse("complement(join(13..234,400..1000))").unwrap();
        assert_eq!(loc.length(), 988);
    }

    #[test]
    fn add_bases_shifts_every_sub_location() {
        let mut loc = Location::parse("join(<201..210,400)").unwrap();
        assert_eq!(loc.spliced_length(), 11);

        loc.add_bases(100);
        assert_eq!(loc.to_string(), "join(<301..310,500)");
        assert_eq!(loc.start, 301);
        assert_eq!(loc.end, 500);
        assert_eq!(loc.spliced_length(), 11);

        loc.add_bases(-100);
        assert_eq!(loc.to_string(), "join(<201..210,400)");
    }

    #[test]
    fn simple_constructor() {
        let loc = Location::new(10, 20, true).unwrap();
        assert_eq!(loc.start, 10);
        assert_eq!(loc.end, 20);
        assert_eq!(loc.strand, -1);
        assert_eq!(loc.sub_count(), 1);
        assert_eq!(loc.to_string(), "complement(10..20)");

        assert!(matches!(
            Location::new(20, 10, false),
            Err(FormatError::StartAfterEnd(_))
        ));
    }

    #[test]
    fn shift_moves_both_coordinates() {
        let mut sub = SubLocation::parse("<10..34").unwrap();
        sub.shift(5);
        assert_eq!(sub.to_string(), "<15..39");
        sub.shift(-14);
        assert_eq!(sub.to_string(), "<1..25");
    }

    #[test]
    fn join_commas_do_not_split_nested_complements() {
        let loc = Location::parse("join(complement(400..1000),complement(13..234))").unwrap();
        assert_eq!(loc.sub_count(), 2);
        assert_eq!(loc.sub_locations[0].to_string(), "complement(400..1000)");
        assert_eq!(loc.sub_locations[1].to_string(), "complement(13..234)");
    }

    #[test]
    fn rejects_empty_join_member() {
        assert!(Location::parse("join(1..2,,5..6)").is_err());
        assert!(Location::parse("join()").is_err());
    }
}
