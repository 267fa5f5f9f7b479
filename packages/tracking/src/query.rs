//! Parsing of the free-text search box into tracking numbers.

/// The distinct tracking numbers of one search submission, in input order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackingQuery {
    numbers: Vec<String>,
}

impl TrackingQuery {
    /// Split `input` on commas, trim each segment, drop empty segments and
    /// repeated numbers (the first occurrence wins).
    pub fn parse(input: &str) -> Self {
        let mut numbers: Vec<String> = Vec::new();
        for segment in input.split(',') {
            let number = segment.trim();
            if number.is_empty() || numbers.iter().any(|n| n == number) {
                continue;
            }
            numbers.push(number.to_string());
        }
        Self { numbers }
    }

    pub fn numbers(&self) -> &[String] {
        &self.numbers
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_number() {
        let query = TrackingQuery::parse("  3543264550 ");
        assert_eq!(query.numbers(), ["3543264550"]);
    }

    #[test]
    fn test_drops_empty_segments() {
        let query = TrackingQuery::parse("A1, ,B2,,  ,C3,");
        assert_eq!(query.numbers(), ["A1", "B2", "C3"]);
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert!(TrackingQuery::parse("").is_empty());
        assert!(TrackingQuery::parse(" ,  , ").is_empty());
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let query = TrackingQuery::parse("B2, A1, B2 ,A1");
        assert_eq!(query.numbers(), ["B2", "A1"]);
        assert_eq!(query.len(), 2);
    }
}
