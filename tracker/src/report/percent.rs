/// Share of closed items as a whole percentage
///
/// Nothing closed is 0 and nothing open is 100. Otherwise
/// `100 * closed / (open + closed)` rounded half away from zero.
pub fn percent_complete(open: u64, closed: u64) -> u64 {
    if closed == 0 {
        return 0;
    }
    if open == 0 {
        return 100;
    }
    let total = open + closed;
    (closed * 200 + total) / (total * 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        assert_eq!(percent_complete(0, 0), 0);
        assert_eq!(percent_complete(5, 0), 0);
        assert_eq!(percent_complete(0, 5), 100);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(percent_complete(1, 2), 67);
        assert_eq!(percent_complete(2, 1), 33);
        assert_eq!(percent_complete(3, 1), 25);
        // 12.5 rounds up
        assert_eq!(percent_complete(7, 1), 13);
        // 99.5 rounds up to 100 even with one item still open
        assert_eq!(percent_complete(1, 199), 100);
    }
}
