/// Compute effective limit with precedence: global flag -> config fallback.
#[must_use]
pub fn effective_limit(global: Option<u32>, fallback: u32) -> u32 {
    global.filter(|limit| *limit > 0).unwrap_or(fallback)
}

/// The global flag as a cap for commands that list everything by default.
/// `0` means unset, as in [`effective_limit`].
#[must_use]
pub fn explicit_limit(global: Option<u32>) -> Option<usize> {
    global
        .filter(|limit| *limit > 0)
        .and_then(|limit| usize::try_from(limit).ok())
}

#[cfg(test)]
mod tests {
    use super::{effective_limit, explicit_limit};

    #[test]
    fn explicit_limit_ignores_zero() {
        assert_eq!(explicit_limit(Some(3)), Some(3));
        assert_eq!(explicit_limit(Some(0)), None);
        assert_eq!(explicit_limit(None), None);
    }

    #[test]
    fn flag_takes_precedence() {
        assert_eq!(effective_limit(Some(5), 20), 5);
    }

    #[test]
    fn fallback_used_when_unset() {
        assert_eq!(effective_limit(None, 20), 20);
    }

    #[test]
    fn zero_falls_back() {
        assert_eq!(effective_limit(Some(0), 20), 20);
    }
}
