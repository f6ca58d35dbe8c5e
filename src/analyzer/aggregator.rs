use crate::domain::BumpLevel;

/// Reduce per-commit decisions to the overall bump: the maximum level seen,
/// or `none` for an empty input. Order-insensitive.
pub fn aggregate<I>(levels: I) -> BumpLevel
where
    I: IntoIterator<Item = BumpLevel>,
{
    levels.into_iter().fold(BumpLevel::None, Ord::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_empty() {
        assert_eq!(aggregate(Vec::new()), BumpLevel::None);
    }

    #[test]
    fn test_aggregate_takes_maximum() {
        let levels = [BumpLevel::Patch, BumpLevel::Major, BumpLevel::Minor];
        assert_eq!(aggregate(levels), BumpLevel::Major);
    }

    #[test]
    fn test_aggregate_ignores_none() {
        let levels = [BumpLevel::None, BumpLevel::Patch, BumpLevel::None];
        assert_eq!(aggregate(levels), BumpLevel::Patch);
    }

    #[test]
    fn test_aggregate_is_order_insensitive() {
        let forward = [BumpLevel::Minor, BumpLevel::Patch, BumpLevel::None];
        let mut backward = forward;
        backward.reverse();
        assert_eq!(aggregate(forward), aggregate(backward));
    }
}
