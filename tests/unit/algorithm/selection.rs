//! Tests for the Bernoulli gate, weighted draws and shuffling

#[cfg(test)]
mod tests {
    use traitloom::algorithm::selection::RandomSelector;

    const TRIALS: usize = 10_000;

    // Verified by drawing uniformly instead of by weight
    #[test]
    fn test_choose_follows_weights() {
        let mut selector = RandomSelector::new(7);
        let table = vec![("a".to_string(), 10.0), ("b".to_string(), 90.0)];

        let hits = (0..TRIALS)
            .filter(|_| selector.choose(&table) == Some("b"))
            .count();
        let share = hits as f64 / TRIALS as f64;

        assert!(
            (0.85..=0.95).contains(&share),
            "Expected b in 85-95% of draws, got {share}"
        );
    }

    // Verified by falling back to the first index on empty input
    #[test]
    fn test_degenerate_tables_select_nothing() {
        let mut selector = RandomSelector::new(1);
        assert_eq!(selector.choose(&[]), None);
        assert_eq!(selector.weighted_choice(&[0.0, 0.0]), None);
        assert_eq!(selector.weighted_choice(&[-5.0]), None);
    }

    // Verified by letting zero-weight entries absorb rounding leftovers
    #[test]
    fn test_zero_weights_are_never_chosen() {
        let mut selector = RandomSelector::new(3);
        for _ in 0..1_000 {
            assert_eq!(selector.weighted_choice(&[0.0, 1.0, 0.0]), Some(1));
        }
    }

    // Verified by comparing with <= in the gate
    #[test]
    fn test_gate_bounds() {
        let mut selector = RandomSelector::new(11);
        assert!((0..TRIALS).all(|_| !selector.include(0.0)));
        assert!((0..TRIALS).all(|_| selector.include(100.0)));
        assert!((0..TRIALS).all(|_| selector.include(250.0)));
    }

    // Verified by scaling the gate draw to [0, 1)
    #[test]
    fn test_gate_includes_proportionally() {
        let mut selector = RandomSelector::new(5);
        let included = (0..TRIALS).filter(|_| selector.include(30.0)).count();
        let share = included as f64 / TRIALS as f64;
        assert!((0.27..=0.33).contains(&share), "got {share}");
    }

    // Verified by seeding from entropy
    #[test]
    fn test_same_seed_same_sequence() {
        let table = vec![
            ("a".to_string(), 1.0),
            ("b".to_string(), 1.0),
            ("c".to_string(), 1.0),
        ];
        let mut first = RandomSelector::new(99);
        let mut second = RandomSelector::new(99);

        let a: Vec<_> = (0..50).map(|_| first.choose(&table)).collect();
        let b: Vec<_> = (0..50).map(|_| second.choose(&table)).collect();
        assert_eq!(a, b);
    }

    // Verified by dropping elements during shuffle
    #[test]
    fn test_shuffle_and_between() {
        let mut selector = RandomSelector::new(2);
        let mut items = vec![1, 2, 3, 4, 5];
        selector.shuffle(&mut items);
        items.sort_unstable();
        assert_eq!(items, vec![1, 2, 3, 4, 5]);

        for _ in 0..100 {
            let value = selector.between(1, 4);
            assert!((1..=4).contains(&value));
        }
        assert_eq!(selector.between(7, 3), 7);
    }
}
