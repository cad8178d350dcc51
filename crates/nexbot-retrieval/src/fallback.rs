use nexbot_core::{NexbotError, NexbotResult};
use rand::seq::SliceRandom;
use rand::Rng;

/// Pick one response uniformly at random. No memory of earlier picks.
///
/// An empty slice is a configuration error: callers install default
/// responses before ever reaching this point.
pub fn pick<'a, R: Rng + ?Sized>(responses: &'a [String], rng: &mut R) -> NexbotResult<&'a str> {
    responses
        .choose(rng)
        .map(String::as_str)
        .ok_or_else(|| NexbotError::ResourceMalformed("no responses to choose from".to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_pick_from_single() {
        let mut rng = StdRng::seed_from_u64(7);
        let responses = vec!["only".to_string()];
        assert_eq!(pick(&responses, &mut rng).unwrap(), "only");
    }

    #[test]
    fn test_pick_covers_all_responses() {
        let mut rng = StdRng::seed_from_u64(42);
        let responses: Vec<String> = ["a", "b", "c"].iter().map(|s| (*s).to_string()).collect();
        let seen: HashSet<&str> = (0..200).map(|_| pick(&responses, &mut rng).unwrap()).collect();
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_pick_same_seed_same_sequence() {
        let responses: Vec<String> = (0..10).map(|i| format!("r{i}")).collect();
        let mut r1 = StdRng::seed_from_u64(99);
        let mut r2 = StdRng::seed_from_u64(99);
        for _ in 0..20 {
            assert_eq!(pick(&responses, &mut r1).unwrap(), pick(&responses, &mut r2).unwrap());
        }
    }

    #[test]
    fn test_pick_empty_is_error() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(pick(&[], &mut rng).is_err());
    }
}
