//! Random construction of a simple graph that approximates a degree sequence.

use log::debug;
use rand::Rng;

use crate::network::{
    topology::{Topology, TopologyError},
    types::{Link, User, UserId},
};

/// Builds a topology over `users` whose degrees approximate `targets`.
///
/// Users are visited in ID order. Each user draws uniformly random peers, skipping itself and
/// peers it is already connected to, until it has added as many new relationships as its target.
/// Relationships added by earlier users do not count towards a later user's target, so realized
/// degrees can exceed their targets.
///
/// A user's target is capped at the number of peers it is not yet connected to when its turn
/// comes, which guarantees termination. In particular a single user gets no relationships.
pub fn build<R>(
    users: Vec<User>,
    targets: &[usize],
    rng: &mut R,
) -> Result<Topology<Link>, TopologyError>
where
    R: Rng + ?Sized,
{
    if users.len() != targets.len() {
        return Err(TopologyError::DegreeMismatch {
            users: users.len(),
            targets: targets.len(),
        });
    }
    let n = users.len();
    let mut topology = Topology::with_users(users)?;
    for (i, &target) in targets.iter().enumerate() {
        let me = UserId::new(i);
        let free = n - 1 - topology.degree(me);
        let mut remaining = std::cmp::min(target, free);
        if remaining < target {
            debug!("User {me} wants {target} new relationships but only {free} peers are free");
        }
        while remaining > 0 {
            let peer = UserId::new(rng.gen_range(0..n));
            if peer == me || topology.contains(me, peer) {
                continue;
            }
            topology.push(Link::new(me, peer));
            remaining -= 1;
        }
    }
    Ok(topology)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::prelude::*;

    use super::*;
    use crate::degree;
    use crate::network::types::Relationship;

    fn power_law_topology(n: usize, exponent: f64, seed: u64) -> anyhow::Result<Topology<Link>> {
        let mut rng = StdRng::seed_from_u64(seed);
        let targets = degree::power_law_sequence(n, exponent, &mut rng)?;
        Ok(build(User::population(n), &targets, &mut rng)?)
    }

    #[test]
    fn graphs_are_simple() -> anyhow::Result<()> {
        for seed in 0..20 {
            let topology = power_law_topology(100, 2.5, seed)?;
            let mut seen = HashSet::new();
            for r in topology.relationships() {
                assert_ne!(r.a(), r.b(), "self-loop in seed {seed}");
                assert!(r.a() < r.b(), "non-canonical link in seed {seed}");
                assert!(seen.insert(*r), "duplicate link {r} in seed {seed}");
            }
        }
        Ok(())
    }

    #[test]
    fn early_users_meet_their_capped_targets() -> anyhow::Result<()> {
        let n = 10;
        let targets = vec![3, 20, 1, 1, 1, 1, 1, 1, 1, 1];
        let mut rng = StdRng::seed_from_u64(7);
        let topology = build(User::population(n), &targets, &mut rng)?;
        // The first user's turn adds exactly its target, all of them its own.
        let first = topology.relationships().take(3).collect::<Vec<_>>();
        assert!(first.iter().all(|r| r.a() == UserId::new(0)));
        // Later users may still pick it as a peer.
        assert!(topology.degree(UserId::new(0)) >= 3);
        // The second user's target is capped at the peers it can still reach.
        assert_eq!(topology.degree(UserId::new(1)), n - 1);
        // Every later user ends up with at least its target.
        for i in 2..n {
            assert!(topology.degree(UserId::new(i)) >= targets[i]);
        }
        Ok(())
    }

    #[test]
    fn realized_degree_can_exceed_target() -> anyhow::Result<()> {
        let n = 5;
        let targets = vec![4, 1, 1, 1, 1];
        let mut rng = StdRng::seed_from_u64(0);
        let topology = build(User::population(n), &targets, &mut rng)?;
        // User 0 connects to everyone, then every other user adds one relationship of its own.
        assert_eq!(topology.degree(UserId::new(0)), 4);
        assert!(topology.degrees()[1..].iter().all(|&d| d >= 2));
        Ok(())
    }

    #[test]
    fn single_user_has_no_relationships() -> anyhow::Result<()> {
        let topology = power_law_topology(1, 2.5, 0)?;
        assert_eq!(topology.nr_users(), 1);
        assert_eq!(topology.nr_relationships(), 0);
        Ok(())
    }

    #[test]
    fn saturated_pair_terminates() -> anyhow::Result<()> {
        let mut rng = StdRng::seed_from_u64(0);
        let topology = build(User::population(2), &[50, 50], &mut rng)?;
        assert_eq!(topology.nr_relationships(), 1);
        Ok(())
    }

    #[test]
    fn empty_population_is_empty() -> anyhow::Result<()> {
        let mut rng = StdRng::seed_from_u64(0);
        let topology = build(Vec::new(), &[], &mut rng)?;
        assert_eq!(topology.nr_users(), 0);
        Ok(())
    }

    #[test]
    fn mismatched_targets_fail() {
        let mut rng = StdRng::seed_from_u64(0);
        let res = build(User::population(3), &[1, 1], &mut rng);
        assert!(matches!(res, Err(TopologyError::DegreeMismatch { .. })));
    }

    #[test]
    fn same_seed_same_topology() -> anyhow::Result<()> {
        let t1 = power_law_topology(50, 2.1, 42)?;
        let t2 = power_law_topology(50, 2.1, 42)?;
        let l1 = t1.relationships().copied().collect::<Vec<_>>();
        let l2 = t2.relationships().copied().collect::<Vec<_>>();
        assert_eq!(l1, l2);
        Ok(())
    }
}
