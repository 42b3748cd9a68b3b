use std::collections::HashSet;

use petgraph::graph::{NodeIndex, UnGraph};

use crate::network::types::{Relationship, User, UserId};

/// An undirected graph of users whose edges are relationships of type `R`. Node indices coincide
/// with user IDs, and edges iterate in insertion order.
#[derive(Debug, Clone)]
pub struct Topology<R> {
    pub(crate) graph: UnGraph<User, R>,
}

impl<R> Topology<R>
where
    R: Relationship + Clone,
{
    /// Creates a topology from a list of users and relationships. This function returns an error
    /// if the given lists fail to produce a valid topology.
    ///
    /// Correctness properties:
    ///
    /// - Every user must have a unique ID.
    /// - User IDs must be dense, i.e. the user at position `i` has ID `i`.
    /// - Every relationship must have distinct endpoints in `users`.
    /// - For any two users, there must be at most one relationship between them.
    pub fn new(users: &[User], relationships: &[R]) -> Result<Self, TopologyError> {
        let mut topology = Self::with_users(users.to_vec())?;
        for r in relationships {
            let (a, b) = (r.a(), r.b());
            // CORRECTNESS: Every relationship must have distinct endpoints in `users`.
            if a == b {
                return Err(TopologyError::SelfRelationship(a));
            }
            if !topology.is_declared(a) {
                return Err(TopologyError::UndeclaredUser(a));
            }
            if !topology.is_declared(b) {
                return Err(TopologyError::UndeclaredUser(b));
            }
            // CORRECTNESS: For any two users, there must be at most one relationship between them.
            if topology.contains(a, b) {
                return Err(TopologyError::DuplicateRelationship { a, b });
            }
            topology.push(r.clone());
        }
        Ok(topology)
    }

    /// Adds a relationship.
    ///
    /// PRECONDITION: both endpoints are declared and the pair is not already present.
    pub(crate) fn push(&mut self, r: R) {
        let (a, b) = (idx(r.a()), idx(r.b()));
        self.graph.add_edge(a, b, r);
    }
}

impl<R> Topology<R> {
    /// Creates a topology with no relationships.
    pub(crate) fn with_users(users: Vec<User>) -> Result<Self, TopologyError> {
        let mut seen = HashSet::new();
        let mut g = UnGraph::with_capacity(users.len(), 0);
        for (i, user) in users.into_iter().enumerate() {
            // CORRECTNESS: Every user must have a unique ID.
            if !seen.insert(user.id) {
                return Err(TopologyError::DuplicateUserId(user.id));
            }
            // CORRECTNESS: User IDs must be dense.
            if user.id.inner() != i {
                return Err(TopologyError::SparseUserId {
                    expected: UserId::new(i),
                    got: user.id,
                });
            }
            g.add_node(user);
        }
        Ok(Self { graph: g })
    }

    pub fn is_declared(&self, id: UserId) -> bool {
        id.inner() < self.graph.node_count()
    }

    /// Returns true if `x` and `y` share a relationship.
    pub fn contains(&self, x: UserId, y: UserId) -> bool {
        self.is_declared(x) && self.is_declared(y) && self.graph.find_edge(idx(x), idx(y)).is_some()
    }

    pub fn relationship(&self, x: UserId, y: UserId) -> Option<&R> {
        if !(self.is_declared(x) && self.is_declared(y)) {
            return None;
        }
        self.graph
            .find_edge(idx(x), idx(y))
            .and_then(|e| self.graph.edge_weight(e))
    }

    /// The number of relationships `id` takes part in.
    pub fn degree(&self, id: UserId) -> usize {
        if !self.is_declared(id) {
            return 0;
        }
        self.graph.edges(idx(id)).count()
    }

    /// Realized degrees, indexed by user ID.
    pub fn degrees(&self) -> Vec<usize> {
        self.graph
            .node_indices()
            .map(|i| self.graph.edges(i).count())
            .collect()
    }

    /// Returns a topology over the same users whose relationships are produced by `f`, in the
    /// same order.
    pub fn map_relationships<S>(&self, mut f: impl FnMut(&R) -> S) -> Topology<S> {
        Topology {
            graph: self.graph.map(|_, user| user.clone(), |_, r| f(r)),
        }
    }

    delegate::delegate! {
        to self.graph {
            #[call(node_weights)]
            pub fn users(&self) -> impl Iterator<Item = &User>;

            #[call(edge_weights)]
            pub fn relationships(&self) -> impl Iterator<Item = &R>;

            #[call(node_count)]
            pub fn nr_users(&self) -> usize;

            #[call(edge_count)]
            pub fn nr_relationships(&self) -> usize;
        }
    }
}

fn idx(id: UserId) -> NodeIndex {
    NodeIndex::new(id.inner())
}

#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("Duplicate user ID {0}")]
    DuplicateUserId(UserId),

    #[error("User IDs must be dense (expected {expected}, got {got})")]
    SparseUserId { expected: UserId, got: UserId },

    #[error("User {0} is in a relationship with itself")]
    SelfRelationship(UserId),

    #[error("User {0} is not declared")]
    UndeclaredUser(UserId),

    #[error("Duplicate relationships between {a} and {b}")]
    DuplicateRelationship { a: UserId, b: UserId },

    #[error("Got {targets} degree targets for {users} users")]
    DegreeMismatch { users: usize, targets: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::types::Link;
    use crate::testing;

    fn link(a: usize, b: usize) -> Link {
        Link::new(UserId::new(a), UserId::new(b))
    }

    #[test]
    fn empty_topology_succeeds() {
        assert!(
            Topology::<Link>::new(&[], &[]).is_ok(),
            "failed to create empty topology"
        );
    }

    #[test]
    fn four_user_topology_succeeds() -> anyhow::Result<()> {
        let (users, links) = testing::four_user_config();
        let topology = Topology::new(&users, &links)?;
        assert_eq!(topology.nr_users(), 4);
        assert_eq!(topology.nr_relationships(), 2);
        assert_eq!(topology.degrees(), vec![1, 2, 1, 0]);
        assert!(topology.contains(UserId::new(1), UserId::new(0)));
        assert!(!topology.contains(UserId::new(0), UserId::new(2)));
        assert!(!topology.contains(UserId::new(0), UserId::new(100)));
        Ok(())
    }

    #[test]
    fn isolated_users_are_allowed() {
        let users = User::population(3);
        let res = Topology::new(&users, &[link(0, 1)]);
        assert!(res.is_ok());
    }

    #[test]
    fn relationships_keep_insertion_order() -> anyhow::Result<()> {
        let users = User::population(4);
        let links = [link(2, 3), link(0, 1), link(1, 3)];
        let topology = Topology::new(&users, &links)?;
        let got = topology.relationships().copied().collect::<Vec<_>>();
        assert_eq!(got, links);
        Ok(())
    }

    #[test]
    fn duplicate_user_fails() {
        let users = vec![User::new(UserId::new(0)), User::new(UserId::new(0))];
        let res = Topology::<Link>::new(&users, &[]);
        assert!(matches!(res, Err(TopologyError::DuplicateUserId(..))));
    }

    #[test]
    fn sparse_user_ids_fail() {
        let users = vec![User::new(UserId::new(0)), User::new(UserId::new(2))];
        let res = Topology::<Link>::new(&users, &[]);
        assert!(matches!(res, Err(TopologyError::SparseUserId { .. })));
    }

    #[test]
    fn self_relationship_fails() {
        let users = User::population(3);
        let res = Topology::new(&users, &[link(0, 1), link(2, 2)]);
        assert!(matches!(res, Err(TopologyError::SelfRelationship(..))));
    }

    #[test]
    fn undeclared_user_fails() {
        let users = User::population(3);
        let res = Topology::new(&users, &[link(0, 1), link(1, 3)]);
        assert!(matches!(res, Err(TopologyError::UndeclaredUser(..))));
    }

    #[test]
    fn duplicate_relationships_fail() {
        let users = User::population(3);
        let res = Topology::new(&users, &[link(0, 1), link(1, 2), link(2, 1)]);
        assert!(matches!(
            res,
            Err(TopologyError::DuplicateRelationship { .. })
        ));
    }
}
