use crate::units::Coins;

identifier!(UserId, usize);

/// A synthetic ledger user.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct User {
    pub id: UserId,
    pub label: String,
}

impl User {
    /// Creates a user with the default `User{id}` label.
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            label: format!("User{id}"),
        }
    }

    pub fn with_label(id: UserId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }

    /// Creates `n` users with dense IDs `0..n`.
    pub fn population(n: usize) -> Vec<Self> {
        (0..n).map(|i| Self::new(UserId::new(i))).collect()
    }
}

/// The endpoints of a relationship between two users.
pub trait Relationship {
    fn a(&self) -> UserId;

    fn b(&self) -> UserId;

    /// Returns true if the relationship connects `x` and `y`, in either order.
    fn connects(&self, x: UserId, y: UserId) -> bool {
        self.a() == x && self.b() == y || self.a() == y && self.b() == x
    }

    fn link(&self) -> Link {
        Link::new(self.a(), self.b())
    }
}

// All relationships just copy these fields
macro_rules! relationship_impl {
    ($name: ty) => {
        impl Relationship for $name {
            fn a(&self) -> UserId {
                self.a
            }

            fn b(&self) -> UserId {
                self.b
            }
        }
    };
}

/// An unfunded relationship. The endpoints are stored in canonical order (`a <= b`), so two
/// links over the same unordered pair compare equal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Link {
    pub a: UserId,
    pub b: UserId,
}

impl Link {
    pub fn new(x: UserId, y: UserId) -> Self {
        Self {
            a: std::cmp::min(x, y),
            b: std::cmp::max(x, y),
        }
    }

    pub fn is_loop(&self) -> bool {
        self.a == self.b
    }
}

relationship_impl!(Link);

impl std::fmt::Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}

/// A relationship together with the capacity funded when it is opened.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FundedLink {
    pub a: UserId,
    pub b: UserId,
    pub capacity: Coins,
}

impl FundedLink {
    pub fn new(x: UserId, y: UserId, capacity: Coins) -> Self {
        let Link { a, b } = Link::new(x, y);
        Self { a, b, capacity }
    }

    pub(crate) fn from_link(link: &Link, capacity: Coins) -> Self {
        Self {
            a: link.a,
            b: link.b,
            capacity,
        }
    }
}

relationship_impl!(FundedLink);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_are_canonical() {
        let l1 = Link::new(UserId::new(3), UserId::new(1));
        let l2 = Link::new(UserId::new(1), UserId::new(3));
        assert_eq!(l1, l2);
        assert_eq!((l1.a, l1.b), (UserId::new(1), UserId::new(3)));
        assert!(l1.connects(UserId::new(3), UserId::new(1)));
        assert!(!l1.connects(UserId::new(3), UserId::new(2)));
    }

    #[test]
    fn default_labels() {
        let users = User::population(3);
        assert_eq!(users.len(), 3);
        assert_eq!(users[2].label, "User2");
        assert_eq!(users[2].id, UserId::new(2));
    }
}
