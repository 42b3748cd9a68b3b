//! Monetary units. [`Coins`] are the real-valued, human-facing denomination used for
//! configuration and capacity draws; [`Amount`]s are integers in the ledger's smallest unit.

/// The number of smallest ledger units per coin on ledgers with 18 decimals.
pub const UNITS_PER_COIN: u128 = 1_000_000_000_000_000_000;

macro_rules! unit {
    ($name: ident, $inner: ty) => {
        #[derive(
            Debug,
            Default,
            Copy,
            Clone,
            PartialOrd,
            Ord,
            PartialEq,
            Eq,
            Hash,
            derive_more::Add,
            derive_more::Sub,
            derive_more::AddAssign,
            derive_more::SubAssign,
            derive_more::Sum,
            derive_more::FromStr,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub struct $name($inner);

        impl $name {
            pub const ZERO: $name = Self::new(0);
            pub const ONE: $name = Self::new(1);
            pub const MAX: $name = Self::new(<$inner>::MAX);

            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            pub const fn inner(self) -> $inner {
                self.0
            }

            pub fn checked_add(self, other: Self) -> Option<Self> {
                self.0.checked_add(other.0).map(Self)
            }

            pub fn checked_sub(self, other: Self) -> Option<Self> {
                self.0.checked_sub(other.0).map(Self)
            }
        }
    };
}

unit!(Amount, u128);

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}u", self.0)
    }
}

/// A real-valued amount of coins.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialOrd,
    PartialEq,
    derive_more::Add,
    derive_more::Sub,
    derive_more::Sum,
    derive_more::FromStr,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Coins(f64);

impl Coins {
    pub const ZERO: Coins = Self::new(0.0);
    pub const ONE: Coins = Self::new(1.0);

    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    pub const fn into_f64(self) -> f64 {
        self.0
    }

    /// Returns true if the amount is finite and strictly positive.
    pub fn is_positive(self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }

    /// Converts to the ledger's smallest unit, truncating any fractional unit. Negative and NaN
    /// amounts convert to zero, amounts too large to represent saturate.
    pub fn to_amount(self, units_per_coin: u128) -> Amount {
        Amount::new((self.0 * units_per_coin as f64) as u128)
    }
}

impl std::fmt::Display for Coins {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} coins", self.0)
    }
}
