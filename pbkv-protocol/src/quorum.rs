//! Quorum values for read and write operations.
//!
//! A quorum is either a concrete replica count or one of four named policies.
//! The named policies travel as reserved integers near the top of the u32
//! range, which the server resolves against the bucket's replication factor.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Wire value for the `one` policy.
pub const QUORUM_ONE: u32 = 0xFFFF_FFFE;
/// Wire value for the `quorum` (majority) policy.
pub const QUORUM_QUORUM: u32 = 0xFFFF_FFFD;
/// Wire value for the `all` policy.
pub const QUORUM_ALL: u32 = 0xFFFF_FFFC;
/// Wire value for the bucket-default policy.
pub const QUORUM_DEFAULT: u32 = 0xFFFF_FFFB;

/// A replica-count requirement for a read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quorum {
    /// A concrete number of replicas.
    Count(u32),
    /// A single replica.
    One,
    /// A majority of replicas.
    Quorum,
    /// Every replica.
    All,
    /// Whatever the bucket is configured with.
    Default,
}

/// Raised when a symbolic quorum name is not one of the four known policies.
///
/// This is a caller error: it surfaces before any bytes are written.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid quorum symbol: {0:?}")]
pub struct InvalidQuorum(pub String);

impl Quorum {
    /// The integer transmitted on the wire.
    pub fn to_wire(self) -> u32 {
        match self {
            Quorum::Count(n) => n,
            Quorum::One => QUORUM_ONE,
            Quorum::Quorum => QUORUM_QUORUM,
            Quorum::All => QUORUM_ALL,
            Quorum::Default => QUORUM_DEFAULT,
        }
    }

    /// Maps a wire integer back to its policy, or a concrete count.
    pub fn from_wire(value: u32) -> Self {
        match value {
            QUORUM_ONE => Quorum::One,
            QUORUM_QUORUM => Quorum::Quorum,
            QUORUM_ALL => Quorum::All,
            QUORUM_DEFAULT => Quorum::Default,
            n => Quorum::Count(n),
        }
    }
}

impl From<u32> for Quorum {
    fn from(n: u32) -> Self {
        Quorum::Count(n)
    }
}

impl FromStr for Quorum {
    type Err = InvalidQuorum;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one" => Ok(Quorum::One),
            "quorum" => Ok(Quorum::Quorum),
            "all" => Ok(Quorum::All),
            "default" => Ok(Quorum::Default),
            other => other
                .parse::<u32>()
                .map(Quorum::Count)
                .map_err(|_| InvalidQuorum(other.to_string())),
        }
    }
}

impl fmt::Display for Quorum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quorum::Count(n) => write!(f, "{}", n),
            Quorum::One => write!(f, "one"),
            Quorum::Quorum => write!(f, "quorum"),
            Quorum::All => write!(f, "all"),
            Quorum::Default => write!(f, "default"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_wire_values() {
        assert_eq!(Quorum::One.to_wire(), 0xFFFF_FFFE);
        assert_eq!(Quorum::Quorum.to_wire(), 0xFFFF_FFFD);
        assert_eq!(Quorum::All.to_wire(), 0xFFFF_FFFC);
        assert_eq!(Quorum::Default.to_wire(), 0xFFFF_FFFB);
    }

    #[test]
    fn test_count_passes_through() {
        assert_eq!(Quorum::Count(3).to_wire(), 3);
        assert_eq!(Quorum::from_wire(3), Quorum::Count(3));
    }

    #[test]
    fn test_from_wire_sentinels() {
        assert_eq!(Quorum::from_wire(0xFFFF_FFFE), Quorum::One);
        assert_eq!(Quorum::from_wire(0xFFFF_FFFD), Quorum::Quorum);
        assert_eq!(Quorum::from_wire(0xFFFF_FFFC), Quorum::All);
        assert_eq!(Quorum::from_wire(0xFFFF_FFFB), Quorum::Default);
    }

    #[test]
    fn test_parse_symbols() {
        assert_eq!("one".parse::<Quorum>().unwrap(), Quorum::One);
        assert_eq!("quorum".parse::<Quorum>().unwrap(), Quorum::Quorum);
        assert_eq!("all".parse::<Quorum>().unwrap(), Quorum::All);
        assert_eq!("default".parse::<Quorum>().unwrap(), Quorum::Default);
        assert_eq!("3".parse::<Quorum>().unwrap(), Quorum::Count(3));
    }

    #[test]
    fn test_parse_rejects_unknown_symbol() {
        let err = "most".parse::<Quorum>().unwrap_err();
        assert_eq!(err, InvalidQuorum("most".to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Quorum::Quorum.to_string(), "quorum");
        assert_eq!(Quorum::Count(2).to_string(), "2");
    }
}
