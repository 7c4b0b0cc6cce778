//! Privilege Modes.
//!
//! This module defines the two privilege levels of the target. It implements the following:
//! 1. **Mode Classification:** Kernel and user modes.
//! 2. **Serialization:** Conversion between the PSR `CMOD` field and enum variants.
//! 3. **Observability:** Human-readable naming and display formatting for privilege states.

/// Privilege mode levels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrivilegeMode {
    /// Kernel mode: full access, uses KSPR and KPDTR.
    #[default]
    Kernel = 0,

    /// User mode: needs the U permission on every page, uses USPR and PDTR.
    User = 3,
}

impl PrivilegeMode {
    /// Converts the two-bit `CMOD` field of the PSR to a privilege mode.
    ///
    /// # Arguments
    ///
    /// * `val` - The field value; zero is kernel, anything else is user.
    pub const fn from_u8(val: u8) -> Self {
        match val & 0x3 {
            0 => Self::Kernel,
            _ => Self::User,
        }
    }

    /// Converts a privilege mode to its `CMOD` field value.
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Returns `true` in user mode.
    pub const fn is_user(self) -> bool {
        matches!(self, Self::User)
    }

    /// Returns the human-readable name of the privilege mode.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Kernel => "Kernel",
            Self::User => "User",
        }
    }
}

impl std::fmt::Display for PrivilegeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
