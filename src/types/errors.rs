use std::fmt;

/// Possible errors returned by the constructors and the family-erased
/// methods of the tables. Lookups that find nothing, and inserts that
/// collide with an existing entry, are not errors: they return `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MrtError {
    /// The requested prefix length cannot exist for the address family,
    /// e.g. a /33 for IPv4.
    PrefixLengthInvalid,
    /// An address or prefix of one family was handed to a table, or
    /// combined with an address, of the other family.
    AddressFamilyMismatch,
    /// The configuration could not be parsed.
    ConfigInvalid,
}

impl std::error::Error for MrtError {}

impl fmt::Display for MrtError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MrtError::PrefixLengthInvalid => {
                write!(f, "Error: The specified Prefix length is invalid.")
            }
            MrtError::AddressFamilyMismatch => {
                write!(
                    f,
                    "Error: The address family of the address does not \
                    match the address family of the table or prefix."
                )
            }
            MrtError::ConfigInvalid => {
                write!(f, "Error: The configuration cannot be parsed.")
            }
        }
    }
}
