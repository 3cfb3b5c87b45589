use thiserror::Error;

/// An enum declaration that cannot be turned into an [`EnumMap`][crate::EnumMap].
///
/// These are reported when the map of a type is first built and are cached afterwards, so every
/// later lookup of the same type returns the same error.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum EnumMapError {
    /// The type is declared both as a string enum and as a flags enum.
    #[error("{type_name} cannot be both a string enum and a flags enum")]
    StringFlagsConflict {
        /// Name of the enum type.
        type_name: &'static str,
    },
    /// Two enumerators with different values share a key that is used for reading.
    #[error("{type_name}: key {key:?} is read as more than one value")]
    DuplicateKey {
        /// Name of the enum type.
        type_name: &'static str,
        /// The shared key.
        key: &'static str,
    },
    /// A value has more than one distinct key that is used for writing.
    #[error("{type_name}: enumerator {name} has more than one write key")]
    DuplicateValue {
        /// Name of the enum type.
        type_name: &'static str,
        /// Name of the enumerator declaring the second key.
        name: &'static str,
    },
}
