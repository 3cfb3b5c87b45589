use std::{any::type_name, borrow::Cow, fmt, hash::Hash};

use voltaic::{ContentMap, Utf8Blob};
use zwohash::HashMap;

use crate::{registry, EnumMapError, Repr, UnderlyingKind};

/// Which conversions a declared key takes part in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Direction {
    /// The key is accepted when converting text to a value, but never written.
    Read,
    /// The key is written for its value, but not accepted when reading.
    Write,
    /// The key is used in both directions.
    #[default]
    Both,
}

impl Direction {
    /// Returns `true` for [`Read`][Self::Read] and [`Both`][Self::Both].
    #[inline]
    pub fn reads(self) -> bool {
        matches!(self, Self::Read | Self::Both)
    }

    /// Returns `true` for [`Write`][Self::Write] and [`Both`][Self::Both].
    #[inline]
    pub fn writes(self) -> bool {
        matches!(self, Self::Write | Self::Both)
    }
}

/// A declared enumerator of a [`MappedEnum`].
#[derive(Clone, Copy, Debug)]
pub struct Enumerator<E> {
    /// The name used as text form when no write key is declared.
    pub name: &'static str,
    /// The value of the enumerator.
    pub value: E,
    /// An explicit key replacing the name.
    pub key: Option<&'static str>,
    /// The conversions using `key`.
    pub direction: Direction,
}

impl<E> Enumerator<E> {
    /// An enumerator without an explicit key.
    pub fn new(name: &'static str, value: E) -> Self {
        Enumerator {
            name,
            value,
            key: None,
            direction: Direction::Both,
        }
    }

    /// Declares an explicit key used for the given conversions.
    pub fn key(self, key: &'static str, direction: Direction) -> Self {
        Enumerator {
            key: Some(key),
            direction,
            ..self
        }
    }
}

/// A type whose values convert to and from integers and text keys through an [`EnumMap`].
///
/// Implementors are usually transparent wrappers around their underlying integer, so that any
/// integer, including undeclared values and combinations of flags, is a valid value.
pub trait MappedEnum: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// The underlying integer type.
    type Repr: Repr;

    /// Whether values are serialized as their keys instead of their integers.
    const IS_STRING_ENUM: bool = false;
    /// Whether values are bitwise combinations of flags.
    const IS_FLAGS_ENUM: bool = false;

    /// The declared enumerators in declaration order.
    ///
    /// This is called once, when the map of the type is built.
    fn enumerators() -> Vec<Enumerator<Self>>;

    /// The value with the given underlying integer.
    fn from_repr(repr: Self::Repr) -> Self;

    /// The underlying integer.
    fn to_repr(self) -> Self::Repr;
}

/// Integer and text conversions for the values of a [`MappedEnum`].
///
/// A map is built once per type by [`EnumMap::get`] and lives for the rest of the process. It holds
/// the read keys in UTF-8 and UTF-16 form for decoding, and the write keys and names as
/// [`Utf8Blob`]s for encoding, so that no conversion needs to allocate unless a value has neither a
/// key nor a declared name.
#[derive(Debug)]
pub struct EnumMap<E: MappedEnum> {
    kind: UnderlyingKind,
    is_string_enum: bool,
    is_flags_enum: bool,
    read_utf8: ContentMap<E>,
    read_utf16: HashMap<Box<[u16]>, E>,
    write_keys: HashMap<E, Utf8Blob>,
    names: HashMap<E, Utf8Blob>,
    /// Distinct non-zero declared values by descending bits, for flags enums only.
    flag_values: Vec<(u64, E)>,
    max_value: u64,
}

impl<E: MappedEnum> EnumMap<E> {
    /// Returns the shared map of `E`, building it on first use.
    ///
    /// The map is built exactly once per type, even when first requested from several threads at
    /// once. A declaration error is returned by the first call and by every later call.
    pub fn get() -> Result<&'static Self, EnumMapError> {
        registry::slot::<E>()
            .get_or_init(|| {
                let map = Self::build();
                if let Err(err) = &map {
                    log::warn!("{}", err);
                }
                map
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Builds a new map from the declaration of `E`.
    ///
    /// Prefer [`EnumMap::get`], which builds the map only once.
    pub fn build() -> Result<Self, EnumMapError> {
        let type_name = type_name::<E>();
        if E::IS_STRING_ENUM && E::IS_FLAGS_ENUM {
            return Err(EnumMapError::StringFlagsConflict { type_name });
        }

        let mut map = EnumMap {
            kind: <E::Repr as Repr>::KIND,
            is_string_enum: E::IS_STRING_ENUM,
            is_flags_enum: E::IS_FLAGS_ENUM,
            read_utf8: ContentMap::new(),
            read_utf16: HashMap::default(),
            write_keys: HashMap::default(),
            names: HashMap::default(),
            flag_values: vec![],
            max_value: 0,
        };

        for Enumerator {
            name,
            value,
            key,
            direction,
        } in E::enumerators()
        {
            if let Some(non_negative) = value.to_repr().non_negative() {
                map.max_value = map.max_value.max(non_negative);
            }
            // Aliases keep the first declared name.
            map.names
                .entry(value)
                .or_insert_with(|| Utf8Blob::new(name));

            if map.is_flags_enum {
                let bits = map.bits(value);
                if bits != 0 && !map.flag_values.iter().any(|&(flag, _)| flag == bits) {
                    map.flag_values.push((bits, value));
                }
            }

            let Some(key) = key else {
                continue;
            };
            let blob = Utf8Blob::new(key);

            if direction.reads() {
                if let Some(previous) = map.read_utf8.insert(key.as_bytes(), value) {
                    if previous != value {
                        return Err(EnumMapError::DuplicateKey { type_name, key });
                    }
                }
                map.read_utf16.insert(blob.as_utf16().into(), value);
            }

            if direction.writes() {
                match map.write_keys.get(&value) {
                    Some(previous) if previous.as_str() != key => {
                        return Err(EnumMapError::DuplicateValue { type_name, name });
                    }
                    Some(_) => {}
                    None => {
                        map.write_keys.insert(value, blob);
                    }
                }
            }
        }

        map.flag_values.sort_by(|a, b| b.0.cmp(&a.0));

        log::debug!(
            "built enum map for {} ({:?}, {} read keys, {} write keys)",
            type_name,
            map.kind,
            map.read_utf8.len(),
            map.write_keys.len()
        );

        Ok(map)
    }

    /// Width and signedness of the underlying integer.
    #[inline]
    pub fn underlying_kind(&self) -> UnderlyingKind {
        self.kind
    }

    /// Whether values are serialized as their keys.
    #[inline]
    pub fn is_string_enum(&self) -> bool {
        self.is_string_enum
    }

    /// Whether values are bitwise combinations of flags.
    #[inline]
    pub fn is_flags_enum(&self) -> bool {
        self.is_flags_enum
    }

    /// Largest non-negative underlying value among the declared enumerators, `0` if there is none.
    #[inline]
    pub fn max_value(&self) -> u64 {
        self.max_value
    }

    /// The UTF-8 text form of `value`.
    ///
    /// This is the write key of `value` if one is declared, otherwise its default name.
    pub fn to_utf8_key(&self, value: E) -> Cow<'_, Utf8Blob> {
        match self.write_keys.get(&value) {
            Some(key) => Cow::Borrowed(key),
            None => self.default_name(value),
        }
    }

    /// The UTF-16 text form of `value`, see [`to_utf8_key`][Self::to_utf8_key].
    pub fn to_utf16_key(&self, value: E) -> Cow<'_, [u16]> {
        match self.to_utf8_key(value) {
            Cow::Borrowed(key) => Cow::Borrowed(key.as_utf16()),
            Cow::Owned(key) => Cow::Owned(key.as_str().encode_utf16().collect()),
        }
    }

    /// The value with the given UTF-8 read key.
    ///
    /// Always returns `None` for flags enums, as combinations of flags have no keys.
    pub fn try_from_key(&self, key: &[u8]) -> Option<E> {
        if self.is_flags_enum {
            return None;
        }
        self.read_utf8.get(key).copied()
    }

    /// The value with the given UTF-16 read key, see [`try_from_key`][Self::try_from_key].
    pub fn try_from_utf16_key(&self, key: &[u16]) -> Option<E> {
        if self.is_flags_enum {
            return None;
        }
        self.read_utf16.get(key).copied()
    }

    /// The value with the given underlying integer, truncated to the underlying width.
    #[inline]
    pub fn from_i64(&self, value: i64) -> E {
        E::from_repr(E::Repr::from_i64(value))
    }

    /// The underlying integer of `value`, sign extended for signed kinds.
    #[inline]
    pub fn to_i64(&self, value: E) -> i64 {
        value.to_repr().to_i64()
    }

    /// The value with the given underlying integer, truncated to the underlying width.
    #[inline]
    pub fn from_u64(&self, value: u64) -> E {
        E::from_repr(E::Repr::from_u64(value))
    }

    /// The underlying integer of `value`, sign extended for signed kinds.
    #[inline]
    pub fn to_u64(&self, value: E) -> u64 {
        value.to_repr().to_u64()
    }

    /// The underlying bits, without sign extension.
    fn bits(&self, value: E) -> u64 {
        value.to_repr().to_u64() & (u64::MAX >> (64 - self.kind.bits()))
    }

    fn default_name(&self, value: E) -> Cow<'_, Utf8Blob> {
        if let Some(name) = self.names.get(&value) {
            return Cow::Borrowed(name);
        }
        if self.is_flags_enum {
            if let Some(name) = self.flags_name(value) {
                return Cow::Owned(name);
            }
        }
        Cow::Owned(Utf8Blob::from(value.to_repr().to_string()))
    }

    /// Names `value` as a combination of declared values.
    ///
    /// Declared values are taken greedily from the largest one whose bits are all set in what
    /// remains, and listed in ascending order. Returns `None` if some bits stay uncovered.
    fn flags_name(&self, value: E) -> Option<Utf8Blob> {
        let mut remaining = self.bits(value);
        if remaining == 0 {
            return None;
        }
        let mut parts = vec![];
        for &(flag, flag_value) in &self.flag_values {
            if remaining & flag == flag {
                parts.push(self.names.get(&flag_value)?.as_str());
                remaining &= !flag;
                if remaining == 0 {
                    break;
                }
            }
        }
        if remaining != 0 {
            return None;
        }
        parts.reverse();
        Some(Utf8Blob::from(parts.join(", ")))
    }
}
