//! Bidirectional string tables for the fixed enums exchanged with the outside
//! world.
//!
//! Every enum declared through [`vocabulary!`] gets one table (`ALL` / `NAMES`)
//! that drives `Display`, `FromStr`, serde in both directions and the `enum`
//! lists of the generated schemas, so a name is spelled exactly once.

/// A closed set of values with a canonical lowercase name each.
pub trait Vocabulary: Sized + Copy + 'static {
    /// Human-readable name of the set, used in error messages.
    const KIND: &'static str;
    /// Every value, in schema order.
    const ALL: &'static [Self];
    /// Every name, in the same order as [`ALL`](Self::ALL).
    const NAMES: &'static [&'static str];

    /// Canonical name of this value.
    fn name(self) -> &'static str;

    /// Look a value up by its canonical name.
    fn lookup(text: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|value| value.name() == text)
    }
}

/// A string that is not part of a [`Vocabulary`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Canonical name of this value.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }
        }

        impl $crate::vocabulary::Vocabulary for $name {
            const KIND: &'static str = $kind;
            const ALL: &'static [Self] = &[ $( Self::$variant ),+ ];
            const NAMES: &'static [&'static str] = &[ $( $text ),+ ];

            fn name(self) -> &'static str {
                self.as_str()
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::vocabulary::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as $crate::vocabulary::Vocabulary>::lookup(s).ok_or_else(|| {
                    $crate::vocabulary::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    }
                })
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                <Self as $crate::vocabulary::Vocabulary>::lookup(&text).ok_or_else(|| {
                    <D::Error as ::serde::de::Error>::unknown_variant(
                        &text,
                        <Self as $crate::vocabulary::Vocabulary>::NAMES,
                    )
                })
            }
        }
    };
}

pub(crate) use vocabulary;

#[cfg(test)]
mod tests {
    use super::*;

    vocabulary! {
        enum Fruit("fruit") {
            Apple => "apple",
            Pear => "pear",
        }
    }

    #[test]
    fn should_list_names_in_declaration_order() {
        assert_eq!(Fruit::NAMES, &["apple", "pear"]);
        assert_eq!(Fruit::ALL, &[Fruit::Apple, Fruit::Pear]);
    }

    #[test]
    fn should_parse_and_display_the_same_name() {
        let pear: Fruit = "pear".parse().unwrap();
        assert_eq!(pear, Fruit::Pear);
        assert_eq!(pear.to_string(), "pear");
    }

    #[test]
    fn should_name_the_set_in_unknown_variant_error() {
        let err = "plum".parse::<Fruit>().unwrap_err();
        assert_eq!(err.to_string(), "unknown fruit `plum`");
    }

    #[test]
    fn should_reject_unknown_name_through_serde() {
        let err = serde_json::from_str::<Fruit>("\"plum\"").unwrap_err();
        assert!(err.to_string().contains("unknown variant `plum`"));
        assert_eq!(serde_json::to_string(&Fruit::Apple).unwrap(), "\"apple\"");
    }
}
