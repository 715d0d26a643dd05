/// Declare an integer newtype for a wire field with a set of named values.
///
/// The field keeps its raw value, so reserved and unassigned codes decode
/// without error. [`name`](#method.name) maps a value back to its constant,
/// and `Debug` shows that name, or the raw value when there is none.
///
/// ```rust,ignore
/// nutype_enum! {
///     pub enum AvcPacketType(u8) {
///         SequenceHeader = 0,
///         Nalu = 1,
///     }
/// }
/// ```
macro_rules! nutype_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident($repr:ty) {
            $(
                $(#[$const_meta:meta])*
                $konst:ident = $raw:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        $vis struct $name(pub $repr);

        #[allow(non_upper_case_globals)]
        impl $name {
            $(
                $(#[$const_meta])*
                pub const $konst: Self = Self($raw);
            )*

            /// The constant name of this value, if it has one.
            pub fn name(self) -> Option<&'static str> {
                $(
                    if self == Self::$konst {
                        return Some(stringify!($konst));
                    }
                )*
                None
            }

            /// Whether the value is one of the named constants.
            pub fn is_known(self) -> bool {
                self.name().is_some()
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self.name() {
                    Some(konst) => write!(f, "{}::{}", stringify!($name), konst),
                    None => write!(f, "{}({:?})", stringify!($name), self.0),
                }
            }
        }

        impl From<$repr> for $name {
            fn from(raw: $repr) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for $repr {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

pub(crate) use nutype_enum;

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    nutype_enum! {
        enum Sample(u8) {
            First = 1,
            Second = 2,
        }
    }

    #[test]
    fn test_named_and_raw_values() {
        assert_eq!(Sample::from(2), Sample::Second);
        assert_eq!(Sample::Second.name(), Some("Second"));
        assert!(Sample(1).is_known());

        let unknown = Sample(9);
        assert_eq!(unknown.name(), None);
        assert!(!unknown.is_known());
        assert_eq!(u8::from(unknown), 9);
    }

    #[test]
    fn test_debug_uses_the_name() {
        assert_eq!(format!("{:?}", Sample::First), "Sample::First");
        assert_eq!(format!("{:?}", Sample(0)), "Sample(0)");
    }
}
