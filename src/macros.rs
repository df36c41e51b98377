//! The `macros` module provides macros for internal use.

/// Generates a newtype over an integer that is clamped to a range.
///
/// Example: `clamp!(Channel, u8, 0, 15, 0, pub);`
/// Where:
/// - Channel is the name of the struct that will be created.
/// - u8 is the underlying data type
/// - 0 is the minimum allowed value (redundant in this case)
/// - 15 is the maximum allowed value
/// - 0 is the default value
/// - pub is the visibility of the struct
macro_rules! clamp {
    (
        $(#[$meta:meta])*
        $symbol:ident, $inner_type:ty, $min:expr, $max:expr, $default:expr, $visibility:vis
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
        $visibility struct $symbol($inner_type);

        impl Default for $symbol {
            fn default() -> Self {
                Self::new($default)
            }
        }

        impl $symbol {
            /// The smallest allowed value.
            #[allow(dead_code)]
            $visibility const MIN: $inner_type = $min;

            /// The largest allowed value.
            #[allow(dead_code)]
            $visibility const MAX: $inner_type = $max;

            /// Silently clamps the value if it is out of range. See [`Self::checked`].
            #[allow(dead_code)]
            $visibility const fn new(value: $inner_type) -> Self {
                let (clamped, _) = Self::clamp(value);
                Self(clamped)
            }

            /// Returns `None` instead of clamping when `value` is out of range.
            #[allow(dead_code)]
            $visibility const fn checked(value: $inner_type) -> Option<Self> {
                match Self::clamp(value) {
                    (clamped, true) => Some(Self(clamped)),
                    (_, false) => None,
                }
            }

            /// Returns the inner value.
            #[allow(dead_code)]
            $visibility const fn get(&self) -> $inner_type {
                self.0
            }

            #[allow(unused_comparisons)]
            const fn clamp(value: $inner_type) -> ($inner_type, bool) {
                if value < $min {
                    ($min, false)
                } else if value > $max {
                    ($max, false)
                } else {
                    (value, true)
                }
            }
        }

        impl From<$inner_type> for $symbol {
            fn from(value: $inner_type) -> Self {
                Self::new(value)
            }
        }

        impl From<$symbol> for $inner_type {
            fn from(value: $symbol) -> $inner_type {
                value.0
            }
        }

        impl std::fmt::Display for $symbol {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

#[test]
#[allow(clippy::disallowed_names)]
fn clamp_test() {
    clamp!(Foo, u8, 1, 16, 1, pub);
    let foo: Foo = 0u8.into();
    let foo_val: u8 = foo.into();
    assert_eq!(1, foo_val);
    assert_eq!(16, Foo::new(200).get());
    assert!(Foo::checked(17).is_none());
    assert_eq!(Some(Foo::new(3)), Foo::checked(3));
    let fmted = format!("{}", Foo::new(6));
    assert_eq!("6", fmted.as_str());
}

#[test]
fn clamp_signed_test() {
    clamp!(Bar, i8, -7, 7, 0, pub);
    assert_eq!(-7, Bar::new(-100).get());
    assert!(Bar::checked(-8).is_none());
    assert_eq!(Some(Bar::new(-7)), Bar::checked(-7));
}
