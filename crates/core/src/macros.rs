//! Declarative helpers for the closed string-coded enums used across the
//! domain (statuses, priorities, roles, notification types).

/// Implement `as_str`, `ALL`, `FromStr`, `TryFrom<String>` and `Display` for
/// an enum whose variants each map to one wire name.
///
/// Serde names come from `#[serde(rename = ...)]` on the variants, emitted by
/// the defining macro with the same literal.
macro_rules! impl_text_codec {
    ($name:ident, $label:literal, { $( $variant:ident => $text:literal ),+ $(,)? }) => {
        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// The snake_case wire name stored in the database and sent over JSON.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err($crate::error::CoreError::Validation(format!(
                        "Invalid {} '{}'. Must be one of: {}",
                        $label,
                        other,
                        [$( $text ),+].join(", ")
                    ))),
                }
            }
        }

        // Lets sqlx decode TEXT columns straight into the enum.
        impl TryFrom<String> for $name {
            type Error = $crate::error::CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Define a closed text-coded enum stored as a CHECK-constrained TEXT column.
macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl_text_codec!($name, $label, { $( $variant => $text ),+ });
    };
}
