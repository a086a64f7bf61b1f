//! Status enums mapping to SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding lookup table created by the initial migration.

use crate::error::CoreError;

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Resolve a database status ID back into the enum.
            pub fn from_id(id: StatusId) -> Result<Self, CoreError> {
                match id {
                    $( $val => Ok($name::$variant), )+
                    other => Err(CoreError::Internal(format!(
                        "Unknown {} id {}",
                        $label, other
                    ))),
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl_text_codec!($name, $label, { $( $variant => $text ),+ });
    };
}

define_status_enum! {
    /// Top-level idea lifecycle status.
    IdeaStatus ("idea status") {
        Open = 1 => "open",
        Claimed = 2 => "claimed",
        Complete = 3 => "complete",
    }
}

define_status_enum! {
    /// Development stage of a claimed idea.
    SubStatus ("sub-status") {
        Planning = 1 => "planning",
        InDevelopment = 2 => "in_development",
        Testing = 3 => "testing",
        AwaitingDeployment = 4 => "awaiting_deployment",
        Deployed = 5 => "deployed",
        Verified = 6 => "verified",
        OnHold = 7 => "on_hold",
        Blocked = 8 => "blocked",
        Cancelled = 9 => "cancelled",
        RolledBack = 10 => "rolled_back",
    }
}

define_status_enum! {
    /// Overall status of a dual-approval claim request.
    ClaimApprovalStatus ("claim approval status") {
        Pending = 1 => "pending",
        Approved = 2 => "approved",
        Denied = 3 => "denied",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idea_status_ids_match_seed_data() {
        assert_eq!(IdeaStatus::Open.id(), 1);
        assert_eq!(IdeaStatus::Claimed.id(), 2);
        assert_eq!(IdeaStatus::Complete.id(), 3);
    }

    #[test]
    fn sub_status_ids_match_seed_data() {
        let expected: Vec<StatusId> = (1..=10).collect();
        let actual: Vec<StatusId> = SubStatus::ALL.iter().map(|s| s.id()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn from_id_round_trips_every_variant() {
        for status in ClaimApprovalStatus::ALL {
            assert_eq!(ClaimApprovalStatus::from_id(status.id()).unwrap(), *status);
        }
    }

    #[test]
    fn unknown_id_is_an_internal_error() {
        assert!(matches!(
            SubStatus::from_id(42),
            Err(CoreError::Internal(_))
        ));
    }

    #[test]
    fn parse_rejects_unknown_names() {
        let err = "shipped".parse::<SubStatus>().unwrap_err();
        assert!(err.to_string().contains("Invalid sub-status 'shipped'"));
    }

    #[test]
    fn serializes_as_snake_case_name() {
        let json = serde_json::to_string(&SubStatus::AwaitingDeployment).unwrap();
        assert_eq!(json, "\"awaiting_deployment\"");
        let back: SubStatus = serde_json::from_str("\"rolled_back\"").unwrap();
        assert_eq!(back, SubStatus::RolledBack);
    }

    #[test]
    fn serde_names_match_wire_names() {
        for status in SubStatus::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, status.as_str());
            assert_eq!(serde_json::from_value::<SubStatus>(json).unwrap(), *status);
        }
        for status in IdeaStatus::ALL {
            assert_eq!(serde_json::to_value(status).unwrap(), status.as_str());
        }
    }

    #[test]
    fn status_into_status_id() {
        let id: StatusId = IdeaStatus::Claimed.into();
        assert_eq!(id, 2);
    }
}
