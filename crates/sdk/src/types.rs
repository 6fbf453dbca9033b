//! Plain data records shared by several APIs.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! replication_statuses {
    ($($variant:ident),+ $(,)?) => {
        /// Connection state of a replicated volume's network link.
        ///
        /// Serialized as the bare state name. Names this client does not know
        /// decode to [`Unknown`](Self::Unknown) rather than failing the whole
        /// response.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[allow(missing_docs)]
        pub enum ReplicationNetworkStatus {
            $($variant,)+
            #[default]
            Unknown,
        }

        impl ReplicationNetworkStatus {
            /// Every known state, `Unknown` last.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+ Self::Unknown];

            /// Wire name.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)+
                    Self::Unknown => "Unknown",
                }
            }

            /// Parse a wire name; unrecognised names map to `Unknown`.
            #[must_use]
            pub fn from_name(name: &str) -> Self {
                match name {
                    $(stringify!($variant) => Self::$variant,)+
                    _ => Self::Unknown,
                }
            }
        }
    };
}

replication_statuses! {
    Disconnecting,
    Unconnected,
    Timeout,
    BrokenPipe,
    NetworkFailure,
    ProtocolError,
    TearDown,
    WFConnection,
    WFReportParams,
    Connected,
    StartingSyncS,
    StartingSyncT,
    WFBitMapS,
    WFBitMapT,
    WFSyncUUID,
    SyncSource,
    SyncTarget,
    PausedSyncS,
    PausedSyncT,
    VerifyS,
    VerifyT,
    StandAlone,
    Ready,
}

impl ReplicationNetworkStatus {
    /// Whether data is flowing between the replicas.
    #[must_use]
    pub const fn is_connected(self) -> bool {
        !matches!(
            self,
            Self::Disconnecting
                | Self::Unconnected
                | Self::Timeout
                | Self::BrokenPipe
                | Self::NetworkFailure
                | Self::ProtocolError
                | Self::TearDown
                | Self::WFConnection
                | Self::StandAlone
                | Self::Unknown
        )
    }
}

impl fmt::Display for ReplicationNetworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ReplicationNetworkStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReplicationNetworkStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = Cow::<'de, str>::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

/// Guest OS account to provision inside a VM.
///
/// The password never appears in `Debug` output.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VmAccountPreference {
    /// VM the account belongs to.
    pub vm_uuid: String,
    /// Account name.
    pub user_account: String,
    /// Account password.
    pub account_password: String,
}

impl VmAccountPreference {
    /// Create a preference for `vm_uuid`.
    pub fn new(
        vm_uuid: impl Into<String>,
        user_account: impl Into<String>,
        account_password: impl Into<String>,
    ) -> Self {
        Self {
            vm_uuid: vm_uuid.into(),
            user_account: user_account.into(),
            account_password: account_password.into(),
        }
    }
}

impl fmt::Debug for VmAccountPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VmAccountPreference")
            .field("vm_uuid", &self.vm_uuid)
            .field("user_account", &self.user_account)
            .field("account_password", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn every_state_round_trips_by_name() {
        assert_eq!(ReplicationNetworkStatus::ALL.len(), 24);
        for status in ReplicationNetworkStatus::ALL {
            assert_eq!(ReplicationNetworkStatus::from_name(status.as_str()), *status);
        }
    }

    #[rstest]
    #[case("WFBitMapS", ReplicationNetworkStatus::WFBitMapS)]
    #[case("StandAlone", ReplicationNetworkStatus::StandAlone)]
    #[case("Resyncing", ReplicationNetworkStatus::Unknown)]
    #[case("connected", ReplicationNetworkStatus::Unknown)]
    fn decodes_names(#[case] raw: &str, #[case] expected: ReplicationNetworkStatus) {
        let status: ReplicationNetworkStatus = serde_json::from_value(json!(raw)).unwrap();
        assert_eq!(status, expected);
    }

    #[test]
    fn serializes_bare_name() {
        assert_eq!(
            serde_json::to_value(ReplicationNetworkStatus::SyncSource).unwrap(),
            json!("SyncSource")
        );
        assert_eq!(ReplicationNetworkStatus::WFSyncUUID.to_string(), "WFSyncUUID");
    }

    #[test]
    fn connectivity() {
        assert!(ReplicationNetworkStatus::Connected.is_connected());
        assert!(ReplicationNetworkStatus::SyncTarget.is_connected());
        assert!(!ReplicationNetworkStatus::StandAlone.is_connected());
        assert!(!ReplicationNetworkStatus::default().is_connected());
    }

    #[test]
    fn account_password_is_redacted() {
        let pref = VmAccountPreference::new("vm-1", "root", "hunter2");
        let debug = format!("{pref:?}");
        assert!(debug.contains("root"));
        assert!(!debug.contains("hunter2"));

        let wire = serde_json::to_value(&pref).unwrap();
        assert_eq!(
            wire,
            json!({"vmUuid": "vm-1", "userAccount": "root", "accountPassword": "hunter2"})
        );
    }
}
