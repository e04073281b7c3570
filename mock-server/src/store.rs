//! In-memory data behind the mock API, seeded with a fixed fixture set.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Account id that owns the seeded locks; lock 99 belongs to someone else.
pub const OWNER_ACCOUNT_ID: i64 = 1;
pub const FOREIGN_SMARTLOCK_ID: i64 = 99;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: i64,
    #[serde(rename = "type")]
    pub account_type: u8,
    pub email: String,
    pub name: String,
    pub language: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SmartlockState {
    pub mode: u8,
    pub state: u8,
    pub trigger: u8,
    pub last_action: u8,
    pub battery_critical: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Smartlock {
    pub smartlock_id: i64,
    pub account_id: i64,
    #[serde(rename = "type")]
    pub device_type: u8,
    pub auth_id: i64,
    pub name: String,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<SmartlockState>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub smartlock_id: i64,
    pub device_type: u8,
    pub name: String,
    pub action: u8,
    pub trigger: u8,
    pub state: u8,
    pub auto_unlock: bool,
    pub date: DateTime<Utc>,
}

/// Lock state reached after performing `action`.
pub fn state_after(action: u8) -> u8 {
    match action {
        1 => 3,
        2 => 1,
        3 => 5,
        _ => 6,
    }
}

#[derive(Debug)]
pub struct Store {
    pub account: Account,
    pub smartlocks: BTreeMap<i64, Smartlock>,
    pub logs: Vec<LogEntry>,
}

impl Store {
    pub fn seeded() -> Self {
        let state = |state: u8, last_action: u8| SmartlockState {
            mode: 2,
            state,
            trigger: 0,
            last_action,
            battery_critical: false,
        };
        let locks = [
            Smartlock {
                smartlock_id: 17,
                account_id: OWNER_ACCOUNT_ID,
                device_type: 4,
                auth_id: 100,
                name: "Front door".to_string(),
                favorite: true,
                state: Some(state(1, 2)),
            },
            Smartlock {
                smartlock_id: 18,
                account_id: OWNER_ACCOUNT_ID,
                device_type: 4,
                auth_id: 101,
                name: "Back door".to_string(),
                favorite: false,
                state: Some(state(3, 1)),
            },
            Smartlock {
                smartlock_id: FOREIGN_SMARTLOCK_ID,
                account_id: 2,
                device_type: 0,
                auth_id: 200,
                name: "Neighbour".to_string(),
                favorite: false,
                state: None,
            },
        ];
        let log = |id: &str, action: u8, day: u32| LogEntry {
            id: id.to_string(),
            smartlock_id: 17,
            device_type: 4,
            name: "Alice".to_string(),
            action,
            trigger: 0,
            state: 0,
            auto_unlock: false,
            date: Utc
                .with_ymd_and_hms(2024, 3, day, 8, 0, 0)
                .single()
                .unwrap_or_default(),
        };

        Self {
            account: Account {
                account_id: OWNER_ACCOUNT_ID,
                account_type: 0,
                email: "alice@example.com".to_string(),
                name: "Alice".to_string(),
                language: "en".to_string(),
            },
            smartlocks: locks.into_iter().map(|l| (l.smartlock_id, l)).collect(),
            logs: vec![log("seed-1", 1, 1), log("seed-2", 2, 2), log("seed-3", 1, 3)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_store_has_owned_and_foreign_locks() {
        let store = Store::seeded();
        assert_eq!(store.smartlocks.len(), 3);
        assert_eq!(store.smartlocks[&17].account_id, OWNER_ACCOUNT_ID);
        assert_ne!(store.smartlocks[&FOREIGN_SMARTLOCK_ID].account_id, OWNER_ACCOUNT_ID);
        assert!(store.logs.iter().all(|l| l.smartlock_id == 17));
    }

    #[test]
    fn smartlock_serializes_wire_names() {
        let store = Store::seeded();
        let json = serde_json::to_value(&store.smartlocks[&17]).unwrap();
        assert_eq!(json["smartlockId"], 17);
        assert_eq!(json["type"], 4);
        assert_eq!(json["state"]["lastAction"], 2);
        let foreign = serde_json::to_value(&store.smartlocks[&FOREIGN_SMARTLOCK_ID]).unwrap();
        assert!(foreign.get("state").is_none());
    }

    #[test]
    fn actions_map_to_resulting_state() {
        assert_eq!(state_after(1), 3);
        assert_eq!(state_after(2), 1);
        assert_eq!(state_after(3), 5);
        assert_eq!(state_after(4), 6);
    }
}
