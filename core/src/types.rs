//! Domain DTOs for the Nuki Web API.
//!
//! # Design
//! Field names follow the API's camelCase wire format. Only the fields the
//! client relies on are modeled; unknown fields are ignored on decode.
//! Optional fields are skipped when `None` so a decoded entity encodes back
//! to the JSON it came from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A smart lock registered to the account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
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
    pub firmware_version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_state: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_pin_state: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_device: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<SmartlockState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_date: Option<DateTime<Utc>>,
}

/// Last reported state of a smart lock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SmartlockState {
    pub mode: u8,
    pub state: u8,
    pub trigger: u8,
    pub last_action: u8,
    #[serde(default)]
    pub battery_critical: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_charging: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_charge: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub door_state: Option<u8>,
}

/// The account the credential belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: i64,
    #[serde(rename = "type")]
    pub account_type: u8,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_date: Option<DateTime<Utc>>,
}

/// One entry from a smart lock's activity log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub smartlock_id: i64,
    pub device_type: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub action: u8,
    pub trigger: u8,
    pub state: u8,
    #[serde(default)]
    pub auto_unlock: bool,
    pub date: DateTime<Utc>,
}

/// Lock operation codes accepted by the action endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum LockAction {
    Unlock,
    Lock,
    Unlatch,
    LockNGo,
    LockNGoWithUnlatch,
}

impl From<LockAction> for u8 {
    fn from(action: LockAction) -> Self {
        match action {
            LockAction::Unlock => 1,
            LockAction::Lock => 2,
            LockAction::Unlatch => 3,
            LockAction::LockNGo => 4,
            LockAction::LockNGoWithUnlatch => 5,
        }
    }
}

impl TryFrom<u8> for LockAction {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(LockAction::Unlock),
            2 => Ok(LockAction::Lock),
            3 => Ok(LockAction::Unlatch),
            4 => Ok(LockAction::LockNGo),
            5 => Ok(LockAction::LockNGoWithUnlatch),
            other => Err(format!("unknown lock action {other}")),
        }
    }
}

/// Request payload for the lock action endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LockActionRequest {
    pub action: LockAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<u8>,
}

impl LockActionRequest {
    pub fn new(action: LockAction) -> Self {
        Self {
            action,
            option: None,
        }
    }
}

impl From<LockAction> for LockActionRequest {
    fn from(action: LockAction) -> Self {
        Self::new(action)
    }
}

/// Filters for a smart lock log query. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub account_user_id: Option<i64>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    pub action: Option<u8>,
    pub id: Option<String>,
    pub limit: Option<u32>,
}
