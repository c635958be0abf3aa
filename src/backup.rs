// 📂 SMS Backup Reader
// Decodes the XML written by SMS backup apps:
//
// <smses count="2">
//   <sms address="CIB" date="1709294400000" body="..." type="1" ... />
//   <mms ... />
// </smses>
//
// Only address, date and body are read; other attributes and non-sms
// elements are ignored.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{LedgerError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsRecord {
    #[serde(rename = "@address", default)]
    pub address: String,

    #[serde(rename = "@body", default)]
    pub body: String,

    /// Epoch milliseconds, string-encoded
    #[serde(rename = "@date", default)]
    pub date: String,
}

impl SmsRecord {
    pub fn new(address: &str, body: &str, date: &str) -> Self {
        SmsRecord {
            address: address.to_string(),
            body: body.to_string(),
            date: date.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename = "smses")]
struct SmsBackup {
    #[serde(rename = "sms", default)]
    messages: Vec<SmsRecord>,
}

/// Decode a backup document already in memory
pub fn parse_backup(xml: &str) -> Result<Vec<SmsRecord>> {
    let backup: SmsBackup = quick_xml::de::from_str(xml)?;
    Ok(backup.messages)
}

/// Read and decode a backup file
pub fn load_backup(path: &Path) -> Result<Vec<SmsRecord>> {
    let xml = fs::read_to_string(path).map_err(|source| LedgerError::ReadBackup {
        path: path.to_path_buf(),
        source,
    })?;

    let messages = parse_backup(&xml)?;
    debug!(path = %path.display(), count = messages.len(), "loaded SMS backup");
    Ok(messages)
}
