//! Name service message types and stateless validation.
//!
//! `validate_basic` checks only what needs no state: required fields and
//! parseable WRNs. Stateful checks (ownership, status, funds) live in the
//! keeper.

use serde::{Deserialize, Serialize};

use lib_types::Address;

use crate::errors::{RegistryError, RegistryResult};
use crate::payload::Payload;
use crate::wrn::Wrn;

/// Publish a signed record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsgSetRecord {
    pub payload: Payload,
    pub bond_id: String,
    pub signer: Address,
}

impl MsgSetRecord {
    pub fn validate_basic(&self) -> RegistryResult<()> {
        if self.payload.record.is_empty() {
            return Err(RegistryError::InvalidRequest("record is required".into()));
        }
        if self.payload.signatures.is_empty() {
            return Err(RegistryError::InvalidRequest(
                "at least one signature is required".into(),
            ));
        }
        if self.bond_id.is_empty() {
            return Err(RegistryError::InvalidRequest("bond id is required".into()));
        }
        Ok(())
    }
}

/// Re-charge rent and extend a record's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRenewRecord {
    pub record_id: String,
    pub signer: Address,
}

impl MsgRenewRecord {
    pub fn validate_basic(&self) -> RegistryResult<()> {
        if self.record_id.is_empty() {
            return Err(RegistryError::InvalidRequest("record id is required".into()));
        }
        Ok(())
    }
}

/// Attach a bond to a record that has none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgAssociateBond {
    pub record_id: String,
    pub bond_id: String,
    pub signer: Address,
}

impl MsgAssociateBond {
    pub fn validate_basic(&self) -> RegistryResult<()> {
        if self.record_id.is_empty() {
            return Err(RegistryError::InvalidRequest("record id is required".into()));
        }
        if self.bond_id.is_empty() {
            return Err(RegistryError::InvalidRequest("bond id is required".into()));
        }
        Ok(())
    }
}

/// Detach a record from its bond.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDissociateBond {
    pub record_id: String,
    pub signer: Address,
}

impl MsgDissociateBond {
    pub fn validate_basic(&self) -> RegistryResult<()> {
        if self.record_id.is_empty() {
            return Err(RegistryError::InvalidRequest("record id is required".into()));
        }
        Ok(())
    }
}

/// Detach every record funded by a bond.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDissociateRecords {
    pub bond_id: String,
    pub signer: Address,
}

impl MsgDissociateRecords {
    pub fn validate_basic(&self) -> RegistryResult<()> {
        if self.bond_id.is_empty() {
            return Err(RegistryError::InvalidRequest("bond id is required".into()));
        }
        Ok(())
    }
}

/// Move every record from one bond to another in a single transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgReAssociateRecords {
    pub old_bond_id: String,
    pub new_bond_id: String,
    pub signer: Address,
}

impl MsgReAssociateRecords {
    pub fn validate_basic(&self) -> RegistryResult<()> {
        if self.old_bond_id.is_empty() {
            return Err(RegistryError::InvalidRequest("old bond id is required".into()));
        }
        if self.new_bond_id.is_empty() {
            return Err(RegistryError::InvalidRequest("new bond id is required".into()));
        }
        Ok(())
    }
}

/// Reserve a top-level authority name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgReserveAuthority {
    pub name: String,
    /// Defaults to the signer when unset.
    pub owner: Option<Address>,
    /// Optional public key recorded with the authority.
    pub owner_public_key: Option<String>,
    pub signer: Address,
}

impl MsgReserveAuthority {
    pub fn validate_basic(&self) -> RegistryResult<()> {
        if self.name.is_empty() {
            return Err(RegistryError::InvalidRequest("name is required".into()));
        }
        Ok(())
    }
}

/// Attach a bond to an authority; first attachment charges rent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSetAuthorityBond {
    pub name: String,
    pub bond_id: String,
    pub signer: Address,
}

impl MsgSetAuthorityBond {
    pub fn validate_basic(&self) -> RegistryResult<()> {
        if self.name.is_empty() {
            return Err(RegistryError::InvalidRequest("name is required".into()));
        }
        if self.bond_id.is_empty() {
            return Err(RegistryError::InvalidRequest("bond id is required".into()));
        }
        Ok(())
    }
}

/// Bind a WRN to a record id. An empty `cid` clears the live binding
/// (soft delete) while preserving history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSetName {
    pub wrn: String,
    pub cid: String,
    pub signer: Address,
}

impl MsgSetName {
    pub fn validate_basic(&self) -> RegistryResult<()> {
        if self.wrn.is_empty() {
            return Err(RegistryError::InvalidRequest("wrn is required".into()));
        }
        self.wrn.parse::<Wrn>().map(|_| ())
    }
}

/// Clear the live binding of a WRN, preserving history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDeleteName {
    pub wrn: String,
    pub signer: Address,
}

impl MsgDeleteName {
    pub fn validate_basic(&self) -> RegistryResult<()> {
        if self.wrn.is_empty() {
            return Err(RegistryError::InvalidRequest("wrn is required".into()));
        }
        self.wrn.parse::<Wrn>().map(|_| ())
    }
}
