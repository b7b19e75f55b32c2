//! Key Encoding Helpers
//!
//! Key encoding is PROTOCOL. These functions define the canonical byte
//! layout for all name service keys. Never inline key construction in
//! keeper logic.
//!
//! Layout (single-byte prefix then payload):
//!
//! | Prefix | Key suffix                   | Value                  |
//! |--------|------------------------------|------------------------|
//! | 0x00   | record id (utf-8)            | record                 |
//! | 0x01   | authority name (utf-8)       | name authority         |
//! | 0x02   | wrn (utf-8)                  | name record            |
//! | 0x03   | bond id ‖ record id          | empty marker           |
//! | 0x04   | block height (big-endian u64)| block changeset        |
//! | 0x05   | auction id (utf-8)           | authority name         |
//! | 0x06   | bond id ‖ authority name     | empty marker           |
//! | 0x10   | sortable time bytes          | array of record ids    |
//! | 0x11   | sortable time bytes          | array of authority names|
//! | 0xe0   | record id ‖ wrn              | empty marker           |
//!
//! Time suffixes use the 29-byte sortable encoding, so lexicographic order
//! over queue keys equals chronological order.

use lib_types::{BlockHeight, BlockTime, TimeError};

/// Prefix for the record id -> Record index (the primary index).
pub const PREFIX_ID_TO_RECORD: &[u8] = &[0x00];

/// Prefix for the name -> NameAuthority index.
pub const PREFIX_NAME_TO_AUTHORITY: &[u8] = &[0x01];

/// Prefix for the WRN -> NameRecord index.
pub const PREFIX_WRN_TO_NAME_RECORD: &[u8] = &[0x02];

/// Prefix for the bond id -> [record id] marker index.
pub const PREFIX_BOND_TO_RECORDS: &[u8] = &[0x03];

/// Prefix for the block height -> changeset index.
pub const PREFIX_BLOCK_CHANGESET: &[u8] = &[0x04];

/// Prefix for the auction id -> authority name index.
pub const PREFIX_AUCTION_TO_AUTHORITY: &[u8] = &[0x05];

/// Prefix for the bond id -> [authority name] marker index.
pub const PREFIX_BOND_TO_AUTHORITIES: &[u8] = &[0x06];

/// Prefix for the expiry time -> [record id] queue.
pub const PREFIX_RECORD_EXPIRY_QUEUE: &[u8] = &[0x10];

/// Prefix for the expiry time -> [authority name] queue.
pub const PREFIX_AUTHORITY_EXPIRY_QUEUE: &[u8] = &[0x11];

/// Prefix for the reverse record id -> [wrn] marker index.
pub const PREFIX_RECORD_TO_NAMES: &[u8] = &[0xe0];

#[inline]
fn concat(prefix: &[u8], parts: &[&[u8]]) -> Vec<u8> {
    let mut key = prefix.to_vec();
    for part in parts {
        key.extend_from_slice(part);
    }
    key
}

/// Key for the primary record index.
#[inline]
pub fn record_key(id: &str) -> Vec<u8> {
    concat(PREFIX_ID_TO_RECORD, &[id.as_bytes()])
}

/// Key for the authority index.
#[inline]
pub fn authority_key(name: &str) -> Vec<u8> {
    concat(PREFIX_NAME_TO_AUTHORITY, &[name.as_bytes()])
}

/// Key for the name record index. The suffix is the full rendered WRN.
#[inline]
pub fn name_record_key(wrn: &str) -> Vec<u8> {
    concat(PREFIX_WRN_TO_NAME_RECORD, &[wrn.as_bytes()])
}

/// Marker key tying a record to the bond that pays its rent.
#[inline]
pub fn bond_record_key(bond_id: &str, record_id: &str) -> Vec<u8> {
    concat(PREFIX_BOND_TO_RECORDS, &[bond_id.as_bytes(), record_id.as_bytes()])
}

/// Prefix scanning all records funded by one bond.
#[inline]
pub fn bond_records_prefix(bond_id: &str) -> Vec<u8> {
    concat(PREFIX_BOND_TO_RECORDS, &[bond_id.as_bytes()])
}

/// Key for the per-height changeset.
#[inline]
pub fn changeset_key(height: BlockHeight) -> Vec<u8> {
    concat(PREFIX_BLOCK_CHANGESET, &[&height.to_be_bytes()])
}

/// Key mapping an auction back to the authority it arbitrates.
#[inline]
pub fn auction_authority_key(auction_id: &str) -> Vec<u8> {
    concat(PREFIX_AUCTION_TO_AUTHORITY, &[auction_id.as_bytes()])
}

/// Marker key tying an authority to the bond that pays its rent.
#[inline]
pub fn bond_authority_key(bond_id: &str, name: &str) -> Vec<u8> {
    concat(PREFIX_BOND_TO_AUTHORITIES, &[bond_id.as_bytes(), name.as_bytes()])
}

/// Bucket key in the record expiry queue.
#[inline]
pub fn record_expiry_key(time: BlockTime) -> Vec<u8> {
    concat(PREFIX_RECORD_EXPIRY_QUEUE, &[&time.to_sortable_bytes()])
}

/// Bucket key in the authority expiry queue.
#[inline]
pub fn authority_expiry_key(time: BlockTime) -> Vec<u8> {
    concat(PREFIX_AUTHORITY_EXPIRY_QUEUE, &[&time.to_sortable_bytes()])
}

/// Decode the bucket time out of an expiry queue key.
#[inline]
pub fn parse_expiry_key(key: &[u8]) -> Result<BlockTime, TimeError> {
    // Both queues share the single-byte-prefix shape.
    BlockTime::from_sortable_bytes(&key[1..])
}

/// Marker key for the reverse record -> names index.
#[inline]
pub fn record_name_key(record_id: &str, wrn: &str) -> Vec<u8> {
    concat(PREFIX_RECORD_TO_NAMES, &[record_id.as_bytes(), wrn.as_bytes()])
}

/// Prefix scanning all names pointing at one record.
#[inline]
pub fn record_names_prefix(record_id: &str) -> Vec<u8> {
    concat(PREFIX_RECORD_TO_NAMES, &[record_id.as_bytes()])
}

/// Strip a known prefix from an index key, yielding the utf-8 suffix.
#[inline]
pub fn parse_suffix(key: &[u8], prefix: &[u8]) -> Option<String> {
    let suffix = key.strip_prefix(prefix)?;
    String::from_utf8(suffix.to_vec()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_key_ordering() {
        // Queue keys must sort in ascending time order.
        let k0 = record_expiry_key(BlockTime::from_unix(0));
        let k1 = record_expiry_key(BlockTime::from_unix(1_000));
        let k2 = record_expiry_key(BlockTime::from_unix(2_000_000_000));
        assert!(k0 < k1);
        assert!(k1 < k2);
    }

    #[test]
    fn test_expiry_key_roundtrip() {
        let time = BlockTime::from_unix(1_700_000_000);
        let key = authority_expiry_key(time);
        assert_eq!(parse_expiry_key(&key).unwrap(), time);
    }

    #[test]
    fn test_queues_do_not_collide() {
        let time = BlockTime::from_unix(42);
        assert_ne!(record_expiry_key(time), authority_expiry_key(time));
    }

    #[test]
    fn test_changeset_key_ordering() {
        assert!(changeset_key(1) < changeset_key(2));
        assert!(changeset_key(255) < changeset_key(256));
    }

    #[test]
    fn test_bond_prefix_scan_extracts_record_id() {
        let key = bond_record_key("bond-1", "bafyrecord");
        let prefix = bond_records_prefix("bond-1");
        assert!(key.starts_with(&prefix));
        assert_eq!(parse_suffix(&key, &prefix).unwrap(), "bafyrecord");
    }

    #[test]
    fn test_record_names_prefix_scan() {
        let key = record_name_key("bafyrecord", "wrn://example/app");
        let prefix = record_names_prefix("bafyrecord");
        assert_eq!(parse_suffix(&key, &prefix).unwrap(), "wrn://example/app");
    }
}
