//! Key Encoding Helpers
//!
//! Key encoding is PROTOCOL. These functions define the canonical byte
//! layout for the auction namespace. Never inline key construction in
//! keeper logic.
//!
//! Layout (single-byte prefix then payload):
//!
//! | Prefix | Key suffix            | Value          |
//! |--------|-----------------------|----------------|
//! | 0x00   | auction id (utf-8)    | auction        |
//! | 0x01   | auction id ‖ bidder   | bid            |
//! | 0x02   | owner ‖ auction id    | empty marker   |
//! | 0xff   | (none)                | u64 sequence   |

use lib_types::Address;

/// Prefix for the auction id -> Auction index (the primary index).
pub const PREFIX_ID_TO_AUCTION: &[u8] = &[0x00];

/// Prefix for the (auction id, bidder) -> Bid index.
pub const PREFIX_AUCTION_TO_BIDS: &[u8] = &[0x01];

/// Prefix for the owner -> [auction id] marker index.
pub const PREFIX_OWNER_TO_AUCTIONS: &[u8] = &[0x02];

/// Key holding the monotonic auction sequence number.
pub const KEY_AUCTION_SEQUENCE: &[u8] = &[0xff];

/// Auction ids are hex SHA-256, so their rendered length is fixed.
pub const AUCTION_ID_LEN: usize = 64;

/// Key for the primary auction index.
#[inline]
pub fn auction_key(id: &str) -> Vec<u8> {
    let mut key = PREFIX_ID_TO_AUCTION.to_vec();
    key.extend_from_slice(id.as_bytes());
    key
}

/// Key for a bid under its auction. Fixed-width auction id keeps bids of
/// one auction contiguous and bidder-ordered.
#[inline]
pub fn bid_key(auction_id: &str, bidder: &Address) -> Vec<u8> {
    let mut key = PREFIX_AUCTION_TO_BIDS.to_vec();
    key.extend_from_slice(auction_id.as_bytes());
    key.extend_from_slice(bidder.as_bytes());
    key
}

/// Prefix scanning all bids of one auction.
#[inline]
pub fn bids_prefix(auction_id: &str) -> Vec<u8> {
    let mut key = PREFIX_AUCTION_TO_BIDS.to_vec();
    key.extend_from_slice(auction_id.as_bytes());
    key
}

/// Marker key for the owner index.
#[inline]
pub fn owner_auction_key(owner: &Address, auction_id: &str) -> Vec<u8> {
    let mut key = PREFIX_OWNER_TO_AUCTIONS.to_vec();
    key.extend_from_slice(owner.as_bytes());
    key.extend_from_slice(auction_id.as_bytes());
    key
}

/// Prefix scanning all auctions of one owner.
#[inline]
pub fn owner_auctions_prefix(owner: &Address) -> Vec<u8> {
    let mut key = PREFIX_OWNER_TO_AUCTIONS.to_vec();
    key.extend_from_slice(owner.as_bytes());
    key
}

/// Parse the auction id back out of an owner index key.
#[inline]
pub fn parse_owner_auction_key(key: &[u8]) -> Option<String> {
    let suffix = key.strip_prefix(PREFIX_OWNER_TO_AUCTIONS)?;
    let id_bytes = suffix.get(lib_types::ADDRESS_SIZE..)?;
    String::from_utf8(id_bytes.to_vec()).ok()
}
