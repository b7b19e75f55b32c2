//! Authority registry operations.
//!
//! Top-level names are either registered directly or, when shorter than
//! the auction threshold, arbitrated by a sealed-bid auction. An authority
//! cannot bind names until a bond funds its rent.

use tracing::{debug, warn};

use lib_auction::{Auction, Bank, MsgCreateAuction};
use lib_store::Context;
use lib_types::Address;

use crate::bond::{BondKeeper, AUTHORITY_RENT_MODULE_ACCOUNT};
use crate::errors::{RegistryError, RegistryResult};
use crate::events::Event;
use crate::keys;
use crate::msgs::{MsgReserveAuthority, MsgSetAuthorityBond};
use crate::types::{AuthorityStatus, NameAuthority};
use crate::wrn::is_valid_authority_name;

use super::{Keeper, STORE_NAMESPACE};

impl<B: Bank + BondKeeper> Keeper<B> {
    /// Reserve a top-level name.
    ///
    /// Unreserved (or expired) short names open an auction; longer names
    /// register directly as `active`. Reserving a name that is `active` or
    /// under `auction` is a conflict.
    pub fn reserve_authority(
        &mut self,
        ctx: &mut Context,
        msg: MsgReserveAuthority,
    ) -> RegistryResult<(NameAuthority, Option<Auction>)> {
        msg.validate_basic()?;
        if !is_valid_authority_name(&msg.name) {
            return Err(RegistryError::InvalidRequest(format!(
                "invalid authority name: {}",
                msg.name
            )));
        }

        if let Some(existing) = self.get_authority(ctx, &msg.name)? {
            if existing.status != AuthorityStatus::Expired {
                return Err(RegistryError::Conflict(format!(
                    "name {} is already reserved",
                    msg.name
                )));
            }
            // Replacing an expired authority: retire its pending queue
            // entry and bond linkage.
            self.authority_expiry_remove(ctx, existing.expiry_time, &existing.name)?;
            if let Some(bond_id) = &existing.bond_id {
                ctx.store.delete(
                    STORE_NAMESPACE,
                    &keys::bond_authority_key(bond_id, &existing.name),
                )?;
            }
        }

        let params = self.params(ctx)?;
        let goes_to_auction = params.authority_auction_enabled
            && msg.name.chars().count() < params.authority_auction_threshold_length;

        let (authority, auction) = if goes_to_auction {
            let auction = self.auction.create_auction(
                ctx,
                MsgCreateAuction {
                    params: params.auction.clone(),
                    signer: msg.signer,
                },
            )?;
            // The authority outlives the auction by the grace period so
            // settlement always finds it.
            let expiry_time = ctx
                .time
                .checked_add(params.auction.commits_duration)
                .and_then(|t| t.checked_add(params.auction.reveals_duration))
                .and_then(|t| t.checked_add(params.authority_grace_period))
                .map_err(|_| RegistryError::InvalidRequest("expiry overflows".into()))?;
            ctx.store.set(
                STORE_NAMESPACE,
                &keys::auction_authority_key(&auction.id),
                msg.name.as_bytes(),
            )?;
            self.changeset(ctx, |cs| cs.auctions.push(auction.id.clone()))?;
            let authority = NameAuthority {
                name: msg.name.clone(),
                owner_address: None,
                owner_public_key: None,
                status: AuthorityStatus::Auction,
                height: ctx.height,
                bond_id: None,
                expiry_time,
                auction_id: Some(auction.id.clone()),
            };
            debug!(name = %msg.name, auction_id = %auction.id, "authority under auction");
            (authority, Some(auction))
        } else {
            let expiry_time = ctx
                .time
                .checked_add(params.authority_rent_duration)
                .map_err(|_| RegistryError::InvalidRequest("expiry overflows".into()))?;
            let authority = NameAuthority {
                name: msg.name.clone(),
                owner_address: Some(msg.owner.unwrap_or(msg.signer)),
                owner_public_key: msg.owner_public_key.clone(),
                status: AuthorityStatus::Active,
                height: ctx.height,
                bond_id: None,
                expiry_time,
                auction_id: None,
            };
            debug!(name = %msg.name, "authority reserved");
            (authority, None)
        };

        self.put_authority(ctx, &authority)?;
        self.authority_expiry_insert(ctx, authority.expiry_time, &authority.name)?;
        Ok((authority, auction))
    }

    /// Attach a bond to an authority. The first attachment charges one
    /// period of rent and restarts the expiry clock.
    pub fn set_authority_bond(
        &mut self,
        ctx: &mut Context,
        msg: MsgSetAuthorityBond,
    ) -> RegistryResult<NameAuthority> {
        msg.validate_basic()?;

        let mut authority = self
            .get_authority(ctx, &msg.name)?
            .ok_or_else(|| RegistryError::NotFound(msg.name.clone()))?;
        if authority.status != AuthorityStatus::Active {
            return Err(RegistryError::InvalidState(format!(
                "authority {} is not active",
                msg.name
            )));
        }
        if authority.owner_address != Some(msg.signer) {
            return Err(RegistryError::Unauthorized(
                "signer does not own the authority".into(),
            ));
        }
        self.require_bond_owner(&msg.bond_id, &msg.signer)?;

        if authority.bond_id.as_deref() == Some(msg.bond_id.as_str()) {
            return Ok(authority);
        }

        let had_bond = authority.bond_id.is_some();
        if let Some(previous) = &authority.bond_id {
            ctx.store.delete(
                STORE_NAMESPACE,
                &keys::bond_authority_key(previous, &authority.name),
            )?;
        }

        if !had_bond {
            let params = self.params(ctx)?;
            self.bank.transfer_to_module(
                &msg.bond_id,
                AUTHORITY_RENT_MODULE_ACCOUNT,
                &params.authority_rent,
            )?;
            self.authority_expiry_remove(ctx, authority.expiry_time, &authority.name)?;
            authority.expiry_time = ctx
                .time
                .checked_add(params.authority_rent_duration)
                .map_err(|_| RegistryError::InvalidRequest("expiry overflows".into()))?;
            self.authority_expiry_insert(ctx, authority.expiry_time, &authority.name)?;
        }

        authority.bond_id = Some(msg.bond_id.clone());
        self.put_authority(ctx, &authority)?;
        ctx.store.set(
            STORE_NAMESPACE,
            &keys::bond_authority_key(&msg.bond_id, &authority.name),
            &[],
        )?;
        Ok(authority)
    }

    /// Authority lookup by top-level name.
    pub fn whois(&self, ctx: &Context, name: &str) -> RegistryResult<Option<NameAuthority>> {
        self.get_authority(ctx, name)
    }

    /// All authorities, ascending by name.
    pub fn list_authorities(&self, ctx: &Context) -> RegistryResult<Vec<NameAuthority>> {
        let pairs = ctx
            .store
            .iter_prefix(STORE_NAMESPACE, keys::PREFIX_NAME_TO_AUTHORITY)?;
        let mut authorities = Vec::with_capacity(pairs.len());
        for (_, bytes) in pairs {
            authorities.push(lib_store::codec::from_bytes(&bytes)?);
        }
        Ok(authorities)
    }

    // =========================================================================
    // Auction-linked settlement
    // =========================================================================

    /// Resolve an authority whose auction settled in this block.
    ///
    /// A winner takes ownership and the authority becomes `active` with a
    /// fresh rent period (bond still unset); without a winner the
    /// authority expires into its grace period. Called from the end-block
    /// sweep; errors are reported to the caller for logging, never
    /// propagated into the block.
    pub(crate) fn settle_authority_auction(
        &mut self,
        ctx: &mut Context,
        auction: &Auction,
    ) -> RegistryResult<Option<Event>> {
        let key = keys::auction_authority_key(&auction.id);
        let Some(bytes) = ctx.store.get(STORE_NAMESPACE, &key)? else {
            // Standalone auction, nothing to settle here.
            return Ok(None);
        };
        let name = String::from_utf8(bytes)
            .map_err(|_| RegistryError::InvalidState("corrupt auction index".into()))?;

        let Some(mut authority) = self.get_authority(ctx, &name)? else {
            warn!(auction_id = %auction.id, name = %name, "auction settled for missing authority");
            ctx.store.delete(STORE_NAMESPACE, &key)?;
            return Ok(None);
        };

        let params = self.params(ctx)?;
        self.authority_expiry_remove(ctx, authority.expiry_time, &authority.name)?;
        match auction.winner_address {
            Some(winner) => {
                authority.owner_address = Some(winner);
                authority.owner_public_key = None;
                authority.status = AuthorityStatus::Active;
                authority.expiry_time = ctx
                    .time
                    .checked_add(params.authority_rent_duration)
                    .map_err(|_| RegistryError::InvalidRequest("expiry overflows".into()))?;
                debug!(name = %name, winner = %winner, "authority auction won");
            }
            None => {
                authority.owner_address = None;
                authority.status = AuthorityStatus::Expired;
                authority.expiry_time = ctx
                    .time
                    .checked_add(params.authority_grace_period)
                    .map_err(|_| RegistryError::InvalidRequest("expiry overflows".into()))?;
                debug!(name = %name, "authority auction failed, expiring");
            }
        }
        self.authority_expiry_insert(ctx, authority.expiry_time, &authority.name)?;
        self.put_authority(ctx, &authority)?;
        ctx.store.delete(STORE_NAMESPACE, &key)?;

        Ok(Some(Event::AuthoritySettled {
            name,
            winner: auction.winner_address,
        }))
    }
}

/// Convenience owner check shared with the name module.
pub(crate) fn require_authority_owner(
    authority: &NameAuthority,
    signer: &Address,
) -> RegistryResult<()> {
    if authority.owner_address.as_ref() != Some(signer) {
        return Err(RegistryError::Unauthorized(
            "signer does not own the authority".into(),
        ));
    }
    Ok(())
}
