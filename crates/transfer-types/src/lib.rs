//! # Transfer Types
//!
//! Core domain entities for transfer state synchronization.
//!
//! A [`Transfer`] is the unit of synchronization: one file moving between a
//! remote user and this node, with a finite lifecycle and derived progress
//! fields. Transfers are owned by the transfer-management subsystem; this
//! crate only defines the immutable snapshot shape that flows through the
//! event bus and out to observers.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod transfer;

pub use transfer::{Transfer, TransferDirection, TransferState};
