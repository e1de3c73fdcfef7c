//! FindMyPG Core
//!
//! Core types shared by the FindMyPG listing and booking service.
//!
//! This crate contains:
//! - Domain types: rows of the listing database (PG, room, owner, booking, ...)
//! - DTOs: request and response bodies of the HTTP API
//! - Lenient decoders for the loosely typed JSON the web client sends

pub mod domain;
pub mod dto;
pub mod lenient;
