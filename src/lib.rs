//! `musicpak` - editor core for single-file music packages.
//!
//! A package bundles one audio track, an optional cover image, optional
//! lyrics and descriptive metadata. This crate provides the lyric parser and
//! playback cursor, media asset handling, the package model with its dirty
//! tracking, and the editing session that drives them.

pub mod config;
pub mod constants;
pub mod error;
pub mod lyrics;
pub mod media;
pub mod package;
pub mod services;
pub mod types;
