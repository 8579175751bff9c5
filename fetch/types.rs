/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Wire types for the snapshot endpoint.
//!
//! Field names mirror the upstream JSON exactly; conversion into the
//! in-memory model happens in `GraphModel::from_snapshot`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One note as sent by the source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireNode {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub content_preview: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub word_count: u32,
}

/// Connection kind as sent by the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireConnectionType {
    Similarity,
    Manual,
}

/// One connection as sent by the source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireConnection {
    pub source_id: Uuid,
    pub target_id: Uuid,
    pub similarity: f32,
    pub connection_type: WireConnectionType,
}

/// The full snapshot payload; read-only once fetched, replaced on refresh.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<WireNode>,
    pub connections: Vec<WireConnection>,
    #[serde(default)]
    pub total_nodes: usize,
}
