/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! notegraph: an interactive force-directed canvas for a note graph.
//!
//! Data flows model → view → layout → render. The interaction controller and
//! the highlighter are side-channel mutators of render state; neither ever
//! rebuilds the layout unless the set of rendered nodes/edges actually
//! changed. Everything runs single-threaded in the host's frame loop except
//! snapshot fetching, which happens on a worker thread and reports back over
//! a channel.

pub mod app;
pub mod fetch;
pub mod highlight;
pub mod input;
pub mod layout;
pub mod model;
pub mod render;
pub mod view;
