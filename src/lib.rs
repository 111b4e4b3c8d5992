// Library root
// -----------
// Client core for the library-management backend. The binary
// (`main.rs`) wires these modules into an interactive terminal client.
//
// Module responsibilities:
// - `model`: records, statuses, roles and the session shape.
// - `error`: the client-facing failure taxonomy.
// - `parse`: fixed-width text-table codec for the CLI fallback path.
// - `session`: durable session file under the home directory.
// - `api`: the `Backend` trait and its blocking reqwest implementation.
// - `fetch`: REST-first fetch with the CLI fallback behind one seam.
// - `dispatch`: command vocabulary, pre-validation and action sending.
// - `view`: page and sub-view routing.
// - `render`: record-to-markup renderers, filtering and escaping.
// - `controller`: owns view state and chains action → re-fetch.
// - `ui`: the dialoguer menu loops.

pub mod api;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod fetch;
pub mod model;
pub mod parse;
pub mod render;
pub mod session;
pub mod ui;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;
