//! Cartflow - Pipeline
//!
//! The assembler that wires the five analytics into a concrete graph of
//! queues, handler nodes and merge tasks.
//!
//! # The graph
//!
//! ```text
//! [log queue] → copy → ┬→ filter type=User → filter extra_1=ZOOM ─┬→ count       → R1 CountView
//!                      │                                          └→ value-count ┬→ R3 ProdView
//!                      │                                                         └→ sort desc → R5 ViewRanking
//!                      └→ filter type=Audit → filter extra_1=BUY ─┬→ count       → R2 CountBuy
//!                                                                 └→ value-count → sort asc → R4 BuyRanking
//! ```
//!
//! Each terminal queue `Rᵢ` feeds a merge task folding arrivals into that
//! analytic's [`ResultSlot`](cartflow_runtime::ResultSlot) with
//! merge-and-sum (the grand-total rule for single-column counts, the
//! `(Value, Count)` rule otherwise) and recording one latency sample per
//! arrival.
//!
//! # Scheduling
//!
//! Handler, merge and drain passes are short-lived: each processes what is
//! buffered and returns. The pipeline itself observes the ingest triggers
//! and resubmits one round of passes per tick, after the drop source (which
//! registers first) has refilled the source queues. Teardown closes every
//! queue so a blocked pass wakes with the closed sentinel, then shuts the
//! pool down.

mod graph;
mod merge;

pub use graph::{AnalyticHandle, AnalyticsPipeline, DrainNode, FlushCadence, GraphSettings};
pub use merge::MergeNode;
