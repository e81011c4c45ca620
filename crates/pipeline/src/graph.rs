//! Pipeline assembler
//!
//! Builds the exact graph of queues and handler nodes for the five
//! analytics, attaches the merge tasks, and resubmits one round of passes
//! per ingest tick.

use std::sync::Arc;

use async_trait::async_trait;
use cartflow_frame::Table;
use cartflow_ops::{
    CopyHandler, CountLinesHandler, FilterHandler, HandlerNode, SortHandler, ValueCountHandler,
};
use cartflow_runtime::{BoundedQueue, ResultSlot, WorkerPool};
use cartflow_triggers::Observer;

use crate::merge::MergeNode;

// Log schema produced by the storefront simulator
const COL_TYPE: &str = "type";
const COL_ACTION: &str = "extra_1";
const COL_PRODUCT: &str = "extra_2";
const TYPE_USER: &str = "User";
const TYPE_AUDIT: &str = "Audit";
const ACTION_VIEW: &str = "ZOOM";
const ACTION_BUY: &str = "BUY";

// Summary schema shared by value counts and the merge fold
const KEY_COL: &str = "Value";
const SUM_COL: &str = "Count";

/// Which flush trigger an analytic binds to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushCadence {
    Minute,
    Hour,
}

/// One analytic's name, cadence and result slot
#[derive(Clone)]
pub struct AnalyticHandle {
    pub name: &'static str,
    pub cadence: FlushCadence,
    pub slot: Arc<ResultSlot>,
}

/// Assembler knobs
#[derive(Debug, Clone, Copy)]
pub struct GraphSettings {
    /// Capacity of every queue inside the graph
    pub output_queue_capacity: usize,
}

/// Releases tables from a queue nothing downstream consumes
///
/// The reference and request queues are bounded; without a consumer they
/// would eventually wedge ingestion.
pub struct DrainNode {
    label: &'static str,
    input: Arc<BoundedQueue<Table>>,
}

impl DrainNode {
    pub fn new(label: &'static str, input: Arc<BoundedQueue<Table>>) -> Self {
        Self { label, input }
    }

    pub async fn drain(&self) {
        while !self.input.is_empty() {
            let Ok(table) = self.input.pop().await else {
                break;
            };
            tracing::debug!(
                queue = self.label,
                rows = table.row_count(),
                "released unconsumed table"
            );
        }
    }
}

/// The assembled five-analytic graph
///
/// Owns the worker pool, every internal queue, and the nodes. Implements
/// [`Observer`] so the ingest triggers pace it: each tick submits one
/// round of handler, merge and drain passes (the drop source registers
/// first, so the source queues are already refilled).
pub struct AnalyticsPipeline {
    pool: WorkerPool,
    nodes: Vec<Arc<HandlerNode>>,
    merges: Vec<Arc<MergeNode>>,
    drains: Vec<Arc<DrainNode>>,
    queues: Vec<Arc<BoundedQueue<Table>>>,
    analytics: Vec<AnalyticHandle>,
}

impl AnalyticsPipeline {
    /// Wire the graph onto the three source queues
    pub fn build(
        settings: GraphSettings,
        pool: WorkerPool,
        log_queue: Arc<BoundedQueue<Table>>,
        reference_queue: Arc<BoundedQueue<Table>>,
        request_queue: Arc<BoundedQueue<Table>>,
    ) -> Self {
        let capacity = settings.output_queue_capacity;
        let mut queues: Vec<Arc<BoundedQueue<Table>>> = vec![
            Arc::clone(&log_queue),
            Arc::clone(&reference_queue),
            Arc::clone(&request_queue),
        ];
        // Views branch
        let views_in = make_queue(capacity, &mut queues);
        let buys_in = make_queue(capacity, &mut queues);
        let users = make_queue(capacity, &mut queues);
        let views = make_queue(capacity, &mut queues);
        let views_by_product = make_queue(capacity, &mut queues);
        let count_view_out = make_queue(capacity, &mut queues);
        let prod_view_out = make_queue(capacity, &mut queues);
        let view_rank_in = make_queue(capacity, &mut queues);
        let view_rank_out = make_queue(capacity, &mut queues);

        // Purchases branch
        let audits = make_queue(capacity, &mut queues);
        let buys = make_queue(capacity, &mut queues);
        let buys_by_product = make_queue(capacity, &mut queues);
        let count_buy_out = make_queue(capacity, &mut queues);
        let buy_rank_in = make_queue(capacity, &mut queues);
        let buy_rank_out = make_queue(capacity, &mut queues);

        // Submission order is topological: with a single worker one round
        // fully propagates a batch from the log queue to the slots
        let nodes = vec![
            Arc::new(HandlerNode::new(
                "copy:log",
                CopyHandler,
                log_queue,
                vec![Arc::clone(&views_in), Arc::clone(&buys_in)],
            )),
            Arc::new(HandlerNode::new(
                "filter:type=User",
                FilterHandler::equals(COL_TYPE, TYPE_USER),
                views_in,
                vec![Arc::clone(&users)],
            )),
            Arc::new(HandlerNode::new(
                "filter:extra_1=ZOOM",
                FilterHandler::equals(COL_ACTION, ACTION_VIEW),
                users,
                vec![Arc::clone(&views), Arc::clone(&views_by_product)],
            )),
            Arc::new(HandlerNode::new(
                "count:views",
                CountLinesHandler,
                views,
                vec![Arc::clone(&count_view_out)],
            )),
            Arc::new(HandlerNode::new(
                "value-count:extra_2(views)",
                ValueCountHandler::new(COL_PRODUCT),
                views_by_product,
                vec![Arc::clone(&prod_view_out), Arc::clone(&view_rank_in)],
            )),
            Arc::new(HandlerNode::new(
                "sort:Count desc",
                SortHandler::new(SUM_COL, false),
                view_rank_in,
                vec![Arc::clone(&view_rank_out)],
            )),
            Arc::new(HandlerNode::new(
                "filter:type=Audit",
                FilterHandler::equals(COL_TYPE, TYPE_AUDIT),
                buys_in,
                vec![Arc::clone(&audits)],
            )),
            Arc::new(HandlerNode::new(
                "filter:extra_1=BUY",
                FilterHandler::equals(COL_ACTION, ACTION_BUY),
                audits,
                vec![Arc::clone(&buys), Arc::clone(&buys_by_product)],
            )),
            Arc::new(HandlerNode::new(
                "count:buys",
                CountLinesHandler,
                buys,
                vec![Arc::clone(&count_buy_out)],
            )),
            Arc::new(HandlerNode::new(
                "value-count:extra_2(buys)",
                ValueCountHandler::new(COL_PRODUCT),
                buys_by_product,
                vec![Arc::clone(&buy_rank_in)],
            )),
            Arc::new(HandlerNode::new(
                "sort:Count asc",
                SortHandler::new(SUM_COL, true),
                buy_rank_in,
                vec![Arc::clone(&buy_rank_out)],
            )),
        ];

        let terminals = [
            ("CountView", FlushCadence::Minute, count_view_out),
            ("CountBuy", FlushCadence::Minute, count_buy_out),
            ("ProdView", FlushCadence::Minute, prod_view_out),
            ("BuyRanking", FlushCadence::Hour, buy_rank_out),
            ("ViewRanking", FlushCadence::Hour, view_rank_out),
        ];

        let mut merges = Vec::with_capacity(terminals.len());
        let mut analytics = Vec::with_capacity(terminals.len());
        for (name, cadence, terminal) in terminals {
            let slot = Arc::new(ResultSlot::new(name));
            merges.push(Arc::new(MergeNode::new(
                terminal,
                Arc::clone(&slot),
                KEY_COL,
                SUM_COL,
            )));
            analytics.push(AnalyticHandle {
                name,
                cadence,
                slot,
            });
        }

        let drains = vec![
            Arc::new(DrainNode::new("reference", reference_queue)),
            Arc::new(DrainNode::new("request", request_queue)),
        ];

        tracing::info!(
            nodes = nodes.len(),
            analytics = analytics.len(),
            workers = pool.worker_count(),
            "analytics pipeline assembled"
        );

        Self {
            pool,
            nodes,
            merges,
            drains,
            queues,
            analytics,
        }
    }

    /// The five analytics with their slots and flush cadences
    pub fn analytics(&self) -> &[AnalyticHandle] {
        &self.analytics
    }

    /// Submit one round of handler, merge and drain passes
    pub async fn submit_round(&self) {
        for node in &self.nodes {
            let node = Arc::clone(node);
            if self.pool.submit(async move { node.drain().await }).await.is_err() {
                tracing::debug!("pool closed, skipping round");
                return;
            }
        }
        for merge in &self.merges {
            let merge = Arc::clone(merge);
            if self.pool.submit(async move { merge.drain().await }).await.is_err() {
                return;
            }
        }
        for drain in &self.drains {
            let drain = Arc::clone(drain);
            if self.pool.submit(async move { drain.drain().await }).await.is_err() {
                return;
            }
        }
    }

    /// Wait for every submitted pass to finish
    pub async fn flush(&self) {
        self.pool.flush().await;
    }

    /// Close every queue, drain the pool and join its workers
    pub async fn shutdown(&self) {
        for queue in &self.queues {
            queue.close();
        }
        self.pool.shutdown().await;

        for node in &self.nodes {
            let snapshot = node.metrics().snapshot();
            tracing::debug!(
                node = node.label(),
                batches_in = snapshot.batches_in,
                batches_out = snapshot.batches_out,
                batches_dropped = snapshot.batches_dropped,
                "node final counters"
            );
        }
        tracing::info!("analytics pipeline shut down");
    }
}

/// Allocate a graph queue and register it for teardown
fn make_queue(
    capacity: usize,
    queues: &mut Vec<Arc<BoundedQueue<Table>>>,
) -> Arc<BoundedQueue<Table>> {
    let queue = Arc::new(BoundedQueue::new(capacity));
    queues.push(Arc::clone(&queue));
    queue
}

#[async_trait]
impl Observer for AnalyticsPipeline {
    /// The ingest timer refilled the source queues; run a round
    async fn on_time_tick(&self) {
        self.submit_round().await;
    }

    /// Request drops arrive on their own cadence; run a round for them too
    async fn on_request_tick(&self) {
        self.submit_round().await;
    }
}
