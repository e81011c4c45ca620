use std::sync::Arc;
use std::time::Duration;

use super::*;

#[tokio::test]
async fn test_fifo_order() {
    let queue = BoundedQueue::new(10);
    for i in 0..10 {
        queue.push(i).await.unwrap();
    }
    for i in 0..10 {
        assert_eq!(queue.pop().await.unwrap(), i);
    }
}

#[tokio::test]
async fn test_fifo_across_tasks() {
    let queue = Arc::new(BoundedQueue::new(4));

    let producer = {
        let queue = Arc::clone(&queue);
        tokio::spawn(async move {
            for i in 0..100 {
                queue.push(i).await.unwrap();
            }
        })
    };

    let consumer = {
        let queue = Arc::clone(&queue);
        tokio::spawn(async move {
            for i in 0..100 {
                assert_eq!(queue.pop().await.unwrap(), i);
            }
        })
    };

    producer.await.unwrap();
    consumer.await.unwrap();
}

#[tokio::test]
async fn test_push_blocks_when_full() {
    let queue = Arc::new(BoundedQueue::new(2));
    queue.push(1).await.unwrap();
    queue.push(2).await.unwrap();

    let blocked = {
        let queue = Arc::clone(&queue);
        tokio::spawn(async move { queue.push(3).await })
    };

    // Producer should still be parked after a short wait
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!blocked.is_finished());

    assert_eq!(queue.pop().await.unwrap(), 1);
    blocked.await.unwrap().unwrap();
    assert_eq!(queue.len(), 2);
}

#[tokio::test]
async fn test_pop_blocks_when_empty() {
    let queue = Arc::new(BoundedQueue::<u32>::new(2));

    let blocked = {
        let queue = Arc::clone(&queue);
        tokio::spawn(async move { queue.pop().await })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!blocked.is_finished());

    queue.push(7).await.unwrap();
    assert_eq!(blocked.await.unwrap().unwrap(), 7);
}

#[tokio::test]
async fn test_close_wakes_blocked_consumer() {
    let queue = Arc::new(BoundedQueue::<u32>::new(2));

    let blocked = {
        let queue = Arc::clone(&queue);
        tokio::spawn(async move { queue.pop().await })
    };

    tokio::time::sleep(Duration::from_millis(10)).await;
    queue.close();

    assert_eq!(blocked.await.unwrap(), Err(QueueClosed));
}

#[tokio::test]
async fn test_close_rejects_producers_but_drains_consumers() {
    let queue = BoundedQueue::new(4);
    queue.push(1).await.unwrap();
    queue.push(2).await.unwrap();

    queue.close();

    assert_eq!(queue.push(3).await, Err(QueueClosed));
    // Remaining items drain before the sentinel
    assert_eq!(queue.pop().await.unwrap(), 1);
    assert_eq!(queue.pop().await.unwrap(), 2);
    assert_eq!(queue.pop().await, Err(QueueClosed));
}

#[tokio::test]
async fn test_is_empty_snapshot() {
    let queue = BoundedQueue::new(2);
    assert!(queue.is_empty());
    queue.push("x").await.unwrap();
    assert!(!queue.is_empty());
    assert_eq!(queue.len(), 1);
}

#[tokio::test]
async fn test_zero_capacity_is_bumped() {
    let queue = BoundedQueue::new(0);
    assert_eq!(queue.capacity(), 1);
    queue.push(1).await.unwrap();
    assert_eq!(queue.pop().await.unwrap(), 1);
}
