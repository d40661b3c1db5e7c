//! Short-lived delivery and score popups

use super::config::{DELIVERY_FEEDBACK_DELAY, SCORE_FEEDBACK_DELAY};
use super::events::LogisticsEvent;
use super::order::Order;
use super::scheduler::{SharedScheduler, TimerKind, TimerScope};
use super::types::{FeedbackId, Location};

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryFeedback {
    pub id: FeedbackId,
    pub order: Order,
    pub location: Location,
    pub created_at: f64,
    pub fade_delay: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreFeedback {
    pub id: FeedbackId,
    pub increase: i64,
    pub total: i64,
    pub created_at: f64,
    pub fade_delay: f64,
}

pub struct FeedbackManager {
    scheduler: SharedScheduler,
    deliveries: Vec<DeliveryFeedback>,
    scores: Vec<ScoreFeedback>,
    next_id: u64,
}

impl FeedbackManager {
    pub fn new(scheduler: SharedScheduler) -> Self {
        Self {
            scheduler,
            deliveries: Vec::new(),
            scores: Vec::new(),
            next_id: 0,
        }
    }

    pub fn delivery_feedbacks(&self) -> &[DeliveryFeedback] {
        &self.deliveries
    }

    pub fn score_feedbacks(&self) -> &[ScoreFeedback] {
        &self.scores
    }

    pub fn handle(&mut self, event: &LogisticsEvent) {
        match event {
            LogisticsEvent::DeliverySuccessful { order, at } => {
                let id = self.allocate_id();
                let mut scheduler = self.scheduler.borrow_mut();
                self.deliveries.push(DeliveryFeedback {
                    id,
                    order: order.clone(),
                    location: *at,
                    created_at: scheduler.now(),
                    fade_delay: DELIVERY_FEEDBACK_DELAY,
                });
                scheduler.schedule_once(
                    DELIVERY_FEEDBACK_DELAY,
                    TimerKind::DismissDeliveryFeedback(id),
                    TimerScope::Interface,
                );
            }
            LogisticsEvent::ScoreIncreased { increase, total } => {
                let id = self.allocate_id();
                let mut scheduler = self.scheduler.borrow_mut();
                self.scores.push(ScoreFeedback {
                    id,
                    increase: *increase,
                    total: *total,
                    created_at: scheduler.now(),
                    fade_delay: SCORE_FEEDBACK_DELAY,
                });
                scheduler.schedule_once(
                    SCORE_FEEDBACK_DELAY,
                    TimerKind::DismissScoreFeedback(id),
                    TimerScope::Interface,
                );
            }
            _ => {}
        }
    }

    fn allocate_id(&mut self) -> FeedbackId {
        let id = FeedbackId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn dismiss_delivery(&mut self, id: FeedbackId) {
        self.deliveries.retain(|feedback| feedback.id != id);
    }

    pub fn dismiss_score(&mut self, id: FeedbackId) {
        self.scores.retain(|feedback| feedback.id != id);
    }
}
