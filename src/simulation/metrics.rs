//! Running performance aggregates shown on the dashboard

/// Running performance aggregates
///
/// Averages are smoothed as `(old + new) / 2`, so recent deliveries weigh
/// more than old ones.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceMetrics {
    /// Seconds from placement to delivery
    pub average_delivery_time: f64,
    pub on_time_rate: f64,
    pub customer_satisfaction: f64,
    pub total_cost: f64,
    pub total_revenue: f64,
    pub efficiency: f64,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            average_delivery_time: 0.0,
            on_time_rate: 1.0,
            customer_satisfaction: 1.0,
            total_cost: 0.0,
            total_revenue: 0.0,
            efficiency: 1.0,
        }
    }
}

impl PerformanceMetrics {
    pub fn profit(&self) -> f64 {
        self.total_revenue - self.total_cost
    }

    pub fn profit_margin(&self) -> f64 {
        if self.total_revenue <= 0.0 {
            return 0.0;
        }
        self.profit() / self.total_revenue
    }

    /// Fold one delivery into the smoothed averages
    pub fn record_delivery(&mut self, delivery_time: f64, on_time: bool) {
        self.average_delivery_time = (self.average_delivery_time + delivery_time) / 2.0;
        let hit = if on_time { 1.0 } else { 0.0 };
        self.on_time_rate = (self.on_time_rate + hit) / 2.0;
        self.refresh_satisfaction();
    }

    pub fn add_cost(&mut self, cost: f64) {
        self.total_cost += cost;
    }

    pub fn add_revenue(&mut self, revenue: f64) {
        self.total_revenue += revenue;
    }

    /// Recompute satisfaction from the on-time rate, capped at 1
    pub fn refresh_satisfaction(&mut self) {
        self.customer_satisfaction = (self.on_time_rate * 1.2 - 0.2).min(1.0);
    }

    /// Scale satisfaction by an external factor (weather), clamped to [0, 1]
    pub fn apply_satisfaction_multiplier(&mut self, multiplier: f64) {
        self.customer_satisfaction = (self.customer_satisfaction * multiplier).clamp(0.0, 1.0);
    }

    pub fn update_efficiency(&mut self, vehicle_utilization: f64, warehouse_utilization: f64) {
        self.efficiency = (vehicle_utilization + warehouse_utilization) / 2.0;
    }
}
