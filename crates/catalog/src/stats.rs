use serde::Serialize;

use crate::product::{Product, WorkflowStatus};

/// Header counters for the review dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    /// Products still in workflow status `draft`.
    pub pending_approval: usize,
    /// Products below the configured margin threshold.
    pub low_margin: usize,
    /// Products not yet published (sidebar badge).
    pub offline: usize,
    pub online: usize,
}

impl DashboardStats {
    pub fn from_products(products: &[Product]) -> Self {
        products.iter().fold(Self::default(), |mut stats, p| {
            stats.total += 1;
            if p.status() == WorkflowStatus::Draft {
                stats.pending_approval += 1;
            }
            if !p.margin_safe() {
                stats.low_margin += 1;
            }
            if p.is_online() {
                stats.online += 1;
            } else {
                stats.offline += 1;
            }
            stats
        })
    }
}
