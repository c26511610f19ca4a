// Tue Jan 16 2026 - Alex

use crate::structure::ResolvedLayout;
use serde::Serialize;

/// Padding summary for one resolved layout, with a packing suggestion for
/// emitters that want to reproduce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackingReport {
    pub class: String,
    /// Bytes actually used by data, including the dispatch pointer.
    pub natural_size: u64,
    pub total_padding: u64,
    pub actual_size: u64,
    pub suggested_packing: u64,
}

impl PackingReport {
    pub fn from_layout(layout: &ResolvedLayout) -> Self {
        let fields: u64 = layout.fields().iter().map(|f| f.size.as_u64()).sum();
        let vptr = layout.vtable().map(|s| s.size.as_u64()).unwrap_or(0);
        let actual_size = layout.size().as_u64();
        let total_padding = layout.total_padding();

        let suggested_packing = if total_padding == 0 {
            1
        } else if total_padding <= actual_size / 10 {
            4
        } else {
            8
        };

        log::debug!(
            "{}: natural={} actual={} padding={} pack={}",
            layout.class(),
            fields + vptr,
            actual_size,
            total_padding,
            suggested_packing
        );

        Self {
            class: layout.class().to_string(),
            natural_size: fields + vptr,
            total_padding,
            actual_size,
            suggested_packing,
        }
    }

    pub fn padding_percentage(&self) -> f64 {
        if self.actual_size == 0 {
            return 0.0;
        }
        (self.total_padding as f64 / self.actual_size as f64) * 100.0
    }
}
